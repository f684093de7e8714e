use std::collections::HashMap;

use parking_lot::RwLock;
use thiserror::Error;

use crate::model::{attendance::AttendanceRecord, staff::StaffMember};

#[derive(Debug, Error)]
pub enum StoreError {
    /// The conflict predicate matched an existing record.
    #[error("conflicting record {}", .0.id)]
    Conflict(Box<AttendanceRecord>),
}

/// Which slice of the history to return. `staff_id: None` means every staff.
#[derive(Debug, Clone, Default)]
pub struct HistoryQuery {
    pub staff_id: Option<String>,
    pub offset: usize,
    pub limit: usize,
}

#[derive(Debug, Clone)]
pub struct HistoryPage {
    pub records: Vec<AttendanceRecord>,
    /// Matching records before offset/limit were applied
    pub total: usize,
}

/// Staff directory plus append-only attendance log.
pub trait AttendanceStore: Send + Sync {
    fn find_staff(&self, staff_id: &str) -> Option<StaffMember>;

    /// Appends `record` unless `conflicts` matches a stored record.
    ///
    /// The scan and the insert happen under one lock, so two callers racing
    /// with the same predicate cannot both succeed. Returns the stored
    /// record, whose id may have been bumped to stay unique.
    fn append_record(
        &self,
        record: AttendanceRecord,
        conflicts: &dyn Fn(&AttendanceRecord) -> bool,
    ) -> Result<AttendanceRecord, StoreError>;

    /// Newest first (timestamp, then id, descending).
    fn query_history(&self, query: &HistoryQuery) -> HistoryPage;
}

pub struct InMemoryStore {
    staff: HashMap<String, StaffMember>,
    records: RwLock<Vec<AttendanceRecord>>,
}

impl InMemoryStore {
    pub fn new(staff: Vec<StaffMember>) -> Self {
        Self {
            staff: staff
                .into_iter()
                .map(|s| (s.staff_id.clone(), s))
                .collect(),
            records: RwLock::new(Vec::new()),
        }
    }

    pub fn staff_count(&self) -> usize {
        self.staff.len()
    }
}

impl AttendanceStore for InMemoryStore {
    fn find_staff(&self, staff_id: &str) -> Option<StaffMember> {
        self.staff.get(staff_id).cloned()
    }

    fn append_record(
        &self,
        mut record: AttendanceRecord,
        conflicts: &dyn Fn(&AttendanceRecord) -> bool,
    ) -> Result<AttendanceRecord, StoreError> {
        let mut records = self.records.write();

        if let Some(existing) = records.iter().find(|r| conflicts(r)) {
            return Err(StoreError::Conflict(Box::new(existing.clone())));
        }

        // ids are millisecond stamps; two marks in the same millisecond must not collide
        if let Some(max_id) = records.iter().map(|r| r.id).max() {
            if record.id <= max_id {
                record.id = max_id + 1;
            }
        }

        records.push(record.clone());
        Ok(record)
    }

    fn query_history(&self, query: &HistoryQuery) -> HistoryPage {
        let mut matching: Vec<AttendanceRecord> = {
            let records = self.records.read();
            records
                .iter()
                .filter(|r| {
                    query
                        .staff_id
                        .as_deref()
                        .is_none_or(|id| r.staff_id == id)
                })
                .cloned()
                .collect()
        };

        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));

        let total = matching.len();
        let records = matching
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect();

        HistoryPage { records, total }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::{AttendanceAction, Location};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn record(staff_id: &str, at: DateTime<Utc>) -> AttendanceRecord {
        AttendanceRecord {
            id: at.timestamp_millis(),
            staff_id: staff_id.to_string(),
            staff_name: "Test".to_string(),
            action: AttendanceAction::CheckIn,
            location: Location {
                latitude: 0.0,
                longitude: 0.0,
                accuracy: None,
            },
            clinic_id: "C1".to_string(),
            clinic_name: "Clinic".to_string(),
            distance: 0.0,
            timestamp: at,
            verified: true,
        }
    }

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap()
    }

    #[test]
    fn conflict_predicate_blocks_append() {
        let store = InMemoryStore::new(vec![]);
        store.append_record(record("S1", base()), &|_| false).unwrap();

        let err = store
            .append_record(record("S1", base() + Duration::seconds(1)), &|r| {
                r.staff_id == "S1"
            })
            .unwrap_err();
        let StoreError::Conflict(existing) = err;
        assert_eq!(existing.staff_id, "S1");

        let page = store.query_history(&HistoryQuery {
            limit: 10,
            ..Default::default()
        });
        assert_eq!(page.total, 1);
    }

    #[test]
    fn ids_stay_unique_within_one_millisecond() {
        let store = InMemoryStore::new(vec![]);
        let a = store.append_record(record("S1", base()), &|_| false).unwrap();
        let b = store.append_record(record("S2", base()), &|_| false).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(b.id, a.id + 1);
    }

    #[test]
    fn history_is_newest_first_filtered_and_limited() {
        let store = InMemoryStore::new(vec![]);
        for minutes in [10, 0, 30, 20] {
            store
                .append_record(record("S1", base() + Duration::minutes(minutes)), &|_| false)
                .unwrap();
        }
        store
            .append_record(record("S2", base() + Duration::minutes(40)), &|_| false)
            .unwrap();

        let page = store.query_history(&HistoryQuery {
            staff_id: Some("S1".to_string()),
            offset: 0,
            limit: 3,
        });

        assert_eq!(page.total, 4);
        assert_eq!(page.records.len(), 3);
        assert!(page.records.iter().all(|r| r.staff_id == "S1"));
        assert!(
            page.records
                .windows(2)
                .all(|w| w[0].timestamp > w[1].timestamp)
        );
        assert_eq!(page.records[0].timestamp, base() + Duration::minutes(30));
    }

    #[test]
    fn offset_pages_partition_the_history() {
        let store = InMemoryStore::new(vec![]);
        for minutes in 0..5 {
            store
                .append_record(record("S1", base() + Duration::minutes(minutes)), &|_| false)
                .unwrap();
        }

        let first = store.query_history(&HistoryQuery {
            staff_id: None,
            offset: 0,
            limit: 2,
        });
        let last = store.query_history(&HistoryQuery {
            staff_id: None,
            offset: 4,
            limit: 2,
        });
        let past_end = store.query_history(&HistoryQuery {
            staff_id: None,
            offset: 10,
            limit: 2,
        });

        assert_eq!(first.records.len(), 2);
        assert_eq!(first.records[0].timestamp, base() + Duration::minutes(4));
        assert_eq!(last.records.len(), 1);
        assert_eq!(last.records[0].timestamp, base());
        assert!(past_end.records.is_empty());
        assert_eq!(past_end.total, 5);
    }
}
