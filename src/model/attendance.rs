use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum AttendanceAction {
    #[serde(rename = "check-in")]
    #[strum(serialize = "check-in")]
    CheckIn,
    #[serde(rename = "check-out")]
    #[strum(serialize = "check-out")]
    CheckOut,
}

/// Device reading sent along with a mark request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    #[schema(example = 44.6488)]
    pub latitude: f64,
    #[schema(example = json!(-63.5752))]
    pub longitude: f64,
    /// Reported accuracy in meters, if the device gave one
    #[schema(example = 12.5, nullable = true)]
    pub accuracy: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": 1760875200000i64,
    "staffId": "STAFF001",
    "staffName": "Sarah Johnson",
    "action": "check-in",
    "location": { "latitude": 44.6488, "longitude": -63.5752, "accuracy": 12.5 },
    "clinicId": "CLINIC001",
    "clinicName": "Atlantic Family Clinic",
    "distance": 8.4,
    "timestamp": "2026-10-19T12:00:00Z",
    "verified": true
}))]
pub struct AttendanceRecord {
    /// Unix milliseconds at creation, unique within the store
    pub id: i64,
    pub staff_id: String,
    pub staff_name: String,
    pub action: AttendanceAction,
    pub location: Location,
    pub clinic_id: String,
    pub clinic_name: String,
    /// Meters from the clinic when the record was created
    pub distance: f64,
    #[schema(value_type = String, format = "date-time")]
    pub timestamp: DateTime<Utc>,
    pub verified: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn action_uses_hyphenated_names() {
        assert_eq!(
            serde_json::to_string(&AttendanceAction::CheckIn).unwrap(),
            "\"check-in\""
        );
        assert_eq!(
            AttendanceAction::from_str("check-out").unwrap(),
            AttendanceAction::CheckOut
        );
        assert_eq!(AttendanceAction::CheckOut.to_string(), "check-out");
        assert!(AttendanceAction::from_str("checkin").is_err());
    }
}
