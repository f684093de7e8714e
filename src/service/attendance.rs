//! Geofenced attendance marking.
//!
//! [`mark_attendance`] is the only write path for attendance. It validates the
//! request, resolves the staff member, checks the reported location against
//! the assigned clinic's radius, and appends the record unless the same
//! action was already marked inside the debounce window. The duplicate scan
//! and the append run under the store's lock.

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::{
    config::Config,
    error::AppError,
    model::attendance::{AttendanceAction, AttendanceRecord, Location},
    store::{AttendanceStore, StoreError},
    utils::geo::haversine_distance,
};

/// Body of `POST /attendance/mark`. Every field is optional here so that a
/// missing one is reported as a validation error instead of a parse failure.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendanceRequest {
    #[schema(example = "STAFF001")]
    pub staff_id: Option<String>,
    #[schema(example = "check-in")]
    pub action: Option<String>,
    pub location: Option<LocationInput>,
    /// Accepted for compatibility; the record always uses the assigned clinic
    #[schema(example = "CLINIC001")]
    pub clinic_id: Option<String>,
}

#[derive(Debug, Default, Clone, Copy, Deserialize, ToSchema)]
pub struct LocationInput {
    #[schema(example = 44.6488)]
    pub latitude: Option<f64>,
    #[schema(example = json!(-63.5752))]
    pub longitude: Option<f64>,
    #[schema(example = 12.5)]
    pub accuracy: Option<f64>,
}

/// A request that passed field validation.
#[derive(Debug, Clone)]
pub struct MarkAttendance {
    pub staff_id: String,
    pub action: AttendanceAction,
    pub location: Location,
    pub clinic_id: Option<String>,
}

impl MarkAttendanceRequest {
    pub fn validate(self) -> Result<MarkAttendance, AppError> {
        let staff_id = self
            .staff_id
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let (Some(staff_id), Some(action), Some(location)) =
            (staff_id, self.action, self.location)
        else {
            return Err(AppError::Validation(
                "staffId, action and location are required".to_string(),
            ));
        };

        let action = AttendanceAction::from_str(action.trim()).map_err(|_| {
            AppError::Validation("action must be either 'check-in' or 'check-out'".to_string())
        })?;

        let (Some(latitude), Some(longitude)) = (location.latitude, location.longitude) else {
            return Err(AppError::Validation(
                "location.latitude and location.longitude are required".to_string(),
            ));
        };

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(AppError::Validation(
                "location.latitude must be between -90 and 90".to_string(),
            ));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(AppError::Validation(
                "location.longitude must be between -180 and 180".to_string(),
            ));
        }
        if location.accuracy.is_some_and(|a| a < 0.0) {
            return Err(AppError::Validation(
                "location.accuracy must not be negative".to_string(),
            ));
        }

        Ok(MarkAttendance {
            staff_id,
            action,
            location: Location {
                latitude,
                longitude,
                accuracy: location.accuracy,
            },
            clinic_id: self
                .clinic_id
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
        })
    }
}

#[derive(Debug, Clone)]
pub struct MarkPolicy {
    pub duplicate_window: Duration,
    /// Reject a body staffId that differs from the token's
    pub enforce_token_subject: bool,
    /// Reject a clinicId that differs from the assigned clinic
    pub strict_clinic_match: bool,
}

impl TryFrom<&Config> for MarkPolicy {
    type Error = AppError;

    fn try_from(config: &Config) -> Result<Self, Self::Error> {
        let duplicate_window = Duration::try_seconds(config.duplicate_window_secs)
            .filter(|window| *window >= Duration::zero())
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "duplicate window of {}s is out of range",
                    config.duplicate_window_secs
                ))
            })?;

        Ok(Self {
            duplicate_window,
            enforce_token_subject: config.enforce_token_subject,
            strict_clinic_match: config.strict_clinic_match,
        })
    }
}

pub fn mark_attendance(
    store: &dyn AttendanceStore,
    policy: &MarkPolicy,
    caller_staff_id: &str,
    request: MarkAttendanceRequest,
    now: DateTime<Utc>,
) -> Result<AttendanceRecord, AppError> {
    let cmd = request.validate()?;

    if cmd.staff_id != caller_staff_id {
        warn!(
            caller = caller_staff_id,
            staff_id = %cmd.staff_id,
            "Attendance requested for a different staffId than the token subject"
        );
        if policy.enforce_token_subject {
            return Err(AppError::Forbidden(
                "You can only mark your own attendance".to_string(),
            ));
        }
    }

    let staff = store
        .find_staff(&cmd.staff_id)
        .ok_or_else(|| AppError::NotFound("Staff member not found".to_string()))?;
    let clinic = &staff.assigned_clinic;

    if let Some(requested) = cmd.clinic_id.as_deref().filter(|c| *c != clinic.id) {
        warn!(
            staff_id = %staff.staff_id,
            requested,
            assigned = %clinic.id,
            "Requested clinicId does not match the assigned clinic"
        );
        if policy.strict_clinic_match {
            return Err(AppError::Validation(
                "clinicId does not match your assigned clinic".to_string(),
            ));
        }
    }

    let distance = haversine_distance(
        cmd.location.latitude,
        cmd.location.longitude,
        clinic.latitude,
        clinic.longitude,
    );

    if distance.is_nan() || distance > clinic.radius {
        warn!(
            staff_id = %staff.staff_id,
            distance,
            radius = clinic.radius,
            "Attendance rejected outside geofence"
        );
        return Err(AppError::Geofence {
            clinic: clinic.name.clone(),
            distance,
            required: clinic.radius,
        });
    }

    let record = AttendanceRecord {
        id: now.timestamp_millis(),
        staff_id: staff.staff_id.clone(),
        staff_name: staff.name.clone(),
        action: cmd.action,
        location: cmd.location,
        clinic_id: clinic.id.clone(),
        clinic_name: clinic.name.clone(),
        distance,
        timestamp: now,
        verified: true,
    };

    let window = policy.duplicate_window;
    let is_duplicate = |existing: &AttendanceRecord| {
        existing.staff_id == staff.staff_id
            && existing.action == cmd.action
            && now - existing.timestamp < window
    };

    match store.append_record(record, &is_duplicate) {
        Ok(stored) => {
            info!(
                id = stored.id,
                staff_id = %stored.staff_id,
                action = %stored.action,
                distance = stored.distance,
                "Attendance marked"
            );
            Ok(stored)
        }
        Err(StoreError::Conflict(existing)) => {
            warn!(
                staff_id = %staff.staff_id,
                action = %cmd.action,
                existing_id = existing.id,
                "Duplicate attendance rejected"
            );
            Err(AppError::Duplicate {
                action: cmd.action,
                window_secs: window.num_seconds(),
            })
        }
    }
}
