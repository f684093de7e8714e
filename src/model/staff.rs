use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::role::Role;

/// Geofence a staff member must be inside to mark attendance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": "CLINIC001",
    "name": "Atlantic Family Clinic",
    "latitude": 44.6488,
    "longitude": -63.5752,
    "radius": 75.0
}))]
pub struct Clinic {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Allowed radius in meters
    pub radius: f64,
}

#[derive(Debug, Clone)]
pub struct StaffMember {
    pub staff_id: String,
    /// argon2 PHC string
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub assigned_clinic: Clinic,
}

/// What the API exposes about a staff member. Never carries the hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffProfile {
    #[schema(example = "STAFF001")]
    pub staff_id: String,
    #[schema(example = "Sarah Johnson")]
    pub name: String,
    pub role: Role,
    pub assigned_clinic: Clinic,
}

impl From<&StaffMember> for StaffProfile {
    fn from(staff: &StaffMember) -> Self {
        Self {
            staff_id: staff.staff_id.clone(),
            name: staff.name.clone(),
            role: staff.role,
            assigned_clinic: staff.assigned_clinic.clone(),
        }
    }
}
