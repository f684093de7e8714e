//! Fixtures shared by unit and HTTP tests.

use std::sync::Arc;

use crate::{
    auth::password::hash_password,
    model::{
        role::Role,
        staff::{Clinic, StaffMember},
    },
    service::attendance::{LocationInput, MarkAttendanceRequest},
    store::{AttendanceStore, InMemoryStore},
    utils::geo::EARTH_RADIUS_M,
};

pub const TEST_PASSWORD: &str = "password123";

/// Meters per degree of latitude on the haversine sphere.
pub const METERS_PER_DEGREE_LAT: f64 = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;

/// A nurse assigned to a clinic named after them, hashed with [`TEST_PASSWORD`].
pub fn staff_at(staff_id: &str, latitude: f64, longitude: f64, radius: f64) -> StaffMember {
    StaffMember {
        staff_id: staff_id.to_string(),
        password_hash: hash_password(TEST_PASSWORD).unwrap(),
        name: format!("Nurse {staff_id}"),
        role: Role::Nurse,
        assigned_clinic: Clinic {
            id: format!("CLINIC-{staff_id}"),
            name: format!("Clinic of {staff_id}"),
            latitude,
            longitude,
            radius,
        },
    }
}

pub fn mark_request(staff_id: &str, action: &str, latitude: f64, longitude: f64) -> MarkAttendanceRequest {
    MarkAttendanceRequest {
        staff_id: Some(staff_id.to_string()),
        action: Some(action.to_string()),
        location: Some(LocationInput {
            latitude: Some(latitude),
            longitude: Some(longitude),
            accuracy: Some(10.0),
        }),
        clinic_id: None,
    }
}

/// Store with STAFF001 at the origin, radius 75 m.
pub fn shared_store() -> Arc<dyn AttendanceStore> {
    Arc::new(InMemoryStore::new(vec![staff_at("STAFF001", 0.0, 0.0, 75.0)]))
}
