use crate::api::attendance::{
    AllRecordsParams, AllRecordsResponse, HistoryParams, HistoryResponse, MarkAttendanceResponse,
};
use crate::model::attendance::{AttendanceAction, AttendanceRecord, Location};
use crate::model::role::Role;
use crate::model::staff::{Clinic, StaffProfile};
use crate::models::{LoginReqDto, LoginResponse, VerifyResponse};
use crate::service::attendance::{LocationInput, MarkAttendanceRequest};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Clinic Attendance API",
        version = "1.0.0",
        description = r#"
## Geofenced Staff Attendance

Healthcare staff check in and out of their assigned clinic. A mark is only
accepted when the reported device location is inside the clinic's radius,
and the same action cannot be repeated within five minutes.

### Security
Attendance and profile endpoints require a **JWT Bearer** token obtained from
`POST /api/auth/login`. Tokens last 24 hours and are not revoked on logout.

### Errors
Failures return `{ "message": ... }`. Geofence failures also carry
`distance` and `required` (meters).

---
Built with **Rust**, **Actix Web** and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::login,
        crate::auth::handlers::verify,
        crate::auth::handlers::logout,

        crate::api::profile::get_profile,

        crate::api::attendance::mark,
        crate::api::attendance::history,
        crate::api::attendance::all_records
    ),
    components(
        schemas(
            LoginReqDto,
            LoginResponse,
            VerifyResponse,
            Role,
            Clinic,
            StaffProfile,
            AttendanceAction,
            Location,
            AttendanceRecord,
            LocationInput,
            MarkAttendanceRequest,
            MarkAttendanceResponse,
            HistoryParams,
            HistoryResponse,
            AllRecordsParams,
            AllRecordsResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login, token check and logout"),
        (name = "Profile", description = "Current staff profile"),
        (name = "Attendance", description = "Geofenced check-in/check-out and history"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
