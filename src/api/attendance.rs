use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};

use crate::{
    auth::auth::AuthStaff,
    config::Config,
    error::AppError,
    model::attendance::AttendanceRecord,
    service::attendance::{MarkAttendanceRequest, MarkPolicy, mark_attendance},
    store::{AttendanceStore, HistoryQuery},
};

#[derive(Serialize, Deserialize, ToSchema)]
pub struct MarkAttendanceResponse {
    #[schema(example = "check-in marked successfully")]
    pub message: String,
    pub record: AttendanceRecord,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct HistoryParams {
    /// Maximum number of records (default 10)
    #[schema(example = 10)]
    pub limit: Option<usize>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct HistoryResponse {
    pub records: Vec<AttendanceRecord>,
    /// Records for this staff member before the limit
    #[schema(example = 1)]
    pub total: usize,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct AllRecordsParams {
    /// 1-based page number
    #[schema(example = 1)]
    pub page: Option<usize>,
    /// Items per page (default 50)
    #[schema(example = 50)]
    pub limit: Option<usize>,
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AllRecordsResponse {
    pub records: Vec<AttendanceRecord>,
    #[schema(example = 1)]
    pub page: usize,
    #[schema(example = 50)]
    pub limit: usize,
    #[schema(example = 1)]
    pub total: usize,
    #[schema(example = 1)]
    pub total_pages: usize,
}

/// Mark attendance
#[utoipa::path(
    post,
    path = "/api/attendance/mark",
    request_body = MarkAttendanceRequest,
    responses(
        (status = 200, description = "Attendance recorded", body = MarkAttendanceResponse),
        (status = 400, description = "Validation, geofence or duplicate failure", body = Object, example = json!({
            "message": "You are 120m away from Atlantic Family Clinic. Please get within 75m to mark attendance.",
            "distance": 120.0,
            "required": 75.0
        })),
        (status = 401, description = "Missing token"),
        (status = 403, description = "Invalid token or another staff member's id"),
        (status = 404, description = "Staff member not found", body = Object, example = json!({
            "message": "Staff member not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
#[instrument(name = "attendance_mark", skip_all, fields(caller = %auth.staff_id))]
pub async fn mark(
    auth: AuthStaff,
    store: web::Data<dyn AttendanceStore>,
    config: web::Data<Config>,
    payload: web::Json<MarkAttendanceRequest>,
) -> Result<HttpResponse, AppError> {
    let policy = MarkPolicy::try_from(config.get_ref())?;

    let record = mark_attendance(
        store.get_ref(),
        &policy,
        &auth.staff_id,
        payload.into_inner(),
        Utc::now(),
    )?;

    Ok(HttpResponse::Ok().json(MarkAttendanceResponse {
        message: format!("{} marked successfully", record.action),
        record,
    }))
}

/// Attendance history of one staff member, newest first
#[utoipa::path(
    get,
    path = "/api/attendance/history/{staff_id}",
    params(
        ("staff_id", Path, description = "Staff ID"),
        HistoryParams
    ),
    responses(
        (status = 200, description = "Newest records first", body = HistoryResponse),
        (status = 401, description = "Missing token"),
        (status = 403, description = "Invalid token"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn history(
    _auth: AuthStaff,
    store: web::Data<dyn AttendanceStore>,
    config: web::Data<Config>,
    path: web::Path<String>,
    query: web::Query<HistoryParams>,
) -> Result<HttpResponse, AppError> {
    let staff_id = path.into_inner();
    let limit = query
        .limit
        .unwrap_or(config.history_default_limit)
        .clamp(1, config.max_page_size);

    let page = store.query_history(&HistoryQuery {
        staff_id: Some(staff_id),
        offset: 0,
        limit,
    });

    Ok(HttpResponse::Ok().json(HistoryResponse {
        records: page.records,
        total: page.total,
    }))
}

/// Every attendance record, paginated, newest first
#[utoipa::path(
    get,
    path = "/api/attendance/all",
    params(AllRecordsParams),
    responses(
        (status = 200, description = "Paginated attendance records", body = AllRecordsResponse),
        (status = 401, description = "Missing token"),
        (status = 403, description = "Invalid token"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn all_records(
    _auth: AuthStaff,
    store: web::Data<dyn AttendanceStore>,
    config: web::Data<Config>,
    query: web::Query<AllRecordsParams>,
) -> Result<HttpResponse, AppError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query
        .limit
        .unwrap_or(config.page_default_limit)
        .clamp(1, config.max_page_size);
    let offset = (page - 1).saturating_mul(limit);

    let result = store.query_history(&HistoryQuery {
        staff_id: None,
        offset,
        limit,
    });

    Ok(HttpResponse::Ok().json(AllRecordsResponse {
        records: result.records,
        page,
        limit,
        total: result.total,
        total_pages: result.total.div_ceil(limit),
    }))
}
