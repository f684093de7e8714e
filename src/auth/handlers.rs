use actix_web::{HttpResponse, Responder, web};
use tracing::{debug, error, info, instrument};

use crate::{
    auth::{auth::AuthStaff, jwt::generate_token, password::verify_password},
    config::Config,
    error::AppError,
    model::staff::StaffProfile,
    models::{LoginReqDto, LoginResponse, VerifyResponse},
    store::AttendanceStore,
};

/// Staff login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Missing staffId or password", body = Object, example = json!({
            "message": "Staff ID and password are required"
        })),
        (status = 401, description = "Invalid credentials", body = Object, example = json!({
            "message": "Invalid credentials"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(store, config, user),
    fields(staff_id = %user.staff_id)
)]
pub async fn login(
    user: web::Json<LoginReqDto>,
    store: web::Data<dyn AttendanceStore>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    info!("Login request received");

    let staff_id = user.staff_id.trim();
    if staff_id.is_empty() || user.password.is_empty() {
        info!("Validation failed: empty staffId or password");
        return Err(AppError::Validation(
            "Staff ID and password are required".to_string(),
        ));
    }

    let Some(staff) = store.find_staff(staff_id) else {
        info!("Invalid credentials: staff not found");
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    };

    debug!("Verifying password");
    if let Err(e) = verify_password(&user.password, &staff.password_hash) {
        info!(error = %e, "Invalid credentials: password mismatch");
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = generate_token(&staff, &config.jwt_secret, config.token_ttl).map_err(|e| {
        error!(error = %e, "Failed to sign token");
        AppError::Internal(e.to_string())
    })?;

    info!("Login successful");

    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        staff: StaffProfile::from(&staff),
    }))
}

/// Check a stored token
///
/// Used by clients on startup to decide whether a saved session is still good.
#[utoipa::path(
    get,
    path = "/api/auth/verify",
    responses(
        (status = 200, description = "Token is valid", body = VerifyResponse),
        (status = 401, description = "Missing token"),
        (status = 403, description = "Invalid or expired token"),
        (status = 404, description = "Staff member not found", body = Object, example = json!({
            "message": "Staff member not found"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Auth"
)]
pub async fn verify(
    auth: AuthStaff,
    store: web::Data<dyn AttendanceStore>,
) -> Result<HttpResponse, AppError> {
    let staff = store.find_staff(&auth.staff_id).ok_or_else(|| {
        info!(staff_id = %auth.staff_id, "Token subject no longer in the directory");
        AppError::NotFound("Staff member not found".to_string())
    })?;

    Ok(HttpResponse::Ok().json(VerifyResponse {
        valid: true,
        staff: StaffProfile::from(&staff),
    }))
}

/// Logout
///
/// Tokens are not revoked; the client drops its copy and the token stays
/// valid until it expires.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 204, description = "Logged out")
    ),
    tag = "Auth"
)]
pub async fn logout() -> impl Responder {
    HttpResponse::NoContent().finish()
}
