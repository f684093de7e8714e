use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, web::Data};
use futures::future::{Ready, ready};

use crate::{
    auth::jwt::verify_token, config::Config, error::AppError, model::role::Role, models::Claims,
};

/// Identity attached to a request by a verified bearer token.
#[derive(Debug, Clone)]
pub struct AuthStaff {
    pub staff_id: String,
    pub name: String,
    pub role: Role,
}

impl From<Claims> for AuthStaff {
    fn from(claims: Claims) -> Self {
        Self {
            staff_id: claims.staff_id,
            name: claims.name,
            role: claims.role,
        }
    }
}

/// Pulls the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(req: &HttpRequest) -> Result<&str, AppError> {
    let header = req
        .headers()
        .get("Authorization")
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    header
        .to_str()
        .ok()
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            AppError::Unauthorized("Authorization header must start with Bearer".to_string())
        })
}

/// Verifies the bearer token of `req` against the configured secret.
pub fn authenticate(req: &HttpRequest) -> Result<AuthStaff, AppError> {
    let token = bearer_token(req)?;

    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| AppError::Internal("App config missing".to_string()))?;

    verify_token(token, &config.jwt_secret)
        .map(AuthStaff::from)
        .map_err(|e| {
            tracing::debug!(error = %e, "Token verification failed");
            AppError::Forbidden("Invalid or expired token".to_string())
        })
}

impl FromRequest for AuthStaff {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // set by auth_middleware on protected scopes
        if let Some(staff) = req.extensions().get::<AuthStaff>() {
            return ready(Ok(staff.clone()));
        }

        ready(authenticate(req))
    }
}
