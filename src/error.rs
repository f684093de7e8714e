//! Request-terminal failures and their HTTP mapping.
//!
//! Every handler returns `Result<_, AppError>`; actix turns the error into a
//! JSON body `{ "message": ... }` with the status from [`AppError::status_code`].
//! Internal details are logged and never sent to the client.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::model::attendance::AttendanceAction;

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed request fields.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// Reported location is outside the clinic radius.
    #[error(
        "You are {distance:.0}m away from {clinic}. Please get within {required}m to mark attendance."
    )]
    Geofence {
        clinic: String,
        distance: f64,
        required: f64,
    },

    /// Same action repeated inside the debounce window.
    #[error("{action} already marked within the last {}", describe_window(.window_secs))]
    Duplicate {
        action: AttendanceAction,
        window_secs: i64,
    },

    /// Missing credentials or bad login.
    #[error("{0}")]
    Unauthorized(String),

    /// Token failed verification, or acts for someone else.
    #[error("{0}")]
    Forbidden(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// "5 minutes", "1 minute" or "90 seconds".
fn describe_window(secs: &i64) -> String {
    match *secs {
        60 => "1 minute".to_string(),
        s if s > 0 && s % 60 == 0 => format!("{} minutes", s / 60),
        1 => "1 second".to_string(),
        s => format!("{s} seconds"),
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Geofence { .. } | AppError::Duplicate { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Geofence {
                distance, required, ..
            } => json!({
                "message": self.to_string(),
                "distance": distance.round(),
                "required": required,
            }),
            AppError::Internal(_) => {
                tracing::error!(error = %self, "Unexpected error");
                json!({ "message": "Internal Server Error" })
            }
            _ => json!({ "message": self.to_string() }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}
