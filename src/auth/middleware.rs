use actix_web::{
    Error, HttpMessage, ResponseError,
    body::{BoxBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
};

use crate::auth::auth::authenticate;

/// Rejects requests without a valid bearer token; otherwise stores the
/// [`AuthStaff`](crate::auth::auth::AuthStaff) in the request extensions.
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let staff = match authenticate(req.request()) {
        Ok(staff) => staff,
        Err(e) => {
            let resp = e.error_response();
            return Ok(req.into_response(resp));
        }
    };

    tracing::debug!(
        staff_id = %staff.staff_id,
        name = %staff.name,
        role = %staff.role,
        path = %req.path(),
        "Authenticated request"
    );
    req.extensions_mut().insert(staff);

    Ok(next.call(req).await?.map_into_boxed_body())
}
