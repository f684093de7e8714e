use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::{role::Role, staff::StaffProfile};

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginReqDto {
    #[schema(example = "STAFF001")]
    #[serde(default)]
    pub staff_id: String,
    #[schema(example = "password123")]
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub staff: StaffProfile,
}

/// Answer to a token check: the token is valid and belongs to `staff`.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct VerifyResponse {
    #[schema(example = true)]
    pub valid: bool,
    pub staff: StaffProfile,
}

/// JWT payload. The only identity the attendance core ever sees.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub staff_id: String,
    pub name: String,
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
}
