use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Error};
use uuid::Uuid;

use crate::{model::staff::StaffMember, models::Claims};

fn now() -> usize {
    Utc::now().timestamp().max(0) as usize
}

pub fn generate_token(staff: &StaffMember, secret: &str, ttl: usize) -> Result<String, Error> {
    let iat = now();
    let claims = Claims {
        staff_id: staff.staff_id.clone(),
        name: staff.name.clone(),
        role: staff.role,
        iat,
        exp: iat.saturating_add(ttl),
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}
