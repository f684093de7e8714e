use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    Doctor,
    Nurse,
    Staff,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn parses_lowercase_names() {
        assert_eq!(Role::from_str("nurse").unwrap(), Role::Nurse);
        assert_eq!(Role::Admin.to_string(), "admin");
        assert!(Role::from_str("janitor").is_err());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Doctor).unwrap(), "\"doctor\"");
    }
}
