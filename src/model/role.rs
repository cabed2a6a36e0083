use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Access level of a system account. Stored and transmitted as `ADMIN` / `VIEWER`.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Viewer,
}

impl Role {
    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn string_form_is_upper_case() {
        assert_eq!(Role::Admin.to_string(), "ADMIN");
        assert_eq!(Role::from_str("VIEWER").unwrap(), Role::Viewer);
        assert_eq!(serde_json::to_value(Role::Viewer).unwrap(), "VIEWER");
    }

    #[test]
    fn unknown_roles_are_rejected() {
        assert!(Role::from_str("HR").is_err());
        assert!(serde_json::from_str::<Role>("\"admin\"").is_err());
    }
}
