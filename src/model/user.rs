use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use validator::Validate;

use super::role::Role;

/// A system account as stored. Never serialized directly, see [`UserResponse`].
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Raw `users` row, the role column is plain text.
#[derive(sqlx::FromRow)]
pub struct UserRow {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = strum::ParseError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password,
            role: Role::from_str(&row.role)?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 2, message = "name must have at least 2 characters"))]
    #[schema(example = "Joana")]
    pub name: String,

    #[validate(email(message = "email must be a valid address"))]
    #[schema(example = "joana@company.com", format = "email", value_type = String)]
    pub email: String,

    #[validate(length(min = 6, message = "password must have at least 6 characters"))]
    #[schema(example = "s3cret!", format = "password", value_type = String)]
    pub password: String,

    pub role: Role,
}

/// What gets written once the password is hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Joana")]
    pub name: String,
    #[schema(example = "joana@company.com")]
    pub email: String,
    pub role: Role,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_drops_the_password_hash() {
        let user = User {
            id: 3,
            name: "Joana".into(),
            email: "joana@company.com".into(),
            password_hash: "$argon2id$v=19$...".into(),
            role: Role::Viewer,
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(UserResponse::from(user)).unwrap();

        assert_eq!(value["role"], "VIEWER");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("password").is_none());
        assert!(value.get("passwordHash").is_none());
    }

    #[test]
    fn row_with_unknown_role_does_not_convert() {
        let row = UserRow {
            id: 1,
            name: "x".into(),
            email: "x@y.z".into(),
            password: "h".into(),
            role: "ROOT".into(),
            created_at: Utc::now(),
        };
        assert!(User::try_from(row).is_err());
    }
}
