use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::{role::Role, user::User};

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "admin@sistema.com")]
    pub email: String,
    #[schema(example = "admin123", format = "password", value_type = String)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: SessionUser,
}

/// The part of the account the dashboard keeps next to the token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionUser {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "admin@sistema.com")]
    pub email: String,
    #[schema(example = "Admin")]
    pub name: String,
    pub role: Role,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    /// Account email
    pub sub: String,
    pub name: String,
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
}
