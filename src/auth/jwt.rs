use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Error};
use uuid::Uuid;

use crate::{model::user::User, models::Claims};

fn now() -> usize {
    Utc::now().timestamp().max(0) as usize
}

pub fn generate_access_token(user: &User, secret: &str, ttl: usize) -> Result<String, Error> {
    issue(user, secret, now(), ttl)
}

fn issue(user: &User, secret: &str, issued_at: usize, ttl: usize) -> Result<String, Error> {
    let claims = Claims {
        user_id: user.id,
        sub: user.email.clone(),
        name: user.name.clone(),
        role: user.role,
        iat: issued_at,
        exp: issued_at.saturating_add(ttl),
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
