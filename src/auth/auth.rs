use crate::auth::jwt::verify_token;
use crate::config::Config;
use crate::error::ApiError;
use crate::model::role::Role;
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, http::header, web::Data};
use futures::future::{Ready, ready};
use serde::Serialize;
use tracing::debug;
use utoipa::ToSchema;

/// The caller behind a valid bearer token.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthUser {
    pub user_id: u64,
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// Resolves the `Authorization: Bearer <jwt>` header into an [`AuthUser`].
pub fn authenticate(req: &HttpRequest, config: &Config) -> Result<AuthUser, ApiError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".into()))?
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header encoding".into()))?;

    let token = header_value
        .strip_prefix("Bearer ")
        .ok_or_else(|| {
            ApiError::Unauthorized("Authorization header must start with Bearer".into())
        })?
        .trim();

    let claims = verify_token(token, &config.jwt_secret).map_err(|e| {
        debug!(error = %e, "Rejected bearer token");
        ApiError::Unauthorized("Invalid or expired token".into())
    })?;

    Ok(AuthUser {
        user_id: claims.user_id,
        email: claims.sub,
        name: claims.name,
        role: claims.role,
    })
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // Already resolved by auth_middleware on protected scopes.
        if let Some(user) = req.extensions().get::<AuthUser>() {
            return ready(Ok(user.clone()));
        }

        let config = match req.app_data::<Data<Config>>() {
            Some(c) => c,
            None => {
                tracing::error!("Config missing from app data");
                return ready(Err(ApiError::Internal));
            }
        };

        ready(authenticate(req, config))
    }
}

impl AuthUser {
    /// Role guard: the caller must hold one of `allowed`.
    pub fn require_any(&self, allowed: &[Role]) -> Result<(), ApiError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            debug!(user_id = self.user_id, role = %self.role, "Role not permitted");
            Err(ApiError::Forbidden("Insufficient role for this operation".into()))
        }
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        self.require_any(&[Role::Admin])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::generate_access_token;
    use crate::model::user::User;
    use actix_web::test::TestRequest;
    use chrono::Utc;

    fn config() -> Config {
        Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some("mysql://localhost/test".into()),
            "JWT_SECRET" => Some("test-secret".into()),
            _ => None,
        })
        .unwrap()
    }

    fn token_for(role: Role) -> String {
        let user = User {
            id: 9,
            name: "Tester".into(),
            email: "tester@company.com".into(),
            password_hash: String::new(),
            role,
            created_at: Utc::now(),
        };
        generate_access_token(&user, "test-secret", 600).unwrap()
    }

    #[test]
    fn valid_bearer_resolves_to_user() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token_for(Role::Viewer))))
            .to_http_request();

        let user = authenticate(&req, &config()).unwrap();
        assert_eq!(user.user_id, 9);
        assert_eq!(user.role, Role::Viewer);
    }

    #[test]
    fn missing_or_malformed_header_is_unauthorized() {
        let bare = TestRequest::default().to_http_request();
        assert!(matches!(
            authenticate(&bare, &config()),
            Err(ApiError::Unauthorized(_))
        ));

        let basic = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic abc"))
            .to_http_request();
        assert!(matches!(
            authenticate(&basic, &config()),
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[actix_web::test]
    async fn extractor_prefers_the_user_resolved_by_middleware() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(AuthUser {
            user_id: 5,
            email: "admin@company.com".into(),
            name: "Admin".into(),
            role: Role::Admin,
        });

        let user = AuthUser::extract(&req).await.unwrap();
        assert_eq!(user.user_id, 5);
        assert_eq!(user.role, Role::Admin);
    }

    #[test]
    fn role_guard_checks_membership() {
        let viewer = AuthUser {
            user_id: 1,
            email: "v@x.io".into(),
            name: "V".into(),
            role: Role::Viewer,
        };

        assert!(viewer.require_any(&[Role::Admin, Role::Viewer]).is_ok());
        assert!(matches!(viewer.require_admin(), Err(ApiError::Forbidden(_))));
    }
}
