use crate::{
    auth::{auth::AuthUser, password::hash_password},
    config::{Config, SeedAdmin},
    error::{ApiError, ApiResult},
    model::{
        role::Role,
        user::{CreateUser, NewUser, User, UserResponse},
    },
    repository::{StoreError, UserRepository},
};
use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::{error, info};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Serialize, ToSchema)]
pub struct SeedAdminResponse {
    #[schema(example = "Admin account ensured")]
    pub message: String,
    pub admin: SeededAdmin,
}

#[derive(Serialize, ToSchema)]
pub struct SeededAdmin {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "admin@sistema.com")]
    pub email: String,
    pub role: Role,
}

async fn hash_off_thread(password: String) -> ApiResult<String> {
    web::block(move || hash_password(&password))
        .await?
        .map_err(|e| {
            error!(error = %e, "Password hashing failed");
            ApiError::Internal
        })
}

/// Returns the configured admin account, creating it first if it does not exist.
pub async fn ensure_admin_seed(
    users: &dyn UserRepository,
    seed: &SeedAdmin,
) -> ApiResult<User> {
    if let Some(existing) = users.find_by_email(&seed.email).await? {
        return Ok(existing);
    }

    let new = NewUser {
        name: seed.name.clone(),
        email: seed.email.clone(),
        password_hash: hash_off_thread(seed.password.clone()).await?,
        role: Role::Admin,
    };

    match users.create(new).await {
        Ok(admin) => {
            info!(user_id = admin.id, email = %admin.email, "Admin account seeded");
            Ok(admin)
        }
        // Lost a race against a concurrent seed; the winner's row is the admin.
        Err(StoreError::Duplicate) => users
            .find_by_email(&seed.email)
            .await?
            .ok_or(ApiError::Internal),
        Err(e) => Err(e.into()),
    }
}

/// Seed the default admin account (idempotent)
#[utoipa::path(
    post,
    path = "/users/seed-admin",
    responses(
        (status = 200, description = "Admin account exists", body = SeedAdminResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only")
    ),
    tag = "User",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn seed_admin(
    auth: AuthUser,
    users: web::Data<dyn UserRepository>,
    config: web::Data<Config>,
) -> ApiResult<HttpResponse> {
    auth.require_admin()?;

    let admin = ensure_admin_seed(users.get_ref(), &config.seed_admin).await?;

    Ok(HttpResponse::Ok().json(SeedAdminResponse {
        message: "Admin account ensured".into(),
        admin: SeededAdmin {
            id: admin.id,
            email: admin.email,
            role: admin.role,
        },
    }))
}

/// List Users, newest first
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "All accounts without password hashes", body = [UserResponse]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only")
    ),
    tag = "User",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_users(
    auth: AuthUser,
    users: web::Data<dyn UserRepository>,
) -> ApiResult<HttpResponse> {
    auth.require_admin()?;

    let users: Vec<UserResponse> = users
        .list()
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(users))
}

/// Create User
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Email already registered", body = Object, example = json!({
            "statusCode": 409,
            "message": "Email already registered",
            "error": "Conflict"
        }))
    ),
    tag = "User",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_user(
    auth: AuthUser,
    users: web::Data<dyn UserRepository>,
    payload: web::Json<CreateUser>,
) -> ApiResult<HttpResponse> {
    auth.require_admin()?;

    let payload = payload.into_inner();
    payload.validate()?;

    let email = payload.email.trim().to_string();

    // Checked up front so a taken email never costs a hash; the unique
    // index still catches concurrent inserts.
    if users.find_by_email(&email).await?.is_some() {
        return Err(StoreError::Duplicate.into());
    }

    let new = NewUser {
        name: payload.name.trim().to_string(),
        email,
        password_hash: hash_off_thread(payload.password).await?,
        role: payload.role,
    };

    let user = users.create(new).await?;
    info!(user_id = user.id, role = %user.role, by = auth.user_id, "User created");

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}
