use crate::{
    auth::{auth::AuthUser, jwt::generate_access_token, password::verify_password},
    config::Config,
    error::{ApiError, ApiResult},
    model::user::UserResponse,
    models::{LoginReqDto, LoginResponse, SessionUser},
    repository::UserRepository,
};
use actix_web::{HttpResponse, web};
use tracing::{debug, error, info, instrument};

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid credentials".into())
}

/// Login
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Email or password missing"),
        (status = 401, description = "Invalid credentials", body = Object, example = json!({
            "statusCode": 401,
            "message": "Invalid credentials",
            "error": "Unauthorized"
        })),
        (status = 429, description = "Too many login attempts")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(users, config, payload),
    fields(email = %payload.email)
)]
pub async fn login(
    payload: web::Json<LoginReqDto>,
    users: web::Data<dyn UserRepository>,
    config: web::Data<Config>,
) -> ApiResult<HttpResponse> {
    info!("Login request received");

    let LoginReqDto { email, password } = payload.into_inner();
    let email = email.trim().to_string();

    if email.is_empty() || password.is_empty() {
        info!("Validation failed: empty email or password");
        return Err(ApiError::BadRequest("Email and password are required".into()));
    }

    let user = match users.find_by_email(&email).await? {
        Some(user) => {
            debug!(user_id = user.id, "User found");
            user
        }
        None => {
            info!("Invalid credentials: user not found");
            return Err(invalid_credentials());
        }
    };

    let hashed = user.password_hash.clone();
    if let Err(e) = web::block(move || verify_password(&password, &hashed)).await? {
        info!(error = %e, "Invalid credentials: password mismatch");
        return Err(invalid_credentials());
    }

    let access_token = generate_access_token(&user, &config.jwt_secret, config.access_token_ttl)
        .map_err(|e| {
            error!(error = %e, "Failed to sign access token");
            ApiError::Internal
        })?;

    info!(user_id = user.id, role = %user.role, "Login successful");

    Ok(HttpResponse::Ok().json(LoginResponse {
        access_token,
        user: SessionUser::from(&user),
    }))
}

/// Current account
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "The authenticated account", body = UserResponse),
        (status = 401, description = "Missing, invalid or stale token")
    ),
    tag = "Auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn me(
    auth: AuthUser,
    users: web::Data<dyn UserRepository>,
) -> ApiResult<HttpResponse> {
    // A token can outlive its account.
    let user = users
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Account no longer exists".into()))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
