use crate::{
    api::{employee, user},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
    error::ApiError,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{HttpRequest, HttpResponse, Responder, get, middleware::from_fn, web};
use serde_json::json;
use std::sync::Arc;

pub type Limiter = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Built once and shared by every worker so the buckets are process wide.
#[derive(Clone)]
pub struct RateLimits {
    pub login: Arc<Limiter>,
    pub protected: Arc<Limiter>,
}

impl RateLimits {
    pub fn from_config(config: &Config) -> Self {
        Self {
            login: Arc::new(build_limiter(config.rate_login_per_min)),
            protected: Arc::new(build_limiter(config.rate_protected_per_min)),
        }
    }
}

fn build_limiter(requests_per_min: u32) -> Limiter {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);
    GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("period and burst are clamped to at least one")
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

fn json_error(err: actix_web::error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest(format!("Invalid JSON body: {err}")).into()
}

fn path_error(err: actix_web::error::PathError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest(format!("Invalid path parameter: {err}")).into()
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limits: &RateLimits) {
    let prefix = config.api_prefix.trim_end_matches('/');

    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .service(health);

    // Public route. Registered before the /auth scope so it wins the match.
    cfg.service(
        web::resource(format!("{prefix}/auth/login"))
            .wrap(Governor::new(&*limits.login))
            .route(web::post().to(handlers::login)),
    );

    // Protected routes
    cfg.service(
        web::scope(&format!("{prefix}/auth"))
            .wrap(from_fn(auth_middleware))
            .wrap(Governor::new(&*limits.protected))
            .route("/me", web::get().to(handlers::me)),
    )
    .service(
        web::scope(&format!("{prefix}/employees"))
            .wrap(from_fn(auth_middleware))
            .wrap(Governor::new(&*limits.protected))
            // /employees
            .service(
                web::resource("")
                    .route(web::post().to(employee::create_employee))
                    .route(web::get().to(employee::list_employees)),
            )
            // /employees/{id}
            .service(
                web::resource("/{id}")
                    .route(web::get().to(employee::get_employee))
                    .route(web::patch().to(employee::update_employee))
                    .route(web::delete().to(employee::delete_employee)),
            ),
    )
    .service(
        web::scope(&format!("{prefix}/users"))
            .wrap(from_fn(auth_middleware))
            .wrap(Governor::new(&*limits.protected))
            // /users
            .service(
                web::resource("")
                    .route(web::get().to(user::list_users))
                    .route(web::post().to(user::create_user)),
            )
            // /users/seed-admin
            .service(web::resource("/seed-admin").route(web::post().to(user::seed_admin))),
    );
}

// LOGIN
//  └─ access_token (ACCESS_TOKEN_TTL, default 1 day)

// API REQUEST
//  └─ Authorization: Bearer access_token

// ACCESS EXPIRED
//  └─ POST /auth/login again
