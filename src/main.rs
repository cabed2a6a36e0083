use actix_web::middleware::{Logger, NormalizePath};
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;
use dotenvy::dotenv;
use std::sync::Arc;

mod api;
mod auth;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod models;
mod repository;
mod routes;

use config::Config;
use db::init_db;

use crate::api::user::ensure_admin_seed;
use crate::docs::ApiDoc;
use crate::repository::{
    EmployeeRepository, UserRepository,
    mysql::{MySqlEmployeeRepository, MySqlUserRepository},
};
use crate::routes::RateLimits;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "roster.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(addr = %config.server_addr, "Server starting...");

    let pool = init_db(&config).await?;

    let employees: Arc<dyn EmployeeRepository> =
        Arc::new(MySqlEmployeeRepository::new(pool.clone()));
    let users: Arc<dyn UserRepository> = Arc::new(MySqlUserRepository::new(pool));

    if config.seed_admin.on_startup {
        ensure_admin_seed(users.as_ref(), &config.seed_admin)
            .await
            .map_err(|e| anyhow::anyhow!("{e}"))
            .context("Failed to seed admin account")?;
    }

    let limits = RateLimits::from_config(&config);
    let server_addr = config.server_addr.clone();

    let employees = Data::from(employees);
    let users = Data::from(users);
    let config = Data::new(config);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // wildcard so JS/CSS assets match
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(employees.clone())
            .app_data(users.clone())
            .app_data(config.clone())
            .configure(|cfg| routes::configure(cfg, &config, &limits))
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {server_addr}"))?
    .run()
    .await?;

    Ok(())
}
