use anyhow::{Context, bail};
use std::env;
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct SeedAdmin {
    pub name: String,
    pub email: String,
    pub password: String,
    pub on_startup: bool,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub access_token_ttl: usize,
    pub db_max_connections: u32,
    pub run_migrations: bool,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    pub log_dir: String,
    pub log_level: tracing::Level,

    pub seed_admin: SeedAdmin,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> anyhow::Result<String> {
            lookup(key).with_context(|| format!("{key} must be set"))
        };

        let config = Self {
            server_addr: lookup("SERVER_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            access_token_ttl: parse_or(&lookup, "ACCESS_TOKEN_TTL", 86_400)?, // default 1 day
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            run_migrations: parse_or(&lookup, "RUN_MIGRATIONS", true)?,

            rate_login_per_min: parse_or(&lookup, "RATE_LOGIN_PER_MIN", 60)?,
            rate_protected_per_min: parse_or(&lookup, "RATE_PROTECTED_PER_MIN", 1000)?,

            api_prefix: lookup("API_PREFIX").unwrap_or_default(),

            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
            log_level: parse_or(&lookup, "LOG_LEVEL", tracing::Level::INFO)?,

            seed_admin: SeedAdmin {
                name: lookup("SEED_ADMIN_NAME").unwrap_or_else(|| "Admin".to_string()),
                email: lookup("SEED_ADMIN_EMAIL")
                    .unwrap_or_else(|| "admin@sistema.com".to_string()),
                password: lookup("SEED_ADMIN_PASSWORD").unwrap_or_else(|| "admin123".to_string()),
                on_startup: parse_or(&lookup, "SEED_ADMIN_ON_STARTUP", false)?,
            },
        };

        if config.jwt_secret.is_empty() {
            bail!("JWT_SECRET must not be empty");
        }
        if config.rate_login_per_min == 0 || config.rate_protected_per_min == 0 {
            bail!("rate limits must be greater than zero");
        }

        Ok(config)
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid value for {key} ({raw:?}): {e}")),
        None => Ok(default),
    }
}
