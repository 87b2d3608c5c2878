//! Process configuration from environment variables (optionally via `.env`).

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use chrono::Duration;
use thiserror::Error;

use vaxbook_observability::LogFormat;

const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

/// Administrator created at startup when both variables are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub environment: Environment,
    pub jwt_secret: String,
    pub jwt_ttl: Duration,
    pub cookie_ttl: Duration,
    pub log_format: LogFormat,
    pub admin_seed: Option<AdminSeed>,
    /// JSON list of vaccination centers loaded at startup; the bundled list
    /// is used when unset.
    pub vac_centers_file: Option<PathBuf>,
}

impl ApiConfig {
    /// Read from the process environment. Call `dotenvy::dotenv()` first to
    /// honour a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let environment = match get("APP_ENV").as_deref() {
            None | Some("development") => Environment::Development,
            Some("production") => Environment::Production,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "APP_ENV",
                    value: other.to_string(),
                });
            }
        };

        let ip: IpAddr = parse_or(get("BIND_ADDR"), "BIND_ADDR", IpAddr::from([0, 0, 0, 0]))?;
        let port: u16 = parse_or(get("PORT"), "PORT", 5000)?;

        let jwt_secret = match (get("JWT_SECRET"), environment) {
            (Some(secret), _) => secret,
            (None, Environment::Production) => return Err(ConfigError::Missing("JWT_SECRET")),
            (None, Environment::Development) => DEV_JWT_SECRET.to_string(),
        };

        let jwt_days: i64 = parse_or(get("JWT_EXPIRE_DAYS"), "JWT_EXPIRE_DAYS", 30)?;
        let cookie_days: i64 = parse_or(get("JWT_COOKIE_EXPIRE_DAYS"), "JWT_COOKIE_EXPIRE_DAYS", 30)?;
        if jwt_days <= 0 {
            return Err(ConfigError::Invalid {
                key: "JWT_EXPIRE_DAYS",
                value: jwt_days.to_string(),
            });
        }

        let log_format = match get("LOG_FORMAT") {
            None => LogFormat::default(),
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid {
                key: "LOG_FORMAT",
                value: v,
            })?,
        };

        let admin_seed = match (get("ADMIN_EMAIL"), get("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminSeed { email, password }),
            _ => None,
        };

        Ok(Self {
            bind_addr: SocketAddr::new(ip, port),
            environment,
            jwt_secret,
            jwt_ttl: Duration::days(jwt_days),
            cookie_ttl: Duration::days(cookie_days.max(0)),
            log_format,
            admin_seed,
            vac_centers_file: get("VAC_CENTERS_FILE").map(PathBuf::from),
        })
    }

    /// Deterministic configuration for tests.
    pub fn for_tests(jwt_secret: &str) -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            environment: Environment::Development,
            jwt_secret: jwt_secret.to_string(),
            jwt_ttl: Duration::minutes(30),
            cookie_ttl: Duration::minutes(30),
            log_format: LogFormat::Json,
            admin_seed: None,
            vac_centers_file: None,
        }
    }

    pub fn secure_cookies(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn uses_insecure_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

fn parse_or<T: core::str::FromStr>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(v) => v.parse().map_err(|_| ConfigError::Invalid { key, value: v }),
    }
}
