use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;
use logicton_core::rate_limit::{RateLimitPolicy, DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW, MAX_WINDOW};
use logicton_notify::delivery::{EmailConfig, EmailError};
use logicton_notify::DEFAULT_NOTIFY_TIMEOUT;

use crate::auth::jwt::{JwtConfig, DEFAULT_ACCESS_EXPIRY_MINS};

/// Default upload size cap (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },

    #[error(transparent)]
    Email(#[from] EmailError),
}

/// Where contact-form rate-limit windows live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitBackend {
    /// Process memory; only correct for a single instance.
    Memory,
    /// `rate_limit_windows` table, shared by every instance.
    Postgres,
}

/// The single administrator account.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub username: String,
    /// Argon2id PHC string.
    pub password_hash: String,
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<HeaderValue>,
    pub request_timeout_secs: u64,
    /// Deadline for each notification channel; always below the request timeout.
    pub notify_timeout: Duration,
    pub jwt: JwtConfig,
    pub admin: AdminCredentials,
    /// Root of the JSON content files (portfolio, company, site config).
    pub content_dir: PathBuf,
    /// Public web root; uploads land in `<public_dir>/images`.
    pub public_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub rate_limit_backend: RateLimitBackend,
    pub rate_limit: RateLimitPolicy,
    /// `None` disables email notifications.
    pub email: Option<EmailConfig>,
    /// `None` disables chat notifications.
    pub chat_webhook_url: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                  |
    /// |---------------------------|--------------------------|
    /// | `HOST`                    | `0.0.0.0`                |
    /// | `PORT`                    | `3000`                   |
    /// | `CORS_ORIGINS`            | `http://localhost:3000`  |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                     |
    /// | `NOTIFY_TIMEOUT_SECS`     | `10` (< request timeout) |
    /// | `JWT_SECRET`              | **required**             |
    /// | `JWT_ACCESS_EXPIRY_MINS`  | `480`                    |
    /// | `ADMIN_USERNAME`          | **required**             |
    /// | `ADMIN_PASSWORD_HASH`     | **required**             |
    /// | `CONTENT_DIR`             | `./content`              |
    /// | `PUBLIC_DIR`              | `./public`               |
    /// | `MAX_UPLOAD_BYTES`        | `10485760`               |
    /// | `RATE_LIMIT_BACKEND`      | `memory` (or `postgres`) |
    /// | `RATE_LIMIT_WINDOW_SECS`  | `900` (1 s to 366 days)  |
    /// | `RATE_LIMIT_MAX_REQUESTS` | `5` (at least 1)         |
    /// | `SMTP_*`, `CONTACT_EMAIL_TO` | see [`EmailConfig`]   |
    /// | `CHAT_WEBHOOK_URL`        | unset (chat disabled)    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads from `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| var(name).ok_or(ConfigError::Missing(name));

        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".into())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|_| ConfigError::Invalid {
                    name: "CORS_ORIGINS",
                    value: origin.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let rate_limit_backend = match var("RATE_LIMIT_BACKEND").as_deref() {
            None | Some("memory") => RateLimitBackend::Memory,
            Some("postgres") => RateLimitBackend::Postgres,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "RATE_LIMIT_BACKEND",
                    value: other.to_string(),
                })
            }
        };

        let max_requests: u32 = parse_or(&var, "RATE_LIMIT_MAX_REQUESTS", DEFAULT_MAX_REQUESTS)?;
        if max_requests == 0 {
            return Err(invalid(&var, "RATE_LIMIT_MAX_REQUESTS"));
        }
        let window = Duration::from_secs(parse_or(
            &var,
            "RATE_LIMIT_WINDOW_SECS",
            DEFAULT_WINDOW.as_secs(),
        )?);
        if window.is_zero() || window > MAX_WINDOW {
            return Err(invalid(&var, "RATE_LIMIT_WINDOW_SECS"));
        }
        let rate_limit = RateLimitPolicy {
            max_requests,
            window,
        };

        let request_timeout_secs: u64 = parse_or(&var, "REQUEST_TIMEOUT_SECS", 30)?;
        let notify_timeout_secs: u64 = parse_or(
            &var,
            "NOTIFY_TIMEOUT_SECS",
            DEFAULT_NOTIFY_TIMEOUT.as_secs().min(request_timeout_secs.saturating_sub(1)),
        )?;
        if notify_timeout_secs == 0 || notify_timeout_secs >= request_timeout_secs {
            return Err(invalid(&var, "NOTIFY_TIMEOUT_SECS"));
        }

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&var, "PORT", 3000)?,
            cors_origins,
            request_timeout_secs,
            notify_timeout: Duration::from_secs(notify_timeout_secs),
            jwt: JwtConfig {
                secret: required("JWT_SECRET")?,
                access_token_expiry_mins: parse_or(
                    &var,
                    "JWT_ACCESS_EXPIRY_MINS",
                    DEFAULT_ACCESS_EXPIRY_MINS,
                )?,
            },
            admin: AdminCredentials {
                username: required("ADMIN_USERNAME")?,
                password_hash: required("ADMIN_PASSWORD_HASH")?,
            },
            content_dir: var("CONTENT_DIR")
                .unwrap_or_else(|| "./content".into())
                .into(),
            public_dir: var("PUBLIC_DIR").unwrap_or_else(|| "./public".into()).into(),
            max_upload_bytes: parse_or(&var, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            rate_limit_backend,
            rate_limit,
            email: EmailConfig::from_lookup(&lookup)?,
            chat_webhook_url: var("CHAT_WEBHOOK_URL"),
        })
    }
}

fn parse_or<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match var(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { name, value: raw }),
    }
}

fn invalid(var: &impl Fn(&str) -> Option<String>, name: &'static str) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: var(name).unwrap_or_default(),
    }
}
