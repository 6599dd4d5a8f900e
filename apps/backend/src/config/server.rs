//! Process-level configuration read from the environment.
//!
//! Variables:
//! - `BACKEND_HOST` (default `0.0.0.0`)
//! - `BACKEND_PORT` (default `3001`)
//! - `BACKEND_JWT_SECRET` (required)
//! - `BACKEND_TOKEN_TTL_SECS` (default 12 hours)
//! - `QUESTION_SWEEP_INTERVAL_MS` (default 1000)

use std::env;
use std::time::Duration;

use crate::error::AppError;
use crate::state::security_config::{SecurityConfig, DEFAULT_TOKEN_TTL};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub security: SecurityConfig,
    /// How often overdue questions are expired in the background.
    pub sweep_interval: Duration,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let host = env::var("BACKEND_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = parse_var("BACKEND_PORT", DEFAULT_PORT)?;

        let secret = env::var("BACKEND_JWT_SECRET")?;
        if secret.trim().is_empty() {
            return Err(AppError::config("BACKEND_JWT_SECRET must not be empty"));
        }
        let ttl_secs = parse_var("BACKEND_TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL.as_secs())?;
        if ttl_secs == 0 {
            return Err(AppError::config("BACKEND_TOKEN_TTL_SECS must be positive"));
        }
        let sweep_ms = parse_var(
            "QUESTION_SWEEP_INTERVAL_MS",
            DEFAULT_SWEEP_INTERVAL.as_millis() as u64,
        )?;
        if sweep_ms == 0 {
            return Err(AppError::config("QUESTION_SWEEP_INTERVAL_MS must be positive"));
        }

        Ok(Self {
            host,
            port,
            security: SecurityConfig::new(secret.into_bytes())
                .with_token_ttl(Duration::from_secs(ttl_secs)),
            sweep_interval: Duration::from_millis(sweep_ms),
        })
    }
}

/// Parse `name` if set, else fall back to `default`.
pub(crate) fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::config(format!("{name} is not a valid value: {raw:?}"))),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(e) => Err(e.into()),
    }
}
