use std::fmt::Display;
use std::str::FromStr;

use hyperion_core::competition::DEFAULT_FFSU_URL;

use crate::auth::jwt::JwtConfig;

/// Runtime settings of the Hyperion API, read once at startup.
///
/// | Env var                 | Default                     |
/// |-------------------------|-----------------------------|
/// | `HOST`                  | `0.0.0.0`                   |
/// | `PORT`                  | `8000`                      |
/// | `CORS_ORIGINS`          | `http://localhost:3000`     |
/// | `REQUEST_TIMEOUT_SECS`  | `30`                        |
/// | `SHUTDOWN_TIMEOUT_SECS` | `30`                        |
/// | `BASE_URL`              | `http://localhost:3000`     |
/// | `FFSU_URL`              | the public FFSU register    |
///
/// JWT settings are documented on [`JwtConfig::from_env`]; SMTP settings
/// live with the mailer in `hyperion-events`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Front-end origins allowed by CORS (comma-separated `CORS_ORIGINS`).
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    pub shutdown_timeout_secs: u64,
    /// Public URL of the client, embedded in activation and reset emails.
    pub base_url: String,
    /// FFSU licence register endpoint.
    pub ffsu_url: String,
    pub jwt: JwtConfig,
}

/// Read `name`, falling back to `default` when unset.
pub(crate) fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Read and parse `name`, falling back to `default` when unset.
///
/// # Panics
///
/// Panics when the variable is set but does not parse.
pub(crate) fn env_parse<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{name} is invalid ('{raw}'): {e}")),
        Err(_) => default,
    }
}

impl ServerConfig {
    /// Load the configuration from the environment.
    ///
    /// # Panics
    ///
    /// Panics on malformed values and when `JWT_SECRET` is missing.
    pub fn from_env() -> Self {
        let cors_origins = env_or("CORS_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_parse("PORT", 8000),
            cors_origins,
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_parse("SHUTDOWN_TIMEOUT_SECS", 30),
            base_url: env_or("BASE_URL", "http://localhost:3000")
                .trim_end_matches('/')
                .to_string(),
            ffsu_url: env_or("FFSU_URL", DEFAULT_FFSU_URL),
            jwt: JwtConfig::from_env(),
        }
    }
}
