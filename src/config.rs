// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Basislager Contributors

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Root directory for persistent data | `./data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `AUTH_TOKEN_SECRET` | HMAC secret for signing identity tokens | **Required** — startup fails without it |
//! | `AUTH_TOKEN_TTL_SECS` | Token lifetime in seconds | Unset = tokens never expire |
//! | `VAPID_PUBLIC_KEY` | Public VAPID key handed to push clients | Unset = push endpoints report unconfigured |
//! | `SEED_REGISTRATION_PASSWORD` | First-run only: create the event record with this registration password | Unset = no seeding |
//! | `SEED_EVENT_TITLE` | Title for the seeded event record | `LAN Party` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::path::PathBuf;

/// Environment variable name for the data directory path.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the token signing secret.
pub const AUTH_TOKEN_SECRET_ENV: &str = "AUTH_TOKEN_SECRET";

/// Environment variable name for the optional token lifetime.
pub const AUTH_TOKEN_TTL_ENV: &str = "AUTH_TOKEN_TTL_SECS";

/// Environment variable name for the VAPID public key.
pub const VAPID_PUBLIC_KEY_ENV: &str = "VAPID_PUBLIC_KEY";

/// Configuration errors that abort startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{AUTH_TOKEN_SECRET_ENV} is not set; refusing to start without a signing secret")]
    MissingTokenSecret,
    #[error("{AUTH_TOKEN_TTL_ENV} is not a positive number of seconds: {0}")]
    InvalidTokenTtl(String),
    #[error("PORT is not a valid port number: {0}")]
    InvalidPort(String),
}

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Root of the data directory.
    pub data_dir: PathBuf,
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Token signing secret. Required; there is deliberately no
    /// development fallback.
    pub token_secret: String,
    /// Optional token lifetime in seconds. `None` means non-expiring.
    pub token_ttl_secs: Option<i64>,
    /// Public VAPID key served to push notification clients, if configured.
    pub vapid_public_key: Option<String>,
}

impl AppConfig {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let token_secret = match env::var(AUTH_TOKEN_SECRET_ENV) {
            Ok(secret) if !secret.is_empty() => secret,
            _ => return Err(ConfigError::MissingTokenSecret),
        };

        let token_ttl_secs = match env::var(AUTH_TOKEN_TTL_ENV) {
            Ok(raw) => match raw.parse::<i64>() {
                Ok(secs) if secs > 0 => Some(secs),
                _ => return Err(ConfigError::InvalidTokenTtl(raw)),
            },
            Err(_) => None,
        };

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => 8080,
        };

        Ok(Self {
            data_dir: env::var(DATA_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(crate::storage::paths::DATA_ROOT)),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            token_secret,
            token_ttl_secs,
            vapid_public_key: env::var(VAPID_PUBLIC_KEY_ENV).ok().filter(|k| !k.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment-variable tests mutate process state, so everything runs
    // in one test to avoid interference between parallel tests.
    #[test]
    fn from_env_requires_secret_and_parses_options() {
        env::remove_var(AUTH_TOKEN_SECRET_ENV);
        env::remove_var(AUTH_TOKEN_TTL_ENV);
        env::remove_var("PORT");
        assert!(matches!(
            AppConfig::from_env(),
            Err(ConfigError::MissingTokenSecret)
        ));

        env::set_var(AUTH_TOKEN_SECRET_ENV, "s3cret");
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.token_ttl_secs, None);
        assert_eq!(config.vapid_public_key, None);

        env::set_var(AUTH_TOKEN_TTL_ENV, "3600");
        env::set_var("PORT", "9000");
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.token_ttl_secs, Some(3600));
        assert_eq!(config.port, 9000);

        env::set_var(AUTH_TOKEN_TTL_ENV, "-5");
        assert!(matches!(
            AppConfig::from_env(),
            Err(ConfigError::InvalidTokenTtl(_))
        ));

        env::remove_var(AUTH_TOKEN_SECRET_ENV);
        env::remove_var(AUTH_TOKEN_TTL_ENV);
        env::remove_var("PORT");
    }
}
