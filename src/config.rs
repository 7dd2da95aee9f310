use std::{env, fmt::Display, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_SYMBOLS_API_URL: &str = "https://www.opensymbols.org/api/v2/symbols";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

const INSECURE_JWT_SECRET: &str = "your_jwt_secret";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Backend settings. Every value has a fallback so a bare checkout runs,
/// but the fallbacks for secrets are not fit for deployment.
#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub symbols_access_key: String,
    pub symbols_api_url: String,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let jwt_secret = load_or(&lookup, "JWT_SECRET", INSECURE_JWT_SECRET);
        if jwt_secret == INSECURE_JWT_SECRET {
            warn!("JWT_SECRET is the built-in default; tokens can be forged");
        }

        Ok(Self {
            port: parse_or(&lookup, "PORT", 5000)?,
            database_url: load_or(&lookup, "DATABASE_URL", "sqlite://glpaac.db?mode=rwc"),
            jwt_secret,
            symbols_access_key: load_or(&lookup, "OPENSYMBOLS_ACCESS_KEY", ""),
            symbols_api_url: load_or(&lookup, "OPENSYMBOLS_API_URL", DEFAULT_SYMBOLS_API_URL),
        })
    }
}

/// Front-end settings.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: String,
}

impl ClientConfig {
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_base_url: load_or(&lookup, "GLPAAC_API_URL", DEFAULT_API_BASE_URL),
        }
    }
}

fn load_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default");
        default.to_string()
    })
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
