//! # Configuration
//!
//! Settings come from environment variables. A missing variable falls back to its
//! default; a malformed one is a [`ConfigError`].
//!
//! | Variable | Default |
//! |---|---|
//! | `STOREFRONT_API_URL` | unset (in-memory stores) |
//! | `STOREFRONT_API_TOKEN` | unset |
//! | `STOREFRONT_TIMEOUT_SECS` | `15` |
//! | `STOREFRONT_PAGE_SIZE` | `10` |
//! | `STOREFRONT_LIKES_PATH` | unset (in-memory liked set) |
//! | `STOREFRONT_STATUS_POLICY` | `permissive` |

use crate::admin::TransitionPolicy;
use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// API used by [`HttpOrderBackend::from_config`](crate::backend::HttpOrderBackend::from_config)
/// when no URL is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct StorefrontConfig {
    /// REST API to talk to. Unset selects the in-memory stores.
    pub api_url: Option<String>,
    pub api_token: Option<String>,
    pub request_timeout: Duration,
    pub page_size: u32,
    pub likes_path: Option<PathBuf>,
    pub status_policy: TransitionPolicy,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            api_token: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            page_size: DEFAULT_PAGE_SIZE,
            likes_path: None,
            status_policy: TransitionPolicy::default(),
        }
    }
}

impl StorefrontConfig {
    /// Loads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads the configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let page_size: u32 = try_load(&lookup, "STOREFRONT_PAGE_SIZE", defaults.page_size)?;
        if page_size == 0 {
            return Err(ConfigError::Invalid {
                key: "STOREFRONT_PAGE_SIZE",
                value: "0".to_string(),
                reason: "page size must be at least 1".to_string(),
            });
        }
        let timeout_secs: u64 = try_load(&lookup, "STOREFRONT_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

        Ok(Self {
            api_url: lookup("STOREFRONT_API_URL")
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty()),
            api_token: lookup("STOREFRONT_API_TOKEN").filter(|t| !t.is_empty()),
            request_timeout: Duration::from_secs(timeout_secs),
            page_size,
            likes_path: lookup("STOREFRONT_LIKES_PATH")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            status_policy: try_load(&lookup, "STOREFRONT_STATUS_POLICY", defaults.status_policy)?,
        })
    }
}

fn try_load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: value.clone(),
            reason: e.to_string(),
        }),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
