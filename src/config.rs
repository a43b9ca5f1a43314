//! Configuration management for the numeric service.
//!
//! Configuration can be set via environment variables:
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `8000`.
//! - `MAX_BODY_BYTES` - Optional. Largest accepted request body. Defaults to 2 MiB.
//! - `MAX_RESULT_ELEMENTS` - Optional. Largest matrix product, in elements. Defaults to `1000000`.
//! - `MAX_MULTIPLY_ADDS` - Optional. Most multiply-adds one matrix product may take.
//!   Defaults to `100000000`.

use std::fmt::Display;
use std::str::FromStr;

use thiserror::Error;

use crate::numeric::{MatrixLimits, DEFAULT_MAX_MULTIPLY_ADDS, DEFAULT_MAX_RESULT_ELEMENTS};

/// Default request body limit (2 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Maximum request body size in bytes
    pub max_body_bytes: usize,

    /// Size bounds for matrix products
    pub matrix_limits: MatrixLimits,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let port: u16 = lookup("PORT")
            .unwrap_or_else(|| "8000".to_string())
            .trim()
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;
        if port == 0 {
            return Err(ConfigError::InvalidValue(
                "PORT".to_string(),
                "port must be non-zero".to_string(),
            ));
        }

        let max_body_bytes = parse_limit(&lookup, "MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?;
        let max_result_elements =
            parse_limit(&lookup, "MAX_RESULT_ELEMENTS", DEFAULT_MAX_RESULT_ELEMENTS)?;
        let max_multiply_adds =
            parse_limit(&lookup, "MAX_MULTIPLY_ADDS", DEFAULT_MAX_MULTIPLY_ADDS)?;

        Ok(Self {
            host,
            port,
            max_body_bytes,
            matrix_limits: MatrixLimits {
                max_result_elements,
                max_multiply_adds,
            },
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            matrix_limits: MatrixLimits::default(),
        }
    }

    /// Address the server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse a non-zero size limit, falling back to `default` when unset.
fn parse_limit<F, T>(lookup: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialEq + From<u8>,
    T::Err: Display,
{
    let value = lookup(name)
        .map(|v| {
            v.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidValue(name.to_string(), format!("{}", e)))
        })
        .transpose()?
        .unwrap_or(default);
    if value == T::from(0u8) {
        return Err(ConfigError::InvalidValue(
            name.to_string(),
            "limit must be non-zero".to_string(),
        ));
    }
    Ok(value)
}

impl Default for Config {
    fn default() -> Self {
        Self::new("127.0.0.1", 8000)
    }
}
