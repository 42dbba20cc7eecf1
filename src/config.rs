// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! by the access layer. Configuration is loaded from the environment at
//! startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `WORKLOAD_API_BASE_URL` | Base URL of the workload backend API | `http://localhost:4000/api` |
//! | `WORKLOAD_SESSION_DIR` | Directory holding the persisted credential | `.workload-session` |
//! | `WORKLOAD_HTTP_TIMEOUT_SECS` | Timeout for authentication requests | `10` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::logging::LogFormat;

/// Environment variable name for the backend API base URL.
///
/// Authentication calls go to `<base>/auth/login` and `<base>/auth/logout`.
///
/// # Default
/// `http://localhost:4000/api`
pub const API_BASE_URL_ENV: &str = "WORKLOAD_API_BASE_URL";

/// Default backend API base URL.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:4000/api";

/// Environment variable name for the session directory.
///
/// The credential record is stored here as `<key>.json`.
///
/// # Default
/// `.workload-session` (relative to the working directory)
pub const SESSION_DIR_ENV: &str = "WORKLOAD_SESSION_DIR";

/// Default session directory.
pub const DEFAULT_SESSION_DIR: &str = ".workload-session";

/// Environment variable name for the HTTP timeout, in whole seconds.
pub const HTTP_TIMEOUT_ENV: &str = "WORKLOAD_HTTP_TIMEOUT_SECS";

/// Default HTTP timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Environment variable name for the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid URL: {value}")]
    InvalidUrl { var: &'static str, value: String },

    #[error("{var} must be a positive number of seconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },

    #[error("{var} must be \"json\" or \"pretty\", got {value:?}")]
    InvalidLogFormat { var: &'static str, value: String },
}

/// Settings for the access layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessConfig {
    pub api_base_url: String,
    pub session_dir: PathBuf,
    pub http_timeout: Duration,
    pub log_format: LogFormat,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            session_dir: PathBuf::from(DEFAULT_SESSION_DIR),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            log_format: LogFormat::default(),
        }
    }
}

impl AccessConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` to read variables. Unset or blank variables take
    /// their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(value) = read(API_BASE_URL_ENV) {
            if url::Url::parse(&value).is_err() {
                return Err(ConfigError::InvalidUrl {
                    var: API_BASE_URL_ENV,
                    value,
                });
            }
            config.api_base_url = value;
        }

        if let Some(value) = read(SESSION_DIR_ENV) {
            config.session_dir = PathBuf::from(value);
        }

        if let Some(value) = read(HTTP_TIMEOUT_ENV) {
            match value.parse::<u64>() {
                Ok(secs) if secs > 0 => config.http_timeout = Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidTimeout {
                        var: HTTP_TIMEOUT_ENV,
                        value,
                    })
                }
            }
        }

        if let Some(value) = read(LOG_FORMAT_ENV) {
            config.log_format = value.parse().map_err(|_| ConfigError::InvalidLogFormat {
                var: LOG_FORMAT_ENV,
                value: value.clone(),
            })?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AccessConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AccessConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        assert_eq!(load(&[]).unwrap(), AccessConfig::default());

        let config = AccessConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:4000/api");
        assert_eq!(config.session_dir, PathBuf::from(".workload-session"));
        assert_eq!(config.http_timeout, Duration::from_secs(10));
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn reads_every_variable() {
        let config = load(&[
            (API_BASE_URL_ENV, "https://workload.example.ac.th/api"),
            (SESSION_DIR_ENV, "/var/lib/workload"),
            (HTTP_TIMEOUT_ENV, "30"),
            (LOG_FORMAT_ENV, "json"),
        ])
        .unwrap();

        assert_eq!(config.api_base_url, "https://workload.example.ac.th/api");
        assert_eq!(config.session_dir, PathBuf::from("/var/lib/workload"));
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = load(&[(API_BASE_URL_ENV, "  "), (HTTP_TIMEOUT_ENV, "")]).unwrap();
        assert_eq!(config, AccessConfig::default());
    }

    #[test]
    fn invalid_values_are_reported() {
        assert_eq!(
            load(&[(API_BASE_URL_ENV, "not a url")]),
            Err(ConfigError::InvalidUrl {
                var: API_BASE_URL_ENV,
                value: "not a url".to_string()
            })
        );
        assert!(matches!(
            load(&[(HTTP_TIMEOUT_ENV, "0")]),
            Err(ConfigError::InvalidTimeout { .. })
        ));
        assert!(matches!(
            load(&[(HTTP_TIMEOUT_ENV, "ten")]),
            Err(ConfigError::InvalidTimeout { .. })
        ));
        assert!(matches!(
            load(&[(LOG_FORMAT_ENV, "xml")]),
            Err(ConfigError::InvalidLogFormat { .. })
        ));
    }
}
