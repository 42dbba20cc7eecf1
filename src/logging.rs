// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Tracing subscriber setup.

use std::str::FromStr;

use thiserror::Error;
use tracing::Dispatch;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, for development
    #[default]
    Pretty,
    /// One JSON object per line, for log collectors
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

#[derive(Debug, Error)]
#[error("failed to install tracing subscriber: {0}")]
pub struct LoggingError(#[from] tracing_subscriber::util::TryInitError);

/// Install the global subscriber. Fails if one is already installed.
pub fn init(format: LogFormat) -> Result<(), LoggingError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    dispatch(format, filter).try_init()?;
    Ok(())
}

/// Build the subscriber without installing it.
fn dispatch(format: LogFormat, filter: EnvFilter) -> Dispatch {
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => Dispatch::new(registry.with(fmt::layer())),
        LogFormat::Json => Dispatch::new(registry.with(fmt::layer().json())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn parse_format() {
        assert_eq!("json".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("pretty".parse::<LogFormat>(), Ok(LogFormat::Pretty));
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn subscriber_applies_filter_in_both_formats() {
        for format in [LogFormat::Pretty, LogFormat::Json] {
            let dispatch = dispatch(format, EnvFilter::new("warn"));

            // Scoped to this thread; the global subscriber stays untouched
            tracing::dispatcher::with_default(&dispatch, || {
                assert!(tracing::enabled!(Level::WARN));
                assert!(!tracing::enabled!(Level::INFO));
            });
        }
    }
}
