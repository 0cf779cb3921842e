//! Environment lookups shared by the stats and proxy configs.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Trimmed value of `key`; blank counts as unset.
pub fn var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    let value = lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    if value.is_none() {
        debug!("{key} not set, using default");
    }

    value
}

pub fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    var(lookup, key)
        .map(|raw| {
            raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
                key,
                message: e.to_string(),
            })
        })
        .transpose()
}

/// Whole seconds, strictly positive.
pub fn secs_var(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<Duration>, ConfigError> {
    match parse_var::<u64>(lookup, key)? {
        Some(0) => Err(ConfigError::Invalid {
            key,
            message: "must be greater than zero".to_string(),
        }),
        secs => Ok(secs.map(Duration::from_secs)),
    }
}

/// `var` passed through `accept`, which normalizes a valid value or rejects it.
pub fn checked_var(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    accept: impl Fn(&str) -> Option<String>,
) -> Result<Option<String>, ConfigError> {
    var(lookup, key)
        .map(|raw| {
            accept(&raw).ok_or_else(|| ConfigError::Invalid {
                key,
                message: format!("{raw:?} is not a valid identifier"),
            })
        })
        .transpose()
}
