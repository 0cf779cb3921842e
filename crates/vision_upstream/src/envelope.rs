//! In-band failure signalling.
//!
//! The proxy answers `200 OK` even when the real upstream call failed, and puts
//! `{ "error": .., "fallback": .. }` in the body instead. Callers must look at
//! the body, not the status code.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::UpstreamFailure;

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error(transparent)]
    Upstream(#[from] UpstreamFailure),
    #[error("proxy returned fallback data: {0}")]
    Fallback(String),
    #[error("unexpected payload shape: {0}")]
    Schema(#[from] serde_json::Error),
    #[error("{0}")]
    Unavailable(String),
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FallbackEnvelope {
    pub error: String,
    pub fallback: Value,
}

impl FallbackEnvelope {
    pub fn new(error: impl Into<String>, fallback: Value) -> Self {
        Self {
            error: error.into(),
            fallback,
        }
    }

    pub fn into_value(self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

pub fn is_fallback(body: &Value) -> bool {
    matches!(body.get("fallback"), Some(v) if !v.is_null() && v != &Value::Bool(false))
}

/// Unwrap a live upstream body, turning transport failures and fallback
/// envelopes into a [`NormalizeError`].
pub fn live_body(outcome: Result<Value, UpstreamFailure>) -> Result<Value, NormalizeError> {
    let body = outcome?;

    if is_fallback(&body) {
        let error = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("upstream unavailable")
            .to_string();
        return Err(NormalizeError::Fallback(error));
    }

    Ok(body)
}
