//! Error taxonomy for the Hive client.
//!
//! Every failure surfaces as a distinct [`HiveError`] variant so callers can
//! tell "bad credentials" apart from "device unreachable" or "API changed shape".

use http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HiveError {
    /// The login call itself rejected the supplied credentials.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// An authenticated call was rejected with 401.
    #[error("not authorized")]
    NotAuthorized,

    /// Any non-2xx, non-401 response.
    #[error("unexpected api response (http {status}): {message}")]
    UnknownApi { status: StatusCode, message: String },

    /// A 2xx response whose body violates the required-field invariants.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Serializing an outgoing request body failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Value(#[from] ValueError),
}

impl HiveError {
    pub fn malformed(message: impl Into<String>) -> Self {
        HiveError::MalformedResponse(message.into())
    }

    pub fn is_not_authorized(&self) -> bool {
        matches!(self, HiveError::NotAuthorized)
    }
}

/// Failures raised by the underlying HTTP transport. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("transport error: {0}")]
    Connection(String),
}

/// Constraint violations when constructing scalar domain values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("{name} {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        name: &'static str,
        min: i64,
        max: i64,
        actual: i64,
    },
    #[error("{name} is not a number: {raw:?}")]
    NotANumber { name: &'static str, raw: String },
    #[error("{name} must be finite, got {actual}")]
    NotFinite { name: &'static str, actual: f64 },
}
