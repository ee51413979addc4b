//! Error types for the request pipeline.
//!
//! # Design
//! Every failure maps to exactly one variant, named after the stage that
//! produced it. Causes from `url`, `serde_json` and the transport are stored
//! as strings so the error stays `Clone` and does not leak transport crates
//! into the public API.

use thiserror::Error;

/// Errors returned by `Client` operations.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The endpoint string is not a well-formed absolute URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The transport could not complete the exchange.
    #[error("transport failure: {0}")]
    TransportFailure(String),

    /// The server answered with a status outside 200..=299.
    ///
    /// `body` is diagnostic context only; callers should match on `status`.
    #[error("HTTP status {status}")]
    StatusError { status: u16, body: Vec<u8> },

    /// The request payload could not be serialized to JSON.
    #[error("encoding failed: {0}")]
    EncodeError(String),

    /// The response body could not be deserialized into the expected type.
    #[error("decoding failed: {0}")]
    DecodeError(String),
}

impl ApiError {
    /// Status code carried by `StatusError`, `None` for every other kind.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::StatusError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::InvalidUrl(err.to_string())
    }
}
