//! Unified error type for the conversion relay.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the relay pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// The inbound `eventType` is outside the closed set.
    #[error("invalid event type: {0}")]
    InvalidEventType(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Geo lookup failure. Recovered at the enrichment site by
    /// downgrading to the empty location; never surfaced to callers.
    #[error("geo lookup failed: {0}")]
    Geo(String),

    /// Conversions API transport or API-level failure. Not recovered;
    /// the handler logs full context and answers with an opaque 500.
    #[error("dispatch failed: {0}")]
    Dispatch(String),

    #[error("user store error: {0}")]
    Store(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn geo(msg: impl Into<String>) -> Self {
        Self::Geo(msg.into())
    }

    pub fn dispatch(msg: impl Into<String>) -> Self {
        Self::Dispatch(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the HTTP status code for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidEventType(_) => 400,
            Self::Validation(_) => 400,
            Self::Serialization(_) => 400,
            Self::Geo(_) => 500,
            Self::Dispatch(_) => 500,
            Self::Store(_) => 500,
            Self::Internal(_) => 500,
        }
    }
}
