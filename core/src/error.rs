//! Error types for the booking API client.
//!
//! # Design
//! Every non-2xx response lands in `Status` with a message that is already
//! fit for display: the server's `error` field for mutating endpoints when it
//! sent one, otherwise a fixed per-endpoint fallback. The status code is kept
//! so callers can still tell a 404 from a validation failure.

use thiserror::Error;

/// Errors returned by `ApiClient` parse methods and `Transport` implementations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The request never produced a response (connection refused, DNS, ...).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// HTTP status of the failed response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
