//! Error types for the transport layer.

use thiserror::Error;

/// Errors that can occur while sending a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The connection could not be established or was dropped.
    #[error("connection error: {0}")]
    Connection(String),

    /// The request did not complete in time.
    #[error("timeout: {0}")]
    Timeout(String),

    /// The request could not be turned into an HTTP call.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A stubbed transport had no response registered for the request.
    #[error("no stub matched {method} {url}")]
    NoStubMatched { method: String, url: String },
}

/// Result type for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;
