//! Error types for the client.

use pubnub_core::{CoreError, ValidationError};
use pubnub_crypto::CryptoError;
use pubnub_transport::TransportError;
use thiserror::Error;

/// Errors that can occur while executing an operation.
#[derive(Debug, Error)]
pub enum Error {
    /// The operation is missing a required field. Raised before any I/O.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The request could not be assembled.
    #[error("request error: {0}")]
    Request(CoreError),

    /// The response did not have the expected shape.
    #[error("response parsing error: {0}")]
    ResponseParsing(#[from] ResponseParsingError),

    /// The transport failed to deliver the request.
    #[error("connection error: {0}")]
    Connection(#[from] TransportError),

    /// The service answered with a non-2xx status.
    #[error("server responded with status {status}: {body}")]
    Server { status: u16, body: String },

    /// The configured cipher could not be created.
    #[error("cipher error: {0}")]
    Crypto(#[from] CryptoError),
}

impl From<CoreError> for Error {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Validation(e) => Error::Validation(e),
            other => Error::Request(other),
        }
    }
}

/// Underlying cause of a [`ResponseParsingError`].
#[derive(Debug, Error)]
pub enum ParseCause {
    /// Invalid JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Decryption failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// A response, or part of one, that could not be decoded.
///
/// `body` holds the offending text: the whole response for envelope errors,
/// the entry or ciphertext for per-message errors.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ResponseParsingError {
    /// What went wrong.
    pub message: String,
    /// The offending text.
    pub body: String,
    /// The underlying parse or decrypt error, when there is one.
    #[source]
    pub source: Option<ParseCause>,
}

impl ResponseParsingError {
    /// Create an error with no underlying cause.
    pub fn new(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            body: body.into(),
            source: None,
        }
    }

    /// Create an error carrying raw response bytes.
    pub fn from_bytes(message: impl Into<String>, body: &[u8]) -> Self {
        Self::new(message, String::from_utf8_lossy(body))
    }

    /// Attach the underlying cause.
    pub fn with_source(mut self, cause: impl Into<ParseCause>) -> Self {
        self.source = Some(cause.into());
        self
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
