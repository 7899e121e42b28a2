//! Error types for the request pipeline.

use thiserror::Error;

use crate::kind::OperationKind;

/// Errors that can occur while assembling a request.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The operation is missing a required field.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A parameter could not be parsed into the form the service expects.
    #[error("{operation}: invalid value for {name}: {value:?}")]
    InvalidParameter {
        operation: OperationKind,
        name: &'static str,
        value: String,
    },

    /// A path segment or body could not be produced.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The keyed digest could not be computed.
    #[error("signing error: {0}")]
    Signing(String),

    /// The configuration document is malformed.
    #[error("invalid config: {0}")]
    Config(String),
}

/// Validation errors, raised before any network activity.
///
/// Every variant names the operation that failed so callers can report
/// which request was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0}: missing subscribe key")]
    MissingSubscribeKey(OperationKind),

    #[error("{0}: missing publish key")]
    MissingPublishKey(OperationKind),

    #[error("{0}: missing secret key")]
    MissingSecretKey(OperationKind),

    #[error("{0}: missing channel")]
    MissingChannel(OperationKind),

    #[error("{0}: missing channel group")]
    MissingChannelGroup(OperationKind),

    #[error("{0}: missing message")]
    MissingMessage(OperationKind),

    #[error("{0}: missing state")]
    MissingState(OperationKind),
}

impl ValidationError {
    /// The operation that failed validation.
    pub fn operation(&self) -> OperationKind {
        match self {
            ValidationError::MissingSubscribeKey(op)
            | ValidationError::MissingPublishKey(op)
            | ValidationError::MissingSecretKey(op)
            | ValidationError::MissingChannel(op)
            | ValidationError::MissingChannelGroup(op)
            | ValidationError::MissingMessage(op)
            | ValidationError::MissingState(op) => *op,
        }
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
