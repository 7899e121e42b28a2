//! The capability contract every operation satisfies.

use crate::config::Config;
use crate::error::{Result, ValidationError};
use crate::kind::{HttpMethod, OperationKind};
use crate::query::QueryParams;

/// An API operation that can be validated, assembled and signed.
///
/// Implementations are immutable descriptors: building a path or query never
/// changes the operation, so the assembler may call each method once and in
/// any order after [`Endpoint::validate`] passes.
pub trait Endpoint {
    /// The operation kind, used in errors and for per-operation rewrites.
    fn operation(&self) -> OperationKind;

    /// Check required fields before any network activity.
    fn validate(&self, config: &Config) -> std::result::Result<(), ValidationError>;

    /// The path relative to the origin, already percent-encoded.
    fn build_path(&self, config: &Config) -> Result<String>;

    /// The operation's query parameters, starting from
    /// [`default_query`](crate::query::default_query).
    fn build_query(&self, config: &Config) -> Result<QueryParams>;

    /// The request body. Empty for most operations.
    fn build_body(&self, _config: &Config) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }

    /// The HTTP method.
    fn http_method(&self) -> HttpMethod {
        HttpMethod::Get
    }
}

/// Fail with [`ValidationError::MissingSubscribeKey`] if no subscribe key is set.
///
/// Every operation starts its validation with this check.
pub fn require_subscribe_key(
    config: &Config,
    operation: OperationKind,
) -> std::result::Result<(), ValidationError> {
    if config.subscribe_key.is_empty() {
        return Err(ValidationError::MissingSubscribeKey(operation));
    }
    Ok(())
}

/// Fail with [`ValidationError::MissingPublishKey`] if no publish key is set.
pub fn require_publish_key(
    config: &Config,
    operation: OperationKind,
) -> std::result::Result<(), ValidationError> {
    if config.publish_key.is_empty() {
        return Err(ValidationError::MissingPublishKey(operation));
    }
    Ok(())
}
