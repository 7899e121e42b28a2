//! Canonical query parameters.
//!
//! A [`QueryParams`] is an unordered mapping from parameter name to a single
//! value, built fresh for every request. Two renderings exist:
//!
//! - [`QueryParams::canonical_string`]: keys sorted, values escaped with
//!   [`pam_encode`]. This is the form that gets signed and it is the same
//!   for any insertion order.
//! - [`QueryParams::to_query_string`]: values emitted as stored, in whatever
//!   order the map yields. Only the receiving service sees this form and it
//!   does not care about order.

use std::collections::{BTreeMap, HashMap};

use crate::config::Config;
use crate::encoding::pam_encode;
use crate::error::{CoreError, Result};
use crate::kind::OperationKind;

/// SDK name reported in the `pnsdk` parameter.
pub const SDK_NAME: &str = "PubNub-Rust";

/// Parameter names with special handling in the pipeline.
pub mod keys {
    pub const PNSDK: &str = "pnsdk";
    pub const UUID: &str = "uuid";
    pub const AUTH: &str = "auth";
    pub const FILTER_EXPR: &str = "filter-expr";
    pub const TIMESTAMP: &str = "timestamp";
    pub const SIGNATURE: &str = "signature";
    pub const META: &str = "meta";
    pub const STATE: &str = "state";
}

/// The SDK identifier, e.g. `PubNub-Rust/0.1.0`.
pub fn sdk_identifier() -> String {
    format!("{}/{}", SDK_NAME, env!("CARGO_PKG_VERSION"))
}

/// A request's query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(HashMap<String, String>);

impl QueryParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Set a parameter, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Get a parameter's value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Remove a parameter, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// Check whether a parameter is present.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over parameters in map order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Replace a parameter's value with its percent-encoded form using `encode`.
    ///
    /// Does nothing if the parameter is absent.
    pub fn escape_with(&mut self, key: &str, encode: impl FnOnce(&str) -> String) {
        if let Some(value) = self.0.get_mut(key) {
            let encoded = encode(value.as_str());
            *value = encoded;
        }
    }

    /// Deterministic rendering for signing.
    ///
    /// Keys are sorted by byte order and values escaped with [`pam_encode`].
    pub fn canonical_string(&self) -> String {
        let sorted: BTreeMap<&str, &str> = self.iter().collect();
        sorted
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, pam_encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Rendering for transmission. Order is not significant.
    pub fn to_query_string(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for QueryParams {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.0
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

/// The parameters every request starts from.
///
/// Always contains `pnsdk` and `uuid`; `auth` is added when an auth key is
/// configured.
pub fn default_query(config: &Config) -> QueryParams {
    let mut query = QueryParams::new();
    query.set(keys::PNSDK, sdk_identifier());
    query.set(keys::UUID, config.uuid.as_str());
    if let Some(auth) = config.auth_key() {
        query.set(keys::AUTH, auth);
    }
    query
}

/// Parse a numeric string field and re-serialize it.
///
/// Fails the whole build if the value is not an integer.
pub fn parse_numeric(operation: OperationKind, name: &'static str, value: &str) -> Result<String> {
    value
        .parse::<i64>()
        .map(|n| n.to_string())
        .map_err(|_| CoreError::InvalidParameter {
            operation,
            name,
            value: value.to_string(),
        })
}
