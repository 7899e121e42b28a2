//! Client configuration.
//!
//! A [`Config`] is built once by the caller and shared read-only by every
//! request. Optional credentials treat the empty string as unset.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::error::{CoreError, Result};

/// Default service origin.
pub const DEFAULT_ORIGIN: &str = "ps.pndsn.com";

/// Default timeout for non-subscribe requests, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default connect timeout, in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Configuration for the client.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Subscribe key. Required by every operation.
    pub subscribe_key: String,
    /// Publish key.
    pub publish_key: String,
    /// Secret key. When set, every request is signed.
    pub secret_key: Option<String>,
    /// Identity of this client.
    pub uuid: String,
    /// Access manager auth key.
    pub auth_key: Option<String>,
    /// Cipher key for end-to-end message encryption.
    pub cipher_key: Option<String>,
    /// Prepend a random IV to each ciphertext instead of the fixed one.
    pub use_random_iv: bool,
    /// Message filter expression, sent with every request.
    pub filter_expression: Option<String>,
    /// Service host.
    pub origin: String,
    /// Timeout for non-subscribe requests, in seconds.
    pub non_subscribe_request_timeout: u64,
    /// Connect timeout, in seconds.
    pub connect_timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            subscribe_key: String::new(),
            publish_key: String::new(),
            secret_key: None,
            uuid: format!("pn-{}", uuid::Uuid::new_v4()),
            auth_key: None,
            cipher_key: None,
            use_random_iv: false,
            filter_expression: None,
            origin: DEFAULT_ORIGIN.to_string(),
            non_subscribe_request_timeout: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Create a config with the given keys and defaults for everything else.
    pub fn new(subscribe_key: impl Into<String>, publish_key: impl Into<String>) -> Self {
        Self {
            subscribe_key: subscribe_key.into(),
            publish_key: publish_key.into(),
            ..Self::default()
        }
    }

    /// Load a config from a JSON document. Missing fields take defaults.
    pub fn from_json(document: &str) -> Result<Self> {
        serde_json::from_str(document).map_err(|e| CoreError::Config(e.to_string()))
    }

    pub fn with_secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = uuid.into();
        self
    }

    pub fn with_auth_key(mut self, auth_key: impl Into<String>) -> Self {
        self.auth_key = Some(auth_key.into());
        self
    }

    pub fn with_cipher_key(mut self, cipher_key: impl Into<String>) -> Self {
        self.cipher_key = Some(cipher_key.into());
        self
    }

    pub fn with_random_iv(mut self, use_random_iv: bool) -> Self {
        self.use_random_iv = use_random_iv;
        self
    }

    pub fn with_filter_expression(mut self, expression: impl Into<String>) -> Self {
        self.filter_expression = Some(expression.into());
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// The secret key, if set and non-empty.
    pub fn secret_key(&self) -> Option<&str> {
        non_empty(&self.secret_key)
    }

    /// The auth key, if set and non-empty.
    pub fn auth_key(&self) -> Option<&str> {
        non_empty(&self.auth_key)
    }

    /// The cipher key, if set and non-empty.
    pub fn cipher_key(&self) -> Option<&str> {
        non_empty(&self.cipher_key)
    }

    /// The filter expression, if set and non-empty.
    pub fn filter_expression(&self) -> Option<&str> {
        non_empty(&self.filter_expression)
    }

    /// Timeout for non-subscribe requests.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.non_subscribe_request_timeout)
    }

    /// Timeout for establishing a connection.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("subscribe_key", &self.subscribe_key)
            .field("publish_key", &self.publish_key)
            .field("secret_key", &redacted(&self.secret_key))
            .field("uuid", &self.uuid)
            .field("auth_key", &self.auth_key)
            .field("cipher_key", &redacted(&self.cipher_key))
            .field("use_random_iv", &self.use_random_iv)
            .field("filter_expression", &self.filter_expression)
            .field("origin", &self.origin)
            .field("non_subscribe_request_timeout", &self.non_subscribe_request_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

fn redacted(value: &Option<String>) -> Option<&'static str> {
    non_empty(value).map(|_| "<redacted>")
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
