//! Access manager grant and revoke.
//!
//! Both operations require the secret key: the request is signed over the
//! literal `grant` segment rather than the path.

use serde::Deserialize;
use serde_json::{Map, Value};

use pubnub_core::{
    default_query, encode_list, query::keys, require_publish_key, require_subscribe_key, Config,
    Endpoint, OperationKind, QueryParams, ValidationError,
};

use crate::error::ResponseParsingError;

fn grant_path(config: &Config) -> String {
    format!("/v2/auth/grant/sub-key/{}", config.subscribe_key)
}

fn validate_keys(config: &Config, operation: OperationKind) -> Result<(), ValidationError> {
    require_subscribe_key(config, operation)?;
    require_publish_key(config, operation)?;
    if config.secret_key().is_none() {
        return Err(ValidationError::MissingSecretKey(operation));
    }
    Ok(())
}

fn flag(enabled: bool) -> &'static str {
    if enabled {
        "1"
    } else {
        "0"
    }
}

/// Resources a grant or revoke applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Targets {
    channels: Vec<String>,
    channel_groups: Vec<String>,
    auth_keys: Vec<String>,
}

impl Targets {
    fn apply(&self, query: &mut QueryParams) {
        if !self.channels.is_empty() {
            query.set("channel", encode_list(&self.channels));
        }
        if !self.channel_groups.is_empty() {
            query.set("channel-group", encode_list(&self.channel_groups));
        }
        if !self.auth_keys.is_empty() {
            query.set(keys::AUTH, encode_list(&self.auth_keys));
        }
    }
}

macro_rules! target_setters {
    () => {
        /// Channels to apply to.
        pub fn channels<S: Into<String>>(mut self, channels: impl IntoIterator<Item = S>) -> Self {
            self.targets.channels.extend(channels.into_iter().map(Into::into));
            self
        }

        /// Channel groups to apply to.
        pub fn channel_groups<S: Into<String>>(mut self, groups: impl IntoIterator<Item = S>) -> Self {
            self.targets.channel_groups.extend(groups.into_iter().map(Into::into));
            self
        }

        /// Auth keys to apply to. Replaces the configured auth key in the query.
        pub fn auth_keys<S: Into<String>>(mut self, auth_keys: impl IntoIterator<Item = S>) -> Self {
            self.targets.auth_keys.extend(auth_keys.into_iter().map(Into::into));
            self
        }
    };
}

/// Grant permissions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grant {
    targets: Targets,
    read: bool,
    write: bool,
    manage: bool,
    ttl: Option<u32>,
}

impl Grant {
    pub fn new() -> Self {
        Self::default()
    }

    target_setters!();

    pub fn read(mut self, read: bool) -> Self {
        self.read = read;
        self
    }

    pub fn write(mut self, write: bool) -> Self {
        self.write = write;
        self
    }

    pub fn manage(mut self, manage: bool) -> Self {
        self.manage = manage;
        self
    }

    /// Grant lifetime in minutes. The service default applies when unset.
    pub fn ttl(mut self, minutes: u32) -> Self {
        self.ttl = Some(minutes);
        self
    }
}

impl Endpoint for Grant {
    fn operation(&self) -> OperationKind {
        OperationKind::AccessManagerGrant
    }

    fn validate(&self, config: &Config) -> Result<(), ValidationError> {
        validate_keys(config, self.operation())
    }

    fn build_path(&self, config: &Config) -> pubnub_core::Result<String> {
        Ok(grant_path(config))
    }

    fn build_query(&self, config: &Config) -> pubnub_core::Result<QueryParams> {
        let mut query = default_query(config);
        query.set("r", flag(self.read));
        query.set("w", flag(self.write));
        query.set("m", flag(self.manage));
        if let Some(ttl) = self.ttl {
            query.set("ttl", ttl.to_string());
        }
        self.targets.apply(&mut query);
        Ok(query)
    }
}

/// Revoke all permissions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Revoke {
    targets: Targets,
}

impl Revoke {
    pub fn new() -> Self {
        Self::default()
    }

    target_setters!();
}

impl Endpoint for Revoke {
    fn operation(&self) -> OperationKind {
        OperationKind::AccessManagerRevoke
    }

    fn validate(&self, config: &Config) -> Result<(), ValidationError> {
        validate_keys(config, self.operation())
    }

    fn build_path(&self, config: &Config) -> pubnub_core::Result<String> {
        Ok(grant_path(config))
    }

    fn build_query(&self, config: &Config) -> pubnub_core::Result<QueryParams> {
        let mut query = default_query(config);
        query.set("r", "0");
        query.set("w", "0");
        query.set("m", "0");
        self.targets.apply(&mut query);
        Ok(query)
    }
}

/// The permissions the service applied.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GrantResponse {
    /// `subkey`, `channel`, `channel-group` or `user`.
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub ttl: i64,
    #[serde(default)]
    pub subscribe_key: String,
    /// Everything else in the payload: the per-channel, per-group and
    /// per-auth-key permission maps.
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

#[derive(Deserialize)]
struct GrantEnvelope {
    payload: GrantResponse,
}

/// Decode `{"status":200,"payload":{...}}`.
pub fn decode_grant(body: &[u8]) -> Result<GrantResponse, ResponseParsingError> {
    serde_json::from_slice::<GrantEnvelope>(body)
        .map(|envelope| envelope.payload)
        .map_err(|e| {
            ResponseParsingError::from_bytes("error unmarshalling response", body).with_source(e)
        })
}
