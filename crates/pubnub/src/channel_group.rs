//! Channel group membership.

use serde_json::Value;

use pubnub_core::{
    default_query, encode_list, require_subscribe_key, url_encode, Config, Endpoint,
    OperationKind, QueryParams, ValidationError,
};

use crate::error::ResponseParsingError;

fn registration_path(config: &Config, group: &str) -> String {
    format!(
        "/v1/channel-registration/sub-key/{}/channel-group/{}",
        config.subscribe_key,
        url_encode(group)
    )
}

fn validate_membership(
    config: &Config,
    operation: OperationKind,
    channels: &[String],
    group: &str,
) -> Result<(), ValidationError> {
    require_subscribe_key(config, operation)?;
    if channels.is_empty() {
        return Err(ValidationError::MissingChannel(operation));
    }
    if group.is_empty() {
        return Err(ValidationError::MissingChannelGroup(operation));
    }
    Ok(())
}

/// Add channels to a channel group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddChannelsToChannelGroup {
    channels: Vec<String>,
    group: String,
}

impl AddChannelsToChannelGroup {
    pub fn new<S: Into<String>>(group: impl Into<String>, channels: impl IntoIterator<Item = S>) -> Self {
        Self {
            channels: channels.into_iter().map(Into::into).collect(),
            group: group.into(),
        }
    }
}

impl Endpoint for AddChannelsToChannelGroup {
    fn operation(&self) -> OperationKind {
        OperationKind::AddChannelsToChannelGroup
    }

    fn validate(&self, config: &Config) -> Result<(), ValidationError> {
        validate_membership(config, self.operation(), &self.channels, &self.group)
    }

    fn build_path(&self, config: &Config) -> pubnub_core::Result<String> {
        Ok(registration_path(config, &self.group))
    }

    fn build_query(&self, config: &Config) -> pubnub_core::Result<QueryParams> {
        let mut query = default_query(config);
        query.set("add", encode_list(&self.channels));
        Ok(query)
    }
}

/// Remove channels from a channel group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoveChannelsFromChannelGroup {
    channels: Vec<String>,
    group: String,
}

impl RemoveChannelsFromChannelGroup {
    pub fn new<S: Into<String>>(group: impl Into<String>, channels: impl IntoIterator<Item = S>) -> Self {
        Self {
            channels: channels.into_iter().map(Into::into).collect(),
            group: group.into(),
        }
    }
}

impl Endpoint for RemoveChannelsFromChannelGroup {
    fn operation(&self) -> OperationKind {
        OperationKind::RemoveChannelsFromChannelGroup
    }

    fn validate(&self, config: &Config) -> Result<(), ValidationError> {
        validate_membership(config, self.operation(), &self.channels, &self.group)
    }

    fn build_path(&self, config: &Config) -> pubnub_core::Result<String> {
        Ok(registration_path(config, &self.group))
    }

    fn build_query(&self, config: &Config) -> pubnub_core::Result<QueryParams> {
        let mut query = default_query(config);
        query.set("remove", encode_list(&self.channels));
        Ok(query)
    }
}

/// Acknowledgement of a membership change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelGroupResponse;

/// Decode `{"status":200,"error":false,...}`.
pub fn decode_channel_group(body: &[u8]) -> Result<ChannelGroupResponse, ResponseParsingError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        ResponseParsingError::from_bytes("error unmarshalling response", body).with_source(e)
    })?;

    let object = value
        .as_object()
        .ok_or_else(|| ResponseParsingError::from_bytes("expected an object", body))?;

    if object.get("error").and_then(Value::as_bool) == Some(true) {
        let message = object
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("channel group request failed");
        return Err(ResponseParsingError::from_bytes(message, body));
    }

    Ok(ChannelGroupResponse)
}
