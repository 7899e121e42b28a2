//! Presence state for a UUID on channels and channel groups.

use serde_json::Value;

use pubnub_core::{
    default_query, encode_list, require_subscribe_key, url_encode, Config, CoreError, Endpoint,
    OperationKind, QueryParams, ValidationError,
};

use crate::error::ResponseParsingError;

const OPERATION: OperationKind = OperationKind::SetState;

/// A set-state request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetState {
    channels: Vec<String>,
    channel_groups: Vec<String>,
    state: Option<Value>,
    uuid: Option<String>,
}

impl SetState {
    /// An empty request; add channels or groups and a state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Channels to set the state on.
    pub fn channels<S: Into<String>>(mut self, channels: impl IntoIterator<Item = S>) -> Self {
        self.channels.extend(channels.into_iter().map(Into::into));
        self
    }

    /// Channel groups to set the state on.
    pub fn channel_groups<S: Into<String>>(mut self, groups: impl IntoIterator<Item = S>) -> Self {
        self.channel_groups.extend(groups.into_iter().map(Into::into));
        self
    }

    /// The state object.
    pub fn state(mut self, state: impl Into<Value>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Set state for another UUID instead of the configured one.
    pub fn uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = Some(uuid.into());
        self
    }
}

impl Endpoint for SetState {
    fn operation(&self) -> OperationKind {
        OPERATION
    }

    fn validate(&self, config: &Config) -> Result<(), ValidationError> {
        require_subscribe_key(config, OPERATION)?;
        if self.channels.is_empty() && self.channel_groups.is_empty() {
            return Err(ValidationError::MissingChannel(OPERATION));
        }
        if self.state.is_none() {
            return Err(ValidationError::MissingState(OPERATION));
        }
        Ok(())
    }

    fn build_path(&self, config: &Config) -> pubnub_core::Result<String> {
        let channels = if self.channels.is_empty() {
            ",".to_string()
        } else {
            encode_list(&self.channels)
        };
        let uuid = self.uuid.as_deref().unwrap_or(&config.uuid);

        Ok(format!(
            "/v2/presence/sub-key/{}/channel/{}/uuid/{}/data",
            config.subscribe_key,
            channels,
            url_encode(uuid)
        ))
    }

    fn build_query(&self, config: &Config) -> pubnub_core::Result<QueryParams> {
        let mut query = default_query(config);

        if let Some(state) = &self.state {
            let state =
                serde_json::to_string(state).map_err(|e| CoreError::Encoding(e.to_string()))?;
            query.set("state", state);
        }
        if !self.channel_groups.is_empty() {
            query.set("channel-group", encode_list(&self.channel_groups));
        }

        Ok(query)
    }
}

/// The state the service stored.
#[derive(Debug, Clone, PartialEq)]
pub struct SetStateResponse {
    pub state: Value,
}

/// Decode `{"status":200,"payload":{...}}`.
pub fn decode_set_state(body: &[u8]) -> Result<SetStateResponse, ResponseParsingError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        ResponseParsingError::from_bytes("error unmarshalling response", body).with_source(e)
    })?;

    if let Some(status) = value.get("status").and_then(Value::as_i64) {
        if status != 200 {
            return Err(ResponseParsingError::from_bytes(
                format!("set state failed with status {}", status),
                body,
            ));
        }
    }

    match value.get("payload") {
        Some(payload) => Ok(SetStateResponse {
            state: payload.clone(),
        }),
        None => Err(ResponseParsingError::from_bytes("missing payload", body)),
    }
}
