//! Publish a message to a channel.

use serde::Deserialize;
use serde_json::Value;

use pubnub_core::{
    default_query, pam_encode, require_publish_key, require_subscribe_key, url_encode, Config,
    CoreError, Endpoint, HttpMethod, OperationKind, QueryParams, ValidationError,
};
use pubnub_crypto::{Cipher, LegacyCryptor};

use crate::error::ResponseParsingError;

const OPERATION: OperationKind = OperationKind::Publish;

/// A publish request.
///
/// The message is serialized as JSON. With a cipher key configured the JSON
/// is encrypted and sent as a JSON string holding the Base64 ciphertext.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Publish {
    channel: String,
    message: Option<Value>,
    meta: Option<Value>,
    should_store: Option<bool>,
    ttl: Option<u32>,
    use_post: bool,
    do_not_replicate: bool,
    sequence: Option<u32>,
}

impl Publish {
    /// Publish to `channel`.
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            ..Default::default()
        }
    }

    /// Set the message.
    pub fn message(mut self, message: impl Into<Value>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach metadata, sent unencrypted for server-side filtering.
    pub fn meta(mut self, meta: impl Into<Value>) -> Self {
        self.meta = Some(meta.into());
        self
    }

    /// Whether the message goes to history storage.
    pub fn should_store(mut self, store: bool) -> Self {
        self.should_store = Some(store);
        self
    }

    /// Storage TTL in hours.
    pub fn ttl(mut self, hours: u32) -> Self {
        self.ttl = Some(hours);
        self
    }

    /// Send the message in a POST body instead of the path.
    pub fn use_post(mut self, use_post: bool) -> Self {
        self.use_post = use_post;
        self
    }

    /// Keep the message in the receiving data center only.
    pub fn do_not_replicate(mut self, norep: bool) -> Self {
        self.do_not_replicate = norep;
        self
    }

    /// Set the publish sequence number. The client fills this in when unset.
    pub fn sequence(mut self, seqn: u32) -> Self {
        self.sequence = Some(seqn);
        self
    }

    pub(crate) fn sequence_or(&mut self, next: impl FnOnce() -> u32) {
        if self.sequence.is_none() {
            self.sequence = Some(next());
        }
    }

    /// The channel.
    pub fn channel_name(&self) -> &str {
        &self.channel
    }

    /// The message JSON as sent, encrypted when a cipher key is configured.
    fn payload(&self, config: &Config) -> pubnub_core::Result<String> {
        let message = self.message.as_ref().unwrap_or(&Value::Null);
        let json = serde_json::to_string(message).map_err(|e| CoreError::Encoding(e.to_string()))?;

        match config.cipher_key() {
            Some(key) => {
                let cryptor = LegacyCryptor::new(key)
                    .map_err(|e| CoreError::Encoding(e.to_string()))?
                    .with_random_iv(config.use_random_iv);
                let ciphertext = cryptor
                    .encrypt_to_base64(&json)
                    .map_err(|e| CoreError::Encoding(e.to_string()))?;
                serde_json::to_string(&Value::String(ciphertext))
                    .map_err(|e| CoreError::Encoding(e.to_string()))
            }
            None => Ok(json),
        }
    }
}

impl Endpoint for Publish {
    fn operation(&self) -> OperationKind {
        OPERATION
    }

    fn validate(&self, config: &Config) -> Result<(), ValidationError> {
        require_subscribe_key(config, OPERATION)?;
        require_publish_key(config, OPERATION)?;

        if self.channel.is_empty() {
            return Err(ValidationError::MissingChannel(OPERATION));
        }
        if matches!(self.message, None | Some(Value::Null)) {
            return Err(ValidationError::MissingMessage(OPERATION));
        }
        Ok(())
    }

    fn build_path(&self, config: &Config) -> pubnub_core::Result<String> {
        let mut path = format!(
            "/publish/{}/{}/0/{}/0",
            config.publish_key,
            config.subscribe_key,
            url_encode(&self.channel)
        );

        if !self.use_post {
            path.push('/');
            path.push_str(&pam_encode(&self.payload(config)?));
        }

        Ok(path)
    }

    fn build_query(&self, config: &Config) -> pubnub_core::Result<QueryParams> {
        let mut query = default_query(config);

        if let Some(seqn) = self.sequence {
            query.set("seqn", seqn.to_string());
        }
        if let Some(store) = self.should_store {
            query.set("store", if store { "1" } else { "0" });
        }
        if let Some(ttl) = self.ttl {
            query.set("ttl", ttl.to_string());
        }
        if self.do_not_replicate {
            query.set("norep", "true");
        }
        if let Some(meta) = &self.meta {
            let meta = serde_json::to_string(meta).map_err(|e| CoreError::Encoding(e.to_string()))?;
            query.set("meta", meta);
        }

        Ok(query)
    }

    fn build_body(&self, config: &Config) -> pubnub_core::Result<Vec<u8>> {
        if self.use_post {
            Ok(self.payload(config)?.into_bytes())
        } else {
            Ok(Vec::new())
        }
    }

    fn http_method(&self) -> HttpMethod {
        if self.use_post {
            HttpMethod::Post
        } else {
            HttpMethod::Get
        }
    }
}

/// The result of a publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishResponse {
    /// Timetoken assigned to the message.
    pub timetoken: i64,
}

#[derive(Deserialize)]
struct PublishEnvelope(i64, String, String);

/// Decode `[1,"Sent","<timetoken>"]`.
pub fn decode_publish(body: &[u8]) -> Result<PublishResponse, ResponseParsingError> {
    let PublishEnvelope(status, description, timetoken) = serde_json::from_slice(body)
        .map_err(|e| ResponseParsingError::from_bytes("error unmarshalling response", body).with_source(e))?;

    if status != 1 {
        return Err(ResponseParsingError::from_bytes(
            format!("publish failed: {}", description),
            body,
        ));
    }

    let timetoken = timetoken
        .parse::<i64>()
        .map_err(|_| ResponseParsingError::from_bytes("error parsing timetoken", body))?;

    Ok(PublishResponse { timetoken })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PUB: &str = "pub-c-071e1a3f-607f-4351-bdd1-73a8eb21ba7c";
    const SUB: &str = "sub-c-5c4fdcc6-c040-11e5-a316-0619f8945a4f";

    fn config() -> Config {
        Config::new(SUB, PUB).with_uuid("me")
    }

    #[test]
    fn test_get_path_carries_message() {
        let publish = Publish::new("ch").message("hey");
        assert_eq!(
            publish.build_path(&config()).unwrap(),
            format!("/publish/{}/{}/0/ch/0/%22hey%22", PUB, SUB)
        );
        assert!(publish.build_body(&config()).unwrap().is_empty());
        assert_eq!(publish.http_method(), HttpMethod::Get);
    }

    #[test]
    fn test_get_path_escapes_commas_in_message() {
        let publish = Publish::new("ch").message(json!(["hey1", "hey2", "hey3"]));
        assert_eq!(
            publish.build_path(&config()).unwrap(),
            format!(
                "/publish/{}/{}/0/ch/0/%5B%22hey1%22%2C%22hey2%22%2C%22hey3%22%5D",
                PUB, SUB
            )
        );
    }

    #[test]
    fn test_post_sends_body() {
        let publish = Publish::new("ch").message(json!({"text": "hi"})).use_post(true);
        assert_eq!(
            publish.build_path(&config()).unwrap(),
            format!("/publish/{}/{}/0/ch/0", PUB, SUB)
        );
        assert_eq!(publish.build_body(&config()).unwrap(), br#"{"text":"hi"}"#);
        assert_eq!(publish.http_method(), HttpMethod::Post);
    }

    #[test]
    fn test_encrypted_message() {
        let config = config().with_cipher_key("enigma");
        let publish = Publish::new("ch").message("hey").use_post(true);

        // "\"hey\"" under "enigma" with the fixed IV
        assert_eq!(
            publish.build_body(&config).unwrap(),
            br#""mCct6TPESNjmVy+NPqtgyA==""#
        );
    }

    #[test]
    fn test_query() {
        let publish = Publish::new("ch")
            .message("hey")
            .sequence(1)
            .should_store(false)
            .ttl(24)
            .do_not_replicate(true)
            .meta(json!({"k": "v"}));
        let query = publish.build_query(&config()).unwrap();

        assert_eq!(query.get("seqn"), Some("1"));
        assert_eq!(query.get("store"), Some("0"));
        assert_eq!(query.get("ttl"), Some("24"));
        assert_eq!(query.get("norep"), Some("true"));
        assert_eq!(query.get("meta"), Some(r#"{"k":"v"}"#));
    }

    #[test]
    fn test_optional_params_absent_by_default() {
        let query = Publish::new("ch").message("hey").build_query(&config()).unwrap();
        for key in ["seqn", "store", "ttl", "norep", "meta"] {
            assert!(!query.contains(key), "{key} should be absent");
        }
    }

    #[test]
    fn test_sequence_or_keeps_explicit_value() {
        let mut explicit = Publish::new("ch").sequence(7);
        explicit.sequence_or(|| 1);
        assert_eq!(explicit.sequence, Some(7));

        let mut implicit = Publish::new("ch");
        implicit.sequence_or(|| 3);
        assert_eq!(implicit.sequence, Some(3));
    }

    #[test]
    fn test_validation() {
        let config = config();
        assert_eq!(
            Publish::new("ch").message("hey").validate(&Config::new(SUB, "")),
            Err(ValidationError::MissingPublishKey(OPERATION))
        );
        assert_eq!(
            Publish::new("").message("hey").validate(&config),
            Err(ValidationError::MissingChannel(OPERATION))
        );
        assert_eq!(
            Publish::new("ch").validate(&config),
            Err(ValidationError::MissingMessage(OPERATION))
        );
        assert_eq!(
            Publish::new("ch").message(Value::Null).validate(&config),
            Err(ValidationError::MissingMessage(OPERATION))
        );
        assert!(Publish::new("ch").message("hey").validate(&config).is_ok());
    }

    #[test]
    fn test_decode_publish() {
        let response = decode_publish(br#"[1,"Sent","14981595400555832"]"#).unwrap();
        assert_eq!(response.timetoken, 14981595400555832);
    }

    #[test]
    fn test_decode_publish_failure_status() {
        let err = decode_publish(br#"[0,"Invalid","0"]"#).unwrap_err();
        assert!(err.message.contains("Invalid"));
    }

    #[test]
    fn test_decode_publish_malformed() {
        assert!(decode_publish(b"{}").is_err());
        assert!(decode_publish(br#"[1,"Sent","abc"]"#).is_err());
        assert!(decode_publish(b"").is_err());
    }
}
