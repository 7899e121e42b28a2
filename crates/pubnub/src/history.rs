//! Fetch stored messages for a channel, and decode the history envelope.
//!
//! The service answers with a 3-element array:
//!
//! ```text
//! [ [entry, entry, ...], start_timetoken, end_timetoken ]
//! ```
//!
//! Entries vary in shape. Decoding walks the envelope in stages and fails
//! atomically: either every entry becomes a [`HistoryRecord`] or an error is
//! returned and no records are.
//!
//! Per entry, when a cipher is configured the entry must be a ciphertext
//! string or an object with a `pn_other` ciphertext; the plaintext is parsed
//! as JSON. The (possibly decrypted) value then becomes a record:
//!
//! - an object with a non-null `timetoken` yields that timetoken, and the other
//!   keys as the message (a single key's value, or an object of several);
//! - anything else is the message as is, with no timetoken.

use serde_json::{Map, Value};

use pubnub_core::{
    default_query, parse_numeric, require_subscribe_key, url_encode, Config, Endpoint,
    OperationKind, QueryParams, ValidationError,
};
use pubnub_crypto::Cipher;

use crate::error::ResponseParsingError;

const OPERATION: OperationKind = OperationKind::History;

/// Largest page the service returns.
pub const MAX_COUNT: u32 = 100;

const TIMETOKEN_KEY: &str = "timetoken";
const CIPHERTEXT_KEY: &str = "pn_other";

/// A history request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    channel: String,
    start: Option<String>,
    end: Option<String>,
    count: Option<u32>,
    reverse: bool,
    include_timetoken: bool,
}

impl History {
    /// Fetch history for `channel`.
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            ..Default::default()
        }
    }

    /// Timetoken to start from (exclusive), as a decimal string.
    pub fn start(mut self, timetoken: impl Into<String>) -> Self {
        self.start = Some(timetoken.into());
        self
    }

    /// Timetoken to stop at (inclusive), as a decimal string.
    pub fn end(mut self, timetoken: impl Into<String>) -> Self {
        self.end = Some(timetoken.into());
        self
    }

    /// Number of messages, 1 to [`MAX_COUNT`]. Anything else asks for the maximum.
    pub fn count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    /// Traverse from oldest to newest.
    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Ask the service to include each message's timetoken.
    pub fn include_timetoken(mut self, include: bool) -> Self {
        self.include_timetoken = include;
        self
    }

    fn effective_count(&self) -> u32 {
        match self.count {
            Some(count) if (1..=MAX_COUNT).contains(&count) => count,
            _ => MAX_COUNT,
        }
    }
}

impl Endpoint for History {
    fn operation(&self) -> OperationKind {
        OPERATION
    }

    fn validate(&self, config: &Config) -> Result<(), ValidationError> {
        require_subscribe_key(config, OPERATION)?;
        if self.channel.is_empty() {
            return Err(ValidationError::MissingChannel(OPERATION));
        }
        Ok(())
    }

    fn build_path(&self, config: &Config) -> pubnub_core::Result<String> {
        Ok(format!(
            "/v2/history/sub-key/{}/channel/{}",
            config.subscribe_key,
            url_encode(&self.channel)
        ))
    }

    fn build_query(&self, config: &Config) -> pubnub_core::Result<QueryParams> {
        let mut query = default_query(config);

        if let Some(start) = self.start.as_deref().filter(|s| !s.is_empty()) {
            query.set("start", parse_numeric(OPERATION, "start", start)?);
        }
        if let Some(end) = self.end.as_deref().filter(|s| !s.is_empty()) {
            query.set("end", parse_numeric(OPERATION, "end", end)?);
        }

        query.set("count", self.effective_count().to_string());
        query.set("reverse", self.reverse.to_string());
        query.set("include_token", self.include_timetoken.to_string());

        Ok(query)
    }
}

/// One stored message.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    /// The decoded (and decrypted) message.
    pub message: Value,
    /// The message's timetoken, when the entry carried one.
    pub timetoken: Option<i64>,
}

/// A page of history.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryResponse {
    /// Records in the order the service returned them.
    pub messages: Vec<HistoryRecord>,
    /// Timetoken of the first message in the page.
    pub start_timetoken: i64,
    /// Timetoken of the last message in the page.
    pub end_timetoken: i64,
}

/// Decode a history envelope, decrypting entries when `cipher` is given.
pub fn decode_history(
    body: &[u8],
    cipher: Option<&dyn Cipher>,
) -> Result<HistoryResponse, ResponseParsingError> {
    let envelope: Value = serde_json::from_slice(body).map_err(|e| {
        ResponseParsingError::from_bytes("error unmarshalling response", body).with_source(e)
    })?;

    let parts = match envelope {
        Value::Array(parts) if parts.len() == 3 => parts,
        _ => {
            return Err(ResponseParsingError::from_bytes(
                "expected a 3-element array",
                body,
            ))
        }
    };

    let entries = parts[0].as_array().ok_or_else(|| {
        ResponseParsingError::from_bytes("expected an array of messages", body)
    })?;

    let messages = entries
        .iter()
        .map(|entry| decode_entry(entry, cipher))
        .collect::<Result<Vec<_>, _>>()?;

    let start_timetoken = timetoken_from(&parts[1])
        .ok_or_else(|| ResponseParsingError::from_bytes("error parsing start timetoken", body))?;
    let end_timetoken = timetoken_from(&parts[2])
        .ok_or_else(|| ResponseParsingError::from_bytes("error parsing end timetoken", body))?;

    Ok(HistoryResponse {
        messages,
        start_timetoken,
        end_timetoken,
    })
}

fn decode_entry(
    entry: &Value,
    cipher: Option<&dyn Cipher>,
) -> Result<HistoryRecord, ResponseParsingError> {
    let value = match cipher {
        Some(cipher) => decrypt_entry(entry, cipher)?,
        None => entry.clone(),
    };

    match value {
        Value::Object(map) if has_timetoken(&map) => record_with_timetoken(map),
        // Anything else is kept as the message, booleans and null included.
        message => Ok(HistoryRecord {
            message,
            timetoken: None,
        }),
    }
}

fn decrypt_entry(entry: &Value, cipher: &dyn Cipher) -> Result<Value, ResponseParsingError> {
    let ciphertext = match entry {
        Value::String(ciphertext) => ciphertext,
        Value::Object(map) => match map.get(CIPHERTEXT_KEY) {
            Some(Value::String(ciphertext)) => ciphertext,
            _ => return Err(empty_message(entry)),
        },
        _ => return Err(empty_message(entry)),
    };

    let plaintext = cipher.decrypt_from_base64(ciphertext).map_err(|e| {
        ResponseParsingError::new("error decrypting message", ciphertext.as_str()).with_source(e)
    })?;

    serde_json::from_str(&plaintext).map_err(|e| {
        ResponseParsingError::new("error unmarshalling decrypted message", plaintext.as_str())
            .with_source(e)
    })
}

fn empty_message(entry: &Value) -> ResponseParsingError {
    ResponseParsingError::new("decryption error: message is empty", entry.to_string())
}

/// A `null` timetoken counts as absent.
fn has_timetoken(map: &Map<String, Value>) -> bool {
    map.get(TIMETOKEN_KEY).is_some_and(|t| !t.is_null())
}

fn record_with_timetoken(mut map: Map<String, Value>) -> Result<HistoryRecord, ResponseParsingError> {
    let raw = map.remove(TIMETOKEN_KEY).unwrap_or(Value::Null);
    let timetoken = timetoken_from(&raw).ok_or_else(|| {
        ResponseParsingError::new("error parsing message timetoken", raw.to_string())
    })?;

    let message = if map.len() > 1 {
        Value::Object(map)
    } else {
        map.into_iter().next().map(|(_, v)| v).unwrap_or(Value::Null)
    };

    Ok(HistoryRecord {
        message,
        timetoken: Some(timetoken),
    })
}

/// Read a timetoken from a JSON number, truncating non-integral values.
///
/// Numbers outside the `i64` range are rejected.
fn timetoken_from(value: &Value) -> Option<i64> {
    let Value::Number(n) = value else {
        return None;
    };

    if let Some(timetoken) = n.as_i64() {
        return Some(timetoken);
    }
    if n.is_u64() {
        return None;
    }
    n.as_f64()
        .filter(|f| f.is_finite() && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
        .map(|f| f as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pubnub_core::CoreError;
    use pubnub_crypto::LegacyCryptor;
    use serde_json::json;

    fn decode(body: &str) -> Result<HistoryResponse, ResponseParsingError> {
        decode_history(body.as_bytes(), None)
    }

    #[test]
    fn test_query_defaults() {
        let config = Config::new("sub-c", "pub-c").with_uuid("me");
        let query = History::new("ch").build_query(&config).unwrap();

        assert_eq!(query.get("count"), Some("100"));
        assert_eq!(query.get("reverse"), Some("false"));
        assert_eq!(query.get("include_token"), Some("false"));
        assert!(!query.contains("start"));
        assert!(!query.contains("end"));
    }

    #[test]
    fn test_query_options() {
        let config = Config::new("sub-c", "pub-c");
        let query = History::new("ch")
            .start("15000000000000000")
            .end("0015100000000000000")
            .count(20)
            .reverse(true)
            .include_timetoken(true)
            .build_query(&config)
            .unwrap();

        assert_eq!(query.get("start"), Some("15000000000000000"));
        assert_eq!(query.get("end"), Some("15100000000000000"));
        assert_eq!(query.get("count"), Some("20"));
        assert_eq!(query.get("reverse"), Some("true"));
        assert_eq!(query.get("include_token"), Some("true"));
    }

    #[test]
    fn test_count_out_of_range_uses_max() {
        let config = Config::new("sub-c", "pub-c");
        for count in [0, 101, 5000] {
            let query = History::new("ch").count(count).build_query(&config).unwrap();
            assert_eq!(query.get("count"), Some("100"));
        }
    }

    #[test]
    fn test_non_numeric_start_fails() {
        let config = Config::new("sub-c", "pub-c");
        let err = History::new("ch").start("yesterday").build_query(&config).unwrap_err();
        assert!(matches!(err, CoreError::InvalidParameter { name: "start", .. }));

        let err = History::new("ch").end("1.5").build_query(&config).unwrap_err();
        assert!(matches!(err, CoreError::InvalidParameter { name: "end", .. }));
    }

    #[test]
    fn test_path_escapes_channel() {
        let config = Config::new("sub-c", "pub-c");
        assert_eq!(
            History::new("my ch/1").build_path(&config).unwrap(),
            "/v2/history/sub-key/sub-c/channel/my%20ch%2F1"
        );
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            History::new("ch").validate(&Config::new("", "pub-c")),
            Err(ValidationError::MissingSubscribeKey(OPERATION))
        );
        assert_eq!(
            History::new("").validate(&Config::new("sub-c", "")),
            Err(ValidationError::MissingChannel(OPERATION))
        );
        assert!(History::new("ch").validate(&Config::new("sub-c", "")).is_ok());
    }

    #[test]
    fn test_decode_scalars() {
        let response = decode(r#"[["hey1",1111],5,10]"#).unwrap();

        assert_eq!(
            response.messages,
            vec![
                HistoryRecord {
                    message: json!("hey1"),
                    timetoken: None
                },
                HistoryRecord {
                    message: json!(1111),
                    timetoken: None
                },
            ]
        );
        assert_eq!(response.start_timetoken, 5);
        assert_eq!(response.end_timetoken, 10);
    }

    #[test]
    fn test_decode_timetoken_entry() {
        let response = decode(r#"[[{"timetoken":123,"m":"x"}],5,10]"#).unwrap();
        assert_eq!(
            response.messages,
            vec![HistoryRecord {
                message: json!("x"),
                timetoken: Some(123)
            }]
        );
    }

    #[test]
    fn test_decode_timetoken_entry_with_several_keys() {
        let response = decode(r#"[[{"timetoken":1,"a":1,"b":[2]}],0,0]"#).unwrap();
        assert_eq!(response.messages[0].message, json!({"a": 1, "b": [2]}));
        assert_eq!(response.messages[0].timetoken, Some(1));
    }

    #[test]
    fn test_decode_timetoken_entry_without_message() {
        let response = decode(r#"[[{"timetoken":1}],0,0]"#).unwrap();
        assert_eq!(response.messages[0].message, Value::Null);
    }

    #[test]
    fn test_decode_include_token_shape() {
        let body = r#"[[{"message":{"text":"hi"},"timetoken":14981595400555832}],
                       14981595400555832,14981595400555832]"#;
        let response = decode(body).unwrap();

        assert_eq!(response.messages[0].message, json!({"text": "hi"}));
        assert_eq!(response.messages[0].timetoken, Some(14981595400555832));
        assert_eq!(response.start_timetoken, 14981595400555832);
    }

    #[test]
    fn test_decode_mixed_entries_are_independent() {
        let body = r#"[["a",{"plain":"object"},[1,2],{"timetoken":7,"m":"b"}],1,2]"#;
        let response = decode(body).unwrap();

        let messages: Vec<_> = response.messages.iter().map(|r| r.message.clone()).collect();
        assert_eq!(
            messages,
            vec![json!("a"), json!({"plain": "object"}), json!([1, 2]), json!("b")]
        );
        assert_eq!(response.messages[1].timetoken, None);
        assert_eq!(response.messages[3].timetoken, Some(7));
    }

    #[test]
    fn test_decode_null_timetoken_is_absent() {
        let response = decode(r#"[[{"timetoken":null,"m":"x"}],1,2]"#).unwrap();
        assert_eq!(
            response.messages,
            vec![HistoryRecord {
                message: json!({"timetoken": null, "m": "x"}),
                timetoken: None
            }]
        );
    }

    #[test]
    fn test_decode_rejects_timetokens_beyond_i64() {
        let err = decode("[[],18446744073709551615,1]").unwrap_err();
        assert_eq!(err.message, "error parsing start timetoken");

        let err = decode(r#"[[{"timetoken":9223372036854775808,"m":"x"}],1,2]"#).unwrap_err();
        assert_eq!(err.message, "error parsing message timetoken");

        let err = decode("[[],1,1e300]").unwrap_err();
        assert_eq!(err.message, "error parsing end timetoken");

        let response = decode("[[],9223372036854775807,1]").unwrap();
        assert_eq!(response.start_timetoken, i64::MAX);
    }

    #[test]
    fn test_decode_null_and_bool_pass_through() {
        let response = decode(r#"[[null,true],0,0]"#).unwrap();
        assert_eq!(response.messages.len(), 2);
        assert_eq!(response.messages[0].message, Value::Null);
        assert_eq!(response.messages[1].message, json!(true));
    }

    #[test]
    fn test_decode_truncates_float_timetokens() {
        let response = decode(r#"[[{"timetoken":12.9,"m":"x"}],5.7,10.2]"#).unwrap();
        assert_eq!(response.messages[0].timetoken, Some(12));
        assert_eq!(response.start_timetoken, 5);
        assert_eq!(response.end_timetoken, 10);
    }

    #[test]
    fn test_decode_empty_page() {
        let response = decode("[[],0,0]").unwrap();
        assert!(response.messages.is_empty());
    }

    #[test]
    fn test_malformed_envelopes() {
        for body in [
            "",
            "not json",
            r#"{"messages":[]}"#,
            "[]",
            r#"[["a"],1]"#,
            r#"[["a"],1,2,3]"#,
            r#"["a",1,2]"#,
            r#"[["a"],"1",2]"#,
            r#"[["a"],1,null]"#,
        ] {
            let err = decode(body).unwrap_err();
            assert_eq!(err.body, body, "body not preserved for {body:?}");
        }
    }

    #[test]
    fn test_invalid_entry_timetoken_fails_whole_decode() {
        let err = decode(r#"[["ok",{"timetoken":"abc","m":"x"}],1,2]"#).unwrap_err();
        assert_eq!(err.message, "error parsing message timetoken");
    }

    #[test]
    fn test_decrypt_plain_ciphertext() {
        let cryptor = LegacyCryptor::new("enigma").unwrap();
        let body = r#"[["mCct6TPESNjmVy+NPqtgyA==","kA4hPduU2jv8gV94joaJfAidc/jIb7nCBRYPLCfN3zw="],1,2]"#;

        let response = decode_history(body.as_bytes(), Some(&cryptor)).unwrap();

        assert_eq!(response.messages[0].message, json!("hey"));
        assert_eq!(response.messages[1].message, json!({"text": "secret"}));
    }

    #[test]
    fn test_decrypt_pn_other() {
        let cryptor = LegacyCryptor::new("enigma").unwrap();
        let body = r#"[[{"pn_other":"C0A2g6WAPN3OApgZRRpoYw=="}],1,2]"#;

        let response = decode_history(body.as_bytes(), Some(&cryptor)).unwrap();
        assert_eq!(response.messages[0].message, json!([1, 2, 3]));
    }

    #[test]
    fn test_decrypt_rejects_other_shapes() {
        let cryptor = LegacyCryptor::new("enigma").unwrap();
        for body in [r#"[[{"text":"plain"}],1,2]"#, "[[42],1,2]", r#"[[{"pn_other":7}],1,2]"#] {
            let err = decode_history(body.as_bytes(), Some(&cryptor)).unwrap_err();
            assert_eq!(err.message, "decryption error: message is empty");
        }
    }

    #[test]
    fn test_decrypt_wrong_key_fails() {
        let cryptor = LegacyCryptor::new("not-enigma").unwrap();
        let body = r#"[["kA4hPduU2jv8gV94joaJfAidc/jIb7nCBRYPLCfN3zw="],1,2]"#;
        assert!(decode_history(body.as_bytes(), Some(&cryptor)).is_err());
    }

    #[test]
    fn test_decrypted_plaintext_must_be_json() {
        let cryptor = LegacyCryptor::new("enigma").unwrap();
        // "not json{" under "enigma"
        let body = r#"[["8Q5Qn2OCwRIjMul04BwVbg=="],1,2]"#;

        let err = decode_history(body.as_bytes(), Some(&cryptor)).unwrap_err();
        assert_eq!(err.message, "error unmarshalling decrypted message");
        assert_eq!(err.body, "not json{");
    }
}

#[cfg(test)]
mod props {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn count_always_within_page(count in any::<u32>()) {
            let config = Config::new("sub-c", "pub-c");
            let query = History::new("ch").count(count).build_query(&config).unwrap();
            let sent: u32 = query.get("count").unwrap().parse().unwrap();

            prop_assert!((1..=MAX_COUNT).contains(&sent));
            if (1..=MAX_COUNT).contains(&count) {
                prop_assert_eq!(sent, count);
            }
        }

        #[test]
        fn timetoken_entries_split_cleanly(
            timetoken in 0i64..=i64::MAX,
            text in "[ -~]{0,16}",
        ) {
            let body = serde_json::json!([[{"message": text.clone(), "timetoken": timetoken}], 0, 0]);
            let response = decode_history(body.to_string().as_bytes(), None).unwrap();

            prop_assert_eq!(response.messages[0].timetoken, Some(timetoken));
            prop_assert_eq!(&response.messages[0].message, &Value::String(text));
        }
    }
}
