//! Proptest generators for property-based testing.

use proptest::prelude::*;
use serde_json::{json, Value};

use pubnub_core::QueryParams;

/// Generate a channel name, including characters that need escaping.
pub fn channel_name() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_ ,\\-\\[\\]\"]{1,24}"
}

/// Generate a query parameter name.
pub fn query_key() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,11}"
}

/// Generate a query parameter value from printable ASCII.
pub fn query_value() -> impl Strategy<Value = String> {
    "[ -~]{0,24}"
}

/// Generate a timetoken in the service's range.
pub fn timetoken() -> impl Strategy<Value = i64> {
    0i64..=20_000_000_000_000_000i64
}

/// Generate a JSON message that is not a timetoken-bearing object.
pub fn json_message() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        "[ -~]{0,16}".prop_map(Value::from),
    ];

    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-s]{1,6}", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

/// Parameters for a signing determinism check.
#[derive(Debug, Clone)]
pub struct QueryParamsInput {
    /// Distinct key/value pairs in insertion order.
    pub pairs: Vec<(String, String)>,
    /// The same pairs in a different order.
    pub shuffled: Vec<(String, String)>,
}

impl QueryParamsInput {
    /// The pairs as a parameter set.
    pub fn query(&self) -> QueryParams {
        self.pairs.iter().cloned().collect()
    }

    /// The shuffled pairs as a parameter set.
    pub fn shuffled_query(&self) -> QueryParams {
        self.shuffled.iter().cloned().collect()
    }
}

impl Arbitrary for QueryParamsInput {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop::collection::btree_map(query_key(), query_value(), 0..10)
            .prop_flat_map(|map| {
                let pairs: Vec<(String, String)> = map.into_iter().collect();
                (Just(pairs.clone()), Just(pairs).prop_shuffle())
            })
            .prop_map(|(pairs, shuffled)| QueryParamsInput { pairs, shuffled })
            .boxed()
    }
}

/// Build a history envelope around `entries`.
pub fn history_envelope(entries: &[Value], start: i64, end: i64) -> String {
    json!([entries, start, end]).to_string()
}
