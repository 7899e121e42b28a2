//! Request assembly: path + query + signature → final request target.
//!
//! The order of steps is fixed because the signature covers the query
//! *before* transmission-time escaping while the wire form needs the escaped
//! values:
//!
//! 1. validate, then obtain path and base query
//! 2. merge the configured filter expression
//! 3. sign (adds `timestamp`) when a secret key is configured
//! 4. percent-encode `meta` (publish) and `state` (set-state)
//! 5. percent-encode `uuid`; `auth` is sent as is
//! 6. serialize, then append `&signature=...`

use crate::config::Config;
use crate::encoding::url_encode;
use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::kind::{HttpMethod, OperationKind};
use crate::query::keys;
use crate::signer::{unix_timestamp, Signer};

/// Scheme every request is sent with.
pub const SCHEME: &str = "https";

/// A fully assembled request, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    /// The operation that produced this request.
    pub operation: OperationKind,
    /// HTTP method.
    pub method: HttpMethod,
    /// Host, from the configured origin.
    pub host: String,
    /// Percent-encoded path.
    pub path: String,
    /// Serialized query, including the signature when signed.
    pub query: String,
    /// Request body.
    pub body: Vec<u8>,
    /// The signing timestamp, when the request was signed.
    pub timestamp: Option<u64>,
}

impl RequestTarget {
    /// The complete URL.
    pub fn url(&self) -> String {
        if self.query.is_empty() {
            format!("{}://{}{}", SCHEME, self.host, self.path)
        } else {
            format!("{}://{}{}?{}", SCHEME, self.host, self.path, self.query)
        }
    }

    /// Whether the request carries a signature.
    pub fn is_signed(&self) -> bool {
        self.timestamp.is_some()
    }

    /// The query as key/value pairs, in transmitted order.
    pub fn query_pairs(&self) -> Vec<(&str, &str)> {
        self.query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
            .collect()
    }
}

/// Assemble a request, capturing the signing timestamp from the wall clock.
///
/// The clock is only read when the request will be signed.
pub fn build_request<E: Endpoint + ?Sized>(config: &Config, endpoint: &E) -> Result<RequestTarget> {
    let timestamp = match Signer::from_config(config) {
        Some(_) => unix_timestamp()?,
        None => 0,
    };
    build_request_at(config, endpoint, timestamp)
}

/// Assemble a request with an explicit signing timestamp.
///
/// The timestamp is ignored when no secret key is configured.
pub fn build_request_at<E: Endpoint + ?Sized>(
    config: &Config,
    endpoint: &E,
    timestamp: u64,
) -> Result<RequestTarget> {
    let operation = endpoint.operation();
    endpoint.validate(config)?;

    let path = endpoint.build_path(config)?;
    let mut query = endpoint.build_query(config)?;
    let body = endpoint.build_body(config)?;

    if let Some(expression) = config.filter_expression() {
        query.set(keys::FILTER_EXPR, expression);
    }

    let mut signature = None;
    let mut signed_at = None;
    if let Some(signer) = Signer::from_config(config) {
        let signed = signer.sign(operation, &path, &query, timestamp)?;
        query = signed.query;
        signature = Some(signed.signature);
        signed_at = Some(signed.timestamp);
    }

    match operation {
        OperationKind::Publish => query.escape_with(keys::META, url_encode),
        OperationKind::SetState => query.escape_with(keys::STATE, url_encode),
        _ => {}
    }

    query.escape_with(keys::UUID, url_encode);

    let mut serialized = query.to_query_string();
    if let Some(signature) = signature {
        serialized.push_str("&signature=");
        serialized.push_str(&signature);
    }

    Ok(RequestTarget {
        operation,
        method: endpoint.http_method(),
        host: config.origin.clone(),
        path,
        query: serialized,
        body,
        timestamp: signed_at,
    })
}
