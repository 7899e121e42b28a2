//! Transport abstraction for PubNub requests.
//!
//! The transport layer only moves bytes: it receives an assembled request and
//! returns the status code and body. Status interpretation and decoding live
//! in the client.

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

use pubnub_core::{Config, HttpMethod, RequestTarget};

use crate::error::Result;

/// A request ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Complete URL, including the serialized query.
    pub url: String,
    /// Path component.
    pub path: String,
    /// Serialized query, without the leading `?`.
    pub query: String,
    /// Request body. Empty for GET.
    pub body: Vec<u8>,
    /// Whole-request timeout.
    pub timeout: Duration,
    /// Connection establishment timeout.
    pub connect_timeout: Duration,
}

impl TransportRequest {
    /// Build a transport request from an assembled target and the config's timeouts.
    pub fn new(target: &RequestTarget, config: &Config) -> Self {
        Self {
            method: target.method,
            url: target.url(),
            path: target.path.clone(),
            query: target.query.clone(),
            body: target.body.clone(),
            timeout: config.request_timeout(),
            connect_timeout: config.connect_timeout(),
        }
    }

    /// The query as key/value pairs, in transmitted order.
    pub fn query_pairs(&self) -> Vec<(&str, &str)> {
        self.query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
            .collect()
    }

    /// The transmitted value of a query parameter.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query_pairs()
            .into_iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }
}

/// Status code and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Bytes,
}

impl TransportResponse {
    /// Create a response.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body as text, lossily.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Transport trait for executing requests.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and wait for the complete response.
    ///
    /// Non-2xx statuses are returned as responses, not errors.
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse>;
}

/// An in-memory transport for testing.
///
/// Responses are registered as [`Stub`]s and every executed request is
/// recorded so tests can assert on what was (or was not) sent.
pub mod memory {
    use super::*;
    use crate::error::TransportError;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    #[derive(Debug, Clone)]
    enum Reply {
        Respond(TransportResponse),
        Fail(TransportError),
    }

    /// A canned response for requests with a given method, path and query.
    ///
    /// Query parameters are compared as a set of transmitted `key=value`
    /// pairs; parameters listed with [`Stub::ignore_query_keys`] are left
    /// out on both sides.
    #[derive(Debug, Clone)]
    pub struct Stub {
        method: HttpMethod,
        path: String,
        query: Vec<(String, String)>,
        ignored: Vec<String>,
        reply: Reply,
    }

    impl Stub {
        fn new(method: HttpMethod, path: impl Into<String>) -> Self {
            Self {
                method,
                path: path.into(),
                query: Vec::new(),
                ignored: Vec::new(),
                reply: Reply::Respond(TransportResponse::new(200, Bytes::new())),
            }
        }

        /// A stub for a GET request.
        pub fn get(path: impl Into<String>) -> Self {
            Self::new(HttpMethod::Get, path)
        }

        /// A stub for a POST request.
        pub fn post(path: impl Into<String>) -> Self {
            Self::new(HttpMethod::Post, path)
        }

        /// Expect a query parameter with this transmitted value.
        pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
            self.query.push((key.into(), value.into()));
            self
        }

        /// Leave these parameters out of the comparison.
        pub fn ignore_query_keys(mut self, keys: &[&str]) -> Self {
            self.ignored.extend(keys.iter().map(|k| k.to_string()));
            self
        }

        /// Reply with this status and body.
        pub fn respond(mut self, status: u16, body: impl Into<Bytes>) -> Self {
            self.reply = Reply::Respond(TransportResponse::new(status, body));
            self
        }

        /// Fail with this transport error.
        pub fn fail(mut self, error: TransportError) -> Self {
            self.reply = Reply::Fail(error);
            self
        }

        fn matches(&self, request: &TransportRequest) -> bool {
            if self.method != request.method || self.path != request.path {
                return false;
            }

            let keep = |key: &str| !self.ignored.iter().any(|k| k == key);

            let mut expected: Vec<(&str, &str)> = self
                .query
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .filter(|(k, _)| keep(k))
                .collect();
            let mut actual: Vec<(&str, &str)> = request
                .query_pairs()
                .into_iter()
                .filter(|(k, _)| keep(k))
                .collect();

            expected.sort_unstable();
            actual.sort_unstable();
            expected == actual
        }
    }

    #[derive(Debug, Default)]
    struct Inner {
        stubs: Vec<Stub>,
        requests: Vec<TransportRequest>,
    }

    /// Stubbed transport. Clones share stubs and recorded requests.
    #[derive(Debug, Clone, Default)]
    pub struct StubTransport {
        inner: Arc<RwLock<Inner>>,
    }

    impl StubTransport {
        /// Create a transport with these stubs.
        pub fn new(stubs: Vec<Stub>) -> Self {
            Self {
                inner: Arc::new(RwLock::new(Inner {
                    stubs,
                    requests: Vec::new(),
                })),
            }
        }

        /// Register another stub. Earlier stubs take precedence.
        pub async fn add_stub(&self, stub: Stub) {
            self.inner.write().await.stubs.push(stub);
        }

        /// Every request executed so far, in order.
        pub async fn requests(&self) -> Vec<TransportRequest> {
            self.inner.read().await.requests.clone()
        }

        /// Number of requests executed so far.
        pub async fn request_count(&self) -> usize {
            self.inner.read().await.requests.len()
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn execute(&self, request: TransportRequest) -> Result<TransportResponse> {
            let mut inner = self.inner.write().await;
            inner.requests.push(request.clone());

            let reply = inner
                .stubs
                .iter()
                .find(|stub| stub.matches(&request))
                .map(|stub| stub.reply.clone());

            match reply {
                Some(Reply::Respond(response)) => Ok(response),
                Some(Reply::Fail(error)) => Err(error),
                None => {
                    tracing::warn!(method = %request.method, url = %request.url, "no stub matched");
                    Err(TransportError::NoStubMatched {
                        method: request.method.to_string(),
                        url: request.url,
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::{Stub, StubTransport};
    use super::*;
    use crate::error::TransportError;

    fn request(method: HttpMethod, path: &str, query: &str) -> TransportRequest {
        TransportRequest {
            method,
            url: format!("https://ps.pndsn.com{}?{}", path, query),
            path: path.to_string(),
            query: query.to_string(),
            body: Vec::new(),
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_from_target() {
        let config = Config::new("sub-c", "pub-c");
        let target = RequestTarget {
            operation: pubnub_core::OperationKind::History,
            method: HttpMethod::Get,
            host: "ps.pndsn.com".into(),
            path: "/v2/history/sub-key/sub-c/channel/ch".into(),
            query: "count=100&uuid=me".into(),
            body: Vec::new(),
            timestamp: None,
        };

        let request = TransportRequest::new(&target, &config);
        assert_eq!(
            request.url,
            "https://ps.pndsn.com/v2/history/sub-key/sub-c/channel/ch?count=100&uuid=me"
        );
        assert_eq!(request.timeout, Duration::from_secs(10));
        assert_eq!(request.connect_timeout, Duration::from_secs(5));
        assert_eq!(request.query_value("uuid"), Some("me"));
        assert_eq!(request.query_value("auth"), None);
    }

    #[test]
    fn test_response_helpers() {
        let ok = TransportResponse::new(200, "[1,\"Sent\"]");
        assert!(ok.is_success());
        assert_eq!(ok.text(), "[1,\"Sent\"]");
        assert!(!TransportResponse::new(403, "").is_success());
    }

    #[tokio::test]
    async fn test_stub_matches_query_as_set() {
        let transport = StubTransport::new(vec![Stub::get("/v2/history/sub-key/s/channel/ch")
            .query("count", "100")
            .query("reverse", "false")
            .ignore_query_keys(&["pnsdk", "uuid"])
            .respond(200, "[[],0,0]")]);

        let response = transport
            .execute(request(
                HttpMethod::Get,
                "/v2/history/sub-key/s/channel/ch",
                "uuid=me&reverse=false&pnsdk=x&count=100",
            ))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, Bytes::from_static(b"[[],0,0]"));
        assert_eq!(transport.request_count().await, 1);
    }

    #[tokio::test]
    async fn test_stub_rejects_extra_parameter() {
        let transport = StubTransport::new(vec![Stub::get("/p").query("a", "1")]);

        let err = transport
            .execute(request(HttpMethod::Get, "/p", "a=1&b=2"))
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::NoStubMatched { .. }));
        assert_eq!(transport.request_count().await, 1);
    }

    #[tokio::test]
    async fn test_stub_method_must_match() {
        let transport = StubTransport::new(vec![Stub::post("/p")]);
        assert!(transport
            .execute(request(HttpMethod::Get, "/p", ""))
            .await
            .is_err());
        assert!(transport
            .execute(request(HttpMethod::Post, "/p", ""))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_stub_failure() {
        let transport = StubTransport::default();
        transport
            .add_stub(Stub::get("/p").fail(TransportError::Timeout("slow".into())))
            .await;

        let err = transport
            .execute(request(HttpMethod::Get, "/p", ""))
            .await
            .unwrap_err();
        assert_eq!(err, TransportError::Timeout("slow".into()));
    }

    #[tokio::test]
    async fn test_clones_share_recordings() {
        let transport = StubTransport::new(vec![Stub::get("/p")]);
        let clone = transport.clone();

        clone
            .execute(request(HttpMethod::Get, "/p", ""))
            .await
            .unwrap();

        let recorded = transport.requests().await;
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].path, "/p");
    }
}
