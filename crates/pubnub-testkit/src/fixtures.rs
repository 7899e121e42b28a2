//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Once;

use pubnub::PubNub;
use pubnub_core::Config;
use pubnub_transport::memory::{Stub, StubTransport};
use pubnub_transport::TransportRequest;

/// Publish key of the public demo keyset.
pub const DEMO_PUBLISH_KEY: &str = "pub-c-071e1a3f-607f-4351-bdd1-73a8eb21ba7c";

/// Subscribe key of the public demo keyset.
pub const DEMO_SUBSCRIBE_KEY: &str = "sub-c-5c4fdcc6-c040-11e5-a316-0619f8945a4f";

/// Keyset used for signed (access manager) fixtures.
pub const PAM_PUBLISH_KEY: &str = "pub-c-test";
pub const PAM_SUBSCRIBE_KEY: &str = "sub-c-test";
pub const PAM_SECRET_KEY: &str = "sec-c-test";

/// UUID every fixture config uses.
pub const FIXTURE_UUID: &str = "my-uuid";

/// Query keys whose values vary between runs or SDK versions.
pub const VOLATILE_QUERY_KEYS: &[&str] = &["pnsdk", "uuid"];

/// As [`VOLATILE_QUERY_KEYS`], plus the keys signing adds.
pub const SIGNED_VOLATILE_QUERY_KEYS: &[&str] = &["pnsdk", "uuid", "timestamp", "signature"];

/// Demo keyset, no secret key.
pub fn demo_config() -> Config {
    Config::new(DEMO_SUBSCRIBE_KEY, DEMO_PUBLISH_KEY).with_uuid(FIXTURE_UUID)
}

/// Keyset with a secret key; every request is signed.
pub fn pam_config() -> Config {
    Config::new(PAM_SUBSCRIBE_KEY, PAM_PUBLISH_KEY)
        .with_secret_key(PAM_SECRET_KEY)
        .with_uuid(FIXTURE_UUID)
}

/// A client wired to a stub transport.
pub struct TestFixture {
    pub client: PubNub<StubTransport>,
    pub transport: StubTransport,
}

impl TestFixture {
    /// Create a fixture with the given config and stubs.
    pub fn new(config: Config, stubs: Vec<Stub>) -> Self {
        let transport = StubTransport::new(stubs);
        Self {
            client: PubNub::new(config, transport.clone()),
            transport,
        }
    }

    /// A fixture on the demo keyset.
    pub fn demo(stubs: Vec<Stub>) -> Self {
        Self::new(demo_config(), stubs)
    }

    /// A fixture on the signed keyset.
    pub fn pam(stubs: Vec<Stub>) -> Self {
        Self::new(pam_config(), stubs)
    }

    /// Requests the client has sent so far.
    pub async fn requests(&self) -> Vec<TransportRequest> {
        self.transport.requests().await
    }

    /// Number of requests the client has sent so far.
    pub async fn request_count(&self) -> usize {
        self.transport.request_count().await
    }
}

/// A GET stub that ignores the volatile query keys.
pub fn get_stub(path: impl Into<String>) -> Stub {
    Stub::get(path).ignore_query_keys(SIGNED_VOLATILE_QUERY_KEYS)
}

/// Route `tracing` output to the test harness. Safe to call from every test.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing_subscriber::filter::LevelFilter::TRACE)
            .try_init();
    });
}
