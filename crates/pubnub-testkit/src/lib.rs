//! # PubNub Testkit
//!
//! Testing utilities for the PubNub client.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: signatures and ciphertexts pinned by an independent implementation
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: a client wired to a stub transport, plus shared keysets
//!
//! ## Golden Vectors
//!
//! ```rust
//! use pubnub_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, produced) in verify_all_vectors() {
//!     assert!(matches, "{name}: {produced}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use pubnub_testkit::generators::QueryParamsInput;
//!
//! proptest! {
//!     #[test]
//!     fn canonical_order(input: QueryParamsInput) {
//!         prop_assert_eq!(
//!             input.query().canonical_string(),
//!             input.shuffled_query().canonical_string()
//!         );
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust,ignore
//! use pubnub_testkit::fixtures::{get_stub, TestFixture};
//!
//! let fixture = TestFixture::pam(vec![
//!     get_stub("/v2/history/sub-key/sub-c-test/channel/ch").respond(200, "[[],0,0]"),
//! ]);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{demo_config, get_stub, init_tracing, pam_config, TestFixture};
pub use generators::{history_envelope, QueryParamsInput};
pub use vectors::{
    cipher_vectors, signing_vectors, verify_all_vectors, CipherVector, SigningVector,
};
