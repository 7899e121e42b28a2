//! # PubNub Transport
//!
//! The seam between request assembly and the network.
//!
//! ## Overview
//!
//! The client hands a [`TransportRequest`] to a [`Transport`] and receives a
//! [`TransportResponse`] holding the status and raw body. Nothing here knows
//! about operations or response formats.
//!
//! - [`memory::StubTransport`] - canned responses and request recording, for tests
//! - `http::ReqwestTransport` - HTTPS via `reqwest` (feature `reqwest`)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pubnub_transport::memory::{Stub, StubTransport};
//!
//! let transport = StubTransport::new(vec![
//!     Stub::get("/v2/history/sub-key/demo/channel/ch")
//!         .ignore_query_keys(&["pnsdk", "uuid"])
//!         .respond(200, "[[],0,0]"),
//! ]);
//! ```

pub mod error;
#[cfg(feature = "reqwest")]
pub mod http;
pub mod transport;

pub use error::{Result, TransportError};
#[cfg(feature = "reqwest")]
pub use http::ReqwestTransport;
pub use transport::{memory, Transport, TransportRequest, TransportResponse};
