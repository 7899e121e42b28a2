//! # PubNub Core
//!
//! The request pipeline shared by every PubNub operation.
//!
//! This crate contains no I/O. It turns an operation descriptor and a
//! [`Config`] into a [`RequestTarget`]: a path, a serialized query and,
//! when a secret key is configured, a signature.
//!
//! ## Key Types
//!
//! - [`Endpoint`] - The capability contract every operation satisfies
//! - [`QueryParams`] - Unordered parameter set with a canonical rendering
//! - [`Signer`] - HMAC-SHA256 access manager signatures
//! - [`RequestTarget`] - The assembled request
//!
//! ## Pipeline
//!
//! ```text
//! Endpoint ──▶ path + query ──▶ filter-expr ──▶ sign ──▶ escape ──▶ RequestTarget
//! ```
//!
//! See [`request`] for the exact ordering rules.

pub mod config;
pub mod encoding;
pub mod endpoint;
pub mod error;
pub mod kind;
pub mod query;
pub mod request;
pub mod signer;

pub use config::Config;
pub use encoding::{encode_list, pam_encode, url_encode};
pub use endpoint::{require_publish_key, require_subscribe_key, Endpoint};
pub use error::{CoreError, Result, ValidationError};
pub use kind::{HttpMethod, OperationKind};
pub use query::{default_query, parse_numeric, sdk_identifier, QueryParams};
pub use request::{build_request, build_request_at, RequestTarget};
pub use signer::{hmac_sha256, seconds_since_epoch, unix_timestamp, SignedQuery, Signer};
