//! # PubNub
//!
//! Client for the PubNub REST API: signed requests and typed responses.
//!
//! ## Overview
//!
//! Every operation is a small descriptor implementing
//! [`Endpoint`](pubnub_core::Endpoint). The client validates it, assembles
//! and (when a secret key is configured) signs the request, hands it to a
//! [`Transport`](pubnub_transport::Transport) and decodes the response.
//!
//! - **Publish**: send a message, optionally encrypted
//! - **History**: fetch stored messages, decrypting them when a cipher key is set
//! - **Presence state**: attach state to a UUID on channels or groups
//! - **Channel groups**: add and remove channels
//! - **Access manager**: grant and revoke permissions
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pubnub::{Config, History, PubNub, Publish};
//! use pubnub::transport::memory::StubTransport;
//!
//! async fn example() -> pubnub::Result<()> {
//!     let config = Config::new("sub-c-...", "pub-c-...").with_cipher_key("enigma");
//!     let pubnub = PubNub::new(config, StubTransport::default());
//!
//!     pubnub.publish(Publish::new("ch").message("hello")).await?;
//!
//!     let page = pubnub.history(History::new("ch").count(10)).await?;
//!     for record in page.messages {
//!         println!("{:?} {}", record.timetoken, record.message);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `pubnub::core` - Config, request assembly and signing
//! - `pubnub::crypto` - The message cipher
//! - `pubnub::transport` - The transport seam and the stub transport

pub mod access;
pub mod channel_group;
pub mod client;
pub mod error;
pub mod history;
pub mod operation;
pub mod presence;
pub mod publish;

// Re-export component crates
pub use pubnub_core as core;
pub use pubnub_crypto as crypto;
pub use pubnub_transport as transport;

pub use access::{decode_grant, Grant, GrantResponse, Revoke};
pub use channel_group::{
    decode_channel_group, AddChannelsToChannelGroup, ChannelGroupResponse,
    RemoveChannelsFromChannelGroup,
};
pub use client::PubNub;
pub use error::{Error, ParseCause, ResponseParsingError, Result};
pub use history::{decode_history, History, HistoryRecord, HistoryResponse, MAX_COUNT};
pub use operation::{Operation, Response};
pub use presence::{decode_set_state, SetState, SetStateResponse};
pub use publish::{decode_publish, Publish, PublishResponse};

// Re-export commonly used core types
pub use pubnub_core::{Config, Endpoint, OperationKind, RequestTarget, ValidationError};
