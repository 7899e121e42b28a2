//! # PubNub Crypto
//!
//! End-to-end message encryption for the PubNub client.
//!
//! ## Overview
//!
//! Published messages may be encrypted with a shared cipher key before they
//! leave the client. Stored messages then come back from history as JSON
//! strings holding Base64 ciphertext, and the history decoder uses a
//! [`Cipher`] to recover the original JSON.
//!
//! ## Key Types
//!
//! - [`Cipher`] - The encryption capability consumed by decoders
//! - [`LegacyCryptor`] - AES-256-CBC with the service's key derivation
//!
//! ## Usage
//!
//! ```rust
//! use pubnub_crypto::{Cipher, LegacyCryptor};
//!
//! let cryptor = LegacyCryptor::new("enigma").unwrap();
//! let ciphertext = cryptor.encrypt_to_base64("\"hello\"").unwrap();
//! assert_eq!(cryptor.decrypt_from_base64(&ciphertext).unwrap(), "\"hello\"");
//! ```

pub mod cipher;
pub mod cryptor;
pub mod error;

pub use cipher::Cipher;
pub use cryptor::{LegacyCryptor, FIXED_IV, IV_SIZE, KEY_SIZE};
pub use error::{CryptoError, Result};
