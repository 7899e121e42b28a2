//! Request signing for the access manager.
//!
//! When a secret key is configured every request carries a `timestamp`
//! parameter and a `signature` computed as
//!
//! ```text
//! HMAC-SHA256(secret, sub_key \n pub_key \n segment \n canonical_query)
//! ```
//!
//! where `segment` is the literal `grant` for access manager operations and
//! the request path otherwise, and `canonical_query` is
//! [`QueryParams::canonical_string`] of the query *including* the timestamp.
//! The digest is Base64 with the URL-safe alphabet.
//!
//! Signing is a pure step: it takes the query by reference and returns a new
//! one with the timestamp added, so the caller decides when the signed form
//! replaces the unsigned one.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::Config;
use crate::error::{CoreError, Result};
use crate::kind::OperationKind;
use crate::query::{keys, QueryParams};

type HmacSha256 = Hmac<Sha256>;

/// Segment signed in place of the path for access manager requests.
pub const GRANT_SEGMENT: &str = "grant";

/// A query with its signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedQuery {
    /// The query with `timestamp` added.
    pub query: QueryParams,
    /// The captured UNIX timestamp, in seconds.
    pub timestamp: u64,
    /// The signature to append to the transmitted query.
    pub signature: String,
}

/// Signs requests with the configured secret key.
#[derive(Clone, Copy)]
pub struct Signer<'a> {
    subscribe_key: &'a str,
    publish_key: &'a str,
    secret_key: &'a str,
}

impl<'a> Signer<'a> {
    /// A signer for this config, or `None` if no secret key is configured.
    pub fn from_config(config: &'a Config) -> Option<Self> {
        config.secret_key().map(|secret_key| Self {
            subscribe_key: &config.subscribe_key,
            publish_key: &config.publish_key,
            secret_key,
        })
    }

    /// Build the string the digest is computed over.
    pub fn signing_input(&self, operation: OperationKind, path: &str, query: &QueryParams) -> String {
        let segment = if operation.is_access_manager() {
            GRANT_SEGMENT
        } else {
            path
        };

        format!(
            "{}\n{}\n{}\n{}",
            self.subscribe_key,
            self.publish_key,
            segment,
            query.canonical_string()
        )
    }

    /// Add `timestamp` to a copy of `query` and sign it.
    pub fn sign(
        &self,
        operation: OperationKind,
        path: &str,
        query: &QueryParams,
        timestamp: u64,
    ) -> Result<SignedQuery> {
        let mut query = query.clone();
        query.set(keys::TIMESTAMP, timestamp.to_string());

        let input = self.signing_input(operation, path, &query);
        tracing::trace!(%operation, input = %input, "signing request");

        let signature = hmac_sha256(self.secret_key, &input)?;

        Ok(SignedQuery {
            query,
            timestamp,
            signature,
        })
    }
}

impl std::fmt::Debug for Signer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("subscribe_key", &self.subscribe_key)
            .field("publish_key", &self.publish_key)
            .finish_non_exhaustive()
    }
}

/// HMAC-SHA256 of `message` keyed by `secret`, Base64 with the URL-safe alphabet.
pub fn hmac_sha256(secret: &str, message: &str) -> Result<String> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes())
        .map_err(|e| CoreError::Signing(e.to_string()))?;
    mac.update(message.as_bytes());
    Ok(URL_SAFE.encode(mac.finalize().into_bytes()))
}

/// Current UNIX time in seconds.
pub fn unix_timestamp() -> Result<u64> {
    seconds_since_epoch(SystemTime::now())
}

/// Seconds from the UNIX epoch to `now`. A clock set before the epoch is a
/// signing error.
pub fn seconds_since_epoch(now: SystemTime) -> Result<u64> {
    now.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| CoreError::Signing(format!("system clock before UNIX epoch: {e}")))
}
