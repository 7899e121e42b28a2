//! The cipher capability.
//!
//! Messages travel as JSON strings holding Base64 ciphertext. The trait's
//! provided methods handle that envelope so implementations only deal with
//! raw bytes.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{CryptoError, Result};

/// Symmetric encryption of message payloads.
///
/// Implementations must be thread-safe so one cipher can serve concurrent
/// decoders.
pub trait Cipher: Send + Sync {
    /// Encrypt raw bytes.
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Decrypt raw bytes.
    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>>;

    /// Encrypt a string and Base64-encode the ciphertext.
    fn encrypt_to_base64(&self, plaintext: &str) -> Result<String> {
        let ciphertext = self.encrypt(plaintext.as_bytes())?;
        Ok(STANDARD.encode(ciphertext))
    }

    /// Base64-decode and decrypt a ciphertext into a string.
    fn decrypt_from_base64(&self, encoded: &str) -> Result<String> {
        let ciphertext = STANDARD
            .decode(encoded.trim())
            .map_err(|e| CryptoError::InvalidBase64(e.to_string()))?;
        let plaintext = self.decrypt(&ciphertext)?;
        String::from_utf8(plaintext).map_err(|_| CryptoError::InvalidUtf8)
    }
}
