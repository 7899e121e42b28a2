//! Error types for the cipher.

use thiserror::Error;

/// Errors that can occur while encrypting or decrypting messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// The cipher key is empty.
    #[error("cipher key is empty")]
    EmptyKey,

    /// Encryption failed.
    #[error("encryption error: {0}")]
    EncryptionError(String),

    /// Decryption failed (wrong key or corrupted ciphertext).
    #[error("decryption error: {0}")]
    DecryptionError(String),

    /// The ciphertext is not valid Base64.
    #[error("invalid base64: {0}")]
    InvalidBase64(String),

    /// The decrypted bytes are not UTF-8.
    #[error("decrypted message is not valid UTF-8")]
    InvalidUtf8,
}

/// Result type for cipher operations.
pub type Result<T> = std::result::Result<T, CryptoError>;
