//! The service's legacy message cipher.
//!
//! - Key: the first 32 characters of the lowercase hex SHA-256 of the cipher
//!   key, used as raw bytes (AES-256).
//! - Mode: AES-256-CBC with PKCS#7 padding.
//! - IV: the fixed string `0123456789012345`, or 16 random bytes prepended
//!   to the ciphertext when random IVs are enabled.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::fmt;

use crate::cipher::Cipher;
use crate::error::{CryptoError, Result};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// AES key size in bytes.
pub const KEY_SIZE: usize = 32;

/// CBC initialisation vector size in bytes.
pub const IV_SIZE: usize = 16;

/// IV used when random IVs are disabled.
pub const FIXED_IV: &[u8; IV_SIZE] = b"0123456789012345";

/// The legacy AES-256-CBC cryptor.
#[derive(Clone)]
pub struct LegacyCryptor {
    key: [u8; KEY_SIZE],
    random_iv: bool,
}

impl LegacyCryptor {
    /// Create a cryptor from a cipher key, using the fixed IV.
    pub fn new(cipher_key: &str) -> Result<Self> {
        if cipher_key.is_empty() {
            return Err(CryptoError::EmptyKey);
        }
        Ok(Self {
            key: derive_key(cipher_key),
            random_iv: false,
        })
    }

    /// Enable or disable random IVs.
    pub fn with_random_iv(mut self, random_iv: bool) -> Self {
        self.random_iv = random_iv;
        self
    }

    /// Whether this cryptor prepends a random IV.
    pub fn uses_random_iv(&self) -> bool {
        self.random_iv
    }
}

impl Cipher for LegacyCryptor {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut iv = *FIXED_IV;
        if self.random_iv {
            rand::thread_rng().fill_bytes(&mut iv);
        }

        let ciphertext = Aes256CbcEnc::new_from_slices(&self.key, &iv)
            .map_err(|e| CryptoError::EncryptionError(e.to_string()))?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

        if self.random_iv {
            let mut out = Vec::with_capacity(IV_SIZE + ciphertext.len());
            out.extend_from_slice(&iv);
            out.extend_from_slice(&ciphertext);
            Ok(out)
        } else {
            Ok(ciphertext)
        }
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let (iv, body) = if self.random_iv {
            if ciphertext.len() < IV_SIZE {
                return Err(CryptoError::DecryptionError(
                    "ciphertext shorter than IV".into(),
                ));
            }
            ciphertext.split_at(IV_SIZE)
        } else {
            (&FIXED_IV[..], ciphertext)
        };

        Aes256CbcDec::new_from_slices(&self.key, iv)
            .map_err(|e| CryptoError::DecryptionError(e.to_string()))?
            .decrypt_padded_vec_mut::<Pkcs7>(body)
            .map_err(|e| CryptoError::DecryptionError(e.to_string()))
    }
}

impl fmt::Debug for LegacyCryptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LegacyCryptor(random_iv={})", self.random_iv)
    }
}

/// Derive the AES key from a cipher key.
fn derive_key(cipher_key: &str) -> [u8; KEY_SIZE] {
    let digest = hex::encode(Sha256::digest(cipher_key.as_bytes()));
    let mut key = [0u8; KEY_SIZE];
    key.copy_from_slice(&digest.as_bytes()[..KEY_SIZE]);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vector() {
        let cryptor = LegacyCryptor::new("enigma").unwrap();
        assert_eq!(
            cryptor.encrypt_to_base64("yay!").unwrap(),
            "q/xJqqN6qbiZMXYmiQC1Fw=="
        );
        assert_eq!(
            cryptor.decrypt_from_base64("q/xJqqN6qbiZMXYmiQC1Fw==").unwrap(),
            "yay!"
        );
    }

    #[test]
    fn test_json_string_vector() {
        let cryptor = LegacyCryptor::new("enigma").unwrap();
        assert_eq!(
            cryptor.encrypt_to_base64("\"hey\"").unwrap(),
            "mCct6TPESNjmVy+NPqtgyA=="
        );
    }

    #[test]
    fn test_derive_key() {
        // sha256("enigma") = 67a4f45f0d1d9bc6...
        let key = derive_key("enigma");
        assert_eq!(&key[..16], b"67a4f45f0d1d9bc6");
    }

    #[test]
    fn test_empty_key_rejected() {
        assert_eq!(LegacyCryptor::new("").unwrap_err(), CryptoError::EmptyKey);
    }

    #[test]
    fn test_wrong_key_fails() {
        let right = LegacyCryptor::new("enigma").unwrap();
        let wrong = LegacyCryptor::new("other").unwrap();

        let ciphertext = right.encrypt(b"{\"text\":\"secret\"}").unwrap();
        match wrong.decrypt(&ciphertext) {
            Err(CryptoError::DecryptionError(_)) => {}
            Ok(plaintext) => assert_ne!(plaintext, b"{\"text\":\"secret\"}"),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_random_iv_roundtrip() {
        let cryptor = LegacyCryptor::new("enigma").unwrap().with_random_iv(true);

        let a = cryptor.encrypt(b"\"hey\"").unwrap();
        let b = cryptor.encrypt(b"\"hey\"").unwrap();
        assert_ne!(a, b);
        assert_eq!(a.len(), IV_SIZE + 16);

        assert_eq!(cryptor.decrypt(&a).unwrap(), b"\"hey\"");
        assert_eq!(cryptor.decrypt(&b).unwrap(), b"\"hey\"");
    }

    #[test]
    fn test_random_iv_vector() {
        let cryptor = LegacyCryptor::new("enigma").unwrap().with_random_iv(true);
        assert_eq!(
            cryptor
                .decrypt_from_base64("YWJjZGVmZ2hpamtsbW5vcOJUibh1ctyuLdPhhosV7VQ=")
                .unwrap(),
            "\"hey\""
        );
    }

    #[test]
    fn test_random_iv_too_short() {
        let cryptor = LegacyCryptor::new("enigma").unwrap().with_random_iv(true);
        assert!(matches!(
            cryptor.decrypt(&[0u8; 8]),
            Err(CryptoError::DecryptionError(_))
        ));
    }

    #[test]
    fn test_truncated_ciphertext_fails() {
        let cryptor = LegacyCryptor::new("enigma").unwrap();
        assert!(cryptor.decrypt(&[1u8; 15]).is_err());
    }

    #[test]
    fn test_debug_hides_key() {
        let cryptor = LegacyCryptor::new("enigma").unwrap();
        assert_eq!(format!("{:?}", cryptor), "LegacyCryptor(random_iv=false)");
    }
}
