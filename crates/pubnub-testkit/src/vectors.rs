//! Golden test vectors for deterministic verification.
//!
//! Signing vectors pin the signing string and digest format; cipher vectors
//! pin key derivation, padding and the fixed IV. Both were produced with an
//! independent HMAC and AES implementation.

use pubnub_core::{Config, OperationKind, QueryParams, Signer};
use pubnub_crypto::{Cipher, LegacyCryptor};

/// A signing test vector.
#[derive(Debug, Clone)]
pub struct SigningVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub subscribe_key: &'static str,
    pub publish_key: &'static str,
    pub secret_key: &'static str,
    pub operation: OperationKind,
    /// Request path. Ignored for access manager operations.
    pub path: &'static str,
    /// Query before signing, in arbitrary order.
    pub params: &'static [(&'static str, &'static str)],
    pub timestamp: u64,
    /// Expected URL-safe Base64 signature.
    pub expected_signature: &'static str,
}

/// A cipher test vector.
#[derive(Debug, Clone)]
pub struct CipherVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub cipher_key: &'static str,
    /// When set, the ciphertext starts with its IV and only decryption is checked.
    pub random_iv: bool,
    pub plaintext: &'static str,
    /// Standard Base64 ciphertext.
    pub ciphertext: &'static str,
}

/// Get all signing vectors.
pub fn signing_vectors() -> Vec<SigningVector> {
    vec![
        SigningVector {
            name: "History request signs the path",
            subscribe_key: "sub-c-test",
            publish_key: "pub-c-test",
            secret_key: "sec-c-test",
            operation: OperationKind::History,
            path: "/v2/history/sub-key/sub-c-test/channel/ch",
            params: &[
                ("uuid", "my-uuid"),
                ("reverse", "false"),
                ("pnsdk", "PubNub-Rust/0.1.0"),
                ("include_token", "false"),
                ("count", "100"),
            ],
            timestamp: 1_500_000_000,
            expected_signature: "z4hvZXeS6tV2zBA3FKTHl0CJuCZf7eHckuPiiWNroLk=",
        },
        SigningVector {
            name: "Grant signs the grant segment",
            subscribe_key: "sub-c-test",
            publish_key: "pub-c-test",
            secret_key: "sec-c-test",
            operation: OperationKind::AccessManagerGrant,
            path: "/v2/auth/grant/sub-key/sub-c-test",
            params: &[
                ("w", "1"),
                ("auth", "key1"),
                ("pnsdk", "PubNub-Rust/0.1.0"),
                ("channel", "ch1,ch2"),
                ("r", "1"),
                ("uuid", "my-uuid"),
                ("ttl", "60"),
                ("m", "0"),
            ],
            timestamp: 1_500_000_000,
            expected_signature: "YPGV6aZ0whpy2jAKqtYzojKXsbrKupF6k7-Ysh9QpSA=",
        },
    ]
}

/// Get all cipher vectors.
pub fn cipher_vectors() -> Vec<CipherVector> {
    let fixed = |name: &'static str, plaintext: &'static str, ciphertext: &'static str| CipherVector {
        name,
        cipher_key: "enigma",
        random_iv: false,
        plaintext,
        ciphertext,
    };

    vec![
        fixed("Bare text", "yay!", "q/xJqqN6qbiZMXYmiQC1Fw=="),
        fixed("JSON string", "\"yay!\"", "Wi24KS4pcTzvyuGOHubiXg=="),
        fixed("Short JSON string", "\"hey\"", "mCct6TPESNjmVy+NPqtgyA=="),
        fixed(
            "JSON object spanning two blocks",
            "{\"text\":\"secret\"}",
            "kA4hPduU2jv8gV94joaJfAidc/jIb7nCBRYPLCfN3zw=",
        ),
        fixed("JSON array", "[1,2,3]", "C0A2g6WAPN3OApgZRRpoYw=="),
        fixed("Not JSON", "not json{", "8Q5Qn2OCwRIjMul04BwVbg=="),
        CipherVector {
            name: "Random IV abcdefghijklmnop",
            cipher_key: "enigma",
            random_iv: true,
            plaintext: "\"hey\"",
            ciphertext: "YWJjZGVmZ2hpamtsbW5vcOJUibh1ctyuLdPhhosV7VQ=",
        },
    ]
}

/// Compute the signature for a signing vector.
pub fn compute_signature(vector: &SigningVector) -> String {
    sign_with_params(vector, vector.params)
}

/// Compute a signing vector's signature over a different parameter list.
///
/// Returns an empty string if the vector has no secret key.
pub fn sign_with_params(vector: &SigningVector, params: &[(&str, &str)]) -> String {
    let config = Config::new(vector.subscribe_key, vector.publish_key)
        .with_secret_key(vector.secret_key);
    let query: QueryParams = params.iter().copied().collect();

    Signer::from_config(&config)
        .and_then(|signer| {
            signer
                .sign(vector.operation, vector.path, &query, vector.timestamp)
                .ok()
        })
        .map(|signed| signed.signature)
        .unwrap_or_default()
}

/// Check a cipher vector, returning what was produced.
pub fn check_cipher_vector(vector: &CipherVector) -> (bool, String) {
    let cryptor = match LegacyCryptor::new(vector.cipher_key) {
        Ok(cryptor) => cryptor.with_random_iv(vector.random_iv),
        Err(e) => return (false, e.to_string()),
    };

    if vector.random_iv {
        match cryptor.decrypt_from_base64(vector.ciphertext) {
            Ok(plaintext) => (plaintext == vector.plaintext, plaintext),
            Err(e) => (false, e.to_string()),
        }
    } else {
        match cryptor.encrypt_to_base64(vector.plaintext) {
            Ok(ciphertext) => (ciphertext == vector.ciphertext, ciphertext),
            Err(e) => (false, e.to_string()),
        }
    }
}

/// Verify all golden vectors.
///
/// Returns `(name, matches, produced)` for each vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    let signing = signing_vectors().into_iter().map(|v| {
        let signature = compute_signature(&v);
        (v.name.to_string(), signature == v.expected_signature, signature)
    });

    let cipher = cipher_vectors().into_iter().map(|v| {
        let (matches, produced) = check_cipher_vector(&v);
        (v.name.to_string(), matches, produced)
    });

    signing.chain(cipher).collect()
}
