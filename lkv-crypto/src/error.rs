//! Error types for the cryptographic primitives.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur in cryptographic operations.
///
/// Messages never carry key bytes or plaintext.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key generation failed (RNG or key construction).
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// Encryption failed.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Decryption failed (wrong key or tampered data).
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// Signing failed.
    #[error("signing failed: {0}")]
    Signing(String),

    /// Signature does not verify against the public key.
    #[error("signature verification failed")]
    SignatureMismatch,

    /// Invalid key length.
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// PEM key could not be encoded or decoded.
    #[error("invalid PEM key: {0}")]
    Pem(String),

    /// Base64 text could not be decoded.
    #[error("invalid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
}
