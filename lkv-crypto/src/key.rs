//! Symmetric key handling.
//!
//! The license payload key is a random 256-bit AES key shared out of band
//! between issuer and verifier. It is persisted as base64 text.

use crate::encoding::{decode_base64, encode_base64};
use crate::error::{CryptoError, CryptoResult};
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of symmetric keys in bytes (256 bits for AES-256).
pub const KEY_SIZE: usize = 32;

/// A symmetric encryption key with automatic zeroization on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey {
    bytes: [u8; KEY_SIZE],
}

impl SymmetricKey {
    /// Creates a key from raw bytes.
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Creates a key from a slice, rejecting anything that is not exactly
    /// [`KEY_SIZE`] bytes long.
    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        let bytes: [u8; KEY_SIZE] = bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
            expected: KEY_SIZE,
            actual: bytes.len(),
        })?;
        Ok(Self { bytes })
    }

    /// Generates a fresh random key from the OS CSPRNG.
    pub fn generate() -> CryptoResult<Self> {
        let mut bytes = [0u8; KEY_SIZE];
        rand::rngs::OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;
        Ok(Self { bytes })
    }

    /// Decodes a key from its base64 text form. Surrounding whitespace is ignored.
    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        let mut bytes = decode_base64(encoded.trim())?;
        let key = Self::from_slice(&bytes);
        bytes.zeroize();
        key
    }

    /// Encodes the key as base64 text for storage.
    pub fn to_base64(&self) -> String {
        encode_base64(&self.bytes)
    }

    /// Returns the key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}
