//! The versioned, textual license container.
//!
//! ```json
//! {
//!   "data": "<base64 nonce || AES-GCM ciphertext>",
//!   "signature": "<base64 RSA signature over the decoded data bytes>",
//!   "algorithm": "AES256-GCM+RSA2048",
//!   "version": "1.0"
//! }
//! ```
//!
//! Decoding checks structure only. Cryptographic correctness is the
//! verifier's job.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LicenseError, LicenseResult};

/// Envelope format version understood by this build. Exact match required.
pub const FORMAT_VERSION: &str = "1.0";

/// Crypto suite descriptor written into every envelope.
pub const ALGORITHM: &str = "AES256-GCM+RSA2048";

/// A sealed license as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Base64 of the nonce-prefixed ciphertext.
    pub data: String,
    /// Base64 of the signature over the ciphertext bytes.
    pub signature: String,
    pub algorithm: String,
    #[serde(rename = "version")]
    pub format_version: String,
}

impl Envelope {
    /// Encodes the envelope as pretty-printed JSON.
    pub fn encode(&self) -> LicenseResult<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Decodes an envelope, requiring all four fields and non-empty payload
    /// and signature.
    pub fn decode(bytes: &[u8]) -> LicenseResult<Self> {
        let envelope: Self = serde_json::from_slice(bytes).map_err(|e| {
            LicenseError::InvalidFormat(format!("failed to parse license file: {e}"))
        })?;

        if envelope.data.is_empty() {
            return Err(LicenseError::InvalidFormat("empty data field".to_string()));
        }
        if envelope.signature.is_empty() {
            return Err(LicenseError::InvalidFormat(
                "empty signature field".to_string(),
            ));
        }

        Ok(envelope)
    }

    /// Returns true if the envelope declares the format version this build reads.
    #[must_use]
    pub fn is_supported_version(&self) -> bool {
        self.format_version == FORMAT_VERSION
    }

    /// Writes the encoded envelope to `path`, replacing any existing file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> LicenseResult<()> {
        let path = path.as_ref();
        fs::write(path, self.encode()?).map_err(|e| LicenseError::io(path, e))
    }

    /// Reads and decodes an envelope from `path`.
    pub fn read_from_file(path: impl AsRef<Path>) -> LicenseResult<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| LicenseError::io(path, e))?;
        Self::decode(&bytes)
    }
}
