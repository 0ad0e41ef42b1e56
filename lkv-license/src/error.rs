//! Error types for license issuance and verification.

use std::path::PathBuf;

use lkv_crypto::CryptoError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Licensing-specific errors.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// A license or key file could not be read or written.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Envelope or record structure is malformed.
    #[error("invalid license format: {0}")]
    InvalidFormat(String),

    /// Envelope format version is not the one this build understands.
    #[error("unsupported file format version: {0}")]
    UnsupportedVersion(String),

    /// Signature or AEAD check failed, or a key could not be used.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Current time is before `issued_at`.
    #[error("license is not yet valid")]
    NotYetValid,

    /// Current time is after `expires_at`.
    #[error("license has expired")]
    Expired,

    /// A non-wildcard binding field differs from this machine.
    #[error("machine information does not match")]
    MachineMismatch,

    /// Issuance options are unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse classification used by callers to branch on failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Underlying storage unreadable.
    Io,
    /// Malformed structure, base64 failure, or version mismatch.
    Format,
    /// Signature or authentication-tag failure.
    Crypto,
    /// Temporal bounds or machine binding violated.
    Validation,
    /// Issuance configuration rejected.
    Config,
}

impl LicenseError {
    /// Returns the error classification.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } => ErrorKind::Io,
            Self::InvalidFormat(_) | Self::UnsupportedVersion(_) | Self::Serialization(_) => {
                ErrorKind::Format
            }
            Self::Crypto(CryptoError::Encoding(_)) => ErrorKind::Format,
            Self::Crypto(_) => ErrorKind::Crypto,
            Self::NotYetValid | Self::Expired | Self::MachineMismatch => ErrorKind::Validation,
            Self::InvalidConfig(_) => ErrorKind::Config,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
