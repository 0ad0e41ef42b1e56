//! Offline license issuance and verification.
//!
//! This crate handles:
//! - Generating license claims with defaults and a random id
//! - Sealing claims into a signed, encrypted, versioned envelope
//! - Verifying envelopes: format, signature, decryption, validity window,
//!   machine binding
//! - Loading and saving key material
//! - Collecting the machine fingerprint used for binding
//!
//! # Design Principles
//!
//! - **Offline**: verification needs only the public key, the shared AES key
//!   and the license file
//! - **Layered trust**: the RSA signature covers the ciphertext and proves who
//!   issued it; the AES-GCM tag proves the payload was not altered
//! - **Structured answers**: verification always produces a
//!   [`VerificationResult`]; only unreadable files surface as errors
//! - **Stateless**: keys are immutable values passed into free functions
//!
//! # Envelope Format
//!
//! A JSON object with `data` (base64 nonce-prefixed ciphertext), `signature`
//! (base64 signature over the ciphertext bytes), `algorithm` and `version`.

mod envelope;
mod error;
mod fingerprint;
mod issuer;
mod keys;
mod record;
mod verifier;

pub use envelope::{Envelope, ALGORITHM, FORMAT_VERSION};
pub use error::{ErrorKind, LicenseError, LicenseResult};
pub use fingerprint::{
    hash_cpu_descriptor, Fingerprint, MachineInfo, StaticFingerprint, SystemFingerprint,
};
pub use issuer::{
    generate, generate_at, generate_license_id, issue, seal, GenerateOptions,
    DEFAULT_DURATION_DAYS, DEFAULT_PRODUCT_NAME, DEFAULT_VERSION,
};
pub use keys::{
    load_symmetric_key, save_signing_key, save_symmetric_key, save_verification_key,
    IssuerKeys, KeyPaths, VerifierKeys, PRIVATE_KEY_FILE, PUBLIC_KEY_FILE, SYMMETRIC_KEY_FILE,
};
pub use record::{ExtraValue, LicenseRecord};
pub use verifier::{
    license_info, license_info_file, quick_verify_file, verify, verify_at, verify_file,
    MachineMatch, VerificationResult,
};

pub use lkv_crypto::{CryptoError, SigningKey, SymmetricKey, VerificationKey};
