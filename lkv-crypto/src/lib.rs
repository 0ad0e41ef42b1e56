//! Cryptographic primitives for license envelopes.
//!
//! Two independent trust checks protect a license:
//! - **AES-256-GCM** seals the claims; the tag authenticates the payload.
//! - **RSA-2048 PKCS#1 v1.5 over SHA-256** signs the sealed payload and
//!   authenticates the issuer.
//!
//! The symmetric key is a shared secret; the RSA private key stays with the
//! issuer and only the public half is distributed.

mod cipher;
mod encoding;
mod error;
mod key;
mod signing;

pub use cipher::{decrypt, encrypt, open, seal, EncryptedData, NONCE_SIZE, TAG_SIZE};
pub use encoding::{decode_base64, encode_base64};
pub use error::{CryptoError, CryptoResult};
pub use key::{SymmetricKey, KEY_SIZE};
pub use signing::{SigningKey, VerificationKey, RSA_KEY_BITS};
