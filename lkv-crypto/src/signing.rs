//! RSA PKCS#1 v1.5 / SHA-256 signing and verification.
//!
//! Private keys are PKCS#8 PEM, public keys are SPKI PEM, matching what
//! `openssl genpkey` and most other toolchains emit.

use crate::error::{CryptoError, CryptoResult};
use rsa::{
    pkcs1v15::{Signature, SigningKey as Pkcs1SigningKey, VerifyingKey as Pkcs1VerifyingKey},
    pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding},
    signature::{SignatureEncoding, Signer as _, Verifier as _},
    RsaPrivateKey, RsaPublicKey,
};
use sha2::Sha256;
use zeroize::Zeroizing;

/// Modulus size of freshly generated signing keys.
pub const RSA_KEY_BITS: usize = 2048;

/// RSA private key used by the issuer. Never leaves the issuing machine.
#[derive(Clone)]
pub struct SigningKey(RsaPrivateKey);

/// RSA public key used by verifiers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationKey(RsaPublicKey);

impl SigningKey {
    /// Generates a new random key with [`RSA_KEY_BITS`] bits.
    pub fn generate() -> CryptoResult<Self> {
        let private = RsaPrivateKey::new(&mut rand::rngs::OsRng, RSA_KEY_BITS)
            .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;
        Ok(Self(private))
    }

    /// Loads a PKCS#8 PEM private key.
    pub fn from_pem(pem: &str) -> CryptoResult<Self> {
        let private =
            RsaPrivateKey::from_pkcs8_pem(pem.trim()).map_err(|e| CryptoError::Pem(e.to_string()))?;
        Ok(Self(private))
    }

    /// Encodes the private key as PKCS#8 PEM.
    pub fn to_pem(&self) -> CryptoResult<Zeroizing<String>> {
        self.0
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| CryptoError::Pem(e.to_string()))
    }

    /// Signs `message` (hashed with SHA-256 first) and returns the raw signature bytes.
    pub fn sign(&self, message: &[u8]) -> CryptoResult<Vec<u8>> {
        let signature = Pkcs1SigningKey::<Sha256>::new(self.0.clone())
            .try_sign(message)
            .map_err(|e| CryptoError::Signing(e.to_string()))?;
        Ok(signature.to_vec())
    }

    /// Returns the matching public key.
    pub fn verification_key(&self) -> VerificationKey {
        VerificationKey(self.0.to_public_key())
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl VerificationKey {
    /// Loads an SPKI PEM public key.
    pub fn from_pem(pem: &str) -> CryptoResult<Self> {
        let public = RsaPublicKey::from_public_key_pem(pem.trim())
            .map_err(|e| CryptoError::Pem(e.to_string()))?;
        Ok(Self(public))
    }

    /// Encodes the public key as SPKI PEM.
    pub fn to_pem(&self) -> CryptoResult<String> {
        self.0
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| CryptoError::Pem(e.to_string()))
    }

    /// Verifies `signature` over `message`.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> CryptoResult<()> {
        let signature =
            Signature::try_from(signature).map_err(|_| CryptoError::SignatureMismatch)?;
        Pkcs1VerifyingKey::<Sha256>::new(self.0.clone())
            .verify(message, &signature)
            .map_err(|_| CryptoError::SignatureMismatch)
    }
}
