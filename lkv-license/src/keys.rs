//! Key material for issuers and verifiers.
//!
//! The issuer holds the RSA private key and the shared AES key. A verifier
//! holds only the RSA public key and the same AES key. Both are immutable
//! values passed by reference into [`crate::issuer`] and [`crate::verifier`].
//!
//! On disk a key set is three files:
//! - `private.pem`: PKCS#8 PEM, mode 0600
//! - `public.pem`: SPKI PEM, mode 0644
//! - `aes.key`: base64 text, mode 0600

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use lkv_crypto::{SigningKey, SymmetricKey, VerificationKey};
use tracing::info;

use crate::error::{LicenseError, LicenseResult};

/// Default private key file name inside a keys directory.
pub const PRIVATE_KEY_FILE: &str = "private.pem";
/// Default public key file name inside a keys directory.
pub const PUBLIC_KEY_FILE: &str = "public.pem";
/// Default symmetric key file name inside a keys directory.
pub const SYMMETRIC_KEY_FILE: &str = "aes.key";

const PRIVATE_MODE: u32 = 0o600;
const PUBLIC_MODE: u32 = 0o644;

/// Locations of the three key files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPaths {
    pub private_key: PathBuf,
    pub public_key: PathBuf,
    pub symmetric_key: PathBuf,
}

impl KeyPaths {
    /// Uses the default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            private_key: dir.join(PRIVATE_KEY_FILE),
            public_key: dir.join(PUBLIC_KEY_FILE),
            symmetric_key: dir.join(SYMMETRIC_KEY_FILE),
        }
    }
}

/// Keys owned by the license issuer.
#[derive(Debug, Clone)]
pub struct IssuerKeys {
    signing_key: SigningKey,
    symmetric_key: SymmetricKey,
}

impl IssuerKeys {
    /// Wraps existing keys.
    pub fn new(signing_key: SigningKey, symmetric_key: SymmetricKey) -> Self {
        Self {
            signing_key,
            symmetric_key,
        }
    }

    /// Generates a fresh RSA keypair and AES key.
    pub fn generate() -> LicenseResult<Self> {
        Ok(Self::new(SigningKey::generate()?, SymmetricKey::generate()?))
    }

    /// Builds issuer keys from a PKCS#8 PEM private key and raw AES key bytes.
    pub fn from_pem(private_pem: &str, symmetric_key: &[u8]) -> LicenseResult<Self> {
        Ok(Self::new(
            SigningKey::from_pem(private_pem)?,
            SymmetricKey::from_slice(symmetric_key)?,
        ))
    }

    /// Loads the private key and AES key files.
    pub fn load(private_key: impl AsRef<Path>, symmetric_key: impl AsRef<Path>) -> LicenseResult<Self> {
        let pem = read_text(private_key.as_ref())?;
        Ok(Self::new(
            SigningKey::from_pem(&pem)?,
            load_symmetric_key(symmetric_key)?,
        ))
    }

    /// Writes all three key files, creating parent directories as needed.
    pub fn save(&self, paths: &KeyPaths) -> LicenseResult<()> {
        let private_pem = self.signing_key.to_pem()?;
        write_file(&paths.private_key, private_pem.as_bytes(), PRIVATE_MODE)?;
        write_file(
            &paths.public_key,
            self.verification_key().to_pem()?.as_bytes(),
            PUBLIC_MODE,
        )?;
        save_symmetric_key(&self.symmetric_key, &paths.symmetric_key)?;

        info!(
            private_key = %paths.private_key.display(),
            public_key = %paths.public_key.display(),
            symmetric_key = %paths.symmetric_key.display(),
            "key set saved"
        );
        Ok(())
    }

    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    pub fn symmetric_key(&self) -> &SymmetricKey {
        &self.symmetric_key
    }

    /// Returns the public verification key.
    pub fn verification_key(&self) -> VerificationKey {
        self.signing_key.verification_key()
    }

    /// Derives the key set a verifier needs for licenses issued with these keys.
    pub fn verifier_keys(&self) -> VerifierKeys {
        VerifierKeys::new(self.verification_key(), self.symmetric_key.clone())
    }
}

/// Keys owned by a license verifier.
#[derive(Debug, Clone)]
pub struct VerifierKeys {
    verification_key: VerificationKey,
    symmetric_key: SymmetricKey,
}

impl VerifierKeys {
    /// Wraps existing keys.
    pub fn new(verification_key: VerificationKey, symmetric_key: SymmetricKey) -> Self {
        Self {
            verification_key,
            symmetric_key,
        }
    }

    /// Builds verifier keys from an SPKI PEM public key and raw AES key bytes.
    pub fn from_pem(public_pem: &str, symmetric_key: &[u8]) -> LicenseResult<Self> {
        Ok(Self::new(
            VerificationKey::from_pem(public_pem)?,
            SymmetricKey::from_slice(symmetric_key)?,
        ))
    }

    /// Builds verifier keys from an SPKI PEM public key and base64 AES key text,
    /// the form in which both are usually embedded into an application.
    pub fn from_embedded(public_pem: &str, symmetric_key_base64: &str) -> LicenseResult<Self> {
        Ok(Self::new(
            VerificationKey::from_pem(public_pem)?,
            SymmetricKey::from_base64(symmetric_key_base64)?,
        ))
    }

    /// Loads the public key and AES key files.
    pub fn load(public_key: impl AsRef<Path>, symmetric_key: impl AsRef<Path>) -> LicenseResult<Self> {
        let pem = read_text(public_key.as_ref())?;
        Ok(Self::new(
            VerificationKey::from_pem(&pem)?,
            load_symmetric_key(symmetric_key)?,
        ))
    }

    /// Loads `public.pem` and `aes.key` from `dir`.
    pub fn load_dir(dir: impl AsRef<Path>) -> LicenseResult<Self> {
        let paths = KeyPaths::in_dir(dir);
        Self::load(&paths.public_key, &paths.symmetric_key)
    }

    pub fn verification_key(&self) -> &VerificationKey {
        &self.verification_key
    }

    pub fn symmetric_key(&self) -> &SymmetricKey {
        &self.symmetric_key
    }
}

/// Reads a base64 AES key file.
pub fn load_symmetric_key(path: impl AsRef<Path>) -> LicenseResult<SymmetricKey> {
    let text = read_text(path.as_ref())?;
    Ok(SymmetricKey::from_base64(&text)?)
}

/// Writes an AES key as base64 text with owner-only permissions.
pub fn save_symmetric_key(key: &SymmetricKey, path: impl AsRef<Path>) -> LicenseResult<()> {
    write_file(path.as_ref(), key.to_base64().as_bytes(), PRIVATE_MODE)
}

/// Writes a public key as SPKI PEM, world-readable.
pub fn save_verification_key(key: &VerificationKey, path: impl AsRef<Path>) -> LicenseResult<()> {
    write_file(path.as_ref(), key.to_pem()?.as_bytes(), PUBLIC_MODE)
}

/// Writes a private key as PKCS#8 PEM with owner-only permissions.
pub fn save_signing_key(key: &SigningKey, path: impl AsRef<Path>) -> LicenseResult<()> {
    write_file(path.as_ref(), key.to_pem()?.as_bytes(), PRIVATE_MODE)
}

fn read_text(path: &Path) -> LicenseResult<String> {
    fs::read_to_string(path).map_err(|e| LicenseError::io(path, e))
}

fn write_file(path: &Path, contents: &[u8], mode: u32) -> LicenseResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| LicenseError::io(parent, e))?;
    }
    let mut file = create_file(path, mode).map_err(|e| LicenseError::io(path, e))?;
    file.write_all(contents).map_err(|e| LicenseError::io(path, e))?;
    // The creation mode only applies to new files.
    set_mode(path, mode)
}

#[cfg(unix)]
fn create_file(path: &Path, mode: u32) -> io::Result<File> {
    use std::fs::OpenOptions;
    use std::os::unix::fs::OpenOptionsExt;

    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(mode)
        .open(path)
}

#[cfg(not(unix))]
fn create_file(path: &Path, _mode: u32) -> io::Result<File> {
    File::create(path)
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> LicenseResult<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|e| LicenseError::io(path, e))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> LicenseResult<()> {
    Ok(())
}
