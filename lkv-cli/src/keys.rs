use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lkv_license::{
    load_symmetric_key, save_signing_key, save_symmetric_key, save_verification_key, IssuerKeys,
    KeyPaths, SigningKey, SymmetricKey,
};
use tracing::info;

/// Issuer keys for `lkctl gen`, plus any key files written while obtaining them.
#[derive(Debug)]
pub struct IssuerKeySource {
    pub keys: IssuerKeys,
    pub generated: Vec<PathBuf>,
}

/// Loads the given key files, generating and saving into `keys_dir` whichever
/// key was not supplied.
pub fn load_or_generate_issuer_keys(
    private_key: Option<&Path>,
    aes_key: Option<&Path>,
    keys_dir: &Path,
) -> Result<IssuerKeySource> {
    let paths = KeyPaths::in_dir(keys_dir);
    let mut generated = Vec::new();

    let signing_key = match private_key {
        Some(path) => {
            info!("Loading private key from {:?}", path);
            let pem = fs::read_to_string(path)
                .with_context(|| format!("failed to read private key {}", path.display()))?;
            SigningKey::from_pem(&pem)
                .with_context(|| format!("failed to decode private key {}", path.display()))?
        }
        None => {
            info!("Generating new RSA key pair in {:?}", keys_dir);
            let key = SigningKey::generate().context("failed to generate RSA key pair")?;
            save_signing_key(&key, &paths.private_key).context("failed to save private key")?;
            save_verification_key(&key.verification_key(), &paths.public_key)
                .context("failed to save public key")?;
            generated.push(paths.private_key.clone());
            generated.push(paths.public_key.clone());
            key
        }
    };

    let symmetric_key = match aes_key {
        Some(path) => load_symmetric_key(path)
            .with_context(|| format!("failed to load AES key {}", path.display()))?,
        None => {
            info!("Generating new AES key in {:?}", keys_dir);
            let key = SymmetricKey::generate().context("failed to generate AES key")?;
            save_symmetric_key(&key, &paths.symmetric_key).context("failed to save AES key")?;
            generated.push(paths.symmetric_key.clone());
            key
        }
    };

    Ok(IssuerKeySource {
        keys: IssuerKeys::new(signing_key, symmetric_key),
        generated,
    })
}
