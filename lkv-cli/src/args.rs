//! Command-line argument definitions.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Duration;
use clap::{Args, Parser, Subcommand, ValueEnum};
use lkv_license::{
    GenerateOptions, VerifierKeys, DEFAULT_DURATION_DAYS, PUBLIC_KEY_FILE, SYMMETRIC_KEY_FILE,
};

/// Environment variable consulted when `--keys-dir` is not given.
pub const KEYS_DIR_ENV: &str = "LKV_KEYS_DIR";

/// Keys directory used when neither the flag nor the environment sets one.
pub const DEFAULT_KEYS_DIR: &str = "keys";

const EXIT_CODES: &str = "\
Exit codes:
  0  License is valid
  1  License is invalid or other error
  2  Argument error";

/// Where a verifier finds its public key and AES key.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct KeyArgs {
    /// Directory holding public.pem and aes.key
    #[arg(long, env = KEYS_DIR_ENV, default_value = DEFAULT_KEYS_DIR)]
    pub keys_dir: PathBuf,

    /// Public key file (overrides --keys-dir)
    #[arg(long)]
    pub public_key: Option<PathBuf>,

    /// AES key file (overrides --keys-dir)
    #[arg(long)]
    pub aes_key: Option<PathBuf>,
}

impl KeyArgs {
    pub fn public_key_path(&self) -> PathBuf {
        self.public_key
            .clone()
            .unwrap_or_else(|| self.keys_dir.join(PUBLIC_KEY_FILE))
    }

    pub fn aes_key_path(&self) -> PathBuf {
        self.aes_key
            .clone()
            .unwrap_or_else(|| self.keys_dir.join(SYMMETRIC_KEY_FILE))
    }

    /// Loads the verifier key pair from the resolved paths.
    pub fn load(&self) -> Result<VerifierKeys> {
        let public_key = self.public_key_path();
        let aes_key = self.aes_key_path();
        VerifierKeys::load(&public_key, &aes_key).with_context(|| {
            format!(
                "failed to load verifier keys; make sure {} and {} exist",
                public_key.display(),
                aes_key.display()
            )
        })
    }
}

/// License key control tool.
#[derive(Parser, Debug)]
#[command(name = "lkctl", version)]
#[command(about = "Generate keys and licenses, inspect machines and licenses")]
pub struct LkctlArgs {
    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print machine information used for license binding
    Get {
        #[arg(value_enum)]
        info: InfoKind,
    },

    /// Generate a new key set
    Keys {
        /// Output directory
        #[arg(long, default_value = ".")]
        output: PathBuf,
    },

    /// Generate a license
    Gen(GenArgs),

    /// Verify a license against this machine
    Verify {
        license: PathBuf,

        #[command(flatten)]
        keys: KeyArgs,
    },

    /// Show the contents of a license without checking time or binding
    Info {
        license: PathBuf,

        #[command(flatten)]
        keys: KeyArgs,
    },
}

/// Machine identifier selector for `lkctl get`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoKind {
    Mac,
    Uuid,
    Cpuid,
    All,
}

/// Options for `lkctl gen`.
#[derive(Args, Debug, Clone)]
pub struct GenArgs {
    /// File the license is written to
    pub output: PathBuf,

    /// Bind to this MAC address
    #[arg(long)]
    pub mac: Option<String>,

    /// Bind to this system UUID
    #[arg(long)]
    pub uuid: Option<String>,

    /// Bind to this CPU id
    #[arg(long)]
    pub cpuid: Option<String>,

    /// Validity period in days
    #[arg(long, default_value_t = DEFAULT_DURATION_DAYS, allow_negative_numbers = true)]
    pub duration: i64,

    /// Customer name
    #[arg(long)]
    pub customer: Option<String>,

    /// Product name
    #[arg(long)]
    pub product: Option<String>,

    /// Product version
    #[arg(long = "version")]
    pub product_version: Option<String>,

    /// Comma-separated list of features
    #[arg(long, value_delimiter = ',')]
    pub features: Vec<String>,

    /// Maximum number of users (0 for unlimited)
    #[arg(long, default_value_t = 0)]
    pub max_users: u32,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,

    /// Directory newly generated key files are saved to
    #[arg(long, env = KEYS_DIR_ENV, default_value = DEFAULT_KEYS_DIR)]
    pub keys_dir: PathBuf,

    /// Existing private key; a new key pair is generated when absent
    #[arg(long)]
    pub private_key: Option<PathBuf>,

    /// Existing AES key; a new key is generated when absent
    #[arg(long)]
    pub aes_key: Option<PathBuf>,
}

impl GenArgs {
    /// Converts the flags into issuance options.
    pub fn options(&self) -> Result<GenerateOptions> {
        let duration = Duration::try_days(self.duration)
            .with_context(|| format!("duration of {} days is out of range", self.duration))?;

        Ok(GenerateOptions {
            product_name: self.product.clone().unwrap_or_default(),
            version: self.product_version.clone().unwrap_or_default(),
            customer_name: self.customer.clone().unwrap_or_default(),
            notes: self.notes.clone().unwrap_or_default(),
            mac: self.mac.clone().unwrap_or_default(),
            uuid: self.uuid.clone().unwrap_or_default(),
            cpu_id: self.cpuid.clone().unwrap_or_default(),
            duration,
            features: self
                .features
                .iter()
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty())
                .collect(),
            max_users: self.max_users,
            extra: Default::default(),
        })
    }
}

/// Standalone license verifier.
#[derive(Parser, Debug)]
#[command(name = "lkverify", version)]
#[command(about = "Verify a license file against this machine")]
#[command(after_help = EXIT_CODES)]
pub struct LkverifyArgs {
    /// License file to verify
    pub license: PathBuf,

    #[command(flatten)]
    pub keys: KeyArgs,

    /// Print the verification result as JSON
    #[arg(long)]
    pub json: bool,

    /// Print nothing; report through the exit code only
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
