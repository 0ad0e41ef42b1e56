//! License generation and sealing.
//!
//! Sealing encrypts the canonical record bytes and then signs the resulting
//! ciphertext, never the plaintext. The signature therefore authenticates the
//! issuer of the sealed payload; the AEAD tag authenticates the payload itself.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use lkv_crypto::{encode_base64, seal as aead_seal, CryptoError};
use rand::RngCore;
use tracing::{debug, info};

use crate::envelope::{Envelope, ALGORITHM, FORMAT_VERSION};
use crate::error::{LicenseError, LicenseResult};
use crate::keys::IssuerKeys;
use crate::record::{ExtraValue, LicenseRecord};

/// Product name used when the options leave it empty.
pub const DEFAULT_PRODUCT_NAME: &str = "License Key Verify Tool";

/// Product version used when the options leave it empty.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Validity used when the options leave the duration at zero.
pub const DEFAULT_DURATION_DAYS: i64 = 365;

/// Inputs for [`generate`]. Empty strings and a zero duration take defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateOptions {
    pub product_name: String,
    pub version: String,
    pub customer_name: String,
    pub notes: String,

    pub mac: String,
    pub uuid: String,
    pub cpu_id: String,

    /// Validity length; zero means [`DEFAULT_DURATION_DAYS`].
    pub duration: Duration,

    pub features: Vec<String>,
    pub max_users: u32,

    pub extra: BTreeMap<String, ExtraValue>,
}

impl GenerateOptions {
    /// Sets the validity in whole days.
    ///
    /// # Panics
    ///
    /// Panics if `days` is outside the range [`Duration`] can represent.
    #[must_use]
    pub fn with_days(mut self, days: i64) -> Self {
        self.duration = Duration::days(days);
        self
    }
}

/// Builds a new record from `options`, issued now.
pub fn generate(options: &GenerateOptions) -> LicenseResult<LicenseRecord> {
    generate_at(options, Utc::now())
}

/// Builds a new record from `options`, issued at `now`.
pub fn generate_at(options: &GenerateOptions, now: DateTime<Utc>) -> LicenseResult<LicenseRecord> {
    let duration = if options.duration.is_zero() {
        Duration::days(DEFAULT_DURATION_DAYS)
    } else {
        options.duration
    };
    if duration < Duration::zero() {
        return Err(LicenseError::InvalidConfig(format!(
            "duration must be positive, got {} seconds",
            duration.num_seconds()
        )));
    }

    let expires_at = now
        .checked_add_signed(duration)
        .ok_or_else(|| LicenseError::InvalidConfig("duration overflows the calendar".to_string()))?;

    let record = LicenseRecord {
        id: generate_license_id()?,
        product_name: or_default(&options.product_name, DEFAULT_PRODUCT_NAME),
        version: or_default(&options.version, DEFAULT_VERSION),
        mac: options.mac.clone(),
        uuid: options.uuid.clone(),
        cpu_id: options.cpu_id.clone(),
        issued_at: now,
        expires_at,
        features: options.features.clone(),
        max_users: options.max_users,
        customer_name: options.customer_name.clone(),
        notes: options.notes.clone(),
        extra: options.extra.clone(),
    };

    debug!(license_id = %record.id, expires_at = %record.expires_at, "license generated");
    Ok(record)
}

/// Encrypts, signs and wraps `record` into an envelope.
pub fn seal(record: &LicenseRecord, keys: &IssuerKeys) -> LicenseResult<Envelope> {
    let plaintext = record.to_bytes()?;
    let payload = aead_seal(keys.symmetric_key(), &plaintext)?;
    let signature = keys.signing_key().sign(&payload)?;

    info!(license_id = %record.id, "license sealed");

    Ok(Envelope {
        data: encode_base64(&payload),
        signature: encode_base64(&signature),
        algorithm: ALGORITHM.to_string(),
        format_version: FORMAT_VERSION.to_string(),
    })
}

/// Generates and seals in one step.
pub fn issue(
    options: &GenerateOptions,
    keys: &IssuerKeys,
) -> LicenseResult<(LicenseRecord, Envelope)> {
    let record = generate(options)?;
    let envelope = seal(&record, keys)?;
    Ok((record, envelope))
}

/// Returns 16 random bytes as lowercase hex in 4-2-2-2-6 byte groups.
pub fn generate_license_id() -> LicenseResult<String> {
    let mut bytes = [0u8; 16];
    rand::rngs::OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| CryptoError::KeyGeneration(format!("license id: {e}")))?;

    let hex = |range: std::ops::Range<usize>| -> String {
        bytes[range].iter().map(|b| format!("{b:02x}")).collect()
    };

    Ok(format!(
        "{}-{}-{}-{}-{}",
        hex(0..4),
        hex(4..6),
        hex(6..8),
        hex(8..10),
        hex(10..16)
    ))
}

fn or_default(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}
