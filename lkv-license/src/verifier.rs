//! License verification.
//!
//! Verification runs a fixed sequence of stages and stops at the first
//! failure:
//!
//! 1. decode the envelope
//! 2. check the format version (before any cryptographic work)
//! 3. verify the issuer signature over the ciphertext
//! 4. open the AEAD payload
//! 5. parse the record
//! 6. check `issued_at <= now <= expires_at`
//! 7. check the machine binding against a [`Fingerprint`]
//!
//! Every outcome except an unreadable file is reported inside a
//! [`VerificationResult`]; callers never need to handle an error to learn
//! whether a license is usable.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use lkv_crypto::{decode_base64, open};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::envelope::Envelope;
use crate::error::{ErrorKind, LicenseError, LicenseResult};
use crate::fingerprint::{Fingerprint, MachineInfo};
use crate::keys::VerifierKeys;
use crate::record::LicenseRecord;

/// Machine snapshot taken during the binding stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineMatch {
    pub mac: String,
    pub uuid: String,
    #[serde(rename = "cpuid")]
    pub cpu_id: String,
    /// True when every non-wildcard binding field matched.
    pub matched: bool,
}

/// Outcome of a single verification call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub valid: bool,
    /// The recovered claims, present once decryption and parsing succeeded.
    pub license: Option<LicenseRecord>,
    /// Human-readable failure description; `None` when valid.
    pub error: Option<String>,
    /// Failure classification; `None` when valid.
    pub error_kind: Option<ErrorKind>,
    pub verified_at: DateTime<Utc>,
    /// Whole seconds until expiry; 0 when expired or not evaluated.
    pub expires_in: i64,
    /// Populated once the binding stage ran.
    pub machine_info: MachineMatch,
}

impl VerificationResult {
    fn new(verified_at: DateTime<Utc>) -> Self {
        Self {
            valid: false,
            license: None,
            error: None,
            error_kind: None,
            verified_at,
            expires_in: 0,
            machine_info: MachineMatch::default(),
        }
    }

    fn fail(mut self, err: &LicenseError) -> Self {
        warn!(kind = ?err.kind(), error = %err, "license rejected");
        self.valid = false;
        self.error = Some(err.to_string());
        self.error_kind = Some(err.kind());
        self
    }

    /// Whole days until expiry, rounded down.
    #[must_use]
    pub fn expires_in_days(&self) -> i64 {
        self.expires_in / (24 * 60 * 60)
    }
}

/// Verifies an encoded envelope against the current time.
pub fn verify(
    bytes: &[u8],
    keys: &VerifierKeys,
    fingerprint: &dyn Fingerprint,
) -> VerificationResult {
    verify_at(bytes, keys, fingerprint, Utc::now())
}

/// Verifies an encoded envelope as of `now`.
pub fn verify_at(
    bytes: &[u8],
    keys: &VerifierKeys,
    fingerprint: &dyn Fingerprint,
    now: DateTime<Utc>,
) -> VerificationResult {
    let mut result = VerificationResult::new(now);

    let record = match open_envelope(bytes, keys) {
        Ok(record) => record,
        Err(e) => return result.fail(&e),
    };
    debug!(license_id = %record.id, "license opened");

    let outcome = check_record(&record, fingerprint, now, &mut result);
    result.license = Some(record);

    match outcome {
        Ok(()) => {
            debug!(expires_in = result.expires_in, "license valid");
            result.valid = true;
            result
        }
        Err(e) => result.fail(&e),
    }
}

/// Temporal and binding stages; fills `expires_in` and the machine snapshot.
fn check_record(
    record: &LicenseRecord,
    fingerprint: &dyn Fingerprint,
    now: DateTime<Utc>,
    result: &mut VerificationResult,
) -> LicenseResult<()> {
    result.expires_in = check_temporal(record, now)?;

    let current = fingerprint.current_all();
    let matched = binding_matches(record, &current);
    result.machine_info = MachineMatch {
        mac: current.mac,
        uuid: current.uuid,
        cpu_id: current.cpu_id,
        matched,
    };

    if matched {
        Ok(())
    } else {
        Err(LicenseError::MachineMismatch)
    }
}

/// Reads and verifies a license file.
///
/// Only a read failure is returned as `Err`; every other problem is reported
/// inside the result.
pub fn verify_file(
    path: impl AsRef<Path>,
    keys: &VerifierKeys,
    fingerprint: &dyn Fingerprint,
) -> LicenseResult<VerificationResult> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| LicenseError::io(path, e))?;
    Ok(verify(&bytes, keys, fingerprint))
}

/// Returns true only for a readable, fully valid license file.
pub fn quick_verify_file(
    path: impl AsRef<Path>,
    keys: &VerifierKeys,
    fingerprint: &dyn Fingerprint,
) -> bool {
    verify_file(path, keys, fingerprint).is_ok_and(|r| r.valid)
}

/// Recovers the record without checking time or machine binding.
///
/// Runs the structural and cryptographic stages only; meant for inspection,
/// not for trust decisions.
pub fn license_info(bytes: &[u8], keys: &VerifierKeys) -> LicenseResult<LicenseRecord> {
    open_envelope(bytes, keys)
}

/// Reads a license file and recovers its record; see [`license_info`].
pub fn license_info_file(path: impl AsRef<Path>, keys: &VerifierKeys) -> LicenseResult<LicenseRecord> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| LicenseError::io(path, e))?;
    license_info(&bytes, keys)
}

/// Decode, version gate, signature, decrypt, parse.
fn open_envelope(bytes: &[u8], keys: &VerifierKeys) -> LicenseResult<LicenseRecord> {
    let envelope = Envelope::decode(bytes)?;

    if !envelope.is_supported_version() {
        return Err(LicenseError::UnsupportedVersion(envelope.format_version));
    }

    let payload = decode_base64(&envelope.data)
        .map_err(|e| LicenseError::InvalidFormat(format!("failed to decode license data: {e}")))?;
    let signature = decode_base64(&envelope.signature)
        .map_err(|e| LicenseError::InvalidFormat(format!("failed to decode signature: {e}")))?;

    keys.verification_key().verify(&payload, &signature)?;
    let plaintext = open(keys.symmetric_key(), &payload)?;

    LicenseRecord::from_bytes(&plaintext)
}

/// Returns whole seconds left, or the temporal violation.
fn check_temporal(record: &LicenseRecord, now: DateTime<Utc>) -> LicenseResult<i64> {
    if now < record.issued_at {
        return Err(LicenseError::NotYetValid);
    }
    if now > record.expires_at {
        return Err(LicenseError::Expired);
    }
    Ok((record.expires_at - now).num_seconds().max(0))
}

/// Empty record fields are wildcards; the rest must match exactly.
fn binding_matches(record: &LicenseRecord, current: &MachineInfo) -> bool {
    let field_matches = |expected: &str, actual: &str| expected.is_empty() || expected == actual;

    field_matches(&record.mac, &current.mac)
        && field_matches(&record.uuid, &current.uuid)
        && field_matches(&record.cpu_id, &current.cpu_id)
}
