//! Shared test helpers for license tests.

#![allow(dead_code)]

use std::sync::OnceLock;

use chrono::{DateTime, Duration, Utc};
use lkv_license::{
    seal, Envelope, IssuerKeys, LicenseRecord, StaticFingerprint, VerifierKeys,
};

pub const TEST_MAC: &str = "AA:BB:CC:DD:EE:FF";
pub const TEST_UUID: &str = "4C4C4544-0042-3010-8052-B4C04F384D32";
pub const TEST_CPU_ID: &str = "0123456789abcdef0123456789abcdef";

/// Issuer keys shared by every test in the binary (RSA generation is slow).
pub fn issuer_keys() -> &'static IssuerKeys {
    static KEYS: OnceLock<IssuerKeys> = OnceLock::new();
    KEYS.get_or_init(|| IssuerKeys::generate().expect("key generation"))
}

/// Verifier keys matching [`issuer_keys`].
pub fn verifier_keys() -> VerifierKeys {
    issuer_keys().verifier_keys()
}

/// A second, unrelated issuer.
pub fn foreign_issuer_keys() -> &'static IssuerKeys {
    static KEYS: OnceLock<IssuerKeys> = OnceLock::new();
    KEYS.get_or_init(|| IssuerKeys::generate().expect("key generation"))
}

/// The machine the tests pretend to run on.
pub fn this_machine() -> StaticFingerprint {
    StaticFingerprint::new(TEST_MAC, TEST_UUID, TEST_CPU_ID)
}

/// An unbound record valid from `issued_at` to `expires_at`.
pub fn record_between(issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> LicenseRecord {
    LicenseRecord {
        id: "00112233-4455-6677-8899-aabbccddeeff".to_string(),
        product_name: "Test Product".to_string(),
        version: "2.0.0".to_string(),
        mac: String::new(),
        uuid: String::new(),
        cpu_id: String::new(),
        issued_at,
        expires_at,
        features: vec!["export".to_string(), "sync".to_string()],
        max_users: 5,
        customer_name: "Acme Corp".to_string(),
        notes: String::new(),
        extra: Default::default(),
    }
}

/// An unbound record valid for a day starting a minute ago.
pub fn current_record() -> LicenseRecord {
    let now = Utc::now();
    record_between(now - Duration::minutes(1), now + Duration::days(1))
}

/// Seals `record` with the shared issuer keys and returns the encoded envelope.
pub fn sealed_bytes(record: &LicenseRecord) -> Vec<u8> {
    seal(record, issuer_keys())
        .and_then(|e| e.encode())
        .expect("seal")
}

/// Seals `record` with the shared issuer keys.
pub fn sealed(record: &LicenseRecord) -> Envelope {
    seal(record, issuer_keys()).expect("seal")
}
