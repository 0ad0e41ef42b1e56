use std::path::{Path, PathBuf};

use chrono::{TimeZone, Utc};
use lkv_cli::{IssueReport, MachineReport, VerificationReport};
use lkv_license::{ErrorKind, LicenseRecord, MachineInfo, MachineMatch, VerificationResult};
use pretty_assertions::assert_eq;

fn record() -> LicenseRecord {
    LicenseRecord {
        id: "0a1b2c3d-4e5f-6071-8293-a4b5c6d7e8f9".into(),
        product_name: "Widget".into(),
        version: "1.0.0".into(),
        mac: String::new(),
        uuid: String::new(),
        cpu_id: String::new(),
        issued_at: Utc.with_ymd_and_hms(2025, 1, 1, 8, 30, 0).unwrap(),
        expires_at: Utc.with_ymd_and_hms(2026, 1, 1, 8, 30, 0).unwrap(),
        features: vec!["export".into(), "sync".into()],
        max_users: 10,
        customer_name: "Acme".into(),
        notes: String::new(),
        extra: Default::default(),
    }
}

fn valid_result() -> VerificationResult {
    VerificationResult {
        valid: true,
        license: Some(record()),
        error: None,
        error_kind: None,
        verified_at: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
        expires_in: 3 * 24 * 3600 + 5 * 3600 + 59,
        machine_info: MachineMatch {
            matched: true,
            ..Default::default()
        },
    }
}

#[test]
fn valid_report() {
    let text = VerificationReport(&valid_result()).to_string();
    assert_eq!(
        text,
        "✓ License verification passed\n\
         License ID: 0a1b2c3d-4e5f-6071-8293-a4b5c6d7e8f9\n\
         Product Name: Widget\n\
         Customer Name: Acme\n\
         Issued At: 2025-01-01 08:30:00\n\
         Expires At: 2026-01-01 08:30:00\n\
         Features: export, sync\n\
         Max Users: 10\n\
         Expires In: 3 days 5 hours\n\
         ✓ Machine information matched\n"
    );
}

#[test]
fn valid_report_omits_empty_optional_fields() {
    let mut result = valid_result();
    if let Some(license) = result.license.as_mut() {
        license.customer_name.clear();
        license.features.clear();
        license.max_users = 0;
    }
    let text = VerificationReport(&result).to_string();
    assert!(!text.contains("Customer Name"));
    assert!(!text.contains("Features"));
    assert!(!text.contains("Max Users"));
}

#[test]
fn binding_failure_report_shows_current_machine() {
    let result = VerificationResult {
        valid: false,
        error: Some("machine information does not match".into()),
        error_kind: Some(ErrorKind::Validation),
        expires_in: 100,
        machine_info: MachineMatch {
            mac: "11:22:33:44:55:66".into(),
            uuid: String::new(),
            cpu_id: "abcd".into(),
            matched: false,
        },
        ..valid_result()
    };

    let text = VerificationReport(&result).to_string();
    assert_eq!(
        text,
        "✗ License verification failed\n\
         Error: machine information does not match\n\
         Current MAC: 11:22:33:44:55:66\n\
         Current CPUID: abcd\n"
    );
}

#[test]
fn early_failure_report_has_no_machine_lines() {
    let result = VerificationResult {
        valid: false,
        license: None,
        error: Some("signature verification failed".into()),
        error_kind: Some(ErrorKind::Crypto),
        expires_in: 0,
        machine_info: MachineMatch::default(),
        ..valid_result()
    };
    let text = VerificationReport(&result).to_string();
    assert!(text.contains("Error: signature verification failed"));
    assert!(!text.contains("Current"));
}

#[test]
fn machine_report_marks_unknown_values() {
    let info = MachineInfo {
        mac: "aa:bb:cc:dd:ee:ff".into(),
        uuid: String::new(),
        cpu_id: "0123".into(),
    };
    assert_eq!(
        MachineReport(&info).to_string(),
        "MAC: aa:bb:cc:dd:ee:ff\nUUID: <unknown>\nCPUID: 0123\n"
    );
}

#[test]
fn issue_report_lists_generated_keys() {
    let generated = vec![PathBuf::from("keys/private.pem"), PathBuf::from("keys/aes.key")];
    let license = record();
    let text = IssueReport {
        output: Path::new("license.lic"),
        license: &license,
        generated_keys: &generated,
    }
    .to_string();

    assert_eq!(
        text,
        "License generated: license.lic\n\
         New key saved to keys/private.pem\n\
         New key saved to keys/aes.key\n\
         License ID: 0a1b2c3d-4e5f-6071-8293-a4b5c6d7e8f9\n\
         Expires at: 2026-01-01 08:30:00\n"
    );
}
