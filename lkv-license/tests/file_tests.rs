mod common;

use chrono::{Duration, Utc};
use common::{current_record, issuer_keys, record_between, sealed, this_machine, verifier_keys};
use lkv_license::{
    issue, license_info_file, quick_verify_file, verify_file, ErrorKind, GenerateOptions,
};
use tempfile::TempDir;

#[test]
fn verify_file_accepts_written_license() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("license.lic");
    let (record, envelope) = issue(&GenerateOptions::default(), issuer_keys()).unwrap();
    envelope.write_to_file(&path).unwrap();

    let result = verify_file(&path, &verifier_keys(), &this_machine()).unwrap();
    assert!(result.valid);
    assert_eq!(result.license, Some(record));
}

#[test]
fn verify_file_missing_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = verify_file(dir.path().join("absent.lic"), &verifier_keys(), &this_machine())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn verify_file_reports_bad_content_in_result() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("junk.lic");
    std::fs::write(&path, b"junk").unwrap();

    let result = verify_file(&path, &verifier_keys(), &this_machine()).unwrap();
    assert!(!result.valid);
    assert_eq!(result.error_kind, Some(ErrorKind::Format));
}

#[test]
fn quick_verify_file_outcomes() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("good.lic");
    let expired = dir.path().join("expired.lic");
    sealed(&current_record()).write_to_file(&good).unwrap();
    let now = Utc::now();
    sealed(&record_between(now - Duration::days(3), now - Duration::days(1)))
        .write_to_file(&expired)
        .unwrap();

    let keys = verifier_keys();
    assert!(quick_verify_file(&good, &keys, &this_machine()));
    assert!(!quick_verify_file(&expired, &keys, &this_machine()));
    assert!(!quick_verify_file(dir.path().join("missing.lic"), &keys, &this_machine()));
}

#[test]
fn license_info_file_reads_record() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("license.lic");
    let record = current_record();
    sealed(&record).write_to_file(&path).unwrap();

    assert_eq!(license_info_file(&path, &verifier_keys()).unwrap(), record);
}

#[test]
fn license_info_file_missing_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = license_info_file(dir.path().join("x.lic"), &verifier_keys()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}
