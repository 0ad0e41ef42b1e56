use lkv_crypto::CryptoError;

#[test]
fn error_display_key_generation() {
    let err = CryptoError::KeyGeneration("rng offline".into());
    assert!(format!("{err}").contains("key generation failed"));
    assert!(format!("{err}").contains("rng offline"));
}

#[test]
fn error_display_encryption() {
    let err = CryptoError::Encryption("oops".into());
    assert!(format!("{err}").contains("encryption failed"));
}

#[test]
fn error_display_decryption() {
    let err = CryptoError::Decryption("tampered".into());
    assert!(format!("{err}").contains("decryption failed"));
}

#[test]
fn error_display_signature_mismatch() {
    let err = CryptoError::SignatureMismatch;
    assert!(format!("{err}").contains("signature verification failed"));
}

#[test]
fn error_display_invalid_key_length() {
    let err = CryptoError::InvalidKeyLength {
        expected: 32,
        actual: 16,
    };
    let msg = format!("{err}");
    assert!(msg.contains("32"));
    assert!(msg.contains("16"));
}

#[test]
fn error_display_pem() {
    let err = CryptoError::Pem("bad label".into());
    assert!(format!("{err}").contains("invalid PEM key"));
}

#[test]
fn error_from_base64() {
    let decode_err = lkv_crypto::decode_base64("***").unwrap_err();
    assert!(matches!(decode_err, CryptoError::Encoding(_)));
    assert!(format!("{decode_err}").contains("invalid base64"));
}
