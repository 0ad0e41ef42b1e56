//! Base64 text encoding shared by envelopes and key files.
//!
//! Standard alphabet with padding, so envelopes stay readable by any
//! conventional base64 decoder.

use crate::error::CryptoResult;
use base64::{engine::general_purpose::STANDARD, Engine};

/// Encodes bytes as padded standard base64.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decodes padded standard base64.
pub fn decode_base64(encoded: &str) -> CryptoResult<Vec<u8>> {
    Ok(STANDARD.decode(encoded)?)
}
