//! Field token encode/decode: one encrypted field value per token.
//!
//! Many field tokens may share one data key within a single request; each
//! token carries its own nonce. No associated data is used at field
//! granularity.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::ProtectError;

use crate::crypto::cipher::{self, NONCE_LEN, TAG_LEN};
use crate::key::SymmetricKey;

/// Number of dot-separated segments in a field token.
const SEGMENTS: usize = 3;

/// Encrypt a UTF-8 field value into a `nonce.ciphertext.tag` token.
///
/// A fresh random nonce is generated per call, so encrypting the same
/// plaintext twice under the same key yields two different tokens.
pub fn encode_field(key: &SymmetricKey, plaintext: &str) -> Result<String, ProtectError> {
    let nonce = cipher::random_nonce();
    let sealed = cipher::seal(key, &nonce, plaintext.as_bytes(), &[])?;
    Ok(format!(
        "{}.{}.{}",
        STANDARD.encode(nonce),
        STANDARD.encode(&sealed.ciphertext),
        STANDARD.encode(sealed.tag),
    ))
}

/// Decrypt a `nonce.ciphertext.tag` token back to its UTF-8 field value.
///
/// # Errors
///
/// Returns [`ProtectError::Format`] if the token does not have exactly
/// three segments, a segment is not valid Base64, the nonce or tag has the
/// wrong length, or the plaintext is not UTF-8 — a malformed request, not a
/// forged one. Returns [`ProtectError::Authentication`] if tag verification
/// fails.
pub fn decode_field(key: &SymmetricKey, token: &str) -> Result<String, ProtectError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != SEGMENTS {
        return Err(ProtectError::Format(format!(
            "field token must have {SEGMENTS} segments, got {}",
            parts.len()
        )));
    }

    let nonce = decode_fixed::<NONCE_LEN>(parts[0], "nonce")?;
    let ciphertext = decode_segment(parts[1], "ciphertext")?;
    let tag = decode_fixed::<TAG_LEN>(parts[2], "tag")?;

    let plaintext = cipher::open(key, &nonce, &ciphertext, &tag, &[])?;
    String::from_utf8(plaintext)
        .map_err(|_| ProtectError::Format("decrypted field is not valid UTF-8".into()))
}

fn decode_segment(segment: &str, name: &str) -> Result<Vec<u8>, ProtectError> {
    STANDARD
        .decode(segment)
        .map_err(|_| ProtectError::Format(format!("{name} segment is not valid base64")))
}

fn decode_fixed<const N: usize>(segment: &str, name: &str) -> Result<[u8; N], ProtectError> {
    decode_segment(segment, name)?
        .try_into()
        .map_err(|_| ProtectError::Format(format!("{name} segment has invalid length")))
}
