//! AES-256-GCM encryption and decryption with optional associated data.
//!
//! Every operation takes an explicit 96-bit nonce. Callers are responsible
//! for nonce freshness: nonce reuse under the same key breaks both
//! confidentiality and integrity under GCM.

use aes_gcm::{
    aead::{Aead, KeyInit, OsRng, Payload},
    Aes256Gcm, Key, Nonce,
};
use common::ProtectError;

use crate::key::SymmetricKey;

/// Byte length of an AES-GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the GCM authentication tag (16 bytes = 128 bits).
pub const TAG_LEN: usize = 16;

/// Ciphertext plus its detached authentication tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedData {
    /// Raw ciphertext bytes, same length as the plaintext.
    pub ciphertext: Vec<u8>,
    /// Authentication tag covering ciphertext and associated data.
    pub tag: [u8; TAG_LEN],
}

/// Generate a fresh random nonce from the OS CSPRNG.
pub fn random_nonce() -> [u8; NONCE_LEN] {
    use aes_gcm::aead::rand_core::RngCore;
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);
    nonce
}

/// Encrypt `plaintext` under `key` and `nonce`, binding `aad` into the tag.
///
/// The associated data is processed before the plaintext bytes; an empty
/// `aad` slice and "no associated data" are the same thing at the AEAD
/// layer, so the exact same value must be supplied again at [`open`] time.
///
/// # Errors
///
/// Returns [`ProtectError::Format`] if the plaintext exceeds the AES-GCM
/// length limit.
pub fn seal(
    key: &SymmetricKey,
    nonce: &[u8; NONCE_LEN],
    plaintext: &[u8],
    aad: &[u8],
) -> Result<SealedData, ProtectError> {
    let cipher = build_cipher(key);
    let mut combined = cipher
        .encrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|_| ProtectError::Format("plaintext exceeds aead length limit".into()))?;

    // The AEAD returns ciphertext||tag; split the tag off.
    let tag_start = combined.len() - TAG_LEN;
    let tag_bytes = combined.split_off(tag_start);
    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(&tag_bytes);

    Ok(SealedData {
        ciphertext: combined,
        tag,
    })
}

/// Decrypt `ciphertext` and verify `tag` under `key`, `nonce`, and `aad`.
///
/// The tag is verified before any plaintext is returned.
///
/// # Errors
///
/// Returns [`ProtectError::Authentication`] if verification fails — wrong
/// key, tampered ciphertext, tampered tag, or mismatched associated data.
/// The failure carries no further detail.
pub fn open(
    key: &SymmetricKey,
    nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
    tag: &[u8; TAG_LEN],
    aad: &[u8],
) -> Result<Vec<u8>, ProtectError> {
    let cipher = build_cipher(key);

    // GCM-style primitives expect combined ciphertext||tag input.
    let mut combined = Vec::with_capacity(ciphertext.len() + TAG_LEN);
    combined.extend_from_slice(ciphertext);
    combined.extend_from_slice(tag);

    cipher
        .decrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: &combined,
                aad,
            },
        )
        .map_err(|_| ProtectError::Authentication)
}

fn build_cipher(key: &SymmetricKey) -> Aes256Gcm {
    // A SymmetricKey is KEY_LEN bytes by construction.
    Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_open_round_trip() {
        let key = SymmetricKey::generate();
        let nonce = random_nonce();
        let sealed = seal(&key, &nonce, b"123-45-6789", b"").unwrap();
        let plaintext = open(&key, &nonce, &sealed.ciphertext, &sealed.tag, b"").unwrap();
        assert_eq!(plaintext, b"123-45-6789");
    }

    #[test]
    fn round_trip_with_aad() {
        let key = SymmetricKey::generate();
        let nonce = random_nonce();
        let aad = b"eyJhbGciOiJSU0EtT0FFUC0yNTYifQ";
        let sealed = seal(&key, &nonce, b"secret", aad).unwrap();
        let plaintext = open(&key, &nonce, &sealed.ciphertext, &sealed.tag, aad).unwrap();
        assert_eq!(plaintext, b"secret");
    }

    #[test]
    fn ciphertext_length_matches_plaintext() {
        let key = SymmetricKey::generate();
        let nonce = random_nonce();
        let sealed = seal(&key, &nonce, b"1990-05-15", b"").unwrap();
        assert_eq!(sealed.ciphertext.len(), b"1990-05-15".len());
    }

    #[test]
    fn wrong_key_fails_open() {
        let key1 = SymmetricKey::generate();
        let key2 = SymmetricKey::generate();
        let nonce = random_nonce();
        let sealed = seal(&key1, &nonce, b"secret", b"").unwrap();
        let result = open(&key2, &nonce, &sealed.ciphertext, &sealed.tag, b"");
        assert!(matches!(result, Err(ProtectError::Authentication)));
    }

    #[test]
    fn tampered_tag_fails_open() {
        let key = SymmetricKey::generate();
        let nonce = random_nonce();
        let mut sealed = seal(&key, &nonce, b"secret", b"").unwrap();
        sealed.tag[0] ^= 0x01;
        let result = open(&key, &nonce, &sealed.ciphertext, &sealed.tag, b"");
        assert!(matches!(result, Err(ProtectError::Authentication)));
    }

    #[test]
    fn tampered_ciphertext_fails_open() {
        let key = SymmetricKey::generate();
        let nonce = random_nonce();
        let mut sealed = seal(&key, &nonce, b"tamper me", b"").unwrap();
        sealed.ciphertext[0] ^= 0xFF;
        let result = open(&key, &nonce, &sealed.ciphertext, &sealed.tag, b"");
        assert!(matches!(result, Err(ProtectError::Authentication)));
    }

    #[test]
    fn mismatched_aad_fails_open() {
        let key = SymmetricKey::generate();
        let nonce = random_nonce();
        let sealed = seal(&key, &nonce, b"secret", b"header-a").unwrap();
        let result = open(&key, &nonce, &sealed.ciphertext, &sealed.tag, b"header-b");
        assert!(matches!(result, Err(ProtectError::Authentication)));
    }

    #[test]
    fn empty_plaintext_round_trip() {
        let key = SymmetricKey::generate();
        let nonce = random_nonce();
        let sealed = seal(&key, &nonce, b"", b"").unwrap();
        assert!(sealed.ciphertext.is_empty());
        let plaintext = open(&key, &nonce, &sealed.ciphertext, &sealed.tag, b"").unwrap();
        assert!(plaintext.is_empty());
    }

    #[test]
    fn random_nonces_are_distinct() {
        assert_ne!(random_nonce(), random_nonce());
    }
}
