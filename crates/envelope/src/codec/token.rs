//! Compact envelope token codec: the five-segment wrapped-key carrier.
//!
//! The header is a small JSON object naming the key-wrap and
//! content-encryption algorithms. It is never encrypted, only Base64URL
//! encoded; any party can read which algorithms were used, but not the key
//! material. The exact wire bytes of the encoded header segment double as
//! the associated data for the content encryption, so the header cannot be
//! altered without breaking authentication.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use common::ProtectError;
use serde::{Deserialize, Serialize};

use crate::crypto::cipher::{NONCE_LEN, TAG_LEN};

/// The only key-wrap algorithm this system supports.
pub const KEY_WRAP_ALG: &str = "RSA-OAEP-256";

/// The only content-encryption algorithm this system supports.
pub const CONTENT_ENC_ALG: &str = "A256GCM";

/// Number of dot-separated segments in an envelope token.
const SEGMENTS: usize = 5;

/// Envelope token header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeHeader {
    /// Key-wrap algorithm identifier.
    pub alg: String,
    /// Content-encryption algorithm identifier.
    pub enc: String,
}

impl EnvelopeHeader {
    /// The standard header carried by every token this system produces.
    pub fn standard() -> Self {
        Self {
            alg: KEY_WRAP_ALG.into(),
            enc: CONTENT_ENC_ALG.into(),
        }
    }

    /// Encode this header into its wire segment.
    ///
    /// The returned string is the exact value later used as associated
    /// data. It must be computed once per token and reused verbatim —
    /// re-serializing a parsed header risks byte-level drift that breaks
    /// authentication.
    pub fn to_segment(&self) -> Result<String, ProtectError> {
        let json = serde_json::to_vec(self)
            .map_err(|e| ProtectError::Format(format!("header serialization failed: {e}")))?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }
}

/// A parsed envelope token.
///
/// Retains the literal header segment as transmitted so that [`Self::aad`]
/// returns the same bytes the sender authenticated, byte for byte.
#[derive(Debug, Clone)]
pub struct EnvelopeToken {
    /// Parsed header. Algorithms are already validated.
    pub header: EnvelopeHeader,
    header_segment: String,
    /// Asymmetrically-wrapped key material.
    pub wrapped_key: Vec<u8>,
    /// Nonce for the content encryption.
    pub nonce: [u8; NONCE_LEN],
    /// Encrypted content: either an encrypted data key or a whole payload.
    pub ciphertext: Vec<u8>,
    /// Authentication tag for the content encryption.
    pub tag: [u8; TAG_LEN],
}

impl EnvelopeToken {
    /// Parse a compact token.
    ///
    /// # Errors
    ///
    /// Returns [`ProtectError::Format`] for a wrong segment count, invalid
    /// Base64URL, a malformed header object, or a nonce/tag of the wrong
    /// length. Returns [`ProtectError::UnsupportedAlgorithm`] if the header
    /// names algorithms other than `RSA-OAEP-256` + `A256GCM` — the token
    /// is syntactically valid but not actionable, and no cryptographic
    /// operation (and no oracle call) is attempted.
    pub fn parse(token: &str) -> Result<Self, ProtectError> {
        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() != SEGMENTS {
            return Err(ProtectError::Format(format!(
                "envelope token must have {SEGMENTS} segments, got {}",
                parts.len()
            )));
        }

        let header_bytes = decode_segment(parts[0], "header")?;
        let header: EnvelopeHeader = serde_json::from_slice(&header_bytes)
            .map_err(|_| ProtectError::Format("header is not a valid JSON object".into()))?;
        if header.alg != KEY_WRAP_ALG {
            return Err(ProtectError::UnsupportedAlgorithm(header.alg));
        }
        if header.enc != CONTENT_ENC_ALG {
            return Err(ProtectError::UnsupportedAlgorithm(header.enc));
        }

        let wrapped_key = decode_segment(parts[1], "wrapped key")?;
        let nonce = decode_fixed::<NONCE_LEN>(parts[2], "nonce")?;
        let ciphertext = decode_segment(parts[3], "ciphertext")?;
        let tag = decode_fixed::<TAG_LEN>(parts[4], "tag")?;

        Ok(Self {
            header,
            header_segment: parts[0].to_owned(),
            wrapped_key,
            nonce,
            ciphertext,
            tag,
        })
    }

    /// Associated data for the content encryption: the ASCII bytes of the
    /// header segment exactly as transmitted.
    pub fn aad(&self) -> &[u8] {
        self.header_segment.as_bytes()
    }
}

/// Assemble a compact token from its five logical values.
///
/// `header_segment` must be the exact encoded header that was used as
/// associated data when sealing `ciphertext`.
pub fn build_compact(
    header_segment: &str,
    wrapped_key: &[u8],
    nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
    tag: &[u8; TAG_LEN],
) -> String {
    format!(
        "{}.{}.{}.{}.{}",
        header_segment,
        URL_SAFE_NO_PAD.encode(wrapped_key),
        URL_SAFE_NO_PAD.encode(nonce),
        URL_SAFE_NO_PAD.encode(ciphertext),
        URL_SAFE_NO_PAD.encode(tag),
    )
}

fn decode_segment(segment: &str, name: &str) -> Result<Vec<u8>, ProtectError> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| ProtectError::Format(format!("{name} segment is not valid base64url")))
}

fn decode_fixed<const N: usize>(segment: &str, name: &str) -> Result<[u8; N], ProtectError> {
    decode_segment(segment, name)?
        .try_into()
        .map_err(|_| ProtectError::Format(format!("{name} segment has invalid length")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_token() -> String {
        let header_segment = EnvelopeHeader::standard().to_segment().unwrap();
        build_compact(
            &header_segment,
            &[0xAA; 256],
            &[0x01; NONCE_LEN],
            &[0x02; 32],
            &[0x03; TAG_LEN],
        )
    }

    #[test]
    fn build_parse_round_trip() {
        let token = EnvelopeToken::parse(&sample_token()).unwrap();
        assert_eq!(token.header, EnvelopeHeader::standard());
        assert_eq!(token.wrapped_key, vec![0xAA; 256]);
        assert_eq!(token.nonce, [0x01; NONCE_LEN]);
        assert_eq!(token.ciphertext, vec![0x02; 32]);
        assert_eq!(token.tag, [0x03; TAG_LEN]);
    }

    #[test]
    fn aad_is_literal_header_segment() {
        let compact = sample_token();
        let token = EnvelopeToken::parse(&compact).unwrap();
        let wire_header = compact.split('.').next().unwrap();
        assert_eq!(token.aad(), wire_header.as_bytes());
    }

    #[test]
    fn wrong_segment_count_is_format_error() {
        for token in ["a.b.c.d", "a.b.c.d.e.f", "a.b", ""] {
            let result = EnvelopeToken::parse(token);
            assert!(
                matches!(result, Err(ProtectError::Format(_))),
                "expected Format for {token:?}"
            );
        }
    }

    #[test]
    fn invalid_base64url_is_format_error() {
        let result = EnvelopeToken::parse("!!!.b.c.d.e");
        assert!(matches!(result, Err(ProtectError::Format(_))));
    }

    #[test]
    fn non_json_header_is_format_error() {
        let header_segment = URL_SAFE_NO_PAD.encode(b"not-json");
        let token = build_compact(
            &header_segment,
            &[1],
            &[0; NONCE_LEN],
            &[2],
            &[0; TAG_LEN],
        );
        assert!(matches!(
            EnvelopeToken::parse(&token),
            Err(ProtectError::Format(_))
        ));
    }

    #[test]
    fn unknown_key_wrap_alg_is_rejected() {
        let header = EnvelopeHeader {
            alg: "RSA1_5".into(),
            enc: CONTENT_ENC_ALG.into(),
        };
        let token = build_compact(
            &header.to_segment().unwrap(),
            &[1],
            &[0; NONCE_LEN],
            &[2],
            &[0; TAG_LEN],
        );
        match EnvelopeToken::parse(&token) {
            Err(ProtectError::UnsupportedAlgorithm(alg)) => assert_eq!(alg, "RSA1_5"),
            other => panic!("expected UnsupportedAlgorithm, got {other:?}"),
        }
    }

    #[test]
    fn unknown_content_enc_alg_is_rejected() {
        let header = EnvelopeHeader {
            alg: KEY_WRAP_ALG.into(),
            enc: "A128CBC-HS256".into(),
        };
        let token = build_compact(
            &header.to_segment().unwrap(),
            &[1],
            &[0; NONCE_LEN],
            &[2],
            &[0; TAG_LEN],
        );
        assert!(matches!(
            EnvelopeToken::parse(&token),
            Err(ProtectError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn wrong_nonce_length_is_format_error() {
        let header_segment = EnvelopeHeader::standard().to_segment().unwrap();
        let token = format!(
            "{}.{}.{}.{}.{}",
            header_segment,
            URL_SAFE_NO_PAD.encode([1u8; 16]),
            URL_SAFE_NO_PAD.encode([0u8; 8]),
            URL_SAFE_NO_PAD.encode([2u8; 4]),
            URL_SAFE_NO_PAD.encode([3u8; TAG_LEN]),
        );
        assert!(matches!(
            EnvelopeToken::parse(&token),
            Err(ProtectError::Format(_))
        ));
    }

    #[test]
    fn header_segment_is_unpadded_base64url() {
        let segment = EnvelopeHeader::standard().to_segment().unwrap();
        assert!(!segment.contains('='));
        let decoded = URL_SAFE_NO_PAD.decode(&segment).unwrap();
        let parsed: EnvelopeHeader = serde_json::from_slice(&decoded).unwrap();
        assert_eq!(parsed.alg, KEY_WRAP_ALG);
        assert_eq!(parsed.enc, CONTENT_ENC_ALG);
    }
}
