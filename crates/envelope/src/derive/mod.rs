//! Key derivation orchestration: resolve the data-encryption key from
//! incoming wrapped material (receiver) and produce the mirror-image
//! wrapped material (sender).
//!
//! # Paths
//!
//! - **Direct wrap** — the wire carries one wrapped key that is the data
//!   key itself. One oracle round trip.
//! - **Double wrap** — the wire carries a five-segment envelope token whose
//!   wrapped key is an intermediate content key; the token's ciphertext is
//!   the data key encrypted under that content key. One oracle round trip
//!   plus one local authenticated decrypt.
//!
//! Either path ends with one [`SymmetricKey`] usable for any number of
//! field tokens or exactly one whole-payload ciphertext. Resolvers are
//! request-scoped: the key they produce is valid for exactly one request
//! and must not be cached across requests. Any oracle or tag failure is
//! fatal for the request — no partial key material is ever returned, and
//! nothing is retried here.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rsa::RsaPublicKey;
use tracing::{debug, warn};

use common::ProtectError;

use crate::codec::token::{self, EnvelopeHeader, EnvelopeToken};
use crate::crypto::cipher;
use crate::key::SymmetricKey;
use crate::wrap::{self, KeyOracle};

/// Which wrapping shape a message used.
///
/// Selected by transport shape: an out-of-band wrapped-key header is
/// [`WrapPath::Direct`]; a full envelope token is [`WrapPath::Enveloped`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapPath {
    /// The wrapped bytes are the data key itself.
    Direct,
    /// The wrapped bytes are a content key protecting the data key.
    Enveloped,
}

// ---------------------------------------------------------------------------
// Receiver side
// ---------------------------------------------------------------------------

/// Receiver-side resolver: turns incoming wrapped material into the data
/// key, delegating private-key work to the oracle.
pub struct KeyResolver<'a> {
    oracle: &'a dyn KeyOracle,
    key_id: &'a str,
}

impl<'a> KeyResolver<'a> {
    /// Create a resolver for one request against `oracle` and the wrapping
    /// key pair identified by `key_id`.
    pub fn new(oracle: &'a dyn KeyOracle, key_id: &'a str) -> Self {
        Self { oracle, key_id }
    }

    /// Direct path: the carrier value holds the Base64 of the wrapped data
    /// key itself.
    ///
    /// # Errors
    ///
    /// [`ProtectError::Format`] if the carrier is not valid Base64 or the
    /// unwrapped material is not key-sized; [`ProtectError::KeyUnwrap`] if
    /// the oracle rejects the wrapped bytes.
    pub fn resolve_direct(&self, wrapped_b64: &str) -> Result<SymmetricKey, ProtectError> {
        let wrapped = STANDARD
            .decode(wrapped_b64.trim())
            .map_err(|_| ProtectError::Format("wrapped key carrier is not valid base64".into()))?;
        debug!(path = ?WrapPath::Direct, "resolving data key");
        wrap::unwrap_key(self.oracle, &wrapped, self.key_id).inspect_err(|e| {
            warn!(path = ?WrapPath::Direct, code = e.code(), "key resolution failed");
        })
    }

    /// Double-wrap path: the token's ciphertext is the data key, encrypted
    /// under a content key that the oracle unwraps.
    ///
    /// # Errors
    ///
    /// Any of the four protocol error kinds: the token may be malformed,
    /// name an unsupported algorithm, fail at the oracle, or fail tag
    /// verification.
    pub fn resolve_enveloped(&self, compact: &str) -> Result<SymmetricKey, ProtectError> {
        let key_bytes = self.open_envelope(compact)?;
        SymmetricKey::from_bytes(&key_bytes)
    }

    /// Whole-payload variant of the double-wrap path: the token's
    /// ciphertext is the payload itself rather than an encrypted key.
    ///
    /// Distinguished from [`Self::resolve_enveloped`] by the caller, never
    /// by token shape.
    pub fn open_payload(&self, compact: &str) -> Result<Vec<u8>, ProtectError> {
        self.open_envelope(compact)
    }

    fn open_envelope(&self, compact: &str) -> Result<Vec<u8>, ProtectError> {
        let token = EnvelopeToken::parse(compact)?;
        debug!(path = ?WrapPath::Enveloped, "resolving content key");
        let content_key = wrap::unwrap_key(self.oracle, &token.wrapped_key, self.key_id)
            .inspect_err(|e| {
                warn!(path = ?WrapPath::Enveloped, code = e.code(), "key resolution failed");
            })?;
        cipher::open(
            &content_key,
            &token.nonce,
            &token.ciphertext,
            &token.tag,
            token.aad(),
        )
    }
}

// ---------------------------------------------------------------------------
// Sender side
// ---------------------------------------------------------------------------

/// A fresh data key together with its direct-wrap carrier value.
pub struct DirectWrap {
    /// The data key, ready for field or payload encryption.
    pub key: SymmetricKey,
    /// Base64 of the wrapped key, ready for the out-of-band carrier.
    pub wrapped: String,
}

/// A fresh data key together with its envelope token.
pub struct EnvelopedKey {
    /// The data key, ready for field or payload encryption.
    pub key: SymmetricKey,
    /// Compact five-segment token carrying the wrapped content key and the
    /// encrypted data key.
    pub token: String,
}

/// Sender-side mirror of [`KeyResolver`]: produces fresh keys and their
/// wrapped carriers under the receiver's public key.
pub struct KeySealer<'a> {
    public_key: &'a RsaPublicKey,
}

impl<'a> KeySealer<'a> {
    /// Create a sealer wrapping under `public_key`.
    pub fn new(public_key: &'a RsaPublicKey) -> Self {
        Self { public_key }
    }

    /// Direct path: wrap a fresh data key under the public key.
    pub fn seal_direct(&self) -> Result<DirectWrap, ProtectError> {
        let key = SymmetricKey::generate();
        let wrapped = wrap::wrap_key(&key, self.public_key)?;
        debug!(path = ?WrapPath::Direct, "sealed data key");
        Ok(DirectWrap {
            key,
            wrapped: STANDARD.encode(wrapped),
        })
    }

    /// Double-wrap path: wrap a fresh content key, encrypt a fresh data key
    /// under it, and assemble the envelope token.
    pub fn seal_enveloped(&self) -> Result<EnvelopedKey, ProtectError> {
        let key = SymmetricKey::generate();
        let token = self.seal_envelope_bytes(key.as_bytes())?;
        debug!(path = ?WrapPath::Enveloped, "sealed data key");
        Ok(EnvelopedKey { key, token })
    }

    /// Whole-payload variant: encrypt `payload` under a fresh content key
    /// and carry both in one token.
    pub fn seal_payload(&self, payload: &[u8]) -> Result<String, ProtectError> {
        self.seal_envelope_bytes(payload)
    }

    fn seal_envelope_bytes(&self, content: &[u8]) -> Result<String, ProtectError> {
        let content_key = SymmetricKey::generate();
        let wrapped = wrap::wrap_key(&content_key, self.public_key)?;
        // Encode the header once; these exact bytes are the AAD.
        let header_segment = EnvelopeHeader::standard().to_segment()?;
        let nonce = cipher::random_nonce();
        let sealed = cipher::seal(&content_key, &nonce, content, header_segment.as_bytes())?;
        Ok(token::build_compact(
            &header_segment,
            &wrapped,
            &nonce,
            &sealed.ciphertext,
            &sealed.tag,
        ))
    }
}
