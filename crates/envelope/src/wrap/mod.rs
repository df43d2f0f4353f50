//! Asymmetric key wrapping: RSA-OAEP-SHA-256 on the sender side, key-oracle
//! delegation on the receiver side.
//!
//! The receiver adapter performs no private-key arithmetic itself — the
//! private key lives inside the external [`KeyOracle`], which is invoked
//! at most once per incoming request.

pub mod oracle;

pub use oracle::{KeyOracle, LocalKeyOracle};

use common::ProtectError;
use rsa::{Oaep, RsaPublicKey};
use sha2::Sha256;
use tracing::debug;

use crate::codec::token::KEY_WRAP_ALG;
use crate::key::SymmetricKey;

/// Wrap a symmetric key under the receiver's public key with
/// RSA-OAEP-SHA-256.
///
/// OAEP padding is randomized internally, so wrapping the same key twice
/// yields different ciphertexts. Output length is fixed by the modulus size
/// (512 bytes for a 4096-bit key).
///
/// # Errors
///
/// Returns [`ProtectError::KeyUnwrap`] if the RSA operation fails, e.g. the
/// modulus is too small to carry the key under OAEP-SHA-256 padding.
pub fn wrap_key(key: &SymmetricKey, public_key: &RsaPublicKey) -> Result<Vec<u8>, ProtectError> {
    let mut rng = rand::thread_rng();
    public_key
        .encrypt(&mut rng, Oaep::new::<Sha256>(), key.as_bytes())
        .map_err(|_| ProtectError::KeyUnwrap("asymmetric key wrap failed".into()))
}

/// Unwrap wrapped key material by delegating to the key oracle.
///
/// This is the sole point of contact with the private key. The plaintext
/// returned by the oracle must be exactly 32 bytes.
///
/// # Errors
///
/// Propagates [`ProtectError::KeyUnwrap`] from the oracle — callers must
/// not silently retry with a different key. Returns
/// [`ProtectError::Format`] if the unwrapped material has the wrong length.
pub fn unwrap_key(
    oracle: &dyn KeyOracle,
    wrapped: &[u8],
    key_id: &str,
) -> Result<SymmetricKey, ProtectError> {
    debug!(key_id, wrapped_len = wrapped.len(), "delegating key unwrap to oracle");
    let plaintext = oracle.decrypt(wrapped, key_id, KEY_WRAP_ALG)?;
    SymmetricKey::from_bytes(&plaintext)
}
