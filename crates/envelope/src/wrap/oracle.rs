//! [`KeyOracle`]: the external holder of the asymmetric private key.

use common::ProtectError;
use rsa::{Oaep, RsaPrivateKey};
use sha2::Sha256;

use crate::codec::token::KEY_WRAP_ALG;

/// External key oracle holding the asymmetric private key.
///
/// Invoked at most once per incoming request regardless of which wrap path
/// the sender chose and how many fields the request contains. The trait is
/// a synchronous request/response shim; implementations own transport,
/// credential, and timeout concerns, and must report a timeout as
/// [`ProtectError::KeyUnwrap`].
#[cfg_attr(test, mockall::automock)]
pub trait KeyOracle: Send + Sync {
    /// Decrypt `wrapped` under the private key identified by `key_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtectError::KeyUnwrap`] if the oracle rejects the
    /// wrapped bytes — wrong key, corrupted ciphertext, or an algorithm it
    /// does not support. Oracle internals must not leak into the message.
    fn decrypt(
        &self,
        wrapped: &[u8],
        key_id: &str,
        algorithm: &str,
    ) -> Result<Vec<u8>, ProtectError>;
}

/// In-process oracle backed by a local [`RsaPrivateKey`].
///
/// Stands in for the hardware-backed oracle in tests and local development,
/// enforcing the same key-identifier and algorithm checks a real oracle
/// performs.
pub struct LocalKeyOracle {
    private_key: RsaPrivateKey,
    key_id: String,
}

impl LocalKeyOracle {
    /// Create an oracle serving exactly one key pair under `key_id`.
    pub fn new(private_key: RsaPrivateKey, key_id: impl Into<String>) -> Self {
        Self {
            private_key,
            key_id: key_id.into(),
        }
    }
}

impl KeyOracle for LocalKeyOracle {
    fn decrypt(
        &self,
        wrapped: &[u8],
        key_id: &str,
        algorithm: &str,
    ) -> Result<Vec<u8>, ProtectError> {
        if key_id != self.key_id {
            return Err(ProtectError::KeyUnwrap(format!("unknown key id: {key_id}")));
        }
        if algorithm != KEY_WRAP_ALG {
            return Err(ProtectError::KeyUnwrap(format!(
                "oracle does not support algorithm: {algorithm}"
            )));
        }
        self.private_key
            .decrypt(Oaep::new::<Sha256>(), wrapped)
            .map_err(|_| ProtectError::KeyUnwrap("oracle rejected wrapped key material".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::RsaPublicKey;

    #[test]
    fn rejects_unsupported_algorithm() {
        let private_key = RsaPrivateKey::new(&mut rand::thread_rng(), 2048).unwrap();
        let oracle = LocalKeyOracle::new(private_key, "k1");
        let result = oracle.decrypt(&[0u8; 256], "k1", "RSA1_5");
        assert!(matches!(result, Err(ProtectError::KeyUnwrap(_))));
    }

    #[test]
    fn decrypts_oaep_wrapped_bytes() {
        let private_key = RsaPrivateKey::new(&mut rand::thread_rng(), 2048).unwrap();
        let public_key = RsaPublicKey::from(&private_key);
        let oracle = LocalKeyOracle::new(private_key, "k1");

        let mut rng = rand::thread_rng();
        let wrapped = public_key
            .encrypt(&mut rng, Oaep::new::<Sha256>(), &[0x5Au8; 32][..])
            .unwrap();

        let plaintext = oracle.decrypt(&wrapped, "k1", KEY_WRAP_ALG).unwrap();
        assert_eq!(plaintext, vec![0x5Au8; 32]);
    }
}
