//! [`SymmetricKey`]: 256-bit data-encryption key material.

use aes_gcm::aead::{rand_core::RngCore, OsRng};
use common::ProtectError;

/// Byte length of a symmetric data-encryption key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// A 256-bit symmetric key used for field and payload encryption.
///
/// Owned transiently by whichever side generated or unwrapped it; never
/// persisted. When this type is dropped, the memory is overwritten with
/// zeroes to minimise the window during which plaintext key material lives
/// in RAM.
#[derive(Clone)]
pub struct SymmetricKey(Box<[u8; KEY_LEN]>);

impl SymmetricKey {
    /// Generate a fresh key from the OS CSPRNG.
    pub fn generate() -> Self {
        let mut buf = Box::new([0u8; KEY_LEN]);
        OsRng.fill_bytes(buf.as_mut());
        Self(buf)
    }

    /// Wrap raw key bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ProtectError::Format`] if the slice is not exactly
    /// [`KEY_LEN`] bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtectError> {
        if bytes.len() != KEY_LEN {
            return Err(ProtectError::Format(format!(
                "key must be {KEY_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let mut buf = Box::new([0u8; KEY_LEN]);
        buf.copy_from_slice(bytes);
        Ok(Self(buf))
    }

    /// Borrow the raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0[..]
    }
}

impl Drop for SymmetricKey {
    fn drop(&mut self) {
        // Zero the key material on drop.
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material — not even in debug builds.
        f.write_str("SymmetricKey([REDACTED])")
    }
}
