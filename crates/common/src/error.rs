//! Common error types shared across crates.

use thiserror::Error;

/// Protocol-level error taxonomy.
///
/// Every failure in the envelope protocol maps to exactly one of these four
/// kinds, and all of them are terminal for the request that triggered them:
/// a request either fully resolves a valid data key and decrypts all of its
/// fields or payload, or it fails as a whole. None are retried by this core.
#[derive(Debug, Error)]
pub enum ProtectError {
    /// Client input is malformed — wrong segment count, invalid Base64, or
    /// a value of unexpected length. Signals a malformed request rather than
    /// a forged one.
    #[error("malformed input: {0}")]
    Format(String),

    /// The token is well-formed but names a key-wrap or content-encryption
    /// algorithm this system does not implement.
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The key oracle rejected or failed to process the wrapped key.
    /// Oracle internals are never exposed to callers.
    #[error("key unwrap failed: {0}")]
    KeyUnwrap(String),

    /// Authenticated decryption failed at some layer. Carries no detail:
    /// a forged ciphertext must be indistinguishable from a wrong key, and
    /// no partially-decrypted bytes are ever returned.
    #[error("authentication failed")]
    Authentication,
}

impl ProtectError {
    /// Short machine-readable code for error responses.
    pub fn code(&self) -> &'static str {
        match self {
            ProtectError::Format(_) => "format_error",
            ProtectError::UnsupportedAlgorithm(_) => "unsupported_algorithm",
            ProtectError::KeyUnwrap(_) => "key_unwrap_failure",
            ProtectError::Authentication => "authentication_failure",
        }
    }

    /// Returns the HTTP status code a transport layer should send for this
    /// error.
    pub fn http_status(&self) -> u16 {
        match self {
            ProtectError::Format(_) => 400,
            ProtectError::UnsupportedAlgorithm(_) => 400,
            ProtectError::KeyUnwrap(_) => 502,
            ProtectError::Authentication => 400,
        }
    }
}
