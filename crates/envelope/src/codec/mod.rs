//! Wire codecs for the two token formats.
//!
//! # Token formats
//!
//! ```text
//! field:    base64(nonce) "." base64(ciphertext) "." base64(tag)
//! envelope: b64url(header) "." b64url(wrapped key) "." b64url(nonce) "." b64url(ciphertext) "." b64url(tag)
//! ```
//!
//! Field tokens use the standard Base64 alphabet and travel as ordinary
//! string values inside JSON payloads. Envelope tokens use the URL-safe
//! alphabet without padding, matching the standard compact serialization
//! they interoperate with.

pub mod field;
pub mod token;
