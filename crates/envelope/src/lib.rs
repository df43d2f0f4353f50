//! Hybrid envelope encryption for PII records in transit.
//!
//! An untrusted sender encrypts record fields (or whole payloads) under a
//! fresh 256-bit data key, then protects that key for a receiver whose RSA
//! private key lives inside an external key oracle. Two wrapping shapes
//! are supported, selected by transport shape:
//!
//! - **Direct wrap** — the data key is RSA-OAEP-wrapped and travels Base64
//!   encoded in an out-of-band carrier such as a request header.
//! - **Double wrap** — an intermediate content key is RSA-OAEP-wrapped and
//!   travels inside a five-segment compact token together with the data
//!   key (or a whole payload) encrypted under it.
//!
//! The receiver resolves the data key with at most one oracle call per
//! request, then decrypts any number of field tokens (or one payload).
//! See [`derive::KeySealer`] and [`derive::KeyResolver`] for the two ends
//! of the protocol.

pub mod codec;
pub mod config;
pub mod crypto;
pub mod derive;
pub mod key;
pub mod record;
pub mod wrap;

pub use codec::field::{decode_field, encode_field};
pub use codec::token::{EnvelopeHeader, EnvelopeToken};
pub use common::ProtectError;
pub use config::Config;
pub use derive::{DirectWrap, EnvelopedKey, KeyResolver, KeySealer, WrapPath};
pub use key::SymmetricKey;
pub use record::{open_fields, seal_fields, FieldPaths};
pub use wrap::{KeyOracle, LocalKeyOracle};
