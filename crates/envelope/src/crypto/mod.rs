//! AES-256-GCM authenticated encryption primitives.
//!
//! This module is intentionally free of RSA and oracle dependencies.
//! It provides the low-level seal/open operations used by the codecs and
//! the key derivation layer.

pub mod cipher;

pub use cipher::{NONCE_LEN, TAG_LEN};
