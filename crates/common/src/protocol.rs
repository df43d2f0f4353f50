//! Request and response types exchanged with the transport layer.
//!
//! The transport itself (HTTP routing, headers, validation) lives outside
//! this workspace; these types fix the JSON bodies it carries. Wrapped key
//! material travels out-of-band relative to these bodies — either in a
//! request header (direct wrap) or as a compact envelope token.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Seal / open
// ---------------------------------------------------------------------------

/// Request body for a seal operation.
///
/// The `payload` field contains an arbitrary JSON object whose protected
/// fields will be replaced with `nonce.ciphertext.tag` token strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealRequest {
    /// Arbitrary JSON object to encrypt fields within.
    pub payload: serde_json::Value,
}

/// Successful response body for a seal operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealResponse {
    /// Transformed JSON object with protected fields encrypted.
    pub payload: serde_json::Value,
}

/// Request body for an open operation: the mirror of [`SealResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenRequest {
    /// JSON object whose field-token strings will be decrypted in place.
    pub payload: serde_json::Value,
}

/// Successful response body for an open operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenResponse {
    /// JSON object with protected fields restored to plaintext.
    pub payload: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"format_error"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}
