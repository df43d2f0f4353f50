//! In-place encryption of addressed fields inside a JSON record.
//!
//! Fields are addressed by dot-notation paths; an `[]` suffix expands into
//! every element of an array, e.g. `"orders[].card_number"`. All fields of
//! one record share one data key; each field token carries its own nonce.

use std::collections::HashSet;

use common::ProtectError;

use crate::codec::field::{decode_field, encode_field};
use crate::key::SymmetricKey;

/// Set of dot-notation paths identifying the protected fields of a record.
pub type FieldPaths = HashSet<String>;

/// Segments of a dot-notation field path.
enum PathSegment {
    /// Navigate into an object property by name.
    Key(String),
    /// Expand into every element of a JSON array.
    ArrayItem,
}

/// Parse a dot-notation path into a list of [`PathSegment`]s.
///
/// Array fields use the `[]` suffix before the dot separator, e.g.
/// `"orders[].card_number"` → `[Key("orders"), ArrayItem, Key("card_number")]`.
fn parse_path(path: &str) -> Vec<PathSegment> {
    let mut segments = Vec::new();
    for part in path.split('.') {
        if let Some(key) = part.strip_suffix("[]") {
            segments.push(PathSegment::Key(key.to_owned()));
            segments.push(PathSegment::ArrayItem);
        } else {
            segments.push(PathSegment::Key(part.to_owned()));
        }
    }
    segments
}

/// Encrypt every addressed string leaf in `record`, replacing it with its
/// field token. Paths that do not resolve to a string leaf are a no-op.
pub fn seal_fields(
    record: &mut serde_json::Value,
    paths: &FieldPaths,
    key: &SymmetricKey,
) -> Result<(), ProtectError> {
    for path in paths {
        let segments = parse_path(path);
        transform_at_path(record, &segments, &mut |s| encode_field(key, s))?;
    }
    Ok(())
}

/// Reverse of [`seal_fields`]: replace each addressed field token with its
/// decrypted value.
///
/// # Errors
///
/// Fails as a whole on the first malformed or unauthentic token; the
/// record is left partially transformed and must be discarded.
pub fn open_fields(
    record: &mut serde_json::Value,
    paths: &FieldPaths,
    key: &SymmetricKey,
) -> Result<(), ProtectError> {
    for path in paths {
        let segments = parse_path(path);
        transform_at_path(record, &segments, &mut |s| decode_field(key, s))?;
    }
    Ok(())
}

/// Recursively navigate `value` following `segments` and rewrite any string
/// leaf found at the end of the path.
fn transform_at_path<F>(
    value: &mut serde_json::Value,
    segments: &[PathSegment],
    transform: &mut F,
) -> Result<(), ProtectError>
where
    F: FnMut(&str) -> Result<String, ProtectError>,
{
    if segments.is_empty() {
        if let serde_json::Value::String(s) = value {
            *value = serde_json::Value::String(transform(s)?);
        }
        return Ok(());
    }

    match &segments[0] {
        PathSegment::Key(key) => {
            if let serde_json::Value::Object(map) = value {
                if let Some(child) = map.get_mut(key) {
                    transform_at_path(child, &segments[1..], transform)?;
                }
            }
        }
        PathSegment::ArrayItem => {
            if let serde_json::Value::Array(arr) = value {
                for item in arr.iter_mut() {
                    transform_at_path(item, &segments[1..], transform)?;
                }
            }
        }
    }
    Ok(())
}
