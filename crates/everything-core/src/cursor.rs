//! Opaque pagination cursor codec.
//!
//! A cursor is the base64 encoding of the decimal start index into the
//! resource list. The encoding is an opaque contract: clients must not
//! interpret it, and an undecodable cursor is treated as "start from the
//! beginning" rather than an error.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Encode a start index as an opaque cursor.
pub fn encode(index: usize) -> String {
    STANDARD.encode(index.to_string())
}

/// Decode a cursor back to a start index.
///
/// Returns `None` for cursors that are not valid base64 or do not contain
/// a decimal integer.
pub fn decode(cursor: &str) -> Option<usize> {
    let bytes = STANDARD.decode(cursor).ok()?;
    let text = String::from_utf8(bytes).ok()?;
    text.trim().parse().ok()
}
