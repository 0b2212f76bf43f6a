//! JSON serialization for limit results.

use crate::result::LimitResult;

/// Serialize a LimitResult to a compact JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for LimitResult).
pub fn to_json(result: &LimitResult) -> Result<String, serde_json::Error> {
    serde_json::to_string(result)
}

/// Serialize a LimitResult to a pretty-printed JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for LimitResult).
pub fn to_json_pretty(result: &LimitResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}
