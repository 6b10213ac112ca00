//! Input checks for values that end up inside vendor URLs.
//!
//! Search values are percent-encoded into a query string, and lookup ids
//! become a path segment on the caller's side. Both are screened for
//! characters that cannot survive that trip; everything else is left to the
//! caller's own encoding.

use thiserror::Error;

/// Validation error types
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("value is empty")]
    Empty,

    #[error("contains null byte")]
    NullByte,

    #[error("contains control character U+{0:04X}")]
    ControlCharacter(u32),

    #[error("path traversal detected: {0}")]
    PathTraversal(String),
}

/// Check that a search value can be encoded into a vendor query.
///
/// Tabs and line breaks are allowed, other control characters are not.
pub fn check_search_value(value: &str) -> Result<(), ValidationError> {
    if value.contains('\0') {
        return Err(ValidationError::NullByte);
    }

    for ch in value.chars() {
        if ch.is_control() && ch != '\t' && ch != '\n' && ch != '\r' {
            return Err(ValidationError::ControlCharacter(ch as u32));
        }
    }

    Ok(())
}

/// Validate a record id from an `id = ...` lookup.
///
/// Rejects only what cannot be a single path segment: an empty id,
/// separators, `..` and control characters. Returns the trimmed id.
pub fn sanitize_lookup_id(id: &str) -> Result<String, ValidationError> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Empty);
    }

    if id.contains("..") || id.contains('/') || id.contains('\\') {
        return Err(ValidationError::PathTraversal(id.to_string()));
    }

    check_search_value(id)?;
    if let Some(ch) = id.chars().find(|c| c.is_control()) {
        return Err(ValidationError::ControlCharacter(ch as u32));
    }

    Ok(id.to_string())
}
