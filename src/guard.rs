//! Argument checks applied before anything crosses into libvcx.

use std::ffi::CString;

use crate::error::{Result, VcxError};

/// Converts `value` for the native side, rejecting interior NUL bytes.
pub fn to_c_string(value: &str, name: &'static str) -> Result<CString> {
    CString::new(value).map_err(|e| VcxError::InvalidParam {
        name,
        reason: format!("contains a NUL byte at position {}", e.nul_position()),
    })
}

/// Like [`to_c_string`], but also rejects empty and whitespace-only values.
pub fn not_blank(value: &str, name: &'static str) -> Result<CString> {
    if value.trim().is_empty() {
        return Err(VcxError::InvalidParam {
            name,
            reason: "must not be empty or whitespace".to_string(),
        });
    }
    to_c_string(value, name)
}

/// Converts an optional argument; `None` crosses the boundary as null.
pub fn optional(value: Option<&str>, name: &'static str) -> Result<Option<CString>> {
    value.map(|v| to_c_string(v, name)).transpose()
}
