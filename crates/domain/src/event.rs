//! Device events — one `<DEVICE_CODE>:<VALUE>` line from the device stream.

use crate::error::MalformedLineError;

/// Separator between the device code and the value on a line.
pub const SEPARATOR: char = ':';

/// Canonical form of a device code or value token: trimmed, upper-cased.
///
/// Shared by the line decoder and the registry so both sides agree on
/// non-ASCII codes.
pub(crate) fn normalize_token(token: &str) -> String {
    token.trim().to_uppercase()
}

/// An event as decoded from one device line, before registry resolution.
///
/// Both parts are trimmed and upper-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub device_code: String,
    pub raw_value: String,
}

impl RawEvent {
    /// Decode a single line (without its terminator).
    ///
    /// Blank lines yield `Ok(None)`: they are keep-alive noise, not errors.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedLineError`] when the line has no separator or when
    /// either side of it is empty.
    pub fn parse_line(line: &str) -> Result<Option<Self>, MalformedLineError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (code, value) = line
            .split_once(SEPARATOR)
            .ok_or(MalformedLineError::MissingSeparator)?;

        let device_code = normalize_token(code);
        if device_code.is_empty() {
            return Err(MalformedLineError::EmptyDeviceCode);
        }
        let raw_value = normalize_token(value);
        if raw_value.is_empty() {
            return Err(MalformedLineError::EmptyValue);
        }

        Ok(Some(Self {
            device_code,
            raw_value,
        }))
    }
}
