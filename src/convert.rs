//! Byte and date codecs
//!
//! Conversions between binary buffers and their text encodings, plus the ISO-8601
//! date format used for date-time fields.

use crate::error::{Error, Result};
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use chrono::{DateTime, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// Text encoding of a byte buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BufferEncoding {
    /// UTF-8 text
    #[default]
    Utf8,
    /// One character per byte (latin-1)
    Binary,
    /// Lowercase hexadecimal
    Hex,
    /// Standard base64 with padding
    Base64,
    /// URL-safe base64 without padding
    Base64Url,
}

impl BufferEncoding {
    /// Name of the encoding
    pub fn as_str(&self) -> &'static str {
        match self {
            BufferEncoding::Utf8 => "utf8",
            BufferEncoding::Binary => "binary",
            BufferEncoding::Hex => "hex",
            BufferEncoding::Base64 => "base64",
            BufferEncoding::Base64Url => "base64url",
        }
    }
}

impl fmt::Display for BufferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BufferEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "utf8" => Ok(BufferEncoding::Utf8),
            "binary" => Ok(BufferEncoding::Binary),
            "hex" => Ok(BufferEncoding::Hex),
            "base64" => Ok(BufferEncoding::Base64),
            "base64url" => Ok(BufferEncoding::Base64Url),
            _ => Err(Error::ConverterUnsupported(s.to_string())),
        }
    }
}

/// Encode `buffer` as text
pub fn to_string(buffer: &[u8], encoding: BufferEncoding) -> Result<String> {
    match encoding {
        BufferEncoding::Utf8 => to_utf8_string(buffer),
        BufferEncoding::Binary => Ok(to_binary(buffer)),
        BufferEncoding::Hex => Ok(to_hex(buffer)),
        BufferEncoding::Base64 => Ok(to_base64(buffer)),
        BufferEncoding::Base64Url => Ok(to_base64_url(buffer)),
    }
}

/// Decode `text` into bytes
pub fn from_string(text: &str, encoding: BufferEncoding) -> Result<Vec<u8>> {
    match encoding {
        BufferEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
        BufferEncoding::Binary => from_binary(text),
        BufferEncoding::Hex => from_hex(text),
        BufferEncoding::Base64 => from_base64(text),
        BufferEncoding::Base64Url => from_base64_url(text),
    }
}

// =============================================================================
// UTF-8 and binary
// =============================================================================

/// Decode a UTF-8 buffer
pub fn to_utf8_string(buffer: &[u8]) -> Result<String> {
    String::from_utf8(buffer.to_vec())
        .map_err(|e| Error::ConversionFailed(format!("invalid UTF-8 data: {}", e)))
}

/// Map every byte to the character with the same code point
pub fn to_binary(buffer: &[u8]) -> String {
    buffer.iter().map(|&b| char::from(b)).collect()
}

/// Inverse of [`to_binary`]; characters above U+00FF cannot be represented
pub fn from_binary(text: &str) -> Result<Vec<u8>> {
    text.chars()
        .map(|c| {
            u8::try_from(u32::from(c)).map_err(|_| {
                Error::ConversionFailed(format!("character '{}' is not a single byte", c))
            })
        })
        .collect()
}

// =============================================================================
// Hex
// =============================================================================

static HEX_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9a-fA-F]{2})*$").unwrap());

/// Encode bytes as lowercase hex
pub fn to_hex(buffer: &[u8]) -> String {
    buffer.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Decode a hex string (either case)
pub fn from_hex(text: &str) -> Result<Vec<u8>> {
    if !HEX_PATTERN.is_match(text) {
        return Err(Error::ConversionFailed(format!(
            "'{}' is not a valid hexadecimal encoding",
            text
        )));
    }
    (0..text.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&text[i..i + 2], 16)
                .map_err(|e| Error::ConversionFailed(format!("invalid hex byte: {}", e)))
        })
        .collect()
}

// =============================================================================
// Base64
// =============================================================================

/// Encode bytes as standard base64
pub fn to_base64(buffer: &[u8]) -> String {
    STANDARD.encode(buffer)
}

/// Decode standard base64, ignoring embedded whitespace
pub fn from_base64(text: &str) -> Result<Vec<u8>> {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD
        .decode(cleaned)
        .map_err(|e| Error::ConversionFailed(format!("not a valid base64 encoding: {}", e)))
}

/// Encode bytes as URL-safe base64 without padding
pub fn to_base64_url(buffer: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(buffer)
}

/// Decode URL-safe base64; padding is optional
pub fn from_base64_url(text: &str) -> Result<Vec<u8>> {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '=')
        .collect();
    URL_SAFE_NO_PAD
        .decode(cleaned)
        .map_err(|e| Error::ConversionFailed(format!("not a valid base64url encoding: {}", e)))
}

// =============================================================================
// Dates
// =============================================================================

/// Parse an RFC 3339 / ISO-8601 date-time
pub fn to_date_time(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text.trim())
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| Error::ConversionFailed(format!("'{}' is not a valid date-time: {}", text, e)))
}

/// Format a date-time as ISO-8601 with millisecond precision and `Z`
pub fn from_date_time(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}
