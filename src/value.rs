//! Typed field values
//!
//! Every declared attribute, simple element and content field stores an [`XmlValue`].
//! Converters translate between these values and their XML text.

use crate::convert;
use chrono::{DateTime, Utc};
use std::fmt;

/// Value held by a mapped field
#[derive(Debug, Clone, PartialEq)]
pub enum XmlValue {
    /// Plain text
    Text(String),
    /// Floating point number
    Number(f64),
    /// Integer number
    Integer(i64),
    /// Boolean flag
    Boolean(bool),
    /// Binary data
    Bytes(Vec<u8>),
    /// Point in time
    DateTime(DateTime<Utc>),
}

impl XmlValue {
    /// Name of the variant, used in conversion errors
    pub fn type_name(&self) -> &'static str {
        match self {
            XmlValue::Text(_) => "text",
            XmlValue::Number(_) => "number",
            XmlValue::Integer(_) => "integer",
            XmlValue::Boolean(_) => "boolean",
            XmlValue::Bytes(_) => "bytes",
            XmlValue::DateTime(_) => "datetime",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            XmlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            XmlValue::Number(n) => Some(*n),
            XmlValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            XmlValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            XmlValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            XmlValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_date_time(&self) -> Option<&DateTime<Utc>> {
        match self {
            XmlValue::DateTime(d) => Some(d),
            _ => None,
        }
    }
}

/// Canonical text form: numbers in shortest form, bytes as base64,
/// dates as RFC 3339 with milliseconds.
impl fmt::Display for XmlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XmlValue::Text(s) => f.write_str(s),
            XmlValue::Number(n) => write!(f, "{}", n),
            XmlValue::Integer(i) => write!(f, "{}", i),
            XmlValue::Boolean(b) => write!(f, "{}", b),
            XmlValue::Bytes(b) => f.write_str(&convert::to_base64(b)),
            XmlValue::DateTime(d) => f.write_str(&convert::from_date_time(d)),
        }
    }
}

impl From<&str> for XmlValue {
    fn from(value: &str) -> Self {
        XmlValue::Text(value.to_string())
    }
}

impl From<String> for XmlValue {
    fn from(value: String) -> Self {
        XmlValue::Text(value)
    }
}

impl From<f64> for XmlValue {
    fn from(value: f64) -> Self {
        XmlValue::Number(value)
    }
}

impl From<i64> for XmlValue {
    fn from(value: i64) -> Self {
        XmlValue::Integer(value)
    }
}

impl From<bool> for XmlValue {
    fn from(value: bool) -> Self {
        XmlValue::Boolean(value)
    }
}

impl From<Vec<u8>> for XmlValue {
    fn from(value: Vec<u8>) -> Self {
        XmlValue::Bytes(value)
    }
}

impl From<&[u8]> for XmlValue {
    fn from(value: &[u8]) -> Self {
        XmlValue::Bytes(value.to_vec())
    }
}

impl From<DateTime<Utc>> for XmlValue {
    fn from(value: DateTime<Utc>) -> Self {
        XmlValue::DateTime(value)
    }
}
