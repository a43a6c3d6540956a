//! Built-in converters

use super::Converter;
use crate::convert;
use crate::error::{Error, Result};
use crate::value::XmlValue;

fn wrong_variant(expected: &str, value: &XmlValue) -> Error {
    Error::ConversionFailed(format!(
        "expected a {} value, got {}",
        expected,
        value.type_name()
    ))
}

/// Floating point numbers
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberConverter;

impl Converter for NumberConverter {
    fn encode(&self, value: &XmlValue) -> Result<Option<String>> {
        let n = value.as_f64().ok_or_else(|| wrong_variant("number", value))?;
        let text = if n.is_nan() {
            "NaN".to_string()
        } else if n == f64::INFINITY {
            "Infinity".to_string()
        } else if n == f64::NEG_INFINITY {
            "-Infinity".to_string()
        } else {
            n.to_string()
        };
        Ok(Some(text))
    }

    fn decode(&self, text: &str) -> Result<XmlValue> {
        let trimmed = text.trim();
        let n = match trimmed {
            "" => 0.0,
            "NaN" => f64::NAN,
            "Infinity" | "+Infinity" | "INF" => f64::INFINITY,
            "-Infinity" | "-INF" => f64::NEG_INFINITY,
            _ => trimmed
                .parse::<f64>()
                .map_err(|_| Error::ConversionFailed(format!("'{}' is not a number", text)))?,
        };
        Ok(XmlValue::Number(n))
    }
}

/// Integers
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerConverter;

impl Converter for IntegerConverter {
    fn encode(&self, value: &XmlValue) -> Result<Option<String>> {
        let i = value.as_i64().ok_or_else(|| wrong_variant("integer", value))?;
        Ok(Some(i.to_string()))
    }

    fn decode(&self, text: &str) -> Result<XmlValue> {
        text.trim()
            .parse::<i64>()
            .map(XmlValue::Integer)
            .map_err(|_| Error::ConversionFailed(format!("'{}' is not an integer", text)))
    }
}

/// Booleans written as `true` / `false`; `1` and `0` are accepted on read
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanConverter;

impl Converter for BooleanConverter {
    fn encode(&self, value: &XmlValue) -> Result<Option<String>> {
        let b = value.as_bool().ok_or_else(|| wrong_variant("boolean", value))?;
        Ok(Some(if b { "true" } else { "false" }.to_string()))
    }

    fn decode(&self, text: &str) -> Result<XmlValue> {
        match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(XmlValue::Boolean(true)),
            "false" | "0" => Ok(XmlValue::Boolean(false)),
            _ => Err(Error::ConversionFailed(format!(
                "'{}' is not a valid boolean value",
                text
            ))),
        }
    }
}

/// Binary data as base64. Empty buffers have no text form.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Converter;

impl Converter for Base64Converter {
    fn encode(&self, value: &XmlValue) -> Result<Option<String>> {
        let bytes = value.as_bytes().ok_or_else(|| wrong_variant("bytes", value))?;
        if bytes.is_empty() {
            return Ok(None);
        }
        Ok(Some(convert::to_base64(bytes)))
    }

    fn decode(&self, text: &str) -> Result<XmlValue> {
        convert::from_base64(text).map(XmlValue::Bytes)
    }
}

/// Binary data as lowercase hex
#[derive(Debug, Clone, Copy, Default)]
pub struct HexConverter;

impl Converter for HexConverter {
    fn encode(&self, value: &XmlValue) -> Result<Option<String>> {
        let bytes = value.as_bytes().ok_or_else(|| wrong_variant("bytes", value))?;
        if bytes.is_empty() {
            return Ok(None);
        }
        Ok(Some(convert::to_hex(bytes)))
    }

    fn decode(&self, text: &str) -> Result<XmlValue> {
        convert::from_hex(text.trim()).map(XmlValue::Bytes)
    }
}

/// ISO-8601 date-times
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeConverter;

impl Converter for DateTimeConverter {
    fn encode(&self, value: &XmlValue) -> Result<Option<String>> {
        let date = value
            .as_date_time()
            .ok_or_else(|| wrong_variant("datetime", value))?;
        Ok(Some(convert::from_date_time(date)))
    }

    fn decode(&self, text: &str) -> Result<XmlValue> {
        convert::to_date_time(text).map(XmlValue::DateTime)
    }
}
