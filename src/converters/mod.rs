//! Field value converters
//!
//! A converter translates a field's typed value to the text written into XML and back.
//! Converters are attached to individual attribute, element or content declarations.
//!
//! Built-in converters:
//! - [`NumberConverter`]: floating point numbers
//! - [`IntegerConverter`]: integers
//! - [`BooleanConverter`]: `true` / `false`
//! - [`Base64Converter`]: binary data as base64
//! - [`HexConverter`]: binary data as hex
//! - [`DateTimeConverter`]: ISO-8601 date-times

mod builtin;

pub use builtin::{
    Base64Converter, BooleanConverter, DateTimeConverter, HexConverter, IntegerConverter,
    NumberConverter,
};

use crate::error::Result;
use crate::value::XmlValue;
use std::fmt::Debug;
use std::sync::Arc;

/// Two-way transform between a field value and its XML text
pub trait Converter: Send + Sync + Debug {
    /// Text form of `value`; `None` means the field has no text form and is omitted
    fn encode(&self, value: &XmlValue) -> Result<Option<String>>;

    /// Value read back from XML text
    fn decode(&self, text: &str) -> Result<XmlValue>;
}

/// Converter shared between schema descriptors
pub type SharedConverter = Arc<dyn Converter>;

/// Converter type enumeration for selecting a built-in converter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConverterType {
    Number,
    Integer,
    Boolean,
    Base64,
    Hex,
    DateTime,
}

/// Create a shared built-in converter by type
pub fn create_converter(conv_type: ConverterType) -> SharedConverter {
    match conv_type {
        ConverterType::Number => Arc::new(NumberConverter),
        ConverterType::Integer => Arc::new(IntegerConverter),
        ConverterType::Boolean => Arc::new(BooleanConverter),
        ConverterType::Base64 => Arc::new(Base64Converter),
        ConverterType::Hex => Arc::new(HexConverter),
        ConverterType::DateTime => Arc::new(DateTimeConverter),
    }
}

/// Text written for `value`, through `converter` when one is set
pub(crate) fn encode_value(
    converter: Option<&SharedConverter>,
    value: &XmlValue,
) -> Result<Option<String>> {
    match converter {
        Some(converter) => converter.encode(value),
        None => Ok(Some(value.to_string())),
    }
}

/// Value read from `text`, through `converter` when one is set
pub(crate) fn decode_value(converter: Option<&SharedConverter>, text: &str) -> Result<XmlValue> {
    match converter {
        Some(converter) => converter.decode(text),
        None => Ok(XmlValue::Text(text.to_string())),
    }
}
