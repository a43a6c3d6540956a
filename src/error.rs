//! Error types for xmlcore
//!
//! Every failure the mapping engine can report is a variant of [`Error`]. Each variant
//! carries a stable numeric code (see [`Error::code`]) and renders as
//! `XML<code>: <message>`, with the variant fields substituted into the message template.

use crate::schema::MaxOccurs;
use thiserror::Error;

/// Result type alias using xmlcore Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for xmlcore operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A value that must exist was not there
    #[error("XML0001: Null reference")]
    NullReference,

    /// An owner has no usable object under the given name
    #[error("XML0002: '{0}' has empty '{1}' object")]
    NullParam(String, String),

    /// A declaration was made without one of its mandatory parameters
    #[error("XML0003: Declaration '{0}' has empty '{1}' parameter")]
    DecoratorNullParam(String, String),

    /// A repeated element group violates its occurrence bounds
    #[error(
        "XML0004: Collection of '{member}' in element '{owner}' has wrong amount of items '{count}', should be [{min},{max}]"
    )]
    CollectionLimit {
        /// Local name of the repeated member (or of the collection)
        member: String,
        /// Local name of the element owning the collection
        owner: String,
        /// Number of members found
        count: usize,
        /// Minimum allowed number of members
        min: usize,
        /// Maximum allowed number of members
        max: MaxOccurs,
    },

    /// Operation exists but has no implementation
    #[error("XML0005: Method is not implemented")]
    MethodNotImplemented,

    /// Operation is not supported by this object
    #[error("XML0006: Method is not supported")]
    MethodNotSupported,

    /// A mandatory argument was not supplied
    #[error("XML0007: Required parameter is missing '{0}'")]
    ParamRequired(String),

    /// No converter or codec exists for the requested format
    #[error("XML0008: Converter is not supported '{0}'")]
    ConverterUnsupported(String),

    /// Element name or namespace does not match the declared schema
    #[error("XML0009: Malformed element '{0}'")]
    ElementMalformed(String),

    /// Required child element is absent
    #[error("XML0010: Element '{0}' is missing in '{1}'")]
    ElementMissing(String, String),

    /// Required attribute is absent
    #[error("XML0011: Attribute '{0}' is missing in '{1}'")]
    AttributeMissing(String, String),

    /// Required text content is absent
    #[error("XML0012: Content is missing in '{0}'")]
    ContentMissing(String),

    /// XML syntax or tree error
    #[error("XML0013: XML exception: {0}")]
    XmlException(String),

    /// A value could not be converted to or from its text form
    #[error("XML0014: Conversion failed: {0}")]
    ConversionFailed(String),

    /// A declared name is not a valid XML name
    #[error("XML0015: Invalid XML name '{0}'")]
    NameInvalid(String),

    /// A parse limit was exceeded
    #[error("XML0016: Limit exceeded: {0}")]
    LimitExceeded(String),

    /// A declaration parameter has an inconsistent value
    #[error("XML0017: Declaration '{0}' has invalid '{1}' parameter")]
    DecoratorInvalidParam(String, String),
}

impl Error {
    /// Numeric code of the error kind
    pub fn code(&self) -> u16 {
        match self {
            Error::NullReference => 1,
            Error::NullParam(..) => 2,
            Error::DecoratorNullParam(..) => 3,
            Error::CollectionLimit { .. } => 4,
            Error::MethodNotImplemented => 5,
            Error::MethodNotSupported => 6,
            Error::ParamRequired(_) => 7,
            Error::ConverterUnsupported(_) => 8,
            Error::ElementMalformed(_) => 9,
            Error::ElementMissing(..) => 10,
            Error::AttributeMissing(..) => 11,
            Error::ContentMissing(_) => 12,
            Error::XmlException(_) => 13,
            Error::ConversionFailed(_) => 14,
            Error::NameInvalid(_) => 15,
            Error::LimitExceeded(_) => 16,
            Error::DecoratorInvalidParam(..) => 17,
        }
    }

    pub(crate) fn attribute_missing(local_name: &str, owner: &str) -> Self {
        Error::AttributeMissing(local_name.to_string(), owner.to_string())
    }

    pub(crate) fn element_missing(local_name: &str, owner: &str) -> Self {
        Error::ElementMissing(local_name.to_string(), owner.to_string())
    }
}

impl From<roxmltree::Error> for Error {
    fn from(err: roxmltree::Error) -> Self {
        Error::XmlException(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlException(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_templates() {
        let err = Error::attribute_missing("required", "test");
        assert_eq!(
            err.to_string(),
            "XML0011: Attribute 'required' is missing in 'test'"
        );

        let err = Error::element_missing("name", "root");
        assert_eq!(err.to_string(), "XML0010: Element 'name' is missing in 'root'");

        let err = Error::NullParam("test".into(), "element".into());
        assert_eq!(err.to_string(), "XML0002: 'test' has empty 'element' object");
    }

    #[test]
    fn test_collection_limit_renders_unbounded() {
        let err = Error::CollectionLimit {
            member: "transform".into(),
            owner: "test".into(),
            count: 0,
            min: 1,
            max: MaxOccurs::Unbounded,
        };
        let msg = err.to_string();
        assert!(msg.starts_with("XML0004:"));
        assert!(msg.contains("[1,unbounded]"));

        let err = Error::CollectionLimit {
            member: "transform".into(),
            owner: "test".into(),
            count: 5,
            min: 1,
            max: MaxOccurs::Bounded(4),
        };
        assert!(err.to_string().contains("'5', should be [1,4]"));
    }

    #[test]
    fn test_codes_are_distinct() {
        let errors = vec![
            Error::NullReference,
            Error::NullParam(String::new(), String::new()),
            Error::DecoratorNullParam(String::new(), String::new()),
            Error::MethodNotImplemented,
            Error::MethodNotSupported,
            Error::ParamRequired(String::new()),
            Error::ConverterUnsupported(String::new()),
            Error::ElementMalformed(String::new()),
            Error::ElementMissing(String::new(), String::new()),
            Error::AttributeMissing(String::new(), String::new()),
            Error::ContentMissing(String::new()),
            Error::XmlException(String::new()),
            Error::ConversionFailed(String::new()),
            Error::NameInvalid(String::new()),
            Error::LimitExceeded(String::new()),
            Error::DecoratorInvalidParam(String::new(), String::new()),
        ];
        let mut codes: Vec<u16> = errors.iter().map(Error::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_xml_syntax_error_conversion() {
        let parse_err = roxmltree::Document::parse("<open>").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::XmlException(_)));
        assert_eq!(err.code(), 13);
    }
}
