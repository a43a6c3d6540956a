//! # xmlcore
//!
//! Declarative, schema-driven mapping between Rust types and XML element trees.
//!
//! A mapped type declares once, through a [`SchemaBuilder`](schema::SchemaBuilder), which of
//! its fields are attributes, simple child elements, nested objects or text content. The
//! engine then compiles instances into elements and loads them back without hand-written
//! tree walking.
//!
//! ## Features
//!
//! - Attribute, child element, nested object and text content bindings
//! - Defaults that are suppressed on output, required fields checked both ways
//! - Pluggable value converters (numbers, booleans, base64, hex, dates)
//! - Repeated element groups with occurrence bounds
//! - Namespace-aware parsing and output with minimal `xmlns` declarations
//! - Cached output: unchanged objects are not compiled again
//! - Parse limits against hostile input
//!
//! ## Example
//!
//! ```rust
//! use xmlcore::prelude::*;
//!
//! #[derive(Debug)]
//! struct Test {
//!     object: XmlObject,
//! }
//!
//! impl Mappable for Test {
//!     fn object(&self) -> &XmlObject {
//!         &self.object
//!     }
//!     fn object_mut(&mut self) -> &mut XmlObject {
//!         &mut self.object
//!     }
//! }
//!
//! impl XmlType for Test {
//!     fn declare() -> xmlcore::Result<SchemaDescriptor> {
//!         Ok(SchemaBuilder::element(ElementOptions::new("test"))?
//!             .attribute("required", AttributeOptions::new().with_required(true))?
//!             .build())
//!     }
//!     fn from_object(object: XmlObject) -> Self {
//!         Self { object }
//!     }
//! }
//!
//! let mut test = Test::create()?;
//! assert!(test.to_text().is_err());
//!
//! test.object_mut().set("required", "some")?;
//! assert_eq!(test.to_text()?, r#"<test required="some"/>"#);
//!
//! let loaded = Test::load(r#"<test required="other"/>"#)?;
//! assert_eq!(loaded.object().text("required"), Some("other"));
//! # Ok::<(), xmlcore::Error>(())
//! ```

#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;

// Names and trees
pub mod names;
pub mod namespaces;
pub mod documents;

// Values and converters
pub mod value;
pub mod convert;
pub mod converters;

// Mapping engine
pub mod schema;
pub mod object;
pub mod collection;

// Re-exports for convenience
pub use collection::{MemberSet, XmlCollection};
pub use documents::{XmlDocument, XmlElement, XmlNode};
pub use error::{Error, Result};
pub use limits::Limits;
pub use namespaces::{select_namespaces, NamespaceScope, QName, XmlNamespace};
pub use object::{Mappable, MappableExt, XmlObject, XmlSource, XmlType};
pub use value::XmlValue;

/// Everything needed to declare and use mapped types
pub mod prelude {
    pub use crate::collection::{MemberSet, XmlCollection};
    pub use crate::converters::{
        create_converter, Base64Converter, BooleanConverter, Converter, ConverterType,
        DateTimeConverter, HexConverter, IntegerConverter, NumberConverter, SharedConverter,
    };
    pub use crate::documents::{XmlDocument, XmlElement};
    pub use crate::object::{Mappable, MappableExt, XmlObject, XmlType};
    pub use crate::schema::{
        AttributeOptions, ChildOptions, ContentOptions, ElementOptions, MaxOccurs, NestedOptions,
        SchemaBuilder, SchemaDescriptor,
    };
    pub use crate::value::XmlValue;
}

/// Version of the xmlcore library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// XML namespace
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// XMLNS namespace
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";
