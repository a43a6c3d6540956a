//! Schema descriptors
//!
//! A [`SchemaDescriptor`] records, once per mapped type, the element name of the type and
//! how each of its fields maps to XML: as an attribute, a simple child element, a nested
//! mapped object or the element's text content. Descriptors are immutable once built and
//! shared through `Arc`; subtypes copy their base's field map on first write.

mod builder;
mod registry;

pub use builder::{
    AttributeOptions, ChildOptions, ContentOptions, ElementOptions, NestedOptions, SchemaBuilder,
    ValueOptions,
};
pub use registry::{Parser, SchemaRegistry};

use crate::converters::SharedConverter;
use crate::error::{Error, Result};
use crate::value::XmlValue;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Maximum number of occurrences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaxOccurs {
    /// At most this many
    Bounded(usize),
    /// No upper limit
    #[default]
    Unbounded,
}

impl MaxOccurs {
    /// Whether `count` stays within the bound
    pub fn allows(&self, count: usize) -> bool {
        match self {
            MaxOccurs::Bounded(max) => count <= *max,
            MaxOccurs::Unbounded => true,
        }
    }
}

impl fmt::Display for MaxOccurs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaxOccurs::Bounded(max) => write!(f, "{}", max),
            MaxOccurs::Unbounded => f.write_str("unbounded"),
        }
    }
}

impl From<usize> for MaxOccurs {
    fn from(max: usize) -> Self {
        MaxOccurs::Bounded(max)
    }
}

/// Check `count` against `[min, max]`
pub(crate) fn check_occurs(
    member: &str,
    owner: &str,
    count: usize,
    min: usize,
    max: MaxOccurs,
) -> Result<()> {
    if count < min || !max.allows(count) {
        return Err(Error::CollectionLimit {
            member: member.to_string(),
            owner: owner.to_string(),
            count,
            min,
            max,
        });
    }
    Ok(())
}

/// Binding of a field to an attribute or to a simple child element
#[derive(Debug, Clone)]
pub struct ValueBinding {
    /// Local name of the attribute or element
    pub local_name: String,
    /// Namespace URI
    pub namespace_uri: Option<String>,
    /// Preferred prefix
    pub prefix: Option<String>,
    /// Fail when the value is missing
    pub required: bool,
    /// Value that is not written out
    pub default_value: Option<XmlValue>,
    /// Converter between the value and its text
    pub converter: Option<SharedConverter>,
}

/// Binding of a field to a nested mapped object or collection
#[derive(Debug, Clone)]
pub struct NestedBinding {
    /// Type of the nested object
    pub parser: Parser,
    /// Local name of the nested element
    pub local_name: String,
    /// Namespace URI of the nested element
    pub namespace_uri: Option<String>,
    /// Prefix of the nested element
    pub prefix: Option<String>,
    /// Fail when no nested object is present
    pub required: bool,
    /// Minimum number of collection members
    pub min_occurs: usize,
    /// Maximum number of collection members
    pub max_occurs: MaxOccurs,
    /// Write collection members directly into the parent, without a wrapper element
    pub no_root: bool,
}

impl NestedBinding {
    /// Check a collection member count against this binding's bounds
    pub fn check_occurs(&self, count: usize, owner: &str) -> Result<()> {
        check_occurs(&self.local_name, owner, count, self.min_occurs, self.max_occurs)
    }
}

/// Binding of a field to the element's text content
#[derive(Debug, Clone, Default)]
pub struct ContentBinding {
    /// Fail when there is no content
    pub required: bool,
    /// Value that is not written out
    pub default_value: Option<XmlValue>,
    /// Converter between the value and its text
    pub converter: Option<SharedConverter>,
}

/// How a single field maps to XML
#[derive(Debug, Clone)]
pub enum FieldBinding {
    Attribute(ValueBinding),
    Element(ValueBinding),
    Nested(NestedBinding),
    Content(ContentBinding),
}

impl FieldBinding {
    /// Local name of the bound attribute or element
    pub fn local_name(&self) -> Option<&str> {
        match self {
            FieldBinding::Attribute(b) | FieldBinding::Element(b) => Some(&b.local_name),
            FieldBinding::Nested(b) => Some(&b.local_name),
            FieldBinding::Content(_) => None,
        }
    }

    /// Whether the field must be present
    pub fn is_required(&self) -> bool {
        match self {
            FieldBinding::Attribute(b) | FieldBinding::Element(b) => b.required,
            FieldBinding::Nested(b) => b.required,
            FieldBinding::Content(b) => b.required,
        }
    }
}

/// Per-type XML mapping metadata
#[derive(Debug, Clone)]
pub struct SchemaDescriptor {
    local_name: String,
    namespace_uri: Option<String>,
    prefix: Option<String>,
    parser: Option<Parser>,
    items: Arc<IndexMap<String, FieldBinding>>,
}

impl SchemaDescriptor {
    /// Element local name
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Element namespace URI
    pub fn namespace_uri(&self) -> Option<&str> {
        self.namespace_uri.as_deref()
    }

    /// Default element prefix
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Member type of a collection
    pub fn parser(&self) -> Option<&Parser> {
        self.parser.as_ref()
    }

    /// Field bindings in declaration order
    pub fn items(&self) -> &IndexMap<String, FieldBinding> {
        &self.items
    }

    /// Binding of a single field
    pub fn item(&self, key: &str) -> Option<&FieldBinding> {
        self.items.get(key)
    }

    /// Whether two descriptors share the same field map
    pub fn shares_items_with(&self, other: &SchemaDescriptor) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }
}
