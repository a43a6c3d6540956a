//! Declarative schema construction
//!
//! Types describe their XML shape by chaining declarations on a [`SchemaBuilder`]:
//!
//! ```
//! use xmlcore::schema::{AttributeOptions, ChildOptions, ElementOptions, SchemaBuilder};
//!
//! let schema = SchemaBuilder::element(
//!     ElementOptions::new("reference").with_namespace("http://www.w3.org/2000/09/xmldsig#"),
//! )?
//! .attribute("uri", AttributeOptions::new().with_local_name("URI"))?
//! .child("digest", ChildOptions::new().with_local_name("DigestValue").with_required(true))?
//! .build();
//!
//! assert_eq!(schema.local_name(), "reference");
//! assert_eq!(schema.items().len(), 2);
//! # Ok::<(), xmlcore::Error>(())
//! ```

use super::{
    ContentBinding, FieldBinding, MaxOccurs, NestedBinding, Parser, SchemaDescriptor, ValueBinding,
};
use crate::converters::SharedConverter;
use crate::error::{Error, Result};
use crate::names::validate_ncname;
use crate::object::Mappable;
use crate::value::XmlValue;
use indexmap::IndexMap;
use std::sync::Arc;

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn validate_prefix(prefix: Option<&str>) -> Result<()> {
    match prefix {
        Some(prefix) => validate_ncname(prefix),
        None => Ok(()),
    }
}

/// Element-level declaration options
#[derive(Debug, Clone, Default)]
pub struct ElementOptions {
    local_name: Option<String>,
    namespace_uri: Option<String>,
    prefix: Option<String>,
    parser: Option<Parser>,
}

impl ElementOptions {
    /// Options for an element named `local_name`
    pub fn new(local_name: impl Into<String>) -> Self {
        Self {
            local_name: Some(local_name.into()),
            ..Default::default()
        }
    }

    /// Set the local name
    pub fn with_local_name(mut self, local_name: impl Into<String>) -> Self {
        self.local_name = Some(local_name.into());
        self
    }

    /// Set the namespace URI
    pub fn with_namespace(mut self, namespace_uri: impl Into<String>) -> Self {
        self.namespace_uri = Some(namespace_uri.into());
        self
    }

    /// Set the default prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set the member type of a collection
    pub fn with_parser(mut self, parser: Parser) -> Self {
        self.parser = Some(parser);
        self
    }
}

/// Options for attribute and simple child element declarations
#[derive(Debug, Clone, Default)]
pub struct ValueOptions {
    local_name: Option<String>,
    namespace_uri: Option<String>,
    prefix: Option<String>,
    required: bool,
    default_value: Option<XmlValue>,
    converter: Option<SharedConverter>,
}

/// Options for [`SchemaBuilder::attribute`]
pub type AttributeOptions = ValueOptions;

/// Options for [`SchemaBuilder::child`]
pub type ChildOptions = ValueOptions;

impl ValueOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the local name (defaults to the field key)
    pub fn with_local_name(mut self, local_name: impl Into<String>) -> Self {
        self.local_name = Some(local_name.into());
        self
    }

    /// Set the namespace URI
    pub fn with_namespace(mut self, namespace_uri: impl Into<String>) -> Self {
        self.namespace_uri = Some(namespace_uri.into());
        self
    }

    /// Set the prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Mark the value as required
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set the default value
    pub fn with_default(mut self, value: impl Into<XmlValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Set the converter
    pub fn with_converter(mut self, converter: SharedConverter) -> Self {
        self.converter = Some(converter);
        self
    }
}

/// Options for [`SchemaBuilder::nested`]
#[derive(Debug, Clone)]
pub struct NestedOptions {
    parser: Parser,
    local_name: Option<String>,
    namespace_uri: Option<String>,
    prefix: Option<String>,
    required: bool,
    min_occurs: usize,
    max_occurs: MaxOccurs,
    no_root: bool,
}

impl NestedOptions {
    /// Options for a nested object of the type described by `parser`.
    ///
    /// Name, namespace and prefix default to those of the nested type.
    pub fn new(parser: Parser) -> Self {
        Self {
            parser,
            local_name: None,
            namespace_uri: None,
            prefix: None,
            required: false,
            min_occurs: 0,
            max_occurs: MaxOccurs::Unbounded,
            no_root: false,
        }
    }

    pub fn with_local_name(mut self, local_name: impl Into<String>) -> Self {
        self.local_name = Some(local_name.into());
        self
    }

    pub fn with_namespace(mut self, namespace_uri: impl Into<String>) -> Self {
        self.namespace_uri = Some(namespace_uri.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set the minimum number of collection members
    pub fn with_min_occurs(mut self, min: usize) -> Self {
        self.min_occurs = min;
        self
    }

    /// Set the maximum number of collection members
    pub fn with_max_occurs(mut self, max: impl Into<MaxOccurs>) -> Self {
        self.max_occurs = max.into();
        self
    }

    /// Write collection members straight into the parent element
    pub fn with_no_root(mut self, no_root: bool) -> Self {
        self.no_root = no_root;
        self
    }
}

/// Options for [`SchemaBuilder::content`]
#[derive(Debug, Clone, Default)]
pub struct ContentOptions {
    required: bool,
    default_value: Option<XmlValue>,
    converter: Option<SharedConverter>,
}

impl ContentOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_default(mut self, value: impl Into<XmlValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_converter(mut self, converter: SharedConverter) -> Self {
        self.converter = Some(converter);
        self
    }
}

/// Builder for [`SchemaDescriptor`]
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    descriptor: SchemaDescriptor,
}

impl SchemaBuilder {
    /// Start a schema for a new element type
    pub fn element(options: ElementOptions) -> Result<Self> {
        let local_name = non_empty(options.local_name)
            .ok_or_else(|| Error::DecoratorNullParam("element".into(), "localName".into()))?;
        validate_ncname(&local_name)?;
        let prefix = non_empty(options.prefix);
        validate_prefix(prefix.as_deref())?;

        Ok(Self {
            descriptor: SchemaDescriptor {
                local_name,
                namespace_uri: non_empty(options.namespace_uri),
                prefix,
                parser: options.parser,
                items: Arc::new(IndexMap::new()),
            },
        })
    }

    /// Start a schema for a subtype of `base`.
    ///
    /// Options that are not set are inherited. The field map is shared with the base
    /// until the first declaration on the subtype.
    pub fn extend(base: &SchemaDescriptor, options: ElementOptions) -> Result<Self> {
        let local_name = non_empty(options.local_name).unwrap_or_else(|| base.local_name.clone());
        validate_ncname(&local_name)?;
        let prefix = non_empty(options.prefix).or_else(|| base.prefix.clone());
        validate_prefix(prefix.as_deref())?;

        Ok(Self {
            descriptor: SchemaDescriptor {
                local_name,
                namespace_uri: non_empty(options.namespace_uri).or_else(|| base.namespace_uri.clone()),
                prefix,
                parser: options.parser.or(base.parser),
                items: Arc::clone(&base.items),
            },
        })
    }

    /// Declare an attribute field
    pub fn attribute(self, key: &str, options: AttributeOptions) -> Result<Self> {
        let binding = Self::value_binding("attribute", key, options)?;
        self.insert(key, FieldBinding::Attribute(binding))
    }

    /// Declare a simple child element field
    pub fn child(self, key: &str, options: ChildOptions) -> Result<Self> {
        let binding = Self::value_binding("child", key, options)?;
        self.insert(key, FieldBinding::Element(binding))
    }

    /// Declare a nested object or collection field
    pub fn nested(self, key: &str, options: NestedOptions) -> Result<Self> {
        check_key("nested", key)?;
        if !options.max_occurs.allows(options.min_occurs) {
            return Err(Error::DecoratorInvalidParam("nested".into(), "minOccurs".into()));
        }

        let nested = options.parser.schema()?;
        // only collection members can be written without a wrapping element
        if options.no_root && options.parser.create()?.members().is_none() {
            return Err(Error::DecoratorInvalidParam("nested".into(), "noRoot".into()));
        }
        let local_name =
            non_empty(options.local_name).unwrap_or_else(|| nested.local_name().to_string());
        validate_ncname(&local_name)?;
        let prefix = non_empty(options.prefix).or_else(|| nested.prefix().map(str::to_string));
        validate_prefix(prefix.as_deref())?;

        let binding = NestedBinding {
            parser: options.parser,
            local_name,
            namespace_uri: non_empty(options.namespace_uri)
                .or_else(|| nested.namespace_uri().map(str::to_string)),
            prefix,
            required: options.required,
            min_occurs: options.min_occurs,
            max_occurs: options.max_occurs,
            no_root: options.no_root,
        };
        self.insert(key, FieldBinding::Nested(binding))
    }

    /// Declare the text content field
    pub fn content(self, key: &str, options: ContentOptions) -> Result<Self> {
        check_key("content", key)?;
        let binding = ContentBinding {
            required: options.required,
            default_value: options.default_value,
            converter: options.converter,
        };
        self.insert(key, FieldBinding::Content(binding))
    }

    /// Finish the schema
    pub fn build(self) -> SchemaDescriptor {
        self.descriptor
    }

    fn value_binding(declaration: &str, key: &str, options: ValueOptions) -> Result<ValueBinding> {
        check_key(declaration, key)?;
        let local_name = non_empty(options.local_name).unwrap_or_else(|| key.to_string());
        validate_ncname(&local_name)?;
        let prefix = non_empty(options.prefix);
        validate_prefix(prefix.as_deref())?;

        Ok(ValueBinding {
            local_name,
            namespace_uri: non_empty(options.namespace_uri),
            prefix,
            required: options.required,
            default_value: options.default_value,
            converter: options.converter,
        })
    }

    fn insert(mut self, key: &str, binding: FieldBinding) -> Result<Self> {
        log::trace!(
            "<{}> declares field '{}' as {:?}",
            self.descriptor.local_name,
            key,
            binding.local_name()
        );
        Arc::make_mut(&mut self.descriptor.items).insert(key.to_string(), binding);
        Ok(self)
    }
}

fn check_key(declaration: &str, key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::DecoratorNullParam(declaration.into(), "key".into()));
    }
    Ok(())
}
