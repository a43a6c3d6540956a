//! Mapped objects
//!
//! An [`XmlObject`] holds the field values of one instance of a mapped type together with
//! its cache state, and implements both directions of the mapping:
//!
//! - compile: build an element from the fields, suppressing values equal to their
//!   defaults and checking required fields and collection bounds;
//! - load: read the fields back from an element, checking its name and namespace.
//!
//! Mapped types wrap an `XmlObject` and implement [`Mappable`] and [`XmlType`]; the
//! instance operations live on [`MappableExt`].

use crate::collection::MemberSet;
use crate::converters::{decode_value, encode_value};
use crate::documents::{XmlDocument, XmlElement};
use crate::error::{Error, Result};
use crate::schema::{
    FieldBinding, NestedBinding, Parser, SchemaDescriptor, SchemaRegistry, ValueBinding,
};
use crate::value::XmlValue;
use indexmap::IndexMap;
use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

/// Access to the concrete type behind a `dyn Mappable`
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// An object that maps to an XML element
pub trait Mappable: AsAny + Debug {
    /// The field storage of this object
    fn object(&self) -> &XmlObject;

    /// Mutable field storage of this object
    fn object_mut(&mut self) -> &mut XmlObject;

    /// Whether the object would produce new output.
    ///
    /// True after a field was set, when a nested object changed, or when the object
    /// holds collection members.
    fn has_changed(&self) -> bool {
        self.object().fields_changed() || self.members().is_some_and(|m| !m.is_empty())
    }

    /// Collection members, for collection types
    fn members(&self) -> Option<&dyn MemberSet> {
        None
    }

    /// Mutable collection members, for collection types
    fn members_mut(&mut self) -> Option<&mut dyn MemberSet> {
        None
    }

    /// Called after the element was compiled from the declared fields
    fn on_get_xml(&self, _element: &mut XmlElement) -> Result<()> {
        Ok(())
    }

    /// Called after the declared fields were loaded from `element`
    fn on_load_xml(&mut self, _element: &XmlElement) -> Result<()> {
        Ok(())
    }
}

/// Source of a load: an element or XML text
#[derive(Debug, Clone, Copy)]
pub enum XmlSource<'a> {
    Element(&'a XmlElement),
    Text(&'a str),
}

impl<'a> From<&'a XmlElement> for XmlSource<'a> {
    fn from(element: &'a XmlElement) -> Self {
        XmlSource::Element(element)
    }
}

impl<'a> From<&'a XmlDocument> for XmlSource<'a> {
    fn from(document: &'a XmlDocument) -> Self {
        XmlSource::Element(document.root())
    }
}

impl<'a> From<&'a str> for XmlSource<'a> {
    fn from(text: &'a str) -> Self {
        XmlSource::Text(text)
    }
}

impl<'a> From<&'a String> for XmlSource<'a> {
    fn from(text: &'a String) -> Self {
        XmlSource::Text(text)
    }
}

/// Instance operations shared by every mapped object
pub trait MappableExt: Mappable {
    /// Compile the object into an element.
    ///
    /// Returns `None` for an unchanged object without a cached element. An untouched
    /// object that still misses a required value is compiled anyway so that the missing
    /// value is reported.
    fn get_xml(&mut self) -> Result<Option<XmlElement>> {
        let object = self.object();
        let force = object.is_pristine() && object.has_missing_required_value();
        self.get_xml_with(force)
    }

    /// Compile the object into an element; `force` compiles even when nothing changed
    fn get_xml_with(&mut self, force: bool) -> Result<Option<XmlElement>> {
        if !force && !self.has_changed() {
            return Ok(self.object().element().cloned());
        }

        let mut element = self.object_mut().compile()?;
        if let Some(members) = self.members_mut() {
            members.compile_members(&mut element)?;
        }
        self.on_get_xml(&mut element)?;

        log::debug!("compiled <{}>", element.qualified_name());
        self.object_mut().cache(element.clone());
        Ok(Some(element))
    }

    /// Load the object from an element or from XML text
    fn load_xml<'a>(&mut self, source: impl Into<XmlSource<'a>>) -> Result<()> {
        match source.into() {
            XmlSource::Element(element) => self.load_element(element),
            XmlSource::Text(text) => {
                let document = XmlDocument::parse(text)?;
                self.load_element(document.root())
            }
        }
    }

    /// Load the object from an element.
    ///
    /// Nothing is changed when loading fails.
    fn load_element(&mut self, element: &XmlElement) -> Result<()> {
        let staged = self.object().read_fields(element)?;
        if let Some(members) = self.members_mut() {
            members.stage_members(element)?;
            members.swap_staged();
        }
        let previous = self.object_mut().commit(staged, element);

        // the hook sees the loaded state; a failing hook puts the previous one back
        let hooked = self.on_load_xml(element);
        if hooked.is_err() {
            self.object_mut().restore(previous);
            if let Some(members) = self.members_mut() {
                members.swap_staged();
            }
        }
        if let Some(members) = self.members_mut() {
            members.drop_staged();
        }
        hooked?;

        log::debug!("loaded <{}>", element.qualified_name());
        Ok(())
    }

    /// XML text of the object, or an empty string when it produces no element
    fn to_text(&mut self) -> Result<String> {
        match self.get_xml()? {
            Some(element) => element.to_xml_string(),
            None => Ok(String::new()),
        }
    }
}

impl<T: Mappable + ?Sized> MappableExt for T {}

/// A mapped type with a declared schema
pub trait XmlType: Mappable + Sized + 'static {
    /// Declare the schema of this type
    fn declare() -> Result<SchemaDescriptor>;

    /// Wrap freshly created field storage
    fn from_object(object: XmlObject) -> Self;

    /// Schema of this type, declared on first use
    fn schema() -> Result<Arc<SchemaDescriptor>> {
        SchemaRegistry::global().resolve::<Self>()
    }

    /// Parser handle used by nested and collection declarations
    fn parser() -> Parser {
        Parser::of::<Self>()
    }

    /// Create a new, empty instance
    fn create() -> Result<Self> {
        Ok(Self::from_object(XmlObject::new(Self::schema()?)?))
    }

    /// Create an instance loaded from an element or from XML text
    fn load<'a>(source: impl Into<XmlSource<'a>>) -> Result<Self> {
        let mut value = Self::create()?;
        value.load_xml(source)?;
        Ok(value)
    }
}

#[derive(Debug)]
enum Slot {
    Value(Option<XmlValue>),
    Nested(Option<Box<dyn Mappable>>),
}

#[derive(Debug, Clone)]
enum CacheState {
    /// Created and never touched
    Pristine,
    /// Changed since the last compile or load
    Dirty,
    /// Matches the cached element
    Compiled(XmlElement),
}

/// Field values of a mapped instance with their cache state
#[derive(Debug)]
pub struct XmlObject {
    schema: Arc<SchemaDescriptor>,
    local_name: String,
    namespace_uri: Option<String>,
    prefix: Option<String>,
    slots: IndexMap<String, Slot>,
    state: CacheState,
}

impl XmlObject {
    /// Create field storage for `schema` with every field at its default.
    ///
    /// Nested objects are created right away.
    pub fn new(schema: Arc<SchemaDescriptor>) -> Result<Self> {
        let mut slots = IndexMap::with_capacity(schema.items().len());
        for (key, binding) in schema.items() {
            let slot = match binding {
                FieldBinding::Attribute(b) | FieldBinding::Element(b) => {
                    Slot::Value(b.default_value.clone())
                }
                FieldBinding::Content(b) => Slot::Value(b.default_value.clone()),
                FieldBinding::Nested(b) => Slot::Nested(Some(create_nested(b)?)),
            };
            slots.insert(key.clone(), slot);
        }

        Ok(Self {
            local_name: schema.local_name().to_string(),
            namespace_uri: schema.namespace_uri().map(str::to_string),
            prefix: schema.prefix().map(str::to_string),
            schema,
            slots,
            state: CacheState::Pristine,
        })
    }

    /// Schema of this object
    pub fn schema(&self) -> &Arc<SchemaDescriptor> {
        &self.schema
    }

    /// Local name used for the element (may differ from the schema's)
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Override the local name used for the element
    pub fn set_local_name(&mut self, local_name: &str) {
        if self.local_name != local_name {
            self.local_name = local_name.to_string();
            self.invalidate();
        }
    }

    /// Namespace URI of the element (may differ from the schema's)
    pub fn namespace_uri(&self) -> Option<&str> {
        self.namespace_uri.as_deref()
    }

    /// Prefix used for the element
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Change the prefix used for the element
    pub fn set_prefix(&mut self, prefix: Option<&str>) {
        self.prefix = prefix.filter(|p| !p.is_empty()).map(str::to_string);
        self.invalidate();
    }

    /// The cached element, if the object is compiled
    pub fn element(&self) -> Option<&XmlElement> {
        match &self.state {
            CacheState::Compiled(element) => Some(element),
            _ => None,
        }
    }

    /// Drop the cached element
    pub fn invalidate(&mut self) {
        self.state = CacheState::Dirty;
    }

    /// Whether the object was never changed, compiled or loaded
    pub fn is_pristine(&self) -> bool {
        matches!(self.state, CacheState::Pristine)
    }

    /// Whether this object or any nested object changed since the last compile or load
    pub fn fields_changed(&self) -> bool {
        matches!(self.state, CacheState::Dirty)
            || self.slots.values().any(|slot| match slot {
                Slot::Nested(Some(child)) => child.has_changed(),
                _ => false,
            })
    }

    /// Whether the object has neither a cached element nor changes
    pub fn is_empty(&self) -> bool {
        self.element().is_none() && !self.fields_changed()
    }

    /// Current value of a field
    pub fn value(&self, key: &str) -> Option<&XmlValue> {
        match self.slots.get(key) {
            Some(Slot::Value(value)) => value.as_ref(),
            _ => None,
        }
    }

    /// Current value of a field as text
    pub fn text(&self, key: &str) -> Option<&str> {
        self.value(key).and_then(XmlValue::as_str)
    }

    /// Set a field value
    pub fn set(&mut self, key: &str, value: impl Into<XmlValue>) -> Result<()> {
        self.set_value(key, Some(value.into()))
    }

    /// Set or clear a field value. Any assignment drops the cached element.
    pub fn set_value(&mut self, key: &str, value: Option<XmlValue>) -> Result<()> {
        match self.slots.get_mut(key) {
            Some(Slot::Value(slot)) => {
                *slot = value;
                self.invalidate();
                Ok(())
            }
            _ => Err(self.unknown_field(key)),
        }
    }

    /// Clear a field value
    pub fn clear(&mut self, key: &str) -> Result<()> {
        self.set_value(key, None)
    }

    /// Nested object of a field
    pub fn child(&self, key: &str) -> Option<&dyn Mappable> {
        match self.slots.get(key) {
            Some(Slot::Nested(Some(child))) => Some(child.as_ref()),
            _ => None,
        }
    }

    /// Mutable nested object of a field
    pub fn child_mut(&mut self, key: &str) -> Option<&mut dyn Mappable> {
        match self.slots.get_mut(key) {
            Some(Slot::Nested(Some(child))) => Some(child.as_mut()),
            _ => None,
        }
    }

    /// Nested object of a field as its concrete type
    pub fn child_as<T: Mappable>(&self, key: &str) -> Option<&T> {
        self.child(key)?.as_any().downcast_ref::<T>()
    }

    /// Mutable nested object of a field as its concrete type
    pub fn child_as_mut<T: Mappable>(&mut self, key: &str) -> Option<&mut T> {
        self.child_mut(key)?.as_any_mut().downcast_mut::<T>()
    }

    /// Replace the nested object of a field.
    ///
    /// The child takes the element name, namespace and prefix of the field's binding.
    pub fn set_child(&mut self, key: &str, mut child: Box<dyn Mappable>) -> Result<()> {
        let binding = self.nested_binding(key)?.clone();
        apply_binding(child.as_mut(), &binding);
        self.slots.insert(key.to_string(), Slot::Nested(Some(child)));
        self.invalidate();
        Ok(())
    }

    /// Remove and return the nested object of a field
    pub fn take_child(&mut self, key: &str) -> Result<Option<Box<dyn Mappable>>> {
        let taken = match self.slots.get_mut(key) {
            Some(Slot::Nested(slot)) => slot.take(),
            _ => return Err(self.unknown_field(key)),
        };
        self.invalidate();
        Ok(taken)
    }

    fn nested_binding(&self, key: &str) -> Result<&NestedBinding> {
        match self.schema.item(key) {
            Some(FieldBinding::Nested(binding)) => Ok(binding),
            _ => Err(self.unknown_field(key)),
        }
    }

    fn unknown_field(&self, key: &str) -> Error {
        Error::NullParam(self.local_name.clone(), key.to_string())
    }

    pub(crate) fn has_missing_required_value(&self) -> bool {
        self.schema.items().iter().any(|(key, binding)| {
            let required = match binding {
                FieldBinding::Attribute(b) | FieldBinding::Element(b) => b.required,
                FieldBinding::Content(b) => b.required,
                FieldBinding::Nested(_) => false,
            };
            required && self.value(key).is_none()
        })
    }

    pub(crate) fn cache(&mut self, element: XmlElement) {
        self.state = CacheState::Compiled(element);
    }

    /// Build the element for the declared fields
    pub(crate) fn compile(&mut self) -> Result<XmlElement> {
        let schema = Arc::clone(&self.schema);
        let mut element = XmlElement::new(
            self.local_name.as_str(),
            self.namespace_uri.as_deref(),
            self.prefix.as_deref(),
        );
        // unqualified simple children stay in the default namespace of an unprefixed parent
        let inherited_namespace = match element.prefix() {
            Some(_) => None,
            None => self.namespace_uri.clone(),
        };

        for (key, binding) in schema.items() {
            match binding {
                FieldBinding::Attribute(b) => {
                    if let Some(text) = self.encode_field(key, b, Error::attribute_missing)? {
                        element.set_attribute_ns(
                            b.namespace_uri.as_deref(),
                            b.prefix.as_deref(),
                            &b.local_name,
                            text,
                        );
                    }
                }
                FieldBinding::Element(b) => {
                    if let Some(text) = self.encode_field(key, b, Error::element_missing)? {
                        let namespace = b.namespace_uri.as_deref().or(inherited_namespace.as_deref());
                        let mut child =
                            XmlElement::new(b.local_name.as_str(), namespace, b.prefix.as_deref());
                        child.push_text(text);
                        element.push_element(child);
                    }
                }
                FieldBinding::Nested(b) => self.compile_nested(key, b, &mut element)?,
                FieldBinding::Content(b) => {
                    let value = self.value(key);
                    let text = match value {
                        Some(v) => encode_value(b.converter.as_ref(), v)?,
                        None => None,
                    };
                    if b.required && text.is_none() {
                        return Err(Error::ContentMissing(self.local_name.clone()));
                    }
                    if b.required || value != b.default_value.as_ref() {
                        if let Some(text) = text {
                            element.push_text(text);
                        }
                    }
                }
            }
        }

        Ok(element)
    }

    /// Text to write for an attribute or simple element, `None` when it is suppressed
    fn encode_field(
        &self,
        key: &str,
        binding: &ValueBinding,
        missing: fn(&str, &str) -> Error,
    ) -> Result<Option<String>> {
        let value = self.value(key);
        let text = match value {
            Some(v) => encode_value(binding.converter.as_ref(), v)?,
            None => None,
        };
        if binding.required && text.is_none() {
            return Err(missing(&binding.local_name, &self.local_name));
        }
        if binding.required || value != binding.default_value.as_ref() {
            Ok(text)
        } else {
            Ok(None)
        }
    }

    fn compile_nested(
        &mut self,
        key: &str,
        binding: &NestedBinding,
        element: &mut XmlElement,
    ) -> Result<()> {
        let owner = self.local_name.clone();
        let child = match self.slots.get_mut(key) {
            Some(Slot::Nested(Some(child))) => child,
            _ if binding.required => {
                return Err(Error::element_missing(&binding.local_name, &owner));
            }
            _ => return Ok(()),
        };

        let force = binding.required || child.members().is_some_and(|m| !m.is_empty());
        let compiled = child.get_xml_with(force)?;
        let member = match child.members() {
            Some(_) => child.object().schema().parser().map(Parser::schema).transpose()?,
            None => None,
        };

        let count = match compiled {
            Some(compiled) => {
                let count = match &member {
                    Some(member) => count_members(&compiled, member),
                    None => compiled.child_elements().count(),
                };
                if binding.no_root {
                    for spliced in compiled.into_child_elements() {
                        element.push_element(spliced);
                    }
                } else {
                    element.push_element(compiled);
                }
                count
            }
            None => 0,
        };

        if child.members().is_some() {
            binding.check_occurs(count, &owner)?;
        }
        Ok(())
    }

    /// Read every declared field from `element` without touching this object
    pub(crate) fn read_fields(&self, element: &XmlElement) -> Result<StagedFields> {
        if !element.is(&self.local_name, self.namespace_uri()) {
            return Err(Error::ElementMalformed(self.local_name.clone()));
        }

        let owner = self.local_name.as_str();
        let mut slots = IndexMap::with_capacity(self.slots.len());
        for (key, binding) in self.schema.items() {
            let slot = match binding {
                FieldBinding::Attribute(b) => {
                    let text = element.attribute_ns(&b.local_name, b.namespace_uri.as_deref());
                    Slot::Value(read_value(b, text, || {
                        Error::attribute_missing(&b.local_name, owner)
                    })?)
                }
                FieldBinding::Element(b) => {
                    let text = element
                        .first_child(&b.local_name, b.namespace_uri.as_deref())
                        .map(XmlElement::text_content);
                    Slot::Value(read_value(b, text.as_deref(), || {
                        Error::element_missing(&b.local_name, owner)
                    })?)
                }
                FieldBinding::Nested(b) => Slot::Nested(Some(read_nested(b, element, owner)?)),
                FieldBinding::Content(b) => {
                    let text = element.text();
                    let value = if text.is_empty() {
                        if b.required {
                            return Err(Error::ContentMissing(owner.to_string()));
                        }
                        b.default_value.clone()
                    } else {
                        Some(decode_value(b.converter.as_ref(), &text)?)
                    };
                    Slot::Value(value)
                }
            };
            log::trace!("<{}> read field '{}'", owner, key);
            slots.insert(key.clone(), slot);
        }

        Ok(StagedFields { slots })
    }

    pub(crate) fn commit(&mut self, staged: StagedFields, element: &XmlElement) -> Replaced {
        Replaced {
            slots: std::mem::replace(&mut self.slots, staged.slots),
            prefix: std::mem::replace(&mut self.prefix, element.prefix().map(str::to_string)),
            state: std::mem::replace(&mut self.state, CacheState::Compiled(element.clone())),
        }
    }

    pub(crate) fn restore(&mut self, replaced: Replaced) {
        self.slots = replaced.slots;
        self.prefix = replaced.prefix;
        self.state = replaced.state;
    }

    fn cached(&self) -> Result<&XmlElement> {
        self.element()
            .ok_or_else(|| Error::NullParam(self.local_name.clone(), "element".into()))
    }

    /// First descendant of the cached element with the qualified name `name`
    pub fn get_element(&self, name: &str, required: bool) -> Result<Option<&XmlElement>> {
        self.cached()?.element(name, required)
    }

    /// Attribute of the cached element, or `default` when absent and not `required`
    pub fn get_attribute<'a>(
        &'a self,
        name: &str,
        default: Option<&'a str>,
        required: bool,
    ) -> Result<Option<&'a str>> {
        self.cached()?.attribute_or(name, default, required)
    }

    /// Children of the cached element; the namespace defaults to this object's
    pub fn get_children(&self, local_name: &str, namespace: Option<&str>) -> Result<Vec<&XmlElement>> {
        let namespace = namespace.or(self.namespace_uri());
        Ok(self.cached()?.children_by_name(local_name, namespace))
    }

    /// First child of the cached element (any namespace when `namespace` is `None`)
    pub fn get_first_child(&self, local_name: &str, namespace: Option<&str>) -> Result<Option<&XmlElement>> {
        Ok(self.cached()?.first_child(local_name, namespace))
    }

    /// Child of the cached element in this object's namespace
    pub fn get_child(&self, local_name: &str, required: bool) -> Result<Option<&XmlElement>> {
        self.cached()?
            .child(local_name, self.namespace_uri(), required)
    }

    /// Element in the cached tree carrying the given id
    pub fn get_element_by_id(&self, id: &str) -> Result<Option<&XmlElement>> {
        Ok(self.cached()?.element_by_id(id))
    }
}

impl Mappable for XmlObject {
    fn object(&self) -> &XmlObject {
        self
    }

    fn object_mut(&mut self) -> &mut XmlObject {
        self
    }
}

/// Field values read from an element, not yet applied
#[derive(Debug)]
pub(crate) struct StagedFields {
    slots: IndexMap<String, Slot>,
}

/// Field values and cache state replaced by a load
#[derive(Debug)]
pub(crate) struct Replaced {
    slots: IndexMap<String, Slot>,
    prefix: Option<String>,
    state: CacheState,
}

fn read_value(
    binding: &ValueBinding,
    text: Option<&str>,
    missing: impl FnOnce() -> Error,
) -> Result<Option<XmlValue>> {
    match text {
        Some(text) => decode_value(binding.converter.as_ref(), text).map(Some),
        None if binding.required => Err(missing()),
        None => Ok(binding.default_value.clone()),
    }
}

fn read_nested(binding: &NestedBinding, element: &XmlElement, owner: &str) -> Result<Box<dyn Mappable>> {
    let mut child = create_nested(binding)?;

    if binding.no_root {
        let members = child.members_mut().ok_or(Error::MethodNotSupported)?;
        members.load_members(element)?;
        binding.check_occurs(members.len(), owner)?;
        return Ok(child);
    }

    match element.first_child(&binding.local_name, binding.namespace_uri.as_deref()) {
        Some(source) => {
            child.load_element(source)?;
            if let Some(members) = child.members() {
                binding.check_occurs(members.len(), owner)?;
            }
        }
        None if binding.required => {
            return Err(Error::element_missing(&binding.local_name, owner));
        }
        None => {
            if child.members().is_some() {
                binding.check_occurs(0, owner)?;
            }
        }
    }
    Ok(child)
}

/// Children of a compiled collection element that are members
fn count_members(element: &XmlElement, member: &SchemaDescriptor) -> usize {
    element
        .child_elements()
        .filter(|e| e.is(member.local_name(), member.namespace_uri()))
        .count()
}

fn create_nested(binding: &NestedBinding) -> Result<Box<dyn Mappable>> {
    let mut child = binding.parser.create()?;
    apply_binding(child.as_mut(), binding);
    Ok(child)
}

fn apply_binding(child: &mut dyn Mappable, binding: &NestedBinding) {
    let object = child.object_mut();
    let pristine = object.is_pristine();
    object.local_name = binding.local_name.clone();
    object.namespace_uri = binding.namespace_uri.clone();
    object.prefix = binding.prefix.clone();
    if pristine {
        object.state = CacheState::Pristine;
    } else {
        object.invalidate();
    }
}
