//! XML document handling
//!
//! This module provides the owned element tree the mapping engine reads from and
//! writes to. Parsing goes through `roxmltree` (which resolves namespaces for us),
//! writing goes through the `quick-xml` writer with a namespace fixup pass that emits
//! exactly the `xmlns` declarations each element needs.

use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::names::{join_qname, split_qname};
use crate::namespaces::{NamespaceScope, QName, XmlNamespace};
use crate::XML_NAMESPACE;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

/// Attribute names tried, in order, by [`XmlElement::element_by_id`]
const ID_ATTRIBUTES: [&str; 3] = ["Id", "ID", "id"];

/// A child node of an element
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    /// Element node
    Element(XmlElement),
    /// Text node
    Text(String),
}

/// An attribute with its namespace information
#[derive(Debug, Clone, PartialEq)]
pub struct XmlAttribute {
    /// Local name
    pub local_name: String,
    /// Namespace URI (None for no namespace)
    pub namespace_uri: Option<String>,
    /// Prefix used when the attribute is written
    pub prefix: Option<String>,
    /// Attribute value
    pub value: String,
}

impl XmlAttribute {
    /// Qualified name (`prefix:local` or `local`)
    pub fn qualified_name(&self) -> String {
        join_qname(self.prefix.as_deref(), &self.local_name)
    }

    fn matches(&self, local_name: &str, namespace: Option<&str>) -> bool {
        self.local_name == local_name && self.namespace_uri.as_deref() == namespace
    }
}

/// XML Element in the document tree
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    name: QName,
    prefix: Option<String>,
    attributes: Vec<XmlAttribute>,
    namespaces: Vec<XmlNamespace>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    /// Create a new element.
    ///
    /// Empty namespace and prefix strings mean "none". A prefix is only kept when the
    /// element has a namespace to bind it to.
    pub fn new(local_name: impl Into<String>, namespace: Option<&str>, prefix: Option<&str>) -> Self {
        let name = QName::new(namespace, local_name);
        let prefix = match name.namespace {
            Some(_) => prefix.filter(|p| !p.is_empty()).map(str::to_string),
            None => None,
        };
        Self {
            name,
            prefix,
            attributes: Vec::new(),
            namespaces: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Expanded name of the element
    pub fn name(&self) -> &QName {
        &self.name
    }

    /// Get the local name of the element
    pub fn local_name(&self) -> &str {
        &self.name.local_name
    }

    /// Get the namespace of the element
    pub fn namespace_uri(&self) -> Option<&str> {
        self.name.namespace.as_deref()
    }

    /// Get the prefix of the element
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Change the prefix; ignored while the element has no namespace
    pub fn set_prefix(&mut self, prefix: Option<&str>) {
        if self.name.namespace.is_some() {
            self.prefix = prefix.filter(|p| !p.is_empty()).map(str::to_string);
        }
    }

    /// Qualified name (`prefix:local` or `local`)
    pub fn qualified_name(&self) -> String {
        join_qname(self.prefix(), self.local_name())
    }

    /// Check whether the element has the given local name and namespace
    pub fn is(&self, local_name: &str, namespace: Option<&str>) -> bool {
        self.name.matches(local_name, namespace)
    }

    /// All attributes in document order
    pub fn attributes(&self) -> &[XmlAttribute] {
        &self.attributes
    }

    /// Get an attribute value by qualified name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.qualified_name() == name)
            .map(|a| a.value.as_str())
    }

    /// Get an attribute value by local name and namespace
    pub fn attribute_ns(&self, local_name: &str, namespace: Option<&str>) -> Option<&str> {
        let namespace = namespace.filter(|ns| !ns.is_empty());
        self.attributes
            .iter()
            .find(|a| a.matches(local_name, namespace))
            .map(|a| a.value.as_str())
    }

    /// Check if an attribute with the given qualified name exists
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Get an attribute, falling back to `default`.
    ///
    /// With `required` set a missing attribute is an error instead.
    pub fn attribute_or<'a>(
        &'a self,
        name: &str,
        default: Option<&'a str>,
        required: bool,
    ) -> Result<Option<&'a str>> {
        match self.attribute(name) {
            Some(value) => Ok(Some(value)),
            None if required => Err(Error::attribute_missing(name, self.local_name())),
            None => Ok(default),
        }
    }

    /// Set an attribute without namespace, replacing an existing one
    pub fn set_attribute(&mut self, local_name: &str, value: impl Into<String>) {
        self.set_attribute_ns(None, None, local_name, value);
    }

    /// Set a namespaced attribute, replacing an existing one with the same expanded name
    pub fn set_attribute_ns(
        &mut self,
        namespace: Option<&str>,
        prefix: Option<&str>,
        local_name: &str,
        value: impl Into<String>,
    ) {
        let namespace = namespace.filter(|ns| !ns.is_empty());
        let prefix = match namespace {
            Some(_) => prefix.filter(|p| !p.is_empty()).map(str::to_string),
            None => None,
        };
        let value = value.into();
        if let Some(existing) = self
            .attributes
            .iter_mut()
            .find(|a| a.matches(local_name, namespace))
        {
            existing.value = value;
            existing.prefix = prefix;
            return;
        }
        self.attributes.push(XmlAttribute {
            local_name: local_name.to_string(),
            namespace_uri: namespace.map(str::to_string),
            prefix,
            value,
        });
    }

    /// Namespaces declared on this element
    pub fn declared_namespaces(&self) -> &[XmlNamespace] {
        &self.namespaces
    }

    /// Declare a namespace on this element
    pub fn declare_namespace(&mut self, prefix: Option<&str>, namespace_uri: &str) {
        let ns = XmlNamespace::new(prefix, Some(namespace_uri));
        if !self.namespaces.contains(&ns) {
            self.namespaces.push(ns);
        }
    }

    /// Child nodes in document order
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// Append a child element
    pub fn push_element(&mut self, child: XmlElement) {
        self.children.push(XmlNode::Element(child));
    }

    /// Append a text node. Empty text is ignored.
    pub fn push_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if !text.is_empty() {
            self.children.push(XmlNode::Text(text));
        }
    }

    /// Replace all children with a single text node
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children.clear();
        self.push_text(text);
    }

    /// Concatenated text of this element and all its descendants
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    /// Concatenated text of the direct text children only
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                XmlNode::Text(t) => Some(t.as_str()),
                XmlNode::Element(_) => None,
            })
            .collect()
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                XmlNode::Text(t) => out.push_str(t),
                XmlNode::Element(e) => e.collect_text(out),
            }
        }
    }

    /// Child elements in document order
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// Consume the element and return its child elements
    pub fn into_child_elements(self) -> impl Iterator<Item = XmlElement> {
        self.children.into_iter().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// Find child elements by local name.
    ///
    /// With `namespace` set to `None` children in any namespace match.
    pub fn children_by_name(&self, local_name: &str, namespace: Option<&str>) -> Vec<&XmlElement> {
        self.child_elements()
            .filter(|e| e.matches_wildcard(local_name, namespace))
            .collect()
    }

    /// First child element with the given local name (any namespace when `None`)
    pub fn first_child(&self, local_name: &str, namespace: Option<&str>) -> Option<&XmlElement> {
        self.child_elements()
            .find(|e| e.matches_wildcard(local_name, namespace))
    }

    /// First matching child element, or `ElementMissing` when `required`
    pub fn child(
        &self,
        local_name: &str,
        namespace: Option<&str>,
        required: bool,
    ) -> Result<Option<&XmlElement>> {
        match self.first_child(local_name, namespace) {
            Some(child) => Ok(Some(child)),
            None if required => Err(Error::element_missing(local_name, self.local_name())),
            None => Ok(None),
        }
    }

    fn matches_wildcard(&self, local_name: &str, namespace: Option<&str>) -> bool {
        self.local_name() == local_name
            && match namespace.filter(|ns| !ns.is_empty()) {
                Some(ns) => self.namespace_uri() == Some(ns),
                None => true,
            }
    }

    /// Descendant elements (not including self) in document order
    pub fn descendants(&self) -> Vec<&XmlElement> {
        let mut found = Vec::new();
        self.collect_descendants(&mut found);
        found
    }

    fn collect_descendants<'a>(&'a self, out: &mut Vec<&'a XmlElement>) {
        for child in self.child_elements() {
            out.push(child);
            child.collect_descendants(out);
        }
    }

    /// Descendant elements whose qualified name equals `name` (`*` matches all)
    pub fn elements_by_tag_name(&self, name: &str) -> Vec<&XmlElement> {
        self.descendants()
            .into_iter()
            .filter(|e| name == "*" || e.qualified_name() == name)
            .collect()
    }

    /// First descendant with the qualified name `name`, or `ElementMissing` when `required`
    pub fn element(&self, name: &str, required: bool) -> Result<Option<&XmlElement>> {
        match self.elements_by_tag_name(name).into_iter().next() {
            Some(e) => Ok(Some(e)),
            None if required => Err(Error::element_missing(name, self.local_name())),
            None => Ok(None),
        }
    }

    /// Find an element (self or descendant) by id.
    ///
    /// The `Id` attribute is tried over the whole tree first, then `ID`, then `id`.
    pub fn element_by_id(&self, id: &str) -> Option<&XmlElement> {
        let mut candidates = vec![self];
        candidates.extend(self.descendants());
        ID_ATTRIBUTES.iter().find_map(|attr| {
            candidates
                .iter()
                .copied()
                .find(|e| e.attribute_ns(attr, None) == Some(id))
        })
    }

    /// Serialize the element to XML text
    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        let mut scope = NamespaceScope::new();
        self.write_to(&mut writer, &mut scope)?;
        String::from_utf8(writer.into_inner()).map_err(|e| Error::XmlException(e.to_string()))
    }

    fn write_to(&self, writer: &mut Writer<Vec<u8>>, scope: &mut NamespaceScope) -> Result<()> {
        let mark = scope.len();
        let mut declarations: Vec<XmlNamespace> = Vec::new();

        for ns in &self.namespaces {
            if ns.namespace_uri == XML_NAMESPACE {
                continue;
            }
            scope.push(ns.clone());
            declarations.push(ns.clone());
        }

        bind(
            scope,
            &mut declarations,
            self.prefix().unwrap_or_default(),
            self.namespace_uri().unwrap_or_default(),
        );

        let mut attributes = Vec::with_capacity(self.attributes.len());
        let mut generated = 0usize;
        for attr in &self.attributes {
            let name = match attr.namespace_uri.as_deref() {
                None => attr.local_name.clone(),
                Some(XML_NAMESPACE) => join_qname(Some("xml"), &attr.local_name),
                Some(uri) => {
                    let prefix = attribute_prefix(scope, attr.prefix.as_deref(), uri, &mut generated);
                    bind(scope, &mut declarations, &prefix, uri);
                    join_qname(Some(&prefix), &attr.local_name)
                }
            };
            attributes.push((name, attr.value.as_str()));
        }

        let qualified = self.qualified_name();
        let mut start = BytesStart::new(qualified.as_str());
        for (name, value) in &attributes {
            start.push_attribute((name.as_str(), *value));
        }
        for ns in &declarations {
            let name = if ns.prefix.is_empty() {
                "xmlns".to_string()
            } else {
                format!("xmlns:{}", ns.prefix)
            };
            start.push_attribute((name.as_str(), ns.namespace_uri.as_str()));
        }

        if self.children.is_empty() {
            writer.write_event(Event::Empty(start))?;
        } else {
            writer.write_event(Event::Start(start))?;
            for child in &self.children {
                match child {
                    XmlNode::Text(text) => {
                        writer.write_event(Event::Text(BytesText::new(text)))?;
                    }
                    XmlNode::Element(e) => e.write_to(writer, scope)?,
                }
            }
            writer.write_event(Event::End(BytesEnd::new(qualified.as_str())))?;
        }

        scope.truncate(mark);
        Ok(())
    }
}

/// Make `prefix` resolve to `uri`, recording a declaration when the scope disagrees
fn bind(scope: &mut NamespaceScope, declarations: &mut Vec<XmlNamespace>, prefix: &str, uri: &str) {
    let bound = scope
        .find_by_prefix(prefix, None)
        .map(|ns| ns.namespace_uri.as_str())
        .unwrap_or_default();
    if bound != uri {
        let ns = XmlNamespace::new(Some(prefix), Some(uri));
        scope.push(ns.clone());
        declarations.push(ns);
    }
}

/// Pick the prefix for a namespaced attribute. Attributes never use the default namespace.
fn attribute_prefix(
    scope: &NamespaceScope,
    preferred: Option<&str>,
    uri: &str,
    generated: &mut usize,
) -> String {
    // a preferred prefix already bound to another namespace would be declared twice
    if let Some(prefix) = preferred.filter(|p| !p.is_empty()) {
        match scope.find_by_prefix(prefix, None) {
            Some(ns) if ns.namespace_uri != uri => {}
            _ => return prefix.to_string(),
        }
    }
    let in_scope = scope
        .iter()
        .filter(|ns| !ns.prefix.is_empty() && ns.namespace_uri == uri)
        .map(|ns| ns.prefix.as_str())
        .filter(|p| scope.find_by_prefix(p, None).map(|ns| ns.namespace_uri.as_str()) == Some(uri))
        .last();
    if let Some(prefix) = in_scope {
        return prefix.to_string();
    }
    loop {
        *generated += 1;
        let candidate = format!("ns{}", generated);
        if scope.find_by_prefix(&candidate, None).is_none() {
            return candidate;
        }
    }
}

/// XML Document representation
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    root: XmlElement,
}

impl XmlDocument {
    /// Create a document around an existing root element
    pub fn new(root: XmlElement) -> Self {
        Self { root }
    }

    /// Create a document with an empty root element
    pub fn create(local_name: &str, namespace: Option<&str>, prefix: Option<&str>) -> Self {
        Self::new(XmlElement::new(local_name, namespace, prefix))
    }

    /// Parse an XML document from a string using default limits
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_with_limits(text, &Limits::default())
    }

    /// Parse an XML document from a string
    pub fn parse_with_limits(text: &str, limits: &Limits) -> Result<Self> {
        limits.check_xml_size(text.len())?;
        let doc = roxmltree::Document::parse(text)?;
        let root = convert_node(text, doc.root_element(), 1, limits)?;
        Ok(Self { root })
    }

    /// Get the root element
    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    /// Get the root element mutably
    pub fn root_mut(&mut self) -> &mut XmlElement {
        &mut self.root
    }

    /// Consume the document and return the root element
    pub fn into_root(self) -> XmlElement {
        self.root
    }

    /// Serialize the document to XML text
    pub fn to_xml_string(&self) -> Result<String> {
        self.root.to_xml_string()
    }
}

fn convert_node(
    source: &str,
    node: roxmltree::Node<'_, '_>,
    depth: usize,
    limits: &Limits,
) -> Result<XmlElement> {
    limits.check_xml_depth(depth)?;
    limits.check_attributes(node.attributes().count())?;

    let tag = node.tag_name();
    let prefix = element_prefix(source, &node);
    let mut element = XmlElement::new(tag.name(), tag.namespace(), prefix);

    let inherited: Vec<(Option<&str>, &str)> = node
        .parent_element()
        .map(|parent| parent.namespaces().map(|ns| (ns.name(), ns.uri())).collect())
        .unwrap_or_default();
    let mut declared = 0usize;
    for ns in node.namespaces() {
        if ns.uri() == XML_NAMESPACE || inherited.contains(&(ns.name(), ns.uri())) {
            continue;
        }
        declared += 1;
        element.declare_namespace(ns.name(), ns.uri());
    }
    limits.check_namespaces(declared)?;

    for attr in node.attributes() {
        let prefix = attr.namespace().and_then(|uri| {
            if uri == XML_NAMESPACE {
                return Some("xml");
            }
            node.namespaces()
                .find(|ns| ns.uri() == uri && ns.name().is_some())
                .and_then(|ns| ns.name())
        });
        element.set_attribute_ns(attr.namespace(), prefix, attr.name(), attr.value());
    }

    for child in node.children() {
        if child.is_element() {
            element.push_element(convert_node(source, child, depth + 1, limits)?);
        } else if child.is_text() {
            element.push_text(child.text().unwrap_or_default());
        }
    }

    Ok(element)
}

/// Read the prefix of an element straight from its start tag in the source text
fn element_prefix<'s>(source: &'s str, node: &roxmltree::Node<'_, '_>) -> Option<&'s str> {
    node.tag_name().namespace()?;
    let tag = source.get(node.range().start + 1..)?;
    let end = tag
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .unwrap_or(tag.len());
    split_qname(&tag[..end]).0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_simple_xml() {
        let doc = XmlDocument::parse("<root><child>text</child></root>").unwrap();
        let root = doc.root();
        assert_eq!(root.local_name(), "root");
        assert_eq!(root.child_elements().count(), 1);
        let child = root.first_child("child", None).unwrap();
        assert_eq!(child.text_content(), "text");
    }

    #[test]
    fn test_parse_with_attributes() {
        let doc = XmlDocument::parse(r#"<root attr1="value1" attr2="value2"><child/></root>"#).unwrap();
        let root = doc.root();
        assert_eq!(root.attribute("attr1"), Some("value1"));
        assert_eq!(root.attribute("attr2"), Some("value2"));
        assert_eq!(root.attribute("attr3"), None);
    }

    #[test]
    fn test_parse_with_namespaces() {
        let doc = XmlDocument::parse(
            r#"<p:root xmlns:p="http://example.com"><p:child/><other xmlns="http://other.com"/></p:root>"#,
        )
        .unwrap();
        let root = doc.root();
        assert_eq!(root.namespace_uri(), Some("http://example.com"));
        assert_eq!(root.prefix(), Some("p"));
        assert_eq!(root.declared_namespaces().len(), 1);

        let child = root.first_child("child", Some("http://example.com")).unwrap();
        assert_eq!(child.prefix(), Some("p"));
        assert!(child.declared_namespaces().is_empty());

        let other = root.first_child("other", None).unwrap();
        assert_eq!(other.namespace_uri(), Some("http://other.com"));
        assert_eq!(other.prefix(), None);
    }

    #[test]
    fn test_parse_error() {
        let err = XmlDocument::parse("<root>").unwrap_err();
        assert!(matches!(err, Error::XmlException(_)));
    }

    #[test]
    fn test_parse_limits() {
        let limits = Limits::new().with_max_xml_depth(2);
        assert!(XmlDocument::parse_with_limits("<a><b/></a>", &limits).is_ok());
        let err = XmlDocument::parse_with_limits("<a><b><c/></b></a>", &limits).unwrap_err();
        assert!(matches!(err, Error::LimitExceeded(_)));

        let limits = Limits::new().with_max_xml_size(4);
        assert!(XmlDocument::parse_with_limits("<root/>", &limits).is_err());
    }

    #[test]
    fn test_stringify_default_namespace() {
        let el = XmlElement::new("test", Some("http://some.com"), None);
        assert_eq!(el.to_xml_string().unwrap(), r#"<test xmlns="http://some.com"/>"#);
    }

    #[test]
    fn test_stringify_prefixed_namespace() {
        let el = XmlElement::new("test", Some("http://some.com"), Some("sm"));
        assert_eq!(el.to_xml_string().unwrap(), r#"<sm:test xmlns:sm="http://some.com"/>"#);
    }

    #[test]
    fn test_prefix_without_namespace_is_dropped() {
        let el = XmlElement::new("test", None, Some("sm"));
        assert_eq!(el.prefix(), None);
        assert_eq!(el.to_xml_string().unwrap(), "<test/>");
    }

    #[test]
    fn test_stringify_child_namespaces() {
        let mut root = XmlElement::new("test", None, None);
        let mut child = XmlElement::new("ch", Some("http://some.com"), None);
        child.set_text("Hello");
        root.push_element(child);
        assert_eq!(
            root.to_xml_string().unwrap(),
            r#"<test><ch xmlns="http://some.com">Hello</ch></test>"#
        );

        let mut root = XmlElement::new("test", Some("http://some.com"), None);
        root.push_element(XmlElement::new("child", Some("http://some.com"), None));
        root.push_element(XmlElement::new("plain", None, None));
        assert_eq!(
            root.to_xml_string().unwrap(),
            r#"<test xmlns="http://some.com"><child/><plain xmlns=""/></test>"#
        );
    }

    #[test]
    fn test_stringify_escapes_text_and_attributes() {
        let mut el = XmlElement::new("test", None, None);
        el.set_attribute("a", "1 < 2 & \"x\"");
        el.set_text("<b>&</b>");
        assert_eq!(
            el.to_xml_string().unwrap(),
            r#"<test a="1 &lt; 2 &amp; &quot;x&quot;">&lt;b&gt;&amp;&lt;/b&gt;</test>"#
        );
    }

    #[test]
    fn test_namespaced_attribute_gets_prefix() {
        let mut el = XmlElement::new("test", None, None);
        el.set_attribute_ns(Some("http://attr.com"), None, "value", "1");
        el.set_attribute_ns(Some("http://named.com"), Some("n"), "other", "2");
        assert_eq!(
            el.to_xml_string().unwrap(),
            r#"<test ns1:value="1" n:other="2" xmlns:ns1="http://attr.com" xmlns:n="http://named.com"/>"#
        );
    }

    #[test]
    fn test_parse_stringify_roundtrip() {
        let xml = r#"<root xmlns="html://namespace1"><n1:child n1:a="x" xmlns:n1="html://namespace2">t</n1:child><plain xmlns="">v</plain></root>"#;
        let doc = XmlDocument::parse(xml).unwrap();
        assert_eq!(doc.to_xml_string().unwrap(), xml);
    }

    #[test]
    fn test_children_lookup() {
        let xml = r#"<root id="0"><first id="1"/><second Id="2"/><third ID="3"/><child/><n:child xmlns:n="html://n"/></root>"#;
        let doc = XmlDocument::parse(xml).unwrap();
        let root = doc.root();

        assert_eq!(root.children_by_name("child", None).len(), 2);
        assert_eq!(root.children_by_name("child", Some("html://n")).len(), 1);
        assert!(root.child("missing", None, true).is_err());
        assert!(root.child("missing", None, false).unwrap().is_none());
        assert_eq!(root.element("third", true).unwrap().unwrap().local_name(), "third");
        assert!(matches!(
            root.element("NotExist", true),
            Err(Error::ElementMissing(..))
        ));
    }

    #[test]
    fn test_element_by_id() {
        let xml = r#"<root id="0"><first id="1"/><second Id="2"/><third ID="3"/></root>"#;
        let doc = XmlDocument::parse(xml).unwrap();
        let root = doc.root();
        assert_eq!(root.element_by_id("1").unwrap().local_name(), "first");
        assert_eq!(root.element_by_id("2").unwrap().local_name(), "second");
        assert_eq!(root.element_by_id("3").unwrap().local_name(), "third");
        assert_eq!(root.element_by_id("0").unwrap().local_name(), "root");
        assert!(root.element_by_id("4").is_none());
    }

    #[test]
    fn test_attribute_or() {
        let doc = XmlDocument::parse(r#"<root id="0"/>"#).unwrap();
        let root = doc.root();
        assert_eq!(root.attribute_or("id", Some("2"), true).unwrap(), Some("0"));
        assert_eq!(root.attribute_or("test", Some("3"), false).unwrap(), Some("3"));
        assert!(matches!(
            root.attribute_or("test", None, true),
            Err(Error::AttributeMissing(..))
        ));
    }
}
