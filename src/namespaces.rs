//! XML namespace handling
//!
//! This module provides qualified names and the namespace scope stack used while
//! walking a tree: entries are pushed as elements are entered, and lookups search
//! from the innermost (most recently pushed) declaration outward.

use crate::documents::XmlElement;
use crate::XML_NAMESPACE;
use indexmap::IndexMap;
use std::fmt;

/// Qualified name (QName) - combination of namespace and local name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// Namespace URI (None for no namespace)
    pub namespace: Option<String>,
    /// Local name
    pub local_name: String,
}

impl QName {
    /// Create a new QName. An empty namespace means no namespace.
    pub fn new(namespace: Option<&str>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.filter(|ns| !ns.is_empty()).map(str::to_string),
            local_name: local_name.into(),
        }
    }

    /// Create a QName without a namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local_name: local_name.into(),
        }
    }

    /// Check whether this name has the given local name and namespace
    pub fn matches(&self, local_name: &str, namespace: Option<&str>) -> bool {
        self.local_name == local_name && self.namespace.as_deref() == namespace
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => f.write_str(&self.local_name),
        }
    }
}

/// A single prefix to namespace URI binding
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlNamespace {
    /// Prefix, empty for the default namespace
    pub prefix: String,
    /// Namespace URI, empty for "no namespace"
    pub namespace_uri: String,
}

impl XmlNamespace {
    /// Create a binding; `None` becomes the empty string
    pub fn new(prefix: Option<&str>, namespace_uri: Option<&str>) -> Self {
        Self {
            prefix: prefix.unwrap_or_default().to_string(),
            namespace_uri: namespace_uri.unwrap_or_default().to_string(),
        }
    }
}

/// Ordered stack of namespace bindings with innermost-first lookup
#[derive(Debug, Clone, Default)]
pub struct NamespaceScope {
    items: Vec<XmlNamespace>,
}

impl NamespaceScope {
    /// Create an empty scope
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding, normalizing missing values to empty strings
    pub fn add(&mut self, prefix: Option<&str>, namespace_uri: Option<&str>) {
        self.items.push(XmlNamespace::new(prefix, namespace_uri));
    }

    /// Push an existing binding
    pub fn push(&mut self, namespace: XmlNamespace) {
        self.items.push(namespace);
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the scope holds no bindings
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Binding at `index`
    pub fn get(&self, index: usize) -> Option<&XmlNamespace> {
        self.items.get(index)
    }

    /// Drop every binding pushed after the first `len`
    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }

    /// Iterate bindings from outermost to innermost
    pub fn iter(&self) -> impl Iterator<Item = &XmlNamespace> {
        self.items.iter()
    }

    /// Find the innermost binding for `prefix`, searching backward from `start`
    /// (default and upper clamp: the last index).
    pub fn find_by_prefix(&self, prefix: &str, start: Option<usize>) -> Option<&XmlNamespace> {
        self.find_backward(start, |item| item.prefix == prefix)
    }

    /// Find the innermost binding for `namespace_uri`, searching backward from `start`
    /// (default and upper clamp: the last index).
    pub fn find_by_uri(&self, namespace_uri: &str, start: Option<usize>) -> Option<&XmlNamespace> {
        self.find_backward(start, |item| item.namespace_uri == namespace_uri)
    }

    fn find_backward<F>(&self, start: Option<usize>, predicate: F) -> Option<&XmlNamespace>
    where
        F: Fn(&XmlNamespace) -> bool,
    {
        let last = self.items.len().checked_sub(1)?;
        let start = start.map_or(last, |start| start.min(last));
        self.items[..=start].iter().rev().find(|item| predicate(item))
    }
}

impl FromIterator<XmlNamespace> for NamespaceScope {
    fn from_iter<T: IntoIterator<Item = XmlNamespace>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

/// Collect the namespaces used by `element` and its descendants.
///
/// The tree is walked top-down; for each prefix the first namespace seen wins.
/// The empty prefix stands for the default namespace. The `xml` namespace is skipped.
pub fn select_namespaces(element: &XmlElement) -> IndexMap<String, String> {
    let mut selected = IndexMap::new();
    collect_namespaces(element, &mut selected);
    selected
}

fn collect_namespaces(element: &XmlElement, selected: &mut IndexMap<String, String>) {
    if let Some(uri) = element.namespace_uri() {
        if uri != XML_NAMESPACE {
            let prefix = element.prefix().unwrap_or_default();
            if !selected.contains_key(prefix) {
                selected.insert(prefix.to_string(), uri.to_string());
            }
        }
    }
    for child in element.child_elements() {
        collect_namespaces(child, selected);
    }
}
