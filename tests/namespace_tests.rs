//! Namespace scope search and tree-wide namespace discovery

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use xmlcore::{select_namespaces, NamespaceScope, XmlDocument};

fn prefix() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[a-c]"]
}

fn uri() -> impl Strategy<Value = String> {
    "urn:[x-z]"
}

proptest! {
    #[test]
    fn find_by_prefix_returns_innermost_binding(
        bindings in prop::collection::vec((prefix(), uri()), 0..12),
        wanted in prefix(),
        start in prop::option::of(0usize..16),
    ) {
        let mut scope = NamespaceScope::new();
        for (p, u) in &bindings {
            scope.add(Some(p.as_str()), Some(u.as_str()));
        }

        let expected = match bindings.len() {
            0 => None,
            len => {
                let last = start.unwrap_or(len - 1).min(len - 1);
                bindings[..=last].iter().rev().find(|(p, _)| *p == wanted).map(|(_, u)| u.clone())
            }
        };
        let found = scope.find_by_prefix(&wanted, start).map(|ns| ns.namespace_uri.clone());
        prop_assert_eq!(found, expected);
    }

    #[test]
    fn find_by_uri_searches_backward(
        bindings in prop::collection::vec((prefix(), uri()), 1..12),
        wanted in uri(),
    ) {
        let scope: NamespaceScope = bindings
            .iter()
            .map(|(p, u)| xmlcore::XmlNamespace::new(Some(p.as_str()), Some(u.as_str())))
            .collect();
        let expected = bindings.iter().rev().find(|(_, u)| *u == wanted).map(|(p, _)| p.clone());
        let found = scope.find_by_uri(&wanted, None).map(|ns| ns.prefix.clone());
        prop_assert_eq!(found, expected);
    }
}

#[test]
fn test_scope_as_stack() {
    let mut scope = NamespaceScope::new();
    scope.add(None, Some("urn:outer"));
    let mark = scope.len();
    scope.add(None, Some("urn:inner"));
    assert_eq!(scope.find_by_prefix("", None).unwrap().namespace_uri, "urn:inner");
    scope.truncate(mark);
    assert_eq!(scope.find_by_prefix("", None).unwrap().namespace_uri, "urn:outer");
}

#[test]
fn test_select_namespaces_keeps_first_binding() {
    let document = XmlDocument::parse(
        r#"<r xmlns="urn:d" xmlns:a="urn:a"><a:c xmlns:b="urn:b"><b:e/><d xmlns:a="urn:other"><a:f/></d></a:c></r>"#,
    )
    .unwrap();
    let found = select_namespaces(document.root());
    let pairs: Vec<_> = found.iter().map(|(p, u)| (p.as_str(), u.as_str())).collect();
    assert_eq!(pairs, vec![("", "urn:d"), ("a", "urn:a"), ("b", "urn:b")]);
}
