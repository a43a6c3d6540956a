//! Repeated element groups
//!
//! An [`XmlCollection`] is a mapped object whose element contains a sequence of members
//! of one mapped type. The member type is the parser registered on the collection's
//! element declaration.

use crate::documents::XmlElement;
use crate::error::{Error, Result};
use crate::object::{MappableExt, XmlObject, XmlType};
use crate::schema::{check_occurs, MaxOccurs};
use std::cmp::Ordering;
use std::fmt;

/// Members of a collection as seen by the mapping engine
pub trait MemberSet {
    /// Number of members
    fn len(&self) -> usize;

    /// Whether there are no members
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append the element of every member that produces one, then check the bounds.
    ///
    /// Returns the number of members written.
    fn compile_members(&mut self, element: &mut XmlElement) -> Result<usize>;

    /// Read one member per matching child of `element` and keep them aside.
    ///
    /// The current members are untouched; nothing is kept when reading fails.
    fn stage_members(&mut self, element: &XmlElement) -> Result<()>;

    /// Exchange the staged members with the current ones
    fn swap_staged(&mut self);

    /// Forget the staged members
    fn drop_staged(&mut self);

    /// Replace the members with one member per matching child of `element`
    fn load_members(&mut self, element: &XmlElement) -> Result<()> {
        self.stage_members(element)?;
        self.swap_staged();
        self.drop_staged();
        Ok(())
    }
}

/// Ordered, bounded sequence of mapped members
pub struct XmlCollection<I: XmlType> {
    object: XmlObject,
    items: Vec<I>,
    staged: Vec<I>,
    min_occurs: usize,
    max_occurs: MaxOccurs,
}

impl<I: XmlType> XmlCollection<I> {
    /// Create an empty collection around its own field storage
    pub fn new(object: XmlObject) -> Self {
        Self {
            object,
            items: Vec::new(),
            staged: Vec::new(),
            min_occurs: 0,
            max_occurs: MaxOccurs::Unbounded,
        }
    }

    /// Set the bounds on the number of members
    pub fn with_occurs(mut self, min: usize, max: impl Into<MaxOccurs>) -> Self {
        self.min_occurs = min;
        self.max_occurs = max.into();
        self
    }

    /// Field storage of the collection element itself
    pub fn object(&self) -> &XmlObject {
        &self.object
    }

    /// Mutable field storage of the collection element itself
    pub fn object_mut(&mut self) -> &mut XmlObject {
        &mut self.object
    }

    pub fn min_occurs(&self) -> usize {
        self.min_occurs
    }

    pub fn max_occurs(&self) -> MaxOccurs {
        self.max_occurs
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&I> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut I> {
        self.items.get_mut(index)
    }

    /// Append a member
    pub fn push(&mut self, item: I) {
        self.items.push(item);
        self.object.invalidate();
    }

    /// Remove and return the last member
    pub fn pop(&mut self) -> Option<I> {
        let item = self.items.pop();
        self.object.invalidate();
        item
    }

    /// Remove and return the member at `index`
    pub fn remove(&mut self, index: usize) -> Option<I> {
        if index >= self.items.len() {
            return None;
        }
        let item = self.items.remove(index);
        self.object.invalidate();
        Some(item)
    }

    /// Remove all members
    pub fn clear(&mut self) {
        self.items.clear();
        self.object.invalidate();
    }

    /// Reorder the members
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&I, &I) -> Ordering,
    {
        self.items.sort_by(compare);
        self.object.invalidate();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, I> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, I> {
        self.items.iter_mut()
    }

    fn member_name(&self) -> String {
        match I::schema() {
            Ok(schema) => schema.local_name().to_string(),
            Err(_) => std::any::type_name::<I>().to_string(),
        }
    }

    fn check_count(&self, count: usize) -> Result<()> {
        check_occurs(
            &self.member_name(),
            self.object.local_name(),
            count,
            self.min_occurs,
            self.max_occurs,
        )
    }
}

impl<I: XmlType> MemberSet for XmlCollection<I> {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn compile_members(&mut self, element: &mut XmlElement) -> Result<usize> {
        let mut count = 0;
        for item in &mut self.items {
            if let Some(member) = item.get_xml_with(false)? {
                element.push_element(member);
                count += 1;
            }
        }
        self.check_count(count)?;
        Ok(count)
    }

    fn stage_members(&mut self, element: &XmlElement) -> Result<()> {
        let parser = self.object.schema().parser().copied().ok_or_else(|| {
            Error::XmlException(format!(
                "collection '{}' has no member type",
                self.object.local_name()
            ))
        })?;
        let member = parser.schema()?;

        let mut items = Vec::new();
        for child in element.child_elements() {
            if !child.is(member.local_name(), member.namespace_uri()) {
                log::trace!(
                    "<{}> skips child <{}>",
                    self.object.local_name(),
                    child.qualified_name()
                );
                continue;
            }
            let mut item = I::create()?;
            item.load_element(child)?;
            items.push(item);
        }

        self.check_count(items.len())?;
        self.staged = items;
        Ok(())
    }

    fn swap_staged(&mut self) {
        std::mem::swap(&mut self.items, &mut self.staged);
    }

    fn drop_staged(&mut self) {
        self.staged.clear();
    }
}

impl<I: XmlType> fmt::Debug for XmlCollection<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XmlCollection")
            .field("local_name", &self.object.local_name())
            .field("items", &self.items)
            .field("min_occurs", &self.min_occurs)
            .field("max_occurs", &self.max_occurs)
            .finish()
    }
}

impl<'a, I: XmlType> IntoIterator for &'a XmlCollection<I> {
    type Item = &'a I;
    type IntoIter = std::slice::Iter<'a, I>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Mappable;
    use crate::schema::{ChildOptions, ElementOptions, SchemaBuilder, SchemaDescriptor};

    #[derive(Debug)]
    struct Item {
        object: XmlObject,
    }

    impl Mappable for Item {
        fn object(&self) -> &XmlObject {
            &self.object
        }

        fn object_mut(&mut self) -> &mut XmlObject {
            &mut self.object
        }
    }

    impl XmlType for Item {
        fn declare() -> Result<SchemaDescriptor> {
            Ok(SchemaBuilder::element(ElementOptions::new("item"))?
                .child("value", ChildOptions::new().with_local_name("Value").with_default(""))?
                .build())
        }

        fn from_object(object: XmlObject) -> Self {
            Self { object }
        }
    }

    impl Item {
        fn with_value(value: &str) -> Self {
            let mut item = Item::create().unwrap();
            item.object.set("value", value).unwrap();
            item
        }
    }

    #[derive(Debug)]
    struct Items(XmlCollection<Item>);

    impl Mappable for Items {
        fn object(&self) -> &XmlObject {
            self.0.object()
        }

        fn object_mut(&mut self) -> &mut XmlObject {
            self.0.object_mut()
        }

        fn members(&self) -> Option<&dyn MemberSet> {
            Some(&self.0)
        }

        fn members_mut(&mut self) -> Option<&mut dyn MemberSet> {
            Some(&mut self.0)
        }
    }

    impl XmlType for Items {
        fn declare() -> Result<SchemaDescriptor> {
            Ok(SchemaBuilder::element(ElementOptions::new("items").with_parser(Item::parser()))?.build())
        }

        fn from_object(object: XmlObject) -> Self {
            Self(XmlCollection::new(object))
        }
    }

    #[test]
    fn test_has_changed_follows_members() {
        let mut items = Items::create().unwrap();
        assert!(!items.has_changed());
        items.0.push(Item::create().unwrap());
        assert!(items.has_changed());
        items.0.clear();
        // cleared but dirty
        assert!(items.has_changed());
    }

    #[test]
    fn test_unchanged_members_are_skipped() {
        let mut items = Items::create().unwrap();
        items.0.push(Item::create().unwrap());
        items.0.push(Item::with_value("a"));
        assert_eq!(
            items.to_text().unwrap(),
            "<items><item><Value>a</Value></item></items>"
        );
    }

    #[test]
    fn test_own_bounds_checked_after_filtering() {
        let mut items = Items::create().unwrap();
        items.0 = XmlCollection::new(XmlObject::new(Items::schema().unwrap()).unwrap())
            .with_occurs(1, 2);
        items.0.push(Item::create().unwrap());
        let err = items.to_text().unwrap_err();
        assert!(matches!(err, Error::CollectionLimit { count: 0, min: 1, .. }));
    }

    #[test]
    fn test_load_skips_foreign_children() {
        let items = Items::load("<items><item><Value>1</Value></item><other/><item/></items>").unwrap();
        assert_eq!(items.0.len(), 2);
        assert_eq!(items.0.get(0).unwrap().object.text("value"), Some("1"));
        assert_eq!(items.0.get(1).unwrap().object.text("value"), Some(""));
    }

    #[test]
    fn test_list_operations() {
        let mut items = Items::create().unwrap();
        items.0.push(Item::with_value("a"));
        items.0.push(Item::with_value("b"));
        items.0.push(Item::with_value("c"));
        assert_eq!(items.0.remove(1).unwrap().object.text("value"), Some("b"));
        assert!(items.0.remove(5).is_none());
        assert_eq!(items.0.pop().unwrap().object.text("value"), Some("c"));
        let values: Vec<_> = items.0.iter().map(|i| i.object.text("value")).collect();
        assert_eq!(values, vec![Some("a")]);
        items.0.get_mut(0).unwrap().object.set("value", "z").unwrap();
        assert_eq!((&items.0).into_iter().count(), 1);
    }

    #[test]
    fn test_sort_reorders_and_dirties() {
        let mut items = Items::load("<items><item><Value>b</Value></item><item><Value>a</Value></item></items>")
            .unwrap();
        assert!(items.object().element().is_some());

        items
            .0
            .sort_by(|x, y| x.object.text("value").cmp(&y.object.text("value")));
        assert!(items.object().element().is_none());
        assert_eq!(
            items.to_text().unwrap(),
            "<items><item><Value>a</Value></item><item><Value>b</Value></item></items>"
        );
    }

    #[test]
    fn test_failed_hook_keeps_members() {
        #[derive(Debug)]
        struct Picky(XmlCollection<Item>);

        impl Mappable for Picky {
            fn object(&self) -> &XmlObject {
                self.0.object()
            }
            fn object_mut(&mut self) -> &mut XmlObject {
                self.0.object_mut()
            }
            fn members(&self) -> Option<&dyn MemberSet> {
                Some(&self.0)
            }
            fn members_mut(&mut self) -> Option<&mut dyn MemberSet> {
                Some(&mut self.0)
            }
            fn on_load_xml(&mut self, _element: &XmlElement) -> Result<()> {
                Err(Error::MethodNotImplemented)
            }
        }

        impl XmlType for Picky {
            fn declare() -> Result<SchemaDescriptor> {
                Ok(SchemaBuilder::element(ElementOptions::new("picky").with_parser(Item::parser()))?
                    .build())
            }
            fn from_object(object: XmlObject) -> Self {
                Self(XmlCollection::new(object))
            }
        }

        let mut picky = Picky::create().unwrap();
        picky.0.push(Item::with_value("a"));
        let err = picky
            .load_xml("<picky><item><Value>1</Value></item><item/></picky>")
            .unwrap_err();
        assert_eq!(err, Error::MethodNotImplemented);
        assert_eq!(picky.0.len(), 1);
        assert_eq!(picky.0.get(0).unwrap().object.text("value"), Some("a"));
        assert!(picky.object().element().is_none());
    }

    #[test]
    fn test_collection_without_member_type() {
        #[derive(Debug)]
        struct Orphans(XmlCollection<Item>);

        impl Mappable for Orphans {
            fn object(&self) -> &XmlObject {
                self.0.object()
            }
            fn object_mut(&mut self) -> &mut XmlObject {
                self.0.object_mut()
            }
            fn members(&self) -> Option<&dyn MemberSet> {
                Some(&self.0)
            }
            fn members_mut(&mut self) -> Option<&mut dyn MemberSet> {
                Some(&mut self.0)
            }
        }

        impl XmlType for Orphans {
            fn declare() -> Result<SchemaDescriptor> {
                Ok(SchemaBuilder::element(ElementOptions::new("orphans"))?.build())
            }
            fn from_object(object: XmlObject) -> Self {
                Self(XmlCollection::new(object))
            }
        }

        let err = Orphans::load("<orphans><item/></orphans>").unwrap_err();
        assert!(matches!(err, Error::XmlException(_)));
    }
}
