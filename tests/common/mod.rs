//! Shared helpers for integration tests
//!
//! `xml_type!` declares a plain mapped type around an `XmlObject`; `xml_collection!`
//! declares a collection of an existing mapped type.

#![allow(unused_macros)]

macro_rules! xml_type {
    ($name:ident, $declare:block) => {
        #[derive(Debug)]
        pub struct $name {
            pub object: xmlcore::XmlObject,
        }

        impl xmlcore::Mappable for $name {
            fn object(&self) -> &xmlcore::XmlObject {
                &self.object
            }

            fn object_mut(&mut self) -> &mut xmlcore::XmlObject {
                &mut self.object
            }
        }

        impl xmlcore::XmlType for $name {
            fn declare() -> xmlcore::Result<xmlcore::schema::SchemaDescriptor> $declare

            fn from_object(object: xmlcore::XmlObject) -> Self {
                Self { object }
            }
        }
    };
}

macro_rules! xml_collection {
    ($name:ident, $item:ty, $declare:block) => {
        xml_collection!($name, $item, 0, xmlcore::schema::MaxOccurs::Unbounded, $declare);
    };
    ($name:ident, $item:ty, $min:expr, $max:expr, $declare:block) => {
        #[derive(Debug)]
        pub struct $name(pub xmlcore::XmlCollection<$item>);

        impl xmlcore::Mappable for $name {
            fn object(&self) -> &xmlcore::XmlObject {
                self.0.object()
            }

            fn object_mut(&mut self) -> &mut xmlcore::XmlObject {
                self.0.object_mut()
            }

            fn members(&self) -> Option<&dyn xmlcore::MemberSet> {
                Some(&self.0)
            }

            fn members_mut(&mut self) -> Option<&mut dyn xmlcore::MemberSet> {
                Some(&mut self.0)
            }
        }

        impl xmlcore::XmlType for $name {
            fn declare() -> xmlcore::Result<xmlcore::schema::SchemaDescriptor> $declare

            fn from_object(object: xmlcore::XmlObject) -> Self {
                Self(xmlcore::XmlCollection::new(object).with_occurs($min, $max))
            }
        }
    };
}
