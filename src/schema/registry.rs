//! Type registry
//!
//! Schemas are declared lazily, the first time a type's schema is requested, and cached
//! for the lifetime of the process keyed by the Rust type.

use super::SchemaDescriptor;
use crate::error::Result;
use crate::object::{Mappable, XmlType};
use once_cell::sync::Lazy;
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

static REGISTRY: Lazy<SchemaRegistry> = Lazy::new(SchemaRegistry::new);

/// Handle to a mapped type: its schema and a factory for new instances
#[derive(Clone, Copy)]
pub struct Parser {
    type_name: &'static str,
    schema: fn() -> Result<Arc<SchemaDescriptor>>,
    create: fn() -> Result<Box<dyn Mappable>>,
}

impl Parser {
    /// Parser for the mapped type `T`
    pub fn of<T: XmlType>() -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            schema: T::schema,
            create: create_boxed::<T>,
        }
    }

    /// Rust type name of the mapped type
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Schema of the mapped type
    pub fn schema(&self) -> Result<Arc<SchemaDescriptor>> {
        (self.schema)()
    }

    /// Create a new, empty instance of the mapped type
    pub fn create(&self) -> Result<Box<dyn Mappable>> {
        (self.create)()
    }
}

fn create_boxed<T: XmlType>() -> Result<Box<dyn Mappable>> {
    Ok(Box::new(T::create()?))
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser").field("type", &self.type_name).finish()
    }
}

/// Process-wide cache of declared schemas
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: RwLock<HashMap<TypeId, Arc<SchemaDescriptor>>>,
}

impl SchemaRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The global registry used by [`XmlType::schema`]
    pub fn global() -> &'static SchemaRegistry {
        &REGISTRY
    }

    /// Schema of `T`, declaring it on first use.
    ///
    /// No lock is held while `T::declare` runs, so declarations may resolve the schemas
    /// of their base and nested types.
    pub fn resolve<T: XmlType>(&self) -> Result<Arc<SchemaDescriptor>> {
        let id = TypeId::of::<T>();
        if let Some(schema) = self
            .schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
        {
            return Ok(Arc::clone(schema));
        }

        let schema = Arc::new(T::declare()?);
        log::debug!(
            "declared schema <{}> for {} with {} field(s)",
            schema.local_name(),
            std::any::type_name::<T>(),
            schema.items().len()
        );

        let mut schemas = self.schemas.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(schemas.entry(id).or_insert(schema)))
    }

    /// Whether the schema of `T` has been declared
    pub fn contains<T: XmlType>(&self) -> bool {
        self.schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&TypeId::of::<T>())
    }

    /// Number of declared schemas
    pub fn len(&self) -> usize {
        self.schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no schema has been declared yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
