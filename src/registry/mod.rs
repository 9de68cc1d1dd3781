//! Entity type registry.
//!
//! An [`EntityRegistry`] is built once at startup and read-only afterwards;
//! request handling resolves (namespace, entity, field) triples against it.

pub mod loader;
pub mod types;

pub use loader::load_registry;
pub use types::{ChoiceSetHook, EntityType, RelationField, SearchFilterFn, SearchStrategy};

use crate::error::{Select2Error, Select2Result};
use std::collections::HashMap;

/// Lookup table of entity types keyed by (namespace, name).
#[derive(Default)]
pub struct EntityRegistry {
    entities: HashMap<(String, String), EntityType>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity type, replacing any previous definition.
    pub fn register(&mut self, entity: EntityType) {
        self.entities
            .insert((entity.namespace.clone(), entity.name.clone()), entity);
    }

    pub fn get(&self, namespace: &str, name: &str) -> Option<&EntityType> {
        self.entities
            .get(&(namespace.to_string(), name.to_string()))
    }

    /// Resolve a field reference to its descriptors.
    pub fn resolve(
        &self,
        namespace: &str,
        name: &str,
        field_name: &str,
    ) -> Select2Result<(&RelationField, &EntityType)> {
        let entity = self.get(namespace, name).ok_or_else(|| {
            Select2Error::NotFound(format!("Entity type {}.{} does not exist", namespace, name))
        })?;
        let field = entity.field(field_name).ok_or_else(|| {
            Select2Error::NotFound(format!(
                "Field {} does not exist on {}.{}",
                field_name, namespace, name
            ))
        })?;
        Ok((field, entity))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
