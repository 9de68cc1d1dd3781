//! Fixture-file loading for the registry.
//!
//! The server binary describes entity types and their candidate records in a
//! JSON file; records are served through [`MemoryChoices`].

use crate::choices::{ChoiceRecord, MemoryChoices};
use crate::config::ConfigError;
use crate::error::Select2Result;
use crate::registry::{EntityRegistry, EntityType, RelationField};
use log::info;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct RegistryFixture {
    entities: Vec<EntityFixture>,
}

#[derive(Debug, Deserialize)]
struct EntityFixture {
    namespace: String,
    name: String,
    fields: Vec<FieldFixture>,
}

#[derive(Debug, Deserialize)]
struct FieldFixture {
    name: String,
    #[serde(default = "default_search_attr")]
    search_attr: String,
    #[serde(default)]
    case_sensitive: bool,
    records: Vec<ChoiceRecord>,
}

fn default_search_attr() -> String {
    "label".to_string()
}

/// Build a registry from a JSON fixture file.
pub fn load_registry(path: &Path) -> Select2Result<EntityRegistry> {
    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let fixture: RegistryFixture = serde_json::from_str(&raw).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let mut registry = EntityRegistry::new();
    for entity_fixture in fixture.entities {
        let mut entity = EntityType::new(&entity_fixture.namespace, &entity_fixture.name);
        for field_fixture in entity_fixture.fields {
            let provider = Arc::new(MemoryChoices::new(field_fixture.records));
            entity = entity.with_field(
                RelationField::new(&field_fixture.name, provider, &field_fixture.search_attr)
                    .with_case_sensitive(field_fixture.case_sensitive),
            );
        }
        registry.register(entity);
    }
    info!(
        "Loaded {} entity types from {}",
        registry.len(),
        path.display()
    );
    Ok(registry)
}
