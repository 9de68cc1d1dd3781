//! Shared fixtures for integration tests.

#![allow(dead_code)]

use select2_bridge::choices::{ChoiceRecord, MemoryChoices};
use select2_bridge::registry::{EntityRegistry, EntityType, RelationField};
use std::sync::Arc;

pub const GREEK: [(&str, &str); 5] = [
    ("1", "Alpha"),
    ("2", "Beta"),
    ("3", "Gamma"),
    ("4", "Delta"),
    ("5", "Epsilon"),
];

pub fn greek_provider() -> Arc<MemoryChoices> {
    Arc::new(MemoryChoices::new(
        GREEK
            .iter()
            .map(|(id, label)| ChoiceRecord::new(id, label))
            .collect(),
    ))
}

/// `shop.order` with a case-insensitive `customer` field and a
/// case-sensitive `tag` field, both over the greek records.
pub fn sample_registry() -> EntityRegistry {
    let mut registry = EntityRegistry::new();
    registry.register(
        EntityType::new("shop", "order")
            .with_field(RelationField::new("customer", greek_provider(), "label"))
            .with_field(
                RelationField::new("tag", greek_provider(), "label").with_case_sensitive(true),
            ),
    );
    registry
}

/// `crm.account.owner` over `total` generated records, every label
/// containing "Person" so a single query matches them all.
pub fn numbered_registry(total: usize) -> EntityRegistry {
    let records = (1..=total)
        .map(|n| ChoiceRecord::new(&n.to_string(), &format!("Person {:03}", n)))
        .collect();
    let provider = Arc::new(MemoryChoices::new(records));
    let mut registry = EntityRegistry::new();
    registry.register(
        EntityType::new("crm", "account").with_field(RelationField::new("owner", provider, "label")),
    );
    registry
}
