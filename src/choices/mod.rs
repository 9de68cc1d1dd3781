//! Candidate choice collections.
//!
//! The query service consumes choice data through [`ChoiceProvider`], which
//! hands out a fresh [`ChoiceSet`] per request. A set supports the operations
//! the service needs: count, predicate filter, identifier restriction and
//! slicing, iterating records in backing-store order.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One candidate for selection.
///
/// `id` is the related entity's primary key serialized to a string, `label`
/// its display text. `attrs` carries the searchable attributes; the label
/// doubles as an attribute under the name `"label"` unless shadowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceRecord {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub attrs: HashMap<String, String>,
}

impl ChoiceRecord {
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            attrs: HashMap::new(),
        }
    }

    /// Attach a searchable attribute.
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    /// Look up a searchable attribute, falling back to the label for `"label"`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        match self.attrs.get(name) {
            Some(value) => Some(value.as_str()),
            None if name == "label" => Some(self.label.as_str()),
            None => None,
        }
    }
}

/// Predicate over candidate records.
pub type ChoicePredicate = Box<dyn Fn(&ChoiceRecord) -> bool>;

/// An ordered, owned collection of candidate records.
#[derive(Debug, Clone, Default)]
pub struct ChoiceSet {
    records: Vec<ChoiceRecord>,
}

impl ChoiceSet {
    pub fn new(records: Vec<ChoiceRecord>) -> Self {
        Self { records }
    }

    /// Number of records, counted before any slicing.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Keep only records matching the predicate.
    pub fn filter(self, predicate: &dyn Fn(&ChoiceRecord) -> bool) -> Self {
        Self {
            records: self.records.into_iter().filter(|r| predicate(r)).collect(),
        }
    }

    /// Keep only records whose id is in `ids`, dropping duplicate ids.
    pub fn restrict_to_ids(self, ids: &[String]) -> Self {
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let mut seen = HashSet::new();
        Self {
            records: self
                .records
                .into_iter()
                .filter(|r| wanted.contains(r.id.as_str()) && seen.insert(r.id.clone()))
                .collect(),
        }
    }

    /// The page of records starting at `offset`, at most `limit` long.
    pub fn slice(self, offset: usize, limit: usize) -> Self {
        Self {
            records: self
                .records
                .into_iter()
                .skip(offset)
                .take(limit)
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChoiceRecord> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<ChoiceRecord> {
        self.records
    }
}

/// Source of candidate records for one relation field.
///
/// Implementations hand out a fresh set per call so request handling never
/// mutates shared state.
pub trait ChoiceProvider: Send + Sync {
    fn choice_set(&self) -> ChoiceSet;
}

/// In-memory provider backed by a record list, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryChoices {
    records: Vec<ChoiceRecord>,
}

impl MemoryChoices {
    pub fn new(records: Vec<ChoiceRecord>) -> Self {
        Self { records }
    }
}

impl ChoiceProvider for MemoryChoices {
    fn choice_set(&self) -> ChoiceSet {
        ChoiceSet::new(self.records.clone())
    }
}
