//! Entity type and relation field descriptors.

use crate::choices::{ChoicePredicate, ChoiceProvider, ChoiceSet};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Builds an arbitrary search predicate from the raw search text.
pub type SearchFilterFn = Arc<dyn Fn(&str) -> ChoicePredicate + Send + Sync>;

/// How a relation field matches candidates against the search text.
#[derive(Clone)]
pub enum SearchStrategy {
    /// Contains match over a named record attribute, honoring the field's
    /// case sensitivity flag.
    Attribute(String),
    /// Field-supplied filter builder; bypasses the contains rule entirely.
    Custom(SearchFilterFn),
}

impl fmt::Debug for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SearchStrategy::Attribute(name) => f.debug_tuple("Attribute").field(name).finish(),
            SearchStrategy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Optional candidate pre-filter declared by an entity type.
///
/// Restricts every candidate set drawn for the declaring entity type's
/// fields, ahead of pagination. Useful where per-field choice limits cannot
/// express the restriction, e.g. under entity-type inheritance.
pub trait ChoiceSetHook: Send + Sync {
    fn restrict(&self, field_name: &str, set: ChoiceSet) -> ChoiceSet;
}

/// A named relation field of an entity type.
#[derive(Clone)]
pub struct RelationField {
    pub name: String,
    pub search: SearchStrategy,
    pub case_sensitive: bool,
    provider: Arc<dyn ChoiceProvider>,
}

impl RelationField {
    /// A field searching the given record attribute, case-insensitively.
    pub fn new(name: &str, provider: Arc<dyn ChoiceProvider>, search_attr: &str) -> Self {
        Self {
            name: name.to_string(),
            search: SearchStrategy::Attribute(search_attr.to_string()),
            case_sensitive: false,
            provider,
        }
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Replace the contains rule with a custom filter builder.
    pub fn with_search_filter(mut self, filter: SearchFilterFn) -> Self {
        self.search = SearchStrategy::Custom(filter);
        self
    }

    /// A fresh set of this field's candidate records.
    pub fn choice_set(&self) -> ChoiceSet {
        self.provider.choice_set()
    }
}

impl fmt::Debug for RelationField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("RelationField")
            .field("name", &self.name)
            .field("search", &self.search)
            .field("case_sensitive", &self.case_sensitive)
            .finish_non_exhaustive()
    }
}

/// A data model/table definition addressed by namespace and name.
#[derive(Clone)]
pub struct EntityType {
    pub namespace: String,
    pub name: String,
    fields: HashMap<String, RelationField>,
    hook: Option<Arc<dyn ChoiceSetHook>>,
}

impl EntityType {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            fields: HashMap::new(),
            hook: None,
        }
    }

    pub fn with_field(mut self, field: RelationField) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    /// Declare the optional candidate pre-filter for this entity type.
    pub fn with_hook(mut self, hook: Arc<dyn ChoiceSetHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    pub fn field(&self, name: &str) -> Option<&RelationField> {
        self.fields.get(name)
    }

    /// Run the declared hook over a candidate set, if there is one.
    pub fn apply_hook(&self, field_name: &str, set: ChoiceSet) -> ChoiceSet {
        match &self.hook {
            Some(hook) => hook.restrict(field_name, set),
            None => set,
        }
    }
}

impl fmt::Debug for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("EntityType")
            .field("namespace", &self.namespace)
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}
