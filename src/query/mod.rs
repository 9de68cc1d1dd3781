//! Choice query service.
//!
//! [`ChoiceQuery`] answers one request for a relation field's candidates:
//! resolve the field, search, paginate and serialize. Resolution is cached
//! for the lifetime of the instance only; nothing is shared across requests.

use crate::choices::{ChoicePredicate, ChoiceRecord, ChoiceSet};
use crate::error::{Select2Error, Select2Result};
use crate::registry::{EntityRegistry, EntityType, RelationField, SearchStrategy};
use log::debug;
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::collections::HashMap;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// One serialized candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceItem {
    pub id: String,
    pub text: String,
}

/// Success envelope returned by the query service.
///
/// `more` is true iff the page offset plus the page's length is below
/// `total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub total: usize,
    pub more: bool,
    pub results: Vec<ChoiceItem>,
}

impl ResultEnvelope {
    /// The envelope returned when no search text is present.
    pub fn empty() -> Self {
        Self {
            total: 0,
            more: false,
            results: Vec::new(),
        }
    }
}

/// Raw request parameters as they arrive on the query string.
///
/// Values stay unparsed strings so validation failures surface as error
/// envelopes rather than rejections in the HTTP extractor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryParams {
    pub q: Option<String>,
    pub page: Option<String>,
    pub page_limit: Option<String>,
}

/// Per-request query handle for one relation field.
pub struct ChoiceQuery<'a> {
    registry: &'a EntityRegistry,
    namespace: String,
    entity: String,
    field_name: String,
    resolved: OnceCell<(&'a RelationField, &'a EntityType)>,
}

impl<'a> ChoiceQuery<'a> {
    pub fn new(
        registry: &'a EntityRegistry,
        namespace: &str,
        entity: &str,
        field_name: &str,
    ) -> Self {
        Self {
            registry,
            namespace: namespace.to_string(),
            entity: entity.to_string(),
            field_name: field_name.to_string(),
            resolved: OnceCell::new(),
        }
    }

    /// Resolve the field reference, caching the result for this instance.
    pub fn resolve(&self) -> Select2Result<(&'a RelationField, &'a EntityType)> {
        if let Some(pair) = self.resolved.get() {
            return Ok(*pair);
        }
        let pair = self
            .registry
            .resolve(&self.namespace, &self.entity, &self.field_name)?;
        let _ = self.resolved.set(pair);
        Ok(pair)
    }

    /// Serialize a candidate set, optionally paginated.
    ///
    /// The entity type's hook restricts the set first. With both `page` and
    /// `page_limit` given, `total` is counted before slicing; otherwise the
    /// full set length is the total and there is never a further page.
    /// Records whose id serializes to the empty string are excluded.
    pub fn list(
        &self,
        set: ChoiceSet,
        page: Option<u32>,
        page_limit: Option<u32>,
    ) -> Select2Result<ResultEnvelope> {
        let (field, entity) = self.resolve()?;
        let set = entity.apply_hook(&field.name, set);

        let (page_set, total, more) = match (page, page_limit) {
            (Some(page), Some(limit)) => {
                let total = set.count();
                let offset = (page as usize - 1) * limit as usize;
                let page_set = set.slice(offset, limit as usize);
                let more = offset + page_set.count() < total;
                (page_set, total, more)
            }
            _ => {
                let total = set.count();
                (set, total, false)
            }
        };

        let results = page_set
            .into_records()
            .into_iter()
            .filter(|r| !r.id.is_empty())
            .map(|r| ChoiceItem {
                id: r.id,
                text: r.label,
            })
            .collect();

        Ok(ResultEnvelope {
            total,
            more,
            results,
        })
    }

    /// Labels for already-chosen identifiers, in the order they were passed.
    ///
    /// The field's candidates are restricted to exactly the given ids
    /// (duplicates dropped) and serialized via [`list`]; the results are then
    /// reordered to the requested id order. An id with no backing candidate
    /// is a [`Select2Error::SelectionNotFound`].
    ///
    /// [`list`]: ChoiceQuery::list
    pub fn init_selection(
        &self,
        ids: &[String],
        _multiple: bool,
    ) -> Select2Result<Vec<ChoiceItem>> {
        let (field, _entity) = self.resolve()?;
        let set = field.choice_set().restrict_to_ids(ids);
        let data = self.list(set, None, None)?;

        let mut by_id: HashMap<String, ChoiceItem> = data
            .results
            .into_iter()
            .map(|item| (item.id.clone(), item))
            .collect();

        let mut ordered = Vec::with_capacity(by_id.len());
        for id in ids {
            match by_id.remove(id) {
                Some(item) => ordered.push(item),
                // Duplicate ids were consumed by the first occurrence.
                None if ordered.iter().any(|item| &item.id == id) => {}
                None => {
                    return Err(Select2Error::SelectionNotFound(format!(
                        "no candidate with id '{}' on {}.{}.{}",
                        id, self.namespace, self.entity, self.field_name
                    )))
                }
            }
        }
        Ok(ordered)
    }

    /// Top-level request handling: parse parameters, search, paginate.
    ///
    /// Absent search text short-circuits to the empty envelope before
    /// `page`/`page_limit` are even validated.
    pub fn fetch_items(&self, params: &QueryParams) -> Select2Result<ResultEnvelope> {
        let (field, _entity) = self.resolve()?;

        let q = match &params.q {
            None => return Ok(ResultEnvelope::empty()),
            Some(q) => q,
        };
        let page_limit = parse_page_param(params.page_limit.as_deref(), DEFAULT_PAGE_LIMIT, "page_limit")?;
        let page = parse_page_param(params.page.as_deref(), DEFAULT_PAGE, "page")?;

        debug!(
            "fetching items for {}.{}.{}: q={:?} page={} page_limit={}",
            self.namespace, self.entity, self.field_name, q, page, page_limit
        );

        let predicate = search_predicate(field, q);
        let set = field.choice_set().filter(&predicate);
        self.list(set, Some(page), Some(page_limit))
    }
}

/// The search predicate for a field: its custom filter builder when it has
/// one, otherwise a contains match over the configured attribute.
fn search_predicate(field: &RelationField, q: &str) -> ChoicePredicate {
    match &field.search {
        SearchStrategy::Custom(build) => build(q),
        SearchStrategy::Attribute(attr) => {
            let attr = attr.clone();
            if field.case_sensitive {
                let needle = q.to_string();
                Box::new(move |record: &ChoiceRecord| {
                    record.attr(&attr).map_or(false, |v| v.contains(&needle))
                })
            } else {
                let needle = q.to_lowercase();
                Box::new(move |record: &ChoiceRecord| {
                    record
                        .attr(&attr)
                        .map_or(false, |v| v.to_lowercase().contains(&needle))
                })
            }
        }
    }
}

fn parse_page_param(raw: Option<&str>, default: u32, name: &str) -> Select2Result<u32> {
    let raw = match raw {
        None => return Ok(default),
        Some(raw) => raw,
    };
    match raw.trim().parse::<u32>() {
        Ok(value) if value >= 1 => Ok(value),
        _ => Err(Select2Error::InvalidParameter(format!(
            "Invalid {} '{}' passed",
            name, raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_param_defaults_when_absent() {
        assert_eq!(parse_page_param(None, 10, "page_limit").unwrap(), 10);
    }

    #[test]
    fn test_parse_page_param_accepts_positive_integers() {
        assert_eq!(parse_page_param(Some("3"), 1, "page").unwrap(), 3);
        assert_eq!(parse_page_param(Some(" 2 "), 1, "page").unwrap(), 2);
    }

    #[test]
    fn test_parse_page_param_rejects_bad_values() {
        for bad in ["0", "-1", "abc", "1.5", ""] {
            let err = parse_page_param(Some(bad), 1, "page").unwrap_err();
            assert!(matches!(err, Select2Error::InvalidParameter(_)), "{}", bad);
            assert_eq!(err.to_string(), format!("Invalid page '{}' passed", bad));
        }
    }

    #[test]
    fn test_empty_envelope_shape() {
        let envelope = ResultEnvelope::empty();
        assert_eq!(envelope.total, 0);
        assert!(!envelope.more);
        assert!(envelope.results.is_empty());
    }
}
