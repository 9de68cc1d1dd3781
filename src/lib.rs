//! select2-bridge
//!
//! A pagination/autocomplete bridge between web forms and a relational data
//! layer. A registry of entity types exposes relation fields whose candidate
//! choices are searched, paginated and serialized over a JSON endpoint, and a
//! select widget renders form controls that consume that endpoint.

pub mod choices;
pub mod config;
pub mod error;
pub mod http_server;
pub mod logging;
pub mod query;
pub mod registry;
pub mod widget;

pub use choices::{ChoiceProvider, ChoiceRecord, ChoiceSet, MemoryChoices};
pub use config::Select2Config;
pub use error::{Select2Error, Select2Result};
pub use http_server::ChoiceHttpServer;
pub use query::{ChoiceItem, ChoiceQuery, QueryParams, ResultEnvelope};
pub use registry::{ChoiceSetHook, EntityRegistry, EntityType, RelationField, SearchStrategy};
pub use widget::{FieldBinding, SelectWidget, WidgetChoice, WidgetMedia};
