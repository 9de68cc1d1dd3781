//! Select widget rendering.
//!
//! [`SelectWidget`] renders a select control in one of two modes: static
//! (every option inline) or ajax (only pre-selected values rendered; the
//! rest fetched client-side from the choice endpoint). A readonly attribute
//! short-circuits both into a disabled, label-only representation.

use crate::config::Select2Config;
use crate::error::{Select2Error, Select2Result};
use crate::query::{ChoiceItem, ChoiceQuery};
use crate::registry::EntityRegistry;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

/// Marker class the client-side initializer looks for.
pub const WIDGET_CSS_CLASS: &str = "djselect2";

/// A flat option or a labelled group of options.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetChoice {
    Option(String, String),
    Group(String, Vec<(String, String)>),
}

impl WidgetChoice {
    pub fn option(value: &str, label: &str) -> Self {
        WidgetChoice::Option(value.to_string(), label.to_string())
    }

    pub fn group(label: &str, options: Vec<(String, String)>) -> Self {
        WidgetChoice::Group(label.to_string(), options)
    }
}

/// Ties a widget to the relation field whose endpoint serves its choices.
#[derive(Clone)]
pub struct FieldBinding {
    pub registry: Arc<EntityRegistry>,
    pub config: Select2Config,
    pub namespace: String,
    pub entity: String,
    pub field: String,
}

impl FieldBinding {
    pub fn new(
        registry: Arc<EntityRegistry>,
        config: Select2Config,
        namespace: &str,
        entity: &str,
        field: &str,
    ) -> Self {
        Self {
            registry,
            config,
            namespace: namespace.to_string(),
            entity: entity.to_string(),
            field: field.to_string(),
        }
    }

    /// Reverse the fetch-items endpoint URL for this field.
    pub fn fetch_url(&self) -> String {
        self.config
            .fetch_items_path(&self.namespace, &self.entity, &self.field)
    }

    fn query(&self) -> ChoiceQuery {
        ChoiceQuery::new(&self.registry, &self.namespace, &self.entity, &self.field)
    }
}

/// Form data as submitted by a client, list-valued per key.
pub type FormData = HashMap<String, Vec<String>>;

/// A select form control, single or multiple.
#[derive(Clone, Default)]
pub struct SelectWidget {
    attrs: BTreeMap<String, String>,
    choices: Vec<WidgetChoice>,
    ajax: bool,
    multiple: bool,
    binding: Option<FieldBinding>,
}

impl SelectWidget {
    /// A single-select widget.
    pub fn new() -> Self {
        Self::default()
    }

    /// A multi-select widget; allows multiple native selections.
    pub fn new_multiple() -> Self {
        let mut widget = Self::default();
        widget.multiple = true;
        widget
            .attrs
            .insert("multiple".to_string(), "multiple".to_string());
        widget
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    /// Inline choices rendered in static mode.
    pub fn with_choices(mut self, choices: Vec<WidgetChoice>) -> Self {
        self.choices = choices;
        self
    }

    /// Placeholder text, carried as `data-placeholder`.
    pub fn with_overlay(mut self, text: &str) -> Self {
        self.attrs
            .insert("data-placeholder".to_string(), text.to_string());
        self
    }

    /// Defer option population to the client, via the choice endpoint.
    pub fn ajax(mut self) -> Self {
        self.ajax = true;
        self
    }

    /// Bind to the relation field backing this widget. Required in ajax and
    /// readonly modes, where labels are resolved through the query service.
    pub fn bound(mut self, binding: FieldBinding) -> Self {
        self.binding = Some(binding);
        self
    }

    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    /// Extract this widget's submitted value(s) from form data.
    ///
    /// Multi-select always reads the full list of submitted values, ajax mode
    /// or not; single-select reads at most one scalar.
    pub fn value_from_form_data(&self, data: &FormData, name: &str) -> Vec<String> {
        if self.multiple {
            data.get(name).cloned().unwrap_or_default()
        } else {
            data.get(name)
                .and_then(|values| values.first().cloned())
                .into_iter()
                .collect()
        }
    }

    /// Render the control for the current value set.
    ///
    /// `extra_attrs` merge over the widget's own attributes; the marker class
    /// is combined into `class` either way. Errors propagate to the caller's
    /// rendering machinery.
    pub fn render(
        &self,
        name: &str,
        values: &[String],
        extra_attrs: &[(&str, &str)],
    ) -> Select2Result<String> {
        let mut attrs = self.attrs.clone();
        for (attr_name, value) in extra_attrs {
            attrs.insert((*attr_name).to_string(), (*value).to_string());
        }
        let class = combine_css_classes(attrs.get("class").map(String::as_str), WIDGET_CSS_CLASS);
        attrs.insert("class".to_string(), class);
        attrs.insert("name".to_string(), name.to_string());

        if attrs.get("readonly").map(String::as_str).unwrap_or("false") != "false" {
            return self.render_readonly(values, attrs);
        }

        if self.ajax && !attrs.contains_key("data-ajax--url") {
            attrs.insert("data-ajax--url".to_string(), self.reverse()?);
        }

        let mut output = vec![format!("<select{}>", flat_attrs(&attrs))];
        if !self.ajax || !values.is_empty() {
            let options = self.render_options(values)?;
            if !options.is_empty() {
                output.push(options);
            }
        }
        output.push("</select>".to_string());
        Ok(output.join("\n"))
    }

    /// Disabled, label-only rendering: a hidden input carrying the raw value
    /// plus a disabled text input carrying its resolved label.
    fn render_readonly(
        &self,
        values: &[String],
        attrs: BTreeMap<String, String>,
    ) -> Select2Result<String> {
        let value = match values.first().filter(|v| !v.is_empty()) {
            Some(value) => value,
            None => return Ok(format!("<input{}>", flat_attrs(&attrs))),
        };

        let label = self
            .get_labels(std::slice::from_ref(value))?
            .into_iter()
            .next()
            .ok_or_else(|| {
                Select2Error::Internal(format!("no label resolved for value '{}'", value))
            })?;

        let mut hidden = attrs.clone();
        hidden.insert("type".to_string(), "hidden".to_string());
        hidden.insert("value".to_string(), value.clone());

        let mut visible = attrs;
        visible.remove("id");
        visible.insert("value".to_string(), label.text);
        visible.insert("disabled".to_string(), "disabled".to_string());

        Ok(format!(
            "<input{}>\n<input{}>",
            flat_attrs(&hidden),
            flat_attrs(&visible)
        ))
    }

    fn render_options(&self, values: &[String]) -> Select2Result<String> {
        let selected: HashSet<&str> = values.iter().map(String::as_str).collect();
        let mut output = Vec::new();

        if self.ajax {
            let mut seen = HashSet::new();
            let unique: Vec<String> = values
                .iter()
                .filter(|v| !v.is_empty() && seen.insert(v.as_str()))
                .cloned()
                .collect();
            for item in self.get_labels(&unique)? {
                output.push(render_option(&selected, &item.id, &item.text));
            }
        } else {
            for choice in &self.choices {
                match choice {
                    WidgetChoice::Option(value, label) => {
                        output.push(render_option(&selected, value, label));
                    }
                    WidgetChoice::Group(group_label, options) => {
                        output.push(format!("<optgroup label=\"{}\">", escape(group_label)));
                        for (value, label) in options {
                            output.push(render_option(&selected, value, label));
                        }
                        output.push("</optgroup>".to_string());
                    }
                }
            }
        }
        Ok(output.join("\n"))
    }

    /// Labels for pre-selected values, via the query service.
    fn get_labels(&self, values: &[String]) -> Select2Result<Vec<ChoiceItem>> {
        let binding = self.binding.as_ref().ok_or_else(|| {
            Select2Error::Internal("widget is not bound to an entity field".to_string())
        })?;
        binding.query().init_selection(values, self.multiple)
    }

    fn reverse(&self) -> Select2Result<String> {
        let binding = self.binding.as_ref().ok_or_else(|| {
            Select2Error::Internal("widget is not bound to an entity field".to_string())
        })?;
        Ok(binding.fetch_url())
    }
}

/// Media tags a page hosting the widget needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetMedia {
    pub js: Vec<String>,
    pub css: Vec<String>,
}

impl WidgetMedia {
    pub fn from_config(config: &Select2Config) -> Self {
        let mut js = Vec::new();
        let mut css = Vec::new();
        if config.include_jquery {
            js.push(config.resolve_jquery_url());
        }
        if config.include_select2 {
            js.push(config.resolve_select2_js_url());
            css.push(config.resolve_select2_css_url());
        }
        if let Some(theme) = config.resolve_theme_url() {
            css.push(theme);
        }
        Self { js, css }
    }

    /// Script and stylesheet tags, one per line.
    pub fn render(&self) -> String {
        let mut output: Vec<String> = self
            .js
            .iter()
            .map(|url| format!("<script src=\"{}\"></script>", escape(url)))
            .collect();
        output.extend(
            self.css
                .iter()
                .map(|url| format!("<link href=\"{}\" rel=\"stylesheet\">", escape(url))),
        );
        output.join("\n")
    }
}

fn render_option(selected: &HashSet<&str>, value: &str, label: &str) -> String {
    let selected_attr = if selected.contains(value) {
        " selected=\"selected\""
    } else {
        ""
    };
    format!(
        "<option value=\"{}\"{}>{}</option>",
        escape(value),
        selected_attr,
        escape(label)
    )
}

/// Serialize attributes sorted by name, values escaped.
fn flat_attrs(attrs: &BTreeMap<String, String>) -> String {
    attrs
        .iter()
        .map(|(name, value)| format!(" {}=\"{}\"", name, escape(value)))
        .collect()
}

fn combine_css_classes(existing: Option<&str>, extra: &str) -> String {
    match existing {
        None | Some("") => extra.to_string(),
        Some(existing) if existing.split_whitespace().any(|c| c == extra) => existing.to_string(),
        Some(existing) => format!("{} {}", existing, extra),
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
