//! Configuration for the select2 bridge.
//!
//! [`Select2Config`] is an explicitly constructed, immutable value passed to
//! the server and widgets. Hard-coded defaults are merged with whatever a
//! partial TOML file supplies, and the derived asset URL helpers fall back to
//! a base-URL-plus-suffix scheme when no explicit override is configured.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

const SELECT2_JS_SUFFIX: &str = "js/select2.min.js";
const SELECT2_CSS_SUFFIX: &str = "css/select2.min.css";

/// Errors raised while loading configuration or fixture files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}

/// Settings bag for asset URLs and endpoint mounting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Select2Config {
    /// Full URL of the jQuery script.
    #[serde(default = "default_jquery_url")]
    pub jquery_url: String,
    /// Base URL the select2 JS/CSS assets hang off.
    #[serde(default = "default_select2_url")]
    pub select2_url: String,
    /// Explicit override for the select2 JavaScript file.
    #[serde(default)]
    pub select2_js_url: Option<String>,
    /// Explicit override for the select2 stylesheet.
    #[serde(default)]
    pub select2_css_url: Option<String>,
    /// Optional theme stylesheet.
    #[serde(default)]
    pub theme_url: Option<String>,
    /// Whether widget media should include the jQuery script.
    #[serde(default)]
    pub include_jquery: bool,
    /// Whether widget media should include the select2 assets.
    #[serde(default = "default_include_select2")]
    pub include_select2: bool,
    /// Prefix the fetch-items endpoint is mounted under, e.g. "/select2".
    #[serde(default)]
    pub endpoint_prefix: String,
}

fn default_jquery_url() -> String {
    "//code.jquery.com/jquery.min.js".to_string()
}

fn default_select2_url() -> String {
    "//cdnjs.cloudflare.com/ajax/libs/select2/4.0.0/".to_string()
}

fn default_include_select2() -> bool {
    true
}

impl Default for Select2Config {
    fn default() -> Self {
        Self {
            jquery_url: default_jquery_url(),
            select2_url: default_select2_url(),
            select2_js_url: None,
            select2_css_url: None,
            theme_url: None,
            include_jquery: false,
            include_select2: default_include_select2(),
            endpoint_prefix: String::new(),
        }
    }
}

impl Select2Config {
    /// Load configuration from a TOML file, defaulting absent keys.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Mount the fetch-items endpoint under the given prefix.
    pub fn with_endpoint_prefix(mut self, prefix: &str) -> Self {
        self.endpoint_prefix = prefix.to_string();
        self
    }

    /// Full URL of the jQuery script to load.
    pub fn resolve_jquery_url(&self) -> String {
        self.jquery_url.clone()
    }

    /// Full URL of the select2 JavaScript file.
    pub fn resolve_select2_js_url(&self) -> String {
        match &self.select2_js_url {
            Some(url) => url.clone(),
            None => self.prefixed(SELECT2_JS_SUFFIX),
        }
    }

    /// Full URL of the select2 stylesheet.
    pub fn resolve_select2_css_url(&self) -> String {
        match &self.select2_css_url {
            Some(url) => url.clone(),
            None => self.prefixed(SELECT2_CSS_SUFFIX),
        }
    }

    /// Full URL of the theme stylesheet, when one is configured.
    pub fn resolve_theme_url(&self) -> Option<String> {
        self.theme_url.clone()
    }

    /// Path of the fetch-items endpoint for one relation field.
    pub fn fetch_items_path(&self, namespace: &str, entity: &str, field: &str) -> String {
        format!(
            "{}/{}/{}/{}/",
            self.endpoint_prefix.trim_end_matches('/'),
            namespace,
            entity,
            field
        )
    }

    fn prefixed(&self, suffix: &str) -> String {
        format!("{}{}", self.select2_url, suffix)
    }
}
