//! Crate-wide error types.

use crate::config::ConfigError;
use std::fmt;

/// Result alias used throughout the crate.
pub type Select2Result<T> = Result<T, Select2Error>;

#[derive(Debug)]
pub enum Select2Error {
    /// Unknown entity type or field.
    NotFound(String),
    /// Malformed request parameter (page, page_limit).
    InvalidParameter(String),
    /// An identifier requested for selection is absent from the backing set.
    SelectionNotFound(String),
    /// Configuration loading or parsing failure.
    Config(ConfigError),
    /// Residual server fault.
    Internal(String),
}

impl fmt::Display for Select2Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Select2Error::NotFound(msg) => write!(f, "{}", msg),
            Select2Error::InvalidParameter(msg) => write!(f, "{}", msg),
            Select2Error::SelectionNotFound(msg) => write!(f, "Selection not found: {}", msg),
            Select2Error::Config(err) => write!(f, "Configuration error: {}", err),
            Select2Error::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for Select2Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Select2Error::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for Select2Error {
    fn from(err: ConfigError) -> Self {
        Select2Error::Config(err)
    }
}
