//! Layered error definitions
//!
//! Categorized by source: scheduling operations / configuration

use thiserror::Error;

/// Errors returned by dispatcher operations.
///
/// None of these is fatal: the dispatcher stays usable after any of them, and
/// retrying with the same input yields the same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// Priority class missing or not one of HIGH / NORMAL
    #[error("{}", invalid_class_message(.value))]
    InvalidClass { value: Option<String> },

    /// Lookup key empty or blank
    #[error("contact key cannot be empty or blank")]
    InvalidKey,

    /// No queued record carries the key
    #[error("customer with contact key {key} not found")]
    NotFound { key: String },

    /// Dispatcher front-end is not running
    #[error("dispatcher unavailable: {message}")]
    Unavailable { message: String },
}

fn invalid_class_message(value: &Option<String>) -> String {
    match value {
        Some(value) => format!("priority class '{value}' is not recognized"),
        None => "priority class is missing".to_string(),
    }
}

impl SchedulerError {
    /// Create an invalid class error for a missing or unrecognized value
    pub fn invalid_class(value: Option<impl Into<String>>) -> Self {
        Self::InvalidClass {
            value: value.map(Into::into),
        }
    }

    /// Create a not found error
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create an unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Configuration and I/O errors
#[derive(Debug, Error)]
pub enum ContractError {
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }
}
