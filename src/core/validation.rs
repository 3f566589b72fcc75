//! Validation utilities
//!
//! Identifier rules shared by plugin ids, dependency targets and interface names,
//! plus range checks for configuration values.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static IDENTIFIER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.\-]*$").expect("identifier pattern is valid")
});

/// Smallest history limit that still leaves room after a trim
pub const MIN_HISTORY_LIMIT: usize = 2;

/// Validation failure with the offending field and a readable message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    field: Option<String>,
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }

    pub fn for_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{}: {}", field, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ValidationError {}

impl crate::core::error_handling::ContextualError for ValidationError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<String> {
        Some(self.to_string())
    }
}

/// Check whether a plugin id or interface name is well formed
pub fn is_valid_identifier(value: &str) -> bool {
    IDENTIFIER_PATTERN.is_match(value)
}

/// Validate a plugin id, dependency target or interface name
pub fn validate_identifier(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err("identifier cannot be empty".to_string());
    }
    if !is_valid_identifier(value) {
        return Err(format!(
            "'{}' must start with a letter or digit and contain only letters, digits, '_', '.' or '-'",
            value
        ));
    }
    Ok(())
}

/// Validate the event history cap
pub fn validate_history_limit(limit: usize) -> Result<usize, String> {
    if limit < MIN_HISTORY_LIMIT {
        return Err(format!(
            "history limit must be at least {} (got {})",
            MIN_HISTORY_LIMIT, limit
        ));
    }
    Ok(limit)
}
