//! Error types for store operations.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

/// Kind of record an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    User,
    SignatureProfile,
    Document,
    AppliedSignature,
}

impl Entity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::User => "user",
            Entity::SignatureProfile => "signature profile",
            Entity::Document => "document",
            Entity::AppliedSignature => "applied signature",
        }
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rejected input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name as it appears on the wire (e.g. `position.gridPosition`)
    pub field: String,

    /// Error message
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Flattens `validator` output into wire-named field errors
    ///
    /// Field names are converted to camelCase and prefixed with `prefix.`
    /// when given.
    pub fn collect(errors: &ValidationErrors, prefix: Option<&str>) -> Vec<FieldError> {
        errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                let name = match prefix {
                    Some(prefix) => format!("{}.{}", prefix, camel_case(&field.to_string())),
                    None => camel_case(&field.to_string()),
                };
                errors.iter().map(move |error| FieldError {
                    field: name.clone(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect()
    }
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Errors that can occur during store operations.
///
/// Every failing operation leaves the stores untouched.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Malformed or missing input.
    #[error("validation failed: {}", summarize(.0))]
    Validation(Vec<FieldError>),

    /// The operation targets a record that does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: Entity, id: Uuid },

    /// A referenced parent record does not exist.
    #[error("referenced {entity} does not exist: {id}")]
    ReferentialViolation { entity: Entity, id: Uuid },

    /// A uniqueness constraint would be broken (email, verification token).
    #[error("conflict: {0}")]
    Conflict(String),
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl StoreError {
    /// Shorthand for a single-field validation error
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        StoreError::Validation(vec![FieldError::new(field, message)])
    }
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
