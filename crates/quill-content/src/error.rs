//! Content operation errors.

use quill_policy::{AuthzError, OwnerViolation, ResourceKind};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

/// Result type for content operations.
pub type ContentResult<T> = Result<T, ContentError>;

/// One rejected field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Machine-readable key, e.g. `length` or `invalid_owner`.
    pub code: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<OwnerViolation> for FieldViolation {
    fn from(violation: OwnerViolation) -> Self {
        Self::new(violation.message_key(), violation.to_string())
    }
}

/// Field name to violations.
pub type FieldErrors = HashMap<String, Vec<FieldViolation>>;

/// Content error enum covering all error cases.
#[derive(Debug, Error)]
pub enum ContentError {
    /// One or more fields were rejected; nothing was written.
    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error(transparent)]
    Authz(#[from] AuthzError),

    #[error("{kind} not found: {id}")]
    NotFound { kind: ResourceKind, id: String },

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl ContentError {
    /// A validation error on a single field.
    pub fn field(field: &str, violation: FieldViolation) -> Self {
        Self::Validation(HashMap::from([(field.to_string(), vec![violation])]))
    }

    pub fn not_found(kind: ResourceKind, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Violations recorded for a field, if this is a validation error.
    pub fn violations(&self, field: &str) -> &[FieldViolation] {
        match self {
            Self::Validation(errors) => errors.get(field).map(Vec::as_slice).unwrap_or(&[]),
            _ => &[],
        }
    }

    /// Get error code for client handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Authz(e) => e.error_code(),
            Self::NotFound { .. } => "not_found",
            Self::Conflict(_) => "conflict",
        }
    }
}

/// Collect `validator` output into field errors.
pub(crate) fn collect(errors: &validator::ValidationErrors, into: &mut FieldErrors) {
    for (field, field_errors) in errors.field_errors() {
        let entry = into.entry(field.to_string()).or_default();
        for err in field_errors.iter() {
            let code = err.code.to_string();
            let message = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| code.clone());
            entry.push(FieldViolation::new(code, message));
        }
    }
}

impl From<validator::ValidationErrors> for ContentError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        collect(&errors, &mut fields);
        Self::Validation(fields)
    }
}
