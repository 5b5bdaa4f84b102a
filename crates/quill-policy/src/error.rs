//! Authorization errors.

use crate::action::Action;
use crate::evaluator::Reason;
use crate::subject::ResourceKind;
use thiserror::Error;

/// Result type for authorization checks.
pub type AuthzResult<T> = Result<T, AuthzError>;

/// A denied decision, in the form the request layer turns into a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthzError {
    /// Anonymous caller denied; the caller should authenticate.
    #[error("Authentication required to {action} {resource}")]
    Unauthenticated { action: Action, resource: ResourceKind },

    /// Authenticated caller denied.
    #[error("Access denied: {action} on {resource} ({reason})")]
    Forbidden {
        action: Action,
        resource: ResourceKind,
        reason: Reason,
    },
}

impl AuthzError {
    /// Get error code for client handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthenticated { .. } => "unauthorized",
            Self::Forbidden { .. } => "forbidden",
        }
    }
}
