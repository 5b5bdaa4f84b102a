//! Validation of article owner assignment.

use crate::principal::Principal;
use quill_common_core::UserId;
use serde::Serialize;
use thiserror::Error;

/// Why an owner assignment was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerViolation {
    #[error("Cannot set owner unless you are authenticated")]
    AnonymousNotPermitted,

    #[error("Cannot set owner to a different user")]
    InvalidOwner,
}

impl OwnerViolation {
    /// Stable message key for clients.
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::AnonymousNotPermitted => "anonymous_not_permitted",
            Self::InvalidOwner => "invalid_owner",
        }
    }
}

/// Check whether `actor` may set an article's owner to `candidate`.
///
/// An empty candidate is a no-op and always passes, even for anonymous
/// callers. Administrators may assign anyone; everyone else may only assign
/// themselves.
pub fn validate_owner(actor: Option<&Principal>, candidate: Option<UserId>) -> Result<(), OwnerViolation> {
    let Some(candidate) = candidate else {
        return Ok(());
    };

    let Some(actor) = actor else {
        return Err(OwnerViolation::AnonymousNotPermitted);
    };

    if actor.is_admin() || candidate == actor.id {
        Ok(())
    } else {
        Err(OwnerViolation::InvalidOwner)
    }
}
