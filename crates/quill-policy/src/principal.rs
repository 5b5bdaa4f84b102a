//! The authenticated caller.

use crate::role::{Role, RoleSet};
use quill_common_core::{UserId, UserStatus};
use serde::{Deserialize, Serialize};

/// Identity of the current caller, resolved by the authentication layer.
///
/// Anonymous callers are represented by `Option::<&Principal>::None` at the
/// policy entry points rather than by a variant here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: UserId,
    #[serde(default)]
    pub roles: RoleSet,
    #[serde(default)]
    pub status: UserStatus,
}

impl Principal {
    /// An active principal holding only the base role.
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            roles: RoleSet::new(),
            status: UserStatus::Active,
        }
    }

    /// An active principal holding the administrative role.
    pub fn admin(id: UserId) -> Self {
        Self {
            roles: RoleSet::admin(),
            ..Self::new(id)
        }
    }

    /// Check if the principal holds the administrative role.
    pub fn is_admin(&self) -> bool {
        self.roles.is_admin()
    }

    /// Check if the principal holds a specific role.
    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }
}
