//! Roles and role sets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A security role.
///
/// Wire form is the conventional `ROLE_*` string. Roles other than the two
/// the policy knows about are kept verbatim so they survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    /// Base role held by every authenticated user.
    User,
    /// Administrative role; grants unconditional access.
    Admin,
    /// Any other `ROLE_*` string.
    Custom(String),
}

impl Role {
    pub const USER: &'static str = "ROLE_USER";
    pub const ADMIN: &'static str = "ROLE_ADMIN";

    /// Wire name of the role.
    pub fn as_str(&self) -> &str {
        match self {
            Self::User => Self::USER,
            Self::Admin => Self::ADMIN,
            Self::Custom(name) => name,
        }
    }
}

/// Error parsing a role name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid role name {0:?}: roles must start with ROLE_")]
pub struct RoleParseError(pub String);

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::USER => Ok(Self::User),
            Self::ADMIN => Ok(Self::Admin),
            other if other.len() > "ROLE_".len() && other.starts_with("ROLE_") => {
                Ok(Self::Custom(other.to_string()))
            }
            other => Err(RoleParseError(other.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = RoleParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Custom(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The roles held by a principal. Always contains [`Role::User`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Role>", into = "Vec<Role>")]
pub struct RoleSet(BTreeSet<Role>);

impl RoleSet {
    /// A set holding only the base role.
    pub fn new() -> Self {
        Self(BTreeSet::from([Role::User]))
    }

    /// The base role plus [`Role::Admin`].
    pub fn admin() -> Self {
        let mut set = Self::new();
        set.insert(Role::Admin);
        set
    }

    /// Add a role.
    pub fn insert(&mut self, role: Role) -> bool {
        self.0.insert(role)
    }

    /// Remove a role. The base role cannot be removed.
    pub fn remove(&mut self, role: &Role) -> bool {
        if *role == Role::User {
            return false;
        }
        self.0.remove(role)
    }

    pub fn contains(&self, role: &Role) -> bool {
        self.0.contains(role)
    }

    pub fn is_admin(&self) -> bool {
        self.contains(&Role::Admin)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for RoleSet {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        let mut set = Self::new();
        set.0.extend(iter);
        set
    }
}

impl From<Vec<Role>> for RoleSet {
    fn from(roles: Vec<Role>) -> Self {
        roles.into_iter().collect()
    }
}

impl From<RoleSet> for Vec<Role> {
    fn from(set: RoleSet) -> Self {
        set.0.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_roles() {
        assert_eq!("ROLE_USER".parse::<Role>().unwrap(), Role::User);
        assert_eq!("ROLE_ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(
            "ROLE_EDITOR".parse::<Role>().unwrap(),
            Role::Custom("ROLE_EDITOR".into())
        );
    }

    #[test]
    fn test_parse_rejects_unprefixed() {
        assert!("admin".parse::<Role>().is_err());
        assert!("ROLE_".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn test_base_role_always_present() {
        let set = RoleSet::from(vec![Role::Admin]);
        assert!(set.contains(&Role::User));
        assert!(set.is_admin());

        let empty: RoleSet = Vec::<Role>::new().into();
        assert_eq!(empty.len(), 1);
        assert!(!empty.is_admin());
    }

    #[test]
    fn test_base_role_cannot_be_removed() {
        let mut set = RoleSet::admin();
        assert!(!set.remove(&Role::User));
        assert!(set.remove(&Role::Admin));
        assert_eq!(set, RoleSet::new());
    }

    #[test]
    fn test_duplicates_collapse() {
        let set: RoleSet = [Role::User, Role::Admin, Role::Admin].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_serde_adds_base_role() {
        let set: RoleSet = serde_json::from_str(r#"["ROLE_ADMIN"]"#).unwrap();
        assert!(set.contains(&Role::User));
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["ROLE_USER","ROLE_ADMIN"]"#);
    }

    #[test]
    fn test_serde_rejects_bad_role() {
        let result: Result<RoleSet, _> = serde_json::from_str(r#"["superuser"]"#);
        assert!(result.is_err());
    }
}
