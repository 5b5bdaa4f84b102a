//! User accounts.

use quill_common_core::{UserId, UserStatus};
use quill_policy::{OwnerRef, Principal, RoleSet, Subject};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A registered (or registering) user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct User {
    /// Assigned by the store.
    #[serde(default)]
    pub id: Option<UserId>,

    #[validate(
        length(min = 1, message = "This value should not be blank."),
        email(message = "This value is not a valid email address.")
    )]
    pub email: String,

    #[validate(length(min = 1, message = "This value should not be blank."))]
    pub first_name: String,

    #[validate(length(min = 1, message = "This value should not be blank."))]
    pub last_name: String,

    /// Encoded credential supplied by the authentication layer. Never serialized.
    #[serde(default, skip_serializing)]
    pub password: Option<String>,

    #[serde(default)]
    pub roles: RoleSet,

    #[serde(default)]
    pub phone_number: Option<String>,

    #[serde(default)]
    pub status: UserStatus,
}

impl User {
    pub fn new(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            password: None,
            roles: RoleSet::new(),
            phone_number: None,
            status: UserStatus::default(),
        }
    }

    /// Security identity of this account; `None` until stored.
    pub fn principal(&self) -> Option<Principal> {
        self.id.map(|id| Principal {
            id,
            roles: self.roles.clone(),
            status: self.status,
        })
    }

    /// Policy view of this account as an action target.
    pub fn subject(&self) -> Subject {
        match self.id {
            Some(id) => Subject::user(id, self.status),
            None => Subject::new_user(),
        }
    }

    /// Policy view of this account as an article owner.
    pub fn owner_ref(&self) -> Option<OwnerRef> {
        self.id.map(|id| OwnerRef::new(id, self.status))
    }

    /// Drop the stored credential.
    pub fn erase_credentials(&mut self) {
        self.password = None;
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_policy::Role;

    #[test]
    fn test_new_user_defaults() {
        let user = User::new("ada@example.com", "Ada", "Lovelace");
        assert_eq!(user.status, UserStatus::Pending);
        assert_eq!(user.roles, RoleSet::new());
        assert!(user.principal().is_none());
        assert_eq!(user.subject(), Subject::new_user());
        assert_eq!(user.full_name(), "Ada Lovelace");
    }

    #[test]
    fn test_valid_user_passes() {
        assert!(User::new("ada@example.com", "Ada", "Lovelace").validate().is_ok());
    }

    #[test]
    fn test_invalid_email_rejected() {
        let errors = User::new("not-an-email", "Ada", "Lovelace").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_blank_names_rejected() {
        let errors = User::new("ada@example.com", "", "").validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("first_name"));
        assert!(fields.contains_key("last_name"));
    }

    #[test]
    fn test_principal_projection() {
        let mut user = User::new("root@example.com", "Root", "User");
        user.id = Some(UserId::new(2));
        user.roles.insert(Role::Admin);
        user.status = UserStatus::Active;

        let principal = user.principal().unwrap();
        assert_eq!(principal.id, UserId::new(2));
        assert!(principal.is_admin());
        assert_eq!(user.owner_ref(), Some(OwnerRef::new(UserId::new(2), UserStatus::Active)));
    }

    #[test]
    fn test_password_never_serialized() {
        let mut user = User::new("ada@example.com", "Ada", "Lovelace");
        user.password = Some("$argon2id$secret".into());
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["roles"], serde_json::json!(["ROLE_USER"]));

        user.erase_credentials();
        assert!(user.password.is_none());
    }
}
