//! Partial updates.
//!
//! Fields left as `None` are untouched. Some fields belong to the admin write
//! group and are dropped silently when the caller is not an administrator.

use crate::article::Article;
use crate::user::User;
use quill_common_core::{Timestamp, UserId, UserStatus};
use quill_policy::RoleSet;
use serde::Deserialize;
use tracing::debug;

/// Changes to a user account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub password: Option<String>,
    /// Admin only.
    pub roles: Option<RoleSet>,
    /// Admin only.
    pub status: Option<UserStatus>,
}

impl UserPatch {
    /// Apply to `user`. Returns true if an admin-only field was ignored.
    pub fn apply(self, user: &mut User, actor_is_admin: bool) -> bool {
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(first_name) = self.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            user.last_name = last_name;
        }
        if let Some(phone_number) = self.phone_number {
            user.phone_number = Some(phone_number);
        }
        if let Some(password) = self.password {
            user.password = Some(password);
        }

        if !actor_is_admin {
            let ignored = self.roles.is_some() || self.status.is_some();
            if ignored {
                debug!(user_id = ?user.id, "Ignoring admin-only fields in user update");
            }
            return ignored;
        }

        if let Some(roles) = self.roles {
            user.roles = roles;
        }
        if let Some(status) = self.status {
            user.status = status;
        }
        false
    }
}

/// Changes to an article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ArticlePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
    pub is_published: Option<bool>,
    pub published_at: Option<Timestamp>,
    /// Subject to owner-assignment validation.
    pub owner: Option<UserId>,
}

impl ArticlePatch {
    pub fn apply(self, article: &mut Article) {
        if let Some(title) = self.title {
            article.title = title;
        }
        if let Some(content) = self.content {
            article.content = Some(content);
        }
        if let Some(image) = self.image {
            article.image = Some(image);
        }
        if let Some(is_published) = self.is_published {
            article.is_published = is_published;
        }
        if let Some(published_at) = self.published_at {
            article.published_at = Some(published_at);
        }
        if let Some(owner) = self.owner {
            article.owner = Some(owner);
        }
    }
}
