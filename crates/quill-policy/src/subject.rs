//! Policy view of the resources an action targets.
//!
//! A subject is a snapshot: it carries only the attributes the rules read,
//! copied out of the entity for the duration of one decision.

use quill_common_core::{ArticleId, UserId, UserStatus};
use serde::Serialize;
use std::fmt;

/// Resource types in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Article,
    User,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Article => "article",
            Self::User => "user",
        })
    }
}

/// The owner of an article, as far as the policy cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerRef {
    pub id: UserId,
    pub status: UserStatus,
}

impl OwnerRef {
    pub fn new(id: UserId, status: UserStatus) -> Self {
        Self { id, status }
    }
}

/// An article under evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleSubject {
    /// `None` until the article is stored.
    pub id: Option<ArticleId>,
    /// `None` only before owner auto-assignment has run.
    pub owner: Option<OwnerRef>,
}

/// A user account under evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSubject {
    /// `None` for an account that is being registered.
    pub id: Option<UserId>,
    pub status: UserStatus,
}

/// The resource an action targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    Article(ArticleSubject),
    User(UserSubject),
}

impl Subject {
    /// A stored article with a resolved owner.
    pub fn article(id: ArticleId, owner: OwnerRef) -> Self {
        Self::Article(ArticleSubject {
            id: Some(id),
            owner: Some(owner),
        })
    }

    /// A stored user account.
    pub fn user(id: UserId, status: UserStatus) -> Self {
        Self::User(UserSubject {
            id: Some(id),
            status,
        })
    }

    /// A user account that does not exist yet.
    pub fn new_user() -> Self {
        Self::User(UserSubject {
            id: None,
            status: UserStatus::Pending,
        })
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Article(_) => ResourceKind::Article,
            Self::User(_) => ResourceKind::User,
        }
    }

    /// Display id of the resource, if it has been stored.
    pub fn resource_id(&self) -> Option<String> {
        match self {
            Self::Article(a) => a.id.map(|id| id.to_string()),
            Self::User(u) => u.id.map(|id| id.to_string()),
        }
    }
}
