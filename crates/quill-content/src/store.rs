//! Entity storage.

use crate::article::Article;
use crate::error::{ContentError, ContentResult, FieldViolation};
use crate::user::User;
use parking_lot::RwLock;
use quill_common_core::{ArticleId, UserId};
use quill_policy::ResourceKind;
use std::collections::BTreeMap;

/// Storage for users and articles.
///
/// Implementations assign ids on insert, enforce email uniqueness, and only
/// store articles whose owner is an existing user.
pub trait ContentStore: Send + Sync {
    fn insert_user(&self, user: User) -> ContentResult<User>;
    fn user(&self, id: UserId) -> Option<User>;
    fn update_user(&self, user: User) -> ContentResult<User>;
    /// Fails with a conflict while the user still owns articles.
    fn remove_user(&self, id: UserId) -> ContentResult<User>;
    fn users(&self) -> Vec<User>;

    /// Fails on `owner` when it is unset or names no stored user.
    fn insert_article(&self, article: Article) -> ContentResult<Article>;
    fn article(&self, id: ArticleId) -> Option<Article>;
    fn update_article(&self, article: Article) -> ContentResult<Article>;
    fn remove_article(&self, id: ArticleId) -> ContentResult<Article>;
    fn articles(&self) -> Vec<Article>;
    fn articles_by_owner(&self, owner: UserId) -> Vec<Article>;
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    articles: BTreeMap<ArticleId, Article>,
    last_user_id: u64,
    last_article_id: u64,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|u| u.id != except && u.email.eq_ignore_ascii_case(email))
    }

    fn check_owner(&self, owner: Option<UserId>) -> ContentResult<()> {
        match owner {
            None => Err(missing_owner()),
            Some(id) if !self.users.contains_key(&id) => Err(ContentError::field(
                "owner",
                FieldViolation::new("exists", "This value is not valid."),
            )),
            Some(_) => Ok(()),
        }
    }
}

pub(crate) fn missing_owner() -> ContentError {
    ContentError::field(
        "owner",
        FieldViolation::new("missing_owner", "This value should not be null."),
    )
}

fn duplicate_email() -> ContentError {
    ContentError::field(
        "email",
        FieldViolation::new("unique", "This value is already used."),
    )
}

/// In-memory store behind a single read/write lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContentStore for MemoryStore {
    fn insert_user(&self, mut user: User) -> ContentResult<User> {
        let mut tables = self.tables.write();
        if tables.email_taken(&user.email, None) {
            return Err(duplicate_email());
        }

        tables.last_user_id += 1;
        let id = UserId::new(tables.last_user_id);
        user.id = Some(id);
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    fn user(&self, id: UserId) -> Option<User> {
        self.tables.read().users.get(&id).cloned()
    }

    fn update_user(&self, user: User) -> ContentResult<User> {
        let id = user
            .id
            .ok_or_else(|| ContentError::not_found(ResourceKind::User, "unsaved"))?;

        let mut tables = self.tables.write();
        if !tables.users.contains_key(&id) {
            return Err(ContentError::not_found(ResourceKind::User, id));
        }
        if tables.email_taken(&user.email, Some(id)) {
            return Err(duplicate_email());
        }

        tables.users.insert(id, user.clone());
        Ok(user)
    }

    fn remove_user(&self, id: UserId) -> ContentResult<User> {
        let mut tables = self.tables.write();
        let owned = tables
            .articles
            .values()
            .filter(|a| a.owner == Some(id))
            .count();
        if owned > 0 {
            return Err(ContentError::Conflict(format!(
                "user {id} still owns {owned} article(s)"
            )));
        }

        tables
            .users
            .remove(&id)
            .ok_or_else(|| ContentError::not_found(ResourceKind::User, id))
    }

    fn users(&self) -> Vec<User> {
        self.tables.read().users.values().cloned().collect()
    }

    fn insert_article(&self, mut article: Article) -> ContentResult<Article> {
        let mut tables = self.tables.write();
        tables.check_owner(article.owner)?;

        tables.last_article_id += 1;
        let id = ArticleId::new(tables.last_article_id);
        article.id = Some(id);
        tables.articles.insert(id, article.clone());
        Ok(article)
    }

    fn article(&self, id: ArticleId) -> Option<Article> {
        self.tables.read().articles.get(&id).cloned()
    }

    fn update_article(&self, article: Article) -> ContentResult<Article> {
        let id = article
            .id
            .ok_or_else(|| ContentError::not_found(ResourceKind::Article, "unsaved"))?;

        let mut tables = self.tables.write();
        if !tables.articles.contains_key(&id) {
            return Err(ContentError::not_found(ResourceKind::Article, id));
        }
        tables.check_owner(article.owner)?;

        tables.articles.insert(id, article.clone());
        Ok(article)
    }

    fn remove_article(&self, id: ArticleId) -> ContentResult<Article> {
        self.tables
            .write()
            .articles
            .remove(&id)
            .ok_or_else(|| ContentError::not_found(ResourceKind::Article, id))
    }

    fn articles(&self) -> Vec<Article> {
        self.tables.read().articles.values().cloned().collect()
    }

    fn articles_by_owner(&self, owner: UserId) -> Vec<Article> {
        self.tables
            .read()
            .articles
            .values()
            .filter(|a| a.owner == Some(owner))
            .cloned()
            .collect()
    }
}
