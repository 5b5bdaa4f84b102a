//! Article write path.

use crate::article::Article;
use crate::error::ContentResult;
use crate::store::{missing_owner, ContentStore};
use quill_common_core::{ArticleId, Timestamp};
use quill_common_log::spans::persist_span;
use quill_policy::Principal;
use std::sync::Arc;
use tracing::{debug, info};

/// Make the current principal the owner of an article that has none.
///
/// Does nothing for anonymous callers or when an owner is already set.
/// Returns true if an owner was assigned.
pub fn assign_owner_if_unset(article: &mut Article, actor: Option<&Principal>) -> bool {
    if article.owner.is_some() {
        return false;
    }
    let Some(actor) = actor else {
        return false;
    };

    article.owner = Some(actor.id);
    debug!(owner = %actor.id, "Assigned article owner");
    true
}

/// Stores articles, keeping their timestamps current.
pub struct ArticlePersister<S> {
    store: Arc<S>,
}

impl<S> Clone for ArticlePersister<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: ContentStore> ArticlePersister<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Insert or update on behalf of `actor`.
    ///
    /// An unowned article is given to the actor first; one that still has no
    /// owner is rejected on `owner`. `updated_at` is refreshed every time;
    /// `created_at` is only set when missing.
    pub fn persist(&self, mut article: Article, actor: Option<&Principal>) -> ContentResult<Article> {
        let op = if article.is_persisted() { "update" } else { "insert" };
        let span = persist_span("article", op);
        let _guard = span.enter();

        assign_owner_if_unset(&mut article, actor);
        if article.owner.is_none() {
            debug!("Refusing to persist article without owner");
            return Err(missing_owner());
        }

        let now = Timestamp::now();
        article.updated_at = Some(now);
        if article.created_at.is_none() {
            article.created_at = Some(now);
        }

        let stored = if article.is_persisted() {
            self.store.update_article(article)?
        } else {
            self.store.insert_article(article)?
        };

        info!(article_id = ?stored.id, owner = ?stored.owner, "Article persisted");
        Ok(stored)
    }

    pub fn remove(&self, id: ArticleId) -> ContentResult<Article> {
        let span = persist_span("article", "remove");
        let _guard = span.enter();

        let removed = self.store.remove_article(id)?;
        info!(article_id = %id, "Article removed");
        Ok(removed)
    }
}
