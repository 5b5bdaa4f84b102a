//! Guarded operations on users and articles.

use crate::article::Article;
use crate::error::{collect, ContentError, ContentResult, FieldErrors, FieldViolation};
use crate::patch::{ArticlePatch, UserPatch};
use crate::persister::{assign_owner_if_unset, ArticlePersister};
use crate::store::ContentStore;
use crate::user::User;
use quill_common_config::{ContentConfig, QuillConfig};
use quill_common_core::{ArticleId, UserId, UserStatus};
use quill_common_log::timed;
use quill_policy::{
    evaluate, validate_owner, Action, ArticleSubject, PolicyEvaluator, Principal, ResourceKind,
    RoleSet, Subject,
};
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

/// Entry point for every user and article operation.
///
/// Each write runs in the same order: field validation (including owner
/// assignment), authorization, then persistence. A rejected step leaves the
/// store untouched.
pub struct ContentService<S> {
    store: Arc<S>,
    persister: ArticlePersister<S>,
    policy: PolicyEvaluator,
    config: ContentConfig,
}

impl<S: ContentStore> ContentService<S> {
    pub fn new(store: Arc<S>, config: &QuillConfig) -> Self {
        Self {
            persister: ArticlePersister::new(Arc::clone(&store)),
            store,
            policy: PolicyEvaluator::from_config(&config.security),
            config: config.content.clone(),
        }
    }

    pub fn with_policy(mut self, policy: PolicyEvaluator) -> Self {
        self.policy = policy;
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn policy(&self) -> PolicyEvaluator {
        self.policy
    }

    // Users

    /// Register a new account. Open to anonymous callers.
    ///
    /// Roles and status are only taken from the input when an administrator
    /// registers the account.
    pub fn register_user(&self, actor: Option<&Principal>, mut user: User) -> ContentResult<User> {
        user.id = None;
        if !actor.is_some_and(Principal::is_admin) {
            user.roles = RoleSet::new();
            user.status = UserStatus::default();
        }

        user.validate()?;
        self.policy.authorize(actor, Action::Create, &Subject::new_user())?;

        let user = self.store.insert_user(user)?;
        info!(user_id = ?user.id, "User registered");
        Ok(user)
    }

    pub fn get_user(&self, actor: Option<&Principal>, id: UserId) -> ContentResult<User> {
        let user = self.load_user(id)?;
        self.policy.authorize(actor, Action::View, &user.subject())?;
        Ok(user)
    }

    /// The whole user collection. Administrators only.
    pub fn list_users(&self, actor: Option<&Principal>) -> ContentResult<Vec<User>> {
        self.policy
            .authorize(actor, Action::ViewList, &Subject::new_user())?;
        Ok(self.store.users())
    }

    pub fn update_user(
        &self,
        actor: Option<&Principal>,
        id: UserId,
        patch: UserPatch,
    ) -> ContentResult<User> {
        let mut user = self.load_user(id)?;
        self.policy.authorize(actor, Action::Edit, &user.subject())?;

        patch.apply(&mut user, actor.is_some_and(Principal::is_admin));
        user.validate()?;

        let user = self.store.update_user(user)?;
        info!(user_id = %id, "User updated");
        Ok(user)
    }

    pub fn delete_user(&self, actor: Option<&Principal>, id: UserId) -> ContentResult<User> {
        let user = self.load_user(id)?;
        self.policy.authorize(actor, Action::Delete, &user.subject())?;

        let removed = self.store.remove_user(id)?;
        info!(user_id = %id, "User deleted");
        Ok(removed)
    }

    /// Published articles owned by `owner`. Requires VIEW on that user.
    pub fn published_articles_of(
        &self,
        actor: Option<&Principal>,
        owner: UserId,
    ) -> ContentResult<Vec<Article>> {
        let user = self.load_user(owner)?;
        self.policy.authorize(actor, Action::View, &user.subject())?;

        Ok(self
            .store
            .articles_by_owner(owner)
            .into_iter()
            .filter(|a| a.is_published)
            .collect())
    }

    // Articles

    /// Create an article. An unowned article is given to the caller before
    /// the owner is validated and the policy runs.
    pub fn create_article(
        &self,
        actor: Option<&Principal>,
        mut article: Article,
    ) -> ContentResult<Article> {
        article.id = None;
        assign_owner_if_unset(&mut article, actor);

        self.validate_article(actor, &article)?;
        self.policy
            .authorize(actor, Action::Create, &self.article_subject(&article))?;

        self.persister.persist(article, actor)
    }

    pub fn get_article(&self, actor: Option<&Principal>, id: ArticleId) -> ContentResult<Article> {
        let article = self.load_article(id)?;
        self.policy
            .authorize(actor, Action::View, &self.article_subject(&article))?;
        Ok(article)
    }

    /// Every article the caller may view.
    ///
    /// Filtering is silent: hidden articles are not audited as denials.
    pub fn list_articles(&self, actor: Option<&Principal>) -> Vec<Article> {
        let visible: Vec<Article> = timed!("list_articles", {
            self.store
                .articles()
                .into_iter()
                .filter(|a| evaluate(actor, Action::View, &self.article_subject(a)).is_allowed())
                .collect()
        });
        debug!(count = visible.len(), "Listed articles");
        visible
    }

    /// Update an article. Access is decided on the stored article, before the
    /// patch is applied.
    pub fn update_article(
        &self,
        actor: Option<&Principal>,
        id: ArticleId,
        patch: ArticlePatch,
    ) -> ContentResult<Article> {
        let mut article = self.load_article(id)?;
        self.policy
            .authorize(actor, Action::Edit, &self.article_subject(&article))?;

        patch.apply(&mut article);
        self.validate_article(actor, &article)?;

        self.persister.persist(article, actor)
    }

    pub fn delete_article(&self, actor: Option<&Principal>, id: ArticleId) -> ContentResult<Article> {
        let article = self.load_article(id)?;
        self.policy
            .authorize(actor, Action::Delete, &self.article_subject(&article))?;

        self.persister.remove(id)
    }

    /// Summary of an article cut at the configured length.
    pub fn short_description(&self, article: &Article) -> Option<String> {
        article.short_description(self.config.summary_length)
    }

    /// Policy view of an article, with the owner's current status.
    ///
    /// An owner id that no longer resolves to a user counts as no owner.
    pub fn article_subject(&self, article: &Article) -> Subject {
        let owner = article
            .owner
            .and_then(|id| self.store.user(id))
            .and_then(|user| user.owner_ref());

        Subject::Article(ArticleSubject {
            id: article.id,
            owner,
        })
    }

    fn validate_article(&self, actor: Option<&Principal>, article: &Article) -> ContentResult<()> {
        let mut errors = FieldErrors::new();
        if let Err(e) = article.validate() {
            collect(&e, &mut errors);
        }

        match validate_owner(actor, article.owner) {
            Err(violation) => {
                errors
                    .entry("owner".to_string())
                    .or_default()
                    .push(violation.into());
            }
            Ok(()) => {
                if let Some(owner) = article.owner {
                    if self.store.user(owner).is_none() {
                        errors
                            .entry("owner".to_string())
                            .or_default()
                            .push(FieldViolation::new("exists", "This value is not valid."));
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            debug!(fields = ?errors.keys().collect::<Vec<_>>(), "Article rejected");
            Err(ContentError::Validation(errors))
        }
    }

    fn load_user(&self, id: UserId) -> ContentResult<User> {
        self.store
            .user(id)
            .ok_or_else(|| ContentError::not_found(ResourceKind::User, id))
    }

    fn load_article(&self, id: ArticleId) -> ContentResult<Article> {
        self.store
            .article(id)
            .ok_or_else(|| ContentError::not_found(ResourceKind::Article, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use quill_policy::{Reason, Role};

    struct Fixture {
        service: ContentService<MemoryStore>,
        alice: Principal,
        bob: Principal,
        root: Principal,
    }

    fn setup() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let mut ids = Vec::new();
        for email in ["alice@example.com", "bob@example.com", "root@example.com"] {
            let mut user = User::new(email, "First", "Last");
            user.status = UserStatus::Active;
            if email.starts_with("root") {
                user.roles.insert(Role::Admin);
            }
            ids.push(store.insert_user(user).unwrap());
        }

        Fixture {
            service: ContentService::new(store, &QuillConfig::default()),
            alice: ids[0].principal().unwrap(),
            bob: ids[1].principal().unwrap(),
            root: ids[2].principal().unwrap(),
        }
    }

    #[test]
    fn test_create_assigns_caller_as_owner() {
        let f = setup();
        let article = f
            .service
            .create_article(Some(&f.alice), Article::new("Hello world"))
            .unwrap();
        assert_eq!(article.owner, Some(f.alice.id));
        assert!(article.created_at.is_some());
    }

    #[test]
    fn test_create_for_other_user_rejected() {
        let f = setup();
        let err = f
            .service
            .create_article(Some(&f.alice), Article::new("Hello").owned_by(f.bob.id))
            .unwrap_err();
        assert_eq!(err.violations("owner")[0].code, "invalid_owner");
        assert!(f.service.store().articles().is_empty());
    }

    #[test]
    fn test_admin_creates_for_other_user() {
        let f = setup();
        let article = f
            .service
            .create_article(Some(&f.root), Article::new("Hello").owned_by(f.bob.id))
            .unwrap();
        assert_eq!(article.owner, Some(f.bob.id));
    }

    #[test]
    fn test_create_with_unknown_owner_rejected() {
        let f = setup();
        let err = f
            .service
            .create_article(Some(&f.root), Article::new("Hello").owned_by(UserId::new(99)))
            .unwrap_err();
        assert_eq!(err.violations("owner")[0].code, "exists");
    }

    #[test]
    fn test_anonymous_create() {
        let f = setup();
        let err = f
            .service
            .create_article(None, Article::new("Hello"))
            .unwrap_err();
        assert_eq!(err.error_code(), "unauthorized");

        let err = f
            .service
            .create_article(None, Article::new("Hello").owned_by(f.alice.id))
            .unwrap_err();
        assert_eq!(err.violations("owner")[0].code, "anonymous_not_permitted");
    }

    #[test]
    fn test_field_and_owner_errors_reported_together() {
        let f = setup();
        let err = f
            .service
            .create_article(Some(&f.alice), Article::new("X").owned_by(f.bob.id))
            .unwrap_err();
        assert!(!err.violations("title").is_empty());
        assert!(!err.violations("owner").is_empty());
    }

    #[test]
    fn test_edit_requires_ownership() {
        let f = setup();
        let article = f
            .service
            .create_article(Some(&f.alice), Article::new("Hello"))
            .unwrap();
        let id = article.id.unwrap();

        let patch = ArticlePatch {
            title: Some("Hijacked".into()),
            ..Default::default()
        };
        let err = f.service.update_article(Some(&f.bob), id, patch).unwrap_err();
        assert!(matches!(
            err,
            ContentError::Authz(quill_policy::AuthzError::Forbidden {
                reason: Reason::NotOwner,
                ..
            })
        ));

        let patch = ArticlePatch {
            title: Some("Hello again".into()),
            ..Default::default()
        };
        let updated = f.service.update_article(Some(&f.alice), id, patch).unwrap();
        assert_eq!(updated.title, "Hello again");
        assert_eq!(updated.created_at, article.created_at);
    }

    #[test]
    fn test_owner_cannot_give_article_away() {
        let f = setup();
        let article = f
            .service
            .create_article(Some(&f.alice), Article::new("Hello"))
            .unwrap();
        let patch = ArticlePatch {
            owner: Some(f.bob.id),
            ..Default::default()
        };
        let err = f
            .service
            .update_article(Some(&f.alice), article.id.unwrap(), patch)
            .unwrap_err();
        assert_eq!(err.violations("owner")[0].code, "invalid_owner");
    }

    #[test]
    fn test_list_articles_filters_by_view() {
        let f = setup();
        f.service
            .create_article(Some(&f.alice), Article::new("Alice's"))
            .unwrap();
        f.service
            .create_article(Some(&f.bob), Article::new("Bob's"))
            .unwrap();

        assert_eq!(f.service.list_articles(Some(&f.alice)).len(), 1);
        assert_eq!(f.service.list_articles(Some(&f.root)).len(), 2);
        assert!(f.service.list_articles(None).is_empty());
    }

    #[test]
    fn test_delete_article() {
        let f = setup();
        let article = f
            .service
            .create_article(Some(&f.alice), Article::new("Hello"))
            .unwrap();
        let id = article.id.unwrap();

        assert!(f.service.delete_article(Some(&f.bob), id).is_err());
        assert!(f.service.delete_article(Some(&f.alice), id).is_ok());
        assert_eq!(
            f.service.get_article(Some(&f.alice), id).unwrap_err().error_code(),
            "not_found"
        );
    }

    #[test]
    fn test_register_ignores_roles_from_non_admin() {
        let f = setup();
        let mut user = User::new("eve@example.com", "Eve", "Example");
        user.roles = RoleSet::admin();
        user.status = UserStatus::Active;

        let user = f.service.register_user(None, user).unwrap();
        assert!(!user.roles.is_admin());
        assert_eq!(user.status, UserStatus::Pending);
    }

    #[test]
    fn test_register_by_member_forbidden() {
        let f = setup();
        let err = f
            .service
            .register_user(Some(&f.alice), User::new("eve@example.com", "Eve", "Example"))
            .unwrap_err();
        assert_eq!(err.error_code(), "forbidden");
    }

    #[test]
    fn test_list_users_admin_only() {
        let f = setup();
        assert_eq!(f.service.list_users(Some(&f.root)).unwrap().len(), 3);
        assert_eq!(
            f.service.list_users(Some(&f.alice)).unwrap_err().error_code(),
            "forbidden"
        );
        assert_eq!(f.service.list_users(None).unwrap_err().error_code(), "unauthorized");
    }

    #[test]
    fn test_user_self_access() {
        let f = setup();
        assert!(f.service.get_user(Some(&f.alice), f.alice.id).is_ok());
        assert!(f.service.get_user(Some(&f.alice), f.bob.id).is_err());
        assert!(f.service.get_user(Some(&f.root), f.bob.id).is_ok());
    }

    #[test]
    fn test_short_description_uses_config() {
        let f = setup();
        let article = Article::new("Hello").with_content("x".repeat(41));
        assert_eq!(
            f.service.short_description(&article),
            Some(format!("{}...", "x".repeat(40)))
        );
    }
}
