//! Articles.

use quill_common_core::{ArticleId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A blog article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Article {
    /// Assigned by the store.
    #[serde(default)]
    pub id: Option<ArticleId>,

    #[validate(length(
        min = 2,
        max = 50,
        message = "Describe your article in 2 to 50 characters."
    ))]
    pub title: String,

    #[serde(default)]
    pub content: Option<String>,

    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub is_published: bool,

    #[serde(default)]
    pub published_at: Option<Timestamp>,

    /// Set once, on first persist.
    #[serde(default)]
    pub created_at: Option<Timestamp>,

    /// Refreshed on every persist.
    #[serde(default)]
    pub updated_at: Option<Timestamp>,

    #[serde(default)]
    pub owner: Option<UserId>,
}

impl Article {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: None,
            image: None,
            is_published: false,
            published_at: None,
            created_at: None,
            updated_at: None,
            owner: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn owned_by(mut self, owner: UserId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn published(mut self) -> Self {
        self.is_published = true;
        self
    }

    /// Content cut to `limit` characters with a trailing ellipsis.
    ///
    /// Content shorter than `limit` is returned whole.
    pub fn short_description(&self, limit: usize) -> Option<String> {
        let content = self.content.as_deref()?;
        if content.chars().count() < limit {
            return Some(content.to_string());
        }
        let cut: String = content.chars().take(limit).collect();
        Some(format!("{cut}..."))
    }

    /// Has this article been stored before?
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("", false ; "empty")]
    #[test_case("A", false ; "one char")]
    #[test_case("Ok", true ; "two chars")]
    #[test_case(&"x".repeat(50), true ; "fifty chars")]
    #[test_case(&"x".repeat(51), false ; "fifty one chars")]
    fn test_title_length(title: &str, valid: bool) {
        assert_eq!(Article::new(title).validate().is_ok(), valid);
    }

    #[test]
    fn test_short_description() {
        let short = Article::new("Hi").with_content("short body");
        assert_eq!(short.short_description(40).as_deref(), Some("short body"));

        let long = Article::new("Hi").with_content("a".repeat(60));
        assert_eq!(long.short_description(40), Some(format!("{}...", "a".repeat(40))));

        assert_eq!(Article::new("Hi").short_description(40), None);
    }

    #[test]
    fn test_short_description_counts_characters() {
        let article = Article::new("Hi").with_content("ééééé");
        assert_eq!(article.short_description(3).as_deref(), Some("ééé..."));
    }

    #[test]
    fn test_builders() {
        let article = Article::new("Title").owned_by(UserId::new(1)).published();
        assert_eq!(article.owner, Some(UserId::new(1)));
        assert!(article.is_published);
        assert!(!article.is_persisted());
    }
}
