//! Test utilities for Quill crates.

use quill_common_config::QuillConfig;
use quill_common_core::{ArticleId, UserId, UserStatus};
use quill_content::{Article, ContentService, ContentStore, MemoryStore, User};
use quill_policy::{OwnerRef, Principal, Role, Subject};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// An active administrator.
pub fn admin(id: u64) -> Principal {
    Principal::admin(UserId::new(id))
}

/// An active principal with only the base role.
pub fn member(id: u64) -> Principal {
    Principal::new(UserId::new(id))
}

/// No authenticated caller.
pub fn anonymous() -> Option<&'static Principal> {
    None
}

/// A stored article whose owner is active.
pub fn article_owned_by(article: u64, owner: u64) -> Subject {
    Subject::article(
        ArticleId::new(article),
        OwnerRef::new(UserId::new(owner), UserStatus::Active),
    )
}

/// A stored, active user account.
pub fn user_subject(id: u64) -> Subject {
    Subject::user(UserId::new(id), UserStatus::Active)
}

/// Users seeded by [`seeded_service`], in id order.
pub struct Seeded {
    pub service: ContentService<MemoryStore>,
    /// Active member, id 1.
    pub alice: Principal,
    /// Active member, id 2.
    pub bob: Principal,
    /// Active administrator, id 3.
    pub root: Principal,
}

/// A content service over a memory store holding two members and one admin.
pub fn seeded_service() -> Seeded {
    let store = Arc::new(MemoryStore::new());
    let seed = |email: &str, admin: bool| -> Principal {
        let mut user = User::new(email, "Test", "User");
        user.status = UserStatus::Active;
        if admin {
            user.roles.insert(Role::Admin);
        }
        let stored = store.insert_user(user).expect("Failed to seed user");
        stored.principal().expect("Seeded user has no id")
    };

    let alice = seed("alice@example.com", false);
    let bob = seed("bob@example.com", false);
    let root = seed("root@example.com", true);

    Seeded {
        service: ContentService::new(Arc::clone(&store), &QuillConfig::default()),
        alice,
        bob,
        root,
    }
}

/// A valid article draft.
pub fn draft(title: &str) -> Article {
    Article::new(title).with_content("Lorem ipsum dolor sit amet.")
}

/// Creates a temporary directory that is cleaned up on drop.
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Creates a temporary file with given content.
pub fn temp_file(content: &str) -> (TempDir, PathBuf) {
    let dir = temp_dir();
    let path = dir.path().join("test_file");
    std::fs::write(&path, content).expect("Failed to write temp file");
    (dir, path)
}

/// Assert that a Result is Ok and return the value.
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a Result is Err and return the error.
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
