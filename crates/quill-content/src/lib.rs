//! Users, articles and the flows that guard them.
//!
//! [`service::ContentService`] is the entry point: every operation takes the
//! current principal (or `None`), validates the input, runs the policy and
//! only then touches the store.

pub mod article;
pub mod error;
pub mod patch;
pub mod persister;
pub mod service;
pub mod store;
pub mod user;

pub use article::Article;
pub use error::{ContentError, ContentResult, FieldViolation};
pub use patch::{ArticlePatch, UserPatch};
pub use persister::{assign_owner_if_unset, ArticlePersister};
pub use service::ContentService;
pub use store::{ContentStore, MemoryStore};
pub use user::User;
