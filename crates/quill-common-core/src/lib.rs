//! Quill common core types and utilities.

pub mod id;
pub mod status;
pub mod timestamp;

pub use id::{ArticleId, IdParseError, UserId};
pub use status::UserStatus;
pub use timestamp::Timestamp;
