//! Configuration types for Quill.
//!
//! This crate provides the configuration read from `.quill/config.yaml`
//! (or the file named by `QUILL_CONFIG_PATH`).

pub mod env;
pub mod loader;
pub mod types;

pub use env::*;
pub use loader::*;
pub use types::*;
