//! Core traits defined in `notehub-core` and implemented by other crates.

pub mod storage;

pub use storage::{StorageEntry, StorageProvider};
