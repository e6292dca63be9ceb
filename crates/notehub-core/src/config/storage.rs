//! Storage configuration.

use serde::{Deserialize, Serialize};

/// Top-level storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Application storage root. The folder tree lives under
    /// `{root_path}/content`.
    #[serde(default = "default_root_path")]
    pub root_path: String,
    /// Extension of document content artifacts (`content.<ext>`).
    #[serde(default = "default_content_extension")]
    pub content_extension: String,
    /// How many times a directory deletion is attempted before failing.
    #[serde(default = "default_delete_retry_attempts")]
    pub delete_retry_attempts: u32,
    /// Initial backoff between deletion attempts, doubled on every retry.
    #[serde(default = "default_delete_retry_backoff_ms")]
    pub delete_retry_backoff_ms: u64,
    /// Maintain the in-memory id → location index.
    #[serde(default = "default_true")]
    pub index_enabled: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            content_extension: default_content_extension(),
            delete_retry_attempts: default_delete_retry_attempts(),
            delete_retry_backoff_ms: default_delete_retry_backoff_ms(),
            index_enabled: true,
        }
    }
}

fn default_root_path() -> String {
    "./data".to_string()
}

fn default_content_extension() -> String {
    "md".to_string()
}

fn default_delete_retry_attempts() -> u32 {
    5
}

fn default_delete_retry_backoff_ms() -> u64 {
    20
}

fn default_true() -> bool {
    true
}
