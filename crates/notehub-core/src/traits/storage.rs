//! Storage provider trait for the durable backing store.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StorageEntry {
    /// Path relative to the provider root, using `/` separators.
    pub path: String,
    /// Final path segment.
    pub name: String,
    /// Whether this entry is a directory.
    pub is_directory: bool,
    /// Size in bytes (0 for directories on most platforms).
    pub size_bytes: u64,
    /// Last modified timestamp, when the platform reports one.
    pub last_modified: Option<chrono::DateTime<chrono::Utc>>,
}

/// Trait for durable storage backends.
///
/// All paths are relative to the provider root and use `/` separators.
/// The stores in `notehub-storage` and `notehub-service` only ever talk to
/// the disk through this trait.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local").
    fn provider_type(&self) -> &str;

    /// Check whether the provider root is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Read a file into memory.
    async fn read_bytes(&self, path: &str) -> AppResult<Bytes>;

    /// Read a UTF-8 file into a string.
    async fn read_to_string(&self, path: &str) -> AppResult<String> {
        let bytes = self.read_bytes(path).await?;
        String::from_utf8(bytes.to_vec()).map_err(|e| {
            crate::error::AppError::with_source(
                crate::error::ErrorKind::Serialization,
                format!("File is not valid UTF-8: {path}"),
                e,
            )
        })
    }

    /// Write bytes to a file, creating missing parent directories.
    async fn write(&self, path: &str, data: Bytes) -> AppResult<()>;

    /// Delete a file. Deleting a missing file succeeds.
    async fn delete(&self, path: &str) -> AppResult<()>;

    /// Delete a directory and all its contents. Deleting a missing
    /// directory succeeds.
    async fn delete_dir(&self, path: &str) -> AppResult<()>;

    /// Recursively copy a directory tree. Existing files at the destination
    /// are overwritten, so repeating an interrupted copy is safe.
    async fn copy_dir(&self, from: &str, to: &str) -> AppResult<()>;

    /// Check whether a file or directory exists.
    async fn exists(&self, path: &str) -> AppResult<bool>;

    /// List the direct contents of a directory. A missing directory lists
    /// as empty.
    async fn list(&self, path: &str) -> AppResult<Vec<StorageEntry>>;

    /// Create a directory (and any missing parents).
    async fn create_dir(&self, path: &str) -> AppResult<()>;
}
