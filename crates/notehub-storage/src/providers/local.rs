//! Local filesystem storage provider.

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::{debug, warn};

use notehub_core::config::storage::StorageConfig;
use notehub_core::error::{AppError, ErrorKind};
use notehub_core::result::AppResult;
use notehub_core::traits::storage::{StorageEntry, StorageProvider};

/// Retry schedule for directory deletion.
///
/// Recursive deletes can fail transiently when another process briefly
/// holds a handle inside the tree, so they are retried with exponential
/// backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub attempts: u32,
    /// Delay before the first retry. Doubled on every further retry.
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based).
    fn delay(&self, attempt: u32) -> Duration {
        self.backoff
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            backoff: Duration::from_millis(20),
        }
    }
}

impl From<&StorageConfig> for RetryPolicy {
    fn from(config: &StorageConfig) -> Self {
        Self {
            attempts: config.delete_retry_attempts.max(1),
            backoff: Duration::from_millis(config.delete_retry_backoff_ms),
        }
    }
}

/// Local filesystem storage provider.
#[derive(Debug, Clone)]
pub struct LocalStorageProvider {
    /// Root directory for all stored files.
    root: PathBuf,
    /// Retry schedule for [`StorageProvider::delete_dir`].
    retry: RetryPolicy,
}

impl LocalStorageProvider {
    /// Create a new local storage provider rooted at the given path.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        Self::with_retry(root_path, RetryPolicy::default()).await
    }

    /// Create a provider with an explicit deletion retry schedule.
    pub async fn with_retry(root_path: &str, retry: RetryPolicy) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::IoFailure,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root, retry })
    }

    /// Root directory of this provider.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a relative path to an absolute path within the root.
    ///
    /// Paths that would climb out of the root are rejected.
    fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        let clean = path.trim_start_matches('/');
        let relative = Path::new(clean);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(AppError::invalid_input(format!(
                "Path escapes the storage root: {path}"
            )));
        }
        Ok(self.root.join(relative))
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::IoFailure,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl StorageProvider for LocalStorageProvider {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
        let full_path = self.resolve(path)?;
        let data = fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("File not found: {path}"))
            } else {
                AppError::with_source(
                    ErrorKind::IoFailure,
                    format!("Failed to read file: {path}"),
                    e,
                )
            }
        })?;
        Ok(Bytes::from(data))
    }

    async fn write(&self, path: &str, data: Bytes) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::IoFailure,
                format!("Failed to write file: {path}"),
                e,
            )
        })?;

        debug!(path, bytes = data.len(), "Wrote file");
        Ok(())
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        match fs::remove_file(&full_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::IoFailure,
                format!("Failed to delete file: {path}"),
                e,
            )),
        }
    }

    async fn delete_dir(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        let mut attempt = 0;
        loop {
            attempt += 1;
            match fs::remove_dir_all(&full_path).await {
                Ok(()) => {
                    debug!(path, attempt, "Deleted directory");
                    return Ok(());
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
                Err(e) if attempt < self.retry.attempts => {
                    let delay = self.retry.delay(attempt);
                    warn!(
                        path,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Directory deletion failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    return Err(AppError::with_source(
                        ErrorKind::IoFailure,
                        format!("Failed to delete directory after {attempt} attempts: {path}"),
                        e,
                    ));
                }
            }
        }
    }

    async fn copy_dir(&self, from: &str, to: &str) -> AppResult<()> {
        let from_root = self.resolve(from)?;
        let to_root = self.resolve(to)?;

        let mut pending = vec![(from_root, to_root)];
        let mut files = 0u64;
        while let Some((src, dst)) = pending.pop() {
            fs::create_dir_all(&dst).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::IoFailure,
                    format!("Failed to create directory: {}", dst.display()),
                    e,
                )
            })?;

            let mut dir = fs::read_dir(&src).await.map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    AppError::not_found(format!("Directory not found: {from}"))
                } else {
                    AppError::with_source(
                        ErrorKind::IoFailure,
                        format!("Failed to list directory: {}", src.display()),
                        e,
                    )
                }
            })?;

            while let Some(entry) = dir.next_entry().await.map_err(|e| {
                AppError::with_source(ErrorKind::IoFailure, "Failed to read directory entry", e)
            })? {
                let file_type = entry.file_type().await.map_err(|e| {
                    AppError::with_source(ErrorKind::IoFailure, "Failed to get entry type", e)
                })?;
                let target = dst.join(entry.file_name());
                if file_type.is_dir() {
                    pending.push((entry.path(), target));
                } else {
                    fs::copy(entry.path(), &target).await.map_err(|e| {
                        AppError::with_source(
                            ErrorKind::IoFailure,
                            format!("Failed to copy {from} -> {to}"),
                            e,
                        )
                    })?;
                    files += 1;
                }
            }
        }

        debug!(from, to, files, "Copied directory");
        Ok(())
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        let full_path = self.resolve(path)?;
        fs::try_exists(&full_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::IoFailure,
                format!("Failed to stat path: {path}"),
                e,
            )
        })
    }

    async fn list(&self, path: &str) -> AppResult<Vec<StorageEntry>> {
        let full_path = self.resolve(path)?;

        let mut dir = match fs::read_dir(&full_path).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::IoFailure,
                    format!("Failed to list directory: {path}"),
                    e,
                ));
            }
        };

        let mut entries = Vec::new();
        while let Some(entry) = dir.next_entry().await.map_err(|e| {
            AppError::with_source(ErrorKind::IoFailure, "Failed to read directory entry", e)
        })? {
            let entry_meta = entry.metadata().await.map_err(|e| {
                AppError::with_source(ErrorKind::IoFailure, "Failed to get entry metadata", e)
            })?;

            let name = entry.file_name().to_string_lossy().to_string();
            let entry_path = if path.is_empty() || path == "/" {
                name.clone()
            } else {
                format!("{}/{}", path.trim_end_matches('/'), name)
            };

            let last_modified = entry_meta
                .modified()
                .ok()
                .map(chrono::DateTime::<chrono::Utc>::from);

            entries.push(StorageEntry {
                path: entry_path,
                name,
                is_directory: entry_meta.is_dir(),
                size_bytes: entry_meta.len(),
                last_modified,
            });
        }

        entries.sort_by(|a, b| {
            b.is_directory
                .cmp(&a.is_directory)
                .then_with(|| a.name.cmp(&b.name))
        });

        Ok(entries)
    }

    async fn create_dir(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        fs::create_dir_all(&full_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::IoFailure,
                format!("Failed to create directory: {path}"),
                e,
            )
        })?;
        Ok(())
    }
}
