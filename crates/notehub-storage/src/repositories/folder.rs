//! Folder repository implementation.

use std::sync::Arc;

use tracing::warn;

use notehub_core::result::AppResult;
use notehub_core::traits::storage::StorageProvider;
use notehub_entity::codec::FolderMeta;
use notehub_entity::folder::Folder;

use crate::layout;
use crate::sidecar;

/// Repository for folder directories and their `.folder-meta` sidecars.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    provider: Arc<dyn StorageProvider>,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(provider: Arc<dyn StorageProvider>) -> Self {
        Self { provider }
    }

    /// Read the folder stored at `dir`, or `None` if `dir` has no valid
    /// sidecar.
    pub async fn read(&self, dir: &str) -> Option<Folder> {
        let path = layout::folder_meta(dir);
        let meta: FolderMeta = sidecar::read_json(self.provider.as_ref(), &path).await?;
        match Folder::try_from(meta) {
            Ok(folder) => Some(folder),
            Err(e) => {
                warn!(path = %path, error = %e, "Folder sidecar has invalid fields");
                None
            }
        }
    }

    /// Whether `dir` is a folder directory.
    pub async fn is_folder(&self, dir: &str) -> AppResult<bool> {
        self.provider.exists(&layout::folder_meta(dir)).await
    }

    /// Create `dir` and write its sidecar.
    pub async fn create(&self, dir: &str, folder: &Folder) -> AppResult<()> {
        self.provider.create_dir(dir).await?;
        self.write(dir, folder).await
    }

    /// Overwrite the sidecar of `dir`.
    pub async fn write(&self, dir: &str, folder: &Folder) -> AppResult<()> {
        sidecar::write_json(
            self.provider.as_ref(),
            &layout::folder_meta(dir),
            &FolderMeta::from(folder),
        )
        .await
    }

    /// Paths of the direct subdirectories of `dir`, in listing order.
    ///
    /// Both subfolders and documents are directories; callers classify them.
    pub async fn child_dirs(&self, dir: &str) -> AppResult<Vec<String>> {
        Ok(self
            .provider
            .list(dir)
            .await?
            .into_iter()
            .filter(|entry| entry.is_directory)
            .map(|entry| entry.path)
            .collect())
    }

    /// Paths of the direct subfolders of `dir`, in listing order.
    pub async fn subfolder_dirs(&self, dir: &str) -> AppResult<Vec<String>> {
        let mut folders = Vec::new();
        for child in self.child_dirs(dir).await? {
            if self.is_folder(&child).await? {
                folders.push(child);
            }
        }
        Ok(folders)
    }

    /// Remove `dir` with everything beneath it. Missing is success.
    pub async fn delete(&self, dir: &str) -> AppResult<()> {
        self.provider.delete_dir(dir).await
    }
}
