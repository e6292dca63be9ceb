//! Version snapshot repository implementation.

use std::sync::Arc;

use bytes::Bytes;
use tracing::warn;

use notehub_core::result::AppResult;
use notehub_core::traits::storage::StorageProvider;
use notehub_core::types::VersionId;
use notehub_entity::codec::{self, VersionMeta};
use notehub_entity::version::Version;

use crate::layout::Layout;
use crate::sidecar;

/// Repository for the `versions/` subtree of a document directory.
#[derive(Debug, Clone)]
pub struct VersionRepository {
    provider: Arc<dyn StorageProvider>,
    layout: Layout,
}

impl VersionRepository {
    /// Create a new version repository.
    pub fn new(provider: Arc<dyn StorageProvider>, layout: Layout) -> Self {
        Self { provider, layout }
    }

    /// Write a snapshot. Content goes first; a snapshot only counts once
    /// its sidecar exists.
    pub async fn write(&self, document_dir: &str, version: &Version) -> AppResult<()> {
        self.provider
            .write(
                &self.layout.version_content(document_dir, version.id),
                Bytes::copy_from_slice(version.content.as_bytes()),
            )
            .await?;
        sidecar::write_json(
            self.provider.as_ref(),
            &self.layout.version_meta(document_dir, version.id),
            &VersionMeta::from(version),
        )
        .await
    }

    /// Read one snapshot, or `None` if it is missing or incomplete.
    pub async fn read(&self, document_dir: &str, id: VersionId) -> Option<Version> {
        let meta: VersionMeta = sidecar::read_json(
            self.provider.as_ref(),
            &self.layout.version_meta(document_dir, id),
        )
        .await?;
        let content = sidecar::read_text(
            self.provider.as_ref(),
            &self.layout.version_content(document_dir, id),
        )
        .await?;
        match codec::metadata_to_version(meta, content) {
            Ok(version) => Some(version),
            Err(e) => {
                warn!(document_dir, version_id = %id, error = %e, "Version sidecar has invalid fields");
                None
            }
        }
    }

    /// Every readable snapshot of the document, in listing order.
    pub async fn list(&self, document_dir: &str) -> AppResult<Vec<Version>> {
        let mut versions = Vec::new();
        for entry in self
            .provider
            .list(&self.layout.versions_dir(document_dir))
            .await?
        {
            if !entry.is_directory {
                continue;
            }
            let Ok(id) = entry.name.parse::<VersionId>() else {
                warn!(path = %entry.path, "Skipping non-version directory");
                continue;
            };
            if let Some(version) = self.read(document_dir, id).await {
                versions.push(version);
            }
        }
        Ok(versions)
    }

    /// Whether both artifacts of a snapshot are on disk.
    pub async fn is_complete(&self, document_dir: &str, id: VersionId) -> AppResult<bool> {
        Ok(self
            .provider
            .exists(&self.layout.version_meta(document_dir, id))
            .await?
            && self
                .provider
                .exists(&self.layout.version_content(document_dir, id))
                .await?)
    }

    /// Remove one snapshot directory. Missing is success.
    pub async fn delete(&self, document_dir: &str, id: VersionId) -> AppResult<()> {
        self.provider
            .delete_dir(&self.layout.version_dir(document_dir, id))
            .await
    }
}
