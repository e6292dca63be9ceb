//! Document repository implementation.

use std::sync::Arc;

use bytes::Bytes;
use tracing::warn;

use notehub_core::result::AppResult;
use notehub_core::traits::storage::StorageProvider;
use notehub_entity::codec::{self, DocumentMeta};
use notehub_entity::document::Document;

use crate::layout::Layout;
use crate::sidecar;

/// Repository for document directories: `meta.json` plus the content
/// artifact.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    provider: Arc<dyn StorageProvider>,
    layout: Layout,
}

impl DocumentRepository {
    /// Create a new document repository.
    pub fn new(provider: Arc<dyn StorageProvider>, layout: Layout) -> Self {
        Self { provider, layout }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Whether `dir` is a document directory.
    pub async fn is_document(&self, dir: &str) -> AppResult<bool> {
        self.provider.exists(&self.layout.document_meta(dir)).await
    }

    /// Read the document stored at `dir`.
    ///
    /// Returns `None` when either artifact is missing or the sidecar does
    /// not decode.
    pub async fn read(&self, dir: &str) -> Option<Document> {
        let meta: DocumentMeta =
            sidecar::read_json(self.provider.as_ref(), &self.layout.document_meta(dir)).await?;
        let content =
            sidecar::read_text(self.provider.as_ref(), &self.layout.document_content(dir)).await?;
        match codec::metadata_to_document(meta, content) {
            Ok(doc) => Some(doc),
            Err(e) => {
                warn!(dir, error = %e, "Document sidecar has invalid fields");
                None
            }
        }
    }

    /// Write both artifacts. Content goes first so that a sidecar on disk
    /// always has content next to it.
    pub async fn write(&self, dir: &str, doc: &Document) -> AppResult<()> {
        self.write_content(dir, &doc.content).await?;
        self.write_meta(dir, doc).await
    }

    /// Overwrite the sidecar only.
    pub async fn write_meta(&self, dir: &str, doc: &Document) -> AppResult<()> {
        sidecar::write_json(
            self.provider.as_ref(),
            &self.layout.document_meta(dir),
            &codec::document_to_metadata(doc),
        )
        .await
    }

    /// Overwrite the content artifact only.
    pub async fn write_content(&self, dir: &str, content: &str) -> AppResult<()> {
        self.provider
            .write(
                &self.layout.document_content(dir),
                Bytes::copy_from_slice(content.as_bytes()),
            )
            .await
    }

    /// Remove the document directory, versions included. Missing is
    /// success.
    pub async fn delete(&self, dir: &str) -> AppResult<()> {
        self.provider.delete_dir(dir).await
    }
}
