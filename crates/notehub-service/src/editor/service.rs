//! Editor surface over the diff engine.
//!
//! A preview captures the stored content, the proposed content, and their
//! diff. The caller owns the [`BlockSelection`]: it starts from
//! [`DiffPreview::selection`], toggles blocks, and hands the result back to
//! [`EditorService::apply`], which rebuilds the text and saves it through
//! the document service so history is kept.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use notehub_core::error::AppError;
use notehub_core::result::AppResult;
use notehub_core::types::{DocumentId, VersionId};
use notehub_diff::{BlockSelection, Diff, DiffStats, Hunk};
use notehub_entity::document::{Document, UpdateDocument};

use crate::document::{DocumentService, VersionService};

/// A proposed change to a document, ready for block selection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffPreview {
    pub document_id: DocumentId,
    /// Document version the diff was computed against.
    pub base_version: u64,
    pub original: String,
    pub proposed: String,
    pub diff: Diff,
    /// Every block selected.
    pub selection: BlockSelection,
    pub hunks: Vec<Hunk>,
    pub stats: DiffStats,
}

impl DiffPreview {
    fn new(
        document_id: DocumentId,
        base_version: u64,
        original: String,
        proposed: String,
        context: usize,
    ) -> Self {
        let diff = notehub_diff::diff(&original, &proposed);
        let selection = notehub_diff::select_all(&diff);
        let hunks = notehub_diff::hunks(&diff, context);
        let stats = diff.stats();
        Self {
            document_id,
            base_version,
            original,
            proposed,
            diff,
            selection,
            hunks,
            stats,
        }
    }

    /// Text that applying `selection` would produce.
    pub fn render(&self, selection: &BlockSelection) -> String {
        notehub_diff::reconstruct(&self.diff, selection)
    }

    /// Unified-style rendering of every hunk.
    pub fn unified(&self) -> String {
        self.hunks.iter().map(Hunk::render).collect()
    }
}

/// Previews and applies selective edits.
#[derive(Debug, Clone)]
pub struct EditorService {
    documents: Arc<DocumentService>,
    versions: Arc<VersionService>,
    /// Context lines around each hunk.
    context_lines: usize,
}

impl EditorService {
    /// Creates a new editor service.
    pub fn new(
        documents: Arc<DocumentService>,
        versions: Arc<VersionService>,
        context_lines: usize,
    ) -> Self {
        Self {
            documents,
            versions,
            context_lines,
        }
    }

    async fn current(&self, document_id: DocumentId) -> AppResult<Document> {
        self.documents
            .get_by_id(document_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Document not found: {document_id}")))
    }

    /// Diff the stored content against `proposed`.
    pub async fn preview(&self, document_id: DocumentId, proposed: &str) -> AppResult<DiffPreview> {
        let doc = self.current(document_id).await?;
        let preview = DiffPreview::new(
            document_id,
            doc.version,
            doc.content,
            proposed.to_string(),
            self.context_lines,
        );
        debug!(
            document_id = %document_id,
            blocks = preview.stats.blocks,
            "Diff preview computed"
        );
        Ok(preview)
    }

    /// Diff the live content against a snapshot, i.e. what restoring the
    /// snapshot would change.
    pub async fn compare_version(
        &self,
        document_id: DocumentId,
        version_id: VersionId,
    ) -> AppResult<DiffPreview> {
        let doc = self.current(document_id).await?;
        let version = self.versions.get(document_id, version_id).await?;
        Ok(DiffPreview::new(
            document_id,
            doc.version,
            doc.content,
            version.content,
            self.context_lines,
        ))
    }

    /// Save the text obtained by applying `selection` to `preview`.
    ///
    /// A selection that reproduces the original leaves the document
    /// untouched.
    pub async fn apply(
        &self,
        preview: &DiffPreview,
        selection: &BlockSelection,
    ) -> AppResult<Document> {
        let text = preview.render(selection);
        if text == preview.original {
            debug!(document_id = %preview.document_id, "Selection applies no change");
            return self.current(preview.document_id).await;
        }

        let doc = self
            .documents
            .update(preview.document_id, UpdateDocument::content(text))
            .await?;

        info!(
            document_id = %preview.document_id,
            applied_blocks = selection.len(),
            total_blocks = preview.stats.blocks,
            version = doc.version,
            "Diff selection applied"
        );

        Ok(doc)
    }
}
