//! Document CRUD, partial updates, and line-range edits.

use std::sync::Arc;

use futures::future::{join_all, try_join_all};
use tracing::{debug, info};

use notehub_core::error::AppError;
use notehub_core::result::AppResult;
use notehub_core::types::{DocumentId, VersionId};
use notehub_entity::codec::timestamp_now;
use notehub_entity::document::{CreateDocument, Document, UpdateDocument};
use notehub_storage::index::EntryKind;
use notehub_storage::layout;
use notehub_storage::repositories::DocumentRepository;
use notehub_storage::resolver::{DocumentHandle, PathResolver};

use crate::document::version::VersionService;
use crate::relocation::Relocator;

/// Manages documents.
#[derive(Debug, Clone)]
pub struct DocumentService {
    /// Path and id resolution.
    resolver: Arc<PathResolver>,
    /// Document artifact IO.
    document_repo: Arc<DocumentRepository>,
    /// Snapshots taken before content overwrites.
    versions: Arc<VersionService>,
    /// Journaled directory relocation.
    relocator: Arc<Relocator>,
}

impl DocumentService {
    /// Creates a new document service.
    pub fn new(
        resolver: Arc<PathResolver>,
        document_repo: Arc<DocumentRepository>,
        versions: Arc<VersionService>,
        relocator: Arc<Relocator>,
    ) -> Self {
        Self {
            resolver,
            document_repo,
            versions,
            relocator,
        }
    }

    async fn locate(&self, id: DocumentId) -> AppResult<DocumentHandle> {
        self.resolver
            .find_document_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Document not found: {id}")))
    }

    /// Reads every document in the store. Entries missing an artifact are
    /// skipped.
    pub async fn get_all(&self) -> AppResult<Vec<Document>> {
        let handles = self.resolver.all_documents().await?;
        let reads = handles.iter().map(|h| self.document_repo.read(&h.dir));
        Ok(join_all(reads).await.into_iter().flatten().collect())
    }

    /// Gets a document by ID.
    pub async fn get_by_id(&self, id: DocumentId) -> AppResult<Option<Document>> {
        match self.resolver.find_document_by_id(id).await? {
            Some(handle) => Ok(self.document_repo.read(&handle.dir).await),
            None => Ok(None),
        }
    }

    /// Gets the documents among `ids` that exist, in request order.
    pub async fn get_by_ids(&self, ids: &[DocumentId]) -> AppResult<Vec<Document>> {
        let found = try_join_all(ids.iter().map(|id| self.get_by_id(*id))).await?;
        Ok(found.into_iter().flatten().collect())
    }

    /// Lists the documents stored directly in the folder at `folder_path`.
    pub async fn list_in_folder(&self, folder_path: &str) -> AppResult<Vec<Document>> {
        let folder = self.resolver.resolve_folder(folder_path).await?;
        let children = self.resolver.children(&folder.dir).await?;
        let reads = children
            .documents
            .iter()
            .map(|h| self.document_repo.read(&h.dir));
        Ok(join_all(reads).await.into_iter().flatten().collect())
    }

    /// Creates a document at version 1.
    pub async fn create(&self, data: CreateDocument) -> AppResult<Document> {
        let title = validate_title(&data.title)?;
        validate_embedding(data.embedding.as_deref())?;
        let folder = self
            .resolver
            .resolve_folder(data.folder_path.as_deref().unwrap_or("/"))
            .await?;

        let now = timestamp_now();
        let doc = Document {
            id: DocumentId::new(),
            title,
            content: data.content,
            tags: data.tags,
            categories: data.categories,
            summary: data.summary,
            related_ids: data.related_ids,
            embedding: data.embedding,
            version: 1,
            created_at: now,
            updated_at: now,
        };

        let dir = self.document_repo.layout().document_dir(&folder.dir, doc.id);
        self.document_repo.write(&dir, &doc).await?;
        self.resolver
            .index()
            .insert(doc.id.into_uuid(), EntryKind::Document, dir);

        info!(
            document_id = %doc.id,
            title = %doc.title,
            folder = %folder.virtual_path(),
            "Document created"
        );

        Ok(doc)
    }

    /// Applies a partial update.
    ///
    /// When the content changes, the previous content and version are
    /// snapshotted before anything is written. The version advances on
    /// every call.
    pub async fn update(&self, id: DocumentId, mut patch: UpdateDocument) -> AppResult<Document> {
        let handle = self.locate(id).await?;
        let mut doc = self
            .document_repo
            .read(&handle.dir)
            .await
            .ok_or_else(|| AppError::not_found(format!("Document not found: {id}")))?;

        if let Some(title) = &patch.title {
            patch.title = Some(validate_title(title)?);
        }
        if let Some(embedding) = &patch.embedding {
            validate_embedding(embedding.as_deref())?;
        }

        let new_content = patch.content.take().filter(|c| *c != doc.content);
        if new_content.is_some() {
            self.versions
                .snapshot_at(&handle, &doc.content, doc.version, VersionId::new())
                .await?;
        }

        patch.merge_attributes(&mut doc);
        let content_changed = match new_content {
            Some(content) => {
                doc.content = content;
                true
            }
            None => false,
        };
        doc.version += 1;
        doc.updated_at = timestamp_now();

        if content_changed {
            self.document_repo.write_content(&handle.dir, &doc.content).await?;
        }
        self.document_repo.write_meta(&handle.dir, &doc).await?;

        info!(
            document_id = %id,
            version = doc.version,
            content_changed,
            "Document updated"
        );

        Ok(doc)
    }

    /// Replaces lines `start_line..=end_line` (1-based) with `replacement`.
    /// An empty replacement deletes the range.
    pub async fn update_line_range(
        &self,
        id: DocumentId,
        start_line: usize,
        end_line: usize,
        replacement: &str,
    ) -> AppResult<Document> {
        let doc = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Document not found: {id}")))?;
        let content = splice_lines(&doc.content, start_line, end_line, replacement)?;
        self.update(id, UpdateDocument::content(content)).await
    }

    /// Moves a document into the folder at `folder_path`.
    pub async fn move_to_folder(&self, id: DocumentId, folder_path: &str) -> AppResult<Document> {
        let handle = self.locate(id).await?;
        let target = self.resolver.resolve_folder(folder_path).await?;
        let doc = self
            .document_repo
            .read(&handle.dir)
            .await
            .ok_or_else(|| AppError::not_found(format!("Document not found: {id}")))?;

        if handle.folder_dir() == target.dir {
            debug!(document_id = %id, "Document already in target folder");
            return Ok(doc);
        }

        let new_dir = self.document_repo.layout().document_dir(&target.dir, id);
        let staged = self
            .relocator
            .stage(id.into_uuid(), EntryKind::Document, &handle.dir, &new_dir)
            .await?;
        self.relocator.commit(staged).await?;

        info!(
            document_id = %id,
            from = %layout::virtual_path(handle.folder_dir()),
            to = %target.virtual_path(),
            "Document moved"
        );

        Ok(doc)
    }

    /// Deletes a document with its version history. Deleting an absent
    /// document succeeds.
    pub async fn delete(&self, id: DocumentId) -> AppResult<()> {
        let Some(handle) = self.resolver.find_document_by_id(id).await? else {
            debug!(document_id = %id, "Document already absent");
            return Ok(());
        };
        self.document_repo.delete(&handle.dir).await?;
        self.resolver.index().remove(id.into_uuid());

        info!(document_id = %id, "Document deleted");
        Ok(())
    }

    /// Deletes several documents. Absent ids are skipped.
    pub async fn batch_delete(&self, ids: &[DocumentId]) -> AppResult<()> {
        for id in ids {
            self.delete(*id).await?;
        }
        Ok(())
    }
}

fn validate_title(title: &str) -> AppResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("Document title cannot be empty"));
    }
    Ok(trimmed.to_string())
}

/// JSON has no encoding for NaN or infinity, so such a sidecar would not
/// read back.
fn validate_embedding(embedding: Option<&[f32]>) -> AppResult<()> {
    match embedding {
        Some(values) if values.iter().any(|v| !v.is_finite()) => Err(AppError::invalid_input(
            "Embedding values must be finite numbers",
        )),
        _ => Ok(()),
    }
}

/// Split text into lines. A trailing newline ends the last line rather than
/// starting an empty one.
fn lines_of(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    text.strip_suffix('\n').unwrap_or(text).split('\n').collect()
}

/// Replace lines `start..=end` (1-based) of `content` with the lines of
/// `replacement`, keeping the content's trailing newline.
fn splice_lines(content: &str, start: usize, end: usize, replacement: &str) -> AppResult<String> {
    let mut lines = lines_of(content);
    let count = lines.len();
    if start < 1 || end < start || end > count {
        return Err(AppError::invalid_input(format!(
            "Line range {start}..={end} is out of bounds for a document of {count} lines"
        )));
    }

    let tail = lines.split_off(end);
    lines.truncate(start - 1);
    lines.extend(lines_of(replacement));
    lines.extend(tail);
    let mut out = lines.join("\n");
    if content.ends_with('\n') && !out.is_empty() {
        out.push('\n');
    }
    Ok(out)
}
