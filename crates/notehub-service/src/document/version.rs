//! Document versioning service: snapshot, list, and restore.

use std::sync::Arc;

use tracing::{debug, info, warn};

use notehub_core::config::history::VersionOrder;
use notehub_core::error::AppError;
use notehub_core::result::AppResult;
use notehub_core::types::{DocumentId, VersionId};
use notehub_entity::codec::timestamp_now;
use notehub_entity::document::Document;
use notehub_entity::version::Version;
use notehub_storage::journal::{JournalEntry, JournalOperation, JournalPhase, OperationJournal};
use notehub_storage::repositories::{DocumentRepository, VersionRepository};
use notehub_storage::resolver::{DocumentHandle, PathResolver};

/// Manages document version history.
#[derive(Debug, Clone)]
pub struct VersionService {
    /// Path and id resolution.
    resolver: Arc<PathResolver>,
    /// Live document IO.
    document_repo: Arc<DocumentRepository>,
    /// Snapshot IO.
    version_repo: Arc<VersionRepository>,
    /// Restore markers.
    journal: Arc<OperationJournal>,
    /// Order of [`VersionService::list`].
    order: VersionOrder,
}

impl VersionService {
    /// Creates a new version service.
    pub fn new(
        resolver: Arc<PathResolver>,
        document_repo: Arc<DocumentRepository>,
        version_repo: Arc<VersionRepository>,
        journal: Arc<OperationJournal>,
        order: VersionOrder,
    ) -> Self {
        Self {
            resolver,
            document_repo,
            version_repo,
            journal,
            order,
        }
    }

    async fn locate(&self, document_id: DocumentId) -> AppResult<DocumentHandle> {
        self.resolver
            .find_document_by_id(document_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Document not found: {document_id}")))
    }

    /// Records `content` as the state of the document at `version_number`.
    pub async fn snapshot(
        &self,
        document_id: DocumentId,
        content: &str,
        version_number: u64,
    ) -> AppResult<Version> {
        let handle = self.locate(document_id).await?;
        self.snapshot_at(&handle, content, version_number, VersionId::new())
            .await
    }

    pub(crate) async fn snapshot_at(
        &self,
        handle: &DocumentHandle,
        content: &str,
        version_number: u64,
        id: VersionId,
    ) -> AppResult<Version> {
        let version = Version {
            id,
            document_id: handle.id,
            content: content.to_string(),
            version_number,
            created_at: timestamp_now(),
        };
        self.version_repo.write(&handle.dir, &version).await?;

        info!(
            document_id = %handle.id,
            version_id = %version.id,
            version = version_number,
            "Document version created"
        );

        Ok(version)
    }

    /// Lists all snapshots of a document.
    ///
    /// Sorted by version number, ties broken by creation time, in the
    /// configured direction.
    pub async fn list(&self, document_id: DocumentId) -> AppResult<Vec<Version>> {
        let handle = self.locate(document_id).await?;
        let mut versions = self.version_repo.list(&handle.dir).await?;
        versions.sort_by(|a, b| {
            a.version_number
                .cmp(&b.version_number)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        if self.order == VersionOrder::NewestFirst {
            versions.reverse();
        }
        Ok(versions)
    }

    /// Gets one snapshot.
    pub async fn get(&self, document_id: DocumentId, version_id: VersionId) -> AppResult<Version> {
        let handle = self.locate(document_id).await?;
        self.version_repo
            .read(&handle.dir, version_id)
            .await
            .ok_or_else(|| AppError::not_found(format!("Version not found: {version_id}")))
    }

    /// Replaces the live content with a snapshot's content.
    ///
    /// The current content is snapshotted first, so the pre-restore state
    /// stays in history. The document's version moves forward.
    pub async fn restore(
        &self,
        document_id: DocumentId,
        version_id: VersionId,
    ) -> AppResult<Document> {
        let handle = self.locate(document_id).await?;
        let current = self
            .document_repo
            .read(&handle.dir)
            .await
            .ok_or_else(|| AppError::not_found(format!("Document not found: {document_id}")))?;
        let target = self
            .version_repo
            .read(&handle.dir, version_id)
            .await
            .ok_or_else(|| AppError::not_found(format!("Version not found: {version_id}")))?;

        let snapshot_id = VersionId::new();
        let target_version = current.version + 1;
        let mut entry = self
            .journal
            .begin(
                JournalOperation::Restore {
                    document_id,
                    document_dir: handle.dir.clone(),
                    version_id,
                    snapshot_id,
                    target_version,
                },
                JournalPhase::Staged,
            )
            .await?;

        self.snapshot_at(&handle, &current.content, current.version, snapshot_id)
            .await?;
        self.journal
            .advance(&mut entry, JournalPhase::Snapshotted)
            .await?;

        let restored = self
            .overwrite(&handle.dir, current, target.content, target_version)
            .await?;
        self.journal.finish(&entry).await?;

        info!(
            document_id = %document_id,
            version_id = %version_id,
            restored_from = target.version_number,
            version = restored.version,
            "Document version restored"
        );

        Ok(restored)
    }

    /// Finishes or discards a restore left behind by an interrupted
    /// process. Returns `true` when the restore was rolled forward.
    pub async fn resume_restore(&self, entry: &JournalEntry) -> AppResult<bool> {
        let JournalOperation::Restore {
            document_id,
            document_dir,
            version_id,
            snapshot_id,
            target_version,
        } = &entry.operation
        else {
            return Ok(false);
        };

        let snapshot_complete = match entry.phase {
            JournalPhase::Snapshotted => true,
            _ => {
                self.version_repo
                    .is_complete(document_dir, *snapshot_id)
                    .await?
            }
        };

        if !snapshot_complete {
            self.version_repo.delete(document_dir, *snapshot_id).await?;
            self.journal.finish(entry).await?;
            info!(operation_id = %entry.id, document_id = %document_id, "Restore rolled back");
            return Ok(false);
        }

        let current = self.document_repo.read(document_dir).await;
        let target = self.version_repo.read(document_dir, *version_id).await;
        let rolled_forward = match (current, target) {
            (Some(current), Some(target)) => {
                self.overwrite(document_dir, current, target.content, *target_version)
                    .await?;
                info!(operation_id = %entry.id, document_id = %document_id, "Restore rolled forward");
                true
            }
            _ => {
                warn!(
                    operation_id = %entry.id,
                    document_id = %document_id,
                    "Restore target no longer exists, dropping marker"
                );
                false
            }
        };
        self.journal.finish(entry).await?;
        Ok(rolled_forward)
    }

    /// Write `content` as the live content at exactly `version`. Repeating
    /// the call leaves the same state.
    async fn overwrite(
        &self,
        dir: &str,
        mut doc: Document,
        content: String,
        version: u64,
    ) -> AppResult<Document> {
        doc.content = content;
        doc.version = version;
        doc.updated_at = timestamp_now();
        self.document_repo.write(dir, &doc).await?;
        debug!(document_id = %doc.id, version, "Live document overwritten");
        Ok(doc)
    }
}
