//! Operation journal for resumable multi-step operations.
//!
//! Relocations (rename, move) and version restores touch several artifacts
//! and cannot be made atomic on a plain filesystem. Each one writes a
//! marker under `.journal/` before its first step and advances the marker's
//! phase as it goes; the marker is removed when the operation completes.
//! Markers left behind by an interrupted process tell recovery whether to
//! roll the operation back or forward.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use notehub_core::result::AppResult;
use notehub_core::traits::storage::StorageProvider;
use notehub_core::types::{DocumentId, OperationId, VersionId};
use notehub_entity::codec::{format_timestamp, timestamp_now};

use crate::index::EntryKind;
use crate::layout;
use crate::sidecar;

/// What a journaled operation does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JournalOperation {
    /// Copy an entity directory to a new location, then retire the source.
    Relocate {
        entity_id: Uuid,
        kind: EntryKind,
        from: String,
        to: String,
    },
    /// Snapshot the live document, then overwrite it with an older version.
    Restore {
        document_id: DocumentId,
        document_dir: String,
        version_id: VersionId,
        snapshot_id: VersionId,
        target_version: u64,
    },
}

/// How far a journaled operation got.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalPhase {
    /// Relocation: the destination may be partially written.
    Copying,
    /// Relocation: the destination is complete, the source may remain.
    Copied,
    /// Restore: the pre-restore snapshot may be partially written.
    Staged,
    /// Restore: the snapshot is complete, the live document may be stale.
    Snapshotted,
}

/// One pending operation marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: OperationId,
    pub operation: JournalOperation,
    pub phase: JournalPhase,
    pub started_at: String,
}

/// Writes, advances and clears operation markers.
#[derive(Debug, Clone)]
pub struct OperationJournal {
    provider: Arc<dyn StorageProvider>,
}

impl OperationJournal {
    pub fn new(provider: Arc<dyn StorageProvider>) -> Self {
        Self { provider }
    }

    /// Record the start of an operation.
    pub async fn begin(
        &self,
        operation: JournalOperation,
        phase: JournalPhase,
    ) -> AppResult<JournalEntry> {
        let entry = JournalEntry {
            id: OperationId::new(),
            operation,
            phase,
            started_at: format_timestamp(&timestamp_now()),
        };
        self.persist(&entry).await?;
        debug!(operation_id = %entry.id, phase = ?entry.phase, "Journal entry opened");
        Ok(entry)
    }

    /// Move an entry to its next phase.
    pub async fn advance(&self, entry: &mut JournalEntry, phase: JournalPhase) -> AppResult<()> {
        entry.phase = phase;
        self.persist(entry).await?;
        debug!(operation_id = %entry.id, phase = ?phase, "Journal entry advanced");
        Ok(())
    }

    /// Remove a completed entry.
    pub async fn finish(&self, entry: &JournalEntry) -> AppResult<()> {
        self.provider
            .delete(&layout::journal_entry(&entry.id.to_string()))
            .await?;
        debug!(operation_id = %entry.id, "Journal entry closed");
        Ok(())
    }

    /// Every entry left on disk, oldest first.
    pub async fn pending(&self) -> AppResult<Vec<JournalEntry>> {
        let mut entries = Vec::new();
        for file in self.provider.list(layout::JOURNAL_DIR).await? {
            if file.is_directory || !file.name.ends_with(".json") {
                continue;
            }
            match sidecar::read_json::<JournalEntry>(self.provider.as_ref(), &file.path).await {
                Some(entry) => entries.push(entry),
                None => {
                    warn!(path = %file.path, "Discarding unreadable journal entry");
                    self.provider.delete(&file.path).await?;
                }
            }
        }
        entries.sort_by(|a, b| a.started_at.cmp(&b.started_at));
        Ok(entries)
    }

    async fn persist(&self, entry: &JournalEntry) -> AppResult<()> {
        sidecar::write_json(
            self.provider.as_ref(),
            &layout::journal_entry(&entry.id.to_string()),
            entry,
        )
        .await
    }
}
