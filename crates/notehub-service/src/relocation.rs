//! Two-phase, journaled relocation of entity directories.
//!
//! A relocation copies the source directory to its destination, lets the
//! caller adjust the copy, then retires the source. The journal marker is
//! `Copying` until the destination is complete and `Copied` afterwards, so
//! recovery can discard a partial destination or finish retiring the
//! source.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use notehub_core::result::AppResult;
use notehub_core::traits::storage::StorageProvider;
use notehub_storage::index::{EntryKind, LocationIndex};
use notehub_storage::journal::{JournalEntry, JournalOperation, JournalPhase, OperationJournal};

/// A relocation whose destination has been written but whose source has
/// not yet been retired.
#[derive(Debug)]
#[must_use = "a staged relocation must be committed"]
pub struct StagedRelocation {
    entry: JournalEntry,
    from: String,
    to: String,
}

impl StagedRelocation {
    /// Source directory.
    pub fn from(&self) -> &str {
        &self.from
    }

    /// Destination directory.
    pub fn to(&self) -> &str {
        &self.to
    }
}

/// Performs and resumes journaled directory relocations.
#[derive(Debug, Clone)]
pub struct Relocator {
    provider: Arc<dyn StorageProvider>,
    journal: Arc<OperationJournal>,
    index: Arc<LocationIndex>,
}

impl Relocator {
    pub fn new(
        provider: Arc<dyn StorageProvider>,
        journal: Arc<OperationJournal>,
        index: Arc<LocationIndex>,
    ) -> Self {
        Self {
            provider,
            journal,
            index,
        }
    }

    /// Phase one: record the operation and copy `from` to `to`.
    pub async fn stage(
        &self,
        entity_id: Uuid,
        kind: EntryKind,
        from: &str,
        to: &str,
    ) -> AppResult<StagedRelocation> {
        let entry = self
            .journal
            .begin(
                JournalOperation::Relocate {
                    entity_id,
                    kind,
                    from: from.to_string(),
                    to: to.to_string(),
                },
                JournalPhase::Copying,
            )
            .await?;

        if let Err(e) = self.provider.copy_dir(from, to).await {
            // The source is still intact.
            self.provider.delete_dir(to).await?;
            self.journal.finish(&entry).await?;
            return Err(e);
        }

        Ok(StagedRelocation {
            entry,
            from: from.to_string(),
            to: to.to_string(),
        })
    }

    /// Phase two: mark the destination complete, retire the source and
    /// repoint the index.
    pub async fn commit(&self, staged: StagedRelocation) -> AppResult<()> {
        let StagedRelocation {
            mut entry,
            from,
            to,
        } = staged;

        self.journal.advance(&mut entry, JournalPhase::Copied).await?;
        self.provider.delete_dir(&from).await?;
        let moved = self.index.relocate_subtree(&from, &to);
        self.journal.finish(&entry).await?;

        debug!(from = %from, to = %to, indexed = moved, "Relocation committed");
        Ok(())
    }

    /// Complete or undo a relocation left behind by an interrupted process.
    ///
    /// Returns `true` when the operation was rolled forward.
    pub async fn resume(&self, entry: &JournalEntry) -> AppResult<bool> {
        let JournalOperation::Relocate { from, to, .. } = &entry.operation else {
            return Ok(false);
        };

        let rolled_forward = match entry.phase {
            JournalPhase::Copied => {
                self.provider.delete_dir(from).await?;
                info!(operation_id = %entry.id, from = %from, to = %to, "Relocation rolled forward");
                true
            }
            _ => {
                self.provider.delete_dir(to).await?;
                info!(operation_id = %entry.id, from = %from, to = %to, "Relocation rolled back");
                false
            }
        };
        self.journal.finish(entry).await?;
        Ok(rolled_forward)
    }
}
