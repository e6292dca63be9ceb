//! Startup recovery of interrupted multi-step operations.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use notehub_core::result::AppResult;
use notehub_storage::journal::{JournalOperation, OperationJournal};

use crate::document::VersionService;
use crate::relocation::Relocator;

/// Outcome of one recovery pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecoveryReport {
    /// Operations completed from their last durable phase.
    pub rolled_forward: usize,
    /// Operations undone.
    pub rolled_back: usize,
}

impl RecoveryReport {
    pub fn total(&self) -> usize {
        self.rolled_forward + self.rolled_back
    }
}

/// Replays the operation journal.
#[derive(Debug, Clone)]
pub struct RecoveryService {
    journal: Arc<OperationJournal>,
    relocator: Arc<Relocator>,
    versions: Arc<VersionService>,
}

impl RecoveryService {
    /// Creates a new recovery service.
    pub fn new(
        journal: Arc<OperationJournal>,
        relocator: Arc<Relocator>,
        versions: Arc<VersionService>,
    ) -> Self {
        Self {
            journal,
            relocator,
            versions,
        }
    }

    /// Resolve every pending journal entry, oldest first.
    pub async fn recover(&self) -> AppResult<RecoveryReport> {
        let mut report = RecoveryReport::default();
        for entry in self.journal.pending().await? {
            let rolled_forward = match entry.operation {
                JournalOperation::Relocate { .. } => self.relocator.resume(&entry).await?,
                JournalOperation::Restore { .. } => self.versions.resume_restore(&entry).await?,
            };
            if rolled_forward {
                report.rolled_forward += 1;
            } else {
                report.rolled_back += 1;
            }
        }

        if report.total() > 0 {
            info!(
                rolled_forward = report.rolled_forward,
                rolled_back = report.rolled_back,
                "Recovered interrupted operations"
            );
        }
        Ok(report)
    }
}
