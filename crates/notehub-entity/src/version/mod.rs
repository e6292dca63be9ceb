//! Document version snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use notehub_core::types::{DocumentId, VersionId};

/// An immutable snapshot of a document's content, taken before an
/// overwrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    /// Unique snapshot identifier.
    pub id: VersionId,
    /// The document this snapshot belongs to.
    pub document_id: DocumentId,
    /// Content at snapshot time.
    pub content: String,
    /// The document's version number when the snapshot was taken.
    pub version_number: u64,
    /// When the snapshot was written.
    pub created_at: DateTime<Utc>,
}
