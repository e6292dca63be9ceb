//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use notehub_core::types::FolderId;

/// Display name given to the root folder.
pub const ROOT_FOLDER_NAME: &str = "Root";

/// A folder in the note hierarchy.
///
/// The `id` is stable across rename and move. The physical directory name
/// is `slug`, which is unique among siblings and regenerated from `name`
/// on rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Human-readable folder name.
    pub name: String,
    /// Directory name derived from `name`. Empty for the root.
    pub slug: String,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last renamed or moved.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Build the root folder record.
    pub fn root(now: DateTime<Utc>) -> Self {
        Self {
            id: FolderId::ROOT,
            name: ROOT_FOLDER_NAME.to_string(),
            slug: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if this is the root folder.
    pub fn is_root(&self) -> bool {
        self.id.is_root()
    }
}
