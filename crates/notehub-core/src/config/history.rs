//! Version history configuration.

use serde::{Deserialize, Serialize};

/// Ordering applied to version listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionOrder {
    /// Ascending by version number, then creation time.
    #[default]
    OldestFirst,
    /// Descending by version number, then creation time.
    NewestFirst,
}

/// Version history settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Order in which snapshots are listed.
    #[serde(default)]
    pub list_order: VersionOrder,
}
