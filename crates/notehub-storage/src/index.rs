//! In-memory id → physical location index.
//!
//! The index is only an accelerator. Every hit is verified against the
//! disk by the resolver, which falls back to a tree walk on a miss or a
//! stale entry, so a disabled or outdated index never changes results.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::layout;

/// What kind of entity a location belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Folder,
    Document,
}

/// A cached physical location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub kind: EntryKind,
    pub path: String,
}

/// Concurrent map from entity id to its directory.
#[derive(Debug)]
pub struct LocationIndex {
    entries: DashMap<Uuid, Location>,
    enabled: bool,
}

impl LocationIndex {
    pub fn new(enabled: bool) -> Self {
        Self {
            entries: DashMap::new(),
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn get(&self, id: Uuid, kind: EntryKind) -> Option<String> {
        if !self.enabled {
            return None;
        }
        self.entries
            .get(&id)
            .filter(|loc| loc.kind == kind)
            .map(|loc| loc.path.clone())
    }

    pub fn insert(&self, id: Uuid, kind: EntryKind, path: impl Into<String>) {
        if self.enabled {
            self.entries.insert(
                id,
                Location {
                    kind,
                    path: path.into(),
                },
            );
        }
    }

    pub fn remove(&self, id: Uuid) {
        self.entries.remove(&id);
    }

    /// Drop every entry at or beneath `path`. Returns how many were removed.
    pub fn remove_subtree(&self, path: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, loc| !layout::is_within(&loc.path, path));
        before - self.entries.len()
    }

    /// Rewrite every entry at or beneath `from` to live beneath `to`.
    /// Returns how many were rewritten.
    pub fn relocate_subtree(&self, from: &str, to: &str) -> usize {
        let mut moved = 0;
        for mut entry in self.entries.iter_mut() {
            if let Some(path) = layout::rebase(&entry.path, from, to) {
                entry.path = path;
                moved += 1;
            }
        }
        moved
    }

    /// Replace the whole index.
    pub fn replace_all(&self, locations: impl IntoIterator<Item = (Uuid, Location)>) {
        self.entries.clear();
        if self.enabled {
            for (id, loc) in locations {
                self.entries.insert(id, loc);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for LocationIndex {
    fn default() -> Self {
        Self::new(true)
    }
}
