//! Tree structures for hierarchical display.

use serde::{Deserialize, Serialize};

use notehub_core::types::FolderId;

use crate::document::DocumentSummary;
use crate::folder::Folder;

/// One child of a folder: either a subfolder or a document.
///
/// Serialized with an explicit `kind` discriminant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeEntry {
    /// A subfolder.
    Folder(Folder),
    /// A document stored directly in the folder.
    Document(DocumentSummary),
}

impl TreeEntry {
    /// Display label of the entry.
    pub fn label(&self) -> &str {
        match self {
            Self::Folder(folder) => &folder.name,
            Self::Document(doc) => &doc.title,
        }
    }

    /// Whether the entry is a folder.
    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder(_))
    }
}

/// A node in a folder tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderNode {
    /// Folder ID.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Virtual path (`/` for the root).
    pub path: String,
    /// Depth level (0 for the root of the requested tree).
    pub depth: u32,
    /// Number of child folders.
    pub child_count: u64,
    /// Number of documents stored directly in this folder.
    pub document_count: u64,
    /// Child folder nodes.
    pub children: Vec<FolderNode>,
}

impl FolderNode {
    /// Total number of folders in this subtree, including this node.
    pub fn total_folders(&self) -> u64 {
        1 + self.children.iter().map(FolderNode::total_folders).sum::<u64>()
    }

    /// Total number of documents in this subtree.
    pub fn total_documents(&self) -> u64 {
        self.document_count
            + self
                .children
                .iter()
                .map(FolderNode::total_documents)
                .sum::<u64>()
    }
}
