//! Resolution of virtual paths and identifiers to physical directories.
//!
//! Identity lookups consult the [`LocationIndex`] first and verify the hit
//! on disk. On a miss they walk the folder tree depth-first, in listing
//! order, with an explicit stack.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use notehub_core::error::AppError;
use notehub_core::result::AppResult;
use notehub_core::types::{DocumentId, FolderId};
use notehub_entity::folder::Folder;

use crate::index::{EntryKind, Location, LocationIndex};
use crate::layout::{self, Layout};
use crate::repositories::{DocumentRepository, FolderRepository};

/// A folder together with its physical directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderHandle {
    pub folder: Folder,
    pub dir: String,
}

impl FolderHandle {
    /// Virtual path of the folder (`/` for the root).
    pub fn virtual_path(&self) -> String {
        layout::virtual_path(&self.dir)
    }

    /// Directory containing this folder, `None` for the root.
    pub fn parent_dir(&self) -> Option<&str> {
        if self.dir == layout::CONTENT_DIR {
            None
        } else {
            layout::parent(&self.dir)
        }
    }
}

/// A document identity together with its physical directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHandle {
    pub id: DocumentId,
    pub dir: String,
}

impl DocumentHandle {
    /// Directory of the folder containing the document.
    pub fn folder_dir(&self) -> &str {
        layout::parent(&self.dir).unwrap_or(layout::CONTENT_DIR)
    }
}

/// Maps virtual paths and ids to physical directories.
#[derive(Debug, Clone)]
pub struct PathResolver {
    folders: FolderRepository,
    documents: DocumentRepository,
    layout: Layout,
    index: Arc<LocationIndex>,
}

impl PathResolver {
    pub fn new(
        folders: FolderRepository,
        documents: DocumentRepository,
        layout: Layout,
        index: Arc<LocationIndex>,
    ) -> Self {
        Self {
            folders,
            documents,
            layout,
            index,
        }
    }

    pub fn index(&self) -> &LocationIndex {
        &self.index
    }

    /// Resolve a virtual folder path.
    ///
    /// Walks one segment at a time from the root; every directory on the
    /// way must carry a folder sidecar. Fails with `NotFound` when any
    /// segment does not exist or is not a folder, and with `InvalidInput` on
    /// `.` or `..` segments.
    pub async fn resolve_folder(&self, virtual_path: &str) -> AppResult<FolderHandle> {
        let mut dir = layout::CONTENT_DIR.to_string();
        for slug in layout::virtual_segments(virtual_path)? {
            dir = layout::join(&dir, slug);
            if !self.folders.is_folder(&dir).await? {
                return Err(AppError::not_found(format!(
                    "Folder not found: {virtual_path}"
                )));
            }
        }
        self.folder_at(&dir)
            .await
            .ok_or_else(|| AppError::not_found(format!("Folder not found: {virtual_path}")))
    }

    /// The folder stored at physical `dir`, if any.
    pub async fn folder_at(&self, dir: &str) -> Option<FolderHandle> {
        self.folders.read(dir).await.map(|folder| FolderHandle {
            folder,
            dir: dir.to_string(),
        })
    }

    /// The root folder.
    pub async fn root(&self) -> AppResult<FolderHandle> {
        self.folder_at(layout::CONTENT_DIR)
            .await
            .ok_or_else(|| AppError::internal("Root folder sidecar is missing"))
    }

    /// Locate a folder by id anywhere in the tree.
    pub async fn find_folder_by_id(&self, id: FolderId) -> AppResult<Option<FolderHandle>> {
        if id.is_root() {
            return Ok(self.folder_at(layout::CONTENT_DIR).await);
        }

        if let Some(dir) = self.index.get(id.into_uuid(), EntryKind::Folder) {
            if let Some(handle) = self.folder_at(&dir).await {
                if handle.folder.id == id {
                    return Ok(Some(handle));
                }
            }
            debug!(folder_id = %id, dir = %dir, "Stale folder index entry");
            self.index.remove(id.into_uuid());
        }

        let found = self
            .find_folder_from(id, layout::CONTENT_DIR)
            .await?;
        if let Some(handle) = &found {
            self.index
                .insert(id.into_uuid(), EntryKind::Folder, handle.dir.clone());
        }
        Ok(found)
    }

    /// Depth-first search for a folder id beneath `start`.
    pub async fn find_folder_from(
        &self,
        id: FolderId,
        start: &str,
    ) -> AppResult<Option<FolderHandle>> {
        let mut stack = vec![start.to_string()];
        while let Some(dir) = stack.pop() {
            if let Some(handle) = self.folder_at(&dir).await {
                if handle.folder.id == id {
                    return Ok(Some(handle));
                }
            }
            let children = self.folders.subfolder_dirs(&dir).await?;
            stack.extend(children.into_iter().rev());
        }
        Ok(None)
    }

    /// Locate a document by id anywhere in the tree.
    pub async fn find_document_by_id(&self, id: DocumentId) -> AppResult<Option<DocumentHandle>> {
        if let Some(dir) = self.index.get(id.into_uuid(), EntryKind::Document) {
            if self.documents.is_document(&dir).await? {
                return Ok(Some(DocumentHandle { id, dir }));
            }
            debug!(document_id = %id, dir = %dir, "Stale document index entry");
            self.index.remove(id.into_uuid());
        }

        let found = self
            .find_document_from(id, layout::CONTENT_DIR)
            .await?;
        if let Some(handle) = &found {
            self.index
                .insert(id.into_uuid(), EntryKind::Document, handle.dir.clone());
        }
        Ok(found)
    }

    /// Depth-first search for a document id beneath `start`.
    ///
    /// Documents are directories named by id, so each visited folder is
    /// checked directly before its subfolders are pushed.
    pub async fn find_document_from(
        &self,
        id: DocumentId,
        start: &str,
    ) -> AppResult<Option<DocumentHandle>> {
        let mut stack = vec![start.to_string()];
        while let Some(dir) = stack.pop() {
            let candidate = self.layout.document_dir(&dir, id);
            if self.documents.is_document(&candidate).await? {
                return Ok(Some(DocumentHandle { id, dir: candidate }));
            }
            let children = self.folders.subfolder_dirs(&dir).await?;
            stack.extend(children.into_iter().rev());
        }
        Ok(None)
    }

    /// The folder directly containing a document.
    pub async fn parent_of(&self, id: DocumentId) -> AppResult<Option<FolderHandle>> {
        let Some(doc) = self.find_document_by_id(id).await? else {
            return Ok(None);
        };
        Ok(self.folder_at(doc.folder_dir()).await)
    }

    /// Classify the direct children of a folder directory.
    pub async fn children(&self, dir: &str) -> AppResult<Children> {
        let mut children = Children::default();
        for child in self.folders.child_dirs(dir).await? {
            if self.folders.is_folder(&child).await? {
                children.folders.push(child);
            } else if self.documents.is_document(&child).await? {
                let name = layout::file_name(&child);
                match name.parse::<DocumentId>() {
                    Ok(id) => children.documents.push(DocumentHandle { id, dir: child }),
                    Err(_) => debug!(dir = %child, "Skipping document directory without id name"),
                }
            }
        }
        Ok(children)
    }

    /// Every document in the tree, folders visited depth-first.
    pub async fn all_documents(&self) -> AppResult<Vec<DocumentHandle>> {
        let mut documents = Vec::new();
        let mut stack = vec![layout::CONTENT_DIR.to_string()];
        while let Some(dir) = stack.pop() {
            let children = self.children(&dir).await?;
            documents.extend(children.documents);
            stack.extend(children.folders.into_iter().rev());
        }
        Ok(documents)
    }

    /// Walk the whole tree and record every folder and document location.
    pub async fn scan(&self) -> AppResult<Vec<(Uuid, Location)>> {
        let mut found = Vec::new();
        let mut stack = vec![layout::CONTENT_DIR.to_string()];
        while let Some(dir) = stack.pop() {
            if let Some(handle) = self.folder_at(&dir).await {
                found.push((
                    handle.folder.id.into_uuid(),
                    Location {
                        kind: EntryKind::Folder,
                        path: dir.clone(),
                    },
                ));
            }
            let children = self.children(&dir).await?;
            for doc in children.documents {
                found.push((
                    doc.id.into_uuid(),
                    Location {
                        kind: EntryKind::Document,
                        path: doc.dir,
                    },
                ));
            }
            stack.extend(children.folders.into_iter().rev());
        }
        Ok(found)
    }

    /// Rebuild the index from disk. Returns the number of entries.
    pub async fn rebuild_index(&self) -> AppResult<usize> {
        if !self.index.is_enabled() {
            return Ok(0);
        }
        let locations = self.scan().await?;
        let count = locations.len();
        self.index.replace_all(locations);
        Ok(count)
    }
}

/// The classified direct children of a folder directory.
#[derive(Debug, Clone, Default)]
pub struct Children {
    /// Subfolder directories in listing order.
    pub folders: Vec<String>,
    /// Documents in listing order.
    pub documents: Vec<DocumentHandle>,
}
