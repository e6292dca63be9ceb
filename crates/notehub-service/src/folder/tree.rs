//! Folder tree building and breadcrumb resolution.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

use notehub_core::error::AppError;
use notehub_core::result::AppResult;
use notehub_core::types::FolderId;
use notehub_entity::folder::{Folder, FolderNode};
use notehub_storage::layout;
use notehub_storage::resolver::{FolderHandle, PathResolver};

/// Builds folder trees and breadcrumb trails.
#[derive(Debug, Clone)]
pub struct TreeService {
    /// Path and id resolution.
    resolver: Arc<PathResolver>,
}

impl TreeService {
    /// Creates a new tree service.
    pub fn new(resolver: Arc<PathResolver>) -> Self {
        Self { resolver }
    }

    /// Builds the folder tree rooted at the folder at `path`.
    pub async fn tree(&self, path: &str) -> AppResult<FolderNode> {
        let root = self.resolver.resolve_folder(path).await?;
        self.build(root, 0).await
    }

    fn build(&self, handle: FolderHandle, depth: u32) -> BoxFuture<'_, AppResult<FolderNode>> {
        async move {
            let children = self.resolver.children(&handle.dir).await?;

            let mut nodes = Vec::with_capacity(children.folders.len());
            for dir in &children.folders {
                if let Some(child) = self.resolver.folder_at(dir).await {
                    nodes.push(self.build(child, depth + 1).await?);
                }
            }

            Ok(FolderNode {
                id: handle.folder.id,
                path: handle.virtual_path(),
                name: handle.folder.name,
                depth,
                child_count: nodes.len() as u64,
                document_count: children.documents.len() as u64,
                children: nodes,
            })
        }
        .boxed()
    }

    /// Gets the chain of folders from the root down to the given folder,
    /// both included.
    pub async fn breadcrumbs(&self, id: FolderId) -> AppResult<Vec<Folder>> {
        let handle = self
            .resolver
            .find_folder_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder not found: {id}")))?;

        let mut dir = layout::CONTENT_DIR.to_string();
        let mut trail = Vec::new();
        if let Some(root) = self.resolver.folder_at(&dir).await {
            trail.push(root.folder);
        }
        let path = handle.virtual_path();
        for slug in layout::virtual_segments(&path)? {
            dir = layout::join(&dir, slug);
            if let Some(step) = self.resolver.folder_at(&dir).await {
                trail.push(step.folder);
            }
        }
        Ok(trail)
    }
}
