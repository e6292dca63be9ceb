//! Folder CRUD operations over the slug-named directory hierarchy.

use std::sync::Arc;

use tracing::{debug, info};

use notehub_core::error::AppError;
use notehub_core::result::AppResult;
use notehub_core::types::FolderId;
use notehub_entity::codec::timestamp_now;
use notehub_entity::folder::{Folder, TreeEntry};
use notehub_storage::index::EntryKind;
use notehub_storage::layout;
use notehub_storage::repositories::{DocumentRepository, FolderRepository};
use notehub_storage::resolver::{FolderHandle, PathResolver};
use notehub_storage::slug::SlugAllocator;

use crate::relocation::Relocator;

/// Longest accepted folder name, in characters.
const MAX_NAME_LEN: usize = 255;

/// Manages folder CRUD operations.
#[derive(Debug, Clone)]
pub struct FolderService {
    /// Path and id resolution.
    resolver: Arc<PathResolver>,
    /// Folder sidecar IO.
    folder_repo: Arc<FolderRepository>,
    /// Document artifact IO, for browse listings.
    document_repo: Arc<DocumentRepository>,
    /// Sibling-unique slug allocation.
    slugs: Arc<SlugAllocator>,
    /// Journaled directory relocation.
    relocator: Arc<Relocator>,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(
        resolver: Arc<PathResolver>,
        folder_repo: Arc<FolderRepository>,
        document_repo: Arc<DocumentRepository>,
        slugs: Arc<SlugAllocator>,
        relocator: Arc<Relocator>,
    ) -> Self {
        Self {
            resolver,
            folder_repo,
            document_repo,
            slugs,
            relocator,
        }
    }

    /// Gets a folder by ID.
    pub async fn get(&self, id: FolderId) -> AppResult<Folder> {
        Ok(self.locate(id).await?.folder)
    }

    /// Resolves a folder by ID to its handle.
    pub async fn locate(&self, id: FolderId) -> AppResult<FolderHandle> {
        self.resolver
            .find_folder_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder not found: {id}")))
    }

    /// Lists the direct subfolders of the folder at `parent_path`.
    pub async fn get_children(&self, parent_path: &str) -> AppResult<Vec<Folder>> {
        let parent = self.resolver.resolve_folder(parent_path).await?;
        let mut children = Vec::new();
        for dir in self.folder_repo.subfolder_dirs(&parent.dir).await? {
            if let Some(folder) = self.folder_repo.read(&dir).await {
                children.push(folder);
            }
        }
        Ok(children)
    }

    /// Lists everything directly inside the folder at `path`: subfolders
    /// first, then documents.
    pub async fn list_entries(&self, path: &str) -> AppResult<Vec<TreeEntry>> {
        let parent = self.resolver.resolve_folder(path).await?;
        let children = self.resolver.children(&parent.dir).await?;

        let mut entries = Vec::with_capacity(children.folders.len() + children.documents.len());
        for dir in &children.folders {
            if let Some(folder) = self.folder_repo.read(dir).await {
                entries.push(TreeEntry::Folder(folder));
            }
        }
        for doc in &children.documents {
            if let Some(document) = self.document_repo.read(&doc.dir).await {
                entries.push(TreeEntry::Document(document.summarize()));
            }
        }
        Ok(entries)
    }

    /// Creates a new folder under the folder at `parent_path`.
    pub async fn create(&self, name: &str, parent_path: &str) -> AppResult<Folder> {
        let name = validate_name(name)?;
        let parent = self.resolver.resolve_folder(parent_path).await?;

        let slug = self
            .slugs
            .allocate(&parent.dir, &SlugAllocator::generate(&name), None)
            .await?;
        let dir = layout::join(&parent.dir, &slug);

        let now = timestamp_now();
        let folder = Folder {
            id: FolderId::new(),
            name,
            slug,
            created_at: now,
            updated_at: now,
        };
        self.folder_repo.create(&dir, &folder).await?;
        self.resolver
            .index()
            .insert(folder.id.into_uuid(), EntryKind::Folder, dir.clone());

        info!(
            folder_id = %folder.id,
            path = %layout::virtual_path(&dir),
            "Folder created"
        );

        Ok(folder)
    }

    /// Renames a folder, relocating its directory when the slug changes.
    pub async fn rename(&self, id: FolderId, new_name: &str) -> AppResult<Folder> {
        if id.is_root() {
            return Err(AppError::forbidden("The root folder cannot be renamed"));
        }
        let name = validate_name(new_name)?;
        let handle = self.locate(id).await?;
        let parent_dir = parent_dir_of(&handle)?;

        let slug = self
            .slugs
            .allocate(parent_dir, &SlugAllocator::generate(&name), Some(&handle.dir))
            .await?;

        let mut folder = handle.folder.clone();
        folder.name = name;
        folder.updated_at = timestamp_now();

        if slug == folder.slug {
            self.folder_repo.write(&handle.dir, &folder).await?;
            info!(folder_id = %id, name = %folder.name, "Folder renamed in place");
            return Ok(folder);
        }

        folder.slug = slug;
        let new_dir = layout::join(parent_dir, &folder.slug);
        let staged = self
            .relocator
            .stage(id.into_uuid(), EntryKind::Folder, &handle.dir, &new_dir)
            .await?;
        self.folder_repo.write(&new_dir, &folder).await?;
        self.relocator.commit(staged).await?;

        info!(
            folder_id = %id,
            name = %folder.name,
            from = %handle.virtual_path(),
            to = %layout::virtual_path(&new_dir),
            "Folder renamed"
        );

        Ok(folder)
    }

    /// Moves a folder, with its whole subtree, under the folder at
    /// `target_parent_path`.
    pub async fn move_folder(&self, id: FolderId, target_parent_path: &str) -> AppResult<Folder> {
        if id.is_root() {
            return Err(AppError::forbidden("The root folder cannot be moved"));
        }
        let handle = self.locate(id).await?;
        let target = self.resolver.resolve_folder(target_parent_path).await?;

        let source_path = handle.virtual_path();
        let target_path = target.virtual_path();
        if layout::is_within(&target_path, &source_path) {
            return Err(AppError::invalid_input(format!(
                "Cannot move '{source_path}' into itself or one of its descendants ('{target_path}')"
            )));
        }

        if parent_dir_of(&handle)? == target.dir {
            debug!(folder_id = %id, "Folder already in target parent");
            return Ok(handle.folder);
        }

        let slug = self
            .slugs
            .allocate(&target.dir, &handle.folder.slug, None)
            .await?;
        let new_dir = layout::join(&target.dir, &slug);

        let mut folder = handle.folder.clone();
        folder.slug = slug;
        folder.updated_at = timestamp_now();

        let staged = self
            .relocator
            .stage(id.into_uuid(), EntryKind::Folder, &handle.dir, &new_dir)
            .await?;
        self.folder_repo.write(&new_dir, &folder).await?;
        self.relocator.commit(staged).await?;

        info!(
            folder_id = %id,
            from = %source_path,
            to = %layout::virtual_path(&new_dir),
            "Folder moved"
        );

        Ok(folder)
    }

    /// Deletes a folder and everything beneath it. Deleting an absent
    /// folder succeeds.
    pub async fn delete(&self, id: FolderId) -> AppResult<()> {
        if id.is_root() {
            return Err(AppError::forbidden("The root folder cannot be deleted"));
        }
        let Some(handle) = self.resolver.find_folder_by_id(id).await? else {
            debug!(folder_id = %id, "Folder already absent");
            return Ok(());
        };

        self.folder_repo.delete(&handle.dir).await?;
        let dropped = self.resolver.index().remove_subtree(&handle.dir);

        info!(
            folder_id = %id,
            path = %handle.virtual_path(),
            indexed = dropped,
            "Folder deleted"
        );

        Ok(())
    }
}

fn parent_dir_of(handle: &FolderHandle) -> AppResult<&str> {
    handle
        .parent_dir()
        .ok_or_else(|| AppError::internal(format!("Folder has no parent: {}", handle.dir)))
}

/// Trim and check a folder display name.
fn validate_name(name: &str) -> AppResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("Folder name cannot be empty"));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(AppError::invalid_input(format!(
            "Folder name exceeds {MAX_NAME_LEN} characters"
        )));
    }
    if let Some(bad) = trimmed
        .chars()
        .find(|c| *c == '/' || *c == '\\' || c.is_control())
    {
        return Err(AppError::invalid_input(format!(
            "Folder name contains a disallowed character: {bad:?}"
        )));
    }
    Ok(trimmed.to_string())
}
