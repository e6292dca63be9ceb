//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use notehub_core::config::AppConfig;
use notehub_entity::document::{CreateDocument, Document};
use notehub_entity::folder::Folder;
use notehub_service::NoteHub;
use notehub_storage::journal::OperationJournal;
use notehub_storage::providers::local::LocalStorageProvider;

/// Test application context
pub struct TestApp {
    /// The opened store
    pub hub: NoteHub,
    /// Configuration the store was opened with
    pub config: AppConfig,
    /// Temporary storage root, removed on drop
    dir: TempDir,
}

impl TestApp {
    /// Open a store over a fresh temporary directory
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Open a store with adjusted configuration
    pub async fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut config = AppConfig::with_root(dir.path().to_string_lossy().to_string());
        adjust(&mut config);

        let hub = NoteHub::open(config.clone())
            .await
            .expect("Failed to open note store");

        Self { hub, config, dir }
    }

    /// Drop the current store and open a new one over the same directory,
    /// as a restarted process would
    pub async fn reopen(&mut self) {
        self.hub = NoteHub::open(self.config.clone())
            .await
            .expect("Failed to reopen note store");
    }

    /// Storage root on disk
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of a storage-relative path
    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Whether a storage-relative path exists on disk
    pub fn exists(&self, relative: &str) -> bool {
        self.path(relative).exists()
    }

    /// Provider over the same root, for staging on-disk state directly
    pub async fn provider(&self) -> Arc<LocalStorageProvider> {
        Arc::new(
            LocalStorageProvider::new(&self.config.storage.root_path)
                .await
                .expect("Failed to open provider"),
        )
    }

    /// Journal over the same root
    pub async fn journal(&self) -> OperationJournal {
        OperationJournal::new(self.provider().await)
    }

    /// Create a folder and return it
    pub async fn create_folder(&self, name: &str, parent: &str) -> Folder {
        self.hub
            .folders
            .create(name, parent)
            .await
            .expect("Failed to create folder")
    }

    /// Create a document in the root folder
    pub async fn create_document(&self, title: &str, content: &str) -> Document {
        self.hub
            .documents
            .create(CreateDocument::new(title, content))
            .await
            .expect("Failed to create document")
    }

    /// Create a document inside the folder at `folder_path`
    pub async fn create_document_in(&self, folder_path: &str, title: &str, content: &str) -> Document {
        self.hub
            .documents
            .create(CreateDocument {
                folder_path: Some(folder_path.to_string()),
                ..CreateDocument::new(title, content)
            })
            .await
            .expect("Failed to create document")
    }

    /// Create a document with tags and categories
    pub async fn create_tagged(&self, title: &str, tags: &[&str], categories: &[&str]) -> Document {
        self.hub
            .documents
            .create(CreateDocument {
                tags: tags.iter().map(|t| t.to_string()).collect(),
                categories: categories.iter().map(|c| c.to_string()).collect(),
                ..CreateDocument::new(title, "")
            })
            .await
            .expect("Failed to create document")
    }
}
