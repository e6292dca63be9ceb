//! Composition root: one opened note store with all of its services.

use std::sync::Arc;

use tracing::info;

use notehub_core::config::AppConfig;
use notehub_core::error::AppError;
use notehub_core::result::AppResult;
use notehub_core::traits::storage::StorageProvider;
use notehub_entity::codec::timestamp_now;
use notehub_entity::folder::Folder;
use notehub_storage::index::LocationIndex;
use notehub_storage::journal::OperationJournal;
use notehub_storage::layout::{self, Layout};
use notehub_storage::providers::local::{LocalStorageProvider, RetryPolicy};
use notehub_storage::repositories::{DocumentRepository, FolderRepository, VersionRepository};
use notehub_storage::resolver::PathResolver;
use notehub_storage::slug::SlugAllocator;

use crate::catalog::CatalogService;
use crate::document::{DocumentService, VersionService};
use crate::editor::EditorService;
use crate::folder::{FolderService, TreeService};
use crate::recovery::{RecoveryReport, RecoveryService};
use crate::relocation::Relocator;

/// An opened note store.
///
/// Opening guarantees the root folder exists, finishes or undoes any
/// operation an earlier process left half done, and warms the location
/// index.
#[derive(Debug, Clone)]
pub struct NoteHub {
    pub config: Arc<AppConfig>,
    pub folders: Arc<FolderService>,
    pub tree: Arc<TreeService>,
    pub documents: Arc<DocumentService>,
    pub versions: Arc<VersionService>,
    pub editor: Arc<EditorService>,
    pub catalog: Arc<CatalogService>,
    pub recovery: Arc<RecoveryService>,
    resolver: Arc<PathResolver>,
    recovered: RecoveryReport,
}

impl NoteHub {
    /// Open the store at `config.storage.root_path` on the local filesystem.
    pub async fn open(config: AppConfig) -> AppResult<Self> {
        let provider = LocalStorageProvider::with_retry(
            &config.storage.root_path,
            RetryPolicy::from(&config.storage),
        )
        .await?;
        Self::open_with_provider(config, Arc::new(provider)).await
    }

    /// Open the store over an arbitrary storage provider.
    pub async fn open_with_provider(
        config: AppConfig,
        provider: Arc<dyn StorageProvider>,
    ) -> AppResult<Self> {
        if !provider.health_check().await? {
            return Err(AppError::io_failure(format!(
                "Storage root is not reachable: {}",
                config.storage.root_path
            )));
        }

        let layout = Layout::new(config.storage.content_extension.as_str());
        let index = Arc::new(LocationIndex::new(config.storage.index_enabled));

        let folder_repo = Arc::new(FolderRepository::new(provider.clone()));
        let document_repo = Arc::new(DocumentRepository::new(provider.clone(), layout.clone()));
        let version_repo = Arc::new(VersionRepository::new(provider.clone(), layout.clone()));
        let journal = Arc::new(OperationJournal::new(provider.clone()));
        let slugs = Arc::new(SlugAllocator::new(provider.clone()));

        let resolver = Arc::new(PathResolver::new(
            (*folder_repo).clone(),
            (*document_repo).clone(),
            layout,
            index.clone(),
        ));
        let relocator = Arc::new(Relocator::new(provider.clone(), journal.clone(), index));

        let versions = Arc::new(VersionService::new(
            resolver.clone(),
            document_repo.clone(),
            version_repo,
            journal.clone(),
            config.history.list_order,
        ));
        let documents = Arc::new(DocumentService::new(
            resolver.clone(),
            document_repo.clone(),
            versions.clone(),
            relocator.clone(),
        ));
        let folders = Arc::new(FolderService::new(
            resolver.clone(),
            folder_repo.clone(),
            document_repo,
            slugs,
            relocator.clone(),
        ));
        let tree = Arc::new(TreeService::new(resolver.clone()));
        let editor = Arc::new(EditorService::new(
            documents.clone(),
            versions.clone(),
            config.diff.context_lines,
        ));
        let catalog = Arc::new(CatalogService::new(documents.clone()));
        let recovery = Arc::new(RecoveryService::new(journal, relocator, versions.clone()));

        if !folder_repo.is_folder(layout::CONTENT_DIR).await? {
            folder_repo
                .create(layout::CONTENT_DIR, &Folder::root(timestamp_now()))
                .await?;
            info!("Root folder initialized");
        }

        let recovered = recovery.recover().await?;
        let indexed = resolver.rebuild_index().await?;

        info!(
            root = %config.storage.root_path,
            provider = provider.provider_type(),
            indexed,
            "Note store opened"
        );

        Ok(Self {
            config: Arc::new(config),
            folders,
            tree,
            documents,
            versions,
            editor,
            catalog,
            recovery,
            resolver,
            recovered,
        })
    }

    /// Path and id resolution shared by every service.
    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// What recovery did while opening.
    pub fn recovered(&self) -> RecoveryReport {
        self.recovered
    }
}
