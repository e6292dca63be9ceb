//! Integration tests for folder operations.

mod helpers;

use std::sync::Arc;

use notehub_core::config::AppConfig;
use notehub_core::error::ErrorKind;
use notehub_core::traits::storage::StorageProvider;
use notehub_core::types::FolderId;
use notehub_entity::folder::TreeEntry;
use notehub_service::NoteHub;
use notehub_storage::index::EntryKind;
use notehub_storage::journal::{JournalOperation, JournalPhase};
use notehub_storage::providers::local::LocalStorageProvider;

#[tokio::test]
async fn test_root_folder_initialized() {
    let app = helpers::TestApp::new().await;

    let root = app.hub.resolver().resolve_folder("/").await.unwrap();

    assert_eq!(root.folder.id, FolderId::ROOT);
    assert_eq!(root.dir, "content");
    assert!(app.exists("content/.folder-meta"));
}

#[tokio::test]
async fn test_resolve_unknown_path_not_found() {
    let app = helpers::TestApp::new().await;

    let err = app
        .hub
        .resolver()
        .resolve_folder("/does/not/exist")
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_resolve_rejects_dot_segments() {
    let app = helpers::TestApp::new().await;

    let err = app.hub.resolver().resolve_folder("/a/../b").await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_sibling_names_get_suffixed_slugs() {
    let app = helpers::TestApp::new().await;

    let first = app.create_folder("My Folder", "/").await;
    let second = app.create_folder("My Folder", "/").await;

    assert_eq!(first.slug, "my-folder");
    assert_eq!(second.slug, "my-folder-1");
    assert_eq!(second.name, "My Folder");
    assert!(app.exists("content/my-folder/.folder-meta"));
    assert!(app.exists("content/my-folder-1/.folder-meta"));

    let children = app.hub.folders.get_children("/").await.unwrap();
    let ids: Vec<_> = children.iter().map(|f| f.id).collect();
    assert_eq!(ids, [first.id, second.id]);
}

#[tokio::test]
async fn test_nested_folders_resolve_by_virtual_path() {
    let app = helpers::TestApp::new().await;
    app.create_folder("Projects", "/").await;
    let inner = app.create_folder("Rust Notes", "/projects").await;

    let handle = app
        .hub
        .resolver()
        .resolve_folder("/projects/rust-notes")
        .await
        .unwrap();

    assert_eq!(handle.folder.id, inner.id);
    assert_eq!(handle.virtual_path(), "/projects/rust-notes");
    assert_eq!(app.hub.folders.get(inner.id).await.unwrap().name, "Rust Notes");
}

#[tokio::test]
async fn test_create_rejects_invalid_names() {
    let app = helpers::TestApp::new().await;

    for bad in ["", "   ", "a/b", "back\\slash"] {
        let err = app.hub.folders.create(bad, "/").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidInput, "{bad:?}");
    }
}

#[tokio::test]
async fn test_create_under_missing_parent_fails() {
    let app = helpers::TestApp::new().await;

    let err = app.hub.folders.create("x", "/nowhere").await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_root_folder_is_protected() {
    let app = helpers::TestApp::new().await;
    app.create_folder("Target", "/").await;

    let rename = app.hub.folders.rename(FolderId::ROOT, "x").await.unwrap_err();
    let moved = app
        .hub
        .folders
        .move_folder(FolderId::ROOT, "/target")
        .await
        .unwrap_err();
    let delete = app.hub.folders.delete(FolderId::ROOT).await.unwrap_err();

    assert_eq!(rename.kind, ErrorKind::Forbidden);
    assert_eq!(moved.kind, ErrorKind::Forbidden);
    assert_eq!(delete.kind, ErrorKind::Forbidden);
    assert!(app.exists("content/.folder-meta"));
}

#[tokio::test]
async fn test_rename_relocates_subtree() {
    let app = helpers::TestApp::new().await;
    let drafts = app.create_folder("Drafts", "/").await;
    app.create_folder("Old", "/drafts").await;
    let doc = app.create_document_in("/drafts/old", "Plan", "step one\n").await;

    let renamed = app.hub.folders.rename(drafts.id, "Final Cut").await.unwrap();

    assert_eq!(renamed.slug, "final-cut");
    assert_eq!(renamed.id, drafts.id);
    assert!(!app.exists("content/drafts"));
    assert!(app.exists("content/final-cut/old/.folder-meta"));
    assert!(app.exists(&format!("content/final-cut/old/{}/meta.json", doc.id)));

    let fetched = app.hub.documents.get_by_id(doc.id).await.unwrap().unwrap();
    assert_eq!(fetched.content, "step one\n");
    let parent = app.hub.resolver().parent_of(doc.id).await.unwrap().unwrap();
    assert_eq!(parent.virtual_path(), "/final-cut/old");
}

#[tokio::test]
async fn test_rename_with_same_slug_stays_in_place() {
    let app = helpers::TestApp::new().await;
    let folder = app.create_folder("Inbox", "/").await;

    let renamed = app.hub.folders.rename(folder.id, "INBOX").await.unwrap();

    assert_eq!(renamed.slug, "inbox");
    assert_eq!(renamed.name, "INBOX");
    assert_eq!(app.hub.folders.get(folder.id).await.unwrap().name, "INBOX");
}

#[tokio::test]
async fn test_rename_onto_sibling_name_gets_suffix() {
    let app = helpers::TestApp::new().await;
    app.create_folder("Alpha", "/").await;
    let beta = app.create_folder("Beta", "/").await;

    let renamed = app.hub.folders.rename(beta.id, "alpha").await.unwrap();

    assert_eq!(renamed.slug, "alpha-1");
    assert!(app.exists("content/alpha/.folder-meta"));
    assert!(app.exists("content/alpha-1/.folder-meta"));
}

#[tokio::test]
async fn test_move_folder_carries_documents() {
    let app = helpers::TestApp::new().await;
    app.create_folder("Archive", "/").await;
    let notes = app.create_folder("Notes", "/").await;
    let doc = app.create_document_in("/notes", "Todo", "milk\n").await;

    let moved = app.hub.folders.move_folder(notes.id, "/archive").await.unwrap();

    assert_eq!(moved.slug, "notes");
    assert!(!app.exists("content/notes"));
    let handle = app
        .hub
        .resolver()
        .resolve_folder("/archive/notes")
        .await
        .unwrap();
    assert_eq!(handle.folder.id, notes.id);
    let parent = app.hub.resolver().parent_of(doc.id).await.unwrap().unwrap();
    assert_eq!(parent.folder.id, notes.id);
}

#[tokio::test]
async fn test_move_folder_resolves_slug_collision() {
    let app = helpers::TestApp::new().await;
    app.create_folder("Box", "/").await;
    app.create_folder("Notes", "/box").await;
    let notes = app.create_folder("Notes", "/").await;

    let moved = app.hub.folders.move_folder(notes.id, "/box").await.unwrap();

    assert_eq!(moved.slug, "notes-1");
    assert!(app.exists("content/box/notes/.folder-meta"));
    assert!(app.exists("content/box/notes-1/.folder-meta"));
}

#[tokio::test]
async fn test_move_into_self_or_descendant_fails() {
    let app = helpers::TestApp::new().await;
    let a = app.create_folder("A", "/").await;
    app.create_folder("B", "/a").await;
    app.create_folder("C", "/a/b").await;

    for target in ["/a", "/a/b", "/a/b/c"] {
        let err = app.hub.folders.move_folder(a.id, target).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidInput, "{target}");
    }

    let tree = app.hub.tree.tree("/").await.unwrap();
    assert_eq!(tree.total_folders(), 4);
    assert!(app.exists("content/a/b/c/.folder-meta"));
    assert!(app.hub.folders.get(a.id).await.is_ok());
}

#[tokio::test]
async fn test_move_into_current_parent_is_noop() {
    let app = helpers::TestApp::new().await;
    let folder = app.create_folder("Stay", "/").await;

    let moved = app.hub.folders.move_folder(folder.id, "/").await.unwrap();

    assert_eq!(moved.slug, "stay");
    assert!(app.exists("content/stay/.folder-meta"));
}

#[tokio::test]
async fn test_delete_folder_is_idempotent() {
    let app = helpers::TestApp::new().await;
    let folder = app.create_folder("Trash", "/").await;
    let doc = app.create_document_in("/trash", "Gone", "bye").await;

    app.hub.folders.delete(folder.id).await.unwrap();
    app.hub.folders.delete(folder.id).await.unwrap();

    assert!(!app.exists("content/trash"));
    assert!(app.hub.documents.get_by_id(doc.id).await.unwrap().is_none());
    let err = app.hub.folders.get(folder.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_list_entries_puts_folders_first() {
    let app = helpers::TestApp::new().await;
    app.create_document("Readme", "hello").await;
    app.create_folder("Zeta", "/").await;
    app.create_folder("Alpha", "/").await;

    let entries = app.hub.folders.list_entries("/").await.unwrap();

    assert_eq!(entries.len(), 3);
    assert!(entries[0].is_folder());
    assert!(entries[1].is_folder());
    assert!(matches!(&entries[2], TreeEntry::Document(d) if d.title == "Readme"));

    let children = app.hub.folders.get_children("/").await.unwrap();
    assert_eq!(children.len(), 2);
}

#[tokio::test]
async fn test_tree_and_breadcrumbs() {
    let app = helpers::TestApp::new().await;
    app.create_folder("Work", "/").await;
    let reports = app.create_folder("Reports", "/work").await;
    app.create_folder("Home", "/").await;
    app.create_document_in("/work/reports", "Q1", "").await;
    app.create_document_in("/work/reports", "Q2", "").await;
    app.create_document("Loose", "").await;

    let tree = app.hub.tree.tree("/").await.unwrap();
    assert_eq!(tree.total_folders(), 4);
    assert_eq!(tree.total_documents(), 3);
    assert_eq!(tree.document_count, 1);
    assert_eq!(tree.child_count, 2);

    let subtree = app.hub.tree.tree("/work").await.unwrap();
    assert_eq!(subtree.children[0].path, "/work/reports");
    assert_eq!(subtree.children[0].depth, 1);
    assert_eq!(subtree.children[0].document_count, 2);

    let trail = app.hub.tree.breadcrumbs(reports.id).await.unwrap();
    let names: Vec<&str> = trail.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["Root", "Work", "Reports"]);
}

#[tokio::test]
async fn test_lookup_without_location_index() {
    let app = helpers::TestApp::with_config(|c| c.storage.index_enabled = false).await;
    app.create_folder("Deep", "/").await;
    let inner = app.create_folder("Deeper", "/deep").await;
    let doc = app.create_document_in("/deep/deeper", "Found", "x").await;

    assert!(app.hub.resolver().index().is_empty());
    let handle = app
        .hub
        .resolver()
        .find_folder_by_id(inner.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(handle.dir, "content/deep/deeper");
    assert!(app.hub.documents.get_by_id(doc.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_index_survives_reopen() {
    let mut app = helpers::TestApp::new().await;
    let folder = app.create_folder("Kept", "/").await;
    let doc = app.create_document_in("/kept", "Note", "body").await;

    app.reopen().await;

    assert!(app.hub.resolver().index().len() >= 2);
    assert_eq!(app.hub.folders.get(folder.id).await.unwrap().name, "Kept");
    assert!(app.hub.documents.get_by_id(doc.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_recovery_rolls_back_partial_copy() {
    let mut app = helpers::TestApp::new().await;
    let folder = app.create_folder("Source", "/").await;
    app.create_document_in("/source", "Doc", "data").await;

    let provider = app.provider().await;
    provider.copy_dir("content/source", "content/target").await.unwrap();
    app.journal()
        .await
        .begin(
            JournalOperation::Relocate {
                entity_id: folder.id.into_uuid(),
                kind: EntryKind::Folder,
                from: "content/source".into(),
                to: "content/target".into(),
            },
            JournalPhase::Copying,
        )
        .await
        .unwrap();

    app.reopen().await;

    assert_eq!(app.hub.recovered().rolled_back, 1);
    assert_eq!(app.hub.recovered().rolled_forward, 0);
    assert!(!app.exists("content/target"));
    assert!(app.exists("content/source/.folder-meta"));
    assert!(app.journal().await.pending().await.unwrap().is_empty());
    let handle = app.hub.folders.locate(folder.id).await.unwrap();
    assert_eq!(handle.dir, "content/source");
}

#[tokio::test]
async fn test_recovery_rolls_forward_completed_copy() {
    let mut app = helpers::TestApp::new().await;
    let folder = app.create_folder("Source", "/").await;
    let doc = app.create_document_in("/source", "Doc", "data").await;

    let provider = app.provider().await;
    provider.copy_dir("content/source", "content/target").await.unwrap();
    app.journal()
        .await
        .begin(
            JournalOperation::Relocate {
                entity_id: folder.id.into_uuid(),
                kind: EntryKind::Folder,
                from: "content/source".into(),
                to: "content/target".into(),
            },
            JournalPhase::Copied,
        )
        .await
        .unwrap();

    app.reopen().await;

    assert_eq!(app.hub.recovered().rolled_forward, 1);
    assert!(!app.exists("content/source"));
    assert!(app.exists("content/target/.folder-meta"));
    let handle = app.hub.folders.locate(folder.id).await.unwrap();
    assert_eq!(handle.dir, "content/target");
    let fetched = app.hub.documents.get_by_id(doc.id).await.unwrap().unwrap();
    assert_eq!(fetched.content, "data");
}

#[tokio::test]
async fn test_open_fails_when_storage_root_is_gone() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("store");
    let root_path = root.to_string_lossy().to_string();
    let provider = LocalStorageProvider::new(&root_path).await.unwrap();
    assert!(provider.health_check().await.unwrap());
    std::fs::remove_dir_all(&root).unwrap();

    let err = NoteHub::open_with_provider(AppConfig::with_root(root_path), Arc::new(provider))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::IoFailure);
}
