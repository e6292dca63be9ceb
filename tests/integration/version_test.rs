//! Integration tests for version history.

mod helpers;

use notehub_core::config::history::VersionOrder;
use notehub_core::error::ErrorKind;
use notehub_core::types::VersionId;
use notehub_entity::document::UpdateDocument;
use notehub_storage::journal::{JournalOperation, JournalPhase};

async fn update(app: &helpers::TestApp, id: notehub_core::types::DocumentId, content: &str) {
    app.hub
        .documents
        .update(id, UpdateDocument::content(content))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_snapshot_is_listed_and_readable() {
    let app = helpers::TestApp::new().await;
    let doc = app.create_document("Doc", "live").await;

    let snap = app.hub.versions.snapshot(doc.id, "frozen", 7).await.unwrap();

    assert_eq!(snap.document_id, doc.id);
    assert!(app.exists(&format!(
        "content/{}/versions/{}/version_meta.json",
        doc.id, snap.id
    )));
    assert!(app.exists(&format!(
        "content/{}/versions/{}/version_content.md",
        doc.id, snap.id
    )));

    let fetched = app.hub.versions.get(doc.id, snap.id).await.unwrap();
    assert_eq!(fetched, snap);
    assert_eq!(fetched.content, "frozen");
    assert_eq!(fetched.version_number, 7);
}

#[tokio::test]
async fn test_list_orders_oldest_first_by_default() {
    let app = helpers::TestApp::new().await;
    let doc = app.create_document("Doc", "c1").await;
    update(&app, doc.id, "c2").await;
    update(&app, doc.id, "c3").await;

    let numbers: Vec<u64> = app
        .hub
        .versions
        .list(doc.id)
        .await
        .unwrap()
        .iter()
        .map(|v| v.version_number)
        .collect();

    assert_eq!(numbers, [1, 2]);
}

#[tokio::test]
async fn test_list_order_is_configurable() {
    let app =
        helpers::TestApp::with_config(|c| c.history.list_order = VersionOrder::NewestFirst).await;
    let doc = app.create_document("Doc", "c1").await;
    update(&app, doc.id, "c2").await;
    update(&app, doc.id, "c3").await;

    let versions = app.hub.versions.list(doc.id).await.unwrap();

    assert_eq!(versions[0].version_number, 2);
    assert_eq!(versions[0].content, "c2");
    assert_eq!(versions[1].version_number, 1);
}

#[tokio::test]
async fn test_get_unknown_version_not_found() {
    let app = helpers::TestApp::new().await;
    let doc = app.create_document("Doc", "x").await;

    let err = app
        .hub
        .versions
        .get(doc.id, VersionId::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_restore_after_two_updates() {
    let app = helpers::TestApp::new().await;
    let doc = app.create_document("Doc", "C1").await;
    update(&app, doc.id, "C2").await;
    update(&app, doc.id, "C3").await;

    let versions = app.hub.versions.list(doc.id).await.unwrap();
    assert_eq!(versions.len(), 2);
    let first = versions[0].clone();
    assert_eq!(first.content, "C1");

    let restored = app.hub.versions.restore(doc.id, first.id).await.unwrap();

    assert_eq!(restored.content, "C1");
    assert_eq!(restored.version, 4);

    let after = app.hub.versions.list(doc.id).await.unwrap();
    assert_eq!(after.len(), 3);
    let newest = after.last().unwrap();
    assert_eq!(newest.content, "C3");
    assert_eq!(newest.version_number, 3);
    assert!(after.iter().all(|v| v.version_number <= newest.version_number));

    let live = app.hub.documents.get_by_id(doc.id).await.unwrap().unwrap();
    assert_eq!(live.content, "C1");
    assert_eq!(live.version, 4);
    assert!(app.journal().await.pending().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_restore_unknown_version_changes_nothing() {
    let app = helpers::TestApp::new().await;
    let doc = app.create_document("Doc", "keep").await;

    let err = app
        .hub
        .versions
        .restore(doc.id, VersionId::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::NotFound);
    assert!(app.hub.versions.list(doc.id).await.unwrap().is_empty());
    let live = app.hub.documents.get_by_id(doc.id).await.unwrap().unwrap();
    assert_eq!(live.version, 1);
}

#[tokio::test]
async fn test_delete_after_restore_removes_history() {
    let app = helpers::TestApp::new().await;
    let doc = app.create_document("Doc", "a").await;
    update(&app, doc.id, "b").await;
    let first = app.hub.versions.list(doc.id).await.unwrap()[0].clone();
    app.hub.versions.restore(doc.id, first.id).await.unwrap();

    app.hub.documents.delete(doc.id).await.unwrap();

    assert!(!app.exists(&format!("content/{}", doc.id)));
    let err = app.hub.versions.list(doc.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_recovery_discards_incomplete_restore() {
    let mut app = helpers::TestApp::new().await;
    let doc = app.create_document("Doc", "one").await;
    update(&app, doc.id, "two").await;
    let first = app.hub.versions.list(doc.id).await.unwrap()[0].clone();

    let snapshot_id = VersionId::new();
    app.journal()
        .await
        .begin(
            JournalOperation::Restore {
                document_id: doc.id,
                document_dir: format!("content/{}", doc.id),
                version_id: first.id,
                snapshot_id,
                target_version: 3,
            },
            JournalPhase::Staged,
        )
        .await
        .unwrap();
    std::fs::create_dir_all(app.path(&format!("content/{}/versions/{}", doc.id, snapshot_id)))
        .unwrap();

    app.reopen().await;

    assert_eq!(app.hub.recovered().rolled_back, 1);
    assert!(!app.exists(&format!("content/{}/versions/{}", doc.id, snapshot_id)));
    let live = app.hub.documents.get_by_id(doc.id).await.unwrap().unwrap();
    assert_eq!(live.content, "two");
    assert_eq!(live.version, 2);
    assert_eq!(app.hub.versions.list(doc.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_recovery_completes_snapshotted_restore() {
    let mut app = helpers::TestApp::new().await;
    let doc = app.create_document("Doc", "one").await;
    update(&app, doc.id, "two").await;
    let first = app.hub.versions.list(doc.id).await.unwrap()[0].clone();
    let pre_restore = app.hub.versions.snapshot(doc.id, "two", 2).await.unwrap();

    app.journal()
        .await
        .begin(
            JournalOperation::Restore {
                document_id: doc.id,
                document_dir: format!("content/{}", doc.id),
                version_id: first.id,
                snapshot_id: pre_restore.id,
                target_version: 3,
            },
            JournalPhase::Staged,
        )
        .await
        .unwrap();

    app.reopen().await;

    assert_eq!(app.hub.recovered().rolled_forward, 1);
    let live = app.hub.documents.get_by_id(doc.id).await.unwrap().unwrap();
    assert_eq!(live.content, "one");
    assert_eq!(live.version, 3);

    app.reopen().await;
    assert_eq!(app.hub.recovered().total(), 0);
    let again = app.hub.documents.get_by_id(doc.id).await.unwrap().unwrap();
    assert_eq!(again.version, 3);
}
