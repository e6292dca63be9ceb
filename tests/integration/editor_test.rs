//! Integration tests for diff preview and selective apply.

mod helpers;

use notehub_core::error::ErrorKind;
use notehub_core::types::DocumentId;
use notehub_diff::BlockSelection;
use notehub_entity::document::UpdateDocument;

const ORIGINAL: &str = "# Title\nintro\nkeep\nold ending\n";
const PROPOSED: &str = "# New Title\nintro\nkeep\nnew ending\nappendix\n";

#[tokio::test]
async fn test_preview_selects_every_block() {
    let app = helpers::TestApp::new().await;
    let doc = app.create_document("Doc", ORIGINAL).await;

    let preview = app.hub.editor.preview(doc.id, PROPOSED).await.unwrap();

    assert_eq!(preview.base_version, 1);
    assert_eq!(preview.original, ORIGINAL);
    assert_eq!(preview.stats.blocks, 2);
    assert_eq!(preview.selection.len(), 2);
    assert_eq!(preview.render(&preview.selection), PROPOSED);
    assert_eq!(preview.render(&BlockSelection::empty()), ORIGINAL);
    assert_eq!(preview.hunks.len(), 1);
    assert!(preview.unified().starts_with("@@ -1,"));
}

#[tokio::test]
async fn test_apply_partial_selection() {
    let app = helpers::TestApp::new().await;
    let doc = app.create_document("Doc", ORIGINAL).await;
    let preview = app.hub.editor.preview(doc.id, PROPOSED).await.unwrap();

    let blocks = preview.diff.block_ids();
    let only_ending = preview.selection.toggle(blocks[0]);
    assert_eq!(preview.selection.len(), 2);

    let saved = app.hub.editor.apply(&preview, &only_ending).await.unwrap();

    assert_eq!(saved.content, "# Title\nintro\nkeep\nnew ending\nappendix\n");
    assert_eq!(saved.version, 2);
    let history = app.hub.versions.list(doc.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].content, ORIGINAL);
}

#[tokio::test]
async fn test_apply_empty_selection_changes_nothing() {
    let app = helpers::TestApp::new().await;
    let doc = app.create_document("Doc", ORIGINAL).await;
    let preview = app.hub.editor.preview(doc.id, PROPOSED).await.unwrap();

    let cleared = preview.selection.toggle_all(&preview.diff);
    let saved = app.hub.editor.apply(&preview, &cleared).await.unwrap();

    assert!(cleared.is_empty());
    assert_eq!(saved.content, ORIGINAL);
    assert_eq!(saved.version, 1);
    assert!(app.hub.versions.list(doc.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_preview_of_identical_text_has_no_blocks() {
    let app = helpers::TestApp::new().await;
    let doc = app.create_document("Doc", ORIGINAL).await;

    let preview = app.hub.editor.preview(doc.id, ORIGINAL).await.unwrap();

    assert!(!preview.diff.has_changes());
    assert!(preview.selection.is_empty());
    assert!(preview.hunks.is_empty());
    assert_eq!(preview.unified(), "");
}

#[tokio::test]
async fn test_selections_are_independent_values() {
    let app = helpers::TestApp::new().await;
    let doc = app.create_document("Doc", ORIGINAL).await;
    let preview = app.hub.editor.preview(doc.id, PROPOSED).await.unwrap();
    let block = preview.diff.block_ids()[1];

    let a = preview.selection.toggle(block);
    let b = a.toggle(block);

    assert!(!a.contains(block));
    assert!(b.contains(block));
    assert_eq!(b, preview.selection);
    assert_eq!(preview.selection.len(), 2);
}

#[tokio::test]
async fn test_compare_version_previews_restore() {
    let app = helpers::TestApp::new().await;
    let doc = app.create_document("Doc", "v1 line\nshared\n").await;
    app.hub
        .documents
        .update(doc.id, UpdateDocument::content("v2 line\nshared\n"))
        .await
        .unwrap();
    let snapshot = app.hub.versions.list(doc.id).await.unwrap()[0].clone();

    let preview = app
        .hub
        .editor
        .compare_version(doc.id, snapshot.id)
        .await
        .unwrap();

    assert_eq!(preview.base_version, 2);
    assert_eq!(preview.original, "v2 line\nshared\n");
    assert_eq!(preview.proposed, "v1 line\nshared\n");
    assert_eq!(preview.stats.blocks, 1);
    assert_eq!(preview.stats.common, 1);

    let saved = app
        .hub
        .editor
        .apply(&preview, &preview.selection)
        .await
        .unwrap();
    assert_eq!(saved.content, "v1 line\nshared\n");
    assert_eq!(saved.version, 3);
}

#[tokio::test]
async fn test_preview_unknown_document_not_found() {
    let app = helpers::TestApp::new().await;

    let err = app
        .hub
        .editor
        .preview(DocumentId::new(), "anything")
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_preview_serializes_for_ui() {
    let app = helpers::TestApp::new().await;
    let doc = app.create_document("Doc", "a\n").await;

    let preview = app.hub.editor.preview(doc.id, "b\n").await.unwrap();
    let json = serde_json::to_value(&preview).unwrap();

    assert_eq!(json["baseVersion"], 1);
    assert_eq!(json["selection"], serde_json::json!([0]));
    assert_eq!(json["diff"][0]["kind"], "deleted");
    assert_eq!(json["diff"][1]["changeBlockId"], 0);
}
