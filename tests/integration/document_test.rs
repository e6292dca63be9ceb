//! Integration tests for document operations.

mod helpers;

use notehub_core::error::ErrorKind;
use notehub_core::types::DocumentId;
use notehub_entity::document::{CreateDocument, UpdateDocument};

#[tokio::test]
async fn test_create_document_at_version_one() {
    let app = helpers::TestApp::new().await;

    let doc = app.create_document("First", "hello\nworld\n").await;

    assert_eq!(doc.version, 1);
    assert_eq!(doc.created_at, doc.updated_at);
    assert!(app.exists(&format!("content/{}/meta.json", doc.id)));
    assert!(app.exists(&format!("content/{}/content.md", doc.id)));

    let on_disk = std::fs::read_to_string(app.path(&format!("content/{}/content.md", doc.id)))
        .unwrap();
    assert_eq!(on_disk, "hello\nworld\n");
    let meta = std::fs::read_to_string(app.path(&format!("content/{}/meta.json", doc.id))).unwrap();
    assert!(!meta.contains("hello"));
}

#[tokio::test]
async fn test_document_survives_reopen_unchanged() {
    let mut app = helpers::TestApp::new().await;
    let related = DocumentId::new();
    let created = app
        .hub
        .documents
        .create(CreateDocument {
            tags: vec!["rust".into(), "notes".into()],
            categories: vec!["work".into()],
            summary: Some("short".into()),
            related_ids: Some(vec![related]),
            embedding: Some(vec![0.5, -0.25, 1.0]),
            ..CreateDocument::new("Round Trip", "line one\nline two")
        })
        .await
        .unwrap();

    app.reopen().await;
    let loaded = app.hub.documents.get_by_id(created.id).await.unwrap().unwrap();

    assert_eq!(loaded, created);
}

#[tokio::test]
async fn test_create_requires_title() {
    let app = helpers::TestApp::new().await;

    let err = app
        .hub
        .documents
        .create(CreateDocument::new("   ", "body"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_non_finite_embedding_rejected() {
    let app = helpers::TestApp::new().await;

    let mut data = CreateDocument::new("Vector", "body");
    data.embedding = Some(vec![0.5, f32::NAN]);
    let err = app.hub.documents.create(data).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);
    assert!(app.hub.documents.get_all().await.unwrap().is_empty());

    let doc = app.create_document("Vector", "body").await;
    let patch = UpdateDocument {
        content: Some("changed".into()),
        embedding: Some(Some(vec![f32::INFINITY])),
        ..UpdateDocument::default()
    };
    let err = app.hub.documents.update(doc.id, patch).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);

    let live = app.hub.documents.get_by_id(doc.id).await.unwrap().unwrap();
    assert_eq!(live.version, 1);
    assert_eq!(live.content, "body");
    assert!(app.hub.versions.list(doc.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_unknown_document_is_none() {
    let app = helpers::TestApp::new().await;

    let found = app.hub.documents.get_by_id(DocumentId::new()).await.unwrap();

    assert!(found.is_none());
}

#[tokio::test]
async fn test_get_all_and_get_by_ids() {
    let app = helpers::TestApp::new().await;
    app.create_folder("Sub", "/").await;
    let a = app.create_document("A", "a").await;
    let b = app.create_document_in("/sub", "B", "b").await;

    let all = app.hub.documents.get_all().await.unwrap();
    assert_eq!(all.len(), 2);

    let picked = app
        .hub
        .documents
        .get_by_ids(&[b.id, DocumentId::new(), a.id])
        .await
        .unwrap();
    let titles: Vec<&str> = picked.iter().map(|d| d.title.as_str()).collect();
    assert_eq!(titles, ["B", "A"]);

    let in_sub = app.hub.documents.list_in_folder("/sub").await.unwrap();
    assert_eq!(in_sub.len(), 1);
    assert_eq!(in_sub[0].id, b.id);
}

#[tokio::test]
async fn test_get_all_skips_unreadable_documents() {
    let app = helpers::TestApp::new().await;
    app.create_document("Good", "ok").await;
    let broken = app.create_document("Broken", "x").await;
    std::fs::write(app.path(&format!("content/{}/meta.json", broken.id)), "{not json").unwrap();

    let all = app.hub.documents.get_all().await.unwrap();

    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title, "Good");
}

#[tokio::test]
async fn test_update_content_snapshots_previous_state() {
    let app = helpers::TestApp::new().await;
    let doc = app.create_document("Draft", "C1").await;

    let updated = app
        .hub
        .documents
        .update(doc.id, UpdateDocument::content("C2"))
        .await
        .unwrap();

    assert_eq!(updated.version, 2);
    assert_eq!(updated.content, "C2");
    assert!(updated.updated_at >= doc.updated_at);

    let versions = app.hub.versions.list(doc.id).await.unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].content, "C1");
    assert_eq!(versions[0].version_number, 1);
}

#[tokio::test]
async fn test_update_attributes_only_skips_snapshot() {
    let app = helpers::TestApp::new().await;
    let doc = app.create_document("Old Title", "same").await;

    let updated = app
        .hub
        .documents
        .update(
            doc.id,
            UpdateDocument {
                title: Some("New Title".into()),
                tags: Some(vec!["t".into()]),
                content: Some("same".into()),
                ..UpdateDocument::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "New Title");
    assert_eq!(updated.tags, vec!["t".to_string()]);
    assert_eq!(updated.version, 2);
    assert!(app.hub.versions.list(doc.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_clears_optional_field() {
    let app = helpers::TestApp::new().await;
    let doc = app
        .hub
        .documents
        .create(CreateDocument {
            summary: Some("remove me".into()),
            ..CreateDocument::new("T", "")
        })
        .await
        .unwrap();

    let updated = app
        .hub
        .documents
        .update(
            doc.id,
            UpdateDocument {
                summary: Some(None),
                ..UpdateDocument::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.summary, None);
    let loaded = app.hub.documents.get_by_id(doc.id).await.unwrap().unwrap();
    assert_eq!(loaded.summary, None);
}

#[tokio::test]
async fn test_update_unknown_document_not_found() {
    let app = helpers::TestApp::new().await;

    let err = app
        .hub
        .documents
        .update(DocumentId::new(), UpdateDocument::content("x"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_update_line_range_deletes_lines() {
    let app = helpers::TestApp::new().await;
    let doc = app.create_document("Lines", "1\n2\n3\n4\n5").await;

    let updated = app
        .hub
        .documents
        .update_line_range(doc.id, 3, 5, "")
        .await
        .unwrap();

    assert_eq!(updated.content, "1\n2");
    assert_eq!(updated.line_count(), 2);
    assert_eq!(updated.version, 2);
}

#[tokio::test]
async fn test_update_line_range_replaces_middle() {
    let app = helpers::TestApp::new().await;
    let doc = app.create_document("Lines", "a\nb\nc\n").await;

    let updated = app
        .hub
        .documents
        .update_line_range(doc.id, 2, 2, "B1\nB2")
        .await
        .unwrap();

    assert_eq!(updated.content, "a\nB1\nB2\nc\n");
}

#[tokio::test]
async fn test_update_line_range_rejects_bad_ranges() {
    let app = helpers::TestApp::new().await;
    let doc = app.create_document("Lines", "a\nb\nc").await;

    for (start, end) in [(0, 1), (2, 1), (1, 4)] {
        let err = app
            .hub
            .documents
            .update_line_range(doc.id, start, end, "x")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidInput, "{start}..={end}");
    }

    let unchanged = app.hub.documents.get_by_id(doc.id).await.unwrap().unwrap();
    assert_eq!(unchanged.version, 1);
}

#[tokio::test]
async fn test_move_document_keeps_history() {
    let app = helpers::TestApp::new().await;
    app.create_folder("Archive", "/").await;
    let doc = app.create_document("Mover", "v1").await;
    app.hub
        .documents
        .update(doc.id, UpdateDocument::content("v2"))
        .await
        .unwrap();

    app.hub.documents.move_to_folder(doc.id, "/archive").await.unwrap();

    assert!(!app.exists(&format!("content/{}", doc.id)));
    assert!(app.exists(&format!("content/archive/{}/meta.json", doc.id)));
    let parent = app.hub.resolver().parent_of(doc.id).await.unwrap().unwrap();
    assert_eq!(parent.virtual_path(), "/archive");
    let versions = app.hub.versions.list(doc.id).await.unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].content, "v1");
}

#[tokio::test]
async fn test_delete_document_is_idempotent() {
    let app = helpers::TestApp::new().await;
    let doc = app.create_document("Temp", "x").await;
    app.hub
        .documents
        .update(doc.id, UpdateDocument::content("y"))
        .await
        .unwrap();

    app.hub.documents.delete(doc.id).await.unwrap();
    app.hub.documents.delete(doc.id).await.unwrap();

    assert!(!app.exists(&format!("content/{}", doc.id)));
    assert!(app.hub.documents.get_by_id(doc.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_batch_delete_skips_unknown_ids() {
    let app = helpers::TestApp::new().await;
    let a = app.create_document("A", "").await;
    let b = app.create_document("B", "").await;
    let keep = app.create_document("Keep", "").await;

    app.hub
        .documents
        .batch_delete(&[a.id, DocumentId::new(), b.id])
        .await
        .unwrap();

    let all = app.hub.documents.get_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, keep.id);
}

#[tokio::test]
async fn test_catalog_counts_tags_and_categories() {
    let app = helpers::TestApp::new().await;
    app.create_tagged("One", &["rust", "cli"], &["work"]).await;
    app.create_tagged("Two", &["rust"], &["work", "home"]).await;
    app.create_tagged("Three", &[], &[]).await;

    let tags = app.hub.catalog.tags().await.unwrap();
    assert_eq!(tags[0].term, "rust");
    assert_eq!(tags[0].count, 2);
    assert_eq!(tags[1].term, "cli");

    let categories = app.hub.catalog.categories().await.unwrap();
    assert_eq!(categories[0].term, "work");
    assert_eq!(categories[0].count, 2);

    let home = app.hub.catalog.by_category("home").await.unwrap();
    assert_eq!(home.len(), 1);
    assert_eq!(home[0].title, "Two");
    assert!(app.hub.catalog.by_tag("missing").await.unwrap().is_empty());
}
