//! Document entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use notehub_core::types::DocumentId;

/// A note document.
///
/// `content` is held in memory only; on disk it lives in its own artifact
/// next to the metadata sidecar and is never written into the sidecar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique document identifier.
    pub id: DocumentId,
    /// Document title.
    pub title: String,
    /// Raw text content.
    pub content: String,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Categories the document is filed under.
    pub categories: Vec<String>,
    /// Optional short summary.
    pub summary: Option<String>,
    /// Optional related documents.
    pub related_ids: Option<Vec<DocumentId>>,
    /// Optional embedding vector.
    pub embedding: Option<Vec<f32>>,
    /// Revision counter, strictly increasing across updates.
    pub version: u64,
    /// When the document was created.
    pub created_at: DateTime<Utc>,
    /// When the document was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Number of lines in the content. A trailing newline does not start
    /// an extra line.
    pub fn line_count(&self) -> usize {
        if self.content.is_empty() {
            return 0;
        }
        let n = self.content.split('\n').count();
        if self.content.ends_with('\n') { n - 1 } else { n }
    }

    /// A lightweight summary for listings.
    pub fn summarize(&self) -> DocumentSummary {
        DocumentSummary {
            id: self.id,
            title: self.title.clone(),
            tags: self.tags.clone(),
            version: self.version,
            updated_at: self.updated_at,
        }
    }
}

/// Listing view of a document without its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Document ID.
    pub id: DocumentId,
    /// Document title.
    pub title: String,
    /// Tags.
    pub tags: Vec<String>,
    /// Current version.
    pub version: u64,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateDocument {
    /// Document title.
    pub title: String,
    /// Initial content.
    #[serde(default)]
    pub content: String,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Categories.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Optional summary.
    #[serde(default)]
    pub summary: Option<String>,
    /// Optional related documents.
    #[serde(default)]
    pub related_ids: Option<Vec<DocumentId>>,
    /// Optional embedding vector.
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
    /// Virtual path of the folder to create the document in. `None` means
    /// the root folder.
    #[serde(default)]
    pub folder_path: Option<String>,
}

impl CreateDocument {
    /// Minimal creation request with a title and content.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }
}

/// Partial update of a document. A `None` field leaves the stored value
/// unchanged. For optional attributes, `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct UpdateDocument {
    /// New title.
    pub title: Option<String>,
    /// New content.
    pub content: Option<String>,
    /// Replacement tag list.
    pub tags: Option<Vec<String>>,
    /// Replacement category list.
    pub categories: Option<Vec<String>>,
    /// New summary.
    pub summary: Option<Option<String>>,
    /// New related documents.
    pub related_ids: Option<Option<Vec<DocumentId>>>,
    /// New embedding.
    pub embedding: Option<Option<Vec<f32>>>,
}

impl UpdateDocument {
    /// Update that only replaces the content.
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.tags.is_none()
            && self.categories.is_none()
            && self.summary.is_none()
            && self.related_ids.is_none()
            && self.embedding.is_none()
    }

    /// Apply every specified field onto `doc`, leaving the rest untouched.
    /// Content, version, and timestamps are handled by the caller.
    pub fn merge_attributes(self, doc: &mut Document) {
        if let Some(title) = self.title {
            doc.title = title;
        }
        if let Some(tags) = self.tags {
            doc.tags = tags;
        }
        if let Some(categories) = self.categories {
            doc.categories = categories;
        }
        if let Some(summary) = self.summary {
            doc.summary = summary;
        }
        if let Some(related_ids) = self.related_ids {
            doc.related_ids = related_ids;
        }
        if let Some(embedding) = self.embedding {
            doc.embedding = embedding;
        }
    }
}
