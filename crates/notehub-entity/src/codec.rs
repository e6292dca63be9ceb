//! Sidecar metadata codec.
//!
//! Converts between the in-memory entities and the flat JSON sidecars
//! persisted next to them. Timestamps are written as fixed-format UTC
//! strings with millisecond precision (`2024-05-01T12:30:00.123Z`), which
//! is why [`timestamp_now`] truncates to milliseconds: an entity created
//! with it survives an encode/decode cycle unchanged.

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use notehub_core::error::{AppError, ErrorKind};
use notehub_core::result::AppResult;
use notehub_core::types::{DocumentId, FolderId, VersionId};

use crate::document::Document;
use crate::folder::Folder;
use crate::version::Version;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
const TIMESTAMP_PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Current time at the precision the sidecars can represent.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Format a timestamp for a sidecar.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a sidecar timestamp. RFC 3339 strings with an offset are also
/// accepted.
pub fn parse_timestamp(raw: &str) -> AppResult<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, TIMESTAMP_PARSE_FORMAT) {
        return Ok(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Invalid timestamp '{raw}'"),
                e,
            )
        })
}

/// Sidecar of a folder directory (`.folder-meta`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderMeta {
    pub id: FolderId,
    pub name: String,
    pub slug: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Folder> for FolderMeta {
    fn from(folder: &Folder) -> Self {
        Self {
            id: folder.id,
            name: folder.name.clone(),
            slug: folder.slug.clone(),
            created_at: format_timestamp(&folder.created_at),
            updated_at: format_timestamp(&folder.updated_at),
        }
    }
}

impl TryFrom<FolderMeta> for Folder {
    type Error = AppError;

    fn try_from(meta: FolderMeta) -> AppResult<Self> {
        Ok(Self {
            id: meta.id,
            name: meta.name,
            slug: meta.slug,
            created_at: parse_timestamp(&meta.created_at)?,
            updated_at: parse_timestamp(&meta.updated_at)?,
        })
    }
}

/// Sidecar of a document directory (`meta.json`). Never carries content.
///
/// Older sidecars may store a single `category` instead of a
/// `categories` list; both are read, only `categories` is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMeta {
    pub id: DocumentId,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_ids: Option<Vec<DocumentId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    pub version: u64,
    pub created_at: String,
    pub updated_at: String,
}

/// Flatten a document into its sidecar form, dropping the content.
pub fn document_to_metadata(doc: &Document) -> DocumentMeta {
    DocumentMeta {
        id: doc.id,
        title: doc.title.clone(),
        tags: doc.tags.clone(),
        category: None,
        categories: doc.categories.clone(),
        summary: doc.summary.clone(),
        related_ids: doc.related_ids.clone(),
        embedding: doc.embedding.clone(),
        version: doc.version,
        created_at: format_timestamp(&doc.created_at),
        updated_at: format_timestamp(&doc.updated_at),
    }
}

/// Rebuild a document from its sidecar and separately stored content.
pub fn metadata_to_document(meta: DocumentMeta, content: String) -> AppResult<Document> {
    let mut categories = meta.categories;
    if let Some(category) = meta.category {
        if !categories.contains(&category) {
            categories.insert(0, category);
        }
    }

    Ok(Document {
        id: meta.id,
        title: meta.title,
        content,
        tags: meta.tags,
        categories,
        summary: meta.summary,
        related_ids: meta.related_ids,
        embedding: meta.embedding,
        version: meta.version,
        created_at: parse_timestamp(&meta.created_at)?,
        updated_at: parse_timestamp(&meta.updated_at)?,
    })
}

/// Sidecar of a version snapshot (`version_meta.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionMeta {
    pub id: VersionId,
    pub document_id: DocumentId,
    pub version: u64,
    pub created_at: String,
}

impl From<&Version> for VersionMeta {
    fn from(version: &Version) -> Self {
        Self {
            id: version.id,
            document_id: version.document_id,
            version: version.version_number,
            created_at: format_timestamp(&version.created_at),
        }
    }
}

/// Rebuild a snapshot from its sidecar and content artifact.
pub fn metadata_to_version(meta: VersionMeta, content: String) -> AppResult<Version> {
    Ok(Version {
        id: meta.id,
        document_id: meta.document_id,
        content,
        version_number: meta.version,
        created_at: parse_timestamp(&meta.created_at)?,
    })
}
