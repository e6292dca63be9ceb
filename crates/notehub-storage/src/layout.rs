//! Persisted directory layout.
//!
//! ```text
//! {root}/
//!   .journal/{operationId}.json
//!   content/                         root folder
//!     .folder-meta
//!     {documentId}/
//!       meta.json
//!       content.{ext}
//!       versions/{versionId}/
//!         version_meta.json
//!         version_content.{ext}
//!     {slug}/                        subfolder
//!       .folder-meta
//!       ...
//! ```
//!
//! Physical paths are relative to the storage root and use `/` separators.
//! A folder's virtual path is its physical path with the leading `content`
//! segment replaced by `/`.

use notehub_core::error::AppError;
use notehub_core::result::AppResult;
use notehub_core::types::{DocumentId, VersionId};

/// Directory of the root folder.
pub const CONTENT_DIR: &str = "content";
/// Folder sidecar file name.
pub const FOLDER_META_FILE: &str = ".folder-meta";
/// Document sidecar file name.
pub const DOCUMENT_META_FILE: &str = "meta.json";
/// Per-document directory holding version snapshots.
pub const VERSIONS_DIR: &str = "versions";
/// Version sidecar file name.
pub const VERSION_META_FILE: &str = "version_meta.json";
/// Directory of pending operation markers.
pub const JOURNAL_DIR: &str = ".journal";

const CONTENT_STEM: &str = "content";
const VERSION_CONTENT_STEM: &str = "version_content";

/// Join a child segment onto a physical path.
pub fn join(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{}/{}", parent.trim_end_matches('/'), child)
    }
}

/// Parent of a physical path, or `None` for a single segment.
pub fn parent(path: &str) -> Option<&str> {
    path.rsplit_once('/').map(|(parent, _)| parent)
}

/// Final segment of a physical path.
pub fn file_name(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, name)| name)
}

/// Whether `path` is `ancestor` or lies beneath it.
pub fn is_within(path: &str, ancestor: &str) -> bool {
    path == ancestor
        || (path.starts_with(ancestor) && path.as_bytes().get(ancestor.len()) == Some(&b'/'))
}

/// Replace the `from` prefix of `path` with `to`.
///
/// Returns `None` when `path` does not lie within `from`.
pub fn rebase(path: &str, from: &str, to: &str) -> Option<String> {
    if !is_within(path, from) {
        return None;
    }
    Some(format!("{to}{}", &path[from.len()..]))
}

/// Split a virtual path into its slug segments.
///
/// Leading, trailing and repeated separators are ignored, so `""`, `"/"`
/// and `"//"` all name the root folder. `.` and `..` segments are rejected.
pub fn virtual_segments(virtual_path: &str) -> AppResult<Vec<&str>> {
    let segments: Vec<&str> = virtual_path
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    if let Some(bad) = segments.iter().find(|s| **s == "." || **s == "..") {
        return Err(AppError::invalid_input(format!(
            "Virtual path may not contain '{bad}': {virtual_path}"
        )));
    }
    Ok(segments)
}

/// Virtual path of the folder stored at physical `dir`.
pub fn virtual_path(dir: &str) -> String {
    match dir.strip_prefix(CONTENT_DIR) {
        Some("") | None => "/".to_string(),
        Some(rest) => rest.to_string(),
    }
}

/// Number of slug segments between the root folder and `dir`.
pub fn depth(dir: &str) -> u32 {
    virtual_path(dir).split('/').filter(|s| !s.is_empty()).count() as u32
}

/// Sidecar path of the folder at `dir`.
pub fn folder_meta(dir: &str) -> String {
    join(dir, FOLDER_META_FILE)
}

/// Journal marker path for an operation.
pub fn journal_entry(id: &str) -> String {
    join(JOURNAL_DIR, &format!("{id}.json"))
}

/// Artifact naming for documents and versions.
///
/// Only the content file extension is configurable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    content_extension: String,
}

impl Layout {
    pub fn new(content_extension: impl Into<String>) -> Self {
        let ext: String = content_extension.into();
        Self {
            content_extension: ext.trim_start_matches('.').to_string(),
        }
    }

    pub fn content_extension(&self) -> &str {
        &self.content_extension
    }

    /// Directory of a document stored directly inside `folder_dir`.
    pub fn document_dir(&self, folder_dir: &str, id: DocumentId) -> String {
        join(folder_dir, &id.to_string())
    }

    pub fn document_meta(&self, document_dir: &str) -> String {
        join(document_dir, DOCUMENT_META_FILE)
    }

    pub fn document_content(&self, document_dir: &str) -> String {
        join(
            document_dir,
            &format!("{CONTENT_STEM}.{}", self.content_extension),
        )
    }

    pub fn versions_dir(&self, document_dir: &str) -> String {
        join(document_dir, VERSIONS_DIR)
    }

    pub fn version_dir(&self, document_dir: &str, id: VersionId) -> String {
        join(&self.versions_dir(document_dir), &id.to_string())
    }

    pub fn version_meta(&self, document_dir: &str, id: VersionId) -> String {
        join(&self.version_dir(document_dir, id), VERSION_META_FILE)
    }

    pub fn version_content(&self, document_dir: &str, id: VersionId) -> String {
        join(
            &self.version_dir(document_dir, id),
            &format!("{VERSION_CONTENT_STEM}.{}", self.content_extension),
        )
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new("md")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virtual_physical_mapping() {
        assert!(virtual_segments("/").unwrap().is_empty());
        assert!(virtual_segments("").unwrap().is_empty());
        assert_eq!(virtual_segments("/a/b/").unwrap(), ["a", "b"]);
        assert_eq!(virtual_segments("a//b").unwrap(), ["a", "b"]);
        assert_eq!(virtual_path("content"), "/");
        assert_eq!(virtual_path("content/a/b"), "/a/b");
        assert_eq!(depth("content"), 0);
        assert_eq!(depth("content/a/b"), 2);
    }

    #[test]
    fn test_dot_segments_rejected() {
        assert!(virtual_segments("/a/../b").is_err());
        assert!(virtual_segments("/./a").is_err());
    }

    #[test]
    fn test_prefix_helpers() {
        assert!(is_within("content/a/b", "content/a"));
        assert!(is_within("content/a", "content/a"));
        assert!(!is_within("content/ab", "content/a"));
        assert_eq!(
            rebase("content/a/b/doc", "content/a", "content/x/a"),
            Some("content/x/a/b/doc".to_string())
        );
        assert_eq!(rebase("content/ab", "content/a", "content/z"), None);
        assert_eq!(parent("content/a/b"), Some("content/a"));
        assert_eq!(parent("content"), None);
        assert_eq!(file_name("content/a/b"), "b");
    }

    #[test]
    fn test_artifact_names() {
        let layout = Layout::new(".txt");
        let id = DocumentId::new();
        let dir = layout.document_dir("content", id);
        assert_eq!(dir, format!("content/{id}"));
        assert_eq!(layout.document_meta(&dir), format!("{dir}/meta.json"));
        assert_eq!(layout.document_content(&dir), format!("{dir}/content.txt"));
        let vid = VersionId::new();
        assert_eq!(
            layout.version_content(&dir, vid),
            format!("{dir}/versions/{vid}/version_content.txt")
        );
    }
}
