//! # notehub-entity
//!
//! Domain entity models for NoteHub. The in-memory entities use rich value
//! types (typed ids, `DateTime<Utc>`); their flat on-disk sidecar forms and
//! the conversions between the two live in [`codec`].

pub mod codec;
pub mod document;
pub mod folder;
pub mod version;

pub use document::{CreateDocument, Document, DocumentSummary, UpdateDocument};
pub use folder::{Folder, FolderNode, TreeEntry};
pub use version::Version;
