//! # notehub-service
//!
//! Business logic service layer for NoteHub. Each service orchestrates the
//! storage repositories, the path resolver and the operation journal to
//! implement one group of use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references. [`NoteHub`] wires them up
//! over a storage root.

pub mod catalog;
pub mod context;
pub mod document;
pub mod editor;
pub mod folder;
pub mod recovery;
pub mod relocation;

pub use catalog::{Catalog, CatalogService, TermCount};
pub use context::NoteHub;
pub use document::{DocumentService, VersionService};
pub use editor::{DiffPreview, EditorService};
pub use folder::{FolderService, TreeService};
pub use recovery::{RecoveryReport, RecoveryService};
pub use relocation::Relocator;
