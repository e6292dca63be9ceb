//! Artifact repositories.
//!
//! Each repository reads and writes the files of one entity kind at a
//! physical directory chosen by the caller. They know the artifact names
//! but nothing about where in the tree an entity lives.

pub mod document;
pub mod folder;
pub mod version;

pub use document::DocumentRepository;
pub use folder::FolderRepository;
pub use version::VersionRepository;
