//! Document management services: CRUD, line edits, and version history.

pub mod service;
pub mod version;

pub use service::DocumentService;
pub use version::VersionService;
