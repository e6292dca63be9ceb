//! # notehub-storage
//!
//! The physical side of NoteHub: the local filesystem provider, the
//! persisted directory layout, sidecar IO, slug allocation, path and id
//! resolution, the id → location index, the operation journal used to make
//! multi-step operations resumable, and the low-level repositories the
//! service layer orchestrates.

pub mod index;
pub mod journal;
pub mod layout;
pub mod providers;
pub mod repositories;
pub mod resolver;
pub mod sidecar;
pub mod slug;

pub use index::{EntryKind, Location, LocationIndex};
pub use journal::{JournalEntry, JournalOperation, JournalPhase, OperationJournal};
pub use layout::Layout;
pub use providers::local::{LocalStorageProvider, RetryPolicy};
pub use resolver::{DocumentHandle, FolderHandle, PathResolver};
pub use slug::SlugAllocator;
