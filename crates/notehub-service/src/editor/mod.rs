//! Diff-driven editing: preview a change, then apply a chosen subset of it.

pub mod service;

pub use service::{DiffPreview, EditorService};
