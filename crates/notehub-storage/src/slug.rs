//! Filesystem-safe names for folders.

use std::sync::Arc;

use notehub_core::result::AppResult;
use notehub_core::traits::storage::StorageProvider;
use notehub_core::types::short_token;

use crate::layout;

/// Derives slugs from display names and makes them unique among siblings.
#[derive(Debug, Clone)]
pub struct SlugAllocator {
    provider: Arc<dyn StorageProvider>,
}

impl SlugAllocator {
    pub fn new(provider: Arc<dyn StorageProvider>) -> Self {
        Self { provider }
    }

    /// Lowercase `name`, collapse every run of characters outside
    /// `[a-z0-9]` into one `-`, and trim leading and trailing dashes.
    ///
    /// A name with nothing left falls back to `item-<token>`.
    pub fn generate(name: &str) -> String {
        let mut slug = String::with_capacity(name.len());
        let mut pending_dash = false;
        for c in name.chars().flat_map(char::to_lowercase) {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push(c);
            } else {
                pending_dash = true;
            }
        }
        if slug.is_empty() {
            format!("item-{}", short_token())
        } else {
            slug
        }
    }

    /// First of `candidate`, `candidate-1`, `candidate-2`, … that is free
    /// inside `parent_dir`.
    ///
    /// `own_dir` is the entity's current directory, if any; it never counts
    /// as a collision so renaming to an equivalent name keeps the slug.
    pub async fn allocate(
        &self,
        parent_dir: &str,
        candidate: &str,
        own_dir: Option<&str>,
    ) -> AppResult<String> {
        let mut suffix = 0u32;
        loop {
            let slug = if suffix == 0 {
                candidate.to_string()
            } else {
                format!("{candidate}-{suffix}")
            };
            let path = layout::join(parent_dir, &slug);
            if own_dir == Some(path.as_str()) || !self.provider.exists(&path).await? {
                return Ok(slug);
            }
            suffix += 1;
        }
    }
}
