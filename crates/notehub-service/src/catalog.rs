//! Derived tag and category index.
//!
//! Built on demand by scanning every document. Nothing is persisted; the
//! folder hierarchy stays the only stored structure.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use notehub_core::result::AppResult;
use notehub_core::types::DocumentId;
use notehub_entity::document::{Document, DocumentSummary};

use crate::document::DocumentService;

/// A term with the number of documents carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermCount {
    pub term: String,
    pub count: usize,
}

/// Tag and category postings over a set of documents.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    pub tags: BTreeMap<String, Vec<DocumentSummary>>,
    pub categories: BTreeMap<String, Vec<DocumentSummary>>,
}

impl Catalog {
    /// Index `documents`. A term repeated on one document counts once.
    pub fn build(documents: &[Document]) -> Self {
        let mut catalog = Self::default();
        for doc in documents {
            let summary = doc.summarize();
            post(&mut catalog.tags, &doc.tags, doc.id, &summary);
            post(&mut catalog.categories, &doc.categories, doc.id, &summary);
        }
        catalog
    }

    /// Tags by descending document count, then alphabetically.
    pub fn tag_counts(&self) -> Vec<TermCount> {
        counts(&self.tags)
    }

    /// Categories by descending document count, then alphabetically.
    pub fn category_counts(&self) -> Vec<TermCount> {
        counts(&self.categories)
    }
}

fn post(
    postings: &mut BTreeMap<String, Vec<DocumentSummary>>,
    terms: &[String],
    id: DocumentId,
    summary: &DocumentSummary,
) {
    for term in terms {
        let term = term.trim();
        if term.is_empty() {
            continue;
        }
        let list = postings.entry(term.to_string()).or_default();
        if !list.iter().any(|s| s.id == id) {
            list.push(summary.clone());
        }
    }
}

fn counts(postings: &BTreeMap<String, Vec<DocumentSummary>>) -> Vec<TermCount> {
    let mut out: Vec<TermCount> = postings
        .iter()
        .map(|(term, docs)| TermCount {
            term: term.clone(),
            count: docs.len(),
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.term.cmp(&b.term)));
    out
}

/// Serves the tag and category index.
#[derive(Debug, Clone)]
pub struct CatalogService {
    documents: Arc<DocumentService>,
}

impl CatalogService {
    /// Creates a new catalog service.
    pub fn new(documents: Arc<DocumentService>) -> Self {
        Self { documents }
    }

    /// Build the catalog over every document.
    pub async fn catalog(&self) -> AppResult<Catalog> {
        let documents = self.documents.get_all().await?;
        let catalog = Catalog::build(&documents);
        debug!(
            documents = documents.len(),
            tags = catalog.tags.len(),
            categories = catalog.categories.len(),
            "Catalog built"
        );
        Ok(catalog)
    }

    pub async fn tags(&self) -> AppResult<Vec<TermCount>> {
        Ok(self.catalog().await?.tag_counts())
    }

    pub async fn categories(&self) -> AppResult<Vec<TermCount>> {
        Ok(self.catalog().await?.category_counts())
    }

    /// Documents carrying `tag`.
    pub async fn by_tag(&self, tag: &str) -> AppResult<Vec<DocumentSummary>> {
        Ok(self
            .catalog()
            .await?
            .tags
            .remove(tag.trim())
            .unwrap_or_default())
    }

    /// Documents filed under `category`.
    pub async fn by_category(&self, category: &str) -> AppResult<Vec<DocumentSummary>> {
        Ok(self
            .catalog()
            .await?
            .categories
            .remove(category.trim())
            .unwrap_or_default())
    }
}
