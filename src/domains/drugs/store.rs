//! The read-only drug data-access capability consumed by the tools.

use async_trait::async_trait;
use thiserror::Error;

use super::model::{DrugRecord, Page, PageRequest};

/// Errors raised by a drug data backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No drug exists for the given slug.
    #[error("Drug not found: {0}")]
    NotFound(String),

    /// The backend could not be reached or answered with a failure.
    #[error("Drug data backend failed: {0}")]
    Backend(String),

    /// The backend answered with data that could not be decoded.
    #[error("Failed to decode drug data: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn not_found(slug: impl Into<String>) -> Self {
        Self::NotFound(slug.into())
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Narrow query interface over the drug catalog.
///
/// Implementations must be safe to share between concurrently running tool
/// calls. Retrying failed requests, if at all, is the implementation's
/// concern.
#[async_trait]
pub trait DrugStore: Send + Sync {
    /// Full-text search, best matches first.
    async fn search_by_text(&self, query: &str) -> Result<Vec<DrugRecord>, StoreError>;

    /// Look up a single drug. Unknown slugs yield [`StoreError::NotFound`].
    async fn get_by_slug(&self, slug: &str) -> Result<DrugRecord, StoreError>;

    /// Drugs whose indications mention the given condition.
    async fn get_by_condition(
        &self,
        condition: &str,
        page: PageRequest,
    ) -> Result<Page, StoreError>;

    /// Resolve several slugs at once, in input order. Unknown slugs are skipped.
    async fn compare_by_slugs(&self, slugs: &[String]) -> Result<Vec<DrugRecord>, StoreError>;

    /// Drugs sharing the source drug's manufacturer, excluding the source.
    async fn get_related_by_slug(&self, slug: &str) -> Result<Vec<DrugRecord>, StoreError>;
}
