//! In-memory drug catalog.
//!
//! Records are loaded once (typically from a JSON export of the label
//! database) and never mutated afterwards, so lookups need no locking.

use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info};

use super::model::{DrugRecord, Page, PageRequest, Pagination};
use super::openfda;
use super::store::{DrugStore, StoreError};
use super::text::searchable;
use crate::core::{Error, Result};

/// A [`DrugStore`] backed by a vector of records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDrugStore {
    drugs: Vec<DrugRecord>,
}

impl InMemoryDrugStore {
    /// Create a store from already-loaded records.
    pub fn new(drugs: Vec<DrugRecord>) -> Self {
        Self { drugs }
    }

    /// Parse records from JSON. Accepts an array of records, a
    /// `{ "results": [...] }` envelope, or a single record object.
    ///
    /// Each record is either a camelCase catalog record or an openFDA drug
    /// label, which is mapped with a derived slug.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut value: serde_json::Value = serde_json::from_str(json)?;
        if let Some(results) = value.get_mut("results").filter(|r| r.is_array()) {
            value = results.take();
        }
        let values = match value {
            serde_json::Value::Array(values) => values,
            single => vec![single],
        };
        let drugs = values
            .into_iter()
            .map(parse_record)
            .collect::<Result<Vec<_>>>()?;

        if let Some(duplicate) = first_duplicate_slug(&drugs) {
            return Err(Error::config(format!(
                "Duplicate drug slug in catalog: {duplicate}"
            )));
        }

        Ok(Self::new(drugs))
    }

    /// Load records from a JSON file on disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let store = Self::from_json_str(&json)?;
        info!("Loaded {} drug record(s) from {}", store.len(), path.display());
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.drugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drugs.is_empty()
    }

    fn find(&self, slug: &str) -> Option<&DrugRecord> {
        self.drugs.iter().find(|d| d.slug == slug)
    }
}

fn parse_record(value: serde_json::Value) -> Result<DrugRecord> {
    if openfda::is_label(&value) {
        openfda::record_from_label(value)
    } else {
        Ok(serde_json::from_value(value)?)
    }
}

fn first_duplicate_slug(drugs: &[DrugRecord]) -> Option<&str> {
    let mut seen = std::collections::HashSet::new();
    drugs
        .iter()
        .map(|d| d.slug.as_str())
        .find(|slug| !seen.insert(*slug))
}

/// Case-insensitive match against the visible text of a field.
fn contains_ignore_case(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| searchable(h).contains(needle))
}

/// Relevance of a record for a lowercase query; 0 means no match.
fn search_score(drug: &DrugRecord, needle: &str) -> u8 {
    if contains_ignore_case(Some(&drug.drug_name), needle) {
        3
    } else if contains_ignore_case(drug.generic_name.as_deref(), needle) {
        2
    } else if contains_ignore_case(drug.indications_and_usage.as_deref(), needle) {
        1
    } else {
        0
    }
}

#[async_trait]
impl DrugStore for InMemoryDrugStore {
    async fn search_by_text(&self, query: &str) -> std::result::Result<Vec<DrugRecord>, StoreError> {
        let needle = query.trim().to_lowercase();
        let mut scored: Vec<(u8, &DrugRecord)> = self
            .drugs
            .iter()
            .map(|d| (search_score(d, &needle), d))
            .filter(|(score, _)| *score > 0)
            .collect();

        // Stable sort keeps catalog order between equally relevant matches.
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        debug!("Text search '{}' matched {} record(s)", query, scored.len());
        Ok(scored.into_iter().map(|(_, d)| d.clone()).collect())
    }

    async fn get_by_slug(&self, slug: &str) -> std::result::Result<DrugRecord, StoreError> {
        self.find(slug)
            .cloned()
            .ok_or_else(|| StoreError::not_found(slug))
    }

    async fn get_by_condition(
        &self,
        condition: &str,
        page: PageRequest,
    ) -> std::result::Result<Page, StoreError> {
        let needle = condition.trim().to_lowercase();
        let matches: Vec<&DrugRecord> = self
            .drugs
            .iter()
            .filter(|d| contains_ignore_case(d.indications_and_usage.as_deref(), &needle))
            .collect();

        let pagination = Pagination::new(page, matches.len());
        let data = matches
            .into_iter()
            .skip(page.offset())
            .take(page.limit)
            .cloned()
            .collect();

        Ok(Page { data, pagination })
    }

    async fn compare_by_slugs(
        &self,
        slugs: &[String],
    ) -> std::result::Result<Vec<DrugRecord>, StoreError> {
        Ok(slugs
            .iter()
            .filter_map(|slug| self.find(slug).cloned())
            .collect())
    }

    async fn get_related_by_slug(
        &self,
        slug: &str,
    ) -> std::result::Result<Vec<DrugRecord>, StoreError> {
        let source = self.find(slug).ok_or_else(|| StoreError::not_found(slug))?;
        let Some(manufacturer) = source.manufacturer.as_deref() else {
            return Ok(Vec::new());
        };

        Ok(self
            .drugs
            .iter()
            .filter(|d| d.slug != source.slug)
            .filter(|d| d.manufacturer.as_deref() == Some(manufacturer))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::drugs::fixtures::sample_store;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use tokio_test::assert_err;

    #[tokio::test]
    async fn test_search_ranks_name_before_indication() {
        let store = sample_store();
        let results = store.search_by_text("aspirin").await.unwrap();
        let slugs: Vec<_> = results.iter().map(|d| d.slug.as_str()).collect();

        // Name matches come first, then the drug mentioning aspirin in its label.
        assert_eq!(slugs[0], "aspirin-81");
        assert_eq!(slugs[1], "aspirin-325");
        assert!(slugs.contains(&"clopidogrel"));
        assert!(!slugs.contains(&"metformin"));
    }

    #[tokio::test]
    async fn test_get_by_slug_not_found() {
        let store = sample_store();
        let err = store.get_by_slug("ghost-slug").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(ref s) if s == "ghost-slug"));
    }

    #[tokio::test]
    async fn test_get_by_condition_paginates() {
        let store = sample_store();
        let page = store
            .get_by_condition("PAIN", PageRequest::new(1, 1))
            .await
            .unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.pagination.total, 2);
        assert_eq!(page.pagination.total_pages, 2);

        let second = store
            .get_by_condition("pain", PageRequest::new(2, 1))
            .await
            .unwrap();
        assert_ne!(page.data[0].slug, second.data[0].slug);
    }

    #[tokio::test]
    async fn test_search_ignores_markup() {
        let store = sample_store();
        assert!(store.search_by_text("</p>").await.unwrap().is_empty());
        assert!(store.search_by_text("<b>").await.unwrap().is_empty());

        let results = store.search_by_text("minor pain").await.unwrap();
        let slugs: Vec<_> = results.iter().map(|d| d.slug.as_str()).collect();
        assert_eq!(slugs, vec!["aspirin-81"]);
    }

    #[tokio::test]
    async fn test_condition_matches_visible_text() {
        let store = sample_store();
        let page = store
            .get_by_condition("minor pain", PageRequest::new(1, 10))
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 1);
        assert_eq!(page.data[0].slug, "aspirin-81");

        let tags = store
            .get_by_condition("<b>", PageRequest::new(1, 10))
            .await
            .unwrap();
        assert_eq!(tags.pagination.total, 0);

        let closing = store
            .get_by_condition("</p>", PageRequest::new(1, 10))
            .await
            .unwrap();
        assert!(closing.data.is_empty());
    }

    #[tokio::test]
    async fn test_compare_skips_unknown_and_keeps_order() {
        let store = sample_store();
        let slugs = vec![
            "metformin".to_string(),
            "ghost-slug".to_string(),
            "aspirin-81".to_string(),
        ];
        let drugs = store.compare_by_slugs(&slugs).await.unwrap();
        let resolved: Vec<_> = drugs.iter().map(|d| d.slug.as_str()).collect();
        assert_eq!(resolved, vec!["metformin", "aspirin-81"]);
    }

    #[tokio::test]
    async fn test_related_same_manufacturer_excludes_source() {
        let store = sample_store();
        let related = store.get_related_by_slug("aspirin-81").await.unwrap();
        let slugs: Vec<_> = related.iter().map(|d| d.slug.as_str()).collect();
        assert_eq!(slugs, vec!["aspirin-325", "ibuprofen"]);

        assert_err!(store.get_related_by_slug("ghost-slug").await);
    }

    #[test]
    fn test_from_json_accepts_single_object() {
        let store =
            InMemoryDrugStore::from_json_str(r#"{"slug": "solo", "drugName": "Solo"}"#).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_from_json_accepts_results_envelope() {
        let store = InMemoryDrugStore::from_json_str(
            r#"{ "results": [{ "slug": "a", "drugName": "A" }, { "slug": "b", "drugName": "B" }] }"#,
        )
        .unwrap();
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_from_json_accepts_openfda_labels() {
        let json = r#"{
            "meta": { "results": { "skip": 0, "limit": 2, "total": 2 } },
            "results": [
                {
                    "set_id": "7a9b1c2d-1111-2222-3333-444455556666",
                    "openfda": {
                        "brand_name": ["Zestril"],
                        "generic_name": ["LISINOPRIL"],
                        "manufacturer_name": ["Almatica Pharma LLC"]
                    },
                    "indications_and_usage": ["<p>Treatment of <b>hypertension</b></p>"],
                    "warnings_and_cautions": ["<p>Angioedema</p>"]
                },
                { "slug": "metformin", "drugName": "Metformin" }
            ]
        }"#;

        let store = InMemoryDrugStore::from_json_str(json).unwrap();
        assert_eq!(store.len(), 2);

        let zestril = store.get_by_slug("zestril-7a9b1c2d").await.unwrap();
        assert_eq!(zestril.generic_name.as_deref(), Some("LISINOPRIL"));
        assert_eq!(zestril.warnings.as_deref(), Some("<p>Angioedema</p>"));

        let page = store
            .get_by_condition("treatment of hypertension", PageRequest::new(1, 10))
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 1);
    }

    #[test]
    fn test_from_json_rejects_duplicate_slugs() {
        let json = r#"[{"slug": "a", "drugName": "A"}, {"slug": "a", "drugName": "B"}]"#;
        assert_err!(InMemoryDrugStore::from_json_str(json));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"slug": "a", "drugName": "A"}}, {{"slug": "b", "drugName": "B"}}]"#
        )
        .unwrap();

        let store = InMemoryDrugStore::from_file(file.path()).unwrap();
        assert_eq!(store.len(), 2);
        assert!(!store.is_empty());
    }

    #[test]
    fn test_from_file_missing() {
        assert_err!(InMemoryDrugStore::from_file("/nonexistent/drugs-12345.json"));
    }
}
