//! Drug data records as served by the data-access capability.
//!
//! Label sections (indications, warnings, ...) usually carry HTML markup
//! straight from the published drug label. They are stored as-is; the tools
//! strip markup when building their output.

use serde::{Deserialize, Serialize};

/// A single drug label record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugRecord {
    /// URL-safe unique key of the drug.
    pub slug: String,

    /// Brand or display name.
    pub drug_name: String,

    #[serde(default)]
    pub generic_name: Option<String>,

    #[serde(default)]
    pub manufacturer: Option<String>,

    /// Label set identifier.
    #[serde(default)]
    pub set_id: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub indications_and_usage: Option<String>,

    #[serde(default)]
    pub dosage_and_administration: Option<String>,

    #[serde(default)]
    pub dosage_forms_and_strengths: Option<String>,

    #[serde(default)]
    pub warnings: Option<String>,

    #[serde(default)]
    pub adverse_reactions: Option<String>,

    #[serde(default)]
    pub contraindications: Option<String>,

    #[serde(default)]
    pub clinical_pharmacology: Option<String>,
}

/// Pagination request for condition lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: usize,
    pub limit: usize,
}

impl PageRequest {
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Number of records to skip for this page.
    pub fn offset(&self) -> usize {
        (self.page - 1) * self.limit
    }
}

/// Pagination metadata returned alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl Pagination {
    pub fn new(request: PageRequest, total: usize) -> Self {
        Self {
            page: request.page,
            limit: request.limit,
            total,
            total_pages: total.div_ceil(request.limit),
        }
    }
}

/// One page of drug records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub data: Vec<DrugRecord>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_from_camel_case_json() {
        let json = r#"{
            "slug": "aspirin-81",
            "drugName": "Aspirin",
            "genericName": "acetylsalicylic acid",
            "indicationsAndUsage": "<p>Pain relief</p>"
        }"#;
        let record: DrugRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.slug, "aspirin-81");
        assert_eq!(record.generic_name.as_deref(), Some("acetylsalicylic acid"));
        assert!(record.manufacturer.is_none());
    }

    #[test]
    fn test_page_request_offset() {
        assert_eq!(PageRequest::new(1, 10).offset(), 0);
        assert_eq!(PageRequest::new(3, 10).offset(), 20);
        // page 0 is normalized to the first page
        assert_eq!(PageRequest::new(0, 10).page, 1);
    }

    #[test]
    fn test_pagination_total_pages() {
        let pagination = Pagination::new(PageRequest::new(1, 10), 21);
        assert_eq!(pagination.total_pages, 3);
        assert_eq!(Pagination::new(PageRequest::new(1, 10), 0).total_pages, 0);
    }
}
