//! Common utilities shared across the drug tools.
//!
//! Label sections arrive as HTML fragments. Tools reduce them to visible
//! text and cut long sections to a fixed number of characters; the cut is
//! literal (no ellipsis, no word-boundary search) because callers parse these
//! strings.

use serde::Serialize;

use crate::domains::drugs::{DrugRecord, strip_markup};

/// Characters kept from label sections in summaries and comparisons.
pub const SUMMARY_TEXT_LIMIT: usize = 200;

/// Characters kept from indications in condition lookups.
pub const CONDITION_TEXT_LIMIT: usize = 300;

/// Keep at most `max_chars` characters.
pub fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Strip an optional label section; blank sections become `None`.
pub fn clean(text: Option<&str>) -> Option<String> {
    text.map(strip_markup).filter(|s| !s.is_empty())
}

/// Strip and truncate an optional label section.
pub fn excerpt(text: Option<&str>, max_chars: usize) -> Option<String> {
    clean(text).map(|s| truncate(&s, max_chars))
}

/// Default limit for list results.
pub fn default_limit() -> usize {
    10
}

/// Validate and clamp limit to allowed range (1-100).
pub fn validate_limit(limit: usize) -> usize {
    limit.clamp(1, 100)
}

/// A short description of a drug used in result lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugSummary {
    pub name: String,
    pub generic_name: Option<String>,
    pub manufacturer: Option<String>,
    pub slug: String,
    pub set_id: Option<String>,
    pub indications: Option<String>,
}

impl DrugSummary {
    /// Summarize a record, cutting indications to `max_chars`.
    pub fn from_record(drug: &DrugRecord, max_chars: usize) -> Self {
        Self {
            name: drug.drug_name.clone(),
            generic_name: drug.generic_name.clone(),
            manufacturer: drug.manufacturer.clone(),
            slug: drug.slug.clone(),
            set_id: drug.set_id.clone(),
            indications: excerpt(drug.indications_and_usage.as_deref(), max_chars),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_is_literal() {
        let text = "a".repeat(250);
        let cut = truncate(&text, 200);
        assert_eq!(cut.chars().count(), 200);
        assert!(!cut.ends_with("..."));
        assert_eq!(truncate("short", 200), "short");
    }

    #[test]
    fn test_truncate_counts_characters() {
        // Multi-byte characters must not be split.
        assert_eq!(truncate("déjà vu", 4), "déjà");
    }

    #[test]
    fn test_clean_blank_is_none() {
        assert_eq!(clean(Some("<p> </p>")), None);
        assert_eq!(clean(None), None);
        assert_eq!(clean(Some("<i>x</i>")).as_deref(), Some("x"));
    }

    #[test]
    fn test_excerpt_counts_decoded_characters() {
        let section = format!("<p>{}</p>", "&amp;".repeat(250));
        let cut = excerpt(Some(section.as_str()), SUMMARY_TEXT_LIMIT).unwrap();
        assert_eq!(cut, "&".repeat(SUMMARY_TEXT_LIMIT));

        assert_eq!(excerpt(Some("a &amp; b&nbsp;&#8804; c"), 5).as_deref(), Some("a & b"));
    }

    #[test]
    fn test_validate_limit() {
        assert_eq!(validate_limit(10), 10);
        assert_eq!(validate_limit(0), 1);
        assert_eq!(validate_limit(200), 100);
        assert_eq!(validate_limit(50), 50);
    }
}
