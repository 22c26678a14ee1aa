//! Mapping of openFDA drug label records.
//!
//! openFDA labels (`https://api.fda.gov/drug/label.json`) carry identifiers in
//! a nested `openfda` object whose fields are arrays, and every label section
//! as an array of HTML or text paragraphs. There is no slug; one is derived
//! from the brand name and the label set id.

use serde::{Deserialize, Deserializer};

use super::model::DrugRecord;
use crate::core::{Error, Result};

/// Characters of the set id appended to derived slugs.
const SET_ID_SUFFIX_LEN: usize = 8;

/// Whether a JSON record looks like an openFDA label rather than a catalog
/// record.
pub fn is_label(value: &serde_json::Value) -> bool {
    value.get("slug").is_none()
        && (value.get("openfda").is_some_and(|v| v.is_object()) || value.get("set_id").is_some())
}

#[derive(Debug, Default, Deserialize)]
pub struct OpenFdaLabel {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub set_id: Option<String>,

    #[serde(default)]
    pub openfda: OpenFdaFields,

    #[serde(default, deserialize_with = "paragraphs")]
    pub indications_and_usage: Vec<String>,

    #[serde(default, deserialize_with = "paragraphs")]
    pub dosage_and_administration: Vec<String>,

    #[serde(default, deserialize_with = "paragraphs")]
    pub dosage_forms_and_strengths: Vec<String>,

    #[serde(default, deserialize_with = "paragraphs")]
    pub boxed_warning: Vec<String>,

    #[serde(default, deserialize_with = "paragraphs")]
    pub warnings_and_cautions: Vec<String>,

    #[serde(default, deserialize_with = "paragraphs")]
    pub warnings: Vec<String>,

    #[serde(default, deserialize_with = "paragraphs")]
    pub adverse_reactions: Vec<String>,

    #[serde(default, deserialize_with = "paragraphs")]
    pub contraindications: Vec<String>,

    #[serde(default, deserialize_with = "paragraphs")]
    pub clinical_pharmacology: Vec<String>,

    #[serde(default, deserialize_with = "paragraphs")]
    pub spl_product_data_elements: Vec<String>,
}

/// The harmonized `openfda` block.
#[derive(Debug, Default, Deserialize)]
pub struct OpenFdaFields {
    #[serde(default, deserialize_with = "paragraphs")]
    pub brand_name: Vec<String>,

    #[serde(default, deserialize_with = "paragraphs")]
    pub generic_name: Vec<String>,

    #[serde(default, deserialize_with = "paragraphs")]
    pub manufacturer_name: Vec<String>,
}

/// Sections are arrays in openFDA exports but plain strings in some dumps.
fn paragraphs<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
    })
}

fn first(values: &[String]) -> Option<String> {
    values
        .iter()
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

fn joined<'a>(sections: impl IntoIterator<Item = &'a [String]>) -> Option<String> {
    let parts: Vec<&str> = sections
        .into_iter()
        .flatten()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect();
    (!parts.is_empty()).then(|| parts.join("\n"))
}

/// Lowercase ASCII words joined by single hyphens.
pub fn slugify(text: &str) -> String {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

impl OpenFdaLabel {
    /// Convert into a catalog record.
    ///
    /// Fails when the label names no brand or generic name, since neither a
    /// display name nor a slug can be built.
    pub fn into_record(self) -> Result<DrugRecord> {
        let set_id = self.set_id.clone().or_else(|| self.id.clone());
        let generic_name = first(&self.openfda.generic_name);
        let drug_name = first(&self.openfda.brand_name)
            .or_else(|| generic_name.clone())
            .ok_or_else(|| {
                Error::config(format!(
                    "openFDA label {} has no brand or generic name",
                    set_id.as_deref().unwrap_or("<unknown>")
                ))
            })?;

        let mut slug = slugify(&drug_name);
        if let Some(set_id) = set_id.as_deref() {
            let suffix = slugify(set_id);
            let suffix: String = suffix.chars().take(SET_ID_SUFFIX_LEN).collect();
            if !suffix.is_empty() {
                slug = format!("{slug}-{suffix}");
            }
        }

        Ok(DrugRecord {
            slug,
            drug_name,
            generic_name,
            manufacturer: first(&self.openfda.manufacturer_name),
            set_id,
            title: first(&self.spl_product_data_elements),
            indications_and_usage: joined([self.indications_and_usage.as_slice()]),
            dosage_and_administration: joined([self.dosage_and_administration.as_slice()]),
            dosage_forms_and_strengths: joined([self.dosage_forms_and_strengths.as_slice()]),
            warnings: joined([
                self.boxed_warning.as_slice(),
                self.warnings_and_cautions.as_slice(),
                self.warnings.as_slice(),
            ]),
            adverse_reactions: joined([self.adverse_reactions.as_slice()]),
            contraindications: joined([self.contraindications.as_slice()]),
            clinical_pharmacology: joined([self.clinical_pharmacology.as_slice()]),
        })
    }
}

/// Parse one openFDA label value into a catalog record.
pub fn record_from_label(value: serde_json::Value) -> Result<DrugRecord> {
    serde_json::from_value::<OpenFdaLabel>(value)?.into_record()
}
