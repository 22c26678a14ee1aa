//! Related drugs tool.
//!
//! Drugs are related when they share the source drug's manufacturer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument};

use super::common::{SUMMARY_TEXT_LIMIT, excerpt, validate_limit};
use crate::domains::drugs::{DrugRecord, DrugStore};
use crate::domains::tools::{ContentBlock, SchemaNode, ToolDefinition, ToolError};

pub const SAME_MANUFACTURER: &str = "Same manufacturer";

fn default_related_limit() -> usize {
    5
}

/// Parameters for the related drugs tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetRelatedDrugsParams {
    /// Slug of the source drug.
    pub slug: String,

    /// Maximum number of related drugs (default: 5, max: 100).
    #[serde(default = "default_related_limit")]
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedDrug {
    pub name: String,
    pub generic_name: Option<String>,
    pub manufacturer: Option<String>,
    pub slug: String,
    pub relationship: &'static str,
    pub indications: Option<String>,
}

impl From<&DrugRecord> for RelatedDrug {
    fn from(drug: &DrugRecord) -> Self {
        Self {
            name: drug.drug_name.clone(),
            generic_name: drug.generic_name.clone(),
            manufacturer: drug.manufacturer.clone(),
            slug: drug.slug.clone(),
            relationship: SAME_MANUFACTURER,
            indications: excerpt(drug.indications_and_usage.as_deref(), SUMMARY_TEXT_LIMIT),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedDrugs {
    pub source_drug: String,
    pub manufacturer: Option<String>,
    pub related: Vec<RelatedDrug>,
}

/// Related drugs tool.
pub struct GetRelatedDrugsTool;

impl GetRelatedDrugsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_related_drugs";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Find drugs related to a given drug, such as other products from the same manufacturer.";

    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            Self::DESCRIPTION,
            SchemaNode::object()
                .required_property(
                    "slug",
                    SchemaNode::string().describe("Drug slug identifier"),
                )
                .property(
                    "limit",
                    SchemaNode::number()
                        .describe("Maximum number of related drugs (default: 5)")
                        .with_default(json!(default_related_limit())),
                ),
        )
    }

    #[instrument(skip_all, fields(slug = %params.slug))]
    pub async fn execute(
        params: GetRelatedDrugsParams,
        store: &dyn DrugStore,
    ) -> Result<Vec<ContentBlock>, ToolError> {
        let limit = validate_limit(params.limit);
        let source = store.get_by_slug(&params.slug).await?;
        let related = store.get_related_by_slug(&params.slug).await?;

        info!(
            "Found {} drug(s) related to {} (limit {})",
            related.len(),
            params.slug,
            limit
        );

        let results = RelatedDrugs {
            source_drug: source.drug_name,
            manufacturer: source.manufacturer,
            related: related.iter().take(limit).map(RelatedDrug::from).collect(),
        };
        Ok(vec![ContentBlock::json(&results)?])
    }
}
