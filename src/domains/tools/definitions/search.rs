//! Drug search tool.
//!
//! Full-text search over the drug catalog, best matches first.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use super::common::{DrugSummary, SUMMARY_TEXT_LIMIT, default_limit, validate_limit};
use crate::domains::drugs::DrugStore;
use crate::domains::tools::{ContentBlock, SchemaNode, ToolDefinition, ToolError};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for drug search.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchDrugsParams {
    /// Search text (drug name, generic name or indication).
    pub query: String,

    /// Maximum number of results to return (default: 10, max: 100).
    #[serde(default = "default_limit")]
    pub limit: usize,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Search drugs tool - ranked drug summaries for a text query.
pub struct SearchDrugsTool;

impl SearchDrugsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "search_drugs";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Search for drugs by name, generic name or indication. Returns a ranked list of drug summaries with manufacturer, identifiers and a short indication excerpt.";

    /// Create the registry definition for this tool.
    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            Self::DESCRIPTION,
            SchemaNode::object()
                .required_property(
                    "query",
                    SchemaNode::string()
                        .describe("Search query (drug name, generic name or condition)"),
                )
                .property(
                    "limit",
                    SchemaNode::number()
                        .describe("Maximum number of results (default: 10)")
                        .with_default(json!(default_limit())),
                ),
        )
    }

    /// Execute the tool logic.
    #[instrument(skip_all, fields(query = %params.query))]
    pub async fn execute(
        params: SearchDrugsParams,
        store: &dyn DrugStore,
    ) -> Result<Vec<ContentBlock>, ToolError> {
        let limit = validate_limit(params.limit);
        info!("Searching drugs matching '{}' (limit {})", params.query, limit);

        let drugs = store.search_by_text(&params.query).await?;
        let results: Vec<DrugSummary> = drugs
            .iter()
            .take(limit)
            .map(|drug| DrugSummary::from_record(drug, SUMMARY_TEXT_LIMIT))
            .collect();

        info!("Found {} drug(s) for '{}'", results.len(), params.query);
        Ok(vec![ContentBlock::json(&results)?])
    }
}
