//! Find drugs by condition tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument};

use super::common::{CONDITION_TEXT_LIMIT, DrugSummary, default_limit, validate_limit};
use crate::domains::drugs::{DrugStore, PageRequest};
use crate::domains::tools::{ContentBlock, SchemaNode, ToolDefinition, ToolError};

/// Parameters for condition lookups.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FindDrugsByConditionParams {
    /// Medical condition, e.g. "hypertension".
    pub condition: String,

    /// Maximum number of results to return (default: 10, max: 100).
    #[serde(default = "default_limit")]
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConditionResults {
    pub condition: String,
    /// Number of matching drugs across all pages.
    pub total: usize,
    pub drugs: Vec<DrugSummary>,
}

/// Condition lookup tool - the first page of drugs indicated for a condition.
pub struct FindDrugsByConditionTool;

impl FindDrugsByConditionTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "find_drugs_by_condition";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Find drugs indicated for a medical condition. Returns matching drug summaries and the total number of matches.";

    /// Only the first page is ever requested; `limit` sizes it.
    const PAGE: usize = 1;

    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            Self::DESCRIPTION,
            SchemaNode::object()
                .required_property(
                    "condition",
                    SchemaNode::string().describe("Medical condition or symptom"),
                )
                .property(
                    "limit",
                    SchemaNode::number()
                        .describe("Maximum number of results (default: 10)")
                        .with_default(json!(default_limit())),
                ),
        )
    }

    #[instrument(skip_all, fields(condition = %params.condition))]
    pub async fn execute(
        params: FindDrugsByConditionParams,
        store: &dyn DrugStore,
    ) -> Result<Vec<ContentBlock>, ToolError> {
        let request = PageRequest::new(Self::PAGE, validate_limit(params.limit));
        let page = store.get_by_condition(&params.condition, request).await?;

        info!(
            "Condition '{}' matched {} drug(s), returning {}",
            params.condition,
            page.pagination.total,
            page.data.len()
        );

        let results = ConditionResults {
            condition: params.condition,
            total: page.pagination.total,
            drugs: page
                .data
                .iter()
                .map(|drug| DrugSummary::from_record(drug, CONDITION_TEXT_LIMIT))
                .collect(),
        };
        Ok(vec![ContentBlock::json(&results)?])
    }
}
