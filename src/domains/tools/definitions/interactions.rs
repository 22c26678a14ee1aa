//! Drug interactions tool.
//!
//! Reports the safety sections of a label. Missing sections are spelled out
//! explicitly so callers never have to handle `null`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::common::clean;
use crate::domains::drugs::DrugStore;
use crate::domains::tools::{ContentBlock, SchemaNode, ToolDefinition, ToolError};

pub const NO_CONTRAINDICATIONS: &str = "No contraindications data available";
pub const NO_WARNINGS: &str = "No warnings data available";
pub const NO_ADVERSE_REACTIONS: &str = "No adverse reactions data available";

/// Parameters for the interactions tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetDrugInteractionsParams {
    /// Drug slug identifier.
    pub slug: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugInteractions {
    pub name: String,
    pub slug: String,
    pub contraindications: String,
    pub warnings: String,
    pub adverse_reactions: String,
}

/// Interactions tool - contraindications, warnings and adverse reactions.
pub struct GetDrugInteractionsTool;

impl GetDrugInteractionsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_drug_interactions";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get interaction and safety information for a drug: contraindications, warnings and adverse reactions.";

    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            Self::DESCRIPTION,
            SchemaNode::object().required_property(
                "slug",
                SchemaNode::string().describe("Drug slug identifier"),
            ),
        )
    }

    #[instrument(skip_all, fields(slug = %params.slug))]
    pub async fn execute(
        params: GetDrugInteractionsParams,
        store: &dyn DrugStore,
    ) -> Result<Vec<ContentBlock>, ToolError> {
        info!("Fetching interaction data for drug: {}", params.slug);
        let drug = store.get_by_slug(&params.slug).await?;

        let or_missing =
            |text: Option<&str>, missing: &str| clean(text).unwrap_or_else(|| missing.to_string());

        let interactions = DrugInteractions {
            name: drug.drug_name.clone(),
            slug: drug.slug.clone(),
            contraindications: or_missing(drug.contraindications.as_deref(), NO_CONTRAINDICATIONS),
            warnings: or_missing(drug.warnings.as_deref(), NO_WARNINGS),
            adverse_reactions: or_missing(drug.adverse_reactions.as_deref(), NO_ADVERSE_REACTIONS),
        };
        Ok(vec![ContentBlock::json(&interactions)?])
    }
}
