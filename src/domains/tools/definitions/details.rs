//! Drug details tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::common::clean;
use crate::domains::drugs::{DrugRecord, DrugStore};
use crate::domains::tools::{ContentBlock, SchemaNode, ToolDefinition, ToolError};

/// Parameters for the drug details tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetDrugDetailsParams {
    /// Drug slug, as returned by the search tools.
    pub slug: String,
}

/// Full label information for one drug, markup stripped.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugDetails {
    pub name: String,
    pub generic_name: Option<String>,
    pub manufacturer: Option<String>,
    pub slug: String,
    pub set_id: Option<String>,
    pub title: Option<String>,
    pub indications: Option<String>,
    pub dosage: Option<String>,
    pub warnings: Option<String>,
    pub adverse_reactions: Option<String>,
    pub contraindications: Option<String>,
    pub clinical_pharmacology: Option<String>,
}

impl From<&DrugRecord> for DrugDetails {
    fn from(drug: &DrugRecord) -> Self {
        Self {
            name: drug.drug_name.clone(),
            generic_name: clean(drug.generic_name.as_deref()),
            manufacturer: clean(drug.manufacturer.as_deref()),
            slug: drug.slug.clone(),
            set_id: drug.set_id.clone(),
            title: clean(drug.title.as_deref()),
            indications: clean(drug.indications_and_usage.as_deref()),
            dosage: clean(drug.dosage_and_administration.as_deref()),
            warnings: clean(drug.warnings.as_deref()),
            adverse_reactions: clean(drug.adverse_reactions.as_deref()),
            contraindications: clean(drug.contraindications.as_deref()),
            clinical_pharmacology: clean(drug.clinical_pharmacology.as_deref()),
        }
    }
}

/// Drug details tool - the full record for one slug.
pub struct GetDrugDetailsTool;

impl GetDrugDetailsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_drug_details";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get detailed label information for a drug: indications, dosage, warnings, adverse reactions, contraindications and clinical pharmacology.";

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
        params: GetDrugDetailsParams,
        store: &dyn DrugStore,
    ) -> Result<Vec<ContentBlock>, ToolError> {
        info!("Fetching details for drug: {}", params.slug);
        let drug = store.get_by_slug(&params.slug).await?;
        Ok(vec![ContentBlock::json(&DrugDetails::from(&drug))?])
    }
}
