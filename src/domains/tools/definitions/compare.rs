//! Drug comparison tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::common::{SUMMARY_TEXT_LIMIT, excerpt};
use crate::domains::drugs::{DrugRecord, DrugStore};
use crate::domains::tools::{ContentBlock, SchemaNode, ToolDefinition, ToolError};

/// Fewest drugs a comparison makes sense for.
pub const MIN_COMPARED_DRUGS: usize = 2;

/// Parameters for the comparison tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CompareDrugsParams {
    /// Slugs of the drugs to compare (at least two).
    pub slugs: Vec<String>,
}

/// One row of a comparison table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    pub name: String,
    pub generic_name: Option<String>,
    pub manufacturer: Option<String>,
    pub slug: String,
    pub set_id: Option<String>,
    pub indications: Option<String>,
    pub dosage_forms: Option<String>,
    pub warnings: Option<String>,
}

impl From<&DrugRecord> for ComparisonRow {
    fn from(drug: &DrugRecord) -> Self {
        Self {
            name: drug.drug_name.clone(),
            generic_name: drug.generic_name.clone(),
            manufacturer: drug.manufacturer.clone(),
            slug: drug.slug.clone(),
            set_id: drug.set_id.clone(),
            indications: excerpt(drug.indications_and_usage.as_deref(), SUMMARY_TEXT_LIMIT),
            dosage_forms: excerpt(drug.dosage_forms_and_strengths.as_deref(), SUMMARY_TEXT_LIMIT),
            warnings: excerpt(drug.warnings.as_deref(), SUMMARY_TEXT_LIMIT),
        }
    }
}

/// Compare drugs tool - side-by-side rows for several drugs.
pub struct CompareDrugsTool;

impl CompareDrugsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "compare_drugs";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Compare multiple drugs side by side: names, manufacturers, indications, dosage forms and warnings. Requires at least two drug slugs.";

    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            Self::DESCRIPTION,
            SchemaNode::object().required_property(
                "slugs",
                SchemaNode::array(SchemaNode::string())
                    .describe("Drug slugs to compare")
                    .with_min_items(MIN_COMPARED_DRUGS),
            ),
        )
    }

    #[instrument(skip_all, fields(count = params.slugs.len()))]
    pub async fn execute(
        params: CompareDrugsParams,
        store: &dyn DrugStore,
    ) -> Result<Vec<ContentBlock>, ToolError> {
        if params.slugs.len() < MIN_COMPARED_DRUGS {
            return Err(ToolError::invalid_arguments(format!(
                "At least {MIN_COMPARED_DRUGS} drug slugs are required for comparison"
            )));
        }

        let drugs = store.compare_by_slugs(&params.slugs).await?;
        if drugs.len() < MIN_COMPARED_DRUGS {
            warn!(
                "Only {} of {} slug(s) resolved for comparison",
                drugs.len(),
                params.slugs.len()
            );
            return Err(ToolError::invalid_arguments(format!(
                "At least {MIN_COMPARED_DRUGS} valid drugs are required for comparison, found {}",
                drugs.len()
            )));
        }

        info!("Comparing {} drug(s)", drugs.len());
        let rows: Vec<ComparisonRow> = drugs.iter().map(ComparisonRow::from).collect();
        Ok(vec![ContentBlock::json(&rows)?])
    }
}
