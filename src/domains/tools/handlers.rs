//! Tool handlers module.
//!
//! Handlers form a closed set: one [`ToolHandler`] variant per tool. A
//! handler first binds validated JSON arguments to its typed parameter
//! struct ([`ToolHandler::bind`]), then the resulting [`ToolCall`] runs
//! against the drug data capability.

use std::collections::{BTreeSet, HashMap};

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::definitions::{
    CompareDrugsParams, CompareDrugsTool, FindDrugsByConditionParams, FindDrugsByConditionTool,
    GetDrugDetailsParams, GetDrugDetailsTool, GetDrugInteractionsParams, GetDrugInteractionsTool,
    GetRelatedDrugsParams, GetRelatedDrugsTool, SearchDrugsParams, SearchDrugsTool,
};
use super::error::ToolError;
use super::registry::{ToolDefinition, ToolRegistry};
use super::result::ContentBlock;
use crate::core::{Error, Result};
use crate::domains::drugs::DrugStore;

/// The handler backing one tool name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolHandler {
    SearchDrugs,
    GetDrugDetails,
    FindDrugsByCondition,
    GetDrugInteractions,
    CompareDrugs,
    GetRelatedDrugs,
}

/// A tool invocation with typed, validated parameters.
#[derive(Debug, Clone)]
pub enum ToolCall {
    SearchDrugs(SearchDrugsParams),
    GetDrugDetails(GetDrugDetailsParams),
    FindDrugsByCondition(FindDrugsByConditionParams),
    GetDrugInteractions(GetDrugInteractionsParams),
    CompareDrugs(CompareDrugsParams),
    GetRelatedDrugs(GetRelatedDrugsParams),
}

fn parse<P: DeserializeOwned>(arguments: Value) -> std::result::Result<P, ToolError> {
    serde_json::from_value(arguments).map_err(|e| ToolError::invalid_arguments(e.to_string()))
}

/// Property and required-field names schemars derives for a parameter type.
fn derived_fields<P: JsonSchema>() -> (BTreeSet<String>, BTreeSet<String>) {
    let schema = serde_json::to_value(schemars::schema_for!(P)).unwrap_or_default();
    let properties = schema
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| props.keys().cloned().collect())
        .unwrap_or_default();
    let required = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| {
            names
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();
    (properties, required)
}

impl ToolHandler {
    /// Every handler, in catalog order.
    pub const ALL: [ToolHandler; 6] = [
        Self::SearchDrugs,
        Self::GetDrugDetails,
        Self::FindDrugsByCondition,
        Self::GetDrugInteractions,
        Self::CompareDrugs,
        Self::GetRelatedDrugs,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::SearchDrugs => SearchDrugsTool::NAME,
            Self::GetDrugDetails => GetDrugDetailsTool::NAME,
            Self::FindDrugsByCondition => FindDrugsByConditionTool::NAME,
            Self::GetDrugInteractions => GetDrugInteractionsTool::NAME,
            Self::CompareDrugs => CompareDrugsTool::NAME,
            Self::GetRelatedDrugs => GetRelatedDrugsTool::NAME,
        }
    }

    /// The registry definition this handler is written against.
    pub fn definition(self) -> ToolDefinition {
        match self {
            Self::SearchDrugs => SearchDrugsTool::definition(),
            Self::GetDrugDetails => GetDrugDetailsTool::definition(),
            Self::FindDrugsByCondition => FindDrugsByConditionTool::definition(),
            Self::GetDrugInteractions => GetDrugInteractionsTool::definition(),
            Self::CompareDrugs => CompareDrugsTool::definition(),
            Self::GetRelatedDrugs => GetRelatedDrugsTool::definition(),
        }
    }

    /// Fields of the typed parameter struct, as `(properties, required)`.
    fn parameter_fields(self) -> (BTreeSet<String>, BTreeSet<String>) {
        match self {
            Self::SearchDrugs => derived_fields::<SearchDrugsParams>(),
            Self::GetDrugDetails => derived_fields::<GetDrugDetailsParams>(),
            Self::FindDrugsByCondition => derived_fields::<FindDrugsByConditionParams>(),
            Self::GetDrugInteractions => derived_fields::<GetDrugInteractionsParams>(),
            Self::CompareDrugs => derived_fields::<CompareDrugsParams>(),
            Self::GetRelatedDrugs => derived_fields::<GetRelatedDrugsParams>(),
        }
    }

    /// Bind validated arguments to this handler's parameter type.
    pub fn bind(self, arguments: Value) -> std::result::Result<ToolCall, ToolError> {
        Ok(match self {
            Self::SearchDrugs => ToolCall::SearchDrugs(parse(arguments)?),
            Self::GetDrugDetails => ToolCall::GetDrugDetails(parse(arguments)?),
            Self::FindDrugsByCondition => ToolCall::FindDrugsByCondition(parse(arguments)?),
            Self::GetDrugInteractions => ToolCall::GetDrugInteractions(parse(arguments)?),
            Self::CompareDrugs => ToolCall::CompareDrugs(parse(arguments)?),
            Self::GetRelatedDrugs => ToolCall::GetRelatedDrugs(parse(arguments)?),
        })
    }
}

impl ToolCall {
    /// Run the handler body.
    pub async fn execute(
        self,
        store: &dyn DrugStore,
    ) -> std::result::Result<Vec<ContentBlock>, ToolError> {
        match self {
            Self::SearchDrugs(params) => SearchDrugsTool::execute(params, store).await,
            Self::GetDrugDetails(params) => GetDrugDetailsTool::execute(params, store).await,
            Self::FindDrugsByCondition(params) => {
                FindDrugsByConditionTool::execute(params, store).await
            }
            Self::GetDrugInteractions(params) => {
                GetDrugInteractionsTool::execute(params, store).await
            }
            Self::CompareDrugs(params) => CompareDrugsTool::execute(params, store).await,
            Self::GetRelatedDrugs(params) => GetRelatedDrugsTool::execute(params, store).await,
        }
    }
}

/// Handlers keyed by tool name.
#[derive(Debug, Clone)]
pub struct HandlerSet {
    handlers: HashMap<&'static str, ToolHandler>,
}

impl HandlerSet {
    /// Build a handler set. Each tool name may have only one handler.
    pub fn new(handlers: impl IntoIterator<Item = ToolHandler>) -> Result<Self> {
        let mut map = HashMap::new();
        for handler in handlers {
            if map.insert(handler.name(), handler).is_some() {
                return Err(Error::config(format!(
                    "Duplicate handler for tool: {}",
                    handler.name()
                )));
            }
        }
        Ok(Self { handlers: map })
    }

    /// Every handler.
    pub fn standard() -> Self {
        Self {
            handlers: ToolHandler::ALL.iter().map(|h| (h.name(), *h)).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<ToolHandler> {
        self.handlers.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Check that registry and handlers describe the same tools.
    ///
    /// Every definition needs a handler, every handler needs a definition,
    /// and each declared schema must expose exactly the fields (and required
    /// fields) of the handler's parameter type.
    pub fn verify_against(&self, registry: &ToolRegistry) -> Result<()> {
        for definition in registry.list() {
            let Some(handler) = self.get(&definition.name) else {
                return Err(Error::config(format!(
                    "Tool '{}' is declared but has no handler",
                    definition.name
                )));
            };

            let schema = &definition.parameter_schema;
            let declared: BTreeSet<String> =
                schema.property_names().into_iter().map(String::from).collect();
            let declared_required: BTreeSet<String> = schema.required.iter().cloned().collect();
            let (properties, required) = handler.parameter_fields();

            if declared != properties || declared_required != required {
                return Err(Error::config(format!(
                    "Tool '{}' schema declares {:?} (required {:?}) but its handler accepts {:?} (required {:?})",
                    definition.name, declared, declared_required, properties, required
                )));
            }
        }

        let mut undeclared: Vec<&str> = self
            .handlers
            .keys()
            .copied()
            .filter(|name| !registry.contains(name))
            .collect();
        undeclared.sort_unstable();
        if let Some(name) = undeclared.first() {
            return Err(Error::config(format!(
                "Handler '{name}' has no tool definition"
            )));
        }

        Ok(())
    }
}
