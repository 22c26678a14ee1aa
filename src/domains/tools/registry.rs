//! Tool Registry - the immutable catalog of tool definitions.
//!
//! The registry is built once when the server starts and only read
//! afterwards. The advertised tool list stays the same for the whole server
//! lifetime.

use std::collections::HashSet;

use serde_json::Value;

use super::handlers::ToolHandler;
use super::schema::SchemaNode;
use crate::core::{Error, Result};

/// A named, schema-described callable operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameter_schema: SchemaNode,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameter_schema: SchemaNode,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameter_schema,
        }
    }

    /// Advertised form: `{ name, description, inputSchema }`.
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": Value::Object(self.parameter_schema.to_json_schema()),
        })
    }
}

/// Tool registry - the catalog of all available tools, in a stable order.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    definitions: Vec<ToolDefinition>,
}

impl ToolRegistry {
    /// Build a registry. Tool names must be unique.
    pub fn new(definitions: Vec<ToolDefinition>) -> Result<Self> {
        let mut seen = HashSet::new();
        for definition in &definitions {
            if !seen.insert(definition.name.as_str()) {
                return Err(Error::config(format!(
                    "Duplicate tool definition: {}",
                    definition.name
                )));
            }
        }
        Ok(Self { definitions })
    }

    /// The drug tool catalog.
    pub fn standard() -> Self {
        Self {
            definitions: ToolHandler::ALL
                .iter()
                .map(|handler| handler.definition())
                .collect(),
        }
    }

    /// All definitions, in registration order.
    pub fn list(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    /// Look up a definition. `None` means the tool never existed.
    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Get all tool names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.definitions.iter().map(|d| d.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
