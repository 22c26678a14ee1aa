//! Parameter schemas for tool definitions.
//!
//! A [`SchemaNode`] describes the accepted shape of a tool's arguments. It is
//! advertised to clients as JSON Schema and used by the dispatcher to
//! validate and normalize arguments before any handler runs.

use serde_json::{Map, Value, json};

use super::error::ToolError;

/// Kind of value a schema node accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    Object,
    String,
    Number,
    Array,
    /// A string restricted to a fixed set of values.
    Enum,
}

impl SchemaKind {
    fn json_type(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::String | Self::Enum => "string",
            Self::Number => "number",
            Self::Array => "array",
        }
    }

    fn article(self) -> &'static str {
        match self {
            Self::Object | Self::Array => "an",
            _ => "a",
        }
    }
}

/// Recursive description of an accepted argument shape.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub kind: SchemaKind,
    pub description: Option<String>,
    /// Object properties in declaration order.
    pub properties: Vec<(String, SchemaNode)>,
    pub required: Vec<String>,
    pub items: Option<Box<SchemaNode>>,
    pub enum_values: Vec<String>,
    pub default: Option<Value>,
    /// Advertised only; cardinality is enforced by the handler that needs it.
    pub min_items: Option<usize>,
}

impl SchemaNode {
    fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            description: None,
            properties: Vec::new(),
            required: Vec::new(),
            items: None,
            enum_values: Vec::new(),
            default: None,
            min_items: None,
        }
    }

    pub fn object() -> Self {
        Self::new(SchemaKind::Object)
    }

    pub fn string() -> Self {
        Self::new(SchemaKind::String)
    }

    pub fn number() -> Self {
        Self::new(SchemaKind::Number)
    }

    pub fn array(items: SchemaNode) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::new(SchemaKind::Array)
        }
    }

    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enum_values: values.into_iter().map(Into::into).collect(),
            ..Self::new(SchemaKind::Enum)
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_min_items(mut self, min_items: usize) -> Self {
        self.min_items = Some(min_items);
        self
    }

    /// Add an optional property.
    pub fn property(mut self, name: impl Into<String>, node: SchemaNode) -> Self {
        self.properties.push((name.into(), node));
        self
    }

    /// Add a required property.
    pub fn required_property(mut self, name: impl Into<String>, node: SchemaNode) -> Self {
        let name = name.into();
        self.required.push(name.clone());
        self.properties.push((name, node));
        self
    }

    pub fn property_names(&self) -> Vec<&str> {
        self.properties.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// Render as a JSON Schema object.
    pub fn to_json_schema(&self) -> Map<String, Value> {
        let mut schema = Map::new();
        schema.insert("type".into(), json!(self.kind.json_type()));

        if let Some(description) = &self.description {
            schema.insert("description".into(), json!(description));
        }

        match self.kind {
            SchemaKind::Object => {
                let properties: Map<String, Value> = self
                    .properties
                    .iter()
                    .map(|(name, node)| (name.clone(), Value::Object(node.to_json_schema())))
                    .collect();
                schema.insert("properties".into(), Value::Object(properties));
                if !self.required.is_empty() {
                    schema.insert("required".into(), json!(self.required));
                }
            }
            SchemaKind::Array => {
                if let Some(items) = &self.items {
                    schema.insert("items".into(), Value::Object(items.to_json_schema()));
                }
                if let Some(min_items) = self.min_items {
                    schema.insert("minItems".into(), json!(min_items));
                }
            }
            SchemaKind::Enum => {
                schema.insert("enum".into(), json!(self.enum_values));
            }
            SchemaKind::String | SchemaKind::Number => {}
        }

        if let Some(default) = &self.default {
            schema.insert("default".into(), default.clone());
        }

        schema
    }

    /// Validate arguments against this (object) schema and return them with
    /// declared defaults filled in.
    ///
    /// Required-field presence is checked before any type check, and within
    /// each pass the first failure in declaration order is reported. `null`
    /// counts as absent. Unknown properties are left untouched.
    pub fn validate(&self, arguments: &Value) -> Result<Value, ToolError> {
        self.check_value(arguments, None)?;
        Ok(self.apply_defaults(arguments))
    }

    fn check_value(&self, value: &Value, path: Option<&str>) -> Result<(), ToolError> {
        let conforms = match self.kind {
            SchemaKind::Object => value.is_object(),
            SchemaKind::String | SchemaKind::Enum => value.is_string(),
            SchemaKind::Number => value.is_number(),
            SchemaKind::Array => value.is_array(),
        };
        if !conforms {
            let subject = path.map_or_else(|| "Arguments".to_string(), |p| format!("Field '{p}'"));
            return Err(ToolError::invalid_arguments(format!(
                "{subject} must be {} {}",
                self.kind.article(),
                self.kind.json_type()
            )));
        }

        match (self.kind, value) {
            (SchemaKind::Object, Value::Object(map)) => self.check_object(map, path),
            (SchemaKind::Array, Value::Array(values)) => {
                let Some(items) = &self.items else {
                    return Ok(());
                };
                for (index, item) in values.iter().enumerate() {
                    let item_path = format!("{}[{index}]", path.unwrap_or(""));
                    items.check_value(item, Some(&item_path))?;
                }
                Ok(())
            }
            (SchemaKind::Enum, Value::String(s)) if !self.enum_values.contains(s) => {
                Err(ToolError::invalid_arguments(format!(
                    "Field '{}' must be one of: {}",
                    path.unwrap_or(""),
                    self.enum_values.join(", ")
                )))
            }
            _ => Ok(()),
        }
    }

    fn check_object(&self, map: &Map<String, Value>, path: Option<&str>) -> Result<(), ToolError> {
        let child_path = |name: &str| match path {
            Some(parent) => format!("{parent}.{name}"),
            None => name.to_string(),
        };
        let present = |name: &str| map.get(name).is_some_and(|v| !v.is_null());

        // Declared properties first, in order, then any required names that
        // were never declared as properties.
        let undeclared = self
            .required
            .iter()
            .filter(|r| !self.properties.iter().any(|(name, _)| name == *r));
        let required_in_order = self
            .properties
            .iter()
            .map(|(name, _)| name)
            .filter(|name| self.is_required(name))
            .chain(undeclared);

        for name in required_in_order {
            if !present(name.as_str()) {
                return Err(ToolError::invalid_arguments(format!(
                    "Missing required field: '{}'",
                    child_path(name.as_str())
                )));
            }
        }

        for (name, node) in &self.properties {
            if let Some(value) = map.get(name).filter(|v| !v.is_null()) {
                node.check_value(value, Some(&child_path(name.as_str())))?;
            }
        }

        Ok(())
    }

    fn apply_defaults(&self, value: &Value) -> Value {
        match (self.kind, value) {
            (SchemaKind::Object, Value::Object(map)) => {
                let mut normalized = map.clone();
                for (name, node) in &self.properties {
                    match map.get(name).filter(|v| !v.is_null()) {
                        Some(present) => {
                            normalized.insert(name.clone(), node.apply_defaults(present));
                        }
                        None => {
                            if let Some(default) = &node.default {
                                normalized.insert(name.clone(), default.clone());
                            }
                        }
                    }
                }
                Value::Object(normalized)
            }
            (SchemaKind::Array, Value::Array(values)) => match &self.items {
                Some(items) => Value::Array(values.iter().map(|v| items.apply_defaults(v)).collect()),
                None => value.clone(),
            },
            _ => value.clone(),
        }
    }
}
