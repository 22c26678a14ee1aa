//! Tool call envelopes.
//!
//! Every call, whatever happens during routing or execution, ends in exactly
//! one [`ToolCallResult`].

use serde::{Deserialize, Serialize};

use super::error::{ErrorKind, ToolError};

/// A unit of result payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Serialize a value as a text block of JSON indented by two spaces.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, ToolError> {
        Ok(Self::text(serde_json::to_string_pretty(value)?))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
        }
    }
}

/// Whether a call succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
}

/// The state a call finished in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terminal {
    Success,
    /// Rejected before validation: no such tool.
    UnknownTool,
    /// Rejected before the handler ran.
    BadArguments,
    /// The handler ran and returned an error.
    HandlerError,
}

/// The outbound envelope of a single tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallResult {
    pub outcome: Outcome,
    pub payload: Vec<ContentBlock>,
    pub error: Option<ToolError>,
    pub terminal: Terminal,
}

impl ToolCallResult {
    pub fn success(payload: Vec<ContentBlock>) -> Self {
        Self {
            outcome: Outcome::Success,
            payload,
            error: None,
            terminal: Terminal::Success,
        }
    }

    /// Wrap an error. The payload carries the same message as
    /// [`error_message`](Self::error_message).
    pub fn failure(error: ToolError, terminal: Terminal) -> Self {
        Self {
            outcome: Outcome::Failure,
            payload: vec![ContentBlock::text(format!("Error: {error}"))],
            error: Some(error),
            terminal,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(ToolError::kind)
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| format!("Error: {e}"))
    }

    /// Text of the first payload block.
    pub fn first_text(&self) -> Option<&str> {
        self.payload.first().and_then(ContentBlock::as_text)
    }

    /// Wire form used by the HTTP transport: `{ content, isError }`.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "content": self.payload,
            "isError": !self.is_success(),
        })
    }
}
