//! Tool-specific error types.

use thiserror::Error;

use crate::domains::drugs::StoreError;

/// Errors that can occur while routing or executing a tool call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    /// The requested tool is not in the registry.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The arguments do not satisfy the tool's contract.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// A referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The data-access capability failed.
    #[error("Upstream failure: {0}")]
    UpstreamFailure(String),

    /// An unexpected condition inside the server.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error category, for matching on failures without comparing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnknownTool,
    InvalidArguments,
    NotFound,
    UpstreamFailure,
    Internal,
}

impl ToolError {
    /// Create a new "unknown tool" error.
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new "not found" error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new "upstream failure" error.
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::UpstreamFailure(msg.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownTool(_) => ErrorKind::UnknownTool,
            Self::InvalidArguments(_) => ErrorKind::InvalidArguments,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::UpstreamFailure(_) => ErrorKind::UpstreamFailure,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<StoreError> for ToolError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(slug) => Self::not_found(format!("Drug not found: {slug}")),
            other => Self::upstream(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(format!("Failed to serialize tool output: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_not_found_maps_to_not_found() {
        let err: ToolError = StoreError::not_found("ghost").into();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Drug not found: ghost");
    }

    #[test]
    fn test_store_backend_maps_to_upstream() {
        let err: ToolError = StoreError::backend("connection refused").into();
        assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_store_decode_maps_to_upstream() {
        let err: ToolError = StoreError::Decode("bad json".into()).into();
        assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
    }
}
