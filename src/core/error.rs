//! Crate-level error type.
//!
//! Domain errors (tools, drug store) and infrastructure failures (config,
//! I/O, transport) all convert into [`Error`], so startup code can use `?`
//! across layers. Tool calls never surface this type to clients: they are
//! reported as failure envelopes instead.

use thiserror::Error;

use super::transport::TransportError;
use crate::domains::drugs::StoreError;
use crate::domains::tools::ToolError;

/// A specialized Result type for server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the server.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// Failure reported by the drug data capability.
    #[error("Drug store error: {0}")]
    Store(#[from] StoreError),

    /// Invalid configuration or an inconsistent tool catalog.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The tool server is not in a state that allows the operation.
    #[error("Lifecycle error: {0}")]
    Lifecycle(String),

    /// Internal errors that should not occur under normal operation.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn lifecycle(msg: impl Into<String>) -> Self {
        Self::Lifecycle(msg.into())
    }

    /// Create a new internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_convert() {
        let err: Error = ToolError::unknown_tool("x").into();
        assert_eq!(err.to_string(), "Tool error: Unknown tool: x");

        let err: Error = StoreError::not_found("ghost").into();
        assert!(matches!(err, Error::Store(StoreError::NotFound(_))));
    }

    #[test]
    fn test_config_message() {
        assert_eq!(
            Error::config("Duplicate tool: a").to_string(),
            "Configuration error: Duplicate tool: a"
        );
    }
}
