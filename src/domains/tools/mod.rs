//! Tools domain module.
//!
//! Tools are the operations MCP clients invoke against the drug catalog.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `schema.rs` - Parameter schemas and argument validation
//! - `registry.rs` - Tool definitions advertised to clients
//! - `handlers.rs` - Closed set of handlers bound to tool names
//! - `dispatcher.rs` - Routes calls to handlers and builds result envelopes
//! - `result.rs` - Result envelope and content blocks
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` with params, `definition()` and `execute()`
//! 2. Export it in `definitions/mod.rs`
//! 3. Add a variant to `ToolHandler` and `ToolCall` in `handlers.rs`
//!
//! The registry is derived from `ToolHandler::ALL`, and the dispatcher
//! refuses to start if a definition and its handler disagree.

pub mod definitions;
mod dispatcher;
mod error;
mod handlers;
mod registry;
mod result;
mod schema;

pub use dispatcher::{Dispatcher, ToolCallRequest};
pub use error::{ErrorKind, ToolError};
pub use handlers::{HandlerSet, ToolCall, ToolHandler};
pub use registry::{ToolDefinition, ToolRegistry};
pub use result::{ContentBlock, Outcome, Terminal, ToolCallResult};
pub use schema::{SchemaKind, SchemaNode};
