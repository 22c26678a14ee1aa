//! Core infrastructure shared by every transport.
//!
//! Configuration, the crate error type, the tool server lifecycle, the rmcp
//! server handler and the transport layer.

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod server;
pub mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use lifecycle::{LifecycleState, ServerLifecycle, ServerStatus};
pub use server::McpServer;
pub use transport::{TransportConfig, TransportService};
