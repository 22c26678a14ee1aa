//! Domains module containing business logic organized by bounded contexts.
//!
//! - **drugs**: read-only drug data capability and its backends
//! - **tools**: tool catalog, handlers and dispatch

pub mod drugs;
pub mod tools;
