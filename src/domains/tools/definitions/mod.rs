//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

pub mod common;
pub mod compare;
pub mod condition;
pub mod details;
pub mod interactions;
pub mod related;
pub mod search;

pub use compare::{CompareDrugsParams, CompareDrugsTool};
pub use condition::{FindDrugsByConditionParams, FindDrugsByConditionTool};
pub use details::{GetDrugDetailsParams, GetDrugDetailsTool};
pub use interactions::{GetDrugInteractionsParams, GetDrugInteractionsTool};
pub use related::{GetRelatedDrugsParams, GetRelatedDrugsTool};
pub use search::{SearchDrugsParams, SearchDrugsTool};
