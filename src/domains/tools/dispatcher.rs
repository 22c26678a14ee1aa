//! Tool call dispatcher.
//!
//! Routes an inbound call to its handler and turns whatever happens into a
//! [`ToolCallResult`]:
//!
//! ```text
//! received -> resolved ------> validated ------> executed -> success
//!          \-> unknown tool  \-> bad arguments            \-> handler error
//! ```
//!
//! The dispatcher is immutable once built, so one instance can serve any
//! number of concurrent calls.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use super::error::ToolError;
use super::handlers::HandlerSet;
use super::registry::{ToolDefinition, ToolRegistry};
use super::result::{Terminal, ToolCallResult};
use crate::core::Result;
use crate::domains::drugs::DrugStore;

/// An inbound tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    #[serde(rename = "name")]
    pub tool_name: String,
    /// Missing and `null` arguments both read as an empty object.
    #[serde(default = "empty_arguments", deserialize_with = "arguments_or_empty")]
    pub arguments: Value,
}

fn empty_arguments() -> Value {
    Value::Object(Default::default())
}

fn arguments_or_empty<'de, D>(deserializer: D) -> std::result::Result<Value, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => empty_arguments(),
        Some(arguments) => arguments,
    })
}

impl ToolCallRequest {
    pub fn new(tool_name: impl Into<String>, arguments: Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
        }
    }
}

/// Routes tool calls to handlers.
pub struct Dispatcher {
    registry: ToolRegistry,
    handlers: HandlerSet,
    store: Arc<dyn DrugStore>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("tools", &self.registry.names())
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Build a dispatcher after checking that registry and handlers agree.
    pub fn new(
        registry: ToolRegistry,
        handlers: HandlerSet,
        store: Arc<dyn DrugStore>,
    ) -> Result<Self> {
        handlers.verify_against(&registry)?;
        info!("Dispatcher ready with {} tool(s)", registry.len());
        Ok(Self {
            registry,
            handlers,
            store,
        })
    }

    /// The full drug tool catalog.
    pub fn standard(store: Arc<dyn DrugStore>) -> Result<Self> {
        Self::new(ToolRegistry::standard(), HandlerSet::standard(), store)
    }

    /// Tool definitions for capability advertisement.
    pub fn list_tools(&self) -> &[ToolDefinition] {
        self.registry.list()
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Dispatch a call. Never fails: every error becomes a failure envelope.
    pub async fn call(&self, request: ToolCallRequest) -> ToolCallResult {
        self.dispatch(&request.tool_name, request.arguments).await
    }

    #[instrument(skip(self, arguments))]
    pub async fn dispatch(&self, name: &str, arguments: Value) -> ToolCallResult {
        debug!("Received call");

        let Some(definition) = self.registry.get(name) else {
            warn!("Unknown tool requested: {}", name);
            return ToolCallResult::failure(ToolError::unknown_tool(name), Terminal::UnknownTool);
        };
        let Some(handler) = self.handlers.get(name) else {
            // Ruled out by `HandlerSet::verify_against` at construction.
            error!("No handler bound for declared tool: {}", name);
            return ToolCallResult::failure(
                ToolError::internal(format!("No handler for tool: {name}")),
                Terminal::HandlerError,
            );
        };

        let call = match definition
            .parameter_schema
            .validate(&arguments)
            .and_then(|normalized| handler.bind(normalized))
        {
            Ok(call) => call,
            Err(e) => {
                warn!("Rejected arguments: {}", e);
                return ToolCallResult::failure(e, Terminal::BadArguments);
            }
        };

        let outcome = AssertUnwindSafe(call.execute(self.store.as_ref()))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(payload)) => {
                info!("Tool call succeeded");
                ToolCallResult::success(payload)
            }
            Ok(Err(e)) => {
                warn!("Tool call failed: {}", e);
                ToolCallResult::failure(e, Terminal::HandlerError)
            }
            Err(_) => {
                error!("Tool handler panicked");
                ToolCallResult::failure(
                    ToolError::internal(format!("Tool '{name}' failed unexpectedly")),
                    Terminal::HandlerError,
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::drugs::fixtures::sample_store;
    use crate::domains::drugs::{DrugRecord, Page, PageRequest, StoreError};
    use crate::domains::tools::{ErrorKind, Outcome};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Wraps the sample catalog and counts every capability call, so tests
    /// can tell whether a handler body ran.
    #[derive(Default)]
    struct RecordingStore {
        calls: AtomicUsize,
        fail: bool,
    }

    impl RecordingStore {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn record(&self) -> std::result::Result<(), StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(StoreError::backend("database offline"))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl DrugStore for RecordingStore {
        async fn search_by_text(&self, query: &str) -> std::result::Result<Vec<DrugRecord>, StoreError> {
            self.record()?;
            sample_store().search_by_text(query).await
        }

        async fn get_by_slug(&self, slug: &str) -> std::result::Result<DrugRecord, StoreError> {
            self.record()?;
            sample_store().get_by_slug(slug).await
        }

        async fn get_by_condition(
            &self,
            condition: &str,
            page: PageRequest,
        ) -> std::result::Result<Page, StoreError> {
            self.record()?;
            sample_store().get_by_condition(condition, page).await
        }

        async fn compare_by_slugs(
            &self,
            slugs: &[String],
        ) -> std::result::Result<Vec<DrugRecord>, StoreError> {
            self.record()?;
            sample_store().compare_by_slugs(slugs).await
        }

        async fn get_related_by_slug(
            &self,
            slug: &str,
        ) -> std::result::Result<Vec<DrugRecord>, StoreError> {
            self.record()?;
            sample_store().get_related_by_slug(slug).await
        }
    }

    fn dispatcher() -> (Dispatcher, Arc<RecordingStore>) {
        let store = Arc::new(RecordingStore::default());
        let dispatcher = Dispatcher::standard(store.clone()).unwrap();
        (dispatcher, store)
    }

    #[tokio::test]
    async fn test_unknown_tool_is_failure() {
        let (dispatcher, store) = dispatcher();
        for name in ["calculate_dosage", "", "SEARCH_DRUGS", "search_drugs "] {
            let result = dispatcher.dispatch(name, json!({})).await;
            assert_eq!(result.outcome, Outcome::Failure);
            assert_eq!(result.terminal, Terminal::UnknownTool);
            assert_eq!(result.error_kind(), Some(ErrorKind::UnknownTool));
            assert_eq!(
                result.first_text().unwrap(),
                format!("Error: Unknown tool: {name}")
            );
        }
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_required_arguments_never_reach_handler() {
        let (dispatcher, store) = dispatcher();
        for definition in dispatcher.list_tools() {
            let result = dispatcher.dispatch(&definition.name, json!({})).await;
            assert_eq!(result.outcome, Outcome::Failure, "{}", definition.name);
            assert_eq!(result.terminal, Terminal::BadArguments, "{}", definition.name);
            assert_eq!(result.error_kind(), Some(ErrorKind::InvalidArguments));
        }
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_wrong_types_never_reach_handler() {
        let (dispatcher, store) = dispatcher();
        let result = dispatcher
            .dispatch("search_drugs", json!({ "query": "aspirin", "limit": "two" }))
            .await;
        assert_eq!(result.terminal, Terminal::BadArguments);
        assert_eq!(
            result.first_text(),
            Some("Error: Invalid arguments: Field 'limit' must be a number")
        );

        let result = dispatcher
            .dispatch("compare_drugs", json!({ "slugs": ["a", 1] }))
            .await;
        assert_eq!(result.terminal, Terminal::BadArguments);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_non_integer_limit_is_bad_arguments() {
        let (dispatcher, store) = dispatcher();
        let result = dispatcher
            .dispatch("search_drugs", json!({ "query": "aspirin", "limit": 2.5 }))
            .await;
        assert_eq!(result.terminal, Terminal::BadArguments);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_search_success_respects_limit() {
        let (dispatcher, _) = dispatcher();
        let result = dispatcher
            .call(ToolCallRequest::new(
                "search_drugs",
                json!({ "query": "aspirin", "limit": 2 }),
            ))
            .await;
        assert!(result.is_success());
        assert_eq!(result.payload.len(), 1);

        let rows: Vec<Value> = serde_json::from_str(result.first_text().unwrap()).unwrap();
        assert!(rows.len() <= 2);
        for row in &rows {
            assert!(row["indications"].as_str().unwrap().chars().count() <= 200);
        }
    }

    #[tokio::test]
    async fn test_default_limit_applied() {
        let (dispatcher, _) = dispatcher();
        let result = dispatcher
            .dispatch("search_drugs", json!({ "query": "a" }))
            .await;
        let rows: Vec<Value> = serde_json::from_str(result.first_text().unwrap()).unwrap();
        // Every sample drug matches "a"; the catalog is smaller than the default limit.
        assert_eq!(rows.len(), 5);
    }

    #[tokio::test]
    async fn test_compare_cardinality() {
        let (dispatcher, _) = dispatcher();

        let result = dispatcher
            .dispatch("compare_drugs", json!({ "slugs": ["ghost-slug"] }))
            .await;
        assert_eq!(result.outcome, Outcome::Failure);
        assert_eq!(result.terminal, Terminal::HandlerError);
        assert_eq!(result.error_kind(), Some(ErrorKind::InvalidArguments));

        let result = dispatcher
            .dispatch("compare_drugs", json!({ "slugs": ["metformin", "aspirin-81"] }))
            .await;
        assert!(result.is_success());
        let rows: Vec<Value> = serde_json::from_str(result.first_text().unwrap()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["slug"], "metformin");
        assert_eq!(rows[1]["slug"], "aspirin-81");
    }

    #[tokio::test]
    async fn test_not_found_is_handler_failure() {
        let (dispatcher, store) = dispatcher();
        let result = dispatcher
            .dispatch("get_drug_details", json!({ "slug": "ghost-slug" }))
            .await;
        assert_eq!(result.terminal, Terminal::HandlerError);
        assert_eq!(result.error_kind(), Some(ErrorKind::NotFound));
        assert_eq!(result.first_text(), Some("Error: Drug not found: ghost-slug"));
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_wrapped() {
        let store = Arc::new(RecordingStore::failing());
        let dispatcher = Dispatcher::standard(store).unwrap();
        let result = dispatcher
            .dispatch("get_drug_interactions", json!({ "slug": "metformin" }))
            .await;
        assert_eq!(result.outcome, Outcome::Failure);
        assert_eq!(result.error_kind(), Some(ErrorKind::UpstreamFailure));
        assert!(result.first_text().unwrap().starts_with("Error: "));
    }

    #[tokio::test]
    async fn test_interactions_placeholder_through_dispatcher() {
        let (dispatcher, _) = dispatcher();
        let result = dispatcher
            .dispatch("get_drug_interactions", json!({ "slug": "aspirin-81" }))
            .await;
        let body: Value = serde_json::from_str(result.first_text().unwrap()).unwrap();
        assert_eq!(body["contraindications"], "No contraindications data available");
    }

    #[tokio::test]
    async fn test_listed_tools_are_all_dispatchable() {
        let (dispatcher, _) = dispatcher();
        for definition in dispatcher.list_tools() {
            let result = dispatcher.dispatch(&definition.name, json!({})).await;
            assert_ne!(result.terminal, Terminal::UnknownTool, "{}", definition.name);
        }
    }

    #[tokio::test]
    async fn test_concurrent_calls_are_independent() {
        let (dispatcher, _) = dispatcher();
        let dispatcher = Arc::new(dispatcher);

        let tasks: Vec<_> = ["aspirin-81", "ghost-slug", "metformin"]
            .into_iter()
            .map(|slug| {
                let dispatcher = dispatcher.clone();
                tokio::spawn(async move {
                    dispatcher
                        .dispatch("get_drug_details", json!({ "slug": slug }))
                        .await
                })
            })
            .collect();

        let mut outcomes = Vec::new();
        for task in tasks {
            outcomes.push(task.await.unwrap().outcome);
        }
        assert_eq!(
            outcomes,
            vec![Outcome::Success, Outcome::Failure, Outcome::Success]
        );
    }

    #[test]
    fn test_request_from_wire() {
        let request: ToolCallRequest =
            serde_json::from_value(json!({ "name": "search_drugs" })).unwrap();
        assert_eq!(request.tool_name, "search_drugs");
        assert_eq!(request.arguments, json!({}));
    }

    #[tokio::test]
    async fn test_null_arguments_read_as_empty() {
        let request: ToolCallRequest =
            serde_json::from_value(json!({ "name": "search_drugs", "arguments": null })).unwrap();
        assert_eq!(request.arguments, json!({}));

        // Same outcome as omitting arguments: the missing query is reported.
        let (dispatcher, store) = dispatcher();
        let result = dispatcher.call(request).await;
        assert_eq!(result.terminal, Terminal::BadArguments);
        assert_eq!(
            result.first_text(),
            Some("Error: Invalid arguments: Missing required field: 'query'")
        );
        assert_eq!(store.calls(), 0);
    }
}
