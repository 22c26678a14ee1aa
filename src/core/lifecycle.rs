//! Tool server lifecycle.
//!
//! ```text
//! Stopped -> Starting -> Running -> Stopping -> Stopped
//!               \-> Stopped (dispatcher could not be built)
//! ```
//!
//! The controller owns the only mutable shared state of the server. The
//! dispatcher it hands out is immutable, so calls already in flight keep
//! running against their own `Arc` even if the server is stopped meanwhile.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};

use super::{Error, Result};
use crate::domains::drugs::DrugStore;
use crate::domains::tools::{
    Dispatcher, Terminal, ToolCallRequest, ToolCallResult, ToolDefinition, ToolError,
};

/// Builds the dispatcher when the server starts.
pub type DispatcherBuilder = Arc<dyn Fn(Arc<dyn DrugStore>) -> Result<Dispatcher> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    Stopped,
    Starting,
    Running,
    Stopping,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Stopped => "stopped",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
        };
        f.write_str(name)
    }
}

/// Snapshot reported by health and status endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStatus {
    pub running: bool,
    pub state: LifecycleState,
    /// Advertised tool names, in catalog order. Empty unless running.
    pub tools: Vec<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

struct Inner {
    state: LifecycleState,
    started_at: Option<DateTime<Utc>>,
    dispatcher: Option<Arc<Dispatcher>>,
}

impl Inner {
    fn reset(&mut self) {
        self.dispatcher = None;
        self.started_at = None;
        self.state = LifecycleState::Stopped;
    }
}

/// Start/stop controller for the tool server.
pub struct ServerLifecycle {
    store: Arc<dyn DrugStore>,
    builder: DispatcherBuilder,
    version: String,
    inner: RwLock<Inner>,
}

impl fmt::Debug for ServerLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerLifecycle")
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl ServerLifecycle {
    /// Controller building the standard drug tool catalog.
    pub fn new(store: Arc<dyn DrugStore>) -> Self {
        Self::with_builder(store, Arc::new(Dispatcher::standard))
    }

    /// Controller with a custom dispatcher builder.
    pub fn with_builder(store: Arc<dyn DrugStore>, builder: DispatcherBuilder) -> Self {
        Self {
            store,
            builder,
            version: env!("CARGO_PKG_VERSION").to_string(),
            inner: RwLock::new(Inner {
                state: LifecycleState::Stopped,
                started_at: None,
                dispatcher: None,
            }),
        }
    }

    /// Start serving tools. Starting a running server does nothing.
    ///
    /// If the dispatcher cannot be built (the builder errors or panics) the
    /// failure is logged and returned, and the controller stays stopped.
    ///
    /// `Starting` and `Stopping` only exist while the write guard is held,
    /// so any state other than `Running` is treated as stopped here.
    #[instrument(skip(self))]
    pub async fn start(&self) -> Result<()> {
        let mut inner = self.inner.write().await;
        if inner.state == LifecycleState::Running {
            return Ok(());
        }

        inner.state = LifecycleState::Starting;
        let built = panic::catch_unwind(AssertUnwindSafe(|| (self.builder)(self.store.clone())));
        match built {
            Ok(Ok(dispatcher)) => {
                info!("Tool server running with {} tool(s)", dispatcher.list_tools().len());
                inner.dispatcher = Some(Arc::new(dispatcher));
                inner.started_at = Some(Utc::now());
                inner.state = LifecycleState::Running;
                Ok(())
            }
            Ok(Err(e)) => {
                error!("Failed to start tool server: {}", e);
                inner.reset();
                Err(e)
            }
            Err(_) => {
                error!("Failed to start tool server: dispatcher builder panicked");
                inner.reset();
                Err(Error::lifecycle("Dispatcher builder panicked"))
            }
        }
    }

    /// Stop serving tools. Stopping a stopped server does nothing.
    #[instrument(skip(self))]
    pub async fn stop(&self) -> Result<()> {
        let mut inner = self.inner.write().await;
        if inner.state == LifecycleState::Stopped {
            return Ok(());
        }

        inner.state = LifecycleState::Stopping;
        inner.reset();
        info!("Tool server stopped");
        Ok(())
    }

    pub async fn state(&self) -> LifecycleState {
        self.inner.read().await.state
    }

    pub async fn is_healthy(&self) -> bool {
        self.state().await == LifecycleState::Running
    }

    /// The running dispatcher, if any.
    pub async fn dispatcher(&self) -> Option<Arc<Dispatcher>> {
        self.inner.read().await.dispatcher.clone()
    }

    /// Advertised tools. Empty while stopped.
    pub async fn list_tools(&self) -> Vec<ToolDefinition> {
        self.dispatcher()
            .await
            .map(|d| d.list_tools().to_vec())
            .unwrap_or_default()
    }

    /// Dispatch a call against the running server.
    pub async fn call_tool(&self, request: ToolCallRequest) -> ToolCallResult {
        match self.dispatcher().await {
            Some(dispatcher) => dispatcher.call(request).await,
            None => {
                warn!("Tool '{}' called while the server is stopped", request.tool_name);
                ToolCallResult::failure(
                    ToolError::internal("Tool server is not running"),
                    Terminal::HandlerError,
                )
            }
        }
    }

    pub async fn status(&self) -> ServerStatus {
        let inner = self.inner.read().await;
        ServerStatus {
            running: inner.state == LifecycleState::Running,
            state: inner.state,
            tools: inner
                .dispatcher
                .as_ref()
                .map(|d| d.tool_names())
                .unwrap_or_default(),
            started_at: inner.started_at,
            timestamp: Utc::now(),
            version: self.version.clone(),
        }
    }
}
