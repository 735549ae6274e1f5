//! Shared application state for the web server.
//!
//! [`AppState`] is wrapped in an `Arc` and shared across all request
//! handlers.  It is the explicit context that owns the query executor, so
//! there is no process-global agent handle.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use holygrail_agent::{EnvSource, QueryExecutor};

/// Shared state accessible from every Axum handler.
pub struct AppState {
    /// Settings source, consulted per request for the credential preflight.
    pub env: Arc<dyn EnvSource>,

    /// Answers data questions; owns the lazily built agent.
    pub executor: QueryExecutor,

    /// When this state was created.
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Build state whose executor connects to OpenAI.
    pub fn new(env: Arc<dyn EnvSource>) -> Self {
        let executor = QueryExecutor::new(Arc::clone(&env));
        Self::with_executor(env, executor)
    }

    /// Build state around an existing executor.
    pub fn with_executor(env: Arc<dyn EnvSource>, executor: QueryExecutor) -> Self {
        Self {
            env,
            executor,
            started_at: Utc::now(),
        }
    }
}
