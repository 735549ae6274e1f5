//! REST API route handlers.
//!
//! Provides the chat endpoint plus workflow discovery and status.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::Instrument;
use uuid::Uuid;

use holygrail_agent::config::{database_url, llm_configured};
use holygrail_intent::workflow::{self, WorkflowSummary};

use crate::chat::{ChatReply, respond};
use crate::error::ChatError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /chat
// ---------------------------------------------------------------------------

/// Route the conversation's last user message and return the reply.
///
/// The body is parsed as JSON whatever its `Content-Type`.  A body that is
/// not valid JSON is rejected like a missing `messages` array.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ChatReply>, ChatError> {
    let request_id = Uuid::now_v7();
    let span = tracing::info_span!("chat", %request_id);

    async move {
        let body: Value = serde_json::from_slice(&body).map_err(|e| {
            tracing::debug!(error = %e, "chat body is not JSON");
            ChatError::Validation
        })?;
        let reply = respond(&state, &body).await?;
        Ok(Json(reply))
    }
    .instrument(span)
    .await
}

// ---------------------------------------------------------------------------
// GET /api/workflows
// ---------------------------------------------------------------------------

/// List every registered workflow.
pub async fn workflows() -> Json<Vec<WorkflowSummary>> {
    Json(workflow::list_available())
}

// ---------------------------------------------------------------------------
// POST /api/workflows/{id}/execute
// ---------------------------------------------------------------------------

/// Stage a workflow by key.  The optional JSON body is passed as input.
pub async fn execute_workflow(
    Path(id): Path<String>,
    body: Option<Json<Value>>,
) -> (StatusCode, Json<Value>) {
    let input = body.map(|Json(v)| v).unwrap_or(Value::Null);
    match workflow::execute(&id, &input) {
        Ok(execution) => (StatusCode::OK, Json(json!(execution))),
        Err(e) => (StatusCode::NOT_FOUND, Json(json!({ "error": e.to_string() }))),
    }
}

// ---------------------------------------------------------------------------
// GET /api/status
// ---------------------------------------------------------------------------

/// Response payload for the `/api/status` endpoint.
#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub started_at: String,
    pub llm_configured: bool,
    pub data_source_configured: bool,
    pub workflows: usize,
}

/// Report version and configuration presence.  Never reveals values.
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        started_at: state.started_at.to_rfc3339(),
        llm_configured: llm_configured(state.env.as_ref()),
        data_source_configured: database_url(state.env.as_ref()).is_some(),
        workflows: workflow::all().len(),
    })
}
