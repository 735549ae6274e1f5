//! HTTP-facing error types for the chat endpoint.
//!
//! Only request-shape, configuration, and unexpected failures surface as
//! error statuses.  Workflow and query failures are turned into
//! conversational replies by [`crate::chat`] and never reach this type.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Fixed message for a malformed chat request.
pub const INVALID_REQUEST: &str = "Invalid request: messages array required";

/// Fixed message when no language model credential is configured.
pub const LLM_NOT_CONFIGURED: &str = "OpenAI API key not configured";

/// Errors that end a chat request with a non-200 status.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// The body is not JSON or has no `messages` array.
    #[error("Invalid request: messages array required")]
    Validation,

    /// The language model credential is absent.
    #[error("OpenAI API key not configured")]
    Configuration,

    /// Anything else.
    #[error("{0}")]
    Unhandled(String),
}

impl ChatError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::Configuration | Self::Unhandled(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "chat request failed");
        } else {
            tracing::warn!(error = %self, "chat request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
