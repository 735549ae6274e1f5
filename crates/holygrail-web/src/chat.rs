//! Chat request handling: validation, routing, and reply shaping.
//!
//! [`respond`] runs the whole per-request state machine and is independent
//! of Axum so it can be driven in-process (see the `ask` CLI command).
//!
//! | Step | Outcome on failure |
//! |------|--------------------|
//! | `messages` must be an array | 400 [`ChatError::Validation`] |
//! | LLM credential must be set | 500 [`ChatError::Configuration`] |
//! | last message must be from the user | 200 "Please provide a user message" |
//! | route: workflow / data query / capabilities | 200 conversational reply |

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, warn};

use holygrail_agent::config::llm_configured;
use holygrail_intent::workflow::{self, WorkflowDefinition, WorkflowExecution};
use holygrail_intent::{Route, route};

use crate::error::ChatError;
use crate::state::AppState;

/// Reply when the conversation does not end with a user message.
pub const PROVIDE_USER_MESSAGE: &str = "Please provide a user message";

/// Prefix of a successful data-query reply.
pub const QUERY_RESULT_PREFIX: &str = "Based on the database query: ";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// One message of the conversation sent by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// Discriminator for structured replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyKind {
    Workflow,
}

/// A successful (HTTP 200) chat reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatReply {
    /// A workflow matched and was staged.
    Workflow {
        #[serde(rename = "type")]
        kind: ReplyKind,
        workflow: WorkflowExecution,
        message: String,
    },
    /// A plain conversational answer.
    Text { response: String },
}

impl ChatReply {
    pub fn text(response: impl Into<String>) -> Self {
        Self::Text {
            response: response.into(),
        }
    }

    /// The user-facing text of the reply.
    pub fn message(&self) -> &str {
        match self {
            Self::Workflow { message, .. } => message,
            Self::Text { response } => response,
        }
    }
}

// ---------------------------------------------------------------------------
// Request handling
// ---------------------------------------------------------------------------

/// Handle one chat request body.
///
/// # Errors
///
/// Only request-shape, configuration, and malformed-content failures are
/// returned as errors; workflow and query failures become text replies.
pub async fn respond(state: &AppState, body: &Value) -> Result<ChatReply, ChatError> {
    let messages = body
        .get("messages")
        .and_then(Value::as_array)
        .ok_or(ChatError::Validation)?;

    if !llm_configured(state.env.as_ref()) {
        return Err(ChatError::Configuration);
    }

    let Some(message) = last_user_message(messages)? else {
        return Ok(ChatReply::text(PROVIDE_USER_MESSAGE));
    };

    Ok(reply_to(state, &message.content).await)
}

/// Extract the last message if it was sent by the user.
fn last_user_message(messages: &[Value]) -> Result<Option<ChatMessage>, ChatError> {
    let Some(last) = messages.last() else {
        return Ok(None);
    };
    if last.get("role").and_then(Value::as_str) != Some("user") {
        return Ok(None);
    }

    let content = last
        .get("content")
        .and_then(Value::as_str)
        .ok_or_else(|| ChatError::Unhandled("message content must be a string".into()))?;

    Ok(Some(ChatMessage::user(content)))
}

/// Route a user message and build the reply.
async fn reply_to(state: &AppState, text: &str) -> ChatReply {
    match route(text) {
        Route::Workflow(id) => {
            info!(workflow = %id, "workflow intent detected");
            match workflow::execute(id.as_str(), &json!({ "query": text })) {
                Ok(execution) => ChatReply::Workflow {
                    kind: ReplyKind::Workflow,
                    workflow: execution,
                    message: workflow_message(id.definition()),
                },
                Err(e) => {
                    warn!(workflow = %id, error = %e, "workflow could not be staged");
                    ChatReply::text(format!("Workflow error: {e}"))
                }
            }
        }
        Route::DataQuery => {
            info!("data query detected");
            match state.executor.query(text).await {
                Ok(result) => ChatReply::text(format!("{QUERY_RESULT_PREFIX}{result}")),
                Err(e) => {
                    if e.is_configuration() {
                        warn!(error = %e, "data source is not configured");
                    }
                    ChatReply::text(format!(
                        "I encountered an issue querying the database. Error: {e}.\n\n\
                         Please ensure your database connection is configured correctly."
                    ))
                }
            }
        }
        Route::Capabilities => ChatReply::text(CAPABILITIES.as_str()),
    }
}

/// Describe a staged workflow to the user.
fn workflow_message(workflow: &WorkflowDefinition) -> String {
    let mut message = format!(
        "I can run the \"{}\" workflow: {}.\n\nSteps:\n",
        workflow.name, workflow.description
    );
    for (index, step) in workflow.steps.iter().enumerate() {
        message.push_str(&format!("{}. {step}\n", index + 1));
    }
    message.push_str("\nThe workflow is staged and ready; steps are not executed automatically yet.");
    message
}

/// Static help text listing example questions, workflows, and layers.
pub static CAPABILITIES: LazyLock<String> = LazyLock::new(|| {
    let mut text = String::from(
        "Hello! I'm Holy Grail Chat. I can answer questions about your application's data \
         and walk you through business workflows. Try asking me things like:\n\
         - \"How many leads do we have?\"\n\
         - \"Show me the top performing campaigns\"\n\
         - \"What voice cartridges exist in the database?\"\n\n\
         Available workflows:\n",
    );
    for wf in workflow::all() {
        text.push_str(&format!("- {}\n", wf.name));
    }
    text.push_str(
        "\nI work in three layers:\n\
         1. Data intelligence: answering questions from your database\n\
         2. Memory: remembering context across conversations (not available yet)\n\
         3. Workflow automation: multi-step business processes",
    );
    text
});

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use holygrail_agent::config::{OPENAI_API_KEY_VAR, PRIMARY_DB_URL_VAR};
    use holygrail_agent::{
        MemoryEnv, ModelConnector, QueryConfig, QueryExecutor, QueryModel, QueryOutput,
    };

    use super::*;

    struct FixedModel(&'static str, Arc<AtomicUsize>);

    #[async_trait]
    impl QueryModel for FixedModel {
        async fn invoke(&self, _input: &str) -> holygrail_agent::Result<QueryOutput> {
            self.1.fetch_add(1, Ordering::SeqCst);
            Ok(QueryOutput {
                output: Some(self.0.to_owned()),
            })
        }
    }

    struct FixedConnector(&'static str, Arc<AtomicUsize>);

    impl ModelConnector for FixedConnector {
        fn connect(&self, _config: &QueryConfig) -> holygrail_agent::Result<Arc<dyn QueryModel>> {
            Ok(Arc::new(FixedModel(self.0, Arc::clone(&self.1))))
        }
    }

    fn state_with(env: MemoryEnv, answer: &'static str) -> (AppState, Arc<AtomicUsize>) {
        let env: Arc<MemoryEnv> = Arc::new(env);
        let calls = Arc::new(AtomicUsize::new(0));
        let executor = QueryExecutor::with_connector(
            env.clone(),
            Arc::new(FixedConnector(answer, Arc::clone(&calls))),
        );
        (AppState::with_executor(env, executor), calls)
    }

    fn configured(answer: &'static str) -> (AppState, Arc<AtomicUsize>) {
        state_with(
            MemoryEnv::new()
                .with(OPENAI_API_KEY_VAR, "sk-test")
                .with(PRIMARY_DB_URL_VAR, "postgres://localhost/app"),
            answer,
        )
    }

    fn body(role: &str, content: &str) -> Value {
        json!({ "messages": [{ "role": role, "content": content }] })
    }

    #[tokio::test]
    async fn missing_messages_is_validation_error() {
        let (state, _) = configured("42");
        for bad in [json!({}), json!({"messages": "hi"}), json!({"messages": null}), json!([])] {
            let err = respond(&state, &bad).await.unwrap_err();
            assert!(matches!(err, ChatError::Validation), "body: {bad}");
        }
    }

    #[tokio::test]
    async fn validation_runs_before_credential_check() {
        let (state, _) = state_with(MemoryEnv::new(), "42");
        let err = respond(&state, &json!({})).await.unwrap_err();
        assert!(matches!(err, ChatError::Validation));

        let err = respond(&state, &body("user", "hello")).await.unwrap_err();
        assert!(matches!(err, ChatError::Configuration));
    }

    #[tokio::test]
    async fn non_user_last_message_asks_for_input() {
        let (state, _) = configured("42");
        for request in [
            json!({"messages": []}),
            body("assistant", "How many leads?"),
            json!({"messages": [{"content": "no role"}]}),
            json!({"messages": [{"role": "user", "content": "hi"}, "junk"]}),
        ] {
            let reply = respond(&state, &request).await.unwrap();
            assert_eq!(reply.message(), PROVIDE_USER_MESSAGE, "body: {request}");
        }
    }

    #[tokio::test]
    async fn non_string_content_is_unhandled() {
        let (state, _) = configured("42");
        let err = respond(&state, &json!({"messages": [{"role": "user", "content": 7}]}))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Unhandled(_)));
    }

    #[tokio::test]
    async fn data_question_is_answered_once() {
        let (state, calls) = configured("42");
        let reply = respond(&state, &body("user", "How many leads do we have?"))
            .await
            .unwrap();
        assert_eq!(reply.message(), "Based on the database query: 42");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn workflow_short_circuits_data_query() {
        let (state, calls) = configured("42");
        let reply = respond(&state, &body("user", "show me how to create lead from this DM"))
            .await
            .unwrap();

        match reply {
            ChatReply::Workflow { workflow, message, .. } => {
                assert_eq!(workflow.workflow, "Create Lead from DM");
                assert!(message.contains("1. Parse DM content for contact information"));
            }
            other => panic!("expected workflow reply, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn query_failure_becomes_apology() {
        let (state, _) = state_with(MemoryEnv::new().with(OPENAI_API_KEY_VAR, "sk-test"), "42");
        let reply = respond(&state, &body("user", "list campaigns")).await.unwrap();
        assert_eq!(
            reply.message(),
            "I encountered an issue querying the database. Error: Failed to query database: \
             SUPABASE_DB_URL or DATABASE_URL not set.\n\n\
             Please ensure your database connection is configured correctly."
        );
    }

    #[tokio::test]
    async fn greeting_gets_capabilities() {
        let (state, calls) = configured("42");
        let reply = respond(&state, &body("user", "hello")).await.unwrap();
        assert_eq!(reply.message(), CAPABILITIES.as_str());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn capabilities_lists_workflows_and_layers() {
        for name in [
            "Create Lead from DM",
            "Generate Viral Post",
            "Launch Multi-Channel Campaign",
            "Qualify Lead",
        ] {
            assert!(CAPABILITIES.contains(name), "missing {name}");
        }
        assert!(CAPABILITIES.contains("\"How many leads do we have?\""));
        assert!(CAPABILITIES.contains("Memory"));
    }

    #[test]
    fn reply_serialization_shapes() {
        let text = serde_json::to_value(ChatReply::text("hi")).unwrap();
        assert_eq!(text, json!({"response": "hi"}));

        let execution = workflow::execute("QUALIFY_LEAD", &Value::Null).unwrap();
        let reply = ChatReply::Workflow {
            kind: ReplyKind::Workflow,
            workflow: execution,
            message: "m".into(),
        };
        let v = serde_json::to_value(&reply).unwrap();
        assert_eq!(v["type"], "workflow");
        assert_eq!(v["workflow"]["workflow"], "Qualify Lead");
        assert_eq!(v["message"], "m");

        let back: ChatReply = serde_json::from_value(v).unwrap();
        assert!(matches!(back, ChatReply::Workflow { .. }));
    }
}
