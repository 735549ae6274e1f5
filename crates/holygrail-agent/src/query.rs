//! Database question executor.
//!
//! [`QueryExecutor`] forwards a natural-language question to a language
//! model configured against a data source and returns the model's text.
//! The model client and data source descriptor are bundled in a
//! [`QueryAgent`] that is built on first use and reused until
//! [`QueryExecutor::reset`].
//!
//! ```text
//! query(question)
//!   └─ agent()  ── first call ──> QueryConfig::resolve ──> ModelConnector::connect
//!   └─ QueryModel::invoke(question) ──> output | "No result found"
//! ```

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::config::{EnvSource, QueryConfig};
use crate::error::{AgentError, Result};
use crate::llm::{ChatRequest, LlmClient, LlmClientConfig, Message};

/// Model identifier used for every query.
pub const QUERY_MODEL: &str = "gpt-4";

/// Sampling temperature for queries.
pub const QUERY_TEMPERATURE: f32 = 0.0;

/// Returned when the model produces no output.
pub const NO_RESULT: &str = "No result found";

// ---------------------------------------------------------------------------
// Data source
// ---------------------------------------------------------------------------

/// A data source referenced by connection string.  No connection is opened.
#[derive(Clone)]
pub struct DataSource {
    url: String,
}

impl DataSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// The raw connection string.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// `scheme://host[:port]` with credentials and path removed, for logs.
    pub fn redacted(&self) -> String {
        match url::Url::parse(&self.url) {
            Ok(parsed) => {
                let host = parsed.host_str().unwrap_or("");
                match parsed.port() {
                    Some(port) => format!("{}://{host}:{port}", parsed.scheme()),
                    None => format!("{}://{host}", parsed.scheme()),
                }
            }
            Err(_) => "<unparseable>".to_owned(),
        }
    }
}

impl fmt::Debug for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DataSource").field(&self.redacted()).finish()
    }
}

// ---------------------------------------------------------------------------
// Model seam
// ---------------------------------------------------------------------------

/// The result of one model invocation.
#[derive(Debug, Clone, Default)]
pub struct QueryOutput {
    /// The textual answer, if any.
    pub output: Option<String>,
}

/// A model that answers a single question.
#[async_trait]
pub trait QueryModel: Send + Sync {
    async fn invoke(&self, input: &str) -> Result<QueryOutput>;
}

/// Builds a [`QueryModel`] from resolved settings.
pub trait ModelConnector: Send + Sync {
    fn connect(&self, config: &QueryConfig) -> Result<Arc<dyn QueryModel>>;
}

/// Connects to OpenAI (or the compatible endpoint named by
/// `HOLYGRAIL_API_BASE_URL`) with [`QUERY_MODEL`] at temperature zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenAiConnector;

impl ModelConnector for OpenAiConnector {
    fn connect(&self, config: &QueryConfig) -> Result<Arc<dyn QueryModel>> {
        let client_config = match &config.base_url {
            Some(base) => {
                LlmClientConfig::openai_compatible(config.api_key.clone(), QUERY_MODEL, base)
            }
            None => LlmClientConfig::openai(config.api_key.clone(), QUERY_MODEL),
        };
        let client = LlmClient::new(client_config)?;
        Ok(Arc::new(ChatModel { client }))
    }
}

/// [`QueryModel`] over the chat completions API.  The question is sent as
/// the only message.
struct ChatModel {
    client: LlmClient,
}

#[async_trait]
impl QueryModel for ChatModel {
    async fn invoke(&self, input: &str) -> Result<QueryOutput> {
        let request = ChatRequest {
            model: self.client.default_model().to_owned(),
            messages: vec![Message::user(input)],
            temperature: Some(QUERY_TEMPERATURE),
            max_tokens: None,
        };
        let response = self.client.chat(&request).await?;
        debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            finish_reason = ?response.finish_reason,
            "query model responded"
        );
        Ok(QueryOutput {
            output: response.text,
        })
    }
}

// ---------------------------------------------------------------------------
// Agent handle
// ---------------------------------------------------------------------------

/// A model client bundled with the data source it answers about.
pub struct QueryAgent {
    pub model: Arc<dyn QueryModel>,
    pub data_source: DataSource,
}

impl fmt::Debug for QueryAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryAgent")
            .field("data_source", &self.data_source)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Executor
// ---------------------------------------------------------------------------

/// Answers database questions through a lazily built [`QueryAgent`].
///
/// The agent slot is guarded by an async mutex held across construction, so
/// concurrent first calls build the agent exactly once.
pub struct QueryExecutor {
    env: Arc<dyn EnvSource>,
    connector: Arc<dyn ModelConnector>,
    agent: Mutex<Option<Arc<QueryAgent>>>,
}

impl QueryExecutor {
    /// Create an executor that connects to OpenAI.
    pub fn new(env: Arc<dyn EnvSource>) -> Self {
        Self::with_connector(env, Arc::new(OpenAiConnector))
    }

    /// Create an executor with a custom model connector.
    pub fn with_connector(env: Arc<dyn EnvSource>, connector: Arc<dyn ModelConnector>) -> Self {
        Self {
            env,
            connector,
            agent: Mutex::new(None),
        }
    }

    /// Return the cached agent, building it on first use.
    pub async fn agent(&self) -> Result<Arc<QueryAgent>> {
        let mut slot = self.agent.lock().await;
        if let Some(agent) = slot.as_ref() {
            return Ok(Arc::clone(agent));
        }

        let config = QueryConfig::resolve(self.env.as_ref())?;
        let data_source = DataSource::new(config.database_url.clone());
        let model = self.connector.connect(&config)?;

        info!(data_source = %data_source.redacted(), model = QUERY_MODEL, "query agent initialized");

        let agent = Arc::new(QueryAgent { model, data_source });
        *slot = Some(Arc::clone(&agent));
        Ok(agent)
    }

    /// Answer `question`.
    ///
    /// # Errors
    ///
    /// Any failure while building the agent or invoking the model is logged
    /// and returned as [`AgentError::QueryFailed`] wrapping the cause.
    pub async fn query(&self, question: &str) -> Result<String> {
        match self.try_query(question).await {
            Ok(answer) => Ok(answer),
            Err(e) => {
                error!(error = %e, "query agent error");
                Err(AgentError::QueryFailed { cause: Box::new(e) })
            }
        }
    }

    async fn try_query(&self, question: &str) -> Result<String> {
        let agent = self.agent().await?;
        let result = agent.model.invoke(question).await?;
        Ok(result
            .output
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| NO_RESULT.to_owned()))
    }

    /// Drop the cached agent so the next query re-reads settings.
    pub async fn reset(&self) {
        if self.agent.lock().await.take().is_some() {
            info!("query agent reset");
        }
    }

    /// Whether an agent is currently cached.
    pub async fn is_initialized(&self) -> bool {
        self.agent.lock().await.is_some()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
