//! OpenAI Chat Completions client.
//!
//! Talks to the OpenAI API or any OpenAI-compatible endpoint (Ollama,
//! Together, vLLM) in non-streaming mode.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Value, json};

use crate::error::{AgentError, Result};
use crate::llm::types::{ChatRequest, LlmResponse, Message, Role, Usage};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default OpenAI API base URL.
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Upper bound on a single completion round trip.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

// ---------------------------------------------------------------------------
// Client configuration
// ---------------------------------------------------------------------------

/// Configuration for connecting to an OpenAI-compatible endpoint.
#[derive(Clone)]
pub struct LlmClientConfig {
    /// API key for authentication.
    pub api_key: String,
    /// Base URL for the API (e.g. `https://api.openai.com/v1`).
    pub base_url: String,
    /// Default model identifier.
    pub default_model: String,
    /// Default maximum tokens per response.
    pub max_tokens: u32,
}

impl LlmClientConfig {
    /// Create a configuration for the OpenAI API.
    pub fn openai(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::openai_compatible(api_key, model, OPENAI_BASE_URL)
    }

    /// Create a configuration for any OpenAI-compatible API.
    pub fn openai_compatible(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            default_model: model.into(),
            max_tokens: 1024,
        }
    }
}

impl std::fmt::Debug for LlmClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClientConfig")
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .field("max_tokens", &self.max_tokens)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// A client for the OpenAI Chat Completions API.
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: LlmClientConfig,
    http: reqwest::Client,
}

impl LlmClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::MissingApiKey`] if the key is empty.
    pub fn new(config: LlmClientConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(AgentError::MissingApiKey {
                provider: "openai".into(),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AgentError::LlmRequestFailed {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { config, http })
    }

    /// The model used when a request does not name one.
    pub fn default_model(&self) -> &str {
        &self.config.default_model
    }

    /// Send a chat request and return the full response.
    pub async fn chat(&self, request: &ChatRequest) -> Result<LlmResponse> {
        let body = self.build_request_body(request);
        let resp = self.send_request(&body).await?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| AgentError::LlmRequestFailed {
                reason: format!("failed to read response body: {e}"),
            })?;

        if !status.is_success() {
            return Err(AgentError::LlmRequestFailed {
                reason: format!("API returned {status}: {text}"),
            });
        }

        let v: Value = serde_json::from_str(&text).map_err(|e| AgentError::LlmParseFailed {
            reason: format!("invalid JSON response: {e}"),
        })?;

        parse_openai_response(&v)
    }

    // -- Request building ----------------------------------------------------

    /// Build the JSON body for the Chat Completions API.
    fn build_request_body(&self, request: &ChatRequest) -> Value {
        let model = if request.model.is_empty() {
            self.config.default_model.as_str()
        } else {
            request.model.as_str()
        };

        let mut body = json!({
            "model": model,
            "max_tokens": request.max_tokens.unwrap_or(self.config.max_tokens),
            "messages": messages_to_openai(&request.messages),
        });

        if let Some(temp) = request.temperature {
            body["temperature"] = json!(temp);
        }

        body
    }

    /// Send the HTTP request to the `/chat/completions` endpoint.
    async fn send_request(&self, body: &Value) -> Result<reqwest::Response> {
        let url = format!("{}/chat/completions", self.config.base_url);

        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", self.config.api_key);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value).map_err(|e| AgentError::LlmRequestFailed {
                reason: format!("invalid authorization header: {e}"),
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        tracing::debug!(url = %url, model = %body["model"], "sending LLM request");

        Ok(self.http.post(&url).headers(headers).json(body).send().await?)
    }
}

// ---------------------------------------------------------------------------
// Wire format conversion
// ---------------------------------------------------------------------------

/// Convert messages into the OpenAI wire format.
pub fn messages_to_openai(messages: &[Message]) -> Vec<Value> {
    messages
        .iter()
        .map(|msg| {
            let role = match msg.role {
                Role::System => "system",
                Role::User => "user",
                Role::Assistant => "assistant",
            };
            json!({ "role": role, "content": msg.content })
        })
        .collect()
}

/// Parse a non-streaming Chat Completions response.
pub fn parse_openai_response(v: &Value) -> Result<LlmResponse> {
    let choice = &v["choices"][0];
    let message = &choice["message"];

    if message.is_null() {
        return Err(AgentError::LlmParseFailed {
            reason: "missing `choices[0].message` in response".into(),
        });
    }

    let usage = Usage {
        input_tokens: v["usage"]["prompt_tokens"].as_u64().unwrap_or(0) as u32,
        output_tokens: v["usage"]["completion_tokens"].as_u64().unwrap_or(0) as u32,
    };

    Ok(LlmResponse {
        text: message["content"].as_str().map(str::to_owned),
        finish_reason: choice["finish_reason"].as_str().map(str::to_owned),
        usage,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
