//! Query agent for Holy Grail Chat.
//!
//! This crate answers natural-language questions about application data by
//! forwarding them to a hosted language model that is configured against a
//! data source.
//!
//! ## Modules
//!
//! - [`llm`] -- OpenAI-compatible chat completions client and wire types.
//! - [`config`] -- Environment-backed settings.
//! - [`query`] -- The query executor and its lazily built agent handle.
//! - [`error`] -- Agent error types.

pub mod config;
pub mod error;
pub mod llm;
pub mod query;

pub use config::{EnvSource, MemoryEnv, ProcessEnv, QueryConfig};
pub use error::{AgentError, Result};
pub use llm::{ChatRequest, LlmClient, LlmClientConfig, LlmResponse, Message, Role, Usage};
pub use query::{
    DataSource, ModelConnector, NO_RESULT, OpenAiConnector, QueryAgent, QueryExecutor,
    QueryModel, QueryOutput,
};
