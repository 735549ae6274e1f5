//! LLM integration layer.
//!
//! - [`types`] -- Messages, requests, and responses.
//! - [`client`] -- HTTP client for the OpenAI Chat Completions API and
//!   compatible endpoints.

pub mod client;
pub mod types;

pub use client::{LlmClient, LlmClientConfig};
pub use types::{ChatRequest, LlmResponse, Message, Role, Usage};
