//! Core types for LLM interaction.
//!
//! These types are provider-agnostic; [`super::client`] translates them into
//! the wire format.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// The role of a participant in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System-level instructions that shape model behavior.
    System,
    /// Input from the human user.
    User,
    /// Output from the LLM.
    Assistant,
}

/// A single message in a conversation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    #[serde(default)]
    pub content: String,
}

impl Message {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Chat request
// ---------------------------------------------------------------------------

/// A full request to send to an LLM provider.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// The model identifier.  Empty means the client's default model.
    pub model: String,

    /// The conversation history.
    pub messages: Vec<Message>,

    /// Sampling temperature (0.0 = deterministic).
    pub temperature: Option<f32>,

    /// Maximum tokens the model may generate.
    pub max_tokens: Option<u32>,
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// A parsed, non-streaming completion.
#[derive(Debug, Clone, Default)]
pub struct LlmResponse {
    /// The assistant's text, if the model produced any.
    pub text: Option<String>,
    /// Why generation stopped (`"stop"`, `"length"`, ...).
    pub finish_reason: Option<String>,
    pub usage: Usage,
}

/// Token usage information returned by the LLM.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}
