//! Web interface for Holy Grail Chat.
//!
//! This crate provides the HTTP server that exposes the chat endpoint:
//!
//! - `POST /chat` (and `POST /api/chat`) -- route a conversation's last user
//!   message to a workflow, a database question, or the capability help.
//! - `GET /api/workflows` and `POST /api/workflows/{id}/execute` -- workflow
//!   discovery and staging.
//! - `GET /api/status` -- configuration and version info.

pub mod api;
pub mod chat;
pub mod error;
pub mod server;
pub mod state;

pub use chat::{ChatMessage, ChatReply, respond};
pub use error::ChatError;
pub use server::{WebServer, router};
pub use state::AppState;

/// Web server configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// The address to bind the HTTP server to.
    pub bind_addr: String,
    /// The port to listen on.
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".into(),
            port: 3000,
        }
    }
}
