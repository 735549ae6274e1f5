//! CLI argument definitions for Holy Grail Chat.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Holy Grail Chat -- ask about your data or kick off a business workflow.
#[derive(Parser)]
#[command(
    name = "holygrail",
    version,
    about = "Holy Grail Chat -- data questions and business workflows over HTTP",
    long_about = "A chat endpoint that answers questions about application data through a \
                  language model and recognises requests for named business workflows."
)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "config/default.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP chat server.
    Serve {
        /// Address to bind the HTTP server to (overrides the config file).
        #[arg(long)]
        bind: Option<String>,

        /// Port to listen on (overrides the config file).
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// List the registered workflows.
    Workflows,

    /// Send one message through the chat pipeline and print the JSON reply.
    Ask {
        /// The user message.
        message: String,
    },
}
