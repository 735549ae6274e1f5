//! CLI entry point for Holy Grail Chat.
//!
//! This binary provides the `holygrail` command with subcommands for
//! serving the chat endpoint, listing workflows, and asking one-off
//! questions.

mod cli;
mod helpers;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use holygrail_agent::ProcessEnv;
use holygrail_intent::workflow;
use holygrail_web::{AppState, ChatMessage, WebServer, respond};

use crate::cli::{Cli, Commands};
use crate::helpers::{apply_overrides, init_tracing, load_web_config};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; real environment variables still apply.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind, port } => cmd_serve(&cli.config, bind, port).await,
        Commands::Workflows => cmd_workflows(),
        Commands::Ask { message } => cmd_ask(&message).await,
    }
}

// ---------------------------------------------------------------------------
// Subcommand: serve
// ---------------------------------------------------------------------------

async fn cmd_serve(
    config_path: &std::path::Path,
    bind: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    init_tracing("info");

    let config = apply_overrides(load_web_config(config_path), bind, port);
    info!(bind = %config.bind_addr, port = config.port, "configuration loaded");

    let state = Arc::new(AppState::new(Arc::new(ProcessEnv)));
    WebServer::new(config, state)
        .start()
        .await
        .map_err(|e| anyhow::anyhow!(e))
        .context("web server failed")
}

// ---------------------------------------------------------------------------
// Subcommand: workflows
// ---------------------------------------------------------------------------

fn cmd_workflows() -> Result<()> {
    println!();
    for wf in workflow::list_available() {
        println!("  {:<22} {} ({} steps)", wf.id.to_string(), wf.name, wf.steps);
        println!("  {:<22} {}", "", wf.description);
    }
    println!();
    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommand: ask
// ---------------------------------------------------------------------------

async fn cmd_ask(message: &str) -> Result<()> {
    init_tracing("warn");

    let state = AppState::new(Arc::new(ProcessEnv));
    let body = serde_json::json!({ "messages": [ChatMessage::user(message)] });

    let reply = respond(&state, &body).await?;
    let formatted = serde_json::to_string_pretty(&reply).context("failed to format reply")?;
    println!("{formatted}");
    Ok(())
}
