pub mod ask;
pub mod chat;
pub mod compare;
pub mod models;

use std::path::PathBuf;

use anyhow::Context;
use chorus_domain::config::Config;
use chorus_domain::message::Usage;
use chorus_domain::model::ModelDescriptor;
use chorus_providers::ChatOrchestrator;
use clap::{Parser, Subcommand};

/// Chorus: chat with, and compare, free-tier LLMs from one prompt.
#[derive(Debug, Parser)]
#[command(name = "chorus", version, about)]
pub struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List models that have a configured API key.
    Models {
        /// Show the whole catalog, marking which models are configured.
        #[arg(long)]
        all: bool,
        /// Output as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Send one prompt to one model and print the reply.
    Ask {
        /// The prompt to send.
        prompt: String,
        /// Model id (defaults to the first configured model).
        #[arg(long)]
        model: Option<String>,
        /// Optional system instruction sent ahead of the prompt.
        #[arg(long)]
        system: Option<String>,
        /// Output the full result as JSON instead of plain text.
        #[arg(long)]
        json: bool,
    },
    /// Send one prompt to several models, one after another.
    Compare {
        /// The prompt to send.
        prompt: String,
        /// Comma-separated model ids (defaults to every configured model).
        #[arg(long, value_delimiter = ',')]
        models: Vec<String>,
        /// Output the per-model outcomes as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Interactive multi-turn chat.
    Chat {
        /// Model id (defaults to the first configured model).
        #[arg(long)]
        model: Option<String>,
        /// Optional system instruction for the whole conversation.
        #[arg(long)]
        system: Option<String>,
    },
}

// ── Config loading helper ─────────────────────────────────────────────

/// Load the configuration from the path in `CHORUS_CONFIG` (or
/// `chorus.toml` by default). A missing file yields the defaults.
pub fn load_config() -> anyhow::Result<(Config, PathBuf)> {
    let config_path: PathBuf = std::env::var_os("CHORUS_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("chorus.toml"));

    let config = Config::load_or_default(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    Ok((config, config_path))
}

/// Build the orchestrator from the loaded config.
pub fn build_orchestrator(config: &Config) -> ChatOrchestrator {
    ChatOrchestrator::from_config(config)
}

// ── Shared helpers ────────────────────────────────────────────────────

/// Pick the model to talk to: the explicit choice, or the preferred
/// configured one.
pub fn pick_model(orch: &ChatOrchestrator, requested: Option<String>) -> anyhow::Result<String> {
    if let Some(model) = requested {
        return Ok(model);
    }
    orch.gate()
        .best_available()
        .map(|m| m.id.to_string())
        .ok_or_else(no_models_error)
}

pub(crate) fn no_models_error() -> anyhow::Error {
    anyhow::anyhow!(
        "no models configured: set GOOGLE_API_KEY or OPENROUTER_API_KEY, \
         or add [providers.<name>.auth] to chorus.toml"
    )
}

pub(crate) fn format_usage(usage: &Usage) -> String {
    format!(
        "{} prompt + {} completion = {} tokens",
        usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
    )
}

pub(crate) fn model_line(m: &ModelDescriptor) -> String {
    let mut line = format!("{:<26} {:<18} {}", m.id, m.display_name, m.provider_name());
    if let Some(note) = m.free_tier_note {
        line.push_str(&format!("  ({note})"));
    }
    line
}
