use clap::Parser;
use tracing_subscriber::EnvFilter;

use chorus_cli::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_cli_tracing(cli.log_json);

    let (config, config_path) = cli::load_config()?;
    tracing::debug!(path = %config_path.display(), "configuration loaded");
    let orch = cli::build_orchestrator(&config);

    match cli.command {
        Command::Models { all, json } => cli::models::list(&orch, all, json),
        Command::Ask {
            prompt,
            model,
            system,
            json,
        } => cli::ask::run(&orch, prompt, model, system, json).await,
        Command::Compare {
            prompt,
            models,
            json,
        } => cli::compare::run(&orch, prompt, models, json).await,
        Command::Chat { model, system } => cli::chat::chat(&orch, model, system).await,
    }
}

/// Initialize tracing for CLI use: stderr only, so stdout stays clean for
/// replies and JSON output. `RUST_LOG` overrides the `warn` default.
fn init_cli_tracing(json: bool) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}
