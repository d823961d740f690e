//! CLI entrypoint for Trivia Duel
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::Parser;
use duel_application::{AgentChannel, SessionCoordinator};
use duel_infrastructure::{ConfigLoader, HttpAgentChannel, JsonlTranscriptLogger};
use duel_presentation::{ChannelWinnerReveal, Cli, DuelRepl};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting Trivia Duel");

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!(e))
            .context("failed to load configuration")?
    };
    if let Some(endpoint) = cli.endpoint {
        config.agent.endpoint = endpoint;
    }

    // === Dependency Injection ===
    // Create the infrastructure adapter (HTTP agent channel)
    let channel: Arc<dyn AgentChannel> = Arc::new(
        HttpAgentChannel::new(
            &config.agent.endpoint,
            Duration::from_secs(config.agent.timeout_secs),
        )
        .context("failed to build the agent channel")?
        .with_agent_id(&config.agent.agent_id),
    );

    let (reveal, reveal_rx) = ChannelWinnerReveal::channel();
    let mut coordinator = SessionCoordinator::new(channel).with_winner_reveal(Arc::new(reveal));

    if config.transcript.enabled
        && !cli.no_transcript
        && let Some(logger) = JsonlTranscriptLogger::new(&config.transcript.path)
    {
        info!(path = %logger.path().display(), "session transcript enabled");
        coordinator = coordinator.with_transcript_logger(Arc::new(logger));
    }

    let mut repl = DuelRepl::new(Arc::new(coordinator), reveal_rx).with_banner(!cli.quiet);
    repl.run().await?;

    Ok(())
}
