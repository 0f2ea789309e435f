// Herald content agents
// Main entry point for the herald binary

use clap::Parser;
use herald_engine::cli::{Cli, Command};
use herald_engine::config::Config;
use herald_engine::handlers::{
    handle_agent, handle_agents, handle_generate, handle_run, handle_run_scheduled, handle_status,
    OutputFormat,
};
use herald_engine::telemetry::init_telemetry_with_level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Determine output format
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    // Load configuration (or use custom path if provided)
    let config = if let Some(config_path) = &cli.config {
        Config::load_from_path(config_path)?
    } else {
        Config::load_or_create()?
    };

    // --log beats the configured level; RUST_LOG beats both
    let log_level = cli.log.as_deref().unwrap_or(&config.core.log_level);
    init_telemetry_with_level(log_level);

    tracing::debug!("Herald v{}", env!("CARGO_PKG_VERSION"));

    // Handle commands
    match cli.command {
        Command::Status => handle_status(&config, format).await,

        Command::Agents => handle_agents(&config, format).await,

        Command::Agent { id, limit } => {
            tracing::info!("Showing agent {}", id);
            handle_agent(id, limit, &config, format).await
        }

        Command::Run { id, topic } => {
            tracing::info!("Running agent {}", id);
            handle_run(id, topic, &config, format).await
        }

        Command::RunScheduled { topics } => {
            tracing::info!("Running scheduled agents");
            handle_run_scheduled(topics, &config, format).await
        }

        Command::Generate {
            channel,
            topic,
            variations,
        } => {
            tracing::info!("Generating {} variation(s) for {}", variations, channel);
            handle_generate(channel, topic, variations, &config, format).await
        }
    }
}
