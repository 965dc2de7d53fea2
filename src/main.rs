use anyhow::Result;
use clap::Parser;
use job_matcher::cli::{handle_command, Cli, Command};
use job_matcher::core::ConfigManager;
use job_matcher::logging::init_tracing;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;
    let cli = Cli::parse();

    let config = ConfigManager::load()?;
    info!("Environment: {}", config.environment);

    handle_command(cli.command.unwrap_or(Command::Serve), config).await
}
