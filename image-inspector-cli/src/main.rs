use std::path::PathBuf;

use clap::Parser;

use image_inspector_cli::cli::{Cli, Commands, DEFAULT_CONFIG_PATH};
use image_inspector_cli::commands;
use image_inspector_cli::error::CliError;
use image_inspector_cli::logging;
use image_inspector_cli::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_tracing(cli.log_level.as_deref(), cli.log_format) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let writer = OutputWriter::new(cli.output);

    match cli.command {
        Commands::Plan(args) => commands::plan::execute(args, cli.config.as_deref(), &writer).await,
        Commands::Config(args) => {
            let config_path = cli
                .config
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
            tracing::debug!(path = %config_path.display(), "config command");
            commands::config::execute(args, &config_path, &writer).await
        }
    }
}
