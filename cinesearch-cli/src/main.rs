//! CineSearch CLI - Command-line interface
//!
//! Search the OMDb catalog, browse featured titles and keep a list of
//! favorites from the terminal.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use cinesearch_core::CineSearchConfig;
use cinesearch_core::tracing_setup::{CliLogLevel, init_tracing};
use clap::Parser;

#[derive(Parser)]
#[command(name = "cinesearch")]
#[command(about = "Search movies and keep track of your favorites")]
struct Cli {
    /// Console log level (RUST_LOG overrides)
    #[arg(long, global = true, value_enum, default_value_t = CliLogLevel::Warn)]
    log_level: CliLogLevel,

    /// Directory holding favorites, session and history
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = CineSearchConfig::from_env();
    if let Some(data_dir) = cli.data_dir {
        config.storage.data_dir = data_dir;
    }

    let logs_dir = config.storage.data_dir.join("logs");
    if let Err(e) = init_tracing(cli.log_level.as_tracing_level(), Some(&logs_dir)) {
        eprintln!("Warning: file logging disabled: {e}");
    }

    match commands::handle_command(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("Command failed: {:?}", e);
            eprintln!("Error: {}", commands::describe_error(&e));
            ExitCode::FAILURE
        }
    }
}
