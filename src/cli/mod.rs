//! CLI parser and command dispatch.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Settings;

#[derive(Parser)]
#[command(name = "publog")]
#[command(about = "Read-only query service for the media publication backup log")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Bind address: a port, a host, or host:port
        #[arg(short, long, env = "BIND")]
        bind: Option<String>,
    },

    /// Database utilities
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Subcommand)]
enum DbCommands {
    /// Check connectivity and that the backup table is reachable
    Check,

    /// Normalize an export CSV before ingestion (dates to ISO, flags to
    /// true/false, empty VERSION to V1)
    Normalize {
        /// Input CSV file
        input: PathBuf,
        /// Output CSV file
        output: PathBuf,
    },
}

/// Parse arguments and run the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind } => {
            let settings = Settings::from_env()?;
            commands::serve::cmd_serve(&settings, bind.as_deref()).await
        }
        Commands::Db { command } => match command {
            DbCommands::Check => {
                let settings = Settings::from_env()?;
                commands::db::cmd_check(&settings).await
            }
            DbCommands::Normalize { input, output } => {
                commands::db::cmd_normalize(&input, &output)
            }
        },
    }
}
