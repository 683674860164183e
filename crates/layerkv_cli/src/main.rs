//! LayerKV CLI
//!
//! Command-line shell for the LayerKV nested-transaction store.
//!
//! # Commands
//!
//! - `run` - Execute a script file
//! - `shell` - Read commands from stdin
//! - `version` - Show version information

mod commands;

use clap::{Parser, Subcommand};
use layerkv_core::Config;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// LayerKV command-line shell.
#[derive(Parser)]
#[command(name = "layerkv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a script file
    Run {
        /// Path to the script
        script: PathBuf,

        /// Fail on COMMIT/ROLLBACK with no open transaction
        #[arg(short, long)]
        strict: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Read commands from stdin, one per line
    Shell {
        /// Fail on COMMIT/ROLLBACK with no open transaction
        #[arg(short, long)]
        strict: bool,
    },

    /// Show version information
    Version,
}

fn config(strict: bool) -> Config {
    if strict {
        Config::new().strict()
    } else {
        Config::new()
    }
}

fn execute(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Run {
            script,
            strict,
            format,
        } => {
            commands::run::run(&script, config(strict), &format)?;
        }
        Commands::Shell { strict } => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            commands::shell::run(stdin.lock(), stdout.lock(), config(strict))?;
        }
        Commands::Version => {
            println!("LayerKV CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("LayerKV Core v{}", layerkv_core::VERSION);
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match execute(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
