//! courier CLI - Submit a description file and deploy the generated code
//!
//! `courier [DESCRIPTION]` validates the description, uploads it to the
//! configured server, waits for the result and copies the generated
//! sources to the directories listed in the `[deploy]` section of the
//! configuration file. The exit status tells how the run ended.

use anyhow::Context;
use clap::Parser;
use courier::{AgentConfig, CourierError, LogLevel, exit_codes};
use courier_logging::{ReloadHandle, init_logging};
use std::path::PathBuf;

mod agent;
mod discover;

#[derive(Parser)]
#[command(name = "courier")]
#[command(author, version, about = "Submit a description file for code generation", long_about = None)]
struct Cli {
    /// Description file (.java) or conversion input (.proto)
    description: Option<PathBuf>,

    /// Configuration file (default: discovered next to the description)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory receiving the server's output (default: current directory)
    #[arg(short, long)]
    workspace: Option<PathBuf>,

    /// More log output (-v debug, -vv trace); overrides the configured level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Wait for Enter before exiting
    #[arg(long)]
    pause: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(LogLevel::from_verbosity(cli.verbose));

    let code = match run(&cli) {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            exit_code(&e)
        }
    };

    if cli.pause {
        println!("Press Enter to exit");
        let mut line = String::new();
        let _ = std::io::stdin().read_line(&mut line);
    }

    std::process::exit(code);
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("cannot determine the current directory")?;
    let search_workspace = cli.workspace.clone().unwrap_or_else(|| cwd.clone());

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => discover::config_file(cli.description.as_deref(), &search_workspace)?,
    };
    let config = AgentConfig::from_file(&config_path)?;
    config.validate()?;
    tracing::debug!(config = %config_path.display(), "configuration loaded");

    if cli.verbose == 0 {
        let level = config.log_level()?;
        match ReloadHandle::global().reload_level(level) {
            Ok(previous) => tracing::debug!(%previous, %level, "configured log level applied"),
            Err(e) => tracing::warn!("{e}"),
        }
    }

    let description = cli
        .description
        .clone()
        .or_else(|| config.description_file.clone())
        .ok_or_else(|| {
            CourierError::InputUnavailable(
                "no description file given and none configured".to_string(),
            )
        })?;
    let workspace = cli
        .workspace
        .clone()
        .or_else(|| config.workspace.clone())
        .unwrap_or(cwd);

    agent::submit(&config, &description, &workspace)?;
    Ok(())
}

/// Process status for a failed run
fn exit_code(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<CourierError>()
        .map_or(exit_codes::UNEXPECTED, CourierError::exit_code)
}
