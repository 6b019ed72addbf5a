// piiguard/src/main.rs
//! piiguard entry point.
//!
//! Loads `.env`, initializes logging and dispatches to the selected command.

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;

use piiguard::cli::{Cli, Commands};
use piiguard::commands::{exit_code_for, recognizers, scan, serve};
use piiguard::logger;

async fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Serve(cmd) => serve::run_serve(cmd).await,
        Commands::Scan(cmd) => scan::run_scan(cmd, &mut io::stdout().lock()).await,
        Commands::Recognizers(cmd) => recognizers::run_recognizers(cmd, &mut io::stdout().lock()),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is normal; a malformed one is worth knowing about.
    let dotenv_result = dotenvy::dotenv();

    let cli = Cli::parse();
    logger::init_logger(logger::level_from_flags(cli.quiet, cli.debug));

    if let Err(e) = dotenv_result {
        if !e.not_found() {
            log::warn!("Ignoring .env file: {}", e);
        }
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if io::stderr().is_terminal() {
                eprintln!("{} {:#}", "error:".red().bold(), e);
            } else {
                eprintln!("error: {:#}", e);
            }
            ExitCode::from(exit_code_for(&e))
        }
    }
}
