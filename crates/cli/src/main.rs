mod cli;
mod commands;
mod input;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::error;

use txwatch_core::config::load_dotenv;
use txwatch_core::Config;

use crate::cli::{CliArgs, Command};

fn main() -> ExitCode {
    load_dotenv();

    // Logs go to stderr; stdout carries the JSON reports.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: CliArgs) -> Result<ExitCode> {
    let config = Config::from_env();
    config.log_summary();

    match args.command {
        Command::Analyze(a) => commands::analyze(&a, &config),
        Command::Validate(v) => commands::validate(&v, &config),
        Command::Rules(sel) => commands::rules(&sel, &config),
    }
}
