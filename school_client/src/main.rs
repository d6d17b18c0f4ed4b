//! Command-line client for the school registry API.
//!
//! `school-client students list`, `school-client grades export --format csv`, ...
//! The API location comes from `--api-url` or `SCHOOL_API_URL`.

mod api;
mod commands;
mod output;

use clap::Parser;
use commands::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("school_client=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.run() {
        Ok(out) => {
            print!("{}", out);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            for d in e.details() {
                eprintln!("  {}: {}", d.field, d.message);
            }
            ExitCode::FAILURE
        }
    }
}
