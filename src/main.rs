//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `experience_saver` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use experience_saver::config::Opt;
use experience_saver::initialization::init_logger_with;
use experience_saver::{run_ingest, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments into Config
    let config: Config = Opt::parse().into();

    // Initialize logger based on config
    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    match run_ingest(config).await {
        Ok(report) => {
            println!(
                "Saved {} of {} experience{} ({} invalid, {} discarded) in {:.1}s",
                report.written,
                report.total_lines,
                if report.total_lines == 1 { "" } else { "s" },
                report.invalid,
                report.discarded,
                report.elapsed_seconds
            );
            println!("Results saved in {}", report.db_path.display());
            if report.interrupted {
                eprintln!("Interrupted before the end of the input");
                process::exit(130);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("experience_saver error: {:#}", e);
            process::exit(1);
        }
    }
}
