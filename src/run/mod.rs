//! Ingest run: stream a JSON-lines file through a `Saver` into SQLite.

mod input;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{info, warn};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::flusher::ChunkFlusher;
use crate::saver::Saver;
use crate::storage::{init_db_pool_with_path, ExperienceRepo};

pub use input::parse_line;

/// Results of an ingest run.
#[derive(Debug, Clone)]
pub struct IngestReport {
    /// Non-blank, non-comment lines read
    pub total_lines: usize,
    /// Records handed to the saver
    pub accepted: usize,
    /// Lines that failed to parse
    pub invalid: usize,
    /// Records persisted to the database
    pub written: usize,
    /// Records still buffered when the saver closed
    pub discarded: usize,
    /// Whether the run stopped early on a shutdown signal
    pub interrupted: bool,
    /// Path to the SQLite database
    pub db_path: PathBuf,
    /// Elapsed time in seconds
    pub elapsed_seconds: f64,
}

/// Runs an ingest with the provided configuration, stopping early on Ctrl-C.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the database cannot be
/// opened, or the input cannot be read.
pub async fn run_ingest(config: Config) -> Result<IngestReport> {
    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    let signal_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Received Ctrl-C, stopping intake");
            signal_token.cancel();
        }
    });

    let result = run_ingest_until(config, shutdown).await;
    signal_task.abort();
    result
}

/// Runs an ingest until the input ends or `shutdown` is cancelled.
///
/// Every record read is saved through a `Saver`; the saver is always closed
/// before returning so its loop never outlives the run.
pub async fn run_ingest_until(config: Config, shutdown: CancellationToken) -> Result<IngestReport> {
    let start_time = Instant::now();
    config.validate().context("Invalid configuration")?;

    let pool = init_db_pool_with_path(&config.db_path)
        .await
        .context("Failed to initialize database")?;
    let repo = ExperienceRepo::new(pool.clone());

    let saver = Saver::with_config(
        &config.saver,
        ChunkFlusher::new(config.chunk_size, repo),
    )?;
    saver.init()?;

    let mut lines = match input::open_input(&config.file).await {
        Ok(lines) => lines,
        Err(e) => {
            saver.close().await?;
            return Err(e);
        }
    };

    let mut total_lines = 0usize;
    let mut accepted = 0usize;
    let mut invalid = 0usize;
    let mut interrupted = false;

    loop {
        let line = tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                interrupted = true;
                break;
            }
            line = lines.next_line() => line,
        };

        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                saver.close().await?;
                return Err(e).context("Failed to read input");
            }
        };

        match parse_line(&line) {
            Ok(None) => continue,
            Ok(Some(experience)) => {
                total_lines += 1;
                // a full queue parks this read until the loop catches up
                tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => {
                        interrupted = true;
                        break;
                    }
                    saved = saver.save(experience) => saved?,
                }
                accepted += 1;
            }
            Err(e) => {
                total_lines += 1;
                invalid += 1;
                warn!("Skipping invalid line {}: {}", total_lines, e);
            }
        }
    }

    saver.close().await?;
    let stats = saver.stats().snapshot();

    // Checkpoint so the main database file holds everything written
    if let Err(e) = sqlx::query("PRAGMA wal_checkpoint(TRUNCATE)")
        .execute(&pool)
        .await
    {
        warn!("Failed to checkpoint WAL: {}", e);
    }
    pool.close().await;

    let report = IngestReport {
        total_lines,
        accepted,
        invalid,
        written: stats.records_written,
        discarded: stats.discarded,
        interrupted,
        db_path: config.db_path,
        elapsed_seconds: start_time.elapsed().as_secs_f64(),
    };

    info!(
        "Ingest finished: {} accepted, {} written, {} discarded, {} invalid in {:.2}s",
        report.accepted, report.written, report.discarded, report.invalid, report.elapsed_seconds
    );

    Ok(report)
}
