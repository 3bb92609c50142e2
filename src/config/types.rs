//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DB_PATH, DEFAULT_CAPACITY, DEFAULT_CHUNK_SIZE, DEFAULT_FLUSH_INTERVAL,
};
use crate::error_handling::InitializationError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Tuning for a `Saver`. Fixed for the lifetime of the instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaverConfig {
    /// Intake channel capacity; `save` waits while this many records are queued
    pub capacity: usize,
    /// Time between flush attempts
    pub flush_interval: Duration,
    /// Run one final flush when the saver is closed
    pub drain_on_close: bool,
}

impl SaverConfig {
    /// Rejects values that would stall the pipeline.
    pub fn validate(&self) -> Result<(), InitializationError> {
        if self.capacity == 0 {
            return Err(InitializationError::InvalidConfig(
                "capacity must be greater than zero".to_string(),
            ));
        }
        if self.flush_interval.is_zero() {
            return Err(InitializationError::InvalidConfig(
                "flush interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SaverConfig {
    fn default() -> Self {
        SaverConfig {
            capacity: DEFAULT_CAPACITY,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            drain_on_close: false,
        }
    }
}

/// Library configuration (no CLI dependencies).
///
/// This is the configuration for `run_ingest`. It can be constructed
/// programmatically without any CLI dependencies.
///
/// # Examples
///
/// ```no_run
/// use experience_saver::{Config, SaverConfig};
/// use std::path::PathBuf;
///
/// let config = Config {
///     file: PathBuf::from("experiences.jsonl"),
///     chunk_size: 100,
///     saver: SaverConfig {
///         capacity: 500,
///         ..Default::default()
///     },
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON-lines file to read experiences from (`-` for stdin)
    pub file: PathBuf,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Database path (SQLite file)
    pub db_path: PathBuf,

    /// Records per bulk insert, handed to the `ChunkFlusher`
    pub chunk_size: usize,

    /// Saver tuning
    pub saver: SaverConfig,
}

impl Config {
    /// Validates the chunk size and the saver tuning.
    pub fn validate(&self) -> Result<(), InitializationError> {
        if self.chunk_size == 0 {
            return Err(InitializationError::InvalidConfig(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        self.saver.validate()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: PathBuf::from("experiences.jsonl"),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            db_path: PathBuf::from(DB_PATH),
            chunk_size: DEFAULT_CHUNK_SIZE,
            saver: SaverConfig::default(),
        }
    }
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Basic usage
/// experience_saver experiences.jsonl
///
/// # Smaller chunks, faster ticks
/// experience_saver experiences.jsonl --chunk-size 50 --flush-interval-ms 200
///
/// # Read from stdin into a custom database
/// cat experiences.jsonl | experience_saver - --db-path ./custom.db
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "experience_saver",
    about = "Buffers experience records and writes them to SQLite in chunks."
)]
pub struct Opt {
    /// JSON-lines file to read (`-` for stdin)
    #[arg(value_parser)]
    pub file: PathBuf,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Database path (SQLite file)
    #[arg(long, value_parser, default_value = DB_PATH)]
    pub db_path: PathBuf,

    /// Intake queue capacity
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    pub capacity: usize,

    /// Records per bulk insert
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Milliseconds between flush attempts
    #[arg(long, default_value_t = DEFAULT_FLUSH_INTERVAL.as_millis() as u64)]
    pub flush_interval_ms: u64,

    /// Drop records still buffered at shutdown instead of flushing them
    #[arg(long)]
    pub discard_on_close: bool,
}

impl From<Opt> for Config {
    fn from(opt: Opt) -> Self {
        Config {
            file: opt.file,
            log_level: opt.log_level,
            log_format: opt.log_format,
            db_path: opt.db_path,
            chunk_size: opt.chunk_size,
            saver: SaverConfig {
                capacity: opt.capacity,
                flush_interval: Duration::from_millis(opt.flush_interval_ms),
                drain_on_close: !opt.discard_on_close,
            },
        }
    }
}
