//! Error type definitions.
//!
//! This module defines the error types used throughout the pipeline: lifecycle
//! violations on the saver, chunking and flushing failures, and storage errors.

use log::SetLoggerError;
use thiserror::Error;

use crate::models::Experience;

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// Error applying schema migrations.
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// A stored row could not be mapped back to an `Experience`.
    #[error("Invalid row: {0}")]
    InvalidRow(String),
}

/// Lifecycle violations on a `Saver`.
///
/// These signal that the caller used the saver in the wrong order. They are
/// not transient and retrying the same call will fail the same way.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaverError {
    /// `save` or `close` was called before `init`.
    #[error("Saver is not initialized")]
    NotInitialized,

    /// The saver has been closed and accepts no further calls.
    #[error("Saver is closed")]
    Closed,
}

/// Errors from splitting a slice into chunks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkError {
    /// A chunk size of zero can never make progress.
    #[error("chunk size must be greater than zero")]
    ZeroChunkSize,

    /// The input cannot fill even one chunk.
    #[error("slice of {len} items is smaller than chunk size {chunk_size}")]
    TooSmall { len: usize, chunk_size: usize },

    /// The input is empty.
    #[error("slice is empty")]
    Empty,
}

/// Errors from a single flush attempt.
#[derive(Error, Debug)]
pub enum FlushError {
    /// The buffer could not be chunked. Nothing was written.
    #[error("cannot chunk buffer: {0}")]
    Chunking(#[from] ChunkError),

    /// The sink rejected a chunk. Chunks before `chunk_index` were persisted;
    /// `remainder` holds the failed chunk and every record after it.
    #[error("failed to write chunk {chunk_index} ({} records left unwritten): {source}", remainder.len())]
    Sink {
        chunk_index: usize,
        remainder: Vec<Experience>,
        #[source]
        source: DatabaseError,
    },
}

impl FlushError {
    /// Returns the records left unwritten by a sink failure.
    ///
    /// Chunking errors happen before any write, so they carry no remainder.
    pub fn remainder(&self) -> Option<&[Experience]> {
        match self {
            FlushError::Sink { remainder, .. } => Some(remainder),
            FlushError::Chunking(_) => None,
        }
    }

    /// True when the buffer was simply too small to form one chunk.
    pub fn is_too_small(&self) -> bool {
        matches!(self, FlushError::Chunking(ChunkError::TooSmall { .. }))
    }
}
