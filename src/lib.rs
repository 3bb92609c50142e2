//! experience_saver library: asynchronous, chunked write buffering
//!
//! Producers hand experiences to a [`Saver`] one at a time. The saver buffers
//! them in memory and, on a fixed interval, passes the buffer to a
//! [`Flusher`]. The provided [`ChunkFlusher`] splits the buffer into
//! fixed-size chunks and bulk-writes each full chunk to a [`ChunkSink`] such as
//! the SQLite-backed [`ExperienceRepo`]. Whatever is not written (a short tail,
//! or everything from a failed chunk onward) stays buffered for the next tick.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::time::Duration;
//! use experience_saver::{init_db_pool_with_path, ChunkFlusher, ExperienceRepo, Saver};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let pool = init_db_pool_with_path(Path::new("experiences.db")).await?;
//! let flusher = ChunkFlusher::new(100, ExperienceRepo::new(pool));
//! let saver = Saver::new(1000, flusher, Duration::from_secs(1))?;
//!
//! saver.init()?;
//! let now = chrono::Utc::now();
//! saver.save(experience_saver::Experience::new(1, 42, 3, now, now, 2)).await?;
//! saver.close().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime: `Saver::init` spawns the scheduling
//! loop onto the current runtime.

pub mod config;
mod error_handling;
mod flusher;
pub mod initialization;
mod models;
mod run;
mod saver;
mod storage;
mod utils;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel, SaverConfig};
pub use error_handling::{
    ChunkError, DatabaseError, FlushError, FlushStats, FlushStatsSnapshot, InitializationError,
    SaverError,
};
pub use flusher::{ChunkFlusher, Flusher};
pub use models::Experience;
pub use run::{parse_line, run_ingest, run_ingest_until, IngestReport};
pub use saver::{Saver, SaverState};
pub use storage::{init_db_pool_with_path, run_migrations, ChunkSink, ExperienceRepo};
pub use utils::{index_by_id, split_to_chunks};
