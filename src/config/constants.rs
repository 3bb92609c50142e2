//! Configuration constants.
//!
//! Default values for the saver and the ingest run.

use std::time::Duration;

/// Default intake channel capacity (and initial buffer allocation)
pub const DEFAULT_CAPACITY: usize = 1000;

/// Default number of records per bulk write.
/// Matches the batch size the experience service uses for its multi-create path.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Default interval between flush attempts
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(1);

/// Default SQLite database path
pub const DB_PATH: &str = "./experiences.db";
