//! Error handling and flush statistics.
//!
//! This module provides:
//! - Error type definitions for the saver lifecycle, chunking, flushing and storage
//! - Flush statistics tracking shared between the scheduling loop and observers
//!
//! Errors are split into two groups:
//! - **Contract violations** (`SaverError`): the caller used the saver out of order
//! - **Recoverable conditions** (`ChunkError`, `FlushError`, `DatabaseError`): the
//!   scheduling loop logs them and retries on the next tick

mod stats;
mod types;

// Re-export public API
pub use stats::{FlushStats, FlushStatsSnapshot};
pub use types::{ChunkError, DatabaseError, FlushError, InitializationError, SaverError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_stats_initialization() {
        let stats = FlushStats::new();
        assert_eq!(stats.snapshot(), FlushStatsSnapshot::default());
    }

    #[test]
    fn test_flush_stats_accumulate() {
        let stats = FlushStats::new();
        stats.record_received();
        stats.record_received();
        stats.record_attempt();
        stats.record_written(4);
        stats.record_written(2);
        stats.record_too_small();
        stats.record_sink_failure();
        stats.record_discarded(3);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.received, 2);
        assert_eq!(snapshot.attempts, 1);
        assert_eq!(snapshot.records_written, 6);
        assert_eq!(snapshot.too_small, 1);
        assert_eq!(snapshot.sink_failures, 1);
        assert_eq!(snapshot.discarded, 3);
        assert_eq!(stats.records_written(), 6);
        assert_eq!(stats.attempts(), 1);
    }

    #[test]
    fn test_saver_error_messages() {
        assert_eq!(
            SaverError::NotInitialized.to_string(),
            "Saver is not initialized"
        );
        assert_eq!(SaverError::Closed.to_string(), "Saver is closed");
    }

    #[test]
    fn test_flush_error_remainder() {
        let too_small = FlushError::from(ChunkError::TooSmall {
            len: 1,
            chunk_size: 2,
        });
        assert!(too_small.is_too_small());
        assert!(too_small.remainder().is_none());

        let sink = FlushError::Sink {
            chunk_index: 0,
            remainder: Vec::new(),
            source: DatabaseError::SqlError(sqlx::Error::PoolTimedOut),
        };
        assert!(!sink.is_too_small());
        assert_eq!(sink.remainder().map(|r| r.len()), Some(0));
        assert!(sink.to_string().contains("failed to write chunk 0"));
    }
}
