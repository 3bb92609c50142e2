//! Flush statistics tracking.
//!
//! This module provides thread-safe counters describing what the scheduling
//! loop has done with the records it buffered.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Thread-safe flush statistics.
///
/// Updated only by a saver's scheduling loop and readable from any task
/// through an `Arc`. Counters only ever grow.
#[derive(Debug, Default)]
pub struct FlushStats {
    received: AtomicUsize,
    attempts: AtomicUsize,
    records_written: AtomicUsize,
    too_small: AtomicUsize,
    sink_failures: AtomicUsize,
    discarded: AtomicUsize,
}

/// Point-in-time copy of `FlushStats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushStatsSnapshot {
    /// Records taken off the intake channel into the buffer
    pub received: usize,
    /// Flush attempts made (one per timer tick, plus a final one on drain)
    pub attempts: usize,
    /// Records the sink acknowledged
    pub records_written: usize,
    /// Attempts skipped because the buffer could not fill one chunk
    pub too_small: usize,
    /// Attempts that stopped at a failed chunk write
    pub sink_failures: usize,
    /// Records still buffered when the loop terminated
    pub discarded: usize,
}

impl FlushStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_received(&self) {
        self.received.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn record_attempt(&self) {
        self.attempts.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn record_written(&self, count: usize) {
        self.records_written.fetch_add(count, Ordering::SeqCst);
    }

    pub(crate) fn record_too_small(&self) {
        self.too_small.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn record_sink_failure(&self) {
        self.sink_failures.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn record_discarded(&self, count: usize) {
        self.discarded.fetch_add(count, Ordering::SeqCst);
    }

    /// Number of records the sink has acknowledged so far.
    pub fn records_written(&self) -> usize {
        self.records_written.load(Ordering::SeqCst)
    }

    /// Number of flush attempts so far.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> FlushStatsSnapshot {
        FlushStatsSnapshot {
            received: self.received.load(Ordering::SeqCst),
            attempts: self.attempts.load(Ordering::SeqCst),
            records_written: self.records_written.load(Ordering::SeqCst),
            too_small: self.too_small.load(Ordering::SeqCst),
            sink_failures: self.sink_failures.load(Ordering::SeqCst),
            discarded: self.discarded.load(Ordering::SeqCst),
        }
    }
}
