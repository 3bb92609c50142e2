//! Chunked, fail-fast bulk writes.
//!
//! A flusher takes a snapshot of buffered records, splits it into chunks of a
//! fixed size and writes each full chunk to a sink. A short trailing chunk is
//! never written; it is handed back so the next attempt can fill it up. The
//! first failed write stops the attempt, and everything from the failed chunk
//! onward is handed back as well.

use std::future::Future;
use std::sync::Arc;

use log::debug;

use crate::error_handling::{ChunkError, FlushError};
use crate::models::Experience;
use crate::storage::ChunkSink;
use crate::utils::split_to_chunks;

/// Writes buffered experiences to storage.
///
/// `flush` returns the records that were not persisted. On `Ok` that is the
/// deferred short tail; on a sink failure the error carries the unwritten
/// suffix (see `FlushError::remainder`).
pub trait Flusher: Send + Sync + 'static {
    fn flush(
        &self,
        records: &[Experience],
    ) -> impl Future<Output = Result<Vec<Experience>, FlushError>> + Send;

    /// Final flush before shutdown, when no more records will arrive to fill
    /// a short chunk. Defaults to a regular `flush`.
    fn drain(
        &self,
        records: &[Experience],
    ) -> impl Future<Output = Result<Vec<Experience>, FlushError>> + Send {
        self.flush(records)
    }
}

impl<F: Flusher> Flusher for Arc<F> {
    fn flush(
        &self,
        records: &[Experience],
    ) -> impl Future<Output = Result<Vec<Experience>, FlushError>> + Send {
        (**self).flush(records)
    }

    fn drain(
        &self,
        records: &[Experience],
    ) -> impl Future<Output = Result<Vec<Experience>, FlushError>> + Send {
        (**self).drain(records)
    }
}

/// `Flusher` that writes fixed-size chunks to a `ChunkSink`.
pub struct ChunkFlusher<S> {
    chunk_size: usize,
    sink: S,
}

impl<S: ChunkSink> ChunkFlusher<S> {
    pub fn new(chunk_size: usize, sink: S) -> Self {
        ChunkFlusher { chunk_size, sink }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

impl<S: ChunkSink> ChunkFlusher<S> {
    /// Writes `chunks` in order, stopping at the first failure.
    ///
    /// With `defer_short` a chunk shorter than `chunk_size` is kept instead of
    /// written.
    async fn write_chunks(
        &self,
        records: &[Experience],
        chunks: Vec<&[Experience]>,
        defer_short: bool,
    ) -> Result<Vec<Experience>, FlushError> {
        let mut remainder = Vec::with_capacity(self.chunk_size);

        for (index, chunk) in chunks.into_iter().enumerate() {
            if defer_short && chunk.len() != self.chunk_size {
                // only the last chunk can be short
                remainder.extend_from_slice(chunk);
                continue;
            }

            if let Err(source) = self.sink.write_chunk(chunk).await {
                remainder.extend_from_slice(&records[index * self.chunk_size..]);
                return Err(FlushError::Sink {
                    chunk_index: index,
                    remainder,
                    source,
                });
            }

            debug!("Wrote chunk {} ({} records)", index, chunk.len());
        }

        Ok(remainder)
    }
}

impl<S: ChunkSink> Flusher for ChunkFlusher<S> {
    async fn flush(&self, records: &[Experience]) -> Result<Vec<Experience>, FlushError> {
        let chunks = split_to_chunks(records, self.chunk_size)?;
        self.write_chunks(records, chunks, true).await
    }

    /// Writes every record, the short tail included.
    async fn drain(&self, records: &[Experience]) -> Result<Vec<Experience>, FlushError> {
        if self.chunk_size == 0 {
            return Err(ChunkError::ZeroChunkSize.into());
        }
        let chunks = records.chunks(self.chunk_size).collect();
        self.write_chunks(records, chunks, false).await
    }
}
