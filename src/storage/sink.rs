//! The storage contract the flusher writes through.

use std::future::Future;
use std::sync::Arc;

use crate::error_handling::DatabaseError;
use crate::models::Experience;

/// A bulk-write destination for chunks of experiences.
///
/// An implementation must persist every record of a chunk or none of them.
/// The flusher calls it sequentially, one chunk at a time.
pub trait ChunkSink: Send + Sync + 'static {
    fn write_chunk(
        &self,
        chunk: &[Experience],
    ) -> impl Future<Output = Result<(), DatabaseError>> + Send;
}

impl<S: ChunkSink> ChunkSink for Arc<S> {
    fn write_chunk(
        &self,
        chunk: &[Experience],
    ) -> impl Future<Output = Result<(), DatabaseError>> + Send {
        (**self).write_chunk(chunk)
    }
}
