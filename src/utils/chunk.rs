//! Splitting record slices into fixed-size chunks.

use std::collections::HashMap;

use crate::error_handling::ChunkError;
use crate::models::Experience;

/// Splits `items` into consecutive windows of `chunk_size`, front to back.
///
/// Every chunk except possibly the last holds exactly `chunk_size` items.
/// Fails with `ChunkError::TooSmall` when `items` cannot fill a single chunk,
/// so callers can wait for more data instead of writing a short batch.
pub fn split_to_chunks<T>(items: &[T], chunk_size: usize) -> Result<Vec<&[T]>, ChunkError> {
    if chunk_size == 0 {
        return Err(ChunkError::ZeroChunkSize);
    }

    if items.len() < chunk_size {
        return Err(ChunkError::TooSmall {
            len: items.len(),
            chunk_size,
        });
    }

    Ok(items.chunks(chunk_size).collect())
}

/// Indexes experiences by id. Later duplicates replace earlier ones.
pub fn index_by_id(items: &[Experience]) -> Result<HashMap<u64, Experience>, ChunkError> {
    if items.is_empty() {
        return Err(ChunkError::Empty);
    }

    Ok(items.iter().map(|e| (e.id, *e)).collect())
}
