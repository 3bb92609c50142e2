//! Utility functions for record handling.

mod chunk;

pub use chunk::{index_by_id, split_to_chunks};
