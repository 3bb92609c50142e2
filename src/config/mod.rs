//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (defaults for capacity, chunk size, interval)
//! - Saver and run configuration types
//! - CLI option parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, LogFormat, LogLevel, Opt, SaverConfig};
