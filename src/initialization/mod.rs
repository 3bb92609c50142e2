//! Application initialization.
//!
//! Sets up process-wide resources before a run: currently the logger.

mod logger;

// Re-export public API
pub use logger::init_logger_with;
