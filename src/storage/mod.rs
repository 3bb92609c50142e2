// storage/mod.rs
// Database operations module

pub mod migrations;
pub mod pool;
pub mod repo;
pub mod sink;
#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used items
pub use migrations::run_migrations;
pub use pool::init_db_pool_with_path;
pub use repo::ExperienceRepo;
pub use sink::ChunkSink;
