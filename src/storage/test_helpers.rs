//! Shared test helpers for storage and pipeline tests.
//!
//! This module provides common utilities for database setup and test data creation.

#[cfg(test)]
use chrono::{DateTime, Utc};
#[cfg(test)]
use sqlx::SqlitePool;

#[cfg(test)]
use crate::models::Experience;
#[cfg(test)]
use crate::storage::run_migrations;

/// Creates a test database pool with migrations applied.
/// Uses an in-memory database for fast test execution.
#[cfg(test)]
pub async fn create_test_pool() -> SqlitePool {
    // A single connection keeps every query on the same in-memory database
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Creates `count` experiences with consecutive ids starting at `first_id`.
/// Every numeric field equals the id so records are easy to tell apart.
#[cfg(test)]
pub fn make_experiences(first_id: u64, count: u64) -> Vec<Experience> {
    let at = DateTime::<Utc>::UNIX_EPOCH;
    (first_id..first_id + count)
        .map(|i| Experience::new(i, i, i, at, at, i))
        .collect()
}
