// Shared test helpers for database setup and test data creation.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use experience_saver::{init_db_pool_with_path, Experience, ExperienceRepo};

/// Opens (or creates) a migrated database under `dir` and returns a repo over it.
#[allow(dead_code)] // Used by other test files
pub async fn create_test_repo(dir: &Path) -> ExperienceRepo {
    let pool = init_db_pool_with_path(&dir.join("experiences.db"))
        .await
        .expect("Failed to create test database");
    ExperienceRepo::new(pool)
}

/// Creates `count` experiences with consecutive ids starting at `first_id`.
#[allow(dead_code)]
pub fn make_experiences(first_id: u64, count: u64) -> Vec<Experience> {
    let from = DateTime::<Utc>::from_timestamp(1_600_000_000, 0).expect("valid timestamp");
    let to = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).expect("valid timestamp");
    (first_id..first_id + count)
        .map(|i| Experience::new(i, 1000 + i, i % 3, from, to, i % 5))
        .collect()
}

/// Writes `lines` to a file under `dir`, one per line.
#[allow(dead_code)]
pub fn write_lines(dir: &Path, name: &str, lines: &[String]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, lines.join("\n")).expect("Failed to write input file");
    path
}

/// Serializes experiences as JSON lines.
#[allow(dead_code)]
pub fn to_json_lines(experiences: &[Experience]) -> Vec<String> {
    experiences
        .iter()
        .map(|e| serde_json::to_string(e).expect("serializable experience"))
        .collect()
}

/// Polls `check` until it returns true or `limit` elapses.
#[allow(dead_code)]
pub async fn wait_until<F, Fut>(limit: Duration, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + limit;
    while tokio::time::Instant::now() < deadline {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    check().await
}
