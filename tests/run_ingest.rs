//! Integration tests for `run_ingest_until`.
//!
//! Each test writes a JSON-lines file into a temp directory and ingests it
//! into a fresh SQLite database there.

mod helpers;

use std::time::Duration;

use experience_saver::{run_ingest_until, Config, SaverConfig};
use helpers::{create_test_repo, make_experiences, to_json_lines, write_lines};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn ingest_config(dir: &TempDir, input: std::path::PathBuf, drain_on_close: bool) -> Config {
    Config {
        file: input,
        db_path: dir.path().join("experiences.db"),
        chunk_size: 3,
        saver: SaverConfig {
            capacity: 4,
            flush_interval: Duration::from_millis(50),
            drain_on_close,
        },
        ..Default::default()
    }
}

#[tokio::test]
async fn test_ingest_persists_every_record_with_drain() {
    let dir = TempDir::new().expect("temp dir");
    let experiences = make_experiences(1, 7);
    let mut lines = vec!["# experiences export".to_string(), String::new()];
    lines.extend(to_json_lines(&experiences));
    let input = write_lines(dir.path(), "input.jsonl", &lines);

    let report = run_ingest_until(ingest_config(&dir, input, true), CancellationToken::new())
        .await
        .expect("ingest should succeed");

    assert_eq!(report.total_lines, 7);
    assert_eq!(report.accepted, 7);
    assert_eq!(report.invalid, 0);
    assert_eq!(report.written, 7);
    assert_eq!(report.discarded, 0);
    assert!(!report.interrupted);

    let repo = create_test_repo(dir.path()).await;
    assert_eq!(repo.list(100, 0).await.unwrap(), experiences);
}

#[tokio::test]
async fn test_ingest_skips_invalid_lines() {
    let dir = TempDir::new().expect("temp dir");
    let experiences = make_experiences(10, 3);
    let mut lines = to_json_lines(&experiences);
    lines.insert(1, "{\"id\": \"not a number\"}".to_string());
    lines.push("garbage".to_string());
    let input = write_lines(dir.path(), "input.jsonl", &lines);

    let report = run_ingest_until(ingest_config(&dir, input, true), CancellationToken::new())
        .await
        .expect("ingest should succeed");

    assert_eq!(report.total_lines, 5);
    assert_eq!(report.accepted, 3);
    assert_eq!(report.invalid, 2);
    assert_eq!(report.written, 3);

    let repo = create_test_repo(dir.path()).await;
    assert_eq!(repo.count().await.unwrap(), 3);
}

#[tokio::test]
async fn test_ingest_without_drain_discards_buffer() {
    let dir = TempDir::new().expect("temp dir");
    let experiences = make_experiences(1, 2);
    let input = write_lines(dir.path(), "input.jsonl", &to_json_lines(&experiences));

    let mut config = ingest_config(&dir, input, false);
    config.saver.flush_interval = Duration::from_secs(3600);

    let report = run_ingest_until(config, CancellationToken::new())
        .await
        .expect("ingest should succeed");

    assert_eq!(report.accepted, 2);
    assert_eq!(report.written, 0);
    assert_eq!(report.discarded, 2);

    let repo = create_test_repo(dir.path()).await;
    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_ingest_stops_on_shutdown() {
    let dir = TempDir::new().expect("temp dir");
    let input = write_lines(
        dir.path(),
        "input.jsonl",
        &to_json_lines(&make_experiences(1, 5)),
    );
    let shutdown = CancellationToken::new();
    shutdown.cancel();

    let report = run_ingest_until(ingest_config(&dir, input, true), shutdown)
        .await
        .expect("ingest should succeed");

    assert!(report.interrupted);
    assert_eq!(report.accepted, 0);
    assert_eq!(report.written, 0);
}

#[tokio::test]
async fn test_ingest_missing_input_file() {
    let dir = TempDir::new().expect("temp dir");
    let config = ingest_config(&dir, dir.path().join("absent.jsonl"), true);

    let err = run_ingest_until(config, CancellationToken::new())
        .await
        .expect_err("missing input should fail");

    assert!(format!("{:#}", err).contains("Failed to open input file"));
}

#[tokio::test]
async fn test_ingest_rejects_invalid_config() {
    let dir = TempDir::new().expect("temp dir");
    let mut config = ingest_config(&dir, dir.path().join("absent.jsonl"), true);
    config.chunk_size = 0;

    let err = run_ingest_until(config, CancellationToken::new())
        .await
        .expect_err("zero chunk size should fail");

    assert!(format!("{:#}", err).contains("chunk size must be greater than zero"));
    // validation happens before the database is touched
    assert!(!dir.path().join("experiences.db").exists());
}
