//! End-to-end tests of the saver writing into SQLite.
//!
//! These use real time and an on-disk database, so expectations are polled
//! rather than asserted after a fixed sleep.

mod helpers;

use std::time::Duration;

use experience_saver::{ChunkFlusher, Saver, SaverConfig, SaverError, SaverState};
use helpers::{create_test_repo, make_experiences, wait_until};
use tempfile::TempDir;

fn config(drain_on_close: bool) -> SaverConfig {
    SaverConfig {
        capacity: 10,
        flush_interval: Duration::from_millis(100),
        drain_on_close,
    }
}

#[tokio::test]
async fn test_full_chunks_reach_database_and_tail_waits() {
    let dir = TempDir::new().expect("temp dir");
    let repo = create_test_repo(dir.path()).await;
    let saver = Saver::with_config(&config(false), ChunkFlusher::new(2, repo.clone())).unwrap();
    saver.init().unwrap();

    let repo_ref = &repo;
    let experiences = make_experiences(1, 5);
    for e in &experiences {
        saver.save(*e).await.unwrap();
    }

    assert!(
        wait_until(Duration::from_secs(5), || async move {
            repo_ref.count().await.unwrap() == 4
        })
        .await
    );
    // a few more ticks must not write the short tail
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(repo.count().await.unwrap(), 4);
    assert_eq!(repo.list(10, 0).await.unwrap(), experiences[..4].to_vec());

    saver.close().await.unwrap();
    assert_eq!(repo.count().await.unwrap(), 4);
    assert_eq!(saver.stats().snapshot().discarded, 1);
}

#[tokio::test]
async fn test_drain_on_close_persists_everything() {
    let dir = TempDir::new().expect("temp dir");
    let repo = create_test_repo(dir.path()).await;
    let saver = Saver::with_config(&config(true), ChunkFlusher::new(4, repo.clone())).unwrap();
    saver.init().unwrap();

    let experiences = make_experiences(1, 7);
    for e in &experiences {
        saver.save(*e).await.unwrap();
    }
    saver.close().await.unwrap();

    assert_eq!(repo.list(100, 0).await.unwrap(), experiences);
    assert_eq!(saver.state(), SaverState::Closed);
}

#[tokio::test]
async fn test_failed_chunk_is_retried_until_it_succeeds() {
    let dir = TempDir::new().expect("temp dir");
    let repo = create_test_repo(dir.path()).await;

    // id 3 already exists, so the second chunk collides on every attempt
    let conflicting = make_experiences(3, 1);
    repo.add_experiences(&conflicting).await.unwrap();

    let saver = Saver::with_config(&config(false), ChunkFlusher::new(2, repo.clone())).unwrap();
    saver.init().unwrap();
    let repo_ref = &repo;
    for e in make_experiences(1, 6) {
        saver.save(e).await.unwrap();
    }

    let stats = saver.stats();
    let stats_ref = &stats;
    assert!(
        wait_until(Duration::from_secs(5), || async move {
            stats_ref.snapshot().sink_failures >= 2
        })
        .await
    );
    // first chunk written once, nothing after the failing chunk
    assert_eq!(repo.count().await.unwrap(), 3);
    assert!(repo.describe(5).await.unwrap().is_none());

    // clear the conflict; the next tick writes the rest
    assert!(repo.remove(3).await.unwrap());
    assert!(
        wait_until(Duration::from_secs(5), || async move {
            repo_ref.count().await.unwrap() == 6
        })
        .await
    );
    assert_eq!(repo.list(10, 0).await.unwrap(), make_experiences(1, 6));

    saver.close().await.unwrap();
}

#[tokio::test]
async fn test_lifecycle_errors_surface_to_callers() {
    let dir = TempDir::new().expect("temp dir");
    let repo = create_test_repo(dir.path()).await;
    let saver = Saver::with_config(&config(false), ChunkFlusher::new(2, repo)).unwrap();
    let e = make_experiences(1, 1)[0];

    assert_eq!(saver.save(e).await, Err(SaverError::NotInitialized));
    assert_eq!(saver.close().await, Err(SaverError::NotInitialized));

    saver.init().unwrap();
    saver.close().await.unwrap();

    assert_eq!(saver.save(e).await, Err(SaverError::Closed));
    assert_eq!(saver.init(), Err(SaverError::Closed));
}
