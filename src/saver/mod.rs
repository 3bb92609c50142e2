//! Asynchronous write buffering.
//!
//! A `Saver` accepts experiences one at a time from any number of tasks and
//! hands them to a `Flusher` in bulk on a fixed interval. Producers only touch
//! a bounded channel; the buffer itself belongs to a single background task,
//! so no lock guards it.
//!
//! ```no_run
//! use std::time::Duration;
//! use experience_saver::{ChunkFlusher, ExperienceRepo, Saver};
//!
//! # async fn example(repo: ExperienceRepo, e: experience_saver::Experience) -> anyhow::Result<()> {
//! let saver = Saver::new(1000, ChunkFlusher::new(100, repo), Duration::from_secs(1))?;
//! saver.init()?;
//! saver.save(e).await?;
//! saver.close().await?;
//! # Ok(())
//! # }
//! ```

mod lifecycle;
mod scheduler;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{debug, error};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::SaverConfig;
use crate::error_handling::{FlushStats, InitializationError, SaverError};
use crate::flusher::Flusher;
use crate::models::Experience;

use lifecycle::Lifecycle;
pub use lifecycle::SaverState;

/// Buffers experiences and flushes them periodically.
///
/// Call `init` once before use and `close` once on shutdown. Methods take
/// `&self`, so a saver can be shared between producers through an `Arc`.
pub struct Saver<F: Flusher> {
    intake: mpsc::Sender<Experience>,
    lifecycle: Mutex<Lifecycle<F>>,
    config: SaverConfig,
    stats: Arc<FlushStats>,
}

impl<F: Flusher> Saver<F> {
    /// Creates a saver with an intake queue of `capacity` records that flushes
    /// every `flush_interval`.
    pub fn new(
        capacity: usize,
        flusher: F,
        flush_interval: Duration,
    ) -> Result<Self, InitializationError> {
        let config = SaverConfig {
            capacity,
            flush_interval,
            ..Default::default()
        };
        Self::with_config(&config, flusher)
    }

    pub fn with_config(config: &SaverConfig, flusher: F) -> Result<Self, InitializationError> {
        config.validate()?;

        let (intake, receiver) = mpsc::channel(config.capacity);
        Ok(Saver {
            intake,
            lifecycle: Mutex::new(Lifecycle::Uninitialized {
                intake: receiver,
                flusher,
            }),
            config: config.clone(),
            stats: Arc::new(FlushStats::new()),
        })
    }

    /// Starts the scheduling loop on the current Tokio runtime.
    ///
    /// Calling it again while running does nothing.
    ///
    /// # Errors
    ///
    /// `SaverError::Closed` if the saver has already been closed.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime. The saver stays
    /// uninitialized in that case.
    pub fn init(&self) -> Result<(), SaverError> {
        // Resolved before the state is taken so a panic leaves it untouched
        let runtime = Handle::current();

        let mut lifecycle = self.lock();
        match std::mem::replace(&mut *lifecycle, Lifecycle::Closed) {
            Lifecycle::Uninitialized { intake, flusher } => {
                let shutdown = CancellationToken::new();
                let task = runtime.spawn(scheduler::run(
                    flusher,
                    intake,
                    shutdown.clone(),
                    self.config.clone(),
                    Arc::clone(&self.stats),
                ));
                *lifecycle = Lifecycle::Running { shutdown, task };
            }
            running @ Lifecycle::Running { .. } => {
                *lifecycle = running;
                return Ok(());
            }
            Lifecycle::Closed => return Err(SaverError::Closed),
        }

        debug!("Saver initialized");
        Ok(())
    }

    /// Queues one experience for the next flush.
    ///
    /// Waits while the intake queue is full; records are never dropped.
    ///
    /// # Errors
    ///
    /// `SaverError::NotInitialized` before `init`, `SaverError::Closed` after `close`.
    pub async fn save(&self, experience: Experience) -> Result<(), SaverError> {
        match self.state() {
            SaverState::Uninitialized => return Err(SaverError::NotInitialized),
            SaverState::Closed => return Err(SaverError::Closed),
            SaverState::Running => {}
        }

        // The loop drops the receiver when it stops, which fails any send
        // still waiting for room.
        self.intake
            .send(experience)
            .await
            .map_err(|_| SaverError::Closed)
    }

    /// Stops the scheduling loop and waits for it to finish.
    ///
    /// Buffered experiences are only flushed first when `drain_on_close` is
    /// set; otherwise they are discarded. Closing twice does nothing.
    ///
    /// # Errors
    ///
    /// `SaverError::NotInitialized` if `init` was never called.
    pub async fn close(&self) -> Result<(), SaverError> {
        let task = {
            let mut lifecycle = self.lock();
            match std::mem::replace(&mut *lifecycle, Lifecycle::Closed) {
                Lifecycle::Running { shutdown, task } => {
                    shutdown.cancel();
                    task
                }
                Lifecycle::Closed => return Ok(()),
                uninitialized @ Lifecycle::Uninitialized { .. } => {
                    *lifecycle = uninitialized;
                    return Err(SaverError::NotInitialized);
                }
            }
        };

        if let Err(e) = task.await {
            error!("Saver loop terminated abnormally: {}", e);
        }

        debug!("Saver closed");
        Ok(())
    }

    pub fn state(&self) -> SaverState {
        self.lock().state()
    }

    pub fn config(&self) -> &SaverConfig {
        &self.config
    }

    /// Counters maintained by the scheduling loop.
    pub fn stats(&self) -> Arc<FlushStats> {
        Arc::clone(&self.stats)
    }

    fn lock(&self) -> MutexGuard<'_, Lifecycle<F>> {
        self.lifecycle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
