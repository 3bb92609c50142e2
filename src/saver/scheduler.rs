//! The scheduling loop that owns a saver's buffer.

use std::sync::Arc;

use log::{debug, error, info, trace, warn};
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::config::SaverConfig;
use crate::error_handling::{FlushError, FlushStats};
use crate::flusher::Flusher;
use crate::models::Experience;

/// Runs until `shutdown` is cancelled or every sender is gone.
///
/// The buffer lives only inside this task. Each iteration handles exactly one
/// event: an incoming record is appended, a tick triggers a flush, and the
/// shutdown signal ends the loop.
pub(super) async fn run<F: Flusher>(
    flusher: F,
    mut intake: mpsc::Receiver<Experience>,
    shutdown: CancellationToken,
    config: SaverConfig,
    stats: Arc<FlushStats>,
) {
    let mut buffer: Vec<Experience> = Vec::with_capacity(config.capacity);

    // First tick one full interval after start
    let mut ticker = interval_at(
        Instant::now() + config.flush_interval,
        config.flush_interval,
    );
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    debug!(
        "Saver loop started (capacity={}, interval={:?})",
        config.capacity, config.flush_interval
    );

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                debug!("Saver loop received close signal");
                break;
            }
            record = intake.recv() => {
                match record {
                    Some(record) => {
                        buffer.push(record);
                        stats.record_received();
                    }
                    None => {
                        debug!("All saver handles dropped, stopping loop");
                        break;
                    }
                }
            }
            _ = ticker.tick() => {
                flush_buffer(&flusher, &mut buffer, &stats, false).await;
            }
        }
    }

    intake.close();
    while let Ok(record) = intake.try_recv() {
        buffer.push(record);
        stats.record_received();
    }

    if config.drain_on_close && !buffer.is_empty() {
        info!("Flushing {} buffered experiences before close", buffer.len());
        flush_buffer(&flusher, &mut buffer, &stats, true).await;
    }

    if !buffer.is_empty() {
        warn!(
            "Saver closed with {} unflushed experiences; they are discarded",
            buffer.len()
        );
        stats.record_discarded(buffer.len());
    }

    debug!("Saver loop stopped");
}

/// Hands the buffer to the flusher and keeps whatever was not persisted.
///
/// `drain` selects the flusher's final-flush path used on close.
async fn flush_buffer<F: Flusher>(
    flusher: &F,
    buffer: &mut Vec<Experience>,
    stats: &FlushStats,
    drain: bool,
) {
    if buffer.is_empty() {
        trace!("Nothing buffered, skipping flush");
        return;
    }

    stats.record_attempt();
    let buffered = buffer.len();

    let result = if drain {
        flusher.drain(buffer.as_slice()).await
    } else {
        flusher.flush(buffer.as_slice()).await
    };

    match result {
        Ok(remainder) => {
            let written = buffered.saturating_sub(remainder.len());
            stats.record_written(written);
            debug!(
                "Flushed {} experiences, {} kept for the next tick",
                written,
                remainder.len()
            );
            *buffer = remainder;
        }
        Err(FlushError::Sink {
            chunk_index,
            remainder,
            source,
        }) => {
            let written = buffered.saturating_sub(remainder.len());
            stats.record_written(written);
            stats.record_sink_failure();
            error!(
                "Failed to save {} experience entities (chunk {}): {}",
                remainder.len(),
                chunk_index,
                source
            );
            *buffer = remainder;
        }
        Err(e) if e.is_too_small() => {
            stats.record_too_small();
            debug!("Waiting for more experiences: {}", e);
        }
        Err(e) => {
            error!("Failed to save {} experience entities: {}", buffered, e);
        }
    }
}
