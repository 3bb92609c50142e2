//! Saver lifecycle states.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::models::Experience;

/// Observable state of a `Saver`.
///
/// Transitions only move forward: `Uninitialized -> Running -> Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaverState {
    Uninitialized,
    Running,
    Closed,
}

/// Internal state, holding whatever each stage owns.
///
/// Before `init` the receiver and flusher wait here; `init` moves them into
/// the scheduling task and keeps only the handles needed to stop it.
pub(super) enum Lifecycle<F> {
    Uninitialized {
        intake: mpsc::Receiver<Experience>,
        flusher: F,
    },
    Running {
        shutdown: CancellationToken,
        task: JoinHandle<()>,
    },
    Closed,
}

impl<F> Lifecycle<F> {
    pub(super) fn state(&self) -> SaverState {
        match self {
            Lifecycle::Uninitialized { .. } => SaverState::Uninitialized,
            Lifecycle::Running { .. } => SaverState::Running,
            Lifecycle::Closed => SaverState::Closed,
        }
    }
}
