//! Cancellable periodic polling.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Orders responses from overlapping requests.
///
/// Each request takes a number from [`SequenceGate::issue`]; a response is
/// applied only if [`SequenceGate::accept`] says it is newer than every
/// response applied so far and the gate is still open.
#[derive(Debug, Default)]
pub struct SequenceGate {
    issued: AtomicU64,
    applied: AtomicU64,
    closed: AtomicBool,
}

impl SequenceGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Numbers start at 1.
    pub fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn accept(&self, sequence: u64) -> bool {
        if self.closed.load(Ordering::Acquire) {
            return false;
        }
        self.applied.fetch_max(sequence, Ordering::AcqRel) < sequence
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

/// A spawned task calling `tick` every `period`, first call immediately.
///
/// Ticks never overlap: the next one starts only after the previous future
/// completes, and ticks missed meanwhile are delayed rather than bursted.
/// Dropping the loop stops it.
#[derive(Debug)]
pub struct PollLoop {
    gate: Arc<SequenceGate>,
    handle: JoinHandle<()>,
}

impl PollLoop {
    pub fn spawn<F, Fut>(period: Duration, gate: Arc<SequenceGate>, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                tick().await;
            }
        });
        Self { gate, handle }
    }

    /// Close the gate first so a response already in flight is discarded,
    /// then cancel the task.
    pub fn stop(&self) {
        self.gate.close();
        self.handle.abort();
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.gate.is_closed()
    }
}

impl Drop for PollLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
