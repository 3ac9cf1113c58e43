//! Cancellable subscription to a running probe

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use tracing::debug;

#[derive(Debug, Default)]
struct SubscriptionState {
    /// Cancellation requested by the consumer
    cancelled: AtomicBool,
    /// Producer ran out of readings on its own
    finished: AtomicBool,
}

/// Shared flag a producer polls and a consumer (or signal handler) sets.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    state: Arc<SubscriptionState>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }

    /// Called by the producer when it stops on its own
    pub fn mark_finished(&self) {
        self.state.finished.store(true, Ordering::SeqCst);
    }

    pub fn is_finished(&self) -> bool {
        self.state.finished.load(Ordering::SeqCst)
    }

    /// Neither cancelled nor finished
    pub fn is_active(&self) -> bool {
        !self.is_cancelled() && !self.is_finished()
    }
}

/// Live stream of readings from one probe.
///
/// Dropping the subscription cancels it and waits for the producer thread.
#[derive(Debug)]
pub struct Subscription {
    probe: String,
    handle: CancelHandle,
    worker: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Subscription backed by a producer thread
    pub fn new(probe: impl Into<String>, handle: CancelHandle, worker: JoinHandle<()>) -> Self {
        Self {
            probe: probe.into(),
            handle,
            worker: Some(worker),
        }
    }

    /// Subscription whose producer is driven elsewhere (callbacks, tests)
    pub fn detached(probe: impl Into<String>, handle: CancelHandle) -> Self {
        Self {
            probe: probe.into(),
            handle,
            worker: None,
        }
    }

    /// Name of the probe this subscription belongs to
    pub fn probe(&self) -> &str {
        &self.probe
    }

    /// Handle that can cancel this subscription from another thread
    pub fn cancel_handle(&self) -> CancelHandle {
        self.handle.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.handle.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stop the producer and wait for it to exit
    pub fn cancel(&mut self) {
        if self.handle.is_active() {
            debug!(probe = %self.probe, "cancelling subscription");
        }
        self.handle.cancel();
        self.join();
    }

    /// Wait until the producer finishes on its own or is cancelled elsewhere
    pub fn wait(mut self) {
        self.join();
    }

    fn join(&mut self) {
        if let Some(worker) = self.worker.take() {
            // A panicking producer has already stopped producing
            let _ = worker.join();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}
