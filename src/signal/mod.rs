//! Ctrl-C handling while a probe is streaming
//!
//! An interrupt while a probe is streaming cancels the subscription and
//! the tester is asked for a verdict. Any other interrupt, including one at
//! the verdict prompt, exits without recording anything.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::probe::CancelHandle;

/// Exit code used when the tester aborts with a second interrupt
pub const EXIT_CODE_INTERRUPTED: i32 = 130;

/// Action to take after receiving an interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalAction {
    /// First interrupt: stop the running probe
    StopProbe,
    /// Second interrupt: exit immediately
    ImmediateExit,
    /// Further interrupts are ignored
    Ignore,
}

/// Shared interrupt state
#[derive(Debug, Default)]
pub struct InterruptState {
    signal_count: AtomicU8,
    active: Mutex<Option<CancelHandle>>,
}

impl InterruptState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `handle` the subscription cancelled by the next interrupt
    pub fn watch(&self, handle: CancelHandle) {
        if let Ok(mut active) = self.active.lock() {
            *active = Some(handle);
        }
    }

    /// Forget the watched subscription
    pub fn clear(&self) {
        if let Ok(mut active) = self.active.lock() {
            *active = None;
        }
    }

    pub fn signal_count(&self) -> u8 {
        self.signal_count.load(Ordering::SeqCst)
    }

    /// Handle one interrupt and report what the caller should do.
    ///
    /// Only an interrupt that lands while a watched probe is still streaming
    /// stops the probe; anywhere else (such as the verdict prompt) it exits.
    pub fn handle_signal(&self) -> SignalAction {
        let count = self.signal_count.fetch_add(1, Ordering::SeqCst);
        match count {
            0 if self.cancel_active() => SignalAction::StopProbe,
            0 | 1 => SignalAction::ImmediateExit,
            _ => SignalAction::Ignore,
        }
    }

    /// Cancel the watched subscription if it is still streaming
    fn cancel_active(&self) -> bool {
        let Ok(active) = self.active.lock() else {
            return false;
        };
        match *active {
            Some(ref handle) if handle.is_active() => {
                handle.cancel();
                true
            }
            _ => false,
        }
    }

    /// Start counting interrupts from zero again once a probe run is over
    pub fn rearm(&self) {
        self.signal_count.store(0, Ordering::SeqCst);
        self.clear();
    }
}

/// Installs the process-wide Ctrl-C handler over an [`InterruptState`]
pub struct SignalHandler {
    state: Arc<InterruptState>,
}

impl SignalHandler {
    pub fn new() -> Self {
        Self {
            state: Arc::new(InterruptState::new()),
        }
    }

    pub fn state(&self) -> Arc<InterruptState> {
        Arc::clone(&self.state)
    }

    /// Install the handler. Must be called at most once per process.
    pub fn install(&self) -> Result<(), ctrlc::Error> {
        let state = Arc::clone(&self.state);
        ctrlc::set_handler(move || match state.handle_signal() {
            SignalAction::StopProbe => {
                debug!("interrupt received, stopping probe");
                eprintln!("\nStopping probe...");
            }
            SignalAction::ImmediateExit => {
                eprintln!("\nInterrupted, nothing recorded.");
                std::process::exit(EXIT_CODE_INTERRUPTED);
            }
            SignalAction::Ignore => {}
        })
    }
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self::new()
    }
}
