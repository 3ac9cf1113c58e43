//! Probes that do not touch hardware
//!
//! `ScriptedProbe` replays a fixed list of readings on a background thread,
//! which is how the checklist runs without device access. `UnavailableProbe`
//! stands in for capabilities the host cannot provide.

use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use super::subscription::{CancelHandle, Subscription};
use super::{Probe, ProbeError, Reading, ReadingSink};

/// Longest single sleep between cancellation checks
const CANCEL_POLL: Duration = Duration::from_millis(10);

/// Replays readings at a fixed interval until exhausted or cancelled
#[derive(Debug, Clone)]
pub struct ScriptedProbe {
    name: String,
    readings: Vec<Reading>,
    interval: Duration,
    repeat: bool,
    active: Option<CancelHandle>,
}

impl ScriptedProbe {
    pub fn new(name: impl Into<String>, readings: Vec<Reading>, interval: Duration) -> Self {
        Self {
            name: name.into(),
            readings,
            interval,
            repeat: false,
            active: None,
        }
    }

    /// Loop over the readings until cancelled
    pub fn repeating(mut self) -> Self {
        self.repeat = true;
        self
    }
}

/// Sleep for `total`, waking early if cancelled. Returns false on cancel.
fn sleep_unless_cancelled(handle: &CancelHandle, total: Duration) -> bool {
    let mut remaining = total;
    while !remaining.is_zero() {
        if handle.is_cancelled() {
            return false;
        }
        let step = remaining.min(CANCEL_POLL);
        thread::sleep(step);
        remaining -= step;
    }
    !handle.is_cancelled()
}

impl Probe for ScriptedProbe {
    fn name(&self) -> &str {
        &self.name
    }

    fn start(&mut self, mut on_reading: ReadingSink) -> Result<Subscription, ProbeError> {
        if let Some(ref active) = self.active {
            if active.is_active() {
                return Err(ProbeError::AlreadyRunning(self.name.clone()));
            }
        }

        let handle = CancelHandle::new();
        let producer = handle.clone();
        let readings = self.readings.clone();
        let interval = self.interval;
        let repeat = self.repeat && !readings.is_empty();
        let name = self.name.clone();

        debug!(probe = %name, readings = readings.len(), repeat, "starting scripted probe");

        let worker = thread::spawn(move || {
            'outer: loop {
                for reading in &readings {
                    if producer.is_cancelled() {
                        break 'outer;
                    }
                    on_reading(*reading);
                    if !sleep_unless_cancelled(&producer, interval) {
                        break 'outer;
                    }
                }
                if !repeat {
                    break;
                }
            }
            producer.mark_finished();
        });

        self.active = Some(handle.clone());
        Ok(Subscription::new(self.name.clone(), handle, worker))
    }
}

/// Probe for a capability the host does not have
#[derive(Debug, Clone)]
pub struct UnavailableProbe {
    name: String,
}

impl UnavailableProbe {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Probe for UnavailableProbe {
    fn name(&self) -> &str {
        &self.name
    }

    fn start(&mut self, _on_reading: ReadingSink) -> Result<Subscription, ProbeError> {
        warn!(probe = %self.name, "probe unavailable on this host");
        Err(ProbeError::Unavailable(self.name.clone()))
    }
}
