//! Checklist: the catalog, the session ledger and its snapshot, together
//!
//! This is what the presentation layer drives. It validates ids against the
//! catalog before they reach the ledger, keeps the snapshot in step with the
//! ledger, and streams probe readings for checks that need hardware.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use checkup_catalog::{Catalog, CatalogError, TestCategory, TestDefinition, TestKind};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::probe::{MotionSmoother, Probe, ProbeError, Reading, Subscription};
use crate::session::{
    SessionSnapshot, SessionSummary, SnapshotError, TestOutcome, TestSessionStore,
};
use crate::signal::InterruptState;

/// How often a streaming run checks for completion
const RUN_POLL: Duration = Duration::from_millis(10);

/// Status mark shown next to a check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    NotRun,
    Passed,
    Failed,
}

impl CheckStatus {
    pub fn from_outcome(outcome: Option<&TestOutcome>) -> Self {
        match outcome {
            None => CheckStatus::NotRun,
            Some(o) if o.passed => CheckStatus::Passed,
            Some(_) => CheckStatus::Failed,
        }
    }

    pub fn mark(&self) -> &'static str {
        match self {
            CheckStatus::NotRun => "○",
            CheckStatus::Passed => "✓",
            CheckStatus::Failed => "✗",
        }
    }
}

/// One line of the checklist view
#[derive(Debug, Clone, Serialize)]
pub struct ChecklistRow {
    pub category: TestCategory,
    #[serde(flatten)]
    pub definition: TestDefinition,
    pub status: CheckStatus,
}

/// Checklist errors
#[derive(Debug, thiserror::Error)]
pub enum ChecklistError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Session file error: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// A checklist session, optionally backed by a session file
#[derive(Debug)]
pub struct Checklist {
    catalog: Catalog,
    store: TestSessionStore,
    snapshot: SessionSnapshot,
    path: Option<PathBuf>,
}

impl Checklist {
    /// Checklist that lives only as long as the process
    pub fn in_memory(catalog: Catalog) -> Self {
        Self {
            catalog,
            store: TestSessionStore::new(),
            snapshot: SessionSnapshot::fresh(),
            path: None,
        }
    }

    /// Resume the session stored at `path`, or start a new one there
    pub fn open(catalog: Catalog, path: &Path) -> Result<Self, ChecklistError> {
        let snapshot = SessionSnapshot::load_or_fresh(path)?;
        let store = snapshot.restore();
        debug!(
            path = %path.display(),
            session_id = %snapshot.session_id,
            outcomes = store.len(),
            "opened session"
        );
        Ok(Self {
            catalog,
            store,
            snapshot,
            path: Some(path.to_path_buf()),
        })
    }

    /// Like [`Checklist::open`], but an unreadable session file is replaced
    /// by a fresh session at the same path. Nothing is written until `save`.
    pub fn open_or_fresh(catalog: Catalog, path: &Path) -> Self {
        let snapshot = match SessionSnapshot::load_or_fresh(path) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "discarding unreadable session file");
                SessionSnapshot::fresh()
            }
        };
        Self {
            catalog,
            store: snapshot.restore(),
            snapshot,
            path: Some(path.to_path_buf()),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &TestSessionStore {
        &self.store
    }

    pub fn session_id(&self) -> &str {
        &self.snapshot.session_id
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Record a verdict for a catalog check
    pub fn record(&mut self, test_id: &str, passed: bool) -> Result<(), ChecklistError> {
        let definition = self.catalog.require(test_id)?;
        self.store.record(definition.id, passed);
        info!(test_id = definition.id, passed, "verdict recorded");
        Ok(())
    }

    /// Clear every verdict
    pub fn reset(&mut self) {
        self.store.reset();
        info!("checklist reset");
    }

    pub fn summary(&self) -> SessionSummary {
        self.store.summary()
    }

    /// Outcome for a catalog check; unknown ids are an error
    pub fn outcome_for(&self, test_id: &str) -> Result<Option<&TestOutcome>, ChecklistError> {
        let definition = self.catalog.require(test_id)?;
        Ok(self.store.outcome_for(definition.id))
    }

    pub fn status_of(&self, test_id: &str) -> CheckStatus {
        CheckStatus::from_outcome(self.store.outcome_for(test_id))
    }

    /// Every check in display order with its status
    pub fn rows(&self) -> Vec<ChecklistRow> {
        self.catalog
            .sections()
            .iter()
            .flat_map(|section| {
                section.tests.iter().map(move |def| ChecklistRow {
                    category: section.category,
                    definition: *def,
                    status: self.status_of(def.id),
                })
            })
            .collect()
    }

    /// Checks not attempted yet
    pub fn remaining(&self) -> usize {
        self.summary().remaining(self.catalog.len())
    }

    /// Write the session file if this checklist has one
    pub fn save(&mut self) -> Result<(), ChecklistError> {
        self.snapshot.update_from(&self.store);
        if let Some(ref path) = self.path {
            self.snapshot.write_to_file(path)?;
            debug!(path = %path.display(), "session saved");
        }
        Ok(())
    }

    /// Copy of the session as it would be written to disk
    pub fn snapshot(&self) -> SessionSnapshot {
        let mut snapshot = self.snapshot.clone();
        snapshot.update_from(&self.store);
        snapshot
    }
}

/// How a probe run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEnd {
    /// The requested duration elapsed
    Elapsed,
    /// The probe ran out of readings
    Finished,
    /// The tester interrupted the run
    Interrupted,
}

/// Result of streaming a probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeRun {
    pub readings: usize,
    pub end: RunEnd,
}

/// Stream readings from `probe` for up to `duration`.
///
/// Motion readings are smoothed before they reach `on_reading`. When an
/// [`InterruptState`] is given, an interrupt cancels the stream early.
/// The ledger is not touched; the caller records the tester's verdict.
pub fn run_probe<F>(
    kind: &TestKind,
    probe: &mut dyn Probe,
    duration: Duration,
    interrupt: Option<&InterruptState>,
    on_reading: F,
) -> Result<ProbeRun, ProbeError>
where
    F: FnMut(Reading) + Send + 'static,
{
    let (tx, rx) = std::sync::mpsc::channel::<Reading>();
    let smooth = matches!(kind, TestKind::Motion { .. });
    debug!(probe = probe.name(), ?duration, "starting probe run");

    let mut subscription: Subscription = probe.start(Box::new(move |reading| {
        let _ = tx.send(reading);
    }))?;

    if let Some(state) = interrupt {
        state.watch(subscription.cancel_handle());
    }

    let mut on_reading = on_reading;
    let mut smoother = MotionSmoother::default();
    let mut readings = 0;
    let started = Instant::now();

    let end = loop {
        for reading in rx.try_iter() {
            readings += 1;
            let reading = match reading {
                Reading::Motion(v) if smooth => Reading::Motion(smoother.push(v)),
                other => other,
            };
            on_reading(reading);
        }

        if subscription.is_cancelled() {
            break RunEnd::Interrupted;
        }
        if subscription.is_finished() {
            break RunEnd::Finished;
        }
        if started.elapsed() >= duration {
            break RunEnd::Elapsed;
        }
        thread::sleep(RUN_POLL);
    };

    subscription.cancel();
    if let Some(state) = interrupt {
        state.clear();
    }

    // Readings delivered between the last poll and the cancel
    if end != RunEnd::Interrupted {
        for reading in rx.try_iter() {
            readings += 1;
            let reading = match reading {
                Reading::Motion(v) if smooth => Reading::Motion(smoother.push(v)),
                other => other,
            };
            on_reading(reading);
        }
    }

    debug!(probe = subscription.probe(), readings, ?end, "probe run ended");
    Ok(ProbeRun { readings, end })
}
