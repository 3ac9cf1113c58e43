//! Device Checkup - hardware diagnostics checklist
//!
//! A tester walks through a catalog of device checks (display, touch,
//! speakers, microphone, cameras, sensors, connectivity, battery), watches
//! or listens to what the hardware does, and records a "works" or
//! "problem" verdict for each. This crate holds the session ledger of those
//! verdicts and the summary derived from it. Hardware access sits behind
//! probes that stream readings and never touch the ledger.

pub mod checklist;
pub mod config;
pub mod logging;
pub mod probe;
pub mod session;
pub mod signal;

pub use checkup_catalog as catalog;

pub use checklist::{run_probe, CheckStatus, Checklist, ChecklistError, ChecklistRow, ProbeRun, RunEnd};
pub use checkup_catalog::{Catalog, CatalogError, TestCategory, TestDefinition, TestKind};
pub use config::{EffectiveConfig, OutputFormat, Settings};
pub use probe::{Probe, ProbeError, ProbeRegistry, Reading, Subscription};
pub use session::{SessionSnapshot, SessionSummary, SharedSessionStore, TestOutcome, TestSessionStore};
