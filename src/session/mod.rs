//! Session ledger for device checks
//!
//! Holds one outcome per check, derives dashboard totals from them, and can
//! optionally be saved to and restored from session.json.

mod shared;
mod snapshot;
mod store;
mod summary;

pub use shared::SharedSessionStore;
pub use snapshot::{SessionSnapshot, SnapshotError, SNAPSHOT_SCHEMA_ID, SNAPSHOT_SCHEMA_VERSION};
pub use store::{TestOutcome, TestSessionStore};
pub use summary::SessionSummary;
