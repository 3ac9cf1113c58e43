//! Session snapshot (session.json)
//!
//! Optional on-disk copy of the ledger so a checklist can be resumed by a
//! later process. The store itself never touches the filesystem.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use super::store::{TestOutcome, TestSessionStore};
use super::summary::SessionSummary;

/// Schema version for session.json
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Schema identifier for session.json
pub const SNAPSHOT_SCHEMA_ID: &str = "device-checkup/session@1";

/// Serialized form of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Schema version
    pub schema_version: u32,

    /// Schema identifier
    pub schema_id: String,

    /// Identifier of the checklist session
    pub session_id: String,

    /// When the session was started
    pub created_at: DateTime<Utc>,

    /// When the snapshot was written
    pub updated_at: DateTime<Utc>,

    /// Outcomes ordered by test id
    pub outcomes: Vec<TestOutcome>,

    /// Totals at the time of writing (informational; recomputed on load)
    pub summary: SessionSummary,
}

/// Snapshot load/save errors
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported snapshot schema {found} (expected {expected})")]
    SchemaMismatch { found: String, expected: String },

    #[error("Unsupported snapshot schema version {found} (expected {expected})")]
    VersionMismatch { found: u32, expected: u32 },
}

impl SessionSnapshot {
    /// Capture the current contents of a store
    pub fn capture(
        store: &TestSessionStore,
        session_id: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            schema_id: SNAPSHOT_SCHEMA_ID.to_string(),
            session_id: session_id.into(),
            created_at,
            updated_at: Utc::now(),
            outcomes: store.outcomes().cloned().collect(),
            summary: store.summary(),
        }
    }

    /// Start a fresh, empty session with a random id
    pub fn fresh() -> Self {
        Self::capture(
            &TestSessionStore::new(),
            uuid::Uuid::new_v4().to_string(),
            Utc::now(),
        )
    }

    /// Rebuild a store from the recorded outcomes.
    ///
    /// Duplicate ids keep the last entry, matching `record` semantics.
    pub fn restore(&self) -> TestSessionStore {
        self.outcomes.iter().cloned().collect()
    }

    /// Replace the outcomes with the contents of `store`
    pub fn update_from(&mut self, store: &TestSessionStore) {
        self.outcomes = store.outcomes().cloned().collect();
        self.summary = store.summary();
        self.updated_at = Utc::now();
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load from JSON, rejecting other schemas
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)?;
        if snapshot.schema_version != SNAPSHOT_SCHEMA_VERSION {
            return Err(SnapshotError::VersionMismatch {
                found: snapshot.schema_version,
                expected: SNAPSHOT_SCHEMA_VERSION,
            });
        }
        if snapshot.schema_id != SNAPSHOT_SCHEMA_ID {
            return Err(SnapshotError::SchemaMismatch {
                found: snapshot.schema_id,
                expected: SNAPSHOT_SCHEMA_ID.to_string(),
            });
        }
        Ok(snapshot)
    }

    /// Write atomically (temp file, then rename), creating parent directories
    pub fn write_to_file(&self, path: &Path) -> Result<(), SnapshotError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = self.to_json()?;

        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// Load from file
    pub fn from_file(path: &Path) -> Result<Self, SnapshotError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from file, or start a fresh session if the file does not exist
    pub fn load_or_fresh(path: &Path) -> Result<Self, SnapshotError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::fresh())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_store() -> TestSessionStore {
        let mut store = TestSessionStore::new();
        store.record("lcd", true);
        store.record("microphone", false);
        store
    }

    #[test]
    fn test_capture_and_restore() {
        let store = sample_store();
        let snapshot = SessionSnapshot::capture(&store, "session-1", Utc::now());

        assert_eq!(snapshot.schema_version, SNAPSHOT_SCHEMA_VERSION);
        assert_eq!(snapshot.outcomes.len(), 2);
        assert_eq!(snapshot.summary.failed_count, 1);

        let restored = snapshot.restore();
        assert_eq!(restored.summary(), store.summary());
        assert!(restored.outcome_for("lcd").unwrap().passed);
    }

    #[test]
    fn test_restore_duplicate_ids_last_wins() {
        let store = sample_store();
        let mut snapshot = SessionSnapshot::capture(&store, "session-1", Utc::now());
        let mut dup = snapshot.outcomes[0].clone();
        dup.passed = !dup.passed;
        snapshot.outcomes.push(dup.clone());

        let restored = snapshot.restore();
        assert_eq!(restored.len(), 2);
        assert_eq!(restored.outcome_for(&dup.test_id).unwrap().passed, dup.passed);
    }

    #[test]
    fn test_fresh_is_empty() {
        let snapshot = SessionSnapshot::fresh();
        assert!(snapshot.outcomes.is_empty());
        assert!(snapshot.summary.is_empty());
        assert!(!snapshot.session_id.is_empty());
    }

    #[test]
    fn test_update_from() {
        let mut snapshot = SessionSnapshot::fresh();
        let session_id = snapshot.session_id.clone();

        snapshot.update_from(&sample_store());

        assert_eq!(snapshot.session_id, session_id);
        assert_eq!(snapshot.summary.total, 2);
    }

    #[test]
    fn test_schema_mismatch_rejected() {
        let mut snapshot = SessionSnapshot::fresh();
        snapshot.schema_id = "something-else@1".to_string();
        let json = snapshot.to_json().unwrap();

        let err = SessionSnapshot::from_json(&json).unwrap_err();
        assert!(matches!(err, SnapshotError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_schema_version_mismatch_rejected() {
        let mut snapshot = SessionSnapshot::fresh();
        snapshot.schema_version = SNAPSHOT_SCHEMA_VERSION + 1;
        let json = snapshot.to_json().unwrap();

        let err = SessionSnapshot::from_json(&json).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::VersionMismatch { found, expected }
                if found == SNAPSHOT_SCHEMA_VERSION + 1 && expected == SNAPSHOT_SCHEMA_VERSION
        ));
    }

    #[test]
    fn test_write_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        let mut snapshot = SessionSnapshot::capture(&sample_store(), "session-3", Utc::now());
        snapshot.write_to_file(&path).unwrap();

        // Overwrite an existing file too
        snapshot.update_from(&TestSessionStore::new());
        snapshot.write_to_file(&path).unwrap();

        assert!(!path.with_extension("json.tmp").exists());
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);

        let loaded = SessionSnapshot::from_file(&path).unwrap();
        assert_eq!(loaded.session_id, "session-3");
        assert!(loaded.restore().is_empty());
    }

    #[test]
    fn test_write_and_read_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let snapshot = SessionSnapshot::capture(&sample_store(), "session-2", Utc::now());
        snapshot.write_to_file(&path).unwrap();

        let loaded = SessionSnapshot::from_file(&path).unwrap();
        assert_eq!(loaded.session_id, "session-2");
        assert_eq!(loaded.restore().summary().total, 2);
    }

    #[test]
    fn test_load_or_fresh_missing_file() {
        let dir = TempDir::new().unwrap();
        let snapshot = SessionSnapshot::load_or_fresh(&dir.path().join("absent.json")).unwrap();
        assert!(snapshot.outcomes.is_empty());
    }

    #[test]
    fn test_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let err = SessionSnapshot::from_file(&path).unwrap_err();
        assert!(matches!(err, SnapshotError::Json(_)));
    }
}
