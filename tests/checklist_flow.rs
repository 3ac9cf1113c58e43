//! Checklist Flow Tests
//!
//! End-to-end flows: configuration decides where the session lives, the
//! checklist records verdicts after probe runs, and the session file
//! survives a reopen.

use device_checkup::catalog::Catalog;
use device_checkup::config::EffectiveConfig;
use device_checkup::session::{SessionSnapshot, SnapshotError};
use device_checkup::{
    run_probe, CheckStatus, Checklist, ChecklistError, ProbeRegistry, Reading, RunEnd,
};
use serde_json::json;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::{NamedTempFile, TempDir};

fn config_with_session(dir: &TempDir) -> EffectiveConfig {
    let path = dir.path().join("nested/session.json");
    EffectiveConfig::build(
        None,
        Some(json!({
            "session": { "path": path.to_string_lossy() },
            "probe": { "interval_ms": 1 }
        })),
    )
    .unwrap()
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_user_file_then_cli_override() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[output]\nformat = \"json\"\n\n[probe]\nsimulate = false").unwrap();

    let config =
        EffectiveConfig::build(Some(file.path()), Some(json!({ "probe": { "simulate": true } })))
            .unwrap();

    assert_eq!(config.get_str("output.format"), Some("json"));
    assert!(config.settings.probe.simulate, "CLI layer wins");
    assert_eq!(config.sources.len(), 3);
    assert!(config.sources[1].digest.is_some());
}

#[test]
fn test_invalid_interval_rejected() {
    let result = EffectiveConfig::build(None, Some(json!({ "probe": { "interval_ms": 0 } })));
    assert!(result.is_err());
}

// =============================================================================
// Recording through the checklist
// =============================================================================

#[test]
fn test_full_session_persists() {
    let dir = TempDir::new().unwrap();
    let config = config_with_session(&dir);
    let path = config.settings.session.path.clone();

    let mut checklist = Checklist::open(Catalog::builtin(), &path).unwrap();
    checklist.record("lcd", true).unwrap();
    checklist.record("microphone", false).unwrap();
    checklist.record("lcd", false).unwrap();
    checklist.save().unwrap();

    let snapshot = SessionSnapshot::from_file(&path).unwrap();
    let store = snapshot.restore();
    let summary = store.summary();
    assert_eq!(summary.total, 2);
    assert_eq!(summary.passed_count, 0);
    assert_eq!(summary.failed_count, 2);

    let reopened = Checklist::open(Catalog::builtin(), &path).unwrap();
    assert_eq!(reopened.status_of("lcd"), CheckStatus::Failed);
    assert_eq!(reopened.remaining(), 21);
}

#[test]
fn test_unknown_id_rejected_and_not_recorded() {
    let mut checklist = Checklist::in_memory(Catalog::builtin());
    let err = checklist.record("3dtouch", true).unwrap_err();

    assert!(matches!(err, ChecklistError::Catalog(_)));
    assert!(err.to_string().contains("3dtouch"));
    assert!(checklist.summary().is_empty());
}

#[test]
fn test_reset_clears_saved_session() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");

    let mut checklist = Checklist::open(Catalog::builtin(), &path).unwrap();
    for id in ["wifi", "bluetooth", "gps", "nfc", "cellular"] {
        checklist.record(id, true).unwrap();
    }
    checklist.save().unwrap();
    checklist.reset();
    checklist.save().unwrap();

    let reopened = Checklist::open(Catalog::builtin(), &path).unwrap();
    assert!(reopened.summary().is_empty());
    assert_eq!(reopened.session_id(), checklist.session_id());
}

#[test]
fn test_corrupt_session_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = Checklist::open(Catalog::builtin(), &path).unwrap_err();
    assert!(matches!(
        err,
        ChecklistError::Snapshot(SnapshotError::Json(_))
    ));
}

#[test]
fn test_reset_recovers_from_damaged_session_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "{ truncated").unwrap();

    assert!(Checklist::open(Catalog::builtin(), &path).is_err());

    let mut checklist = Checklist::open_or_fresh(Catalog::builtin(), &path);
    checklist.reset();
    checklist.save().unwrap();

    let reopened = Checklist::open(Catalog::builtin(), &path).unwrap();
    assert!(reopened.summary().is_empty());
}

#[test]
fn test_reset_recovers_from_foreign_schema() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");

    let mut foreign = SessionSnapshot::fresh();
    foreign.schema_id = "device-checkup/session@99".to_string();
    std::fs::write(&path, foreign.to_json().unwrap()).unwrap();

    let mut checklist = Checklist::open_or_fresh(Catalog::builtin(), &path);
    assert_ne!(checklist.session_id(), foreign.session_id);
    checklist.reset();
    checklist.save().unwrap();

    let reloaded = SessionSnapshot::from_file(&path).unwrap();
    assert!(reloaded.outcomes.is_empty());
    assert!(!path.with_extension("json.tmp").exists());
}

// =============================================================================
// Probe runs
// =============================================================================

#[test]
fn test_probe_run_then_verdict() {
    let mut checklist = Checklist::in_memory(Catalog::builtin());
    let kind = checklist.catalog().kind_of("battery");
    let registry = ProbeRegistry::simulated(Duration::from_millis(1));
    let mut probe = registry.probe_for(&kind);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let run = run_probe(
        &kind,
        probe.as_mut(),
        Duration::from_secs(5),
        None,
        move |r: Reading| sink.lock().unwrap().push(r),
    )
    .unwrap();

    assert_eq!(run.end, RunEnd::Finished);
    assert!(seen
        .lock()
        .unwrap()
        .iter()
        .any(|r| matches!(r, Reading::Battery { charging: true, .. })));

    // The run itself records nothing
    assert!(checklist.summary().is_empty());

    checklist.record("battery", true).unwrap();
    assert_eq!(checklist.status_of("battery"), CheckStatus::Passed);
}

#[test]
fn test_unavailable_probe_falls_back_to_manual_verdict() {
    let mut checklist = Checklist::in_memory(Catalog::builtin());
    let kind = checklist.catalog().kind_of("camera-rear");
    let mut probe = ProbeRegistry::new().probe_for(&kind);

    let err = run_probe(&kind, probe.as_mut(), Duration::from_secs(1), None, |_: Reading| {})
        .unwrap_err();
    assert!(err.allows_manual_fallback());

    checklist.record("camera-rear", false).unwrap();
    let summary = checklist.summary();
    assert_eq!(summary.passed_count + summary.failed_count, summary.total);
}
