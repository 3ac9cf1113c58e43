//! In-memory ledger of check outcomes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use super::summary::SessionSummary;

/// Recorded verdict for one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestOutcome {
    /// Catalog id of the check
    pub test_id: String,

    /// Whether the tester confirmed the hardware works
    pub passed: bool,

    /// When the verdict was recorded
    pub recorded_at: DateTime<Utc>,
}

/// Single source of truth for which checks were attempted and how they went.
///
/// Holds at most one outcome per test id. Recording an id again replaces
/// the earlier outcome. None of the operations can fail. Catalog membership
/// of ids is checked by the caller, not here.
#[derive(Debug, Clone, Default)]
pub struct TestSessionStore {
    outcomes: BTreeMap<String, TestOutcome>,
}

impl TestSessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a verdict stamped with the current time
    pub fn record(&mut self, test_id: impl Into<String>, passed: bool) {
        self.record_at(test_id, passed, Utc::now());
    }

    /// Record a verdict with an explicit timestamp
    pub fn record_at(&mut self, test_id: impl Into<String>, passed: bool, at: DateTime<Utc>) {
        let test_id = test_id.into();
        let replaced = self
            .outcomes
            .insert(
                test_id.clone(),
                TestOutcome {
                    test_id: test_id.clone(),
                    passed,
                    recorded_at: at,
                },
            )
            .is_some();

        debug!(test_id = %test_id, passed, replaced, "recorded outcome");
    }

    /// Drop every recorded outcome
    pub fn reset(&mut self) {
        let cleared = self.outcomes.len();
        self.outcomes.clear();
        debug!(cleared, "session reset");
    }

    /// Derived totals over the current outcomes
    pub fn summary(&self) -> SessionSummary {
        SessionSummary::from_outcomes(self.outcomes.values())
    }

    /// Outcome for a check, or `None` if it has not been attempted
    pub fn outcome_for(&self, test_id: &str) -> Option<&TestOutcome> {
        self.outcomes.get(test_id)
    }

    /// All outcomes ordered by test id
    pub fn outcomes(&self) -> impl Iterator<Item = &TestOutcome> {
        self.outcomes.values()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

impl Extend<TestOutcome> for TestSessionStore {
    /// Later outcomes for the same id win
    fn extend<T: IntoIterator<Item = TestOutcome>>(&mut self, iter: T) {
        for outcome in iter {
            self.outcomes.insert(outcome.test_id.clone(), outcome);
        }
    }
}

impl FromIterator<TestOutcome> for TestSessionStore {
    fn from_iter<T: IntoIterator<Item = TestOutcome>>(iter: T) -> Self {
        let mut store = Self::new();
        store.extend(iter);
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn assert_consistent(store: &TestSessionStore) {
        let summary = store.summary();
        assert_eq!(summary.passed_count + summary.failed_count, summary.total);
        assert_eq!(summary.total, store.len());
    }

    #[test]
    fn test_empty_store() {
        let store = TestSessionStore::new();
        assert_eq!(store.summary(), SessionSummary::default());
        assert!(store.outcome_for("camera-rear").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_overwrite_keeps_latest_verdict() {
        let mut store = TestSessionStore::new();
        store.record("lcd", true);
        store.record("microphone", false);
        store.record("lcd", false);

        let summary = store.summary();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.passed_count, 0);
        assert_eq!(summary.failed_count, 2);
        assert!(!store.outcome_for("lcd").unwrap().passed);
        assert_consistent(&store);
    }

    #[test]
    fn test_overwrite_updates_timestamp() {
        let mut store = TestSessionStore::new();
        let first = Utc::now() - Duration::minutes(5);
        let second = Utc::now();

        store.record_at("gps", false, first);
        store.record_at("gps", true, second);

        let outcome = store.outcome_for("gps").unwrap();
        assert!(outcome.passed);
        assert_eq!(outcome.recorded_at, second);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut store = TestSessionStore::new();
        let ids = ["lcd", "touch", "wifi", "gps", "nfc"];
        for id in ids {
            store.record(id, true);
        }
        assert_eq!(store.summary().passed_count, 5);

        store.reset();

        assert_eq!(store.summary(), SessionSummary::default());
        for id in ids {
            assert!(store.outcome_for(id).is_none());
        }
        assert_consistent(&store);
    }

    #[test]
    fn test_record_after_reset() {
        let mut store = TestSessionStore::new();
        store.record("battery", false);
        store.reset();
        store.record("battery", true);

        assert_eq!(store.summary().total, 1);
        assert!(store.outcome_for("battery").unwrap().passed);
    }

    #[test]
    fn test_outcomes_sorted_by_id() {
        let mut store = TestSessionStore::new();
        store.record("wifi", true);
        store.record("bluetooth", true);
        store.record("gps", false);

        let ids: Vec<_> = store.outcomes().map(|o| o.test_id.as_str()).collect();
        assert_eq!(ids, vec!["bluetooth", "gps", "wifi"]);
    }

    #[test]
    fn test_from_iter_last_wins() {
        let now = Utc::now();
        let store: TestSessionStore = vec![
            TestOutcome {
                test_id: "nfc".to_string(),
                passed: true,
                recorded_at: now,
            },
            TestOutcome {
                test_id: "nfc".to_string(),
                passed: false,
                recorded_at: now,
            },
        ]
        .into_iter()
        .collect();

        assert_eq!(store.len(), 1);
        assert!(!store.outcome_for("nfc").unwrap().passed);
    }
}
