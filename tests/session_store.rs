//! Session Store Tests
//!
//! Ledger behaviour through the public API: overwrite semantics, reset,
//! summary counts and the shared wrapper.

use device_checkup::{SessionSummary, SharedSessionStore, TestSessionStore};
use std::thread;

fn assert_consistent(summary: &SessionSummary) {
    assert_eq!(
        summary.passed_count + summary.failed_count,
        summary.total,
        "passed + failed must equal total"
    );
}

// =============================================================================
// Recording
// =============================================================================

#[test]
fn test_overwrite_keeps_last_verdict() {
    let mut store = TestSessionStore::new();
    store.record("lcd", true);
    store.record("microphone", false);
    store.record("lcd", false);

    let summary = store.summary();
    assert_eq!(summary.total, 2);
    assert_eq!(summary.passed_count, 0);
    assert_eq!(summary.failed_count, 2);
    assert_consistent(&summary);

    assert!(!store.outcome_for("lcd").unwrap().passed);
}

#[test]
fn test_empty_store() {
    let store = TestSessionStore::new();
    let summary = store.summary();

    assert_eq!(summary, SessionSummary::default());
    assert!(store.outcome_for("camera-rear").is_none());
}

#[test]
fn test_reset_after_five_passes() {
    let mut store = TestSessionStore::new();
    for id in ["lcd", "touch", "wifi", "gps", "nfc"] {
        store.record(id, true);
    }
    assert_eq!(store.summary().passed_count, 5);

    store.reset();

    let summary = store.summary();
    assert_eq!(summary.total, 0);
    assert_eq!(summary.passed_count, 0);
    assert_eq!(summary.failed_count, 0);
}

#[test]
fn test_reset_on_empty_store() {
    let mut store = TestSessionStore::new();
    store.reset();
    assert!(store.is_empty());
}

#[test]
fn test_unknown_ids_are_accepted_by_store() {
    // The ledger is id-agnostic; the catalog check happens in Checklist
    let mut store = TestSessionStore::new();
    store.record("not-in-catalog", true);
    assert_eq!(store.summary().total, 1);
}

#[test]
fn test_flip_flop_never_double_counts() {
    let mut store = TestSessionStore::new();
    for i in 0..10 {
        store.record("bluetooth", i % 2 == 0);
        let summary = store.summary();
        assert_eq!(summary.total, 1);
        assert_consistent(&summary);
    }
    // i == 9 was the last write
    assert!(!store.outcome_for("bluetooth").unwrap().passed);
}

#[test]
fn test_summary_after_mixed_verdicts() {
    let mut store = TestSessionStore::new();
    store.record("camera-front", true);
    store.record("camera-rear", false);
    store.record("battery", true);

    let summary = store.summary();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.passed_count, 2);
    assert_eq!(summary.failed_count, 1);
    assert!(!summary.all_passed());
    assert_eq!(summary.remaining(23), 20);
}

// =============================================================================
// Shared store
// =============================================================================

#[test]
fn test_shared_store_across_threads() {
    let shared = SharedSessionStore::new();

    let handles: Vec<_> = ["lcd", "touch", "speaker-top", "speaker-bottom"]
        .into_iter()
        .map(|id| {
            let store = shared.clone();
            thread::spawn(move || store.record(id, true))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let summary = shared.summary();
    assert_eq!(summary.total, 4);
    assert_eq!(summary.passed_count, 4);
}

#[test]
fn test_shared_store_reset_visible_to_clones() {
    let shared = SharedSessionStore::new();
    let other = shared.clone();

    shared.record("wifi", false);
    assert!(other.outcome_for("wifi").is_some());

    other.reset();
    assert!(shared.summary().is_empty());
}

// =============================================================================
// Arbitrary sequences against a model ledger
// =============================================================================

mod sequences {
    use device_checkup::TestSessionStore;
    use proptest::{collection::vec, prelude::*};
    use std::collections::HashMap;

    const IDS: &[&str] = &["lcd", "touch", "microphone", "camera-rear", "gps", "battery"];

    #[derive(Debug, Clone)]
    enum Op {
        Record(&'static str, bool),
        Reset,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            8 => (prop::sample::select(IDS), any::<bool>())
                .prop_map(|(id, passed)| Op::Record(id, passed)),
            1 => Just(Op::Reset),
        ]
    }

    proptest! {
        #[test]
        fn proptest_store_matches_model(ops in vec(op(), 0..64)) {
            let mut store = TestSessionStore::new();
            let mut model: HashMap<&str, bool> = HashMap::new();

            for op in ops {
                match op {
                    Op::Record(id, passed) => {
                        store.record(id, passed);
                        model.insert(id, passed);
                    }
                    Op::Reset => {
                        store.reset();
                        model.clear();
                        prop_assert!(store.is_empty());
                    }
                }

                let summary = store.summary();
                prop_assert_eq!(summary.total, model.len());
                prop_assert_eq!(summary.passed_count + summary.failed_count, summary.total);
                prop_assert_eq!(
                    summary.passed_count,
                    model.values().filter(|passed| **passed).count()
                );

                for id in IDS {
                    let recorded = store.outcome_for(id).map(|o| o.passed);
                    prop_assert_eq!(recorded, model.get(id).copied());
                }
            }
        }
    }
}
