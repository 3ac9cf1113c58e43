//! Aggregate counts derived from the recorded outcomes

use serde::{Deserialize, Serialize};

use super::store::TestOutcome;

/// Totals shown on the dashboard.
///
/// Always derived from the current outcome set; never stored on its own.
/// `total == passed_count + failed_count` holds for every value built here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Number of distinct checks attempted
    pub total: usize,

    /// Checks whose latest verdict is "works"
    pub passed_count: usize,

    /// Checks whose latest verdict is "problem"
    pub failed_count: usize,
}

impl SessionSummary {
    /// Count outcomes in a single pass
    pub fn from_outcomes<'a, I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = &'a TestOutcome>,
    {
        let mut passed_count = 0;
        let mut failed_count = 0;

        for outcome in outcomes {
            if outcome.passed {
                passed_count += 1;
            } else {
                failed_count += 1;
            }
        }

        Self {
            total: passed_count + failed_count,
            passed_count,
            failed_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// True when at least one check ran and none failed
    pub fn all_passed(&self) -> bool {
        self.total > 0 && self.failed_count == 0
    }

    /// Checks in the catalog that have not been attempted yet
    pub fn remaining(&self, catalog_size: usize) -> usize {
        catalog_size.saturating_sub(self.total)
    }

    /// One-line description for terminal output
    pub fn human_summary(&self) -> String {
        if self.is_empty() {
            return "No checks recorded".to_string();
        }

        if self.all_passed() {
            if self.total == 1 {
                "1 check recorded, it works".to_string()
            } else {
                format!("All {} checks work", self.total)
            }
        } else {
            format!(
                "{} checks recorded: {} work, {} with problems",
                self.total, self.passed_count, self.failed_count
            )
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
