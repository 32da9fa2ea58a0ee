// crates/fixture-harness-core/src/report.rs
// ============================================================================
// Module: Run Reports
// Description: Per-case outcomes and aggregated run results.
// Purpose: Report case results and teardown defects in a serializable form.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Drivers produce one [`CaseOutcome`] per registered case and aggregate them
//! into a [`RunReport`]. A run succeeds only when no case failed and no view
//! remained attached to the document once every case finished.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

// ============================================================================
// SECTION: Statuses
// ============================================================================

/// Result of a case body and its hooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CaseStatus {
    /// Every hook and the body succeeded.
    Passed,
    /// A hook or the body failed or panicked.
    Failed {
        /// First failure observed for the case.
        message: String,
    },
    /// The case was not run.
    Skipped,
}

impl CaseStatus {
    /// Returns a stable label for the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed {
                ..
            } => "failed",
            Self::Skipped => "skipped",
        }
    }
}

/// Result of tearing a context down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TeardownStatus {
    /// A mounted view was detached.
    Detached,
    /// No view was mounted; nothing needed detaching.
    NothingMounted,
    /// A resource could not be released.
    Failed {
        /// Release failure details.
        message: String,
    },
}

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Outcome of a single case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseOutcome {
    /// Suite label.
    pub suite: String,
    /// Case name within the suite.
    pub case: String,
    /// Case result.
    #[serde(flatten)]
    pub status: CaseStatus,
    /// Teardown result; `None` for skipped cases.
    pub teardown: Option<TeardownStatus>,
    /// Views attached to the document right after teardown.
    pub live_views_after: usize,
}

impl CaseOutcome {
    /// Returns true when the case passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        matches!(self.status, CaseStatus::Passed)
    }
}

/// Aggregated results for a driver run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Outcomes in execution order.
    pub cases: Vec<CaseOutcome>,
    /// Number of passed cases.
    pub passed: usize,
    /// Number of failed cases.
    pub failed: usize,
    /// Number of skipped cases.
    pub skipped: usize,
    /// Views still attached once the run completed.
    pub leaked_views: usize,
}

impl RunReport {
    /// Appends an outcome and updates the totals.
    pub fn push(&mut self, outcome: CaseOutcome) {
        match outcome.status {
            CaseStatus::Passed => self.passed += 1,
            CaseStatus::Failed {
                ..
            } => self.failed += 1,
            CaseStatus::Skipped => self.skipped += 1,
        }
        self.cases.push(outcome);
    }

    /// Returns the number of recorded cases.
    #[must_use]
    pub fn total(&self) -> usize {
        self.cases.len()
    }

    /// Returns true when no case failed and no view leaked.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed == 0 && self.leaked_views == 0
    }

    /// Returns outcomes that failed.
    pub fn failures(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.cases.iter().filter(|outcome| matches!(outcome.status, CaseStatus::Failed { .. }))
    }
}
