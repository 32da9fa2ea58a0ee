// crates/fixture-harness-core/src/driver.rs
// ============================================================================
// Module: Lifecycle Drivers
// Description: Suite registration interface and a sequential reference driver.
// Purpose: Run setup, body, and teardown for one case at a time.
// Dependencies: crate::lifecycle, crate::report, crate::suite
// ============================================================================

//! ## Overview
//! [`LifecycleDriver`] is the narrow contract suite generation relies on.
//! [`SequentialDriver`] runs every case in registration order: before-each
//! hooks, the body, after-each hooks, then teardown. Panics inside hooks or
//! bodies are caught and reported as failures, and teardown runs for every
//! case that started.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::panic::catch_unwind;

use crate::host::ViewHost;
use crate::lifecycle::FixtureLifecycle;
use crate::report::CaseOutcome;
use crate::report::CaseStatus;
use crate::report::RunReport;
use crate::report::TeardownStatus;
use crate::suite::CaseFailure;
use crate::suite::CaseResult;
use crate::suite::CaseScope;
use crate::suite::CaseSpec;
use crate::suite::SuiteBuilder;
use crate::suite::SuiteDefinition;
use crate::telemetry::LifecycleEvent;

// ============================================================================
// SECTION: Driver Trait
// ============================================================================

/// Accepts suite registrations.
pub trait LifecycleDriver<H: ViewHost> {
    /// Registers a suite built from `definition`.
    fn suite(&mut self, name: String, definition: SuiteDefinition<H>);
}

// ============================================================================
// SECTION: Sequential Driver
// ============================================================================

/// A suite registered with a [`SequentialDriver`].
struct RegisteredSuite<H: ViewHost> {
    /// Suite label.
    name: String,
    /// Suite definition.
    definition: SuiteDefinition<H>,
}

/// Runs registered suites one case at a time.
pub struct SequentialDriver<H: ViewHost> {
    /// Lifecycle used for every case.
    lifecycle: FixtureLifecycle<H>,
    /// Suites in registration order.
    suites: Vec<RegisteredSuite<H>>,
    /// Skip remaining cases after the first failure.
    fail_fast: bool,
}

impl<H: ViewHost> SequentialDriver<H> {
    /// Creates a driver with no registered suites.
    #[must_use]
    pub const fn new(lifecycle: FixtureLifecycle<H>) -> Self {
        Self {
            lifecycle,
            suites: Vec::new(),
            fail_fast: false,
        }
    }

    /// Sets whether the driver stops running cases after the first failure.
    #[must_use]
    pub const fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Returns the lifecycle.
    #[must_use]
    pub const fn lifecycle(&self) -> &FixtureLifecycle<H> {
        &self.lifecycle
    }

    /// Returns registered suite labels in order.
    #[must_use]
    pub fn suite_names(&self) -> Vec<&str> {
        self.suites.iter().map(|suite| suite.name.as_str()).collect()
    }

    /// Runs every registered case and returns the aggregated report.
    #[must_use]
    pub fn run(&self) -> RunReport {
        let mut report = RunReport::default();
        let mut halted = false;
        for suite in &self.suites {
            let builder = suite.definition.build();
            for case in builder.cases() {
                let outcome = if halted {
                    CaseOutcome {
                        suite: suite.name.clone(),
                        case: case.name().to_string(),
                        status: CaseStatus::Skipped,
                        teardown: None,
                        live_views_after: self.lifecycle.host().live_views(),
                    }
                } else {
                    self.run_case(&suite.name, &builder, case)
                };
                if self.fail_fast && matches!(outcome.status, CaseStatus::Failed { .. }) {
                    halted = true;
                }
                self.lifecycle.observer().record(&LifecycleEvent::CaseFinished {
                    case: case_label(&outcome.suite, &outcome.case),
                    status: outcome.status.as_str(),
                });
                report.push(outcome);
            }
        }
        report.leaked_views = self.lifecycle.host().live_views();
        report
    }

    /// Runs one case with a fresh context.
    fn run_case(&self, suite: &str, builder: &SuiteBuilder<H>, case: &CaseSpec<H>) -> CaseOutcome {
        let mut context = self.lifecycle.begin_case(case_label(suite, case.name()));
        let mut failure = None;
        {
            let mut scope = CaseScope::new(&self.lifecycle, &mut context);
            let body = run_guarded(|| {
                for hook in builder.before_hooks() {
                    hook(&mut scope)?;
                }
                case.run(&mut scope)
            });
            if let Err(err) = body {
                failure = Some(err);
            }
            for hook in builder.after_hooks() {
                if let Err(err) = run_guarded(|| hook(&mut scope)) {
                    failure.get_or_insert(err);
                }
            }
        }
        let teardown = self.lifecycle.end_case(context);
        if let TeardownStatus::Failed {
            message,
        } = &teardown
        {
            failure.get_or_insert_with(|| CaseFailure::new(format!("teardown failed: {message}")));
        }
        let status = failure.map_or(CaseStatus::Passed, |err| CaseStatus::Failed {
            message: err.message().to_string(),
        });
        CaseOutcome {
            suite: suite.to_string(),
            case: case.name().to_string(),
            status,
            teardown: Some(teardown),
            live_views_after: self.lifecycle.host().live_views(),
        }
    }
}

impl<H: ViewHost> LifecycleDriver<H> for SequentialDriver<H> {
    fn suite(&mut self, name: String, definition: SuiteDefinition<H>) {
        self.suites.push(RegisteredSuite {
            name,
            definition,
        });
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds the label used for a case in telemetry.
fn case_label(suite: &str, case: &str) -> String {
    format!("{suite} > {case}")
}

/// Runs `step`, converting a panic into a [`CaseFailure`].
fn run_guarded(step: impl FnOnce() -> CaseResult) -> CaseResult {
    match catch_unwind(AssertUnwindSafe(step)) {
        Ok(result) => result,
        Err(payload) => Err(CaseFailure::new(format!("panicked: {}", panic_message(&*payload)))),
    }
}

/// Extracts a readable message from a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string();
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }
    "non-string panic payload".to_string()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
