// system-tests/tests/suites/isolation.rs
// ============================================================================
// Module: Isolation Tests
// Description: Generated suites that must not influence one another.
// Purpose: Validate per-case contexts keep outcomes and spies independent.
// Dependencies: system-tests helpers
// ============================================================================

//! ## Overview
//! Runs thousands of generated suites and compares outcomes case by case.
//! Invariants:
//! - One failing generated case changes no other case's outcome.
//! - Invocation counts start at zero in every case.

use fixture_harness_app::DEFAULT_SUITE_COUNT;
use fixture_harness_app::DEFAULT_SUITE_LABEL;
use fixture_harness_app::heavy_load_definition;
use fixture_harness_core::CaseStatus;
use fixture_harness_core::LifecycleDriver;
use fixture_harness_core::RunReport;
use fixture_harness_core::ViewHost;
use fixture_harness_core::generate;
use helpers::artifacts::TestArtifacts;
use helpers::fixtures::counting_invocations;
use helpers::fixtures::expecting_field;
use helpers::fixtures::harness;
use helpers::fixtures::small_payload;

use crate::helpers;

/// Index of the generated case flipped to fail.
const FLIPPED_INDEX: usize = 1234;

/// Runs the generated suites, flipping the case at `flip` when given.
fn run_generated(flip: Option<usize>) -> RunReport {
    let mut harness = harness(small_payload());
    for index in 0 .. DEFAULT_SUITE_COUNT {
        let module = harness.module.clone();
        let definition = if flip == Some(index) {
            expecting_field(module, "undefinedField")
        } else {
            heavy_load_definition(module)
        };
        harness.driver.suite(format!("{DEFAULT_SUITE_LABEL} #{index}"), definition);
    }
    let report = harness.driver.run();
    assert_eq!(harness.compiler.live_views(), 0);
    report
}

#[test]
fn three_thousand_generated_suites_pass_independently() -> Result<(), Box<dyn std::error::Error>> {
    let artifacts = TestArtifacts::new("three_thousand_generated_suites_pass_independently")?;
    let report = run_generated(None);
    artifacts.write_json("report.json", &report)?;

    assert_eq!(report.total(), DEFAULT_SUITE_COUNT);
    assert_eq!(report.passed, DEFAULT_SUITE_COUNT);
    assert_eq!(report.leaked_views, 0);
    assert!(report.cases.iter().all(|outcome| outcome.live_views_after == 0));
    artifacts.finish(report.is_success())?;
    Ok(())
}

#[test]
fn flipping_one_generated_case_changes_no_other_outcome() -> Result<(), Box<dyn std::error::Error>>
{
    let artifacts = TestArtifacts::new("flipping_one_generated_case_changes_no_other_outcome")?;
    let baseline = run_generated(None);
    let flipped = run_generated(Some(FLIPPED_INDEX));
    artifacts.write_json("flipped.json", &flipped)?;

    assert_eq!(flipped.total(), baseline.total());
    assert_eq!(flipped.failed, 1);
    assert_eq!(flipped.passed, DEFAULT_SUITE_COUNT - 1);
    for (index, (expected, actual)) in baseline.cases.iter().zip(&flipped.cases).enumerate() {
        if index == FLIPPED_INDEX {
            assert_eq!(
                actual.status,
                CaseStatus::Failed {
                    message: "expected undefinedField to be defined".to_string()
                }
            );
            assert_eq!(actual.teardown, expected.teardown);
        } else {
            assert_eq!(actual, expected, "case {index} changed");
        }
    }
    artifacts.finish(flipped.leaked_views == 0)?;
    Ok(())
}

#[test]
fn invocation_counts_start_fresh_in_every_case() {
    let mut harness = harness(small_payload());
    generate(&mut harness.driver, &counting_invocations(harness.module.clone()), 200, "counting");
    let report = harness.driver.run();

    let failures: Vec<_> = report.failures().collect();
    assert!(failures.is_empty(), "failures: {failures:?}");
    assert_eq!(report.passed, 200);
    assert_eq!(harness.compiler.live_views(), 0);
}
