// system-tests/tests/suites/teardown.rs
// ============================================================================
// Module: Teardown Tests
// Description: Failing and panicking cases still detach their views.
// Purpose: Validate teardown runs before the next case and nothing leaks.
// Dependencies: system-tests helpers
// ============================================================================

//! ## Overview
//! Guaranteed teardown observed from inside the following case and from the
//! document after the run.
//! Invariants:
//! - A failed or panicking case has its view detached before the next begins.
//! - Zero views remain attached once a run completes.

use fixture_harness_app::heavy_load_definition;
use fixture_harness_core::CaseStatus;
use fixture_harness_core::LifecycleDriver;
use fixture_harness_core::TeardownStatus;
use fixture_harness_core::ViewHost;
use fixture_harness_core::generate;
use helpers::fixtures::expecting_field;
use helpers::fixtures::failing_then_probing;
use helpers::fixtures::harness;
use helpers::fixtures::panicking;
use helpers::fixtures::small_payload;

use crate::helpers;

#[test]
fn failed_assertion_detaches_before_next_case() {
    let mut harness = harness(small_payload());
    generate(&mut harness.driver, &failing_then_probing(harness.module.clone()), 25, "probe");
    let report = harness.driver.run();

    assert_eq!(report.total(), 50);
    assert_eq!(report.failed, 25);
    assert_eq!(report.passed, 25);
    for pair in report.cases.chunks(2) {
        assert_eq!(
            pair[0].status,
            CaseStatus::Failed {
                message: "expected undefinedField to be defined".to_string()
            }
        );
        assert_eq!(pair[0].teardown, Some(TeardownStatus::Detached));
        assert_eq!(pair[0].live_views_after, 0);
        assert_eq!(pair[1].status, CaseStatus::Passed, "probe saw a leftover view");
    }
    assert_eq!(report.leaked_views, 0);
    assert_eq!(harness.compiler.live_views(), 0);
}

#[test]
fn panicking_case_is_reported_and_detached() {
    let mut harness = harness(small_payload());
    harness.driver.suite("panics".to_string(), panicking(harness.module.clone()));
    harness.driver.suite("after panic".to_string(), heavy_load_definition(harness.module.clone()));
    let report = harness.driver.run();

    assert_eq!(
        report.cases[0].status,
        CaseStatus::Failed {
            message: "panicked: assertion exploded mid-case".to_string()
        }
    );
    assert_eq!(report.cases[0].teardown, Some(TeardownStatus::Detached));
    assert_eq!(report.cases[1].status, CaseStatus::Passed);
    assert_eq!(report.leaked_views, 0);
    assert_eq!(harness.compiler.live_scopes(), 0);
}

#[test]
fn mixed_outcomes_leave_an_empty_document() {
    let mut harness = harness(small_payload());
    for index in 0_usize .. 300 {
        let module = harness.module.clone();
        let definition = match index % 3 {
            0 => expecting_field(module, "missing"),
            1 => panicking(module),
            _ => heavy_load_definition(module),
        };
        harness.driver.suite(format!("mixed #{index}"), definition);
    }
    let report = harness.driver.run();

    assert_eq!(report.failed, 200);
    assert_eq!(report.passed, 100);
    assert!(report.cases.iter().all(|outcome| outcome.teardown == Some(TeardownStatus::Detached)));
    assert_eq!(report.leaked_views, 0);
    assert_eq!(harness.compiler.live_views(), 0);
    assert_eq!(harness.compiler.live_scopes(), 0);
    assert_eq!(harness.compiler.document().node_count(), 1);
}
