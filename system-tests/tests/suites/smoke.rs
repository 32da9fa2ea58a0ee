// system-tests/tests/suites/smoke.rs
// ============================================================================
// Module: Smoke Tests
// Description: The heavy-load directive compiled through the full stack.
// Purpose: Validate the directive initializes from the instrumented service.
// Dependencies: system-tests helpers
// ============================================================================

//! ## Overview
//! One generated suite against the real module, injector, and compiler.
//! Invariants:
//! - `title` and `items` are defined on the isolated state after mounting.
//! - `getHeavyString` and `getHeavyList` are invoked during linking.

use fixture_harness_app::COMPILE_CASE;
use fixture_harness_app::DEFAULT_SUITE_LABEL;
use fixture_harness_app::HEAVY_LOAD;
use fixture_harness_app::HEAVY_LOAD_TEMPLATE;
use fixture_harness_app::heavy_load_definition;
use fixture_harness_app::heavy_load_plan;
use fixture_harness_core::CaseStatus;
use fixture_harness_core::FixtureLifecycle;
use fixture_harness_core::TeardownStatus;
use fixture_harness_core::ViewHost;
use fixture_harness_core::generate;
use fixture_harness_dom::TemplateDescriptor;
use helpers::artifacts::TestArtifacts;
use helpers::fixtures::harness;
use helpers::fixtures::small_payload;
use serde_json::json;

use crate::helpers;

#[test]
fn heavy_load_directive_compiles_correctly() -> Result<(), Box<dyn std::error::Error>> {
    let artifacts = TestArtifacts::new("heavy_load_directive_compiles_correctly")?;
    let mut harness = harness(small_payload());

    let labels =
        generate(&mut harness.driver, &heavy_load_definition(harness.module), 1, DEFAULT_SUITE_LABEL);
    let report = harness.driver.run();
    artifacts.write_json("report.json", &report)?;

    assert_eq!(labels, vec!["heavyLoad effective directive #0".to_string()]);
    assert_eq!(report.total(), 1);
    let outcome = &report.cases[0];
    assert_eq!(outcome.case, COMPILE_CASE);
    assert_eq!(outcome.status, CaseStatus::Passed);
    assert_eq!(outcome.teardown, Some(TeardownStatus::Detached));
    assert_eq!(harness.compiler.live_views(), 0);
    artifacts.finish(report.is_success())?;
    Ok(())
}

#[test]
fn lifecycle_exposes_isolated_state_and_spies() -> Result<(), Box<dyn std::error::Error>> {
    let harness = harness(small_payload());
    let lifecycle = FixtureLifecycle::new(harness.compiler.clone());
    let injector = harness.module.injector();
    let template: TemplateDescriptor = HEAVY_LOAD_TEMPLATE.parse()?;

    let mut guard = lifecycle.guard("manual heavy-load case");
    guard.setup(&injector, &heavy_load_plan())?;
    guard.mount(&template)?;
    {
        let context = guard.context();
        let isolated = context.isolated_state().expect("isolated state after mount");
        let title = isolated.get("title").expect("title defined");
        assert_eq!(title.as_str().map(str::len), Some(64));
        assert_eq!(isolated.get("items").and_then(|items| items.as_array().map(Vec::len)), Some(8));
        assert_eq!(isolated.get("itemCount"), Some(json!(8)));

        let string_spy = context.spy(HEAVY_LOAD, "getHeavyString").expect("string spy");
        let list_spy = context.spy(HEAVY_LOAD, "getHeavyList").expect("list spy");
        let object_spy = context.spy(HEAVY_LOAD, "getHeavyObject").expect("object spy");
        assert!(string_spy.was_invoked());
        assert!(list_spy.was_invoked());
        assert!(!object_spy.was_invoked());
        assert_eq!(harness.compiler.live_views(), 1);
    }

    assert_eq!(guard.finish(), TeardownStatus::Detached);
    assert_eq!(harness.compiler.live_views(), 0);
    assert_eq!(harness.compiler.live_scopes(), 0);
    Ok(())
}
