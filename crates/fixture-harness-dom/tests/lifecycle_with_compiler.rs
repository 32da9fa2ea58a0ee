// crates/fixture-harness-dom/tests/lifecycle_with_compiler.rs
// ============================================================================
// Module: Compiler Lifecycle Integration Tests
// Description: Fixture lifecycle driven against the reference compiler.
// Purpose: Ensure mounted views detach and scopes release through teardown.
// Dependencies: fixture-harness-core, fixture-harness-dom, serde_json
// ============================================================================

//! ## Overview
//! Drives [`FixtureLifecycle`] over [`Compiler`] the way suites do, including
//! directives that panic while the view host is mounting.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;

use fixture_harness_core::CallError;
use fixture_harness_core::CaseFailure;
use fixture_harness_core::CaseStatus;
use fixture_harness_core::Collaborator;
use fixture_harness_core::CollaboratorRegistry;
use fixture_harness_core::FixtureLifecycle;
use fixture_harness_core::LifecycleDriver;
use fixture_harness_core::ResolveError;
use fixture_harness_core::SequentialDriver;
use fixture_harness_core::SetupPlan;
use fixture_harness_core::SharedCollaborator;
use fixture_harness_core::SuiteBuilder;
use fixture_harness_core::SuiteDefinition;
use fixture_harness_core::TeardownStatus;
use fixture_harness_core::ViewHost;
use fixture_harness_core::ensure;
use fixture_harness_dom::Compiler;
use fixture_harness_dom::Directive;
use fixture_harness_dom::DirectiveRegistry;
use fixture_harness_dom::DomError;
use fixture_harness_dom::LinkContext;
use fixture_harness_dom::TemplateDescriptor;
use serde_json::Value;
use serde_json::json;

struct Clock;

impl Collaborator for Clock {
    fn methods(&self) -> &[&'static str] {
        &["now"]
    }

    fn call(&self, _method: &str, _args: &[Value]) -> Result<Value, CallError> {
        Ok(json!(1_700_000_000))
    }
}

struct ClockRegistry;

impl CollaboratorRegistry for ClockRegistry {
    fn resolve(
        &self,
        names: &BTreeSet<String>,
    ) -> Result<BTreeMap<String, SharedCollaborator>, ResolveError> {
        names
            .iter()
            .map(|name| match name.as_str() {
                "clock" => Ok((name.clone(), Arc::new(Clock) as SharedCollaborator)),
                other => Err(ResolveError::Unknown(other.to_string())),
            })
            .collect()
    }
}

struct Timestamp;

impl Directive for Timestamp {
    fn name(&self) -> &str {
        "timestamp"
    }

    fn link(&self, context: &LinkContext<'_>) -> Result<(), DomError> {
        let now = context.call("clock", "now", &[])?;
        context.scope().set("stamp", now)
    }
}

struct ExplodingLink;

impl Directive for ExplodingLink {
    fn name(&self) -> &str {
        "explodingLink"
    }

    fn link(&self, context: &LinkContext<'_>) -> Result<(), DomError> {
        context.scope().set("partial", json!(true))?;
        panic!("link exploded");
    }
}

struct ExplodingWatch;

impl Directive for ExplodingWatch {
    fn name(&self) -> &str {
        "explodingWatch"
    }

    fn link(&self, context: &LinkContext<'_>) -> Result<(), DomError> {
        context.scope().set("source", json!(1))?;
        context.watch(
            "source",
            "target",
            Box::new(|_: &Value| -> Value { panic!("derive exploded") }),
        )
    }
}

fn compiler() -> Compiler {
    let mut directives = DirectiveRegistry::new();
    directives.register(Timestamp).unwrap();
    directives.register(ExplodingLink).unwrap();
    directives.register(ExplodingWatch).unwrap();
    Compiler::new(directives)
}

fn lifecycle() -> (FixtureLifecycle<Compiler>, Compiler) {
    let compiler = compiler();
    (FixtureLifecycle::new(compiler.clone()), compiler)
}

/// Suite that sets up the clock and mounts `template` in its only case.
fn mounting(template: &'static str) -> SuiteDefinition<Compiler> {
    SuiteDefinition::new(move |suite: &mut SuiteBuilder<Compiler>| {
        suite.before_each(|scope| {
            scope.setup(&ClockRegistry, &SetupPlan::new().observe("clock", "now"))?;
            Ok(())
        });
        suite.case("mounts", move |scope| {
            let template: TemplateDescriptor =
                template.parse().map_err(|err: DomError| CaseFailure::new(err.to_string()))?;
            scope.mount(&template)?;
            ensure(scope.host().live_views() == 1, "expected exactly one live view")
        });
    })
}

#[test]
fn mount_then_end_case_leaves_nothing_behind() {
    let (lifecycle, compiler) = lifecycle();
    let mut context = lifecycle.begin_case("timestamp renders");
    lifecycle
        .setup(&mut context, &ClockRegistry, &SetupPlan::new().observe("clock", "now"))
        .unwrap();
    let template: TemplateDescriptor = "<span timestamp></span>".parse().unwrap();

    lifecycle.mount(&mut context, &template).unwrap();

    assert_eq!(context.isolated_state().unwrap().get("stamp"), Some(json!(1_700_000_000)));
    assert_eq!(context.spy("clock", "now").unwrap().invocation_count(), 1);
    assert_eq!(compiler.live_views(), 1);

    assert_eq!(lifecycle.end_case(context), TeardownStatus::Detached);
    assert_eq!(compiler.live_views(), 0);
    assert_eq!(compiler.live_scopes(), 0);
}

#[test]
fn consecutive_cases_get_fresh_isolated_state() {
    let (lifecycle, compiler) = lifecycle();
    let template: TemplateDescriptor = "<span timestamp></span>".parse().unwrap();
    let mut seen = Vec::new();

    for index in 0 .. 3 {
        let mut guard = lifecycle.guard(format!("case {index}"));
        guard.setup(&ClockRegistry, &SetupPlan::new().observe("clock", "now")).unwrap();
        let invocations = guard.context().instrumentation().total_invocations();
        assert_eq!(invocations, 0);
        guard.mount(&template).unwrap();
        let scope = guard.context().isolated_state().unwrap().id();
        assert!(!seen.contains(&scope));
        seen.push(scope);
        assert_eq!(compiler.live_views(), 1);
    }

    assert_eq!(compiler.live_views(), 0);
    assert_eq!(compiler.live_scopes(), 0);
}

#[test]
fn panicking_watcher_does_not_break_later_cases() {
    let compiler = compiler();
    let mut driver = SequentialDriver::new(FixtureLifecycle::new(compiler.clone()));
    driver.suite("exploding watcher".to_string(), mounting("<div exploding-watch></div>"));
    driver.suite("after watcher 1".to_string(), mounting("<span timestamp></span>"));
    driver.suite("after watcher 2".to_string(), mounting("<span timestamp></span>"));

    let report = driver.run();

    assert_eq!(
        report.cases[0].status,
        CaseStatus::Failed {
            message: "panicked: derive exploded".to_string()
        }
    );
    assert_eq!(report.cases[0].teardown, Some(TeardownStatus::NothingMounted));
    assert_eq!(report.cases[0].live_views_after, 0);
    assert_eq!(report.cases[1].status, CaseStatus::Passed);
    assert_eq!(report.cases[2].status, CaseStatus::Passed);
    assert_eq!(report.leaked_views, 0);
    assert_eq!(compiler.live_views(), 0);
    assert_eq!(compiler.live_scopes(), 0);
    assert_eq!(compiler.document().node_count(), 1);
}

#[test]
fn panicking_link_leaves_no_orphan_nodes() {
    let compiler = compiler();
    let mut driver = SequentialDriver::new(FixtureLifecycle::new(compiler.clone()));
    for index in 0 .. 5 {
        driver.suite(format!("exploding link #{index}"), mounting("<div exploding-link></div>"));
    }
    driver.suite("after link".to_string(), mounting("<span timestamp></span>"));

    let report = driver.run();

    assert_eq!(report.failed, 5);
    assert_eq!(report.passed, 1);
    assert!(report.cases[.. 5].iter().all(|outcome| {
        outcome.status
            == CaseStatus::Failed {
                message: "panicked: link exploded".to_string(),
            }
    }));
    assert_eq!(report.leaked_views, 0);
    assert_eq!(compiler.live_scopes(), 0);
    assert_eq!(compiler.document().node_count(), 1);
}
