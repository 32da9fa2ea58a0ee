// system-tests/tests/helpers/fixtures.rs
// ============================================================================
// Module: Suite Fixtures
// Description: App wiring and suite variants shared by system-tests.
// Purpose: Build isolated harnesses and definitions that fail on purpose.
// Dependencies: fixture-harness-app, fixture-harness-core, fixture-harness-dom
// ============================================================================

use std::sync::Arc;

use fixture_harness_app::COMPILE_CASE;
use fixture_harness_app::HEAVY_LOAD;
use fixture_harness_app::HEAVY_LOAD_TEMPLATE;
use fixture_harness_app::Payload;
use fixture_harness_app::app_compiler;
use fixture_harness_app::app_module;
use fixture_harness_app::heavy_load_plan;
use fixture_harness_core::CaseFailure;
use fixture_harness_core::CaseScope;
use fixture_harness_core::FixtureLifecycle;
use fixture_harness_core::LifecycleObserver;
use fixture_harness_core::SequentialDriver;
use fixture_harness_core::SuiteBuilder;
use fixture_harness_core::SuiteDefinition;
use fixture_harness_core::ViewHost;
use fixture_harness_core::ensure;
use fixture_harness_dom::Compiler;
use fixture_harness_dom::TemplateDescriptor;
use fixture_harness_registry::AccessPolicy;
use fixture_harness_registry::ModuleRegistry;

/// Payload small enough to run thousands of cases quickly.
pub fn small_payload() -> Payload {
    Payload {
        string_bytes: 64,
        list_len: 8,
        object_fields: 4,
    }
}

/// Compiler, module, and driver for one run.
pub struct Harness {
    /// Compiler shared with the driver's lifecycle.
    pub compiler: Compiler,
    /// The `app` module.
    pub module: Arc<ModuleRegistry>,
    /// Driver owning the lifecycle.
    pub driver: SequentialDriver<Compiler>,
}

/// Builds a fresh harness with an allow-all policy.
pub fn harness(payload: Payload) -> Harness {
    let compiler = app_compiler().expect("app compiler");
    let module = Arc::new(app_module(payload, AccessPolicy::allow_all()).expect("app module"));
    let driver = SequentialDriver::new(FixtureLifecycle::new(compiler.clone()));
    Harness {
        compiler,
        module,
        driver,
    }
}

/// Builds a fresh harness whose lifecycle reports to `observer`.
pub fn observed_harness(payload: Payload, observer: Arc<dyn LifecycleObserver>) -> Harness {
    let compiler = app_compiler().expect("app compiler");
    let module = Arc::new(app_module(payload, AccessPolicy::allow_all()).expect("app module"));
    let driver =
        SequentialDriver::new(FixtureLifecycle::with_observer(compiler.clone(), observer));
    Harness {
        compiler,
        module,
        driver,
    }
}

/// Registers the per-case injector setup used by the heavy-load suite.
fn heavy_load_setup(suite: &mut SuiteBuilder<Compiler>, module: &Arc<ModuleRegistry>) {
    let module = Arc::clone(module);
    suite.before_each(move |scope| {
        let injector = module.injector();
        scope.setup(&injector, &heavy_load_plan())?;
        Ok(())
    });
}

/// Mounts the heavy-load template in `scope`.
fn mount_heavy_load(scope: &mut CaseScope<'_, Compiler>) -> Result<(), CaseFailure> {
    let template = HEAVY_LOAD_TEMPLATE
        .parse::<TemplateDescriptor>()
        .map_err(|err| CaseFailure::new(err.to_string()))?;
    scope.mount(&template)?;
    Ok(())
}

/// Heavy-load suite whose case expects `field` on the isolated state.
pub fn expecting_field(module: Arc<ModuleRegistry>, field: &'static str) -> SuiteDefinition<Compiler> {
    SuiteDefinition::new(move |suite| {
        heavy_load_setup(suite, &module);
        suite.case(COMPILE_CASE, move |scope| {
            mount_heavy_load(scope)?;
            let defined = scope
                .context()
                .isolated_state()
                .is_some_and(|isolated| isolated.is_defined(field));
            ensure(defined, format!("expected {field} to be defined"))
        });
    })
}

/// Heavy-load suite whose case panics after mounting.
pub fn panicking(module: Arc<ModuleRegistry>) -> SuiteDefinition<Compiler> {
    SuiteDefinition::new(move |suite| {
        heavy_load_setup(suite, &module);
        suite.case(COMPILE_CASE, |scope| {
            mount_heavy_load(scope)?;
            panic!("assertion exploded mid-case");
        });
    })
}

/// Heavy-load suite with two cases; the second checks the first left nothing behind.
pub fn failing_then_probing(module: Arc<ModuleRegistry>) -> SuiteDefinition<Compiler> {
    SuiteDefinition::new(move |suite| {
        heavy_load_setup(suite, &module);
        suite.case("fails after mounting", |scope| {
            mount_heavy_load(scope)?;
            ensure(false, "expected undefinedField to be defined")
        });
        suite.case("starts with an empty document", |scope| {
            ensure(scope.host().live_views() == 0, "previous view still attached")?;
            ensure(!scope.context().is_mounted(), "context already mounted")?;
            mount_heavy_load(scope)
        });
    })
}

/// Heavy-load suite checking spies start at zero and count only this case.
pub fn counting_invocations(module: Arc<ModuleRegistry>) -> SuiteDefinition<Compiler> {
    SuiteDefinition::new(move |suite| {
        heavy_load_setup(suite, &module);
        suite.case("counts only its own calls", |scope| {
            let before = scope.context().instrumentation().total_invocations();
            ensure(before == 0, format!("spies started at {before}"))?;
            mount_heavy_load(scope)?;
            let spy = scope
                .context()
                .spy(HEAVY_LOAD, "getHeavyString")
                .ok_or_else(|| CaseFailure::new("getHeavyString not observed"))?;
            ensure(spy.invocation_count() == 1, "getHeavyString called more than once")?;
            scope.context().call(HEAVY_LOAD, "getHeavyObject", &[])?;
            let total = scope.context().instrumentation().total_invocations();
            ensure(total == 3, format!("expected 3 invocations, saw {total}"))
        });
    })
}
