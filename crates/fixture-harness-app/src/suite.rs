// crates/fixture-harness-app/src/suite.rs
// ============================================================================
// Module: Heavy Load Suite
// Description: App wiring and the generated heavy-load suite definition.
// Purpose: Describe one suite that the runner registers many times.
// Dependencies: fixture-harness-core, fixture-harness-dom, fixture-harness-registry
// ============================================================================

//! ## Overview
//! [`heavy_load_definition`] loads the `app` module before each case, spies
//! on the three service methods with call-through, compiles
//! [`HEAVY_LOAD_TEMPLATE`], and checks the isolated state. Teardown belongs to
//! the lifecycle driver, so the definition registers no cleanup of its own.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use fixture_harness_core::CaseFailure;
use fixture_harness_core::CaseResult;
use fixture_harness_core::CaseScope;
use fixture_harness_core::FixtureContext;
use fixture_harness_core::SetupPlan;
use fixture_harness_core::SharedCollaborator;
use fixture_harness_core::SuiteDefinition;
use fixture_harness_core::ensure;
use fixture_harness_dom::Compiler;
use fixture_harness_dom::DirectiveRegistry;
use fixture_harness_dom::TemplateDescriptor;
use fixture_harness_registry::AccessPolicy;
use fixture_harness_registry::ModuleRegistry;

use crate::directive::HEAVY_LOAD;
use crate::directive::HeavyLoadDirective;
use crate::error::AppError;
use crate::service::GET_HEAVY_LIST;
use crate::service::GET_HEAVY_OBJECT;
use crate::service::GET_HEAVY_STRING;
use crate::service::HeavyLoad;
use crate::service::Payload;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Template compiled by every generated case.
pub const HEAVY_LOAD_TEMPLATE: &str = "<div heavy-load></div>";
/// Default label prefix of generated suites.
pub const DEFAULT_SUITE_LABEL: &str = "heavyLoad effective directive";
/// Default number of generated suites.
pub const DEFAULT_SUITE_COUNT: usize = 3000;
/// Name of the app module.
pub const APP_MODULE: &str = "app";
/// Name of the single case in the heavy-load suite.
pub const COMPILE_CASE: &str = "should compile correctly";

// ============================================================================
// SECTION: Wiring
// ============================================================================

/// Builds the `app` module providing the `heavyLoad` capability.
///
/// # Errors
///
/// Returns [`AppError::Registry`] when registration fails.
pub fn app_module(payload: Payload, policy: AccessPolicy) -> Result<ModuleRegistry, AppError> {
    let mut module = ModuleRegistry::new(APP_MODULE, policy);
    module.register(HEAVY_LOAD, move || {
        let service: SharedCollaborator = Arc::new(HeavyLoad::new(payload));
        Ok(service)
    })?;
    Ok(module)
}

/// Builds a compiler with the `heavyLoad` directive registered.
///
/// # Errors
///
/// Returns [`AppError::Dom`] when directive registration fails.
pub fn app_compiler() -> Result<Compiler, AppError> {
    let mut directives = DirectiveRegistry::new();
    directives.register(HeavyLoadDirective)?;
    Ok(Compiler::new(directives))
}

/// Setup plan observing every heavy-load method.
#[must_use]
pub fn heavy_load_plan() -> SetupPlan {
    SetupPlan::new()
        .observe(HEAVY_LOAD, GET_HEAVY_STRING)
        .observe(HEAVY_LOAD, GET_HEAVY_OBJECT)
        .observe(HEAVY_LOAD, GET_HEAVY_LIST)
}

// ============================================================================
// SECTION: Suite Definition
// ============================================================================

/// Suite compiling the heavy-load directive against a fresh injector per case.
#[must_use]
pub fn heavy_load_definition(module: Arc<ModuleRegistry>) -> SuiteDefinition<Compiler> {
    SuiteDefinition::new(move |suite| {
        let module = Arc::clone(&module);
        suite.before_each(move |scope| {
            let injector = module.injector();
            scope.setup(&injector, &heavy_load_plan())?;
            Ok(())
        });
        suite.case(COMPILE_CASE, should_compile_correctly);
    })
}

/// Mounts the template and checks the directive initialized its state.
fn should_compile_correctly(scope: &mut CaseScope<'_, Compiler>) -> CaseResult {
    let template = HEAVY_LOAD_TEMPLATE
        .parse::<TemplateDescriptor>()
        .map_err(|err| CaseFailure::new(err.to_string()))?;
    scope.mount(&template)?;
    let context = scope.context();
    let Some(isolated) = context.isolated_state() else {
        return Err(CaseFailure::new("mounted view has no isolated state"));
    };
    ensure(isolated.is_defined("title"), "expected title to be defined")?;
    ensure(isolated.is_defined("items"), "expected items to be defined")?;
    ensure(was_invoked(context, GET_HEAVY_STRING), "expected getHeavyString to have been called")?;
    ensure(was_invoked(context, GET_HEAVY_LIST), "expected getHeavyList to have been called")
}

/// Returns true when the heavy-load `method` spy recorded a call.
fn was_invoked(context: &FixtureContext<Compiler>, method: &str) -> bool {
    context.spy(HEAVY_LOAD, method).is_some_and(|spy| spy.was_invoked())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
