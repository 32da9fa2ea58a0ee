// crates/fixture-harness-core/src/suite.rs
// ============================================================================
// Module: Suite Definitions
// Description: Suite definitions, hook registration, and suite generation.
// Purpose: Describe suites once and register isolated copies of them.
// Dependencies: crate::context, crate::driver, crate::lifecycle, thiserror
// ============================================================================

//! ## Overview
//! A [`SuiteDefinition`] is an immutable procedure that registers hooks and
//! cases on a [`SuiteBuilder`]. Drivers build a fresh set of hooks from the
//! definition for every suite they run, and every case receives a fresh
//! [`CaseScope`] over its own context. [`generate`] registers `n` copies of one
//! definition under deterministic labels.
//!
//! Invariants:
//! - Definitions capture no mutable state; cloning one shares the procedure,
//!   never per-case data.
//! - Hooks only reach case state through the [`CaseScope`] they are given.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use thiserror::Error;

use crate::collaborator::CallError;
use crate::collaborator::CollaboratorRegistry;
use crate::context::FixtureContext;
use crate::driver::LifecycleDriver;
use crate::error::FixtureError;
use crate::host::ViewHost;
use crate::lifecycle::FixtureLifecycle;
use crate::lifecycle::SetupPlan;

// ============================================================================
// SECTION: Case Results
// ============================================================================

/// Failure reported by a hook or case body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CaseFailure {
    /// Failure description.
    message: String,
}

impl CaseFailure {
    /// Creates a failure with the provided message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<FixtureError> for CaseFailure {
    fn from(error: FixtureError) -> Self {
        Self::new(error.to_string())
    }
}

impl From<CallError> for CaseFailure {
    fn from(error: CallError) -> Self {
        Self::new(error.to_string())
    }
}

/// Result returned by hooks and case bodies.
pub type CaseResult = Result<(), CaseFailure>;

/// Fails with `message` unless `condition` holds.
///
/// # Errors
///
/// Returns [`CaseFailure`] when `condition` is false.
pub fn ensure(condition: bool, message: impl Into<String>) -> CaseResult {
    if condition { Ok(()) } else { Err(CaseFailure::new(message)) }
}

// ============================================================================
// SECTION: Case Scope
// ============================================================================

/// Access to one case's context and the lifecycle operations over it.
pub struct CaseScope<'a, H: ViewHost> {
    /// Lifecycle running the case.
    lifecycle: &'a FixtureLifecycle<H>,
    /// Context owned by the running case.
    context: &'a mut FixtureContext<H>,
}

impl<'a, H: ViewHost> CaseScope<'a, H> {
    /// Creates a scope over `context`.
    pub fn new(lifecycle: &'a FixtureLifecycle<H>, context: &'a mut FixtureContext<H>) -> Self {
        Self {
            lifecycle,
            context,
        }
    }

    /// Returns the case context.
    #[must_use]
    pub fn context(&self) -> &FixtureContext<H> {
        self.context
    }

    /// Returns the view host.
    #[must_use]
    pub const fn host(&self) -> &H {
        self.lifecycle.host()
    }

    /// Runs setup for the case.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`FixtureLifecycle::setup`].
    pub fn setup(
        &mut self,
        registry: &dyn CollaboratorRegistry,
        plan: &SetupPlan,
    ) -> Result<(), FixtureError> {
        self.lifecycle.setup(self.context, registry, plan)
    }

    /// Mounts `template` for the case.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`FixtureLifecycle::mount`].
    pub fn mount(&mut self, template: &H::Template) -> Result<(), FixtureError> {
        self.lifecycle.mount(self.context, template)
    }
}

// ============================================================================
// SECTION: Suite Builder
// ============================================================================

/// Hook or case body operating on a case scope.
pub type Hook<H> = Box<dyn Fn(&mut CaseScope<'_, H>) -> CaseResult>;

/// A named case body.
pub struct CaseSpec<H: ViewHost> {
    /// Case name.
    name: String,
    /// Case body.
    body: Hook<H>,
}

impl<H: ViewHost> CaseSpec<H> {
    /// Returns the case name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the body against `scope`.
    ///
    /// # Errors
    ///
    /// Returns the body's failure.
    pub fn run(&self, scope: &mut CaseScope<'_, H>) -> CaseResult {
        (self.body)(scope)
    }
}

/// Hooks and cases registered by one suite definition.
pub struct SuiteBuilder<H: ViewHost> {
    /// Hooks run before every case, in registration order.
    before_each: Vec<Hook<H>>,
    /// Hooks run after every case, in registration order.
    after_each: Vec<Hook<H>>,
    /// Cases in registration order.
    cases: Vec<CaseSpec<H>>,
}

impl<H: ViewHost> SuiteBuilder<H> {
    /// Creates an empty builder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            before_each: Vec::new(),
            after_each: Vec::new(),
            cases: Vec::new(),
        }
    }

    /// Registers a hook run before each case.
    pub fn before_each(
        &mut self,
        hook: impl Fn(&mut CaseScope<'_, H>) -> CaseResult + 'static,
    ) -> &mut Self {
        self.before_each.push(Box::new(hook));
        self
    }

    /// Registers a hook run after each case, even when the case failed.
    pub fn after_each(
        &mut self,
        hook: impl Fn(&mut CaseScope<'_, H>) -> CaseResult + 'static,
    ) -> &mut Self {
        self.after_each.push(Box::new(hook));
        self
    }

    /// Registers a case.
    pub fn case(
        &mut self,
        name: impl Into<String>,
        body: impl Fn(&mut CaseScope<'_, H>) -> CaseResult + 'static,
    ) -> &mut Self {
        self.cases.push(CaseSpec {
            name: name.into(),
            body: Box::new(body),
        });
        self
    }

    /// Returns the before-each hooks.
    #[must_use]
    pub fn before_hooks(&self) -> &[Hook<H>] {
        &self.before_each
    }

    /// Returns the after-each hooks.
    #[must_use]
    pub fn after_hooks(&self) -> &[Hook<H>] {
        &self.after_each
    }

    /// Returns the registered cases.
    #[must_use]
    pub fn cases(&self) -> &[CaseSpec<H>] {
        &self.cases
    }
}

impl<H: ViewHost> Default for SuiteBuilder<H> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// SECTION: Suite Definition
// ============================================================================

/// Immutable procedure registering a suite's hooks and cases.
pub struct SuiteDefinition<H: ViewHost> {
    /// Registration procedure.
    body: Arc<dyn Fn(&mut SuiteBuilder<H>) + Send + Sync>,
}

impl<H: ViewHost> SuiteDefinition<H> {
    /// Creates a definition from a registration procedure.
    #[must_use]
    pub fn new(body: impl Fn(&mut SuiteBuilder<H>) + Send + Sync + 'static) -> Self {
        Self {
            body: Arc::new(body),
        }
    }

    /// Builds a fresh set of hooks and cases.
    #[must_use]
    pub fn build(&self) -> SuiteBuilder<H> {
        let mut builder = SuiteBuilder::new();
        (self.body)(&mut builder);
        builder
    }
}

impl<H: ViewHost> Clone for SuiteDefinition<H> {
    fn clone(&self) -> Self {
        Self {
            body: Arc::clone(&self.body),
        }
    }
}

impl<H: ViewHost> From<fn(&mut SuiteBuilder<H>)> for SuiteDefinition<H> {
    fn from(body: fn(&mut SuiteBuilder<H>)) -> Self {
        Self::new(body)
    }
}

// ============================================================================
// SECTION: Generation
// ============================================================================

/// Registers `count` copies of `definition` labeled `"{label} #{index}"` and
/// returns the labels in registration order.
pub fn generate<H, D>(
    driver: &mut D,
    definition: &SuiteDefinition<H>,
    count: usize,
    label: &str,
) -> Vec<String>
where
    H: ViewHost,
    D: LifecycleDriver<H> + ?Sized,
{
    (0 .. count)
        .map(|index| {
            let name = format!("{label} #{index}");
            driver.suite(name.clone(), definition.clone());
            name
        })
        .collect()
}
