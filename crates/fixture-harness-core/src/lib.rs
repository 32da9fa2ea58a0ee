// crates/fixture-harness-core/src/lib.rs
// ============================================================================
// Module: Fixture Harness Core
// Description: Per-case fixture lifecycle, instrumentation, and suite generation.
// Purpose: Give every test case a fresh context with guaranteed view teardown.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This crate implements the fixture lifecycle used to drive view-level tests
//! against a reactive state tree. Each case receives a freshly constructed
//! [`FixtureContext`] that owns its resolved collaborators, the
//! instrumentation recorded against them, and the view mounted for the case.
//! Teardown always detaches the mounted view, whether the case passed, failed,
//! or panicked.
//!
//! The crate only depends on narrow interfaces for its external collaborators:
//! - [`CollaboratorRegistry`] resolves named capabilities.
//! - [`ViewHost`] compiles templates into views attached to a live document.
//! - [`LifecycleDriver`] accepts suite registrations; [`SequentialDriver`] is
//!   the reference implementation.
//!
//! Invariants:
//! - A context is never shared between two cases.
//! - Instrumentation recorded in one context is invisible to every other.
//! - A context holds an isolated state exactly when it holds a mounted view.
//!
//! ## Index
//! - Context: [`FixtureContext`], [`MountedView`]
//! - Lifecycle: [`FixtureLifecycle`], [`SetupPlan`], [`CaseGuard`]
//! - Instrumentation: [`Instrumented`], [`InstrumentationTable`], [`Spy`]
//! - Suites: [`SuiteDefinition`], [`SuiteBuilder`], [`CaseScope`], [`generate`]
//! - Driving: [`LifecycleDriver`], [`SequentialDriver`], [`RunReport`]
//! - Telemetry: [`LifecycleObserver`], [`LifecycleEvent`], [`JsonLinesObserver`]

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod collaborator;
pub mod context;
pub mod driver;
pub mod error;
pub mod host;
pub mod instrument;
pub mod lifecycle;
pub mod report;
pub mod suite;
pub mod telemetry;

#[cfg(test)]
mod test_support;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use collaborator::CallError;
pub use collaborator::Collaborator;
pub use collaborator::CollaboratorRegistry;
pub use collaborator::CollaboratorSet;
pub use collaborator::ResolveError;
pub use collaborator::SharedCollaborator;
pub use context::FixtureContext;
pub use context::MountedView;
pub use driver::LifecycleDriver;
pub use driver::SequentialDriver;
pub use error::FixtureError;
pub use host::ViewHost;
pub use instrument::CallRecord;
pub use instrument::InstrumentationTable;
pub use instrument::Instrumented;
pub use instrument::Spy;
pub use lifecycle::CaseGuard;
pub use lifecycle::FixtureLifecycle;
pub use lifecycle::SetupPlan;
pub use report::CaseOutcome;
pub use report::CaseStatus;
pub use report::RunReport;
pub use report::TeardownStatus;
pub use suite::CaseFailure;
pub use suite::CaseResult;
pub use suite::CaseScope;
pub use suite::SuiteBuilder;
pub use suite::SuiteDefinition;
pub use suite::ensure;
pub use suite::generate;
pub use telemetry::JsonLinesObserver;
pub use telemetry::LifecycleEvent;
pub use telemetry::LifecycleObserver;
pub use telemetry::NoopObserver;
