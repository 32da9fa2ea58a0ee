// crates/fixture-harness-app/src/error.rs
// ============================================================================
// Module: App Errors
// Description: Failures raised while wiring the app module and compiler.
// Purpose: Combine registry and directive registration failures.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! [`AppError`] is returned by the app's wiring helpers.

use fixture_harness_dom::DomError;
use fixture_harness_registry::RegistryError;
use thiserror::Error;

/// Errors raised while wiring the app.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// A capability could not be registered.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// A directive could not be registered.
    #[error(transparent)]
    Dom(#[from] DomError),
}
