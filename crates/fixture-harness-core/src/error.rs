// crates/fixture-harness-core/src/error.rs
// ============================================================================
// Module: Fixture Errors
// Description: Error taxonomy for fixture lifecycle operations.
// Purpose: Separate usage defects from collaborator and host failures.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Lifecycle operations report failures through [`FixtureError`]. Usage
//! defects in a suite definition surface as [`FixtureError::Precondition`] and
//! are never retried. Registry failures are wrapped without modification.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::collaborator::ResolveError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors emitted by fixture lifecycle operations.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixtureError {
    /// An operation was invoked in a state that does not allow it.
    #[error("precondition violated: {0}")]
    Precondition(String),
    /// Collaborator resolution failed in the registry.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    /// The view host could not provide a state root.
    #[error("view host unavailable: {0}")]
    Host(String),
    /// The view host failed to compile or attach a template.
    #[error("view mount failed: {0}")]
    Mount(String),
}

impl FixtureError {
    /// Builds a precondition violation with the provided message.
    #[must_use]
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }

    /// Returns true when the error reports a usage defect.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition(_))
    }
}
