// crates/fixture-harness-core/src/collaborator.rs
// ============================================================================
// Module: Collaborators
// Description: Collaborator call surface and registry interface.
// Purpose: Route method calls to resolved capabilities by name.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! Collaborators are external dependencies consumed by the view under test.
//! They expose a fixed method table and accept JSON arguments, which lets the
//! instrumentation layer decorate any collaborator without knowing its
//! concrete type. Registries resolve collaborators by capability name.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Call Surface
// ============================================================================

/// Errors raised by collaborator method calls.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    /// The named collaborator is not present in the set.
    #[error("collaborator not available: {0}")]
    UnknownCollaborator(String),
    /// The collaborator does not expose the requested method.
    #[error("method {method} not exposed by {collaborator}")]
    UnknownMethod {
        /// Collaborator type or capability name.
        collaborator: String,
        /// Requested method name.
        method: String,
    },
    /// Arguments were rejected by the collaborator.
    #[error("invalid arguments for {method}: {reason}")]
    InvalidArguments {
        /// Method that rejected the arguments.
        method: String,
        /// Rejection reason.
        reason: String,
    },
    /// The collaborator failed while executing the method.
    #[error("collaborator call failed: {0}")]
    Failed(String),
}

/// A dependency resolved by name and used by the view under test.
pub trait Collaborator: Send + Sync {
    /// Returns the method names this collaborator exposes.
    fn methods(&self) -> &[&'static str];

    /// Invokes the named method with JSON arguments.
    ///
    /// # Errors
    ///
    /// Returns [`CallError`] when the method is unknown, the arguments are
    /// invalid, or the collaborator fails.
    fn call(&self, method: &str, args: &[Value]) -> Result<Value, CallError>;

    /// Returns true when `method` is part of the method table.
    fn exposes(&self, method: &str) -> bool {
        self.methods().contains(&method)
    }
}

/// Shared handle to a resolved collaborator.
pub type SharedCollaborator = Arc<dyn Collaborator>;

// ============================================================================
// SECTION: Registry Interface
// ============================================================================

/// Errors raised while resolving collaborators.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No factory is registered for the capability.
    #[error("capability not registered: {0}")]
    Unknown(String),
    /// The capability exists but access policy denies it.
    #[error("capability blocked by policy: {0}")]
    Blocked(String),
    /// The capability factory failed to build an instance.
    #[error("capability {name} failed to construct: {reason}")]
    Construction {
        /// Capability name.
        name: String,
        /// Failure reason.
        reason: String,
    },
    /// Registry state could not be accessed.
    #[error("registry unavailable: {0}")]
    Unavailable(String),
}

/// Resolves named capabilities into live collaborator instances.
///
/// Resolution must be idempotent: resolving the same name twice from one
/// registry returns the same instance.
pub trait CollaboratorRegistry {
    /// Resolves every requested capability.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when any capability cannot be resolved.
    fn resolve(
        &self,
        names: &BTreeSet<String>,
    ) -> Result<BTreeMap<String, SharedCollaborator>, ResolveError>;
}

// ============================================================================
// SECTION: Collaborator Set
// ============================================================================

/// Collaborators held by a fixture context, keyed by capability name.
#[derive(Clone, Default)]
pub struct CollaboratorSet {
    /// Collaborators keyed by capability name.
    entries: BTreeMap<String, SharedCollaborator>,
}

impl CollaboratorSet {
    /// Creates an empty collaborator set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a collaborator, replacing any previous entry for `name`.
    pub fn insert(&mut self, name: impl Into<String>, collaborator: SharedCollaborator) {
        self.entries.insert(name.into(), collaborator);
    }

    /// Returns the collaborator registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SharedCollaborator> {
        self.entries.get(name)
    }

    /// Returns true when `name` is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Invokes `method` on the collaborator registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::UnknownCollaborator`] when `name` is absent, or the
    /// collaborator's own error otherwise.
    pub fn call(&self, name: &str, method: &str, args: &[Value]) -> Result<Value, CallError> {
        let Some(collaborator) = self.entries.get(name) else {
            return Err(CallError::UnknownCollaborator(name.to_string()));
        };
        collaborator.call(method, args)
    }

    /// Returns capability names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns the number of collaborators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no collaborators are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for CollaboratorSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}
