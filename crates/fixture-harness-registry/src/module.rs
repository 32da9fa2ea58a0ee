// crates/fixture-harness-registry/src/module.rs
// ============================================================================
// Module: Module Registry
// Description: Named collection of collaborator factories.
// Purpose: Route capability names to factories with policy checks.
// Dependencies: fixture-harness-core, thiserror
// ============================================================================

//! ## Overview
//! A [`ModuleRegistry`] is the unit a suite loads before each case. It owns
//! the factories for every capability the module provides and the
//! [`AccessPolicy`] that gates them. Resolving directly through the module
//! constructs fresh instances; [`ModuleRegistry::injector`] returns a caching
//! resolver scoped to one case.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use fixture_harness_core::CollaboratorRegistry;
use fixture_harness_core::ResolveError;
use fixture_harness_core::SharedCollaborator;
use thiserror::Error;

use crate::injector::Injector;
use crate::policy::AccessPolicy;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Builds one collaborator instance, or explains why it cannot.
pub type CollaboratorFactory =
    Arc<dyn Fn() -> Result<SharedCollaborator, String> + Send + Sync>;

/// Errors raised while registering capabilities.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The capability name is already taken in this module.
    #[error("capability already registered: {0}")]
    Duplicate(String),
    /// The capability name is empty or contains whitespace.
    #[error("invalid capability name: {0:?}")]
    InvalidName(String),
}

// ============================================================================
// SECTION: Module Registry
// ============================================================================

/// Named set of collaborator factories with policy enforcement.
///
/// # Invariants
/// - Capability names are unique within the module.
/// - Access policy is enforced on every resolution.
pub struct ModuleRegistry {
    /// Module name used in diagnostics.
    name: String,
    /// Factories keyed by capability name.
    factories: BTreeMap<String, CollaboratorFactory>,
    /// Access control policy for resolution.
    policy: AccessPolicy,
}

impl ModuleRegistry {
    /// Creates an empty module with the provided policy.
    #[must_use]
    pub fn new(name: impl Into<String>, policy: AccessPolicy) -> Self {
        Self {
            name: name.into(),
            factories: BTreeMap::new(),
            policy,
        }
    }

    /// Returns the module name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the configured policy.
    #[must_use]
    pub const fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Replaces the access policy.
    pub fn set_policy(&mut self, policy: AccessPolicy) {
        self.policy = policy;
    }

    /// Registers a factory under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when the name is invalid or already taken.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn() -> Result<SharedCollaborator, String> + Send + Sync + 'static,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(RegistryError::InvalidName(name));
        }
        if self.factories.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        self.factories.insert(name, Arc::new(factory));
        Ok(())
    }

    /// Registers a ready-made instance that every resolution shares.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when the name is invalid or already taken.
    pub fn register_instance(
        &mut self,
        name: impl Into<String>,
        instance: SharedCollaborator,
    ) -> Result<(), RegistryError> {
        self.register(name, move || Ok(Arc::clone(&instance)))
    }

    /// Returns true when `name` has a factory.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Returns registered capability names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Returns a caching resolver for one case.
    #[must_use]
    pub fn injector(&self) -> Injector<'_> {
        Injector::new(self)
    }

    /// Checks policy and runs the factory for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Blocked`] when policy denies the name,
    /// [`ResolveError::Unknown`] when no factory exists, and
    /// [`ResolveError::Construction`] when the factory fails.
    pub fn construct(&self, name: &str) -> Result<SharedCollaborator, ResolveError> {
        self.check_policy(name)?;
        let Some(factory) = self.factories.get(name) else {
            return Err(ResolveError::Unknown(name.to_string()));
        };
        factory().map_err(|reason| ResolveError::Construction {
            name: name.to_string(),
            reason,
        })
    }

    /// Fails when policy denies `name`.
    pub(crate) fn check_policy(&self, name: &str) -> Result<(), ResolveError> {
        if self.policy.is_allowed(name) {
            Ok(())
        } else {
            Err(ResolveError::Blocked(name.to_string()))
        }
    }
}

impl CollaboratorRegistry for ModuleRegistry {
    fn resolve(
        &self,
        names: &BTreeSet<String>,
    ) -> Result<BTreeMap<String, SharedCollaborator>, ResolveError> {
        names.iter().map(|name| Ok((name.clone(), self.construct(name)?))).collect()
    }
}

impl fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("name", &self.name)
            .field("capabilities", &self.factories.keys().collect::<Vec<_>>())
            .field("policy", &self.policy)
            .finish()
    }
}
