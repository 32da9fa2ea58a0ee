// crates/fixture-harness-registry/src/injector.rs
// ============================================================================
// Module: Injector
// Description: Per-case caching resolver over a module registry.
// Purpose: Hand out one collaborator instance per name within a case.
// Dependencies: fixture-harness-core
// ============================================================================

//! ## Overview
//! An [`Injector`] borrows its [`ModuleRegistry`] and memoizes every
//! collaborator it constructs. Asking twice for the same name inside one case
//! yields the same instance; a new case takes a new injector and therefore
//! new instances.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;

use fixture_harness_core::CollaboratorRegistry;
use fixture_harness_core::ResolveError;
use fixture_harness_core::SharedCollaborator;

use crate::module::ModuleRegistry;

// ============================================================================
// SECTION: Injector
// ============================================================================

/// Caching resolver scoped to one case.
pub struct Injector<'a> {
    /// Module supplying factories and policy.
    module: &'a ModuleRegistry,
    /// Instances constructed so far, keyed by capability name.
    instances: Mutex<BTreeMap<String, SharedCollaborator>>,
}

impl<'a> Injector<'a> {
    /// Creates an empty injector over `module`.
    #[must_use]
    pub const fn new(module: &'a ModuleRegistry) -> Self {
        Self {
            module,
            instances: Mutex::new(BTreeMap::new()),
        }
    }

    /// Returns the backing module.
    #[must_use]
    pub const fn module(&self) -> &'a ModuleRegistry {
        self.module
    }

    /// Returns the instance for `name`, constructing it on first use.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`ModuleRegistry::construct`], or
    /// [`ResolveError::Unavailable`] when the cache lock is poisoned.
    pub fn get(&self, name: &str) -> Result<SharedCollaborator, ResolveError> {
        self.module.check_policy(name)?;
        let mut instances = self
            .instances
            .lock()
            .map_err(|_| ResolveError::Unavailable("injector cache lock poisoned".to_string()))?;
        if let Some(instance) = instances.get(name) {
            return Ok(Arc::clone(instance));
        }
        let instance = self.module.construct(name)?;
        instances.insert(name.to_string(), Arc::clone(&instance));
        Ok(instance)
    }

    /// Returns the names constructed so far.
    #[must_use]
    pub fn instantiated(&self) -> Vec<String> {
        self.instances.lock().map(|instances| instances.keys().cloned().collect()).unwrap_or_default()
    }
}

impl CollaboratorRegistry for Injector<'_> {
    fn resolve(
        &self,
        names: &BTreeSet<String>,
    ) -> Result<BTreeMap<String, SharedCollaborator>, ResolveError> {
        names.iter().map(|name| Ok((name.clone(), self.get(name)?))).collect()
    }
}

impl fmt::Debug for Injector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injector")
            .field("module", &self.module.name())
            .field("instantiated", &self.instantiated())
            .finish()
    }
}
