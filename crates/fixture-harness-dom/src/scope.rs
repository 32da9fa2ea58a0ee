// crates/fixture-harness-dom/src/scope.rs
// ============================================================================
// Module: Scope Tree
// Description: Reactive field scopes with prototypal lookup and watchers.
// Purpose: Hold the state a view renders from, including isolated state.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! [`ScopeTree`] is a shared arena of scopes. Child scopes read through to
//! their parent's fields; isolate scopes do not. Watchers derive one field
//! from another and are settled by [`ScopeTree::digest`], which re-runs every
//! watcher until nothing changes or [`DIGEST_TTL`] passes elapse.
//!
//! Invariants:
//! - The root scope lives as long as the tree.
//! - Destroying a scope destroys its descendants and their watchers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use serde::Serialize;
use serde_json::Value;

use crate::error::DomError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum digest passes before the tree is considered unstable.
pub const DIGEST_TTL: usize = 10;

// ============================================================================
// SECTION: Identifiers
// ============================================================================

/// Identifier of a scope in a [`ScopeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ScopeId(u64);

impl ScopeId {
    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope-{}", self.0)
    }
}

/// Derives a watcher's target value from its source value.
pub type Derivation = Box<dyn Fn(&Value) -> Value + Send + Sync>;

/// Derivation shared between the arena and an in-flight digest.
type SharedDerivation = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

// ============================================================================
// SECTION: Arena
// ============================================================================

/// A watcher registered on one scope.
struct Watcher {
    /// Field read through the scope chain.
    source: String,
    /// Field written on the owning scope.
    target: String,
    /// Source-to-target mapping.
    derive: SharedDerivation,
}

/// One scope in the arena.
struct ScopeNode {
    /// Parent scope, `None` only for the root.
    parent: Option<ScopeId>,
    /// Whether lookups stop at this scope.
    isolate: bool,
    /// Fields defined on this scope.
    fields: BTreeMap<String, Value>,
    /// Direct child scopes.
    children: Vec<ScopeId>,
    /// Watchers owned by this scope.
    watchers: Vec<Watcher>,
}

impl ScopeNode {
    /// Creates an empty scope node.
    const fn new(parent: Option<ScopeId>, isolate: bool) -> Self {
        Self {
            parent,
            isolate,
            fields: BTreeMap::new(),
            children: Vec::new(),
            watchers: Vec::new(),
        }
    }
}

/// Arena state behind a [`ScopeTree`].
struct TreeState {
    /// Scopes keyed by identifier.
    scopes: BTreeMap<ScopeId, ScopeNode>,
    /// Root scope.
    root: ScopeId,
    /// Next identifier to allocate.
    next_id: u64,
}

impl TreeState {
    /// Returns the scope or an unknown-scope error.
    fn scope(&self, id: ScopeId) -> Result<&ScopeNode, DomError> {
        self.scopes.get(&id).ok_or(DomError::UnknownScope(id))
    }

    /// Returns the scope mutably or an unknown-scope error.
    fn scope_mut(&mut self, id: ScopeId) -> Result<&mut ScopeNode, DomError> {
        self.scopes.get_mut(&id).ok_or(DomError::UnknownScope(id))
    }

    /// Resolves a field through the scope chain.
    fn lookup(&self, id: ScopeId, name: &str) -> Option<&Value> {
        let mut current = self.scopes.get(&id);
        while let Some(scope) = current {
            if let Some(value) = scope.fields.get(name) {
                return Some(value);
            }
            if scope.isolate {
                return None;
            }
            current = scope.parent.and_then(|parent| self.scopes.get(&parent));
        }
        None
    }

    /// Allocates a scope under `parent`.
    fn attach(&mut self, parent: ScopeId, isolate: bool) -> Result<ScopeId, DomError> {
        self.scope(parent)?;
        let id = ScopeId(self.next_id);
        self.next_id += 1;
        self.scopes.insert(id, ScopeNode::new(Some(parent), isolate));
        self.scope_mut(parent)?.children.push(id);
        Ok(id)
    }

    /// Captures every watcher with its current source and target values.
    fn pending_derivations(&self) -> Vec<PendingDerivation> {
        let mut pending = Vec::new();
        for (id, scope) in &self.scopes {
            for watcher in &scope.watchers {
                pending.push(PendingDerivation {
                    scope: *id,
                    target: watcher.target.clone(),
                    source: self.lookup(*id, &watcher.source).cloned().unwrap_or(Value::Null),
                    current: scope.fields.get(&watcher.target).cloned(),
                    derive: Arc::clone(&watcher.derive),
                });
            }
        }
        pending
    }
}

/// A watcher captured for evaluation outside the tree lock.
struct PendingDerivation {
    /// Scope owning the watcher.
    scope: ScopeId,
    /// Field the derived value is written to.
    target: String,
    /// Source value at capture time.
    source: Value,
    /// Target value at capture time.
    current: Option<Value>,
    /// Source-to-target mapping.
    derive: SharedDerivation,
}

impl PendingDerivation {
    /// Runs the derivation, returning the update when the target changes.
    fn evaluate(self) -> Option<(ScopeId, String, Value)> {
        let derived = (self.derive)(&self.source);
        (self.current.as_ref() != Some(&derived)).then_some((self.scope, self.target, derived))
    }
}

// ============================================================================
// SECTION: Scope Tree
// ============================================================================

/// Shared handle to a tree of reactive scopes.
#[derive(Clone)]
pub struct ScopeTree {
    /// Shared arena.
    state: Arc<Mutex<TreeState>>,
}

impl ScopeTree {
    /// Creates a tree holding only its root scope.
    #[must_use]
    pub fn new() -> Self {
        let root = ScopeId(0);
        let mut scopes = BTreeMap::new();
        scopes.insert(root, ScopeNode::new(None, false));
        Self {
            state: Arc::new(Mutex::new(TreeState {
                scopes,
                root,
                next_id: 1,
            })),
        }
    }

    /// Returns the root scope.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Unavailable`] when the tree lock is poisoned.
    pub fn root(&self) -> Result<ScopeId, DomError> {
        Ok(self.lock()?.root)
    }

    /// Creates a child scope that inherits fields from `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::UnknownScope`] when `parent` does not exist.
    pub fn new_child(&self, parent: ScopeId) -> Result<ScopeHandle, DomError> {
        let id = self.lock()?.attach(parent, false)?;
        Ok(self.handle(id))
    }

    /// Creates an isolate scope under `parent` that inherits nothing.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::UnknownScope`] when `parent` does not exist.
    pub fn new_isolate(&self, parent: ScopeId) -> Result<ScopeHandle, DomError> {
        let id = self.lock()?.attach(parent, true)?;
        Ok(self.handle(id))
    }

    /// Returns a handle for an existing scope identifier.
    #[must_use]
    pub fn handle(&self, id: ScopeId) -> ScopeHandle {
        ScopeHandle {
            tree: self.clone(),
            id,
        }
    }

    /// Resolves a field on `scope`, reading through non-isolate parents.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::UnknownScope`] when the scope does not exist.
    pub fn get(&self, scope: ScopeId, name: &str) -> Result<Option<Value>, DomError> {
        let state = self.lock()?;
        state.scope(scope)?;
        Ok(state.lookup(scope, name).cloned())
    }

    /// Defines or replaces a field on `scope` itself.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::UnknownScope`] when the scope does not exist.
    pub fn set(&self, scope: ScopeId, name: impl Into<String>, value: Value) -> Result<(), DomError> {
        self.lock()?.scope_mut(scope)?.fields.insert(name.into(), value);
        Ok(())
    }

    /// Returns the fields defined directly on `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::UnknownScope`] when the scope does not exist.
    pub fn fields(&self, scope: ScopeId) -> Result<BTreeMap<String, Value>, DomError> {
        Ok(self.lock()?.scope(scope)?.fields.clone())
    }

    /// Registers a watcher that keeps `target` derived from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::UnknownScope`] when the scope does not exist.
    pub fn watch(
        &self,
        scope: ScopeId,
        source: impl Into<String>,
        target: impl Into<String>,
        derive: Derivation,
    ) -> Result<(), DomError> {
        self.lock()?.scope_mut(scope)?.watchers.push(Watcher {
            source: source.into(),
            target: target.into(),
            derive: Arc::from(derive),
        });
        Ok(())
    }

    /// Re-runs watchers until values settle.
    ///
    /// Derivations run with the tree unlocked, so a panicking derivation
    /// leaves the tree usable for later cases.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::DigestLimit`] when values still change after
    /// [`DIGEST_TTL`] passes.
    pub fn digest(&self) -> Result<(), DomError> {
        for _ in 0 .. DIGEST_TTL {
            let pending = self.lock()?.pending_derivations();
            let updates: Vec<_> =
                pending.into_iter().filter_map(PendingDerivation::evaluate).collect();
            if updates.is_empty() {
                return Ok(());
            }
            let mut state = self.lock()?;
            for (id, target, value) in updates {
                if let Some(scope) = state.scopes.get_mut(&id) {
                    scope.fields.insert(target, value);
                }
            }
        }
        Err(DomError::DigestLimit(DIGEST_TTL))
    }

    /// Destroys `scope` and all of its descendants.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::RootDestruction`] for the root scope and
    /// [`DomError::UnknownScope`] when the scope does not exist.
    pub fn destroy(&self, scope: ScopeId) -> Result<(), DomError> {
        let mut state = self.lock()?;
        if scope == state.root {
            return Err(DomError::RootDestruction);
        }
        if let Some(parent) = state.scope(scope)?.parent {
            state.scope_mut(parent)?.children.retain(|id| *id != scope);
        }
        let mut pending = vec![scope];
        while let Some(id) = pending.pop() {
            if let Some(removed) = state.scopes.remove(&id) {
                pending.extend(removed.children);
            }
        }
        Ok(())
    }

    /// Returns true when `scope` exists.
    #[must_use]
    pub fn contains(&self, scope: ScopeId) -> bool {
        self.lock().is_ok_and(|state| state.scopes.contains_key(&scope))
    }

    /// Returns the number of live scopes, including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().map_or(0, |state| state.scopes.len())
    }

    /// Returns true when only the root scope is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Locks the arena.
    fn lock(&self) -> Result<MutexGuard<'_, TreeState>, DomError> {
        self.state.lock().map_err(|_| DomError::Unavailable("scope tree lock poisoned".to_string()))
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ScopeTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeTree").field("scopes", &self.len()).finish()
    }
}

// ============================================================================
// SECTION: Scope Handle
// ============================================================================

/// A scope identifier bound to its tree.
#[derive(Clone)]
pub struct ScopeHandle {
    /// Owning tree.
    tree: ScopeTree,
    /// Scope identifier.
    id: ScopeId,
}

impl ScopeHandle {
    /// Returns the scope identifier.
    #[must_use]
    pub const fn id(&self) -> ScopeId {
        self.id
    }

    /// Returns the owning tree.
    #[must_use]
    pub const fn tree(&self) -> &ScopeTree {
        &self.tree
    }

    /// Resolves a field, returning `None` when undefined or destroyed.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.tree.get(self.id, name).ok().flatten()
    }

    /// Returns true when the field resolves to a value.
    #[must_use]
    pub fn is_defined(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Defines or replaces a field on this scope.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::UnknownScope`] when the scope was destroyed.
    pub fn set(&self, name: impl Into<String>, value: Value) -> Result<(), DomError> {
        self.tree.set(self.id, name, value)
    }

    /// Returns the fields defined directly on this scope.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::UnknownScope`] when the scope was destroyed.
    pub fn fields(&self) -> Result<BTreeMap<String, Value>, DomError> {
        self.tree.fields(self.id)
    }

    /// Returns true while the scope has not been destroyed.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.tree.contains(self.id)
    }
}

impl fmt::Debug for ScopeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ScopeHandle").field(&self.id).finish()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
