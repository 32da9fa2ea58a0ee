// crates/fixture-harness-core/src/test_support.rs
// ============================================================================
// Module: Core Test Support
// Description: In-memory view host, registry, and collaborator for unit tests.
// Purpose: Exercise the lifecycle without a real document tree.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! Shared fakes for the core unit tests. [`FakeHost`] tracks attached views and
//! live state roots in sets so tests can assert nothing leaks.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only helpers favor direct assertions."
)]

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::Mutex;

use serde_json::Value;
use serde_json::json;
use thiserror::Error;

use crate::CallError;
use crate::Collaborator;
use crate::CollaboratorRegistry;
use crate::CollaboratorSet;
use crate::ResolveError;
use crate::SharedCollaborator;
use crate::ViewHost;

// ============================================================================
// SECTION: Collaborator
// ============================================================================

/// Collaborator echoing its first argument, with a method that always fails.
pub struct Echo;

impl Collaborator for Echo {
    fn methods(&self) -> &[&'static str] {
        &["echo", "fail"]
    }

    fn call(&self, method: &str, args: &[Value]) -> Result<Value, CallError> {
        match method {
            "echo" => Ok(args.first().cloned().unwrap_or(Value::Null)),
            "fail" => Err(CallError::Failed("echo refused".to_string())),
            other => Err(CallError::UnknownMethod {
                collaborator: "echo".to_string(),
                method: other.to_string(),
            }),
        }
    }
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Registry resolving fixed instances.
pub struct FakeRegistry {
    /// Instances by name.
    instances: BTreeMap<String, SharedCollaborator>,
}

impl FakeRegistry {
    /// Registry exposing a single `echo` collaborator.
    pub fn with_echo() -> Self {
        let mut instances: BTreeMap<String, SharedCollaborator> = BTreeMap::new();
        instances.insert("echo".to_string(), Arc::new(Echo));
        Self {
            instances,
        }
    }
}

impl CollaboratorRegistry for FakeRegistry {
    fn resolve(
        &self,
        names: &BTreeSet<String>,
    ) -> Result<BTreeMap<String, SharedCollaborator>, ResolveError> {
        names
            .iter()
            .map(|name| {
                self.instances
                    .get(name)
                    .map(|instance| (name.clone(), Arc::clone(instance)))
                    .ok_or_else(|| ResolveError::Unknown(name.clone()))
            })
            .collect()
    }
}

// ============================================================================
// SECTION: View Host
// ============================================================================

/// Error raised by [`FakeHost`].
#[derive(Debug, Error)]
#[error("fake host: {0}")]
pub struct FakeError(pub String);

/// Bookkeeping for [`FakeHost`].
#[derive(Default)]
struct FakeDom {
    /// Next identifier.
    next_id: u64,
    /// Attached view identifiers.
    attached: BTreeSet<u64>,
    /// Live state root identifiers.
    roots: BTreeSet<u64>,
}

/// View host recording attached views and live state roots.
#[derive(Clone, Default)]
pub struct FakeHost {
    /// Shared bookkeeping.
    dom: Arc<Mutex<FakeDom>>,
}

impl FakeHost {
    /// Returns the number of live state roots.
    pub fn live_roots(&self) -> usize {
        self.dom.lock().unwrap().roots.len()
    }
}

impl ViewHost for FakeHost {
    type Template = String;
    type State = u64;
    type View = u64;
    type Isolated = BTreeMap<String, Value>;
    type Error = FakeError;

    fn new_state_root(&self) -> Result<u64, FakeError> {
        let mut dom = self.dom.lock().unwrap();
        dom.next_id += 1;
        let id = dom.next_id;
        dom.roots.insert(id);
        Ok(id)
    }

    fn compile_and_attach(
        &self,
        template: &Self::Template,
        state: &u64,
        collaborators: &CollaboratorSet,
    ) -> Result<(u64, BTreeMap<String, Value>), FakeError> {
        if template == "broken" {
            return Err(FakeError("cannot compile broken".to_string()));
        }
        let mut isolated = BTreeMap::new();
        isolated.insert("template".to_string(), json!(template));
        isolated.insert("root".to_string(), json!(state));
        if collaborators.contains("echo") {
            let echoed = collaborators
                .call("echo", "echo", &[json!(template)])
                .map_err(|err| FakeError(err.to_string()))?;
            isolated.insert("echo".to_string(), echoed);
        }
        let mut dom = self.dom.lock().unwrap();
        dom.next_id += 1;
        let id = dom.next_id;
        dom.attached.insert(id);
        Ok((id, isolated))
    }

    fn detach(&self, view: u64) -> Result<(), FakeError> {
        if self.dom.lock().unwrap().attached.remove(&view) {
            Ok(())
        } else {
            Err(FakeError(format!("view {view} not attached")))
        }
    }

    fn release_state(&self, state: u64) -> Result<(), FakeError> {
        self.dom.lock().unwrap().roots.remove(&state);
        Ok(())
    }

    fn live_views(&self) -> usize {
        self.dom.lock().unwrap().attached.len()
    }
}
