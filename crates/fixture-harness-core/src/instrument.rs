// crates/fixture-harness-core/src/instrument.rs
// ============================================================================
// Module: Instrumentation
// Description: Call-through decorators that record collaborator invocations.
// Purpose: Make collaborator calls observable without changing their results.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! [`Instrumented`] wraps a collaborator and forwards every call to it. Calls
//! to methods that were observed through an [`InstrumentationTable`] are
//! recorded on the matching [`Spy`] before being forwarded. The wrapped
//! collaborator's return value and error are passed back unchanged.
//!
//! A table belongs to exactly one fixture context. Spies handed out by a table
//! share its lifetime: once the context is dropped, nothing else can reach
//! them, so counts never carry over into the next case.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use serde::Serialize;
use serde_json::Value;

use crate::collaborator::CallError;
use crate::collaborator::Collaborator;
use crate::collaborator::SharedCollaborator;

// ============================================================================
// SECTION: Call Records
// ============================================================================

/// A single recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallRecord {
    /// Position of the call among all recorded calls in the owning table.
    pub sequence: u64,
    /// Arguments passed to the call.
    pub args: Vec<Value>,
}

// ============================================================================
// SECTION: Spy Handle
// ============================================================================

/// Query handle for one observed (collaborator, method) pair.
///
/// Clones share the same call log.
#[derive(Debug, Clone)]
pub struct Spy {
    /// Capability name of the observed collaborator.
    collaborator: Arc<str>,
    /// Observed method name.
    method: Arc<str>,
    /// Recorded invocations.
    calls: Arc<Mutex<Vec<CallRecord>>>,
}

impl Spy {
    /// Creates an empty spy.
    fn new(collaborator: &str, method: &str) -> Self {
        Self {
            collaborator: Arc::from(collaborator),
            method: Arc::from(method),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns the observed capability name.
    #[must_use]
    pub fn collaborator(&self) -> &str {
        &self.collaborator
    }

    /// Returns the observed method name.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns true when the method was invoked at least once.
    #[must_use]
    pub fn was_invoked(&self) -> bool {
        !self.records().is_empty()
    }

    /// Returns the number of recorded invocations.
    #[must_use]
    pub fn invocation_count(&self) -> u64 {
        u64::try_from(self.records().len()).unwrap_or(u64::MAX)
    }

    /// Returns a snapshot of the recorded invocations.
    #[must_use]
    pub fn calls(&self) -> Vec<CallRecord> {
        self.records().clone()
    }

    /// Returns the arguments of the most recent invocation.
    #[must_use]
    pub fn last_args(&self) -> Option<Vec<Value>> {
        self.records().last().map(|record| record.args.clone())
    }

    /// Returns true when both handles share one call log.
    #[must_use]
    pub fn is_same_handle(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.calls, &other.calls)
    }

    /// Appends an invocation record.
    fn record(&self, sequence: u64, args: &[Value]) {
        self.records().push(CallRecord {
            sequence,
            args: args.to_vec(),
        });
    }

    /// Locks the call log. Records are append-only, so a poisoned log is
    /// still consistent.
    fn records(&self) -> MutexGuard<'_, Vec<CallRecord>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ============================================================================
// SECTION: Instrumentation Table
// ============================================================================

/// Mutable state behind an [`InstrumentationTable`].
#[derive(Debug, Default)]
struct TableState {
    /// Spies keyed by (capability, method).
    spies: BTreeMap<(String, String), Spy>,
    /// Sequence number assigned to the next recorded call.
    next_sequence: u64,
}

/// Per-context registry of observed methods.
///
/// # Invariants
/// - At most one [`Spy`] exists per (capability, method) pair.
/// - Clones share state; a table is never shared across fixture contexts.
#[derive(Debug, Clone, Default)]
pub struct InstrumentationTable {
    /// Shared table state.
    state: Arc<Mutex<TableState>>,
}

impl InstrumentationTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the spy for the pair, creating it on first use.
    #[must_use]
    pub fn observe(&self, collaborator: &str, method: &str) -> Spy {
        let mut state = self.lock();
        state
            .spies
            .entry((collaborator.to_string(), method.to_string()))
            .or_insert_with(|| Spy::new(collaborator, method))
            .clone()
    }

    /// Returns the spy for the pair when it was observed.
    #[must_use]
    pub fn spy(&self, collaborator: &str, method: &str) -> Option<Spy> {
        self.lock().spies.get(&(collaborator.to_string(), method.to_string())).cloned()
    }

    /// Returns observed pairs in sorted order.
    #[must_use]
    pub fn observed(&self) -> Vec<(String, String)> {
        self.lock().spies.keys().cloned().collect()
    }

    /// Returns the number of observed pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().spies.len()
    }

    /// Returns true when nothing is observed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().spies.is_empty()
    }

    /// Returns the number of calls recorded across every spy.
    #[must_use]
    pub fn total_invocations(&self) -> u64 {
        self.lock().spies.values().map(Spy::invocation_count).sum()
    }

    /// Returns the spy and sequence number for an incoming call when the
    /// pair is observed.
    fn begin_call(&self, collaborator: &str, method: &str) -> Option<(Spy, u64)> {
        let mut state = self.lock();
        let spy = state.spies.get(&(collaborator.to_string(), method.to_string())).cloned()?;
        let sequence = state.next_sequence;
        state.next_sequence = state.next_sequence.saturating_add(1);
        Some((spy, sequence))
    }

    /// Locks the table state.
    fn lock(&self) -> MutexGuard<'_, TableState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ============================================================================
// SECTION: Decorator
// ============================================================================

/// Call-through decorator recording observed calls on its table.
pub struct Instrumented {
    /// Capability name the collaborator was resolved under.
    name: String,
    /// Wrapped collaborator.
    inner: SharedCollaborator,
    /// Table owned by the fixture context.
    table: InstrumentationTable,
}

impl Instrumented {
    /// Wraps `inner`, recording observed calls on `table`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        inner: SharedCollaborator,
        table: InstrumentationTable,
    ) -> Self {
        Self {
            name: name.into(),
            inner,
            table,
        }
    }

    /// Wraps `inner` and returns it as a shared collaborator.
    #[must_use]
    pub fn wrap(
        name: impl Into<String>,
        inner: SharedCollaborator,
        table: InstrumentationTable,
    ) -> SharedCollaborator {
        Arc::new(Self::new(name, inner, table))
    }

    /// Returns the wrapped collaborator.
    #[must_use]
    pub const fn inner(&self) -> &SharedCollaborator {
        &self.inner
    }
}

impl Collaborator for Instrumented {
    fn methods(&self) -> &[&'static str] {
        self.inner.methods()
    }

    fn call(&self, method: &str, args: &[Value]) -> Result<Value, CallError> {
        if let Some((spy, sequence)) = self.table.begin_call(&self.name, method) {
            spy.record(sequence, args);
        }
        self.inner.call(method, args)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
