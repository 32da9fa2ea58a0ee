// crates/fixture-harness-core/src/context.rs
// ============================================================================
// Module: Fixture Context
// Description: Per-case record of collaborators, spies, and mounted view.
// Purpose: Hold every piece of state one test case needs, and nothing more.
// Dependencies: crate::collaborator, crate::host, crate::instrument
// ============================================================================

//! ## Overview
//! A [`FixtureContext`] is created by
//! [`FixtureLifecycle::begin_case`](crate::FixtureLifecycle::begin_case) and
//! consumed by [`FixtureLifecycle::end_case`](crate::FixtureLifecycle::end_case).
//! Fields are only written by lifecycle operations; case bodies read them.
//!
//! Invariants:
//! - The mounted view and its isolated state are stored together, so one is
//!   present exactly when the other is.
//! - The instrumentation table is created with the context and dropped with it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

use crate::collaborator::CallError;
use crate::collaborator::CollaboratorSet;
use crate::collaborator::SharedCollaborator;
use crate::error::FixtureError;
use crate::host::ViewHost;
use crate::instrument::InstrumentationTable;
use crate::instrument::Spy;

// ============================================================================
// SECTION: Mounted View
// ============================================================================

/// A view attached to the document together with its isolated state.
pub struct MountedView<H: ViewHost> {
    /// Attached view handle.
    view: H::View,
    /// State private to the view.
    isolated: H::Isolated,
}

impl<H: ViewHost> MountedView<H> {
    /// Returns the view handle.
    #[must_use]
    pub const fn view(&self) -> &H::View {
        &self.view
    }

    /// Returns the isolated state.
    #[must_use]
    pub const fn isolated(&self) -> &H::Isolated {
        &self.isolated
    }
}

// ============================================================================
// SECTION: Context
// ============================================================================

/// Isolated state for a single test case.
pub struct FixtureContext<H: ViewHost> {
    /// Case label used in telemetry and reports.
    label: String,
    /// Instrumented collaborators keyed by capability name.
    collaborators: CollaboratorSet,
    /// Spies observed during this case.
    instrumentation: InstrumentationTable,
    /// State root created during setup.
    root_state: Option<H::State>,
    /// View mounted during the case.
    mounted: Option<MountedView<H>>,
}

impl<H: ViewHost> FixtureContext<H> {
    /// Creates an empty context.
    pub(crate) fn new(label: String) -> Self {
        Self {
            label,
            collaborators: CollaboratorSet::new(),
            instrumentation: InstrumentationTable::new(),
            root_state: None,
            mounted: None,
        }
    }

    /// Returns the case label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the instrumented collaborators.
    #[must_use]
    pub const fn collaborators(&self) -> &CollaboratorSet {
        &self.collaborators
    }

    /// Returns the collaborator resolved under `name`.
    #[must_use]
    pub fn collaborator(&self, name: &str) -> Option<&SharedCollaborator> {
        self.collaborators.get(name)
    }

    /// Calls `method` on the collaborator resolved under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`CallError`] when the collaborator is absent or the call fails.
    pub fn call(&self, name: &str, method: &str, args: &[Value]) -> Result<Value, CallError> {
        self.collaborators.call(name, method, args)
    }

    /// Returns the instrumentation table for this case.
    #[must_use]
    pub const fn instrumentation(&self) -> &InstrumentationTable {
        &self.instrumentation
    }

    /// Observes `method` on the collaborator resolved under `name`.
    ///
    /// Observing the same pair again returns the same handle.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Precondition`] when the collaborator is not
    /// resolved in this context or does not expose `method`.
    pub fn observe(&self, name: &str, method: &str) -> Result<Spy, FixtureError> {
        let Some(collaborator) = self.collaborators.get(name) else {
            return Err(FixtureError::precondition(format!(
                "cannot observe {name}.{method}: collaborator not resolved"
            )));
        };
        if !collaborator.exposes(method) {
            return Err(FixtureError::precondition(format!(
                "cannot observe {name}.{method}: method not exposed"
            )));
        }
        Ok(self.instrumentation.observe(name, method))
    }

    /// Returns the spy for an observed pair.
    #[must_use]
    pub fn spy(&self, name: &str, method: &str) -> Option<Spy> {
        self.instrumentation.spy(name, method)
    }

    /// Returns the state root when setup has run.
    #[must_use]
    pub const fn root_state(&self) -> Option<&H::State> {
        self.root_state.as_ref()
    }

    /// Returns the mounted view with its isolated state.
    #[must_use]
    pub const fn mounted(&self) -> Option<&MountedView<H>> {
        self.mounted.as_ref()
    }

    /// Returns the mounted view handle.
    #[must_use]
    pub fn mounted_view(&self) -> Option<&H::View> {
        self.mounted.as_ref().map(MountedView::view)
    }

    /// Returns the isolated state of the mounted view.
    #[must_use]
    pub fn isolated_state(&self) -> Option<&H::Isolated> {
        self.mounted.as_ref().map(MountedView::isolated)
    }

    /// Returns true when setup has populated the context.
    #[must_use]
    pub const fn is_set_up(&self) -> bool {
        self.root_state.is_some()
    }

    /// Returns true when a view is mounted.
    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Stores collaborators and the state root produced by setup.
    pub(crate) fn install(&mut self, collaborators: CollaboratorSet, root_state: H::State) {
        self.collaborators = collaborators;
        self.root_state = Some(root_state);
    }

    /// Stores a mounted view.
    pub(crate) fn attach(&mut self, view: H::View, isolated: H::Isolated) {
        self.mounted = Some(MountedView {
            view,
            isolated,
        });
    }

    /// Splits the context into the parts teardown must release.
    pub(crate) fn into_parts(self) -> (String, Option<H::View>, Option<H::State>) {
        let view = self.mounted.map(|mounted| mounted.view);
        (self.label, view, self.root_state)
    }
}
