// crates/fixture-harness-core/src/host.rs
// ============================================================================
// Module: View Host Interface
// Description: Contract for compiling templates into attached views.
// Purpose: Keep rendering details outside the fixture lifecycle.
// Dependencies: crate::collaborator
// ============================================================================

//! ## Overview
//! A [`ViewHost`] owns the live document and the reactive state tree. The
//! lifecycle asks it for a fresh state root during setup, mounts templates
//! against that root, and hands views back for detachment during teardown.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::collaborator::CollaboratorSet;

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Compiles templates into views attached to a live document.
pub trait ViewHost: 'static {
    /// Structural view description accepted by [`ViewHost::compile_and_attach`].
    type Template: 'static;
    /// Reactive state root views are compiled against.
    type State: 'static;
    /// Handle to an attached view.
    type View: 'static;
    /// State object private to a mounted view.
    type Isolated: 'static;
    /// Host failure type.
    type Error: std::error::Error;

    /// Creates a state root for one case.
    ///
    /// # Errors
    ///
    /// Returns [`ViewHost::Error`] when the state tree is unavailable.
    fn new_state_root(&self) -> Result<Self::State, Self::Error>;

    /// Compiles `template` against `state`, attaches it to the document, and
    /// returns the view with its isolated state after initialization ran.
    ///
    /// Implementations must leave the document unchanged when they fail.
    ///
    /// # Errors
    ///
    /// Returns [`ViewHost::Error`] when compilation, linking, or attachment fails.
    fn compile_and_attach(
        &self,
        template: &Self::Template,
        state: &Self::State,
        collaborators: &CollaboratorSet,
    ) -> Result<(Self::View, Self::Isolated), Self::Error>;

    /// Removes `view` from the document and releases its isolated state.
    ///
    /// # Errors
    ///
    /// Returns [`ViewHost::Error`] when the view cannot be removed.
    fn detach(&self, view: Self::View) -> Result<(), Self::Error>;

    /// Releases a state root created by [`ViewHost::new_state_root`].
    ///
    /// # Errors
    ///
    /// Returns [`ViewHost::Error`] when the state tree is unavailable.
    fn release_state(&self, state: Self::State) -> Result<(), Self::Error>;

    /// Returns the number of views currently attached to the document.
    fn live_views(&self) -> usize;
}
