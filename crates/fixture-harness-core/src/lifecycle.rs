// crates/fixture-harness-core/src/lifecycle.rs
// ============================================================================
// Module: Fixture Lifecycle
// Description: begin/setup/mount/end operations over a fixture context.
// Purpose: Populate per-case state and guarantee its release.
// Dependencies: crate::collaborator, crate::context, crate::host, crate::telemetry
// ============================================================================

//! ## Overview
//! [`FixtureLifecycle`] drives one [`FixtureContext`] at a time through
//! `begin_case -> setup -> mount -> end_case`. Setup wraps every resolved
//! collaborator in an [`Instrumented`] decorator bound to the context's own
//! instrumentation table, so the view under test talks to the decorators and
//! every observed call is recorded.
//!
//! `end_case` consumes the context. Detaching a view therefore happens at most
//! once per mount. When no view was mounted, `end_case` records
//! [`TeardownStatus::NothingMounted`] and succeeds.
//!
//! [`CaseGuard`] ties teardown to scope exit for callers that do not go
//! through a [`LifecycleDriver`](crate::LifecycleDriver), including exits by
//! panic.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::collaborator::CollaboratorRegistry;
use crate::collaborator::CollaboratorSet;
use crate::collaborator::ResolveError;
use crate::context::FixtureContext;
use crate::error::FixtureError;
use crate::host::ViewHost;
use crate::instrument::Instrumented;
use crate::report::TeardownStatus;
use crate::telemetry::LifecycleEvent;
use crate::telemetry::LifecycleObserver;
use crate::telemetry::NoopObserver;

// ============================================================================
// SECTION: Setup Plan
// ============================================================================

/// Capabilities to resolve and methods to observe during setup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupPlan {
    /// Capability names to resolve.
    capabilities: BTreeSet<String>,
    /// (capability, method) pairs to observe, in declaration order.
    observed: Vec<(String, String)>,
}

impl SetupPlan {
    /// Creates an empty plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a capability to resolve.
    #[must_use]
    pub fn capability(mut self, name: impl Into<String>) -> Self {
        self.capabilities.insert(name.into());
        self
    }

    /// Adds a method to observe. The capability is resolved as well.
    #[must_use]
    pub fn observe(mut self, name: impl Into<String>, method: impl Into<String>) -> Self {
        let name = name.into();
        self.capabilities.insert(name.clone());
        self.observed.push((name, method.into()));
        self
    }

    /// Returns the capabilities to resolve.
    #[must_use]
    pub const fn capabilities(&self) -> &BTreeSet<String> {
        &self.capabilities
    }

    /// Returns the pairs to observe.
    #[must_use]
    pub fn observed(&self) -> &[(String, String)] {
        &self.observed
    }
}

// ============================================================================
// SECTION: Lifecycle
// ============================================================================

/// Runs fixture contexts through setup, mounting, and teardown.
pub struct FixtureLifecycle<H: ViewHost> {
    /// Host owning the document and state tree.
    host: H,
    /// Lifecycle event sink.
    observer: Arc<dyn LifecycleObserver>,
}

impl<H: ViewHost> FixtureLifecycle<H> {
    /// Creates a lifecycle that discards telemetry.
    #[must_use]
    pub fn new(host: H) -> Self {
        Self::with_observer(host, Arc::new(NoopObserver))
    }

    /// Creates a lifecycle reporting to `observer`.
    #[must_use]
    pub fn with_observer(host: H, observer: Arc<dyn LifecycleObserver>) -> Self {
        Self {
            host,
            observer,
        }
    }

    /// Returns the view host.
    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Returns the lifecycle observer.
    #[must_use]
    pub fn observer(&self) -> &dyn LifecycleObserver {
        self.observer.as_ref()
    }

    /// Returns a new, empty context for one case.
    #[must_use]
    pub fn begin_case(&self, label: impl Into<String>) -> FixtureContext<H> {
        let context = FixtureContext::new(label.into());
        self.observer.record(&LifecycleEvent::CaseStarted {
            case: context.label().to_string(),
        });
        context
    }

    /// Returns a guard that runs [`FixtureLifecycle::end_case`] when dropped.
    #[must_use]
    pub fn guard(&self, label: impl Into<String>) -> CaseGuard<'_, H> {
        CaseGuard {
            lifecycle: self,
            context: self.begin_case(label),
            finished: false,
        }
    }

    /// Resolves collaborators, instruments them, and creates the state root.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Precondition`] when setup already ran or an
    /// observed method is not exposed, [`FixtureError::Resolve`] when the
    /// registry fails, and [`FixtureError::Host`] when no state root can be
    /// created.
    pub fn setup(
        &self,
        context: &mut FixtureContext<H>,
        registry: &dyn CollaboratorRegistry,
        plan: &SetupPlan,
    ) -> Result<(), FixtureError> {
        let result = self.install(context, registry, plan);
        let event = match &result {
            Ok(()) => LifecycleEvent::SetupCompleted {
                case: context.label().to_string(),
                collaborators: context.collaborators().names().map(str::to_string).collect(),
                observed: context.instrumentation().len(),
            },
            Err(err) => LifecycleEvent::SetupFailed {
                case: context.label().to_string(),
                error: err.to_string(),
            },
        };
        self.observer.record(&event);
        result
    }

    /// Compiles `template` against the context's state root and stores the
    /// mounted view with its isolated state.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Precondition`] when setup has not run or a view
    /// is already mounted, and [`FixtureError::Mount`] when the host fails.
    pub fn mount(
        &self,
        context: &mut FixtureContext<H>,
        template: &H::Template,
    ) -> Result<(), FixtureError> {
        let Some(state) = context.root_state() else {
            return Err(FixtureError::precondition("mount requires setup: no state root"));
        };
        if context.is_mounted() {
            return Err(FixtureError::precondition("a view is already mounted for this case"));
        }
        let attached = self.host.compile_and_attach(template, state, context.collaborators());
        match attached {
            Ok((view, isolated)) => {
                context.attach(view, isolated);
                self.observer.record(&LifecycleEvent::ViewMounted {
                    case: context.label().to_string(),
                });
                Ok(())
            }
            Err(err) => {
                let error = FixtureError::Mount(err.to_string());
                self.observer.record(&LifecycleEvent::MountFailed {
                    case: context.label().to_string(),
                    error: error.to_string(),
                });
                Err(error)
            }
        }
    }

    /// Detaches the mounted view, releases the state root, and drops the
    /// context. Never fails; release problems are reported in the status.
    pub fn end_case(&self, context: FixtureContext<H>) -> TeardownStatus {
        let (case, view, state) = context.into_parts();
        let mut failures = Vec::new();
        let mut detached = false;
        if let Some(view) = view {
            match self.host.detach(view) {
                Ok(()) => {
                    detached = true;
                    self.observer.record(&LifecycleEvent::ViewDetached {
                        case: case.clone(),
                    });
                }
                Err(err) => failures.push(format!("detach: {err}")),
            }
        } else {
            self.observer.record(&LifecycleEvent::NothingMounted {
                case: case.clone(),
            });
        }
        if let Some(state) = state
            && let Err(err) = self.host.release_state(state)
        {
            failures.push(format!("release state: {err}"));
        }
        if !failures.is_empty() {
            let message = failures.join("; ");
            self.observer.record(&LifecycleEvent::TeardownFailed {
                case,
                error: message.clone(),
            });
            return TeardownStatus::Failed {
                message,
            };
        }
        if detached { TeardownStatus::Detached } else { TeardownStatus::NothingMounted }
    }

    /// Performs the setup steps without telemetry.
    fn install(
        &self,
        context: &mut FixtureContext<H>,
        registry: &dyn CollaboratorRegistry,
        plan: &SetupPlan,
    ) -> Result<(), FixtureError> {
        if context.is_set_up() {
            return Err(FixtureError::precondition("setup already ran for this case"));
        }
        let resolved = registry.resolve(plan.capabilities())?;
        let mut collaborators = CollaboratorSet::new();
        for name in plan.capabilities() {
            let Some(instance) = resolved.get(name) else {
                return Err(ResolveError::Unknown(name.clone()).into());
            };
            let wrapped = Instrumented::wrap(
                name.clone(),
                Arc::clone(instance),
                context.instrumentation().clone(),
            );
            collaborators.insert(name.clone(), wrapped);
        }
        let root_state =
            self.host.new_state_root().map_err(|err| FixtureError::Host(err.to_string()))?;
        context.install(collaborators, root_state);
        for (name, method) in plan.observed() {
            context.observe(name, method)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Case Guard
// ============================================================================

/// Scoped fixture context that tears itself down on drop.
pub struct CaseGuard<'a, H: ViewHost> {
    /// Lifecycle that created the context.
    lifecycle: &'a FixtureLifecycle<H>,
    /// Context owned by the guard.
    context: FixtureContext<H>,
    /// Set once teardown ran explicitly.
    finished: bool,
}

impl<H: ViewHost> CaseGuard<'_, H> {
    /// Returns the guarded context.
    #[must_use]
    pub const fn context(&self) -> &FixtureContext<H> {
        &self.context
    }

    /// Runs [`FixtureLifecycle::setup`] on the guarded context.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`FixtureLifecycle::setup`].
    pub fn setup(
        &mut self,
        registry: &dyn CollaboratorRegistry,
        plan: &SetupPlan,
    ) -> Result<(), FixtureError> {
        self.lifecycle.setup(&mut self.context, registry, plan)
    }

    /// Runs [`FixtureLifecycle::mount`] on the guarded context.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`FixtureLifecycle::mount`].
    pub fn mount(&mut self, template: &H::Template) -> Result<(), FixtureError> {
        self.lifecycle.mount(&mut self.context, template)
    }

    /// Tears the context down now and returns the teardown status.
    #[must_use]
    pub fn finish(mut self) -> TeardownStatus {
        self.finished = true;
        let context = self.take_context();
        self.lifecycle.end_case(context)
    }

    /// Moves the context out, leaving an empty placeholder behind.
    fn take_context(&mut self) -> FixtureContext<H> {
        let placeholder = FixtureContext::new(self.context.label().to_string());
        std::mem::replace(&mut self.context, placeholder)
    }
}

impl<H: ViewHost> Drop for CaseGuard<'_, H> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let context = self.take_context();
        // Failures already reached the observer as `TeardownFailed`.
        let _status = self.lifecycle.end_case(context);
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
