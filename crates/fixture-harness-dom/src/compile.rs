// crates/fixture-harness-dom/src/compile.rs
// ============================================================================
// Module: Template Compiler
// Description: Directive registry and the reference view host.
// Purpose: Compile templates into attached views with isolated scopes.
// Dependencies: fixture-harness-core, serde_json
// ============================================================================

//! ## Overview
//! [`Compiler`] matches a [`TemplateDescriptor`] against its
//! [`DirectiveRegistry`]. Exactly one matched directive must request an
//! isolated scope; that directive links against a fresh isolate scope while
//! the others link against the caller's state scope. The element is attached
//! to the document body only after every directive linked, and a digest runs
//! before the isolated scope is returned. A compile that fails or unwinds
//! removes its element and isolate scope before control leaves the host.
//!
//! Security posture: templates and directive output are test inputs and are
//! never rendered outside the in-memory document.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use fixture_harness_core::CollaboratorSet;
use fixture_harness_core::ViewHost;
use serde_json::Value;

use crate::document::Document;
use crate::document::NodeId;
use crate::error::DomError;
use crate::scope::Derivation;
use crate::scope::ScopeHandle;
use crate::scope::ScopeId;
use crate::scope::ScopeTree;
use crate::template::TemplateDescriptor;

// ============================================================================
// SECTION: Directives
// ============================================================================

/// Behavior attached to elements whose tag or attribute matches [`Self::name`].
pub trait Directive: Send + Sync {
    /// Normalized directive name, such as `heavyLoad`.
    fn name(&self) -> &str;

    /// Whether the directive links against its own isolated scope.
    fn isolate_scope(&self) -> bool {
        true
    }

    /// Populates the scope and element for one compiled view.
    ///
    /// # Errors
    ///
    /// Returns [`DomError`] when linking fails; the view is then discarded.
    fn link(&self, context: &LinkContext<'_>) -> Result<(), DomError>;
}

/// Everything a directive may touch while linking.
pub struct LinkContext<'a> {
    /// Directive being linked.
    directive: &'a str,
    /// Scope the directive links against.
    scope: &'a ScopeHandle,
    /// Element under construction.
    element: NodeId,
    /// Owning document.
    document: &'a Document,
    /// Resolved collaborators for the current case.
    collaborators: &'a CollaboratorSet,
    /// Element attributes keyed by normalized name.
    attributes: &'a BTreeMap<String, String>,
}

impl LinkContext<'_> {
    /// Returns the scope to populate.
    #[must_use]
    pub const fn scope(&self) -> &ScopeHandle {
        self.scope
    }

    /// Returns the element under construction.
    #[must_use]
    pub const fn element(&self) -> NodeId {
        self.element
    }

    /// Returns the owning document.
    #[must_use]
    pub const fn document(&self) -> &Document {
        self.document
    }

    /// Returns the case's collaborators.
    #[must_use]
    pub const fn collaborators(&self) -> &CollaboratorSet {
        self.collaborators
    }

    /// Returns an attribute by normalized name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Calls a collaborator method, mapping failures to link errors.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Link`] when the collaborator is missing or fails.
    pub fn call(&self, name: &str, method: &str, args: &[Value]) -> Result<Value, DomError> {
        self.collaborators.call(name, method, args).map_err(|err| self.fail(err.to_string()))
    }

    /// Registers a derived field on the linked scope.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::UnknownScope`] when the scope was destroyed.
    pub fn watch(
        &self,
        source: impl Into<String>,
        target: impl Into<String>,
        derive: Derivation,
    ) -> Result<(), DomError> {
        self.scope.tree().watch(self.scope.id(), source, target, derive)
    }

    /// Builds a link failure for the current directive.
    #[must_use]
    pub fn fail(&self, reason: impl Into<String>) -> DomError {
        DomError::Link {
            directive: self.directive.to_string(),
            reason: reason.into(),
        }
    }
}

// ============================================================================
// SECTION: Directive Registry
// ============================================================================

/// Directives keyed by normalized name.
#[derive(Default, Clone)]
pub struct DirectiveRegistry {
    /// Registered directives.
    directives: BTreeMap<String, Arc<dyn Directive>>,
}

impl DirectiveRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a directive under its name.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::DuplicateDirective`] when the name is taken.
    pub fn register(&mut self, directive: impl Directive + 'static) -> Result<(), DomError> {
        let name = directive.name().to_string();
        if self.directives.contains_key(&name) {
            return Err(DomError::DuplicateDirective(name));
        }
        self.directives.insert(name, Arc::new(directive));
        Ok(())
    }

    /// Returns a directive by normalized name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Directive>> {
        self.directives.get(name)
    }

    /// Returns registered names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.directives.keys().map(String::as_str)
    }

    /// Returns directives selected by the template, tag first.
    #[must_use]
    pub fn matching(&self, template: &TemplateDescriptor) -> Vec<Arc<dyn Directive>> {
        template
            .directive_names()
            .iter()
            .filter_map(|name| self.directives.get(name).map(Arc::clone))
            .collect()
    }
}

impl std::fmt::Debug for DirectiveRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.directives.keys()).finish()
    }
}

// ============================================================================
// SECTION: Views
// ============================================================================

/// An attached view. Consumed by detachment, so it detaches at most once.
#[derive(Debug, PartialEq, Eq)]
pub struct ViewHandle {
    /// Root element of the view.
    element: NodeId,
    /// Isolated scope owned by the view.
    scope: ScopeId,
}

impl ViewHandle {
    /// Returns the view's root element.
    #[must_use]
    pub const fn element(&self) -> NodeId {
        self.element
    }

    /// Returns the view's isolated scope identifier.
    #[must_use]
    pub const fn scope(&self) -> ScopeId {
        self.scope
    }
}

// ============================================================================
// SECTION: Compiler
// ============================================================================

/// Reference view host over a shared document and scope tree.
#[derive(Debug, Clone)]
pub struct Compiler {
    /// Document views attach to.
    document: Document,
    /// Scope tree for state roots and isolate scopes.
    scopes: ScopeTree,
    /// Directives available to templates.
    directives: Arc<DirectiveRegistry>,
}

impl Compiler {
    /// Creates a compiler with a fresh document and scope tree.
    #[must_use]
    pub fn new(directives: DirectiveRegistry) -> Self {
        Self {
            document: Document::new(),
            scopes: ScopeTree::new(),
            directives: Arc::new(directives),
        }
    }

    /// Returns the document.
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// Returns the scope tree.
    #[must_use]
    pub const fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    /// Returns the directive registry.
    #[must_use]
    pub fn directives(&self) -> &DirectiveRegistry {
        &self.directives
    }

    /// Returns the number of live scopes besides the tree root.
    #[must_use]
    pub fn live_scopes(&self) -> usize {
        self.scopes.len().saturating_sub(1)
    }

    /// Requires exactly one matched directive to request an isolated scope.
    fn check_isolation(
        template: &TemplateDescriptor,
        matched: &[Arc<dyn Directive>],
    ) -> Result<(), DomError> {
        let isolating: Vec<&str> = matched
            .iter()
            .filter(|directive| directive.isolate_scope())
            .map(|directive| directive.name())
            .collect();
        match isolating.len() {
            1 => Ok(()),
            0 => Err(DomError::NoIsolatedScope(template.tag().to_string())),
            _ => Err(DomError::MultipleIsolateDirectives {
                tag: template.tag().to_string(),
                directives: isolating.join(", "),
            }),
        }
    }

    /// Links every matched directive and attaches the element.
    fn link_and_attach(
        &self,
        template: &TemplateDescriptor,
        matched: &[Arc<dyn Directive>],
        state: &ScopeHandle,
        isolate: &ScopeHandle,
        element: NodeId,
        collaborators: &CollaboratorSet,
    ) -> Result<(), DomError> {
        let attributes = template.normalized_attributes();
        if !template.text().is_empty() {
            self.document.set_text(element, template.text())?;
        }
        for directive in matched {
            let scope = if directive.isolate_scope() { isolate } else { state };
            directive.link(&LinkContext {
                directive: directive.name(),
                scope,
                element,
                document: &self.document,
                collaborators,
                attributes: &attributes,
            })?;
        }
        self.document.append_child(self.document.body()?, element)?;
        self.scopes.digest()
    }
}

/// A view under construction, discarded on drop unless completed.
///
/// Covers both error returns and unwinding out of a directive or watcher.
struct PendingView<'a> {
    /// Compiler owning the document and scopes.
    compiler: &'a Compiler,
    /// Isolate scope allocated for the view.
    scope: ScopeId,
    /// Element created for the view, once allocated.
    element: Option<NodeId>,
    /// Set once the caller owns the view.
    completed: bool,
}

impl PendingView<'_> {
    /// Hands ownership of the view to the caller.
    fn complete(mut self, element: NodeId) -> ViewHandle {
        self.completed = true;
        ViewHandle {
            element,
            scope: self.scope,
        }
    }
}

impl Drop for PendingView<'_> {
    fn drop(&mut self) {
        if self.completed {
            return;
        }
        if let Some(element) = self.element {
            let _ = self.compiler.document.remove(element);
        }
        let _ = self.compiler.scopes.destroy(self.scope);
    }
}

impl ViewHost for Compiler {
    type Error = DomError;
    type Isolated = ScopeHandle;
    type State = ScopeHandle;
    type Template = TemplateDescriptor;
    type View = ViewHandle;

    fn new_state_root(&self) -> Result<ScopeHandle, DomError> {
        self.scopes.new_child(self.scopes.root()?)
    }

    fn compile_and_attach(
        &self,
        template: &TemplateDescriptor,
        state: &ScopeHandle,
        collaborators: &CollaboratorSet,
    ) -> Result<(ViewHandle, ScopeHandle), DomError> {
        let matched = self.directives.matching(template);
        Self::check_isolation(template, &matched)?;
        let isolate = self.scopes.new_isolate(state.id())?;
        let mut pending = PendingView {
            compiler: self,
            scope: isolate.id(),
            element: None,
            completed: false,
        };
        let element = self.document.create_element(template.tag(), template.attributes().clone())?;
        pending.element = Some(element);
        self.link_and_attach(template, &matched, state, &isolate, element, collaborators)?;
        Ok((pending.complete(element), isolate))
    }

    fn detach(&self, view: ViewHandle) -> Result<(), DomError> {
        let removed = self.document.remove(view.element);
        let destroyed = self.scopes.destroy(view.scope);
        removed.and(destroyed)
    }

    fn release_state(&self, state: ScopeHandle) -> Result<(), DomError> {
        self.scopes.destroy(state.id())
    }

    fn live_views(&self) -> usize {
        self.document.attached_children()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
