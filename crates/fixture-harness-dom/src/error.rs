// crates/fixture-harness-dom/src/error.rs
// ============================================================================
// Module: DOM Errors
// Description: Failures raised by the document, scopes, and compiler.
// Purpose: Give the reference host one stable error surface.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! [`DomError`] covers document bookkeeping, scope tree access, template
//! parsing, and directive linking.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::document::NodeId;
use crate::scope::ScopeId;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised by the reference view host.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The node is not part of the document arena.
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),
    /// The document body cannot be removed.
    #[error("the document body cannot be removed")]
    BodyRemoval,
    /// The scope does not exist or was destroyed.
    #[error("unknown scope: {0}")]
    UnknownScope(ScopeId),
    /// The root scope cannot be destroyed.
    #[error("the root scope cannot be destroyed")]
    RootDestruction,
    /// Template text could not be parsed.
    #[error("invalid template: {0}")]
    Template(String),
    /// No matched directive requests an isolated scope.
    #[error("template <{0}> declares no isolate-scope directive")]
    NoIsolatedScope(String),
    /// More than one matched directive requests an isolated scope.
    #[error("template <{tag}> declares several isolate-scope directives: {directives}")]
    MultipleIsolateDirectives {
        /// Element tag.
        tag: String,
        /// Conflicting directive names.
        directives: String,
    },
    /// A directive with the same name is already registered.
    #[error("directive already registered: {0}")]
    DuplicateDirective(String),
    /// A directive failed while linking.
    #[error("directive {directive} failed to link: {reason}")]
    Link {
        /// Directive name.
        directive: String,
        /// Failure reason.
        reason: String,
    },
    /// Watchers kept changing values past the digest limit.
    #[error("digest did not settle after {0} iterations")]
    DigestLimit(usize),
    /// Shared state could not be locked.
    #[error("dom state unavailable: {0}")]
    Unavailable(String),
}
