// crates/fixture-harness-dom/src/lib.rs
// ============================================================================
// Module: Fixture Harness DOM
// Description: In-memory document, reactive scope tree, and template compiler.
// Purpose: Provide a live rendering tree for fixture lifecycle tests.
// Dependencies: fixture-harness-core, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This crate provides the reference [`fixture_harness_core::ViewHost`]
//! implementation. [`Compiler`] parses a [`TemplateDescriptor`], links the
//! matching [`Directive`] against an isolated scope, attaches the resulting
//! element to the body of a shared [`Document`], and runs a digest so derived
//! fields are settled before the isolated state is handed back.
//!
//! Invariants:
//! - A view is attached to the document only after linking and digest succeed.
//! - Detaching a view removes its element subtree and destroys its isolated
//!   scope.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod compile;
pub mod document;
pub mod error;
pub mod scope;
pub mod template;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use compile::Compiler;
pub use compile::Directive;
pub use compile::DirectiveRegistry;
pub use compile::LinkContext;
pub use compile::ViewHandle;
pub use document::Document;
pub use document::NodeId;
pub use error::DomError;
pub use scope::Derivation;
pub use scope::ScopeHandle;
pub use scope::ScopeId;
pub use scope::ScopeTree;
pub use template::TemplateDescriptor;
pub use template::normalize_directive_name;
