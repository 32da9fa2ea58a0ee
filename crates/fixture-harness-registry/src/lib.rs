// crates/fixture-harness-registry/src/lib.rs
// ============================================================================
// Module: Fixture Harness Registry
// Description: Named collaborator modules and per-case injectors.
// Purpose: Resolve collaborators by capability name under an access policy.
// Dependencies: fixture-harness-core, thiserror
// ============================================================================

//! ## Overview
//! A [`ModuleRegistry`] maps capability names to factories and enforces an
//! [`AccessPolicy`]. Suites take a fresh [`Injector`] from the module for each
//! case; the injector constructs each collaborator at most once and hands the
//! same instance back on every later request within that case.
//! Invariants:
//! - Capability names are unique within a module.
//! - Policy is checked on every resolution, before any factory runs.
//! - Injectors never share instances across cases.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod injector;
pub mod module;
pub mod policy;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use injector::Injector;
pub use module::CollaboratorFactory;
pub use module::ModuleRegistry;
pub use module::RegistryError;
pub use policy::AccessPolicy;
