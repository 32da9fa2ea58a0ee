// system-tests/src/lib.rs
// ============================================================================
// Module: Fixture Harness System Tests Library
// Description: Shared configuration for system test scenarios.
// Purpose: Provide common settings for the fixture-harness system-test binaries.
// Dependencies: std
// ============================================================================

//! ## Overview
//! This crate hosts shared configuration used by the fixture-harness
//! system-test binaries in `system-tests/tests`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
