// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: System Test Helpers
// Description: Shared helpers for fixture-harness system-tests.
// Purpose: Provide app wiring, suite variants, and artifact utilities.
// Dependencies: system-tests, fixture-harness-app, fixture-harness-core
// ============================================================================

//! ## Overview
//! Shared helpers for fixture-harness system-tests.
//! Invariants:
//! - System-test execution is deterministic and fail-closed.
//! - Every run builds its own compiler, module, and driver.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]

pub mod artifacts;
pub mod fixtures;
