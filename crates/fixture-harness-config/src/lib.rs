// crates/fixture-harness-config/src/lib.rs
// ============================================================================
// Module: Fixture Harness Config
// Description: Runner configuration loading, overrides, and validation.
// Purpose: Provide strict, fail-closed runner settings with hard limits.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! [`HarnessConfig`] is read from TOML with size, path, and encoding guards,
//! then adjusted by [`EnvOverrides`] read from `FIXTURE_HARNESS_*` variables.
//! Every value is validated against hard limits before the runner uses it.
//! Invariants:
//! - Unknown fields are rejected.
//! - Invalid environment values fail closed instead of falling back.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod env;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::ConfigError;
pub use config::HarnessConfig;
pub use config::MAX_SUITE_COUNT;
pub use config::PayloadConfig;
pub use config::RegistryConfig;
pub use config::RunnerConfig;
pub use env::EnvOverrides;
pub use env::HarnessEnv;
