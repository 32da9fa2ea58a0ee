// system-tests/src/config/env.rs
// ============================================================================
// Module: System Test Environment
// Description: Environment-backed configuration for system tests.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: fixture-harness-config
// ============================================================================

//! ## Overview
//! Environment values are parsed with the runner's strict helpers, so invalid
//! UTF-8, empty values, and malformed numbers or booleans fail closed here too.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use fixture_harness_config::env::parse_bool;
use fixture_harness_config::env::parse_count;
use fixture_harness_config::env::read_env_nonempty;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Number of generated suites the stress run uses by default.
pub const DEFAULT_STRESS_SUITES: usize = 3000;

/// Environment keys for system test configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemTestEnv {
    /// Optional run root override for artifacts.
    RunRoot,
    /// Optional suite count override for the stress run (positive integer).
    StressSuites,
    /// Keep artifacts from passing runs (`true`/`false` or `1`/`0`).
    KeepArtifacts,
}

impl SystemTestEnv {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RunRoot => "FIXTURE_HARNESS_SYSTEM_TEST_RUN_ROOT",
            Self::StressSuites => "FIXTURE_HARNESS_SYSTEM_TEST_STRESS_SUITES",
            Self::KeepArtifacts => "FIXTURE_HARNESS_SYSTEM_TEST_KEEP_ARTIFACTS",
        }
    }
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Typed system test configuration derived from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemTestConfig {
    /// Optional run root override.
    pub run_root: Option<PathBuf>,
    /// Suites generated by the stress run.
    pub stress_suites: usize,
    /// Keep artifacts from passing runs.
    pub keep_artifacts: bool,
}

impl Default for SystemTestConfig {
    fn default() -> Self {
        Self {
            run_root: None,
            stress_suites: DEFAULT_STRESS_SUITES,
            keep_artifacts: false,
        }
    }
}

impl SystemTestConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when an environment value is not valid UTF-8, is empty,
    /// or fails validation (for example, a zero suite count or bad boolean).
    pub fn load() -> Result<Self, String> {
        let run_root = read(SystemTestEnv::RunRoot)?.map(PathBuf::from);
        let stress_suites = read(SystemTestEnv::StressSuites)?
            .map(|value| parse_count(SystemTestEnv::StressSuites.as_str(), &value))
            .transpose()
            .map_err(|err| err.to_string())?
            .unwrap_or(DEFAULT_STRESS_SUITES);
        let keep_artifacts = read(SystemTestEnv::KeepArtifacts)?
            .map(|value| parse_bool(SystemTestEnv::KeepArtifacts.as_str(), &value))
            .transpose()
            .map_err(|err| err.to_string())?
            .unwrap_or(false);
        Ok(Self {
            run_root,
            stress_suites,
            keep_artifacts,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads a non-empty variable, flattening the error to text.
fn read(key: SystemTestEnv) -> Result<Option<String>, String> {
    read_env_nonempty(key.as_str()).map_err(|err| err.to_string())
}
