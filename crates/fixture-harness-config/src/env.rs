// crates/fixture-harness-config/src/env.rs
// ============================================================================
// Module: Harness Environment
// Description: Environment-backed overrides for the runner configuration.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8, empty values, and malformed numbers or
//! booleans fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::config::ConfigError;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys read by the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessEnv {
    /// Optional config file path.
    ConfigPath,
    /// Optional suite count override (positive integer).
    SuiteCount,
    /// Optional suite label override.
    SuiteLabel,
    /// Optional fail-fast override (`true`/`false` or `1`/`0`).
    FailFast,
}

impl HarnessEnv {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConfigPath => "FIXTURE_HARNESS_CONFIG",
            Self::SuiteCount => "FIXTURE_HARNESS_SUITE_COUNT",
            Self::SuiteLabel => "FIXTURE_HARNESS_SUITE_LABEL",
            Self::FailFast => "FIXTURE_HARNESS_FAIL_FAST",
        }
    }
}

// ============================================================================
// SECTION: Overrides
// ============================================================================

/// Runner overrides read from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnvOverrides {
    /// Suite count override.
    pub suite_count: Option<usize>,
    /// Suite label override.
    pub suite_label: Option<String>,
    /// Fail-fast override.
    pub fail_fast: Option<bool>,
}

impl EnvOverrides {
    /// Reads overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] when a value is not valid UTF-8, is empty,
    /// or fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let suite_count = read_env_nonempty(HarnessEnv::SuiteCount.as_str())?
            .map(|value| parse_count(HarnessEnv::SuiteCount.as_str(), &value))
            .transpose()?;
        let suite_label = read_env_nonempty(HarnessEnv::SuiteLabel.as_str())?;
        let fail_fast = read_env_nonempty(HarnessEnv::FailFast.as_str())?
            .map(|value| parse_bool(HarnessEnv::FailFast.as_str(), &value))
            .transpose()?;
        Ok(Self {
            suite_count,
            suite_label,
            fail_fast,
        })
    }

    /// Returns true when no override is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.suite_count.is_none() && self.suite_label.is_none() && self.fail_fast.is_none()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, ConfigError> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string()
            .map(Some)
            .map_err(|_| ConfigError::Env(format!("{name} must be valid UTF-8")))
    })
}

/// Reads an environment variable and rejects empty values.
///
/// # Errors
///
/// Returns an error when the variable is set but empty or whitespace.
pub fn read_env_nonempty(name: &str) -> Result<Option<String>, ConfigError> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => {
            Err(ConfigError::Env(format!("{name} must not be empty")))
        }
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Parses a positive integer count.
///
/// # Errors
///
/// Returns an error when the value is non-numeric or zero.
pub fn parse_count(name: &str, raw: &str) -> Result<usize, ConfigError> {
    let count: usize = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::Env(format!("{name} must be a positive integer")))?;
    if count == 0 {
        return Err(ConfigError::Env(format!("{name} must be greater than zero")));
    }
    Ok(count)
}

/// Parses a boolean literal (`true`/`false` or `1`/`0`).
///
/// # Errors
///
/// Returns an error when the value is not a recognized boolean literal.
pub fn parse_bool(name: &str, raw: &str) -> Result<bool, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") || trimmed == "1" {
        return Ok(true);
    }
    if trimmed.eq_ignore_ascii_case("false") || trimmed == "0" {
        return Ok(false);
    }
    Err(ConfigError::Env(format!("{name} must be 1, 0, true, or false")))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
