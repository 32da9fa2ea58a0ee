// crates/fixture-harness-config/src/config.rs
// ============================================================================
// Module: Harness Configuration
// Description: Configuration model and file loading for the runner.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! When no path is given and neither `FIXTURE_HARNESS_CONFIG` nor the default
//! file exists, the built-in defaults are used. A file that is named
//! explicitly must exist.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::env::EnvOverrides;
use crate::env::HarnessEnv;
use crate::env::read_env_nonempty;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "fixture-harness.toml";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of generated suites.
pub const MAX_SUITE_COUNT: usize = 100_000;
/// Maximum suite label length in bytes.
pub(crate) const MAX_LABEL_LENGTH: usize = 256;
/// Maximum heavy string size in bytes.
pub(crate) const MAX_STRING_BYTES: usize = 16 * 1024 * 1024;
/// Maximum heavy list length.
pub(crate) const MAX_LIST_LEN: usize = 100_000;
/// Maximum heavy object field count.
pub(crate) const MAX_OBJECT_FIELDS: usize = 10_000;
/// Maximum entries in a policy list.
pub(crate) const MAX_POLICY_ENTRIES: usize = 256;

/// Default number of generated suites.
const DEFAULT_SUITE_COUNT: usize = 3000;
/// Default suite label prefix.
const DEFAULT_SUITE_LABEL: &str = "heavyLoad effective directive";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
    /// Invalid environment override.
    #[error("invalid environment override: {0}")]
    Env(String),
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Top-level runner configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    /// Suite generation and scheduling.
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Heavy-load payload sizes.
    #[serde(default)]
    pub payload: PayloadConfig,
    /// Collaborator access policy.
    #[serde(default)]
    pub registry: RegistryConfig,
}

/// Suite generation and scheduling settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunnerConfig {
    /// Number of suites to generate.
    #[serde(default = "default_suite_count")]
    pub suite_count: usize,
    /// Label prefix; suites are named `"{label} #{index}"`.
    #[serde(default = "default_suite_label")]
    pub suite_label: String,
    /// Skip remaining cases after the first failure.
    #[serde(default)]
    pub fail_fast: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            suite_count: DEFAULT_SUITE_COUNT,
            suite_label: DEFAULT_SUITE_LABEL.to_string(),
            fail_fast: false,
        }
    }
}

/// Heavy-load payload sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PayloadConfig {
    /// Heavy string length in bytes.
    #[serde(default = "default_string_bytes")]
    pub string_bytes: usize,
    /// Heavy list length.
    #[serde(default = "default_list_len")]
    pub list_len: usize,
    /// Heavy object field count.
    #[serde(default = "default_object_fields")]
    pub object_fields: usize,
}

impl Default for PayloadConfig {
    fn default() -> Self {
        Self {
            string_bytes: default_string_bytes(),
            list_len: default_list_len(),
            object_fields: default_object_fields(),
        }
    }
}

/// Collaborator access policy lists.
///
/// # Invariants
/// - `denylist` overrides `allowlist` when both name a capability.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Optional allowlist of capability names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowlist: Option<BTreeSet<String>>,
    /// Explicit denylist of capability names.
    #[serde(default)]
    pub denylist: BTreeSet<String>,
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl HarnessConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(resolved) = resolve_path(path)? else {
            return Ok(Self::default());
        };
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Applies environment overrides on top of file values.
    pub fn apply_overrides(&mut self, overrides: &EnvOverrides) {
        if let Some(count) = overrides.suite_count {
            self.runner.suite_count = count;
        }
        if let Some(label) = &overrides.suite_label {
            self.runner.suite_label.clone_from(label);
        }
        if let Some(fail_fast) = overrides.fail_fast {
            self.runner.fail_fast = fail_fast;
        }
    }

    /// Validates the configuration against hard limits.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.runner.validate()?;
        self.payload.validate()?;
        self.registry.validate()
    }
}

impl RunnerConfig {
    /// Validates runner settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.suite_count == 0 || self.suite_count > MAX_SUITE_COUNT {
            return Err(ConfigError::Invalid(format!(
                "runner.suite_count must be between 1 and {MAX_SUITE_COUNT}"
            )));
        }
        if self.suite_label.trim().is_empty() {
            return Err(ConfigError::Invalid("runner.suite_label must be non-empty".to_string()));
        }
        if self.suite_label.len() > MAX_LABEL_LENGTH {
            return Err(ConfigError::Invalid("runner.suite_label exceeds max length".to_string()));
        }
        Ok(())
    }
}

impl PayloadConfig {
    /// Validates payload sizes.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.string_bytes > MAX_STRING_BYTES {
            return Err(ConfigError::Invalid("payload.string_bytes too large".to_string()));
        }
        if self.list_len > MAX_LIST_LEN {
            return Err(ConfigError::Invalid("payload.list_len too large".to_string()));
        }
        if self.object_fields > MAX_OBJECT_FIELDS {
            return Err(ConfigError::Invalid("payload.object_fields too large".to_string()));
        }
        Ok(())
    }
}

impl RegistryConfig {
    /// Validates policy lists.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(allowlist) = &self.allowlist {
            validate_names("registry.allowlist", allowlist)?;
        }
        validate_names("registry.denylist", &self.denylist)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the default suite count.
const fn default_suite_count() -> usize {
    DEFAULT_SUITE_COUNT
}

/// Returns the default suite label.
fn default_suite_label() -> String {
    DEFAULT_SUITE_LABEL.to_string()
}

/// Returns the default heavy string size.
const fn default_string_bytes() -> usize {
    4096
}

/// Returns the default heavy list length.
const fn default_list_len() -> usize {
    256
}

/// Returns the default heavy object field count.
const fn default_object_fields() -> usize {
    64
}

/// Validates a policy name list.
fn validate_names(field: &str, names: &BTreeSet<String>) -> Result<(), ConfigError> {
    if names.len() > MAX_POLICY_ENTRIES {
        return Err(ConfigError::Invalid(format!("too many {field} entries")));
    }
    if names.iter().any(|name| name.trim().is_empty() || name.chars().any(char::is_whitespace)) {
        return Err(ConfigError::Invalid(format!("{field} entries must be non-empty names")));
    }
    Ok(())
}

/// Resolves the config path from the caller, environment, or default file.
fn resolve_path(path: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = path {
        return Ok(Some(path.to_path_buf()));
    }
    let env_path = read_env_nonempty(HarnessEnv::ConfigPath.as_str())?;
    if let Some(env_path) = env_path {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(Some(PathBuf::from(env_path)));
    }
    let default = PathBuf::from(DEFAULT_CONFIG_NAME);
    Ok(default.is_file().then_some(default))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}
