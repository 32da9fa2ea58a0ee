// crates/fixture-harness-registry/src/policy.rs
// ============================================================================
// Module: Access Policy
// Description: Allowlist and denylist checks for capability names.
// Purpose: Keep suites from resolving collaborators they were not granted.
// Dependencies: std
// ============================================================================

//! ## Overview
//! [`AccessPolicy`] decides whether a capability may be resolved. The
//! denylist always wins; an absent allowlist admits everything not denied.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

// ============================================================================
// SECTION: Access Policy
// ============================================================================

/// Access policy controlling which capabilities may be resolved.
///
/// # Invariants
/// - `denylist` overrides `allowlist` when both are present.
/// - If `allowlist` is `None`, all capabilities are allowed unless denied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    /// Optional allowlist of capability names.
    pub allowlist: Option<BTreeSet<String>>,
    /// Explicit denylist of capability names.
    pub denylist: BTreeSet<String>,
}

impl AccessPolicy {
    /// Returns a policy that permits all capabilities.
    #[must_use]
    pub const fn allow_all() -> Self {
        Self {
            allowlist: None,
            denylist: BTreeSet::new(),
        }
    }

    /// Builds a policy from optional allow and deny name lists.
    #[must_use]
    pub fn from_lists<A, D>(allowlist: Option<A>, denylist: D) -> Self
    where
        A: IntoIterator<Item = String>,
        D: IntoIterator<Item = String>,
    {
        Self {
            allowlist: allowlist.map(|names| names.into_iter().collect()),
            denylist: denylist.into_iter().collect(),
        }
    }

    /// Returns true when the capability is allowed by policy.
    #[must_use]
    pub fn is_allowed(&self, name: &str) -> bool {
        if self.denylist.contains(name) {
            return false;
        }
        if let Some(allowlist) = &self.allowlist {
            return allowlist.contains(name);
        }
        true
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::allow_all()
    }
}
