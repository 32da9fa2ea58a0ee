// crates/fixture-harness-app/src/service.rs
// ============================================================================
// Module: Heavy Load Service
// Description: Collaborator producing large, deterministic payloads.
// Purpose: Give rendered views enough state to make leaks visible.
// Dependencies: fixture-harness-core, serde, serde_json
// ============================================================================

//! ## Overview
//! [`HeavyLoad`] exposes `getHeavyString`, `getHeavyObject`, and
//! `getHeavyList`. None of them take arguments. Output is deterministic for a
//! given [`Payload`], so repeated cases render identical state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use fixture_harness_core::CallError;
use fixture_harness_core::Collaborator;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Method returning a large string.
pub const GET_HEAVY_STRING: &str = "getHeavyString";
/// Method returning a wide object.
pub const GET_HEAVY_OBJECT: &str = "getHeavyObject";
/// Method returning a long list.
pub const GET_HEAVY_LIST: &str = "getHeavyList";

/// Alphabet cycled to fill heavy strings.
const FILL: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

// ============================================================================
// SECTION: Payload
// ============================================================================

/// Sizes of the payloads returned by [`HeavyLoad`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    /// Length in bytes of `getHeavyString`.
    pub string_bytes: usize,
    /// Number of entries in `getHeavyList`.
    pub list_len: usize,
    /// Number of fields in `getHeavyObject`.
    pub object_fields: usize,
}

impl Default for Payload {
    fn default() -> Self {
        Self {
            string_bytes: 4096,
            list_len: 256,
            object_fields: 64,
        }
    }
}

// ============================================================================
// SECTION: Service
// ============================================================================

/// The `heavyLoad` collaborator.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeavyLoad {
    /// Payload sizes.
    payload: Payload,
}

impl HeavyLoad {
    /// Creates a service producing payloads of the given sizes.
    #[must_use]
    pub const fn new(payload: Payload) -> Self {
        Self {
            payload,
        }
    }

    /// Returns the configured payload sizes.
    #[must_use]
    pub const fn payload(&self) -> Payload {
        self.payload
    }

    /// Builds the heavy string.
    #[must_use]
    pub fn heavy_string(&self) -> String {
        FILL.iter().cycle().take(self.payload.string_bytes).map(|byte| char::from(*byte)).collect()
    }

    /// Builds the heavy object.
    #[must_use]
    pub fn heavy_object(&self) -> Value {
        let fields: Map<String, Value> = (0 .. self.payload.object_fields)
            .map(|index| (format!("field{index}"), json!(index)))
            .collect();
        Value::Object(fields)
    }

    /// Builds the heavy list.
    #[must_use]
    pub fn heavy_list(&self) -> Value {
        Value::Array(
            (0 .. self.payload.list_len)
                .map(|index| json!({ "id": index, "label": format!("item {index}") }))
                .collect(),
        )
    }
}

impl Collaborator for HeavyLoad {
    fn methods(&self) -> &[&'static str] {
        &[GET_HEAVY_STRING, GET_HEAVY_OBJECT, GET_HEAVY_LIST]
    }

    fn call(&self, method: &str, args: &[Value]) -> Result<Value, CallError> {
        if !args.is_empty() {
            return Err(CallError::InvalidArguments {
                method: method.to_string(),
                reason: format!("expected no arguments, got {}", args.len()),
            });
        }
        match method {
            GET_HEAVY_STRING => Ok(Value::String(self.heavy_string())),
            GET_HEAVY_OBJECT => Ok(self.heavy_object()),
            GET_HEAVY_LIST => Ok(self.heavy_list()),
            other => Err(CallError::UnknownMethod {
                collaborator: "heavyLoad".to_string(),
                method: other.to_string(),
            }),
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
