// crates/fixture-harness-app/src/directive.rs
// ============================================================================
// Module: Heavy Load Directive
// Description: Isolate-scope directive rendering heavy service data.
// Purpose: Initialize view state from the injected heavyLoad service.
// Dependencies: fixture-harness-dom, serde_json
// ============================================================================

//! ## Overview
//! `heavyLoad` links against its own isolated scope. It sets `title` from
//! `getHeavyString` and `items` from `getHeavyList`, then keeps `itemCount`
//! derived from `items`. The element text shows the item count so the
//! document carries rendered content for every mounted case.

use fixture_harness_dom::Directive;
use fixture_harness_dom::DomError;
use fixture_harness_dom::LinkContext;
use serde_json::Value;
use serde_json::json;

use crate::service::GET_HEAVY_LIST;
use crate::service::GET_HEAVY_STRING;

/// Capability name of the heavy-load service.
pub const HEAVY_LOAD: &str = "heavyLoad";

/// The `heavyLoad` directive.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeavyLoadDirective;

impl Directive for HeavyLoadDirective {
    fn name(&self) -> &str {
        HEAVY_LOAD
    }

    fn link(&self, context: &LinkContext<'_>) -> Result<(), DomError> {
        let title = context.call(HEAVY_LOAD, GET_HEAVY_STRING, &[])?;
        let items = context.call(HEAVY_LOAD, GET_HEAVY_LIST, &[])?;
        let count = items.as_array().map_or(0, Vec::len);
        let scope = context.scope();
        scope.set("title", title)?;
        scope.set("items", items)?;
        context.watch(
            "items",
            "itemCount",
            Box::new(|items: &Value| json!(items.as_array().map_or(0, Vec::len))),
        )?;
        context.document().set_text(context.element(), format!("{count} items"))
    }
}
