// crates/fixture-harness-app/src/lib.rs
// ============================================================================
// Module: Fixture Harness App
// Description: Heavy-load service, directive, and its generated suite.
// Purpose: Exercise the fixture lifecycle against a realistic view.
// Dependencies: fixture-harness-core, fixture-harness-dom, fixture-harness-registry
// ============================================================================

//! ## Overview
//! The `app` module provides one capability, `heavyLoad`, which returns large
//! strings, objects, and lists. The `heavyLoad` directive renders from it into
//! an isolated scope. [`heavy_load_definition`] is the suite that compiles
//! `<div heavy-load></div>` and checks the directive initialized itself from
//! the instrumented service; the runner generates it thousands of times.
//! Invariants:
//! - Every case receives its own injector and therefore its own service.
//! - The directive calls `getHeavyString` and `getHeavyList` while linking.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod directive;
pub mod error;
pub mod service;
pub mod suite;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use directive::HEAVY_LOAD;
pub use directive::HeavyLoadDirective;
pub use error::AppError;
pub use service::HeavyLoad;
pub use service::Payload;
pub use suite::APP_MODULE;
pub use suite::COMPILE_CASE;
pub use suite::DEFAULT_SUITE_COUNT;
pub use suite::DEFAULT_SUITE_LABEL;
pub use suite::HEAVY_LOAD_TEMPLATE;
pub use suite::app_compiler;
pub use suite::app_module;
pub use suite::heavy_load_definition;
pub use suite::heavy_load_plan;
