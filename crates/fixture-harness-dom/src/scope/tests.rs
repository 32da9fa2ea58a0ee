// crates/fixture-harness-dom/src/scope/tests.rs
// ============================================================================
// Module: Scope Tree Unit Tests
// Description: Lookup, isolation, digest, and destruction behavior.
// Purpose: Ensure isolated state never leaks between parents and children.
// Dependencies: proptest, serde_json
// ============================================================================

//! ## Overview
//! Unit coverage for [`super::ScopeTree`].

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use std::panic::AssertUnwindSafe;
use std::panic::catch_unwind;

use proptest::prelude::*;
use serde_json::Value;
use serde_json::json;

use super::DIGEST_TTL;
use super::ScopeTree;
use crate::error::DomError;

#[test]
fn child_reads_through_and_isolate_does_not() {
    let tree = ScopeTree::new();
    let root = tree.root().unwrap();
    tree.set(root, "title", json!("inherited")).unwrap();

    let child = tree.new_child(root).unwrap();
    let isolate = tree.new_isolate(child.id()).unwrap();

    assert_eq!(child.get("title"), Some(json!("inherited")));
    assert!(!isolate.is_defined("title"));
    isolate.set("title", json!("own")).unwrap();
    assert_eq!(child.get("title"), Some(json!("inherited")));
}

#[test]
fn digest_settles_derived_fields() {
    let tree = ScopeTree::new();
    let scope = tree.new_child(tree.root().unwrap()).unwrap();
    scope.set("items", json!([1, 2, 3])).unwrap();
    tree.watch(
        scope.id(),
        "items",
        "itemCount",
        Box::new(|items| json!(items.as_array().map_or(0, Vec::len))),
    )
    .unwrap();

    tree.digest().unwrap();
    assert_eq!(scope.get("itemCount"), Some(json!(3)));

    scope.set("items", json!([])).unwrap();
    tree.digest().unwrap();
    assert_eq!(scope.get("itemCount"), Some(json!(0)));
}

#[test]
fn panicking_derivation_leaves_the_tree_usable() {
    let tree = ScopeTree::new();
    let scope = tree.new_child(tree.root().unwrap()).unwrap();
    tree.watch(
        scope.id(),
        "source",
        "target",
        Box::new(|_: &Value| -> Value { panic!("derive exploded") }),
    )
    .unwrap();

    let result = catch_unwind(AssertUnwindSafe(|| tree.digest()));
    assert!(result.is_err());

    tree.destroy(scope.id()).unwrap();
    let next = tree.new_child(tree.root().unwrap()).unwrap();
    next.set("fresh", json!(true)).unwrap();
    tree.digest().unwrap();
    assert_eq!(next.get("fresh"), Some(json!(true)));
    assert_eq!(tree.len(), 2);
}

#[test]
fn unstable_watchers_hit_the_digest_limit() {
    let tree = ScopeTree::new();
    let scope = tree.new_child(tree.root().unwrap()).unwrap();
    scope.set("tick", json!(0)).unwrap();
    tree.watch(
        scope.id(),
        "tick",
        "tick",
        Box::new(|tick| json!(tick.as_u64().unwrap_or(0) + 1)),
    )
    .unwrap();

    assert_eq!(tree.digest(), Err(DomError::DigestLimit(DIGEST_TTL)));
}

#[test]
fn destroy_removes_descendants() {
    let tree = ScopeTree::new();
    let root = tree.root().unwrap();
    let child = tree.new_child(root).unwrap();
    let grandchild = tree.new_isolate(child.id()).unwrap();
    assert_eq!(tree.len(), 3);

    tree.destroy(child.id()).unwrap();

    assert!(!child.is_live());
    assert!(!grandchild.is_live());
    assert!(tree.is_empty());
    assert_eq!(grandchild.set("late", Value::Null), Err(DomError::UnknownScope(grandchild.id())));
}

#[test]
fn root_cannot_be_destroyed() {
    let tree = ScopeTree::new();

    assert_eq!(tree.destroy(tree.root().unwrap()), Err(DomError::RootDestruction));
}

proptest! {
    #[test]
    fn siblings_never_share_fields(values in proptest::collection::vec(any::<i64>(), 1 .. 16)) {
        let tree = ScopeTree::new();
        let root = tree.root().unwrap();
        let scopes: Vec<_> = values.iter().map(|_| tree.new_isolate(root).unwrap()).collect();
        for (scope, value) in scopes.iter().zip(&values) {
            scope.set("value", json!(value)).unwrap();
        }
        for (scope, value) in scopes.iter().zip(&values) {
            prop_assert_eq!(scope.get("value"), Some(json!(value)));
        }
    }
}
