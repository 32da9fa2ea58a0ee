// crates/fixture-harness-dom/src/document.rs
// ============================================================================
// Module: Document Tree
// Description: Arena-backed element tree with a single body root.
// Purpose: Track which views are attached so leaks can be detected.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`Document`] is a cheaply cloneable handle to a shared element arena. The
//! body node exists for the document's whole lifetime. Removing a node drops
//! it and its descendants from the arena, so a removed view cannot be
//! reached again through the document.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use serde::Serialize;

use crate::error::DomError;

// ============================================================================
// SECTION: Identifiers
// ============================================================================

/// Identifier of a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

// ============================================================================
// SECTION: Arena
// ============================================================================

/// One element in the arena.
#[derive(Debug, Clone)]
struct Node {
    /// Element tag name.
    tag: String,
    /// Element attributes.
    attributes: BTreeMap<String, String>,
    /// Text content.
    text: String,
    /// Parent node, `None` while detached.
    parent: Option<NodeId>,
    /// Child nodes in document order.
    children: Vec<NodeId>,
}

/// Arena state behind a [`Document`].
#[derive(Debug)]
struct DocumentState {
    /// Nodes keyed by identifier.
    nodes: BTreeMap<NodeId, Node>,
    /// Body node.
    body: NodeId,
    /// Next identifier to allocate.
    next_id: u64,
}

impl DocumentState {
    /// Returns the node or an unknown-node error.
    fn node(&self, id: NodeId) -> Result<&Node, DomError> {
        self.nodes.get(&id).ok_or(DomError::UnknownNode(id))
    }

    /// Returns the node mutably or an unknown-node error.
    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        self.nodes.get_mut(&id).ok_or(DomError::UnknownNode(id))
    }
}

// ============================================================================
// SECTION: Document
// ============================================================================

/// Shared handle to an element tree.
#[derive(Debug, Clone)]
pub struct Document {
    /// Shared arena.
    state: Arc<Mutex<DocumentState>>,
}

impl Document {
    /// Creates a document containing only its body.
    #[must_use]
    pub fn new() -> Self {
        let body = NodeId(0);
        let mut nodes = BTreeMap::new();
        nodes.insert(
            body,
            Node {
                tag: "body".to_string(),
                attributes: BTreeMap::new(),
                text: String::new(),
                parent: None,
                children: Vec::new(),
            },
        );
        Self {
            state: Arc::new(Mutex::new(DocumentState {
                nodes,
                body,
                next_id: 1,
            })),
        }
    }

    /// Returns the body node.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Unavailable`] when the arena lock is poisoned.
    pub fn body(&self) -> Result<NodeId, DomError> {
        Ok(self.lock()?.body)
    }

    /// Creates a detached element.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Unavailable`] when the arena lock is poisoned.
    pub fn create_element(
        &self,
        tag: &str,
        attributes: BTreeMap<String, String>,
    ) -> Result<NodeId, DomError> {
        let mut state = self.lock()?;
        let id = NodeId(state.next_id);
        state.next_id += 1;
        state.nodes.insert(
            id,
            Node {
                tag: tag.to_string(),
                attributes,
                text: String::new(),
                parent: None,
                children: Vec::new(),
            },
        );
        Ok(id)
    }

    /// Appends `child` under `parent`, moving it if it already has a parent.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::UnknownNode`] when either node is missing.
    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let mut state = self.lock()?;
        state.node(parent)?;
        if let Some(previous) = state.node(child)?.parent {
            state.node_mut(previous)?.children.retain(|id| *id != child);
        }
        state.node_mut(child)?.parent = Some(parent);
        state.node_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Removes `node` and its descendants from the document.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::BodyRemoval`] for the body and
    /// [`DomError::UnknownNode`] when the node is not in the arena.
    pub fn remove(&self, node: NodeId) -> Result<(), DomError> {
        let mut state = self.lock()?;
        if node == state.body {
            return Err(DomError::BodyRemoval);
        }
        if let Some(parent) = state.node(node)?.parent {
            state.node_mut(parent)?.children.retain(|id| *id != node);
        }
        let mut pending = vec![node];
        while let Some(id) = pending.pop() {
            if let Some(removed) = state.nodes.remove(&id) {
                pending.extend(removed.children);
            }
        }
        Ok(())
    }

    /// Returns true when `node` exists in the arena.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.lock().is_ok_and(|state| state.nodes.contains_key(&node))
    }

    /// Returns true when `node` is reachable from the body.
    #[must_use]
    pub fn is_attached(&self, node: NodeId) -> bool {
        let Ok(state) = self.lock() else {
            return false;
        };
        let mut current = Some(node);
        while let Some(id) = current {
            if id == state.body {
                return true;
            }
            current = state.nodes.get(&id).and_then(|entry| entry.parent);
        }
        false
    }

    /// Returns the number of elements attached directly under the body.
    #[must_use]
    pub fn attached_children(&self) -> usize {
        self.lock().map_or(0, |state| {
            state.nodes.get(&state.body).map_or(0, |body| body.children.len())
        })
    }

    /// Returns the number of nodes in the arena, including the body.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.lock().map_or(0, |state| state.nodes.len())
    }

    /// Returns the element tag.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::UnknownNode`] when the node is missing.
    pub fn tag(&self, node: NodeId) -> Result<String, DomError> {
        Ok(self.lock()?.node(node)?.tag.clone())
    }

    /// Returns an attribute value.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::UnknownNode`] when the node is missing.
    pub fn attribute(&self, node: NodeId, name: &str) -> Result<Option<String>, DomError> {
        Ok(self.lock()?.node(node)?.attributes.get(name).cloned())
    }

    /// Replaces the text content of `node`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::UnknownNode`] when the node is missing.
    pub fn set_text(&self, node: NodeId, text: impl Into<String>) -> Result<(), DomError> {
        self.lock()?.node_mut(node)?.text = text.into();
        Ok(())
    }

    /// Returns the text content of `node`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::UnknownNode`] when the node is missing.
    pub fn text(&self, node: NodeId) -> Result<String, DomError> {
        Ok(self.lock()?.node(node)?.text.clone())
    }

    /// Locks the arena.
    fn lock(&self) -> Result<MutexGuard<'_, DocumentState>, DomError> {
        self.state.lock().map_err(|_| DomError::Unavailable("document lock poisoned".to_string()))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
