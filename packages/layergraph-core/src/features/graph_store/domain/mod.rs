//! Graph store domain models: deltas, snapshots and statistics.
//!
//! Every mutation emits a [`Delta`]: an immutable record of the entities
//! that entered and exited the store during that operation. The
//! presentation layer pushes deltas onto its undo/redo stack (`exited` is
//! the undo state, `entered` the redo state) and re-renders only the
//! touched entities.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::{GraphStoreError, Result};
use crate::shared::models::{Edge, EdgeId, Node, NodeId};

// ============================================================
// Delta
// ============================================================

/// One side of a delta: entity snapshots keyed by id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeltaEntities {
    pub nodes: AHashMap<NodeId, Node>,
    pub edges: AHashMap<EdgeId, Edge>,
}

impl DeltaEntities {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Merge another side into this one, rejecting key collisions.
    ///
    /// The same id appearing on the same side of two sub-deltas means a
    /// compound operation touched one entity twice, which is inconsistent.
    fn merge(&mut self, other: DeltaEntities) -> Result<()> {
        for (id, node) in other.nodes {
            if self.nodes.contains_key(&id) {
                return Err(GraphStoreError::conflict(format!(
                    "node '{}' present in both deltas being merged",
                    id
                )));
            }
            self.nodes.insert(id, node);
        }
        for (id, edge) in other.edges {
            if self.edges.contains_key(&id) {
                return Err(GraphStoreError::conflict(format!(
                    "edge '{}' present in both deltas being merged",
                    id
                )));
            }
            self.edges.insert(id, edge);
        }
        Ok(())
    }
}

/// Record of what one operation changed in the store.
///
/// `exited` snapshots are taken before the change, `entered` snapshots
/// after it. An in-place mutation (labels, type change, repoint) puts the
/// same id on both sides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Delta {
    pub entered: DeltaEntities,
    pub exited: DeltaEntities,
}

impl Delta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entered.is_empty() && self.exited.is_empty()
    }

    pub(crate) fn node_entered(&mut self, node: &Node) {
        self.entered.nodes.insert(node.id().clone(), node.save_state());
    }

    pub(crate) fn node_exited(&mut self, node: &Node) {
        self.exited.nodes.insert(node.id().clone(), node.save_state());
    }

    pub(crate) fn edge_entered(&mut self, edge: &Edge) {
        self.entered.edges.insert(edge.id().clone(), edge.save_state());
    }

    pub(crate) fn edge_exited(&mut self, edge: &Edge) {
        self.exited.edges.insert(edge.id().clone(), edge.save_state());
    }

    /// Combine sub-deltas of a compound operation.
    ///
    /// Fails with a conflict if the same id appears on the same side of
    /// both deltas; a rejected merge indicates a bug in the compound
    /// operation, not a recoverable condition.
    pub fn merge(mut self, other: Delta) -> Result<Delta> {
        self.entered.merge(other.entered)?;
        self.exited.merge(other.exited)?;
        Ok(self)
    }

    /// The inverse record: applying it undoes this delta.
    pub fn inverted(&self) -> Delta {
        Delta {
            entered: self.exited.clone(),
            exited: self.entered.clone(),
        }
    }
}

// ============================================================
// Store snapshot
// ============================================================

/// Structurally independent copy of the whole store.
///
/// Serialization of the graph is the caller's concern; this is the handle
/// it serializes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub nodes: AHashMap<NodeId, Node>,
    pub edges: AHashMap<EdgeId, Edge>,
}

// ============================================================
// Statistics
// ============================================================

/// Aggregate counts over the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_nodes: usize,
    pub total_edges: usize,
    // Using std::HashMap instead of AHashMap for serde compatibility
    pub nodes_by_type: HashMap<String, usize>,
    pub edges_by_type: HashMap<String, usize>,
}
