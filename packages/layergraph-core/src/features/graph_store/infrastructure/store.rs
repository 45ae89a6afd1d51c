//! Graph store: primary maps, index manager and the mutation surface.
//!
//! Single-threaded, synchronous, in-process. Every mutation validates its
//! arguments before touching any map, then updates the primary maps and
//! all affected indices in the same call, and returns a [`Delta`] of the
//! entities that entered and exited the store.

use ahash::AHashMap;
use std::collections::HashMap;
use tracing::debug;

use super::indexes::GraphIndexes;
use crate::config::StoreConfig;
use crate::errors::{GraphStoreError, Result};
use crate::features::graph_store::domain::{Delta, StoreSnapshot, StoreStats};
use crate::shared::models::{intern, ArityConstraint, Edge, EdgeId, Node, NodeId};
use crate::shared::utils::set_ops;
use crate::shared::utils::IdGenerator;

/// In-memory layered graph store.
///
/// Owns every [`Node`] and [`Edge`] exclusively; callers only ever see
/// shared references and snapshots. Invariants held after every public
/// operation:
/// - every edge's source and target reference a live node
/// - every index entry points at a live entity, and no empty bucket lingers
/// - `merge_node` only combines nodes of equal type
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    nodes: AHashMap<NodeId, Node>,
    edges: AHashMap<EdgeId, Edge>,
    indexes: GraphIndexes,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-sized per the config's capacity hints
    pub fn with_config(config: StoreConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            nodes: AHashMap::with_capacity(config.node_capacity),
            edges: AHashMap::with_capacity(config.edge_capacity),
            indexes: GraphIndexes::new(),
        })
    }

    // ============================================================
    // Node operations
    // ============================================================

    /// Insert a node. The id must be unused; id and type must be non-empty.
    pub fn add_node(&mut self, id: &str, kind: &str, labels: &[&str]) -> Result<Delta> {
        if self.nodes.contains_key(id) {
            return Err(GraphStoreError::conflict(format!(
                "node id '{}' already in use",
                id
            )));
        }
        let node = Node::new(id, kind, labels)?;
        debug!(node_id = id, kind, "add_node");

        let mut delta = Delta::new();
        delta.node_entered(&node);
        self.indexes.index_node(&node);
        self.nodes.insert(node.id().clone(), node);
        Ok(delta)
    }

    /// Remove a node, cascading to every edge incident to it.
    pub fn rm_node(&mut self, id: &str) -> Result<Delta> {
        if !self.nodes.contains_key(id) {
            return Err(GraphStoreError::node_not_found(id));
        }
        debug!(node_id = id, "rm_node");

        // Snapshot the incident id list before the removal loop shrinks
        // the very buckets it reads.
        let incident = self.get_edges_of(id);
        let mut delta = Delta::new();
        for edge_id in &incident {
            delta = delta.merge(self.remove_edge_entry(edge_id.as_str())?)?;
        }
        delta.merge(self.remove_node_entry(id)?)
    }

    /// Add labels to a node; already-present labels are no-ops.
    pub fn add_node_labels(&mut self, id: &str, labels: &[&str]) -> Result<Delta> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| GraphStoreError::node_not_found(id))?;
        let before = node.save_state();
        let added = node.add_labels(labels);
        if added.is_empty() {
            return Ok(Delta::new());
        }

        let mut delta = Delta::new();
        delta.node_exited(&before);
        delta.node_entered(node);
        let node_id = node.id().clone();
        for label in &added {
            self.indexes.add_node_label(&node_id, label);
        }
        Ok(delta)
    }

    /// Remove labels from a node; `None` clears all labels.
    pub fn rm_node_labels(&mut self, id: &str, labels: Option<&[&str]>) -> Result<Delta> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| GraphStoreError::node_not_found(id))?;
        let before = node.save_state();
        let removed = node.remove_labels(labels);
        if removed.is_empty() {
            return Ok(Delta::new());
        }

        let mut delta = Delta::new();
        delta.node_exited(&before);
        delta.node_entered(node);
        let node_id = node.id().clone();
        for label in &removed {
            self.indexes.remove_node_label(&node_id, label);
        }
        Ok(delta)
    }

    /// Change a node's type tag and move it between by-type buckets.
    pub fn set_node_type(&mut self, id: &str, kind: &str) -> Result<Delta> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| GraphStoreError::node_not_found(id))?;
        if node.kind() == kind {
            return Ok(Delta::new());
        }
        let before = node.save_state();
        let old_kind = before.kind_tag().clone();
        node.set_kind(kind)?;
        let new_kind = node.kind_tag().clone();

        let mut delta = Delta::new();
        delta.node_exited(&before);
        delta.node_entered(node);
        let node_id = node.id().clone();
        self.indexes.retag_node(&node_id, &old_kind, &new_kind);
        Ok(delta)
    }

    /// Set the input-side arity bound for one neighboring type.
    pub fn set_input_constraint(
        &mut self,
        id: &str,
        neighbor: &str,
        constraint: ArityConstraint,
    ) -> Result<Delta> {
        if neighbor.is_empty() {
            return Err(GraphStoreError::validation(
                "neighbor type must be non-empty",
            ));
        }
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| GraphStoreError::node_not_found(id))?;
        let before = node.save_state();
        node.set_input_constraint(neighbor, constraint);

        let mut delta = Delta::new();
        delta.node_exited(&before);
        delta.node_entered(node);
        Ok(delta)
    }

    /// Set the output-side arity bound for one neighboring type.
    pub fn set_output_constraint(
        &mut self,
        id: &str,
        neighbor: &str,
        constraint: ArityConstraint,
    ) -> Result<Delta> {
        if neighbor.is_empty() {
            return Err(GraphStoreError::validation(
                "neighbor type must be non-empty",
            ));
        }
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| GraphStoreError::node_not_found(id))?;
        let before = node.save_state();
        node.set_output_constraint(neighbor, constraint);

        let mut delta = Delta::new();
        delta.node_exited(&before);
        delta.node_entered(node);
        Ok(delta)
    }

    /// Merge two same-type nodes into a fresh node carrying the union of
    /// their labels, the widened union of their constraint tables, and
    /// every edge that was incident to either.
    pub fn merge_node(&mut self, a: &str, b: &str, new_id: &str) -> Result<Delta> {
        if a == b {
            return Err(GraphStoreError::validation(
                "cannot merge a node with itself",
            ));
        }
        let node_a = self
            .nodes
            .get(a)
            .ok_or_else(|| GraphStoreError::node_not_found(a))?;
        let node_b = self
            .nodes
            .get(b)
            .ok_or_else(|| GraphStoreError::node_not_found(b))?;
        if node_a.kind() != node_b.kind() {
            return Err(GraphStoreError::type_mismatch(node_a.kind(), node_b.kind()));
        }
        if self.nodes.contains_key(new_id) {
            return Err(GraphStoreError::conflict(format!(
                "node id '{}' already in use",
                new_id
            )));
        }
        debug!(a, b, new_id, "merge_node");

        let merged = Self::build_merged_node(node_a, node_b, new_id)?;
        let mut delta = Delta::new();
        delta.node_entered(&merged);
        self.indexes.index_node(&merged);
        let merged_id = merged.id().clone();
        self.nodes.insert(merged_id.clone(), merged);

        // Repoint every incident edge (dedup: an a→b edge is repointed once
        // at both endpoints). The id lists are snapshotted up front.
        let incident = set_ops::union(&self.get_edges_of(a), &self.get_edges_of(b));
        for edge_id in &incident {
            delta = delta.merge(self.repoint_edge_entry(edge_id, a, b, &merged_id)?)?;
        }

        // a and b are now isolated; removing them cascades to nothing
        delta = delta.merge(self.remove_node_entry(a)?)?;
        delta.merge(self.remove_node_entry(b)?)
    }

    /// Duplicate a node under a fresh id, duplicating every incident edge
    /// so the clone has identical connectivity.
    pub fn clone_node(&mut self, id: &str, new_id: &str) -> Result<Delta> {
        let original = self
            .nodes
            .get(id)
            .ok_or_else(|| GraphStoreError::node_not_found(id))?;
        if self.nodes.contains_key(new_id) {
            return Err(GraphStoreError::conflict(format!(
                "node id '{}' already in use",
                new_id
            )));
        }
        let copy = original.clone_with_new_id(new_id)?;
        let original_id = original.id().clone();
        debug!(node_id = id, new_id, "clone_node");

        let mut delta = Delta::new();
        delta.node_entered(&copy);
        self.indexes.index_node(&copy);
        let clone_id = copy.id().clone();
        self.nodes.insert(clone_id.clone(), copy);

        let incident = self.get_edges_of(id);
        for edge_id in &incident {
            let (kind, source, target) = {
                let edge = self
                    .edges
                    .get(edge_id.as_str())
                    .ok_or_else(|| GraphStoreError::edge_not_found(edge_id.as_str()))?;
                (intern(edge.kind()), edge.source().clone(), edge.target().clone())
            };
            // the clone takes the original's position at each endpoint
            let source = if source == original_id {
                clone_id.clone()
            } else {
                source
            };
            let target = if target == original_id {
                clone_id.clone()
            } else {
                target
            };
            let fresh = IdGenerator::derive_unique_edge_id(
                source.as_str(),
                target.as_str(),
                &kind,
                |candidate| self.edges.contains_key(candidate.as_str()),
            );
            let duplicate = Edge::new(fresh.as_str(), &kind, source.as_str(), target.as_str())?;
            delta = delta.merge(self.insert_edge_entry(duplicate))?;
        }
        Ok(delta)
    }

    // ============================================================
    // Edge operations
    // ============================================================

    /// Insert an edge. Both endpoints must exist; the id must be unused.
    pub fn add_edge(&mut self, id: &str, kind: &str, source: &str, target: &str) -> Result<Delta> {
        if !self.nodes.contains_key(source) {
            return Err(GraphStoreError::node_not_found(source));
        }
        if !self.nodes.contains_key(target) {
            return Err(GraphStoreError::node_not_found(target));
        }
        if self.edges.contains_key(id) {
            return Err(GraphStoreError::conflict(format!(
                "edge id '{}' already in use",
                id
            )));
        }
        let edge = Edge::new(id, kind, source, target)?;
        debug!(edge_id = id, kind, source, target, "add_edge");
        Ok(self.insert_edge_entry(edge))
    }

    /// Remove an edge.
    pub fn rm_edge(&mut self, id: &str) -> Result<Delta> {
        if !self.edges.contains_key(id) {
            return Err(GraphStoreError::edge_not_found(id));
        }
        debug!(edge_id = id, "rm_edge");
        self.remove_edge_entry(id)
    }

    /// Change an edge's type tag and move it between by-type buckets.
    pub fn set_edge_type(&mut self, id: &str, kind: &str) -> Result<Delta> {
        let edge = self
            .edges
            .get_mut(id)
            .ok_or_else(|| GraphStoreError::edge_not_found(id))?;
        if edge.kind() == kind {
            return Ok(Delta::new());
        }
        let before = edge.save_state();
        let old_kind = before.kind_tag().clone();
        edge.set_kind(kind)?;
        let new_kind = edge.kind_tag().clone();

        let mut delta = Delta::new();
        delta.edge_exited(&before);
        delta.edge_entered(edge);
        let edge_id = edge.id().clone();
        self.indexes.retag_edge(&edge_id, &old_kind, &new_kind);
        Ok(delta)
    }

    // ============================================================
    // Read-only queries
    // ============================================================

    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_edge(&self, id: &str) -> Option<&Edge> {
        self.edges.get(id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn contains_edge(&self, id: &str) -> bool {
        self.edges.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Nodes of the given type; `None` returns the full node id list.
    pub fn get_nodes_by_type(&self, kind: Option<&str>) -> Vec<NodeId> {
        match kind {
            Some(kind) => self.indexes.node_ids_with_type(kind).to_vec(),
            None => self.nodes.keys().cloned().collect(),
        }
    }

    /// Nodes carrying every requested label (bucket intersection).
    /// An empty label list yields the empty set.
    pub fn get_nodes_by_label(&self, labels: &[&str]) -> Vec<NodeId> {
        let buckets: Vec<&[NodeId]> = labels
            .iter()
            .map(|label| self.indexes.node_ids_with_label(label))
            .collect();
        set_ops::multi_intersection(&buckets)
    }

    /// Edges of the given type; `None` returns the full edge id list.
    pub fn get_edges_by_type(&self, kind: Option<&str>) -> Vec<EdgeId> {
        match kind {
            Some(kind) => self.indexes.edge_ids_with_type(kind).to_vec(),
            None => self.edges.keys().cloned().collect(),
        }
    }

    /// Edges leaving the given node; `None` returns the full edge id list.
    pub fn get_edges_by_source(&self, source: Option<&str>) -> Vec<EdgeId> {
        match source {
            Some(source) => self.indexes.edge_ids_from(source).to_vec(),
            None => self.edges.keys().cloned().collect(),
        }
    }

    /// Edges entering the given node; `None` returns the full edge id list.
    pub fn get_edges_by_target(&self, target: Option<&str>) -> Vec<EdgeId> {
        match target {
            Some(target) => self.indexes.edge_ids_to(target).to_vec(),
            None => self.edges.keys().cloned().collect(),
        }
    }

    /// All edges incident to the node (union of the source/target buckets)
    pub fn get_edges_of(&self, id: &str) -> Vec<EdgeId> {
        set_ops::union(self.indexes.edge_ids_from(id), self.indexes.edge_ids_to(id))
    }

    /// Structurally independent deep copy of the whole store
    pub fn save_state(&self) -> StoreSnapshot {
        StoreSnapshot {
            nodes: self
                .nodes
                .iter()
                .map(|(id, node)| (id.clone(), node.save_state()))
                .collect(),
            edges: self
                .edges
                .iter()
                .map(|(id, edge)| (id.clone(), edge.save_state()))
                .collect(),
        }
    }

    /// Aggregate counts by type
    pub fn stats(&self) -> StoreStats {
        let mut nodes_by_type = HashMap::new();
        for node in self.nodes.values() {
            *nodes_by_type.entry(node.kind().to_string()).or_insert(0) += 1;
        }
        let mut edges_by_type = HashMap::new();
        for edge in self.edges.values() {
            *edges_by_type.entry(edge.kind().to_string()).or_insert(0) += 1;
        }
        StoreStats {
            total_nodes: self.nodes.len(),
            total_edges: self.edges.len(),
            nodes_by_type,
            edges_by_type,
        }
    }

    // ============================================================
    // Internal primitives (delta-emitting, no validation)
    // ============================================================

    fn insert_edge_entry(&mut self, edge: Edge) -> Delta {
        let mut delta = Delta::new();
        delta.edge_entered(&edge);
        self.indexes.index_edge(&edge);
        self.edges.insert(edge.id().clone(), edge);
        delta
    }

    fn remove_edge_entry(&mut self, id: &str) -> Result<Delta> {
        let edge = self
            .edges
            .remove(id)
            .ok_or_else(|| GraphStoreError::edge_not_found(id))?;
        self.indexes.unindex_edge(&edge);
        let mut delta = Delta::new();
        delta.edge_exited(&edge);
        Ok(delta)
    }

    fn remove_node_entry(&mut self, id: &str) -> Result<Delta> {
        let node = self
            .nodes
            .remove(id)
            .ok_or_else(|| GraphStoreError::node_not_found(id))?;
        self.indexes.unindex_node(&node);
        let mut delta = Delta::new();
        delta.node_exited(&node);
        Ok(delta)
    }

    /// Move every endpoint of the edge that references `a` or `b` onto `to`,
    /// updating the by-source/by-target buckets.
    fn repoint_edge_entry(&mut self, id: &EdgeId, a: &str, b: &str, to: &NodeId) -> Result<Delta> {
        let edge = self
            .edges
            .get_mut(id.as_str())
            .ok_or_else(|| GraphStoreError::edge_not_found(id.as_str()))?;
        let mut delta = Delta::new();
        delta.edge_exited(edge);

        let old_source = edge.source().clone();
        let old_target = edge.target().clone();
        let move_source = old_source.as_str() == a || old_source.as_str() == b;
        let move_target = old_target.as_str() == a || old_target.as_str() == b;
        if move_source {
            edge.set_source(to.clone());
        }
        if move_target {
            edge.set_target(to.clone());
        }
        delta.edge_entered(edge);

        if move_source {
            self.indexes.repoint_source(id, &old_source, to);
        }
        if move_target {
            self.indexes.repoint_target(id, &old_target, to);
        }
        Ok(delta)
    }

    /// Merged node: type of `a`, union of labels, widened constraint tables.
    fn build_merged_node(node_a: &Node, node_b: &Node, new_id: &str) -> Result<Node> {
        let mut merged = Node::new(new_id, node_a.kind(), &[])?;

        let labels = set_ops::union(node_a.labels(), node_b.labels());
        let label_refs: Vec<&str> = labels.iter().map(|l| l.as_ref()).collect();
        merged.add_labels(&label_refs);

        let input_keys = set_ops::union(
            &node_a.input_constraints().keys().cloned().collect::<Vec<_>>(),
            &node_b.input_constraints().keys().cloned().collect::<Vec<_>>(),
        );
        for key in input_keys {
            let lhs = node_a
                .input_constraints()
                .get(&key)
                .copied()
                .unwrap_or_default();
            let rhs = node_b
                .input_constraints()
                .get(&key)
                .copied()
                .unwrap_or_default();
            let widened = lhs.widen(&rhs);
            if !widened.is_unconstrained() {
                merged.set_input_constraint(&key, widened);
            }
        }

        let output_keys = set_ops::union(
            &node_a.output_constraints().keys().cloned().collect::<Vec<_>>(),
            &node_b.output_constraints().keys().cloned().collect::<Vec<_>>(),
        );
        for key in output_keys {
            let lhs = node_a
                .output_constraints()
                .get(&key)
                .copied()
                .unwrap_or_default();
            let rhs = node_b
                .output_constraints()
                .get(&key)
                .copied()
                .unwrap_or_default();
            let widened = lhs.widen(&rhs);
            if !widened.is_unconstrained() {
                merged.set_output_constraint(&key, widened);
            }
        }

        Ok(merged)
    }
}
