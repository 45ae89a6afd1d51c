//! Node entity.
//!
//! Nodes are owned exclusively by the store; outside callers only ever see
//! shared references or `save_state` snapshots, so every mutation goes
//! through a store operation.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use super::constraint::ArityConstraint;
use super::ident::{
    arc_str_map, arc_str_vec, deserialize_arc_str, intern, serialize_arc_str, Label, NodeId,
    TypeTag,
};
use crate::errors::{GraphStoreError, Result};

/// Typed, labeled graph node with per-neighbor-type arity constraints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,

    /// Type tag (non-empty)
    #[serde(
        serialize_with = "serialize_arc_str",
        deserialize_with = "deserialize_arc_str"
    )]
    kind: TypeTag,

    /// Label set, kept in first-added order with set semantics
    #[serde(with = "arc_str_vec")]
    labels: Vec<Label>,

    /// Arity bounds on incoming edges, keyed by neighboring type
    #[serde(with = "arc_str_map")]
    input_constraints: AHashMap<TypeTag, ArityConstraint>,

    /// Arity bounds on outgoing edges, keyed by neighboring type
    #[serde(with = "arc_str_map")]
    output_constraints: AHashMap<TypeTag, ArityConstraint>,
}

impl Node {
    /// Create a node. Id and type must be non-empty; labels are deduplicated.
    pub fn new(id: &str, kind: &str, labels: &[&str]) -> Result<Self> {
        if id.is_empty() {
            return Err(GraphStoreError::validation("node id must be non-empty"));
        }
        if kind.is_empty() {
            return Err(GraphStoreError::validation("node type must be non-empty"));
        }
        let mut node = Self {
            id: NodeId::new(id),
            kind: intern(kind),
            labels: Vec::new(),
            input_constraints: AHashMap::new(),
            output_constraints: AHashMap::new(),
        };
        node.add_labels(labels);
        Ok(node)
    }

    #[inline]
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    #[inline]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[inline]
    pub(crate) fn kind_tag(&self) -> &TypeTag {
        &self.kind
    }

    #[inline]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l.as_ref() == label)
    }

    pub fn input_constraints(&self) -> &AHashMap<TypeTag, ArityConstraint> {
        &self.input_constraints
    }

    pub fn output_constraints(&self) -> &AHashMap<TypeTag, ArityConstraint> {
        &self.output_constraints
    }

    /// Change the type tag. Rejects an empty tag.
    pub(crate) fn set_kind(&mut self, kind: &str) -> Result<()> {
        if kind.is_empty() {
            return Err(GraphStoreError::validation("node type must be non-empty"));
        }
        self.kind = intern(kind);
        Ok(())
    }

    /// Add labels with set semantics; already-present labels are no-ops.
    /// Returns the labels that were actually added.
    pub(crate) fn add_labels(&mut self, labels: &[&str]) -> Vec<Label> {
        let mut added = Vec::new();
        for label in labels {
            if !label.is_empty() && !self.has_label(label) {
                let label = intern(label);
                self.labels.push(label.clone());
                added.push(label);
            }
        }
        added
    }

    /// Remove the given labels (absent labels are no-ops); `None` clears all.
    /// Returns the labels that were actually removed.
    pub(crate) fn remove_labels(&mut self, labels: Option<&[&str]>) -> Vec<Label> {
        match labels {
            None => std::mem::take(&mut self.labels),
            Some(labels) => {
                let mut removed = Vec::new();
                for label in labels {
                    if let Some(pos) = self.labels.iter().position(|l| l.as_ref() == *label) {
                        removed.push(self.labels.remove(pos));
                    }
                }
                removed
            }
        }
    }

    pub(crate) fn set_input_constraint(&mut self, neighbor: &str, constraint: ArityConstraint) {
        self.input_constraints.insert(intern(neighbor), constraint);
    }

    pub(crate) fn set_output_constraint(&mut self, neighbor: &str, constraint: ArityConstraint) {
        self.output_constraints.insert(intern(neighbor), constraint);
    }

    /// Deep copy under a fresh identifier (type, labels and constraints kept)
    pub fn clone_with_new_id(&self, new_id: &str) -> Result<Self> {
        if new_id.is_empty() {
            return Err(GraphStoreError::validation("node id must be non-empty"));
        }
        let mut copy = self.clone();
        copy.id = NodeId::new(new_id);
        Ok(copy)
    }

    /// Structurally independent snapshot, safe to store in a delta
    pub fn save_state(&self) -> Node {
        self.clone()
    }
}
