//! Edge entity.
//!
//! Endpoints are mutable so a merge can repoint an edge in place instead of
//! deleting and recreating it; the store updates the affected index buckets
//! in the same operation.

use serde::{Deserialize, Serialize};

use super::ident::{deserialize_arc_str, intern, serialize_arc_str, EdgeId, NodeId, TypeTag};
use crate::errors::{GraphStoreError, Result};

/// Typed directed edge between two nodes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    id: EdgeId,

    /// Type tag (non-empty)
    #[serde(
        serialize_with = "serialize_arc_str",
        deserialize_with = "deserialize_arc_str"
    )]
    kind: TypeTag,

    /// Source node id (the "child" end in parent/child edges)
    source: NodeId,

    /// Target node id
    target: NodeId,
}

impl Edge {
    /// Create an edge. Id and type must be non-empty.
    pub fn new(id: &str, kind: &str, source: &str, target: &str) -> Result<Self> {
        if id.is_empty() {
            return Err(GraphStoreError::validation("edge id must be non-empty"));
        }
        if kind.is_empty() {
            return Err(GraphStoreError::validation("edge type must be non-empty"));
        }
        Ok(Self {
            id: EdgeId::new(id),
            kind: intern(kind),
            source: NodeId::new(source),
            target: NodeId::new(target),
        })
    }

    #[inline]
    pub fn id(&self) -> &EdgeId {
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
    pub fn source(&self) -> &NodeId {
        &self.source
    }

    #[inline]
    pub fn target(&self) -> &NodeId {
        &self.target
    }

    /// True if the node is either endpoint
    pub fn touches(&self, node_id: &NodeId) -> bool {
        &self.source == node_id || &self.target == node_id
    }

    /// Change the type tag. Rejects an empty tag.
    pub(crate) fn set_kind(&mut self, kind: &str) -> Result<()> {
        if kind.is_empty() {
            return Err(GraphStoreError::validation("edge type must be non-empty"));
        }
        self.kind = intern(kind);
        Ok(())
    }

    pub(crate) fn set_source(&mut self, source: NodeId) {
        self.source = source;
    }

    pub(crate) fn set_target(&mut self, target: NodeId) {
        self.target = target;
    }

    /// Structurally independent snapshot, safe to store in a delta
    pub fn save_state(&self) -> Edge {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_id_and_type() {
        assert!(Edge::new("", "bind", "n1", "n2").is_err());
        assert!(Edge::new("e1", "", "n1", "n2").is_err());
    }

    #[test]
    fn test_touches() {
        let edge = Edge::new("e1", "bind", "n1", "n2").unwrap();
        assert!(edge.touches(&NodeId::new("n1")));
        assert!(edge.touches(&NodeId::new("n2")));
        assert!(!edge.touches(&NodeId::new("n3")));
    }

    #[test]
    fn test_repoint() {
        let mut edge = Edge::new("e1", "bind", "n1", "n2").unwrap();
        let snapshot = edge.save_state();

        edge.set_source(NodeId::new("n9"));
        assert_eq!(edge.source().as_str(), "n9");
        assert_eq!(snapshot.source().as_str(), "n1");
    }
}
