//! Secondary index manager.
//!
//! The five indices are derived state, owned by the store and updated in
//! the same operation as the primary maps. Buckets are insertion-ordered
//! id lists; a bucket is deleted as soon as its last member is removed, so
//! no empty buckets linger.

use ahash::AHashMap;
use std::hash::Hash;

use crate::shared::models::{Edge, EdgeId, Label, Node, NodeId, TypeTag};

type Bucket<I> = Vec<I>;

#[derive(Debug, Clone, Default)]
pub(crate) struct GraphIndexes {
    nodes_by_type: AHashMap<TypeTag, Bucket<NodeId>>,
    nodes_by_label: AHashMap<Label, Bucket<NodeId>>,
    edges_by_type: AHashMap<TypeTag, Bucket<EdgeId>>,
    edges_by_source: AHashMap<NodeId, Bucket<EdgeId>>,
    edges_by_target: AHashMap<NodeId, Bucket<EdgeId>>,
}

fn bucket_insert<K, I>(map: &mut AHashMap<K, Bucket<I>>, key: K, id: I)
where
    K: Eq + Hash,
    I: PartialEq,
{
    let bucket = map.entry(key).or_default();
    if !bucket.contains(&id) {
        bucket.push(id);
    }
}

fn bucket_remove<K, I>(map: &mut AHashMap<K, Bucket<I>>, key: &K, id: &I)
where
    K: Eq + Hash,
    I: PartialEq,
{
    if let Some(bucket) = map.get_mut(key) {
        bucket.retain(|member| member != id);
        if bucket.is_empty() {
            map.remove(key);
        }
    }
}

impl GraphIndexes {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------
    // Node index maintenance
    // ------------------------------------------------------------

    pub(crate) fn index_node(&mut self, node: &Node) {
        bucket_insert(
            &mut self.nodes_by_type,
            node.kind_tag().clone(),
            node.id().clone(),
        );
        for label in node.labels() {
            bucket_insert(&mut self.nodes_by_label, label.clone(), node.id().clone());
        }
    }

    pub(crate) fn unindex_node(&mut self, node: &Node) {
        bucket_remove(&mut self.nodes_by_type, node.kind_tag(), node.id());
        for label in node.labels() {
            bucket_remove(&mut self.nodes_by_label, label, node.id());
        }
    }

    pub(crate) fn add_node_label(&mut self, id: &NodeId, label: &Label) {
        bucket_insert(&mut self.nodes_by_label, label.clone(), id.clone());
    }

    pub(crate) fn remove_node_label(&mut self, id: &NodeId, label: &Label) {
        bucket_remove(&mut self.nodes_by_label, label, id);
    }

    pub(crate) fn retag_node(&mut self, id: &NodeId, old_kind: &TypeTag, new_kind: &TypeTag) {
        bucket_remove(&mut self.nodes_by_type, old_kind, id);
        bucket_insert(&mut self.nodes_by_type, new_kind.clone(), id.clone());
    }

    // ------------------------------------------------------------
    // Edge index maintenance
    // ------------------------------------------------------------

    pub(crate) fn index_edge(&mut self, edge: &Edge) {
        bucket_insert(
            &mut self.edges_by_type,
            edge.kind_tag().clone(),
            edge.id().clone(),
        );
        bucket_insert(
            &mut self.edges_by_source,
            edge.source().clone(),
            edge.id().clone(),
        );
        bucket_insert(
            &mut self.edges_by_target,
            edge.target().clone(),
            edge.id().clone(),
        );
    }

    pub(crate) fn unindex_edge(&mut self, edge: &Edge) {
        bucket_remove(&mut self.edges_by_type, edge.kind_tag(), edge.id());
        bucket_remove(&mut self.edges_by_source, edge.source(), edge.id());
        bucket_remove(&mut self.edges_by_target, edge.target(), edge.id());
    }

    pub(crate) fn retag_edge(&mut self, id: &EdgeId, old_kind: &TypeTag, new_kind: &TypeTag) {
        bucket_remove(&mut self.edges_by_type, old_kind, id);
        bucket_insert(&mut self.edges_by_type, new_kind.clone(), id.clone());
    }

    pub(crate) fn repoint_source(&mut self, id: &EdgeId, old: &NodeId, new: &NodeId) {
        bucket_remove(&mut self.edges_by_source, old, id);
        bucket_insert(&mut self.edges_by_source, new.clone(), id.clone());
    }

    pub(crate) fn repoint_target(&mut self, id: &EdgeId, old: &NodeId, new: &NodeId) {
        bucket_remove(&mut self.edges_by_target, old, id);
        bucket_insert(&mut self.edges_by_target, new.clone(), id.clone());
    }

    // ------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------

    pub(crate) fn node_ids_with_type(&self, kind: &str) -> &[NodeId] {
        self.nodes_by_type.get(kind).map_or(&[], |b| b.as_slice())
    }

    pub(crate) fn node_ids_with_label(&self, label: &str) -> &[NodeId] {
        self.nodes_by_label.get(label).map_or(&[], |b| b.as_slice())
    }

    pub(crate) fn edge_ids_with_type(&self, kind: &str) -> &[EdgeId] {
        self.edges_by_type.get(kind).map_or(&[], |b| b.as_slice())
    }

    pub(crate) fn edge_ids_from(&self, source: &str) -> &[EdgeId] {
        self.edges_by_source
            .get(source)
            .map_or(&[], |b| b.as_slice())
    }

    pub(crate) fn edge_ids_to(&self, target: &str) -> &[EdgeId] {
        self.edges_by_target
            .get(target)
            .map_or(&[], |b| b.as_slice())
    }

    /// Bucket-count views used by consistency checks in tests
    #[cfg(test)]
    pub(crate) fn bucket_counts(&self) -> (usize, usize, usize, usize, usize) {
        (
            self.nodes_by_type.len(),
            self.nodes_by_label.len(),
            self.edges_by_type.len(),
            self.edges_by_source.len(),
            self.edges_by_target.len(),
        )
    }
}
