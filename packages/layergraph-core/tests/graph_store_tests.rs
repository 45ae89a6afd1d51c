// Graph Store Tests - Edge/Corner/Complex Cases
//
// Test Categories:
// 1. Basic Functionality
// 2. Validation and Failure Semantics
// 3. Cascading Deletion
// 4. Labels and Type Changes
// 5. Merge / Clone
// 6. Deltas and Snapshots
// 7. Index Lookups

use layergraph_core::{
    Arity, ArityConstraint, Delta, EdgeId, GraphStore, GraphStoreError, NodeId, StoreConfig,
};
use pretty_assertions::assert_eq;

// ============================================================
// Test Helpers
// ============================================================

fn sorted_node_ids(ids: Vec<NodeId>) -> Vec<String> {
    let mut out: Vec<String> = ids.into_iter().map(|id| id.to_string()).collect();
    out.sort();
    out
}

fn sorted_edge_ids(ids: Vec<EdgeId>) -> Vec<String> {
    let mut out: Vec<String> = ids.into_iter().map(|id| id.to_string()).collect();
    out.sort();
    out
}

/// Scan the whole store through the public API and assert the index/primary
/// consistency and referential-integrity invariants.
fn assert_store_consistent(store: &GraphStore) {
    for node_id in store.get_nodes_by_type(None) {
        let node = store
            .get_node(node_id.as_str())
            .expect("indexed node must exist");
        let by_type = store.get_nodes_by_type(Some(node.kind()));
        assert!(by_type.contains(&node_id), "node missing from by-type bucket");
        for label in node.labels() {
            let by_label = store.get_nodes_by_label(&[label.as_ref()]);
            assert!(by_label.contains(&node_id), "node missing from by-label bucket");
        }
    }
    for edge_id in store.get_edges_by_type(None) {
        let edge = store
            .get_edge(edge_id.as_str())
            .expect("indexed edge must exist");
        assert!(
            store.contains_node(edge.source().as_str()),
            "edge source must resolve"
        );
        assert!(
            store.contains_node(edge.target().as_str()),
            "edge target must resolve"
        );
        assert!(store.get_edges_by_type(Some(edge.kind())).contains(&edge_id));
        assert!(store
            .get_edges_by_source(Some(edge.source().as_str()))
            .contains(&edge_id));
        assert!(store
            .get_edges_by_target(Some(edge.target().as_str()))
            .contains(&edge_id));
    }
}

fn small_graph() -> GraphStore {
    let mut store = GraphStore::new();
    store.add_node("n1", "Agent", &["alpha"]).unwrap();
    store.add_node("n2", "Agent", &["beta"]).unwrap();
    store.add_node("n3", "Task", &[]).unwrap();
    store.add_edge("e1", "bind", "n1", "n2").unwrap();
    store.add_edge("e2", "uses", "n1", "n3").unwrap();
    store.add_edge("e3", "uses", "n2", "n3").unwrap();
    store
}

// ============================================================
// 1. Basic Functionality
// ============================================================

#[test]
fn test_add_and_get_node() {
    let mut store = GraphStore::new();
    let delta = store.add_node("n1", "Agent", &["alpha", "beta"]).unwrap();

    let node = store.get_node("n1").unwrap();
    assert_eq!(node.kind(), "Agent");
    assert!(node.has_label("alpha"));
    assert!(delta.entered.nodes.contains_key("n1"));
    assert!(delta.exited.is_empty());
    assert_eq!(store.node_count(), 1);
}

#[test]
fn test_add_edge_and_adjacency() {
    let store = small_graph();
    assert_eq!(
        sorted_edge_ids(store.get_edges_by_source(Some("n1"))),
        vec!["e1", "e2"]
    );
    assert_eq!(
        sorted_edge_ids(store.get_edges_by_target(Some("n3"))),
        vec!["e2", "e3"]
    );
    assert_eq!(sorted_edge_ids(store.get_edges_of("n2")), vec!["e1", "e3"]);
    assert_store_consistent(&store);
}

#[test]
fn test_with_config_capacity_hints() {
    let store = GraphStore::with_config(StoreConfig::with_capacity(64, 128)).unwrap();
    assert!(store.is_empty());
}

#[test]
fn test_pipeline_walkthrough() {
    let mut store = GraphStore::new();
    store.add_node("n1", "Agent", &[]).unwrap();
    store.add_node("n2", "Agent", &[]).unwrap();
    store.add_edge("e1", "bind", "n1", "n2").unwrap();

    assert_eq!(store.get_edges_by_source(Some("n1")), vec![EdgeId::new("e1")]);

    store.rm_node("n1").unwrap();
    assert!(store.get_edges_by_source(Some("n1")).is_empty());
    assert!(!store.contains_edge("e1"));
}

// ============================================================
// 2. Validation and Failure Semantics
// ============================================================

#[test]
fn test_duplicate_ids_rejected() {
    let mut store = small_graph();
    assert!(matches!(
        store.add_node("n1", "Other", &[]),
        Err(GraphStoreError::Conflict(_))
    ));
    assert!(matches!(
        store.add_edge("e1", "bind", "n2", "n3"),
        Err(GraphStoreError::Conflict(_))
    ));
    // a rejected call leaves nothing half-applied
    assert_eq!(store.node_count(), 3);
    assert_eq!(store.edge_count(), 3);
    assert_store_consistent(&store);
}

#[test]
fn test_empty_id_and_type_rejected() {
    let mut store = GraphStore::new();
    assert!(matches!(
        store.add_node("", "Agent", &[]),
        Err(GraphStoreError::Validation(_))
    ));
    store.add_node("n1", "Agent", &[]).unwrap();
    store.add_node("n2", "Agent", &[]).unwrap();
    assert!(matches!(
        store.add_edge("e1", "", "n1", "n2"),
        Err(GraphStoreError::Validation(_))
    ));
    assert_eq!(store.edge_count(), 0);
}

#[test]
fn test_missing_endpoint_rejected() {
    let mut store = GraphStore::new();
    store.add_node("n1", "Agent", &[]).unwrap();
    let err = store.add_edge("e1", "bind", "n1", "ghost").unwrap_err();
    assert!(matches!(err, GraphStoreError::NotFound { .. }));
    assert_eq!(store.edge_count(), 0);
}

#[test]
fn test_missing_entity_operations() {
    let mut store = GraphStore::new();
    assert!(matches!(
        store.rm_node("ghost"),
        Err(GraphStoreError::NotFound { .. })
    ));
    assert!(matches!(
        store.rm_edge("ghost"),
        Err(GraphStoreError::NotFound { .. })
    ));
    assert!(matches!(
        store.add_node_labels("ghost", &["x"]),
        Err(GraphStoreError::NotFound { .. })
    ));
    assert!(matches!(
        store.set_node_type("ghost", "Agent"),
        Err(GraphStoreError::NotFound { .. })
    ));
}

// ============================================================
// 3. Cascading Deletion
// ============================================================

#[test]
fn test_rm_node_cascades_to_incident_edges() {
    let mut store = small_graph();
    let delta = store.rm_node("n1").unwrap();

    assert!(!store.contains_node("n1"));
    assert!(!store.contains_edge("e1"));
    assert!(!store.contains_edge("e2"));
    assert!(store.contains_edge("e3"));

    assert!(delta.exited.nodes.contains_key("n1"));
    assert!(delta.exited.edges.contains_key("e1"));
    assert!(delta.exited.edges.contains_key("e2"));
    assert!(delta.entered.is_empty());
    assert_store_consistent(&store);
}

#[test]
fn test_rm_node_with_self_loop() {
    let mut store = GraphStore::new();
    store.add_node("n1", "Agent", &[]).unwrap();
    store.add_edge("loop", "bind", "n1", "n1").unwrap();

    let delta = store.rm_node("n1").unwrap();
    assert!(store.is_empty());
    // the self-loop is removed exactly once
    assert_eq!(delta.exited.edges.len(), 1);
}

#[test]
fn test_rm_edge_prunes_buckets() {
    let mut store = GraphStore::new();
    store.add_node("n1", "Agent", &[]).unwrap();
    store.add_node("n2", "Agent", &[]).unwrap();
    store.add_edge("e1", "bind", "n1", "n2").unwrap();

    store.rm_edge("e1").unwrap();
    assert!(store.get_edges_by_type(Some("bind")).is_empty());
    assert!(store.get_edges_by_source(Some("n1")).is_empty());
    assert!(store.get_edges_by_target(Some("n2")).is_empty());
    assert_store_consistent(&store);
}

// ============================================================
// 4. Labels and Type Changes
// ============================================================

#[test]
fn test_label_mutations_update_index() {
    let mut store = GraphStore::new();
    store.add_node("n1", "Agent", &["alpha"]).unwrap();

    store.add_node_labels("n1", &["beta"]).unwrap();
    assert_eq!(
        sorted_node_ids(store.get_nodes_by_label(&["beta"])),
        vec!["n1"]
    );

    store.rm_node_labels("n1", Some(&["alpha"])).unwrap();
    assert!(store.get_nodes_by_label(&["alpha"]).is_empty());
    assert!(store.get_node("n1").unwrap().has_label("beta"));

    // None clears everything
    store.rm_node_labels("n1", None).unwrap();
    assert!(store.get_node("n1").unwrap().labels().is_empty());
    assert!(store.get_nodes_by_label(&["beta"]).is_empty());
    assert_store_consistent(&store);
}

#[test]
fn test_label_noops_yield_empty_delta() {
    let mut store = GraphStore::new();
    store.add_node("n1", "Agent", &["alpha"]).unwrap();

    let delta = store.add_node_labels("n1", &["alpha"]).unwrap();
    assert!(delta.is_empty());

    let delta = store.rm_node_labels("n1", Some(&["missing"])).unwrap();
    assert!(delta.is_empty());
}

#[test]
fn test_set_node_type_moves_bucket() {
    let mut store = GraphStore::new();
    store.add_node("n1", "Agent", &[]).unwrap();

    let delta = store.set_node_type("n1", "Service").unwrap();
    assert!(store.get_nodes_by_type(Some("Agent")).is_empty());
    assert_eq!(
        store.get_nodes_by_type(Some("Service")),
        vec![NodeId::new("n1")]
    );
    assert_eq!(delta.exited.nodes["n1"].kind(), "Agent");
    assert_eq!(delta.entered.nodes["n1"].kind(), "Service");

    // unchanged type is a no-op
    assert!(store.set_node_type("n1", "Service").unwrap().is_empty());
    // empty type rejected, store untouched
    assert!(store.set_node_type("n1", "").is_err());
    assert_eq!(store.get_node("n1").unwrap().kind(), "Service");
}

#[test]
fn test_set_edge_type_moves_bucket() {
    let mut store = GraphStore::new();
    store.add_node("n1", "Agent", &[]).unwrap();
    store.add_node("n2", "Agent", &[]).unwrap();
    store.add_edge("e1", "bind", "n1", "n2").unwrap();

    store.set_edge_type("e1", "uses").unwrap();
    assert!(store.get_edges_by_type(Some("bind")).is_empty());
    assert_eq!(store.get_edges_by_type(Some("uses")), vec![EdgeId::new("e1")]);
    assert_store_consistent(&store);
}

// ============================================================
// 5. Merge / Clone
// ============================================================

#[test]
fn test_merge_node_repoints_edges_and_unions_labels() {
    let mut store = small_graph();
    let edges_before = store.edge_count();

    let delta = store.merge_node("n1", "n2", "m").unwrap();

    assert!(!store.contains_node("n1"));
    assert!(!store.contains_node("n2"));
    let merged = store.get_node("m").unwrap();
    assert_eq!(merged.kind(), "Agent");
    assert!(merged.has_label("alpha"));
    assert!(merged.has_label("beta"));

    // edge count unchanged, every incident edge now touches "m"
    assert_eq!(store.edge_count(), edges_before);
    let m = NodeId::new("m");
    for edge_id in ["e1", "e2", "e3"] {
        let edge = store.get_edge(edge_id).unwrap();
        assert!(edge.touches(&m), "edge {} must touch the merged node", edge_id);
    }
    // e1 ran n1 → n2, so it becomes a self-loop on m
    let e1 = store.get_edge("e1").unwrap();
    assert_eq!(e1.source(), &m);
    assert_eq!(e1.target(), &m);

    // delta: new node + repointed edges entered; old nodes + old edges exited
    assert!(delta.entered.nodes.contains_key("m"));
    assert!(delta.exited.nodes.contains_key("n1"));
    assert!(delta.exited.nodes.contains_key("n2"));
    assert_eq!(delta.entered.edges.len(), 3);
    assert_eq!(delta.exited.edges.len(), 3);
    assert_eq!(delta.exited.edges["e1"].source(), &NodeId::new("n1"));
    assert_store_consistent(&store);
}

#[test]
fn test_merge_type_guard_leaves_store_unchanged() {
    let mut store = small_graph();
    let before = serde_json::to_value(store.save_state()).unwrap();

    let err = store.merge_node("n1", "n3", "m").unwrap_err();
    assert!(matches!(err, GraphStoreError::TypeMismatch { .. }));

    let after = serde_json::to_value(store.save_state()).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_merge_rejects_self_and_taken_ids() {
    let mut store = small_graph();
    assert!(matches!(
        store.merge_node("n1", "n1", "m"),
        Err(GraphStoreError::Validation(_))
    ));
    assert!(matches!(
        store.merge_node("n1", "n2", "n3"),
        Err(GraphStoreError::Conflict(_))
    ));
}

#[test]
fn test_merge_widens_constraints() {
    let mut store = GraphStore::new();
    store.add_node("a", "Agent", &[]).unwrap();
    store.add_node("b", "Agent", &[]).unwrap();
    store
        .set_input_constraint(
            "a",
            "Task",
            ArityConstraint::new(Some(Arity::Finite(2)), Some(Arity::Finite(4))),
        )
        .unwrap();
    store
        .set_input_constraint(
            "b",
            "Task",
            ArityConstraint::new(Some(Arity::Finite(1)), Some(Arity::Unbounded)),
        )
        .unwrap();
    store
        .set_output_constraint(
            "a",
            "Task",
            ArityConstraint::new(Some(Arity::Finite(0)), Some(Arity::Finite(1))),
        )
        .unwrap();

    store.merge_node("a", "b", "m").unwrap();
    let merged = store.get_node("m").unwrap();

    let input = merged.input_constraints().get("Task").unwrap();
    assert_eq!(input.min, Some(Arity::Finite(1)));
    assert_eq!(input.max, Some(Arity::Unbounded));

    // only `a` bounded the output side; "no constraint" absorbs
    assert!(merged.output_constraints().get("Task").is_none());
}

#[test]
fn test_clone_node_duplicates_connectivity() {
    let mut store = small_graph();
    let delta = store.clone_node("n1", "c").unwrap();

    let clone = store.get_node("c").unwrap();
    assert_eq!(clone.kind(), "Agent");
    assert!(clone.has_label("alpha"));

    // n1 had two incident edges; the clone gets parallel copies
    assert_eq!(store.edge_count(), 5);
    let c = NodeId::new("c");
    let clone_edges = store.get_edges_of("c");
    assert_eq!(clone_edges.len(), 2);
    let mut targets: Vec<String> = clone_edges
        .iter()
        .map(|id| {
            let edge = store.get_edge(id.as_str()).unwrap();
            assert!(edge.touches(&c));
            edge.target().to_string()
        })
        .collect();
    targets.sort();
    // (n1,n2) duplicates to (c,n2); (n1,n3) to (c,n3)
    assert_eq!(targets, vec!["n2", "n3"]);

    // originals untouched
    assert_eq!(sorted_edge_ids(store.get_edges_of("n1")), vec!["e1", "e2"]);
    assert!(delta.entered.nodes.contains_key("c"));
    assert_eq!(delta.entered.edges.len(), 2);
    assert!(delta.exited.is_empty());
    assert_store_consistent(&store);
}

#[test]
fn test_clone_node_self_loop() {
    let mut store = GraphStore::new();
    store.add_node("n1", "Agent", &[]).unwrap();
    store.add_edge("loop", "bind", "n1", "n1").unwrap();

    store.clone_node("n1", "c").unwrap();
    let clone_edges = store.get_edges_of("c");
    assert_eq!(clone_edges.len(), 1);
    let edge = store.get_edge(clone_edges[0].as_str()).unwrap();
    assert_eq!(edge.source().as_str(), "c");
    assert_eq!(edge.target().as_str(), "c");
    assert_store_consistent(&store);
}

// ============================================================
// 6. Deltas and Snapshots
// ============================================================

#[test]
fn test_delta_inverse_describes_undo() {
    let mut store = GraphStore::new();
    let delta = store.add_node("n1", "Agent", &["alpha"]).unwrap();

    let undo = delta.inverted();
    assert!(undo.entered.is_empty());
    assert!(undo.exited.nodes.contains_key("n1"));
}

#[test]
fn test_delta_snapshots_do_not_alias_live_state() {
    let mut store = GraphStore::new();
    let delta = store.add_node("n1", "Agent", &[]).unwrap();
    store.add_node_labels("n1", &["late"]).unwrap();

    // the snapshot taken at add time does not see the later label
    assert!(!delta.entered.nodes["n1"].has_label("late"));
}

#[test]
fn test_save_state_is_deep_copy() {
    let mut store = small_graph();
    let snapshot = store.save_state();

    store.rm_node("n1").unwrap();
    store.add_node("n9", "Agent", &[]).unwrap();

    assert!(snapshot.nodes.contains_key("n1"));
    assert!(!snapshot.nodes.contains_key("n9"));
    assert_eq!(snapshot.edges.len(), 3);
}

#[test]
fn test_delta_merge_conflict() {
    let mut store = GraphStore::new();
    let d1 = store.add_node("n1", "Agent", &[]).unwrap();
    let mut other = GraphStore::new();
    let d2 = other.add_node("n1", "Agent", &[]).unwrap();

    assert!(matches!(d1.merge(d2), Err(GraphStoreError::Conflict(_))));
}

#[test]
fn test_empty_delta() {
    assert!(Delta::new().is_empty());
}

// ============================================================
// 7. Index Lookups
// ============================================================

#[test]
fn test_omitted_key_returns_full_lists() {
    let store = small_graph();
    assert_eq!(
        sorted_node_ids(store.get_nodes_by_type(None)),
        vec!["n1", "n2", "n3"]
    );
    assert_eq!(
        sorted_edge_ids(store.get_edges_by_type(None)),
        vec!["e1", "e2", "e3"]
    );
    assert_eq!(
        sorted_edge_ids(store.get_edges_by_source(None)),
        vec!["e1", "e2", "e3"]
    );
}

#[test]
fn test_label_intersection() {
    let mut store = GraphStore::new();
    store.add_node("n1", "Agent", &["x", "y"]).unwrap();
    store.add_node("n2", "Agent", &["x"]).unwrap();
    store.add_node("n3", "Agent", &["y"]).unwrap();

    assert_eq!(
        sorted_node_ids(store.get_nodes_by_label(&["x"])),
        vec!["n1", "n2"]
    );
    assert_eq!(
        sorted_node_ids(store.get_nodes_by_label(&["x", "y"])),
        vec!["n1"]
    );
    assert!(store.get_nodes_by_label(&["x", "missing"]).is_empty());
    // no requested labels: no universal set to intersect over
    assert!(store.get_nodes_by_label(&[]).is_empty());
}

#[test]
fn test_stats() {
    let store = small_graph();
    let stats = store.stats();
    assert_eq!(stats.total_nodes, 3);
    assert_eq!(stats.total_edges, 3);
    assert_eq!(stats.nodes_by_type["Agent"], 2);
    assert_eq!(stats.edges_by_type["uses"], 2);
}
