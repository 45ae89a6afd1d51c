/*
 * Layergraph Core - Layered Graph Store
 *
 * Feature-First Architecture:
 * - shared/      : Common models (Node, Edge, ids, arity constraints) and
 *                  utilities (set algebra, id derivation)
 * - features/    : Vertical slices (graph_store: delta domain + store)
 *
 * The store is a single-threaded in-memory structure: typed, labeled nodes
 * and typed directed edges behind five synchronized secondary indices.
 * Every mutation validates before touching any map and returns a Delta of
 * entity snapshots suitable for undo/redo composition and incremental
 * re-rendering.
 */

pub mod config;
pub mod errors;
pub mod features;
pub mod shared;

// ═══════════════════════════════════════════════════════════════════════════
// Public surface
// ═══════════════════════════════════════════════════════════════════════════

pub use config::StoreConfig;
pub use errors::{GraphStoreError, Result};
pub use features::graph_store::{Delta, DeltaEntities, GraphStore, StoreSnapshot, StoreStats};
pub use shared::models::{
    bound_max, bound_min, intern, Arity, ArityConstraint, Edge, EdgeId, InternedString, Label,
    Node, NodeId, TypeTag,
};
pub use shared::utils::set_ops;
