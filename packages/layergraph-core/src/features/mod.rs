//! Vertical feature slices

pub mod graph_store;
