//! Graph store infrastructure

mod indexes;
mod store;

pub use store::GraphStore;
