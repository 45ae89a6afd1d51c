//! Layered graph store feature

pub mod domain;
pub mod infrastructure;

pub use domain::{Delta, DeltaEntities, StoreSnapshot, StoreStats};
pub use infrastructure::GraphStore;
