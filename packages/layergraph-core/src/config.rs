//! Store configuration

use serde::{Deserialize, Serialize};

use crate::errors::{GraphStoreError, Result};

/// Upper bound on capacity hints; guards against typos in deserialized configs
const MAX_CAPACITY_HINT: usize = 1 << 28;

/// Configuration for a [`crate::GraphStore`]
///
/// Capacity hints pre-size the primary maps; zero means no hint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Expected node count (0..=2^28)
    pub node_capacity: usize,

    /// Expected edge count (0..=2^28)
    pub edge_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            node_capacity: 0,
            edge_capacity: 0,
        }
    }
}

impl StoreConfig {
    pub fn with_capacity(node_capacity: usize, edge_capacity: usize) -> Self {
        Self {
            node_capacity,
            edge_capacity,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.node_capacity > MAX_CAPACITY_HINT {
            return Err(GraphStoreError::validation(format!(
                "node_capacity {} exceeds maximum {}",
                self.node_capacity, MAX_CAPACITY_HINT
            )));
        }
        if self.edge_capacity > MAX_CAPACITY_HINT {
            return Err(GraphStoreError::validation(format!(
                "edge_capacity {} exceeds maximum {}",
                self.edge_capacity, MAX_CAPACITY_HINT
            )));
        }
        Ok(())
    }
}
