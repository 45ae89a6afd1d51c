//! Error types for layergraph-core
//!
//! Provides unified error handling across the crate. All failures are
//! synchronous and raised before any index is mutated, so a rejected call
//! never leaves the store partially updated.

use thiserror::Error;

/// Main error type for graph store operations
#[derive(Debug, Error)]
pub enum GraphStoreError {
    /// Missing or empty id/type argument
    #[error("validation error: {0}")]
    Validation(String),

    /// Operation referenced an id that does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Merge attempted on nodes of different types
    #[error("type mismatch: cannot merge '{left}' with '{right}'")]
    TypeMismatch { left: String, right: String },

    /// Id already present (duplicate insert, or delta merge collision)
    #[error("conflict: {0}")]
    Conflict(String),
}

impl GraphStoreError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        GraphStoreError::Validation(msg.into())
    }

    /// Create a node-not-found error
    pub fn node_not_found(id: impl Into<String>) -> Self {
        GraphStoreError::NotFound {
            entity: "node",
            id: id.into(),
        }
    }

    /// Create an edge-not-found error
    pub fn edge_not_found(id: impl Into<String>) -> Self {
        GraphStoreError::NotFound {
            entity: "edge",
            id: id.into(),
        }
    }

    /// Create a type-mismatch error
    pub fn type_mismatch(left: impl Into<String>, right: impl Into<String>) -> Self {
        GraphStoreError::TypeMismatch {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        GraphStoreError::Conflict(msg.into())
    }
}

/// Result type alias for graph store operations
pub type Result<T> = std::result::Result<T, GraphStoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GraphStoreError::node_not_found("n42");
        let msg = format!("{}", err);
        assert!(msg.contains("node"));
        assert!(msg.contains("n42"));

        let err = GraphStoreError::type_mismatch("Agent", "Task");
        let msg = format!("{}", err);
        assert!(msg.contains("Agent"));
        assert!(msg.contains("Task"));
    }
}
