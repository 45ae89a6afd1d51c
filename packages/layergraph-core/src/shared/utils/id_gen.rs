//! Edge id derivation for clone operations.
//!
//! Generates stable, deterministic ids using std hashing only.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::shared::models::EdgeId;

pub struct IdGenerator;

impl IdGenerator {
    /// Derive an edge id from its endpoints and type
    ///
    /// Format: 32 hex chars of hash(source + target + kind)
    pub fn derive_edge_id(source: &str, target: &str, kind: &str) -> EdgeId {
        let input = format!("{}:{}:{}", source, target, kind);
        EdgeId::new(Self::hash_to_hex(&input))
    }

    /// Derive an edge id that is not already in use.
    ///
    /// Appends a counter to the hash input until `in_use` rejects the
    /// candidate; cloning a node with parallel edges needs the counter.
    pub fn derive_unique_edge_id<F>(source: &str, target: &str, kind: &str, in_use: F) -> EdgeId
    where
        F: Fn(&EdgeId) -> bool,
    {
        let mut candidate = Self::derive_edge_id(source, target, kind);
        let mut counter = 0u64;
        while in_use(&candidate) {
            counter += 1;
            let input = format!("{}:{}:{}:{}", source, target, kind, counter);
            candidate = EdgeId::new(Self::hash_to_hex(&input));
        }
        candidate
    }

    /// Generate a hash as hex string (32 chars)
    fn hash_to_hex(input: &str) -> String {
        let mut hasher = DefaultHasher::new();
        input.hash(&mut hasher);
        let hash1 = hasher.finish();

        // Hash again for more bits
        let mut hasher2 = DefaultHasher::new();
        format!("{}:{}", input, hash1).hash(&mut hasher2);
        let hash2 = hasher2.finish();

        format!("{:016x}{:016x}", hash1, hash2)
    }
}
