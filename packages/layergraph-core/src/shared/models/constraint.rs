//! Arity constraints and their sentinel algebra.
//!
//! A node bounds how many edges of a given neighboring type it may carry on
//! each side. A bound value is either a finite count or the "unbounded"
//! sentinel; a missing bound (`None`) means "no constraint" and absorbs in
//! both `bound_min` and `bound_max`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// One endpoint of an arity interval.
///
/// `Unbounded` is absorbing for `bound_max` and dominated in `bound_min`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Arity {
    Finite(u64),
    Unbounded,
}

impl PartialOrd for Arity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Arity {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Arity::Finite(a), Arity::Finite(b)) => a.cmp(b),
            (Arity::Finite(_), Arity::Unbounded) => Ordering::Less,
            (Arity::Unbounded, Arity::Finite(_)) => Ordering::Greater,
            (Arity::Unbounded, Arity::Unbounded) => Ordering::Equal,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Finite(n) => write!(f, "{}", n),
            Arity::Unbounded => write!(f, "*"),
        }
    }
}

/// Sentinel-aware minimum: "no constraint" absorbs, `Unbounded` is dominated
#[inline]
pub fn bound_min(a: Option<Arity>, b: Option<Arity>) -> Option<Arity> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        _ => None,
    }
}

/// Sentinel-aware maximum: "no constraint" absorbs, `Unbounded` absorbs
#[inline]
pub fn bound_max(a: Option<Arity>, b: Option<Arity>) -> Option<Arity> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        _ => None,
    }
}

/// `{min, max}` arity bound for one neighboring type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArityConstraint {
    pub min: Option<Arity>,
    pub max: Option<Arity>,
}

impl ArityConstraint {
    pub fn new(min: Option<Arity>, max: Option<Arity>) -> Self {
        Self { min, max }
    }

    /// Constraint with both bounds unset
    pub fn unconstrained() -> Self {
        Self::default()
    }

    pub fn is_unconstrained(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Widest interval covering both constraints.
    ///
    /// Used when two nodes merge: the merged node carries the union of both
    /// edge sets, so the combined bound must admit everything either side
    /// admitted.
    pub fn widen(&self, other: &ArityConstraint) -> ArityConstraint {
        ArityConstraint {
            min: bound_min(self.min, other.min),
            max: bound_max(self.max, other.max),
        }
    }
}
