//! Set algebra over ordered sequences of identifiers.
//!
//! All functions are pure and treat an empty slice as the empty set. Output
//! order is first-seen order over the inputs, so results are deterministic
//! for a given input order. Duplicates in the inputs are collapsed.

use ahash::AHashSet;
use std::hash::Hash;

/// Elements of `a` or `b`, duplicates collapsed
pub fn union<T>(a: &[T], b: &[T]) -> Vec<T>
where
    T: Clone + Eq + Hash,
{
    let mut seen = AHashSet::with_capacity(a.len() + b.len());
    let mut out = Vec::with_capacity(a.len() + b.len());
    for item in a.iter().chain(b.iter()) {
        if seen.insert(item.clone()) {
            out.push(item.clone());
        }
    }
    out
}

/// N-ary union; `multi_union(&[])` is the empty set
pub fn multi_union<T>(sets: &[&[T]]) -> Vec<T>
where
    T: Clone + Eq + Hash,
{
    let mut seen = AHashSet::new();
    let mut out = Vec::new();
    for set in sets {
        for item in *set {
            if seen.insert(item.clone()) {
                out.push(item.clone());
            }
        }
    }
    out
}

/// Elements present in both `a` and `b`, in `a`'s order
pub fn intersection<T>(a: &[T], b: &[T]) -> Vec<T>
where
    T: Clone + Eq + Hash,
{
    let members: AHashSet<&T> = b.iter().collect();
    let mut seen = AHashSet::new();
    a.iter()
        .filter(|item| members.contains(item) && seen.insert((*item).clone()))
        .cloned()
        .collect()
}

/// N-ary intersection; `multi_intersection(&[])` is the empty set
/// (there is no universal set to default to)
pub fn multi_intersection<T>(sets: &[&[T]]) -> Vec<T>
where
    T: Clone + Eq + Hash,
{
    let Some((first, rest)) = sets.split_first() else {
        return Vec::new();
    };
    let mut out: Vec<T> = {
        let mut seen = AHashSet::new();
        first
            .iter()
            .filter(|item| seen.insert((*item).clone()))
            .cloned()
            .collect()
    };
    for set in rest {
        let members: AHashSet<&T> = set.iter().collect();
        out.retain(|item| members.contains(item));
    }
    out
}

/// Elements of `a` not in `b`
pub fn difference<T>(a: &[T], b: &[T]) -> Vec<T>
where
    T: Clone + Eq + Hash,
{
    let excluded: AHashSet<&T> = b.iter().collect();
    let mut seen = AHashSet::new();
    a.iter()
        .filter(|item| !excluded.contains(item) && seen.insert((*item).clone()))
        .cloned()
        .collect()
}

/// Emptiness check
#[inline]
pub fn is_empty<T>(set: &[T]) -> bool {
    set.is_empty()
}
