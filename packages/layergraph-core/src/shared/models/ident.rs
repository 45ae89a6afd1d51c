//! Identifier types shared across the store.
//!
//! Node ids and edge ids live in separate id spaces; the `NodeId` / `EdgeId`
//! newtypes keep them distinct at the type level so a caller can never hand
//! an edge id to a node operation. All identifier text is interned.

use ahash::AHashMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Interned string for memory-efficient storage.
/// Same strings share the same Arc.
pub type InternedString = Arc<str>;

/// Helper to create interned strings
#[inline]
pub fn intern(s: impl AsRef<str>) -> InternedString {
    Arc::from(s.as_ref())
}

/// Type tag attached to nodes and edges (dynamic, caller-defined)
pub type TypeTag = InternedString;

/// Node label (dynamic, caller-defined)
pub type Label = InternedString;

// ============================================================
// Custom Serde for Arc<str>
// ============================================================

/// Serialize Arc<str> as a regular string
pub fn serialize_arc_str<S>(arc_str: &Arc<str>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(arc_str.as_ref())
}

/// Deserialize string into Arc<str>
pub fn deserialize_arc_str<'de, D>(deserializer: D) -> Result<Arc<str>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(Arc::from(s.as_str()))
}

/// Serde helpers for Vec<Arc<str>>
pub mod arc_str_vec {
    use super::*;

    pub fn serialize<S>(vec: &Vec<Arc<str>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let string_vec: Vec<&str> = vec.iter().map(|s| s.as_ref()).collect();
        string_vec.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Arc<str>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string_vec = Vec::<String>::deserialize(deserializer)?;
        Ok(string_vec
            .into_iter()
            .map(|s| Arc::from(s.as_str()))
            .collect())
    }
}

/// Serde helpers for AHashMap<Arc<str>, V>
pub mod arc_str_map {
    use super::*;
    use std::collections::HashMap;

    pub fn serialize<S, V>(map: &AHashMap<Arc<str>, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        V: Serialize,
    {
        let string_map: HashMap<&str, &V> = map.iter().map(|(k, v)| (k.as_ref(), v)).collect();
        string_map.serialize(serializer)
    }

    pub fn deserialize<'de, D, V>(deserializer: D) -> Result<AHashMap<Arc<str>, V>, D::Error>
    where
        D: Deserializer<'de>,
        V: Deserialize<'de>,
    {
        let string_map = HashMap::<String, V>::deserialize(deserializer)?;
        Ok(string_map
            .into_iter()
            .map(|(k, v)| (Arc::from(k.as_str()), v))
            .collect())
    }
}

// ============================================================
// Id newtypes
// ============================================================

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(InternedString);

        impl $name {
            #[inline]
            pub fn new(id: impl AsRef<str>) -> Self {
                Self(intern(id))
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        // Derived Hash/Eq delegate to the inner str, so str lookups are sound
        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serialize_arc_str(&self.0, serializer)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserialize_arc_str(deserializer).map(Self)
            }
        }
    };
}

id_type! {
    /// Identifier of a node in the store
    NodeId
}

id_type! {
    /// Identifier of an edge in the store
    EdgeId
}
