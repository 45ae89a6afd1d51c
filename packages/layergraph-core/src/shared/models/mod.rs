//! Shared entity models

pub mod constraint;
pub mod edge;
pub mod ident;
pub mod node;

pub use constraint::{bound_max, bound_min, Arity, ArityConstraint};
pub use edge::Edge;
pub use ident::{intern, EdgeId, InternedString, Label, NodeId, TypeTag};
pub use node::Node;
