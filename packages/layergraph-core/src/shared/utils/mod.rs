//! Shared utilities

pub mod id_gen;
pub mod set_ops;

pub use id_gen::IdGenerator;
