//! Function dependency graph and its topology.
pub mod graph;
pub mod topology;

pub use graph::{FunctionGraph, NodeId, NodeMetadata};
