//! Core error types for scengraph-core.
//!
//! Node construction and comparison are total; these variants cover the
//! fallible edges of the crate: reading nodes from attribute maps and
//! inserting into a [`ScenarioExecutionGraph`](crate::graph::ScenarioExecutionGraph).

use crate::id::NodeId;
use thiserror::Error;

/// Core errors produced by the scengraph-core crate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Strict insertion of a node equal to one already in the graph.
    #[error("node already present in graph: {node}")]
    DuplicateNode { node: String },

    /// A node id was not issued by this graph.
    #[error("node not found: NodeId({id})", id = id.0)]
    NodeNotFound { id: NodeId },

    /// A vertex type name did not match any node kind.
    #[error("unknown vertex type: '{name}'")]
    UnknownVertexType { name: String },

    /// A timestamp attribute was present but not an integer.
    #[error("invalid timestamp in attribute '{attribute}': '{value}'")]
    InvalidTimestamp { attribute: String, value: String },
}
