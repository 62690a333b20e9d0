//! Stable ID newtypes for execution graph entities.
//!
//! Both IDs wrap `u32` so that a `NodeId` cannot be passed where an `EdgeId`
//! is expected. They are only meaningful for the graph that issued them.

use std::fmt;

use petgraph::graph::{EdgeIndex, NodeIndex};
use serde::{Deserialize, Serialize};

/// Node identifier within a [`ScenarioExecutionGraph`](crate::graph::ScenarioExecutionGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Edge identifier within a [`ScenarioExecutionGraph`](crate::graph::ScenarioExecutionGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Bridges to petgraph's u32 indices.

impl From<NodeIndex<u32>> for NodeId {
    fn from(idx: NodeIndex<u32>) -> Self {
        NodeId(idx.index() as u32)
    }
}

impl From<NodeId> for NodeIndex<u32> {
    fn from(id: NodeId) -> Self {
        NodeIndex::new(id.0 as usize)
    }
}

impl From<EdgeIndex<u32>> for EdgeId {
    fn from(idx: EdgeIndex<u32>) -> Self {
        EdgeId(idx.index() as u32)
    }
}

impl From<EdgeId> for EdgeIndex<u32> {
    fn from(id: EdgeId) -> Self {
        EdgeIndex::new(id.0 as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_to_node_index_roundtrip() {
        let idx = NodeIndex::<u32>::new(42);
        let node_id = NodeId::from(idx);
        assert_eq!(node_id.0, 42);

        let back: NodeIndex<u32> = node_id.into();
        assert_eq!(back.index(), 42);
    }

    #[test]
    fn edge_id_to_edge_index_roundtrip() {
        let id = EdgeId::from(EdgeIndex::<u32>::new(5));
        assert_eq!(id, EdgeId(5));

        let back: EdgeIndex<u32> = id.into();
        assert_eq!(back.index(), 5);
    }

    #[test]
    fn ids_display_inner_value() {
        assert_eq!(format!("{}", NodeId(7)), "7");
        assert_eq!(format!("{}", EdgeId(99)), "99");
    }
}
