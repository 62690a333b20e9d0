//! ScenarioExecutionGraph: the directed graph of observed execution points.
//!
//! Nodes are unique under [`GraphNode`] equality. The graph keeps a lookup
//! from node identity to petgraph index next to the `StableGraph`, so
//! repeated observations of the same logical point resolve to one vertex.
//!
//! The graph is append-only: nodes and edges are never removed or modified
//! once added.

use indexmap::IndexMap;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableGraph;
use petgraph::{Directed, Direction};

use crate::edge::LabeledEdge;
use crate::error::CoreError;
use crate::id::{EdgeId, NodeId};
use crate::node::{GraphNode, VertexType};

/// Execution graph of a single scenario run.
#[derive(Debug, Clone, Default)]
pub struct ScenarioExecutionGraph {
    graph: StableGraph<GraphNode, LabeledEdge, Directed, u32>,
    /// Node identity -> vertex, in insertion order.
    index: IndexMap<GraphNode, NodeIndex<u32>>,
}

impl ScenarioExecutionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only access to the underlying petgraph graph, for traversals.
    pub fn graph(&self) -> &StableGraph<GraphNode, LabeledEdge, Directed, u32> {
        &self.graph
    }

    // -----------------------------------------------------------------------
    // Nodes
    // -----------------------------------------------------------------------

    /// Adds a node that must not already be present.
    ///
    /// Returns [`CoreError::DuplicateNode`] when an equal node exists, which
    /// for a well-formed trace means two distinct execution points were
    /// given the same identity.
    pub fn add_node(&mut self, node: GraphNode) -> Result<NodeId, CoreError> {
        if self.index.contains_key(&node) {
            tracing::warn!(%node, "rejected duplicate node");
            return Err(CoreError::DuplicateNode {
                node: node.to_string(),
            });
        }
        Ok(self.insert(node))
    }

    /// Records an observation, merging it with an equal node if one exists.
    ///
    /// The first observation wins: fields outside the identity key (labels,
    /// timestamps) keep the values of the node that was inserted first.
    pub fn observe(&mut self, node: GraphNode) -> NodeId {
        if let Some(&idx) = self.index.get(&node) {
            tracing::trace!(%node, id = idx.index(), "merged repeated observation");
            return NodeId::from(idx);
        }
        self.insert(node)
    }

    fn insert(&mut self, node: GraphNode) -> NodeId {
        let idx = self.graph.add_node(node.clone());
        tracing::debug!(%node, id = idx.index(), "node added");
        self.index.insert(node, idx);
        NodeId::from(idx)
    }

    /// Looks up the vertex holding a node equal to `node`.
    pub fn find(&self, node: &GraphNode) -> Option<NodeId> {
        self.index.get(node).copied().map(NodeId::from)
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.graph.node_weight(id.into())
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &GraphNode)> + '_ {
        self.index
            .values()
            .map(|&idx| (NodeId::from(idx), &self.graph[idx]))
    }

    /// The first scenario start marker, if any.
    pub fn root(&self) -> Option<NodeId> {
        self.first_of(VertexType::Root)
    }

    /// The first scenario completion marker, if any.
    pub fn finished(&self) -> Option<NodeId> {
        self.first_of(VertexType::ScenarioFinished)
    }

    fn first_of(&self, vertex_type: VertexType) -> Option<NodeId> {
        self.nodes()
            .find(|(_, n)| n.vertex_type() == vertex_type)
            .map(|(id, _)| id)
    }

    // -----------------------------------------------------------------------
    // Edges
    // -----------------------------------------------------------------------

    /// Adds an unlabeled edge. See [`add_labeled_edge`](Self::add_labeled_edge).
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> Result<EdgeId, CoreError> {
        self.add_labeled_edge(from, to, LabeledEdge::unlabeled())
    }

    /// Adds an edge `from -> to`.
    ///
    /// At most one edge connects an ordered pair; if one already exists its
    /// id is returned and `edge` is dropped.
    pub fn add_labeled_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        edge: LabeledEdge,
    ) -> Result<EdgeId, CoreError> {
        let from_idx = self.require(from)?;
        let to_idx = self.require(to)?;

        if let Some(existing) = self.graph.find_edge(from_idx, to_idx) {
            return Ok(EdgeId::from(existing));
        }

        tracing::debug!(%from, %to, label = edge.label(), "edge added");
        let idx = self.graph.add_edge(from_idx, to_idx, edge);
        Ok(EdgeId::from(idx))
    }

    /// Adds the edge leading into a step executed by `v_user`.
    ///
    /// The edge is labeled with the vUser when execution enters that user's
    /// timeline: the source is the scenario root, the end of a flow, or a
    /// node belonging to another vUser.
    pub fn add_step_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        v_user: &str,
    ) -> Result<EdgeId, CoreError> {
        let source = self
            .node(from)
            .ok_or(CoreError::NodeNotFound { id: from })?;
        let edge = if starts_v_user_timeline(source, v_user) {
            LabeledEdge::for_v_user(v_user)
        } else {
            LabeledEdge::unlabeled()
        };
        self.add_labeled_edge(from, to, edge)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&LabeledEdge> {
        self.graph.edge_weight(id.into())
    }

    /// Direct successors of `id`, ordered by node id.
    pub fn successors(&self, id: NodeId) -> Vec<NodeId> {
        self.neighbors(id, Direction::Outgoing)
    }

    /// Direct predecessors of `id`, ordered by node id.
    pub fn predecessors(&self, id: NodeId) -> Vec<NodeId> {
        self.neighbors(id, Direction::Incoming)
    }

    fn neighbors(&self, id: NodeId, dir: Direction) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .graph
            .neighbors_directed(id.into(), dir)
            .map(NodeId::from)
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn require(&self, id: NodeId) -> Result<NodeIndex<u32>, CoreError> {
        let idx: NodeIndex<u32> = id.into();
        if self.graph.contains_node(idx) {
            Ok(idx)
        } else {
            Err(CoreError::NodeNotFound { id })
        }
    }
}

fn starts_v_user_timeline(source: &GraphNode, v_user: &str) -> bool {
    matches!(
        source.vertex_type(),
        VertexType::Root | VertexType::FlowEnded
    ) || source.v_user() != v_user
}
