pub mod edge;
pub mod error;
pub mod factory;
pub mod graph;
pub mod id;
pub mod node;

// Re-export commonly used types
pub use edge::LabeledEdge;
pub use error::CoreError;
pub use factory::{
    create_flow_ended_node, create_graph_node, create_root_node, create_scenario_finished_node,
    create_sub_flow_node, create_test_step_node, error_name,
};
pub use graph::ScenarioExecutionGraph;
pub use id::{EdgeId, NodeId};
pub use node::{attributes, status, GraphNode, VertexType};
