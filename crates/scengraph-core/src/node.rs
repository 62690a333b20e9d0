//! Node model for the scenario execution graph.
//!
//! A [`GraphNode`] is one observed point in a scenario's timeline. The set of
//! kinds is closed: the scenario start, a sub-flow entry, a test step, a flow
//! end and the scenario finish.
//!
//! Identity is deliberately narrower than the data a node carries. Display
//! labels and step timestamps vary between observations of the same logical
//! point, so they are left out of `PartialEq` and `Hash`. Both impls go
//! through the same [`NodeKey`] projection and therefore always agree.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Execution status values carried by test step nodes.
pub mod status {
    pub const SUCCESS: &str = "SUCCESS";
    pub const FAILED: &str = "FAILED";
    pub const SKIPPED: &str = "SKIPPED";
}

/// Attribute keys used when a node is described as a flat string map.
pub mod attributes {
    pub const VERTEX_TYPE: &str = "Vertex Type";
    pub const ID: &str = "Invocation ID";
    pub const NAME: &str = "Vertex Label";
    pub const V_USER: &str = "vUser";
    pub const DATA_RECORDS: &str = "Data Records";
    pub const META: &str = "Meta";
    pub const STATUS: &str = "Vertex Status";
    pub const EXCEPTION_NAME: &str = "Vertex Exception";
    pub const START_TIME: &str = "Start Time";
    pub const END_TIME: &str = "End Time";
    /// Correlation id of a scenario start or finish marker.
    pub const MARKER_ID: &str = "Marker ID";
}

const SCENARIO_STARTED: &str = "Scenario started";
const SCENARIO_FINISHED: &str = "Scenario finished";

// ---------------------------------------------------------------------------
// Vertex types
// ---------------------------------------------------------------------------

/// The variant tag of a [`GraphNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexType {
    Root,
    SubFlow,
    TestStep,
    FlowEnded,
    ScenarioFinished,
}

impl VertexType {
    /// All vertex types, in timeline order.
    pub const ALL: [VertexType; 5] = [
        VertexType::Root,
        VertexType::SubFlow,
        VertexType::TestStep,
        VertexType::FlowEnded,
        VertexType::ScenarioFinished,
    ];

    /// Stable external name, as written under [`attributes::VERTEX_TYPE`].
    pub fn name(self) -> &'static str {
        match self {
            VertexType::Root => "RootNode",
            VertexType::SubFlow => "SubFlowNode",
            VertexType::TestStep => "TestStepNode",
            VertexType::FlowEnded => "FlowEndedNode",
            VertexType::ScenarioFinished => "ScenarioFinishedNode",
        }
    }
}

impl fmt::Display for VertexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VertexType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VertexType::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| CoreError::UnknownVertexType {
                name: s.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Variant payloads
// ---------------------------------------------------------------------------

/// Scenario start marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootNode {
    pub(crate) start_timestamp: i64,
    pub(crate) root_id: i64,
}

/// Payload shared by sub-flow entry and flow-ended nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowNode {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) data_record: String,
    pub(crate) v_user: String,
    pub(crate) meta: String,
    pub(crate) error: String,
}

/// One execution of a test step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestStepNode {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) start_ts: i64,
    pub(crate) end_ts: i64,
    pub(crate) data_record: String,
    pub(crate) v_user: String,
    pub(crate) step_index: String,
    pub(crate) status: String,
    pub(crate) error: String,
}

/// Scenario completion marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioFinishedNode {
    pub(crate) end_timestamp: i64,
    pub(crate) finished_id: i64,
}

// ---------------------------------------------------------------------------
// GraphNode
// ---------------------------------------------------------------------------

/// A node in the scenario execution graph.
///
/// Build nodes through the [`factory`](crate::factory) functions. Nodes are
/// immutable; a later observation of the same point is a new node that
/// compares equal to the earlier one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GraphNode {
    Root(RootNode),
    SubFlow(FlowNode),
    TestStep(TestStepNode),
    FlowEnded(FlowNode),
    ScenarioFinished(ScenarioFinishedNode),
}

/// Borrowed identity of a node: the variant tag plus its key fields.
#[derive(PartialEq, Eq, Hash)]
enum NodeKey<'a> {
    Root {
        start_timestamp: i64,
        root_id: i64,
    },
    SubFlow(FlowKey<'a>),
    TestStep {
        id: &'a str,
        data_record: &'a str,
        v_user: &'a str,
        step_index: &'a str,
        status: &'a str,
        error: &'a str,
    },
    FlowEnded(FlowKey<'a>),
    ScenarioFinished {
        end_timestamp: i64,
        finished_id: i64,
    },
}

#[derive(PartialEq, Eq, Hash)]
struct FlowKey<'a> {
    id: &'a str,
    data_record: &'a str,
    v_user: &'a str,
    meta: &'a str,
    error: &'a str,
}

impl FlowNode {
    fn key(&self) -> FlowKey<'_> {
        FlowKey {
            id: &self.id,
            data_record: &self.data_record,
            v_user: &self.v_user,
            meta: &self.meta,
            error: &self.error,
        }
    }
}

impl GraphNode {
    fn key(&self) -> NodeKey<'_> {
        match self {
            GraphNode::Root(n) => NodeKey::Root {
                start_timestamp: n.start_timestamp,
                root_id: n.root_id,
            },
            GraphNode::SubFlow(n) => NodeKey::SubFlow(n.key()),
            GraphNode::TestStep(n) => NodeKey::TestStep {
                id: &n.id,
                data_record: &n.data_record,
                v_user: &n.v_user,
                step_index: &n.step_index,
                status: &n.status,
                error: &n.error,
            },
            GraphNode::FlowEnded(n) => NodeKey::FlowEnded(n.key()),
            GraphNode::ScenarioFinished(n) => NodeKey::ScenarioFinished {
                end_timestamp: n.end_timestamp,
                finished_id: n.finished_id,
            },
        }
    }

    /// Returns the variant tag.
    pub fn vertex_type(&self) -> VertexType {
        match self {
            GraphNode::Root(_) => VertexType::Root,
            GraphNode::SubFlow(_) => VertexType::SubFlow,
            GraphNode::TestStep(_) => VertexType::TestStep,
            GraphNode::FlowEnded(_) => VertexType::FlowEnded,
            GraphNode::ScenarioFinished(_) => VertexType::ScenarioFinished,
        }
    }

    /// Invocation id. Empty for the scenario markers.
    pub fn id(&self) -> &str {
        match self {
            GraphNode::SubFlow(n) | GraphNode::FlowEnded(n) => &n.id,
            GraphNode::TestStep(n) => &n.id,
            GraphNode::Root(_) | GraphNode::ScenarioFinished(_) => "",
        }
    }

    /// Display label.
    pub fn name(&self) -> &str {
        match self {
            GraphNode::Root(_) => SCENARIO_STARTED,
            GraphNode::SubFlow(n) | GraphNode::FlowEnded(n) => &n.name,
            GraphNode::TestStep(n) => &n.name,
            GraphNode::ScenarioFinished(_) => SCENARIO_FINISHED,
        }
    }

    pub fn data_record(&self) -> &str {
        match self {
            GraphNode::SubFlow(n) | GraphNode::FlowEnded(n) => &n.data_record,
            GraphNode::TestStep(n) => &n.data_record,
            GraphNode::Root(_) | GraphNode::ScenarioFinished(_) => "",
        }
    }

    pub fn v_user(&self) -> &str {
        match self {
            GraphNode::SubFlow(n) | GraphNode::FlowEnded(n) => &n.v_user,
            GraphNode::TestStep(n) => &n.v_user,
            GraphNode::Root(_) | GraphNode::ScenarioFinished(_) => "",
        }
    }

    /// Flow metadata. Empty for every other kind.
    pub fn meta(&self) -> &str {
        match self {
            GraphNode::SubFlow(n) | GraphNode::FlowEnded(n) => &n.meta,
            _ => "",
        }
    }

    /// Step position within its flow, for test step nodes only.
    pub fn step_index(&self) -> Option<&str> {
        match self {
            GraphNode::TestStep(n) => Some(&n.step_index),
            _ => None,
        }
    }

    /// Correlation id of a scenario marker (root or finished).
    pub fn marker_id(&self) -> Option<i64> {
        match self {
            GraphNode::Root(n) => Some(n.root_id),
            GraphNode::ScenarioFinished(n) => Some(n.finished_id),
            _ => None,
        }
    }

    /// Execution status. Only test steps carry their own; everything else
    /// reports [`status::SUCCESS`].
    pub fn status(&self) -> &str {
        match self {
            GraphNode::TestStep(n) => &n.status,
            _ => status::SUCCESS,
        }
    }

    /// Error marker. Empty when nothing failed.
    pub fn error(&self) -> &str {
        match self {
            GraphNode::SubFlow(n) | GraphNode::FlowEnded(n) => &n.error,
            GraphNode::TestStep(n) => &n.error,
            GraphNode::Root(_) | GraphNode::ScenarioFinished(_) => "",
        }
    }

    pub fn start_time(&self) -> i64 {
        match self {
            GraphNode::Root(n) => n.start_timestamp,
            GraphNode::TestStep(n) => n.start_ts,
            GraphNode::ScenarioFinished(n) => n.end_timestamp,
            GraphNode::SubFlow(_) | GraphNode::FlowEnded(_) => 0,
        }
    }

    pub fn end_time(&self) -> i64 {
        match self {
            GraphNode::Root(n) => n.start_timestamp,
            GraphNode::TestStep(n) => n.end_ts,
            GraphNode::ScenarioFinished(n) => n.end_timestamp,
            GraphNode::SubFlow(_) | GraphNode::FlowEnded(_) => 0,
        }
    }

    /// `end_time - start_time`, saturating.
    pub fn execution_time(&self) -> i64 {
        self.end_time().saturating_sub(self.start_time())
    }

    pub fn has_data_record(&self) -> bool {
        !self.data_record().is_empty()
    }

    pub fn is_failed(&self) -> bool {
        !self.error().is_empty()
    }

    pub fn is_skipped(&self) -> bool {
        self.status() == status::SKIPPED
    }

    /// Describes the node as a flat attribute map keyed by the
    /// [`attributes`] constants. Inverse of
    /// [`create_graph_node`](crate::factory::create_graph_node).
    ///
    /// Time slots always agree with [`start_time`](Self::start_time) and
    /// [`end_time`](Self::end_time); scenario markers put their correlation
    /// id under [`attributes::MARKER_ID`].
    pub fn attributes(&self) -> IndexMap<&'static str, String> {
        let mut attrs = IndexMap::new();
        attrs.insert(attributes::VERTEX_TYPE, self.vertex_type().name().to_string());
        match self {
            GraphNode::Root(n) => {
                attrs.insert(attributes::START_TIME, n.start_timestamp.to_string());
                attrs.insert(attributes::END_TIME, n.start_timestamp.to_string());
                attrs.insert(attributes::MARKER_ID, n.root_id.to_string());
            }
            GraphNode::ScenarioFinished(n) => {
                attrs.insert(attributes::START_TIME, n.end_timestamp.to_string());
                attrs.insert(attributes::END_TIME, n.end_timestamp.to_string());
                attrs.insert(attributes::MARKER_ID, n.finished_id.to_string());
            }
            GraphNode::SubFlow(n) | GraphNode::FlowEnded(n) => {
                attrs.insert(attributes::ID, n.id.clone());
                attrs.insert(attributes::NAME, n.name.clone());
                attrs.insert(attributes::DATA_RECORDS, n.data_record.clone());
                attrs.insert(attributes::V_USER, n.v_user.clone());
                attrs.insert(attributes::META, n.meta.clone());
                attrs.insert(attributes::EXCEPTION_NAME, n.error.clone());
            }
            GraphNode::TestStep(n) => {
                attrs.insert(attributes::ID, n.id.clone());
                attrs.insert(attributes::NAME, n.name.clone());
                attrs.insert(attributes::START_TIME, n.start_ts.to_string());
                attrs.insert(attributes::END_TIME, n.end_ts.to_string());
                attrs.insert(attributes::DATA_RECORDS, n.data_record.clone());
                attrs.insert(attributes::V_USER, n.v_user.clone());
                attrs.insert(attributes::META, n.step_index.clone());
                attrs.insert(attributes::STATUS, n.status.clone());
                attrs.insert(attributes::EXCEPTION_NAME, n.error.clone());
            }
        }
        attrs
    }
}

impl PartialEq for GraphNode {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for GraphNode {}

impl Hash for GraphNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphNode::Root(n) => write!(
                f,
                "RootNode[start_timestamp={}, root_id={}]",
                n.start_timestamp, n.root_id
            ),
            GraphNode::SubFlow(n) | GraphNode::FlowEnded(n) => write!(
                f,
                "{}[id={}, name={}, data_record={}, v_user={}, meta={}, error={}]",
                self.vertex_type(),
                n.id,
                n.name,
                n.data_record,
                n.v_user,
                n.meta,
                n.error
            ),
            GraphNode::TestStep(n) => write!(
                f,
                "TestStepNode[id={}, name={}, data_record={}, v_user={}, step_index={}, status={}, error={}]",
                n.id, n.name, n.data_record, n.v_user, n.step_index, n.status, n.error
            ),
            GraphNode::ScenarioFinished(n) => write!(
                f,
                "ScenarioFinishedNode[end_timestamp={}, finished_id={}]",
                n.end_timestamp, n.finished_id
            ),
        }
    }
}
