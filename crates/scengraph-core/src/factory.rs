//! Constructors for every [`GraphNode`] kind.
//!
//! The `create_*` functions are total: any field values are accepted,
//! including empty strings. Only [`create_graph_node`], which parses a string
//! attribute map, can fail.

use indexmap::IndexMap;

use crate::error::CoreError;
use crate::node::{
    attributes, FlowNode, GraphNode, RootNode, ScenarioFinishedNode, TestStepNode, VertexType,
};

/// Scenario start marker. Identity is `(start_timestamp, root_id)`.
pub fn create_root_node(start_timestamp: i64, root_id: i64) -> GraphNode {
    GraphNode::Root(RootNode {
        start_timestamp,
        root_id,
    })
}

/// Entry into a sub-flow invocation. `name` is a label only.
pub fn create_sub_flow_node(
    id: impl Into<String>,
    name: impl Into<String>,
    data_record: impl Into<String>,
    v_user: impl Into<String>,
    meta: impl Into<String>,
    error: impl Into<String>,
) -> GraphNode {
    GraphNode::SubFlow(flow_node(id, name, data_record, v_user, meta, error))
}

/// One test step execution. `name` and both timestamps are informational.
#[allow(clippy::too_many_arguments)]
pub fn create_test_step_node(
    id: impl Into<String>,
    name: impl Into<String>,
    start_ts: i64,
    end_ts: i64,
    data_record: impl Into<String>,
    v_user: impl Into<String>,
    step_index: impl Into<String>,
    status: impl Into<String>,
    error: impl Into<String>,
) -> GraphNode {
    GraphNode::TestStep(TestStepNode {
        id: id.into(),
        name: name.into(),
        start_ts,
        end_ts,
        data_record: data_record.into(),
        v_user: v_user.into(),
        step_index: step_index.into(),
        status: status.into(),
        error: error.into(),
    })
}

/// End of a flow invocation; pairs with the sub-flow node of the same `id`
/// but never compares equal to it.
pub fn create_flow_ended_node(
    id: impl Into<String>,
    name: impl Into<String>,
    data_record: impl Into<String>,
    v_user: impl Into<String>,
    meta: impl Into<String>,
    error: impl Into<String>,
) -> GraphNode {
    GraphNode::FlowEnded(flow_node(id, name, data_record, v_user, meta, error))
}

/// Scenario completion marker. Identity is `(end_timestamp, finished_id)`.
pub fn create_scenario_finished_node(end_timestamp: i64, finished_id: i64) -> GraphNode {
    GraphNode::ScenarioFinished(ScenarioFinishedNode {
        end_timestamp,
        finished_id,
    })
}

fn flow_node(
    id: impl Into<String>,
    name: impl Into<String>,
    data_record: impl Into<String>,
    v_user: impl Into<String>,
    meta: impl Into<String>,
    error: impl Into<String>,
) -> FlowNode {
    FlowNode {
        id: id.into(),
        name: name.into(),
        data_record: data_record.into(),
        v_user: v_user.into(),
        meta: meta.into(),
        error: error.into(),
    }
}

/// Error marker for a node built from an actual error value: the error's
/// type name.
///
/// Only concrete error types are accepted. A `dyn Error` has no runtime type
/// name, so every boxed error would share one marker; callers holding a
/// `Box<dyn Error>` should downcast first or pass their own marker string.
pub fn error_name<E: std::error::Error>(error: &E) -> String {
    std::any::type_name_of_val(error).to_string()
}

/// Builds a node from a flat attribute map keyed by the
/// [`attributes`] constants.
///
/// Accepts any iterable of string pairs, so both a `HashMap<String, String>`
/// and the map returned by [`GraphNode::attributes`] can be passed directly.
/// Missing keys read as empty strings and empty timestamps as `0`. For test
/// steps the step index is read from [`attributes::META`]. Scenario markers
/// read their correlation id from [`attributes::MARKER_ID`].
pub fn create_graph_node<I, K, V>(attrs: I) -> Result<GraphNode, CoreError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let attrs: IndexMap<String, String> = attrs
        .into_iter()
        .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
        .collect();
    let get = |key: &str| attrs.get(key).cloned().unwrap_or_default();

    let vertex_type: VertexType = get(attributes::VERTEX_TYPE).parse()?;
    let start_time = parse_number(&attrs, attributes::START_TIME)?;
    let end_time = parse_number(&attrs, attributes::END_TIME)?;

    let node = match vertex_type {
        VertexType::Root => {
            create_root_node(start_time, parse_number(&attrs, attributes::MARKER_ID)?)
        }
        VertexType::SubFlow => create_sub_flow_node(
            get(attributes::ID),
            get(attributes::NAME),
            get(attributes::DATA_RECORDS),
            get(attributes::V_USER),
            get(attributes::META),
            get(attributes::EXCEPTION_NAME),
        ),
        VertexType::TestStep => create_test_step_node(
            get(attributes::ID),
            get(attributes::NAME),
            start_time,
            end_time,
            get(attributes::DATA_RECORDS),
            get(attributes::V_USER),
            get(attributes::META),
            get(attributes::STATUS),
            get(attributes::EXCEPTION_NAME),
        ),
        VertexType::FlowEnded => create_flow_ended_node(
            get(attributes::ID),
            get(attributes::NAME),
            get(attributes::DATA_RECORDS),
            get(attributes::V_USER),
            get(attributes::META),
            get(attributes::EXCEPTION_NAME),
        ),
        VertexType::ScenarioFinished => {
            create_scenario_finished_node(end_time, parse_number(&attrs, attributes::MARKER_ID)?)
        }
    };
    Ok(node)
}

fn parse_number(attrs: &IndexMap<String, String>, key: &str) -> Result<i64, CoreError> {
    match attrs.get(key).map(|v| v.trim()) {
        None | Some("") => Ok(0),
        Some(value) => value.parse().map_err(|_| CoreError::InvalidTimestamp {
            attribute: key.to_string(),
            value: value.to_string(),
        }),
    }
}
