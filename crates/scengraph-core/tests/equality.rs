//! Identity tests for graph nodes.
//!
//! Covers the equality/hash contract that lets repeated observations of one
//! execution point collapse in hashed collections:
//! - name is never part of identity for flow and step nodes
//! - step timestamps are never part of identity
//! - every other field is, and so is the node kind

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use proptest::prelude::*;

use scengraph_core::{
    create_flow_ended_node, create_root_node, create_scenario_finished_node,
    create_sub_flow_node, create_test_step_node, GraphNode,
};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

fn hash_of(node: &GraphNode) -> u64 {
    let mut hasher = DefaultHasher::new();
    node.hash(&mut hasher);
    hasher.finish()
}

/// Asserts that every node is distinct from every other.
fn assert_different_nodes(nodes: &[GraphNode]) {
    let set: HashSet<&GraphNode> = nodes.iter().collect();
    assert_eq!(set.len(), nodes.len(), "nodes collided: {nodes:#?}");
}

// ---------------------------------------------------------------------------
// Equality
// ---------------------------------------------------------------------------

#[test]
fn root_nodes_equal_by_value() {
    assert_eq!(create_root_node(0, 0), create_root_node(0, 0));
    assert_ne!(create_root_node(0, 0), create_root_node(1, 0));
    assert_ne!(create_root_node(0, 0), create_root_node(0, 1));
}

#[test]
fn sub_flow_nodes_equal_ignoring_name() {
    let a = create_sub_flow_node("ID", "foo", "DATA_RECORD", "V_USER", "META", "ERROR");
    let b = create_sub_flow_node("ID", "bar", "DATA_RECORD", "V_USER", "META", "ERROR");
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));
}

#[test]
fn test_step_nodes_equal_ignoring_name_and_timestamps() {
    let a = create_test_step_node("ID", "foo", 0, 0, "DATA_RECORD", "V_USER", "1", "SUCCESS", "ERROR");
    let b = create_test_step_node("ID", "bar", 0, 0, "DATA_RECORD", "V_USER", "1", "SUCCESS", "ERROR");
    let c = create_test_step_node("ID", "foo", 1_000, 2_500, "DATA_RECORD", "V_USER", "1", "SUCCESS", "ERROR");
    assert_eq!(a, b);
    assert_eq!(a, c);
    assert_eq!(hash_of(&a), hash_of(&c));
}

#[test]
fn flow_ended_nodes_equal_ignoring_name() {
    let a = create_flow_ended_node("ID", "foo", "DATA_RECORD", "V_USER", "META", "ERROR");
    let b = create_flow_ended_node("ID", "bar", "DATA_RECORD", "V_USER", "META", "ERROR");
    assert_eq!(a, b);
}

#[test]
fn scenario_finished_nodes_equal_by_value() {
    assert_eq!(
        create_scenario_finished_node(0, 0),
        create_scenario_finished_node(0, 0)
    );
    assert_ne!(
        create_scenario_finished_node(0, 0),
        create_scenario_finished_node(0, 5)
    );
}

// ---------------------------------------------------------------------------
// Inequality
// ---------------------------------------------------------------------------

#[test]
fn sub_flow_nodes_differ_by_each_key_field() {
    assert_different_nodes(&[
        create_sub_flow_node("ID", "NAME", "DATA_RECORD", "V_USER", "META", "ERROR"),
        create_sub_flow_node("foo", "NAME", "DATA_RECORD", "V_USER", "META", "ERROR"),
        create_sub_flow_node("ID", "NAME", "bar", "V_USER", "META", "ERROR"),
        create_sub_flow_node("ID", "NAME", "DATA_RECORD", "baz", "META", "ERROR"),
        create_sub_flow_node("ID", "NAME", "DATA_RECORD", "V_USER", "qux", "ERROR"),
        create_sub_flow_node("ID", "NAME", "DATA_RECORD", "V_USER", "META", "foobar"),
    ]);
}

#[test]
fn test_step_nodes_differ_by_each_key_field() {
    assert_different_nodes(&[
        create_test_step_node("ID", "NAME", 0, 0, "DATA_RECORD", "V_USER", "1", "SUCCESS", "ERROR"),
        create_test_step_node("foo", "NAME", 0, 0, "DATA_RECORD", "V_USER", "1", "SUCCESS", "ERROR"),
        create_test_step_node("ID", "NAME", 0, 0, "bar", "V_USER", "SUCCESS", "1", "ERROR"),
        create_test_step_node("ID", "NAME", 0, 0, "DATA_RECORD", "baz", "SUCCESS", "1", "ERROR"),
        create_test_step_node("ID", "NAME", 0, 0, "DATA_RECORD", "V_USER", "1", "SUCCESS", "qux"),
        create_test_step_node("ID", "NAME", 0, 0, "DATA_RECORD", "V_USER", "2", "SUCCESS", "ERROR"),
        create_test_step_node("ID", "NAME", 0, 0, "DATA_RECORD", "V_USER", "1", "SKIPPED", "ERROR"),
    ]);
}

#[test]
fn flow_ended_nodes_differ_by_each_key_field() {
    assert_different_nodes(&[
        create_flow_ended_node("ID", "NAME", "DATA_RECORD", "V_USER", "META", "ERROR"),
        create_flow_ended_node("foo", "NAME", "DATA_RECORD", "V_USER", "META", "ERROR"),
        create_flow_ended_node("ID", "NAME", "bar", "V_USER", "META", "ERROR"),
        create_flow_ended_node("ID", "NAME", "DATA_RECORD", "baz", "META", "ERROR"),
        create_flow_ended_node("ID", "NAME", "DATA_RECORD", "V_USER", "qux", "ERROR"),
        create_flow_ended_node("ID", "NAME", "DATA_RECORD", "V_USER", "META", "foobar"),
    ]);
}

#[test]
fn different_node_kinds_never_equal() {
    assert_different_nodes(&[
        create_root_node(0, 0),
        create_sub_flow_node("ID", "NAME", "DATA_RECORD", "V_USER", "META", "ERROR"),
        create_test_step_node("ID", "NAME", 0, 0, "DATA_RECORD", "V_USER", "1", "SUCCESS", "ERROR"),
        create_flow_ended_node("ID", "NAME", "DATA_RECORD", "V_USER", "META", "ERROR"),
        create_scenario_finished_node(0, 0),
    ]);
}

#[test]
fn duplicate_observations_collapse_in_a_set() {
    let set: HashSet<GraphNode> = (0..5)
        .map(|i| {
            create_test_step_node(
                "ID",
                format!("attempt {i}"),
                i * 100,
                i * 100 + 40,
                "DR",
                "1.1",
                "0",
                "SUCCESS",
                "",
            )
        })
        .collect();
    assert_eq!(set.len(), 1);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

fn field() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_ ]{0,8}"
}

proptest! {
    #[test]
    fn flow_identity_ignores_name(
        id in field(), n1 in field(), n2 in field(),
        dr in field(), vu in field(), meta in field(), err in field()
    ) {
        let a = create_sub_flow_node(&id, &n1, &dr, &vu, &meta, &err);
        let b = create_sub_flow_node(&id, &n2, &dr, &vu, &meta, &err);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(hash_of(&a), hash_of(&b));

        let c = create_flow_ended_node(&id, &n1, &dr, &vu, &meta, &err);
        let d = create_flow_ended_node(&id, &n2, &dr, &vu, &meta, &err);
        prop_assert_eq!(&c, &d);
        prop_assert_ne!(&a, &c);
    }

    #[test]
    fn step_identity_ignores_name_and_timing(
        id in field(), n1 in field(), n2 in field(),
        (t1, t2, t3, t4) in any::<(i64, i64, i64, i64)>(),
        dr in field(), vu in field(), idx in field(), st in field(), err in field()
    ) {
        let a = create_test_step_node(&id, &n1, t1, t2, &dr, &vu, &idx, &st, &err);
        let b = create_test_step_node(&id, &n2, t3, t4, &dr, &vu, &idx, &st, &err);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn step_identity_tracks_key_fields(
        base in field(), other in field(), which in 0usize..6
    ) {
        prop_assume!(base != other);
        let mut fields = vec![base.clone(); 6];
        let a = create_test_step_node(
            &fields[0], "n", 0, 0, &fields[1], &fields[2], &fields[3], &fields[4], &fields[5],
        );
        fields[which] = other;
        let b = create_test_step_node(
            &fields[0], "n", 0, 0, &fields[1], &fields[2], &fields[3], &fields[4], &fields[5],
        );
        prop_assert_ne!(a, b);
    }

    #[test]
    fn flow_identity_tracks_key_fields(
        base in field(), other in field(), which in 0usize..5
    ) {
        prop_assume!(base != other);
        let mut fields = vec![base.clone(); 5];
        let a = create_sub_flow_node(&fields[0], "n", &fields[1], &fields[2], &fields[3], &fields[4]);
        fields[which] = other;
        let b = create_sub_flow_node(&fields[0], "n", &fields[1], &fields[2], &fields[3], &fields[4]);
        prop_assert_ne!(a, b);
    }

    #[test]
    fn markers_equal_iff_both_fields_match(
        a in any::<i64>(), b in any::<i64>(), c in any::<i64>(), d in any::<i64>()
    ) {
        prop_assert_eq!(create_root_node(a, b) == create_root_node(c, d), a == c && b == d);
        prop_assert_eq!(
            create_scenario_finished_node(a, b) == create_scenario_finished_node(c, d),
            a == c && b == d
        );
        prop_assert_ne!(create_root_node(a, b), create_scenario_finished_node(a, b));
    }
}
