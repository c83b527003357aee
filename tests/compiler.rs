//! Tests for compiling graphs into executable trees.
mod common;
use common::*;
use kodo::prelude::*;
use kodo::tree::LeafBackend;
use std::sync::Arc;

#[test]
fn test_compiler_builds_simple_tree() {
    let events = EventLog::default();
    let mut graph = create_simple_tree();

    let tree = recording_compiler(&events)
        .compile(&mut graph)
        .expect("Failed to compile");

    assert_eq!(tree.len(), 7);
    let TreeNode::Root(_) = tree.root() else {
        panic!("Expected a Root at the top");
    };
    let seq = &tree.root().children()[0];
    assert_eq!(seq.label(), "Sequence");

    // Children follow horizontal order, not connection order.
    let labels: Vec<&str> = seq.children().iter().map(|c| c.label()).collect();
    assert_eq!(labels, vec!["Condition", "Fallback", "Action"]);

    let fallback = &seq.children()[1];
    let names: Vec<&str> = fallback
        .children()
        .iter()
        .map(|c| match c {
            TreeNode::Action(leaf) | TreeNode::Condition(leaf) => leaf.name(),
            _ => panic!("Expected leaves under the fallback"),
        })
        .collect();
    assert_eq!(names, vec!["armBTAction", "wait.lua"]);
}

#[test]
fn test_remote_leaves_use_role_suffix() {
    let events = EventLog::default();
    let connector = Arc::new(RecordingConnector::new(events.clone()));
    let compiler = TreeCompiler::builder(connector.clone()).build();

    let mut graph = Graph::new();
    graph
        .add_node(node("root", NodeKind::Root, 0.0, 0.0))
        .add_node(node("seq", NodeKind::Sequence, 0.0, 100.0))
        .add_node(node(
            "cond",
            NodeKind::RemoteCondition {
                service: "battery".to_string(),
            },
            -100.0,
            200.0,
        ))
        .add_node(node("act", remote_action("gripper"), 100.0, 200.0));
    graph
        .connect("root", "seq")
        .connect("seq", "cond")
        .connect("seq", "act");

    let tree = compiler.compile(&mut graph).expect("Failed to compile");
    let leaves = tree.root().children()[0].children();

    match &leaves[0] {
        TreeNode::Condition(leaf) => {
            assert_eq!(leaf.name(), "batteryBTCondition");
            assert!(matches!(leaf.backend(), LeafBackend::Remote(_)));
        }
        other => panic!("Expected a condition, got {}", other.label()),
    }
    match &leaves[1] {
        TreeNode::Action(leaf) => assert_eq!(leaf.name(), "gripperBTAction"),
        other => panic!("Expected an action, got {}", other.label()),
    }
    assert_eq!(
        *connector.connected.lock(),
        vec![
            ("battery".to_string(), LeafRole::Condition),
            ("gripper".to_string(), LeafRole::Action),
        ]
    );
}

#[test]
fn test_empty_sequence_ticks_success() {
    let events = EventLog::default();
    let mut graph = Graph::new();
    graph.add_node(node("seq", NodeKind::Sequence, 0.0, 0.0));

    let mut tree = recording_compiler(&events)
        .compile_from(&mut graph, &NodeId::from("seq"))
        .expect("Failed to compile");
    let mut context = RecordingRuntime::new(events.clone())
        .create_context()
        .unwrap();

    assert_eq!(tree.tick(&mut *context), NodeStatus::Success);
}

#[test]
fn test_empty_fallback_ticks_failure() {
    let events = EventLog::default();
    let mut graph = Graph::new();
    graph.add_node(node("fb", NodeKind::Fallback, 0.0, 0.0));

    let mut tree = recording_compiler(&events)
        .compile_from(&mut graph, &NodeId::from("fb"))
        .expect("Failed to compile");
    let mut context = RecordingRuntime::new(events.clone())
        .create_context()
        .unwrap();

    assert_eq!(tree.tick(&mut *context), NodeStatus::Failure);
}

#[test]
fn test_root_without_children_fails_with_empty_tree() {
    let events = EventLog::default();
    let mut graph = Graph::new();
    graph.add_node(node("root", NodeKind::Root, 0.0, 0.0));

    let result = recording_compiler(&events).compile(&mut graph);

    match result {
        Err(CompileError::EmptyTree { root_id }) => assert_eq!(root_id, NodeId::from("root")),
        other => panic!("Expected EmptyTree, got {:?}", other.map(|t| t.len())),
    }
    assert!(graph.nodes.iter().all(|n| n.linked.is_none()));
}

#[test]
fn test_root_with_several_children_compiles_leftmost() {
    let events = EventLog::default();
    let mut graph = Graph::new();
    graph
        .add_node(node("root", NodeKind::Root, 0.0, 0.0))
        .add_node(node("right", script_action("right.lua"), 100.0, 100.0))
        .add_node(node("left", script_action("left.lua"), -100.0, 100.0));
    graph.connect("root", "right").connect("root", "left");

    let tree = recording_compiler(&events)
        .compile(&mut graph)
        .expect("Failed to compile");

    assert_eq!(tree.len(), 2);
    match &tree.root().children()[0] {
        TreeNode::Action(leaf) => assert_eq!(leaf.name(), "left.lua"),
        other => panic!("Expected an action, got {}", other.label()),
    }
    assert!(graph.node(&NodeId::from("right")).unwrap().linked.is_none());
}

#[test]
fn test_compiler_fails_on_unsupported_kind() {
    let events = EventLog::default();
    let mut graph = create_simple_tree();
    graph.node_mut(&NodeId::from("wait")).unwrap().kind = NodeKind::Unsupported {
        type_name: "Parallel".to_string(),
    };

    let result = recording_compiler(&events).compile(&mut graph);

    match result {
        Err(CompileError::UnsupportedNodeKind { node_id, type_name }) => {
            assert_eq!(node_id, NodeId::from("wait"));
            assert_eq!(type_name, "Parallel");
        }
        _ => panic!("Expected UnsupportedNodeKind error"),
    }
    // Nothing is linked when compilation fails part way through.
    assert!(graph.nodes.iter().all(|n| n.linked.is_none()));
}

#[test]
fn test_compiler_requires_canonical_root() {
    let events = EventLog::default();
    let mut graph = create_simple_tree();
    graph.node_mut(&NodeId::from("root")).unwrap().kind = NodeKind::Sequence;

    let result = recording_compiler(&events).compile(&mut graph);
    assert!(matches!(
        result,
        Err(CompileError::Structural(StructuralError::NoValidRoot))
    ));
}

#[test]
fn test_compiler_detects_cycle() {
    let events = EventLog::default();
    let mut graph = Graph::new();
    graph
        .add_node(node("root", NodeKind::Root, 0.0, 0.0))
        .add_node(node("a", NodeKind::Sequence, 0.0, 100.0))
        .add_node(node("b", NodeKind::Sequence, 0.0, 200.0));
    graph
        .connect("root", "a")
        .connect("a", "b")
        .connect("b", "a");

    let result = recording_compiler(&events).compile(&mut graph);
    assert!(matches!(
        result,
        Err(CompileError::Structural(StructuralError::Cycle { node_id })) if node_id == NodeId::from("a")
    ));
}

#[test]
fn test_compiler_rejects_shared_child() {
    let events = EventLog::default();
    let mut graph = Graph::new();
    graph
        .add_node(node("root", NodeKind::Root, 0.0, 0.0))
        .add_node(node("seq", NodeKind::Sequence, 0.0, 100.0))
        .add_node(node("left", NodeKind::Fallback, -100.0, 200.0))
        .add_node(node("right", NodeKind::Fallback, 100.0, 200.0))
        .add_node(node("shared", script_action("s.lua"), 0.0, 300.0));
    graph
        .connect("root", "seq")
        .connect("seq", "left")
        .connect("seq", "right")
        .connect("left", "shared")
        .connect("right", "shared");

    let result = recording_compiler(&events).compile(&mut graph);
    assert!(matches!(
        result,
        Err(CompileError::Structural(StructuralError::MultipleParents { node_id })) if node_id == NodeId::from("shared")
    ));
}

#[test]
fn test_connector_failure_aborts_compilation() {
    let events = EventLog::default();
    let connector = RecordingConnector {
        refuse: Some("arm".to_string()),
        ..RecordingConnector::new(events.clone())
    };
    let compiler = TreeCompiler::builder(Arc::new(connector)).build();
    let mut graph = create_simple_tree();

    let result = compiler.compile(&mut graph);
    assert!(matches!(
        result,
        Err(CompileError::Resource(ResourceError::RemoteConnection { ref service, .. })) if service == "arm"
    ));
}

#[test]
fn test_every_node_but_fallback_is_linked() {
    let events = EventLog::default();
    let mut graph = create_simple_tree();

    let tree = recording_compiler(&events)
        .compile(&mut graph)
        .expect("Failed to compile");

    for graph_node in &graph.nodes {
        let handle = graph_node.linked;
        if graph_node.kind == NodeKind::Fallback {
            assert!(handle.is_none(), "fallback '{}' should stay unlinked", graph_node.id);
        } else {
            let handle = handle.unwrap_or_else(|| panic!("'{}' should be linked", graph_node.id));
            assert_eq!(handle.generation, tree.generation());
            assert_eq!(tree.origin(handle.slot), Some(&graph_node.id));
            assert_eq!(tree.status(handle), Some(NodeStatus::Idle));
        }
    }
}

#[test]
fn test_handles_from_previous_compilation_are_stale() {
    let events = EventLog::default();
    let compiler = recording_compiler(&events);
    let mut graph = create_simple_tree();

    let first = compiler.compile(&mut graph).expect("Failed to compile");
    let old_handle = graph.node(&NodeId::from("seq")).unwrap().linked.unwrap();
    assert!(first.status(old_handle).is_some());
    drop(first);

    let second = compiler.compile(&mut graph).expect("Failed to compile");
    assert_ne!(second.generation(), old_handle.generation);
    assert_eq!(second.status(old_handle), None);

    let new_handle = graph.node(&NodeId::from("seq")).unwrap().linked.unwrap();
    assert_eq!(second.status(new_handle), Some(NodeStatus::Idle));
}

#[test]
fn test_compiler_without_link_back_leaves_graph_untouched() {
    let events = EventLog::default();
    let compiler = TreeCompiler::builder(Arc::new(RecordingConnector::new(events.clone())))
        .with_link_back(false)
        .build();
    let mut graph = create_simple_tree();

    compiler.compile(&mut graph).expect("Failed to compile");
    assert!(graph.nodes.iter().all(|n| n.linked.is_none()));
}

#[test]
fn test_duplicate_connection_compiles_child_once() {
    let events = EventLog::default();
    let mut graph = create_simple_tree();
    graph.connect("fb", "grasp");

    let tree = recording_compiler(&events)
        .compile(&mut graph)
        .expect("Failed to compile");

    assert_eq!(tree.len(), 7);
    let fallback = &tree.root().children()[0].children()[1];
    assert_eq!(fallback.children().len(), 2);
}
