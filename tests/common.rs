//! Common test utilities for building graphs and recording backend calls.
use kodo::prelude::*;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

pub const NODE_WIDTH: f64 = 100.0;
pub const NODE_HEIGHT: f64 = 40.0;

/// A graph node with the default test size.
#[allow(dead_code)]
pub fn node(id: &str, kind: NodeKind, x: f64, y: f64) -> GraphNode {
    GraphNode::new(id, kind, Point::new(x, y), Size::new(NODE_WIDTH, NODE_HEIGHT))
}

#[allow(dead_code)]
pub fn script_action(script: &str) -> NodeKind {
    NodeKind::ScriptAction {
        script: script.to_string(),
    }
}

#[allow(dead_code)]
pub fn script_condition(script: &str) -> NodeKind {
    NodeKind::ScriptCondition {
        script: script.to_string(),
    }
}

#[allow(dead_code)]
pub fn remote_action(service: &str) -> NodeKind {
    NodeKind::RemoteAction {
        service: service.to_string(),
    }
}

/// Creates a small, valid tree.
///
/// ```text
///            root
///             |
///            seq
///      /      |       \
///  is_ready  fb       move
///           /  \
///        grasp  wait
/// ```
#[allow(dead_code)]
pub fn create_simple_tree() -> Graph {
    let mut graph = Graph::new();
    graph
        .add_node(node("root", NodeKind::Root, 0.0, 0.0))
        .add_node(node("seq", NodeKind::Sequence, 0.0, 100.0))
        .add_node(node("is_ready", script_condition("is_ready.lua"), -200.0, 200.0))
        .add_node(node("fb", NodeKind::Fallback, 0.0, 200.0))
        .add_node(node("move", remote_action("base"), 200.0, 200.0))
        .add_node(node("grasp", remote_action("arm"), -50.0, 300.0))
        .add_node(node("wait", script_action("wait.lua"), 50.0, 300.0));
    graph
        .connect("root", "seq")
        .connect("seq", "move")
        .connect("seq", "is_ready")
        .connect("seq", "fb")
        .connect("fb", "wait")
        .connect("fb", "grasp");
    graph
}

/// Everything the recording backends saw, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ContextCreated,
    Script(String),
    ScriptHalted(String),
    Remote(String),
    RemoteHalted(String),
    ContextClosed,
}

pub type EventLog = Arc<Mutex<Vec<Event>>>;

/// A scripting runtime that records every call and answers from a fixed table.
/// Scripts missing from the table succeed.
#[derive(Default)]
pub struct RecordingRuntime {
    pub events: EventLog,
    pub outcomes: Arc<Mutex<HashMap<String, NodeStatus>>>,
    pub fail_create: bool,
}

#[allow(dead_code)]
impl RecordingRuntime {
    pub fn new(events: EventLog) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }

    pub fn with_outcome(self, script: &str, status: NodeStatus) -> Self {
        self.outcomes.lock().insert(script.to_string(), status);
        self
    }
}

impl ScriptRuntime for RecordingRuntime {
    fn create_context(&self) -> Result<Box<dyn ScriptContext>, ResourceError> {
        if self.fail_create {
            return Err(ResourceError::ContextCreation("interpreter unavailable".to_string()));
        }
        self.events.lock().push(Event::ContextCreated);
        Ok(Box::new(RecordingContext {
            events: self.events.clone(),
            outcomes: self.outcomes.clone(),
        }))
    }
}

pub struct RecordingContext {
    events: EventLog,
    outcomes: Arc<Mutex<HashMap<String, NodeStatus>>>,
}

impl ScriptContext for RecordingContext {
    fn execute(&mut self, script: &str, _role: LeafRole) -> NodeStatus {
        self.events.lock().push(Event::Script(script.to_string()));
        self.outcomes
            .lock()
            .get(script)
            .copied()
            .unwrap_or(NodeStatus::Success)
    }

    fn halt(&mut self, script: &str) {
        self.events.lock().push(Event::ScriptHalted(script.to_string()));
    }

    fn close(self: Box<Self>) -> Result<(), ResourceError> {
        self.events.lock().push(Event::ContextClosed);
        Ok(())
    }
}

/// A remote connector whose leaves record their ticks and answer from a table
/// keyed by service name. Services missing from the table succeed.
#[derive(Default)]
pub struct RecordingConnector {
    pub events: EventLog,
    pub outcomes: Arc<Mutex<HashMap<String, NodeStatus>>>,
    pub connected: Arc<Mutex<Vec<(String, LeafRole)>>>,
    pub refuse: Option<String>,
}

#[allow(dead_code)]
impl RecordingConnector {
    pub fn new(events: EventLog) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }

    pub fn with_outcome(self, service: &str, status: NodeStatus) -> Self {
        self.outcomes.lock().insert(service.to_string(), status);
        self
    }
}

impl RemoteConnector for RecordingConnector {
    fn connect(&self, service: &str, role: LeafRole) -> Result<Box<dyn RemoteLeaf>, ResourceError> {
        if self.refuse.as_deref() == Some(service) {
            return Err(ResourceError::RemoteConnection {
                service: service.to_string(),
                message: "no such port".to_string(),
            });
        }
        self.connected.lock().push((service.to_string(), role));
        Ok(Box::new(RecordingLeaf {
            service: service.to_string(),
            events: self.events.clone(),
            outcomes: self.outcomes.clone(),
        }))
    }
}

struct RecordingLeaf {
    service: String,
    events: EventLog,
    outcomes: Arc<Mutex<HashMap<String, NodeStatus>>>,
}

impl RemoteLeaf for RecordingLeaf {
    fn tick(&mut self) -> NodeStatus {
        self.events.lock().push(Event::Remote(self.service.clone()));
        self.outcomes
            .lock()
            .get(&self.service)
            .copied()
            .unwrap_or(NodeStatus::Success)
    }

    fn halt(&mut self) {
        self.events.lock().push(Event::RemoteHalted(self.service.clone()));
    }
}

/// A compiler backed by a fresh recording connector.
#[allow(dead_code)]
pub fn recording_compiler(events: &EventLog) -> TreeCompiler {
    TreeCompiler::builder(Arc::new(RecordingConnector::new(events.clone()))).build()
}
