use super::geometry::{Point, SceneRect, Size};
use crate::tree::CompiledHandle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a graph node. Ordering is used as the tie-break for
/// nodes sharing a coordinate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The behavior-tree role of a graph node, together with its kind-specific data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Action implemented by a script, identified by script name.
    ScriptAction { script: String },
    /// Condition implemented by a script, identified by script name.
    ScriptCondition { script: String },
    /// Action served by a remote service.
    RemoteAction { service: String },
    /// Condition served by a remote service.
    RemoteCondition { service: String },
    Sequence,
    Fallback,
    /// The canonical root. A runnable graph has exactly one.
    Root,
    /// A kind the editor knows about but the compiler has no rule for.
    Unsupported { type_name: String },
}

impl NodeKind {
    /// Maps an editor type name (and the node's identifying string, for leaves)
    /// onto a kind. Unknown names, and leaves without identifying data, become
    /// `Unsupported` so the compiler can report them.
    pub fn from_type_name(type_name: &str, data: Option<&str>) -> Self {
        let data = data.map(str::trim).filter(|d| !d.is_empty());
        match (type_name.to_ascii_lowercase().as_str(), data) {
            ("luaaction" | "scriptaction", Some(script)) => Self::ScriptAction {
                script: script.to_string(),
            },
            ("luacondition" | "scriptcondition", Some(script)) => Self::ScriptCondition {
                script: script.to_string(),
            },
            ("yarpaction" | "remoteaction", Some(service)) => Self::RemoteAction {
                service: service.to_string(),
            },
            ("yarpcondition" | "remotecondition", Some(service)) => Self::RemoteCondition {
                service: service.to_string(),
            },
            ("sequence", _) => Self::Sequence,
            ("fallback" | "selector", _) => Self::Fallback,
            ("root", _) => Self::Root,
            _ => Self::Unsupported {
                type_name: type_name.to_string(),
            },
        }
    }

    /// Canonical type name, as reported in errors and diagnostics.
    pub fn type_name(&self) -> &str {
        match self {
            Self::ScriptAction { .. } => "ScriptAction",
            Self::ScriptCondition { .. } => "ScriptCondition",
            Self::RemoteAction { .. } => "RemoteAction",
            Self::RemoteCondition { .. } => "RemoteCondition",
            Self::Sequence => "Sequence",
            Self::Fallback => "Fallback",
            Self::Root => "Root",
            Self::Unsupported { type_name } => type_name,
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, Self::Root)
    }
}

/// A single node placed on the editor canvas.
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub position: Point,
    pub size: Size,
    /// Non-owning link to the compiled node built from this graph node, used by
    /// the editor to highlight statuses while a tree runs.
    pub linked: Option<CompiledHandle>,
}

impl GraphNode {
    pub fn new(id: impl Into<NodeId>, kind: NodeKind, position: Point, size: Size) -> Self {
        Self {
            id: id.into(),
            kind,
            position,
            size,
            linked: None,
        }
    }

    /// Right edge of the node's box.
    pub fn right(&self) -> f64 {
        self.position.x + self.size.width
    }

    /// Bottom edge of the node's box.
    pub fn bottom(&self) -> f64 {
        self.position.y + self.size.height
    }
}

/// The two ends of a connection. A parent's "out" port feeds a child's "in" port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortType {
    In,
    Out,
}

/// A directed edge from a parent node to a child node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub source: NodeId,
    pub target: NodeId,
}

impl Connection {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// The node attached to the given port of this connection.
    pub fn node(&self, port: PortType) -> &NodeId {
        match port {
            PortType::Out => &self.source,
            PortType::In => &self.target,
        }
    }
}

/// The editor graph: nodes, the connections between them and the canvas bounds.
///
/// This is the canonical structure the topology extractor, compiler and layout
/// engine operate on. Editor-specific formats convert into it through
/// [`IntoGraph`](super::IntoGraph).
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub connections: Vec<Connection>,
    pub scene_rect: SceneRect,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: GraphNode) -> &mut Self {
        self.nodes.push(node);
        self
    }

    pub fn connect(&mut self, source: impl Into<NodeId>, target: impl Into<NodeId>) -> &mut Self {
        self.connections.push(Connection::new(source, target));
        self
    }

    pub fn node(&self, id: &NodeId) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut GraphNode> {
        self.nodes.iter_mut().find(|n| &n.id == id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn position(&self, id: &NodeId) -> Option<Point> {
        self.node(id).map(|n| n.position)
    }

    pub fn size(&self, id: &NodeId) -> Option<Size> {
        self.node(id).map(|n| n.size)
    }

    /// Moves a node. Returns `false` if the node does not exist.
    pub fn set_position(&mut self, id: &NodeId, position: Point) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    pub fn set_scene_rect(&mut self, rect: SceneRect) {
        self.scene_rect = rect;
    }

    /// Records the compiled node built from a graph node. Returns `false` if the
    /// node does not exist.
    pub fn link_compiled(&mut self, id: &NodeId, handle: CompiledHandle) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.linked = Some(handle);
                true
            }
            None => false,
        }
    }
}
