use crate::backend::{LeafRole, RemoteConnector};
use crate::error::{CompileError, StructuralError};
use crate::graph::{Graph, NodeId, NodeKind, get_children};
use crate::tree::{Composite, Leaf, LeafBackend, RootNode, TreeNode};
use ahash::AHashSet;
use itertools::Itertools;
use tracing::{debug, warn};

/// Walks the topology depth-first and builds one compiled node per graph node.
pub(super) struct TreeBuilder<'a> {
    graph: &'a Graph,
    connector: &'a dyn RemoteConnector,
    /// Graph node each slot was built from; `None` for slots that are not linked back.
    origins: Vec<Option<NodeId>>,
    on_path: AHashSet<NodeId>,
    visited: AHashSet<NodeId>,
}

impl<'a> TreeBuilder<'a> {
    pub(super) fn new(graph: &'a Graph, connector: &'a dyn RemoteConnector) -> Self {
        Self {
            graph,
            connector,
            origins: Vec::new(),
            on_path: AHashSet::new(),
            visited: AHashSet::new(),
        }
    }

    pub(super) fn into_origins(self) -> Vec<Option<NodeId>> {
        self.origins
    }

    /// Recursively builds the subtree rooted at `node_id`.
    pub(super) fn build(&mut self, node_id: &NodeId) -> Result<TreeNode, CompileError> {
        if self.on_path.contains(node_id) {
            return Err(StructuralError::Cycle {
                node_id: node_id.clone(),
            }
            .into());
        }
        if !self.visited.insert(node_id.clone()) {
            return Err(StructuralError::MultipleParents {
                node_id: node_id.clone(),
            }
            .into());
        }

        let graph = self.graph;
        let node = graph
            .node(node_id)
            .ok_or_else(|| StructuralError::NodeNotFound {
                node_id: node_id.clone(),
            })?;
        debug!(node = %node_id, kind = node.kind.type_name(), "compiling node");

        // Fallback nodes are the one kind never linked back to the editor.
        let linked = !matches!(node.kind, NodeKind::Fallback);
        let slot = self.reserve_slot(node_id, linked);

        self.on_path.insert(node_id.clone());
        let compiled = match &node.kind {
            NodeKind::ScriptAction { script } => {
                TreeNode::Action(Self::script_leaf(slot, script, LeafRole::Action))
            }
            NodeKind::ScriptCondition { script } => {
                TreeNode::Condition(Self::script_leaf(slot, script, LeafRole::Condition))
            }
            NodeKind::RemoteAction { service } => {
                TreeNode::Action(self.remote_leaf(slot, service, LeafRole::Action)?)
            }
            NodeKind::RemoteCondition { service } => {
                TreeNode::Condition(self.remote_leaf(slot, service, LeafRole::Condition)?)
            }
            NodeKind::Sequence => TreeNode::Sequence(self.composite(slot, node_id)?),
            NodeKind::Fallback => TreeNode::Fallback(self.composite(slot, node_id)?),
            NodeKind::Root => TreeNode::Root(self.root(slot, node_id)?),
            NodeKind::Unsupported { type_name } => {
                return Err(CompileError::UnsupportedNodeKind {
                    node_id: node_id.clone(),
                    type_name: type_name.clone(),
                });
            }
        };
        self.on_path.remove(node_id);

        Ok(compiled)
    }

    fn reserve_slot(&mut self, node_id: &NodeId, linked: bool) -> usize {
        self.origins.push(linked.then(|| node_id.clone()));
        self.origins.len() - 1
    }

    fn script_leaf(slot: usize, script: &str, role: LeafRole) -> Leaf {
        Leaf {
            slot,
            name: script.to_string(),
            role,
            backend: LeafBackend::Script {
                script: script.to_string(),
            },
        }
    }

    fn remote_leaf(&self, slot: usize, service: &str, role: LeafRole) -> Result<Leaf, CompileError> {
        let remote = self.connector.connect(service, role)?;
        Ok(Leaf {
            slot,
            name: format!("{}{}", service, role.remote_suffix()),
            role,
            backend: LeafBackend::Remote(remote),
        })
    }

    fn composite(&mut self, slot: usize, node_id: &NodeId) -> Result<Composite, CompileError> {
        let graph = self.graph;
        let children = get_children(graph, node_id)
            .into_iter()
            .map(|child| self.build(&child.id))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Composite { slot, children })
    }

    fn root(&mut self, slot: usize, node_id: &NodeId) -> Result<RootNode, CompileError> {
        let graph = self.graph;
        let children = get_children(graph, node_id);
        let (first, ignored) = match children.split_first() {
            Some(split) => split,
            None => {
                return Err(CompileError::EmptyTree {
                    root_id: node_id.clone(),
                });
            }
        };
        if !ignored.is_empty() {
            warn!(
                root = %node_id,
                ignored = %ignored.iter().map(|n| &n.id).join(", "),
                "root has more than one child; only the leftmost subtree is compiled"
            );
        }
        let child = self.build(&first.id)?;
        Ok(RootNode {
            slot,
            child: Box::new(child),
        })
    }
}
