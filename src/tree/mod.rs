use crate::backend::ScriptContext;
use crate::graph::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

mod formatter;
mod node;

pub use formatter::TreeFormatter;
pub use node::{Composite, Leaf, LeafBackend, RootNode, TreeNode};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// Outcome of ticking a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeStatus {
    /// Not ticked yet, or halted.
    #[default]
    Idle,
    Running,
    Success,
    Failure,
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeStatus::Idle => "Idle",
            NodeStatus::Running => "Running",
            NodeStatus::Success => "Success",
            NodeStatus::Failure => "Failure",
        };
        f.write_str(s)
    }
}

/// A non-owning reference from a graph node to the compiled node built from it.
///
/// The handle remembers which compilation produced it, so a handle kept on a
/// graph node after its tree was dropped or recompiled resolves to nothing
/// instead of to an unrelated node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompiledHandle {
    pub generation: u64,
    pub slot: usize,
}

/// Everything a node needs while being ticked.
pub(crate) struct TickContext<'a> {
    pub(crate) script: &'a mut dyn ScriptContext,
    pub(crate) statuses: &'a mut [NodeStatus],
}

/// An executable behavior tree produced by the compiler.
///
/// The tree owns its root, and with it every node. Per-node statuses live in a
/// table indexed by slot (depth-first, pre-order) so the editor can look them
/// up through [`CompiledHandle`]s.
#[derive(Debug)]
pub struct CompiledTree {
    generation: u64,
    root: TreeNode,
    statuses: Vec<NodeStatus>,
    origins: Vec<Option<NodeId>>,
}

impl CompiledTree {
    pub(crate) fn new(generation: u64, root: TreeNode, origins: Vec<Option<NodeId>>) -> Self {
        Self {
            generation,
            root,
            statuses: vec![NodeStatus::Idle; origins.len()],
            origins,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    /// Number of compiled nodes.
    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    /// Ticks the root once and returns its status.
    pub fn tick(&mut self, script: &mut dyn ScriptContext) -> NodeStatus {
        let mut ctx = TickContext {
            script,
            statuses: &mut self.statuses,
        };
        self.root.tick(&mut ctx)
    }

    /// Halts anything still running and resets every status to `Idle`.
    pub fn finalize(&mut self, script: &mut dyn ScriptContext) {
        let mut ctx = TickContext {
            script,
            statuses: &mut self.statuses,
        };
        self.root.halt(&mut ctx);
    }

    /// Status of the node behind `handle`, or `None` if the handle belongs to
    /// another compilation.
    pub fn status(&self, handle: CompiledHandle) -> Option<NodeStatus> {
        if handle.generation != self.generation {
            return None;
        }
        self.statuses.get(handle.slot).copied()
    }

    pub fn status_of_slot(&self, slot: usize) -> Option<NodeStatus> {
        self.statuses.get(slot).copied()
    }

    /// The graph node a slot was compiled from, if it was linked.
    pub fn origin(&self, slot: usize) -> Option<&NodeId> {
        self.origins.get(slot).and_then(Option::as_ref)
    }

    pub fn handle(&self, slot: usize) -> Option<CompiledHandle> {
        (slot < self.statuses.len()).then_some(CompiledHandle {
            generation: self.generation,
            slot,
        })
    }

    /// Last recorded status of every linked graph node, in slot order.
    pub fn linked_statuses(&self) -> Vec<(&NodeId, NodeStatus)> {
        self.origins
            .iter()
            .zip(&self.statuses)
            .filter_map(|(origin, status)| origin.as_ref().map(|id| (id, *status)))
            .collect()
    }
}
