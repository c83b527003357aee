use super::{NodeStatus, TickContext};
use crate::backend::{LeafRole, RemoteLeaf};
use std::fmt;
use tracing::warn;

/// One node of a compiled behavior tree.
///
/// Every node owns its children outright, so a compiled tree is always a strict
/// tree. `slot` indexes the node in its [`CompiledTree`](super::CompiledTree)'s
/// status table.
#[derive(Debug)]
pub enum TreeNode {
    Action(Leaf),
    Condition(Leaf),
    /// Ticks children in order until one does not succeed.
    Sequence(Composite),
    /// Ticks children in order until one does not fail.
    Fallback(Composite),
    /// Forwards tick and status to its single child.
    Root(RootNode),
}

/// Where a leaf's behavior lives.
pub enum LeafBackend {
    /// Executed by the run's shared scripting context.
    Script { script: String },
    Remote(Box<dyn RemoteLeaf>),
}

impl fmt::Debug for LeafBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeafBackend::Script { script } => f.debug_struct("Script").field("script", script).finish(),
            LeafBackend::Remote(_) => f.write_str("Remote(..)"),
        }
    }
}

#[derive(Debug)]
pub struct Leaf {
    pub(crate) slot: usize,
    pub(crate) name: String,
    pub(crate) role: LeafRole,
    pub(crate) backend: LeafBackend,
}

#[derive(Debug)]
pub struct Composite {
    pub(crate) slot: usize,
    pub(crate) children: Vec<TreeNode>,
}

#[derive(Debug)]
pub struct RootNode {
    pub(crate) slot: usize,
    pub(crate) child: Box<TreeNode>,
}

impl Leaf {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> LeafRole {
        self.role
    }

    pub fn backend(&self) -> &LeafBackend {
        &self.backend
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) -> NodeStatus {
        let status = match &mut self.backend {
            LeafBackend::Script { script } => ctx.script.execute(script, self.role),
            LeafBackend::Remote(remote) => remote.tick(),
        };
        if status == NodeStatus::Idle {
            warn!(leaf = %self.name, "leaf returned Idle from a tick, treating it as Failure");
            return NodeStatus::Failure;
        }
        status
    }

    fn halt(&mut self, ctx: &mut TickContext<'_>) {
        if ctx.statuses[self.slot] != NodeStatus::Running {
            return;
        }
        match &mut self.backend {
            LeafBackend::Script { script } => ctx.script.halt(script),
            LeafBackend::Remote(remote) => remote.halt(),
        }
    }
}

impl Composite {
    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    fn tick_sequence(&mut self, ctx: &mut TickContext<'_>) -> NodeStatus {
        for index in 0..self.children.len() {
            let status = self.children[index].tick(ctx);
            if status != NodeStatus::Success {
                self.halt_after(index, ctx);
                return status;
            }
        }
        NodeStatus::Success
    }

    fn tick_fallback(&mut self, ctx: &mut TickContext<'_>) -> NodeStatus {
        for index in 0..self.children.len() {
            let status = self.children[index].tick(ctx);
            if status != NodeStatus::Failure {
                self.halt_after(index, ctx);
                return status;
            }
        }
        NodeStatus::Failure
    }

    /// Halts the children to the right of `index`, which this tick never reached.
    fn halt_after(&mut self, index: usize, ctx: &mut TickContext<'_>) {
        for child in self.children.iter_mut().skip(index + 1) {
            child.halt(ctx);
        }
    }
}

impl TreeNode {
    pub fn slot(&self) -> usize {
        match self {
            TreeNode::Action(leaf) | TreeNode::Condition(leaf) => leaf.slot,
            TreeNode::Sequence(c) | TreeNode::Fallback(c) => c.slot,
            TreeNode::Root(r) => r.slot,
        }
    }

    /// Display label of the node's kind.
    pub fn label(&self) -> &'static str {
        match self {
            TreeNode::Action(_) => "Action",
            TreeNode::Condition(_) => "Condition",
            TreeNode::Sequence(_) => "Sequence",
            TreeNode::Fallback(_) => "Fallback",
            TreeNode::Root(_) => "Root",
        }
    }

    /// Children in tick order. Leaves have none.
    pub fn children(&self) -> &[TreeNode] {
        match self {
            TreeNode::Action(_) | TreeNode::Condition(_) => &[],
            TreeNode::Sequence(c) | TreeNode::Fallback(c) => &c.children,
            TreeNode::Root(r) => std::slice::from_ref(r.child.as_ref()),
        }
    }

    pub(crate) fn tick(&mut self, ctx: &mut TickContext<'_>) -> NodeStatus {
        let status = match self {
            TreeNode::Action(leaf) | TreeNode::Condition(leaf) => leaf.tick(ctx),
            TreeNode::Sequence(c) => c.tick_sequence(ctx),
            TreeNode::Fallback(c) => c.tick_fallback(ctx),
            TreeNode::Root(r) => r.child.tick(ctx),
        };
        ctx.statuses[self.slot()] = status;
        status
    }

    /// Interrupts every `Running` leaf below (and including) this node and
    /// resets the recorded statuses to `Idle`.
    pub(crate) fn halt(&mut self, ctx: &mut TickContext<'_>) {
        match self {
            TreeNode::Action(leaf) | TreeNode::Condition(leaf) => leaf.halt(ctx),
            TreeNode::Sequence(c) | TreeNode::Fallback(c) => {
                for child in &mut c.children {
                    child.halt(ctx);
                }
            }
            TreeNode::Root(r) => r.child.halt(ctx),
        }
        ctx.statuses[self.slot()] = NodeStatus::Idle;
    }
}
