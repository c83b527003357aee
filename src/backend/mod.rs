//! Seams to the systems the compiled tree delegates to: the embedded scripting
//! runtime and the remote action/condition services.
//!
//! kodo does not implement either side. It only creates and closes a scripting
//! context per run, hands script names to that context, and asks a connector for
//! a remote leaf by service name.

use crate::error::ResourceError;
use crate::tree::NodeStatus;

pub mod echo;

pub use echo::{EchoConnector, EchoRuntime};

/// Whether a leaf acts on the world or only inspects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafRole {
    Action,
    Condition,
}

impl LeafRole {
    /// Suffix appended to a remote service name to form the leaf's name.
    pub fn remote_suffix(self) -> &'static str {
        match self {
            LeafRole::Action => "BTAction",
            LeafRole::Condition => "BTCondition",
        }
    }
}

/// A live scripting context, shared by every script leaf of one run.
pub trait ScriptContext {
    /// Runs one tick of the named script.
    fn execute(&mut self, script: &str, role: LeafRole) -> NodeStatus;

    /// Interrupts a script left `Running` by a previous tick.
    fn halt(&mut self, _script: &str) {}

    /// Releases the context. Called once, after the tree has been finalized.
    fn close(self: Box<Self>) -> Result<(), ResourceError> {
        Ok(())
    }
}

/// Creates scripting contexts. One context is created per run.
pub trait ScriptRuntime: Send + Sync {
    fn create_context(&self) -> Result<Box<dyn ScriptContext>, ResourceError>;
}

/// A leaf whose behavior lives in a remote service.
pub trait RemoteLeaf {
    fn tick(&mut self) -> NodeStatus;

    fn halt(&mut self) {}
}

/// Builds remote leaves from a service name.
pub trait RemoteConnector: Send + Sync {
    fn connect(&self, service: &str, role: LeafRole) -> Result<Box<dyn RemoteLeaf>, ResourceError>;
}
