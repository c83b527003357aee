use super::{LeafRole, RemoteConnector, RemoteLeaf, ScriptContext, ScriptRuntime};
use crate::error::ResourceError;
use crate::tree::NodeStatus;
use tracing::info;

/// A scripting runtime that runs nothing: every script tick is logged and succeeds.
///
/// Useful for dry runs of a tree's control flow without a real interpreter.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoRuntime;

impl ScriptRuntime for EchoRuntime {
    fn create_context(&self) -> Result<Box<dyn ScriptContext>, ResourceError> {
        info!("echo scripting context created");
        Ok(Box::new(EchoContext { calls: 0 }))
    }
}

struct EchoContext {
    calls: u64,
}

impl ScriptContext for EchoContext {
    fn execute(&mut self, script: &str, role: LeafRole) -> NodeStatus {
        self.calls += 1;
        info!(script, ?role, "script tick");
        NodeStatus::Success
    }

    fn close(self: Box<Self>) -> Result<(), ResourceError> {
        info!(calls = self.calls, "echo scripting context closed");
        Ok(())
    }
}

/// A remote connector whose leaves log each tick and succeed.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoConnector;

impl RemoteConnector for EchoConnector {
    fn connect(&self, service: &str, role: LeafRole) -> Result<Box<dyn RemoteLeaf>, ResourceError> {
        Ok(Box::new(EchoLeaf {
            service: service.to_string(),
            role,
        }))
    }
}

struct EchoLeaf {
    service: String,
    role: LeafRole,
}

impl RemoteLeaf for EchoLeaf {
    fn tick(&mut self) -> NodeStatus {
        info!(service = %self.service, role = ?self.role, "remote tick");
        NodeStatus::Success
    }
}
