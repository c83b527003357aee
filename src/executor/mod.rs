//! Runs a compiled tree on a fixed tick cycle until told to stop.
//!
//! A run goes `Idle -> Running -> Stopping -> Idle`. The executor validates the
//! graph, opens a scripting context, compiles the tree and ticks its root once
//! per interval. Stopping is cooperative: a stop request never interrupts a
//! tick, it only cuts the wait between two ticks short. The tree is finalized
//! and the scripting context closed before `run` returns.

use crate::backend::{RemoteConnector, ScriptRuntime};
use crate::compiler::TreeCompiler;
use crate::error::RunError;
use crate::graph::{Graph, find_canonical_root};
use crate::tree::NodeStatus;
use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

mod signal;

pub use signal::{RunMode, RunSignal};

/// Default pause between two ticks of the root.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorConfig {
    pub tick_interval: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

impl ExecutorConfig {
    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }
}

/// Where a run currently is, as seen through [`RunSignal::executor_state`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutorState {
    #[default]
    Idle,
    Running,
    Stopping,
}

impl fmt::Display for ExecutorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExecutorState::Idle => "idle",
            ExecutorState::Running => "running",
            ExecutorState::Stopping => "stopping",
        };
        f.write_str(s)
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    /// How many times the root was ticked.
    pub ticks: u64,
    /// Status returned by the last tick, `Idle` if the loop never ticked.
    pub last_status: NodeStatus,
}

pub struct TickExecutor {
    runtime: Arc<dyn ScriptRuntime>,
    compiler: TreeCompiler,
    signal: RunSignal,
    config: ExecutorConfig,
}

impl TickExecutor {
    pub fn new(
        runtime: Arc<dyn ScriptRuntime>,
        connector: Arc<dyn RemoteConnector>,
        signal: RunSignal,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            runtime,
            compiler: TreeCompiler::builder(connector).build(),
            signal,
            config,
        }
    }

    pub fn signal(&self) -> &RunSignal {
        &self.signal
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Runs the graph's tree until the signal reads `Stopped`, blocking the
    /// calling thread.
    ///
    /// The signal is expected to be set to `Running` before the call; a signal
    /// that is already stopped yields a run with zero ticks. Any error raised
    /// before the loop starts leaves nothing behind: no tree and no open
    /// scripting context.
    pub fn run(&self, graph: &mut Graph) -> Result<RunReport, RunError> {
        let root_id = find_canonical_root(graph)?.id.clone();

        let mut script = self.runtime.create_context()?;
        let mut tree = match self.compiler.compile_from(graph, &root_id) {
            Ok(tree) => tree,
            Err(e) => {
                if let Err(close_err) = script.close() {
                    warn!(error = %close_err, "failed to close scripting context after compile error");
                }
                return Err(e.into());
            }
        };
        self.transition(ExecutorState::Idle, ExecutorState::Running);
        info!(root = %root_id, nodes = tree.len(), interval = ?self.config.tick_interval, "tick loop started");

        let mut report = RunReport::default();
        while self.signal.mode() == RunMode::Running {
            report.last_status = tree.tick(&mut *script);
            report.ticks += 1;
            debug!(tick = report.ticks, status = %report.last_status, "root ticked");
            self.signal.wait_while_running(self.config.tick_interval);
        }

        self.transition(ExecutorState::Running, ExecutorState::Stopping);
        tree.finalize(&mut *script);
        drop(tree);
        let closed = script.close();
        self.transition(ExecutorState::Stopping, ExecutorState::Idle);
        closed?;
        info!(ticks = report.ticks, last_status = %report.last_status, "tick loop finished");

        Ok(report)
    }

    /// Moves the graph and the executor onto a worker thread and runs there.
    /// The graph is handed back when the run ends.
    pub fn spawn(self, mut graph: Graph) -> JoinHandle<(Graph, Result<RunReport, RunError>)> {
        thread::spawn(move || {
            let result = self.run(&mut graph);
            (graph, result)
        })
    }

    fn transition(&self, from: ExecutorState, to: ExecutorState) {
        self.signal.set_executor_state(to);
        debug!(%from, %to, "executor state");
    }
}
