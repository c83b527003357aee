use super::ExecutorState;
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// Whether the tick loop should keep going.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RunMode {
    Running,
    #[default]
    Stopped,
}

#[derive(Debug, Default)]
struct SignalInner {
    mode: Mutex<RunMode>,
    changed: Condvar,
    state: Mutex<ExecutorState>,
}

/// The run/stop switch shared between controllers and the tick executor.
///
/// Cloning yields another handle to the same switch. Every read and write goes
/// through one mutex; the executor reads it once per loop iteration. The
/// executor also reports its lifecycle state here, so controllers can observe a
/// run they handed off to another thread.
#[derive(Debug, Clone, Default)]
pub struct RunSignal {
    inner: Arc<SignalInner>,
}

impl RunSignal {
    /// A new signal in the `Stopped` mode.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_mode(&self, mode: RunMode) {
        let mut current = self.inner.mode.lock();
        let previous = *current;
        if previous != mode {
            info!(from = ?previous, to = ?mode, "run mode changed");
        }
        *current = mode;
        self.inner.changed.notify_all();
    }

    pub fn mode(&self) -> RunMode {
        *self.inner.mode.lock()
    }

    pub fn is_running(&self) -> bool {
        self.mode() == RunMode::Running
    }

    pub fn request_stop(&self) {
        self.set_mode(RunMode::Stopped);
    }

    /// Lifecycle state of the executor holding this signal.
    pub fn executor_state(&self) -> ExecutorState {
        *self.inner.state.lock()
    }

    pub(crate) fn set_executor_state(&self, state: ExecutorState) {
        *self.inner.state.lock() = state;
    }

    /// Sleeps for `timeout`, returning early if the mode leaves `Running`.
    pub(crate) fn wait_while_running(&self, timeout: Duration) -> RunMode {
        let deadline = Instant::now() + timeout;
        let mut mode = self.inner.mode.lock();
        while *mode == RunMode::Running {
            if self.inner.changed.wait_until(&mut mode, deadline).timed_out() {
                break;
            }
        }
        *mode
    }
}
