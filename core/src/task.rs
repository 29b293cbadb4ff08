//! # Scan Tasks
//!
//! One [`ScanTask`] is one phase of a scan against one source. Its state only
//! moves forward:
//!
//! ```text
//! CREATED ──► RUNNING ──► COMPLETED | FAILED | CANCELED
//!    │
//!    └──────► CANCELED
//! ```
//!
//! Terminal states never change again. A retry is a new task.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use surveyr_common::source::Source;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanType {
    Connect,
    Inspect,
}

impl fmt::Display for ScanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanType::Connect => f.write_str("connect"),
            ScanType::Inspect => f.write_str("inspect"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskState {
    Created,
    Running,
    Completed,
    Failed,
    Canceled,
}

impl TaskState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Canceled)
    }

    fn can_become(self, next: TaskState) -> bool {
        use TaskState::*;
        matches!(
            (self, next),
            (Created, Running) | (Created, Canceled) | (Running, Completed | Failed | Canceled)
        )
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskState::Created => "CREATED",
            TaskState::Running => "RUNNING",
            TaskState::Completed => "COMPLETED",
            TaskState::Failed => "FAILED",
            TaskState::Canceled => "CANCELED",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("cannot move {task} from {from} to {to}")]
    IllegalTransition {
        task: String,
        from: TaskState,
        to: TaskState,
    },
}

/// What a runner reports back for a task: the final state and, for
/// anything but success, a message for the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskOutcome {
    pub message: Option<String>,
    pub state: TaskState,
}

impl TaskOutcome {
    pub fn completed() -> Self {
        Self {
            message: None,
            state: TaskState::Completed,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            state: TaskState::Failed,
        }
    }

    pub fn canceled(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            state: TaskState::Canceled,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScanTask {
    pub id: u64,
    pub job_id: u64,
    pub scan_type: ScanType,
    pub source: Arc<Source>,
    state: TaskState,
    result_message: Option<String>,
}

impl ScanTask {
    pub fn new(id: u64, job_id: u64, scan_type: ScanType, source: Arc<Source>) -> Self {
        Self {
            id,
            job_id,
            scan_type,
            source,
            state: TaskState::Created,
            result_message: None,
        }
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn result_message(&self) -> Option<&str> {
        self.result_message.as_deref()
    }

    pub fn outcome(&self) -> TaskOutcome {
        TaskOutcome {
            message: self.result_message.clone(),
            state: self.state,
        }
    }

    fn transition(&mut self, next: TaskState) -> Result<(), TaskError> {
        if !self.state.can_become(next) {
            return Err(TaskError::IllegalTransition {
                task: self.to_string(),
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }

    /// CREATED -> RUNNING. Fails for a task that already ran.
    pub fn start(&mut self) -> Result<(), TaskError> {
        self.transition(TaskState::Running)
    }

    /// Records a terminal outcome.
    pub fn finish(&mut self, outcome: &TaskOutcome) -> Result<(), TaskError> {
        if !outcome.state.is_terminal() {
            return Err(TaskError::IllegalTransition {
                task: self.to_string(),
                from: self.state,
                to: outcome.state,
            });
        }
        self.transition(outcome.state)?;
        self.result_message.clone_from(&outcome.message);
        Ok(())
    }
}

impl fmt::Display for ScanTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task {} (job {}, source '{}')", self.id, self.job_id, self.source.name)
    }
}

/// Cooperative cancellation flag shared between an orchestrator and its
/// runners. Runners check it between steps, never mid-request.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal(Arc<AtomicBool>);

impl CancelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_canceled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Executes one phase of a scan. `run` always returns: every failure is
/// folded into the outcome.
#[async_trait]
pub trait ScanTaskRunner: Send + Sync {
    async fn run(&self, task: &mut ScanTask, cancel: &CancelSignal) -> TaskOutcome;
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
