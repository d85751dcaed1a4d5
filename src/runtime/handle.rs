//! Cloneable handle for talking to a running controller task.

use crate::sequencer::{Snapshot, TickReport};
use crate::switch::{SwitchError, SwitchOutcome};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};

/// Errors returned by [`ControllerHandle`] operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Controller task has stopped")]
    Closed,

    #[error("Tick interval must be longer than zero")]
    ZeroTickInterval,

    #[error(transparent)]
    Switch(#[from] SwitchError),
}

/// A tick report stamped with the wall-clock time it was produced.
#[derive(Clone, Debug, Serialize)]
pub struct TimedReport {
    pub at: DateTime<Utc>,
    pub report: TickReport,
}

pub(crate) enum Command {
    RequestSwitch {
        program: String,
        reply: oneshot::Sender<Result<SwitchOutcome, SwitchError>>,
    },
    ListPrograms {
        reply: oneshot::Sender<Vec<String>>,
    },
    CurrentProgram {
        reply: oneshot::Sender<String>,
    },
    Snapshot {
        reply: oneshot::Sender<Snapshot>,
    },
    Shutdown,
}

/// Handle to a controller running under [`spawn`](super::spawn).
///
/// Commands are processed between ticks, one at a time, so a request never
/// observes a half-applied tick.
#[derive(Clone, Debug)]
pub struct ControllerHandle {
    pub(crate) commands: mpsc::Sender<Command>,
    pub(crate) reports: broadcast::Sender<TimedReport>,
}

impl ControllerHandle {
    /// Ask the controller to switch programs at the next stage boundary.
    pub async fn request_program_switch(
        &self,
        program: impl Into<String>,
    ) -> Result<SwitchOutcome, RuntimeError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::RequestSwitch {
            program: program.into(),
            reply,
        })
        .await?;
        let outcome = response.await.map_err(|_| RuntimeError::Closed)??;
        Ok(outcome)
    }

    pub async fn list_programs(&self) -> Result<Vec<String>, RuntimeError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::ListPrograms { reply }).await?;
        response.await.map_err(|_| RuntimeError::Closed)
    }

    pub async fn current_program(&self) -> Result<String, RuntimeError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::CurrentProgram { reply }).await?;
        response.await.map_err(|_| RuntimeError::Closed)
    }

    pub async fn snapshot(&self) -> Result<Snapshot, RuntimeError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Snapshot { reply }).await?;
        response.await.map_err(|_| RuntimeError::Closed)
    }

    /// Receive every tick report produced from now on.
    ///
    /// A subscriber that falls more than the configured report capacity
    /// behind sees `RecvError::Lagged` and skips ahead.
    pub fn subscribe(&self) -> broadcast::Receiver<TimedReport> {
        self.reports.subscribe()
    }

    /// Stop the controller task. Its final state is returned by the join handle.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        self.send(Command::Shutdown).await
    }

    async fn send(&self, command: Command) -> Result<(), RuntimeError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| RuntimeError::Closed)
    }
}
