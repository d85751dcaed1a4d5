//! Imperative shell: drive a [`Controller`] from a tokio task.
//!
//! The controller itself never sleeps or spawns. This module owns it inside
//! a single task, ticks it on a wall-clock interval, serves commands from
//! any number of [`ControllerHandle`]s between ticks and broadcasts every
//! [`TickReport`](crate::sequencer::TickReport) to subscribers.

mod handle;

pub use handle::{ControllerHandle, RuntimeError, TimedReport};

use crate::sequencer::Controller;
use chrono::Utc;
use handle::Command;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Settings for the controller task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Wall-clock length of one simulated second.
    pub tick_interval: Duration,
    /// Reports buffered per subscriber before it starts lagging.
    pub report_capacity: usize,
    /// Commands buffered before senders wait.
    pub command_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            report_capacity: 64,
            command_capacity: 32,
        }
    }
}

/// Run `controller` on a new tokio task.
///
/// Fails with [`RuntimeError::ZeroTickInterval`] when `tick_interval` is zero.
/// The task stops when [`ControllerHandle::shutdown`] is called or every
/// handle has been dropped, and yields the controller back through the
/// returned join handle.
///
/// # Example
///
/// ```rust
/// use interstage::catalog::{Program, ProgramCatalog, Stage, StageCatalog};
/// use interstage::runtime::{spawn, RuntimeConfig};
/// use interstage::{Aspect, Controller};
///
/// # #[tokio::main(flavor = "current_thread", start_paused = true)]
/// # async fn main() {
/// let controller = Controller::builder()
///     .stages(StageCatalog::new(vec![
///         Stage::new(0, "Main").with("A", Aspect::Green),
///         Stage::new(1, "Off").with("A", Aspect::Red),
///     ]))
///     .programs(ProgramCatalog::new(vec![Program::new("Day", vec![0, 1])]))
///     .build()
///     .unwrap();
///
/// let (handle, task) = spawn(controller, RuntimeConfig::default()).unwrap();
/// let mut reports = handle.subscribe();
/// let first = reports.recv().await.unwrap();
/// assert_eq!(first.report.tick, 1);
///
/// handle.shutdown().await.unwrap();
/// let controller = task.await.unwrap();
/// assert!(controller.ticks() >= 1);
/// # }
/// ```
pub fn spawn(
    controller: Controller,
    config: RuntimeConfig,
) -> Result<(ControllerHandle, JoinHandle<Controller>), RuntimeError> {
    if config.tick_interval.is_zero() {
        warn!("refusing to start controller task with a zero tick interval");
        return Err(RuntimeError::ZeroTickInterval);
    }

    let (commands_tx, commands_rx) = mpsc::channel(config.command_capacity.max(1));
    let (reports_tx, _) = broadcast::channel(config.report_capacity.max(1));

    let handle = ControllerHandle {
        commands: commands_tx,
        reports: reports_tx.clone(),
    };
    let task = tokio::spawn(run(controller, config.tick_interval, commands_rx, reports_tx));
    Ok((handle, task))
}

async fn run(
    mut controller: Controller,
    period: Duration,
    mut commands: mpsc::Receiver<Command>,
    reports: broadcast::Sender<TimedReport>,
) -> Controller {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick of an interval completes immediately.
    ticker.tick().await;

    info!(
        program = %controller.current_program(),
        period_ms = period.as_millis() as u64,
        "controller task started"
    );

    loop {
        tokio::select! {
            biased;

            command = commands.recv() => match command {
                Some(Command::Shutdown) => {
                    info!("shutdown requested");
                    break;
                }
                Some(command) => serve(&mut controller, command),
                None => {
                    info!("all handles dropped");
                    break;
                }
            },

            _ = ticker.tick() => {
                let report = controller.tick();
                // Sending only fails when nobody is subscribed.
                let _ = reports.send(TimedReport { at: Utc::now(), report });
            }
        }
    }

    info!(ticks = controller.ticks(), "controller task stopped");
    controller
}

fn serve(controller: &mut Controller, command: Command) {
    // A dropped reply receiver means the caller gave up waiting.
    match command {
        Command::RequestSwitch { program, reply } => {
            debug!(program = %program, "switch requested");
            let _ = reply.send(controller.request_program_switch(&program));
        }
        Command::ListPrograms { reply } => {
            let names = controller
                .list_programs()
                .into_iter()
                .map(str::to_string)
                .collect();
            let _ = reply.send(names);
        }
        Command::CurrentProgram { reply } => {
            let _ = reply.send(controller.current_program().to_string());
        }
        Command::Snapshot { reply } => {
            let _ = reply.send(controller.snapshot());
        }
        Command::Shutdown => {}
    }
}
