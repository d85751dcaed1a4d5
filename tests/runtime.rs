//! Tests for the tokio shell, run on a paused clock.

use interstage::catalog::{IntergreenMatrix, Program, ProgramCatalog, Stage, StageCatalog};
use interstage::runtime::{spawn, RuntimeConfig, RuntimeError};
use interstage::sequencer::Notice;
use interstage::{Aspect, Controller, SwitchError, SwitchOutcome};
use std::time::Duration;

fn controller() -> Controller {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    Controller::builder()
        .stages(StageCatalog::new(vec![
            Stage::new(0, "A").with("A", Aspect::Green).with("B", Aspect::Red),
            Stage::new(1, "B").with("A", Aspect::Red).with("B", Aspect::Green),
        ]))
        .programs(ProgramCatalog::new(vec![
            Program::new("Day", vec![0, 1]),
            Program::new("Night", vec![1, 0]),
        ]))
        .intergreens(IntergreenMatrix::new().with("A", "B", 4))
        .build()
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn ticks_are_broadcast_once_per_interval() {
    let (handle, task) = spawn(controller(), RuntimeConfig::default()).unwrap();
    let mut reports = handle.subscribe();

    let start = tokio::time::Instant::now();
    let mut last = None;
    for _ in 0..60 {
        last = Some(reports.recv().await.unwrap());
    }
    let last = last.unwrap();

    assert_eq!(last.report.tick, 60);
    assert!(start.elapsed() >= Duration::from_secs(60));
    assert!(matches!(
        last.report.notices[0],
        Notice::TransitionStarted { all_red: 4, .. }
    ));

    handle.shutdown().await.unwrap();
    let controller = task.await.unwrap();
    assert_eq!(controller.ticks(), 60);
}

#[tokio::test(start_paused = true)]
async fn commands_are_served_between_ticks() {
    let (handle, task) = spawn(controller(), RuntimeConfig::default()).unwrap();

    assert_eq!(handle.list_programs().await.unwrap(), vec!["Day", "Night"]);
    assert_eq!(handle.current_program().await.unwrap(), "Day");

    tokio::time::sleep(Duration::from_millis(10_500)).await;
    let outcome = handle.request_program_switch("Night").await.unwrap();
    assert_eq!(
        outcome,
        SwitchOutcome::Queued {
            target: "Night".to_string(),
            window_opens_in: 44
        }
    );
    assert_eq!(
        handle.snapshot().await.unwrap().pending_switch.as_deref(),
        Some("Night")
    );

    assert_eq!(
        handle.request_program_switch("Weekend").await,
        Err(RuntimeError::Switch(SwitchError::UnknownProgram {
            name: "Weekend".to_string()
        }))
    );

    handle.shutdown().await.unwrap();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn handle_reports_closed_after_shutdown() {
    let (handle, task) = spawn(controller(), RuntimeConfig::default()).unwrap();
    handle.shutdown().await.unwrap();
    let controller = task.await.unwrap();

    assert_eq!(controller.ticks(), 0);
    assert_eq!(handle.snapshot().await, Err(RuntimeError::Closed));
    assert_eq!(handle.list_programs().await, Err(RuntimeError::Closed));
}

#[tokio::test(start_paused = true)]
async fn dropping_every_handle_stops_the_task() {
    let (handle, task) = spawn(
        controller(),
        RuntimeConfig {
            tick_interval: Duration::from_millis(100),
            ..RuntimeConfig::default()
        },
    )
    .unwrap();
    let extra = handle.clone();
    drop(handle);
    tokio::time::sleep(Duration::from_millis(550)).await;
    drop(extra);

    let controller = task.await.unwrap();
    assert_eq!(controller.ticks(), 5);
}

#[tokio::test]
async fn zero_tick_interval_is_rejected() {
    let result = spawn(
        controller(),
        RuntimeConfig {
            tick_interval: Duration::ZERO,
            ..RuntimeConfig::default()
        },
    );

    assert!(matches!(result, Err(RuntimeError::ZeroTickInterval)));
}
