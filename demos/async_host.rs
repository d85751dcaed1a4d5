//! Async Host
//!
//! This demo runs a controller on a tokio task, with one task printing tick
//! reports and the main task acting as the operator.
//!
//! Key concepts:
//! - `runtime::spawn` owns the controller and ticks it on an interval
//! - `ControllerHandle` is cloneable and serves commands between ticks
//! - Reports are broadcast to any number of subscribers
//!
//! Run with: cargo run --example async_host

use interstage::catalog::{IntergreenMatrix, Program, ProgramCatalog, Stage, StageCatalog};
use interstage::runtime::{spawn, RuntimeConfig};
use interstage::sequencer::Notice;
use interstage::{Aspect, Controller, Timings};
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("interstage=info"))
        .try_init();

    println!("=== Async Host ===\n");

    let controller = Controller::builder()
        .stages(StageCatalog::new(vec![
            Stage::new(0, "Main").with("K1", Aspect::Green).with("K2", Aspect::Red),
            Stage::new(1, "Side").with("K1", Aspect::Red).with("K2", Aspect::Green),
        ]))
        .programs(ProgramCatalog::new(vec![
            Program::new("Day", vec![0, 1]),
            Program::new("Night", vec![1, 0]),
        ]))
        .intergreens(IntergreenMatrix::new().with("K1", "K2", 4).with("K2", "K1", 3))
        .timings(Timings {
            stage_duration: 10,
            ..Timings::default()
        })
        .build()
        .unwrap();

    // 20 simulated seconds per wall-clock second.
    let config = RuntimeConfig {
        tick_interval: Duration::from_millis(50),
        ..RuntimeConfig::default()
    };
    let (handle, task) = spawn(controller, config).unwrap();

    let mut reports = handle.subscribe();
    let printer = tokio::spawn(async move {
        loop {
            match reports.recv().await {
                Ok(timed) => {
                    for notice in &timed.report.notices {
                        if let Notice::StageCommitted { .. } = notice {
                            println!(
                                "{} {} now showing '{}'",
                                timed.at.format("%H:%M:%S%.3f"),
                                timed.report.snapshot.program,
                                timed.report.snapshot.stage_name
                            );
                        }
                    }
                }
                Err(RecvError::Lagged(skipped)) => println!("(skipped {skipped} reports)"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    println!("Programs: {:?}", handle.list_programs().await.unwrap());

    tokio::time::sleep(Duration::from_millis(300)).await;
    let outcome = handle.request_program_switch("Night").await.unwrap();
    println!("Operator: {outcome}");

    tokio::time::sleep(Duration::from_secs(2)).await;
    let snapshot = handle.snapshot().await.unwrap();
    println!(
        "Snapshot: program {} at stage '{}' ({}s in, mode {})",
        snapshot.program,
        snapshot.stage_name,
        snapshot.time_in_stage,
        snapshot.mode()
    );

    handle.shutdown().await.unwrap();
    let controller = task.await.unwrap();
    drop(handle);
    printer.await.unwrap();

    println!("\nController stopped after {} ticks", controller.ticks());
    println!("\n=== Demo Complete ===");
}
