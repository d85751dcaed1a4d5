//! Four-Way Junction
//!
//! This demo drives a controller through several stage changes and a
//! program switch on a simple four-arm junction.
//!
//! Key concepts:
//! - Catalogs loaded from JSON
//! - One `tick()` per simulated second
//! - Queued program switch applied at the stage boundary
//! - Tick reports with aspect changes and notices
//!
//! Run with: cargo run --example four_way
//! Set RUST_LOG=interstage=debug to see controller logs.

use interstage::catalog::Catalogs;
use interstage::sequencer::{Notice, TickReport};
use interstage::{Controller, SwitchContinuity};
use tracing_subscriber::EnvFilter;

const CATALOGS: &str = r#"{
    "stages": [
        {"index": 0, "name": "North-South", "aspects": {"N": "Green", "S": "Green", "E": "Red", "W": "Red", "P": "Red"}},
        {"index": 1, "name": "East-West", "aspects": {"N": "Red", "S": "Red", "E": "Green", "W": "Green", "P": "Red"}},
        {"index": 2, "name": "Pedestrians", "aspects": {"N": "Red", "S": "Red", "E": "Red", "W": "Red", "P": "Green"}}
    ],
    "programs": [
        {"name": "Day", "stage_cycle": [0, 1, 2]},
        {"name": "Night", "stage_cycle": [0, 1]},
        {"name": "Event", "stage_cycle": [2, 0, 2, 1]}
    ],
    "intergreens": {
        "N": {"E": 5, "W": 4, "P": 6},
        "S": {"E": 4, "W": 5, "P": 6},
        "E": {"N": 3, "S": 3, "P": 5},
        "W": {"N": 3, "S": 3, "P": 5},
        "P": {"N": 7, "S": 7, "E": 7, "W": 7}
    }
}"#;

fn print_programs(controller: &Controller) {
    println!("Available programs:");
    for (idx, name) in controller.list_programs().iter().enumerate() {
        let marker = if *name == controller.current_program() {
            " (active)"
        } else {
            ""
        };
        println!("  {}. {name}{marker}", idx + 1);
    }
    println!();
}

fn print_report(report: &TickReport) {
    for notice in &report.notices {
        match notice {
            Notice::SwitchWindowOpen { target, remaining } => {
                println!("[{:03}] switching window open for '{target}': {remaining}s left", report.tick)
            }
            Notice::ProgramSwitched(applied) => {
                println!("[{:03}] program switched: {} -> {}", report.tick, applied.from, applied.to)
            }
            Notice::TransitionStarted {
                from_stage,
                to_stage,
                all_red,
            } => println!(
                "[{:03}] transition {from_stage} -> {to_stage} (all-red {all_red}s)",
                report.tick
            ),
            Notice::PhaseEntered { phase, duration } => {
                println!("[{:03}]   {phase} for {duration}s", report.tick)
            }
            Notice::StageCommitted { stage, position } => println!(
                "[{:03}] now showing '{}' (stage {stage}, position {position})",
                report.tick, report.snapshot.stage_name
            ),
        }
    }
    for change in &report.changes {
        println!("        {}: {} -> {}", change.group, change.from, change.to);
    }
    for violation in &report.violations {
        println!("        SAFETY: {violation}");
    }
}

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    println!("=== Four-Way Junction ===\n");

    let catalogs = Catalogs::from_json(CATALOGS).unwrap();
    let mut controller = Controller::builder()
        .catalogs(catalogs)
        .continuity(SwitchContinuity::FromLiveStage)
        .build()
        .unwrap();

    print_programs(&controller);

    for second in 1..=260 {
        if second == 20 {
            match controller.request_program_switch("Night") {
                Ok(outcome) => println!("[{second:03}] {outcome}"),
                Err(error) => println!("[{second:03}] rejected: {error}"),
            }
        }
        if second == 100 {
            if let Err(error) = controller.request_program_switch("Night") {
                println!("[{second:03}] rejected: {error}");
            }
        }
        print_report(&controller.tick());
    }

    println!();
    print_programs(&controller);

    let path: Vec<String> = controller
        .history()
        .get_path()
        .iter()
        .map(|mode| mode.to_string())
        .collect();
    println!("Recent modes: {}", path.join(" -> "));

    println!("\n=== Demo Complete ===");
}
