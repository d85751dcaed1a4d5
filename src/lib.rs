//! Interstage: stage and program transitions for traffic signal controllers
//!
//! Interstage follows the "pure core, imperative shell" split. The core is a
//! tick-driven controller with no clocks, threads or I/O of its own: every
//! call to [`Controller::tick`] advances simulated time by one second and
//! returns a report of what changed. The optional [`runtime`] module is the
//! shell that drives a controller from a tokio interval.
//!
//! # Core Concepts
//!
//! - **Stage**: a named snapshot of the aspect every signal group shows
//! - **Program**: a named cycle of stages, repeated indefinitely
//! - **Intergreen matrix**: minimum clearance between a clearing and an entering group
//! - **Transition**: Yellow, then AllRed for the clearance time, then RedYellow
//! - **Program switch**: requested at any time, applied at the next stage boundary
//!
//! # Example
//!
//! ```rust
//! use interstage::catalog::{IntergreenMatrix, Program, ProgramCatalog, Stage, StageCatalog};
//! use interstage::{Aspect, Controller, Notice, SwitchOutcome};
//!
//! let stages = StageCatalog::new(vec![
//!     Stage::new(0, "North-South").with("NS", Aspect::Green).with("EW", Aspect::Red),
//!     Stage::new(1, "East-West").with("NS", Aspect::Red).with("EW", Aspect::Green),
//! ]);
//! let programs = ProgramCatalog::new(vec![
//!     Program::new("Day", vec![0, 1]),
//!     Program::new("Night", vec![1, 0]),
//! ]);
//!
//! let mut controller = Controller::builder()
//!     .stages(stages)
//!     .programs(programs)
//!     .intergreens(IntergreenMatrix::new().with("NS", "EW", 4).with("EW", "NS", 5))
//!     .build()
//!     .unwrap();
//!
//! let outcome = controller.request_program_switch("Night").unwrap();
//! assert!(matches!(outcome, SwitchOutcome::Queued { window_opens_in: 54, .. }));
//!
//! let reports: Vec<_> = (0..60).map(|_| controller.tick()).collect();
//! assert!(reports[59]
//!     .notices
//!     .iter()
//!     .any(|notice| matches!(notice, Notice::ProgramSwitched(_))));
//! assert_eq!(controller.current_program(), "Night");
//! ```

pub mod builder;
pub mod catalog;
pub mod clearance;
pub mod config;
pub mod core;
pub mod runtime;
pub mod safety;
pub mod sequencer;
pub mod switch;
pub mod transition;

// Re-export commonly used types
pub use builder::{BuildError, ControllerBuilder};
pub use catalog::{Catalogs, IntergreenMatrix, Program, ProgramCatalog, Stage, StageCatalog};
pub use clearance::{all_red_duration, clearance};
pub use config::{ConfigError, ControllerConfig, SwitchContinuity, Timings};
pub use core::{Aspect, AspectChange, AspectMap, SignalGroupId, State};
pub use safety::SafetyViolation;
pub use sequencer::{Controller, Mode, Notice, Snapshot, TickReport};
pub use switch::{SwitchError, SwitchOutcome};
pub use transition::{Phase, PhaseStep, TransitionMachine};
