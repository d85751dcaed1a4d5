//! What a tick tells its caller.

use crate::core::AspectChange;
use crate::safety::SafetyViolation;
use crate::state_enum;
use crate::switch::AppliedSwitch;
use crate::transition::Phase;
use serde::{Deserialize, Serialize};

state_enum! {
    /// What the controller is doing: holding a stage or in one of the transition phases.
    pub enum Mode {
        Running,
        Yellow,
        AllRed,
        RedYellow,
    }
}

impl From<Phase> for Mode {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Yellow => Self::Yellow,
            Phase::AllRed => Self::AllRed,
            Phase::RedYellow => Self::RedYellow,
        }
    }
}

/// Informational events produced by a tick, in the order they happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    /// A switch is pending and the advisory switching window just opened.
    SwitchWindowOpen { target: String, remaining: u32 },
    /// A pending switch was applied at the stage boundary.
    ProgramSwitched(AppliedSwitch),
    /// A transition between two stages began.
    TransitionStarted {
        from_stage: usize,
        to_stage: usize,
        all_red: u32,
    },
    /// The transition entered its next phase.
    PhaseEntered { phase: Phase, duration: u32 },
    /// The destination stage is now showing.
    StageCommitted { stage: usize, position: usize },
}

/// The active transition, as seen from outside.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionSnapshot {
    pub phase: Phase,
    pub remaining: u32,
    pub from_stage: usize,
    pub to_stage: usize,
}

/// Descriptor of the controller state after a tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub program: String,
    /// Catalog index of the stage at the current cycle position.
    pub stage_index: usize,
    pub stage_name: String,
    pub stage_position: usize,
    pub cycle_length: usize,
    pub time_in_stage: u32,
    pub stage_duration: u32,
    pub transition: Option<TransitionSnapshot>,
    pub pending_switch: Option<String>,
}

impl Snapshot {
    pub fn mode(&self) -> Mode {
        self.transition
            .as_ref()
            .map_or(Mode::Running, |transition| transition.phase.into())
    }
}

/// Everything produced by one tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// Number of ticks since the controller started, starting at 1.
    pub tick: u64,
    /// Aspect changes in the order they were made.
    pub changes: Vec<AspectChange>,
    pub notices: Vec<Notice>,
    pub snapshot: Snapshot,
    /// Unsafe aspect combinations found after the tick. Empty in normal operation.
    pub violations: Vec<SafetyViolation>,
}

impl TickReport {
    pub fn is_safe(&self) -> bool {
        self.violations.is_empty()
    }
}
