//! Transition phases and the result of stepping through them.

use crate::state_enum;
use serde::{Deserialize, Serialize};

state_enum! {
    /// One of the three mandatory phases between two stages.
    pub enum Phase {
        /// Termination: groups losing green show yellow.
        Yellow,
        /// Clearance: every group that was green shows red.
        AllRed,
        /// Initiation: groups about to gain green show red-yellow.
        RedYellow,
    }
    final: [RedYellow]
}

impl Phase {
    /// The phase following this one, or `None` after the last phase.
    pub fn next(self) -> Option<Phase> {
        match self {
            Self::Yellow => Some(Self::AllRed),
            Self::AllRed => Some(Self::RedYellow),
            Self::RedYellow => None,
        }
    }
}

/// Result of advancing a transition by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseStep {
    /// The current phase continues for `remaining` more ticks.
    Holding { phase: Phase, remaining: u32 },
    /// The machine left `from` and entered `to`, which lasts `duration` ticks.
    Entered { from: Phase, to: Phase, duration: u32 },
    /// The last phase ended; the destination stage is now showing.
    Completed,
}
