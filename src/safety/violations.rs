//! Unsafe aspect combinations.

use crate::core::SignalGroupId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An unsafe combination of aspects observed after a tick.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafetyViolation {
    #[error("Signal group '{group}' shows green during all-red clearance")]
    GreenDuringAllRed { group: SignalGroupId },

    #[error("Conflicting signal groups '{first}' and '{second}' both show green")]
    ConflictingGreens {
        first: SignalGroupId,
        second: SignalGroupId,
    },
}
