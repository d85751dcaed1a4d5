//! Reasons a program switch request is rejected.

use thiserror::Error;

/// A rejected program switch request. Rejection never changes controller state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SwitchError {
    #[error("Program '{name}' not found")]
    UnknownProgram { name: String },

    #[error("Already running program '{name}'")]
    NoOpSwitch { name: String },
}
