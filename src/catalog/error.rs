//! Structural problems found in loaded catalogs.

use crate::core::SignalGroupId;
use thiserror::Error;

/// A structural problem in the stage catalog, program catalog or matrix.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Stage catalog is empty")]
    EmptyStageCatalog,

    #[error("Program catalog is empty")]
    EmptyProgramCatalog,

    #[error("Stage '{name}' at position {position} declares index {index}")]
    StageIndexMismatch {
        name: String,
        position: usize,
        index: usize,
    },

    #[error("Stage '{stage}' does not set any signal group")]
    StageWithoutGroups { stage: String },

    #[error("Stage '{stage}' does not set signal group '{group}'")]
    MissingGroup { stage: String, group: SignalGroupId },

    #[error("Program '{name}' is defined more than once")]
    DuplicateProgram { name: String },

    #[error("Program '{program}' has an empty stage cycle")]
    EmptyCycle { program: String },

    #[error("Program '{program}' refers to unknown stage {index}")]
    UnknownStage { program: String, index: usize },

    #[error("Program '{program}' has a green onset for unknown signal group '{group}'")]
    UnknownOnsetGroup {
        program: String,
        group: SignalGroupId,
    },

    #[error("Intergreen matrix refers to unknown signal group '{group}'")]
    UnknownMatrixGroup { group: SignalGroupId },
}
