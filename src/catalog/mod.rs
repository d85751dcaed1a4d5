//! Read-only installation data consumed by the controller.
//!
//! Stages, programs and the intergreen matrix are produced by a separate
//! ingestion step and never mutated once a controller is running. They are
//! serde types so ingestion can hand them over as JSON.

mod error;
mod matrix;
mod program;
mod stage;
mod validate;

pub use error::CatalogError;
pub use matrix::IntergreenMatrix;
pub use program::{Program, ProgramCatalog};
pub use stage::{Stage, StageCatalog};
pub use validate::validate;

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Everything a controller needs to know about an installation.
///
/// # Example
///
/// ```rust
/// use interstage::catalog::Catalogs;
///
/// let json = r#"{
///     "stages": [
///         {"index": 0, "name": "Main", "aspects": {"K1": "Green", "K2": "Red"}},
///         {"index": 1, "name": "Side", "aspects": {"K1": "Red", "K2": "Green"}}
///     ],
///     "programs": [{"name": "Day", "stage_cycle": [0, 1]}],
///     "intergreens": {"K1": {"K2": 4}}
/// }"#;
///
/// let catalogs = Catalogs::from_json(json).unwrap();
/// assert!(catalogs.validate().is_success());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalogs {
    pub stages: StageCatalog,
    pub programs: ProgramCatalog,
    #[serde(default)]
    pub intergreens: IntergreenMatrix,
}

impl Catalogs {
    pub fn new(stages: StageCatalog, programs: ProgramCatalog, intergreens: IntergreenMatrix) -> Self {
        Self {
            stages,
            programs,
            intergreens,
        }
    }

    /// Parse catalogs from JSON. Structure is not checked; call [`Catalogs::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Validate all three catalogs together, accumulating every problem.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<CatalogError>> {
        validate(&self.stages, &self.programs, &self.intergreens)
    }
}
