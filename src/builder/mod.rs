//! Fluent construction of a [`Controller`].
//!
//! The builder collects catalogs and configuration, validates all of them
//! (reporting every problem found, not just the first) and only then starts
//! the controller.

mod error;

pub use error::BuildError;

use crate::catalog::{Catalogs, IntergreenMatrix, ProgramCatalog, StageCatalog};
use crate::config::{ControllerConfig, SwitchContinuity, Timings};
use crate::sequencer::Controller;
use stillwater::validation::Validation;

/// Builder for [`Controller`].
///
/// Stages and programs are required; the intergreen matrix defaults to
/// empty and the configuration to [`ControllerConfig::default`].
#[derive(Clone, Debug, Default)]
pub struct ControllerBuilder {
    stages: Option<StageCatalog>,
    programs: Option<ProgramCatalog>,
    intergreens: IntergreenMatrix,
    config: ControllerConfig,
    initial_program: Option<String>,
}

impl ControllerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the stage catalog (required).
    pub fn stages(mut self, stages: StageCatalog) -> Self {
        self.stages = Some(stages);
        self
    }

    /// Set the program catalog (required).
    pub fn programs(mut self, programs: ProgramCatalog) -> Self {
        self.programs = Some(programs);
        self
    }

    pub fn intergreens(mut self, matrix: IntergreenMatrix) -> Self {
        self.intergreens = matrix;
        self
    }

    /// Set all three catalogs at once, e.g. after [`Catalogs::from_json`].
    pub fn catalogs(self, catalogs: Catalogs) -> Self {
        self.stages(catalogs.stages)
            .programs(catalogs.programs)
            .intergreens(catalogs.intergreens)
    }

    pub fn config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn timings(mut self, timings: Timings) -> Self {
        self.config.timings = timings;
        self
    }

    pub fn continuity(mut self, continuity: SwitchContinuity) -> Self {
        self.config.continuity = continuity;
        self
    }

    pub fn history_limit(mut self, limit: usize) -> Self {
        self.config.history_limit = limit;
        self
    }

    /// Start on this program instead of the first one in the catalog.
    pub fn initial_program(mut self, name: impl Into<String>) -> Self {
        self.initial_program = Some(name.into());
        self
    }

    /// Validate everything and start the controller.
    pub fn build(self) -> Result<Controller, BuildError> {
        let stages = self.stages.ok_or(BuildError::MissingStages)?;
        let programs = self.programs.ok_or(BuildError::MissingPrograms)?;

        if let Validation::Failure(errors) = self.config.timings.validate() {
            return Err(BuildError::InvalidTimings(errors.iter().cloned().collect()));
        }

        let catalogs = Catalogs::new(stages, programs, self.intergreens);
        if let Validation::Failure(errors) = catalogs.validate() {
            return Err(BuildError::InvalidCatalog(errors.iter().cloned().collect()));
        }

        Controller::start(catalogs, self.config, self.initial_program.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogError, Program, Stage};
    use crate::config::ConfigError;
    use crate::core::Aspect;

    fn stages() -> StageCatalog {
        StageCatalog::new(vec![
            Stage::new(0, "Main").with("A", Aspect::Green).with("B", Aspect::Red),
            Stage::new(1, "Side").with("A", Aspect::Red).with("B", Aspect::Green),
        ])
    }

    fn programs() -> ProgramCatalog {
        ProgramCatalog::new(vec![
            Program::new("Day", vec![0, 1]),
            Program::new("Night", vec![1, 0]),
        ])
    }

    #[test]
    fn builder_requires_stages() {
        let result = ControllerBuilder::new().programs(programs()).build();
        assert!(matches!(result, Err(BuildError::MissingStages)));
    }

    #[test]
    fn builder_requires_programs() {
        let result = ControllerBuilder::new().stages(stages()).build();
        assert!(matches!(result, Err(BuildError::MissingPrograms)));
    }

    #[test]
    fn builder_starts_on_first_program_by_default() {
        let controller = ControllerBuilder::new()
            .stages(stages())
            .programs(programs())
            .build()
            .unwrap();

        assert_eq!(controller.current_program(), "Day");
        assert_eq!(controller.snapshot().stage_index, 0);
    }

    #[test]
    fn initial_program_can_be_chosen() {
        let controller = ControllerBuilder::new()
            .stages(stages())
            .programs(programs())
            .initial_program("Night")
            .build()
            .unwrap();

        assert_eq!(controller.current_program(), "Night");
        assert_eq!(controller.current_aspects().get(&"B".into()), Aspect::Green);
    }

    #[test]
    fn unknown_initial_program_is_rejected() {
        let result = ControllerBuilder::new()
            .stages(stages())
            .programs(programs())
            .initial_program("Weekend")
            .build();

        assert_eq!(
            result.err(),
            Some(BuildError::UnknownInitialProgram("Weekend".to_string()))
        );
    }

    #[test]
    fn invalid_catalogs_report_every_problem() {
        let programs = ProgramCatalog::new(vec![
            Program::new("Day", vec![]),
            Program::new("Night", vec![7]),
        ]);
        let result = ControllerBuilder::new()
            .stages(stages())
            .programs(programs)
            .build();

        match result {
            Err(BuildError::InvalidCatalog(errors)) => {
                assert_eq!(errors.len(), 2);
                assert!(errors.contains(&CatalogError::UnknownStage {
                    program: "Night".to_string(),
                    index: 7,
                }));
            }
            other => panic!("Expected invalid catalog, got {other:?}"),
        }
    }

    #[test]
    fn invalid_timings_are_rejected() {
        let result = ControllerBuilder::new()
            .stages(stages())
            .programs(programs())
            .timings(Timings {
                yellow: 0,
                ..Timings::default()
            })
            .build();

        assert_eq!(
            result.err(),
            Some(BuildError::InvalidTimings(vec![ConfigError::ZeroDuration {
                field: "yellow"
            }]))
        );
    }

    #[test]
    fn build_error_lists_problems() {
        let error = BuildError::InvalidTimings(vec![
            ConfigError::ZeroDuration { field: "yellow" },
            ConfigError::WindowOutOfRange { percent: 0 },
        ]);
        assert_eq!(
            error.to_string(),
            "Timings are invalid: Duration 'yellow' must be at least one second; \
             Switch window must start within the stage (got 0 %)"
        );
    }
}
