//! Controller configuration.
//!
//! Every field has a default matching the standard installation: 60 second
//! stages, a switching window over the last 10 % of a stage, 3 s yellow,
//! 1 s red-yellow and a 2 s all-red floor.

use crate::core::DEFAULT_HISTORY_LIMIT;
use serde::{Deserialize, Serialize};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// Errors in controller configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Configuration could not be parsed: {0}")]
    Parse(String),

    #[error("Duration '{field}' must be at least one second")]
    ZeroDuration { field: &'static str },

    #[error("Switch window must start within the stage (got {percent} %)")]
    WindowOutOfRange { percent: u32 },
}

/// Fixed timing parameters, in whole seconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// How long every stage is held before a transition starts.
    pub stage_duration: u32,
    /// Percentage of the stage after which the advisory switching window opens.
    pub switch_window_percent: u32,
    /// Length of the yellow (termination) phase.
    pub yellow: u32,
    /// Length of the red-yellow (initiation) phase.
    pub red_yellow: u32,
    /// Minimum length of the all-red phase, whatever the matrix says.
    pub all_red_floor: u32,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            stage_duration: 60,
            switch_window_percent: 90,
            yellow: 3,
            red_yellow: 1,
            all_red_floor: 2,
        }
    }
}

impl Timings {
    /// Elapsed stage time at which the switching window opens.
    ///
    /// ```rust
    /// use interstage::Timings;
    ///
    /// assert_eq!(Timings::default().switch_window_start(), 54);
    /// ```
    pub fn switch_window_start(&self) -> u32 {
        let start = u64::from(self.stage_duration) * u64::from(self.switch_window_percent) / 100;
        u32::try_from(start).unwrap_or(u32::MAX)
    }

    /// Check every field, accumulating ALL problems.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigError>> {
        let durations = [
            ("stage_duration", self.stage_duration),
            ("yellow", self.yellow),
            ("red_yellow", self.red_yellow),
            ("all_red_floor", self.all_red_floor),
        ];

        let mut checks: Vec<Validation<(), NonEmptyVec<ConfigError>>> = durations
            .into_iter()
            .map(|(field, value)| {
                if value == 0 {
                    Validation::fail(ConfigError::ZeroDuration { field })
                } else {
                    Validation::success(())
                }
            })
            .collect();

        let percent = self.switch_window_percent;
        checks.push(if (1..=100).contains(&percent) {
            Validation::success(())
        } else {
            Validation::fail(ConfigError::WindowOutOfRange { percent })
        });

        Validation::all_vec(checks).map(|_| ())
    }
}

/// Which stage a transition departs from when a program switch is applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwitchContinuity {
    /// The switch is applied first and the transition departs from the new
    /// program's first stage, then arrives at its second. The departing
    /// aspects compared against are those of a stage that was not showing.
    #[default]
    Literal,
    /// The transition departs from the stage that was actually showing and
    /// arrives at the new program's first stage.
    FromLiveStage,
}

/// Everything configurable about a controller apart from its catalogs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub timings: Timings,
    pub continuity: SwitchContinuity,
    /// Number of mode changes retained in the controller history.
    pub history_limit: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            timings: Timings::default(),
            continuity: SwitchContinuity::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl ControllerConfig {
    /// Parse a configuration from JSON; absent fields take their defaults.
    ///
    /// ```rust
    /// use interstage::{ControllerConfig, SwitchContinuity};
    ///
    /// let config = ControllerConfig::from_json(
    ///     r#"{"timings": {"stage_duration": 30}, "continuity": "FromLiveStage"}"#,
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(config.timings.stage_duration, 30);
    /// assert_eq!(config.timings.yellow, 3);
    /// assert_eq!(config.continuity, SwitchContinuity::FromLiveStage);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
