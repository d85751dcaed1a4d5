//! Errors raised while assembling a controller.

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use std::fmt::Display;
use thiserror::Error;

/// Errors that can occur when building a controller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Stage catalog not specified. Call .stages(catalog) before .build()")]
    MissingStages,

    #[error("Program catalog not specified. Call .programs(catalog) before .build()")]
    MissingPrograms,

    #[error("Catalogs are invalid: {}", join(.0))]
    InvalidCatalog(Vec<CatalogError>),

    #[error("Timings are invalid: {}", join(.0))]
    InvalidTimings(Vec<ConfigError>),

    #[error("Initial program '{0}' is not in the program catalog")]
    UnknownInitialProgram(String),

    #[error("Initial program '{0}' has no stages to run")]
    EmptyInitialCycle(String),
}

fn join<E: Display>(errors: &[E]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
