//! Structural validation of loaded catalogs.
//!
//! The controller assumes well-formed catalogs. Validation runs once, when a
//! controller is built, and reports every problem at once.

use super::error::CatalogError;
use super::{IntergreenMatrix, ProgramCatalog, StageCatalog};
use std::collections::BTreeSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<CatalogError>>;

fn require(condition: bool, error: impl FnOnce() -> CatalogError) -> Check {
    if condition {
        Validation::success(())
    } else {
        Validation::fail(error())
    }
}

/// Validate stages, programs and matrix together, accumulating ALL problems.
///
/// # Example
///
/// ```rust
/// use interstage::catalog::{validate, IntergreenMatrix, Program, ProgramCatalog, Stage, StageCatalog};
/// use interstage::Aspect;
///
/// let stages = StageCatalog::new(vec![Stage::new(0, "Main").with("K1", Aspect::Green)]);
/// let programs = ProgramCatalog::new(vec![Program::new("Day", vec![0, 3])]);
///
/// let result = validate(&stages, &programs, &IntergreenMatrix::new());
/// assert!(result.is_failure());
/// ```
pub fn validate(stages: &StageCatalog, programs: &ProgramCatalog, matrix: &IntergreenMatrix) -> Check {
    let groups = stages.signal_groups();
    let mut checks: Vec<Check> = Vec::new();

    checks.push(require(!stages.is_empty(), || {
        CatalogError::EmptyStageCatalog
    }));
    checks.push(require(!programs.is_empty(), || {
        CatalogError::EmptyProgramCatalog
    }));

    for (position, stage) in stages.iter().enumerate() {
        checks.push(require(stage.index == position, || {
            CatalogError::StageIndexMismatch {
                name: stage.name.clone(),
                position,
                index: stage.index,
            }
        }));

        if stage.aspects.is_empty() {
            checks.push(Validation::fail(CatalogError::StageWithoutGroups {
                stage: stage.name.clone(),
            }));
            continue;
        }

        for group in groups.iter().filter(|g| !stage.aspects.contains_key(*g)) {
            checks.push(Validation::fail(CatalogError::MissingGroup {
                stage: stage.name.clone(),
                group: group.clone(),
            }));
        }
    }

    let mut seen = BTreeSet::new();
    for program in programs.iter() {
        checks.push(require(seen.insert(program.name.as_str()), || {
            CatalogError::DuplicateProgram {
                name: program.name.clone(),
            }
        }));
        checks.push(require(!program.stage_cycle.is_empty(), || {
            CatalogError::EmptyCycle {
                program: program.name.clone(),
            }
        }));

        for &index in program.stage_cycle.iter().filter(|&&i| i >= stages.len()) {
            checks.push(Validation::fail(CatalogError::UnknownStage {
                program: program.name.clone(),
                index,
            }));
        }

        for group in program.green_onsets.keys().filter(|g| !groups.contains(*g)) {
            checks.push(Validation::fail(CatalogError::UnknownOnsetGroup {
                program: program.name.clone(),
                group: group.clone(),
            }));
        }
    }

    let mut unknown = BTreeSet::new();
    for (clearing, entering, _) in matrix.entries() {
        for group in [clearing, entering] {
            if !groups.contains(group) && unknown.insert(group.clone()) {
                checks.push(Validation::fail(CatalogError::UnknownMatrixGroup {
                    group: group.clone(),
                }));
            }
        }
    }

    Validation::all_vec(checks).map(|_| ())
}
