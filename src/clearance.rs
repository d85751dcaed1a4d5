//! Clearance time between two stages.

use crate::catalog::{IntergreenMatrix, Stage};
use crate::core::Aspect;

/// Largest intergreen time between any group green in `source` and any
/// group green in `dest`.
///
/// Returns 0 when the matrix has no entry for any such pair. A missing entry
/// means "no known conflict", not "verified safe": the caller always applies
/// a safety floor on top of this value (see [`all_red_duration`]).
///
/// # Example
///
/// ```rust
/// use interstage::catalog::{IntergreenMatrix, Stage};
/// use interstage::{clearance, Aspect};
///
/// let source = Stage::new(0, "Main").with("A", Aspect::Green).with("B", Aspect::Red);
/// let dest = Stage::new(1, "Side").with("A", Aspect::Red).with("B", Aspect::Green);
///
/// let matrix = IntergreenMatrix::new().with("A", "B", 4);
/// assert_eq!(clearance(&source, &dest, &matrix), 4);
/// assert_eq!(clearance(&dest, &source, &matrix), 0);
/// ```
pub fn clearance(source: &Stage, dest: &Stage, matrix: &IntergreenMatrix) -> u32 {
    source
        .groups_with(Aspect::Green)
        .flat_map(|clearing| {
            dest.groups_with(Aspect::Green)
                .filter_map(move |entering| matrix.get(clearing, entering))
        })
        .max()
        .unwrap_or(0)
}

/// Length of the all-red phase between two stages: the clearance time, but
/// never less than `floor`.
pub fn all_red_duration(source: &Stage, dest: &Stage, matrix: &IntergreenMatrix, floor: u32) -> u32 {
    clearance(source, dest, matrix).max(floor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn main_stage() -> Stage {
        Stage::new(0, "Main")
            .with("K1", Aspect::Green)
            .with("K2", Aspect::Green)
            .with("K3", Aspect::Red)
            .with("K4", Aspect::Red)
    }

    fn side_stage() -> Stage {
        Stage::new(1, "Side")
            .with("K1", Aspect::Red)
            .with("K2", Aspect::Red)
            .with("K3", Aspect::Green)
            .with("K4", Aspect::Green)
    }

    #[test]
    fn takes_maximum_over_all_green_pairs() {
        let matrix = IntergreenMatrix::new()
            .with("K1", "K3", 4)
            .with("K1", "K4", 6)
            .with("K2", "K3", 5);

        assert_eq!(clearance(&main_stage(), &side_stage(), &matrix), 6);
    }

    #[test]
    fn empty_matrix_gives_zero() {
        assert_eq!(
            clearance(&main_stage(), &side_stage(), &IntergreenMatrix::new()),
            0
        );
    }

    #[test]
    fn only_green_to_green_pairs_count() {
        // K3 -> K1 would apply only when leaving Side for Main.
        let matrix = IntergreenMatrix::new().with("K3", "K1", 9);
        assert_eq!(clearance(&main_stage(), &side_stage(), &matrix), 0);
        assert_eq!(clearance(&side_stage(), &main_stage(), &matrix), 9);
    }

    #[test]
    fn groups_green_in_both_stages_are_paired() {
        let source = Stage::new(0, "A").with("K1", Aspect::Green);
        let dest = Stage::new(1, "B").with("K1", Aspect::Green);
        let matrix = IntergreenMatrix::new().with("K1", "K1", 3);

        assert_eq!(clearance(&source, &dest, &matrix), 3);
    }

    #[test]
    fn floor_applies_when_clearance_is_shorter() {
        let matrix = IntergreenMatrix::new().with("K1", "K3", 1);
        assert_eq!(
            all_red_duration(&main_stage(), &side_stage(), &matrix, 2),
            2
        );
        assert_eq!(
            all_red_duration(&main_stage(), &side_stage(), &IntergreenMatrix::new(), 2),
            2
        );

        let matrix = IntergreenMatrix::new().with("K1", "K3", 7);
        assert_eq!(
            all_red_duration(&main_stage(), &side_stage(), &matrix, 2),
            7
        );
    }
}
