//! Safety checks over the live aspect map.

use super::violations::SafetyViolation;
use crate::catalog::IntergreenMatrix;
use crate::core::{Aspect, AspectMap};
use crate::transition::Phase;
use std::collections::BTreeSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<SafetyViolation>>;

/// Check the live aspects, accumulating ALL violations.
///
/// - No group may show green while the controller is in `AllRed`.
/// - No two groups with an intergreen entry between them (in either
///   direction) may show green at the same time.
///
/// # Example
///
/// ```rust
/// use interstage::catalog::IntergreenMatrix;
/// use interstage::safety::check;
/// use interstage::{Aspect, AspectMap, SignalGroupId};
///
/// let aspects: AspectMap = [
///     (SignalGroupId::from("K1"), Aspect::Green),
///     (SignalGroupId::from("K2"), Aspect::Green),
/// ]
/// .into_iter()
/// .collect();
///
/// let matrix = IntergreenMatrix::new().with("K1", "K2", 4);
/// assert!(check(&aspects, None, &matrix).is_failure());
/// assert!(check(&aspects, None, &IntergreenMatrix::new()).is_success());
/// ```
pub fn check(aspects: &AspectMap, phase: Option<Phase>, matrix: &IntergreenMatrix) -> Check {
    let mut checks: Vec<Check> = Vec::new();

    if phase == Some(Phase::AllRed) {
        for group in aspects.showing(Aspect::Green) {
            checks.push(Validation::fail(SafetyViolation::GreenDuringAllRed {
                group: group.clone(),
            }));
        }
    }

    let mut reported = BTreeSet::new();
    for (clearing, entering, _) in matrix.entries() {
        if clearing == entering
            || aspects.get(clearing) != Aspect::Green
            || aspects.get(entering) != Aspect::Green
        {
            continue;
        }
        let (first, second) = if clearing < entering {
            (clearing, entering)
        } else {
            (entering, clearing)
        };
        if reported.insert((first, second)) {
            checks.push(Validation::fail(SafetyViolation::ConflictingGreens {
                first: first.clone(),
                second: second.clone(),
            }));
        }
    }

    Validation::all_vec(checks).map(|_| ())
}

/// Run [`check`] and flatten the result into a list of violations.
pub fn collect_violations(
    aspects: &AspectMap,
    phase: Option<Phase>,
    matrix: &IntergreenMatrix,
) -> Vec<SafetyViolation> {
    match check(aspects, phase, matrix) {
        Validation::Success(_) => Vec::new(),
        Validation::Failure(errors) => errors.iter().cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SignalGroupId;

    fn aspects(entries: &[(&str, Aspect)]) -> AspectMap {
        entries
            .iter()
            .map(|(group, aspect)| (SignalGroupId::from(*group), *aspect))
            .collect()
    }

    #[test]
    fn safe_aspects_pass() {
        let live = aspects(&[("K1", Aspect::Green), ("K2", Aspect::Red)]);
        let matrix = IntergreenMatrix::new().with("K1", "K2", 4);

        assert!(check(&live, None, &matrix).is_success());
        assert!(check(&live, Some(Phase::Yellow), &matrix).is_success());
    }

    #[test]
    fn green_during_all_red_is_reported() {
        let live = aspects(&[("K1", Aspect::Green), ("K2", Aspect::Red)]);

        assert_eq!(
            collect_violations(&live, Some(Phase::AllRed), &IntergreenMatrix::new()),
            vec![SafetyViolation::GreenDuringAllRed {
                group: "K1".into()
            }]
        );
    }

    #[test]
    fn conflicting_pair_is_reported_once() {
        let live = aspects(&[("K1", Aspect::Green), ("K2", Aspect::Green)]);
        let matrix = IntergreenMatrix::new().with("K1", "K2", 4).with("K2", "K1", 3);

        assert_eq!(
            collect_violations(&live, None, &matrix),
            vec![SafetyViolation::ConflictingGreens {
                first: "K1".into(),
                second: "K2".into(),
            }]
        );
    }

    #[test]
    fn all_violations_are_accumulated() {
        let live = aspects(&[
            ("K1", Aspect::Green),
            ("K2", Aspect::Green),
            ("K3", Aspect::Green),
        ]);
        let matrix = IntergreenMatrix::new().with("K1", "K2", 4).with("K3", "K1", 2);

        match check(&live, Some(Phase::AllRed), &matrix) {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 5);
                let conflicts = errors
                    .iter()
                    .filter(|e| matches!(e, SafetyViolation::ConflictingGreens { .. }))
                    .count();
                assert_eq!(conflicts, 2);
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn self_pairs_and_red_yellow_are_not_conflicts() {
        let live = aspects(&[("K1", Aspect::Green), ("K2", Aspect::RedYellow)]);
        let matrix = IntergreenMatrix::new().with("K1", "K1", 2).with("K1", "K2", 4);

        assert!(check(&live, None, &matrix).is_success());
    }
}
