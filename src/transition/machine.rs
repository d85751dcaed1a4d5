//! The three-phase machine that carries the installation from one stage to the next.

use super::phase::{Phase, PhaseStep};
use crate::catalog::{IntergreenMatrix, Stage};
use crate::clearance::all_red_duration;
use crate::config::Timings;
use crate::core::{Aspect, AspectChange, AspectMap, SignalGroupId};
use std::collections::BTreeSet;

/// An active transition between two stages.
///
/// The machine always visits `Yellow`, `AllRed` and `RedYellow` in that
/// order. Each phase lasts a whole number of ticks, and a phase that has
/// been left is never re-entered.
///
/// Aspect rules, given the departing `source` and arriving `dest` stage:
///
/// | Entering    | Groups affected                   | New aspect  |
/// |-------------|-----------------------------------|-------------|
/// | `Yellow`    | green in source and red in dest   | `Yellow`    |
/// | `AllRed`    | green in source                   | `Red`       |
/// | `RedYellow` | red in source and green in dest   | `RedYellow` |
/// | completion  | every group                       | dest aspect |
///
/// Groups a stage does not mention compare as `Dark`.
///
/// # Example
///
/// ```rust
/// use interstage::catalog::{IntergreenMatrix, Stage};
/// use interstage::{Aspect, AspectMap, Phase, PhaseStep, Timings, TransitionMachine};
///
/// let source = Stage::new(0, "Main").with("A", Aspect::Green).with("B", Aspect::Red);
/// let dest = Stage::new(1, "Side").with("A", Aspect::Red).with("B", Aspect::Green);
/// let matrix = IntergreenMatrix::new();
/// let timings = Timings::default();
///
/// let mut aspects: AspectMap = source.aspects.clone().into_iter().collect();
/// let mut changes = Vec::new();
/// let mut machine = TransitionMachine::begin(source, dest, 1, &timings, &mut aspects, &mut changes);
/// assert_eq!(machine.phase(), Phase::Yellow);
/// assert_eq!(aspects.get(&"A".into()), Aspect::Yellow);
///
/// let mut ticks = 0;
/// while machine.step(&matrix, &timings, &mut aspects, &mut changes) != PhaseStep::Completed {
///     ticks += 1;
/// }
/// assert_eq!(ticks + 1, 3 + 2 + 1);
/// assert_eq!(aspects.get(&"B".into()), Aspect::Green);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionMachine {
    phase: Phase,
    remaining: u32,
    source: Stage,
    dest: Stage,
    dest_position: usize,
}

impl TransitionMachine {
    /// Start a transition by entering `Yellow`.
    ///
    /// `dest_position` is the position in the active cycle the sequencer
    /// commits once the machine completes.
    pub fn begin(
        source: Stage,
        dest: Stage,
        dest_position: usize,
        timings: &Timings,
        aspects: &mut AspectMap,
        changes: &mut Vec<AspectChange>,
    ) -> Self {
        let machine = Self {
            phase: Phase::Yellow,
            remaining: timings.yellow,
            source,
            dest,
            dest_position,
        };

        let terminating: Vec<&SignalGroupId> = machine
            .source
            .groups_with(Aspect::Green)
            .filter(|group| machine.dest.aspect_of(group) == Aspect::Red)
            .collect();
        for group in terminating {
            show(aspects, group, Aspect::Yellow, changes);
        }

        machine
    }

    /// Advance by one tick.
    ///
    /// Decrements the time left in the current phase; when it runs out the
    /// machine enters the next phase, or completes after `RedYellow`.
    pub fn step(
        &mut self,
        matrix: &IntergreenMatrix,
        timings: &Timings,
        aspects: &mut AspectMap,
        changes: &mut Vec<AspectChange>,
    ) -> PhaseStep {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            return PhaseStep::Holding {
                phase: self.phase,
                remaining: self.remaining,
            };
        }

        let from = self.phase;
        match from.next() {
            Some(Phase::AllRed) => {
                for group in self.source.groups_with(Aspect::Green) {
                    show(aspects, group, Aspect::Red, changes);
                }
                let duration =
                    all_red_duration(&self.source, &self.dest, matrix, timings.all_red_floor);
                self.enter(Phase::AllRed, duration)
            }
            Some(Phase::RedYellow) => {
                for group in self.dest.groups_with(Aspect::Green) {
                    if self.source.aspect_of(group) == Aspect::Red {
                        show(aspects, group, Aspect::RedYellow, changes);
                    }
                }
                self.enter(Phase::RedYellow, timings.red_yellow)
            }
            Some(Phase::Yellow) | None => {
                self.adopt_destination(aspects, changes);
                PhaseStep::Completed
            }
        }
    }

    fn enter(&mut self, phase: Phase, duration: u32) -> PhaseStep {
        let from = self.phase;
        self.phase = phase;
        self.remaining = duration;
        PhaseStep::Entered {
            from,
            to: phase,
            duration,
        }
    }

    /// Show the destination stage verbatim on every group.
    fn adopt_destination(&self, aspects: &mut AspectMap, changes: &mut Vec<AspectChange>) {
        let groups: BTreeSet<SignalGroupId> = aspects
            .groups()
            .chain(self.dest.aspects.keys())
            .cloned()
            .collect();
        for group in &groups {
            show(aspects, group, self.dest.aspect_of(group), changes);
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Ticks left in the current phase.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn source(&self) -> &Stage {
        &self.source
    }

    pub fn dest(&self) -> &Stage {
        &self.dest
    }

    pub fn dest_position(&self) -> usize {
        self.dest_position
    }
}

fn show(
    aspects: &mut AspectMap,
    group: &SignalGroupId,
    aspect: Aspect,
    changes: &mut Vec<AspectChange>,
) {
    if let Some(change) = aspects.set(group, aspect) {
        changes.push(change);
    }
}
