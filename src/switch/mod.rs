//! Operator requests to change the running program.
//!
//! A request is validated immediately and, if accepted, held as the single
//! pending switch. It is applied at the next stage boundary no matter when it
//! arrived; the switching window only changes the advisory returned to the
//! operator. An accepted request cannot be withdrawn, only replaced by
//! another accepted request.

mod error;

pub use error::SwitchError;

use crate::catalog::{Program, ProgramCatalog};
use crate::config::Timings;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// The running program and the position within its stage cycle.
///
/// Replaced as a whole when a switch is applied, so no observer can see the
/// name of one program paired with the cycle of another.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveProgram {
    name: String,
    sequence: Vec<usize>,
    position: usize,
}

impl ActiveProgram {
    /// Start `program` at the first stage of its cycle.
    ///
    /// Returns `None` for a program with an empty cycle.
    pub fn start(program: &Program) -> Option<Self> {
        if program.stage_cycle.is_empty() {
            return None;
        }
        Some(Self {
            name: program.name.clone(),
            sequence: program.stage_cycle.clone(),
            position: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The stage cycle being followed.
    pub fn sequence(&self) -> &[usize] {
        &self.sequence
    }

    /// Position of the current stage within [`ActiveProgram::sequence`].
    pub fn position(&self) -> usize {
        self.position
    }

    /// Catalog index of the stage at the current position.
    pub fn current_stage(&self) -> usize {
        self.stage_at(self.position)
    }

    /// Catalog index of the stage at `position`, wrapping around the cycle.
    pub fn stage_at(&self, position: usize) -> usize {
        self.sequence[position % self.sequence.len()]
    }

    /// Position following the current one, wrapping around the cycle.
    pub fn next_position(&self) -> usize {
        (self.position + 1) % self.sequence.len()
    }

    pub(crate) fn commit(&mut self, position: usize) {
        self.position = position % self.sequence.len();
    }
}

/// An accepted switch waiting for the next stage boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSwitch {
    pub target: String,
    /// Elapsed stage time when the request was accepted. For a request
    /// made during a transition this is measured against the upcoming stage,
    /// so it is 0.
    pub requested_at: u32,
}

/// Advisory returned for an accepted switch request.
///
/// Both variants apply at the same stage boundary. A request made during a
/// transition is measured against the upcoming stage: it is always `Queued`
/// with the full `switch_window_start` to wait, and its `requested_at` is 0.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwitchOutcome {
    /// Requested before the switching window; it opens in `window_opens_in` seconds.
    Queued {
        target: String,
        window_opens_in: u32,
    },
    /// Requested inside the switching window; the stage ends in `switches_in` seconds.
    WillApplyAtBoundary { target: String, switches_in: u32 },
}

impl SwitchOutcome {
    pub fn target(&self) -> &str {
        match self {
            Self::Queued { target, .. } | Self::WillApplyAtBoundary { target, .. } => target,
        }
    }
}

impl fmt::Display for SwitchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued {
                target,
                window_opens_in,
            } => write!(
                f,
                "switch to '{target}' queued; safe switching window opens in {window_opens_in}s"
            ),
            Self::WillApplyAtBoundary {
                target,
                switches_in,
            } => write!(
                f,
                "switch to '{target}' will occur at end of stage in {switches_in}s"
            ),
        }
    }
}

/// A switch that has just been applied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedSwitch {
    pub from: String,
    pub to: String,
    pub requested_at: u32,
}

/// Validates switch requests and applies the pending one at a stage boundary.
#[derive(Clone, Debug, Default)]
pub struct SwitchCoordinator {
    pending: Option<PendingSwitch>,
}

impl SwitchCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<&PendingSwitch> {
        self.pending.as_ref()
    }

    /// Validate a request and, if accepted, record it as the pending switch.
    ///
    /// `time_in_stage` is the elapsed time of the stage the request is
    /// measured against.
    ///
    /// # Example
    ///
    /// ```rust
    /// use interstage::catalog::{Program, ProgramCatalog};
    /// use interstage::switch::{ActiveProgram, SwitchCoordinator, SwitchError, SwitchOutcome};
    /// use interstage::Timings;
    ///
    /// let programs = ProgramCatalog::new(vec![
    ///     Program::new("Day", vec![0, 1]),
    ///     Program::new("Night", vec![1]),
    /// ]);
    /// let active = ActiveProgram::start(programs.first().unwrap()).unwrap();
    /// let mut coordinator = SwitchCoordinator::new();
    ///
    /// let outcome = coordinator
    ///     .request("Night", &programs, &active, 10, &Timings::default())
    ///     .unwrap();
    /// assert_eq!(
    ///     outcome,
    ///     SwitchOutcome::Queued { target: "Night".to_string(), window_opens_in: 44 }
    /// );
    ///
    /// let rejected = coordinator.request("Day", &programs, &active, 10, &Timings::default());
    /// assert_eq!(rejected, Err(SwitchError::NoOpSwitch { name: "Day".to_string() }));
    /// ```
    pub fn request(
        &mut self,
        target: &str,
        programs: &ProgramCatalog,
        active: &ActiveProgram,
        time_in_stage: u32,
        timings: &Timings,
    ) -> Result<SwitchOutcome, SwitchError> {
        if !programs.contains(target) {
            warn!(program = %target, "switch rejected: unknown program");
            return Err(SwitchError::UnknownProgram {
                name: target.to_string(),
            });
        }
        if target == active.name() {
            warn!(program = %target, "switch rejected: program already running");
            return Err(SwitchError::NoOpSwitch {
                name: target.to_string(),
            });
        }

        if let Some(replaced) = &self.pending {
            debug!(replaced = %replaced.target, "replacing pending switch");
        }
        self.pending = Some(PendingSwitch {
            target: target.to_string(),
            requested_at: time_in_stage,
        });

        let window_start = timings.switch_window_start();
        let outcome = if time_in_stage < window_start {
            SwitchOutcome::Queued {
                target: target.to_string(),
                window_opens_in: window_start - time_in_stage,
            }
        } else {
            SwitchOutcome::WillApplyAtBoundary {
                target: target.to_string(),
                switches_in: timings.stage_duration.saturating_sub(time_in_stage),
            }
        };

        info!(from = %active.name(), to = %target, time_in_stage, "{outcome}");
        Ok(outcome)
    }

    /// Apply the pending switch, if any, replacing `active` with the target
    /// program at position 0.
    pub fn apply_if_pending(
        &mut self,
        programs: &ProgramCatalog,
        active: &mut ActiveProgram,
    ) -> Option<AppliedSwitch> {
        let pending = self.pending.take()?;
        let Some(next) = programs.get(&pending.target).and_then(ActiveProgram::start) else {
            warn!(program = %pending.target, "pending switch dropped: program has no stage cycle");
            return None;
        };

        let previous = std::mem::replace(active, next);
        info!(
            from = %previous.name(),
            to = %active.name(),
            sequence = ?active.sequence(),
            "program switched"
        );
        Some(AppliedSwitch {
            from: previous.name,
            to: pending.target,
            requested_at: pending.requested_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn programs() -> ProgramCatalog {
        ProgramCatalog::new(vec![
            Program::new("Day", vec![0, 1, 2]),
            Program::new("Night", vec![2, 0]),
            Program::new("Broken", vec![]),
        ])
    }

    fn day() -> ActiveProgram {
        ActiveProgram::start(programs().first().unwrap()).unwrap()
    }

    #[test]
    fn active_program_wraps_around_cycle() {
        let mut active = day();
        assert_eq!(active.current_stage(), 0);
        active.commit(active.next_position());
        active.commit(active.next_position());
        assert_eq!(active.current_stage(), 2);
        assert_eq!(active.next_position(), 0);
        assert_eq!(active.stage_at(4), 1);
    }

    #[test]
    fn empty_cycle_cannot_start() {
        assert!(ActiveProgram::start(&Program::new("Broken", vec![])).is_none());
    }

    #[test]
    fn unknown_program_is_rejected_without_mutation() {
        let mut coordinator = SwitchCoordinator::new();
        let result = coordinator.request("Weekend", &programs(), &day(), 5, &Timings::default());

        assert_eq!(
            result,
            Err(SwitchError::UnknownProgram {
                name: "Weekend".to_string()
            })
        );
        assert!(coordinator.pending().is_none());
    }

    #[test]
    fn current_program_is_rejected_and_keeps_pending() {
        let mut coordinator = SwitchCoordinator::new();
        coordinator
            .request("Night", &programs(), &day(), 5, &Timings::default())
            .unwrap();
        let before = coordinator.pending().cloned();

        let result = coordinator.request("Day", &programs(), &day(), 6, &Timings::default());

        assert!(matches!(result, Err(SwitchError::NoOpSwitch { .. })));
        assert_eq!(coordinator.pending().cloned(), before);
    }

    #[test]
    fn advisory_depends_on_window() {
        let timings = Timings::default();
        let mut coordinator = SwitchCoordinator::new();

        let early = coordinator
            .request("Night", &programs(), &day(), 10, &timings)
            .unwrap();
        assert_eq!(
            early,
            SwitchOutcome::Queued {
                target: "Night".to_string(),
                window_opens_in: 44,
            }
        );

        let late = coordinator
            .request("Night", &programs(), &day(), 56, &timings)
            .unwrap();
        assert_eq!(
            late,
            SwitchOutcome::WillApplyAtBoundary {
                target: "Night".to_string(),
                switches_in: 4,
            }
        );
        assert_eq!(
            late.to_string(),
            "switch to 'Night' will occur at end of stage in 4s"
        );
    }

    #[test]
    fn request_at_window_start_is_inside_window() {
        let mut coordinator = SwitchCoordinator::new();
        let outcome = coordinator
            .request("Night", &programs(), &day(), 54, &Timings::default())
            .unwrap();
        assert!(matches!(outcome, SwitchOutcome::WillApplyAtBoundary { switches_in: 6, .. }));
    }

    #[test]
    fn later_request_replaces_pending() {
        let mut coordinator = SwitchCoordinator::new();
        coordinator
            .request("Night", &programs(), &day(), 5, &Timings::default())
            .unwrap();
        coordinator
            .request("Broken", &programs(), &day(), 7, &Timings::default())
            .unwrap();

        assert_eq!(
            coordinator.pending(),
            Some(&PendingSwitch {
                target: "Broken".to_string(),
                requested_at: 7,
            })
        );
    }

    #[test]
    fn apply_replaces_active_program_atomically() {
        let mut coordinator = SwitchCoordinator::new();
        let mut active = day();
        active.commit(2);
        coordinator
            .request("Night", &programs(), &active, 20, &Timings::default())
            .unwrap();

        let applied = coordinator.apply_if_pending(&programs(), &mut active);

        assert_eq!(
            applied,
            Some(AppliedSwitch {
                from: "Day".to_string(),
                to: "Night".to_string(),
                requested_at: 20,
            })
        );
        assert_eq!(active.name(), "Night");
        assert_eq!(active.sequence(), &[2, 0]);
        assert_eq!(active.position(), 0);
        assert!(coordinator.pending().is_none());
    }

    #[test]
    fn apply_without_pending_is_a_no_op() {
        let mut coordinator = SwitchCoordinator::new();
        let mut active = day();
        assert!(coordinator.apply_if_pending(&programs(), &mut active).is_none());
        assert_eq!(active, day());
    }

    #[test]
    fn pending_switch_to_empty_cycle_is_dropped() {
        let mut coordinator = SwitchCoordinator::new();
        let mut active = day();
        coordinator
            .request("Broken", &programs(), &active, 5, &Timings::default())
            .unwrap();

        assert!(coordinator.apply_if_pending(&programs(), &mut active).is_none());
        assert_eq!(active.name(), "Day");
        assert!(coordinator.pending().is_none());
    }
}
