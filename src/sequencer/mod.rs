//! The per-tick stage sequencer.
//!
//! [`Controller`] owns every piece of mutable controller state. It is driven
//! by calling [`Controller::tick`] once per simulated second; each call either
//! advances the running stage or the active transition and returns a
//! [`TickReport`] describing what changed.
//!
//! The controller is a plain value with no interior mutability and no
//! cross-thread primitives. `tick` and `request_program_switch` both take
//! `&mut self`, so callers are forced to serialize them.

mod report;

pub use report::{Mode, Notice, Snapshot, TickReport, TransitionSnapshot};

use crate::builder::{BuildError, ControllerBuilder};
use crate::catalog::Catalogs;
use crate::clearance::all_red_duration;
use crate::config::{ControllerConfig, SwitchContinuity};
use crate::core::{Aspect, AspectChange, AspectMap, StateHistory, StateTransition};
use crate::safety;
use crate::switch::{ActiveProgram, PendingSwitch, SwitchCoordinator, SwitchError, SwitchOutcome};
use crate::transition::{PhaseStep, TransitionMachine};
use tracing::{debug, error, info};

/// A traffic signal controller cycling through the stages of a program.
///
/// # Example
///
/// ```rust
/// use interstage::catalog::{IntergreenMatrix, Program, ProgramCatalog, Stage, StageCatalog};
/// use interstage::{Aspect, Controller, Mode};
///
/// let stages = StageCatalog::new(vec![
///     Stage::new(0, "Main").with("A", Aspect::Green).with("B", Aspect::Red),
///     Stage::new(1, "Side").with("A", Aspect::Red).with("B", Aspect::Green),
/// ]);
/// let programs = ProgramCatalog::new(vec![Program::new("Day", vec![0, 1])]);
///
/// let mut controller = Controller::builder()
///     .stages(stages)
///     .programs(programs)
///     .intergreens(IntergreenMatrix::new().with("A", "B", 4))
///     .build()
///     .unwrap();
///
/// for _ in 0..59 {
///     controller.tick();
/// }
/// let report = controller.tick();
/// assert_eq!(report.snapshot.mode(), Mode::Yellow);
/// assert_eq!(controller.current_aspects().get(&"A".into()), Aspect::Yellow);
/// ```
#[derive(Clone, Debug)]
pub struct Controller {
    catalogs: Catalogs,
    config: ControllerConfig,
    active: ActiveProgram,
    time_in_stage: u32,
    switch: SwitchCoordinator,
    transition: Option<TransitionMachine>,
    aspects: AspectMap,
    ticks: u64,
    history: StateHistory<Mode>,
}

impl Controller {
    /// Start building a controller.
    pub fn builder() -> ControllerBuilder {
        ControllerBuilder::new()
    }

    /// Create a controller running the first stage of `initial_program`, or
    /// of the first program in the catalog.
    ///
    /// Catalogs are assumed to have been validated.
    pub(crate) fn start(
        catalogs: Catalogs,
        config: ControllerConfig,
        initial_program: Option<&str>,
    ) -> Result<Self, BuildError> {
        let program = match initial_program {
            Some(name) => catalogs
                .programs
                .get(name)
                .ok_or_else(|| BuildError::UnknownInitialProgram(name.to_string()))?,
            None => catalogs.programs.first().ok_or(BuildError::MissingPrograms)?,
        };
        let active = ActiveProgram::start(program)
            .ok_or_else(|| BuildError::EmptyInitialCycle(program.name.clone()))?;

        let stage = catalogs.stages.get(active.current_stage());
        let aspects: AspectMap = catalogs
            .stages
            .signal_groups()
            .into_iter()
            .map(|group| {
                let aspect = stage.map_or(Aspect::Dark, |s| s.aspect_of(&group));
                (group, aspect)
            })
            .collect();

        info!(
            program = %active.name(),
            sequence = ?active.sequence(),
            stage = active.current_stage(),
            "controller started"
        );

        Ok(Self {
            history: StateHistory::with_limit(config.history_limit),
            catalogs,
            config,
            active,
            time_in_stage: 0,
            switch: SwitchCoordinator::new(),
            transition: None,
            aspects,
            ticks: 0,
        })
    }

    /// Advance simulated time by one second.
    pub fn tick(&mut self) -> TickReport {
        self.ticks += 1;
        let mut changes = Vec::new();
        let mut notices = Vec::new();

        if self.transition.is_some() {
            self.advance_transition(&mut changes, &mut notices);
        } else {
            self.advance_stage(&mut changes, &mut notices);
        }

        let phase = self.transition.as_ref().map(TransitionMachine::phase);
        let violations =
            safety::collect_violations(&self.aspects, phase, &self.catalogs.intergreens);
        for violation in &violations {
            error!(tick = self.ticks, %violation, "safety violation");
        }

        TickReport {
            tick: self.ticks,
            changes,
            notices,
            snapshot: self.snapshot(),
            violations,
        }
    }

    /// Ask for the running program to change at the next stage boundary.
    ///
    /// While a transition is in progress the advisory is computed against
    /// the stage about to start, whose elapsed time is zero.
    pub fn request_program_switch(&mut self, name: &str) -> Result<SwitchOutcome, SwitchError> {
        let elapsed = if self.transition.is_some() {
            0
        } else {
            self.time_in_stage
        };
        self.switch.request(
            name,
            &self.catalogs.programs,
            &self.active,
            elapsed,
            &self.config.timings,
        )
    }

    fn advance_stage(&mut self, changes: &mut Vec<AspectChange>, notices: &mut Vec<Notice>) {
        self.time_in_stage += 1;
        let stage_duration = self.config.timings.stage_duration;

        if self.time_in_stage == self.config.timings.switch_window_start() {
            if let Some(pending) = self.switch.pending() {
                let remaining = stage_duration.saturating_sub(self.time_in_stage);
                info!(program = %pending.target, remaining, "safe switching window open");
                notices.push(Notice::SwitchWindowOpen {
                    target: pending.target.clone(),
                    remaining,
                });
            }
        }

        if self.time_in_stage >= stage_duration {
            self.end_stage(changes, notices);
        }
    }

    fn end_stage(&mut self, changes: &mut Vec<AspectChange>, notices: &mut Vec<Notice>) {
        let live_stage = self.active.current_stage();
        let applied = self
            .switch
            .apply_if_pending(&self.catalogs.programs, &mut self.active);

        let (source_index, dest_position) = match (&applied, self.config.continuity) {
            (Some(_), SwitchContinuity::FromLiveStage) => (live_stage, 0),
            _ => (self.active.current_stage(), self.active.next_position()),
        };
        if let Some(applied) = applied {
            notices.push(Notice::ProgramSwitched(applied));
        }
        let dest_index = self.active.stage_at(dest_position);

        let stages = &self.catalogs.stages;
        let (Some(source), Some(dest)) = (
            stages.get(source_index).cloned(),
            stages.get(dest_index).cloned(),
        ) else {
            error!(
                source = source_index,
                dest = dest_index,
                "stage missing from catalog; restarting current stage"
            );
            self.time_in_stage = 0;
            return;
        };

        let timings = &self.config.timings;
        let all_red = all_red_duration(
            &source,
            &dest,
            &self.catalogs.intergreens,
            timings.all_red_floor,
        );
        info!(
            program = %self.active.name(),
            from = %source.name,
            to = %dest.name,
            all_red,
            "starting transition"
        );

        let machine = TransitionMachine::begin(
            source,
            dest,
            dest_position,
            timings,
            &mut self.aspects,
            changes,
        );
        self.transition = Some(machine);
        self.record(Mode::Running, Mode::Yellow);
        notices.push(Notice::TransitionStarted {
            from_stage: source_index,
            to_stage: dest_index,
            all_red,
        });
    }

    fn advance_transition(&mut self, changes: &mut Vec<AspectChange>, notices: &mut Vec<Notice>) {
        let Some(machine) = self.transition.as_mut() else {
            return;
        };
        let step = machine.step(
            &self.catalogs.intergreens,
            &self.config.timings,
            &mut self.aspects,
            changes,
        );

        match step {
            PhaseStep::Holding { .. } => {}
            PhaseStep::Entered { from, to, duration } => {
                debug!(phase = %to, duration, "transition phase entered");
                self.record(from.into(), to.into());
                notices.push(Notice::PhaseEntered {
                    phase: to,
                    duration,
                });
            }
            PhaseStep::Completed => self.commit(notices),
        }
    }

    fn commit(&mut self, notices: &mut Vec<Notice>) {
        let Some(machine) = self.transition.take() else {
            return;
        };
        self.active.commit(machine.dest_position());
        self.time_in_stage = 0;
        self.record(machine.phase().into(), Mode::Running);

        info!(
            program = %self.active.name(),
            stage = %machine.dest().name,
            position = self.active.position(),
            "stage change complete"
        );
        notices.push(Notice::StageCommitted {
            stage: self.active.current_stage(),
            position: self.active.position(),
        });
    }

    fn record(&mut self, from: Mode, to: Mode) {
        self.history = self.history.record(StateTransition {
            from,
            to,
            tick: self.ticks,
        });
    }

    /// Names of all programs, in catalog order.
    pub fn list_programs(&self) -> Vec<&str> {
        self.catalogs.programs.names().collect()
    }

    pub fn current_program(&self) -> &str {
        self.active.name()
    }

    /// The aspect every signal group is showing. Read-only.
    pub fn current_aspects(&self) -> &AspectMap {
        &self.aspects
    }

    pub fn active_program(&self) -> &ActiveProgram {
        &self.active
    }

    pub fn pending_switch(&self) -> Option<&PendingSwitch> {
        self.switch.pending()
    }

    pub fn transition(&self) -> Option<&TransitionMachine> {
        self.transition.as_ref()
    }

    pub fn time_in_stage(&self) -> u32 {
        self.time_in_stage
    }

    /// Ticks since the controller started.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Recent mode changes, oldest first.
    pub fn history(&self) -> &StateHistory<Mode> {
        &self.history
    }

    pub fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn snapshot(&self) -> Snapshot {
        let stage_index = self.active.current_stage();
        Snapshot {
            program: self.active.name().to_string(),
            stage_index,
            stage_name: self
                .catalogs
                .stages
                .get(stage_index)
                .map(|stage| stage.name.clone())
                .unwrap_or_default(),
            stage_position: self.active.position(),
            cycle_length: self.active.sequence().len(),
            time_in_stage: self.time_in_stage,
            stage_duration: self.config.timings.stage_duration,
            transition: self.transition.as_ref().map(|machine| TransitionSnapshot {
                phase: machine.phase(),
                remaining: machine.remaining(),
                from_stage: machine.source().index,
                to_stage: machine.dest().index,
            }),
            pending_switch: self.switch.pending().map(|p| p.target.clone()),
        }
    }
}
