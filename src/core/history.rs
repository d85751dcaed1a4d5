//! Bounded history of state changes.
//!
//! The controller keeps a rolling record of mode changes so callers can
//! audit the order in which transition phases were visited.

use super::state::State;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of records a history retains.
pub const DEFAULT_HISTORY_LIMIT: usize = 256;

/// Record of a single state change.
///
/// # Example
///
/// ```rust
/// use interstage::core::StateTransition;
/// use interstage::Phase;
///
/// let transition = StateTransition {
///     from: Phase::Yellow,
///     to: Phase::AllRed,
///     tick: 63,
/// };
/// assert_eq!(transition.tick, 63);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The state being left
    pub from: S,
    /// The state being entered
    pub to: S,
    /// Controller tick on which the change happened
    pub tick: u64,
}

/// Ordered, bounded history of state changes.
///
/// History is immutable: `record` returns a new history with the change
/// appended, dropping the oldest record once the limit is reached.
///
/// # Example
///
/// ```rust
/// use interstage::core::{StateHistory, StateTransition};
/// use interstage::Phase;
///
/// let history = StateHistory::new()
///     .record(StateTransition { from: Phase::Yellow, to: Phase::AllRed, tick: 4 })
///     .record(StateTransition { from: Phase::AllRed, to: Phase::RedYellow, tick: 8 });
///
/// assert_eq!(
///     history.get_path(),
///     vec![&Phase::Yellow, &Phase::AllRed, &Phase::RedYellow]
/// );
/// assert_eq!(history.span(), Some(4));
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: VecDeque<StateTransition<S>>,
    limit: usize,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    /// Create an empty history holding at most [`DEFAULT_HISTORY_LIMIT`] records.
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// Create an empty history holding at most `limit` records.
    ///
    /// A limit of zero is treated as one.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            transitions: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// Record a change, returning a new history.
    pub fn record(&self, transition: StateTransition<S>) -> Self {
        let mut transitions = self.transitions.clone();
        if transitions.len() == self.limit {
            transitions.pop_front();
        }
        transitions.push_back(transition);
        Self {
            transitions,
            limit: self.limit,
        }
    }

    /// Get the path of states traversed.
    ///
    /// Returns the `from` state of the oldest retained record followed by the
    /// `to` state of every record.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Ticks elapsed between the oldest and newest retained record.
    pub fn span(&self) -> Option<u64> {
        match (self.transitions.front(), self.transitions.back()) {
            (Some(first), Some(last)) => Some(last.tick.saturating_sub(first.tick)),
            _ => None,
        }
    }

    /// Iterate over retained records, oldest first.
    pub fn transitions(&self) -> impl Iterator<Item = &StateTransition<S>> {
        self.transitions.iter()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
