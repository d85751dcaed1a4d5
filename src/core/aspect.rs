//! Signal aspects and the live aspect map.

use crate::state_enum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

state_enum! {
    /// Displayed state of a single signal group.
    pub enum Aspect {
        /// Switched off. Also the aspect assumed for a group a stage does not mention.
        Dark,
        Red,
        Yellow,
        RedYellow,
        Green,
    }
}

/// Identifier of one independently controlled signal group.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignalGroupId(String);

impl SignalGroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SignalGroupId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SignalGroupId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for SignalGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single observable aspect change produced by a tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectChange {
    pub group: SignalGroupId,
    pub from: Aspect,
    pub to: Aspect,
}

/// Aspect currently shown by every signal group.
///
/// Writes go through [`AspectMap::set`], which reports a change only when
/// the displayed aspect actually differs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AspectMap(BTreeMap<SignalGroupId, Aspect>);

impl AspectMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aspect of `group`, or `Dark` when the group is unknown.
    pub fn get(&self, group: &SignalGroupId) -> Aspect {
        self.0.get(group).copied().unwrap_or(Aspect::Dark)
    }

    /// Set the aspect of `group`, returning the change if there was one.
    pub fn set(&mut self, group: &SignalGroupId, aspect: Aspect) -> Option<AspectChange> {
        let previous = self.0.insert(group.clone(), aspect);
        match previous {
            Some(from) if from == aspect => None,
            previous => Some(AspectChange {
                group: group.clone(),
                from: previous.unwrap_or(Aspect::Dark),
                to: aspect,
            }),
        }
    }

    pub fn groups(&self) -> impl Iterator<Item = &SignalGroupId> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SignalGroupId, Aspect)> {
        self.0.iter().map(|(group, aspect)| (group, *aspect))
    }

    /// Groups currently showing `aspect`.
    pub fn showing(&self, aspect: Aspect) -> impl Iterator<Item = &SignalGroupId> + '_ {
        self.iter()
            .filter(move |(_, current)| *current == aspect)
            .map(|(group, _)| group)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(SignalGroupId, Aspect)> for AspectMap {
    fn from_iter<I: IntoIterator<Item = (SignalGroupId, Aspect)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
