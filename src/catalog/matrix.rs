//! Intergreen (clearance time) matrix.

use crate::core::SignalGroupId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sparse map from (clearing group, entering group) to clearance seconds.
///
/// An absent pair means "no known conflict". It does NOT mean the pair has
/// been verified safe: operators maintaining the matrix must list every
/// conflicting pair explicitly, because the controller only enforces its
/// all-red safety floor for pairs that are missing.
///
/// Serialized as a nested object keyed by clearing group, then entering group.
///
/// # Example
///
/// ```rust
/// use interstage::catalog::IntergreenMatrix;
///
/// let matrix = IntergreenMatrix::new().with("K1", "K2", 4);
/// assert_eq!(matrix.get(&"K1".into(), &"K2".into()), Some(4));
/// assert_eq!(matrix.get(&"K2".into(), &"K1".into()), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntergreenMatrix {
    entries: BTreeMap<SignalGroupId, BTreeMap<SignalGroupId, u32>>,
}

impl IntergreenMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        clearing: impl Into<SignalGroupId>,
        entering: impl Into<SignalGroupId>,
        seconds: u32,
    ) {
        self.entries
            .entry(clearing.into())
            .or_default()
            .insert(entering.into(), seconds);
    }

    pub fn with(
        mut self,
        clearing: impl Into<SignalGroupId>,
        entering: impl Into<SignalGroupId>,
        seconds: u32,
    ) -> Self {
        self.insert(clearing, entering, seconds);
        self
    }

    /// Clearance time from `clearing` losing green to `entering` gaining green.
    pub fn get(&self, clearing: &SignalGroupId, entering: &SignalGroupId) -> Option<u32> {
        self.entries
            .get(clearing)
            .and_then(|row| row.get(entering))
            .copied()
    }

    /// Every explicit entry as (clearing, entering, seconds).
    pub fn entries(&self) -> impl Iterator<Item = (&SignalGroupId, &SignalGroupId, u32)> {
        self.entries.iter().flat_map(|(clearing, row)| {
            row.iter()
                .map(move |(entering, seconds)| (clearing, entering, *seconds))
        })
    }

    /// Whether the two groups are listed as conflicting, in either direction.
    pub fn conflicts(&self, a: &SignalGroupId, b: &SignalGroupId) -> bool {
        self.get(a, b).is_some() || self.get(b, a).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<(SignalGroupId, SignalGroupId, u32)> for IntergreenMatrix {
    fn from_iter<I: IntoIterator<Item = (SignalGroupId, SignalGroupId, u32)>>(iter: I) -> Self {
        let mut matrix = Self::new();
        for (clearing, entering, seconds) in iter {
            matrix.insert(clearing, entering, seconds);
        }
        matrix
    }
}
