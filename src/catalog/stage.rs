//! Stages and the stage catalog.

use crate::core::{Aspect, SignalGroupId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A fixed combination of required aspects across signal groups.
///
/// # Example
///
/// ```rust
/// use interstage::catalog::Stage;
/// use interstage::Aspect;
///
/// let stage = Stage::new(0, "North-South")
///     .with("K1", Aspect::Green)
///     .with("K2", Aspect::Red);
///
/// assert_eq!(stage.aspect_of(&"K1".into()), Aspect::Green);
/// assert_eq!(stage.aspect_of(&"K9".into()), Aspect::Dark);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub index: usize,
    pub name: String,
    pub aspects: BTreeMap<SignalGroupId, Aspect>,
}

impl Stage {
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            aspects: BTreeMap::new(),
        }
    }

    /// Add or replace the required aspect of `group`.
    pub fn with(mut self, group: impl Into<SignalGroupId>, aspect: Aspect) -> Self {
        self.aspects.insert(group.into(), aspect);
        self
    }

    /// Required aspect of `group`; groups the stage does not mention are `Dark`.
    pub fn aspect_of(&self, group: &SignalGroupId) -> Aspect {
        self.aspects.get(group).copied().unwrap_or(Aspect::Dark)
    }

    /// Groups whose required aspect is `aspect`.
    pub fn groups_with(&self, aspect: Aspect) -> impl Iterator<Item = &SignalGroupId> + '_ {
        self.aspects
            .iter()
            .filter(move |(_, required)| **required == aspect)
            .map(|(group, _)| group)
    }
}

/// Read-only, ordered list of every stage known to the installation.
///
/// Programs refer to stages by their position in this catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageCatalog {
    stages: Vec<Stage>,
}

impl StageCatalog {
    pub fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    pub fn get(&self, index: usize) -> Option<&Stage> {
        self.stages.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stage> {
        self.stages.iter()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Every signal group mentioned by at least one stage.
    pub fn signal_groups(&self) -> BTreeSet<SignalGroupId> {
        self.stages
            .iter()
            .flat_map(|stage| stage.aspects.keys().cloned())
            .collect()
    }
}

impl FromIterator<Stage> for StageCatalog {
    fn from_iter<I: IntoIterator<Item = Stage>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> StageCatalog {
        StageCatalog::new(vec![
            Stage::new(0, "Main")
                .with("K1", Aspect::Green)
                .with("K2", Aspect::Red),
            Stage::new(1, "Side")
                .with("K1", Aspect::Red)
                .with("K2", Aspect::Green)
                .with("F1", Aspect::Dark),
        ])
    }

    #[test]
    fn groups_with_filters_required_aspect() {
        let stage = Stage::new(0, "Main")
            .with("K1", Aspect::Green)
            .with("K2", Aspect::Red)
            .with("K3", Aspect::Green);

        let green: Vec<&str> = stage.groups_with(Aspect::Green).map(|g| g.as_str()).collect();
        assert_eq!(green, vec!["K1", "K3"]);
    }

    #[test]
    fn signal_groups_is_union_of_stages() {
        let groups: Vec<String> = catalog()
            .signal_groups()
            .into_iter()
            .map(|g| g.to_string())
            .collect();
        assert_eq!(groups, vec!["F1", "K1", "K2"]);
    }

    #[test]
    fn catalog_lookup_by_position() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(1).map(|s| s.name.as_str()), Some("Side"));
        assert!(catalog.get(2).is_none());
    }

    #[test]
    fn stage_deserializes_from_json() {
        let json = r#"{"index":0,"name":"Main","aspects":{"K1":"Green","K2":"Red"}}"#;
        let stage: Stage = serde_json::from_str(json).unwrap();
        assert_eq!(stage.aspect_of(&"K2".into()), Aspect::Red);
    }
}
