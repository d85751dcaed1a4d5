//! Signal programs and the program catalog.

use crate::core::SignalGroupId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named, ordered cycle of stages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub name: String,
    /// Positions in the stage catalog, visited in order and then repeated.
    pub stage_cycle: Vec<usize>,
    /// Advisory green onset offset per signal group, in seconds.
    ///
    /// Descriptive only; never used to time the controller.
    #[serde(default)]
    pub green_onsets: BTreeMap<SignalGroupId, u32>,
}

impl Program {
    pub fn new(name: impl Into<String>, stage_cycle: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            stage_cycle,
            green_onsets: BTreeMap::new(),
        }
    }

    pub fn with_green_onset(mut self, group: impl Into<SignalGroupId>, seconds: u32) -> Self {
        self.green_onsets.insert(group.into(), seconds);
        self
    }
}

/// Programs known to the installation, in the order they were loaded.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgramCatalog {
    programs: Vec<Program>,
}

impl ProgramCatalog {
    pub fn new(programs: Vec<Program>) -> Self {
        Self { programs }
    }

    pub fn get(&self, name: &str) -> Option<&Program> {
        self.programs.iter().find(|program| program.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn first(&self) -> Option<&Program> {
        self.programs.first()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.programs.iter().map(|program| program.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Program> {
        self.programs.iter()
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}

impl FromIterator<Program> for ProgramCatalog {
    fn from_iter<I: IntoIterator<Item = Program>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_preserve_load_order() {
        let catalog = ProgramCatalog::new(vec![
            Program::new("Night", vec![0, 1]),
            Program::new("Day", vec![0, 1, 2]),
        ]);
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(names, vec!["Night", "Day"]);
        assert_eq!(catalog.first().map(|p| p.name.as_str()), Some("Night"));
    }

    #[test]
    fn lookup_by_name() {
        let catalog: ProgramCatalog = vec![Program::new("Day", vec![2, 0])].into_iter().collect();
        assert!(catalog.contains("Day"));
        assert!(!catalog.contains("day"));
        assert_eq!(catalog.get("Day").unwrap().stage_cycle, vec![2, 0]);
    }

    #[test]
    fn green_onsets_default_to_empty() {
        let json = r#"[{"name":"Peak","stage_cycle":[0,1]}]"#;
        let catalog: ProgramCatalog = serde_json::from_str(json).unwrap();
        assert!(catalog.get("Peak").unwrap().green_onsets.is_empty());
    }

    #[test]
    fn green_onsets_are_recorded() {
        let program = Program::new("Peak", vec![0]).with_green_onset("K1", 12);
        assert_eq!(program.green_onsets.get(&SignalGroupId::from("K1")), Some(&12));
    }
}
