//! Result of reading one unit-list document

use serde::Serialize;
use std::collections::BTreeMap;

use super::diagnostics::Diagnostics;
use crate::model::{Crew, Unit, UnitKind};

/// Named unit collections of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Collection {
    Primary,
    Survivors,
    Allies,
    Salvage,
    Retreated,
    Devastated,
}

impl Collection {
    pub const ALL: [Collection; 6] = [
        Collection::Primary,
        Collection::Survivors,
        Collection::Allies,
        Collection::Salvage,
        Collection::Retreated,
        Collection::Devastated,
    ];

    /// Container tag holding this collection inside a record
    pub fn tag(&self) -> &'static str {
        match self {
            Collection::Primary => "unit",
            Collection::Survivors => "survivors",
            Collection::Allies => "allies",
            Collection::Salvage => "salvage",
            Collection::Retreated => "retreated",
            Collection::Devastated => "devastated",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.tag().eq_ignore_ascii_case(tag))
    }
}

/// Everything restored from one document
#[derive(Debug, Default, Serialize)]
pub struct Roster {
    pub units: Vec<Unit>,
    pub survivors: Vec<Unit>,
    pub allies: Vec<Unit>,
    pub salvage: Vec<Unit>,
    pub retreated: Vec<Unit>,
    pub devastated: Vec<Unit>,
    /// Crews read outside of any unit
    pub pilots: Vec<Crew>,
    /// Killed unit external id → killer external id
    pub kills: BTreeMap<String, String>,
    pub diagnostics: Diagnostics,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collection(&self, which: Collection) -> &[Unit] {
        match which {
            Collection::Primary => &self.units,
            Collection::Survivors => &self.survivors,
            Collection::Allies => &self.allies,
            Collection::Salvage => &self.salvage,
            Collection::Retreated => &self.retreated,
            Collection::Devastated => &self.devastated,
        }
    }

    pub fn collection_mut(&mut self, which: Collection) -> &mut Vec<Unit> {
        match which {
            Collection::Primary => &mut self.units,
            Collection::Survivors => &mut self.survivors,
            Collection::Allies => &mut self.allies,
            Collection::Salvage => &mut self.salvage,
            Collection::Retreated => &mut self.retreated,
            Collection::Devastated => &mut self.devastated,
        }
    }

    /// Units to field: the primary collection plus surviving units that are not ejected crew
    pub fn entities(&self) -> Vec<&Unit> {
        self.units
            .iter()
            .chain(self.survivors.iter().filter(|u| u.kind != UnitKind::EjectedCrew))
            .collect()
    }

    /// Units across all six collections
    pub fn unit_count(&self) -> usize {
        Collection::ALL.iter().map(|c| self.collection(*c).len()).sum()
    }

    pub fn has_warnings(&self) -> bool {
        self.diagnostics.has_warnings()
    }

    pub fn warning_text(&self) -> String {
        self.diagnostics.warning_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_tags() {
        assert_eq!(Collection::from_tag("SALVAGE"), Some(Collection::Salvage));
        assert_eq!(Collection::from_tag("kills"), None);
    }

    #[test]
    fn test_entities_skip_ejected_survivors() {
        let mut roster = Roster::new();
        roster.units.push(Unit::new("Locust", "LCT-1V", UnitKind::Mech));
        roster.survivors.push(Unit::ejected_crew("Vehicle Crew"));
        roster.survivors.push(Unit::mechwarrior("MechWarrior"));
        roster.salvage.push(Unit::new("Wasp", "WSP-1A", UnitKind::Mech));

        assert_eq!(roster.entities().len(), 2);
        assert_eq!(roster.unit_count(), 4);
    }
}
