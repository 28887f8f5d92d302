//! Known option names: unit quirks, weapon quirks, pilot abilities, edge triggers, implants

use ahash::AHashSet;
use serde::Deserialize;
use std::path::Path;

use super::CatalogError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionCategory {
    UnitQuirk,
    WeaponQuirk,
    PilotAbility,
    EdgeTrigger,
    Implant,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct OptionFile {
    unit_quirks: Vec<String>,
    weapon_quirks: Vec<String>,
    pilot_abilities: Vec<String>,
    edge_triggers: Vec<String>,
    implants: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct OptionCatalog {
    unit_quirks: AHashSet<String>,
    weapon_quirks: AHashSet<String>,
    pilot_abilities: AHashSet<String>,
    edge_triggers: AHashSet<String>,
    implants: AHashSet<String>,
}

impl Default for OptionCatalog {
    fn default() -> Self {
        Self::from_file(OptionFile {
            unit_quirks: names(&[
                "command_mech",
                "battle_computer",
                "improved_sensors",
                "easy_maintain",
                "cramped_cockpit",
                "hard_pilot",
                "poor_performance",
                "rugged_1",
                "ubiquitous_is",
                "anti_air",
            ]),
            weapon_quirks: names(&[
                "accurate",
                "inaccurate",
                "imp_cooling",
                "poor_cooling",
                "no_cooling",
                "stable_weapon",
                "ammo_feed_problem",
                "jettison_capable",
            ]),
            pilot_abilities: names(&[
                "weapon_specialist",
                "gunnery_laser",
                "gunnery_missile",
                "gunnery_ballistic",
                "specialist",
                "maneuvering_ace",
                "melee_specialist",
                "jumping_jack",
                "hot_dog",
                "iron_man",
                "dodge_maneuver",
                "tm_forest_ranger",
            ]),
            edge_triggers: names(&[
                "edge_when_headhit",
                "edge_when_tac",
                "edge_when_ko",
                "edge_when_explosion",
                "edge_when_masc_fails",
            ]),
            implants: names(&[
                "vdni",
                "bvdni",
                "pain_shunt",
                "comm_implant",
                "cyber_eye_im",
                "cyber_eye_tele",
            ]),
        })
    }
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl OptionCatalog {
    fn from_file(file: OptionFile) -> Self {
        let set = |v: Vec<String>| v.into_iter().collect::<AHashSet<_>>();
        Self {
            unit_quirks: set(file.unit_quirks),
            weapon_quirks: set(file.weapon_quirks),
            pilot_abilities: set(file.pilot_abilities),
            edge_triggers: set(file.edge_triggers),
            implants: set(file.implants),
        }
    }

    /// Parse a catalog from TOML. Categories missing from the text are empty.
    pub fn from_toml_str(text: &str) -> Result<Self, CatalogError> {
        let file: OptionFile =
            toml::from_str(text).map_err(|e| CatalogError::ParseError(e.to_string()))?;
        Ok(Self::from_file(file))
    }

    pub fn load_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
            .map_err(|e| CatalogError::ParseError(format!("{}: {}", path.display(), e)))
    }

    fn set(&self, category: OptionCategory) -> &AHashSet<String> {
        match category {
            OptionCategory::UnitQuirk => &self.unit_quirks,
            OptionCategory::WeaponQuirk => &self.weapon_quirks,
            OptionCategory::PilotAbility => &self.pilot_abilities,
            OptionCategory::EdgeTrigger => &self.edge_triggers,
            OptionCategory::Implant => &self.implants,
        }
    }

    pub fn knows(&self, category: OptionCategory, name: &str) -> bool {
        self.set(category).contains(name)
    }
}
