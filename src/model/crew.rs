//! Crews: cockpit layout, members, skills and crew-wide state

use serde::Serialize;
use std::collections::BTreeMap;

use super::options::OptionSet;
use crate::core::types::NO_EXTERNAL_ID;

/// Cockpit layout, deciding how many member slots a crew has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum CrewType {
    #[default]
    Single,
    Dual,
    CommandConsole,
    Tripod,
    SuperheavyTripod,
    QuadVee,
    /// Land-air mech pilot, carrying a second aerospace skill set
    LamPilot,
}

impl CrewType {
    pub const ALL: [CrewType; 7] = [
        CrewType::Single,
        CrewType::Dual,
        CrewType::CommandConsole,
        CrewType::Tripod,
        CrewType::SuperheavyTripod,
        CrewType::QuadVee,
        CrewType::LamPilot,
    ];

    pub fn slot_count(&self) -> usize {
        self.roles().len()
    }

    pub fn roles(&self) -> &'static [&'static str] {
        match self {
            CrewType::Single | CrewType::LamPilot => &["Pilot"],
            CrewType::Dual | CrewType::QuadVee => &["Pilot", "Gunner"],
            CrewType::CommandConsole => &["Pilot", "Commander"],
            CrewType::Tripod | CrewType::SuperheavyTripod => &["Pilot", "Gunner", "Tech Officer"],
        }
    }

    pub fn role_name(&self, slot: usize) -> &'static str {
        self.roles().get(slot).copied().unwrap_or("Crew")
    }

    pub fn name(&self) -> &'static str {
        match self {
            CrewType::Single => "Single",
            CrewType::Dual => "Dual",
            CrewType::CommandConsole => "Command Console",
            CrewType::Tripod => "Tripod",
            CrewType::SuperheavyTripod => "Superheavy Tripod",
            CrewType::QuadVee => "QuadVee",
            CrewType::LamPilot => "LAM Pilot",
        }
    }

    /// Case-insensitive match on the display name, ignoring spaces and underscores
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = squash(name);
        Self::ALL.into_iter().find(|t| squash(t.name()) == wanted)
    }
}

fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Gender {
    Male,
    Female,
    OtherMale,
    OtherFemale,
    #[default]
    Randomize,
}

impl Gender {
    /// Parse a saved gender: enum names or the legacy numeric codes
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_uppercase().as_str() {
            "MALE" | "0" => Some(Gender::Male),
            "FEMALE" | "1" => Some(Gender::Female),
            "OTHER_MALE" => Some(Gender::OtherMale),
            "OTHER_FEMALE" => Some(Gender::OtherFemale),
            "RANDOMIZE" | "2" => Some(Gender::Randomize),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Portrait {
    pub category: String,
    pub file: String,
}

/// One seat of a crew
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrewMember {
    pub gunnery: i32,
    pub gunnery_l: i32,
    pub gunnery_m: i32,
    pub gunnery_b: i32,
    pub piloting: i32,
    pub artillery: i32,
    pub toughness: i32,

    pub name: String,
    pub nickname: String,
    pub gender: Gender,
    pub portrait: Portrait,

    pub hits: i32,
    pub dead: bool,
    /// Seat is empty
    pub missing: bool,

    pub external_id: String,
    pub extra_data: BTreeMap<String, String>,
}

impl Default for CrewMember {
    fn default() -> Self {
        Self {
            gunnery: 4,
            gunnery_l: 4,
            gunnery_m: 4,
            gunnery_b: 4,
            piloting: 5,
            artillery: 4,
            toughness: 0,
            name: "Unnamed".to_string(),
            nickname: String::new(),
            gender: Gender::default(),
            portrait: Portrait::default(),
            hits: 0,
            dead: false,
            missing: false,
            external_id: NO_EXTERNAL_ID.to_string(),
            extra_data: BTreeMap::new(),
        }
    }
}

/// Second skill set used by a land-air mech pilot while flying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AeroSkills {
    pub gunnery: i32,
    pub gunnery_l: i32,
    pub gunnery_m: i32,
    pub gunnery_b: i32,
    pub piloting: i32,
}

impl From<&CrewMember> for AeroSkills {
    fn from(m: &CrewMember) -> Self {
        Self {
            gunnery: m.gunnery,
            gunnery_l: m.gunnery_l,
            gunnery_m: m.gunnery_m,
            gunnery_b: m.gunnery_b,
            piloting: m.piloting,
        }
    }
}

/// Everyone aboard one unit, or a dismounted pilot record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Crew {
    pub crew_type: CrewType,
    pub members: Vec<CrewMember>,
    pub size: i32,
    pub current_size: i32,
    pub init_bonus: i32,
    pub command_bonus: i32,
    pub ejected: bool,
    /// Pilot abilities, edge triggers and implants
    pub options: OptionSet,
    pub aero: Option<AeroSkills>,
}

impl Crew {
    pub fn new(crew_type: CrewType) -> Self {
        let size = crew_type.slot_count() as i32;
        Self {
            crew_type,
            members: vec![CrewMember::default(); crew_type.slot_count()],
            size,
            current_size: size,
            init_bonus: 0,
            command_bonus: 0,
            ejected: false,
            options: OptionSet::new(),
            aero: None,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.members.len()
    }

    pub fn member(&self, slot: usize) -> Option<&CrewMember> {
        self.members.get(slot)
    }

    pub fn member_mut(&mut self, slot: usize) -> Option<&mut CrewMember> {
        self.members.get_mut(slot)
    }

    /// "Name (Role)" for multi-seat crews, the bare name otherwise
    pub fn name_and_role(&self, slot: usize) -> String {
        let name = self.members.get(slot).map_or("Unnamed", |m| m.name.as_str());
        if self.slot_count() > 1 {
            format!("{} ({})", name, self.crew_type.role_name(slot))
        } else {
            name.to_string()
        }
    }

    /// True when every seat is empty or dead
    pub fn is_dead(&self) -> bool {
        self.members.iter().all(|m| m.missing || m.dead)
    }
}
