//! Capability sub-systems carried only by the unit kinds that have them
//!
//! A unit holds each of these as an `Option`. Code that restores state for a
//! system checks for the capability instead of asking what kind the unit is.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::types::OffBoardDirection;

/// Ground vehicle motive, turret and crew-compartment state
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct VehicleSystems {
    pub motive_damage: i32,
    pub motive_penalty: i32,
    /// Immobilizing damage taken but not yet applied
    pub immobile_hit: bool,
    pub immobile: bool,
    pub turret_locked: bool,
    pub turret2_locked: bool,
    pub dual_turret_offset: i32,
    pub sensor_hits: i32,
    pub engine_hit: bool,
    pub driver_hit: bool,
    pub commander_hit: bool,
    pub console_commander_hit: bool,
}

impl VehicleSystems {
    pub fn immobilize(&mut self) {
        self.immobile_hit = true;
    }

    pub fn engine_hit(&mut self) {
        self.engine_hit = true;
        self.immobilize();
    }

    /// Commit pending damage effects
    pub fn apply_damage(&mut self) {
        self.immobile |= self.immobile_hit;
    }
}

/// Aerospace structure, heat, fuel, flight and critical-hit counters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AeroSystems {
    pub structural_integrity: i32,
    pub original_structural_integrity: i32,
    pub heat_sinks: i32,
    pub fuel: i32,

    pub avionics_hits: i32,
    pub sensor_hits: i32,
    pub engine_hits: i32,
    pub fcs_hits: i32,
    pub cic_hits: i32,
    pub left_thrust_hits: i32,
    pub right_thrust_hits: i32,
    pub life_support: bool,
    pub gear_hit: bool,

    pub current_velocity: i32,
    pub next_velocity: i32,
    pub altitude: i32,
    pub landed: bool,
}

impl AeroSystems {
    pub fn new(structural_integrity: i32, heat_sinks: i32, fuel: i32) -> Self {
        Self {
            structural_integrity,
            original_structural_integrity: structural_integrity,
            heat_sinks,
            fuel,
            avionics_hits: 0,
            sensor_hits: 0,
            engine_hits: 0,
            fcs_hits: 0,
            cic_hits: 0,
            left_thrust_hits: 0,
            right_thrust_hits: 0,
            life_support: true,
            gear_hit: false,
            current_velocity: 0,
            next_velocity: 0,
            altitude: 0,
            landed: true,
        }
    }

    pub fn land(&mut self) {
        self.altitude = 0;
        self.landed = true;
    }

    pub fn lift_off(&mut self, altitude: i32) {
        self.altitude = altitude;
        self.landed = false;
    }
}

/// Jump-capable large craft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct JumpDrive {
    pub kf_integrity: i32,
    pub sail_integrity: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DropshipSystems {
    pub docking_collar_damaged: bool,
    pub kf_boom_damaged: bool,
}

/// External ordnance that can be carried on bomb hardpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum BombType {
    HighExplosive,
    Cluster,
    LaserGuided,
    RocketLauncher,
    Tag,
    AirToAirArrow,
    AntiShip,
    AntiShipEw,
    ArrowIv,
    Inferno,
    Thunder,
    Torpedo,
    Alamo,
    FuelAirSmall,
    FuelAirLarge,
}

impl BombType {
    const NAMES: [(&'static str, BombType); 15] = [
        ("HEBomb", BombType::HighExplosive),
        ("ClusterBomb", BombType::Cluster),
        ("LGBomb", BombType::LaserGuided),
        ("RLBomb", BombType::RocketLauncher),
        ("TAGBomb", BombType::Tag),
        ("AAAMissile Ammo", BombType::AirToAirArrow),
        ("ASMissile Ammo", BombType::AntiShip),
        ("ASEWMissile Ammo", BombType::AntiShipEw),
        ("ArrowIVMissile Ammo", BombType::ArrowIv),
        ("InfernoBomb", BombType::Inferno),
        ("ThunderBomb", BombType::Thunder),
        ("TorpedoBomb", BombType::Torpedo),
        ("AlamoMissile Ammo", BombType::Alamo),
        ("FABombSmall Ammo", BombType::FuelAirSmall),
        ("FABombLarge Ammo", BombType::FuelAirLarge),
    ];

    pub fn from_internal_name(name: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, t)| *t)
    }

    pub fn internal_name(&self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(_, t)| t == self)
            .map_or("", |(n, _)| n)
    }
}

/// Bomb loadout chosen for a bomber
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct BombBay {
    pub choices: BTreeMap<BombType, i32>,
}

impl BombBay {
    pub fn add(&mut self, bomb: BombType, load: i32) {
        *self.choices.entry(bomb).or_insert(0) += load;
    }

    pub fn count(&self, bomb: BombType) -> i32 {
        self.choices.get(&bomb).copied().unwrap_or(0)
    }
}

/// Conventional infantry platoon composition and protection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfantrySquad {
    pub squad_size: i32,
    pub squad_count: i32,
    pub men: i32,
    pub armor_divisor: f64,
    pub armor_encumbering: bool,
    pub spacesuit: bool,
    pub dest_armor: bool,
    pub sneak_camo: bool,
    pub sneak_ir: bool,
    pub sneak_ecm: bool,
    pub specializations: i32,
}

impl InfantrySquad {
    pub fn new(squad_size: i32, squad_count: i32) -> Self {
        Self {
            squad_size,
            squad_count,
            men: squad_size * squad_count,
            armor_divisor: 1.0,
            armor_encumbering: false,
            spacesuit: false,
            dest_armor: false,
            sneak_camo: false,
            sneak_ir: false,
            sneak_ecm: false,
            specializations: 0,
        }
    }

    /// Re-derive the trooper count from the squad layout
    pub fn auto_set_men(&mut self) -> i32 {
        self.men = self.squad_size * self.squad_count;
        self.men
    }
}

/// Mech pilot ejection settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ejection {
    pub auto_eject: bool,
    pub on_ammo_explosion: bool,
    pub on_engine_crit: bool,
    pub on_ct_destroyed: bool,
    pub on_head_shot: bool,
}

impl Default for Ejection {
    fn default() -> Self {
        Self {
            auto_eject: true,
            on_ammo_explosion: false,
            on_engine_crit: false,
            on_ct_destroyed: false,
            on_head_shot: false,
        }
    }
}

/// Escape craft launched and people picked up, by unit id
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct EscapeLedger {
    pub launched_craft: Vec<String>,
    pub passengers: BTreeMap<String, i32>,
    pub crew: BTreeMap<String, i32>,
}

/// Size of every C3i and naval C3 network
pub const C3_NETWORK_SIZE: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct C3Links {
    pub master_is: Option<String>,
    pub uuid: Option<String>,
    pub c3i: [Option<String>; C3_NETWORK_SIZE],
    pub nc3: [Option<String>; C3_NETWORK_SIZE],
}

impl C3Links {
    /// Put `partner` in the first free slot. Returns the slot, or `None` when full.
    pub fn link_c3i(&mut self, partner: &str) -> Option<usize> {
        Self::link(&mut self.c3i, partner)
    }

    pub fn link_nc3(&mut self, partner: &str) -> Option<usize> {
        Self::link(&mut self.nc3, partner)
    }

    fn link(slots: &mut [Option<String>; C3_NETWORK_SIZE], partner: &str) -> Option<usize> {
        let pos = slots.iter().position(Option::is_none)?;
        slots[pos] = Some(partner.to_string());
        Some(pos)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OffBoard {
    pub distance: i32,
    pub direction: OffBoardDirection,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Camouflage {
    pub category: String,
    pub file: String,
}
