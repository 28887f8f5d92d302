//! Placed equipment and critical slots

use serde::Serialize;
use std::sync::Arc;

use super::equipment::EquipmentType;
use super::options::OptionSet;
use crate::core::types::MountId;

/// Battle armor squads field at most six troopers
pub const MAX_TROOPERS: usize = 6;

/// A placed instance of an equipment type
#[derive(Debug, Clone, Serialize)]
pub struct Mount {
    pub equipment: Arc<EquipmentType>,
    pub location: usize,
    pub rear_mounted: bool,

    pub hit: bool,
    pub destroyed: bool,
    pub breached: bool,
    pub missing: bool,
    pub repairable: bool,
    pub rapid_fire: bool,

    /// Ammo only
    pub shots_left: i32,
    pub original_shots: i32,
    pub ammo_capacity: f64,

    /// Weapon → ammo feed, or AP mount ↔ AP weapon
    pub linked: Option<MountId>,
    pub quirks: OptionSet,
    /// Per-trooper missing flags for squad equipment, trooper 1 first
    pub trooper_missing: [bool; MAX_TROOPERS],

    /// Weapon bays only: ammo mounts feeding the bay
    pub bay_ammo: Vec<MountId>,
    /// Battle armor body position (left arm, right arm, body...)
    pub ba_mount_loc: Option<i32>,
    /// Weapon carried on an anti-personnel mount
    pub apm_mounted: bool,
}

impl Mount {
    pub fn new(equipment: Arc<EquipmentType>, location: usize, rear_mounted: bool) -> Self {
        let (shots, capacity) = match equipment.ammo() {
            Some(ammo) => (ammo.shots, equipment.tonnage),
            None => (0, 0.0),
        };
        Self {
            equipment,
            location,
            rear_mounted,
            hit: false,
            destroyed: false,
            breached: false,
            missing: false,
            repairable: true,
            rapid_fire: false,
            shots_left: shots,
            original_shots: shots,
            ammo_capacity: capacity,
            linked: None,
            quirks: OptionSet::new(),
            trooper_missing: [false; MAX_TROOPERS],
            bay_ammo: Vec::new(),
            ba_mount_loc: None,
            apm_mounted: false,
        }
    }

    pub fn is_ammo(&self) -> bool {
        self.equipment.is_ammo()
    }

    pub fn internal_name(&self) -> &str {
        &self.equipment.internal_name
    }

    /// Swap the loaded munition, keeping shot counts
    pub fn change_ammo_type(&mut self, ammo: Arc<EquipmentType>) {
        self.equipment = ammo;
    }

    /// Set shots remaining, never above the mount's original load
    pub fn set_shots_left(&mut self, shots: i32) -> i32 {
        self.shots_left = shots.clamp(0, self.original_shots.max(0));
        self.shots_left
    }

    pub fn add_ammo_to_bay(&mut self, ammo: MountId) {
        if !self.bay_ammo.contains(&ammo) {
            self.bay_ammo.push(ammo);
        }
    }
}

/// What occupies a critical slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SlotContent {
    /// Fixed system (engine, gyro, actuator...), never reassignable
    System(String),
    Equipment(MountId),
}

/// One critical slot of a location
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriticalSlot {
    pub content: SlotContent,
    pub hit: bool,
    pub destroyed: bool,
    pub repairable: bool,
    pub breached: bool,
    pub missing: bool,
}

impl CriticalSlot {
    fn with(content: SlotContent) -> Self {
        Self {
            content,
            hit: false,
            destroyed: false,
            repairable: true,
            breached: false,
            missing: false,
        }
    }

    pub fn system(name: impl Into<String>) -> Self {
        Self::with(SlotContent::System(name.into()))
    }

    pub fn equipment(mount: MountId) -> Self {
        Self::with(SlotContent::Equipment(mount))
    }

    pub fn is_system(&self) -> bool {
        matches!(self.content, SlotContent::System(_))
    }

    pub fn mount(&self) -> Option<MountId> {
        match self.content {
            SlotContent::Equipment(id) => Some(id),
            SlotContent::System(_) => None,
        }
    }
}
