//! The unit aggregate: locations, mounted equipment, crew and sub-systems

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use super::bay::Bay;
use super::crew::{Crew, CrewType};
use super::equipment::{EquipmentFlag, EquipmentType};
use super::location::{ArmorValue, Exposure, Location};
use super::mount::{CriticalSlot, Mount, SlotContent};
use super::options::OptionSet;
use super::systems::*;
use crate::core::types::{MountId, UnitId, NO_EXTERNAL_ID, START_NONE};

/// Errors from equipment placement
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EquipmentError {
    #[error("Location {location} has no room for {name}")]
    LocationFull { location: usize, name: String },

    #[error("Unit has no location {0}")]
    InvalidLocation(usize),
}

/// Closed set of unit kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Mech,
    LandAirMech,
    QuadVee,
    Tank,
    SupportTank,
    Vtol,
    GunEmplacement,
    Protomech,
    BattleArmor,
    Infantry,
    AeroFighter,
    ConventionalFighter,
    SmallCraft,
    Dropship,
    Jumpship,
    Warship,
    SpaceStation,
    EjectedCrew,
    MechWarrior,
    EscapePods,
}

impl UnitKind {
    pub fn is_mech(&self) -> bool {
        matches!(self, UnitKind::Mech | UnitKind::LandAirMech | UnitKind::QuadVee)
    }

    pub fn is_vehicle(&self) -> bool {
        matches!(
            self,
            UnitKind::Tank | UnitKind::SupportTank | UnitKind::Vtol | UnitKind::GunEmplacement
        )
    }

    pub fn is_support_vehicle(&self) -> bool {
        matches!(self, UnitKind::SupportTank)
    }

    /// Kinds with aerospace structure and flight state
    pub fn is_aero(&self) -> bool {
        matches!(
            self,
            UnitKind::AeroFighter
                | UnitKind::ConventionalFighter
                | UnitKind::LandAirMech
                | UnitKind::EscapePods
        ) || self.is_small_craft()
            || self.is_jumpship()
    }

    pub fn is_small_craft(&self) -> bool {
        matches!(self, UnitKind::SmallCraft | UnitKind::Dropship | UnitKind::EscapePods)
    }

    pub fn is_jumpship(&self) -> bool {
        matches!(self, UnitKind::Jumpship | UnitKind::Warship | UnitKind::SpaceStation)
    }

    /// Large craft group weapons and their ammo into bays
    pub fn uses_weapon_bays(&self) -> bool {
        self.is_small_craft() || self.is_jumpship()
    }

    /// Ammo is saved without a slot index and matched by position
    pub fn uses_slotless_ammo(&self) -> bool {
        matches!(self, UnitKind::Protomech | UnitKind::GunEmplacement)
    }

    /// Ammo capacity is measured by shot mass rather than tonnage
    pub fn mass_based_ammo(&self) -> bool {
        matches!(self, UnitKind::BattleArmor | UnitKind::Protomech)
    }

    pub fn is_conventional_infantry(&self) -> bool {
        matches!(
            self,
            UnitKind::Infantry | UnitKind::EjectedCrew | UnitKind::MechWarrior
        )
    }

    pub fn is_bomber(&self) -> bool {
        matches!(
            self,
            UnitKind::AeroFighter
                | UnitKind::ConventionalFighter
                | UnitKind::SmallCraft
                | UnitKind::LandAirMech
                | UnitKind::Vtol
        )
    }

    pub fn launches_escape_craft(&self) -> bool {
        matches!(self, UnitKind::SmallCraft | UnitKind::Dropship) || self.is_jumpship()
    }

    pub fn carries_escapees(&self) -> bool {
        matches!(self, UnitKind::EjectedCrew | UnitKind::MechWarrior) || self.is_small_craft()
    }
}

/// A combat unit being restored
#[derive(Debug, Clone, Serialize)]
pub struct Unit {
    pub id: UnitId,
    /// Identifier assigned by a running game
    pub game_id: Option<i32>,
    /// Attached to a live game session
    pub in_game: bool,

    pub chassis: String,
    pub model: String,
    pub kind: UnitKind,
    pub tonnage: f64,
    pub walk_mp: i32,
    /// Crew complement of a fully crewed unit
    pub full_crew_size: i32,

    pub crew: Option<Crew>,
    pub locations: Vec<Location>,
    /// Slab indexed by `MountId`; removed equipment leaves a hole
    equipment: Vec<Option<Mount>>,
    pub bays: Vec<Bay>,

    pub external_id: String,
    pub camo: Camouflage,
    pub commander: bool,
    pub hidden: bool,
    pub deploy_round: i32,
    pub starting_pos: i32,
    pub never_deployed: bool,
    pub offboard: Option<OffBoard>,
    pub quirks: OptionSet,
    pub force: Option<String>,
    pub transport_id: Option<i32>,
    pub secondary_facing: i32,
    pub c3: C3Links,

    pub vehicle: Option<VehicleSystems>,
    pub aero: Option<AeroSystems>,
    pub jump_drive: Option<JumpDrive>,
    pub dropship: Option<DropshipSystems>,
    pub bombs: Option<BombBay>,
    pub infantry: Option<InfantrySquad>,
    pub ejection: Option<Ejection>,
    pub escape: Option<EscapeLedger>,
    /// Ejected pilots only: id of the unit that picked them up
    pub picked_up_by: Option<String>,
}

impl Unit {
    /// An empty unit with the sub-systems its kind carries
    pub fn new(chassis: impl Into<String>, model: impl Into<String>, kind: UnitKind) -> Self {
        Self {
            id: UnitId::new(),
            game_id: None,
            in_game: false,
            chassis: chassis.into(),
            model: model.into(),
            kind,
            tonnage: 0.0,
            walk_mp: 0,
            full_crew_size: 1,
            crew: Some(Crew::new(CrewType::Single)),
            locations: Vec::new(),
            equipment: Vec::new(),
            bays: Vec::new(),
            external_id: NO_EXTERNAL_ID.to_string(),
            camo: Camouflage::default(),
            commander: false,
            hidden: false,
            deploy_round: 0,
            starting_pos: START_NONE,
            never_deployed: true,
            offboard: None,
            quirks: OptionSet::new(),
            force: None,
            transport_id: None,
            secondary_facing: 0,
            c3: C3Links::default(),
            vehicle: kind.is_vehicle().then(VehicleSystems::default),
            aero: kind.is_aero().then(|| AeroSystems::new(0, 0, 0)),
            jump_drive: kind.is_jumpship().then(JumpDrive::default),
            dropship: (kind == UnitKind::Dropship).then(DropshipSystems::default),
            bombs: kind.is_bomber().then(BombBay::default),
            infantry: kind.is_conventional_infantry().then(|| InfantrySquad::new(1, 1)),
            ejection: kind.is_mech().then(Ejection::default),
            escape: (kind.launches_escape_craft() || kind.carries_escapees())
                .then(EscapeLedger::default),
            picked_up_by: (kind == UnitKind::MechWarrior).then(|| NO_EXTERNAL_ID.to_string()),
        }
    }

    /// Crew that abandoned a vehicle or spacecraft
    pub fn ejected_crew(name: &str) -> Self {
        let mut unit = Self::new(name, "", UnitKind::EjectedCrew);
        unit.locations.push(Location::new("Infantry", 0, 1, 0));
        unit
    }

    /// A pilot who ejected from a mech or fighter
    pub fn mechwarrior(name: &str) -> Self {
        let mut unit = Self::new(name, "", UnitKind::MechWarrior);
        unit.locations.push(Location::new("Infantry", 0, 1, 0));
        unit
    }

    pub fn escape_pods(name: &str) -> Self {
        let mut unit = Self::new(name, "", UnitKind::EscapePods);
        for loc in ["Nose", "Left Side", "Right Side", "Aft"] {
            unit.locations.push(Location::new(loc, 0, 0, 0));
        }
        unit
    }

    /// "Chassis Model", or just the chassis when there is no model
    pub fn short_name(&self) -> String {
        if self.model.is_empty() {
            self.chassis.clone()
        } else {
            format!("{} {}", self.chassis, self.model)
        }
    }

    // === LOCATIONS ===

    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    pub fn location(&self, loc: usize) -> Option<&Location> {
        self.locations.get(loc)
    }

    pub fn location_mut(&mut self, loc: usize) -> Option<&mut Location> {
        self.locations.get_mut(loc)
    }

    pub fn location_name(&self, loc: usize) -> &str {
        self.locations.get(loc).map_or("?", |l| l.name.as_str())
    }

    pub fn has_rear_armor(&self, loc: usize) -> bool {
        self.location(loc).is_some_and(Location::has_rear_armor)
    }

    pub fn original_armor(&self, loc: usize, rear: bool) -> Option<ArmorValue> {
        let location = self.location(loc)?;
        if rear {
            location.rear.map(|r| r.original)
        } else {
            Some(location.original_armor)
        }
    }

    pub fn original_internal(&self, loc: usize) -> Option<ArmorValue> {
        self.location(loc).map(|l| l.original_internal)
    }

    pub fn armor(&self, loc: usize, rear: bool) -> Option<ArmorValue> {
        let location = self.location(loc)?;
        if rear {
            location.rear.map(|r| r.current)
        } else {
            Some(location.armor)
        }
    }

    /// Set front or rear armor. Returns false when the side does not exist.
    pub fn set_armor(&mut self, loc: usize, value: ArmorValue, rear: bool) -> bool {
        let Some(location) = self.location_mut(loc) else {
            return false;
        };
        if rear {
            match location.rear.as_mut() {
                Some(r) => r.current = value,
                None => return false,
            }
        } else {
            location.armor = value;
        }
        true
    }

    pub fn set_internal(&mut self, loc: usize, value: ArmorValue) -> bool {
        match self.location_mut(loc) {
            Some(location) => {
                location.internal = value;
                true
            }
            None => false,
        }
    }

    /// Reset both current and original internal structure
    pub fn initialize_internal(&mut self, value: i32, loc: usize) -> bool {
        match self.location_mut(loc) {
            Some(location) => {
                location.internal = ArmorValue::Points(value);
                location.original_internal = ArmorValue::Points(value);
                true
            }
            None => false,
        }
    }

    // === CRITICAL SLOTS ===

    pub fn critical_count(&self, loc: usize) -> usize {
        self.location(loc).map_or(0, Location::slot_count)
    }

    pub fn critical(&self, loc: usize, slot: usize) -> Option<&CriticalSlot> {
        self.location(loc)?.criticals.get(slot)?.as_ref()
    }

    pub fn critical_mut(&mut self, loc: usize, slot: usize) -> Option<&mut CriticalSlot> {
        self.location_mut(loc)?.criticals.get_mut(slot)?.as_mut()
    }

    pub fn set_critical(&mut self, loc: usize, slot: usize, crit: Option<CriticalSlot>) -> bool {
        match self.location_mut(loc).and_then(|l| l.criticals.get_mut(slot)) {
            Some(entry) => {
                *entry = crit;
                true
            }
            None => false,
        }
    }

    /// Mount occupying a slot, if the slot holds equipment
    pub fn mount_at(&self, loc: usize, slot: usize) -> Option<MountId> {
        self.critical(loc, slot).and_then(CriticalSlot::mount)
    }

    // === EQUIPMENT ===

    pub fn mount(&self, id: MountId) -> Option<&Mount> {
        self.equipment.get(id.0)?.as_ref()
    }

    pub fn mount_mut(&mut self, id: MountId) -> Option<&mut Mount> {
        self.equipment.get_mut(id.0)?.as_mut()
    }

    /// Every mount in the order it was added
    pub fn mounts(&self) -> impl Iterator<Item = (MountId, &Mount)> {
        self.equipment
            .iter()
            .enumerate()
            .filter_map(|(i, m)| m.as_ref().map(|m| (MountId(i), m)))
    }

    pub fn mounts_in_location(&self, loc: usize) -> Vec<MountId> {
        self.mounts()
            .filter(|(_, m)| m.location == loc)
            .map(|(id, _)| id)
            .collect()
    }

    /// Ammo mounts of one location in the order the template placed them
    pub fn ammo_in_location(&self, loc: usize) -> Vec<MountId> {
        self.mounts()
            .filter(|(_, m)| m.location == loc && m.is_ammo())
            .map(|(id, _)| id)
            .collect()
    }

    /// Store a mount without giving it critical slots
    pub fn add_mount(&mut self, mount: Mount) -> MountId {
        self.equipment.push(Some(mount));
        MountId(self.equipment.len() - 1)
    }

    /// Give a mount `count` free slots in its location
    pub fn allocate_slots(&mut self, id: MountId, count: usize) -> Result<(), EquipmentError> {
        let (loc, name) = match self.mount(id) {
            Some(m) => (m.location, m.equipment.name.clone()),
            None => return Err(EquipmentError::InvalidLocation(usize::MAX)),
        };
        let location = self
            .locations
            .get_mut(loc)
            .ok_or(EquipmentError::InvalidLocation(loc))?;

        if location.free_slots() < count {
            return Err(EquipmentError::LocationFull {
                location: loc,
                name,
            });
        }
        for _ in 0..count {
            if let Some(free) = location.first_free_slot() {
                location.criticals[free] = Some(CriticalSlot::equipment(id));
            }
        }
        Ok(())
    }

    /// Mount new equipment in a location, taking slots when the location has any
    pub fn add_equipment(
        &mut self,
        equipment: Arc<EquipmentType>,
        loc: usize,
        rear_mounted: bool,
    ) -> Result<MountId, EquipmentError> {
        let location = self
            .location(loc)
            .ok_or(EquipmentError::InvalidLocation(loc))?;
        let slots = if location.slot_count() == 0 {
            0
        } else {
            equipment.criticals
        };
        if location.free_slots() < slots {
            return Err(EquipmentError::LocationFull {
                location: loc,
                name: equipment.name.clone(),
            });
        }

        let id = self.add_mount(Mount::new(equipment, loc, rear_mounted));
        self.allocate_slots(id, slots)?;
        Ok(id)
    }

    /// Remove a mount, its critical slots and any links pointing at it
    pub fn remove_equipment(&mut self, id: MountId) -> Option<Mount> {
        let mount = self.equipment.get_mut(id.0)?.take()?;
        for location in &mut self.locations {
            for entry in &mut location.criticals {
                if entry.as_ref().and_then(CriticalSlot::mount) == Some(id) {
                    *entry = None;
                }
            }
        }
        for other in self.equipment.iter_mut().flatten() {
            if other.linked == Some(id) {
                other.linked = None;
            }
            other.bay_ammo.retain(|a| *a != id);
        }
        Some(mount)
    }

    /// Battle armor manipulators at one body position
    pub fn manipulators_at(&self, mount_loc: i32) -> Vec<MountId> {
        self.mounts()
            .filter(|(_, m)| {
                m.equipment.has_flag(EquipmentFlag::BaManipulator) && m.ba_mount_loc == Some(mount_loc)
            })
            .map(|(id, _)| id)
            .collect()
    }

    // === LOCATION STATE TRANSITIONS ===

    /// Armor, internal and rear become destroyed; so does everything inside
    pub fn destroy_location(&mut self, loc: usize) {
        let Some(location) = self.locations.get_mut(loc) else {
            return;
        };
        location.armor = ArmorValue::Destroyed;
        location.internal = ArmorValue::Destroyed;
        if let Some(rear) = location.rear.as_mut() {
            rear.current = ArmorValue::Destroyed;
        }
        for slot in location.slots_mut() {
            slot.destroyed = true;
        }
        for mount in self.equipment.iter_mut().flatten() {
            if mount.location == loc {
                mount.destroyed = true;
            }
        }
    }

    pub fn breach_location(&mut self, loc: usize) {
        let Some(location) = self.locations.get_mut(loc) else {
            return;
        };
        location.exposure = Exposure::Breached;
        for slot in location.slots_mut() {
            slot.breached = true;
        }
        for mount in self.equipment.iter_mut().flatten() {
            if mount.location == loc {
                mount.breached = true;
            }
        }
    }

    pub fn blow_off_location(&mut self, loc: usize) {
        let Some(location) = self.locations.get_mut(loc) else {
            return;
        };
        location.blown_off = true;
        for slot in location.slots_mut() {
            slot.missing = true;
        }
        for mount in self.equipment.iter_mut().flatten() {
            if mount.location == loc {
                mount.missing = true;
            }
        }
    }

    // === BAYS ===

    pub fn bay(&self, id: i32) -> Option<&Bay> {
        self.bays.iter().find(|b| b.id == id)
    }

    pub fn bay_mut(&mut self, id: i32) -> Option<&mut Bay> {
        self.bays.iter_mut().find(|b| b.id == id)
    }

    /// Name of a slot's content for messages
    pub fn slot_label(&self, slot: &CriticalSlot) -> String {
        match &slot.content {
            SlotContent::System(name) => name.clone(),
            SlotContent::Equipment(id) => self
                .mount(*id)
                .map_or_else(|| "missing equipment".to_string(), |m| m.internal_name().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::equipment::{AmmoSpec, EquipmentKind, MunitionType};

    fn equipment(name: &str, kind: EquipmentKind, criticals: usize) -> Arc<EquipmentType> {
        Arc::new(EquipmentType {
            internal_name: name.into(),
            name: name.into(),
            lookup_names: vec![],
            kind,
            tonnage: 1.0,
            criticals,
            ammo: (kind == EquipmentKind::Ammo).then(|| AmmoSpec {
                family: "SRM".into(),
                munition: MunitionType::Standard,
                shots: 50,
                kg_per_shot: 0.0,
            }),
            flags: vec![],
        })
    }

    fn test_mech() -> Unit {
        let mut unit = Unit::new("Locust", "LCT-1V", UnitKind::Mech);
        unit.locations.push(Location::new("Head", 8, 3, 6));
        unit.locations.push(Location::new("Center Torso", 10, 10, 12).with_rear(2));
        unit.locations.push(Location::new("Right Torso", 8, 7, 12).with_rear(2));
        unit
    }

    #[test]
    fn test_capabilities_follow_kind() {
        let mech = Unit::new("A", "B", UnitKind::Mech);
        assert!(mech.ejection.is_some());
        assert!(mech.vehicle.is_none());
        assert!(mech.aero.is_none());

        let tank = Unit::new("A", "B", UnitKind::Tank);
        assert!(tank.vehicle.is_some());

        let lam = Unit::new("A", "B", UnitKind::LandAirMech);
        assert!(lam.aero.is_some() && lam.ejection.is_some());

        let pilot = Unit::mechwarrior("MechWarrior");
        assert_eq!(pilot.picked_up_by.as_deref(), Some("-1"));
        assert!(pilot.escape.is_some());
    }

    #[test]
    fn test_add_equipment_takes_slots() {
        let mut unit = test_mech();
        let id = unit
            .add_equipment(equipment("Medium Laser", EquipmentKind::Weapon, 2), 2, false)
            .unwrap();
        assert_eq!(unit.mount_at(2, 0), Some(id));
        assert_eq!(unit.mount_at(2, 1), Some(id));
        assert_eq!(unit.mount_at(2, 2), None);
    }

    #[test]
    fn test_add_equipment_location_full() {
        let mut unit = test_mech();
        let result = unit.add_equipment(equipment("Big Gun", EquipmentKind::Weapon, 7), 0, false);
        assert!(matches!(result, Err(EquipmentError::LocationFull { location: 0, .. })));
        assert_eq!(unit.mounts().count(), 0);
    }

    #[test]
    fn test_destroy_location_only_touches_that_location() {
        let mut unit = test_mech();
        let ct = unit
            .add_equipment(equipment("Medium Laser", EquipmentKind::Weapon, 1), 1, false)
            .unwrap();
        let rt = unit
            .add_equipment(equipment("SRM Ammo", EquipmentKind::Ammo, 1), 2, false)
            .unwrap();

        unit.destroy_location(2);

        let loc = unit.location(2).unwrap();
        assert_eq!(loc.armor, ArmorValue::Destroyed);
        assert_eq!(loc.internal, ArmorValue::Destroyed);
        assert_eq!(loc.rear.unwrap().current, ArmorValue::Destroyed);
        assert!(unit.mount(rt).unwrap().destroyed);
        assert!(unit.critical(2, 0).unwrap().destroyed);

        assert!(!unit.mount(ct).unwrap().destroyed);
        assert_eq!(unit.location(1).unwrap().armor, ArmorValue::Points(10));
    }

    #[test]
    fn test_remove_equipment_clears_links_and_slots() {
        let mut unit = test_mech();
        let weapon = unit
            .add_equipment(equipment("SRM 2", EquipmentKind::Weapon, 1), 1, false)
            .unwrap();
        let ammo = unit
            .add_equipment(equipment("SRM Ammo", EquipmentKind::Ammo, 1), 1, false)
            .unwrap();
        unit.mount_mut(weapon).unwrap().linked = Some(ammo);

        assert!(unit.remove_equipment(ammo).is_some());
        assert!(unit.mount(ammo).is_none());
        assert_eq!(unit.mount(weapon).unwrap().linked, None);
        assert_eq!(unit.mount_at(1, 1), None);
        assert_eq!(unit.mount_at(1, 0), Some(weapon));
    }

    #[test]
    fn test_ammo_in_location_template_order() {
        let mut unit = test_mech();
        let a = unit
            .add_equipment(equipment("SRM Ammo", EquipmentKind::Ammo, 1), 1, false)
            .unwrap();
        unit.add_equipment(equipment("Medium Laser", EquipmentKind::Weapon, 1), 1, false)
            .unwrap();
        let b = unit
            .add_equipment(equipment("SRM Ammo", EquipmentKind::Ammo, 1), 1, false)
            .unwrap();
        assert_eq!(unit.ammo_in_location(1), vec![a, b]);
        assert!(unit.ammo_in_location(0).is_empty());
    }

    #[test]
    fn test_rear_armor_requires_rear_side() {
        let mut unit = test_mech();
        assert!(!unit.set_armor(0, ArmorValue::Points(1), true));
        assert!(unit.set_armor(1, ArmorValue::Points(1), true));
        assert_eq!(unit.armor(1, true), Some(ArmorValue::Points(1)));
        assert_eq!(unit.original_armor(1, true), Some(ArmorValue::Points(2)));
    }
}
