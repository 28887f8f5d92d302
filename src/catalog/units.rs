//! Unit template registry for loading and instantiating units.
//!
//! Templates describe a unit as built: its locations with full armor and
//! structure, fixed system slots, equipment placements and bays. Every
//! instantiation produces an independent `Unit`.

use ahash::AHashMap;
use serde::Deserialize;
use std::path::Path;

use super::{CatalogError, EquipmentCatalog};
use crate::core::types::MountId;
use crate::model::systems::{AeroSystems, InfantrySquad, JumpDrive};
use crate::model::{Bay, BayKind, CriticalSlot, Crew, CrewType, Location, Mount, Unit, UnitKind};

/// Lookup seam between the reader and wherever templates come from.
/// Shared across threads when several documents are read at once.
pub trait UnitSource: Sync {
    /// Template whose full name ("chassis model", or bare chassis) matches, ignoring case
    fn find(&self, name: &str) -> Option<&UnitTemplate>;

    /// Build a fresh unit from a template
    fn instantiate(&self, template: &UnitTemplate) -> Result<Unit, CatalogError>;
}

#[derive(Debug, Clone, Deserialize)]
pub struct SystemSlotDef {
    pub index: usize,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationDef {
    pub name: String,
    #[serde(default)]
    pub armor: i32,
    #[serde(default)]
    pub internal: i32,
    #[serde(default)]
    pub rear_armor: Option<i32>,
    #[serde(default)]
    pub slots: usize,
    #[serde(default)]
    pub systems: Vec<SystemSlotDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlacementDef {
    #[serde(rename = "type")]
    pub equipment: String,
    pub location: usize,
    /// Explicit slot indices; otherwise the first free slots are taken
    #[serde(default)]
    pub slots: Option<Vec<usize>>,
    #[serde(default)]
    pub rear: bool,
    /// Index of another placement in this template this one feeds or is fed by
    #[serde(default)]
    pub linked: Option<usize>,
    #[serde(default)]
    pub shots: Option<i32>,
    #[serde(default)]
    pub ba_mount_loc: Option<i32>,
    #[serde(default)]
    pub apm_mounted: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BayDef {
    pub id: i32,
    #[serde(default)]
    pub kind: BayKind,
    #[serde(default)]
    pub location: usize,
    #[serde(default)]
    pub doors: i32,
    #[serde(default)]
    pub capacity: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AeroDef {
    #[serde(default)]
    pub structural_integrity: i32,
    #[serde(default)]
    pub heat_sinks: i32,
    #[serde(default)]
    pub fuel: i32,
    #[serde(default)]
    pub kf_integrity: i32,
    #[serde(default)]
    pub sail_integrity: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InfantryDef {
    pub squad_size: i32,
    pub squad_count: i32,
}

/// A unit as built, before any saved state is applied
#[derive(Debug, Clone, Deserialize)]
pub struct UnitTemplate {
    pub chassis: String,
    #[serde(default)]
    pub model: String,
    pub kind: UnitKind,
    #[serde(default)]
    pub tonnage: f64,
    #[serde(default)]
    pub walk_mp: i32,
    #[serde(default)]
    pub crew_type: Option<String>,
    #[serde(default)]
    pub crew_size: Option<i32>,
    #[serde(default)]
    pub aero: Option<AeroDef>,
    #[serde(default)]
    pub infantry: Option<InfantryDef>,
    #[serde(default)]
    pub locations: Vec<LocationDef>,
    #[serde(default)]
    pub equipment: Vec<PlacementDef>,
    #[serde(default)]
    pub bays: Vec<BayDef>,
}

impl UnitTemplate {
    pub fn full_name(&self) -> String {
        if self.model.is_empty() {
            self.chassis.clone()
        } else {
            format!("{} {}", self.chassis, self.model)
        }
    }

    fn invalid(&self, reason: String) -> CatalogError {
        CatalogError::InvalidTemplate {
            unit: self.full_name(),
            reason,
        }
    }

    /// Build a fresh unit, resolving equipment names against `equipment`
    pub fn instantiate(&self, equipment: &EquipmentCatalog) -> Result<Unit, CatalogError> {
        let mut unit = Unit::new(&self.chassis, &self.model, self.kind);
        unit.tonnage = self.tonnage;
        unit.walk_mp = self.walk_mp;

        let crew_type = match &self.crew_type {
            Some(name) => CrewType::from_name(name)
                .ok_or_else(|| self.invalid(format!("unknown crew type '{}'", name)))?,
            None if self.kind == UnitKind::LandAirMech => CrewType::LamPilot,
            None => CrewType::Single,
        };
        let mut crew = Crew::new(crew_type);
        if let Some(size) = self.crew_size {
            crew.size = size;
            crew.current_size = size;
        }
        unit.full_crew_size = crew.size;
        unit.crew = Some(crew);

        if let Some(aero) = &self.aero {
            if unit.aero.is_some() {
                unit.aero = Some(AeroSystems::new(
                    aero.structural_integrity,
                    aero.heat_sinks,
                    aero.fuel,
                ));
            }
            if unit.jump_drive.is_some() {
                unit.jump_drive = Some(JumpDrive {
                    kf_integrity: aero.kf_integrity,
                    sail_integrity: aero.sail_integrity,
                });
            }
        }
        if let (Some(def), Some(_)) = (&self.infantry, &unit.infantry) {
            unit.infantry = Some(InfantrySquad::new(def.squad_size, def.squad_count));
        }

        for def in &self.locations {
            let mut location = Location::new(&def.name, def.armor, def.internal, def.slots);
            if let Some(rear) = def.rear_armor {
                location = location.with_rear(rear);
            }
            for system in &def.systems {
                let slot = location.criticals.get_mut(system.index).ok_or_else(|| {
                    self.invalid(format!("{} has no slot {}", def.name, system.index))
                })?;
                *slot = Some(CriticalSlot::system(&system.name));
            }
            unit.locations.push(location);
        }

        let mut placed: Vec<MountId> = Vec::with_capacity(self.equipment.len());
        for def in &self.equipment {
            placed.push(self.place(&mut unit, def, equipment)?);
        }

        for (def, id) in self.equipment.iter().zip(&placed) {
            if let Some(target) = def.linked {
                let target = *placed
                    .get(target)
                    .ok_or_else(|| self.invalid(format!("link to missing placement {}", target)))?;
                if let Some(mount) = unit.mount_mut(*id) {
                    mount.linked = Some(target);
                }
            }
        }

        for def in &self.bays {
            unit.bays
                .push(Bay::new(def.id, def.kind, def.location, def.doors, def.capacity));
        }

        Ok(unit)
    }

    fn place(
        &self,
        unit: &mut Unit,
        def: &PlacementDef,
        equipment: &EquipmentCatalog,
    ) -> Result<MountId, CatalogError> {
        let kind = equipment
            .get(&def.equipment)
            .ok_or_else(|| CatalogError::UnknownEquipment {
                unit: self.full_name(),
                equipment: def.equipment.clone(),
            })?;
        if def.location >= unit.location_count() {
            return Err(self.invalid(format!(
                "{} placed in missing location {}",
                def.equipment, def.location
            )));
        }

        let criticals = kind.criticals;
        let mut mount = Mount::new(kind, def.location, def.rear);
        if let Some(shots) = def.shots {
            mount.original_shots = shots;
            mount.shots_left = shots;
        }
        mount.ba_mount_loc = def.ba_mount_loc;
        mount.apm_mounted = def.apm_mounted;
        let id = unit.add_mount(mount);

        match &def.slots {
            Some(slots) => {
                for &slot in slots {
                    let taken = unit.critical(def.location, slot).is_some();
                    if taken || slot >= unit.critical_count(def.location) {
                        return Err(self.invalid(format!(
                            "{} cannot use slot {} of {}",
                            def.equipment,
                            slot,
                            unit.location_name(def.location)
                        )));
                    }
                    unit.set_critical(def.location, slot, Some(CriticalSlot::equipment(id)));
                }
            }
            None if unit.critical_count(def.location) > 0 => {
                unit.allocate_slots(id, criticals)
                    .map_err(|e| self.invalid(e.to_string()))?;
            }
            None => {}
        }
        Ok(id)
    }
}

/// Registry for managing unit templates
#[derive(Debug, Default)]
pub struct UnitCatalog {
    templates: Vec<UnitTemplate>,
    /// Lowercased full name → index into `templates`
    by_name: AHashMap<String, usize>,
}

impl UnitCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template under its full name. A later template with the same name wins.
    pub fn register(&mut self, template: UnitTemplate) -> usize {
        let idx = self.templates.len();
        self.by_name.insert(template.full_name().to_lowercase(), idx);
        self.templates.push(template);
        idx
    }

    /// Parse and register one template from TOML text
    pub fn register_toml(&mut self, text: &str) -> Result<usize, CatalogError> {
        let template: UnitTemplate =
            toml::from_str(text).map_err(|e| CatalogError::ParseError(e.to_string()))?;
        Ok(self.register(template))
    }

    /// Load a template from a TOML file
    pub fn load_file(&mut self, path: &Path) -> Result<usize, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        self.register_toml(&content)
            .map_err(|e| CatalogError::ParseError(format!("{}: {}", path.display(), e)))
    }

    /// Load all .toml files from a directory recursively
    pub fn load_directory(&mut self, path: &Path) -> Result<Vec<usize>, CatalogError> {
        let mut ids = Vec::new();
        self.load_directory_recursive(path, &mut ids)?;
        Ok(ids)
    }

    fn load_directory_recursive(
        &mut self,
        path: &Path,
        ids: &mut Vec<usize>,
    ) -> Result<(), CatalogError> {
        for entry in std::fs::read_dir(path)? {
            let entry_path = entry?.path();
            if entry_path.is_dir() {
                self.load_directory_recursive(&entry_path, ids)?;
            } else if entry_path.extension().is_some_and(|ext| ext == "toml") {
                ids.push(self.load_file(&entry_path)?);
            }
        }
        Ok(())
    }

    /// Get a template by full name, ignoring case
    pub fn get_by_name(&self, name: &str) -> Option<&UnitTemplate> {
        self.by_name
            .get(&name.trim().to_lowercase())
            .and_then(|idx| self.templates.get(*idx))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SlotContent;

    const EQUIPMENT: &str = r#"
        [[equipment]]
        internal_name = "ISMediumLaser"
        name = "Medium Laser"
        kind = "weapon"

        [[equipment]]
        internal_name = "ISMachine Gun"
        name = "Machine Gun"
        kind = "weapon"

        [[equipment]]
        internal_name = "ISMG Ammo (200)"
        name = "Machine Gun Ammo"
        kind = "ammo"
        ammo = { family = "MG", shots = 200 }
    "#;

    const LOCUST: &str = r#"
        chassis = "Locust"
        model = "LCT-1V"
        kind = "mech"
        tonnage = 20.0
        walk_mp = 8

        [[locations]]
        name = "Head"
        armor = 6
        internal = 3
        slots = 6
        systems = [{ index = 0, name = "Life Support" }, { index = 1, name = "Sensors" }]

        [[locations]]
        name = "Center Torso"
        armor = 10
        internal = 6
        rear_armor = 2
        slots = 12
        systems = [{ index = 0, name = "Engine" }]

        [[equipment]]
        type = "Medium Laser"
        location = 1

        [[equipment]]
        type = "Machine Gun"
        location = 1
        linked = 2

        [[equipment]]
        type = "ISMG Ammo (200)"
        location = 1
        slots = [11]
        shots = 100
    "#;

    fn equipment() -> EquipmentCatalog {
        let mut catalog = EquipmentCatalog::new();
        catalog.load_str(EQUIPMENT).unwrap();
        catalog
    }

    #[test]
    fn test_lookup_ignores_case() {
        let mut catalog = UnitCatalog::new();
        catalog.register_toml(LOCUST).unwrap();
        assert!(catalog.get_by_name("locust lct-1v").is_some());
        assert!(catalog.get_by_name("Locust").is_none());
    }

    #[test]
    fn test_instantiate_places_equipment() {
        let mut catalog = UnitCatalog::new();
        catalog.register_toml(LOCUST).unwrap();
        let unit = catalog
            .get_by_name("Locust LCT-1V")
            .unwrap()
            .instantiate(&equipment())
            .unwrap();

        assert_eq!(unit.location_count(), 2);
        assert!(unit.critical(0, 1).unwrap().is_system());
        assert_eq!(
            unit.critical(1, 0).unwrap().content,
            SlotContent::System("Engine".into())
        );

        let laser = unit.mount_at(1, 1).unwrap();
        assert_eq!(unit.mount(laser).unwrap().internal_name(), "ISMediumLaser");

        let ammo = unit.mount_at(1, 11).unwrap();
        assert_eq!(unit.mount(ammo).unwrap().shots_left, 100);

        let mg = unit.mount_at(1, 2).unwrap();
        assert_eq!(unit.mount(mg).unwrap().linked, Some(ammo));
    }

    #[test]
    fn test_instances_are_independent() {
        let mut catalog = UnitCatalog::new();
        catalog.register_toml(LOCUST).unwrap();
        let template = catalog.get_by_name("Locust LCT-1V").unwrap();
        let equipment = equipment();

        let mut first = template.instantiate(&equipment).unwrap();
        let second = template.instantiate(&equipment).unwrap();
        first.destroy_location(1);
        assert!(!second.location(1).unwrap().is_destroyed());
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_unknown_equipment_rejected() {
        let template: UnitTemplate = toml::from_str(
            r#"
            chassis = "Broken"
            kind = "tank"
            [[locations]]
            name = "Front"
            slots = 4
            [[equipment]]
            type = "Death Ray"
            location = 0
            "#,
        )
        .unwrap();
        let result = template.instantiate(&equipment());
        assert!(matches!(result, Err(CatalogError::UnknownEquipment { .. })));
    }
}
