//! Handlers for the sub-system elements of an entity
//!
//! Each handler first asks whether the unit carries the system it restores
//! and answers `Outcome::NotApplicable` when it does not.

use tracing::error;

use super::attributes::Attributes;
use super::diagnostics::Diagnostics;
use super::entity::Outcome;
use super::ReaderEnv;
use crate::core::types::MountId;
use crate::document::Element;
use crate::model::systems::BombType;
use crate::model::{EquipmentFlag, Unit, UnitKind};

/// Integer attribute the element cannot do without
fn required_int(element: &Element, key: &str, complaint: &str, diags: &mut Diagnostics) -> Option<i32> {
    match element.get(key).map(str::parse::<i32>) {
        Some(Ok(v)) => Some(v),
        _ => {
            diags.warn(complaint);
            None
        }
    }
}

// === GROUND VEHICLES ===

pub fn read_motive(unit: &mut Unit, element: &Element, _env: &ReaderEnv, diags: &mut Diagnostics) -> Outcome {
    let walk_mp = unit.walk_mp;
    let Some(vehicle) = unit.vehicle.as_mut() else {
        return Outcome::NotApplicable;
    };

    if let Some(damage) = required_int(element, "damage", "Invalid motive damage value in movement tag.", diags) {
        vehicle.motive_damage = damage;
        if damage >= walk_mp {
            vehicle.immobilize();
            vehicle.apply_damage();
        }
    }
    if let Some(penalty) = required_int(element, "penalty", "Invalid motive penalty value in movement tag.", diags) {
        vehicle.motive_penalty = penalty;
    }
    Outcome::Applied
}

pub fn read_turret_lock(unit: &mut Unit, element: &Element, _env: &ReaderEnv, diags: &mut Diagnostics) -> Outcome {
    if unit.vehicle.is_none() {
        return Outcome::NotApplicable;
    }
    let complaint = "Invalid turret lock direction value in movement tag.";
    if let Some(direction) = required_int(element, "direction", complaint, diags) {
        unit.secondary_facing = direction;
        if let Some(vehicle) = unit.vehicle.as_mut() {
            vehicle.turret_locked = true;
        }
    }
    Outcome::Applied
}

pub fn read_turret2_lock(unit: &mut Unit, element: &Element, _env: &ReaderEnv, diags: &mut Diagnostics) -> Outcome {
    let Some(vehicle) = unit.vehicle.as_mut() else {
        return Outcome::NotApplicable;
    };
    let complaint = "Invalid turret2 lock direction value in movement tag.";
    if let Some(offset) = required_int(element, "direction", complaint, diags) {
        vehicle.dual_turret_offset = offset;
        vehicle.turret2_locked = true;
    }
    Outcome::Applied
}

pub fn read_tank_criticals(unit: &mut Unit, element: &Element, _env: &ReaderEnv, diags: &mut Diagnostics) -> Outcome {
    let Some(vehicle) = unit.vehicle.as_mut() else {
        return Outcome::NotApplicable;
    };

    if let Some(sensors) = element.int("sensors", diags) {
        vehicle.sensor_hits = sensors;
    }
    if element.attr_or_blank("engine").eq_ignore_ascii_case("hit") {
        vehicle.engine_hit();
        vehicle.apply_damage();
    }
    if element.attr_or_blank("driver").eq_ignore_ascii_case("hit") {
        vehicle.driver_hit = true;
    }
    let commander = element.attr_or_blank("commander");
    if commander.eq_ignore_ascii_case("console") {
        vehicle.console_commander_hit = true;
    } else if commander.eq_ignore_ascii_case("hit") {
        vehicle.commander_hit = true;
    }
    Outcome::Applied
}

// === AEROSPACE ===

pub fn read_structural_integrity(unit: &mut Unit, element: &Element, _env: &ReaderEnv, diags: &mut Diagnostics) -> Outcome {
    let Some(aero) = unit.aero.as_mut() else {
        return Outcome::NotApplicable;
    };
    let complaint = "Invalid SI value in structural integrity tag.";
    if let Some(si) = required_int(element, "integrity", complaint, diags) {
        aero.structural_integrity = si;
    }
    Outcome::Applied
}

/// Original structural integrity, written for escape pods
pub fn read_original_structure(unit: &mut Unit, element: &Element, _env: &ReaderEnv, diags: &mut Diagnostics) -> Outcome {
    let Some(aero) = unit.aero.as_mut() else {
        return Outcome::NotApplicable;
    };
    let complaint = "Invalid SI value in original structural integrity tag.";
    if let Some(si) = required_int(element, "number", complaint, diags) {
        aero.original_structural_integrity = si;
    }
    Outcome::Applied
}

pub fn read_heat_sinks(unit: &mut Unit, element: &Element, _env: &ReaderEnv, diags: &mut Diagnostics) -> Outcome {
    let Some(aero) = unit.aero.as_mut() else {
        return Outcome::NotApplicable;
    };
    if let Some(sinks) = required_int(element, "sinks", "Invalid heat sink value in heat sink tag.", diags) {
        aero.heat_sinks = sinks;
    }
    Outcome::Applied
}

pub fn read_fuel(unit: &mut Unit, element: &Element, _env: &ReaderEnv, diags: &mut Diagnostics) -> Outcome {
    let Some(aero) = unit.aero.as_mut() else {
        return Outcome::NotApplicable;
    };
    if let Some(fuel) = required_int(element, "left", "Invalid fuel value in fuel tag.", diags) {
        aero.fuel = fuel;
    }
    Outcome::Applied
}

pub fn read_aero_criticals(unit: &mut Unit, element: &Element, _env: &ReaderEnv, diags: &mut Diagnostics) -> Outcome {
    let Some(aero) = unit.aero.as_mut() else {
        return Outcome::NotApplicable;
    };

    let counters = [
        ("avionics", &mut aero.avionics_hits),
        ("sensors", &mut aero.sensor_hits),
        ("engine", &mut aero.engine_hits),
        ("fcs", &mut aero.fcs_hits),
        ("cic", &mut aero.cic_hits),
        ("leftThrust", &mut aero.left_thrust_hits),
        ("rightThrust", &mut aero.right_thrust_hits),
    ];
    for (key, counter) in counters {
        if let Some(hits) = element.int(key, diags) {
            *counter = hits;
        }
    }

    // Any value at all marks these as hit
    if !element.is_blank("lifeSupport") {
        aero.life_support = false;
    }
    if !element.is_blank("gear") {
        aero.gear_hit = true;
    }
    Outcome::Applied
}

pub fn read_dropship_criticals(unit: &mut Unit, element: &Element, _env: &ReaderEnv, _diags: &mut Diagnostics) -> Outcome {
    let Some(dropship) = unit.dropship.as_mut() else {
        return Outcome::NotApplicable;
    };
    if !element.is_blank("dockingcollar") {
        dropship.docking_collar_damaged = true;
    }
    if !element.is_blank("kfboom") {
        dropship.kf_boom_damaged = true;
    }
    Outcome::Applied
}

pub fn read_kf_integrity(unit: &mut Unit, element: &Element, _env: &ReaderEnv, diags: &mut Diagnostics) -> Outcome {
    let Some(drive) = unit.jump_drive.as_mut() else {
        return Outcome::NotApplicable;
    };
    let complaint = "Invalid KF integrity value in KF integrity tag.";
    if let Some(integrity) = required_int(element, "integrity", complaint, diags) {
        drive.kf_integrity = integrity;
    }
    Outcome::Applied
}

pub fn read_sail_integrity(unit: &mut Unit, element: &Element, _env: &ReaderEnv, diags: &mut Diagnostics) -> Outcome {
    let Some(drive) = unit.jump_drive.as_mut() else {
        return Outcome::NotApplicable;
    };
    let complaint = "Invalid sail integrity value in sail integrity tag.";
    if let Some(integrity) = required_int(element, "integrity", complaint, diags) {
        drive.sail_integrity = integrity;
    }
    Outcome::Applied
}

/// Bomb loads accumulate per type; unknown bomb names are skipped
pub fn read_bombs(unit: &mut Unit, element: &Element, _env: &ReaderEnv, diags: &mut Diagnostics) -> Outcome {
    let Some(bombs) = unit.bombs.as_mut() else {
        return Outcome::NotApplicable;
    };

    for bomb in element.children().filter(|c| c.is("bomb")) {
        let (Some(name), Some(_)) = (bomb.get("type"), bomb.get("load")) else {
            continue;
        };
        let Some(bomb_type) = BombType::from_internal_name(name) else {
            continue;
        };
        if let Some(load) = bomb.int("load", diags) {
            bombs.add(bomb_type, load);
        }
    }
    Outcome::Applied
}

// === TRANSPORT BAYS ===

pub fn read_transport_bay(unit: &mut Unit, element: &Element, _env: &ReaderEnv, diags: &mut Diagnostics) -> Outcome {
    let Some(index) = element.get("index") else {
        diags.warn("Could not find index for bay.");
        return Outcome::Applied;
    };
    let id = match index.parse::<i32>() {
        Ok(id) if id >= 0 => id,
        _ => {
            diags.warn(format!("Found invalid index value for bay: {}.", index));
            return Outcome::Applied;
        }
    };

    let name = unit.short_name();
    let Some(bay) = unit.bay_mut(id) else {
        diags.warn(format!("The entity, {} does not have a bay at index: {}.", name, id));
        return Outcome::Applied;
    };

    for child in element.children() {
        let text = child.text().trim();
        if child.is("damage") {
            match text.parse::<f64>() {
                Ok(damage) => bay.damage = damage,
                Err(_) => diags.warn(format!("Invalid damage value for bay {}: {}", id, text)),
            }
        } else if child.is("doors") {
            match text.parse::<i32>() {
                Ok(doors) => bay.current_doors = doors,
                Err(_) => diags.warn(format!("Invalid doors value for bay {}: {}", id, text)),
            }
        } else if child.is("loaded") {
            match text.parse::<i32>() {
                Ok(loaded) => bay.loaded.push(loaded),
                Err(_) => diags.warn(format!("Invalid loaded unit for bay {}: {}", id, text)),
            }
        }
    }
    Outcome::Applied
}

// === INFANTRY AND BATTLE ARMOR ===

/// Original trooper count, written for escaped spacecraft crews
pub fn read_original_men(unit: &mut Unit, element: &Element, _env: &ReaderEnv, diags: &mut Diagnostics) -> Outcome {
    let complaint = "Invalid internal value in original number of men tag.";
    if let Some(men) = required_int(element, "number", complaint, diags) {
        unit.initialize_internal(men, 0);
    }
    Outcome::Applied
}

/// Swap the manipulator fitted to a modular equipment adaptor
pub fn read_modular_mount(unit: &mut Unit, element: &Element, env: &ReaderEnv, diags: &mut Diagnostics) -> Outcome {
    if unit.kind != UnitKind::BattleArmor {
        return Outcome::NotApplicable;
    }

    let Some(mount_loc) = element.get("baMEAMountLoc") else {
        diags.warn("modularEquipmentMount tag does not specify a baMEAMountLoc!");
        return Outcome::Applied;
    };
    let Ok(mount_loc) = mount_loc.parse::<i32>() else {
        diags.warn(format!("Found invalid baMEAMountLoc value: {}.", mount_loc));
        return Outcome::Applied;
    };

    let adaptor = unit
        .mounts()
        .find(|(_, m)| m.ba_mount_loc == Some(mount_loc) && m.equipment.has_flag(EquipmentFlag::BaModularMount))
        .map(|(_, m)| m.location);
    let Some(location) = adaptor else {
        diags.warn(format!(
            "No modular equipment mount found in specified location! Location: {}",
            mount_loc
        ));
        return Outcome::Applied;
    };

    let replacement = match element.get("baMEATypeName") {
        None => None,
        Some(name) => match env.equipment.get(name) {
            Some(equipment) => Some(equipment),
            None => {
                diags.warn(format!("Could not find manipulator type: {}.", name));
                return Outcome::Applied;
            }
        },
    };

    for old in unit.manipulators_at(mount_loc) {
        unit.remove_equipment(old);
    }

    let Some(equipment) = replacement else {
        return Outcome::Applied;
    };
    match unit.add_equipment(equipment, location, false) {
        Ok(id) => {
            if let Some(mount) = unit.mount_mut(id) {
                mount.ba_mount_loc = Some(mount_loc);
            }
        }
        Err(e) => error!("Could not fit manipulator: {}", e),
    }
    Outcome::Applied
}

/// Swap the weapon carried by an anti-personnel weapon mount
pub fn read_anti_personnel_mount(unit: &mut Unit, element: &Element, env: &ReaderEnv, diags: &mut Diagnostics) -> Outcome {
    if unit.kind != UnitKind::BattleArmor {
        return Outcome::NotApplicable;
    }

    let Some(number) = element.get("baAPMMountNum") else {
        diags.warn("antiPersonnelMount tag does not specify a baAPMountNum!");
        return Outcome::Applied;
    };
    let Some((apm, mount)) = number
        .parse::<usize>()
        .ok()
        .map(MountId)
        .and_then(|id| unit.mount(id).map(|m| (id, m)))
    else {
        diags.warn(format!("Found invalid baAPMountNum value: {}.", number));
        return Outcome::Applied;
    };
    if !mount.equipment.has_flag(EquipmentFlag::BaApMount) {
        diags.warn(format!(
            "Mount {} of {} is not an anti-personnel weapon mount: {}.",
            number,
            unit.short_name(),
            mount.internal_name()
        ));
        return Outcome::Applied;
    }
    let (location, carried) = (mount.location, mount.linked);

    let wanted = match element.get("baAPMTypeName") {
        None => None,
        Some(name) => match env.equipment.get(name) {
            Some(equipment) => Some(equipment),
            None => {
                diags.warn(format!("Could not find anti-personnel weapon type: {}.", name));
                return Outcome::Applied;
            }
        },
    };

    let carried_name = carried.and_then(|id| unit.mount(id)).map(|m| m.internal_name().to_string());
    let unchanged = match (&wanted, &carried_name) {
        (Some(w), Some(c)) => w.internal_name == *c,
        _ => false,
    };
    if unchanged {
        return Outcome::Applied;
    }
    if let Some(old) = carried {
        unit.remove_equipment(old);
    }

    let Some(equipment) = wanted else {
        return Outcome::Applied;
    };
    match unit.add_equipment(equipment, location, false) {
        Ok(weapon) => {
            if let Some(mount) = unit.mount_mut(apm) {
                mount.linked = Some(weapon);
            }
            if let Some(mount) = unit.mount_mut(weapon) {
                mount.linked = Some(apm);
                mount.apm_mounted = true;
            }
        }
        Err(e) => error!("Could not fit anti-personnel weapon: {}", e),
    }
    Outcome::Applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalogs;
    use crate::core::ReaderConfig;
    use crate::model::{Bay, BayKind, Location};
    use crate::reader::entity::Handler;

    const EQUIPMENT: &str = r#"
        [[equipment]]
        internal_name = "BAMEA"
        name = "Modular Equipment Adaptor"
        kind = "misc"
        flags = ["ba_modular_mount"]

        [[equipment]]
        internal_name = "BABasicManipulator"
        name = "Basic Manipulator"
        kind = "misc"
        flags = ["ba_manipulator"]

        [[equipment]]
        internal_name = "BABattleClaw"
        name = "Battle Claw"
        kind = "misc"
        flags = ["ba_manipulator"]

        [[equipment]]
        internal_name = "BAAPMount"
        name = "Anti-Personnel Weapon Mount"
        kind = "misc"
        flags = ["ba_ap_mount"]

        [[equipment]]
        internal_name = "InfantryAssaultRifle"
        name = "Assault Rifle"
        kind = "weapon"
        flags = ["infantry_weapon"]

        [[equipment]]
        internal_name = "InfantrySMG"
        name = "Submachine Gun"
        kind = "weapon"
        flags = ["infantry_weapon"]
    "#;

    fn run(unit: &mut Unit, handler: Handler, element: Element) -> (Outcome, Diagnostics) {
        let mut catalogs = Catalogs::new();
        catalogs.equipment.load_str(EQUIPMENT).unwrap();
        let config = ReaderConfig::default();
        let env = ReaderEnv::new(&catalogs, &config);
        let mut diags = Diagnostics::new();
        let outcome = handler(unit, &element, &env, &mut diags);
        (outcome, diags)
    }

    fn tank() -> Unit {
        let mut unit = Unit::new("Manticore", "Heavy Tank", UnitKind::Tank);
        unit.walk_mp = 4;
        unit
    }

    #[test]
    fn test_motive_damage_immobilizes() {
        let mut unit = tank();
        let el = Element::new("motive").with_attr("damage", "4").with_attr("penalty", "2");
        let (outcome, diags) = run(&mut unit, read_motive, el);
        assert_eq!(outcome, Outcome::Applied);
        assert!(diags.is_empty());
        let vehicle = unit.vehicle.unwrap();
        assert_eq!(vehicle.motive_damage, 4);
        assert_eq!(vehicle.motive_penalty, 2);
        assert!(vehicle.immobile);
    }

    #[test]
    fn test_motive_on_mech_not_applicable() {
        let mut unit = Unit::new("Atlas", "AS7-D", UnitKind::Mech);
        let el = Element::new("motive").with_attr("damage", "1");
        let (outcome, _) = run(&mut unit, read_motive, el);
        assert_eq!(outcome, Outcome::NotApplicable);
    }

    #[test]
    fn test_bad_penalty_keeps_damage() {
        let mut unit = tank();
        let el = Element::new("motive").with_attr("damage", "1").with_attr("penalty", "lots");
        let (_, diags) = run(&mut unit, read_motive, el);
        assert_eq!(diags.warning_text(), "Invalid motive penalty value in movement tag.");
        let vehicle = unit.vehicle.unwrap();
        assert_eq!(vehicle.motive_damage, 1);
        assert!(!vehicle.immobile);
    }

    #[test]
    fn test_turret_locks() {
        let mut unit = tank();
        run(&mut unit, read_turret_lock, Element::new("turretlock").with_attr("direction", "3"));
        run(&mut unit, read_turret2_lock, Element::new("turret2lock").with_attr("direction", "1"));
        assert_eq!(unit.secondary_facing, 3);
        let vehicle = unit.vehicle.unwrap();
        assert!(vehicle.turret_locked && vehicle.turret2_locked);
        assert_eq!(vehicle.dual_turret_offset, 1);
    }

    #[test]
    fn test_tank_criticals() {
        let mut unit = tank();
        let el = Element::new("tcriticals")
            .with_attr("sensors", "2")
            .with_attr("engine", "hit")
            .with_attr("commander", "console");
        run(&mut unit, read_tank_criticals, el);
        let vehicle = unit.vehicle.unwrap();
        assert_eq!(vehicle.sensor_hits, 2);
        assert!(vehicle.engine_hit && vehicle.immobile);
        assert!(vehicle.console_commander_hit && !vehicle.commander_hit);
        assert!(!vehicle.driver_hit);
    }

    #[test]
    fn test_aero_values_and_criticals() {
        let mut unit = Unit::new("Shilone", "SL-17", UnitKind::AeroFighter);
        run(&mut unit, read_structural_integrity, Element::new("structural").with_attr("integrity", "5"));
        run(&mut unit, read_heat_sinks, Element::new("heat").with_attr("sinks", "12"));
        run(&mut unit, read_fuel, Element::new("fuel").with_attr("left", "300"));
        let crits = Element::new("acriticals")
            .with_attr("avionics", "1")
            .with_attr("leftThrust", "2")
            .with_attr("lifeSupport", "hit")
            .with_attr("gear", "hit");
        let (_, diags) = run(&mut unit, read_aero_criticals, crits);
        assert!(diags.is_empty());

        let aero = unit.aero.unwrap();
        assert_eq!((aero.structural_integrity, aero.heat_sinks, aero.fuel), (5, 12, 300));
        assert_eq!(aero.avionics_hits, 1);
        assert_eq!(aero.left_thrust_hits, 2);
        assert_eq!(aero.right_thrust_hits, 0);
        assert!(!aero.life_support);
        assert!(aero.gear_hit);
    }

    #[test]
    fn test_jump_drive_on_dropship_not_applicable() {
        let mut unit = Unit::new("Union", "", UnitKind::Dropship);
        let (outcome, _) = run(&mut unit, read_kf_integrity, Element::new("KF").with_attr("integrity", "3"));
        assert_eq!(outcome, Outcome::NotApplicable);

        let crits = Element::new("dcriticals").with_attr("kfboom", "hit");
        run(&mut unit, read_dropship_criticals, crits);
        let dropship = unit.dropship.unwrap();
        assert!(dropship.kf_boom_damaged);
        assert!(!dropship.docking_collar_damaged);
    }

    #[test]
    fn test_bombs_accumulate_and_skip_unknown() {
        let mut unit = Unit::new("Shilone", "SL-17", UnitKind::AeroFighter);
        let el = Element::new("bombs")
            .with_child(Element::new("bomb").with_attr("type", "HEBomb").with_attr("load", "2"))
            .with_child(Element::new("bomb").with_attr("type", "hebomb").with_attr("load", "1"))
            .with_child(Element::new("bomb").with_attr("type", "Nuke").with_attr("load", "1"));
        run(&mut unit, read_bombs, el);
        let bombs = unit.bombs.unwrap();
        assert_eq!(bombs.count(BombType::HighExplosive), 3);
        assert_eq!(bombs.choices.len(), 1);
    }

    #[test]
    fn test_transport_bay_state() {
        let mut unit = Unit::new("Union", "", UnitKind::Dropship);
        unit.bays.push(Bay::new(1, BayKind::Mech, 0, 2, 12.0));
        let el = Element::new("transportBay")
            .with_attr("index", "1")
            .with_child(Element::new("damage").with_text("2.5"))
            .with_child(Element::new("doors").with_text("1"))
            .with_child(Element::new("loaded").with_text("17"))
            .with_child(Element::new("loaded").with_text("18"));
        let (_, diags) = run(&mut unit, read_transport_bay, el);
        assert!(diags.is_empty());
        let bay = unit.bay(1).unwrap();
        assert_eq!(bay.damage, 2.5);
        assert_eq!(bay.current_doors, 1);
        assert_eq!(bay.loaded, vec![17, 18]);
    }

    #[test]
    fn test_transport_bay_unknown_index() {
        let mut unit = Unit::new("Union", "", UnitKind::Dropship);
        let (_, diags) = run(&mut unit, read_transport_bay, Element::new("transportBay").with_attr("index", "4"));
        assert_eq!(diags.warning_text(), "The entity, Union does not have a bay at index: 4.");

        let (_, diags) = run(&mut unit, read_transport_bay, Element::new("transportBay").with_attr("index", "-2"));
        assert_eq!(diags.warning_text(), "Found invalid index value for bay: -2.");
    }

    fn battle_armor(catalogs_text: &str) -> Unit {
        let mut catalogs = Catalogs::new();
        catalogs.equipment.load_str(catalogs_text).unwrap();
        let mut unit = Unit::new("Elemental", "[Laser](Sqd5)", UnitKind::BattleArmor);
        unit.locations.push(Location::new("Squad", 0, 0, 0));
        unit.locations.push(Location::new("Trooper 1", 2, 1, 0));
        let mea = unit.add_equipment(catalogs.equipment.get("BAMEA").unwrap(), 1, false).unwrap();
        unit.mount_mut(mea).unwrap().ba_mount_loc = Some(0);
        let manip = unit.add_equipment(catalogs.equipment.get("BABasicManipulator").unwrap(), 1, false).unwrap();
        unit.mount_mut(manip).unwrap().ba_mount_loc = Some(0);
        unit.add_equipment(catalogs.equipment.get("BAAPMount").unwrap(), 1, false).unwrap();
        unit
    }

    #[test]
    fn test_modular_mount_swaps_manipulator() {
        let mut unit = battle_armor(EQUIPMENT);
        let el = Element::new("modularEquipmentMount")
            .with_attr("baMEAMountLoc", "0")
            .with_attr("baMEATypeName", "BABattleClaw");
        let (_, diags) = run(&mut unit, read_modular_mount, el);
        assert!(diags.is_empty());

        let manipulators = unit.manipulators_at(0);
        assert_eq!(manipulators.len(), 1);
        let fitted = unit.mount(manipulators[0]).unwrap();
        assert_eq!(fitted.internal_name(), "BABattleClaw");
        assert_eq!(fitted.location, 1);
    }

    #[test]
    fn test_modular_mount_missing_adaptor() {
        let mut unit = battle_armor(EQUIPMENT);
        let el = Element::new("modularEquipmentMount").with_attr("baMEAMountLoc", "1");
        let (_, diags) = run(&mut unit, read_modular_mount, el);
        assert_eq!(diags.len(), 1);
        assert_eq!(unit.manipulators_at(0).len(), 1);
    }

    #[test]
    fn test_anti_personnel_mount_links_weapon() {
        let mut unit = battle_armor(EQUIPMENT);
        let el = Element::new("antiPersonnelMount")
            .with_attr("baAPMMountNum", "2")
            .with_attr("baAPMTypeName", "InfantryAssaultRifle");
        run(&mut unit, read_anti_personnel_mount, el);

        let weapon = unit.mount(MountId(2)).unwrap().linked.unwrap();
        let rifle = unit.mount(weapon).unwrap();
        assert_eq!(rifle.internal_name(), "InfantryAssaultRifle");
        assert_eq!(rifle.linked, Some(MountId(2)));
        assert!(rifle.apm_mounted);

        let swap = Element::new("antiPersonnelMount")
            .with_attr("baAPMMountNum", "2")
            .with_attr("baAPMTypeName", "InfantrySMG");
        run(&mut unit, read_anti_personnel_mount, swap);
        assert!(unit.mount(weapon).is_none());
        let smg = unit.mount(MountId(2)).unwrap().linked.unwrap();
        assert_eq!(unit.mount(smg).unwrap().internal_name(), "InfantrySMG");
    }

    #[test]
    fn test_anti_personnel_weapon_needs_ap_mount() {
        let mut unit = battle_armor(EQUIPMENT);
        let before = unit.mounts().count();
        let el = Element::new("antiPersonnelMount")
            .with_attr("baAPMMountNum", "0")
            .with_attr("baAPMTypeName", "InfantryAssaultRifle");
        let (outcome, diags) = run(&mut unit, read_anti_personnel_mount, el);

        assert_eq!(outcome, Outcome::Applied);
        assert!(diags.warning_text().contains("is not an anti-personnel weapon mount"));
        assert_eq!(unit.mounts().count(), before);
        assert!(unit.mount(MountId(0)).unwrap().linked.is_none());
        assert!(unit.mount(MountId(2)).unwrap().linked.is_none());
    }

    #[test]
    fn test_mounts_on_mech_not_applicable() {
        let mut unit = Unit::new("Atlas", "AS7-D", UnitKind::Mech);
        let (outcome, _) = run(&mut unit, read_modular_mount, Element::new("modularEquipmentMount"));
        assert_eq!(outcome, Outcome::NotApplicable);
    }
}
