//! Location elements: armor, critical slots, breaches and ammunition
//!
//! A location whose `isDestroyed` flag is set is destroyed before any of its
//! children are read, and stays destroyed: later armor or slot children
//! cannot bring points or equipment back.

use std::sync::Arc;

use super::attributes::{split_list, Attributes, DESTROYED, NOT_APPLICABLE};
use super::diagnostics::Diagnostics;
use super::entity::{restore_options, Outcome};
use super::{links, ReaderEnv};
use crate::catalog::OptionCategory;
use crate::core::types::MountId;
use crate::document::Element;
use crate::model::mount::MAX_TROOPERS;
use crate::model::{ArmorValue, EquipmentFlag, EquipmentType, MunitionType, SlotContent, Unit};

const EMPTY: &str = "Empty";
const SYSTEM: &str = "System";

/// Hands out the ammo mounts of one location, in template order,
/// to "N/A"-indexed ammo elements in document order
#[derive(Debug, Clone)]
pub struct AmmoCursor {
    ammo: Vec<MountId>,
    next: usize,
}

impl AmmoCursor {
    pub fn new(unit: &Unit, loc: usize) -> Self {
        Self {
            ammo: unit.ammo_in_location(loc),
            next: 0,
        }
    }

    /// Next unbound ammo mount; advances only when one is returned
    pub fn next_mount(&mut self) -> Option<MountId> {
        let mount = self.ammo.get(self.next).copied()?;
        self.next += 1;
        Some(mount)
    }
}

/// Hit/destroyed/repairable flags of a slot element
#[derive(Debug, Clone, Copy)]
struct SlotFlags {
    hit: bool,
    destroyed: bool,
    repairable: bool,
}

impl SlotFlags {
    fn from_element(element: &Element) -> Self {
        Self {
            hit: element.flag("isHit"),
            destroyed: element.flag("isDestroyed"),
            repairable: element.is_blank("isRepairable") || element.flag("isRepairable"),
        }
    }
}

pub fn read_location(
    unit: &mut Unit,
    element: &Element,
    env: &ReaderEnv,
    diags: &mut Diagnostics,
) -> Outcome {
    let Some(index) = element.get("index") else {
        diags.warn("Could not find index for location.");
        return Outcome::Applied;
    };
    let Ok(loc) = index.parse::<usize>() else {
        diags.warn(format!("Found invalid index value for location: {}.", index));
        return Outcome::Applied;
    };
    if loc >= unit.location_count() {
        diags.warn(format!(
            "The entity, {} does not have a location at index: {}.",
            unit.short_name(),
            loc
        ));
        return Outcome::Applied;
    }

    let destroyed = element.flag("isDestroyed");
    if destroyed {
        unit.destroy_location(loc);
    }

    let mut cursor = AmmoCursor::new(unit, loc);
    for child in element.children() {
        if child.is("armor") {
            read_armor(unit, loc, destroyed, child, env, diags);
        } else if child.is("breached") {
            unit.breach_location(loc);
        } else if child.is("blownOff") {
            unit.blow_off_location(loc);
        } else if child.is("slot") {
            read_slot(unit, loc, destroyed, child, &mut cursor, env, diags);
        } else if child.is("stabilizer") {
            read_stabilizer(unit, loc, child, diags);
        }
    }
    Outcome::Applied
}

fn read_stabilizer(unit: &mut Unit, loc: usize, element: &Element, diags: &mut Diagnostics) {
    if element.is_blank("isHit") {
        return;
    }
    if unit.vehicle.is_none() {
        diags.warn(format!(
            "The entity, {} has no stabilizer in location {}.",
            unit.short_name(),
            loc
        ));
        return;
    }
    if let Some(location) = unit.location_mut(loc) {
        location.stabilizer_hit = true;
    }
}

/// Parse an armor "points" value: a number or one of the sentinels
fn parse_points(points: &str, env: &ReaderEnv, diags: &mut Diagnostics) -> Option<ArmorValue> {
    match points {
        NOT_APPLICABLE => Some(ArmorValue::NotApplicable),
        DESTROYED => Some(ArmorValue::Destroyed),
        _ => match points.parse::<i32>() {
            Ok(p) if p < 0 => Some(ArmorValue::Destroyed),
            Ok(p) if p <= env.config.max_armor_points => Some(ArmorValue::Points(p)),
            _ => {
                diags.warn(format!("Found invalid points value: {}.", points));
                None
            }
        },
    }
}

fn read_armor(
    unit: &mut Unit,
    loc: usize,
    location_destroyed: bool,
    element: &Element,
    env: &ReaderEnv,
    diags: &mut Diagnostics,
) {
    let Some(points) = element.get("points") else {
        diags.warn("Could not find points for armor.");
        return;
    };
    let Some(value) = parse_points(points, env, diags) else {
        return;
    };

    if location_destroyed && value != ArmorValue::Destroyed {
        diags.warn(format!(
            "Ignoring {} points of armor for destroyed location {} of {}.",
            points,
            loc,
            unit.short_name()
        ));
        return;
    }

    let kind = element.get("type").unwrap_or("Front");
    match kind {
        "Front" => {
            let max = unit.original_armor(loc, false).unwrap_or_default();
            if value.exceeds(max) {
                diags.warn(format!(
                    "The entity, {} does not start with {} points of armor for location: {}.",
                    unit.short_name(),
                    points,
                    loc
                ));
            } else {
                unit.set_armor(loc, value, false);
            }
        }
        "Internal" => {
            let max = unit.original_internal(loc).unwrap_or_default();
            if value.exceeds(max) {
                diags.warn(format!(
                    "The entity, {} does not start with {} points of internal structure for location: {}.",
                    unit.short_name(),
                    points,
                    loc
                ));
            } else {
                unit.set_internal(loc, value);
            }
        }
        "Rear" => match unit.original_armor(loc, true) {
            None => diags.warn(format!(
                "The entity, {} has no rear armor for location: {}.",
                unit.short_name(),
                loc
            )),
            Some(max) if value.exceeds(max) => diags.warn(format!(
                "The entity, {} does not start with {} points of rear armor for location: {}.",
                unit.short_name(),
                points,
                loc
            )),
            Some(_) => {
                unit.set_armor(loc, value, true);
            }
        },
        other => diags.warn(format!("Found unknown armor type: {}.", other)),
    }
}

fn read_slot(
    unit: &mut Unit,
    loc: usize,
    location_destroyed: bool,
    element: &Element,
    cursor: &mut AmmoCursor,
    env: &ReaderEnv,
    diags: &mut Diagnostics,
) {
    let Some(index) = element.get("index") else {
        diags.warn("Could not find index for slot.");
        return;
    };
    let Some(type_name) = element.get("type") else {
        diags.warn("Could not find type for slot.");
        return;
    };

    if index == NOT_APPLICABLE {
        if unit.kind.uses_slotless_ammo() {
            read_slotless_ammo(unit, loc, type_name, element, cursor, env, diags);
        }
        return;
    }

    let slot = match index.parse::<usize>() {
        Ok(i) if i >= 1 => i - 1,
        _ => {
            diags.warn(format!("Found invalid index value for slot: {}.", index));
            return;
        }
    };
    if slot >= unit.critical_count(loc) {
        diags.warn(format!(
            "The entity, {} does not have {} slots in location {}.",
            unit.short_name(),
            index,
            loc
        ));
        return;
    }

    // An empty-declared slot is never a mismatch and carries no state
    if type_name == EMPTY {
        return;
    }

    if unit.critical(loc, slot).is_none() && unit.kind.uses_weapon_bays() {
        if let Some(bay_index) = element.get("weaponsBayIndex") {
            links::add_extra_ammo_to_bay(unit, loc, type_name, bay_index, env, diags);
        }
    }

    let content = match unit.critical(loc, slot) {
        Some(crit) => crit.content.clone(),
        None => {
            diags.warn(format!(
                "Could not find the {} equipment that was expected at index {} of location {}.",
                type_name, slot, loc
            ));
            return;
        }
    };

    let flags = SlotFlags::from_element(element);
    match content {
        SlotContent::System(_) => {
            if type_name != SYSTEM {
                diags.warn(format!(
                    "XML file expects to find {} equipment at index {} of location {}, but Entity has a system.",
                    type_name, slot, loc
                ));
            }
        }
        SlotContent::Equipment(id) => {
            read_mount(unit, id, loc, slot, location_destroyed, flags, type_name, element, env, diags);
        }
    }

    if let Some(crit) = unit.critical_mut(loc, slot) {
        crit.hit = flags.hit;
        crit.destroyed = flags.destroyed || location_destroyed;
        crit.repairable = flags.repairable;
    }
}

/// Ammo without a slot index, bound by position within the location
fn read_slotless_ammo(
    unit: &mut Unit,
    loc: usize,
    type_name: &str,
    element: &Element,
    cursor: &mut AmmoCursor,
    env: &ReaderEnv,
    diags: &mut Diagnostics,
) {
    let Some(load) = env.equipment.ammo(type_name) else {
        diags.warn(format!(
            "XML file lists {} equipment at location {}.  XML parser expected ammo.",
            type_name, loc
        ));
        return;
    };
    let Some(id) = cursor.next_mount() else {
        diags.warn(format!(
            "The entity, {} has no more ammo in location {} for {}.",
            unit.short_name(),
            loc,
            type_name
        ));
        return;
    };
    restore_ammo_load(unit, id, load, element.get("shots"), env, diags);
}

/// Change an ammo mount to `load` and set its shots from the document
fn restore_ammo_load(
    unit: &mut Unit,
    id: MountId,
    load: Arc<EquipmentType>,
    shots: Option<&str>,
    env: &ReaderEnv,
    diags: &mut Diagnostics,
) {
    let shots = match shots {
        None => None,
        Some(NOT_APPLICABLE) => {
            diags.warn(format!(
                "Expected to find number of shots for {}, but found N/A instead.",
                load.internal_name
            ));
            return;
        }
        Some(text) => match text.parse::<i32>() {
            Ok(s) if (0..=env.config.max_shots).contains(&s) => Some(s),
            _ => {
                diags.warn(format!("Found invalid shots value for slot: {}.", text));
                return;
            }
        },
    };

    let Some(mount) = unit.mount_mut(id) else {
        return;
    };
    let current_family = mount.equipment.ammo().map(|a| a.family.clone());
    let new_family = load.ammo().map(|a| a.family.clone());
    if current_family != new_family {
        diags.warn(format!(
            "{} cannot be loaded into a mount holding {}.",
            load.internal_name,
            mount.internal_name()
        ));
        return;
    }

    mount.change_ammo_type(load);
    if let Some(shots) = shots {
        mount.set_shots_left(shots);
    }
}

/// Damage, ammo and option state of the mount behind an equipment slot
#[allow(clippy::too_many_arguments)]
fn read_mount(
    unit: &mut Unit,
    id: MountId,
    loc: usize,
    slot: usize,
    location_destroyed: bool,
    flags: SlotFlags,
    type_name: &str,
    element: &Element,
    env: &ReaderEnv,
    diags: &mut Diagnostics,
) {
    let mass_based = unit.kind.mass_based_ammo();
    let support_vehicle = unit.kind.is_support_vehicle();

    let Some(mount) = unit.mount_mut(id) else {
        return;
    };

    if let Some(quirks) = element.get("quirks") {
        restore_options(&mut mount.quirks, quirks, OptionCategory::WeaponQuirk, "quirk", env, diags);
    }

    if let Some(missing) = element.get("trooperMiss") {
        let list = split_list(missing, &env.config.list_separator);
        for (trooper, value) in list.into_iter().take(MAX_TROOPERS).enumerate() {
            mount.trooper_missing[trooper] = value.eq_ignore_ascii_case("true");
        }
    }

    mount.hit = flags.hit;
    mount.destroyed = flags.hit || flags.destroyed || location_destroyed;
    mount.repairable = flags.repairable;
    mount.rapid_fire = element.flag("rfmg");

    let is_ammo = mount.is_ammo();
    let matches_type = mount.equipment.answers_to(type_name);
    let existing = mount.internal_name().to_string();
    let mismatch = || {
        format!(
            "XML file expects {} equipment at index {} of location {}, but Entity has {} there.",
            type_name, slot, loc, existing
        )
    };

    if is_ammo {
        match env.equipment.ammo(type_name) {
            Some(load) => {
                restore_ammo_load(unit, id, load, element.get("shots"), env, diags);
                read_capacity(unit, id, mass_based, element, diags);
            }
            None => diags.warn(mismatch()),
        }
    } else if !matches_type {
        diags.warn(mismatch());
    }

    if let Some(munition) = element.get("munition") {
        read_munition(unit, id, munition, env, diags);
    }

    let infantry_weapon = unit
        .mount(id)
        .is_some_and(|m| m.equipment.has_flag(EquipmentFlag::InfantryWeapon));
    if support_vehicle && infantry_weapon {
        read_infantry_weapon_ammo(unit, id, element, diags);
    }
}

/// Ammo capacity: a number, or "N/A" to recompute from the unit kind
fn read_capacity(
    unit: &mut Unit,
    id: MountId,
    mass_based: bool,
    element: &Element,
    diags: &mut Diagnostics,
) {
    let Some(capacity) = element.get("capacity") else {
        return;
    };
    let Some(mount) = unit.mount_mut(id) else {
        return;
    };

    if capacity == NOT_APPLICABLE {
        let Some(ammo) = mount.equipment.ammo().cloned() else {
            return;
        };
        let shots = f64::from(mount.original_shots);
        if mass_based {
            mount.ammo_capacity = shots * ammo.kg_per_shot * 1000.0;
        } else if ammo.shots > 0 {
            mount.ammo_capacity = shots * mount.equipment.tonnage / f64::from(ammo.shots);
        }
        return;
    }

    match capacity.parse::<f64>() {
        Ok(value) => mount.ammo_capacity = value,
        Err(_) => diags.warn(format!("Found invalid capacity value: {}.", capacity)),
    }
}

/// Swap the munition loaded in the ammo a weapon feeds from
fn read_munition(unit: &mut Unit, weapon: MountId, munition: &str, env: &ReaderEnv, diags: &mut Diagnostics) {
    let Some(load) = env.equipment.ammo(munition) else {
        diags.warn("XML file expects ammo for munition argument of slot tag.");
        return;
    };
    let linked = unit.mount(weapon).and_then(|m| m.linked);
    match linked.and_then(|id| unit.mount_mut(id)) {
        Some(ammo) if ammo.is_ammo() => ammo.change_ammo_type(load),
        _ => diags.warn(format!(
            "{} has no linked ammo to load {} into.",
            unit.mount(weapon).map_or("Weapon", |m| m.internal_name()),
            munition
        )),
    }
}

/// Support vehicle infantry weapons save "left:original" shot pairs per munition
fn read_infantry_weapon_ammo(unit: &mut Unit, weapon: MountId, element: &Element, diags: &mut Diagnostics) {
    let standard = element.get("standard");
    let inferno = element.get("inferno");

    let mut next = unit.mount(weapon).and_then(|m| m.linked);
    let mut visited = Vec::new();
    while let Some(id) = next {
        if visited.contains(&id) {
            break;
        }
        visited.push(id);

        let Some(ammo) = unit.mount_mut(id) else {
            break;
        };
        next = ammo.linked;
        if !ammo.is_ammo() {
            continue;
        }

        let pair = if ammo.equipment.munition() == Some(MunitionType::Inferno) {
            inferno
        } else {
            standard
        };
        let Some(pair) = pair else {
            continue;
        };
        let parsed = pair
            .split_once(':')
            .and_then(|(left, original)| Some((left.trim().parse::<i32>().ok()?, original.trim().parse::<i32>().ok()?)));
        match parsed {
            Some((left, original)) => {
                ammo.original_shots = original;
                ammo.shots_left = left;
            }
            None => diags.warn(format!("Found invalid shots pair: {}.", pair)),
        }
    }
}
