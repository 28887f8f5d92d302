//! Cross-references between units: kills, C3 networks, escape craft,
//! transports, game ids and weapon-bay ammunition

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info};

use super::attributes::Attributes;
use super::diagnostics::Diagnostics;
use super::entity::Outcome;
use super::ReaderEnv;
use crate::document::Element;
use crate::model::systems::EscapeLedger;
use crate::model::{EquipmentError, Mount, Unit};

/// Record kills. A unit killed twice keeps the last killer named.
pub fn read_kills(element: &Element, kills: &mut BTreeMap<String, String>) {
    for kill in element.children().filter(|c| c.is("kill")) {
        if let (Some(killed), Some(killer)) = (kill.get("killed"), kill.get("killer")) {
            kills.insert(killed.to_string(), killer.to_string());
        }
    }
}

pub fn read_c3i_links(unit: &mut Unit, element: &Element, _env: &ReaderEnv, _diags: &mut Diagnostics) -> Outcome {
    for link in element.children().filter(|c| c.is("c3i_link")) {
        let Some(partner) = link.get("link") else {
            continue;
        };
        if let Some(pos) = unit.c3.link_c3i(partner) {
            info!("Loading C3i UUID {}: {}", pos, partner);
        }
    }
    Outcome::Applied
}

pub fn read_nc3_links(unit: &mut Unit, element: &Element, _env: &ReaderEnv, _diags: &mut Diagnostics) -> Outcome {
    for link in element.children().filter(|c| c.is("NC3_link")) {
        let Some(partner) = link.get("link") else {
            continue;
        };
        if let Some(pos) = unit.c3.link_nc3(partner) {
            info!("Loading NC3 UUID {}: {}", pos, partner);
        }
    }
    Outcome::Applied
}

pub fn read_escape_craft(unit: &mut Unit, element: &Element, _env: &ReaderEnv, diags: &mut Diagnostics) -> Outcome {
    if !unit.kind.launches_escape_craft() {
        return Outcome::NotApplicable;
    }
    let Some(escape) = unit.escape.as_mut() else {
        return Outcome::NotApplicable;
    };
    match element.get("id") {
        Some(id) => escape.launched_craft.push(id.to_string()),
        None => diags.warn("Invalid external entity id in EscapeCraft tag."),
    }
    Outcome::Applied
}

pub fn read_escaped_passengers(unit: &mut Unit, element: &Element, _env: &ReaderEnv, diags: &mut Diagnostics) -> Outcome {
    read_escapees(unit, element, diags, |ledger| &mut ledger.passengers)
}

pub fn read_escaped_crew(unit: &mut Unit, element: &Element, _env: &ReaderEnv, diags: &mut Diagnostics) -> Outcome {
    read_escapees(unit, element, diags, |ledger| &mut ledger.crew)
}

/// Head counts keyed by the id of the unit they escaped from
fn read_escapees(
    unit: &mut Unit,
    element: &Element,
    diags: &mut Diagnostics,
    pick: fn(&mut EscapeLedger) -> &mut BTreeMap<String, i32>,
) -> Outcome {
    if !unit.kind.carries_escapees() {
        return Outcome::NotApplicable;
    }
    let Some(escape) = unit.escape.as_mut() else {
        return Outcome::NotApplicable;
    };
    let ledger = pick(escape);

    for entry in element.children() {
        let Some(id) = entry.get("id") else {
            diags.warn(format!("Missing origin id in {} entry.", element.name()));
            continue;
        };
        if let Some(number) = entry.int("number", diags) {
            ledger.insert(id.to_string(), number);
        }
    }
    Outcome::Applied
}

pub fn read_conveyance(unit: &mut Unit, element: &Element, _env: &ReaderEnv, diags: &mut Diagnostics) -> Outcome {
    match element.get("id").map(str::parse::<i32>) {
        Some(Ok(id)) => unit.transport_id = Some(id),
        _ => diags.warn("Invalid transport id in conveyance tag."),
    }
    Outcome::Applied
}

/// Saved game id; a unit attached to a live game keeps the id the game gave it
pub fn read_game_id(unit: &mut Unit, element: &Element, _env: &ReaderEnv, diags: &mut Diagnostics) -> Outcome {
    if unit.in_game {
        return Outcome::Applied;
    }
    match element.get("id").map(str::parse::<i32>) {
        Some(Ok(id)) => unit.game_id = Some(id),
        _ => diags.warn("Invalid id in conveyance tag."),
    }
    Outcome::Applied
}

pub fn read_force(unit: &mut Unit, element: &Element, _env: &ReaderEnv, _diags: &mut Diagnostics) -> Outcome {
    unit.force = element.get("force").map(str::to_string);
    Outcome::Applied
}

/// Load extra ammunition into the weapon bay whose critical slot is
/// `bay_index` (1-based) in `loc`
pub fn add_extra_ammo_to_bay(
    unit: &mut Unit,
    loc: usize,
    type_name: &str,
    bay_index: &str,
    env: &ReaderEnv,
    diags: &mut Diagnostics,
) {
    let bay = match bay_index.parse::<usize>() {
        Ok(i) if i >= 1 => unit.mount_at(loc, i - 1),
        _ => None,
    };
    let Some(bay) = bay else {
        diags.warn(format!(
            "Could not find weapons bay {} in location {} for {}.",
            bay_index, loc, type_name
        ));
        return;
    };
    let Some(ammo) = env.equipment.ammo(type_name) else {
        diags.warn(format!("Could not find ammo type {} for weapons bay.", type_name));
        return;
    };

    let rear = unit.mount(bay).is_some_and(|m| m.rear_mounted);
    let added = match unit.add_equipment(Arc::clone(&ammo), loc, rear) {
        Ok(id) => id,
        Err(EquipmentError::LocationFull { .. }) => {
            debug!("No free slot for bay ammo {} in location {}, mounting it slotless", type_name, loc);
            unit.add_mount(Mount::new(ammo, loc, rear))
        }
        Err(e) => {
            diags.warn(format!("Could not add bay ammo {}: {}", type_name, e));
            return;
        }
    };
    if let Some(bay) = unit.mount_mut(bay) {
        bay.add_ammo_to_bay(added);
    }
}
