//! Entity elements: unit-level attributes and the child tag table

use super::attributes::{split_list, Attributes};
use super::diagnostics::Diagnostics;
use super::{crew, links, location, resolver, systems, ReaderEnv};
use crate::catalog::OptionCategory;
use crate::core::types::{OffBoardDirection, NO_EXTERNAL_ID, START_NONE};
use crate::document::Element;
use crate::model::options::split_entry;
use crate::model::systems::OffBoard;
use crate::model::{OptionSet, Unit};

/// What a child handler did with its element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// The unit lacks the system the element describes
    NotApplicable,
}

pub type Handler = fn(&mut Unit, &Element, &ReaderEnv, &mut Diagnostics) -> Outcome;

/// Child elements an entity may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityTag {
    Pilot,
    Crew,
    Location,
    Motive,
    TurretLock,
    Turret2Lock,
    StructuralIntegrity,
    HeatSinks,
    Fuel,
    KfIntegrity,
    SailIntegrity,
    TransportBay,
    AeroCriticals,
    DropshipCriticals,
    TankCriticals,
    Bombs,
    C3iLinks,
    Nc3Links,
    ModularEquipmentMount,
    AntiPersonnelMount,
    EscapeCraft,
    EscapedPassengers,
    EscapedCrew,
    OriginalStructure,
    OriginalMen,
    Conveyance,
    GameId,
    Force,
}

impl EntityTag {
    const TAGS: [(&'static str, EntityTag); 28] = [
        ("pilot", EntityTag::Pilot),
        ("crew", EntityTag::Crew),
        ("location", EntityTag::Location),
        ("motive", EntityTag::Motive),
        ("turretlock", EntityTag::TurretLock),
        ("turret2lock", EntityTag::Turret2Lock),
        ("structural", EntityTag::StructuralIntegrity),
        ("heat", EntityTag::HeatSinks),
        ("fuel", EntityTag::Fuel),
        ("KF", EntityTag::KfIntegrity),
        ("sail", EntityTag::SailIntegrity),
        ("transportBay", EntityTag::TransportBay),
        ("acriticals", EntityTag::AeroCriticals),
        ("dcriticals", EntityTag::DropshipCriticals),
        ("tcriticals", EntityTag::TankCriticals),
        ("bombs", EntityTag::Bombs),
        ("c3iset", EntityTag::C3iLinks),
        ("NC3set", EntityTag::Nc3Links),
        ("modularEquipmentMount", EntityTag::ModularEquipmentMount),
        ("antiPersonnelMount", EntityTag::AntiPersonnelMount),
        ("EscapeCraft", EntityTag::EscapeCraft),
        ("EscapedPassengers", EntityTag::EscapedPassengers),
        ("EscapedCrew", EntityTag::EscapedCrew),
        ("ONumberOfPods", EntityTag::OriginalStructure),
        ("ONumberOfMen", EntityTag::OriginalMen),
        ("Conveyance", EntityTag::Conveyance),
        ("Game", EntityTag::GameId),
        ("Force", EntityTag::Force),
    ];

    /// Case-insensitive tag lookup; unknown tags are `None` and ignored by callers
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::TAGS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(tag))
            .map(|(_, t)| *t)
    }

    pub fn handler(self) -> Handler {
        match self {
            EntityTag::Pilot => crew::read_unit_pilot,
            EntityTag::Crew => crew::read_unit_crew,
            EntityTag::Location => location::read_location,
            EntityTag::Motive => systems::read_motive,
            EntityTag::TurretLock => systems::read_turret_lock,
            EntityTag::Turret2Lock => systems::read_turret2_lock,
            EntityTag::StructuralIntegrity => systems::read_structural_integrity,
            EntityTag::HeatSinks => systems::read_heat_sinks,
            EntityTag::Fuel => systems::read_fuel,
            EntityTag::KfIntegrity => systems::read_kf_integrity,
            EntityTag::SailIntegrity => systems::read_sail_integrity,
            EntityTag::TransportBay => systems::read_transport_bay,
            EntityTag::AeroCriticals => systems::read_aero_criticals,
            EntityTag::DropshipCriticals => systems::read_dropship_criticals,
            EntityTag::TankCriticals => systems::read_tank_criticals,
            EntityTag::Bombs => systems::read_bombs,
            EntityTag::C3iLinks => links::read_c3i_links,
            EntityTag::Nc3Links => links::read_nc3_links,
            EntityTag::ModularEquipmentMount => systems::read_modular_mount,
            EntityTag::AntiPersonnelMount => systems::read_anti_personnel_mount,
            EntityTag::EscapeCraft => links::read_escape_craft,
            EntityTag::EscapedPassengers => links::read_escaped_passengers,
            EntityTag::EscapedCrew => links::read_escaped_crew,
            EntityTag::OriginalStructure => systems::read_original_structure,
            EntityTag::OriginalMen => systems::read_original_men,
            EntityTag::Conveyance => links::read_conveyance,
            EntityTag::GameId => links::read_game_id,
            EntityTag::Force => links::read_force,
        }
    }
}

/// Resolve, bind and populate one entity element
pub fn read_entity(element: &Element, env: &ReaderEnv, diags: &mut Diagnostics) -> Option<Unit> {
    let Some(mut unit) = resolver::resolve_unit(element, env, diags) else {
        diags.warn("Failed to load entity!");
        return None;
    };

    bind_attributes(&mut unit, element, env, diags);

    for child in element.children() {
        let Some(tag) = EntityTag::from_tag(child.name()) else {
            continue;
        };
        if tag.handler()(&mut unit, child, env, diags) == Outcome::NotApplicable {
            diags.warn(format!(
                "The entity, {} has no use for a {} tag.",
                unit.short_name(),
                child.name()
            ));
        }
    }

    Some(unit)
}

/// Unit-level attributes of an entity element
pub fn bind_attributes(unit: &mut Unit, element: &Element, env: &ReaderEnv, diags: &mut Diagnostics) {
    unit.commander = element.flag("commander");
    unit.hidden = element.flag("hidden");

    if element.flag("offboard") {
        let distance = element.int("offboard_distance", diags);
        let direction = element
            .int("offboard_direction", diags)
            .and_then(OffBoardDirection::from_code);
        match (distance, direction) {
            (Some(distance), Some(direction)) => {
                unit.offboard = Some(OffBoard {
                    distance,
                    direction,
                })
            }
            _ => diags.warn(format!(
                "Incomplete offboard deployment for {}.",
                unit.short_name()
            )),
        }
    }

    unit.deploy_round = element.int("deployment", diags).unwrap_or(0);
    unit.starting_pos = element.int("deploymentZone", diags).unwrap_or(START_NONE);
    unit.never_deployed = element.is_blank("neverDeployed") || element.flag("neverDeployed");

    if unit.aero.is_some() {
        let velocity = element.int("velocity", diags);
        let altitude = element.int("altitude", diags);
        if let Some(aero) = unit.aero.as_mut() {
            if let Some(velocity) = velocity {
                aero.current_velocity = velocity;
                aero.next_velocity = velocity;
            }
            match altitude {
                Some(a) if a <= 0 => aero.land(),
                Some(a) => aero.lift_off(a),
                None => {}
            }
        }
    }

    unit.camo.category = element.attr_or_blank("camoCategory").to_string();
    unit.camo.file = element.attr_or_blank("camoFileName").to_string();

    unit.external_id = element
        .get("externalId")
        .unwrap_or(NO_EXTERNAL_ID)
        .to_string();

    if unit.picked_up_by.is_some() {
        unit.picked_up_by = Some(element.get("pickUpId").unwrap_or(NO_EXTERNAL_ID).to_string());
    }

    if let Some(quirks) = element.get("quirks") {
        restore_options(&mut unit.quirks, quirks, OptionCategory::UnitQuirk, "quirk", env, diags);
    }

    if let Some(master) = element.get("c3MasterIs") {
        unit.c3.master_is = Some(master.to_string());
    }
    if let Some(uuid) = element.get("c3UUID") {
        unit.c3.uuid = Some(uuid.to_string());
    }

    bind_infantry(unit, element, diags);
}

fn bind_infantry(unit: &mut Unit, element: &Element, diags: &mut Diagnostics) {
    let Some(infantry) = unit.infantry.as_mut() else {
        return;
    };

    if let Some(divisor) = element.float("armorDivisor", diags) {
        infantry.armor_divisor = divisor;
    }
    infantry.armor_encumbering |= !element.is_blank("armorEncumbering");
    infantry.spacesuit |= !element.is_blank("spacesuit");
    infantry.dest_armor |= !element.is_blank("destArmor");
    infantry.sneak_camo |= !element.is_blank("sneakCamo");
    infantry.sneak_ir |= !element.is_blank("sneakIR");
    infantry.sneak_ecm |= !element.is_blank("sneakECM");
    if let Some(spec) = element.int("infantrySpecializations", diags) {
        infantry.specializations = spec;
    }

    if let Some(squads) = element.int("squadNum", diags) {
        infantry.squad_count = squads;
        let men = infantry.auto_set_men();
        unit.initialize_internal(men, 0);
    }
}

/// Restore a `::` list of "name value" entries into `target`.
/// Names the catalog does not know for `category` are reported and skipped.
pub fn restore_options(
    target: &mut OptionSet,
    list: &str,
    category: OptionCategory,
    what: &str,
    env: &ReaderEnv,
    diags: &mut Diagnostics,
) {
    for entry in split_list(list, &env.config.list_separator) {
        let (name, value) = split_entry(entry);
        if env.options.knows(category, name) {
            target.insert(name.to_string(), value);
        } else {
            diags.warn(format!("Error restoring {}: {}.", what, entry));
        }
    }
}
