//! Pilot and crew elements
//!
//! A `pilot` element is a one-seat record. A `crew` element names a cockpit
//! layout and carries `crewMember` children, each bound to a seat by its
//! `slot` attribute. Member attributes are read over the crew element's own
//! attributes, so crew-wide values act as defaults.

use super::attributes::{AttributeBag, Attributes, DEAD};
use super::diagnostics::Diagnostics;
use super::entity::{restore_options, Outcome};
use super::ReaderEnv;
use crate::catalog::OptionCategory;
use crate::document::Element;
use crate::model::{AeroSkills, Crew, CrewType, Gender, Unit, UnitKind};

/// A pilot record outside any unit
pub fn read_loose_pilot(element: &Element, env: &ReaderEnv, diags: &mut Diagnostics) -> Crew {
    let attrs = AttributeBag::from_element(element);
    let mut crew = Crew::new(CrewType::Single);
    bind_crew(&mut crew, None, &attrs, env, diags);
    bind_member(&mut crew, 0, &attrs, env, diags);
    crew
}

/// A multi-seat crew record outside any unit
pub fn read_loose_crew(element: &Element, env: &ReaderEnv, diags: &mut Diagnostics) -> Crew {
    let attrs = AttributeBag::from_element(element);
    let mut crew = read_members(element, &attrs, env, diags);
    bind_crew(&mut crew, None, &attrs, env, diags);
    crew
}

/// A pilot record replacing a unit's crew
pub fn read_unit_pilot(
    unit: &mut Unit,
    element: &Element,
    env: &ReaderEnv,
    diags: &mut Diagnostics,
) -> Outcome {
    let attrs = AttributeBag::from_element(element);
    let crew_type = unit.crew.as_ref().map_or(CrewType::Single, |c| c.crew_type);

    let mut crew = Crew::new(crew_type);
    crew.size = unit.full_crew_size;
    crew.current_size = unit.full_crew_size;
    bind_crew(&mut crew, Some(&mut *unit), &attrs, env, diags);
    bind_member(&mut crew, 0, &attrs, env, diags);

    if unit.kind == UnitKind::LandAirMech {
        crew.aero = Some(aero_skills(&crew, &attrs, env, diags));
    }

    unit.crew = Some(crew);
    Outcome::Applied
}

/// A multi-seat crew record replacing a unit's crew
pub fn read_unit_crew(
    unit: &mut Unit,
    element: &Element,
    env: &ReaderEnv,
    diags: &mut Diagnostics,
) -> Outcome {
    let attrs = AttributeBag::from_element(element);
    let mut crew = read_members(element, &attrs, env, diags);
    crew.size = unit.full_crew_size;
    crew.current_size = unit.full_crew_size;
    bind_crew(&mut crew, Some(&mut *unit), &attrs, env, diags);
    unit.crew = Some(crew);
    Outcome::Applied
}

/// Flying skills of a land-air mech pilot, read from the "Aero" attribute variants
fn aero_skills(crew: &Crew, attrs: &AttributeBag, env: &ReaderEnv, diags: &mut Diagnostics) -> AeroSkills {
    let stripped = attrs.strip_infix("Aero");
    if stripped == *attrs {
        let pilot = crew.members.first().cloned().unwrap_or_default();
        return AeroSkills::from(&pilot);
    }

    let mut dummy = Crew::new(CrewType::Single);
    bind_member(&mut dummy, 0, &stripped, env, diags);
    AeroSkills::from(&dummy.members[0])
}

/// Every seat starts empty and is filled by an explicit member element
fn read_members(element: &Element, crew_attrs: &AttributeBag, env: &ReaderEnv, diags: &mut Diagnostics) -> Crew {
    let crew_type = match crew_attrs.get("crewType") {
        None => CrewType::Single,
        Some(name) => CrewType::from_name(name).unwrap_or_else(|| {
            diags.warn(format!("Unknown crew type: {}.", name));
            CrewType::Single
        }),
    };

    let mut crew = Crew::new(crew_type);
    for member in &mut crew.members {
        member.missing = true;
    }

    for child in element.children().filter(|c| c.is("crewMember")) {
        let mut attrs = crew_attrs.clone();
        attrs.merge(child);

        let slot = match attrs.get("slot").map(str::parse::<usize>) {
            Some(Ok(slot)) if slot < crew.slot_count() => slot,
            other => {
                let shown = attrs.get("slot").unwrap_or("none");
                if matches!(other, Some(Err(_))) {
                    diags.warn(format!("Illegal crew slot index: {}", shown));
                } else {
                    diags.warn(format!(
                        "Illegal crew slot index for {} cockpit: {}",
                        crew_type.name(),
                        shown
                    ));
                }
                continue;
            }
        };

        crew.members[slot].missing = false;
        bind_member(&mut crew, slot, &attrs, env, diags);
    }
    crew
}

/// Crew-wide values: bonuses, sizes, abilities, ejection
fn bind_crew<A: Attributes>(
    crew: &mut Crew,
    unit: Option<&mut Unit>,
    attrs: &A,
    env: &ReaderEnv,
    diags: &mut Diagnostics,
) {
    crew.init_bonus = attrs.int("initB", diags).unwrap_or(0);
    crew.command_bonus = attrs.int("commandB", diags).unwrap_or(0);

    let full_size = unit.as_ref().map(|u| u.full_crew_size);
    if attrs.raw("size").is_some() {
        match attrs.get("size") {
            Some(_) => crew.size = attrs.int("size", diags).unwrap_or(1),
            None => {
                if let Some(full) = full_size {
                    crew.size = full;
                    crew.current_size = full;
                }
            }
        }
    }
    if attrs.raw("currentsize").is_some() {
        match attrs.get("currentsize") {
            Some(_) => crew.current_size = attrs.int("currentsize", diags).unwrap_or(1),
            None => {
                if let Some(full) = full_size {
                    crew.current_size = full;
                }
            }
        }
    }

    let config = env.config;
    let lists = [
        (config.pilot_advantages, "advantages", OptionCategory::PilotAbility, "advantage"),
        (config.edge, "edge", OptionCategory::EdgeTrigger, "edge"),
        (config.implants, "implants", OptionCategory::Implant, "implants"),
    ];
    for (enabled, key, category, what) in lists {
        if let (true, Some(list)) = (enabled, attrs.get(key)) {
            restore_options(&mut crew.options, list, category, what, env, diags);
        }
    }

    if attrs.get("ejected").is_some() {
        crew.ejected = attrs.flag("ejected");
    }

    let Some(ejection) = unit.and_then(|u| u.ejection.as_mut()) else {
        return;
    };
    let settings = [
        ("autoeject", &mut ejection.auto_eject),
        ("condejectammo", &mut ejection.on_ammo_explosion),
        ("condejectengine", &mut ejection.on_engine_crit),
        ("condejectctdest", &mut ejection.on_ct_destroyed),
        ("condejectheadshot", &mut ejection.on_head_shot),
    ];
    for (key, field) in settings {
        if attrs.get(key).is_some() {
            *field = attrs.flag(key);
        }
    }
}

/// Skill value in 0..=max_skill; anything else is reported
fn skill<A: Attributes>(attrs: &A, key: &str, max: i32, diags: &mut Diagnostics) -> Option<i32> {
    let text = attrs.get(key)?;
    match text.parse::<i32>() {
        Ok(v) if (0..=max).contains(&v) => Some(v),
        _ => {
            diags.warn(format!("Found invalid {} value: {}.", key, text));
            None
        }
    }
}

/// Skills and identity of one seat. Returns false when the seat was left unset.
pub fn bind_member<A: Attributes>(
    crew: &mut Crew,
    slot: usize,
    attrs: &A,
    env: &ReaderEnv,
    diags: &mut Diagnostics,
) -> bool {
    let config = env.config;
    let max = config.max_skill;

    let has_gun = !attrs.is_blank("gunnery");
    let has_class_gun = ["gunneryL", "gunneryM", "gunneryB"]
        .iter()
        .all(|k| !attrs.is_blank(k));

    if !has_gun && !has_class_gun {
        diags.warn("Could not find gunnery for pilot.");
        return false;
    }
    if attrs.is_blank("piloting") {
        diags.warn("Could not find piloting for pilot.");
        return false;
    }

    let gunnery = if has_gun {
        let Some(g) = skill(attrs, "gunnery", max, diags) else {
            return false;
        };
        Some(g)
    } else {
        None
    };

    let classes = if has_class_gun {
        let Some(l) = skill(attrs, "gunneryL", max, diags) else {
            return false;
        };
        let Some(m) = skill(attrs, "gunneryM", max, diags) else {
            return false;
        };
        let Some(b) = skill(attrs, "gunneryB", max, diags) else {
            return false;
        };
        Some((l, m, b))
    } else {
        None
    };

    let (gunnery, (gunnery_l, gunnery_m, gunnery_b)) = match (gunnery, classes) {
        (Some(g), Some(c)) => (g, c),
        (Some(g), None) => (g, (g, g, g)),
        (None, Some((l, m, b))) => ((l + m + b).div_euclid(3), (l, m, b)),
        (None, None) => return false,
    };

    let Some(piloting) = skill(attrs, "piloting", max, diags) else {
        return false;
    };

    let toughness = if config.toughness {
        attrs.int("toughness", diags).unwrap_or(0)
    } else {
        0
    };

    let artillery = if config.artillery_skill {
        skill(attrs, "artillery", max, diags).unwrap_or(gunnery)
    } else {
        gunnery
    };

    let Some(member) = crew.member_mut(slot) else {
        return false;
    };
    member.gunnery = gunnery;
    member.gunnery_l = gunnery_l;
    member.gunnery_m = gunnery_m;
    member.gunnery_b = gunnery_b;
    member.piloting = piloting;
    member.artillery = artillery;
    member.toughness = toughness;

    member.name = attrs.get("name").unwrap_or("Unnamed").to_string();
    if let Some(nick) = attrs.get("nick") {
        member.nickname = nick.to_string();
    }
    if let Some(gender) = attrs.get("gender") {
        match Gender::parse(gender) {
            Some(g) => member.gender = g,
            None => diags.warn(format!("Found invalid gender value: {}.", gender)),
        }
    }
    if let Some(category) = attrs.get("portraitCat") {
        member.portrait.category = category.to_string();
    }
    if let Some(file) = attrs.get("portraitFile") {
        member.portrait.file = file.to_string();
    }
    if let Some(id) = attrs.get("externalId") {
        member.external_id = id.to_string();
    }

    if let Some(extra) = attrs.get("extraData") {
        for pair in extra.split(config.extra_data_separator.as_str()) {
            match pair.split_once(config.extra_data_assign.as_str()) {
                Some((key, value)) => {
                    member.extra_data.insert(key.to_string(), value.to_string());
                }
                None => diags.warn(format!("Found invalid extraData entry: {}.", pair)),
            }
        }
    }

    match attrs.get("hits") {
        Some(DEAD) => {
            member.dead = true;
            let who = crew.name_and_role(slot);
            diags.warn(format!("{} is dead.", who));
        }
        Some(_) => {
            if let Some(hits) = attrs.int_in("hits", 0, config.max_crew_hits, diags) {
                member.hits = hits;
            }
        }
        None => {}
    }

    true
}
