//! Chassis/model text to a fresh unit

use tracing::error;

use super::attributes::Attributes;
use super::diagnostics::Diagnostics;
use super::ReaderEnv;
use crate::document::Element;
use crate::model::Unit;

/// Chassis names that stand for crews and pods rather than catalog units
fn synthetic_unit(chassis: &str) -> Option<Unit> {
    match chassis {
        "Vehicle Crew" | "Spacecraft Crew" => Some(Unit::ejected_crew(chassis)),
        "Pilot" | "MechWarrior" => Some(Unit::mechwarrior(chassis)),
        "Escape Pods" => Some(Unit::escape_pods(chassis)),
        _ => None,
    }
}

/// Build the unit an entity element names, or record why not
pub fn resolve_unit(element: &Element, env: &ReaderEnv, diags: &mut Diagnostics) -> Option<Unit> {
    let chassis = element.get("chassis").unwrap_or("");
    let model = element.get("model");

    if let Some(mut unit) = synthetic_unit(chassis) {
        if let Some(model) = model {
            unit.model = model.to_string();
        }
        return Some(unit);
    }

    if chassis.is_empty() {
        diags.warn("Could not find chassis for Entity.");
        return None;
    }

    let mut template = env.units.find(chassis);
    if let Some(model) = model {
        template = env
            .units
            .find(&format!("{} {}", chassis, model))
            .or_else(|| env.units.find(&format!("{} {}", model, chassis)));
    }

    let Some(template) = template else {
        match model {
            Some(model) => diags.warn(format!(
                "Could not find Entity with chassis: {}, and model: {}.",
                chassis, model
            )),
            None => diags.warn(format!("Could not find Entity with chassis: {}.", chassis)),
        }
        return None;
    };

    match env.units.instantiate(template) {
        Ok(unit) => Some(unit),
        Err(e) => {
            error!("Unable to load {}: {}", template.full_name(), e);
            diags.warn(format!("Unable to load {}: {}", template.full_name(), e));
            None
        }
    }
}
