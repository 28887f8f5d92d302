//! Named option values: quirks, pilot abilities, edge triggers, implants

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value of a named option. Bare names are switched on; "name value" carries text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Flag(bool),
    Text(String),
}

/// Set of options keyed by name
pub type OptionSet = BTreeMap<String, OptionValue>;

/// Split one saved entry into its name and value.
///
/// `"weapon_specialist Medium Laser"` → (`weapon_specialist`, `Text("Medium Laser")`),
/// `"battle_fists_la"` → (`battle_fists_la`, `Flag(true)`).
pub fn split_entry(entry: &str) -> (&str, OptionValue) {
    let entry = entry.trim();
    match entry.split_once(' ') {
        Some((name, value)) => (name, OptionValue::Text(value.trim().to_string())),
        None => (entry, OptionValue::Flag(true)),
    }
}
