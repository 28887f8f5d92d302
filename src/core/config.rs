//! Reader configuration with documented limits
//!
//! The numeric limits mirror the ranges the rules engine accepts for saved
//! state. Optional-rule switches decide whether rule-dependent crew fields
//! are restored at all.

use serde::Deserialize;
use std::path::Path;

use crate::core::error::MusterError;

/// Configuration for a read
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    // === LIMITS ===
    /// Highest legal gunnery/piloting/artillery value (0 is best)
    pub max_skill: i32,

    /// Highest legal crew hit count. A member at this count is unconscious
    /// or worse; "Dead" is recorded separately.
    pub max_crew_hits: i32,

    /// Upper bound for any numeric armor or internal structure value
    ///
    /// This is a sanity bound on the text only. The per-location template
    /// maximum is checked separately.
    pub max_armor_points: i32,

    /// Upper bound for a shots-remaining value before it is even compared
    /// against the mount's own capacity
    pub max_shots: i32,

    // === SEPARATORS ===
    /// Separator for quirk, ability, edge, implant and trooper lists
    pub list_separator: String,

    /// Separator between key=value pairs in crew extra data
    pub extra_data_separator: String,

    /// Separator between key and value inside one extra data pair
    pub extra_data_assign: String,

    // === OPTIONAL RULES ===
    /// Restore crew toughness
    pub toughness: bool,

    /// Restore a separate artillery skill (otherwise it follows gunnery)
    pub artillery_skill: bool,

    /// Restore special pilot abilities
    pub pilot_advantages: bool,

    /// Restore edge triggers
    pub edge: bool,

    /// Restore cybernetic implants
    pub implants: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_skill: 8,
            max_crew_hits: 5,
            max_armor_points: 2000,
            max_shots: 200,

            list_separator: "::".to_string(),
            extra_data_separator: "|".to_string(),
            extra_data_assign: "=".to_string(),

            toughness: true,
            artillery_skill: true,
            pilot_advantages: true,
            edge: true,
            implants: true,
        }
    }
}

impl ReaderConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, MusterError> {
        let config: ReaderConfig =
            toml::from_str(text).map_err(|e| MusterError::Config(e.to_string()))?;
        config.validate().map_err(MusterError::Config)?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load_file(path: &Path) -> Result<Self, MusterError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.max_skill < 0 || self.max_crew_hits < 0 {
            return Err("skill and hit limits must not be negative".into());
        }

        if self.max_armor_points <= 0 || self.max_shots <= 0 {
            return Err(format!(
                "max_armor_points ({}) and max_shots ({}) must be positive",
                self.max_armor_points, self.max_shots
            ));
        }

        if self.list_separator.is_empty()
            || self.extra_data_separator.is_empty()
            || self.extra_data_assign.is_empty()
        {
            return Err("separators must not be empty".into());
        }

        if self.extra_data_separator == self.extra_data_assign {
            return Err(format!(
                "extra_data_separator and extra_data_assign are both '{}'",
                self.extra_data_assign
            ));
        }

        Ok(())
    }
}
