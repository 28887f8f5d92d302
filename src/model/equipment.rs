//! Equipment types: weapons, ammunition and miscellaneous gear
//!
//! Types are immutable once loaded and shared between mounts with `Arc`.

use serde::{Deserialize, Serialize};

/// Broad equipment category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentKind {
    Weapon,
    Ammo,
    Misc,
}

/// Ammunition sub-type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MunitionType {
    #[default]
    Standard,
    Inferno,
    Cluster,
    ArmorPiercing,
    Precision,
    Tracer,
    Incendiary,
    Thunder,
    Swarm,
    Fragmentation,
    Smoke,
}

/// Behaviour flags the reader cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentFlag {
    /// Large-craft weapon bay grouping weapons and their ammo
    WeaponBay,
    /// Battle armor modular equipment adaptor
    BaModularMount,
    /// Battle armor manipulator (arm)
    BaManipulator,
    /// Battle armor anti-personnel weapon mount
    BaApMount,
    /// Personal or support infantry weapon
    InfantryWeapon,
}

/// Ammunition properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmmoSpec {
    /// Weapons this ammo feeds, e.g. "LRM" or "AC/5"
    pub family: String,
    #[serde(default)]
    pub munition: MunitionType,
    /// Shots per ton (or per load for mass-based units)
    pub shots: i32,
    /// Mass of a single shot in kilograms
    #[serde(default)]
    pub kg_per_shot: f64,
}

/// A kind of equipment that can be mounted on a unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentType {
    pub internal_name: String,
    pub name: String,
    #[serde(default)]
    pub lookup_names: Vec<String>,
    pub kind: EquipmentKind,
    #[serde(default)]
    pub tonnage: f64,
    #[serde(default = "default_criticals")]
    pub criticals: usize,
    #[serde(default)]
    pub ammo: Option<AmmoSpec>,
    #[serde(default)]
    pub flags: Vec<EquipmentFlag>,
}

fn default_criticals() -> usize {
    1
}

impl EquipmentType {
    pub fn is_ammo(&self) -> bool {
        self.kind == EquipmentKind::Ammo && self.ammo.is_some()
    }

    pub fn ammo(&self) -> Option<&AmmoSpec> {
        if self.kind == EquipmentKind::Ammo {
            self.ammo.as_ref()
        } else {
            None
        }
    }

    pub fn has_flag(&self, flag: EquipmentFlag) -> bool {
        self.flags.contains(&flag)
    }

    /// True when `name` is this type's internal name or one of its lookup names
    pub fn answers_to(&self, name: &str) -> bool {
        self.internal_name == name || self.name == name || self.lookup_names.iter().any(|n| n == name)
    }

    pub fn munition(&self) -> Option<MunitionType> {
        self.ammo().map(|a| a.munition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lrm_ammo() -> EquipmentType {
        EquipmentType {
            internal_name: "IS Ammo LRM-20".into(),
            name: "LRM 20 Ammo".into(),
            lookup_names: vec!["ISLRM20 Ammo".into()],
            kind: EquipmentKind::Ammo,
            tonnage: 1.0,
            criticals: 1,
            ammo: Some(AmmoSpec {
                family: "LRM".into(),
                munition: MunitionType::Standard,
                shots: 6,
                kg_per_shot: 0.0,
            }),
            flags: vec![],
        }
    }

    #[test]
    fn test_ammo_accessors() {
        let ammo = lrm_ammo();
        assert!(ammo.is_ammo());
        assert_eq!(ammo.ammo().unwrap().shots, 6);
        assert_eq!(ammo.munition(), Some(MunitionType::Standard));
    }

    #[test]
    fn test_weapon_has_no_ammo_spec() {
        let mut weapon = lrm_ammo();
        weapon.kind = EquipmentKind::Weapon;
        assert!(!weapon.is_ammo());
        assert!(weapon.ammo().is_none());
    }

    #[test]
    fn test_lookup_names() {
        let ammo = lrm_ammo();
        assert!(ammo.answers_to("ISLRM20 Ammo"));
        assert!(ammo.answers_to("IS Ammo LRM-20"));
        assert!(!ammo.answers_to("LRM-20"));
    }
}
