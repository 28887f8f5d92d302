//! Transport bays

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BayKind {
    #[default]
    Cargo,
    Mech,
    Vehicle,
    Infantry,
    BattleArmor,
    Fighter,
    SmallCraft,
}

/// A transport bay; `id` is the bay number the document refers to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bay {
    pub id: i32,
    pub kind: BayKind,
    pub location: usize,
    pub doors: i32,
    pub current_doors: i32,
    pub damage: f64,
    pub capacity: f64,
    /// Ids of units loaded in the bay
    pub loaded: Vec<i32>,
}

impl Bay {
    pub fn new(id: i32, kind: BayKind, location: usize, doors: i32, capacity: f64) -> Self {
        Self {
            id,
            kind,
            location,
            doors,
            current_doors: doors,
            damage: 0.0,
            capacity,
            loaded: Vec::new(),
        }
    }

    pub fn unused_space(&self) -> f64 {
        (self.capacity - self.damage).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_reduces_space() {
        let mut bay = Bay::new(1, BayKind::Mech, 0, 2, 4.0);
        bay.damage = 1.5;
        assert_eq!(bay.unused_space(), 2.5);
        bay.damage = 9.0;
        assert_eq!(bay.unused_space(), 0.0);
    }
}
