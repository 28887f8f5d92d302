//! Unit locations: armor, internal structure and critical slots

use serde::{Deserialize, Serialize};

use super::mount::CriticalSlot;

/// Armor or internal structure value of one location side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArmorValue {
    Points(i32),
    /// The side does not exist for this location
    NotApplicable,
    Destroyed,
}

impl ArmorValue {
    /// Whether this value is larger than `max` allows.
    ///
    /// Sentinels never exceed anything. Numeric points exceed a sentinel
    /// maximum, since a side that started as N/A or destroyed holds no points.
    pub fn exceeds(&self, max: ArmorValue) -> bool {
        match (*self, max) {
            (ArmorValue::Points(p), ArmorValue::Points(m)) => p > m,
            (ArmorValue::Points(_), _) => true,
            _ => false,
        }
    }

    pub fn points(&self) -> Option<i32> {
        match self {
            ArmorValue::Points(p) => Some(*p),
            _ => None,
        }
    }
}

impl Default for ArmorValue {
    fn default() -> Self {
        ArmorValue::Points(0)
    }
}

/// Exposure state of a location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Exposure {
    #[default]
    Normal,
    Breached,
}

/// Rear armor of a location that has it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RearArmor {
    pub current: ArmorValue,
    pub original: ArmorValue,
}

/// One location of a unit
#[derive(Debug, Clone, Serialize)]
pub struct Location {
    pub name: String,
    pub armor: ArmorValue,
    pub original_armor: ArmorValue,
    pub internal: ArmorValue,
    pub original_internal: ArmorValue,
    pub rear: Option<RearArmor>,
    pub exposure: Exposure,
    pub blown_off: bool,
    /// Vehicles only
    pub stabilizer_hit: bool,
    /// Fixed-length slot table; `None` is an empty slot
    pub criticals: Vec<Option<CriticalSlot>>,
}

impl Location {
    pub fn new(name: impl Into<String>, armor: i32, internal: i32, slots: usize) -> Self {
        Self {
            name: name.into(),
            armor: ArmorValue::Points(armor),
            original_armor: ArmorValue::Points(armor),
            internal: ArmorValue::Points(internal),
            original_internal: ArmorValue::Points(internal),
            rear: None,
            exposure: Exposure::Normal,
            blown_off: false,
            stabilizer_hit: false,
            criticals: vec![None; slots],
        }
    }

    pub fn with_rear(mut self, rear: i32) -> Self {
        self.rear = Some(RearArmor {
            current: ArmorValue::Points(rear),
            original: ArmorValue::Points(rear),
        });
        self
    }

    pub fn has_rear_armor(&self) -> bool {
        self.rear.is_some()
    }

    pub fn is_destroyed(&self) -> bool {
        self.internal == ArmorValue::Destroyed
    }

    pub fn slot_count(&self) -> usize {
        self.criticals.len()
    }

    /// Index of the first empty slot
    pub fn first_free_slot(&self) -> Option<usize> {
        self.criticals.iter().position(Option::is_none)
    }

    pub fn free_slots(&self) -> usize {
        self.criticals.iter().filter(|c| c.is_none()).count()
    }

    /// Every occupied slot
    pub fn slots_mut(&mut self) -> impl Iterator<Item = &mut CriticalSlot> {
        self.criticals.iter_mut().flatten()
    }
}
