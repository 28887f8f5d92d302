//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a unit instance produced by a read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(pub Uuid);

impl UnitId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UnitId {
    fn default() -> Self {
        Self::new()
    }
}

/// Index of an equipment mount within its unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MountId(pub usize);

/// External identifier used by campaign tools. "-1" means unassigned.
pub const NO_EXTERNAL_ID: &str = "-1";

/// Offboard deployment direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OffBoardDirection {
    North,
    South,
    East,
    West,
}

impl OffBoardDirection {
    /// Direction from its saved numeric code
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::North),
            1 => Some(Self::South),
            2 => Some(Self::East),
            3 => Some(Self::West),
            _ => None,
        }
    }
}

/// Deployment zone meaning "no starting position"
pub const START_NONE: i32 = -1;
