//! Domain model restored by the reader

pub mod bay;
pub mod crew;
pub mod equipment;
pub mod location;
pub mod mount;
pub mod options;
pub mod systems;
pub mod unit;

pub use bay::{Bay, BayKind};
pub use crew::{AeroSkills, Crew, CrewMember, CrewType, Gender};
pub use equipment::{AmmoSpec, EquipmentFlag, EquipmentKind, EquipmentType, MunitionType};
pub use location::{ArmorValue, Exposure, Location};
pub use mount::{CriticalSlot, Mount, SlotContent};
pub use options::{OptionSet, OptionValue};
pub use unit::{EquipmentError, Unit, UnitKind};
