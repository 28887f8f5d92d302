//! Data-driven catalogs of equipment, unit templates and named options
//!
//! Catalogs are loaded once from TOML and then only read. A read never
//! changes a catalog; every unit it produces is a fresh instance.

pub mod equipment;
pub mod options;
pub mod units;

use std::path::Path;
use thiserror::Error;
use tracing::info;

pub use equipment::EquipmentCatalog;
pub use options::{OptionCatalog, OptionCategory};
pub use units::{UnitCatalog, UnitSource, UnitTemplate};

use crate::model::Unit;

/// Error type for catalog loading and instantiation
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("{unit} references unknown equipment '{equipment}'")]
    UnknownEquipment { unit: String, equipment: String },

    #[error("Invalid template {unit}: {reason}")]
    InvalidTemplate { unit: String, reason: String },
}

/// Every catalog a read needs
#[derive(Debug, Default)]
pub struct Catalogs {
    pub equipment: EquipmentCatalog,
    pub units: UnitCatalog,
    pub options: OptionCatalog,
}

impl Catalogs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `equipment/`, `units/` and an optional `options.toml` below `root`
    pub fn load_directory(root: &Path) -> Result<Self, CatalogError> {
        let mut catalogs = Self::new();

        let equipment_dir = root.join("equipment");
        if equipment_dir.is_dir() {
            catalogs.equipment.load_directory(&equipment_dir)?;
        }

        let units_dir = root.join("units");
        if units_dir.is_dir() {
            catalogs.units.load_directory(&units_dir)?;
        }

        let options_file = root.join("options.toml");
        if options_file.is_file() {
            catalogs.options = OptionCatalog::load_file(&options_file)?;
        }

        info!(
            "Loaded {} equipment types and {} unit templates from {}",
            catalogs.equipment.len(),
            catalogs.units.len(),
            root.display()
        );
        Ok(catalogs)
    }
}

impl UnitSource for Catalogs {
    fn find(&self, name: &str) -> Option<&UnitTemplate> {
        self.units.get_by_name(name)
    }

    fn instantiate(&self, template: &UnitTemplate) -> Result<Unit, CatalogError> {
        template.instantiate(&self.equipment)
    }
}
