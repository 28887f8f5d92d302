//! Unit-list document reader
//!
//! Reads a unit-list document into a `Roster`. Only two things abort a
//! read: text that is not a well-formed document, and a root element that is
//! not a record, unit or entity. Every other problem is written to the
//! roster's diagnostics and skips the smallest piece of work it can.

pub mod attributes;
pub mod crew;
pub mod diagnostics;
pub mod dispatch;
pub mod entity;
pub mod links;
pub mod location;
pub mod resolver;
pub mod roster;
pub mod systems;

use std::path::Path;
use tracing::warn;

pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use roster::{Collection, Roster};

use crate::catalog::{Catalogs, EquipmentCatalog, OptionCatalog, UnitSource};
use crate::core::{MusterError, ReaderConfig, Result};
use crate::document::{self, Element};

/// Read-only context shared by every handler
#[derive(Clone, Copy)]
pub struct ReaderEnv<'a> {
    pub units: &'a dyn UnitSource,
    pub equipment: &'a EquipmentCatalog,
    pub options: &'a OptionCatalog,
    pub config: &'a ReaderConfig,
}

impl<'a> ReaderEnv<'a> {
    pub fn new(catalogs: &'a Catalogs, config: &'a ReaderConfig) -> Self {
        Self {
            units: catalogs,
            equipment: &catalogs.equipment,
            options: &catalogs.options,
            config,
        }
    }
}

/// Reads unit-list documents against a fixed set of catalogs
pub struct RosterReader<'a> {
    env: ReaderEnv<'a>,
}

impl<'a> RosterReader<'a> {
    pub fn new(catalogs: &'a Catalogs, config: &'a ReaderConfig) -> Self {
        Self {
            env: ReaderEnv::new(catalogs, config),
        }
    }

    /// Use a different template source with the given equipment and options
    pub fn with_source(
        units: &'a dyn UnitSource,
        equipment: &'a EquipmentCatalog,
        options: &'a OptionCatalog,
        config: &'a ReaderConfig,
    ) -> Self {
        Self {
            env: ReaderEnv {
                units,
                equipment,
                options,
                config,
            },
        }
    }

    pub fn read_str(&self, xml: &str) -> Result<Roster> {
        let root = document::parse_document(xml)?;
        self.read_element(&root)
    }

    pub fn read_file(&self, path: &Path) -> Result<Roster> {
        let xml = std::fs::read_to_string(path)?;
        self.read_str(&xml)
    }

    /// Read an already-built element tree
    pub fn read_element(&self, root: &Element) -> Result<Roster> {
        let roster = dispatch::read_root(root, &self.env);

        if roster.diagnostics.has_fatal() {
            return Err(MusterError::UnrecognizedRoot(root.name().to_string()));
        }
        if roster.has_warnings() {
            warn!("{}", roster.warning_text());
        }
        Ok(roster)
    }
}
