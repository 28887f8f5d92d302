//! Muster - unit roster reconstitution
//!
//! Reads saved unit-list documents and rebuilds each unit from its catalog
//! template: armor, criticals, ammunition, crew, bays and cross-unit links.

pub mod catalog;
pub mod core;
pub mod document;
pub mod model;
pub mod reader;

pub use crate::catalog::Catalogs;
pub use crate::core::{MusterError, ReaderConfig, Result};
pub use crate::reader::{Collection, Roster, RosterReader};
