//! Equipment catalog: every weapon, ammo and misc type, by name

use ahash::AHashMap;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

use super::CatalogError;
use crate::model::EquipmentType;

#[derive(Deserialize)]
struct EquipmentFile {
    #[serde(default)]
    equipment: Vec<EquipmentType>,
}

/// Equipment types indexed by internal name and every lookup name
#[derive(Debug, Default)]
pub struct EquipmentCatalog {
    types: Vec<Arc<EquipmentType>>,
    /// Lowercased name → index into `types`
    by_name: AHashMap<String, usize>,
}

impl EquipmentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type under all of its names. Later registrations win.
    pub fn register(&mut self, equipment: EquipmentType) -> Arc<EquipmentType> {
        let idx = self.types.len();
        let names = std::iter::once(&equipment.internal_name)
            .chain(std::iter::once(&equipment.name))
            .chain(equipment.lookup_names.iter());
        for name in names {
            self.by_name.insert(name.to_lowercase(), idx);
        }
        let equipment = Arc::new(equipment);
        self.types.push(Arc::clone(&equipment));
        equipment
    }

    /// Parse `[[equipment]]` tables from TOML text
    pub fn load_str(&mut self, text: &str) -> Result<usize, CatalogError> {
        let file: EquipmentFile =
            toml::from_str(text).map_err(|e| CatalogError::ParseError(e.to_string()))?;
        let count = file.equipment.len();
        for equipment in file.equipment {
            self.register(equipment);
        }
        Ok(count)
    }

    pub fn load_file(&mut self, path: &Path) -> Result<usize, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        self.load_str(&content)
            .map_err(|e| CatalogError::ParseError(format!("{}: {}", path.display(), e)))
    }

    /// Load all .toml files from a directory recursively
    pub fn load_directory(&mut self, path: &Path) -> Result<usize, CatalogError> {
        let mut count = 0;
        for entry in std::fs::read_dir(path)? {
            let entry_path = entry?.path();
            if entry_path.is_dir() {
                count += self.load_directory(&entry_path)?;
            } else if entry_path.extension().is_some_and(|ext| ext == "toml") {
                count += self.load_file(&entry_path)?;
            }
        }
        Ok(count)
    }

    /// Case-insensitive lookup by any of a type's names
    pub fn get(&self, name: &str) -> Option<Arc<EquipmentType>> {
        self.by_name
            .get(&name.to_lowercase())
            .and_then(|idx| self.types.get(*idx))
            .cloned()
    }

    /// Lookup restricted to ammunition
    pub fn ammo(&self, name: &str) -> Option<Arc<EquipmentType>> {
        self.get(name).filter(|e| e.is_ammo())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [[equipment]]
        internal_name = "ISMediumLaser"
        name = "Medium Laser"
        kind = "weapon"
        tonnage = 1.0

        [[equipment]]
        internal_name = "ISSRM2 Ammo"
        name = "SRM 2 Ammo"
        lookup_names = ["IS Ammo SRM-2"]
        kind = "ammo"
        tonnage = 1.0
        ammo = { family = "SRM", shots = 50 }
    "#;

    #[test]
    fn test_load_and_lookup() {
        let mut catalog = EquipmentCatalog::new();
        assert_eq!(catalog.load_str(SAMPLE).unwrap(), 2);

        assert!(catalog.get("medium laser").is_some());
        assert!(catalog.get("ISMediumLaser").is_some());
        assert_eq!(catalog.ammo("IS Ammo SRM-2").unwrap().internal_name, "ISSRM2 Ammo");
        assert!(catalog.ammo("Medium Laser").is_none());
        assert!(catalog.get("Gauss Rifle").is_none());
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let mut catalog = EquipmentCatalog::new();
        let result = catalog.load_str("[[equipment]]\nname = 3\n");
        assert!(matches!(result, Err(CatalogError::ParseError(_))));
    }
}
