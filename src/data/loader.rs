//! RON data loader
//!
//! Loads the static catalog from external RON files, with fallback to the
//! hardcoded defaults. The catalog is read once at startup and never mutated.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{LootError, LootResult};
use super::affixes::{AffixTable, default_affix_table};
use super::items::{ItemTemplate, ItemTemplates, default_item_templates};
use super::sets::{SetDefs, default_set_defs};
use super::uniques::{UniqueDefs, default_unique_defs};

/// Read-only content consumed by every loot system
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Item templates
    pub items: ItemTemplates,
    /// Affix tier tables
    pub affixes: AffixTable,
    /// Unique item definitions
    pub uniques: UniqueDefs,
    /// Set definitions
    pub sets: SetDefs,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            items: default_item_templates(),
            affixes: default_affix_table(),
            uniques: default_unique_defs(),
            sets: default_set_defs(),
        }
    }
}

impl Catalog {
    /// Load every table from `dir`, falling back to defaults per file
    pub fn load_from_dir(dir: &Path) -> Self {
        let catalog = Self {
            items: load_or_default(dir, "items.ron", default_item_templates),
            affixes: load_or_default(dir, "affixes.ron", default_affix_table),
            uniques: load_or_default(dir, "uniques.ron", default_unique_defs),
            sets: load_or_default(dir, "sets.ron", default_set_defs),
        };
        log::info!(
            "Catalog loaded: {} templates, {} affixes, {} uniques, {} sets",
            catalog.items.templates.len(),
            catalog.affixes.affixes.len(),
            catalog.uniques.uniques.len(),
            catalog.sets.sets.len()
        );
        catalog
    }

    /// Load every table from `dir`, failing on the first unreadable or
    /// malformed file. Missing files still fall back to defaults.
    pub fn load_strict(dir: &Path) -> LootResult<Self> {
        Ok(Self {
            items: load_ron(dir, "items.ron")?.unwrap_or_else(default_item_templates),
            affixes: load_ron(dir, "affixes.ron")?.unwrap_or_else(default_affix_table),
            uniques: load_ron(dir, "uniques.ron")?.unwrap_or_else(default_unique_defs),
            sets: load_ron(dir, "sets.ron")?.unwrap_or_else(default_set_defs),
        })
    }

    /// Empty catalog, for callers that assemble content by hand
    pub fn empty() -> Self {
        Self {
            items: ItemTemplates::default(),
            affixes: AffixTable::default(),
            uniques: UniqueDefs::default(),
            sets: SetDefs::default(),
        }
    }

    /// Look up a template by id
    pub fn template(&self, id: &str) -> Option<&ItemTemplate> {
        self.items.find(id)
    }

    /// Fail if there is nothing to generate from
    pub fn ensure_has_bases(&self) -> LootResult<()> {
        if self.items.bases().is_empty() {
            Err(LootError::EmptyCatalog)
        } else {
            Ok(())
        }
    }
}

/// Read and parse one RON file. `Ok(None)` when the file does not exist.
fn load_ron<T: DeserializeOwned>(dir: &Path, file: &str) -> LootResult<Option<T>> {
    let path = dir.join(file);
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path)?;
    ron::from_str(&content)
        .map(Some)
        .map_err(|e| LootError::Parse(format!("{}: {}", file, e)))
}

fn load_or_default<T: DeserializeOwned>(dir: &Path, file: &str, default: fn() -> T) -> T {
    match load_ron(dir, file) {
        Ok(Some(value)) => value,
        Ok(None) => {
            log::debug!("{} not found in {:?}, using defaults", file, dir);
            default()
        }
        Err(e) => {
            log::warn!("Failed to load {}: {}. Using defaults.", file, e);
            default()
        }
    }
}

fn write_ron<T: Serialize>(dir: &Path, file: &str, value: &T) -> LootResult<()> {
    let text = ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())
        .map_err(|e| LootError::Parse(format!("failed to serialize {}: {}", file, e)))?;
    fs::write(dir.join(file), text)?;
    Ok(())
}

/// Export all default data to RON files for easy editing
pub fn export_default_data(dir: &Path) -> LootResult<()> {
    fs::create_dir_all(dir)?;
    write_ron(dir, "items.ron", &default_item_templates())?;
    write_ron(dir, "affixes.ron", &default_affix_table())?;
    write_ron(dir, "uniques.ron", &default_unique_defs())?;
    write_ron(dir, "sets.ron", &default_set_defs())?;
    log::info!("Exported default catalog to {:?}", dir);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        export_default_data(dir.path()).unwrap();

        for file in ["items.ron", "affixes.ron", "uniques.ron", "sets.ron"] {
            assert!(dir.path().join(file).exists(), "{} not created", file);
        }

        let loaded = Catalog::load_strict(dir.path()).unwrap();
        let defaults = Catalog::default();
        assert_eq!(loaded.items.templates, defaults.items.templates);
        assert_eq!(loaded.affixes.affixes, defaults.affixes.affixes);
        assert_eq!(loaded.uniques.uniques, defaults.uniques.uniques);
        assert_eq!(loaded.sets.sets, defaults.sets.sets);
    }

    #[test]
    fn test_missing_dir_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::load_from_dir(&dir.path().join("nope"));
        assert!(!catalog.items.templates.is_empty());
        assert!(catalog.ensure_has_bases().is_ok());
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("sets.ron"), "(sets: [ oops").unwrap();

        assert!(matches!(Catalog::load_strict(dir.path()), Err(LootError::Parse(_))));
        // Lenient loading falls back
        let catalog = Catalog::load_from_dir(dir.path());
        assert_eq!(catalog.sets.sets, default_set_defs().sets);
    }

    #[test]
    fn test_unknown_currency_action_fails_to_parse() {
        let dir = tempfile::tempdir().unwrap();
        let text = r#"(templates: [(
            id: "mystery_orb",
            name: "Mystery Orb",
            footprint: (1, 1),
            currency: Some((action: Transmogrify, stack_size: 10)),
        )])"#;
        fs::write(dir.path().join("items.ron"), text).unwrap();
        assert!(Catalog::load_strict(dir.path()).is_err());
    }

    #[test]
    fn test_empty_catalog_is_a_hard_failure() {
        assert_eq!(Catalog::empty().ensure_has_bases(), Err(LootError::EmptyCatalog));
    }
}
