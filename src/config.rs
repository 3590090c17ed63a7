//! Session configuration
//!
//! Read from `config.ron`. Every field has a default, so a partial or
//! missing file still yields a usable config.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LootError, LootResult};
use crate::items::grid::{GRID_HEIGHT, GRID_WIDTH};
use crate::items::vendor::DEFAULT_OFFER_COUNT;

/// Config file name looked up in the working directory
pub const CONFIG_FILE: &str = "config.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LootConfig {
    /// Directory holding the catalog RON files
    pub data_dir: PathBuf,
    pub grid_width: u8,
    pub grid_height: u8,
    pub vendor_offer_count: usize,
    /// Seconds before vendor stock goes stale
    pub vendor_refresh_secs: u64,
    pub starting_gold: u64,
    /// Fixed RNG seed; entropy when unset
    pub seed: Option<u64>,
}

impl Default for LootConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            grid_width: GRID_WIDTH,
            grid_height: GRID_HEIGHT,
            vendor_offer_count: DEFAULT_OFFER_COUNT,
            vendor_refresh_secs: 600,
            starting_gold: 100,
            seed: None,
        }
    }
}

impl LootConfig {
    /// Load from a file. A missing file gives the defaults; an unreadable or
    /// malformed one is an error.
    pub fn load(path: &Path) -> LootResult<Self> {
        if !path.exists() {
            log::debug!("{:?} not found, using default config", path);
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: Self = ron::from_str(&content)
            .map_err(|e| LootError::Parse(format!("{}: {}", path.display(), e)))?;
        log::info!("Config loaded from {:?}", path);
        Ok(config.sanitized())
    }

    /// Load, falling back to defaults on any error
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> LootResult<()> {
        let text = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| LootError::Parse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, text)?;
        Ok(())
    }

    /// Grids need at least one cell
    fn sanitized(mut self) -> Self {
        if self.grid_width == 0 || self.grid_height == 0 {
            log::warn!("Grid size {}x{} is empty, using default", self.grid_width, self.grid_height);
            self.grid_width = GRID_WIDTH;
            self.grid_height = GRID_HEIGHT;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = LootConfig::load(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, LootConfig::default());
        assert_eq!((config.grid_width, config.grid_height), (10, 6));
        assert_eq!(config.vendor_offer_count, 6);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "(starting_gold: 250, seed: Some(9))").unwrap();
        let config = LootConfig::load(&path).unwrap();
        assert_eq!(config.starting_gold, 250);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.grid_width, GRID_WIDTH);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let config = LootConfig { grid_width: 12, vendor_refresh_secs: 30, ..Default::default() };
        config.save(&path).unwrap();
        assert_eq!(LootConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "(grid_width: \"wide\")").unwrap();
        assert!(matches!(LootConfig::load(&path), Err(LootError::Parse(_))));
        assert_eq!(LootConfig::load_or_default(&path), LootConfig::default());
    }

    #[test]
    fn test_zero_grid_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "(grid_width: 0)").unwrap();
        assert_eq!(LootConfig::load(&path).unwrap().grid_width, GRID_WIDTH);
    }
}
