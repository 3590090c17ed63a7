//! Session save/load
//!
//! Session state is captured verbatim and written as JSON.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{LootError, LootResult};
use crate::game::Game;
use crate::items::equipment::EquipmentState;
use crate::items::grid::InventoryGrid;
use crate::items::item::ItemId;
use crate::items::vendor::VendorLedger;

/// Save file version for compatibility checking
pub const SAVE_VERSION: u32 = 1;

/// Number of save slots
pub const SAVE_SLOTS: u8 = 3;

/// Complete save data structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    /// Next uid the allocator will hand out
    pub next_item_id: ItemId,
    pub area_level: u32,
    pub inventory: InventoryGrid,
    pub equipment: EquipmentState,
    /// Vendor stock and the gold balance
    pub vendor: VendorLedger,
}

/// Brief summary of a save for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSummary {
    pub area_level: u32,
    pub gold: u64,
    pub items: usize,
}

impl SaveData {
    pub fn summary(&self) -> SaveSummary {
        SaveSummary {
            area_level: self.area_level,
            gold: self.vendor.gold,
            items: self.inventory.count() + self.equipment.len(),
        }
    }
}

/// Get the save directory path
pub fn save_directory() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "lootforge", "Lootforge") {
        let mut path = proj_dirs.data_local_dir().to_path_buf();
        path.push("saves");
        path
    } else {
        // Fallback to current directory
        PathBuf::from("./saves")
    }
}

/// Get the path for a specific save slot
pub fn save_path(slot: u8) -> PathBuf {
    save_directory().join(format!("save_{}.json", slot))
}

/// Check if a save exists in the given slot
pub fn save_exists(slot: u8) -> bool {
    save_path(slot).exists()
}

/// Write save data to a file, creating parent directories
pub fn write_save(data: &SaveData, path: &Path) -> LootResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(data).map_err(|e| LootError::Parse(e.to_string()))?;
    fs::write(path, json)?;
    Ok(())
}

/// Read and version-check save data from a file
pub fn read_save(path: &Path) -> LootResult<SaveData> {
    let data = fs::read_to_string(path)?;
    let save: SaveData = serde_json::from_str(&data).map_err(|e| LootError::Parse(e.to_string()))?;

    // Version check
    if save.version != SAVE_VERSION {
        return Err(LootError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save.version,
        });
    }
    Ok(save)
}

/// Save the session to a slot
pub fn save_game(game: &Game, slot: u8) -> LootResult<()> {
    write_save(&game.to_save_data(), &save_path(slot))?;
    log::info!("Game saved to slot {}", slot);
    Ok(())
}

/// Load a session snapshot from a slot
pub fn load_game(slot: u8) -> LootResult<SaveData> {
    let save = read_save(&save_path(slot))?;
    log::info!("Game loaded from slot {}", slot);
    Ok(save)
}

/// List all slots with a summary for those in use
pub fn list_saves() -> Vec<(u8, Option<SaveSummary>)> {
    (0..SAVE_SLOTS)
        .map(|slot| {
            let summary = if save_exists(slot) {
                load_game(slot).ok().map(|s| s.summary())
            } else {
                None
            };
            (slot, summary)
        })
        .collect()
}

/// Delete a save slot
pub fn delete_save(slot: u8) -> LootResult<()> {
    let path = save_path(slot);
    if path.exists() {
        fs::remove_file(&path)?;
        log::info!("Deleted save slot {}", slot);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LootConfig;
    use crate::data::Catalog;

    fn seeded_game() -> Game {
        let config = LootConfig { seed: Some(21), ..Default::default() };
        let mut game = Game::new(Catalog::default(), config).unwrap();
        game.set_area_level(12);
        for item in game.generate_loot(8) {
            let _ = game.pick_up(item);
        }
        game.refresh_vendor(0);
        game
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slot.json");
        let game = seeded_game();
        let data = game.to_save_data();

        write_save(&data, &path).unwrap();
        let loaded = read_save(&path).unwrap();
        assert_eq!(loaded, data);

        let resumed = Game::from_save(Catalog::default(), LootConfig::default(), loaded).unwrap();
        assert_eq!(resumed.inventory(), game.inventory());
        assert_eq!(resumed.vendor(), game.vendor());
        assert_eq!(resumed.area_level(), 12);
    }

    #[test]
    fn test_resumed_ids_do_not_collide() {
        let game = seeded_game();
        let data = game.to_save_data();
        let mut resumed = Game::from_save(Catalog::default(), LootConfig::default(), data).unwrap();
        let fresh = resumed.next_item_id();
        assert!(resumed.inventory().items().all(|i| i.uid < fresh));
        assert!(resumed.vendor().offers.iter().all(|i| i.uid < fresh));
    }

    #[test]
    fn test_version_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.json");
        let mut data = seeded_game().to_save_data();
        data.version = SAVE_VERSION + 1;
        write_save(&data, &path).unwrap();

        assert_eq!(
            read_save(&path),
            Err(LootError::VersionMismatch { expected: SAVE_VERSION, found: SAVE_VERSION + 1 })
        );
        assert!(Game::from_save(Catalog::default(), LootConfig::default(), data).is_err());
    }

    #[test]
    fn test_corrupt_and_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(read_save(&path), Err(LootError::Parse(_))));
        assert!(matches!(read_save(&dir.path().join("none.json")), Err(LootError::Io(_))));
    }

    #[test]
    fn test_summary() {
        let data = seeded_game().to_save_data();
        let summary = data.summary();
        assert_eq!(summary.area_level, 12);
        assert_eq!(summary.gold, data.vendor.gold);
        assert_eq!(summary.items, data.inventory.count());
    }
}
