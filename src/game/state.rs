//! Game session
//!
//! Owns everything a loot session mutates: the RNG, the uid allocator, the
//! inventory grid, equipment and the vendor ledger. Independent sessions
//! share nothing, so tests and multiple players never collide.
//!
//! Moving an item between two containers always takes it out of the source
//! first. If the destination refuses it, the item goes back where it was.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::config::LootConfig;
use crate::data::Catalog;
use crate::error::{LootError, LootResult};
use crate::items::crafting::{apply_currency, CraftOutcome};
use crate::items::equipment::{compute_bonuses, EquipmentState};
use crate::items::grid::InventoryGrid;
use crate::items::item::{EquipSlot, ItemId, ItemIdAllocator, ItemInstance};
use crate::items::loot::generate_items;
use crate::items::stats::StatBonusRecord;
use crate::items::vendor::VendorLedger;
use crate::save::{SaveData, SAVE_VERSION};

/// Why an item could not be moved. Nothing is changed when one of these
/// comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("item {0} is not in the inventory")]
    NotInInventory(ItemId),
    #[error("nothing equipped in {0:?}")]
    EmptySlot(EquipSlot),
    #[error("item cannot be equipped")]
    NotEquippable,
    #[error("no room in the inventory")]
    NoRoom,
    #[error("no vendor offer at index {0}")]
    NoSuchOffer(usize),
    #[error("not enough gold")]
    CannotAfford,
}

/// The session context
pub struct Game {
    catalog: Catalog,
    config: LootConfig,
    /// Random number generator (seeded for reproducibility)
    rng: StdRng,
    ids: ItemIdAllocator,
    inventory: InventoryGrid,
    equipment: EquipmentState,
    vendor: VendorLedger,
    /// Level used for drops and vendor stock
    area_level: u32,
}

impl Game {
    /// Start a fresh session. Fails if the catalog has no base templates.
    pub fn new(catalog: Catalog, config: LootConfig) -> LootResult<Self> {
        catalog.ensure_has_bases()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut vendor = VendorLedger::new(config.starting_gold);
        vendor.offer_count = config.vendor_offer_count;
        vendor.refresh_interval = config.vendor_refresh_secs;

        log::info!(
            "New session: {}x{} grid, {} gold, seed {:?}",
            config.grid_width,
            config.grid_height,
            config.starting_gold,
            config.seed
        );
        Ok(Self {
            inventory: InventoryGrid::new(config.grid_width, config.grid_height),
            equipment: EquipmentState::new(),
            vendor,
            ids: ItemIdAllocator::new(),
            rng,
            catalog,
            config,
            area_level: 1,
        })
    }

    /// Load the catalog named by the config and start a session
    pub fn from_config(config: LootConfig) -> LootResult<Self> {
        let catalog = Catalog::load_from_dir(&config.data_dir);
        Self::new(catalog, config)
    }

    /// Resume a saved session
    pub fn from_save(catalog: Catalog, config: LootConfig, save: SaveData) -> LootResult<Self> {
        if save.version != SAVE_VERSION {
            return Err(LootError::VersionMismatch { expected: SAVE_VERSION, found: save.version });
        }
        let mut game = Self::new(catalog, config)?;
        game.ids = ItemIdAllocator::starting_at(save.next_item_id);
        game.area_level = save.area_level;
        game.inventory = save.inventory;
        game.equipment = save.equipment;
        game.vendor = save.vendor;
        Ok(game)
    }

    /// Snapshot everything worth persisting
    pub fn to_save_data(&self) -> SaveData {
        SaveData {
            version: SAVE_VERSION,
            next_item_id: self.ids.peek(),
            area_level: self.area_level,
            inventory: self.inventory.clone(),
            equipment: self.equipment.clone(),
            vendor: self.vendor.clone(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &LootConfig {
        &self.config
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn inventory(&self) -> &InventoryGrid {
        &self.inventory
    }

    pub fn equipment(&self) -> &EquipmentState {
        &self.equipment
    }

    pub fn vendor(&self) -> &VendorLedger {
        &self.vendor
    }

    pub fn gold(&self) -> u64 {
        self.vendor.gold
    }

    pub fn area_level(&self) -> u32 {
        self.area_level
    }

    pub fn set_area_level(&mut self, level: u32) {
        self.area_level = level.max(1);
    }

    /// Get next unique item ID
    pub fn next_item_id(&mut self) -> ItemId {
        self.ids.next_id()
    }

    /// Current stat bonuses from equipment
    pub fn bonuses(&self) -> StatBonusRecord {
        compute_bonuses(&self.equipment, &self.catalog.sets)
    }

    /// Roll drops for the current area level
    pub fn generate_loot(&mut self, count: usize) -> Vec<ItemInstance> {
        generate_items(&self.catalog, &mut self.ids, self.area_level, count, true, &mut self.rng)
    }

    /// Put an item into the inventory at the first free spot
    pub fn pick_up(&mut self, item: ItemInstance) -> Result<(u8, u8), ItemInstance> {
        self.inventory.add_item(item)
    }

    /// Equip an item from the inventory. A displaced item goes back into the
    /// inventory; if it does not fit, the swap is undone.
    pub fn equip_from_inventory(&mut self, uid: ItemId) -> Result<EquipSlot, TransferError> {
        let placed = self.inventory.placement(uid).ok_or(TransferError::NotInInventory(uid))?;
        let (x, y) = (placed.x, placed.y);
        let slot = self.equipment.slot_for(&placed.item).ok_or(TransferError::NotEquippable)?;
        let item = self.inventory.remove(uid).ok_or(TransferError::NotInInventory(uid))?;

        let previous = match self.equipment.equip_to(slot, item) {
            Ok(previous) => previous,
            Err(item) => {
                self.restore_to_inventory(item, x, y);
                return Err(TransferError::NotEquippable);
            }
        };

        if let Some(old) = previous {
            if let Err(old) = self.inventory.add_item(old) {
                // Undo the swap
                if let Some(item) = self.equipment.unequip(slot) {
                    self.restore_to_inventory(item, x, y);
                }
                if let Err(old) = self.equipment.equip_to(slot, old) {
                    log::error!("Could not re-equip {} after failed swap", old.display_name());
                }
                return Err(TransferError::NoRoom);
            }
        }
        Ok(slot)
    }

    /// Move an equipped item into the inventory
    pub fn unequip_to_inventory(&mut self, slot: EquipSlot) -> Result<(u8, u8), TransferError> {
        let item = self.equipment.unequip(slot).ok_or(TransferError::EmptySlot(slot))?;
        match self.inventory.add_item(item) {
            Ok(pos) => Ok(pos),
            Err(item) => {
                if let Err(item) = self.equipment.equip_to(slot, item) {
                    log::error!("Could not restore {} to {}", item.display_name(), slot.name());
                }
                Err(TransferError::NoRoom)
            }
        }
    }

    /// Buy a vendor offer into the inventory
    pub fn buy(&mut self, index: usize) -> Result<ItemId, TransferError> {
        if index >= self.vendor.offers.len() {
            return Err(TransferError::NoSuchOffer(index));
        }
        let item = self.vendor.buy(index).ok_or(TransferError::CannotAfford)?;
        let uid = item.uid;
        match self.inventory.add_item(item) {
            Ok(_) => Ok(uid),
            Err(item) => {
                self.vendor.refund(index, item);
                Err(TransferError::NoRoom)
            }
        }
    }

    /// Sell an inventory item. Returns the gold earned.
    pub fn sell(&mut self, uid: ItemId) -> Result<u64, TransferError> {
        let item = self.inventory.remove(uid).ok_or(TransferError::NotInInventory(uid))?;
        Ok(self.vendor.sell(item))
    }

    /// Use a currency item from the inventory on another inventory item. The
    /// currency is consumed only when the craft succeeds.
    pub fn apply_currency_item(&mut self, currency_uid: ItemId, target_uid: ItemId) -> LootResult<CraftOutcome> {
        let currency = self
            .inventory
            .get(currency_uid)
            .ok_or(LootError::ItemNotFound(currency_uid))?;
        let template = self
            .catalog
            .template(&currency.template_id)
            .ok_or_else(|| LootError::UnknownTemplate(currency.template_id.clone()))?;
        let target = self
            .inventory
            .get(target_uid)
            .ok_or(LootError::ItemNotFound(target_uid))?;

        if currency_uid == target_uid {
            return Ok(CraftOutcome {
                success: false,
                message: "A currency cannot be used on itself".to_string(),
                item: None,
            });
        }

        let outcome = apply_currency(target, template, &self.catalog, &mut self.rng)?;
        if let Some(crafted) = &outcome.item {
            if let Err(crafted) = self.inventory.replace(crafted.clone()) {
                log::error!("Crafted {} no longer fits its slot", crafted.display_name());
                return Ok(CraftOutcome { success: false, message: "Item could not be updated".to_string(), item: None });
            }
            self.inventory.remove(currency_uid);
        }
        Ok(outcome)
    }

    /// Restock the vendor if its stock is stale. Returns true if it restocked.
    pub fn refresh_vendor(&mut self, now: u64) -> bool {
        if !self.vendor.needs_refresh(now) {
            return false;
        }
        self.vendor.refresh(now, &self.catalog, &mut self.ids, self.area_level, &mut self.rng);
        true
    }

    /// Put an item back where it came from, or anywhere it fits
    fn restore_to_inventory(&mut self, item: ItemInstance, x: u8, y: u8) {
        let item = match self.inventory.place(item, x, y) {
            Ok(()) => return,
            Err(item) => item,
        };
        if let Err(item) = self.inventory.add_item(item) {
            log::error!("Lost {} while restoring inventory", item.display_name());
        }
    }
}

/// Seconds since the Unix epoch
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
