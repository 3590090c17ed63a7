//! Item system

pub mod stats;
pub mod item;
pub mod loot;
pub mod crafting;
pub mod sets;
pub mod equipment;
pub mod grid;
pub mod vendor;

pub use stats::{StatId, StatBonusRecord};
pub use item::{ItemInstance, ItemId, ItemIdAllocator, Rarity, ItemSlot, EquipSlot, AffixKind, Modifier};
pub use loot::{roll_rarity, roll_affixes, roll_weapon_supports, generate_item, generate_items};
pub use crafting::{CurrencyAction, CraftOutcome, apply_currency, apply_currency_tag};
pub use sets::{ActiveSet, active_sets};
pub use equipment::{EquipmentState, compute_bonuses};
pub use grid::{InventoryGrid, PlacedItem, SortMode, GRID_WIDTH, GRID_HEIGHT};
pub use vendor::{VendorLedger, buy_price, sell_price};
