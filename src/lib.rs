//! Lootforge - loot and item economy core for action RPGs
//!
//! Rolls items from a data-driven catalog, crafts them with currency,
//! aggregates equipment bonuses, and manages a grid inventory and a vendor.

pub mod config;
pub mod data;
pub mod error;
pub mod game;
pub mod items;
pub mod save;

// Re-export commonly used types
pub use config::LootConfig;
pub use data::Catalog;
pub use error::{LootError, LootResult};
pub use game::{Game, TransferError};
pub use items::{ItemInstance, Rarity, StatId, StatBonusRecord};
