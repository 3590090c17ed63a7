//! Static catalog
//!
//! Item templates, affix tier tables, unique definitions and set definitions,
//! loaded from external RON files for data-driven content and easy modding.

pub mod loader;
pub mod items;
pub mod affixes;
pub mod uniques;
pub mod sets;

pub use loader::{Catalog, export_default_data};
pub use items::{ItemTemplate, ItemTemplates, Requirements, ImplicitRange, WeaponStats, FlaskBehavior, CurrencyBehavior, SocketableBehavior};
pub use affixes::{AffixDef, AffixTier, AffixTable};
pub use uniques::{UniqueDef, UniqueDefs, UniqueExplicit, ValueRoll};
pub use sets::{ItemSet, SetDefs, SetThreshold, StatBonus};
