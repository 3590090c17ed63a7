//! Item definitions
//!
//! Core item types: rarities, slots, modifiers and the concrete item instance
//! a player holds.

use std::collections::HashSet;
use serde::{Deserialize, Serialize};

use super::stats::StatId;

/// Unique item ID for tracking
pub type ItemId = u64;

/// Item rarity tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    Normal, // White - one low-tier modifier
    Magic,  // Blue - 1-2 modifiers
    Rare,   // Yellow - 3-6 modifiers, at most 3 prefixes and 3 suffixes
    Unique, // Orange - fixed hand-authored modifiers
}

impl Rarity {
    /// All rarities, most common first
    pub const ALL: [Rarity; 4] = [Rarity::Normal, Rarity::Magic, Rarity::Rare, Rarity::Unique];

    /// Get rarity name
    pub fn name(&self) -> &'static str {
        match self {
            Rarity::Normal => "Normal",
            Rarity::Magic => "Magic",
            Rarity::Rare => "Rare",
            Rarity::Unique => "Unique",
        }
    }

    /// Get display color RGB
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Rarity::Normal => (200, 200, 200),
            Rarity::Magic => (136, 136, 255),
            Rarity::Rare => (255, 255, 119),
            Rarity::Unique => (175, 96, 37),
        }
    }

    /// Drop weight; normalized against the sum when rolling
    pub fn weight(&self) -> f64 {
        match self {
            Rarity::Normal => 0.60,
            Rarity::Magic => 0.30,
            Rarity::Rare => 0.09,
            Rarity::Unique => 0.01,
        }
    }

    /// Inclusive (min, max) explicit modifier count for rolled items.
    /// Uniques carry their authored set instead and return `None`.
    pub fn modifier_bounds(&self) -> Option<(usize, usize)> {
        match self {
            Rarity::Normal => Some((1, 1)),
            Rarity::Magic => Some((1, 2)),
            Rarity::Rare => Some((3, 6)),
            Rarity::Unique => None,
        }
    }

    /// Affix tiers a roll of this rarity may draw from
    pub fn allowed_tiers(&self) -> &'static [u8] {
        match self {
            Rarity::Normal => &[1],
            Rarity::Magic => &[1, 2],
            Rarity::Rare => &[1, 2, 3],
            Rarity::Unique => &[],
        }
    }

    /// Vendor price multiplier
    pub fn price_multiplier(&self) -> u64 {
        match self {
            Rarity::Normal => 1,
            Rarity::Magic => 2,
            Rarity::Rare => 5,
            Rarity::Unique => 10,
        }
    }
}

/// Prefix/suffix split for rare items
pub const MAX_PREFIXES: usize = 3;
pub const MAX_SUFFIXES: usize = 3;

/// Where a template can be worn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemSlot {
    Weapon,
    OffHand,
    Helmet,
    BodyArmour,
    Gloves,
    Boots,
    Shoulders,
    Amulet,
    Trinket,
    Ring,
    Belt,
}

impl ItemSlot {
    /// Equipment slots this kind of item may occupy, in preference order
    pub fn equip_slots(&self) -> &'static [EquipSlot] {
        match self {
            ItemSlot::Weapon => &[EquipSlot::MainHand],
            ItemSlot::OffHand => &[EquipSlot::OffHand],
            ItemSlot::Helmet => &[EquipSlot::Head],
            ItemSlot::BodyArmour => &[EquipSlot::Body],
            ItemSlot::Gloves => &[EquipSlot::Hands],
            ItemSlot::Boots => &[EquipSlot::Feet],
            ItemSlot::Shoulders => &[EquipSlot::Shoulders],
            ItemSlot::Amulet => &[EquipSlot::Amulet],
            ItemSlot::Trinket => &[EquipSlot::Trinket],
            ItemSlot::Ring => &[EquipSlot::Ring1, EquipSlot::Ring2],
            ItemSlot::Belt => &[EquipSlot::Belt],
        }
    }
}

/// Equipment slots on a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EquipSlot {
    MainHand,
    OffHand,
    Head,
    Body,
    Hands,
    Feet,
    Shoulders,
    Amulet,
    Trinket,
    Ring1,
    Ring2,
    Belt,
}

/// Whether an affix sits before or after the base name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AffixKind {
    Prefix,
    Suffix,
    /// Built into the base template
    Implicit,
    /// Authored on a unique item
    Unique,
}

/// A rolled modifier (affix) on an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    /// Exclusivity key: at most one modifier per group on an item
    pub group: String,
    pub stat: StatId,
    pub tier: u8,
    pub value: i32,
    pub kind: AffixKind,
}

/// The main item instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemInstance {
    /// Unique instance ID
    pub uid: ItemId,
    /// Catalog template this was generated from
    pub template_id: String,
    /// Base name, or the unique's name
    pub name: String,
    /// Rarity tier
    pub rarity: Rarity,
    /// Explicit modifiers
    pub modifiers: Vec<Modifier>,
    /// Implicit modifiers rolled from the template
    #[serde(default)]
    pub implicits: Vec<Modifier>,
    /// Support socket count (weapons only)
    #[serde(default)]
    pub sockets: Option<u8>,
    /// Item level (area level it dropped in)
    pub level: u32,
    /// Unique definition id, if this is a unique
    #[serde(default)]
    pub unique_id: Option<String>,
    /// Set membership
    #[serde(default)]
    pub set_id: Option<String>,
    /// Footprint in inventory cells (width, height)
    pub footprint: (u8, u8),
    /// Equipment category, if wearable
    #[serde(default)]
    pub slot: Option<ItemSlot>,
}

impl ItemInstance {
    /// Create a plain normal item with no modifiers
    pub fn new(uid: ItemId, template_id: impl Into<String>, name: impl Into<String>, level: u32) -> Self {
        Self {
            uid,
            template_id: template_id.into(),
            name: name.into(),
            rarity: Rarity::Normal,
            modifiers: Vec::new(),
            implicits: Vec::new(),
            sockets: None,
            level,
            unique_id: None,
            set_id: None,
            footprint: (1, 1),
            slot: None,
        }
    }

    /// Check whether a modifier group is already taken
    pub fn has_group(&self, group: &str) -> bool {
        self.modifiers.iter().any(|m| m.group == group)
    }

    /// Groups used by explicit modifiers
    pub fn groups(&self) -> HashSet<&str> {
        self.modifiers.iter().map(|m| m.group.as_str()).collect()
    }

    pub fn prefix_count(&self) -> usize {
        self.modifiers.iter().filter(|m| m.kind == AffixKind::Prefix).count()
    }

    pub fn suffix_count(&self) -> usize {
        self.modifiers.iter().filter(|m| m.kind == AffixKind::Suffix).count()
    }

    /// Check if item is a weapon
    pub fn is_weapon(&self) -> bool {
        self.slot == Some(ItemSlot::Weapon)
    }

    /// Check if item is equippable
    pub fn is_equippable(&self) -> bool {
        self.slot.is_some()
    }

    /// Sum of a stat across implicit and explicit modifiers
    pub fn stat_total(&self, stat: StatId) -> i64 {
        self.implicits
            .iter()
            .chain(self.modifiers.iter())
            .filter(|m| m.stat == stat)
            .map(|m| m.value as i64)
            .sum()
    }

    /// Display name with rarity prefix
    pub fn display_name(&self) -> String {
        match self.rarity {
            Rarity::Unique | Rarity::Normal => self.name.clone(),
            _ => format!("{} {}", self.rarity.name(), self.name),
        }
    }

    /// True if the explicit modifiers never repeat a group
    pub fn groups_are_exclusive(&self) -> bool {
        self.groups().len() == self.modifiers.len()
    }
}

/// Hands out item uids. Lives in the session instead of a global counter so
/// independent sessions and tests never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemIdAllocator {
    next: ItemId,
}

impl Default for ItemIdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl ItemIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from a saved counter
    pub fn starting_at(next: ItemId) -> Self {
        Self { next: next.max(1) }
    }

    /// Get next unique item ID
    pub fn next_id(&mut self) -> ItemId {
        let id = self.next;
        self.next += 1;
        id
    }

    /// The id the next call will return
    pub fn peek(&self) -> ItemId {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modifier(group: &str, stat: StatId, value: i32, kind: AffixKind) -> Modifier {
        Modifier { group: group.to_string(), stat, tier: 1, value, kind }
    }

    #[test]
    fn test_rarity_weights_sum_to_one() {
        let total: f64 = Rarity::ALL.iter().map(|r| r.weight()).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_ring_routes_to_both_ring_slots() {
        assert_eq!(ItemSlot::Ring.equip_slots(), &[EquipSlot::Ring1, EquipSlot::Ring2]);
        assert_eq!(ItemSlot::Belt.equip_slots(), &[EquipSlot::Belt]);
    }

    #[test]
    fn test_stat_total_includes_implicits() {
        let mut item = ItemInstance::new(1, "iron_ring", "Iron Ring", 5);
        item.implicits.push(modifier("implicit_life", StatId::MaximumLife, 10, AffixKind::Implicit));
        item.modifiers.push(modifier("life", StatId::MaximumLife, 25, AffixKind::Prefix));
        item.modifiers.push(modifier("fire_res", StatId::FireResistance, 12, AffixKind::Suffix));

        assert_eq!(item.stat_total(StatId::MaximumLife), 35);
        assert_eq!(item.prefix_count(), 1);
        assert_eq!(item.suffix_count(), 1);
        assert!(item.has_group("fire_res"));
        assert!(item.groups_are_exclusive());
    }

    #[test]
    fn test_id_allocator() {
        let mut ids = ItemIdAllocator::new();
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.next_id(), 2);
        assert_eq!(ItemIdAllocator::starting_at(0).peek(), 1);
    }
}
