//! Item templates for data-driven item creation
//!
//! Base items, currencies, flasks and support gems. Loaded from `items.ron`
//! with a built-in fallback table.

use serde::{Deserialize, Serialize};

use crate::items::crafting::CurrencyAction;
use crate::items::item::ItemSlot;
use crate::items::stats::StatId;

/// Level and attribute requirements to wear an item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirements {
    pub level: u32,
    #[serde(default)]
    pub strength: u32,
    #[serde(default)]
    pub dexterity: u32,
    #[serde(default)]
    pub intelligence: u32,
}

/// An implicit modifier range built into a base
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplicitRange {
    pub group: String,
    pub stat: StatId,
    pub min: i32,
    pub max: i32,
}

/// Base weapon numbers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    pub min_damage: u32,
    pub max_damage: u32,
    pub attacks_per_second: f32,
    pub critical_chance: f32,
}

/// Flask charges and recovery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlaskBehavior {
    pub max_charges: u32,
    pub charges_per_use: u32,
    pub life_recovery: u32,
    pub mana_recovery: u32,
    pub duration_ms: u32,
}

/// Marks a template as a crafting currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyBehavior {
    pub action: CurrencyAction,
    pub stack_size: u32,
}

/// Support gem that slots into a weapon socket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocketableBehavior {
    pub support_id: String,
    pub description: String,
}

/// A template for creating items from external data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemTemplate {
    /// Unique template ID for reference
    pub id: String,
    /// Display name
    pub name: String,
    /// Equipment slot, `None` for currencies, flasks and gems
    #[serde(default)]
    pub slot: Option<ItemSlot>,
    /// Inventory footprint (width, height)
    pub footprint: (u8, u8),
    #[serde(default)]
    pub requirements: Requirements,
    #[serde(default)]
    pub implicits: Vec<ImplicitRange>,
    #[serde(default)]
    pub weapon: Option<WeaponStats>,
    #[serde(default)]
    pub flask: Option<FlaskBehavior>,
    #[serde(default)]
    pub currency: Option<CurrencyBehavior>,
    #[serde(default)]
    pub socketable: Option<SocketableBehavior>,
}

impl ItemTemplate {
    /// Minimal template; fill the rest with struct update syntax
    pub fn new(id: &str, name: &str, slot: Option<ItemSlot>, footprint: (u8, u8), level: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            slot,
            footprint,
            requirements: Requirements { level, ..Requirements::default() },
            implicits: Vec::new(),
            weapon: None,
            flask: None,
            currency: None,
            socketable: None,
        }
    }

    /// Can this template be rolled as a piece of equipment?
    pub fn is_base(&self) -> bool {
        self.slot.is_some() && self.currency.is_none() && self.socketable.is_none()
    }

    /// Check if template occupies the weapon slot
    pub fn is_weapon(&self) -> bool {
        self.slot == Some(ItemSlot::Weapon)
    }

    pub fn is_currency(&self) -> bool {
        self.currency.is_some()
    }

    pub fn required_level(&self) -> u32 {
        self.requirements.level
    }
}

/// Collection of item templates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemTemplates {
    pub templates: Vec<ItemTemplate>,
}

impl ItemTemplates {
    /// Find a template by ID
    pub fn find(&self, id: &str) -> Option<&ItemTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Equippable bases that generation may pick from
    pub fn bases(&self) -> Vec<&ItemTemplate> {
        self.templates.iter().filter(|t| t.is_base()).collect()
    }

    /// All currency templates
    pub fn currencies(&self) -> Vec<&ItemTemplate> {
        self.templates.iter().filter(|t| t.is_currency()).collect()
    }

    /// Currency template carrying a given action
    pub fn currency_for(&self, action: CurrencyAction) -> Option<&ItemTemplate> {
        self.templates
            .iter()
            .find(|t| t.currency.map(|c| c.action) == Some(action))
    }
}

fn implicit(group: &str, stat: StatId, min: i32, max: i32) -> ImplicitRange {
    ImplicitRange { group: group.to_string(), stat, min, max }
}

fn weapon(id: &str, name: &str, footprint: (u8, u8), level: u32, damage: (u32, u32), aps: f32, crit: f32) -> ItemTemplate {
    ItemTemplate {
        weapon: Some(WeaponStats {
            min_damage: damage.0,
            max_damage: damage.1,
            attacks_per_second: aps,
            critical_chance: crit,
        }),
        ..ItemTemplate::new(id, name, Some(ItemSlot::Weapon), footprint, level)
    }
}

fn armour(id: &str, name: &str, slot: ItemSlot, footprint: (u8, u8), level: u32) -> ItemTemplate {
    ItemTemplate::new(id, name, Some(slot), footprint, level)
}

fn currency(id: &str, name: &str, action: CurrencyAction) -> ItemTemplate {
    ItemTemplate {
        currency: Some(CurrencyBehavior { action, stack_size: 20 }),
        ..ItemTemplate::new(id, name, None, (1, 1), 1)
    }
}

/// Create default item templates (hardcoded fallback)
pub fn default_item_templates() -> ItemTemplates {
    let mut templates = vec![
        // Weapons
        ItemTemplate {
            requirements: Requirements { level: 1, strength: 8, ..Requirements::default() },
            ..weapon("rusted_sword", "Rusted Sword", (1, 3), 1, (4, 9), 1.55, 5.0)
        },
        weapon("iron_hatchet", "Iron Hatchet", (2, 3), 6, (6, 11), 1.3, 5.0),
        ItemTemplate {
            implicits: vec![implicit("implicit_attack_speed", StatId::IncreasedAttackSpeed, 4, 8)],
            ..weapon("short_bow", "Short Bow", (2, 3), 5, (5, 13), 1.5, 5.0)
        },
        ItemTemplate {
            implicits: vec![implicit("implicit_spell_damage", StatId::IncreasedSpellDamage, 8, 12)],
            ..weapon("driftwood_wand", "Driftwood Wand", (1, 3), 1, (3, 8), 1.4, 7.0)
        },
        weapon("war_hammer", "War Hammer", (2, 4), 20, (18, 34), 1.1, 5.0),
        weapon("glass_shank", "Glass Shank", (1, 2), 12, (6, 22), 1.5, 6.5),

        // Off-hand
        ItemTemplate {
            implicits: vec![implicit("implicit_block", StatId::BlockChance, 4, 6)],
            ..armour("splintered_tower_shield", "Splintered Tower Shield", ItemSlot::OffHand, (2, 3), 1)
        },
        armour("spiked_bundle", "Spiked Bundle", ItemSlot::OffHand, (2, 2), 10),

        // Armour
        armour("iron_hat", "Iron Hat", ItemSlot::Helmet, (2, 2), 1),
        armour("leather_cap", "Leather Cap", ItemSlot::Helmet, (2, 2), 8),
        armour("plate_vest", "Plate Vest", ItemSlot::BodyArmour, (2, 3), 1),
        armour("scale_doublet", "Scale Doublet", ItemSlot::BodyArmour, (2, 3), 17),
        armour("rawhide_gloves", "Rawhide Gloves", ItemSlot::Gloves, (2, 2), 1),
        armour("iron_gauntlets", "Iron Gauntlets", ItemSlot::Gloves, (2, 2), 12),
        armour("wool_shoes", "Wool Shoes", ItemSlot::Boots, (2, 2), 1),
        armour("iron_greaves", "Iron Greaves", ItemSlot::Boots, (2, 2), 10),
        armour("leather_pauldrons", "Leather Pauldrons", ItemSlot::Shoulders, (2, 2), 3),

        // Set bases
        armour("warden_helm", "Warden Helm", ItemSlot::Helmet, (2, 2), 14),
        armour("warden_plate", "Warden Plate", ItemSlot::BodyArmour, (2, 3), 14),
        armour("warden_gauntlets", "Warden Gauntlets", ItemSlot::Gloves, (2, 2), 14),

        // Jewellery
        ItemTemplate {
            implicits: vec![implicit("implicit_life", StatId::MaximumLife, 12, 24)],
            ..armour("coral_amulet", "Coral Amulet", ItemSlot::Amulet, (1, 1), 1)
        },
        ItemTemplate {
            implicits: vec![implicit("implicit_rarity", StatId::ItemRarity, 6, 15)],
            ..armour("gold_trinket", "Gold Trinket", ItemSlot::Trinket, (1, 1), 5)
        },
        ItemTemplate {
            implicits: vec![implicit("implicit_fire_resistance", StatId::FireResistance, 20, 30)],
            ..armour("ruby_ring", "Ruby Ring", ItemSlot::Ring, (1, 1), 1)
        },
        ItemTemplate {
            implicits: vec![implicit("implicit_mana", StatId::MaximumMana, 20, 30)],
            ..armour("iron_ring", "Iron Ring", ItemSlot::Ring, (1, 1), 1)
        },
        ItemTemplate {
            implicits: vec![implicit("implicit_life", StatId::MaximumLife, 15, 25)],
            ..armour("leather_belt", "Leather Belt", ItemSlot::Belt, (2, 1), 1)
        },

        // Flasks
        ItemTemplate {
            flask: Some(FlaskBehavior {
                max_charges: 21,
                charges_per_use: 7,
                life_recovery: 70,
                mana_recovery: 0,
                duration_ms: 3000,
            }),
            ..ItemTemplate::new("small_life_flask", "Small Life Flask", None, (1, 2), 1)
        },
        ItemTemplate {
            flask: Some(FlaskBehavior {
                max_charges: 18,
                charges_per_use: 6,
                life_recovery: 0,
                mana_recovery: 50,
                duration_ms: 4000,
            }),
            ..ItemTemplate::new("small_mana_flask", "Small Mana Flask", None, (1, 2), 1)
        },

        // Support gems
        ItemTemplate {
            socketable: Some(SocketableBehavior {
                support_id: "added_fire".to_string(),
                description: "Supported attacks gain added fire damage.".to_string(),
            }),
            ..ItemTemplate::new("added_fire_support", "Added Fire Damage Support", None, (1, 1), 8)
        },
        ItemTemplate {
            socketable: Some(SocketableBehavior {
                support_id: "faster_attacks".to_string(),
                description: "Supported attacks are faster.".to_string(),
            }),
            ..ItemTemplate::new("faster_attacks_support", "Faster Attacks Support", None, (1, 1), 18)
        },
    ];

    templates.extend([
        currency("orb_of_ascension", "Orb of Ascension", CurrencyAction::UpgradeRarity),
        currency("orb_of_embellishment", "Orb of Embellishment", CurrencyAction::AddModifier),
        currency("orb_of_erasure", "Orb of Erasure", CurrencyAction::RemoveModifiers),
        currency("orb_of_upheaval", "Orb of Upheaval", CurrencyAction::Reroll),
        currency("scroll_of_wisdom", "Scroll of Wisdom", CurrencyAction::Identify),
        currency("portal_scroll", "Portal Scroll", CurrencyAction::Portal),
        currency("orb_of_transmutation", "Orb of Transmutation", CurrencyAction::NormalToMagic),
        currency("orb_of_augmentation", "Orb of Augmentation", CurrencyAction::MagicAdd),
        currency("orb_of_alteration", "Orb of Alteration", CurrencyAction::MagicReroll),
        currency("regal_orb", "Regal Orb", CurrencyAction::MagicToRare),
        currency("chaos_orb", "Chaos Orb", CurrencyAction::RareReroll),
        currency("exalted_orb", "Exalted Orb", CurrencyAction::RareAdd),
        currency("divine_orb", "Divine Orb", CurrencyAction::RandomizeValues),
        currency("blessed_orb", "Blessed Orb", CurrencyAction::RandomizeImplicit),
        currency("orb_of_scouring", "Orb of Scouring", CurrencyAction::StripToNormal),
        currency("orb_of_annulment", "Orb of Annulment", CurrencyAction::RemoveRandomModifier),
    ]);

    ItemTemplates { templates }
}
