//! Stat vocabulary
//!
//! The closed set of stat identifiers shared with the tooltip layer, and the
//! accumulator record the equipment aggregator fills in.

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::LootError;

/// Every stat a modifier or set bonus can touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatId {
    // Attributes
    Strength,
    Dexterity,
    Intelligence,
    AllAttributes,

    // Pools
    MaximumLife,
    MaximumMana,
    EnergyShield,
    LifeRegeneration,
    ManaRegeneration,

    // Defences
    Armour,
    Evasion,
    BlockChance,

    // Resistances
    FireResistance,
    ColdResistance,
    LightningResistance,
    ChaosResistance,

    // Offence
    AddedPhysicalDamage,
    IncreasedPhysicalDamage,
    IncreasedFireDamage,
    IncreasedColdDamage,
    IncreasedLightningDamage,
    IncreasedSpellDamage,
    IncreasedAttackSpeed,
    IncreasedCastSpeed,
    CriticalStrikeChance,
    CriticalStrikeMultiplier,
    LifeLeech,

    // Utility
    MovementSpeed,
    ItemRarity,
    ItemQuantity,
}

impl StatId {
    /// Number of stats in the vocabulary
    pub const COUNT: usize = 30;

    /// All stats in declaration order
    pub const ALL: [StatId; StatId::COUNT] = [
        StatId::Strength,
        StatId::Dexterity,
        StatId::Intelligence,
        StatId::AllAttributes,
        StatId::MaximumLife,
        StatId::MaximumMana,
        StatId::EnergyShield,
        StatId::LifeRegeneration,
        StatId::ManaRegeneration,
        StatId::Armour,
        StatId::Evasion,
        StatId::BlockChance,
        StatId::FireResistance,
        StatId::ColdResistance,
        StatId::LightningResistance,
        StatId::ChaosResistance,
        StatId::AddedPhysicalDamage,
        StatId::IncreasedPhysicalDamage,
        StatId::IncreasedFireDamage,
        StatId::IncreasedColdDamage,
        StatId::IncreasedLightningDamage,
        StatId::IncreasedSpellDamage,
        StatId::IncreasedAttackSpeed,
        StatId::IncreasedCastSpeed,
        StatId::CriticalStrikeChance,
        StatId::CriticalStrikeMultiplier,
        StatId::LifeLeech,
        StatId::MovementSpeed,
        StatId::ItemRarity,
        StatId::ItemQuantity,
    ];

    /// Position of this stat inside a [`StatBonusRecord`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Identifier used by the tooltip layer and data files
    pub fn as_str(&self) -> &'static str {
        match self {
            StatId::Strength => "strength",
            StatId::Dexterity => "dexterity",
            StatId::Intelligence => "intelligence",
            StatId::AllAttributes => "all_attributes",
            StatId::MaximumLife => "maximum_life",
            StatId::MaximumMana => "maximum_mana",
            StatId::EnergyShield => "energy_shield",
            StatId::LifeRegeneration => "life_regeneration",
            StatId::ManaRegeneration => "mana_regeneration",
            StatId::Armour => "armour",
            StatId::Evasion => "evasion",
            StatId::BlockChance => "block_chance",
            StatId::FireResistance => "fire_resistance",
            StatId::ColdResistance => "cold_resistance",
            StatId::LightningResistance => "lightning_resistance",
            StatId::ChaosResistance => "chaos_resistance",
            StatId::AddedPhysicalDamage => "added_physical_damage",
            StatId::IncreasedPhysicalDamage => "increased_physical_damage",
            StatId::IncreasedFireDamage => "increased_fire_damage",
            StatId::IncreasedColdDamage => "increased_cold_damage",
            StatId::IncreasedLightningDamage => "increased_lightning_damage",
            StatId::IncreasedSpellDamage => "increased_spell_damage",
            StatId::IncreasedAttackSpeed => "increased_attack_speed",
            StatId::IncreasedCastSpeed => "increased_cast_speed",
            StatId::CriticalStrikeChance => "critical_strike_chance",
            StatId::CriticalStrikeMultiplier => "critical_strike_multiplier",
            StatId::LifeLeech => "life_leech",
            StatId::MovementSpeed => "movement_speed",
            StatId::ItemRarity => "item_rarity",
            StatId::ItemQuantity => "item_quantity",
        }
    }

    /// Tooltip label
    pub fn label(&self) -> &'static str {
        match self {
            StatId::Strength => "Strength",
            StatId::Dexterity => "Dexterity",
            StatId::Intelligence => "Intelligence",
            StatId::AllAttributes => "All Attributes",
            StatId::MaximumLife => "Maximum Life",
            StatId::MaximumMana => "Maximum Mana",
            StatId::EnergyShield => "Energy Shield",
            StatId::LifeRegeneration => "Life Regeneration per second",
            StatId::ManaRegeneration => "Mana Regeneration per second",
            StatId::Armour => "Armour",
            StatId::Evasion => "Evasion Rating",
            StatId::BlockChance => "% Chance to Block",
            StatId::FireResistance => "% Fire Resistance",
            StatId::ColdResistance => "% Cold Resistance",
            StatId::LightningResistance => "% Lightning Resistance",
            StatId::ChaosResistance => "% Chaos Resistance",
            StatId::AddedPhysicalDamage => "Added Physical Damage",
            StatId::IncreasedPhysicalDamage => "% increased Physical Damage",
            StatId::IncreasedFireDamage => "% increased Fire Damage",
            StatId::IncreasedColdDamage => "% increased Cold Damage",
            StatId::IncreasedLightningDamage => "% increased Lightning Damage",
            StatId::IncreasedSpellDamage => "% increased Spell Damage",
            StatId::IncreasedAttackSpeed => "% increased Attack Speed",
            StatId::IncreasedCastSpeed => "% increased Cast Speed",
            StatId::CriticalStrikeChance => "% increased Critical Strike Chance",
            StatId::CriticalStrikeMultiplier => "% Critical Strike Multiplier",
            StatId::LifeLeech => "% of Physical Damage Leeched as Life",
            StatId::MovementSpeed => "% increased Movement Speed",
            StatId::ItemRarity => "% increased Rarity of Items found",
            StatId::ItemQuantity => "% increased Quantity of Items found",
        }
    }
}

impl fmt::Display for StatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatId {
    type Err = LootError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatId::ALL
            .iter()
            .copied()
            .find(|stat| stat.as_str() == s)
            .ok_or_else(|| LootError::Parse(format!("unknown stat identifier '{}'", s)))
    }
}

/// Accumulated stat bonuses, one slot per [`StatId`]
///
/// All entries start at zero. Additions that would leave the finite range are
/// clamped to `f64::MAX` / `f64::MIN` so the record never holds inf or NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatBonusRecord {
    values: [f64; StatId::COUNT],
}

impl Default for StatBonusRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl StatBonusRecord {
    /// All-zero record
    pub fn new() -> Self {
        Self { values: [0.0; StatId::COUNT] }
    }

    /// Current value for a stat
    pub fn get(&self, stat: StatId) -> f64 {
        self.values[stat.index()]
    }

    /// Add to a stat's accumulator
    pub fn add(&mut self, stat: StatId, amount: f64) {
        if amount.is_nan() {
            return;
        }
        let slot = &mut self.values[stat.index()];
        let sum = *slot + amount;
        *slot = if sum.is_finite() {
            sum
        } else if sum.is_nan() {
            // inf + -inf; only reachable if an infinite amount slipped in
            0.0
        } else {
            sum.clamp(f64::MIN, f64::MAX)
        };
    }

    /// Iterate over non-zero entries in vocabulary order
    pub fn non_zero(&self) -> impl Iterator<Item = (StatId, f64)> + '_ {
        StatId::ALL
            .iter()
            .map(move |stat| (*stat, self.values[stat.index()]))
            .filter(|(_, v)| *v != 0.0)
    }

    /// True if every entry is finite
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }
}
