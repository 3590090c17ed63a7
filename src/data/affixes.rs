//! Affix tier tables
//!
//! Each definition owns one exclusivity group and a ladder of value tiers.
//! Higher tiers are unlocked by higher rarities.

use serde::{Deserialize, Serialize};

use crate::items::item::{AffixKind, ItemSlot};
use crate::items::stats::StatId;

/// One value band of an affix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffixTier {
    pub tier: u8,
    pub min: i32,
    pub max: i32,
}

/// A rollable affix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffixDef {
    /// Exclusivity group, copied onto rolled modifiers
    pub group: String,
    pub stat: StatId,
    /// Prefix or Suffix
    pub kind: AffixKind,
    pub tiers: Vec<AffixTier>,
    /// Slots this affix may roll on; empty means any
    #[serde(default)]
    pub slots: Vec<ItemSlot>,
}

impl AffixDef {
    /// Can this affix roll on an item of the given slot?
    pub fn allows_slot(&self, slot: Option<ItemSlot>) -> bool {
        match slot {
            _ if self.slots.is_empty() => true,
            Some(slot) => self.slots.contains(&slot),
            None => false,
        }
    }

    /// Tiers inside the allowed set
    pub fn tiers_in<'a>(&'a self, allowed: &'a [u8]) -> impl Iterator<Item = &'a AffixTier> + 'a {
        self.tiers.iter().filter(move |t| allowed.contains(&t.tier))
    }
}

/// Collection of affix definitions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AffixTable {
    pub affixes: Vec<AffixDef>,
}

impl AffixTable {
    /// Find an affix by group
    pub fn find(&self, group: &str) -> Option<&AffixDef> {
        self.affixes.iter().find(|a| a.group == group)
    }

    /// Affixes that may roll on a slot
    pub fn for_slot(&self, slot: Option<ItemSlot>) -> Vec<&AffixDef> {
        self.affixes.iter().filter(|a| a.allows_slot(slot)).collect()
    }
}

fn affix(group: &str, stat: StatId, kind: AffixKind, tiers: [(i32, i32); 3], slots: &[ItemSlot]) -> AffixDef {
    AffixDef {
        group: group.to_string(),
        stat,
        kind,
        tiers: tiers
            .iter()
            .enumerate()
            .map(|(i, (min, max))| AffixTier { tier: i as u8 + 1, min: *min, max: *max })
            .collect(),
        slots: slots.to_vec(),
    }
}

/// Create default affix table (hardcoded fallback)
pub fn default_affix_table() -> AffixTable {
    use AffixKind::{Prefix, Suffix};
    use ItemSlot::*;

    AffixTable {
        affixes: vec![
            // Prefixes
            affix("life", StatId::MaximumLife, Prefix, [(10, 19), (20, 39), (40, 59)], &[]),
            affix("mana", StatId::MaximumMana, Prefix, [(10, 19), (20, 34), (35, 49)], &[]),
            affix("armour", StatId::Armour, Prefix, [(8, 20), (21, 45), (46, 80)], &[]),
            affix("evasion", StatId::Evasion, Prefix, [(8, 20), (21, 45), (46, 80)], &[]),
            affix("energy_shield", StatId::EnergyShield, Prefix, [(3, 8), (9, 16), (17, 25)], &[]),
            affix("added_physical", StatId::AddedPhysicalDamage, Prefix, [(1, 3), (4, 7), (8, 12)], &[Weapon, Ring, Gloves]),
            affix("increased_physical", StatId::IncreasedPhysicalDamage, Prefix, [(15, 34), (35, 64), (65, 99)], &[Weapon]),
            affix("increased_spell", StatId::IncreasedSpellDamage, Prefix, [(10, 19), (20, 29), (30, 44)], &[Weapon, OffHand, Amulet]),
            affix("movement_speed", StatId::MovementSpeed, Prefix, [(5, 10), (11, 15), (16, 25)], &[Boots]),
            affix("increased_fire", StatId::IncreasedFireDamage, Prefix, [(8, 14), (15, 22), (23, 30)], &[Weapon, Amulet, Ring]),

            // Suffixes
            affix("strength", StatId::Strength, Suffix, [(8, 12), (13, 17), (18, 22)], &[]),
            affix("dexterity", StatId::Dexterity, Suffix, [(8, 12), (13, 17), (18, 22)], &[]),
            affix("intelligence", StatId::Intelligence, Suffix, [(8, 12), (13, 17), (18, 22)], &[]),
            affix("fire_resistance", StatId::FireResistance, Suffix, [(6, 11), (12, 23), (24, 35)], &[]),
            affix("cold_resistance", StatId::ColdResistance, Suffix, [(6, 11), (12, 23), (24, 35)], &[]),
            affix("lightning_resistance", StatId::LightningResistance, Suffix, [(6, 11), (12, 23), (24, 35)], &[]),
            affix("chaos_resistance", StatId::ChaosResistance, Suffix, [(5, 10), (11, 15), (16, 20)], &[]),
            affix("attack_speed", StatId::IncreasedAttackSpeed, Suffix, [(5, 7), (8, 10), (11, 13)], &[Weapon, Gloves, Ring]),
            affix("cast_speed", StatId::IncreasedCastSpeed, Suffix, [(5, 8), (9, 12), (13, 16)], &[Weapon, Amulet, OffHand]),
            affix("critical_chance", StatId::CriticalStrikeChance, Suffix, [(10, 14), (15, 19), (20, 24)], &[Weapon, Amulet, Helmet]),
            affix("critical_multiplier", StatId::CriticalStrikeMultiplier, Suffix, [(8, 12), (13, 19), (20, 25)], &[Weapon, Amulet]),
            affix("life_regeneration", StatId::LifeRegeneration, Suffix, [(1, 3), (4, 6), (7, 10)], &[]),
            affix("item_rarity", StatId::ItemRarity, Suffix, [(6, 10), (11, 14), (15, 20)], &[Helmet, Gloves, Boots, Ring, Amulet, Trinket]),
            affix("life_leech", StatId::LifeLeech, Suffix, [(1, 1), (1, 2), (2, 3)], &[Weapon, Ring, Amulet]),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_are_unique() {
        let table = default_affix_table();
        let mut groups: Vec<&str> = table.affixes.iter().map(|a| a.group.as_str()).collect();
        let total = groups.len();
        groups.sort_unstable();
        groups.dedup();
        assert_eq!(groups.len(), total);
    }

    #[test]
    fn test_every_slot_can_roll_a_full_rare() {
        // Three of each kind must always be reachable
        let table = default_affix_table();
        for slot in [ItemSlot::Weapon, ItemSlot::Boots, ItemSlot::Belt, ItemSlot::Shoulders] {
            let pool = table.for_slot(Some(slot));
            let prefixes = pool.iter().filter(|a| a.kind == AffixKind::Prefix).count();
            let suffixes = pool.iter().filter(|a| a.kind == AffixKind::Suffix).count();
            assert!(prefixes >= 3 && suffixes >= 3, "{:?} pool too small", slot);
        }
    }

    #[test]
    fn test_tier_filter() {
        let table = default_affix_table();
        let life = table.find("life").unwrap();
        assert_eq!(life.tiers_in(&[1]).count(), 1);
        assert_eq!(life.tiers_in(&[1, 2, 3]).count(), 3);
        assert!(life.allows_slot(None));
        assert!(!table.find("movement_speed").unwrap().allows_slot(Some(ItemSlot::Helmet)));
    }
}
