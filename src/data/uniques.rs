//! Unique item definitions
//!
//! Hand-authored items with a fixed explicit modifier list rolled over a
//! regular base template.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::items::item::{AffixKind, Modifier};
use crate::items::stats::StatId;

/// Value of a unique explicit: fixed, or an inclusive range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueRoll {
    Fixed(i32),
    Range(i32, i32),
}

impl ValueRoll {
    /// Sample a concrete value
    pub fn roll(&self, rng: &mut impl Rng) -> i32 {
        match *self {
            ValueRoll::Fixed(v) => v,
            ValueRoll::Range(a, b) => rng.gen_range(a.min(b)..=a.max(b)),
        }
    }
}

/// One explicit line of a unique
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueExplicit {
    pub group: String,
    pub stat: StatId,
    pub value: ValueRoll,
}

/// A unique item definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniqueDef {
    pub id: String,
    pub name: String,
    /// Base template id
    pub base: String,
    pub explicits: Vec<UniqueExplicit>,
    #[serde(default)]
    pub set_id: Option<String>,
}

impl UniqueDef {
    /// Roll every explicit line into modifiers
    pub fn roll_explicits(&self, rng: &mut impl Rng) -> Vec<Modifier> {
        self.explicits
            .iter()
            .map(|e| Modifier {
                group: e.group.clone(),
                stat: e.stat,
                tier: 0,
                value: e.value.roll(rng),
                kind: AffixKind::Unique,
            })
            .collect()
    }
}

/// Collection of unique definitions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UniqueDefs {
    pub uniques: Vec<UniqueDef>,
}

impl UniqueDefs {
    pub fn find(&self, id: &str) -> Option<&UniqueDef> {
        self.uniques.iter().find(|u| u.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.uniques.is_empty()
    }
}

fn line(group: &str, stat: StatId, value: ValueRoll) -> UniqueExplicit {
    UniqueExplicit { group: group.to_string(), stat, value }
}

/// Create default unique definitions (hardcoded fallback)
pub fn default_unique_defs() -> UniqueDefs {
    use ValueRoll::{Fixed, Range};

    UniqueDefs {
        uniques: vec![
            UniqueDef {
                id: "goldrim".to_string(),
                name: "Goldrim".to_string(),
                base: "leather_cap".to_string(),
                explicits: vec![
                    line("evasion", StatId::Evasion, Range(30, 50)),
                    line("fire_resistance", StatId::FireResistance, Fixed(30)),
                    line("cold_resistance", StatId::ColdResistance, Fixed(30)),
                    line("lightning_resistance", StatId::LightningResistance, Fixed(30)),
                ],
                set_id: None,
            },
            UniqueDef {
                id: "wanderlust".to_string(),
                name: "Wanderlust".to_string(),
                base: "wool_shoes".to_string(),
                explicits: vec![
                    line("dexterity", StatId::Dexterity, Fixed(5)),
                    line("movement_speed", StatId::MovementSpeed, Fixed(20)),
                    line("mana_regeneration", StatId::ManaRegeneration, Range(20, 40)),
                ],
                set_id: None,
            },
            UniqueDef {
                id: "lifesprig".to_string(),
                name: "Lifesprig".to_string(),
                base: "driftwood_wand".to_string(),
                explicits: vec![
                    line("increased_spell", StatId::IncreasedSpellDamage, Range(30, 40)),
                    line("maximum_life", StatId::MaximumLife, Fixed(10)),
                    line("cast_speed", StatId::IncreasedCastSpeed, Range(8, 12)),
                ],
                set_id: None,
            },
            UniqueDef {
                id: "bramblejack".to_string(),
                name: "Bramblejack".to_string(),
                base: "plate_vest".to_string(),
                explicits: vec![
                    line("armour", StatId::Armour, Range(40, 60)),
                    line("life", StatId::MaximumLife, Range(60, 80)),
                ],
                set_id: None,
            },
            UniqueDef {
                id: "warden_crown".to_string(),
                name: "Crown of the Warden".to_string(),
                base: "warden_helm".to_string(),
                explicits: vec![
                    line("armour", StatId::Armour, Range(50, 70)),
                    line("strength", StatId::Strength, Range(15, 25)),
                ],
                set_id: Some("wardens_vigil".to_string()),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_value_roll_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let v = ValueRoll::Range(10, 20).roll(&mut rng);
            assert!((10..=20).contains(&v));
        }
        assert_eq!(ValueRoll::Fixed(5).roll(&mut rng), 5);
        // Reversed bounds are tolerated
        let v = ValueRoll::Range(9, 3).roll(&mut rng);
        assert!((3..=9).contains(&v));
    }

    #[test]
    fn test_roll_explicits_keeps_authored_lines() {
        let mut rng = StdRng::seed_from_u64(1);
        let defs = default_unique_defs();
        let goldrim = defs.find("goldrim").unwrap();
        let mods = goldrim.roll_explicits(&mut rng);
        assert_eq!(mods.len(), 4);
        assert!(mods.iter().all(|m| m.kind == AffixKind::Unique));
    }
}
