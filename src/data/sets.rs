//! Item set definitions
//!
//! Sets grant bonuses once enough member pieces are equipped together.
//! Thresholds stack: reaching the 3-piece bonus keeps the 2-piece one.

use serde::{Deserialize, Serialize};

use crate::items::stats::StatId;

/// A single stat granted by a set threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBonus {
    pub stat: StatId,
    pub value: i32,
}

/// A set threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetThreshold {
    /// Pieces needed to activate
    pub pieces_required: u8,
    /// Bonuses granted
    pub bonuses: Vec<StatBonus>,
}

/// An item set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSet {
    pub id: String,
    pub name: String,
    /// Templates whose drops belong to the set
    pub members: Vec<String>,
    pub thresholds: Vec<SetThreshold>,
}

impl ItemSet {
    /// Thresholds met by a piece count
    pub fn active_thresholds(&self, count: u8) -> impl Iterator<Item = &SetThreshold> {
        self.thresholds.iter().filter(move |t| count >= t.pieces_required)
    }
}

/// Collection of set definitions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetDefs {
    pub sets: Vec<ItemSet>,
}

impl SetDefs {
    /// Find a set by ID
    pub fn find(&self, id: &str) -> Option<&ItemSet> {
        self.sets.iter().find(|s| s.id == id)
    }

    /// Set a template belongs to, if any
    pub fn set_for_template(&self, template_id: &str) -> Option<&ItemSet> {
        self.sets.iter().find(|s| s.members.iter().any(|m| m == template_id))
    }
}

fn bonus(stat: StatId, value: i32) -> StatBonus {
    StatBonus { stat, value }
}

/// Create default set definitions (hardcoded fallback)
pub fn default_set_defs() -> SetDefs {
    SetDefs {
        sets: vec![
            ItemSet {
                id: "wardens_vigil".to_string(),
                name: "Warden's Vigil".to_string(),
                members: vec![
                    "warden_helm".to_string(),
                    "warden_plate".to_string(),
                    "warden_gauntlets".to_string(),
                ],
                thresholds: vec![
                    SetThreshold {
                        pieces_required: 2,
                        bonuses: vec![bonus(StatId::Armour, 50), bonus(StatId::MaximumLife, 20)],
                    },
                    SetThreshold {
                        pieces_required: 3,
                        bonuses: vec![
                            bonus(StatId::Armour, 100),
                            bonus(StatId::BlockChance, 5),
                            bonus(StatId::FireResistance, 15),
                        ],
                    },
                ],
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_thresholds_by_count() {
        let defs = default_set_defs();
        let set = defs.find("wardens_vigil").unwrap();
        assert_eq!(set.active_thresholds(1).count(), 0);
        assert_eq!(set.active_thresholds(2).count(), 1);
        assert_eq!(set.active_thresholds(3).count(), 2);
    }

    #[test]
    fn test_set_for_template() {
        let defs = default_set_defs();
        assert_eq!(defs.set_for_template("warden_plate").map(|s| s.id.as_str()), Some("wardens_vigil"));
        assert!(defs.set_for_template("iron_ring").is_none());
    }
}
