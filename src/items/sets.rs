//! Set bonuses
//!
//! When enough pieces of a set are equipped together, every threshold the
//! piece count meets contributes its bonuses.

use std::collections::BTreeMap;

use crate::data::{ItemSet, SetDefs, SetThreshold};
use super::item::ItemInstance;
use super::stats::StatBonusRecord;

/// A set with at least one threshold met
#[derive(Debug, Clone)]
pub struct ActiveSet<'a> {
    pub set: &'a ItemSet,
    pub pieces: u8,
    pub thresholds: Vec<&'a SetThreshold>,
}

/// Count equipped pieces per set id
pub fn count_set_pieces<'i>(items: impl IntoIterator<Item = &'i ItemInstance>) -> BTreeMap<String, u8> {
    let mut counts = BTreeMap::new();
    for set_id in items.into_iter().filter_map(|item| item.set_id.as_ref()) {
        let count = counts.entry(set_id.clone()).or_insert(0u8);
        *count = count.saturating_add(1);
    }
    counts
}

/// Calculate active sets from equipped items. Sets with no known definition
/// are skipped.
pub fn active_sets<'a, 'i>(
    items: impl IntoIterator<Item = &'i ItemInstance>,
    defs: &'a SetDefs,
) -> Vec<ActiveSet<'a>> {
    let mut active = Vec::new();
    for (set_id, pieces) in count_set_pieces(items) {
        let Some(set) = defs.find(&set_id) else {
            log::debug!("Equipped item references unknown set '{}'", set_id);
            continue;
        };
        let thresholds: Vec<_> = set.active_thresholds(pieces).collect();
        if !thresholds.is_empty() {
            active.push(ActiveSet { set, pieces, thresholds });
        }
    }
    active
}

/// Add every met threshold's bonuses to `record`
pub fn apply_set_bonuses<'i>(
    record: &mut StatBonusRecord,
    items: impl IntoIterator<Item = &'i ItemInstance>,
    defs: &SetDefs,
) {
    for active in active_sets(items, defs) {
        for bonus in active.thresholds.iter().flat_map(|t| &t.bonuses) {
            record.add(bonus.stat, bonus.value as f64);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sets::default_set_defs;
    use crate::items::stats::StatId;

    fn piece(uid: u64, set: Option<&str>) -> ItemInstance {
        let mut item = ItemInstance::new(uid, "warden_helm", "Warden Helm", 14);
        item.set_id = set.map(str::to_string);
        item
    }

    #[test]
    fn test_count_pieces() {
        let items = [piece(1, Some("a")), piece(2, Some("a")), piece(3, Some("b")), piece(4, None)];
        let counts = count_set_pieces(&items);
        assert_eq!(counts.get("a"), Some(&2));
        assert_eq!(counts.get("b"), Some(&1));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_one_piece_grants_nothing() {
        let defs = default_set_defs();
        let items = [piece(1, Some("wardens_vigil"))];
        assert!(active_sets(&items, &defs).is_empty());
    }

    #[test]
    fn test_thresholds_are_cumulative() {
        let defs = default_set_defs();
        let items = [
            piece(1, Some("wardens_vigil")),
            piece(2, Some("wardens_vigil")),
            piece(3, Some("wardens_vigil")),
        ];
        let active = active_sets(&items, &defs);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].pieces, 3);
        assert_eq!(active[0].thresholds.len(), 2);

        let mut record = StatBonusRecord::new();
        apply_set_bonuses(&mut record, &items, &defs);
        // 2-piece (50) plus 3-piece (100)
        assert_eq!(record.get(StatId::Armour), 150.0);
        assert_eq!(record.get(StatId::MaximumLife), 20.0);
        assert_eq!(record.get(StatId::BlockChance), 5.0);
    }

    #[test]
    fn test_unknown_set_is_ignored() {
        let defs = default_set_defs();
        let items = [piece(1, Some("ghost")), piece(2, Some("ghost"))];
        let mut record = StatBonusRecord::new();
        apply_set_bonuses(&mut record, &items, &defs);
        assert_eq!(record.non_zero().count(), 0);
    }
}
