//! Equipment system
//!
//! Manages equipped items and calculates total bonuses.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

use crate::data::SetDefs;
use super::item::{EquipSlot, ItemInstance};
use super::sets::apply_set_bonuses;
use super::stats::StatBonusRecord;

/// Character equipment slots
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquipmentState {
    /// Items in each slot
    slots: BTreeMap<EquipSlot, ItemInstance>,
}

impl EquipmentState {
    pub fn new() -> Self {
        Self { slots: BTreeMap::new() }
    }

    /// Slot an item would go to: the first free slot it fits, otherwise the
    /// first slot it fits (swapping out the occupant).
    pub fn slot_for(&self, item: &ItemInstance) -> Option<EquipSlot> {
        let candidates = item.slot?.equip_slots();
        candidates
            .iter()
            .copied()
            .find(|slot| self.is_empty(*slot))
            .or_else(|| candidates.first().copied())
    }

    /// Equip an item, returning the previously equipped item if any.
    /// Items that cannot be worn are handed back as `Err`.
    pub fn equip(&mut self, item: ItemInstance) -> Result<Option<ItemInstance>, ItemInstance> {
        match self.slot_for(&item) {
            Some(slot) => self.equip_to(slot, item),
            None => Err(item),
        }
    }

    /// Equip into a specific slot. Fails if the item does not fit there.
    pub fn equip_to(&mut self, slot: EquipSlot, item: ItemInstance) -> Result<Option<ItemInstance>, ItemInstance> {
        let fits = item.slot.map(|s| s.equip_slots().contains(&slot)).unwrap_or(false);
        if !fits {
            return Err(item);
        }
        log::debug!("Equipped {} in {}", item.display_name(), slot.name());
        Ok(self.slots.insert(slot, item))
    }

    /// Unequip an item from a slot
    pub fn unequip(&mut self, slot: EquipSlot) -> Option<ItemInstance> {
        self.slots.remove(&slot)
    }

    /// Get item in a slot
    pub fn get(&self, slot: EquipSlot) -> Option<&ItemInstance> {
        self.slots.get(&slot)
    }

    /// Slot holding an item uid
    pub fn find(&self, uid: u64) -> Option<EquipSlot> {
        self.slots.iter().find(|(_, item)| item.uid == uid).map(|(slot, _)| *slot)
    }

    /// Check if a slot is empty
    pub fn is_empty(&self, slot: EquipSlot) -> bool {
        !self.slots.contains_key(&slot)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Get all equipped items
    pub fn items(&self) -> impl Iterator<Item = &ItemInstance> {
        self.slots.values()
    }

    /// Occupied slots with their items, in slot order
    pub fn iter(&self) -> impl Iterator<Item = (EquipSlot, &ItemInstance)> {
        self.slots.iter().map(|(slot, item)| (*slot, item))
    }
}

/// Total stat bonuses from equipment.
///
/// Starts from zero, adds every implicit and explicit modifier of every
/// equipped item, then layers on set bonuses for each met threshold.
/// Accumulation happens in `f64` with saturation, so no input can make the
/// record non-finite.
pub fn compute_bonuses(equipment: &EquipmentState, sets: &SetDefs) -> StatBonusRecord {
    let mut record = StatBonusRecord::new();
    for item in equipment.items() {
        for modifier in item.implicits.iter().chain(&item.modifiers) {
            record.add(modifier.stat, modifier.value as f64);
        }
    }
    apply_set_bonuses(&mut record, equipment.items(), sets);
    record
}

/// Equipment slot display info
impl EquipSlot {
    pub fn name(&self) -> &'static str {
        match self {
            EquipSlot::MainHand => "Main Hand",
            EquipSlot::OffHand => "Off Hand",
            EquipSlot::Head => "Head",
            EquipSlot::Body => "Body",
            EquipSlot::Hands => "Hands",
            EquipSlot::Feet => "Feet",
            EquipSlot::Shoulders => "Shoulders",
            EquipSlot::Amulet => "Amulet",
            EquipSlot::Trinket => "Trinket",
            EquipSlot::Ring1 => "Ring 1",
            EquipSlot::Ring2 => "Ring 2",
            EquipSlot::Belt => "Belt",
        }
    }

    /// Get all slots in display order
    pub fn all() -> &'static [EquipSlot] {
        &[
            EquipSlot::MainHand,
            EquipSlot::OffHand,
            EquipSlot::Head,
            EquipSlot::Shoulders,
            EquipSlot::Body,
            EquipSlot::Hands,
            EquipSlot::Belt,
            EquipSlot::Feet,
            EquipSlot::Amulet,
            EquipSlot::Trinket,
            EquipSlot::Ring1,
            EquipSlot::Ring2,
        ]
    }
}
