//! Grid-based inventory system
//!
//! Items occupy a rectangle of cells given by their footprint. Placements
//! are kept in a flat list; overlap is checked by rectangle intersection
//! against every placed item, which is plenty fast at inventory scale.

use serde::{Deserialize, Serialize};
use super::item::{ItemId, ItemInstance};

/// Default grid dimensions
pub const GRID_WIDTH: u8 = 10;
pub const GRID_HEIGHT: u8 = 6;

/// Sorting options for [`InventoryGrid::sort_by`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortMode {
    /// Largest footprint first - tightest packing
    #[default]
    Size,
    /// Highest rarity first, then name
    Rarity,
    /// Alphabetical
    Name,
}

/// An item placed in the grid with its top-left corner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedItem {
    pub item: ItemInstance,
    pub x: u8,
    pub y: u8,
}

impl PlacedItem {
    pub fn width(&self) -> u8 {
        self.item.footprint.0.max(1)
    }

    pub fn height(&self) -> u8 {
        self.item.footprint.1.max(1)
    }

    /// Half-open rectangle `(x1, y1, x2, y2)`
    fn rect(&self) -> (u16, u16, u16, u16) {
        rect(self.x, self.y, self.width(), self.height())
    }

    /// Check whether a cell falls inside this item's footprint
    pub fn contains(&self, x: u8, y: u8) -> bool {
        let (x1, y1, x2, y2) = self.rect();
        let (x, y) = (x as u16, y as u16);
        x >= x1 && x < x2 && y >= y1 && y < y2
    }

    /// Get all cells occupied by this item
    pub fn occupied_cells(&self) -> Vec<(u8, u8)> {
        let mut cells = Vec::new();
        for dy in 0..self.height() {
            for dx in 0..self.width() {
                cells.push((self.x.saturating_add(dx), self.y.saturating_add(dy)));
            }
        }
        cells
    }
}

fn rect(x: u8, y: u8, width: u8, height: u8) -> (u16, u16, u16, u16) {
    let (x, y) = (x as u16, y as u16);
    (x, y, x + width as u16, y + height as u16)
}

/// Axis-aligned overlap of two half-open rectangles
fn overlaps(a: (u16, u16, u16, u16), b: (u16, u16, u16, u16)) -> bool {
    a.0 < b.2 && a.2 > b.0 && a.1 < b.3 && a.3 > b.1
}

/// Grid-based inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryGrid {
    width: u8,
    height: u8,
    /// Placements in insertion order
    placed: Vec<PlacedItem>,
}

impl Default for InventoryGrid {
    fn default() -> Self {
        Self::new(GRID_WIDTH, GRID_HEIGHT)
    }
}

impl InventoryGrid {
    /// Create a new empty inventory grid
    pub fn new(width: u8, height: u8) -> Self {
        Self { width, height, placed: Vec::new() }
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// True iff the item's footprint at `(x, y)` lies inside the grid and
    /// overlaps no placed item other than `exclude`.
    pub fn can_place(&self, item: &ItemInstance, x: u8, y: u8, exclude: Option<ItemId>) -> bool {
        let target = rect(x, y, item.footprint.0.max(1), item.footprint.1.max(1));
        if target.2 > self.width as u16 || target.3 > self.height as u16 {
            return false;
        }
        self.placed
            .iter()
            .filter(|p| Some(p.item.uid) != exclude)
            .all(|p| !overlaps(target, p.rect()))
    }

    /// Place an item at a specific position. On failure the item is handed
    /// back and the grid is untouched.
    pub fn place(&mut self, item: ItemInstance, x: u8, y: u8) -> Result<(), ItemInstance> {
        if !self.can_place(&item, x, y, None) {
            return Err(item);
        }
        self.placed.push(PlacedItem { item, x, y });
        Ok(())
    }

    /// Find the first free position for an item, scanning rows top to bottom
    pub fn find_space(&self, item: &ItemInstance) -> Option<(u8, u8)> {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .find(|&(x, y)| self.can_place(item, x, y, None))
    }

    /// Add an item to the inventory, automatically finding space
    pub fn add_item(&mut self, item: ItemInstance) -> Result<(u8, u8), ItemInstance> {
        match self.find_space(&item) {
            Some((x, y)) => {
                self.place(item, x, y)?;
                Ok((x, y))
            }
            None => {
                log::debug!("No room for {} ({}x{})", item.display_name(), item.footprint.0, item.footprint.1);
                Err(item)
            }
        }
    }

    /// Remove an item by ID
    pub fn remove(&mut self, uid: ItemId) -> Option<ItemInstance> {
        let index = self.placed.iter().position(|p| p.item.uid == uid)?;
        Some(self.placed.remove(index).item)
    }

    /// Get the placement covering a cell
    pub fn item_at(&self, x: u8, y: u8) -> Option<&PlacedItem> {
        self.placed.iter().find(|p| p.contains(x, y))
    }

    /// Get item by ID
    pub fn get(&self, uid: ItemId) -> Option<&ItemInstance> {
        self.placement(uid).map(|p| &p.item)
    }

    /// Get placement by ID
    pub fn placement(&self, uid: ItemId) -> Option<&PlacedItem> {
        self.placed.iter().find(|p| p.item.uid == uid)
    }

    /// Swap in a new version of a placed item with the same uid and
    /// footprint, keeping its position. Returns the old version.
    pub fn replace(&mut self, item: ItemInstance) -> Result<ItemInstance, ItemInstance> {
        match self.placed.iter_mut().find(|p| p.item.uid == item.uid) {
            Some(placed) if placed.item.footprint == item.footprint => Ok(std::mem::replace(&mut placed.item, item)),
            _ => Err(item),
        }
    }

    pub fn contains(&self, uid: ItemId) -> bool {
        self.placement(uid).is_some()
    }

    /// Move an item to a new position (if possible). Its current footprint
    /// does not block the move.
    pub fn move_item(&mut self, uid: ItemId, x: u8, y: u8) -> bool {
        let Some(index) = self.placed.iter().position(|p| p.item.uid == uid) else {
            return false;
        };
        if !self.can_place(&self.placed[index].item, x, y, Some(uid)) {
            return false;
        }
        let placed = &mut self.placed[index];
        placed.x = x;
        placed.y = y;
        true
    }

    /// Sort and repack the inventory. If the sorted order no longer fits,
    /// the previous layout is kept.
    pub fn sort_by(&mut self, mode: SortMode) -> bool {
        let mut items: Vec<ItemInstance> = self.placed.iter().map(|p| p.item.clone()).collect();

        match mode {
            SortMode::Size => {
                items.sort_by(|a, b| {
                    let area_a = a.footprint.0 as u16 * a.footprint.1 as u16;
                    let area_b = b.footprint.0 as u16 * b.footprint.1 as u16;
                    area_b.cmp(&area_a).then_with(|| b.footprint.1.cmp(&a.footprint.1))
                });
            }
            SortMode::Rarity => {
                items.sort_by(|a, b| b.rarity.cmp(&a.rarity).then_with(|| a.name.cmp(&b.name)));
            }
            SortMode::Name => {
                items.sort_by(|a, b| a.name.cmp(&b.name));
            }
        }

        let mut repacked = InventoryGrid::new(self.width, self.height);
        for item in items {
            if repacked.add_item(item).is_err() {
                log::debug!("Sort by {:?} does not fit, keeping layout", mode);
                return false;
            }
        }
        *self = repacked;
        true
    }

    /// Get all placed items in insertion order
    pub fn placed(&self) -> &[PlacedItem] {
        &self.placed
    }

    pub fn items(&self) -> impl Iterator<Item = &ItemInstance> {
        self.placed.iter().map(|p| &p.item)
    }

    /// Get item count
    pub fn count(&self) -> usize {
        self.placed.len()
    }

    /// Check if the grid is empty
    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    /// Number of cells covered by items
    pub fn used_cells(&self) -> usize {
        self.placed.iter().map(|p| p.width() as usize * p.height() as usize).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::item::Rarity;

    fn make_test_item(uid: ItemId, width: u8, height: u8) -> ItemInstance {
        let mut item = ItemInstance::new(uid, "test_base", "Test Item", 1);
        item.footprint = (width, height);
        item
    }

    #[test]
    fn test_two_by_three_blocks_its_rectangle() {
        let mut grid = InventoryGrid::new(10, 6);
        assert!(grid.place(make_test_item(1, 2, 3), 0, 0).is_ok());

        let probe = make_test_item(2, 1, 1);
        for y in 0..3 {
            for x in 0..2 {
                assert!(!grid.can_place(&probe, x, y, None), "({}, {}) should be blocked", x, y);
            }
        }
        assert!(grid.can_place(&probe, 2, 0, None));
        assert!(grid.can_place(&probe, 0, 3, None));

        // A wide item reaching into the rectangle is blocked too
        assert!(!grid.can_place(&make_test_item(3, 3, 1), 1, 2, None));
        assert!(grid.can_place(&make_test_item(3, 2, 3), 2, 0, None));
    }

    #[test]
    fn test_out_of_bounds() {
        let grid = InventoryGrid::new(10, 6);
        let item = make_test_item(1, 2, 3);
        assert!(grid.can_place(&item, 8, 3, None));
        assert!(!grid.can_place(&item, 9, 0, None));
        assert!(!grid.can_place(&item, 0, 4, None));
        assert!(!grid.can_place(&item, 255, 255, None));
    }

    #[test]
    fn test_failed_place_leaves_grid_untouched() {
        let mut grid = InventoryGrid::new(10, 6);
        grid.place(make_test_item(1, 2, 2), 0, 0).unwrap();
        let before = grid.clone();
        let rejected = grid.place(make_test_item(2, 2, 2), 1, 1).unwrap_err();
        assert_eq!(rejected.uid, 2);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_place_remove_round_trip() {
        let mut grid = InventoryGrid::new(10, 6);
        grid.place(make_test_item(1, 1, 2), 4, 1).unwrap();
        let before = grid.clone();

        grid.place(make_test_item(2, 2, 3), 0, 0).unwrap();
        let removed = grid.remove(2).unwrap();
        assert_eq!(removed.uid, 2);
        assert_eq!(grid, before);
        assert!(grid.remove(2).is_none());
    }

    #[test]
    fn test_item_at() {
        let mut grid = InventoryGrid::new(10, 6);
        grid.place(make_test_item(7, 2, 3), 3, 1).unwrap();
        assert_eq!(grid.item_at(4, 3).unwrap().item.uid, 7);
        assert!(grid.item_at(5, 1).is_none());
        assert!(grid.item_at(3, 4).is_none());
    }

    #[test]
    fn test_add_item_fills_row_major() {
        let mut grid = InventoryGrid::new(10, 6);
        assert_eq!(grid.add_item(make_test_item(1, 2, 2)), Ok((0, 0)));
        assert_eq!(grid.add_item(make_test_item(2, 1, 1)), Ok((2, 0)));
        assert_eq!(grid.count(), 2);
        assert!(grid.get(1).is_some());
    }

    #[test]
    fn test_grid_full() {
        let mut grid = InventoryGrid::new(10, 6);

        // Fill grid with 1x1 items
        for i in 0..60 {
            assert!(grid.add_item(make_test_item(i, 1, 1)).is_ok());
        }

        // Should be full now
        assert!(grid.add_item(make_test_item(999, 1, 1)).is_err());
        assert_eq!(grid.used_cells(), 60);
    }

    #[test]
    fn test_move_ignores_own_footprint() {
        let mut grid = InventoryGrid::new(10, 6);
        grid.place(make_test_item(1, 2, 2), 0, 0).unwrap();
        grid.place(make_test_item(2, 1, 1), 5, 0).unwrap();

        // Overlaps its own old position only
        assert!(grid.move_item(1, 1, 1));
        assert_eq!(grid.placement(1).map(|p| (p.x, p.y)), Some((1, 1)));

        // Blocked by item 2
        assert!(!grid.move_item(1, 4, 0));
        assert_eq!(grid.placement(1).map(|p| (p.x, p.y)), Some((1, 1)));
        assert!(!grid.move_item(42, 0, 0));
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut grid = InventoryGrid::new(10, 6);
        grid.place(make_test_item(1, 2, 2), 3, 3).unwrap();

        let mut upgraded = make_test_item(1, 2, 2);
        upgraded.rarity = Rarity::Magic;
        assert_eq!(grid.replace(upgraded).unwrap().rarity, Rarity::Normal);
        let placed = grid.placement(1).unwrap();
        assert_eq!((placed.x, placed.y, placed.item.rarity), (3, 3, Rarity::Magic));

        assert!(grid.replace(make_test_item(1, 1, 1)).is_err());
        assert!(grid.replace(make_test_item(2, 2, 2)).is_err());
    }

    #[test]
    fn test_sort_by_rarity() {
        let mut grid = InventoryGrid::new(10, 6);
        let mut rare = make_test_item(1, 1, 1);
        rare.rarity = Rarity::Rare;
        grid.add_item(make_test_item(2, 1, 1)).unwrap();
        grid.add_item(rare).unwrap();

        assert!(grid.sort_by(SortMode::Rarity));
        assert_eq!(grid.item_at(0, 0).unwrap().item.uid, 1);
        assert_eq!(grid.count(), 2);
    }

    #[test]
    fn test_sort_keeps_layout_when_it_cannot_fit() {
        // Three tall items fill columns 0-2 and two 1x1s stack in column 3.
        // Name order packs the 1x1s first, stranding the last tall item.
        let mut grid = InventoryGrid::new(4, 2);
        for (uid, name, x, y, h) in [(1, "C", 0, 0, 2), (2, "D", 1, 0, 2), (3, "E", 2, 0, 2), (4, "A", 3, 0, 1), (5, "B", 3, 1, 1)] {
            let mut item = make_test_item(uid, 1, h);
            item.name = name.to_string();
            grid.place(item, x, y).unwrap();
        }
        let before = grid.clone();
        assert!(!grid.sort_by(SortMode::Name));
        assert_eq!(grid, before);

        assert!(grid.sort_by(SortMode::Size));
        assert_eq!(grid.count(), 5);
    }
}
