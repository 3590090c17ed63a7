//! Vendor offers and gold ledger
//!
//! A vendor stocks a handful of generated items (never above magic rarity)
//! and holds the player's gold balance. Buying is all-or-nothing and selling
//! always succeeds, so the balance can never go negative.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::data::Catalog;
use super::item::{ItemIdAllocator, ItemInstance, Rarity};
use super::loot::{generate_item, roll_affixes};

/// Default number of items a vendor stocks
pub const DEFAULT_OFFER_COUNT: usize = 6;

/// Gold per item level before the rarity multiplier
pub const PRICE_PER_LEVEL: u64 = 10;

/// Price the vendor asks for an item
pub fn buy_price(item: &ItemInstance) -> u64 {
    (item.level as u64)
        .saturating_mul(PRICE_PER_LEVEL)
        .saturating_mul(item.rarity.price_multiplier())
}

/// Gold paid for an item: 40% of its buy price, rounded down
pub fn sell_price(item: &ItemInstance) -> u64 {
    buy_price(item) / 5 * 2 + buy_price(item) % 5 * 2 / 5
}

/// Vendor stock plus the gold balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorLedger {
    /// Items for sale
    pub offers: Vec<ItemInstance>,
    /// Player gold
    pub gold: u64,
    /// Area level the offers were rolled for
    pub level: u32,
    /// Unix seconds of the last restock
    #[serde(default)]
    pub last_refresh: Option<u64>,
    pub offer_count: usize,
    /// Seconds between restocks
    pub refresh_interval: u64,
}

impl Default for VendorLedger {
    fn default() -> Self {
        Self::new(0)
    }
}

impl VendorLedger {
    pub fn new(gold: u64) -> Self {
        Self {
            offers: Vec::new(),
            gold,
            level: 1,
            last_refresh: None,
            offer_count: DEFAULT_OFFER_COUNT,
            refresh_interval: 600,
        }
    }

    /// Replace the offers with freshly generated stock for `level`.
    ///
    /// Uniques are never rolled; a rare roll is knocked down to magic and
    /// its modifiers are re-rolled as a magic item's.
    pub fn init_offers(&mut self, catalog: &Catalog, ids: &mut ItemIdAllocator, level: u32, rng: &mut impl Rng) {
        self.level = level;
        self.offers.clear();
        for _ in 0..self.offer_count {
            let Some(mut item) = generate_item(catalog, ids, level, false, rng) else {
                log::warn!("Vendor could not generate stock: catalog has no bases");
                break;
            };
            if item.rarity == Rarity::Rare {
                item.rarity = Rarity::Magic;
                item.modifiers = roll_affixes(&catalog.affixes, item.slot, Rarity::Magic, rng);
            }
            self.offers.push(item);
        }
        log::info!("Vendor stocked {} items for level {}", self.offers.len(), level);
    }

    /// True when the stock has never been rolled or is older than the
    /// refresh interval
    pub fn needs_refresh(&self, now: u64) -> bool {
        match self.last_refresh {
            Some(last) => now.saturating_sub(last) >= self.refresh_interval,
            None => true,
        }
    }

    /// Restock and stamp the refresh time
    pub fn refresh(&mut self, now: u64, catalog: &Catalog, ids: &mut ItemIdAllocator, level: u32, rng: &mut impl Rng) {
        self.init_offers(catalog, ids, level, rng);
        self.last_refresh = Some(now);
    }

    pub fn can_afford(&self, index: usize) -> bool {
        self.offers.get(index).map(|item| self.gold >= buy_price(item)).unwrap_or(false)
    }

    /// Buy the offer at `index`. Returns `None` without touching anything if
    /// the index is out of range or the gold does not cover the price.
    pub fn buy(&mut self, index: usize) -> Option<ItemInstance> {
        if !self.can_afford(index) {
            return None;
        }
        let item = self.offers.remove(index);
        let price = buy_price(&item);
        self.gold -= price;
        log::debug!("Bought {} for {} gold ({} left)", item.display_name(), price, self.gold);
        Some(item)
    }

    /// Sell an item to the vendor. Always succeeds; returns gold earned.
    pub fn sell(&mut self, item: ItemInstance) -> u64 {
        let earned = sell_price(&item);
        self.gold = self.gold.saturating_add(earned);
        log::debug!("Sold {} for {} gold", item.display_name(), earned);
        earned
    }

    /// Put a bought item back on offer and refund it. Used when the buyer
    /// has no room for it.
    pub fn refund(&mut self, index: usize, item: ItemInstance) {
        self.gold = self.gold.saturating_add(buy_price(&item));
        let index = index.min(self.offers.len());
        self.offers.insert(index, item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn item(uid: u64, level: u32, rarity: Rarity) -> ItemInstance {
        let mut item = ItemInstance::new(uid, "iron_hat", "Iron Hat", level);
        item.rarity = rarity;
        item
    }

    #[test]
    fn test_prices() {
        assert_eq!(buy_price(&item(1, 10, Rarity::Normal)), 100);
        assert_eq!(buy_price(&item(1, 10, Rarity::Magic)), 200);
        assert_eq!(buy_price(&item(1, 10, Rarity::Rare)), 500);
        assert_eq!(buy_price(&item(1, 10, Rarity::Unique)), 1000);
        assert_eq!(sell_price(&item(1, 10, Rarity::Normal)), 40);
        assert_eq!(buy_price(&item(1, 0, Rarity::Rare)), 0);
    }

    #[test]
    fn test_sell_never_exceeds_buy() {
        for level in [0, 1, 3, 7, 10, 99, u32::MAX] {
            for rarity in Rarity::ALL {
                let it = item(1, level, rarity);
                let (buy, sell) = (buy_price(&it), sell_price(&it));
                assert!(sell <= buy);
                // floor(buy * 0.4)
                assert_eq!(sell as u128, buy as u128 * 2 / 5);
            }
        }
    }

    #[test]
    fn test_buy_with_exact_gold_then_broke() {
        let mut vendor = VendorLedger::new(100);
        vendor.offers = vec![item(1, 10, Rarity::Normal), item(2, 10, Rarity::Normal)];

        let bought = vendor.buy(0).unwrap();
        assert_eq!(bought.uid, 1);
        assert_eq!(vendor.gold, 0);
        assert_eq!(vendor.offers.len(), 1);

        let before = vendor.offers.clone();
        assert!(vendor.buy(0).is_none());
        assert_eq!(vendor.offers, before);
        assert_eq!(vendor.gold, 0);
    }

    #[test]
    fn test_buy_out_of_range() {
        let mut vendor = VendorLedger::new(1_000);
        assert!(vendor.buy(3).is_none());
        assert_eq!(vendor.gold, 1_000);
    }

    #[test]
    fn test_sell_credits_gold() {
        let mut vendor = VendorLedger::new(5);
        assert_eq!(vendor.sell(item(1, 10, Rarity::Magic)), 80);
        assert_eq!(vendor.gold, 85);
    }

    #[test]
    fn test_refund_restores_offer_and_gold() {
        let mut vendor = VendorLedger::new(200);
        vendor.offers = vec![item(1, 10, Rarity::Normal), item(2, 10, Rarity::Magic)];
        let before = vendor.clone();
        let bought = vendor.buy(1).unwrap();
        vendor.refund(1, bought);
        assert_eq!(vendor, before);
    }

    #[test]
    fn test_offers_never_above_magic() {
        let catalog = Catalog::default();
        let mut ids = ItemIdAllocator::new();
        let mut rng = StdRng::seed_from_u64(3);
        let mut vendor = VendorLedger::new(0);
        for _ in 0..100 {
            vendor.init_offers(&catalog, &mut ids, 20, &mut rng);
            assert_eq!(vendor.offers.len(), DEFAULT_OFFER_COUNT);
            for offer in &vendor.offers {
                assert!(offer.rarity <= Rarity::Magic, "{:?}", offer.rarity);
                assert!(offer.unique_id.is_none());
                assert!((1..=2).contains(&offer.modifiers.len()) || offer.rarity == Rarity::Normal);
                assert!(offer.modifiers.len() <= 2);
            }
        }
    }

    #[test]
    fn test_downgraded_offers_use_magic_tiers() {
        let catalog = Catalog::default();
        let mut ids = ItemIdAllocator::new();
        let mut rng = StdRng::seed_from_u64(20);
        let mut vendor = VendorLedger::new(0);
        for _ in 0..300 {
            vendor.init_offers(&catalog, &mut ids, 20, &mut rng);
            for offer in vendor.offers.iter().filter(|o| o.rarity == Rarity::Magic) {
                assert!(
                    offer.modifiers.iter().all(|m| Rarity::Magic.allowed_tiers().contains(&m.tier)),
                    "{:?}",
                    offer.modifiers
                );
                assert!(offer.groups_are_exclusive());
            }
        }
    }

    #[test]
    fn test_empty_catalog_gives_no_offers() {
        let mut vendor = VendorLedger::new(0);
        vendor.init_offers(&Catalog::empty(), &mut ItemIdAllocator::new(), 5, &mut StdRng::seed_from_u64(1));
        assert!(vendor.offers.is_empty());
    }

    #[test]
    fn test_refresh_interval() {
        let catalog = Catalog::default();
        let mut ids = ItemIdAllocator::new();
        let mut rng = StdRng::seed_from_u64(8);
        let mut vendor = VendorLedger::new(0);
        assert!(vendor.needs_refresh(0));

        vendor.refresh(1_000, &catalog, &mut ids, 5, &mut rng);
        assert!(!vendor.needs_refresh(1_000 + vendor.refresh_interval - 1));
        assert!(vendor.needs_refresh(1_000 + vendor.refresh_interval));
        // Clock going backwards does not force a restock
        assert!(!vendor.needs_refresh(10));
    }
}
