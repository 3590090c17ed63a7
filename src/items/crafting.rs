//! Currency crafting
//!
//! A currency template carries a [`CurrencyAction`]. Applying it to an item is
//! a pure transformation: the input item is never touched, and on success the
//! outcome carries the new item. Each action checks the item's rarity first
//! and reports a failure message instead of mutating anything.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::data::{Catalog, ItemTemplate};
use crate::error::{LootError, LootResult};
use super::item::{AffixKind, ItemInstance, Modifier, Rarity, MAX_PREFIXES, MAX_SUFFIXES};
use super::loot::{draw_modifiers, roll_affixes, roll_implicits};

/// Largest relative change a value randomization can make
pub const VALUE_JITTER: f64 = 0.10;

/// Everything a currency can do to an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurrencyAction {
    /// Normal -> magic (+1-2 modifiers) or magic -> rare (+2-3)
    UpgradeRarity,
    /// One more modifier, if the rarity has room
    AddModifier,
    /// Magic or rare back to normal with no modifiers
    RemoveModifiers,
    /// Redraw all modifiers for the current rarity
    Reroll,
    /// Acknowledged, no effect
    Identify,
    /// Acknowledged, no effect
    Portal,
    NormalToMagic,
    MagicAdd,
    MagicReroll,
    /// Magic -> rare, adding modifiers until the rare minimum is met
    MagicToRare,
    RareReroll,
    RareAdd,
    /// Nudge every explicit value by up to +/-10%
    RandomizeValues,
    /// Reroll implicit values from the base template
    RandomizeImplicit,
    /// Any non-unique back to normal with no modifiers
    StripToNormal,
    RemoveRandomModifier,
}

impl CurrencyAction {
    pub const ALL: [CurrencyAction; 16] = [
        CurrencyAction::UpgradeRarity,
        CurrencyAction::AddModifier,
        CurrencyAction::RemoveModifiers,
        CurrencyAction::Reroll,
        CurrencyAction::Identify,
        CurrencyAction::Portal,
        CurrencyAction::NormalToMagic,
        CurrencyAction::MagicAdd,
        CurrencyAction::MagicReroll,
        CurrencyAction::MagicToRare,
        CurrencyAction::RareReroll,
        CurrencyAction::RareAdd,
        CurrencyAction::RandomizeValues,
        CurrencyAction::RandomizeImplicit,
        CurrencyAction::StripToNormal,
        CurrencyAction::RemoveRandomModifier,
    ];

    /// Tag used by content and UI layers
    pub fn tag(&self) -> &'static str {
        match self {
            CurrencyAction::UpgradeRarity => "upgrade-rarity",
            CurrencyAction::AddModifier => "add-modifier",
            CurrencyAction::RemoveModifiers => "remove-modifiers",
            CurrencyAction::Reroll => "reroll",
            CurrencyAction::Identify => "identify",
            CurrencyAction::Portal => "portal",
            CurrencyAction::NormalToMagic => "normal-to-magic",
            CurrencyAction::MagicAdd => "magic-add",
            CurrencyAction::MagicReroll => "magic-reroll",
            CurrencyAction::MagicToRare => "magic-to-rare",
            CurrencyAction::RareReroll => "rare-reroll",
            CurrencyAction::RareAdd => "rare-add",
            CurrencyAction::RandomizeValues => "randomize-values",
            CurrencyAction::RandomizeImplicit => "randomize-implicit",
            CurrencyAction::StripToNormal => "strip-to-normal",
            CurrencyAction::RemoveRandomModifier => "remove-random-modifier",
        }
    }

    /// Rarities the action accepts
    pub fn accepts(&self) -> &'static [Rarity] {
        use Rarity::*;
        match self {
            CurrencyAction::UpgradeRarity => &[Normal, Magic],
            CurrencyAction::AddModifier => &[Normal, Magic, Rare],
            CurrencyAction::RemoveModifiers => &[Magic, Rare],
            CurrencyAction::Reroll => &[Normal, Magic, Rare],
            CurrencyAction::Identify | CurrencyAction::Portal => &[Normal, Magic, Rare, Unique],
            CurrencyAction::NormalToMagic => &[Normal],
            CurrencyAction::MagicAdd | CurrencyAction::MagicReroll | CurrencyAction::MagicToRare => &[Magic],
            CurrencyAction::RareReroll | CurrencyAction::RareAdd => &[Rare],
            CurrencyAction::RandomizeValues => &[Magic, Rare, Unique],
            CurrencyAction::RandomizeImplicit => &[Normal, Magic, Rare, Unique],
            CurrencyAction::StripToNormal => &[Normal, Magic, Rare],
            CurrencyAction::RemoveRandomModifier => &[Magic, Rare],
        }
    }
}

impl fmt::Display for CurrencyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for CurrencyAction {
    type Err = LootError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CurrencyAction::ALL
            .iter()
            .copied()
            .find(|a| a.tag() == s)
            .ok_or_else(|| LootError::UnknownCurrencyAction(s.to_string()))
    }
}

/// Result of applying a currency
#[derive(Debug, Clone, PartialEq)]
pub struct CraftOutcome {
    pub success: bool,
    pub message: String,
    /// The transformed item, present only on success
    pub item: Option<ItemInstance>,
}

impl CraftOutcome {
    fn applied(message: String, item: ItemInstance) -> Self {
        Self { success: true, message, item: Some(item) }
    }

    fn rejected(message: String) -> Self {
        Self { success: false, message, item: None }
    }
}

/// Apply a currency template to an item.
///
/// Errors only when the template is not a currency at all. Wrong-rarity and
/// no-room cases come back as `success: false` with the item untouched.
pub fn apply_currency(
    item: &ItemInstance,
    currency: &ItemTemplate,
    catalog: &Catalog,
    rng: &mut impl Rng,
) -> LootResult<CraftOutcome> {
    let behavior = currency
        .currency
        .ok_or_else(|| LootError::NotCurrency(currency.id.clone()))?;

    let outcome = match apply_action(behavior.action, item, catalog, rng) {
        Ok(crafted) => CraftOutcome::applied(format!("{} used on {}", currency.name, item.display_name()), crafted),
        Err(reason) => CraftOutcome::rejected(reason),
    };
    log::debug!("{} on uid {}: {}", behavior.action, item.uid, outcome.message);
    Ok(outcome)
}

/// Apply an action given by its content tag. Unknown tags are a hard error.
pub fn apply_currency_tag(
    item: &ItemInstance,
    tag: &str,
    catalog: &Catalog,
    rng: &mut impl Rng,
) -> LootResult<CraftOutcome> {
    let action: CurrencyAction = tag.parse()?;
    Ok(match apply_action(action, item, catalog, rng) {
        Ok(crafted) => CraftOutcome::applied(format!("{} applied to {}", action, item.display_name()), crafted),
        Err(reason) => CraftOutcome::rejected(reason),
    })
}

/// Run one action. `Err` carries the player-facing reason for refusing.
pub fn apply_action(
    action: CurrencyAction,
    item: &ItemInstance,
    catalog: &Catalog,
    rng: &mut impl Rng,
) -> Result<ItemInstance, String> {
    if !action.accepts().contains(&item.rarity) {
        return Err(format!("Cannot use {} on a {} item", action, item.rarity.name().to_lowercase()));
    }

    let mut out = item.clone();
    match action {
        CurrencyAction::UpgradeRarity => upgrade_rarity(&mut out, catalog, rng)?,
        CurrencyAction::AddModifier => add_modifier(&mut out, catalog, rng)?,
        CurrencyAction::RemoveModifiers | CurrencyAction::StripToNormal => strip_to_normal(&mut out),
        CurrencyAction::Reroll | CurrencyAction::MagicReroll | CurrencyAction::RareReroll => {
            reroll(&mut out, catalog, rng)
        }
        CurrencyAction::Identify | CurrencyAction::Portal => {}
        CurrencyAction::NormalToMagic => normal_to_magic(&mut out, catalog, rng),
        CurrencyAction::MagicAdd | CurrencyAction::RareAdd => add_modifier(&mut out, catalog, rng)?,
        CurrencyAction::MagicToRare => magic_to_rare(&mut out, catalog, rng)?,
        CurrencyAction::RandomizeValues => randomize_values(&mut out, rng)?,
        CurrencyAction::RandomizeImplicit => randomize_implicit(&mut out, catalog, rng)?,
        CurrencyAction::RemoveRandomModifier => remove_random_modifier(&mut out, rng)?,
    }
    Ok(out)
}

/// Roll one modifier the item can still take: unused group, tiers for its
/// rarity, and for rares only a kind that is under its cap.
fn roll_one_more(item: &ItemInstance, catalog: &Catalog, rng: &mut impl Rng) -> Option<Modifier> {
    let taken = item.groups();
    let prefix_open = item.prefix_count() < MAX_PREFIXES;
    let suffix_open = item.suffix_count() < MAX_SUFFIXES;

    let pool: Vec<_> = catalog
        .affixes
        .for_slot(item.slot)
        .into_iter()
        .filter(|d| match (item.rarity, d.kind) {
            (Rarity::Rare, AffixKind::Prefix) => prefix_open,
            (Rarity::Rare, AffixKind::Suffix) => suffix_open,
            _ => true,
        })
        .collect();

    draw_modifiers(&pool, 1, item.rarity.allowed_tiers(), &taken, rng).pop()
}

/// Add up to `count` modifiers, stopping when nothing fits. Returns how many
/// were added.
fn add_modifiers(item: &mut ItemInstance, count: usize, catalog: &Catalog, rng: &mut impl Rng) -> usize {
    let mut added = 0;
    while added < count {
        match roll_one_more(item, catalog, rng) {
            Some(modifier) => {
                item.modifiers.push(modifier);
                added += 1;
            }
            None => break,
        }
    }
    added
}

fn room_left(item: &ItemInstance) -> usize {
    item.rarity
        .modifier_bounds()
        .map(|(_, max)| max.saturating_sub(item.modifiers.len()))
        .unwrap_or(0)
}

fn upgrade_rarity(item: &mut ItemInstance, catalog: &Catalog, rng: &mut impl Rng) -> Result<(), String> {
    match item.rarity {
        Rarity::Normal => {
            normal_to_magic(item, catalog, rng);
            Ok(())
        }
        Rarity::Magic => {
            item.rarity = Rarity::Rare;
            let wanted = rng.gen_range(2..=3).min(room_left(item));
            add_modifiers(item, wanted, catalog, rng);
            Ok(())
        }
        _ => Err(format!("{} items cannot be upgraded further", item.rarity.name())),
    }
}

fn normal_to_magic(item: &mut ItemInstance, catalog: &Catalog, rng: &mut impl Rng) {
    item.rarity = Rarity::Magic;
    let wanted = rng.gen_range(1..=2).min(room_left(item));
    add_modifiers(item, wanted, catalog, rng);
}

fn magic_to_rare(item: &mut ItemInstance, catalog: &Catalog, rng: &mut impl Rng) -> Result<(), String> {
    item.rarity = Rarity::Rare;
    let (min, _) = Rarity::Rare.modifier_bounds().unwrap_or((3, 6));
    let wanted = min.saturating_sub(item.modifiers.len()).max(1).min(room_left(item));
    if add_modifiers(item, wanted, catalog, rng) == 0 {
        return Err("No modifier can be added to this item".to_string());
    }
    Ok(())
}

fn add_modifier(item: &mut ItemInstance, catalog: &Catalog, rng: &mut impl Rng) -> Result<(), String> {
    if room_left(item) == 0 {
        return Err(format!("{} already has the maximum number of modifiers", item.display_name()));
    }
    match roll_one_more(item, catalog, rng) {
        Some(modifier) => {
            item.modifiers.push(modifier);
            Ok(())
        }
        None => Err("No modifier can be added to this item".to_string()),
    }
}

fn strip_to_normal(item: &mut ItemInstance) {
    item.rarity = Rarity::Normal;
    item.modifiers.clear();
}

fn reroll(item: &mut ItemInstance, catalog: &Catalog, rng: &mut impl Rng) {
    item.modifiers = roll_affixes(&catalog.affixes, item.slot, item.rarity, rng);
}

fn randomize_values(item: &mut ItemInstance, rng: &mut impl Rng) -> Result<(), String> {
    if item.modifiers.is_empty() {
        return Err("This item has no modifiers to randomize".to_string());
    }
    for modifier in &mut item.modifiers {
        let factor = 1.0 + rng.gen_range(-VALUE_JITTER..=VALUE_JITTER);
        let scaled = (modifier.value as f64 * factor).round();
        modifier.value = scaled.clamp(i32::MIN as f64, i32::MAX as f64) as i32;
    }
    Ok(())
}

fn randomize_implicit(item: &mut ItemInstance, catalog: &Catalog, rng: &mut impl Rng) -> Result<(), String> {
    let template = catalog
        .template(&item.template_id)
        .ok_or_else(|| format!("Unknown base '{}'", item.template_id))?;
    if template.implicits.is_empty() {
        return Err(format!("{} has no implicit modifiers", template.name));
    }
    item.implicits = roll_implicits(template, rng);
    Ok(())
}

fn remove_random_modifier(item: &mut ItemInstance, rng: &mut impl Rng) -> Result<(), String> {
    let floor = item.rarity.modifier_bounds().map_or(0, |(min, _)| min);
    if item.modifiers.len() <= floor {
        return Err(format!(
            "A {} item cannot lose any more modifiers",
            item.rarity.name().to_lowercase()
        ));
    }
    let index = rng.gen_range(0..item.modifiers.len());
    item.modifiers.remove(index);
    Ok(())
}
