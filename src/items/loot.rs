//! Loot generation system
//!
//! Rarity rolls, affix rolls, weapon support sockets and the item generator
//! that strings them together. Every roll takes the caller's RNG so results
//! are reproducible under a seeded generator.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::data::{AffixDef, AffixTable, Catalog, ItemTemplate};
use super::item::{AffixKind, ItemIdAllocator, ItemInstance, ItemSlot, Modifier, Rarity, MAX_PREFIXES, MAX_SUFFIXES};

/// Base templates may be up to this many levels above the area
pub const LEVEL_LEEWAY: u32 = 5;

/// Generate a random rarity from the fixed drop weights
pub fn roll_rarity(rng: &mut impl Rng) -> Rarity {
    let total: f64 = Rarity::ALL.iter().map(|r| r.weight()).sum();
    let mut roll = rng.gen::<f64>() * total;

    for rarity in Rarity::ALL {
        let weight = rarity.weight();
        if roll < weight {
            return rarity;
        }
        roll -= weight;
    }

    // Float slop at the very top of the range
    Rarity::Unique
}

/// Number of support sockets on a weapon: 2 (70%), 3 (25%) or 4 (5%)
pub fn roll_weapon_supports(rng: &mut impl Rng) -> u8 {
    match rng.gen_range(0..100) {
        0..=69 => 2,
        70..=94 => 3,
        _ => 4,
    }
}

/// Roll one modifier from a definition, restricted to the allowed tiers.
/// `None` if the definition has no tier in the allowed set.
pub fn roll_modifier(def: &AffixDef, allowed_tiers: &[u8], rng: &mut impl Rng) -> Option<Modifier> {
    let tiers: Vec<_> = def.tiers_in(allowed_tiers).collect();
    let tier = tiers.choose(rng)?;
    let (lo, hi) = (tier.min.min(tier.max), tier.min.max(tier.max));

    Some(Modifier {
        group: def.group.clone(),
        stat: def.stat,
        tier: tier.tier,
        value: rng.gen_range(lo..=hi),
        kind: def.kind,
    })
}

/// Draw up to `count` modifiers from `pool`, never reusing a group in
/// `taken` or one already drawn. Stops early when the pool runs dry.
pub fn draw_modifiers(
    pool: &[&AffixDef],
    count: usize,
    allowed_tiers: &[u8],
    taken: &HashSet<&str>,
    rng: &mut impl Rng,
) -> Vec<Modifier> {
    let mut remaining: Vec<&AffixDef> = pool
        .iter()
        .copied()
        .filter(|d| !taken.contains(d.group.as_str()))
        .filter(|d| d.tiers_in(allowed_tiers).next().is_some())
        .collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut rolled = Vec::with_capacity(count);

    while rolled.len() < count && !remaining.is_empty() {
        let def = remaining.swap_remove(rng.gen_range(0..remaining.len()));
        if !seen.insert(def.group.as_str()) {
            continue;
        }
        if let Some(modifier) = roll_modifier(def, allowed_tiers, rng) {
            rolled.push(modifier);
        }
    }

    rolled
}

/// Split a rare modifier count between prefixes and suffixes, 3 each at most.
/// Odd counts hand the extra affix to a random side.
pub fn split_rare_count(count: usize, rng: &mut impl Rng) -> (usize, usize) {
    let half = count / 2;
    let (prefixes, suffixes) = if count % 2 == 1 && rng.gen_bool(0.5) {
        (half + 1, half)
    } else {
        (half, count - half)
    };
    (prefixes.min(MAX_PREFIXES), suffixes.min(MAX_SUFFIXES))
}

/// Roll `count` modifiers for a rare, respecting the prefix/suffix caps and
/// whatever the item already carries. Falls back to fewer modifiers if a
/// pool is exhausted.
pub fn roll_rare_modifiers(
    table: &AffixTable,
    slot: Option<ItemSlot>,
    count: usize,
    existing: &[Modifier],
    rng: &mut impl Rng,
) -> Vec<Modifier> {
    let allowed = Rarity::Rare.allowed_tiers();
    let pool = table.for_slot(slot);
    let taken: HashSet<&str> = existing.iter().map(|m| m.group.as_str()).collect();
    let prefixes_held = existing.iter().filter(|m| m.kind == AffixKind::Prefix).count();
    let suffixes_held = existing.iter().filter(|m| m.kind == AffixKind::Suffix).count();

    let (want_prefixes, want_suffixes) = split_rare_count(count, rng);
    let want_prefixes = want_prefixes.min(MAX_PREFIXES.saturating_sub(prefixes_held));
    let want_suffixes = want_suffixes.min(MAX_SUFFIXES.saturating_sub(suffixes_held));

    let prefix_pool: Vec<&AffixDef> = pool.iter().copied().filter(|d| d.kind == AffixKind::Prefix).collect();
    let suffix_pool: Vec<&AffixDef> = pool.iter().copied().filter(|d| d.kind == AffixKind::Suffix).collect();

    let mut rolled = draw_modifiers(&prefix_pool, want_prefixes, allowed, &taken, rng);
    rolled.extend(draw_modifiers(&suffix_pool, want_suffixes, allowed, &taken, rng));

    if rolled.len() < count {
        log::debug!("Rare affix pool exhausted: wanted {}, rolled {}", count, rolled.len());
    }
    rolled
}

/// Roll a fresh explicit modifier set for a rarity.
///
/// Normal items get one tier-1 modifier, magic 1-2 from tiers 1-2, rare 3-6
/// from tiers 1-3 split across prefixes and suffixes. Uniques never come
/// through here and get an empty list.
pub fn roll_affixes(table: &AffixTable, slot: Option<ItemSlot>, rarity: Rarity, rng: &mut impl Rng) -> Vec<Modifier> {
    let Some((min, max)) = rarity.modifier_bounds() else {
        return Vec::new();
    };
    let count = rng.gen_range(min..=max);

    if rarity == Rarity::Rare {
        return roll_rare_modifiers(table, slot, count, &[], rng);
    }

    let pool = table.for_slot(slot);
    draw_modifiers(&pool, count, rarity.allowed_tiers(), &HashSet::new(), rng)
}

/// Roll the template's implicit ranges
pub fn roll_implicits(template: &ItemTemplate, rng: &mut impl Rng) -> Vec<Modifier> {
    template
        .implicits
        .iter()
        .map(|range| Modifier {
            group: range.group.clone(),
            stat: range.stat,
            tier: 0,
            value: rng.gen_range(range.min.min(range.max)..=range.min.max(range.max)),
            kind: AffixKind::Implicit,
        })
        .collect()
}

/// Stamp a bare instance of a template: footprint, slot, implicits and set
/// membership, no explicit modifiers yet.
pub fn instance_from_template(
    catalog: &Catalog,
    template: &ItemTemplate,
    uid: u64,
    level: u32,
    rng: &mut impl Rng,
) -> ItemInstance {
    let mut item = ItemInstance::new(uid, template.id.clone(), template.name.clone(), level);
    item.footprint = template.footprint;
    item.slot = template.slot;
    item.implicits = roll_implicits(template, rng);
    item.set_id = catalog.sets.set_for_template(&template.id).map(|s| s.id.clone());
    item
}

/// Pick a base template for an area level. Templates more than
/// [`LEVEL_LEEWAY`] levels above the area are skipped unless that leaves
/// nothing, in which case the whole pool is used.
pub fn pick_base<'a>(catalog: &'a Catalog, area_level: u32, rng: &mut impl Rng) -> Option<&'a ItemTemplate> {
    let bases = catalog.items.bases();
    if bases.is_empty() {
        return None;
    }

    let eligible: Vec<&ItemTemplate> = bases
        .iter()
        .copied()
        .filter(|t| t.required_level() <= area_level.saturating_add(LEVEL_LEEWAY))
        .collect();

    if eligible.is_empty() {
        log::warn!("No base templates within level {}, using the full pool", area_level);
        bases.choose(rng).copied()
    } else {
        eligible.choose(rng).copied()
    }
}

/// Generate one item for an area level.
///
/// Returns `None` only when the catalog has no base templates at all.
pub fn generate_item(
    catalog: &Catalog,
    ids: &mut ItemIdAllocator,
    area_level: u32,
    allow_unique: bool,
    rng: &mut impl Rng,
) -> Option<ItemInstance> {
    let mut rarity = roll_rarity(rng);
    if rarity == Rarity::Unique && !allow_unique {
        rarity = Rarity::Rare;
    }

    if rarity == Rarity::Unique {
        match catalog.uniques.uniques.choose(rng) {
            Some(def) => match catalog.template(&def.base) {
                Some(template) => {
                    let mut item = instance_from_template(catalog, template, ids.next_id(), area_level, rng);
                    item.rarity = Rarity::Unique;
                    item.name = def.name.clone();
                    item.modifiers = def.roll_explicits(rng);
                    item.unique_id = Some(def.id.clone());
                    if def.set_id.is_some() {
                        item.set_id = def.set_id.clone();
                    }
                    log::debug!("Generated unique {} (uid {})", def.name, item.uid);
                    return Some(item);
                }
                None => {
                    log::warn!("Unique '{}' references missing base '{}', rolling a rare", def.id, def.base);
                    rarity = Rarity::Rare;
                }
            },
            None => {
                log::warn!("No unique definitions in catalog, rolling a rare");
                rarity = Rarity::Rare;
            }
        }
    }

    let template = pick_base(catalog, area_level, rng)?;
    let mut item = instance_from_template(catalog, template, ids.next_id(), area_level, rng);
    item.rarity = rarity;
    item.modifiers = roll_affixes(&catalog.affixes, template.slot, rarity, rng);

    if template.is_weapon() {
        item.sockets = Some(roll_weapon_supports(rng));
    }

    log::debug!(
        "Generated {} {} (uid {}, {} modifiers)",
        rarity.name(),
        template.name,
        item.uid,
        item.modifiers.len()
    );
    Some(item)
}

/// Generate several items at once
pub fn generate_items(
    catalog: &Catalog,
    ids: &mut ItemIdAllocator,
    area_level: u32,
    count: usize,
    allow_unique: bool,
    rng: &mut impl Rng,
) -> Vec<ItemInstance> {
    (0..count)
        .filter_map(|_| generate_item(catalog, ids, area_level, allow_unique, rng))
        .collect()
}
