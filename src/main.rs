//! Lootforge - Entry Point
//!
//! Rolls a batch of loot and shows what the economy makes of it.
//!
//! Usage:
//!   lootforge [area_level] [count] [seed]
//!   lootforge export-data [dir]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use lootforge::config::{LootConfig, CONFIG_FILE};
use lootforge::data::export_default_data;
use lootforge::game::{unix_now, Game};
use lootforge::items::{buy_price, sell_price, ItemInstance, Rarity};

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    )
    .init();

    log::info!("Starting Lootforge v{}", env!("CARGO_PKG_VERSION"));

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut config = LootConfig::load_or_default(Path::new(CONFIG_FILE));

    if args.first().map(String::as_str) == Some("export-data") {
        let dir = args.get(1).map(PathBuf::from).unwrap_or_else(|| config.data_dir.clone());
        export_default_data(&dir).with_context(|| format!("exporting catalog to {}", dir.display()))?;
        println!("Default catalog written to {}", dir.display());
        return Ok(());
    }

    let area_level: u32 = parse_arg(&args, 0, "area_level")?.unwrap_or(10);
    let count: usize = parse_arg(&args, 1, "count")?.unwrap_or(8);
    if let Some(seed) = parse_arg(&args, 2, "seed")? {
        config.seed = Some(seed);
    }

    let mut game = Game::from_config(config).context("starting session")?;
    game.set_area_level(area_level);

    println!("== Drops (area level {}) ==", area_level);
    for item in game.generate_loot(count) {
        print_item(&item);
        if let Err(item) = game.pick_up(item) {
            println!("   (no room for {})", item.display_name());
        }
    }

    let to_equip: Vec<u64> = game.inventory().items().filter(|i| i.is_equippable()).map(|i| i.uid).collect();
    for uid in to_equip {
        if let Err(e) = game.equip_from_inventory(uid) {
            log::debug!("Skipped equipping {}: {}", uid, e);
        }
    }

    println!();
    println!("== Equipment bonuses ==");
    for (stat, value) in game.bonuses().non_zero() {
        println!("  {:>8} {}", value, stat.label());
    }

    game.refresh_vendor(unix_now());
    println!();
    println!("== Vendor ({} gold) ==", game.gold());
    for (index, offer) in game.vendor().offers.iter().enumerate() {
        println!("  [{}] {:<32} {:>6} gold", index, offer.display_name(), buy_price(offer));
    }

    Ok(())
}

/// Parse an optional positional argument
fn parse_arg<T: std::str::FromStr>(args: &[String], index: usize, name: &str) -> Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    args.get(index)
        .map(|raw| raw.parse::<T>().with_context(|| format!("invalid {}: {}", name, raw)))
        .transpose()
}

fn print_item(item: &ItemInstance) {
    let extra = match (item.rarity, item.sockets) {
        (Rarity::Unique, _) => " [unique]".to_string(),
        (_, Some(sockets)) => format!(" [{} sockets]", sockets),
        _ => String::new(),
    };
    println!(
        "- {} (ilvl {}){}  buy {} / sell {}",
        item.display_name(),
        item.level,
        extra,
        buy_price(item),
        sell_price(item)
    );
    for modifier in item.implicits.iter().chain(&item.modifiers) {
        println!("     {:+} {}", modifier.value, modifier.stat.label());
    }
}
