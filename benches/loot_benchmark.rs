//! Benchmarks for item generation, crafting and grid packing.
//!
//! Run with: cargo bench --bench loot_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::SeedableRng;

use lootforge::data::Catalog;
use lootforge::items::crafting::{apply_action, CurrencyAction};
use lootforge::items::equipment::{compute_bonuses, EquipmentState};
use lootforge::items::{generate_item, InventoryGrid, ItemIdAllocator};

fn benchmark_generate_item(c: &mut Criterion) {
    let catalog = Catalog::default();
    let mut ids = ItemIdAllocator::new();
    let mut rng = StdRng::seed_from_u64(1);

    c.bench_function("generate_item", |b| {
        b.iter(|| black_box(generate_item(&catalog, &mut ids, black_box(30), true, &mut rng)))
    });
}

fn benchmark_generate_batch(c: &mut Criterion) {
    let catalog = Catalog::default();
    let mut ids = ItemIdAllocator::new();
    let mut rng = StdRng::seed_from_u64(2);

    let mut group = c.benchmark_group("generate_batch");
    group.throughput(Throughput::Elements(1_000));
    group.bench_function("1000_items", |b| {
        b.iter(|| {
            for _ in 0..1_000 {
                black_box(generate_item(&catalog, &mut ids, 30, true, &mut rng));
            }
        })
    });
    group.finish();
}

fn benchmark_rare_reroll(c: &mut Criterion) {
    let catalog = Catalog::default();
    let mut ids = ItemIdAllocator::new();
    let mut rng = StdRng::seed_from_u64(3);
    let mut item = generate_item(&catalog, &mut ids, 30, false, &mut rng).unwrap();
    item.rarity = lootforge::Rarity::Rare;

    c.bench_function("rare_reroll", |b| {
        b.iter(|| black_box(apply_action(CurrencyAction::RareReroll, &item, &catalog, &mut rng)))
    });
}

fn benchmark_grid_fill(c: &mut Criterion) {
    let catalog = Catalog::default();
    let mut ids = ItemIdAllocator::new();
    let mut rng = StdRng::seed_from_u64(4);
    let items: Vec<_> = (0..40)
        .filter_map(|_| generate_item(&catalog, &mut ids, 30, true, &mut rng))
        .collect();

    c.bench_function("grid_fill_first_fit", |b| {
        b.iter(|| {
            let mut grid = InventoryGrid::default();
            for item in &items {
                let _ = black_box(grid.add_item(item.clone()));
            }
            grid
        })
    });
}

fn benchmark_compute_bonuses(c: &mut Criterion) {
    let catalog = Catalog::default();
    let mut ids = ItemIdAllocator::new();
    let mut rng = StdRng::seed_from_u64(5);
    let mut equipment = EquipmentState::new();
    for _ in 0..200 {
        if let Some(item) = generate_item(&catalog, &mut ids, 40, true, &mut rng) {
            let _ = equipment.equip(item);
        }
    }

    c.bench_function("compute_bonuses", |b| {
        b.iter(|| black_box(compute_bonuses(black_box(&equipment), &catalog.sets)))
    });
}

criterion_group!(
    benches,
    benchmark_generate_item,
    benchmark_generate_batch,
    benchmark_rare_reroll,
    benchmark_grid_fill,
    benchmark_compute_bonuses,
);
criterion_main!(benches);
