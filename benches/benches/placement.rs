// Copyright 2026 the Tilewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `tilewall_layout` placement.

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tilewall_layout::{
    Footprint, Occupancy, PlacementConfig, PlacementMode, PlacementStrategy, Placer,
};

fn grown_wall(placer: &Placer, tiles: u32, rng: &mut StdRng) -> Occupancy {
    let mut occupancy = Occupancy::new();
    for i in 0..tiles {
        let footprint = Footprint::new(1 + i % 2).unwrap();
        let placement = placer.place(&occupancy, footprint, rng).unwrap();
        occupancy.mark_block(placement.cell, footprint).unwrap();
    }
    occupancy
}

fn placer(mode: PlacementMode) -> Placer {
    Placer::new(PlacementConfig {
        mode,
        ..PlacementConfig::default()
    })
}

fn bench_place(c: &mut Criterion) {
    let mut group = c.benchmark_group("placement/place_one");
    for (label, mode) in [
        ("adjacent", PlacementMode::Adjacent),
        ("spiral", PlacementMode::Spiral),
    ] {
        let placer = placer(mode);
        for tiles in [16_u32, 128, 512] {
            let mut rng = StdRng::seed_from_u64(42);
            let wall = grown_wall(&placer, tiles, &mut rng);
            group.bench_with_input(BenchmarkId::new(label, tiles), &wall, |b, wall| {
                b.iter(|| black_box(placer.place(wall, Footprint::ONE, &mut rng)));
            });
        }
    }
    group.finish();
}

fn bench_fallbacks(c: &mut Criterion) {
    let placer = placer(PlacementMode::Adjacent);
    let mut rng = StdRng::seed_from_u64(7);
    let wall = grown_wall(&placer, 256, &mut rng);
    let big = Footprint::new(3).unwrap();

    let mut group = c.benchmark_group("placement/strategy");
    for strategy in [PlacementStrategy::Walk, PlacementStrategy::GuaranteedRandom] {
        group.bench_function(strategy.to_string(), |b| {
            b.iter(|| black_box(placer.try_strategy(strategy, &wall, big, &mut rng)));
        });
    }
    group.finish();
}

fn bench_grow(c: &mut Criterion) {
    let placer = placer(PlacementMode::Adjacent);
    c.bench_function("placement/grow_200", |b| {
        b.iter_batched(
            || StdRng::seed_from_u64(1),
            |mut rng| black_box(grown_wall(&placer, 200, &mut rng)),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_place, bench_fallbacks, bench_grow);
criterion_main!(benches);
