// Copyright 2026 the Tilewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `tilewall_render` frame building.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Size;
use tilewall_imaging::{ImageAlphaType, ImageDesc, ImageFormat, ResourceBackend};
use tilewall_imaging_ref::RefBackend;
use tilewall_layout::{Footprint, GridCell, TileSize};
use tilewall_render::{LoadedImage, RenderStyle, Renderer, TileDraw, draw_tile};
use tilewall_view::Camera;

fn wall(base: TileSize, side: i64, image: Option<LoadedImage>) -> Vec<TileDraw<'static>> {
    let mut draws = Vec::new();
    for y in -side..side {
        for x in -side..side {
            draws.push(TileDraw {
                world: base.block_rect(GridCell::new(x, y), Footprint::ONE),
                for_sale: (x + y) % 7 == 0,
                owner: Some("alice"),
                caption: Some("A caption long enough to need truncating before it is drawn"),
                image,
            });
        }
    }
    draws
}

fn bench_render(c: &mut Criterion) {
    let base = TileSize::default();
    let mut backend = RefBackend::default();
    let renderer = Renderer::new(&mut backend, base, RenderStyle::default());
    let image = LoadedImage {
        id: backend.create_image(
            ImageDesc {
                width: 400,
                height: 400,
                format: ImageFormat::Rgba8,
                alpha_type: ImageAlphaType::Alpha,
            },
            &[],
        ),
        size: Size::new(400.0, 400.0),
    };

    let mut group = c.benchmark_group("frame/render");
    for zoom in [0.1_f64, 0.3, 1.0] {
        let mut camera = Camera::new(Size::new(1920.0, 1080.0));
        camera.set_zoom(zoom);
        let draws = wall(base, 20, Some(image));
        group.bench_with_input(BenchmarkId::new("1600_tiles", zoom), &draws, |b, draws| {
            b.iter(|| {
                backend.clear_events();
                black_box(renderer.render(&mut backend, &camera, draws.iter().copied()))
            });
        });
    }
    group.finish();
}

fn bench_draw_tile(c: &mut Criterion) {
    let base = TileSize::default();
    let mut backend = RefBackend::default();
    let renderer = Renderer::new(&mut backend, base, RenderStyle::default());
    let tile = wall(base, 1, None)[0];
    let screen = kurbo::Rect::new(100.0, 100.0, 218.0, 355.0);

    c.bench_function("frame/draw_tile/placeholder", |b| {
        b.iter(|| {
            black_box(draw_tile(
                &tile,
                screen,
                0.3,
                renderer.palette(),
                renderer.style(),
            ))
        });
    });
}

criterion_group!(benches, bench_render, bench_draw_tile);
criterion_main!(benches);
