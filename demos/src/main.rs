// Copyright 2026 the Tilewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless Tilewall demo.
//!
//! Loads the four seed posts, grows the wall with randomly sized tiles,
//! pretends to be the host that fetches images, and writes one frame as
//! SVG.
//!
//! Examples:
//!   `cargo run -p tilewall_demo -- --tiles 30 --seed 7 --out wall.svg`
//!   `cargo run -p tilewall_demo -- --config canvas.json --broken-images`

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use kurbo::Size;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tilewall::tilewall_render::LoadedImage;
use tilewall::{Canvas, CanvasConfig, ImageRef, Tile, TileRequest};
use tilewall_imaging::{ImageAlphaType, ImageDesc, ImageFormat, ResourceBackend};
use tilewall_imaging_svg::SvgBackend;

const SEED_POSTS: &str = r#"[
    { "id": 1, "image_url": "https://picsum.photos/id/1011/400/400",
      "caption": "Sunrise over the mountains", "x_position": 0, "y_position": 0,
      "size": 1, "is_paid": false, "current_owner": "alice" },
    { "id": 2, "image_url": "https://picsum.photos/id/1025/400/400",
      "caption": "Playful puppy", "x_position": 393, "y_position": 0,
      "size": 1, "is_paid": true, "current_owner": "pepe" },
    { "id": 3, "image_url": "https://picsum.photos/id/1042/400/400",
      "caption": "City skyline at dusk", "x_position": 0, "y_position": 852,
      "size": 1, "is_paid": false, "current_owner": "carol" },
    { "id": 4, "image_url": "https://picsum.photos/id/1056/400/400",
      "caption": "Forest trail", "x_position": 393, "y_position": 852,
      "size": 1, "is_paid": false, "current_owner": "dave" }
]"#;

const OWNERS: &[&str] = &["alice", "bob", "carol", "dave", "erin", "pepe"];

#[derive(Debug, Parser)]
#[command(about = "Grow a tile wall and render one frame to SVG")]
struct Args {
    /// JSON file with canvas settings; missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of tiles to add after the seed posts.
    #[arg(long, default_value_t = 24)]
    tiles: u32,
    /// Largest footprint of the added tiles, in cells.
    #[arg(long, default_value_t = 2)]
    max_footprint: u32,
    /// Seed for placement and tile contents.
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Viewport width in pixels.
    #[arg(long, default_value_t = 1280)]
    width: u32,
    /// Viewport height in pixels.
    #[arg(long, default_value_t = 800)]
    height: u32,
    /// Zoom for the rendered frame; defaults to the start zoom.
    #[arg(long)]
    zoom: Option<f64>,
    /// Report every image load as failed so tiles show placeholders.
    #[arg(long)]
    broken_images: bool,
    /// Output file.
    #[arg(long, default_value = "tilewall.svg")]
    out: PathBuf,
}

fn load_config(path: Option<&PathBuf>) -> Result<CanvasConfig> {
    let Some(path) = path else {
        return Ok(CanvasConfig::default());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Plays the host side of the image protocol with synthetic images.
fn serve_images(canvas: &mut Canvas, backend: &mut SvgBackend, broken: bool) {
    for key in canvas.take_image_requests() {
        if broken {
            canvas.image_failed(&key);
            continue;
        }
        let desc = ImageDesc {
            width: 400,
            height: 400,
            format: ImageFormat::Rgba8,
            alpha_type: ImageAlphaType::Alpha,
        };
        let id = backend.create_image(desc, &[]);
        let evicted = canvas.image_loaded(
            &key,
            LoadedImage {
                id,
                size: Size::new(400.0, 400.0),
            },
        );
        for image in evicted {
            backend.destroy_image(image.id);
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = load_config(args.config.as_ref())?;
    let viewport = Size::new(f64::from(args.width), f64::from(args.height));
    let mut backend = SvgBackend::default();
    let mut canvas = Canvas::with_rng(
        config,
        viewport,
        &mut backend,
        StdRng::seed_from_u64(args.seed),
    )?;

    let seed_tiles: Vec<Tile> = serde_json::from_str(SEED_POSTS).context("parsing seed posts")?;
    let report = canvas.set_tiles(seed_tiles);
    for rejected in &report.rejected {
        log::warn!("seed post rejected: {rejected}");
    }

    let mut contents = StdRng::seed_from_u64(args.seed.wrapping_add(1));
    let max_footprint = args
        .max_footprint
        .clamp(1, canvas.config().placement.max_footprint);
    for n in 0..args.tiles {
        let footprint = contents.gen_range(1..=max_footprint);
        let owner = OWNERS[contents.gen_range(0..OWNERS.len())];
        let for_sale = contents.gen_bool(0.2);
        let tile = canvas.create_tile(TileRequest {
            image: Some(ImageRef::new(format!(
                "https://picsum.photos/seed/{}/400/400",
                args.seed.wrapping_mul(1000) + u64::from(n)
            ))),
            caption: format!("Post {} by {owner}", n + 5),
            owner: Some(owner.to_owned()),
            footprint,
            for_sale,
            price: if for_sale { 0.5 } else { 0.0 },
        })?;
        log::debug!("tile {} at ({}, {})", tile.id, tile.x, tile.y);
    }

    canvas.reset_view();
    if let Some(zoom) = args.zoom {
        let center = canvas.camera().center();
        canvas.center_on(center, Some(zoom));
    }
    // One frame to discover visible images, a second to draw them.
    canvas.render(&mut backend);
    serve_images(&mut canvas, &mut backend, args.broken_images);
    backend.clear_ops();
    let stats = canvas.render(&mut backend);
    log::info!(
        "rendered {} tiles ({} culled), {}x{} grid lines",
        stats.visible,
        stats.culled,
        stats.vertical_lines,
        stats.horizontal_lines
    );

    fs::write(&args.out, backend.to_svg(args.width, args.height))
        .with_context(|| format!("writing {}", args.out.display()))?;
    log::info!("wrote {}", args.out.display());
    Ok(())
}
