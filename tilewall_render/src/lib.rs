// Copyright 2026 the Tilewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tilewall Render: draws the tile canvas through a [`Camera`] into any
//! imaging backend.
//!
//! A frame is built in three layers:
//!
//! 1. the background, filling the viewport;
//! 2. the reference grid ([`grid_lines`]), one line per tile pitch;
//! 3. every tile whose screen rectangle touches the viewport, lowered by the
//!    pure [`draw_tile`] function.
//!
//! Tiles that fall outside the viewport are culled before any of their ops
//! are produced. Loaded images are drawn with [`cover_fit`] inside a clip;
//! tiles without an image get a placeholder. Owner and caption overlays
//! appear only above [`RenderStyle::overlay_min_zoom`].
//!
//! The renderer keeps no per-frame state: [`Renderer`] only holds the style
//! and the paints installed from it.
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod grid;
mod style;
mod tile;

use tilewall_imaging::{DrawOp, ImagingBackend, ResourceBackend, StateOp, StrokeStyle};
use tilewall_layout::TileSize;
use tilewall_view::Camera;

pub use grid::{GridLines, grid_lines};
pub use style::{Palette, RenderStyle};
pub use tile::{LoadedImage, TileDraw, cover_fit, draw_tile, is_visible};

use crate::tile::to_f32;

/// Counters describing one rendered frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Tiles drawn.
    pub visible: usize,
    /// Tiles skipped because they were off screen.
    pub culled: usize,
    /// Vertical grid lines drawn.
    pub vertical_lines: usize,
    /// Horizontal grid lines drawn.
    pub horizontal_lines: usize,
}

/// Draws frames with a fixed style and tile pitch.
#[derive(Clone, Debug)]
pub struct Renderer {
    base: TileSize,
    style: RenderStyle,
    palette: Palette,
}

impl Renderer {
    /// Creates a renderer, installing its paints on `backend`.
    pub fn new(backend: &mut dyn ResourceBackend, base: TileSize, style: RenderStyle) -> Self {
        let palette = Palette::install(backend, &style);
        Self {
            base,
            style,
            palette,
        }
    }

    /// Base tile dimensions used for the grid.
    #[must_use]
    pub fn base(&self) -> TileSize {
        self.base
    }

    /// The style frames are drawn with.
    #[must_use]
    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    /// Paints installed on the backend.
    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Destroys the installed paints.
    pub fn release(self, backend: &mut dyn ResourceBackend) {
        self.palette.release(backend);
    }

    /// Draws one frame.
    ///
    /// The viewport size comes from `camera`.
    pub fn render<'a, I>(
        &self,
        backend: &mut dyn ImagingBackend,
        camera: &Camera,
        tiles: I,
    ) -> FrameStats
    where
        I: IntoIterator<Item = TileDraw<'a>>,
    {
        let viewport = camera.viewport_size();
        let (w, h) = (to_f32(viewport.width), to_f32(viewport.height));
        let mut stats = FrameStats::default();

        backend.state(StateOp::SetPaint(self.palette.background));
        backend.draw(DrawOp::FillRect {
            x0: 0.0,
            y0: 0.0,
            x1: w,
            y1: h,
        });

        let lines = grid_lines(camera, self.base);
        backend.state(StateOp::SetPaint(self.palette.grid));
        backend.state(StateOp::SetStroke(StrokeStyle::new(self.style.grid_width)));
        for &x in &lines.vertical {
            let x = to_f32(x);
            backend.draw(DrawOp::StrokeLine {
                x0: x,
                y0: 0.0,
                x1: x,
                y1: h,
            });
        }
        for &y in &lines.horizontal {
            let y = to_f32(y);
            backend.draw(DrawOp::StrokeLine {
                x0: 0.0,
                y0: y,
                x1: w,
                y1: y,
            });
        }
        stats.vertical_lines = lines.vertical.len();
        stats.horizontal_lines = lines.horizontal.len();

        let zoom = camera.zoom();
        for tile in tiles {
            let screen = camera.world_to_screen_rect(tile.world);
            if !is_visible(screen, viewport) {
                stats.culled += 1;
                continue;
            }
            backend.replay(&draw_tile(&tile, screen, zoom, &self.palette, &self.style));
            stats.visible += 1;
        }

        log::trace!("frame at {:?} zoom {zoom:.3}: {stats:?}", camera.center());
        stats
    }
}
