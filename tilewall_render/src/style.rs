// Copyright 2026 the Tilewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Colors, sizes and thresholds, and the paints installed from them.

use alloc::string::String;

use kurbo::Point;
use peniko::{Brush, Color, ColorStop, Extend, Gradient, GradientKind, LinearGradientPosition};
use tilewall_imaging::{PaintDesc, PaintId, ResourceBackend};

/// Visual parameters of a frame.
///
/// Lengths suffixed `_world` are in world units and scale with the zoom;
/// the rest are screen pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderStyle {
    /// Frame background.
    pub background: Color,
    /// Grid line color.
    pub grid: Color,
    /// Grid line width.
    pub grid_width: f64,
    /// Fill behind every tile.
    pub tile_background: Color,
    /// Border of ordinary tiles.
    pub border: Color,
    /// Border of tiles that are for sale.
    pub sale_border: Color,
    /// Tile border width.
    pub border_width: f64,
    /// Fill of the placeholder shown while an image is missing.
    pub placeholder: Color,
    /// Placeholder label color.
    pub placeholder_text: Color,
    /// Owner and caption text color.
    pub overlay_text: Color,
    /// Opacity at the top edge of the owner band.
    pub owner_shade: f32,
    /// Opacity at the bottom edge of the caption band.
    pub caption_shade: f32,
    /// Overlays are drawn only above this zoom.
    pub overlay_min_zoom: f64,
    /// Placeholder labels are drawn only above this zoom.
    pub placeholder_text_min_zoom: f64,
    /// Height of the owner band.
    pub owner_band_world: f64,
    /// Height of the caption band.
    pub caption_band_world: f64,
    /// Owner label position relative to the tile's top-left corner.
    pub owner_offset_world: Point,
    /// Caption position: `x` from the left edge, `y` up from the bottom edge.
    pub caption_offset_world: Point,
    /// Owner label font size.
    pub owner_font_world: f64,
    /// Caption font size.
    pub caption_font_world: f64,
    /// Placeholder label font size.
    pub placeholder_font_world: f64,
    /// Captions are cut to this many characters.
    pub caption_limit: usize,
    /// Gap between the tile edge and the placeholder fill.
    pub placeholder_inset: f64,
    /// Placeholder label for tiles without a caption.
    pub loading_label: String,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            background: Color::from_rgb8(0x0a, 0x0a, 0x0a),
            grid: Color::from_rgb8(0x1a, 0x1a, 0x1a),
            grid_width: 1.0,
            tile_background: Color::from_rgb8(0x1a, 0x1a, 0x1a),
            border: Color::from_rgb8(0x33, 0x33, 0x33),
            sale_border: Color::from_rgb8(0xff, 0xd7, 0x00),
            border_width: 2.0,
            placeholder: Color::from_rgb8(0x2a, 0x2a, 0x2a),
            placeholder_text: Color::from_rgb8(0x66, 0x66, 0x66),
            overlay_text: Color::WHITE,
            owner_shade: 0.7,
            caption_shade: 0.8,
            overlay_min_zoom: 0.3,
            placeholder_text_min_zoom: 0.2,
            owner_band_world: 50.0,
            caption_band_world: 80.0,
            owner_offset_world: Point::new(12.0, 25.0),
            caption_offset_world: Point::new(10.0, 20.0),
            owner_font_world: 14.0,
            caption_font_world: 14.0,
            placeholder_font_world: 16.0,
            caption_limit: 50,
            placeholder_inset: 10.0,
            loading_label: String::from("Loading..."),
        }
    }
}

/// Paints created from a [`RenderStyle`].
///
/// The two shade gradients run from `(0, 0)` to `(0, 1)`; each band maps
/// them onto its rectangle with a paint transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    /// Frame background.
    pub background: PaintId,
    /// Grid lines.
    pub grid: PaintId,
    /// Tile background.
    pub tile_background: PaintId,
    /// Ordinary border.
    pub border: PaintId,
    /// For-sale border.
    pub sale_border: PaintId,
    /// Placeholder fill.
    pub placeholder: PaintId,
    /// Placeholder label.
    pub placeholder_text: PaintId,
    /// Overlay text.
    pub overlay_text: PaintId,
    /// Owner band, dark at the top.
    pub owner_shade: PaintId,
    /// Caption band, dark at the bottom.
    pub caption_shade: PaintId,
}

impl Palette {
    /// Creates every paint the renderer uses.
    pub fn install(backend: &mut dyn ResourceBackend, style: &RenderStyle) -> Self {
        let mut solid = |color: Color| {
            backend.create_paint(PaintDesc {
                brush: Brush::Solid(color),
            })
        };
        let background = solid(style.background);
        let grid = solid(style.grid);
        let tile_background = solid(style.tile_background);
        let border = solid(style.border);
        let sale_border = solid(style.sale_border);
        let placeholder = solid(style.placeholder);
        let placeholder_text = solid(style.placeholder_text);
        let overlay_text = solid(style.overlay_text);
        let owner_shade = backend.create_paint(PaintDesc {
            brush: vertical_shade(style.owner_shade, 0.0),
        });
        let caption_shade = backend.create_paint(PaintDesc {
            brush: vertical_shade(0.0, style.caption_shade),
        });
        Self {
            background,
            grid,
            tile_background,
            border,
            sale_border,
            placeholder,
            placeholder_text,
            overlay_text,
            owner_shade,
            caption_shade,
        }
    }

    /// Destroys every paint created by [`Palette::install`].
    pub fn release(self, backend: &mut dyn ResourceBackend) {
        for id in [
            self.background,
            self.grid,
            self.tile_background,
            self.border,
            self.sale_border,
            self.placeholder,
            self.placeholder_text,
            self.overlay_text,
            self.owner_shade,
            self.caption_shade,
        ] {
            backend.destroy_paint(id);
        }
    }
}

fn vertical_shade(top_alpha: f32, bottom_alpha: f32) -> Brush {
    let stops = [
        ColorStop::from((0.0, Color::BLACK.with_alpha(top_alpha))),
        ColorStop::from((1.0, Color::BLACK.with_alpha(bottom_alpha))),
    ];
    Brush::Gradient(Gradient {
        kind: GradientKind::Linear(LinearGradientPosition::new((0.0, 0.0), (0.0, 1.0))),
        extend: Extend::Pad,
        stops: stops.as_slice().into(),
        ..Gradient::default()
    })
}
