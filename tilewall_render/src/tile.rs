// Copyright 2026 the Tilewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-tile drawing: a pure mapping from a tile and its screen rectangle to
//! imaging ops.

use alloc::sync::Arc;
use alloc::vec::Vec;

use kurbo::{Affine, Rect, Size, Stroke};
use tilewall_imaging::{
    DrawOp, FontWeight, ImageId, ImagingOp, LayerOp, OpRecorder, PaintId, RectF, StateOp,
    TextAlign, TextRun,
};

use crate::style::{Palette, RenderStyle};

/// A decoded image ready to draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoadedImage {
    /// Backend handle.
    pub id: ImageId,
    /// Intrinsic size in pixels.
    pub size: Size,
}

/// Everything the renderer needs to know about one tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileDraw<'a> {
    /// World-space bounds.
    pub world: Rect,
    /// Draws the sale border when set.
    pub for_sale: bool,
    /// Owner label for the top band.
    pub owner: Option<&'a str>,
    /// Caption for the bottom band and the placeholder.
    pub caption: Option<&'a str>,
    /// The tile's image, once loaded.
    pub image: Option<LoadedImage>,
}

/// Returns `true` if `screen` touches the viewport `[0, w] × [0, h]`.
#[must_use]
pub fn is_visible(screen: Rect, viewport: Size) -> bool {
    !(screen.x1 < 0.0
        || screen.x0 > viewport.width
        || screen.y1 < 0.0
        || screen.y0 > viewport.height)
}

/// Scales `image` to cover `dst` completely, keeping its aspect ratio.
///
/// The result is centered on `dst` and overflows it along one axis; callers
/// clip to `dst`. Returns `None` if either size is degenerate.
#[must_use]
pub fn cover_fit(image: Size, dst: Rect) -> Option<Rect> {
    let (w, h) = (dst.width(), dst.height());
    if !(image.width > 0.0 && image.height > 0.0 && w > 0.0 && h > 0.0) {
        return None;
    }
    let image_aspect = image.width / image.height;
    let (draw_w, draw_h) = if image_aspect > w / h {
        (h * image_aspect, h)
    } else {
        (w, w / image_aspect)
    };
    let x0 = dst.x0 + (w - draw_w) / 2.0;
    let y0 = dst.y0 + (h - draw_h) / 2.0;
    Some(Rect::new(x0, y0, x0 + draw_w, y0 + draw_h))
}

/// Emits the ops for one visible tile.
///
/// `screen` is the tile's screen rectangle and `zoom` the camera zoom. The
/// result depends on nothing else, so it can be cached or replayed on any
/// backend.
#[must_use]
pub fn draw_tile(
    tile: &TileDraw<'_>,
    screen: Rect,
    zoom: f64,
    palette: &Palette,
    style: &RenderStyle,
) -> Vec<ImagingOp> {
    let mut rec = OpRecorder::new();
    let frame = RectF::from_kurbo(screen);

    rec.state(StateOp::SetPaint(palette.tile_background))
        .draw(fill(frame));
    rec.state(StateOp::SetStroke(Stroke::new(style.border_width)))
        .state(StateOp::SetPaint(if tile.for_sale {
            palette.sale_border
        } else {
            palette.border
        }))
        .draw(DrawOp::StrokeRect {
            x0: frame.x0,
            y0: frame.y0,
            x1: frame.x1,
            y1: frame.y1,
        });

    let fitted = tile
        .image
        .and_then(|image| cover_fit(image.size, screen).map(|dst| (image.id, dst)));
    match fitted {
        Some((image, dst)) => {
            rec.state(StateOp::PushLayer(LayerOp::clip(frame)))
                .draw(DrawOp::DrawImageRect {
                    image,
                    dst: RectF::from_kurbo(dst),
                })
                .state(StateOp::PopLayer);
            if zoom > style.overlay_min_zoom {
                draw_overlays(&mut rec, tile, screen, zoom, palette, style);
            }
        }
        None => draw_placeholder(&mut rec, tile, screen, zoom, palette, style),
    }
    rec.finish()
}

fn draw_overlays(
    rec: &mut OpRecorder,
    tile: &TileDraw<'_>,
    screen: Rect,
    zoom: f64,
    palette: &Palette,
    style: &RenderStyle,
) {
    if let Some(owner) = tile.owner.filter(|s| !s.is_empty()) {
        let band = Rect::new(
            screen.x0,
            screen.y0,
            screen.x1,
            screen.y0 + style.owner_band_world * zoom,
        );
        shade(rec, palette.owner_shade, band);
        rec.state(StateOp::SetPaint(palette.overlay_text))
            .draw(DrawOp::FillText(TextRun {
                text: Arc::from(owner),
                x: to_f32(screen.x0 + style.owner_offset_world.x * zoom),
                y: to_f32(screen.y0 + style.owner_offset_world.y * zoom),
                size: to_f32(style.owner_font_world * zoom),
                weight: FontWeight::Bold,
                align: TextAlign::Start,
            }));
    }

    if let Some(caption) = tile.caption.filter(|s| !s.is_empty()) {
        let band = Rect::new(
            screen.x0,
            screen.y1 - style.caption_band_world * zoom,
            screen.x1,
            screen.y1,
        );
        shade(rec, palette.caption_shade, band);
        rec.state(StateOp::SetPaint(palette.overlay_text))
            .draw(DrawOp::FillText(TextRun {
                text: truncate_chars(caption, style.caption_limit),
                x: to_f32(screen.x0 + style.caption_offset_world.x * zoom),
                y: to_f32(screen.y1 - style.caption_offset_world.y * zoom),
                size: to_f32(style.caption_font_world * zoom),
                weight: FontWeight::Normal,
                align: TextAlign::Start,
            }));
    }
}

fn draw_placeholder(
    rec: &mut OpRecorder,
    tile: &TileDraw<'_>,
    screen: Rect,
    zoom: f64,
    palette: &Palette,
    style: &RenderStyle,
) {
    let inset = style.placeholder_inset;
    let inner = Rect::new(
        screen.x0 + inset,
        screen.y0 + inset,
        screen.x1 - inset,
        screen.y1 - inset,
    );
    if inner.width() > 0.0 && inner.height() > 0.0 {
        rec.state(StateOp::SetPaint(palette.placeholder))
            .draw(fill(RectF::from_kurbo(inner)));
    }
    if zoom > style.placeholder_text_min_zoom {
        let label = match tile.caption.filter(|s| !s.is_empty()) {
            Some(caption) => Arc::from(caption),
            None => Arc::from(style.loading_label.as_str()),
        };
        let center = screen.center();
        rec.state(StateOp::SetPaint(palette.placeholder_text))
            .draw(DrawOp::FillText(TextRun {
                text: label,
                x: to_f32(center.x),
                y: to_f32(center.y),
                size: to_f32(style.placeholder_font_world * zoom),
                weight: FontWeight::Normal,
                align: TextAlign::Center,
            }));
    }
}

/// Fills `band` with a unit-space vertical gradient stretched over it.
fn shade(rec: &mut OpRecorder, paint: PaintId, band: Rect) {
    rec.state(StateOp::SetPaint(paint))
        .state(StateOp::SetPaintTransform(Affine::new([
            1.0,
            0.0,
            0.0,
            band.height(),
            band.x0,
            band.y0,
        ])))
        .draw(fill(RectF::from_kurbo(band)))
        .state(StateOp::SetPaintTransform(Affine::IDENTITY));
}

fn fill(r: RectF) -> DrawOp {
    DrawOp::FillRect {
        x0: r.x0,
        y0: r.y0,
        x1: r.x1,
        y1: r.y1,
    }
}

fn truncate_chars(text: &str, limit: usize) -> Arc<str> {
    match text.char_indices().nth(limit) {
        Some((end, _)) => Arc::from(&text[..end]),
        None => Arc::from(text),
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "imaging IR uses f32 screen coordinates"
)]
pub(crate) fn to_f32(v: f64) -> f32 {
    v as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilewall_imaging::{ImageId, PaintDesc, PaintId, ResourceBackend};

    struct Paints(u32);

    impl ResourceBackend for Paints {
        fn create_image(&mut self, _: tilewall_imaging::ImageDesc, _: &[u8]) -> ImageId {
            ImageId(0)
        }
        fn destroy_image(&mut self, _: ImageId) {}
        fn create_paint(&mut self, _: PaintDesc) -> PaintId {
            self.0 += 1;
            PaintId(self.0)
        }
        fn destroy_paint(&mut self, _: PaintId) {}
    }

    fn palette() -> Palette {
        Palette::install(&mut Paints(0), &RenderStyle::default())
    }

    fn texts(ops: &[ImagingOp]) -> Vec<&TextRun> {
        ops.iter()
            .filter_map(|op| match op.as_draw() {
                Some(DrawOp::FillText(run)) => Some(run),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn cover_fit_crops_wide_images_horizontally() {
        let dst = Rect::new(0.0, 0.0, 100.0, 200.0);
        let fitted = cover_fit(Size::new(400.0, 200.0), dst).unwrap();
        assert_eq!(fitted.height(), 200.0);
        assert_eq!(fitted.width(), 400.0);
        assert_eq!(fitted.x0, -150.0);
        assert_eq!(fitted.y0, 0.0);
    }

    #[test]
    fn cover_fit_crops_tall_images_vertically() {
        let dst = Rect::new(10.0, 10.0, 110.0, 110.0);
        let fitted = cover_fit(Size::new(50.0, 100.0), dst).unwrap();
        assert_eq!(fitted.width(), 100.0);
        assert_eq!(fitted.height(), 200.0);
        assert_eq!(fitted.y0, -40.0);
        assert_eq!(fitted.x0, dst.x0);
    }

    #[test]
    fn cover_fit_rejects_degenerate_images() {
        let dst = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(cover_fit(Size::new(0.0, 10.0), dst), None);
        assert_eq!(cover_fit(Size::new(10.0, 10.0), Rect::ZERO), None);
    }

    #[test]
    fn captions_are_cut_by_characters() {
        let long: alloc::string::String = core::iter::repeat('é').take(60).collect();
        assert_eq!(truncate_chars(&long, 50).chars().count(), 50);
        assert_eq!(&*truncate_chars("short", 50), "short");
    }

    #[test]
    fn overlays_need_zoom_above_threshold() {
        let palette = palette();
        let style = RenderStyle::default();
        let tile = TileDraw {
            world: Rect::new(0.0, 0.0, 393.0, 852.0),
            for_sale: false,
            owner: Some("alice"),
            caption: Some("sunset"),
            image: Some(LoadedImage {
                id: ImageId(3),
                size: Size::new(640.0, 480.0),
            }),
        };
        let screen = Rect::new(0.0, 0.0, 117.9, 255.6);
        assert!(texts(&draw_tile(&tile, screen, 0.3, &palette, &style)).is_empty());

        let screen = Rect::new(0.0, 0.0, 196.5, 426.0);
        let ops = draw_tile(&tile, screen, 0.5, &palette, &style);
        let runs = texts(&ops);
        assert_eq!(runs.len(), 2);
        assert_eq!(&*runs[0].text, "alice");
        assert_eq!(runs[0].weight, FontWeight::Bold);
        assert_eq!(runs[0].size, 7.0);
        assert_eq!(&*runs[1].text, "sunset");
        assert_eq!(runs[1].y, 416.0);
    }

    #[test]
    fn missing_owner_skips_owner_band() {
        let palette = palette();
        let style = RenderStyle::default();
        let tile = TileDraw {
            world: Rect::new(0.0, 0.0, 393.0, 852.0),
            for_sale: true,
            owner: None,
            caption: Some("x"),
            image: Some(LoadedImage {
                id: ImageId(0),
                size: Size::new(1.0, 1.0),
            }),
        };
        let ops = draw_tile(&tile, Rect::new(0.0, 0.0, 393.0, 852.0), 1.0, &palette, &style);
        let uses_owner_shade = ops
            .iter()
            .any(|op| matches!(op, ImagingOp::State(StateOp::SetPaint(p)) if *p == palette.owner_shade));
        assert!(!uses_owner_shade);
        let uses_sale_border = ops
            .iter()
            .any(|op| matches!(op, ImagingOp::State(StateOp::SetPaint(p)) if *p == palette.sale_border));
        assert!(uses_sale_border);
    }

    #[test]
    fn placeholder_label_depends_on_zoom() {
        let palette = palette();
        let style = RenderStyle::default();
        let tile = TileDraw {
            world: Rect::new(0.0, 0.0, 393.0, 852.0),
            for_sale: false,
            owner: None,
            caption: None,
            image: None,
        };
        let screen = Rect::new(0.0, 0.0, 98.25, 213.0);
        let runs_ops = draw_tile(&tile, screen, 0.25, &palette, &style);
        let runs = texts(&runs_ops);
        assert_eq!(runs.len(), 1);
        assert_eq!(&*runs[0].text, "Loading...");
        assert_eq!(runs[0].align, TextAlign::Center);

        let quiet = draw_tile(&tile, screen, 0.15, &palette, &style);
        assert!(texts(&quiet).is_empty());
        assert!(
            !quiet
                .iter()
                .any(|op| matches!(op.as_draw(), Some(DrawOp::DrawImageRect { .. })))
        );
    }
}
