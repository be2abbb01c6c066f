// Copyright 2026 the Tilewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG export backend for the Tilewall imaging IR.
//!
//! [`SvgBackend`] records imaging ops and exports them as an SVG document,
//! which makes a rendered frame easy to inspect without a GPU or a window.
//!
//! This is a debugging aid, not a faithful rasterizer:
//! - Solid colors and linear gradients are supported; other brushes fall back to black.
//! - Images are drawn as labelled placeholders (no embedded pixels).
//! - Text uses the viewer's default sans-serif font.

#![no_std]

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write as _;

use peniko::{Brush, Color, GradientKind};
use tilewall_imaging::{
    Affine, DrawOp, FontWeight, ImageDesc, ImageId, ImagingBackend, ImagingOp, PaintDesc,
    PaintId, RectF, ResourceBackend, StateOp, StrokeStyle, TextAlign, TextRun,
};

#[derive(Clone, Debug, Default)]
struct SvgState {
    paint: Option<PaintId>,
    paint_transform: Affine,
    stroke: Option<StrokeStyle>,
}

/// A recording SVG backend.
#[derive(Default, Debug)]
pub struct SvgBackend {
    images: Vec<Option<ImageDesc>>,
    paints: Vec<Option<PaintDesc>>,
    ops: Vec<ImagingOp>,
}

impl SvgBackend {
    /// Clears the recorded ops while retaining resources.
    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// Returns the recorded imaging ops.
    pub fn ops(&self) -> &[ImagingOp] {
        &self.ops
    }

    /// Export the currently recorded ops as an SVG document.
    ///
    /// `width`/`height` are used both as the SVG `width`/`height` attributes
    /// and to set `viewBox="0 0 width height"`.
    pub fn to_svg(&self, width: u32, height: u32) -> String {
        let mut writer = DocumentWriter::new(self);
        for op in &self.ops {
            writer.apply(op);
        }
        writer.finish(width, height)
    }
}

impl ResourceBackend for SvgBackend {
    fn create_image(&mut self, desc: ImageDesc, _pixels: &[u8]) -> ImageId {
        let id = u32::try_from(self.images.len()).unwrap_or(u32::MAX);
        self.images.push(Some(desc));
        ImageId(id)
    }

    fn destroy_image(&mut self, id: ImageId) {
        if let Some(slot) = self.images.get_mut(id.0 as usize) {
            *slot = None;
        }
    }

    fn create_paint(&mut self, desc: PaintDesc) -> PaintId {
        let id = u32::try_from(self.paints.len()).unwrap_or(u32::MAX);
        self.paints.push(Some(desc));
        PaintId(id)
    }

    fn destroy_paint(&mut self, id: PaintId) {
        if let Some(slot) = self.paints.get_mut(id.0 as usize) {
            *slot = None;
        }
    }
}

impl ImagingBackend for SvgBackend {
    fn state(&mut self, op: StateOp) {
        self.ops.push(ImagingOp::State(op));
    }

    fn draw(&mut self, op: DrawOp) {
        self.ops.push(ImagingOp::Draw(op));
    }
}

struct DocumentWriter<'a> {
    backend: &'a SvgBackend,
    defs: String,
    body: String,
    state: SvgState,
    open_layers: usize,
    clip_counter: u64,
    gradient_counter: u64,
}

impl<'a> DocumentWriter<'a> {
    fn new(backend: &'a SvgBackend) -> Self {
        Self {
            backend,
            defs: String::new(),
            body: String::new(),
            state: SvgState::default(),
            open_layers: 0,
            clip_counter: 0,
            gradient_counter: 0,
        }
    }

    fn apply(&mut self, op: &ImagingOp) {
        match op {
            ImagingOp::State(state_op) => self.apply_state(state_op),
            ImagingOp::Draw(draw_op) => self.apply_draw(draw_op),
        }
    }

    fn apply_state(&mut self, op: &StateOp) {
        match op {
            StateOp::SetPaint(id) => self.state.paint = Some(*id),
            StateOp::SetPaintTransform(xf) => self.state.paint_transform = *xf,
            StateOp::SetStroke(style) => self.state.stroke = Some(style.clone()),
            StateOp::PushLayer(layer) => {
                self.clip_counter += 1;
                let id = format!("clip{}", self.clip_counter);
                let _ = write!(
                    self.defs,
                    "<clipPath id=\"{id}\" clipPathUnits=\"userSpaceOnUse\">"
                );
                write_rect(&mut self.defs, layer.clip, "");
                self.defs.push_str("</clipPath>");
                let _ = write!(self.body, "<g clip-path=\"url(#{id})\">");
                self.open_layers += 1;
            }
            StateOp::PopLayer => {
                // Unbalanced pops are ignored rather than corrupting the document.
                if self.open_layers > 0 {
                    self.open_layers -= 1;
                    self.body.push_str("</g>");
                }
            }
        }
    }

    fn apply_draw(&mut self, op: &DrawOp) {
        match op {
            DrawOp::FillRect { x0, y0, x1, y1 } => {
                let style = self.paint_style(PaintKind::Fill);
                write_rect(&mut self.body, RectF::new(*x0, *y0, *x1, *y1), &style);
            }
            DrawOp::StrokeRect { x0, y0, x1, y1 } => {
                let style = self.paint_style(PaintKind::Stroke);
                write_rect(&mut self.body, RectF::new(*x0, *y0, *x1, *y1), &style);
            }
            DrawOp::StrokeLine { x0, y0, x1, y1 } => {
                let style = self.paint_style(PaintKind::Stroke);
                let _ = write!(
                    self.body,
                    "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"{style}/>",
                    fmt_f32(*x0),
                    fmt_f32(*y0),
                    fmt_f32(*x1),
                    fmt_f32(*y1),
                );
            }
            DrawOp::DrawImageRect { image, dst } => {
                if let Some(Some(_desc)) = self.backend.images.get(image.0 as usize) {
                    write_rect(
                        &mut self.body,
                        *dst,
                        " fill=\"#ff00ff\" fill-opacity=\"0.25\" stroke=\"#ff00ff\" stroke-width=\"1\"",
                    );
                    let _ = write!(
                        self.body,
                        "<text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"#ff00ff\">image#{}</text>",
                        fmt_f32(dst.x0 + 4.0),
                        fmt_f32(dst.y0 + 14.0),
                        image.0
                    );
                }
            }
            DrawOp::FillText(run) => {
                let style = self.paint_style(PaintKind::Fill);
                write_text(&mut self.body, run, &style);
            }
        }
    }

    fn paint_style(&mut self, kind: PaintKind) -> String {
        let mut out = String::new();
        let mut paint_attr = String::from("#000000");
        let mut opacity = 1.0_f32;

        if let Some(paint_id) = self.state.paint
            && let Some(Some(desc)) = self.backend.paints.get(paint_id.0 as usize)
        {
            match &desc.brush {
                Brush::Solid(color) => {
                    let (rgb, a) = color_to_svg(*color);
                    paint_attr = rgb;
                    opacity = a;
                }
                Brush::Gradient(gradient) => {
                    if let GradientKind::Linear(pos) = gradient.kind {
                        self.gradient_counter += 1;
                        let id = format!("grad{}", self.gradient_counter);
                        let _ = write!(
                            self.defs,
                            "<linearGradient id=\"{id}\" gradientUnits=\"userSpaceOnUse\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"",
                            fmt_f64(pos.start.x),
                            fmt_f64(pos.start.y),
                            fmt_f64(pos.end.x),
                            fmt_f64(pos.end.y),
                        );
                        if self.state.paint_transform != Affine::IDENTITY {
                            let _ = write!(
                                self.defs,
                                " gradientTransform=\"{}\"",
                                affine_to_svg_matrix(self.state.paint_transform)
                            );
                        }
                        self.defs.push('>');
                        for stop in gradient.stops.as_slice() {
                            let color = stop.color.to_alpha_color::<peniko::color::Srgb>();
                            let (rgb, a) = color_to_svg(color);
                            let _ = write!(
                                self.defs,
                                "<stop offset=\"{}\" stop-color=\"{rgb}\" stop-opacity=\"{}\"/>",
                                fmt_f32(stop.offset.clamp(0.0, 1.0)),
                                fmt_f32(a),
                            );
                        }
                        self.defs.push_str("</linearGradient>");
                        paint_attr = format!("url(#{id})");
                    }
                }
                _ => {}
            }
        }

        match kind {
            PaintKind::Fill => {
                let _ = write!(out, " fill=\"{paint_attr}\" stroke=\"none\"");
                if opacity < 1.0 {
                    let _ = write!(out, " fill-opacity=\"{}\"", fmt_f32(opacity));
                }
            }
            PaintKind::Stroke => {
                let _ = write!(out, " fill=\"none\" stroke=\"{paint_attr}\"");
                if opacity < 1.0 {
                    let _ = write!(out, " stroke-opacity=\"{}\"", fmt_f32(opacity));
                }
                if let Some(stroke) = self.state.stroke.as_ref() {
                    let _ = write!(out, " stroke-width=\"{}\"", fmt_f64(stroke.width));
                }
            }
        }
        out
    }

    fn finish(mut self, width: u32, height: u32) -> String {
        while self.open_layers > 0 {
            self.open_layers -= 1;
            self.body.push_str("</g>");
        }
        let mut svg = String::new();
        let _ = writeln!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">"
        );
        if !self.defs.is_empty() {
            svg.push_str("<defs>");
            svg.push_str(&self.defs);
            svg.push_str("</defs>");
        }
        svg.push_str(&self.body);
        svg.push_str("</svg>");
        svg
    }
}

#[derive(Copy, Clone)]
enum PaintKind {
    Fill,
    Stroke,
}

fn write_rect(out: &mut String, rect: RectF, style: &str) {
    let _ = write!(
        out,
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"{style}/>",
        fmt_f32(rect.x0),
        fmt_f32(rect.y0),
        fmt_f32(rect.width()),
        fmt_f32(rect.height()),
    );
}

fn write_text(out: &mut String, run: &TextRun, style: &str) {
    let anchor = match run.align {
        TextAlign::Start => "start",
        TextAlign::Center => "middle",
    };
    let weight = match run.weight {
        FontWeight::Normal => "",
        FontWeight::Bold => " font-weight=\"bold\"",
    };
    let _ = write!(
        out,
        "<text x=\"{}\" y=\"{}\" font-family=\"sans-serif\" font-size=\"{}\" text-anchor=\"{anchor}\"{weight}{style}>",
        fmt_f32(run.x),
        fmt_f32(run.y),
        fmt_f32(run.size),
    );
    escape_into(out, &run.text);
    out.push_str("</text>");
}

fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

fn color_to_svg(color: Color) -> (String, f32) {
    let rgba = color.to_rgba8();
    let a = f32::from(rgba.a) / 255.0;
    (format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b), a)
}

fn affine_to_svg_matrix(xf: Affine) -> String {
    let c = xf.as_coeffs();
    format!(
        "matrix({} {} {} {} {} {})",
        fmt_f64(c[0]),
        fmt_f64(c[1]),
        fmt_f64(c[2]),
        fmt_f64(c[3]),
        fmt_f64(c[4]),
        fmt_f64(c[5]),
    )
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "SVG uses f32-like scalar formatting"
)]
fn fmt_f64(v: f64) -> String {
    fmt_f32(v as f32)
}

fn fmt_f32(v: f32) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    let mut s = format!("{v:.3}");
    while s.contains('.') && s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    if s == "-0" {
        s = String::from("0");
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::sync::Arc;
    use peniko::{ColorStop, Gradient, LinearGradientPosition};
    use tilewall_imaging::{ImageAlphaType, ImageFormat};

    #[test]
    fn exports_basic_svg() {
        let mut backend = SvgBackend::default();
        let paint = backend.create_paint(PaintDesc {
            brush: Brush::Solid(Color::from_rgba8(255, 0, 0, 255)),
        });
        backend.state(StateOp::SetPaint(paint));
        backend.draw(DrawOp::FillRect {
            x0: 10.0,
            y0: 20.0,
            x1: 30.0,
            y1: 40.0,
        });
        let svg = backend.to_svg(100, 80);
        assert!(svg.contains("<svg"));
        assert!(svg.contains("<rect x=\"10\" y=\"20\" width=\"20\" height=\"20\""));
        assert!(svg.contains("fill=\"#ff0000\""));
    }

    #[test]
    fn exports_clip_groups_and_escaped_text() {
        let mut backend = SvgBackend::default();
        let paint = backend.create_paint(PaintDesc {
            brush: Brush::Solid(Color::WHITE),
        });
        backend.clip_to_rect(RectF::new(0.0, 0.0, 50.0, 50.0));
        backend.state(StateOp::SetPaint(paint));
        backend.draw(DrawOp::FillText(TextRun {
            text: Arc::from("a < b & c"),
            x: 25.0,
            y: 25.0,
            size: 12.5,
            weight: FontWeight::Bold,
            align: TextAlign::Center,
        }));
        backend.layer_pop();

        let svg = backend.to_svg(50, 50);
        assert!(svg.contains("<clipPath id=\"clip1\""));
        assert!(svg.contains("<g clip-path=\"url(#clip1)\">"));
        assert!(svg.contains("a &lt; b &amp; c"));
        assert!(svg.contains("text-anchor=\"middle\""));
        assert!(svg.contains("font-weight=\"bold\""));
        assert!(svg.contains("font-size=\"12.5\""));
    }

    #[test]
    fn exports_linear_gradient_with_paint_transform() {
        let mut backend = SvgBackend::default();
        let stops = [
            ColorStop::from((0.0, Color::from_rgba8(0, 0, 0, 255))),
            ColorStop::from((1.0, Color::from_rgba8(0, 0, 0, 0))),
        ];
        let brush = Brush::Gradient(Gradient {
            kind: GradientKind::Linear(LinearGradientPosition::new((0.0, 0.0), (0.0, 1.0))),
            stops: stops.as_slice().into(),
            ..Gradient::default()
        });
        let paint = backend.create_paint(PaintDesc { brush });
        backend.state(StateOp::SetPaint(paint));
        backend.state(StateOp::SetPaintTransform(Affine::new([
            1.0, 0.0, 0.0, 50.0, 10.0, 20.0,
        ])));
        backend.draw(DrawOp::FillRect {
            x0: 10.0,
            y0: 20.0,
            x1: 110.0,
            y1: 70.0,
        });

        let svg = backend.to_svg(200, 100);
        assert!(svg.contains("<linearGradient id=\"grad1\""));
        assert!(svg.contains("gradientTransform=\"matrix(1 0 0 50 10 20)\""));
        assert!(svg.contains("fill=\"url(#grad1)\""));
        assert!(svg.contains("stop-opacity=\"0\""));
    }

    #[test]
    fn images_become_placeholders() {
        let mut backend = SvgBackend::default();
        let image = backend.create_image(
            ImageDesc {
                width: 4,
                height: 4,
                format: ImageFormat::Rgba8,
                alpha_type: ImageAlphaType::Alpha,
            },
            &[],
        );
        backend.draw(DrawOp::DrawImageRect {
            image,
            dst: RectF::new(0.0, 0.0, 40.0, 40.0),
        });
        let svg = backend.to_svg(40, 40);
        assert!(svg.contains("image#0"));
    }

    #[test]
    fn unbalanced_layers_are_closed() {
        let mut backend = SvgBackend::default();
        backend.clip_to_rect(RectF::new(0.0, 0.0, 1.0, 1.0));
        backend.layer_pop();
        backend.layer_pop();
        backend.clip_to_rect(RectF::new(0.0, 0.0, 1.0, 1.0));
        let svg = backend.to_svg(1, 1);
        assert_eq!(svg.matches("<g").count(), svg.matches("</g>").count());
    }
}
