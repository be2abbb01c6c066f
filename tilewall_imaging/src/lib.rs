// Copyright 2026 the Tilewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tilewall Imaging: backend-agnostic draw-command IR and backend traits.
//!
//! This crate defines the small, plain-old-data draw command set that the
//! Tilewall renderer emits, and the traits a drawing surface implements to
//! consume it. Layout math (where a tile, its image, and its overlays go)
//! lives in `tilewall_render`; pixels are a backend's business.
//!
//! # Core concepts
//!
//! - **Resources**: opaque handles ([`PaintId`], [`ImageId`]) whose lifetimes
//!   are managed via [`ResourceBackend`].
//! - **Operations**: [`StateOp`] (mutate state) and [`DrawOp`] (produce
//!   pixels), combined into [`ImagingOp`] so sequences can be built as plain
//!   data and replayed later.
//! - **Backends**: [`ImagingBackend`] accepts operations. Helpers such as
//!   [`ImagingBackend::replay`] and [`record_ops`] move between the
//!   immediate and recorded forms.
//!
//! Gradients are ordinary paints. A paint is defined once in a unit space
//! and positioned per draw with [`StateOp::SetPaintTransform`], so a
//! recorded sequence never needs to create resources.
//!
//! # Example
//!
//! ```
//! use tilewall_imaging::{DrawOp, ImagingOp, PaintId, StateOp, record_ops};
//!
//! let border = PaintId(0);
//! let ops = record_ops(|rec| {
//!     rec.state(StateOp::SetPaint(border))
//!         .draw(DrawOp::StrokeRect { x0: 0.0, y0: 0.0, x1: 10.0, y1: 20.0 });
//! });
//! assert_eq!(ops.len(), 2);
//! assert!(matches!(ops[1], ImagingOp::Draw(DrawOp::StrokeRect { .. })));
//! ```

#![no_std]

extern crate alloc;

use alloc::sync::Arc;
use alloc::vec::Vec;

pub use peniko::{Brush, Color, ImageAlphaType, ImageFormat};

/// Identifier for an image resource.
///
/// Images are created once (when their pixels arrive) and reused by every
/// frame until explicitly destroyed.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageId(pub u32);

/// Identifier for a paint resource.
///
/// Paints are shared by every draw that uses the same brush.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PaintId(pub u32);

/// Affine transform type used by the IR.
pub type Affine = kurbo::Affine;

/// Stroke style used by [`StateOp::SetStroke`].
///
/// This is a re-export of [`kurbo::Stroke`].
pub type StrokeStyle = kurbo::Stroke;

/// A simple axis-aligned rectangle in f32 coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RectF {
    /// Minimum X coordinate.
    pub x0: f32,
    /// Minimum Y coordinate.
    pub y0: f32,
    /// Maximum X coordinate.
    pub x1: f32,
    /// Maximum Y coordinate.
    pub y1: f32,
}

impl RectF {
    /// Create a new rectangle from min/max corners.
    #[inline]
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Convert from kurbo's rectangle type, narrowing to f32.
    #[inline]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "screen-space coordinates comfortably fit in f32"
    )]
    pub fn from_kurbo(rect: kurbo::Rect) -> Self {
        Self::new(
            rect.x0 as f32,
            rect.y0 as f32,
            rect.x1 as f32,
            rect.y1 as f32,
        )
    }

    /// Width of the rectangle.
    #[inline]
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the rectangle.
    #[inline]
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// Parameters for a pushed layer.
///
/// Layers are the only scoping mechanism: the clip applies to every draw
/// until the matching [`StateOp::PopLayer`].
#[derive(Clone, Debug, PartialEq)]
pub struct LayerOp {
    /// Rectangular clip in screen coordinates.
    pub clip: RectF,
}

impl LayerOp {
    /// A layer that clips to `rect`.
    #[inline]
    pub fn clip(rect: RectF) -> Self {
        Self { clip: rect }
    }
}

/// Font weight requested for a text run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontWeight {
    /// Regular weight.
    #[default]
    Normal,
    /// Bold weight.
    Bold,
}

/// Horizontal placement of a text run relative to its anchor.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAlign {
    /// The anchor is the start of the text.
    #[default]
    Start,
    /// The anchor is the horizontal center of the text.
    Center,
}

/// A single line of text drawn with the current paint.
///
/// `x`/`y` locate the alphabetic baseline anchor in screen coordinates.
/// Shaping, font fallback, and rasterization are left to the backend.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    /// Text to draw.
    pub text: Arc<str>,
    /// Anchor X coordinate.
    pub x: f32,
    /// Baseline Y coordinate.
    pub y: f32,
    /// Font size in pixels.
    pub size: f32,
    /// Font weight.
    pub weight: FontWeight,
    /// Alignment relative to `x`.
    pub align: TextAlign,
}

/// State operations that mutate the current imaging state.
#[derive(Clone, Debug, PartialEq)]
pub enum StateOp {
    /// Set the current paint resource.
    SetPaint(PaintId),
    /// Set the transform used when sampling the paint (e.g. gradients).
    ///
    /// Geometry is unaffected. Backends start from [`Affine::IDENTITY`].
    SetPaintTransform(Affine),
    /// Set the current stroke style.
    SetStroke(StrokeStyle),
    /// Push a new layer. Every push must be matched by a [`StateOp::PopLayer`].
    PushLayer(LayerOp),
    /// Pop the most recently pushed layer.
    PopLayer,
}

/// Draw operations that produce pixels given the current state.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Fill an axis-aligned rectangle with the current paint.
    FillRect {
        /// Minimum X coordinate.
        x0: f32,
        /// Minimum Y coordinate.
        y0: f32,
        /// Maximum X coordinate.
        x1: f32,
        /// Maximum Y coordinate.
        y1: f32,
    },
    /// Stroke an axis-aligned rectangle with the current stroke and paint.
    StrokeRect {
        /// Minimum X coordinate.
        x0: f32,
        /// Minimum Y coordinate.
        y0: f32,
        /// Maximum X coordinate.
        x1: f32,
        /// Maximum Y coordinate.
        y1: f32,
    },
    /// Stroke a straight line segment with the current stroke and paint.
    StrokeLine {
        /// Start X coordinate.
        x0: f32,
        /// Start Y coordinate.
        y0: f32,
        /// End X coordinate.
        x1: f32,
        /// End Y coordinate.
        y1: f32,
    },
    /// Draw a whole image scaled into a destination rectangle.
    ///
    /// The destination may extend past the visible area; callers that want
    /// cropping push a clip layer first.
    DrawImageRect {
        /// Image resource to draw.
        image: ImageId,
        /// Destination rectangle.
        dst: RectF,
    },
    /// Fill a line of text with the current paint.
    FillText(TextRun),
}

/// Unified imaging operation used for recorded sequences.
#[derive(Clone, Debug, PartialEq)]
pub enum ImagingOp {
    /// State-changing operation.
    State(StateOp),
    /// Drawing operation.
    Draw(DrawOp),
}

impl ImagingOp {
    /// Returns the draw operation, if this is one.
    pub fn as_draw(&self) -> Option<&DrawOp> {
        match self {
            Self::Draw(op) => Some(op),
            Self::State(_) => None,
        }
    }
}

/// Description of an image resource.
#[derive(Clone, Debug)]
pub struct ImageDesc {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Pixel format of the image buffer.
    pub format: ImageFormat,
    /// Alpha encoding of the pixels (straight vs premultiplied).
    pub alpha_type: ImageAlphaType,
}

/// Description of a paint resource.
#[derive(Clone, Debug)]
pub struct PaintDesc {
    /// Brush used when rendering (solid color or gradient).
    pub brush: Brush,
}

/// Resource lifetime interface.
///
/// IDs must remain valid and refer to the same logical resource until the
/// corresponding `destroy_*` function is called.
pub trait ResourceBackend {
    /// Create an image resource from raw pixels.
    ///
    /// The `pixels` slice holds tightly packed, row-major image data in the
    /// format named by `desc`. Backends that do not rasterize may ignore it.
    fn create_image(&mut self, desc: ImageDesc, pixels: &[u8]) -> ImageId;
    /// Destroy a previously created image.
    fn destroy_image(&mut self, id: ImageId);

    /// Create a paint resource.
    fn create_paint(&mut self, desc: PaintDesc) -> PaintId;
    /// Destroy a previously created paint.
    fn destroy_paint(&mut self, id: PaintId);
}

/// Imaging backend trait.
///
/// Usable as `&mut dyn ImagingBackend`; all provided methods are
/// object-safe.
pub trait ImagingBackend: ResourceBackend {
    /// Apply a state operation.
    fn state(&mut self, op: StateOp);

    /// Apply a draw operation.
    fn draw(&mut self, op: DrawOp);

    /// Apply a recorded sequence in order.
    fn replay(&mut self, ops: &[ImagingOp]) {
        for op in ops {
            match op {
                ImagingOp::State(s) => self.state(s.clone()),
                ImagingOp::Draw(d) => self.draw(d.clone()),
            }
        }
    }

    /// Push a rectangular clip layer.
    ///
    /// The clip scope ends when you call [`ImagingBackend::layer_pop`].
    #[inline]
    fn clip_to_rect(&mut self, rect: RectF) {
        self.state(StateOp::PushLayer(LayerOp::clip(rect)));
    }

    /// Pop the most recently pushed layer.
    #[inline]
    fn layer_pop(&mut self) {
        self.state(StateOp::PopLayer);
    }
}

/// Build a sequence of operations as data.
///
/// `OpRecorder` has no resources of its own; it only collects operations
/// that reference resources created elsewhere.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OpRecorder {
    ops: Vec<ImagingOp>,
}

impl OpRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a state operation.
    pub fn state(&mut self, op: StateOp) -> &mut Self {
        self.ops.push(ImagingOp::State(op));
        self
    }

    /// Append a draw operation.
    pub fn draw(&mut self, op: DrawOp) -> &mut Self {
        self.ops.push(ImagingOp::Draw(op));
        self
    }

    /// Returns the recorded operations.
    pub fn ops(&self) -> &[ImagingOp] {
        &self.ops
    }

    /// Consumes the recorder and returns the operations.
    pub fn finish(self) -> Vec<ImagingOp> {
        self.ops
    }
}

/// Record the operations produced by `f` into a vector.
pub fn record_ops<F>(f: F) -> Vec<ImagingOp>
where
    F: FnOnce(&mut OpRecorder),
{
    let mut recorder = OpRecorder::new();
    f(&mut recorder);
    recorder.finish()
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use alloc::vec;
    use peniko::Color;

    #[derive(Default)]
    struct CountingBackend {
        next_paint: u32,
        next_image: u32,
        ops: Vec<ImagingOp>,
    }

    impl ResourceBackend for CountingBackend {
        fn create_image(&mut self, _desc: ImageDesc, _pixels: &[u8]) -> ImageId {
            let id = self.next_image;
            self.next_image += 1;
            ImageId(id)
        }

        fn destroy_image(&mut self, _id: ImageId) {}

        fn create_paint(&mut self, _desc: PaintDesc) -> PaintId {
            let id = self.next_paint;
            self.next_paint += 1;
            PaintId(id)
        }

        fn destroy_paint(&mut self, _id: PaintId) {}
    }

    impl ImagingBackend for CountingBackend {
        fn state(&mut self, op: StateOp) {
            self.ops.push(ImagingOp::State(op));
        }

        fn draw(&mut self, op: DrawOp) {
            self.ops.push(ImagingOp::Draw(op));
        }
    }

    #[test]
    fn recorded_ops_replay_in_order() {
        let mut backend = CountingBackend::default();
        let paint = backend.create_paint(PaintDesc {
            brush: Brush::Solid(Color::WHITE),
        });

        let ops = record_ops(|r| {
            r.state(StateOp::SetPaint(paint)).draw(DrawOp::FillRect {
                x0: 0.0,
                y0: 0.0,
                x1: 4.0,
                y1: 4.0,
            });
        });
        assert_eq!(ops.len(), 2);

        backend.replay(&ops);
        assert_eq!(backend.ops, ops);
    }

    #[test]
    fn clip_helpers_push_and_pop() {
        let mut backend = CountingBackend::default();
        let dyn_backend: &mut dyn ImagingBackend = &mut backend;
        dyn_backend.clip_to_rect(RectF::new(1.0, 2.0, 3.0, 4.0));
        dyn_backend.layer_pop();

        assert_eq!(
            backend.ops,
            vec![
                ImagingOp::State(StateOp::PushLayer(LayerOp::clip(RectF::new(
                    1.0, 2.0, 3.0, 4.0
                )))),
                ImagingOp::State(StateOp::PopLayer),
            ]
        );
    }

    #[test]
    fn rect_conversions() {
        let r = RectF::from_kurbo(kurbo::Rect::new(0.5, 1.0, 10.5, 21.0));
        assert_eq!(r.width(), 10.0);
        assert_eq!(r.height(), 20.0);
        assert_eq!(r, RectF::new(0.5, 1.0, 10.5, 21.0));
    }

    #[test]
    fn as_draw_filters_state_ops() {
        let op = ImagingOp::State(StateOp::PopLayer);
        assert!(op.as_draw().is_none());
        let draw = ImagingOp::Draw(DrawOp::StrokeLine {
            x0: 0.0,
            y0: 0.0,
            x1: 1.0,
            y1: 1.0,
        });
        assert!(matches!(draw.as_draw(), Some(DrawOp::StrokeLine { .. })));
    }
}
