// Copyright 2026 the Tilewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tilewall Imaging Reference Backend.
//!
//! A small, stateful implementation of [`ImagingBackend`] and
//! [`ResourceBackend`] for **op recording and state tracing**.
//!
//! It does not rasterize. It exists so tests can assert on what a frame
//! asked to draw, with which paint, and under how many clip layers: the
//! drawing-call spy for renderer tests.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

use tilewall_imaging::{
    Affine, DrawOp, ImageDesc, ImageId, ImagingBackend, ImagingOp, LayerOp, PaintDesc, PaintId,
    ResourceBackend, StateOp, StrokeStyle,
};

/// Snapshot of the imaging state when an op was applied.
#[derive(Clone, Debug, Default)]
pub struct StateSnapshot {
    /// Current paint, if set.
    pub paint: Option<PaintId>,
    /// Current paint transform.
    pub paint_transform: Affine,
    /// Current stroke style, if set.
    pub stroke: Option<StrokeStyle>,
    /// Number of active layers.
    pub layer_depth: u32,
    /// The innermost layer, if any.
    pub layer_top: Option<LayerOp>,
}

/// A recorded draw together with the state it was drawn under.
#[derive(Clone, Debug)]
pub struct DrawEvent {
    /// Draw operation that was applied.
    pub op: DrawOp,
    /// Snapshot at the time of drawing.
    pub state: StateSnapshot,
}

/// Recording backend.
///
/// Stores resource descriptors in vectors indexed by their IDs, tracks the
/// current imaging state, and logs every draw with a state snapshot.
#[derive(Default, Debug)]
pub struct RefBackend {
    images: Vec<Option<ImageDesc>>,
    paints: Vec<Option<PaintDesc>>,

    ops: Vec<ImagingOp>,
    draws: Vec<DrawEvent>,
    state: StateSnapshot,
    layer_stack: Vec<LayerOp>,
    max_layer_depth: u32,
}

impl RefBackend {
    /// Returns every op applied so far.
    pub fn ops(&self) -> &[ImagingOp] {
        &self.ops
    }

    /// Returns every draw applied so far, with state snapshots.
    pub fn draws(&self) -> &[DrawEvent] {
        &self.draws
    }

    /// Returns the current layer depth; a balanced frame ends at zero.
    pub fn layer_depth(&self) -> u32 {
        self.state.layer_depth
    }

    /// Returns the deepest layer nesting observed.
    pub fn max_layer_depth(&self) -> u32 {
        self.max_layer_depth
    }

    /// Returns the descriptor of a live paint.
    pub fn paint(&self, id: PaintId) -> Option<&PaintDesc> {
        self.paints.get(id.0 as usize).and_then(Option::as_ref)
    }

    /// Returns the descriptor of a live image.
    pub fn image(&self, id: ImageId) -> Option<&ImageDesc> {
        self.images.get(id.0 as usize).and_then(Option::as_ref)
    }

    /// Clears recorded ops and draws but keeps resources.
    pub fn clear_events(&mut self) {
        self.ops.clear();
        self.draws.clear();
        self.max_layer_depth = self.state.layer_depth;
    }

    fn sync_layers(&mut self) {
        self.state.layer_depth = u32::try_from(self.layer_stack.len()).unwrap_or(u32::MAX);
        self.state.layer_top = self.layer_stack.last().cloned();
        self.max_layer_depth = self.max_layer_depth.max(self.state.layer_depth);
    }
}

fn next_id<T>(slots: &[Option<T>]) -> u32 {
    u32::try_from(slots.len()).unwrap_or(u32::MAX)
}

impl ResourceBackend for RefBackend {
    fn create_image(&mut self, desc: ImageDesc, _pixels: &[u8]) -> ImageId {
        let id = next_id(&self.images);
        self.images.push(Some(desc));
        ImageId(id)
    }

    fn destroy_image(&mut self, id: ImageId) {
        if let Some(slot) = self.images.get_mut(id.0 as usize) {
            *slot = None;
        }
    }

    fn create_paint(&mut self, desc: PaintDesc) -> PaintId {
        let id = next_id(&self.paints);
        self.paints.push(Some(desc));
        PaintId(id)
    }

    fn destroy_paint(&mut self, id: PaintId) {
        if let Some(slot) = self.paints.get_mut(id.0 as usize) {
            *slot = None;
        }
    }
}

impl ImagingBackend for RefBackend {
    fn state(&mut self, op: StateOp) {
        match &op {
            StateOp::SetPaint(id) => self.state.paint = Some(*id),
            StateOp::SetPaintTransform(xf) => self.state.paint_transform = *xf,
            StateOp::SetStroke(style) => self.state.stroke = Some(style.clone()),
            StateOp::PushLayer(layer) => {
                self.layer_stack.push(layer.clone());
                self.sync_layers();
            }
            StateOp::PopLayer => {
                self.layer_stack.pop();
                self.sync_layers();
            }
        }
        self.ops.push(ImagingOp::State(op));
    }

    fn draw(&mut self, op: DrawOp) {
        self.ops.push(ImagingOp::Draw(op.clone()));
        self.draws.push(DrawEvent {
            op,
            state: self.state.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peniko::{Brush, Color};
    use tilewall_imaging::{ImageAlphaType, ImageFormat, RectF};

    #[test]
    fn draws_capture_current_paint_and_clip() {
        let mut backend = RefBackend::default();
        let paint = backend.create_paint(PaintDesc {
            brush: Brush::Solid(Color::WHITE),
        });
        let img = backend.create_image(
            ImageDesc {
                width: 2,
                height: 1,
                format: ImageFormat::Rgba8,
                alpha_type: ImageAlphaType::Alpha,
            },
            &[0_u8; 8],
        );

        backend.state(StateOp::SetPaint(paint));
        backend.clip_to_rect(RectF::new(0.0, 0.0, 10.0, 10.0));
        backend.draw(DrawOp::DrawImageRect {
            image: img,
            dst: RectF::new(-5.0, 0.0, 15.0, 10.0),
        });
        backend.layer_pop();

        assert_eq!(backend.draws().len(), 1);
        let event = &backend.draws()[0];
        assert_eq!(event.state.paint, Some(paint));
        assert_eq!(event.state.layer_depth, 1);
        assert_eq!(backend.layer_depth(), 0);
        assert_eq!(backend.max_layer_depth(), 1);
        assert_eq!(backend.image(img).map(|d| d.width), Some(2));
    }

    #[test]
    fn destroyed_resources_are_gone() {
        let mut backend = RefBackend::default();
        let paint = backend.create_paint(PaintDesc {
            brush: Brush::Solid(Color::BLACK),
        });
        assert!(backend.paint(paint).is_some());
        backend.destroy_paint(paint);
        assert!(backend.paint(paint).is_none());
    }

    #[test]
    fn clear_events_keeps_resources() {
        let mut backend = RefBackend::default();
        let paint = backend.create_paint(PaintDesc {
            brush: Brush::Solid(Color::BLACK),
        });
        backend.state(StateOp::SetPaint(paint));
        backend.draw(DrawOp::FillRect {
            x0: 0.0,
            y0: 0.0,
            x1: 1.0,
            y1: 1.0,
        });
        backend.clear_events();
        assert!(backend.ops().is_empty());
        assert!(backend.draws().is_empty());
        assert!(backend.paint(paint).is_some());
    }
}
