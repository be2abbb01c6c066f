// Copyright 2026 the Tilewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tilewall Input: gesture state that turns raw pointer, touch, and wheel
//! events into camera commands.
//!
//! The modules are small state machines, each handling one interaction:
//!
//! - [`drag`]: single-pointer panning with incremental deltas
//! - [`pinch`]: two-finger zoom factors
//!
//! [`GestureTracker`] combines them with wheel handling and yields
//! [`CameraCommand`]s. It knows nothing about the camera itself; the host
//! applies the commands (see `tilewall::Canvas`).
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use tilewall_input::{CameraCommand, GestureTracker};
//!
//! let mut gestures = GestureTracker::default();
//! gestures.pointer_down(Point::new(100.0, 100.0));
//! assert_eq!(
//!     gestures.pointer_move(Point::new(110.0, 95.0)),
//!     Some(CameraCommand::Pan(Vec2::new(10.0, -5.0)))
//! );
//! gestures.pointer_up();
//!
//! // Scrolling up zooms in around the cursor.
//! match gestures.wheel(-120.0, Point::new(400.0, 300.0)) {
//!     Some(CameraCommand::Zoom { factor, .. }) => assert!(factor > 1.0),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```
//!
//! This crate is `no_std`.

#![no_std]

pub mod drag;
pub mod pinch;

use kurbo::{Point, Vec2};

use crate::drag::PanDrag;
use crate::pinch::PinchState;

/// Zoom step applied per wheel notch: `e^0.1`.
pub const DEFAULT_WHEEL_STEP: f64 = 1.105_170_918_075_647_7;

/// A camera mutation requested by a gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CameraCommand {
    /// Pan by a screen-space delta.
    Pan(Vec2),
    /// Multiply the zoom by `factor` around a screen-space anchor.
    Zoom {
        /// Multiplicative zoom factor.
        factor: f64,
        /// Screen-space point that should stay fixed.
        anchor: Point,
    },
}

/// Wheel-to-zoom mapping.
///
/// Every wheel event is one notch regardless of its magnitude: scrolling up
/// (negative `delta_y`) multiplies the zoom by `step`, scrolling down divides
/// by it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelZoom {
    step: f64,
}

impl Default for WheelZoom {
    fn default() -> Self {
        Self {
            step: DEFAULT_WHEEL_STEP,
        }
    }
}

impl WheelZoom {
    /// Creates a mapping with a custom per-notch step.
    ///
    /// Steps that are not finite or not greater than one fall back to
    /// [`DEFAULT_WHEEL_STEP`].
    pub fn new(step: f64) -> Self {
        if step.is_finite() && step > 1.0 {
            Self { step }
        } else {
            Self::default()
        }
    }

    /// Returns the zoom factor for a wheel event, or `None` for a zero delta.
    pub fn factor(&self, delta_y: f64) -> Option<f64> {
        if delta_y < 0.0 {
            Some(self.step)
        } else if delta_y > 0.0 {
            Some(1.0 / self.step)
        } else {
            None
        }
    }
}

/// Combined pointer, touch, and wheel gesture state.
#[derive(Clone, Copy, Debug, Default)]
pub struct GestureTracker {
    drag: PanDrag,
    pinch: PinchState,
    wheel: WheelZoom,
}

impl GestureTracker {
    /// Creates a tracker with a custom wheel mapping.
    pub fn with_wheel(wheel: WheelZoom) -> Self {
        Self {
            wheel,
            ..Self::default()
        }
    }

    /// Pointer pressed: start panning.
    pub fn pointer_down(&mut self, pos: Point) {
        self.drag.begin(pos);
    }

    /// Pointer moved: pan if a drag is active.
    pub fn pointer_move(&mut self, pos: Point) -> Option<CameraCommand> {
        self.drag.update(pos).map(CameraCommand::Pan)
    }

    /// Pointer released or left the surface.
    pub fn pointer_up(&mut self) {
        self.drag.end();
    }

    /// Wheel scrolled over `pos`.
    pub fn wheel(&mut self, delta_y: f64, pos: Point) -> Option<CameraCommand> {
        self.wheel
            .factor(delta_y)
            .map(|factor| CameraCommand::Zoom {
                factor,
                anchor: pos,
            })
    }

    /// Touches started; `touches` holds every active touch position.
    ///
    /// One touch starts a pan, two touches start a pinch.
    pub fn touch_start(&mut self, touches: &[Point]) {
        match touches {
            [only] => {
                self.pinch.end();
                self.drag.begin(*only);
            }
            [a, b, ..] => {
                self.drag.end();
                self.pinch.begin(*a, *b);
            }
            [] => {}
        }
    }

    /// Touches moved; pinches zoom around `viewport_center`.
    pub fn touch_move(&mut self, touches: &[Point], viewport_center: Point) -> Option<CameraCommand> {
        match touches {
            [only] => self.drag.update(*only).map(CameraCommand::Pan),
            [a, b, ..] => self.pinch.update(*a, *b).map(|factor| CameraCommand::Zoom {
                factor,
                anchor: viewport_center,
            }),
            [] => None,
        }
    }

    /// Touches ended; `remaining` holds the touches still down.
    pub fn touch_end(&mut self, remaining: &[Point]) {
        self.drag.end();
        self.pinch.end();
        // Lifting one finger of a pinch continues as a pan without a jump.
        if let [only] = remaining {
            self.drag.begin(*only);
        }
    }

    /// Returns `true` while a pan or pinch is in progress.
    pub fn is_interacting(&self) -> bool {
        self.drag.is_active() || self.pinch.is_active()
    }
}
