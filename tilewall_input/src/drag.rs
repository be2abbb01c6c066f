// Copyright 2026 the Tilewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-pointer pan tracking: turn successive pointer positions into
//! screen-space deltas.
//!
//! ## Usage
//!
//! 1) Call [`PanDrag::begin`] when the pointer (or the only touch) goes down.
//! 2) On each move, call [`PanDrag::update`] to get the delta since the last position.
//! 3) Call [`PanDrag::end`] on release or when the pointer leaves the surface.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use tilewall_input::drag::PanDrag;
//!
//! let mut drag = PanDrag::default();
//! drag.begin(Point::new(10.0, 20.0));
//! assert_eq!(drag.update(Point::new(15.0, 25.0)), Some(Vec2::new(5.0, 5.0)));
//! assert_eq!(drag.update(Point::new(14.0, 25.0)), Some(Vec2::new(-1.0, 0.0)));
//! drag.end();
//! assert_eq!(drag.update(Point::new(0.0, 0.0)), None);
//! ```

use kurbo::{Point, Vec2};

/// Tracks an in-progress pan drag.
#[derive(Debug, Clone, Default, Copy)]
pub struct PanDrag {
    last_pos: Option<Point>,
    travelled: Vec2,
}

impl PanDrag {
    /// Starts a drag at `pos`, discarding any previous drag.
    pub fn begin(&mut self, pos: Point) {
        self.last_pos = Some(pos);
        self.travelled = Vec2::ZERO;
    }

    /// Records a new pointer position and returns the delta since the last one.
    ///
    /// Returns `None` when no drag is active.
    pub fn update(&mut self, pos: Point) -> Option<Vec2> {
        let last = self.last_pos?;
        let delta = pos - last;
        self.last_pos = Some(pos);
        self.travelled += delta;
        Some(delta)
    }

    /// Ends the drag.
    pub fn end(&mut self) {
        self.last_pos = None;
    }

    /// Returns `true` while a drag is active.
    pub fn is_active(&self) -> bool {
        self.last_pos.is_some()
    }

    /// Total screen-space movement of the current (or last) drag.
    pub fn travelled(&self) -> Vec2 {
        self.travelled
    }
}
