// Copyright 2026 the Tilewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-finger pinch tracking: turn the changing distance between two touches
//! into a zoom factor.

use kurbo::Point;

/// Tracks the finger distance of an in-progress pinch.
#[derive(Debug, Clone, Default, Copy)]
pub struct PinchState {
    distance: Option<f64>,
}

impl PinchState {
    /// Starts a pinch with the two touch positions.
    pub fn begin(&mut self, a: Point, b: Point) {
        let d = a.distance(b);
        self.distance = (d > 0.0 && d.is_finite()).then_some(d);
    }

    /// Returns `new_distance / previous_distance` and remembers the new distance.
    ///
    /// Returns `None` if no pinch is active or if the fingers coincide.
    pub fn update(&mut self, a: Point, b: Point) -> Option<f64> {
        let previous = self.distance?;
        let d = a.distance(b);
        if !(d > 0.0 && d.is_finite()) {
            return None;
        }
        self.distance = Some(d);
        Some(d / previous)
    }

    /// Ends the pinch.
    pub fn end(&mut self) {
        self.distance = None;
    }

    /// Returns `true` while a pinch is active.
    pub fn is_active(&self) -> bool {
        self.distance.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spreading_fingers_zooms_in() {
        let mut pinch = PinchState::default();
        pinch.begin(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let factor = pinch.update(Point::new(0.0, 0.0), Point::new(150.0, 0.0));
        assert_eq!(factor, Some(1.5));

        // Factor is relative to the last update, not the start.
        let factor = pinch.update(Point::new(0.0, 0.0), Point::new(75.0, 0.0));
        assert_eq!(factor, Some(0.5));
    }

    #[test]
    fn coincident_fingers_are_ignored() {
        let mut pinch = PinchState::default();
        pinch.begin(Point::new(5.0, 5.0), Point::new(5.0, 5.0));
        assert!(!pinch.is_active());

        pinch.begin(Point::new(0.0, 0.0), Point::new(0.0, 10.0));
        assert_eq!(pinch.update(Point::new(1.0, 1.0), Point::new(1.0, 1.0)), None);
        assert!(pinch.is_active());
    }

    #[test]
    fn end_clears_state() {
        let mut pinch = PinchState::default();
        pinch.begin(Point::new(0.0, 0.0), Point::new(3.0, 4.0));
        pinch.end();
        assert_eq!(pinch.update(Point::new(0.0, 0.0), Point::new(6.0, 8.0)), None);
    }
}
