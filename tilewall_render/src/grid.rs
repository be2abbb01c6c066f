// Copyright 2026 the Tilewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `floor` and `ceil`
use kurbo::Point;
use tilewall_layout::TileSize;
use tilewall_view::Camera;

/// Screen positions of the reference grid lines.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GridLines {
    /// `x` of every vertical line, left to right.
    pub vertical: Vec<f64>,
    /// `y` of every horizontal line, top to bottom.
    pub horizontal: Vec<f64>,
}

/// Computes the grid lines visible through `camera`.
///
/// Vertical lines sit at multiples of the tile width and horizontal lines at
/// multiples of the tile height. Only lines inside the visible world bounds
/// are produced, so the count per axis never exceeds
/// `extent / (pitch * zoom) + 2`.
#[must_use]
pub fn grid_lines(camera: &Camera, base: TileSize) -> GridLines {
    if !base.is_valid() {
        return GridLines::default();
    }
    let bounds = camera.visible_world_rect();
    let vertical = multiples_within(bounds.x0, bounds.x1, base.width)
        .map(|x| camera.world_to_screen(Point::new(x, 0.0)).x)
        .collect();
    let horizontal = multiples_within(bounds.y0, bounds.y1, base.height)
        .map(|y| camera.world_to_screen(Point::new(0.0, y)).y)
        .collect();
    GridLines {
        vertical,
        horizontal,
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "grid indices of a finite viewport are small integers"
)]
fn multiples_within(min: f64, max: f64, pitch: f64) -> impl Iterator<Item = f64> {
    let (first, last) = if min.is_finite() && max.is_finite() {
        ((min / pitch).ceil() as i64, (max / pitch).floor() as i64)
    } else {
        (1, 0)
    };
    (first..=last).map(move |k| k as f64 * pitch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;

    #[test]
    fn lines_follow_each_axis_pitch() {
        let mut camera = Camera::new(Size::new(800.0, 600.0));
        camera.set_zoom(1.0);
        let lines = grid_lines(&camera, TileSize::new(100.0, 200.0));
        // World x spans [-400, 400], y spans [-300, 300].
        assert_eq!(lines.vertical.len(), 9);
        assert_eq!(lines.horizontal.len(), 3);
        assert_eq!(lines.vertical[0], 0.0);
        assert_eq!(lines.horizontal, [100.0, 300.0, 500.0]);
    }

    #[test]
    fn count_is_bounded_at_every_zoom() {
        let base = TileSize::default();
        let mut camera = Camera::new(Size::new(1280.0, 720.0));
        camera.pan_by_screen(kurbo::Vec2::new(37.0, -91.0));
        for zoom in [0.1, 0.13, 0.3, 0.55, 0.8, 1.0] {
            camera.set_zoom(zoom);
            let lines = grid_lines(&camera, base);
            let max_v = 1280.0 / (base.width * zoom) + 2.0;
            let max_h = 720.0 / (base.height * zoom) + 2.0;
            assert!(lines.vertical.len() as f64 <= max_v);
            assert!(lines.horizontal.len() as f64 <= max_h);
            assert!(lines.vertical.iter().all(|x| (0.0..=1280.0).contains(x)));
        }
    }

    #[test]
    fn invalid_pitch_draws_nothing() {
        let camera = Camera::new(Size::new(100.0, 100.0));
        assert_eq!(grid_lines(&camera, TileSize::new(0.0, 10.0)), GridLines::default());
    }
}
