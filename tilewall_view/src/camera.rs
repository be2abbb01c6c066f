// Copyright 2026 the Tilewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Zoom factor used by [`Camera::new`].
pub const DEFAULT_ZOOM: f64 = 0.3;
/// Lower zoom limit used by [`Camera::new`].
pub const DEFAULT_MIN_ZOOM: f64 = 0.1;
/// Upper zoom limit used by [`Camera::new`].
pub const DEFAULT_MAX_ZOOM: f64 = 1.0;

/// Result of a [`Camera::zoom_at`] request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomOutcome {
    /// The zoom changed and the anchor point was preserved.
    Applied,
    /// The requested zoom would leave the configured limits; nothing changed.
    OutOfRange,
    /// The factor was not a finite positive number, or produced no change.
    Ignored,
}

impl ZoomOutcome {
    /// Returns `true` if the camera changed.
    #[must_use]
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Pan/zoom camera over the tile world.
///
/// `Camera` tracks the viewport size in screen pixels, a world-space offset
/// and a uniform zoom factor. The zoom factor always stays inside
/// `[min_zoom, max_zoom]`: setters clamp, while [`Camera::zoom_at`] refuses
/// any step that would leave the range.
#[derive(Clone, Debug)]
pub struct Camera {
    viewport: Size,
    offset: Vec2,
    zoom: f64,
    min_zoom: f64,
    max_zoom: f64,
    world_to_screen: Affine,
    screen_to_world: Affine,
}

impl Camera {
    /// Creates a camera for a viewport of the given size.
    ///
    /// - Initial offset is zero (world origin at the viewport center).
    /// - Initial zoom is [`DEFAULT_ZOOM`].
    /// - Zoom is limited to `[DEFAULT_MIN_ZOOM, DEFAULT_MAX_ZOOM]`.
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        let mut camera = Self {
            viewport,
            offset: Vec2::ZERO,
            zoom: DEFAULT_ZOOM,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            world_to_screen: Affine::IDENTITY,
            screen_to_world: Affine::IDENTITY,
        };
        camera.rebuild_transforms();
        camera
    }

    /// Returns the viewport size in screen pixels.
    #[must_use]
    pub fn viewport_size(&self) -> Size {
        self.viewport
    }

    /// Sets the viewport size, for example after a window resize.
    ///
    /// Offset and zoom are kept; only the visible region changes.
    pub fn set_viewport_size(&mut self, size: Size) {
        if self.viewport == size || !size.is_finite() {
            return;
        }
        self.viewport = size;
        self.rebuild_transforms();
    }

    /// Returns the world-space offset `(x, y)` of the camera.
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Returns the world point currently shown at the viewport center.
    #[must_use]
    pub fn center(&self) -> Point {
        (-self.offset).to_point()
    }

    /// Returns the current zoom factor.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Returns the `(min, max)` zoom limits.
    #[must_use]
    pub fn zoom_limits(&self) -> (f64, f64) {
        (self.min_zoom, self.max_zoom)
    }

    /// Sets the minimum and maximum zoom factors.
    ///
    /// The provided range is normalized so that `min_zoom <= max_zoom`. The
    /// current zoom is clamped into the new range.
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        if !(min_zoom > 0.0 && max_zoom > 0.0 && min_zoom.is_finite() && max_zoom.is_finite()) {
            return;
        }
        let (min_zoom, max_zoom) = if min_zoom <= max_zoom {
            (min_zoom, max_zoom)
        } else {
            (max_zoom, min_zoom)
        };
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.set_zoom(self.zoom);
    }

    /// Sets the zoom factor, clamping it into the configured zoom range.
    ///
    /// Non-finite values are ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if !zoom.is_finite() {
            return;
        }
        let clamped = zoom.clamp(self.min_zoom, self.max_zoom);
        if (self.zoom - clamped).abs() < f64::EPSILON {
            return;
        }
        self.zoom = clamped;
        self.rebuild_transforms();
    }

    /// Pans by a delta in screen pixels.
    ///
    /// The world offset moves by `delta / zoom`, so a drag of `n` pixels
    /// moves the content by exactly `n` pixels at any zoom level.
    pub fn pan_by_screen(&mut self, delta: Vec2) {
        if delta == Vec2::ZERO || !delta.is_finite() {
            return;
        }
        self.offset += delta / self.zoom;
        self.rebuild_transforms();
    }

    /// Multiplies the zoom by `factor` around a screen-space anchor.
    ///
    /// The world point under `anchor` before the call is under `anchor`
    /// after it. If the resulting zoom would fall outside the zoom limits
    /// the camera is left untouched and [`ZoomOutcome::OutOfRange`] is
    /// returned.
    pub fn zoom_at(&mut self, factor: f64, anchor: Point) -> ZoomOutcome {
        if !(factor.is_finite() && factor > 0.0) || !anchor.is_finite() {
            return ZoomOutcome::Ignored;
        }
        let new_zoom = self.zoom * factor;
        if new_zoom < self.min_zoom || new_zoom > self.max_zoom {
            return ZoomOutcome::OutOfRange;
        }
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return ZoomOutcome::Ignored;
        }

        let world_at_anchor = self.screen_to_world(anchor);
        self.zoom = new_zoom;
        let from_center = anchor.to_vec2() - self.half_viewport();
        self.offset = from_center / new_zoom - world_at_anchor.to_vec2();
        self.rebuild_transforms();
        ZoomOutcome::Applied
    }

    /// Centers the view on a world point, optionally setting the zoom.
    ///
    /// A provided zoom is clamped into the zoom limits.
    pub fn center_on(&mut self, world: Point, zoom: Option<f64>) {
        if world.is_finite() {
            self.offset = -world.to_vec2();
        }
        if let Some(zoom) = zoom.filter(|z| z.is_finite()) {
            self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        }
        self.rebuild_transforms();
    }

    /// Converts a world-space point into screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self, pt: Point) -> Point {
        self.world_to_screen * pt
    }

    /// Converts a screen-space point into world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, pt: Point) -> Point {
        self.screen_to_world * pt
    }

    /// Converts a world-space rectangle into screen coordinates.
    #[must_use]
    pub fn world_to_screen_rect(&self, rect: Rect) -> Rect {
        // The transform is a translate + uniform positive scale, so mapping
        // the two corners is enough.
        Rect::from_points(
            self.world_to_screen * rect.origin(),
            self.world_to_screen * Point::new(rect.x1, rect.y1),
        )
    }

    /// Returns the world-space rectangle covered by the viewport.
    #[must_use]
    pub fn visible_world_rect(&self) -> Rect {
        Rect::from_points(
            self.screen_to_world * Point::ORIGIN,
            self.screen_to_world * Point::new(self.viewport.width, self.viewport.height),
        )
    }

    /// Returns the viewport as a screen-space rectangle anchored at the origin.
    #[must_use]
    pub fn screen_rect(&self) -> Rect {
        self.viewport.to_rect()
    }

    /// Returns the world-to-screen transform.
    #[must_use]
    pub fn world_to_screen_transform(&self) -> Affine {
        self.world_to_screen
    }

    /// Snapshot of the current camera state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> CameraDebugInfo {
        CameraDebugInfo {
            viewport: self.viewport,
            offset: self.offset,
            zoom: self.zoom,
            min_zoom: self.min_zoom,
            max_zoom: self.max_zoom,
            visible_world_rect: self.visible_world_rect(),
        }
    }

    fn half_viewport(&self) -> Vec2 {
        Vec2::new(self.viewport.width * 0.5, self.viewport.height * 0.5)
    }

    fn rebuild_transforms(&mut self) {
        // World → screen: shift by the camera offset, scale, then move the
        // origin to the viewport center.
        self.world_to_screen = Affine::translate(self.half_viewport())
            * Affine::scale(self.zoom)
            * Affine::translate(self.offset);
        self.screen_to_world = self.world_to_screen.inverse();
    }
}

/// Debug snapshot of a [`Camera`] state.
#[derive(Clone, Copy, Debug)]
pub struct CameraDebugInfo {
    /// Viewport size in screen pixels.
    pub viewport: Size,
    /// World-space offset.
    pub offset: Vec2,
    /// Current zoom factor.
    pub zoom: f64,
    /// Minimum zoom factor.
    pub min_zoom: f64,
    /// Maximum zoom factor.
    pub max_zoom: f64,
    /// World-space rectangle currently visible.
    pub visible_world_rect: Rect,
}
