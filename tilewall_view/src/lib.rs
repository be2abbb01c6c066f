// Copyright 2026 the Tilewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tilewall View: the camera over an unbounded tile canvas.
//!
//! This crate provides a small, headless model of the camera through which
//! the tile world is observed. It focuses on:
//! - Camera state (pan offset + zoom) with enforced zoom limits.
//! - Coordinate conversion between world space and screen (pixel) space.
//! - Zooming around a screen anchor so the world point under the cursor
//!   stays put.
//! - Visible-region bounds for culling and grid drawing.
//!
//! It does **not** own tiles or a rendering backend. Input events are turned
//! into pan/zoom calls by `tilewall_input` or by the host directly.
//!
//! ## Coordinate model
//!
//! The camera stores the world-space offset `(x, y)` and a zoom factor. A
//! world point maps to the screen as
//!
//! ```text
//! screen = (world + offset) * zoom + viewport / 2
//! ```
//!
//! so `offset = -p` puts world point `p` at the center of the viewport.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use tilewall_view::Camera;
//!
//! let mut camera = Camera::new(Size::new(800.0, 600.0));
//! assert_eq!(camera.world_to_screen(Point::ORIGIN), Point::new(400.0, 300.0));
//!
//! // Zoom in around the cursor; the world point under it does not move.
//! let cursor = Point::new(120.0, 80.0);
//! let before = camera.screen_to_world(cursor);
//! camera.zoom_at(1.1, cursor);
//! let after = camera.screen_to_world(cursor);
//! assert!((before - after).hypot() < 1e-9);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod camera;

pub use camera::{
    Camera, CameraDebugInfo, DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, DEFAULT_ZOOM, ZoomOutcome,
};
