// Copyright 2026 the Tilewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tilewall: an unbounded wall of fixed-size tiles that can be panned,
//! zoomed and grown without overlap.
//!
//! This crate ties the workspace together:
//!
//! - [`Tile`] records and the [`TileStore`] that keeps them collision-free,
//! - the [`ImageCache`] that memoizes host-driven image loads,
//! - [`CanvasConfig`], and
//! - [`Canvas`], the single object a host application talks to.
//!
//! The building blocks live in their own crates and are re-exported here:
//! [`tilewall_view`] (camera), [`tilewall_input`] (gestures),
//! [`tilewall_layout`] (placement), [`tilewall_render`] (frames) and
//! [`tilewall_imaging`] (the draw-command IR).
//!
//! ```
//! use kurbo::Size;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use tilewall::{Canvas, CanvasConfig, TileRequest};
//! use tilewall_imaging_ref::RefBackend;
//!
//! let mut backend = RefBackend::default();
//! let mut canvas = Canvas::with_rng(
//!     CanvasConfig::default(),
//!     Size::new(800.0, 600.0),
//!     &mut backend,
//!     StdRng::seed_from_u64(7),
//! )
//! .unwrap();
//!
//! let first = canvas
//!     .create_tile(TileRequest {
//!         caption: "hello".into(),
//!         footprint: 1,
//!         ..TileRequest::default()
//!     })
//!     .unwrap();
//! assert_eq!((first.x, first.y), (0.0, 0.0));
//!
//! let stats = canvas.render(&mut backend);
//! assert_eq!(stats.visible, 1);
//! assert!(!canvas.needs_render());
//! ```

mod cache;
mod canvas;
mod config;
mod store;
mod tile;

pub use cache::{EvictionPolicy, ImageCache, ImageState, KeepAll, LeastRecentlyUsed};
pub use canvas::{Canvas, CanvasError, TileEvent, TileRequest};
pub use config::{CanvasConfig, ConfigError};
pub use store::{LoadReport, StoreError, TileStore};
pub use tile::{ImageRef, Tile, TileId};

pub use tilewall_imaging;
pub use tilewall_input;
pub use tilewall_layout;
pub use tilewall_render;
pub use tilewall_view;
