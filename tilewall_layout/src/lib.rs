// Copyright 2026 the Tilewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tilewall Layout: collision-free placement of square tile blocks on an
//! unbounded grid.
//!
//! The world is divided into cells of one base tile each ([`TileSize`]).
//! A tile covers a `footprint × footprint` block of cells, and no two tiles
//! may share a cell. [`Occupancy`] records the covered cells, and
//! [`Placer`] searches it for a free block using a fixed escalation of
//! strategies:
//!
//! 1. [`PlacementStrategy::Adjacent`]: a free neighbor of an existing block.
//! 2. [`PlacementStrategy::Spiral`]: samples on rings around the origin.
//! 3. [`PlacementStrategy::Walk`]: steps away from a random occupied cell.
//! 4. [`PlacementStrategy::GuaranteedRandom`]: random cells near the origin.
//!
//! An empty map always places at the origin. Randomness is supplied by the
//! caller, so seeded generators give reproducible layouts.
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use tilewall_layout::{Footprint, GridCell, Occupancy, Placer};
//!
//! let mut occupancy = Occupancy::new();
//! let placer = Placer::default();
//! let mut rng = StdRng::seed_from_u64(1);
//!
//! let first = placer.place(&occupancy, Footprint::ONE, &mut rng).unwrap();
//! assert_eq!(first.cell, GridCell::ORIGIN);
//! occupancy.mark_block(first.cell, Footprint::ONE).unwrap();
//!
//! let second = placer.place(&occupancy, Footprint::ONE, &mut rng).unwrap();
//! assert!(second.cell == GridCell::new(1, 0) || second.cell == GridCell::new(0, 1));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod grid;
mod occupancy;
mod placer;

pub use grid::{
    DEFAULT_MAX_FOOTPRINT, DEFAULT_TILE_HEIGHT, DEFAULT_TILE_WIDTH, Footprint, GridCell, TileSize,
};
pub use occupancy::{Block, CellConflict, Occupancy};
pub use placer::{
    Placement, PlacementConfig, PlacementError, PlacementMode, PlacementStrategy, Placer,
    QuadrantPolicy,
};
