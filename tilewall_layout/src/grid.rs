// Copyright 2026 the Tilewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid cells, footprints and the base tile pitch.

use core::fmt;
use core::num::NonZeroU32;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `round` and `abs`
use kurbo::{Point, Rect, Size};

/// Width of a base tile in world units.
pub const DEFAULT_TILE_WIDTH: f64 = 393.0;
/// Height of a base tile in world units.
pub const DEFAULT_TILE_HEIGHT: f64 = 852.0;
/// Largest footprint side accepted unless configured otherwise.
pub const DEFAULT_MAX_FOOTPRINT: u32 = 8;

/// A cell of the occupancy grid, in tile units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCell {
    /// Column.
    pub x: i64,
    /// Row.
    pub y: i64,
}

impl GridCell {
    /// The origin cell.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Creates a cell.
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Returns this cell moved by `(dx, dy)` cells.
    #[must_use]
    pub const fn offset(self, dx: i64, dy: i64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Returns `true` if neither coordinate is negative.
    #[must_use]
    pub const fn is_non_negative(self) -> bool {
        self.x >= 0 && self.y >= 0
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Side length of a square tile, in grid cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Footprint(NonZeroU32);

impl Footprint {
    /// A single cell.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Creates a footprint, or `None` for a zero side length.
    #[must_use]
    pub const fn new(side: u32) -> Option<Self> {
        match NonZeroU32::new(side) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// Creates a footprint no larger than `max` cells per side.
    #[must_use]
    pub fn bounded(side: u32, max: u32) -> Option<Self> {
        Self::new(side).filter(|f| f.side() <= max)
    }

    /// Side length in cells.
    #[must_use]
    pub const fn side(self) -> u32 {
        self.0.get()
    }

    /// Side length as a signed cell offset.
    #[must_use]
    pub const fn span(self) -> i64 {
        self.0.get() as i64
    }

    /// Iterates every cell of the `side × side` block whose top-left cell is `origin`.
    pub fn cells(self, origin: GridCell) -> impl Iterator<Item = GridCell> {
        let span = self.span();
        (0..span).flat_map(move |dy| (0..span).map(move |dx| origin.offset(dx, dy)))
    }
}

impl Default for Footprint {
    fn default() -> Self {
        Self::ONE
    }
}

/// Base tile dimensions: the world-space pitch of the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileSize {
    /// Width in world units.
    pub width: f64,
    /// Height in world units.
    pub height: f64,
}

impl Default for TileSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_TILE_WIDTH,
            height: DEFAULT_TILE_HEIGHT,
        }
    }
}

impl TileSize {
    /// Creates tile dimensions.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns `true` if both dimensions are finite and positive.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Returns the dimensions as a [`Size`].
    #[must_use]
    pub fn to_size(self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Top-left world position of a cell.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        reason = "cell coordinates stay far below 2^52"
    )]
    pub fn cell_origin(&self, cell: GridCell) -> Point {
        Point::new(cell.x as f64 * self.width, cell.y as f64 * self.height)
    }

    /// World rectangle covered by a block.
    #[must_use]
    pub fn block_rect(&self, origin: GridCell, footprint: Footprint) -> Rect {
        let p = self.cell_origin(origin);
        let side = f64::from(footprint.side());
        Rect::new(p.x, p.y, p.x + side * self.width, p.y + side * self.height)
    }

    /// Returns the cell whose top-left corner is exactly `pos`.
    ///
    /// Returns `None` when `pos` is not on the grid.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "rounded values are finite; the cast saturates"
    )]
    pub fn cell_at(&self, pos: Point) -> Option<GridCell> {
        let gx = pos.x / self.width;
        let gy = pos.y / self.height;
        if !gx.is_finite() || !gy.is_finite() {
            return None;
        }
        let (rx, ry) = (gx.round(), gy.round());
        // Accept tiny float drift from repeated multiplication.
        if (gx - rx).abs() > 1e-9 || (gy - ry).abs() > 1e-9 {
            return None;
        }
        Some(GridCell::new(rx as i64, ry as i64))
    }
}
