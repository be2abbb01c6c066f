// Copyright 2026 the Tilewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::fmt;
use std::sync::Arc;

use kurbo::{Point, Rect};
use tilewall_layout::{Footprint, GridCell, TileSize};

/// Unique, monotonically assigned tile identifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TileId(pub u64);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Reference to a tile's image, usually a URL. Also the image cache key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ImageRef(Arc<str>);

impl ImageRef {
    /// Creates a reference.
    pub fn new(reference: impl Into<Arc<str>>) -> Self {
        Self(reference.into())
    }

    /// The reference text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ImageRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ImageRef {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One tile of the wall.
///
/// `x`/`y` is the top-left world position and is always a multiple of the
/// base tile dimensions once the tile is in a store. Position and footprint
/// never change after insertion; only the owner and listing fields do.
///
/// With the `serde` feature, records also deserialize from the legacy
/// field names `x_position`, `y_position`, `size`, `image_url`,
/// `current_owner` and `is_paid`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    /// Identifier.
    pub id: TileId,
    /// Left edge in world units.
    #[cfg_attr(feature = "serde", serde(alias = "x_position"))]
    pub x: f64,
    /// Top edge in world units.
    #[cfg_attr(feature = "serde", serde(alias = "y_position"))]
    pub y: f64,
    /// Side length in grid cells.
    #[cfg_attr(feature = "serde", serde(default, alias = "size"))]
    pub footprint: Footprint,
    /// Image shown on the tile.
    #[cfg_attr(feature = "serde", serde(default, alias = "image_url"))]
    pub image: Option<ImageRef>,
    /// Caption text. A `null` caption reads as empty.
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "null_as_empty"))]
    pub caption: String,
    /// Current owner label.
    #[cfg_attr(feature = "serde", serde(default, alias = "current_owner"))]
    pub owner: Option<String>,
    /// Whether the tile is listed for sale.
    #[cfg_attr(feature = "serde", serde(default, alias = "is_paid"))]
    pub for_sale: bool,
    /// Asking price while listed.
    #[cfg_attr(feature = "serde", serde(default))]
    pub price: f64,
}

impl Tile {
    /// Creates a tile with no image, caption, owner or listing.
    #[must_use]
    pub fn new(id: TileId, position: Point, footprint: Footprint) -> Self {
        Self {
            id,
            x: position.x,
            y: position.y,
            footprint,
            image: None,
            caption: String::new(),
            owner: None,
            for_sale: false,
            price: 0.0,
        }
    }

    /// Top-left world position.
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// World bounds for the given base dimensions.
    #[must_use]
    pub fn world_rect(&self, base: TileSize) -> Rect {
        let side = f64::from(self.footprint.side());
        Rect::new(
            self.x,
            self.y,
            self.x + side * base.width,
            self.y + side * base.height,
        )
    }

    /// Center of the tile in world units.
    #[must_use]
    pub fn center(&self, base: TileSize) -> Point {
        self.world_rect(base).center()
    }

    /// Top-left grid cell, or `None` if the position is off the grid.
    #[must_use]
    pub fn cell(&self, base: TileSize) -> Option<GridCell> {
        base.cell_at(self.position())
    }
}

#[cfg(feature = "serde")]
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize as _;
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
