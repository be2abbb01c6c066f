// Copyright 2026 the Tilewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use hashbrown::HashMap;
use tilewall_layout::{DEFAULT_MAX_FOOTPRINT, GridCell, Occupancy, TileSize};

use crate::cache::ImageCache;
use crate::tile::{Tile, TileId};

/// Why a tile was not added to the store.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// Another tile already has this id.
    #[error("tile {0} already exists")]
    DuplicateId(TileId),
    /// The position is not a multiple of the base tile dimensions.
    #[error("tile {id} at ({x}, {y}) is not aligned to the tile grid")]
    OffGrid {
        /// Rejected tile.
        id: TileId,
        /// Requested left edge.
        x: f64,
        /// Requested top edge.
        y: f64,
    },
    /// Part of the footprint is already covered by another tile.
    #[error("tile {id} overlaps an existing tile at cell {cell}")]
    Occupied {
        /// Rejected tile.
        id: TileId,
        /// First conflicting cell.
        cell: GridCell,
    },
    /// The footprint is larger than the store accepts.
    #[error("tile {id} is {side} cells wide, more than the limit of {max}")]
    Oversized {
        /// Rejected tile.
        id: TileId,
        /// Requested side length.
        side: u32,
        /// Largest accepted side length.
        max: u32,
    },
    /// No tile has this id.
    #[error("no tile {0}")]
    UnknownTile(TileId),
    /// The largest possible id is already taken.
    #[error("no tile ids left")]
    IdsExhausted,
}

/// Outcome of [`TileStore::load_existing`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadReport {
    /// Tiles now in the store.
    pub loaded: usize,
    /// Records that were skipped, in input order.
    pub rejected: Vec<StoreError>,
}

/// Ordered tile list plus the occupancy map derived from it.
///
/// Every tile in the store is grid-aligned and no two tiles share a cell.
/// The store also owns the image cache: adding a tile with an image queues
/// that image for loading.
#[derive(Debug)]
pub struct TileStore {
    base: TileSize,
    tiles: Vec<Tile>,
    index: HashMap<TileId, usize>,
    occupancy: Occupancy,
    images: ImageCache,
    max_footprint: u32,
}

impl TileStore {
    /// Creates an empty store for the given grid pitch.
    #[must_use]
    pub fn new(base: TileSize) -> Self {
        Self::with_cache(base, ImageCache::new())
    }

    /// Creates an empty store using `images` as its cache.
    #[must_use]
    pub fn with_cache(base: TileSize, images: ImageCache) -> Self {
        Self {
            base,
            tiles: Vec::new(),
            index: HashMap::new(),
            occupancy: Occupancy::new(),
            images,
            max_footprint: DEFAULT_MAX_FOOTPRINT,
        }
    }

    /// Sets the largest footprint side [`add_tile`](Self::add_tile) accepts.
    #[must_use]
    pub fn with_max_footprint(mut self, side: u32) -> Self {
        self.max_footprint = side;
        self
    }

    /// Grid pitch.
    #[must_use]
    pub fn base(&self) -> TileSize {
        self.base
    }

    /// Tiles in insertion order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Number of tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Returns `true` if the store holds no tiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Looks up a tile.
    #[must_use]
    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.index.get(&id).map(|&i| &self.tiles[i])
    }

    /// Cells covered by the stored tiles.
    #[must_use]
    pub fn occupancy(&self) -> &Occupancy {
        &self.occupancy
    }

    /// The image cache.
    #[must_use]
    pub fn images(&self) -> &ImageCache {
        &self.images
    }

    /// The image cache, mutably.
    pub fn images_mut(&mut self) -> &mut ImageCache {
        &mut self.images
    }

    pub(crate) fn tiles_and_images_mut(&mut self) -> (&[Tile], &mut ImageCache) {
        (&self.tiles, &mut self.images)
    }

    /// The id a new tile should get: one more than the largest id, or 1.
    pub fn next_id(&self) -> Result<TileId, StoreError> {
        self.tiles
            .iter()
            .map(|t| t.id.0)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .map(TileId)
            .ok_or(StoreError::IdsExhausted)
    }

    /// Validates and appends a tile, marking its cells occupied.
    ///
    /// The cells are checked against the occupancy map regardless of how
    /// the position was chosen.
    pub fn add_tile(&mut self, tile: Tile) -> Result<&Tile, StoreError> {
        if self.index.contains_key(&tile.id) {
            return Err(StoreError::DuplicateId(tile.id));
        }
        if tile.footprint.side() > self.max_footprint {
            return Err(StoreError::Oversized {
                id: tile.id,
                side: tile.footprint.side(),
                max: self.max_footprint,
            });
        }
        let cell = tile.cell(self.base).ok_or(StoreError::OffGrid {
            id: tile.id,
            x: tile.x,
            y: tile.y,
        })?;
        self.occupancy
            .mark_block(cell, tile.footprint)
            .map_err(|conflict| StoreError::Occupied {
                id: tile.id,
                cell: conflict.cell,
            })?;

        if let Some(image) = &tile.image {
            self.images.request(image);
        }
        log::info!(
            "added tile {} at cell {cell} ({1}x{1})",
            tile.id,
            tile.footprint.side()
        );
        let slot = self.tiles.len();
        self.index.insert(tile.id, slot);
        self.tiles.push(tile);
        Ok(&self.tiles[slot])
    }

    /// Replaces the contents with `tiles`, rebuilding the occupancy map.
    ///
    /// Invalid records are skipped and reported; the image cache is kept.
    pub fn load_existing(&mut self, tiles: impl IntoIterator<Item = Tile>) -> LoadReport {
        self.tiles.clear();
        self.index.clear();
        self.occupancy.clear();

        let mut report = LoadReport::default();
        for tile in tiles {
            if let Err(err) = self.add_tile(tile) {
                log::warn!("skipping tile while loading: {err}");
                report.rejected.push(err);
            }
        }
        report.loaded = self.tiles.len();
        log::info!(
            "loaded {} tiles ({} rejected)",
            report.loaded,
            report.rejected.len()
        );
        report
    }

    /// Lists or unlists a tile for sale.
    pub fn set_listing(&mut self, id: TileId, for_sale: bool, price: f64) -> Result<(), StoreError> {
        let tile = self.get_mut(id)?;
        tile.for_sale = for_sale;
        tile.price = if for_sale { price } else { 0.0 };
        Ok(())
    }

    /// Hands a tile to a new owner, ending any listing.
    pub fn transfer(&mut self, id: TileId, owner: impl Into<String>) -> Result<(), StoreError> {
        let tile = self.get_mut(id)?;
        tile.owner = Some(owner.into());
        tile.for_sale = false;
        tile.price = 0.0;
        Ok(())
    }

    fn get_mut(&mut self, id: TileId) -> Result<&mut Tile, StoreError> {
        match self.index.get(&id) {
            Some(&i) => Ok(&mut self.tiles[i]),
            None => Err(StoreError::UnknownTile(id)),
        }
    }
}
