// Copyright 2026 the Tilewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Occupancy map: which grid cells are covered by placed blocks.

use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashSet;

use crate::grid::{Footprint, GridCell};

/// A placed square block of cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Block {
    /// Top-left cell.
    pub origin: GridCell,
    /// Side length.
    pub footprint: Footprint,
}

impl Block {
    /// Creates a block.
    #[must_use]
    pub const fn new(origin: GridCell, footprint: Footprint) -> Self {
        Self { origin, footprint }
    }

    /// Iterates the cells of this block.
    pub fn cells(&self) -> impl Iterator<Item = GridCell> {
        self.footprint.cells(self.origin)
    }
}

/// Returned when a block would cover an already occupied cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellConflict {
    /// The first occupied cell found.
    pub cell: GridCell,
}

impl fmt::Display for CellConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "grid cell {} is already occupied", self.cell)
    }
}

impl core::error::Error for CellConflict {}

/// Set of occupied grid cells plus the blocks that produced them.
///
/// A cell is occupied iff some block covers it. Blocks are only ever added;
/// [`Occupancy::clear`] resets everything for a full reload.
#[derive(Clone, Debug, Default)]
pub struct Occupancy {
    cells: HashSet<GridCell>,
    blocks: Vec<Block>,
}

impl Occupancy {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if nothing has been placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Placed blocks in insertion order.
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Returns `true` if `cell` is occupied.
    #[must_use]
    pub fn contains(&self, cell: GridCell) -> bool {
        self.cells.contains(&cell)
    }

    /// Returns the first occupied cell of the block, if any.
    #[must_use]
    pub fn first_conflict(&self, origin: GridCell, footprint: Footprint) -> Option<GridCell> {
        footprint.cells(origin).find(|c| self.cells.contains(c))
    }

    /// Returns `true` if every cell of the block is free.
    #[must_use]
    pub fn is_block_free(&self, origin: GridCell, footprint: Footprint) -> bool {
        self.first_conflict(origin, footprint).is_none()
    }

    /// Marks every cell of the block as occupied.
    ///
    /// Either all cells are marked or, on conflict, none are.
    pub fn mark_block(&mut self, origin: GridCell, footprint: Footprint) -> Result<(), CellConflict> {
        if let Some(cell) = self.first_conflict(origin, footprint) {
            return Err(CellConflict { cell });
        }
        self.cells.extend(footprint.cells(origin));
        self.blocks.push(Block::new(origin, footprint));
        Ok(())
    }

    /// Occupied cells sorted row-major, for reproducible iteration.
    #[must_use]
    pub fn sorted_cells(&self) -> Vec<GridCell> {
        let mut cells: Vec<GridCell> = self.cells.iter().copied().collect();
        cells.sort_unstable_by_key(|c| (c.y, c.x));
        cells
    }

    /// Removes everything.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.blocks.clear();
    }
}
