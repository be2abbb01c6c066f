// Copyright 2026 the Tilewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The placement engine: strategies and their escalation order.

use alloc::vec::Vec;
use core::f64::consts::TAU;
use core::fmt;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `sin`, `cos` and `round`
use rand::Rng;
use rand::seq::SliceRandom;

use crate::grid::{DEFAULT_MAX_FOOTPRINT, Footprint, GridCell};
use crate::occupancy::Occupancy;

/// A way of finding a free block.
///
/// Strategies are tried in a fixed order, each one a fallback for the one
/// before it: `Adjacent → Spiral → Walk → GuaranteedRandom`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlacementStrategy {
    /// The map was empty; the block went to the origin.
    Origin,
    /// Next to an existing block, chosen uniformly among free neighbors.
    Adjacent,
    /// Rings of increasing radius around the origin.
    Spiral,
    /// Stepping from a random occupied cell in a random direction.
    Walk,
    /// Random cells near the origin.
    GuaranteedRandom,
}

impl PlacementStrategy {
    /// The strategy tried when this one finds nothing.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Adjacent => Some(Self::Spiral),
            Self::Spiral => Some(Self::Walk),
            Self::Walk => Some(Self::GuaranteedRandom),
            Self::GuaranteedRandom | Self::Origin => None,
        }
    }
}

impl fmt::Display for PlacementStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Origin => "origin",
            Self::Adjacent => "adjacent",
            Self::Spiral => "spiral",
            Self::Walk => "walk",
            Self::GuaranteedRandom => "guaranteed-random",
        })
    }
}

/// Where the escalation starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PlacementMode {
    /// Grow the wall from existing tiles, falling back to the spiral.
    #[default]
    Adjacent,
    /// Start with the spiral sweep around the origin.
    Spiral,
}

impl PlacementMode {
    /// First strategy tried in this mode.
    #[must_use]
    pub fn first_strategy(self) -> PlacementStrategy {
        match self {
            Self::Adjacent => PlacementStrategy::Adjacent,
            Self::Spiral => PlacementStrategy::Spiral,
        }
    }
}

/// Which cells the adjacency strategy may use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum QuadrantPolicy {
    /// Only cells with non-negative coordinates.
    #[default]
    NonNegative,
    /// Any cell.
    Unbounded,
}

impl QuadrantPolicy {
    fn allows(self, cell: GridCell) -> bool {
        match self {
            Self::NonNegative => cell.is_non_negative(),
            Self::Unbounded => true,
        }
    }
}

/// Tuning for [`Placer`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlacementConfig {
    /// Strategy the escalation starts from.
    pub mode: PlacementMode,
    /// Whether the adjacency strategy also considers diagonal neighbors.
    pub diagonals: bool,
    /// Cells the adjacency strategy may use.
    pub adjacent_quadrant: QuadrantPolicy,
    /// Largest ring swept by the spiral strategy.
    pub max_radius: u32,
    /// Ring radius multiplier, in cells per ring.
    pub spiral_scale: f64,
    /// Angular offset added per ring, in radians.
    pub ring_twist: f64,
    /// Random cells are drawn from `[-random_span, random_span)` on both axes.
    pub random_span: i64,
    /// Draws made by the random strategy before it gives up.
    pub random_attempts: u32,
    /// Largest footprint side callers should request.
    pub max_footprint: u32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            mode: PlacementMode::Adjacent,
            diagonals: false,
            adjacent_quadrant: QuadrantPolicy::NonNegative,
            max_radius: 100,
            spiral_scale: 0.8,
            ring_twist: 0.5,
            random_span: 10,
            random_attempts: 1024,
            max_footprint: DEFAULT_MAX_FOOTPRINT,
        }
    }
}

/// A successful placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Top-left cell of the placed block.
    pub cell: GridCell,
    /// Strategy that found it.
    pub strategy: PlacementStrategy,
}

/// Every strategy failed to find a free block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementError {
    /// The requested footprint.
    pub footprint: Footprint,
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no free {0}x{0} block found by any placement strategy",
            self.footprint.side()
        )
    }
}

impl core::error::Error for PlacementError {}

const NEIGHBOR_DIRECTIONS: [(i64, i64); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (-1, 1),
    (1, -1),
    (-1, -1),
];

/// Finds free blocks in an [`Occupancy`] map.
///
/// The placer never mutates the map; callers mark the returned block once
/// they commit the tile.
#[derive(Clone, Debug, Default)]
pub struct Placer {
    config: PlacementConfig,
}

impl Placer {
    /// Creates a placer.
    #[must_use]
    pub fn new(config: PlacementConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Finds a free block for `footprint`, starting from the configured mode.
    ///
    /// An empty map always yields the origin.
    pub fn place<R: Rng + ?Sized>(
        &self,
        occupancy: &Occupancy,
        footprint: Footprint,
        rng: &mut R,
    ) -> Result<Placement, PlacementError> {
        self.place_from(self.config.mode.first_strategy(), occupancy, footprint, rng)
    }

    /// Like [`Placer::place`], but starts the escalation at `start`.
    pub fn place_from<R: Rng + ?Sized>(
        &self,
        start: PlacementStrategy,
        occupancy: &Occupancy,
        footprint: Footprint,
        rng: &mut R,
    ) -> Result<Placement, PlacementError> {
        if occupancy.is_empty() {
            return Ok(Placement {
                cell: GridCell::ORIGIN,
                strategy: PlacementStrategy::Origin,
            });
        }

        let mut strategy = Some(start);
        while let Some(current) = strategy {
            if let Some(cell) = self.try_strategy(current, occupancy, footprint, rng) {
                log::debug!(
                    "placed {0}x{0} block at {cell} via {current}",
                    footprint.side()
                );
                return Ok(Placement {
                    cell,
                    strategy: current,
                });
            }
            strategy = current.next();
            if let Some(next) = strategy {
                log::debug!("{current} placement found nothing, trying {next}");
            }
        }
        log::warn!("placement exhausted for {0}x{0} block", footprint.side());
        Err(PlacementError { footprint })
    }

    /// Runs a single strategy.
    pub fn try_strategy<R: Rng + ?Sized>(
        &self,
        strategy: PlacementStrategy,
        occupancy: &Occupancy,
        footprint: Footprint,
        rng: &mut R,
    ) -> Option<GridCell> {
        match strategy {
            PlacementStrategy::Origin => occupancy
                .is_block_free(GridCell::ORIGIN, footprint)
                .then_some(GridCell::ORIGIN),
            PlacementStrategy::Adjacent => self.adjacent(occupancy, footprint, rng),
            PlacementStrategy::Spiral => self.spiral(occupancy, footprint, rng),
            PlacementStrategy::Walk => self.walk(occupancy, footprint, rng),
            PlacementStrategy::GuaranteedRandom => {
                self.guaranteed_random(occupancy, footprint, rng)
            }
        }
    }

    /// Free cells that touch an existing block, chosen uniformly.
    ///
    /// For a block at `(x, y)` with side `f` and a request of side `n` the
    /// candidates are `(x+f, y)`, `(x-n, y)`, `(x, y+f)` and `(x, y-n)`,
    /// plus the four corners when diagonals are enabled.
    pub fn adjacent<R: Rng + ?Sized>(
        &self,
        occupancy: &Occupancy,
        footprint: Footprint,
        rng: &mut R,
    ) -> Option<GridCell> {
        let n = footprint.span();
        let mut candidates = Vec::new();
        for block in occupancy.blocks() {
            let GridCell { x, y } = block.origin;
            let f = block.footprint.span();
            let mut push = |cell: GridCell| {
                if self.config.adjacent_quadrant.allows(cell)
                    && occupancy.is_block_free(cell, footprint)
                {
                    candidates.push(cell);
                }
            };
            push(GridCell::new(x + f, y));
            push(GridCell::new(x - n, y));
            push(GridCell::new(x, y + f));
            push(GridCell::new(x, y - n));
            if self.config.diagonals {
                push(GridCell::new(x + f, y + f));
                push(GridCell::new(x - n, y + f));
                push(GridCell::new(x + f, y - n));
                push(GridCell::new(x - n, y - n));
            }
        }
        choose_distinct(candidates, rng)
    }

    /// Sweeps rings around the origin and picks a free sample from the
    /// first ring that has one.
    pub fn spiral<R: Rng + ?Sized>(
        &self,
        occupancy: &Occupancy,
        footprint: Footprint,
        rng: &mut R,
    ) -> Option<GridCell> {
        if occupancy.is_empty() {
            return Some(GridCell::ORIGIN);
        }
        let mut candidates = Vec::new();
        for radius in 1..=self.config.max_radius {
            candidates.clear();
            let ring = f64::from(radius);
            let steps = 8 * radius;
            let spiral_radius = ring * self.config.spiral_scale;
            for i in 0..steps {
                let angle = f64::from(i) / f64::from(steps) * TAU + ring * self.config.ring_twist;
                let cell = GridCell::new(
                    round_to_cell(angle.cos() * spiral_radius),
                    round_to_cell(angle.sin() * spiral_radius),
                );
                if occupancy.is_block_free(cell, footprint) {
                    candidates.push(cell);
                }
            }
            if !candidates.is_empty() {
                log::trace!("spiral ring {radius} has {} free samples", candidates.len());
                return choose_distinct(core::mem::take(&mut candidates), rng);
            }
        }
        None
    }

    /// Steps `footprint` cells away from occupied cells in every direction,
    /// both visited in random order, and takes the first free block.
    pub fn walk<R: Rng + ?Sized>(
        &self,
        occupancy: &Occupancy,
        footprint: Footprint,
        rng: &mut R,
    ) -> Option<GridCell> {
        let mut cells = occupancy.sorted_cells();
        cells.shuffle(rng);
        let mut directions = NEIGHBOR_DIRECTIONS;
        directions.shuffle(rng);

        let step = footprint.span();
        cells.into_iter().find_map(|cell| {
            directions.iter().find_map(|&(dx, dy)| {
                let candidate = cell.offset(dx * step, dy * step);
                occupancy
                    .is_block_free(candidate, footprint)
                    .then_some(candidate)
            })
        })
    }

    /// Draws random cells near the origin until one hosts the block.
    ///
    /// Gives up after the configured number of attempts.
    pub fn guaranteed_random<R: Rng + ?Sized>(
        &self,
        occupancy: &Occupancy,
        footprint: Footprint,
        rng: &mut R,
    ) -> Option<GridCell> {
        let span = self.config.random_span.max(1);
        (0..self.config.random_attempts).find_map(|_| {
            let cell = GridCell::new(rng.gen_range(-span..span), rng.gen_range(-span..span));
            occupancy.is_block_free(cell, footprint).then_some(cell)
        })
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "ring samples are bounded by the spiral radius"
)]
fn round_to_cell(v: f64) -> i64 {
    v.round() as i64
}

fn choose_distinct<R: Rng + ?Sized>(mut candidates: Vec<GridCell>, rng: &mut R) -> Option<GridCell> {
    candidates.sort_unstable();
    candidates.dedup();
    candidates.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn fp(n: u32) -> Footprint {
        Footprint::new(n).unwrap()
    }

    fn single(origin: GridCell) -> Occupancy {
        let mut occ = Occupancy::new();
        occ.mark_block(origin, Footprint::ONE).unwrap();
        occ
    }

    #[test]
    fn escalation_order_is_fixed() {
        let mut chain = Vec::new();
        let mut s = Some(PlacementStrategy::Adjacent);
        while let Some(current) = s {
            chain.push(current);
            s = current.next();
        }
        assert_eq!(
            chain,
            [
                PlacementStrategy::Adjacent,
                PlacementStrategy::Spiral,
                PlacementStrategy::Walk,
                PlacementStrategy::GuaranteedRandom,
            ]
        );
        assert_eq!(
            PlacementMode::Spiral.first_strategy(),
            PlacementStrategy::Spiral
        );
    }

    #[test]
    fn adjacent_respects_footprint_offsets() {
        let mut occ = Occupancy::new();
        occ.mark_block(GridCell::new(0, 0), fp(2)).unwrap();
        let placer = Placer::new(PlacementConfig {
            adjacent_quadrant: QuadrantPolicy::Unbounded,
            ..PlacementConfig::default()
        });
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = Vec::new();
        for _ in 0..64 {
            let cell = placer.adjacent(&occ, fp(1), &mut rng).unwrap();
            if !seen.contains(&cell) {
                seen.push(cell);
            }
        }
        seen.sort_unstable();
        let mut expected = [
            GridCell::new(2, 0),
            GridCell::new(-1, 0),
            GridCell::new(0, 2),
            GridCell::new(0, -1),
        ];
        expected.sort_unstable();
        assert_eq!(seen, expected);
    }

    #[test]
    fn adjacent_with_diagonals_reaches_corners() {
        let occ = single(GridCell::new(3, 3));
        let placer = Placer::new(PlacementConfig {
            diagonals: true,
            ..PlacementConfig::default()
        });
        let mut rng = StdRng::seed_from_u64(11);
        let mut corners = 0;
        for _ in 0..200 {
            let cell = placer.adjacent(&occ, fp(1), &mut rng).unwrap();
            assert!(cell.x.abs_diff(3) <= 1 && cell.y.abs_diff(3) <= 1);
            if cell.x != 3 && cell.y != 3 {
                corners += 1;
            }
        }
        assert!(corners > 0);
    }

    #[test]
    fn adjacent_skips_occupied_and_negative_neighbors() {
        let mut occ = single(GridCell::new(0, 0));
        occ.mark_block(GridCell::new(1, 0), fp(1)).unwrap();
        let placer = Placer::default();
        let mut rng = StdRng::seed_from_u64(1);
        let allowed = [GridCell::new(0, 1), GridCell::new(2, 0), GridCell::new(1, 1)];
        let mut seen = [false; 3];
        for _ in 0..100 {
            let cell = placer.adjacent(&occ, fp(1), &mut rng).unwrap();
            let idx = allowed.iter().position(|c| *c == cell).unwrap();
            seen[idx] = true;
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn spiral_skips_occupied_samples() {
        let occ = single(GridCell::ORIGIN);
        let placer = Placer::default();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..32 {
            let cell = placer.spiral(&occ, fp(1), &mut rng).unwrap();
            assert_ne!(cell, GridCell::ORIGIN);
            assert!(cell.x.abs() <= 1 && cell.y.abs() <= 1);
        }
    }

    #[test]
    fn walk_steps_by_footprint() {
        let occ = single(GridCell::ORIGIN);
        let placer = Placer::default();
        let mut rng = StdRng::seed_from_u64(5);
        let cell = placer.walk(&occ, fp(2), &mut rng).unwrap();
        assert!(cell.x.abs() == 2 || cell.y.abs() == 2);
        assert!(occ.is_block_free(cell, fp(2)));
    }

    #[test]
    fn guaranteed_random_stays_in_span() {
        let occ = single(GridCell::ORIGIN);
        let placer = Placer::default();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            let cell = placer.guaranteed_random(&occ, fp(1), &mut rng).unwrap();
            assert!((-10..10).contains(&cell.x));
            assert!((-10..10).contains(&cell.y));
            assert_ne!(cell, GridCell::ORIGIN);
        }
    }

    #[test]
    fn guaranteed_random_gives_up_on_a_full_box() {
        let mut occ = Occupancy::new();
        occ.mark_block(GridCell::new(-10, -10), fp(20)).unwrap();
        let placer = Placer::default();
        let mut rng = StdRng::seed_from_u64(2);
        assert_eq!(placer.guaranteed_random(&occ, fp(1), &mut rng), None);
        let err = placer
            .place_from(PlacementStrategy::GuaranteedRandom, &occ, fp(1), &mut rng)
            .unwrap_err();
        assert_eq!(err.footprint, fp(1));
    }

    #[test]
    fn empty_spiral_ladder_escalates_to_walk() {
        let occ = single(GridCell::ORIGIN);
        let placer = Placer::new(PlacementConfig {
            mode: PlacementMode::Spiral,
            max_radius: 0,
            ..PlacementConfig::default()
        });
        let mut rng = StdRng::seed_from_u64(4);
        let placement = placer.place(&occ, fp(1), &mut rng).unwrap();
        assert_eq!(placement.strategy, PlacementStrategy::Walk);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_fills_missing_fields() {
        let config: PlacementConfig =
            serde_json::from_str(r#"{"mode":"spiral","adjacent_quadrant":"unbounded"}"#).unwrap();
        assert_eq!(config.mode, PlacementMode::Spiral);
        assert_eq!(config.adjacent_quadrant, QuadrantPolicy::Unbounded);
        assert_eq!(config.max_radius, 100);
        assert_eq!(config.max_footprint, DEFAULT_MAX_FOOTPRINT);
    }
}
