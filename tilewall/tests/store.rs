// Copyright 2026 the Tilewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Point;
use tilewall::{ImageRef, ImageState, StoreError, Tile, TileId, TileStore};
use tilewall_layout::{Footprint, GridCell, TileSize};

fn base() -> TileSize {
    TileSize::new(10.0, 20.0)
}

fn tile(id: u64, cx: i64, cy: i64, side: u32) -> Tile {
    Tile::new(
        TileId(id),
        base().cell_origin(GridCell::new(cx, cy)),
        Footprint::new(side).unwrap(),
    )
}

#[test]
fn add_tile_marks_every_cell() {
    let mut store = TileStore::new(base());
    store.add_tile(tile(1, 0, 0, 2)).unwrap();
    assert_eq!(store.occupancy().cell_count(), 4);
    assert!(store.occupancy().contains(GridCell::new(1, 1)));
    assert_eq!(store.next_id(), Ok(TileId(2)));
}

#[test]
fn overlapping_tiles_are_rejected() {
    let mut store = TileStore::new(base());
    store.add_tile(tile(1, 0, 0, 2)).unwrap();
    let err = store.add_tile(tile(2, 1, 1, 1)).unwrap_err();
    assert_eq!(
        err,
        StoreError::Occupied {
            id: TileId(2),
            cell: GridCell::new(1, 1)
        }
    );
    // A larger block reaching into the first one is rejected as a whole.
    assert!(store.add_tile(tile(3, -1, -1, 2)).is_err());
    assert_eq!(store.len(), 1);
    assert_eq!(store.occupancy().cell_count(), 4);
}

#[test]
fn duplicate_ids_and_off_grid_positions_are_rejected() {
    let mut store = TileStore::new(base());
    store.add_tile(tile(5, 0, 0, 1)).unwrap();
    assert_eq!(
        store.add_tile(tile(5, 3, 3, 1)).unwrap_err(),
        StoreError::DuplicateId(TileId(5))
    );

    let off = Tile::new(TileId(6), Point::new(15.0, 0.0), Footprint::ONE);
    assert!(matches!(
        store.add_tile(off).unwrap_err(),
        StoreError::OffGrid { id: TileId(6), .. }
    ));
}

#[test]
fn largest_id_leaves_no_next_id() {
    let mut store = TileStore::new(base());
    let report = store.load_existing([tile(u64::MAX, 0, 0, 1)]);
    assert_eq!(report.loaded, 1);
    assert_eq!(store.next_id(), Err(StoreError::IdsExhausted));
}

#[test]
fn footprints_over_the_limit_are_rejected() {
    let mut store = TileStore::new(base()).with_max_footprint(2);
    store.add_tile(tile(1, 0, 0, 2)).unwrap();
    assert_eq!(
        store.add_tile(tile(2, 10, 10, 3)).unwrap_err(),
        StoreError::Oversized {
            id: TileId(2),
            side: 3,
            max: 2
        }
    );
    assert_eq!(store.len(), 1);
    assert!(!store.occupancy().contains(GridCell::new(10, 10)));
}

#[test]
fn load_existing_rebuilds_and_reports_conflicts() {
    let mut store = TileStore::new(base());
    store.add_tile(tile(1, 9, 9, 1)).unwrap();

    let report = store.load_existing([tile(1, 0, 0, 1), tile(2, 0, 0, 1), tile(3, 1, 0, 1)]);
    assert_eq!(report.loaded, 2);
    assert_eq!(report.rejected.len(), 1);
    assert!(!store.occupancy().contains(GridCell::new(9, 9)));
    assert_eq!(store.next_id(), Ok(TileId(4)));
    assert_eq!(store.get(TileId(2)), None);
}

#[test]
fn images_are_requested_once_per_reference() {
    let mut store = TileStore::new(base());
    let shared = ImageRef::from("https://example.com/cat.png");
    let mut a = tile(1, 0, 0, 1);
    a.image = Some(shared.clone());
    let mut b = tile(2, 1, 0, 1);
    b.image = Some(shared.clone());
    store.add_tile(a).unwrap();
    store.add_tile(b).unwrap();

    assert_eq!(store.images_mut().take_pending_requests(), [shared.clone()]);
    assert_eq!(store.images().state(&shared), Some(ImageState::Pending));
}

#[test]
fn listing_and_transfer_touch_only_ownership_fields() {
    let mut store = TileStore::new(base());
    store.add_tile(tile(1, 2, 3, 1)).unwrap();

    store.set_listing(TileId(1), true, 12.5).unwrap();
    let listed = store.get(TileId(1)).unwrap();
    assert!(listed.for_sale);
    assert_eq!(listed.price, 12.5);

    store.transfer(TileId(1), "bob").unwrap();
    let moved = store.get(TileId(1)).unwrap();
    assert_eq!(moved.owner.as_deref(), Some("bob"));
    assert!(!moved.for_sale);
    assert_eq!(moved.position(), base().cell_origin(GridCell::new(2, 3)));

    assert_eq!(
        store.transfer(TileId(9), "x").unwrap_err(),
        StoreError::UnknownTile(TileId(9))
    );
}
