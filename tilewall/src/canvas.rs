// Copyright 2026 the Tilewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Size, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tilewall_imaging::ImagingBackend;
use tilewall_input::{CameraCommand, GestureTracker, WheelZoom};
use tilewall_layout::{Footprint, Placement, PlacementError, Placer};
use tilewall_render::{FrameStats, LoadedImage, Renderer, TileDraw, is_visible};
use tilewall_view::{Camera, ZoomOutcome};

use crate::cache::{ImageCache, LeastRecentlyUsed};
use crate::config::{CanvasConfig, ConfigError};
use crate::store::{LoadReport, StoreError, TileStore};
use crate::tile::{ImageRef, Tile, TileId};

/// Errors surfaced by [`Canvas`] operations.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The store refused a tile.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// No free block could be found.
    #[error(transparent)]
    Placement(#[from] PlacementError),
    /// Footprints must be at least one cell and at most
    /// [`PlacementConfig::max_footprint`](tilewall_layout::PlacementConfig::max_footprint).
    #[error("footprint {0} is outside the accepted range")]
    InvalidFootprint(u32),
}

/// A new tile to be placed by the canvas.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TileRequest {
    /// Image to show.
    pub image: Option<ImageRef>,
    /// Caption text.
    pub caption: String,
    /// Owner label.
    pub owner: Option<String>,
    /// Side length in cells.
    pub footprint: u32,
    /// Whether the tile starts out listed.
    pub for_sale: bool,
    /// Asking price while listed.
    pub price: f64,
}

/// A change pushed by the service that owns the tile data.
#[derive(Clone, Debug, PartialEq)]
pub enum TileEvent {
    /// The full tile list changed.
    Reload(Vec<Tile>),
    /// A tile was created elsewhere.
    Inserted(Tile),
    /// A tile was listed or unlisted.
    Listed {
        /// Tile.
        id: TileId,
        /// New listing state.
        for_sale: bool,
        /// Asking price.
        price: f64,
    },
    /// A tile changed hands.
    Transferred {
        /// Tile.
        id: TileId,
        /// New owner.
        owner: String,
    },
}

/// The host-facing canvas: camera, input, tile store and renderer.
///
/// Every mutation that changes what is on screen sets
/// [`Canvas::needs_render`]; the host draws a frame with
/// [`Canvas::render`] when it sees the flag. Image fetching stays with the
/// host, see [`Canvas::take_image_requests`].
#[derive(Debug)]
pub struct Canvas<R = StdRng> {
    config: CanvasConfig,
    camera: Camera,
    gestures: GestureTracker,
    store: TileStore,
    placer: Placer,
    renderer: Renderer,
    rng: R,
    needs_render: bool,
}

impl Canvas<StdRng> {
    /// Creates a canvas seeded from system entropy.
    ///
    /// The renderer's paints are installed on `backend`, which must be the
    /// backend later passed to [`Canvas::render`].
    pub fn new(
        config: CanvasConfig,
        viewport: Size,
        backend: &mut dyn ImagingBackend,
    ) -> Result<Self, CanvasError> {
        Self::with_rng(config, viewport, backend, StdRng::from_entropy())
    }
}

impl<R: Rng> Canvas<R> {
    /// Creates a canvas that draws placement randomness from `rng`.
    pub fn with_rng(
        config: CanvasConfig,
        viewport: Size,
        backend: &mut dyn ImagingBackend,
        rng: R,
    ) -> Result<Self, CanvasError> {
        config.validate()?;
        let mut camera = Camera::new(viewport);
        camera.set_zoom_limits(config.min_zoom, config.max_zoom);
        camera.set_zoom(config.start_zoom);
        let renderer = Renderer::new(backend, config.tile_size, config.style.clone());
        let images = match config.image_cache_capacity {
            Some(capacity) => ImageCache::with_policy(Box::new(LeastRecentlyUsed::new(capacity))),
            None => ImageCache::new(),
        };
        let store = TileStore::with_cache(config.tile_size, images)
            .with_max_footprint(config.placement.max_footprint);
        Ok(Self {
            gestures: GestureTracker::with_wheel(WheelZoom::new(config.wheel_step())),
            store,
            placer: Placer::new(config.placement),
            camera,
            renderer,
            rng,
            config,
            needs_render: true,
        })
    }

    /// The configuration in use.
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// The camera.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The tile store.
    pub fn store(&self) -> &TileStore {
        &self.store
    }

    /// Returns `true` if something changed since the last frame.
    pub fn needs_render(&self) -> bool {
        self.needs_render
    }

    /// Requests a frame without changing anything.
    pub fn request_render(&mut self) {
        self.needs_render = true;
    }

    /// Draws a frame and clears [`Canvas::needs_render`].
    ///
    /// Visible tiles whose image is not yet known queue a load request.
    /// Only visible tiles count as uses for the cache's eviction policy.
    pub fn render(&mut self, backend: &mut dyn ImagingBackend) -> FrameStats {
        let base = self.store.base();
        let mut draws = Vec::with_capacity(self.store.len());
        // Resolve images first; the cache needs `&mut` for recency tracking.
        let images: Vec<Option<LoadedImage>> = {
            let camera = &self.camera;
            let (tiles, cache) = self.store.tiles_and_images_mut();
            tiles
                .iter()
                .map(|tile| {
                    let image = tile.image.as_ref()?;
                    let screen = camera.world_to_screen_rect(tile.world_rect(base));
                    if !is_visible(screen, camera.viewport_size()) {
                        return None;
                    }
                    cache.request(image);
                    cache.get(image)
                })
                .collect()
        };
        for (tile, image) in self.store.tiles().iter().zip(images) {
            draws.push(TileDraw {
                world: tile.world_rect(base),
                for_sale: tile.for_sale,
                owner: tile.owner.as_deref(),
                caption: Some(tile.caption.as_str()),
                image,
            });
        }
        let stats = self.renderer.render(backend, &self.camera, draws);
        self.needs_render = false;
        stats
    }

    /// Replaces every tile, e.g. after the tile service signals a change.
    pub fn set_tiles(&mut self, tiles: Vec<Tile>) -> LoadReport {
        let report = self.store.load_existing(tiles);
        self.needs_render = true;
        report
    }

    /// Applies a change pushed by the tile service.
    ///
    /// A [`TileEvent::Reload`] returns the report of the rebuilt store.
    pub fn apply_event(&mut self, event: TileEvent) -> Result<Option<LoadReport>, CanvasError> {
        let mut report = None;
        match event {
            TileEvent::Reload(tiles) => {
                report = Some(self.store.load_existing(tiles));
            }
            TileEvent::Inserted(tile) => {
                if self.store.get(tile.id).is_none() {
                    self.store.add_tile(tile)?;
                }
            }
            TileEvent::Listed {
                id,
                for_sale,
                price,
            } => self.store.set_listing(id, for_sale, price)?,
            TileEvent::Transferred { id, owner } => self.store.transfer(id, owner)?,
        }
        self.needs_render = true;
        Ok(report)
    }

    /// Centers the view on a world point, optionally changing the zoom.
    pub fn center_on(&mut self, world: Point, zoom: Option<f64>) {
        self.camera.center_on(world, zoom);
        self.needs_render = true;
    }

    /// Shows the first tile at the start zoom, or the origin if there is none.
    pub fn reset_view(&mut self) {
        let target = self
            .store
            .tiles()
            .first()
            .map_or(Point::ORIGIN, Tile::position);
        self.center_on(target, Some(self.config.start_zoom));
    }

    /// Updates the viewport size, keeping the camera position and zoom.
    pub fn resize(&mut self, viewport: Size) {
        self.camera.set_viewport_size(viewport);
        self.needs_render = true;
    }

    /// Pans by a screen-space delta.
    pub fn pan(&mut self, delta: Vec2) {
        self.apply(CameraCommand::Pan(delta));
    }

    /// Zooms by `factor` around a screen point.
    pub fn zoom_at(&mut self, factor: f64, anchor: Point) -> ZoomOutcome {
        let outcome = self.camera.zoom_at(factor, anchor);
        if outcome.is_applied() {
            self.needs_render = true;
        }
        outcome
    }

    /// Mouse button pressed.
    pub fn pointer_down(&mut self, pos: Point) {
        self.gestures.pointer_down(pos);
    }

    /// Mouse moved.
    pub fn pointer_move(&mut self, pos: Point) {
        if let Some(cmd) = self.gestures.pointer_move(pos) {
            self.apply(cmd);
        }
    }

    /// Mouse button released or pointer left.
    pub fn pointer_up(&mut self) {
        self.gestures.pointer_up();
    }

    /// Wheel scrolled at `pos`.
    pub fn wheel(&mut self, delta_y: f64, pos: Point) {
        if let Some(cmd) = self.gestures.wheel(delta_y, pos) {
            self.apply(cmd);
        }
    }

    /// Touches started.
    pub fn touch_start(&mut self, touches: &[Point]) {
        self.gestures.touch_start(touches);
    }

    /// Touches moved; pinches zoom about the viewport center.
    pub fn touch_move(&mut self, touches: &[Point]) {
        let viewport = self.camera.viewport_size();
        let center = Point::new(viewport.width / 2.0, viewport.height / 2.0);
        if let Some(cmd) = self.gestures.touch_move(touches, center) {
            self.apply(cmd);
        }
    }

    /// Touches ended; `remaining` are still down.
    pub fn touch_end(&mut self, remaining: &[Point]) {
        self.gestures.touch_end(remaining);
    }

    /// Finds a free position for a tile of the given footprint without
    /// committing it.
    pub fn place_next(&mut self, footprint: u32) -> Result<Point, CanvasError> {
        let footprint = self.footprint(footprint)?;
        let placement = self.find_block(footprint)?;
        Ok(self.store.base().cell_origin(placement.cell))
    }

    /// Places, stores and focuses a new tile.
    ///
    /// The tile gets the next free id, its image is queued for loading, and
    /// the camera centers on it at the focus zoom.
    pub fn create_tile(&mut self, request: TileRequest) -> Result<&Tile, CanvasError> {
        let footprint = self.footprint(request.footprint)?;
        let id = self.store.next_id()?;
        let placement = self.find_block(footprint)?;
        let base = self.store.base();
        let mut tile = Tile::new(id, base.cell_origin(placement.cell), footprint);
        tile.image = request.image;
        tile.caption = request.caption;
        tile.owner = request.owner;
        tile.for_sale = request.for_sale;
        tile.price = if request.for_sale { request.price } else { 0.0 };

        let center = tile.center(base);
        self.store.add_tile(tile)?;
        self.camera.center_on(center, Some(self.config.focus_zoom));
        self.needs_render = true;
        log::info!("created tile {id} via {} placement", placement.strategy);
        self.store.get(id).ok_or(CanvasError::Store(StoreError::UnknownTile(id)))
    }

    /// Drains image references the host should start fetching.
    pub fn take_image_requests(&mut self) -> Vec<ImageRef> {
        self.store.images_mut().take_pending_requests()
    }

    /// Reports a finished image load.
    ///
    /// Returns images the cache evicted; the host destroys them on its
    /// backend.
    pub fn image_loaded(&mut self, key: &ImageRef, image: LoadedImage) -> Vec<LoadedImage> {
        self.needs_render = true;
        self.store.images_mut().image_loaded(key, image)
    }

    /// Reports a failed image load. The tile keeps its placeholder.
    pub fn image_failed(&mut self, key: &ImageRef) {
        self.store.images_mut().image_failed(key);
        self.needs_render = true;
    }

    fn footprint(&self, side: u32) -> Result<Footprint, CanvasError> {
        Footprint::bounded(side, self.config.placement.max_footprint)
            .ok_or(CanvasError::InvalidFootprint(side))
    }

    fn find_block(&mut self, footprint: Footprint) -> Result<Placement, PlacementError> {
        self.placer
            .place(self.store.occupancy(), footprint, &mut self.rng)
    }

    fn apply(&mut self, cmd: CameraCommand) {
        match cmd {
            CameraCommand::Pan(delta) => {
                self.camera.pan_by_screen(delta);
                self.needs_render = true;
            }
            CameraCommand::Zoom { factor, anchor } => {
                self.zoom_at(factor, anchor);
            }
        }
    }
}
