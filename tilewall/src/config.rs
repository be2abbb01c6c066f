// Copyright 2026 the Tilewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use tilewall_layout::{PlacementConfig, TileSize};
use tilewall_render::RenderStyle;
use tilewall_view::{DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, DEFAULT_ZOOM};

/// A configuration value that cannot be used.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Tile dimensions must be finite and positive.
    #[error("tile size {width}x{height} must be finite and positive")]
    TileSize {
        /// Configured width.
        width: f64,
        /// Configured height.
        height: f64,
    },
    /// Zoom limits must satisfy `0 < min <= max`.
    #[error("zoom limits [{min}, {max}] must satisfy 0 < min <= max")]
    ZoomLimits {
        /// Configured minimum.
        min: f64,
        /// Configured maximum.
        max: f64,
    },
    /// The wheel intensity must be finite and positive.
    #[error("wheel intensity {0} must be finite and positive")]
    WheelIntensity(f64),
    /// Tiles must be allowed at least one cell.
    #[error("maximum footprint must be at least 1")]
    MaxFootprint,
    /// A bounded image cache must hold at least one image.
    #[error("image cache capacity must be at least 1")]
    CacheCapacity,
}

/// Settings for a [`Canvas`](crate::Canvas).
///
/// With the `serde` feature every field except `style` can be read from a
/// config file; missing fields keep their defaults.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CanvasConfig {
    /// Base tile dimensions.
    pub tile_size: TileSize,
    /// Smallest zoom.
    pub min_zoom: f64,
    /// Largest zoom.
    pub max_zoom: f64,
    /// Zoom used at startup and by [`Canvas::reset_view`](crate::Canvas::reset_view).
    pub start_zoom: f64,
    /// Zoom used to show a newly created tile.
    pub focus_zoom: f64,
    /// One wheel notch scales the zoom by `e^wheel_intensity`.
    pub wheel_intensity: f64,
    /// Placement engine tuning.
    pub placement: PlacementConfig,
    /// Loaded images kept before the least recently drawn one is evicted.
    /// `None` keeps every image.
    pub image_cache_capacity: Option<usize>,
    /// Frame style.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub style: RenderStyle,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            tile_size: TileSize::default(),
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            start_zoom: DEFAULT_ZOOM,
            focus_zoom: 0.8,
            wheel_intensity: 0.1,
            placement: PlacementConfig::default(),
            image_cache_capacity: None,
            style: RenderStyle::default(),
        }
    }
}

impl CanvasConfig {
    /// Checks the values a canvas cannot recover from.
    ///
    /// Start and focus zooms outside the limits are clamped later and are
    /// not errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tile_size.is_valid() {
            return Err(ConfigError::TileSize {
                width: self.tile_size.width,
                height: self.tile_size.height,
            });
        }
        let (min, max) = (self.min_zoom, self.max_zoom);
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            return Err(ConfigError::ZoomLimits { min, max });
        }
        if !(self.wheel_intensity.is_finite() && self.wheel_intensity > 0.0) {
            return Err(ConfigError::WheelIntensity(self.wheel_intensity));
        }
        if self.placement.max_footprint == 0 {
            return Err(ConfigError::MaxFootprint);
        }
        if self.image_cache_capacity == Some(0) {
            return Err(ConfigError::CacheCapacity);
        }
        Ok(())
    }

    /// Zoom factor of one wheel notch.
    #[must_use]
    pub fn wheel_step(&self) -> f64 {
        self.wheel_intensity.exp()
    }
}
