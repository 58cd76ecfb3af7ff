//! Engine configuration.

use crate::nbt::DEFAULT_MAX_INFLATED;
use crate::render::ColorMap;
use crate::types::BlockState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default upper bound on cells in a single region (2^28).
pub const DEFAULT_MAX_REGION_VOLUME: u64 = 1 << 28;

/// Default upper bound on pixels in one rendered view (4096 x 4096).
pub const DEFAULT_MAX_RENDER_PIXELS: u64 = 1 << 24;

/// Block names treated as empty space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AirIds(BTreeSet<String>);

impl Default for AirIds {
    fn default() -> Self {
        Self::new(["minecraft:air", "minecraft:cave_air", "minecraft:void_air"])
    }
}

impl AirIds {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(ids.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn is_air(&self, block: &BlockState) -> bool {
        self.contains(&block.name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Main engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Block names that count as air in addition to palette index 0.
    pub air_ids: AirIds,
    /// Largest region volume the model builder will allocate.
    pub max_region_volume: u64,
    /// Largest inflated size accepted from a gzip container.
    pub max_inflated_bytes: u64,
    /// Largest width x height a single rendered view may have.
    pub max_render_pixels: u64,
    /// Explicit block colors; names not listed get a hashed color.
    pub colors: ColorMap,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            air_ids: AirIds::default(),
            max_region_volume: DEFAULT_MAX_REGION_VOLUME,
            max_inflated_bytes: DEFAULT_MAX_INFLATED,
            max_render_pixels: DEFAULT_MAX_RENDER_PIXELS,
            colors: ColorMap::builtin(),
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON; missing keys keep their defaults.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_air_ids(mut self, air_ids: AirIds) -> Self {
        self.air_ids = air_ids;
        self
    }

    pub fn with_max_region_volume(mut self, limit: u64) -> Self {
        self.max_region_volume = limit;
        self
    }

    pub fn with_max_inflated_bytes(mut self, limit: u64) -> Self {
        self.max_inflated_bytes = limit;
        self
    }

    pub fn with_max_render_pixels(mut self, limit: u64) -> Self {
        self.max_render_pixels = limit;
        self
    }

    /// Replace the color table (the built-in table is dropped).
    pub fn with_colors(mut self, colors: ColorMap) -> Self {
        self.colors = colors;
        self
    }
}
