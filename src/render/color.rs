//! Block colors for silhouette rendering.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// RGBA8 color.
pub type Rgba = [u8; 4];

/// Approximate map colors for common blocks.
const BUILTIN_COLORS: &[(&str, Rgba)] = &[
    ("minecraft:stone", [125, 125, 125, 255]),
    ("minecraft:cobblestone", [122, 122, 122, 255]),
    ("minecraft:smooth_stone", [158, 158, 158, 255]),
    ("minecraft:stone_bricks", [122, 121, 122, 255]),
    ("minecraft:andesite", [136, 136, 137, 255]),
    ("minecraft:diorite", [188, 188, 188, 255]),
    ("minecraft:granite", [149, 103, 86, 255]),
    ("minecraft:deepslate", [80, 80, 82, 255]),
    ("minecraft:dirt", [134, 96, 67, 255]),
    ("minecraft:grass_block", [127, 178, 56, 255]),
    ("minecraft:sand", [219, 207, 163, 255]),
    ("minecraft:gravel", [131, 127, 126, 255]),
    ("minecraft:water", [64, 64, 255, 255]),
    ("minecraft:lava", [255, 90, 0, 255]),
    ("minecraft:oak_planks", [162, 130, 78, 255]),
    ("minecraft:spruce_planks", [114, 84, 48, 255]),
    ("minecraft:birch_planks", [192, 175, 121, 255]),
    ("minecraft:oak_log", [109, 85, 50, 255]),
    ("minecraft:glass", [175, 213, 219, 255]),
    ("minecraft:white_wool", [233, 236, 236, 255]),
    ("minecraft:white_concrete", [207, 213, 214, 255]),
    ("minecraft:black_concrete", [8, 10, 15, 255]),
    ("minecraft:iron_block", [220, 220, 220, 255]),
    ("minecraft:gold_block", [246, 208, 61, 255]),
    ("minecraft:redstone_block", [175, 24, 5, 255]),
    ("minecraft:redstone_wire", [171, 6, 0, 255]),
    ("minecraft:hopper", [67, 67, 67, 255]),
    ("minecraft:chest", [163, 119, 47, 255]),
    ("minecraft:slime_block", [111, 192, 91, 255]),
    ("minecraft:honey_block", [251, 185, 52, 255]),
    ("minecraft:obsidian", [15, 10, 24, 255]),
    ("minecraft:netherrack", [97, 38, 38, 255]),
    ("minecraft:glowstone", [171, 131, 84, 255]),
    ("minecraft:sea_lantern", [172, 199, 190, 255]),
];

static BUILTIN: Lazy<ColorMap> = Lazy::new(|| {
    ColorMap::new(
        BUILTIN_COLORS
            .iter()
            .map(|(name, rgba)| (name.to_string(), *rgba))
            .collect(),
    )
});

/// Explicit block name to color table.
///
/// Immutable once built; clones share the same table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorMap(Arc<HashMap<String, Rgba>>);

impl ColorMap {
    pub fn new(entries: HashMap<String, Rgba>) -> Self {
        Self(Arc::new(entries))
    }

    /// The process-wide built-in table.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Parse a JSON object of `"minecraft:stone": [r, g, b, a]` pairs.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let entries: HashMap<String, Rgba> = serde_json::from_str(json)?;
        Ok(Self::new(entries))
    }

    /// A new table with `overrides` layered over this one.
    pub fn extended(&self, overrides: HashMap<String, Rgba>) -> Self {
        let mut entries = (*self.0).clone();
        entries.extend(overrides);
        Self::new(entries)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Explicit color if listed, otherwise [`hashed_color`].
    pub fn color_for(&self, name: &str) -> Rgba {
        self.0.get(name).copied().unwrap_or_else(|| hashed_color(name))
    }
}

/// Stable color derived from a block name (FNV-1a, fully opaque).
pub fn hashed_color(name: &str) -> Rgba {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    let hash = name
        .bytes()
        .fold(OFFSET, |h, b| (h ^ b as u64).wrapping_mul(PRIME));
    let [r, g, b, ..] = hash.to_le_bytes();
    [r, g, b, 255]
}
