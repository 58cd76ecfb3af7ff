//! Typed litematic structure model.
//!
//! A [`Structure`] holds one or more named [`Region`]s. Each region stores
//! its blocks as palette indices in y-outer, z-middle, x-inner order relative
//! to the region's normalized minimum corner.

mod builder;
mod export;
pub mod packing;

pub use builder::{build, build_with_limit};
pub use export::encode_litematic;

use crate::config::AirIds;
use crate::types::{BlockState, Bounds};
use glam::IVec3;
use serde::{Deserialize, Serialize};

/// Descriptive metadata carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub name: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub time_created: Option<i64>,
    pub time_modified: Option<i64>,
}

/// A decoded litematic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    pub version: i32,
    pub sub_version: Option<i32>,
    pub minecraft_data_version: Option<i32>,
    pub metadata: Metadata,
    /// Regions in declaration order.
    pub regions: Vec<Region>,
}

impl Structure {
    /// An empty version-6 structure.
    pub fn new() -> Self {
        Self {
            version: 6,
            sub_version: None,
            minecraft_data_version: None,
            metadata: Metadata::default(),
            regions: Vec::new(),
        }
    }

    pub fn region(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.name == name)
    }

    /// Union of all non-empty region bounds, `None` when there are none.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::enclosing(
            self.regions
                .iter()
                .map(Region::bounds)
                .filter(|b| !b.is_empty()),
        )
    }

    /// Sum of region volumes.
    pub fn total_volume(&self) -> u64 {
        self.regions.iter().map(Region::volume).sum()
    }

    /// Number of non-air cells across all regions.
    pub fn non_air_count(&self, air: &AirIds) -> u64 {
        self.regions.iter().map(|r| r.non_air_count(air)).sum()
    }

    /// The visible block at a world position.
    ///
    /// Where regions overlap, the first region in declaration order that has
    /// a non-air block at `pos` wins.
    pub fn block_at(&self, pos: IVec3, air: &AirIds) -> Option<&BlockState> {
        self.regions.iter().find_map(|r| {
            let index = *r.blocks.get(r.index(pos - r.bounds().min)?)? as usize;
            if index == 0 {
                return None;
            }
            r.palette.get(index).filter(|b| !air.is_air(b))
        })
    }
}

impl Default for Structure {
    fn default() -> Self {
        Self::new()
    }
}

/// One named box of blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    /// Origin as stored in the file.
    pub position: IVec3,
    /// Signed size as stored in the file; negative components extend
    /// toward smaller coordinates.
    pub size: IVec3,
    /// Index 0 is the default (air) state.
    pub palette: Vec<BlockState>,
    /// Palette indices, length `|size.x * size.y * size.z|`.
    pub blocks: Vec<u32>,
}

impl Region {
    /// An all-air region.
    pub fn new(name: impl Into<String>, position: IVec3, size: IVec3) -> Self {
        let volume = Bounds::from_position_and_size(position, size).volume() as usize;
        Self {
            name: name.into(),
            position,
            size,
            palette: vec![BlockState::new("minecraft:air")],
            blocks: vec![0; volume],
        }
    }

    /// Normalized world-space box.
    pub fn bounds(&self) -> Bounds {
        Bounds::from_position_and_size(self.position, self.size)
    }

    /// Absolute extent on each axis.
    pub fn dimensions(&self) -> IVec3 {
        self.size.abs()
    }

    pub fn volume(&self) -> u64 {
        self.bounds().volume()
    }

    /// Flat index of a cell relative to the minimum corner.
    pub fn index(&self, local: IVec3) -> Option<usize> {
        let dims = self.dimensions();
        if local.cmplt(IVec3::ZERO).any() || local.cmpge(dims).any() {
            return None;
        }
        let (w, l) = (dims.x as usize, dims.z as usize);
        Some(local.x as usize + local.z as usize * w + local.y as usize * w * l)
    }

    /// Inverse of [`index`](Self::index).
    pub fn local_position(&self, index: usize) -> IVec3 {
        let dims = self.dimensions();
        let (w, l) = (dims.x as usize, dims.z as usize);
        IVec3::new(
            (index % w) as i32,
            (index / (w * l)) as i32,
            ((index / w) % l) as i32,
        )
    }

    /// Block at a position relative to the minimum corner.
    pub fn local_block(&self, local: IVec3) -> Option<&BlockState> {
        let idx = *self.blocks.get(self.index(local)?)?;
        self.palette.get(idx as usize)
    }

    /// Block at a world position, if inside this region.
    pub fn block_at(&self, pos: IVec3) -> Option<&BlockState> {
        self.local_block(pos - self.bounds().min)
    }

    /// Set a block relative to the minimum corner, growing the palette as
    /// needed. Returns false when `local` is outside the region.
    pub fn set_block(&mut self, local: IVec3, block: &BlockState) -> bool {
        let Some(cell) = self.index(local) else {
            return false;
        };
        let palette_index = match self.palette.iter().position(|b| b == block) {
            Some(i) => i,
            None => {
                self.palette.push(block.clone());
                self.palette.len() - 1
            }
        };
        self.blocks[cell] = palette_index as u32;
        true
    }

    /// Per-palette-entry flag: true for entries that are not air.
    ///
    /// Index 0 is always air; other entries are air when their name is in
    /// `air`.
    pub fn solid_mask(&self, air: &AirIds) -> Vec<bool> {
        self.palette
            .iter()
            .enumerate()
            .map(|(i, b)| i != 0 && !air.is_air(b))
            .collect()
    }

    pub fn non_air_count(&self, air: &AirIds) -> u64 {
        let solid = self.solid_mask(air);
        self.blocks
            .iter()
            .filter(|&&i| solid.get(i as usize).copied().unwrap_or(false))
            .count() as u64
    }
}
