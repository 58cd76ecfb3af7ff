//! Shared types used throughout the library.

mod direction;

pub use direction::{Axis, GenerateDirection};

use glam::{I64Vec3, IVec3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A block state, e.g. `minecraft:oak_stairs[facing=north,half=bottom]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockState {
    /// Block name, e.g., "minecraft:stone"
    pub name: String,
    /// Block properties, e.g., {"facing": "north"}
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

impl BlockState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Get the namespace (e.g., "minecraft").
    pub fn namespace(&self) -> &str {
        match self.name.split_once(':') {
            Some((namespace, _)) => namespace,
            None => "minecraft",
        }
    }

    /// Get the block ID without namespace (e.g., "stone").
    pub fn block_id(&self) -> &str {
        match self.name.split_once(':') {
            Some((_, id)) => id,
            None => &self.name,
        }
    }

    /// Name plus sorted properties, used as the material table key.
    pub fn canonical_key(&self) -> String {
        if self.properties.is_empty() {
            return self.name.clone();
        }
        let props: Vec<String> = self
            .properties
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        format!("{}[{}]", self.name, props.join(","))
    }
}

impl std::fmt::Display for BlockState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.canonical_key())
    }
}

/// An integer axis-aligned box covering `[min, max)` on every axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    pub min: IVec3,
    pub max: IVec3,
}

impl Bounds {
    pub fn new(min: IVec3, max: IVec3) -> Self {
        Self { min, max }
    }

    /// Normalize a litematic position/size pair.
    ///
    /// A negative size component extends from `position` toward smaller
    /// coordinates, so `position = 5, size = -2` covers 3 and 4.
    pub fn from_position_and_size(position: IVec3, size: IVec3) -> Self {
        let a = position;
        let b = position + size;
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Exact per-axis extent; cannot overflow.
    pub fn extent(&self) -> I64Vec3 {
        self.max.as_i64vec3() - self.min.as_i64vec3()
    }

    /// Per-axis extent, saturating at `i32::MAX`.
    pub fn dimensions(&self) -> IVec3 {
        self.extent()
            .clamp(I64Vec3::ZERO, I64Vec3::splat(i32::MAX as i64))
            .as_ivec3()
    }

    /// True when every extent fits in an `i32`.
    pub fn fits_i32(&self) -> bool {
        self.extent().max_element() <= i32::MAX as i64
    }

    pub fn volume(&self) -> u64 {
        let e = self.extent().max(I64Vec3::ZERO);
        (e.x as u64)
            .saturating_mul(e.y as u64)
            .saturating_mul(e.z as u64)
    }

    pub fn is_empty(&self) -> bool {
        self.volume() == 0
    }

    pub fn contains(&self, p: IVec3) -> bool {
        p.cmpge(self.min).all() && p.cmplt(self.max).all()
    }

    /// True when the two boxes share at least one cell.
    pub fn intersects(&self, other: &Bounds) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min.cmplt(other.max).all()
            && other.min.cmplt(self.max).all()
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Union of all boxes, or `None` for an empty iterator.
    pub fn enclosing(boxes: impl Iterator<Item = Bounds>) -> Option<Bounds> {
        boxes.reduce(|acc, b| acc.union(&b))
    }
}
