//! Region tiling ("assembly").
//!
//! Each [`AssemblyEntry`] places a grid of copies of one region. Copies step
//! by exactly one region extent, so neighbours abut without gaps or overlap.
//! `counts.along` copies go in the entry's [`GenerateDirection`];
//! `counts.across` repeats that line along the direction's secondary axis.

use crate::error::TileError;
use crate::schematic::{Region, Structure};
use crate::types::{Bounds, GenerateDirection};
use glam::{I64Vec3, IVec3};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Range;

/// Copy multipliers supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileCounts {
    /// Copies along the generate direction.
    pub along: u32,
    /// Rows of copies along the secondary axis.
    pub across: u32,
}

impl Default for TileCounts {
    fn default() -> Self {
        Self { along: 1, across: 1 }
    }
}

impl TileCounts {
    pub fn new(along: u32, across: u32) -> Self {
        Self { along, across }
    }
}

/// One tiling request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyEntry {
    pub region_name: String,
    /// Minimum corner of the first copy.
    pub position: I64Vec3,
    pub generate_direction: GenerateDirection,
    #[serde(default)]
    pub counts: TileCounts,
}

impl AssemblyEntry {
    pub fn new(
        region_name: impl Into<String>,
        position: I64Vec3,
        generate_direction: GenerateDirection,
        counts: TileCounts,
    ) -> Self {
        Self {
            region_name: region_name.into(),
            position,
            generate_direction,
            counts,
        }
    }
}

/// Ordered list of tiling requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyConfig {
    pub entries: Vec<AssemblyEntry>,
}

impl AssemblyConfig {
    pub fn new(entries: Vec<AssemblyEntry>) -> Self {
        Self { entries }
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn union(acc: Option<Bounds>, b: Bounds) -> Bounds {
    acc.map_or(b, |a| a.union(&b))
}

fn to_ivec3(v: I64Vec3) -> Option<IVec3> {
    Some(IVec3::new(
        i32::try_from(v.x).ok()?,
        i32::try_from(v.y).ok()?,
        i32::try_from(v.z).ok()?,
    ))
}

/// Copies produced by one finished entry.
struct PlacedEntry {
    bounds: Bounds,
    regions: Range<usize>,
}

/// Build a new structure made only of tiled copies.
///
/// The input is left untouched; every copy owns its own palette and block
/// array. Copies that would overlap each other are rejected, as is a result
/// whose enclosing box does not fit `i32`.
pub fn tile(structure: &Structure, config: &AssemblyConfig) -> Result<Structure, TileError> {
    let mut regions: Vec<Region> = Vec::new();
    let mut placed: Vec<PlacedEntry> = Vec::new();
    let mut enclosing: Option<Bounds> = None;
    let mut names: HashSet<String> = HashSet::new();
    let mut used_sources: HashSet<&str> = HashSet::new();

    for (entry_index, entry) in config.entries.iter().enumerate() {
        let source = structure
            .region(&entry.region_name)
            .ok_or_else(|| TileError::UnknownRegion(entry.region_name.clone()))?;

        let TileCounts { along, across } = entry.counts;
        if along < 1 || across < 1 {
            return Err(TileError::InvalidCount {
                region: source.name.clone(),
                along,
                across,
            });
        }

        let prefix = if used_sources.insert(source.name.as_str()) {
            source.name.clone()
        } else {
            format!("{}_{}", source.name, entry_index)
        };

        let dims = source.dimensions().as_i64vec3();
        let dir = entry.generate_direction;
        let primary = dir.axis().unit().as_i64vec3() * dir.sign() as i64 * dims;
        let secondary = dir.secondary_axis().unit().as_i64vec3() * dims;
        let first_copy = regions.len();
        let mut entry_bounds: Option<Bounds> = None;

        for i in 0..along {
            for j in 0..across {
                let min = entry.position + primary * i as i64 + secondary * j as i64;
                let out_of_range = || TileError::OutOfRange(source.name.clone());
                let min = to_ivec3(min).ok_or_else(out_of_range)?;
                to_ivec3(min.as_i64vec3() + dims).ok_or_else(out_of_range)?;

                // Keep the source's size sign: for a negative component the
                // stored position is the far (exclusive) corner.
                let position = IVec3::select(source.size.cmplt(IVec3::ZERO), min - source.size, min);
                let copy = Region {
                    name: format!("{}_copy_{}_{}", prefix, i, j),
                    position,
                    size: source.size,
                    palette: source.palette.clone(),
                    blocks: source.blocks.clone(),
                };

                let copy_bounds = copy.bounds();
                let all = union(enclosing, copy_bounds);
                if !all.fits_i32() {
                    return Err(out_of_range());
                }
                enclosing = Some(all);

                // Copies of one entry step by a full extent and never overlap
                // each other, so only earlier entries need checking.
                let clash = placed
                    .iter()
                    .filter(|p| p.bounds.intersects(&copy_bounds))
                    .flat_map(|p| &regions[p.regions.clone()])
                    .find(|r| r.bounds().intersects(&copy_bounds));
                if let Some(other) = clash {
                    return Err(TileError::Overlap {
                        first: other.name.clone(),
                        second: copy.name,
                    });
                }
                if !names.insert(copy.name.clone()) {
                    return Err(TileError::DuplicateName(copy.name));
                }
                entry_bounds = Some(union(entry_bounds, copy_bounds));
                regions.push(copy);
            }
        }

        if let Some(bounds) = entry_bounds {
            placed.push(PlacedEntry {
                bounds,
                regions: first_copy..regions.len(),
            });
        }
    }

    log::info!(
        "tiled {} region copies from {} assembly entries",
        regions.len(),
        config.entries.len()
    );

    Ok(Structure {
        version: structure.version,
        sub_version: structure.sub_version,
        minecraft_data_version: structure.minecraft_data_version,
        metadata: structure.metadata.clone(),
        regions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AirIds;
    use crate::materials::aggregate;
    use crate::types::BlockState;
    use assert_matches::assert_matches;

    fn cube(name: &str, position: IVec3, size: IVec3) -> Region {
        let mut region = Region::new(name, position, size);
        for i in 0..region.blocks.len() {
            let local = region.local_position(i);
            if local.y < 2 {
                region.set_block(local, &BlockState::new("minecraft:stone"));
            } else if local.x == local.z {
                region.set_block(local, &BlockState::new("minecraft:glass"));
            }
        }
        region
    }

    fn single(region: Region) -> Structure {
        let mut s = Structure::new();
        s.regions.push(region);
        s
    }

    #[test]
    fn test_three_copies_along_x() {
        let source = single(cube("base", IVec3::ZERO, IVec3::splat(4)));
        let config = AssemblyConfig::new(vec![AssemblyEntry::new(
            "base",
            I64Vec3::ZERO,
            GenerateDirection::PosX,
            TileCounts::new(3, 1),
        )]);

        let tiled = tile(&source, &config).unwrap();
        assert_eq!(tiled.regions.len(), 3);

        let bounds: Vec<_> = tiled.regions.iter().map(Region::bounds).collect();
        for (k, b) in bounds.iter().enumerate() {
            assert_eq!(b.min, IVec3::new(4 * k as i32, 0, 0));
            assert_eq!(b.max, IVec3::new(4 * k as i32 + 4, 4, 4));
        }
        for a in 0..3 {
            for b in (a + 1)..3 {
                assert!(!bounds[a].intersects(&bounds[b]));
            }
        }

        let air = AirIds::default();
        let single_total = aggregate(&source, &air).total();
        assert_eq!(aggregate(&tiled, &air).total(), 3 * single_total);
        assert_eq!(tiled.regions[2].name, "base_copy_2_0");
    }

    #[test]
    fn test_negative_direction_and_grid() {
        let source = single(cube("tower", IVec3::ZERO, IVec3::new(2, 3, 5)));
        let config = AssemblyConfig::new(vec![AssemblyEntry::new(
            "tower",
            I64Vec3::new(10, 0, 0),
            GenerateDirection::NegX,
            TileCounts::new(2, 3),
        )]);

        let tiled = tile(&source, &config).unwrap();
        assert_eq!(tiled.regions.len(), 6);
        let enclosing = tiled.bounds().unwrap();
        assert_eq!(enclosing.min, IVec3::new(8, 0, 0));
        assert_eq!(enclosing.max, IVec3::new(12, 3, 15));
        assert_eq!(tiled.total_volume(), 6 * source.total_volume());
    }

    #[test]
    fn test_negative_size_source_keeps_sign() {
        let source = single(cube("neg", IVec3::splat(5), IVec3::splat(-2)));
        let config = AssemblyConfig::new(vec![AssemblyEntry::new(
            "neg",
            I64Vec3::new(3, 3, 3),
            GenerateDirection::PosZ,
            TileCounts::new(2, 1),
        )]);

        let tiled = tile(&source, &config).unwrap();
        assert_eq!(tiled.regions[0].size, IVec3::splat(-2));
        assert_eq!(tiled.regions[0].bounds(), source.regions[0].bounds());
        assert_eq!(tiled.regions[1].bounds().min, IVec3::new(3, 3, 5));
        assert_eq!(tiled.regions[1].blocks, source.regions[0].blocks);
    }

    #[test]
    fn test_source_untouched() {
        let source = single(cube("base", IVec3::ZERO, IVec3::splat(2)));
        let before = source.clone();
        let config = AssemblyConfig::new(vec![AssemblyEntry::new(
            "base",
            I64Vec3::new(0, 10, 0),
            GenerateDirection::PosY,
            TileCounts::new(2, 1),
        )]);
        let mut tiled = tile(&source, &config).unwrap();
        tiled.regions[0].blocks[0] = 99;
        assert_eq!(source, before);
    }

    #[test]
    fn test_unknown_region() {
        let source = single(cube("base", IVec3::ZERO, IVec3::ONE));
        let config = AssemblyConfig::new(vec![AssemblyEntry::new(
            "missing",
            I64Vec3::ZERO,
            GenerateDirection::PosX,
            TileCounts::default(),
        )]);
        assert_matches!(tile(&source, &config), Err(TileError::UnknownRegion(n)) if n == "missing");
    }

    #[test]
    fn test_invalid_count() {
        let source = single(cube("base", IVec3::ZERO, IVec3::ONE));
        let config = AssemblyConfig::new(vec![AssemblyEntry::new(
            "base",
            I64Vec3::ZERO,
            GenerateDirection::PosX,
            TileCounts::new(0, 1),
        )]);
        assert_matches!(tile(&source, &config), Err(TileError::InvalidCount { along: 0, .. }));
    }

    #[test]
    fn test_overlapping_entries_rejected() {
        let source = single(cube("base", IVec3::ZERO, IVec3::splat(4)));
        let config = AssemblyConfig::new(vec![
            AssemblyEntry::new(
                "base",
                I64Vec3::ZERO,
                GenerateDirection::PosX,
                TileCounts::new(2, 1),
            ),
            AssemblyEntry::new(
                "base",
                I64Vec3::new(6, 0, 0),
                GenerateDirection::PosZ,
                TileCounts::new(2, 1),
            ),
        ]);
        assert_matches!(
            tile(&source, &config),
            Err(TileError::Overlap { first, second })
                if first == "base_copy_1_0" && second == "base_1_copy_0_0"
        );
    }

    #[test]
    fn test_multi_segment_naming() {
        let source = single(cube("base", IVec3::ZERO, IVec3::splat(2)));
        let config = AssemblyConfig::new(vec![
            AssemblyEntry::new(
                "base",
                I64Vec3::ZERO,
                GenerateDirection::PosX,
                TileCounts::new(2, 1),
            ),
            AssemblyEntry::new(
                "base",
                I64Vec3::new(0, 0, 2),
                GenerateDirection::PosZ,
                TileCounts::new(2, 1),
            ),
        ]);
        let names: Vec<String> = tile(&source, &config)
            .unwrap()
            .regions
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(
            names,
            vec!["base_copy_0_0", "base_copy_1_0", "base_1_copy_0_0", "base_1_copy_1_0"]
        );
    }

    #[test]
    fn test_out_of_range() {
        let source = single(cube("base", IVec3::ZERO, IVec3::splat(2)));
        let config = AssemblyConfig::new(vec![AssemblyEntry::new(
            "base",
            I64Vec3::new(i32::MAX as i64 - 1, 0, 0),
            GenerateDirection::PosX,
            TileCounts::default(),
        )]);
        assert_matches!(tile(&source, &config), Err(TileError::OutOfRange(_)));
    }

    #[test]
    fn test_far_apart_entries_out_of_range() {
        let source = single(cube("base", IVec3::ZERO, IVec3::ONE));
        let config = AssemblyConfig::new(vec![
            AssemblyEntry::new(
                "base",
                I64Vec3::new(-2_000_000_000, 0, 0),
                GenerateDirection::PosX,
                TileCounts::default(),
            ),
            AssemblyEntry::new(
                "base",
                I64Vec3::new(2_000_000_000, 0, 0),
                GenerateDirection::PosX,
                TileCounts::default(),
            ),
        ]);
        assert_matches!(tile(&source, &config), Err(TileError::OutOfRange(n)) if n == "base");
    }

    #[test]
    fn test_large_grid_with_later_entry() {
        let source = single(cube("base", IVec3::ZERO, IVec3::ONE));
        let config = AssemblyConfig::new(vec![
            AssemblyEntry::new(
                "base",
                I64Vec3::ZERO,
                GenerateDirection::PosX,
                TileCounts::new(200, 200),
            ),
            AssemblyEntry::new(
                "base",
                I64Vec3::new(0, 1, 0),
                GenerateDirection::PosX,
                TileCounts::new(200, 1),
            ),
        ]);
        let tiled = tile(&source, &config).unwrap();
        assert_eq!(tiled.regions.len(), 200 * 200 + 200);
        let bounds = tiled.bounds().unwrap();
        assert_eq!(bounds.max, IVec3::new(200, 2, 200));

        // A later copy landing inside the grid is still caught.
        let config = AssemblyConfig::new(vec![
            AssemblyEntry::new(
                "base",
                I64Vec3::ZERO,
                GenerateDirection::PosX,
                TileCounts::new(200, 200),
            ),
            AssemblyEntry::new(
                "base",
                I64Vec3::new(150, 0, 199),
                GenerateDirection::PosY,
                TileCounts::new(1, 1),
            ),
        ]);
        assert_matches!(
            tile(&source, &config),
            Err(TileError::Overlap { first, second })
                if first == "base_copy_150_199" && second == "base_1_copy_0_0"
        );
    }

    #[test]
    fn test_config_from_json() {
        let config = AssemblyConfig::from_json(
            r#"{ "entries": [ { "region_name": "base", "position": [1, 2, 3], "generate_direction": "-z" } ] }"#,
        )
        .unwrap();
        let entry = &config.entries[0];
        assert_eq!(entry.position, I64Vec3::new(1, 2, 3));
        assert_eq!(entry.generate_direction, GenerateDirection::NegZ);
        assert_eq!(entry.counts, TileCounts::default());
    }
}
