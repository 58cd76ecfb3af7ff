//! Typed [`Structure`] back to a litematic tag tree.

use super::packing;
use super::{Region, Structure};
use crate::config::AirIds;
use crate::error::EncodeError;
use crate::nbt::{self, TagValue};
use crate::types::BlockState;
use glam::IVec3;

/// Gzip level used for exported files.
const EXPORT_COMPRESSION: u32 = 3;

/// Serialize a structure as a gzip-compressed litematic.
///
/// `air` decides which cells count toward the `TotalBlocks` metadata field.
pub fn encode_litematic(structure: &Structure, air: &AirIds) -> Result<Vec<u8>, EncodeError> {
    nbt::encode_gzip(
        &structure.to_tag(air),
        "",
        flate2::Compression::new(EXPORT_COMPRESSION),
    )
}

fn vec3_tag(v: IVec3) -> TagValue {
    TagValue::compound()
        .with("x", TagValue::Int(v.x))
        .with("y", TagValue::Int(v.y))
        .with("z", TagValue::Int(v.z))
}

fn block_state_tag(block: &BlockState) -> TagValue {
    let mut tag = TagValue::compound().with("Name", TagValue::String(block.name.clone()));
    if !block.properties.is_empty() {
        let props = block
            .properties
            .iter()
            .map(|(k, v)| (k.clone(), TagValue::String(v.clone())))
            .collect();
        tag.insert("Properties", TagValue::Compound(props));
    }
    tag
}

impl Region {
    /// The litematic compound for this region.
    pub fn to_tag(&self) -> TagValue {
        let bits = packing::bits_per_entry(self.palette.len());
        let palette = self.palette.iter().map(block_state_tag).collect();

        TagValue::compound()
            .with("Position", vec3_tag(self.position))
            .with("Size", vec3_tag(self.size))
            .with("BlockStatePalette", TagValue::List(palette))
            .with("BlockStates", TagValue::LongArray(packing::pack(&self.blocks, bits)))
            .with("Entities", TagValue::List(Vec::new()))
            .with("TileEntities", TagValue::List(Vec::new()))
            .with("PendingBlockTicks", TagValue::List(Vec::new()))
            .with("PendingFluidTicks", TagValue::List(Vec::new()))
    }
}

impl Structure {
    /// The litematic root compound for this structure.
    pub fn to_tag(&self, air: &AirIds) -> TagValue {
        let meta = &self.metadata;
        let enclosing = self.bounds().map(|b| b.dimensions()).unwrap_or(IVec3::ZERO);
        let total_blocks = self.non_air_count(air);
        let clamp = |n: u64| n.min(i32::MAX as u64) as i32;

        let metadata = TagValue::compound()
            .with("Name", TagValue::String(meta.name.clone().unwrap_or_default()))
            .with("Author", TagValue::String(meta.author.clone().unwrap_or_default()))
            .with(
                "Description",
                TagValue::String(meta.description.clone().unwrap_or_default()),
            )
            .with("TimeCreated", TagValue::Long(meta.time_created.unwrap_or(0)))
            .with(
                "TimeModified",
                TagValue::Long(meta.time_modified.or(meta.time_created).unwrap_or(0)),
            )
            .with("EnclosingSize", vec3_tag(enclosing))
            .with("TotalVolume", TagValue::Int(clamp(self.total_volume())))
            .with("TotalBlocks", TagValue::Int(clamp(total_blocks)))
            .with("RegionCount", TagValue::Int(clamp(self.regions.len() as u64)));

        let regions = self
            .regions
            .iter()
            .map(|r| (r.name.clone(), r.to_tag()))
            .collect();

        let mut root = TagValue::compound()
            .with("Version", TagValue::Int(self.version));
        if let Some(sub) = self.sub_version {
            root.insert("SubVersion", TagValue::Int(sub));
        }
        if let Some(data_version) = self.minecraft_data_version {
            root.insert("MinecraftDataVersion", TagValue::Int(data_version));
        }
        root.with("Metadata", metadata)
            .with("Regions", TagValue::Compound(regions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schematic::build;

    #[test]
    fn test_export_then_build() {
        let mut region = Region::new("main", IVec3::new(2, 0, -1), IVec3::new(-3, 2, 2));
        let stairs = BlockState::new("minecraft:oak_stairs").with_property("facing", "east");
        for i in 0..region.blocks.len() {
            let local = region.local_position(i);
            if (local.x + local.y + local.z) % 2 == 0 {
                region.set_block(local, &stairs);
            }
        }
        region.set_block(IVec3::ZERO, &BlockState::new("minecraft:glass"));

        let mut structure = Structure::new();
        structure.minecraft_data_version = Some(3700);
        structure.metadata.name = Some("demo".into());
        structure.regions.push(region);

        let bytes = encode_litematic(&structure, &AirIds::default()).unwrap();
        let rebuilt = build(nbt::decode(&bytes).unwrap()).unwrap();
        assert_eq!(rebuilt.regions, structure.regions);
        assert_eq!(rebuilt.metadata.name.as_deref(), Some("demo"));
        assert_eq!(rebuilt.minecraft_data_version, Some(3700));
    }

    #[test]
    fn test_metadata_totals() {
        let mut region = Region::new("r", IVec3::ZERO, IVec3::new(2, 2, 2));
        region.set_block(IVec3::ZERO, &BlockState::new("minecraft:stone"));
        let mut structure = Structure::new();
        structure.regions.push(region);

        let tag = structure.to_tag(&AirIds::default());
        let meta = tag.get("Metadata").unwrap();
        assert_eq!(meta.get("TotalVolume"), Some(&TagValue::Int(8)));
        assert_eq!(meta.get("TotalBlocks"), Some(&TagValue::Int(1)));
        assert_eq!(meta.get("RegionCount"), Some(&TagValue::Int(1)));
        assert_eq!(meta.get("EnclosingSize"), Some(&vec3_tag(IVec3::splat(2))));
    }

    #[test]
    fn test_total_blocks_follows_air_ids() {
        let mut region = Region::new("r", IVec3::ZERO, IVec3::new(3, 1, 1));
        region.set_block(IVec3::ZERO, &BlockState::new("minecraft:stone"));
        region.set_block(IVec3::X, &BlockState::new("minecraft:barrier"));
        let mut structure = Structure::new();
        structure.regions.push(region);

        let default_tag = structure.to_tag(&AirIds::default());
        assert_eq!(
            default_tag.get("Metadata").and_then(|m| m.get("TotalBlocks")),
            Some(&TagValue::Int(2))
        );

        let air = AirIds::new(["minecraft:air", "minecraft:barrier"]);
        let custom_tag = structure.to_tag(&air);
        assert_eq!(
            custom_tag.get("Metadata").and_then(|m| m.get("TotalBlocks")),
            Some(&TagValue::Int(1))
        );
    }
}
