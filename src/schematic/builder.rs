//! Tag tree to typed [`Structure`].

use super::packing;
use super::{Metadata, Region, Structure};
use crate::config::DEFAULT_MAX_REGION_VOLUME;
use crate::error::ModelError;
use crate::nbt::TagValue;
use crate::types::BlockState;
use glam::IVec3;
use std::collections::{BTreeMap, HashSet};

/// Build a structure from a decoded litematic root compound.
pub fn build(root: TagValue) -> Result<Structure, ModelError> {
    build_with_limit(root, DEFAULT_MAX_REGION_VOLUME)
}

/// Like [`build`], rejecting any region with more than `max_volume` cells.
pub fn build_with_limit(root: TagValue, max_volume: u64) -> Result<Structure, ModelError> {
    let version = required(&root, "Version", "Version")
        .and_then(|tag| int_field(tag, "Version"))?;
    let sub_version = optional_int(&root, "SubVersion")?;
    let minecraft_data_version = optional_int(&root, "MinecraftDataVersion")?;

    let metadata = match root.get("Metadata") {
        Some(tag) => read_metadata(tag)?,
        None => Metadata::default(),
    };

    let entries = match root.into_compound() {
        Some(entries) => entries,
        None => {
            return Err(ModelError::InvalidField {
                field: "root".into(),
                reason: "expected a compound".into(),
            })
        }
    };
    let regions_tag = entries
        .into_iter()
        .find(|(k, _)| k == "Regions")
        .map(|(_, v)| v)
        .ok_or_else(|| ModelError::MissingField("Regions".into()))?;
    let region_entries = regions_tag
        .into_compound()
        .ok_or_else(|| invalid("Regions", "expected a compound"))?;

    let mut seen = HashSet::new();
    let mut regions = Vec::with_capacity(region_entries.len());
    for (name, tag) in region_entries {
        if !seen.insert(name.clone()) {
            return Err(ModelError::DuplicateRegion(name));
        }
        regions.push(read_region(name, &tag, max_volume)?);
    }

    let structure = Structure {
        version,
        sub_version,
        minecraft_data_version,
        metadata,
        regions,
    };
    if let Some(bounds) = structure.bounds().filter(|b| !b.fits_i32()) {
        let e = bounds.extent();
        return Err(invalid(
            "Regions",
            format!("enclosing box {}x{}x{} does not fit i32", e.x, e.y, e.z),
        ));
    }

    log::debug!(
        "built litematic v{} with {} region(s)",
        structure.version,
        structure.regions.len()
    );
    Ok(structure)
}

fn invalid(field: &str, reason: impl Into<String>) -> ModelError {
    ModelError::InvalidField {
        field: field.to_string(),
        reason: reason.into(),
    }
}

fn required<'a>(parent: &'a TagValue, key: &str, path: &str) -> Result<&'a TagValue, ModelError> {
    parent
        .get(key)
        .ok_or_else(|| ModelError::MissingField(path.to_string()))
}

fn int_field(tag: &TagValue, path: &str) -> Result<i32, ModelError> {
    tag.as_int()
        .ok_or_else(|| invalid(path, format!("expected Int, found {}", tag.type_name())))
}

fn optional_int(parent: &TagValue, key: &str) -> Result<Option<i32>, ModelError> {
    parent.get(key).map(|tag| int_field(tag, key)).transpose()
}

fn optional_string(parent: &TagValue, key: &str, path: &str) -> Result<Option<String>, ModelError> {
    match parent.get(key) {
        None => Ok(None),
        Some(tag) => tag
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| invalid(path, format!("expected String, found {}", tag.type_name()))),
    }
}

fn read_metadata(tag: &TagValue) -> Result<Metadata, ModelError> {
    if tag.as_compound().is_none() {
        return Err(invalid("Metadata", "expected a compound"));
    }
    let time = |key: &str| -> Result<Option<i64>, ModelError> {
        match tag.get(key) {
            None => Ok(None),
            Some(t) => t
                .as_integer()
                .map(Some)
                .ok_or_else(|| invalid(&format!("Metadata/{}", key), "expected an integer")),
        }
    };

    Ok(Metadata {
        name: optional_string(tag, "Name", "Metadata/Name")?,
        author: optional_string(tag, "Author", "Metadata/Author")?,
        description: optional_string(tag, "Description", "Metadata/Description")?,
        time_created: time("TimeCreated")?,
        time_modified: time("TimeModified")?,
    })
}

fn read_vec3(parent: &TagValue, key: &str, region: &str) -> Result<IVec3, ModelError> {
    let path = format!("Regions/{}/{}", region, key);
    let tag = required(parent, key, &path)?;
    if tag.as_compound().is_none() {
        return Err(invalid(&path, "expected a compound"));
    }
    let axis = |a: &str| -> Result<i32, ModelError> {
        let axis_path = format!("{}/{}", path, a);
        int_field(required(tag, a, &axis_path)?, &axis_path)
    };
    Ok(IVec3::new(axis("x")?, axis("y")?, axis("z")?))
}

fn read_block_state(tag: &TagValue, path: &str) -> Result<BlockState, ModelError> {
    if tag.as_compound().is_none() {
        return Err(invalid(path, "palette entry is not a compound"));
    }
    let name_path = format!("{}/Name", path);
    let name = required(tag, "Name", &name_path)?
        .as_str()
        .ok_or_else(|| invalid(&name_path, "expected String"))?;

    let mut properties = BTreeMap::new();
    if let Some(props) = tag.get("Properties") {
        let props_path = format!("{}/Properties", path);
        let entries = props
            .as_compound()
            .ok_or_else(|| invalid(&props_path, "expected a compound"))?;
        for (key, value) in entries {
            let value = value
                .as_str()
                .ok_or_else(|| invalid(&format!("{}/{}", props_path, key), "expected String"))?;
            properties.insert(key.clone(), value.to_string());
        }
    }

    Ok(BlockState {
        name: name.to_string(),
        properties,
    })
}

fn read_region(name: String, tag: &TagValue, max_volume: u64) -> Result<Region, ModelError> {
    let base = format!("Regions/{}", name);
    if tag.as_compound().is_none() {
        return Err(invalid(&base, "expected a compound"));
    }

    let position = read_vec3(tag, "Position", &name)?;
    let size = read_vec3(tag, "Size", &name)?;

    // i64 so that i32::MIN sizes cannot overflow before the limit check
    let volume = size
        .as_i64vec3()
        .abs()
        .to_array()
        .iter()
        .try_fold(1u64, |acc, &d| acc.checked_mul(d as u64))
        .unwrap_or(u64::MAX);
    if volume > max_volume {
        return Err(ModelError::RegionTooLarge {
            region: name,
            volume,
            limit: max_volume,
        });
    }
    let far = position.as_i64vec3() + size.as_i64vec3();
    if far.to_array().iter().any(|&c| i32::try_from(c).is_err()) || size.min_element() == i32::MIN {
        return Err(invalid(&format!("{}/Size", base), "position + size overflows"));
    }

    let palette_path = format!("{}/BlockStatePalette", base);
    let palette_list = required(tag, "BlockStatePalette", &palette_path)?
        .as_list()
        .ok_or_else(|| invalid(&palette_path, "expected a list"))?;
    if palette_list.is_empty() {
        return Err(ModelError::EmptyPalette(name));
    }
    let palette = palette_list
        .iter()
        .enumerate()
        .map(|(i, entry)| read_block_state(entry, &format!("{}/{}", palette_path, i)))
        .collect::<Result<Vec<_>, _>>()?;

    let states_path = format!("{}/BlockStates", base);
    let words = required(tag, "BlockStates", &states_path)?
        .as_long_array()
        .ok_or_else(|| invalid(&states_path, "expected LongArray"))?;

    let count = volume as usize;
    let bits = packing::bits_per_entry(palette.len());
    let expected = packing::packed_len(count, bits).unwrap_or(usize::MAX);
    let blocks = packing::unpack(words, bits, count).ok_or_else(|| ModelError::BlockDataTooShort {
        region: name.clone(),
        expected,
        actual: words.len(),
    })?;

    if let Some(&bad) = blocks.iter().find(|&&i| i as usize >= palette.len()) {
        return Err(ModelError::PaletteIndexOutOfRange {
            region: name,
            index: bad as usize,
            len: palette.len(),
        });
    }

    Ok(Region {
        name,
        position,
        size,
        palette,
        blocks,
    })
}
