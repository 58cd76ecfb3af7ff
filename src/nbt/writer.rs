//! NBT serialization, used to export structures.

use super::tag::{id, TagValue};
use crate::error::EncodeError;
use byteorder::{BigEndian, WriteBytesExt};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;

/// Serialize `root` as an uncompressed named root tag.
pub fn encode(root: &TagValue, root_name: &str) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();
    write_named(&mut out, root_name, root)?;
    Ok(out)
}

/// Serialize `root` and gzip the result.
pub fn encode_gzip(
    root: &TagValue,
    root_name: &str,
    compression: Compression,
) -> Result<Vec<u8>, EncodeError> {
    let raw = encode(root, root_name)?;
    let mut encoder = GzEncoder::new(Vec::with_capacity(raw.len() / 4), compression);
    encoder.write_all(&raw).map_err(io_err)?;
    encoder.finish().map_err(io_err)
}

fn io_err(e: std::io::Error) -> EncodeError {
    EncodeError::Io(e.to_string())
}

fn write_named<W: Write>(w: &mut W, name: &str, tag: &TagValue) -> Result<(), EncodeError> {
    w.write_u8(tag.type_id()).map_err(io_err)?;
    if !matches!(tag, TagValue::End) {
        write_string(w, name)?;
    }
    write_payload(w, tag)
}

fn write_string<W: Write>(w: &mut W, s: &str) -> Result<(), EncodeError> {
    let len = u16::try_from(s.len()).map_err(|_| EncodeError::StringTooLong(s.len()))?;
    w.write_u16::<BigEndian>(len).map_err(io_err)?;
    w.write_all(s.as_bytes()).map_err(io_err)
}

fn write_len<W: Write>(w: &mut W, len: usize) -> Result<(), EncodeError> {
    let len = i32::try_from(len).map_err(|_| EncodeError::SequenceTooLong(len))?;
    w.write_i32::<BigEndian>(len).map_err(io_err)
}

fn write_payload<W: Write>(w: &mut W, tag: &TagValue) -> Result<(), EncodeError> {
    match tag {
        TagValue::End => Ok(()),
        TagValue::Byte(v) => w.write_i8(*v).map_err(io_err),
        TagValue::Short(v) => w.write_i16::<BigEndian>(*v).map_err(io_err),
        TagValue::Int(v) => w.write_i32::<BigEndian>(*v).map_err(io_err),
        TagValue::Long(v) => w.write_i64::<BigEndian>(*v).map_err(io_err),
        TagValue::Float(v) => w.write_f32::<BigEndian>(*v).map_err(io_err),
        TagValue::Double(v) => w.write_f64::<BigEndian>(*v).map_err(io_err),
        TagValue::ByteArray(v) => {
            write_len(w, v.len())?;
            let bytes: Vec<u8> = v.iter().map(|&b| b as u8).collect();
            w.write_all(&bytes).map_err(io_err)
        }
        TagValue::String(v) => write_string(w, v),
        TagValue::List(items) => {
            let elem_type = items.first().map(TagValue::type_id).unwrap_or(id::END);
            if let Some(bad) = items.iter().find(|t| t.type_id() != elem_type) {
                return Err(EncodeError::HeterogeneousList {
                    expected: elem_type,
                    found: bad.type_id(),
                });
            }
            w.write_u8(elem_type).map_err(io_err)?;
            write_len(w, items.len())?;
            for item in items {
                write_payload(w, item)?;
            }
            Ok(())
        }
        TagValue::Compound(entries) => {
            for (name, value) in entries {
                write_named(w, name, value)?;
            }
            w.write_u8(id::END).map_err(io_err)
        }
        TagValue::IntArray(v) => {
            write_len(w, v.len())?;
            for &i in v {
                w.write_i32::<BigEndian>(i).map_err(io_err)?;
            }
            Ok(())
        }
        TagValue::LongArray(v) => {
            write_len(w, v.len())?;
            for &l in v {
                w.write_i64::<BigEndian>(l).map_err(io_err)?;
            }
            Ok(())
        }
    }
}
