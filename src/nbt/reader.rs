//! Bounds-checked NBT parser over an in-memory buffer.

use super::tag::{id, TagValue};
use crate::error::DecodeError;
use byteorder::{BigEndian, ByteOrder};
use flate2::read::GzDecoder;
use std::io::Read;

/// Gzip member header magic.
const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Compound/list nesting limit.
pub const MAX_DEPTH: usize = 512;

/// Default cap on the inflated size of a gzip payload (256 MiB).
pub const DEFAULT_MAX_INFLATED: u64 = 256 * 1024 * 1024;

/// Decode a gzip-compressed or raw NBT buffer into its root tag.
///
/// The root name is discarded; use [`decode_named`] to keep it.
pub fn decode(bytes: &[u8]) -> Result<TagValue, DecodeError> {
    decode_named(bytes, DEFAULT_MAX_INFLATED).map(|(_, tag)| tag)
}

/// Decode and return `(root_name, root_tag)`.
pub fn decode_named(bytes: &[u8], max_inflated: u64) -> Result<(String, TagValue), DecodeError> {
    if bytes.starts_with(&GZIP_MAGIC) {
        let raw = inflate(bytes, max_inflated)?;
        log::debug!("inflated {} gzip bytes to {} bytes", bytes.len(), raw.len());
        parse_root(&raw)
    } else {
        parse_root(bytes)
    }
}

fn inflate(bytes: &[u8], max_inflated: u64) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::new();
    // One extra byte lets us tell "exactly at the limit" from "over it".
    GzDecoder::new(bytes)
        .take(max_inflated + 1)
        .read_to_end(&mut out)
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::UnexpectedEof => DecodeError::Truncated {
                offset: bytes.len(),
                needed: 1,
            },
            _ => DecodeError::Decompress(e.to_string()),
        })?;
    if out.len() as u64 > max_inflated {
        return Err(DecodeError::Malformed(format!(
            "decompressed payload exceeds {} bytes",
            max_inflated
        )));
    }
    Ok(out)
}

fn parse_root(data: &[u8]) -> Result<(String, TagValue), DecodeError> {
    let mut reader = Reader::new(data);
    let type_id = reader.u8()?;
    if type_id != id::COMPOUND {
        return Err(DecodeError::Malformed(format!(
            "root tag must be a compound, found type id {}",
            type_id
        )));
    }
    let name = reader.string()?;
    let root = reader.payload(type_id, 0)?;
    Ok((name, root))
}

/// Smallest possible encoded payload for a tag type, used to reject
/// list lengths the remaining input cannot possibly satisfy.
fn min_payload_len(type_id: u8) -> usize {
    match type_id {
        id::END => 0,
        id::BYTE => 1,
        id::SHORT => 2,
        id::INT | id::FLOAT => 4,
        id::LONG | id::DOUBLE => 8,
        id::STRING => 2,
        id::LIST => 5,
        id::COMPOUND => 1,
        id::BYTE_ARRAY | id::INT_ARRAY | id::LONG_ARRAY => 4,
        _ => 0,
    }
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if n > self.remaining() {
            return Err(DecodeError::Truncated {
                offset: self.pos,
                needed: n - self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    fn i16(&mut self) -> Result<i16, DecodeError> {
        Ok(BigEndian::read_i16(self.take(2)?))
    }

    fn u16(&mut self) -> Result<u16, DecodeError> {
        Ok(BigEndian::read_u16(self.take(2)?))
    }

    fn i32(&mut self) -> Result<i32, DecodeError> {
        Ok(BigEndian::read_i32(self.take(4)?))
    }

    fn i64(&mut self) -> Result<i64, DecodeError> {
        Ok(BigEndian::read_i64(self.take(8)?))
    }

    fn string(&mut self) -> Result<String, DecodeError> {
        let len = self.u16()? as usize;
        let bytes = self.take(len)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Read an array length prefix and reserve `len * elem_size` bytes.
    fn array_body(&mut self, elem_size: usize) -> Result<&'a [u8], DecodeError> {
        let len = self.i32()?;
        if len < 0 {
            return Err(DecodeError::Malformed(format!(
                "negative array length {} at offset {}",
                len,
                self.pos - 4
            )));
        }
        let byte_len = (len as usize)
            .checked_mul(elem_size)
            .ok_or_else(|| DecodeError::Malformed(format!("array length {} overflows", len)))?;
        self.take(byte_len)
    }

    fn payload(&mut self, type_id: u8, depth: usize) -> Result<TagValue, DecodeError> {
        if depth > MAX_DEPTH {
            return Err(DecodeError::Malformed(format!(
                "nesting deeper than {} levels",
                MAX_DEPTH
            )));
        }

        let tag = match type_id {
            id::END => TagValue::End,
            id::BYTE => TagValue::Byte(self.u8()? as i8),
            id::SHORT => TagValue::Short(self.i16()?),
            id::INT => TagValue::Int(self.i32()?),
            id::LONG => TagValue::Long(self.i64()?),
            id::FLOAT => TagValue::Float(BigEndian::read_f32(self.take(4)?)),
            id::DOUBLE => TagValue::Double(BigEndian::read_f64(self.take(8)?)),
            id::BYTE_ARRAY => {
                let body = self.array_body(1)?;
                TagValue::ByteArray(body.iter().map(|&b| b as i8).collect())
            }
            id::STRING => TagValue::String(self.string()?),
            id::LIST => self.list(depth)?,
            id::COMPOUND => self.compound(depth)?,
            id::INT_ARRAY => {
                let body = self.array_body(4)?;
                let mut ints = vec![0i32; body.len() / 4];
                BigEndian::read_i32_into(body, &mut ints);
                TagValue::IntArray(ints)
            }
            id::LONG_ARRAY => {
                let body = self.array_body(8)?;
                let mut longs = vec![0i64; body.len() / 8];
                BigEndian::read_i64_into(body, &mut longs);
                TagValue::LongArray(longs)
            }
            other => return Err(DecodeError::UnknownTag(other)),
        };
        Ok(tag)
    }

    fn list(&mut self, depth: usize) -> Result<TagValue, DecodeError> {
        let elem_type = self.u8()?;
        let len = self.i32()?;
        if len <= 0 {
            // Empty lists are commonly written with element type End.
            return Ok(TagValue::List(Vec::new()));
        }
        if elem_type == id::END {
            return Err(DecodeError::Malformed(format!(
                "list of {} End elements at offset {}",
                len, self.pos
            )));
        }
        if elem_type > id::LONG_ARRAY {
            return Err(DecodeError::UnknownTag(elem_type));
        }

        let len = len as usize;
        let min_bytes = len.saturating_mul(min_payload_len(elem_type));
        if min_bytes > self.remaining() {
            return Err(DecodeError::Truncated {
                offset: self.pos,
                needed: min_bytes - self.remaining(),
            });
        }

        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(self.payload(elem_type, depth + 1)?);
        }
        Ok(TagValue::List(items))
    }

    fn compound(&mut self, depth: usize) -> Result<TagValue, DecodeError> {
        let mut entries = Vec::new();
        loop {
            let type_id = self.u8()?;
            if type_id == id::END {
                break;
            }
            if type_id > id::LONG_ARRAY {
                return Err(DecodeError::UnknownTag(type_id));
            }
            let name = self.string()?;
            let value = self.payload(type_id, depth + 1)?;
            entries.push((name, value));
        }
        Ok(TagValue::Compound(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    /// `{ "": { "n": Int(7) } }` as raw bytes.
    fn small_compound() -> Vec<u8> {
        let mut bytes = vec![10, 0, 0];
        bytes.extend_from_slice(&[3, 0, 1, b'n', 0, 0, 0, 7]);
        bytes.push(0);
        bytes
    }

    #[test]
    fn test_decode_raw_compound() {
        let tag = decode(&small_compound()).unwrap();
        assert_eq!(tag.get("n"), Some(&TagValue::Int(7)));
    }

    #[test]
    fn test_truncated_mid_tag() {
        let bytes = small_compound();
        for cut in 1..bytes.len() {
            assert_matches!(
                decode(&bytes[..cut]),
                Err(DecodeError::Truncated { .. }),
                "cut at {}",
                cut
            );
        }
    }

    #[test]
    fn test_empty_input_is_truncated() {
        assert_matches!(decode(&[]), Err(DecodeError::Truncated { offset: 0, needed: 1 }));
    }

    #[test]
    fn test_unknown_tag_id() {
        let bytes = vec![10, 0, 0, 99, 0, 1, b'x', 0];
        assert_matches!(decode(&bytes), Err(DecodeError::UnknownTag(99)));
    }

    #[test]
    fn test_non_compound_root() {
        let bytes = vec![3, 0, 0, 0, 0, 0, 1];
        assert_matches!(decode(&bytes), Err(DecodeError::Malformed(_)));
    }

    #[test]
    fn test_negative_array_length() {
        let mut bytes = vec![10, 0, 0, 12, 0, 1, b'a'];
        bytes.extend_from_slice(&(-1i32).to_be_bytes());
        bytes.push(0);
        assert_matches!(decode(&bytes), Err(DecodeError::Malformed(_)));
    }

    #[test]
    fn test_oversized_array_length_is_truncated() {
        let mut bytes = vec![10, 0, 0, 12, 0, 1, b'a'];
        bytes.extend_from_slice(&i32::MAX.to_be_bytes());
        bytes.push(0);
        assert_matches!(decode(&bytes), Err(DecodeError::Truncated { .. }));
    }

    #[test]
    fn test_empty_list_with_end_type() {
        let mut bytes = vec![10, 0, 0, 9, 0, 1, b'l', 0];
        bytes.extend_from_slice(&0i32.to_be_bytes());
        bytes.push(0);
        let tag = decode(&bytes).unwrap();
        assert_eq!(tag.get("l"), Some(&TagValue::List(vec![])));

        // Negative lengths also mean "empty".
        let mut bytes = vec![10, 0, 0, 9, 0, 1, b'l', 3];
        bytes.extend_from_slice(&(-5i32).to_be_bytes());
        bytes.push(0);
        let tag = decode(&bytes).unwrap();
        assert_eq!(tag.get("l"), Some(&TagValue::List(vec![])));
    }

    #[test]
    fn test_list_with_end_elements_is_malformed() {
        let mut bytes = vec![10, 0, 0, 9, 0, 1, b'l', 0];
        bytes.extend_from_slice(&2i32.to_be_bytes());
        bytes.push(0);
        assert_matches!(decode(&bytes), Err(DecodeError::Malformed(_)));
    }

    #[test]
    fn test_huge_list_length_fails_before_allocating() {
        let mut bytes = vec![10, 0, 0, 9, 0, 1, b'l', 4];
        bytes.extend_from_slice(&i32::MAX.to_be_bytes());
        assert_matches!(decode(&bytes), Err(DecodeError::Truncated { .. }));
    }

    #[test]
    fn test_deep_nesting_rejected() {
        let mut bytes = vec![10, 0, 0];
        for _ in 0..(MAX_DEPTH + 2) {
            bytes.extend_from_slice(&[10, 0, 0]);
        }
        assert_matches!(decode(&bytes), Err(DecodeError::Malformed(_)));
    }

    #[test]
    fn test_gzip_and_raw_agree() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let raw = small_compound();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&raw).unwrap();
        let gz = encoder.finish().unwrap();

        assert_eq!(decode(&gz).unwrap(), decode(&raw).unwrap());
    }

    #[test]
    fn test_corrupt_gzip() {
        let bytes = [0x1F, 0x8B, 0x08, 0x00, 0xFF, 0xFF, 0xFF];
        assert!(decode(&bytes).is_err());
    }

    #[test]
    fn test_inflate_limit() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&small_compound()).unwrap();
        let gz = encoder.finish().unwrap();

        assert_matches!(decode_named(&gz, 4), Err(DecodeError::Malformed(_)));
    }
}
