//! Litematic block-state bit packing.
//!
//! Palette indices are stored low-bit-first in a sequence of 64-bit words.
//! An entry may straddle two words: its low bits sit at the top of word N and
//! its high bits at the bottom of word N+1.

/// Bits per entry for a palette of `palette_len` states (minimum 2).
pub fn bits_per_entry(palette_len: usize) -> u32 {
    if palette_len <= 1 {
        return 2;
    }
    (usize::BITS - (palette_len - 1).leading_zeros()).max(2)
}

/// Number of words needed for `count` entries, or `None` on overflow.
pub fn packed_len(count: usize, bits: u32) -> Option<usize> {
    let total_bits = count.checked_mul(bits as usize)?;
    Some(total_bits.div_ceil(64))
}

/// Unpack `count` entries of `bits` width.
///
/// Returns `None` when `words` is too short to hold them.
pub fn unpack(words: &[i64], bits: u32, count: usize) -> Option<Vec<u32>> {
    debug_assert!((1..=32).contains(&bits));
    if words.len() < packed_len(count, bits)? {
        return None;
    }

    let bits = bits as usize;
    let mask = (1u64 << bits) - 1;
    let mut out = Vec::with_capacity(count);

    for index in 0..count {
        let bit = index * bits;
        let word = bit / 64;
        let offset = bit % 64;

        let mut value = (words[word] as u64) >> offset;
        if offset + bits > 64 {
            value |= (words[word + 1] as u64) << (64 - offset);
        }
        out.push((value & mask) as u32);
    }

    Some(out)
}

/// Pack entries into words; inverse of [`unpack`].
pub fn pack(entries: &[u32], bits: u32) -> Vec<i64> {
    let len = packed_len(entries.len(), bits).unwrap_or(0);
    let bits = bits as usize;
    let mask = (1u64 << bits) - 1;
    let mut words = vec![0u64; len];

    for (index, &entry) in entries.iter().enumerate() {
        let value = entry as u64 & mask;
        let bit = index * bits;
        let word = bit / 64;
        let offset = bit % 64;

        words[word] |= value << offset;
        if offset + bits > 64 {
            words[word + 1] |= value >> (64 - offset);
        }
    }

    words.into_iter().map(|w| w as i64).collect()
}
