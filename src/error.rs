//! Error types for the litematic engine.
//!
//! Each pipeline stage has its own error enum. [`EngineError`] wraps all of
//! them for callers that only care about the request as a whole.

use crate::render::ViewAxis;
use thiserror::Error;

/// Result type alias using EngineError.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Failure while parsing the NBT container.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A read would run past the end of the buffer.
    #[error("unexpected end of data at offset {offset} (needed {needed} more bytes)")]
    Truncated { offset: usize, needed: usize },

    /// A tag type id outside 0..=12.
    #[error("unknown tag type id {0}")]
    UnknownTag(u8),

    /// Length fields or structure that cannot be valid NBT.
    #[error("malformed NBT: {0}")]
    Malformed(String),

    /// The gzip stream itself is corrupt.
    #[error("gzip decompression failed: {0}")]
    Decompress(String),
}

/// Failure while serializing a tag tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("string of {0} bytes does not fit a u16 length prefix")]
    StringTooLong(usize),

    #[error("sequence of {0} elements does not fit an i32 length prefix")]
    SequenceTooLong(usize),

    #[error("list mixes tag types {expected} and {found}")]
    HeterogeneousList { expected: u8, found: u8 },

    #[error("I/O error while encoding: {0}")]
    Io(String),
}

/// Failure while turning a tag tree into a [`Structure`](crate::Structure).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A required key is absent.
    #[error("missing field: {0}")]
    MissingField(String),

    /// A key is present but holds the wrong tag type or value.
    #[error("invalid field {field}: {reason}")]
    InvalidField { field: String, reason: String },

    /// An unpacked block index points past the end of the palette.
    #[error("region {region}: palette index {index} out of range (palette has {len} entries)")]
    PaletteIndexOutOfRange {
        region: String,
        index: usize,
        len: usize,
    },

    #[error("region {0} has an empty block state palette")]
    EmptyPalette(String),

    #[error("region {region}: BlockStates holds {actual} longs, {expected} required")]
    BlockDataTooShort {
        region: String,
        expected: usize,
        actual: usize,
    },

    #[error("region {region} volume {volume} exceeds limit {limit}")]
    RegionTooLarge {
        region: String,
        volume: u64,
        limit: u64,
    },

    #[error("duplicate region name: {0}")]
    DuplicateRegion(String),
}

/// Failure while tiling regions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TileError {
    #[error("unknown region: {0}")]
    UnknownRegion(String),

    #[error("invalid copy count for region {region}: along={along}, across={across} (both must be >= 1)")]
    InvalidCount {
        region: String,
        along: u32,
        across: u32,
    },

    #[error("tiled copy {first} overlaps {second}")]
    Overlap { first: String, second: String },

    /// A derived copy name collides with an earlier copy.
    #[error("tiled copy name {0} is already taken")]
    DuplicateName(String),

    #[error("tiled copy of region {0} lies outside the representable coordinate range")]
    OutOfRange(String),
}

/// Failure while rasterizing a view.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The view would exceed the configured pixel budget, or the structure
    /// spans more than an `i32` on some axis.
    #[error("{axis} view of {width}x{height} exceeds the limit of {limit} pixels")]
    TooLarge {
        axis: ViewAxis,
        width: u64,
        height: u64,
        limit: u64,
    },
}

/// Coarse classification of an [`EngineError`] for the calling layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Decode,
    Encode,
    Model,
    Tile,
    Render,
    Image,
    Config,
}

/// Main error type surfaced by the engine facade.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("tile error: {0}")]
    Tile(#[from] TileError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Failed to encode a raster image.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Failed to parse a JSON configuration table.
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

impl EngineError {
    /// The stage that produced this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Decode(_) => ErrorKind::Decode,
            EngineError::Encode(_) => ErrorKind::Encode,
            EngineError::Model(_) => ErrorKind::Model,
            EngineError::Tile(_) => ErrorKind::Tile,
            EngineError::Render(_) => ErrorKind::Render,
            EngineError::Image(_) => ErrorKind::Image,
            EngineError::Config(_) => ErrorKind::Config,
        }
    }
}
