//! Named Binary Tag container decoding and encoding.
//!
//! Litematic files are a single gzip-compressed NBT compound. [`decode`]
//! accepts both gzipped and raw NBT and yields a [`TagValue`] tree.

mod reader;
mod tag;
mod writer;

pub use reader::{decode, decode_named, DEFAULT_MAX_INFLATED, MAX_DEPTH};
pub use tag::{id, TagValue};
pub use writer::{encode, encode_gzip};
