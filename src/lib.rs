//! # Litematic Engine
//!
//! A Rust library for processing Minecraft litematic schematics.
//!
//! ## Overview
//!
//! This library takes the bytes of a `.litematic` file as input and turns
//! them into a [`Structure`]: named regions of palette-indexed blocks. From
//! there it can count materials, render flat top/front/side silhouettes, and
//! tile regions into larger assemblies that serialize back to a litematic.
//!
//! ## Quick Start
//!
//! ```ignore
//! use litematic_engine::{decode_and_build, aggregate, render_views};
//!
//! // Decode a schematic
//! let structure = decode_and_build(&bytes)?;
//!
//! // Material list, most common block first
//! let csv = aggregate(&structure).to_csv();
//!
//! // Orthographic views as PNG
//! let views = render_views(&structure)?;
//! let top_png = views.top.to_png()?;
//! ```
//!
//! ## Custom Configuration
//!
//! The free functions use the default configuration. Build an [`Engine`] to
//! change the air set, size limits or color table:
//!
//! ```ignore
//! use litematic_engine::{AirIds, Engine, EngineConfig};
//!
//! let config = EngineConfig::default()
//!     .with_air_ids(AirIds::new(["minecraft:air", "minecraft:structure_void"]))
//!     .with_max_region_volume(1 << 24);
//! let engine = Engine::new(config);
//! let structure = engine.decode_and_build(&bytes)?;
//! ```

pub mod assembly;
pub mod config;
pub mod error;
pub mod materials;
pub mod nbt;
pub mod render;
pub mod schematic;
pub mod types;

mod engine;

// Re-export main types for convenience
pub use assembly::{AssemblyConfig, AssemblyEntry, TileCounts};
pub use config::{AirIds, EngineConfig};
pub use engine::Engine;
pub use error::{EngineError, ErrorKind, Result};
pub use materials::{MaterialCount, MaterialRow, Translations};
pub use render::{ColorMap, RasterImage, RenderedViews, Renderer, ViewAxis};
pub use schematic::{Metadata, Region, Structure};
pub use types::{Axis, BlockState, Bounds, GenerateDirection};

use once_cell::sync::Lazy;

static DEFAULT_ENGINE: Lazy<Engine> = Lazy::new(Engine::default);

/// Decode litematic bytes with the default configuration.
pub fn decode_and_build(bytes: &[u8]) -> Result<Structure> {
    DEFAULT_ENGINE.decode_and_build(bytes)
}

/// Count non-air blocks, treating the default air ids as air.
pub fn aggregate(structure: &Structure) -> MaterialCount {
    DEFAULT_ENGINE.aggregate(structure)
}

/// Render top, front and side views with the built-in color table.
pub fn render_views(structure: &Structure) -> Result<RenderedViews> {
    DEFAULT_ENGINE.render_views(structure)
}

/// Tile regions of `structure` as described by `config`.
pub fn tile(structure: &Structure, config: &AssemblyConfig) -> Result<Structure> {
    DEFAULT_ENGINE.tile(structure, config)
}

/// Serialize a structure as a gzipped litematic.
pub fn encode_litematic(structure: &Structure) -> Result<Vec<u8>> {
    DEFAULT_ENGINE.encode(structure)
}
