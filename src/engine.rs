//! The engine facade tying the pipeline stages together.

use crate::assembly::{self, AssemblyConfig};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::materials::{self, MaterialCount, MaterialRow, Translations};
use crate::nbt;
use crate::render::{RasterImage, RenderedViews, Renderer, ViewAxis};
use crate::schematic::{self, Structure};

/// Decodes, analyses, renders and tiles litematic structures.
///
/// Holds only immutable configuration, so one engine can serve any number of
/// requests from any number of threads.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    renderer: Renderer,
    translations: Translations,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    /// Create an engine with custom configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            renderer: Renderer::from_config(&config),
            config,
            translations: Translations::default(),
        }
    }

    /// Use `translations` for display names in [`material_rows`](Self::material_rows).
    pub fn with_translations(mut self, translations: Translations) -> Self {
        self.translations = translations;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Decode a litematic byte buffer (gzipped or raw NBT) into a structure.
    pub fn decode_and_build(&self, bytes: &[u8]) -> Result<Structure> {
        let (root_name, root) = nbt::decode_named(bytes, self.config.max_inflated_bytes)?;
        log::debug!("decoded {} byte container (root {:?})", bytes.len(), root_name);

        let structure = schematic::build_with_limit(root, self.config.max_region_volume)?;
        log::info!(
            "built structure with {} regions, {} cells",
            structure.regions.len(),
            structure.total_volume()
        );
        Ok(structure)
    }

    /// Count non-air blocks by canonical key.
    pub fn aggregate(&self, structure: &Structure) -> MaterialCount {
        materials::aggregate(structure, &self.config.air_ids)
    }

    /// Material list rows with display names and box/stack breakdown.
    pub fn material_rows(&self, structure: &Structure) -> Vec<MaterialRow> {
        self.aggregate(structure).rows(&self.translations)
    }

    /// Render one view, refusing views over `max_render_pixels`.
    pub fn render(&self, structure: &Structure, axis: ViewAxis) -> Result<RasterImage> {
        Ok(self.renderer.render(structure, axis)?)
    }

    pub fn render_views(&self, structure: &Structure) -> Result<RenderedViews> {
        Ok(self.renderer.render_views(structure)?)
    }

    /// Produce a new structure made of tiled region copies.
    pub fn tile(&self, structure: &Structure, config: &AssemblyConfig) -> Result<Structure> {
        Ok(assembly::tile(structure, config)?)
    }

    /// Serialize a structure as a gzipped litematic.
    ///
    /// `TotalBlocks` in the written metadata uses this engine's air ids.
    pub fn encode(&self, structure: &Structure) -> Result<Vec<u8>> {
        Ok(schematic::encode_litematic(structure, &self.config.air_ids)?)
    }
}
