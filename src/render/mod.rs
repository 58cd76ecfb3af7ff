//! Orthographic silhouette rendering.
//!
//! Each pixel is produced by a linear scan along the view axis from the
//! viewer's side; the first non-air cell hit decides the color. There is no
//! shading or blending, so the same structure always renders to the same
//! bytes.

mod color;

pub use color::{hashed_color, ColorMap, Rgba};

use crate::config::{AirIds, EngineConfig, DEFAULT_MAX_RENDER_PIXELS};
use crate::error::{EngineError, RenderError, Result};
use crate::schematic::Structure;
use crate::types::Bounds;
use glam::{I64Vec3, IVec3};
use image::ImageEncoder;
use serde::{Deserialize, Serialize};

/// Fully transparent pixel.
pub const TRANSPARENT: Rgba = [0, 0, 0, 0];

/// Which orthographic view to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewAxis {
    /// Looking down. Columns are x, rows are z.
    Top,
    /// Looking from the north (-z) side. Columns are x, rows are y (top row highest).
    Front,
    /// Looking from the west (-x) side. Columns are z, rows are y (top row highest).
    Side,
}

impl ViewAxis {
    pub const ALL: [ViewAxis; 3] = [ViewAxis::Top, ViewAxis::Front, ViewAxis::Side];

    /// `(width, height, depth)` of the scan volume for box extent `dims`.
    fn extents(&self, dims: I64Vec3) -> (i64, i64, i64) {
        match self {
            ViewAxis::Top => (dims.x, dims.z, dims.y),
            ViewAxis::Front => (dims.x, dims.y, dims.z),
            ViewAxis::Side => (dims.z, dims.y, dims.x),
        }
    }

    /// World cell for pixel `(u, v)` at depth `d` from the viewer.
    fn cell(&self, bounds: &Bounds, u: i32, v: i32, d: i32) -> IVec3 {
        let (min, max) = (bounds.min, bounds.max);
        match self {
            ViewAxis::Top => IVec3::new(min.x + u, max.y - 1 - d, min.z + v),
            ViewAxis::Front => IVec3::new(min.x + u, max.y - 1 - v, min.z + d),
            ViewAxis::Side => IVec3::new(min.x + d, max.y - 1 - v, min.z + u),
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "top" => Some(ViewAxis::Top),
            "front" => Some(ViewAxis::Front),
            "side" => Some(ViewAxis::Side),
            _ => None,
        }
    }
}

impl std::fmt::Display for ViewAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewAxis::Top => write!(f, "top"),
            ViewAxis::Front => write!(f, "front"),
            ViewAxis::Side => write!(f, "side"),
        }
    }
}

/// An RGBA8 image, row-major, row 0 at the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data.
    pub pixels: Vec<u8>,
}

impl RasterImage {
    /// A fully transparent image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Get a pixel at (x, y).
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.pixels[idx..idx + 4]);
        Some(px)
    }

    fn put_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[idx..idx + 4].copy_from_slice(&color);
    }

    /// Number of non-transparent pixels.
    pub fn opaque_pixels(&self) -> usize {
        self.pixels.chunks_exact(4).filter(|px| px[3] != 0).count()
    }

    /// Export the image as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        let cursor = std::io::Cursor::new(&mut bytes);
        let encoder = image::codecs::png::PngEncoder::new(cursor);

        encoder
            .write_image(
                &self.pixels,
                self.width,
                self.height,
                image::ExtendedColorType::Rgba8,
            )
            .map_err(EngineError::Image)?;

        Ok(bytes)
    }
}

/// The three standard views of a structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedViews {
    pub top: RasterImage,
    pub front: RasterImage,
    pub side: RasterImage,
}

impl RenderedViews {
    pub fn get(&self, axis: ViewAxis) -> &RasterImage {
        match axis {
            ViewAxis::Top => &self.top,
            ViewAxis::Front => &self.front,
            ViewAxis::Side => &self.side,
        }
    }
}

/// Per-region data resolved once per render.
struct RegionLayer<'a> {
    bounds: Bounds,
    width: usize,
    layer: usize,
    blocks: &'a [u32],
    /// Color per palette entry, `None` for air.
    colors: Vec<Option<Rgba>>,
}

impl RegionLayer<'_> {
    fn color_at(&self, pos: IVec3) -> Option<Rgba> {
        if !self.bounds.contains(pos) {
            return None;
        }
        let local = pos - self.bounds.min;
        let idx = local.x as usize + local.z as usize * self.width + local.y as usize * self.layer;
        let palette_index = *self.blocks.get(idx)? as usize;
        self.colors.get(palette_index).copied().flatten()
    }
}

/// Silhouette renderer with a fixed air set and color table.
#[derive(Debug, Clone)]
pub struct Renderer {
    air: AirIds,
    colors: ColorMap,
    max_pixels: u64,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(AirIds::default(), ColorMap::builtin())
    }
}

impl Renderer {
    pub fn new(air: AirIds, colors: ColorMap) -> Self {
        Self {
            air,
            colors,
            max_pixels: DEFAULT_MAX_RENDER_PIXELS,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.air_ids.clone(), config.colors.clone())
            .with_max_pixels(config.max_render_pixels)
    }

    /// Reject views larger than `limit` pixels.
    pub fn with_max_pixels(mut self, limit: u64) -> Self {
        self.max_pixels = limit;
        self
    }

    /// Render one view.
    ///
    /// The image covers the union of all region bounds; a structure without
    /// regions yields a 0x0 image. Views over the pixel limit are refused
    /// before anything is allocated.
    pub fn render(
        &self,
        structure: &Structure,
        axis: ViewAxis,
    ) -> std::result::Result<RasterImage, RenderError> {
        let Some(bounds) = structure.bounds() else {
            return Ok(RasterImage::new(0, 0));
        };
        let (width, height, depth) = axis.extents(bounds.extent());
        let pixels = (width as u64).saturating_mul(height as u64);
        if !bounds.fits_i32() || pixels > self.max_pixels {
            return Err(RenderError::TooLarge {
                axis,
                width: width as u64,
                height: height as u64,
                limit: self.max_pixels,
            });
        }
        let (width, height, depth) = (width as i32, height as i32, depth as i32);
        let mut image = RasterImage::new(width as u32, height as u32);

        let layers: Vec<RegionLayer> = structure
            .regions
            .iter()
            .filter(|r| !r.bounds().is_empty())
            .map(|r| {
                let dims = r.dimensions();
                let solid = r.solid_mask(&self.air);
                RegionLayer {
                    bounds: r.bounds(),
                    width: dims.x as usize,
                    layer: dims.x as usize * dims.z as usize,
                    blocks: &r.blocks,
                    colors: r
                        .palette
                        .iter()
                        .zip(solid)
                        .map(|(b, s)| s.then(|| self.colors.color_for(&b.name)))
                        .collect(),
                }
            })
            .collect();

        for v in 0..height {
            for u in 0..width {
                let hit = (0..depth).find_map(|d| {
                    let pos = axis.cell(&bounds, u, v, d);
                    layers.iter().find_map(|layer| layer.color_at(pos))
                });
                if let Some(color) = hit {
                    image.put_pixel(u as u32, v as u32, color);
                }
            }
        }

        log::debug!(
            "rendered {} view {}x{} ({} opaque pixels)",
            axis,
            image.width,
            image.height,
            image.opaque_pixels()
        );
        Ok(image)
    }

    /// Render top, front and side views.
    pub fn render_views(
        &self,
        structure: &Structure,
    ) -> std::result::Result<RenderedViews, RenderError> {
        Ok(RenderedViews {
            top: self.render(structure, ViewAxis::Top)?,
            front: self.render(structure, ViewAxis::Front)?,
            side: self.render(structure, ViewAxis::Side)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schematic::Region;
    use crate::types::BlockState;
    use assert_matches::assert_matches;

    fn structure_of(regions: Vec<Region>) -> Structure {
        let mut s = Structure::new();
        s.regions = regions;
        s
    }

    /// 2x2x2 region with a distinct block in one corner.
    fn marked_cube(position: IVec3, size: IVec3) -> Region {
        let mut region = Region::new("cube", position, size);
        for i in 0..region.blocks.len() {
            let local = region.local_position(i);
            let block = if local == IVec3::new(1, 1, 0) { "minecraft:gold_block" } else { "minecraft:stone" };
            region.set_block(local, &BlockState::new(block));
        }
        region
    }

    #[test]
    fn test_image_dimensions_follow_bounds() {
        let region = Region::new("r", IVec3::new(-3, 10, 7), IVec3::new(4, 5, 6));
        let views = Renderer::default().render_views(&structure_of(vec![region])).unwrap();
        assert_eq!((views.top.width, views.top.height), (4, 6));
        assert_eq!((views.front.width, views.front.height), (4, 5));
        assert_eq!((views.side.width, views.side.height), (6, 5));
    }

    #[test]
    fn test_air_columns_are_transparent() {
        let mut region = Region::new("r", IVec3::ZERO, IVec3::new(2, 3, 1));
        region.set_block(IVec3::new(0, 0, 0), &BlockState::new("minecraft:stone"));
        region.set_block(IVec3::new(1, 2, 0), &BlockState::new("minecraft:cave_air"));

        let top = Renderer::default().render(&structure_of(vec![region]), ViewAxis::Top).unwrap();
        assert_eq!(top.get_pixel(0, 0), Some([125, 125, 125, 255]));
        assert_eq!(top.get_pixel(1, 0), Some(TRANSPARENT));
        assert_eq!(top.opaque_pixels(), 1);
    }

    #[test]
    fn test_nearest_block_wins() {
        // Column at x=0,z=0: stone at y=0, dirt at y=1. Top view sees dirt.
        let mut region = Region::new("r", IVec3::ZERO, IVec3::new(1, 2, 2));
        region.set_block(IVec3::new(0, 0, 0), &BlockState::new("minecraft:stone"));
        region.set_block(IVec3::new(0, 1, 0), &BlockState::new("minecraft:dirt"));
        region.set_block(IVec3::new(0, 0, 1), &BlockState::new("minecraft:sand"));
        let structure = structure_of(vec![region]);
        let renderer = Renderer::default();

        let top = renderer.render(&structure, ViewAxis::Top).unwrap();
        assert_eq!(top.get_pixel(0, 0), Some([134, 96, 67, 255]));

        // Front looks along +z from z=0: bottom row sees stone before sand.
        let front = renderer.render(&structure, ViewAxis::Front).unwrap();
        assert_eq!(front.get_pixel(0, 1), Some([125, 125, 125, 255]));
        assert_eq!(front.get_pixel(0, 0), Some([134, 96, 67, 255]));
    }

    #[test]
    fn test_negative_size_matches_positive() {
        let negative = marked_cube(IVec3::splat(5), IVec3::splat(-2));
        let positive = marked_cube(IVec3::splat(3), IVec3::splat(2));
        assert_eq!(negative.bounds(), positive.bounds());

        let renderer = Renderer::default();
        let neg_structure = structure_of(vec![negative]);
        let a = renderer.render_views(&neg_structure).unwrap();
        let b = renderer.render_views(&structure_of(vec![positive])).unwrap();
        assert_eq!(a, b);
        assert_eq!(neg_structure.regions[0].size, IVec3::splat(-2));
    }

    #[test]
    fn test_render_is_deterministic() {
        let mut region = Region::new("r", IVec3::ZERO, IVec3::new(5, 4, 3));
        for i in 0..region.blocks.len() {
            let local = region.local_position(i);
            if (local.x * 7 + local.y * 3 + local.z) % 4 != 0 {
                let name = format!("mod:block_{}", (local.x + local.z) % 3);
                region.set_block(local, &BlockState::new(name));
            }
        }
        let structure = structure_of(vec![region]);
        for axis in ViewAxis::ALL {
            let first = Renderer::default().render(&structure, axis).unwrap();
            let second = Renderer::default().render(&structure, axis).unwrap();
            assert_eq!(first.pixels, second.pixels);
        }
    }

    #[test]
    fn test_gap_between_regions_is_transparent() {
        let mut a = Region::new("a", IVec3::ZERO, IVec3::ONE);
        let mut b = Region::new("b", IVec3::new(3, 0, 0), IVec3::ONE);
        a.set_block(IVec3::ZERO, &BlockState::new("minecraft:stone"));
        b.set_block(IVec3::ZERO, &BlockState::new("minecraft:stone"));

        let top = Renderer::default().render(&structure_of(vec![a, b]), ViewAxis::Top).unwrap();
        assert_eq!(top.width, 4);
        let alphas: Vec<u8> = (0..4).map(|x| top.get_pixel(x, 0).unwrap()[3]).collect();
        assert_eq!(alphas, vec![255, 0, 0, 255]);
    }

    #[test]
    fn test_far_apart_regions_refused() {
        let mut a = Region::new("a", IVec3::new(-2_000_000_000, 0, 0), IVec3::ONE);
        let mut b = Region::new("b", IVec3::new(2_000_000_000, 0, 0), IVec3::ONE);
        a.set_block(IVec3::ZERO, &BlockState::new("minecraft:stone"));
        b.set_block(IVec3::ZERO, &BlockState::new("minecraft:stone"));
        let structure = structure_of(vec![a, b]);

        assert_matches!(
            Renderer::default().render(&structure, ViewAxis::Top),
            Err(RenderError::TooLarge { axis: ViewAxis::Top, width: 4_000_000_001, .. })
        );
        // The side view is only 1x1 wide but scans across the whole x range.
        assert_matches!(
            Renderer::default().render(&structure, ViewAxis::Side),
            Err(RenderError::TooLarge { .. })
        );
        assert!(Renderer::default().render_views(&structure).is_err());
    }

    #[test]
    fn test_pixel_limit() {
        let region = Region::new("r", IVec3::ZERO, IVec3::new(10, 1, 10));
        let structure = structure_of(vec![region]);
        let renderer = Renderer::default().with_max_pixels(99);

        assert_matches!(
            renderer.render(&structure, ViewAxis::Top),
            Err(RenderError::TooLarge { width: 10, height: 10, limit: 99, .. })
        );
        // Front is 10x1 and stays under the limit.
        assert_eq!(renderer.render(&structure, ViewAxis::Front).unwrap().width, 10);
    }

    #[test]
    fn test_empty_structure() {
        let image = Renderer::default().render(&Structure::new(), ViewAxis::Side).unwrap();
        assert!(image.is_empty());
        assert!(image.pixels.is_empty());
    }

    #[test]
    fn test_png_signature() {
        let mut region = Region::new("r", IVec3::ZERO, IVec3::ONE);
        region.set_block(IVec3::ZERO, &BlockState::new("minecraft:stone"));
        let png = Renderer::default()
            .render(&structure_of(vec![region]), ViewAxis::Top)
            .unwrap()
            .to_png()
            .unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }
}
