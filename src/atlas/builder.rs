//! Texture atlas builder using a square tile grid.

use super::{encode_png, UvCoords};
use crate::error::{Result, StructureError};
use crate::resource_pack::TextureData;
use image::{imageops, RgbaImage};
use std::collections::HashMap;

/// A packed atlas before it is mapped to blocks.
#[derive(Debug, Clone)]
pub struct PackedAtlas {
    /// Width of the atlas in pixels.
    pub width: u32,
    /// Height of the atlas in pixels.
    pub height: u32,
    /// RGBA pixel data.
    pub pixels: Vec<u8>,
    /// Texture name to tile rectangle.
    pub regions: HashMap<String, UvCoords>,
    /// Tile 0, the missing-texture checkerboard.
    pub placeholder: UvCoords,
}

impl PackedAtlas {
    /// Get the region for a texture.
    pub fn region(&self, texture: &str) -> Option<UvCoords> {
        self.regions.get(texture).copied()
    }

    /// Tiles including the placeholder.
    pub fn tile_count(&self) -> usize {
        self.regions.len() + 1
    }

    /// Export the atlas as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        encode_png(&self.pixels, self.width, self.height)
    }
}

/// Builder for creating texture atlases.
pub struct AtlasBuilder {
    tile_size: u32,
    max_size: u32,
    textures: Vec<(String, TextureData)>,
}

impl AtlasBuilder {
    /// Create a new atlas builder.
    pub fn new(tile_size: u32, max_size: u32) -> Self {
        Self {
            tile_size,
            max_size,
            textures: Vec::new(),
        }
    }

    /// Add a texture to the atlas. Later additions of the same name are ignored.
    pub fn add_texture(&mut self, name: &str, texture: TextureData) {
        if self.textures.iter().any(|(n, _)| n == name) {
            return;
        }
        self.textures.push((name.to_string(), texture));
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Build the atlas. Tile 0 holds the placeholder; textures follow in
    /// insertion order, row-major.
    pub fn build(self) -> Result<PackedAtlas> {
        let tile = self.tile_size;
        if tile == 0 || self.max_size < tile {
            return Err(StructureError::AtlasBuild(format!(
                "tile size {} does not fit a {}px atlas",
                tile, self.max_size
            )));
        }

        let tile_count = self.textures.len() as u32 + 1;
        let tiles_per_side = (tile_count as f64).sqrt().ceil() as u32;
        let size = (tiles_per_side * tile).next_power_of_two().min(self.max_size);
        let columns = size / tile;
        let capacity = (columns * columns) as usize;

        let mut atlas = RgbaImage::new(size, size);
        let tile_uv = |index: usize| -> UvCoords {
            let col = index as u32 % columns;
            let row = index as u32 / columns;
            let scale = size as f32;
            UvCoords::new(
                (col * tile) as f32 / scale,
                (row * tile) as f32 / scale,
                ((col + 1) * tile) as f32 / scale,
                ((row + 1) * tile) as f32 / scale,
            )
        };

        let mut place = |index: usize, texture: &TextureData| -> bool {
            let Some(image) = texture.to_tile(tile) else {
                return false;
            };
            let x = (index as u32 % columns) * tile;
            let y = (index as u32 / columns) * tile;
            imageops::replace(&mut atlas, &image, x as i64, y as i64);
            true
        };

        place(0, &TextureData::placeholder());

        let mut regions = HashMap::new();
        let mut dropped = 0usize;
        for (name, texture) in &self.textures {
            let index = regions.len() + 1;
            if index >= capacity {
                dropped += 1;
                continue;
            }
            if place(index, texture) {
                regions.insert(name.clone(), tile_uv(index));
            } else {
                log::warn!("texture {} has inconsistent pixel data", name);
            }
        }
        if dropped > 0 {
            log::warn!(
                "atlas full at {}x{}: {} texture(s) fall back to the placeholder",
                size,
                size,
                dropped
            );
        }

        Ok(PackedAtlas {
            width: size,
            height: size,
            pixels: atlas.into_raw(),
            regions,
            placeholder: tile_uv(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_texture(width: u32, height: u32, color: [u8; 4]) -> TextureData {
        let pixels: Vec<u8> = (0..width * height)
            .flat_map(|_| color.iter().copied())
            .collect();
        TextureData::new(width, height, pixels)
    }

    #[test]
    fn test_empty_atlas_holds_placeholder() {
        let atlas = AtlasBuilder::new(16, 256).build().unwrap();
        assert_eq!(atlas.width, 16);
        assert_eq!(atlas.height, 16);
        assert!(atlas.regions.is_empty());
        assert_eq!(atlas.placeholder, UvCoords::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(&atlas.pixels[..4], &[255, 0, 255, 255]);
    }

    #[test]
    fn test_grid_size_is_power_of_two() {
        let mut builder = AtlasBuilder::new(16, 4096);
        for i in 0..4 {
            builder.add_texture(&format!("t{}", i), create_test_texture(16, 16, [i, 0, 0, 255]));
        }
        // five tiles need a 3x3 grid, 48px rounds up to 64
        let atlas = builder.build().unwrap();
        assert_eq!(atlas.width, 64);
        assert_eq!(atlas.tile_count(), 5);

        let region = atlas.region("t0").unwrap();
        assert_eq!(region, UvCoords::new(0.25, 0.0, 0.5, 0.25));
        let region = atlas.region("t3").unwrap();
        assert_eq!(region, UvCoords::new(0.0, 0.25, 0.25, 0.5));
    }

    #[test]
    fn test_textures_are_scaled_to_tile() {
        let mut builder = AtlasBuilder::new(16, 256);
        builder.add_texture("big", create_test_texture(64, 64, [0, 255, 0, 255]));
        let atlas = builder.build().unwrap();

        let region = atlas.region("big").unwrap();
        let x = (region.u1 * atlas.width as f32) as usize;
        let idx = x * 4;
        assert_eq!(&atlas.pixels[idx..idx + 4], &[0, 255, 0, 255]);
    }

    #[test]
    fn test_overflow_falls_back() {
        let mut builder = AtlasBuilder::new(16, 32);
        for i in 0..6 {
            builder.add_texture(&format!("t{}", i), create_test_texture(16, 16, [0, 0, i, 255]));
        }
        let atlas = builder.build().unwrap();
        assert_eq!(atlas.width, 32);
        assert_eq!(atlas.regions.len(), 3);
        assert!(atlas.region("t5").is_none());
    }

    #[test]
    fn test_duplicate_names_ignored() {
        let mut builder = AtlasBuilder::new(16, 256);
        builder.add_texture("a", create_test_texture(16, 16, [1, 1, 1, 255]));
        builder.add_texture("a", create_test_texture(16, 16, [2, 2, 2, 255]));
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn test_invalid_tile_size() {
        assert!(AtlasBuilder::new(64, 32).build().is_err());
    }

    #[test]
    fn test_png_export() {
        let png = AtlasBuilder::new(16, 64).build().unwrap().to_png().unwrap();
        assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);
    }
}
