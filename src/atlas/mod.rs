//! Texture atlas building.
//!
//! Block names are resolved to texture names per face, the textures are
//! packed into one square grid image, and every requested block gets a
//! UV rectangle for each of its six faces.

mod builder;
mod resolve;

pub use builder::{AtlasBuilder, PackedAtlas};
pub use resolve::{is_invisible, texture_key, FaceTextures, TextureResolver};

use crate::error::{Result, StructureError};
use crate::resource_pack::TexturePack;
use crate::types::Face;
use image::ImageEncoder;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A rectangle in normalized atlas space. `v` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UvCoords {
    pub u1: f32,
    pub v1: f32,
    pub u2: f32,
    pub v2: f32,
}

impl UvCoords {
    pub const fn new(u1: f32, v1: f32, u2: f32, v2: f32) -> Self {
        Self { u1, v1, u2, v2 }
    }

    pub fn width(&self) -> f32 {
        self.u2 - self.u1
    }

    pub fn height(&self) -> f32 {
        self.v2 - self.v1
    }

    /// Transform a face-local UV (0-1) into this rectangle.
    pub fn map(&self, local: [f32; 2]) -> [f32; 2] {
        [
            self.u1 + local[0] * self.width(),
            self.v1 + local[1] * self.height(),
        ]
    }
}

/// UV rectangles for the six faces of one block.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BlockFaceUvs {
    pub top: UvCoords,
    pub bottom: UvCoords,
    pub north: UvCoords,
    pub south: UvCoords,
    pub east: UvCoords,
    pub west: UvCoords,
}

impl BlockFaceUvs {
    pub fn uniform(uv: UvCoords) -> Self {
        Self {
            top: uv,
            bottom: uv,
            north: uv,
            south: uv,
            east: uv,
            west: uv,
        }
    }

    pub fn get(&self, face: Face) -> UvCoords {
        match face {
            Face::Top => self.top,
            Face::Bottom => self.bottom,
            Face::North => self.north,
            Face::South => self.south,
            Face::East => self.east,
            Face::West => self.west,
        }
    }

    fn set(&mut self, face: Face, uv: UvCoords) {
        match face {
            Face::Top => self.top = uv,
            Face::Bottom => self.bottom = uv,
            Face::North => self.north = uv,
            Face::South => self.south = uv,
            Face::East => self.east = uv,
            Face::West => self.west = uv,
        }
    }
}

/// Atlas packing limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Edge length of one tile in pixels.
    pub tile_size: u32,
    /// Largest atlas edge in pixels.
    pub max_size: u32,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            tile_size: 16,
            max_size: 4096,
        }
    }
}

/// A packed atlas image plus per-block face UVs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextureAtlas {
    /// PNG-encoded atlas, base64 in JSON.
    #[serde(with = "base64_png")]
    pub atlas_image: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Face UVs keyed by full block name.
    pub uv_mapping: BTreeMap<String, BlockFaceUvs>,
    pub version: String,
    pub is_custom_resource_pack: bool,
    /// Blocks with at least one face on the placeholder tile.
    #[serde(default)]
    pub missing_textures: Vec<String>,
    /// UVs of the placeholder tile.
    #[serde(default)]
    pub placeholder: UvCoords,
}

impl TextureAtlas {
    /// Face UVs for a block, falling back to the placeholder tile.
    pub fn face_uvs(&self, block_name: &str) -> BlockFaceUvs {
        self.uv_mapping
            .get(block_name)
            .copied()
            .unwrap_or_else(|| BlockFaceUvs::uniform(self.placeholder))
    }

    pub fn contains(&self, block_name: &str) -> bool {
        self.uv_mapping.contains_key(block_name)
    }

    pub fn has_missing_textures(&self) -> bool {
        !self.missing_textures.is_empty()
    }

    /// JSON transport form.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Resolve, pack and map textures for the given block names.
pub fn build_atlas<'a, I>(
    pack: &TexturePack,
    block_names: I,
    config: &AtlasConfig,
) -> Result<TextureAtlas>
where
    I: IntoIterator<Item = &'a str>,
{
    let names: BTreeSet<&str> = block_names.into_iter().collect();
    let resolver = TextureResolver::new(pack);

    let resolved: Vec<(&str, FaceTextures)> = names
        .iter()
        .map(|name| (*name, resolver.resolve(name)))
        .collect();

    let mut builder = AtlasBuilder::new(config.tile_size, config.max_size);
    for (_, faces) in &resolved {
        for texture in faces.textures() {
            if let Some(data) = pack.get_texture(texture) {
                builder.add_texture(texture, data.clone());
            }
        }
    }
    let packed = builder.build()?;

    let mut uv_mapping = BTreeMap::new();
    let mut missing_textures = Vec::new();
    for (name, faces) in &resolved {
        let mut uvs = BlockFaceUvs::uniform(packed.placeholder);
        let mut missing = false;
        for face in Face::BOX_ORDER {
            match faces.get(face).and_then(|texture| packed.region(texture)) {
                Some(uv) => uvs.set(face, uv),
                None => missing = true,
            }
        }
        if missing && !is_invisible(name) {
            missing_textures.push(name.to_string());
        }
        uv_mapping.insert(name.to_string(), uvs);
    }

    if !missing_textures.is_empty() {
        log::warn!(
            "{} block(s) use the missing texture: {}",
            missing_textures.len(),
            missing_textures.join(", ")
        );
    }
    log::debug!(
        "atlas {}x{} with {} tiles for {} blocks",
        packed.width,
        packed.height,
        packed.tile_count(),
        uv_mapping.len()
    );

    Ok(TextureAtlas {
        atlas_image: packed.to_png()?,
        width: packed.width,
        height: packed.height,
        uv_mapping,
        version: pack.version.clone(),
        is_custom_resource_pack: pack.is_custom,
        missing_textures,
        placeholder: packed.placeholder,
    })
}

/// Encode raw RGBA8 pixels as PNG.
pub(crate) fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let cursor = std::io::Cursor::new(&mut bytes);
    let encoder = image::codecs::png::PngEncoder::new(cursor);

    encoder
        .write_image(pixels, width, height, image::ExtendedColorType::Rgba8)
        .map_err(|e| StructureError::AtlasBuild(format!("Failed to encode PNG: {}", e)))?;

    Ok(bytes)
}

pub(crate) mod base64_png {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource_pack::TextureData;

    fn pack() -> TexturePack {
        let mut pack = TexturePack::new();
        pack.add_texture("minecraft", "oak_planks", TextureData::solid(16, [160, 130, 80, 255]));
        pack.add_texture("minecraft", "stone", TextureData::solid(16, [120, 120, 120, 255]));
        pack
    }

    #[test]
    fn test_uv_map() {
        let uv = UvCoords::new(0.25, 0.5, 0.5, 0.75);
        assert_eq!(uv.map([0.0, 0.0]), [0.25, 0.5]);
        assert_eq!(uv.map([1.0, 1.0]), [0.5, 0.75]);
    }

    #[test]
    fn test_stairs_share_planks_tile() {
        let atlas = build_atlas(
            &pack(),
            ["minecraft:oak_stairs", "minecraft:oak_planks"],
            &AtlasConfig::default(),
        )
        .unwrap();

        let stairs = atlas.face_uvs("minecraft:oak_stairs");
        let planks = atlas.face_uvs("minecraft:oak_planks");
        assert_eq!(stairs, planks);
        assert_ne!(stairs.top, atlas.placeholder);
        assert!(atlas.missing_textures.is_empty());
    }

    #[test]
    fn test_unknown_block_is_reported() {
        let atlas = build_atlas(
            &pack(),
            ["somemod:flux_capacitor", "minecraft:stone", "minecraft:barrier"],
            &AtlasConfig::default(),
        )
        .unwrap();

        let uvs = atlas.face_uvs("somemod:flux_capacitor");
        assert_eq!(uvs, BlockFaceUvs::uniform(atlas.placeholder));
        assert_eq!(atlas.missing_textures, vec!["somemod:flux_capacitor"]);
        assert!(atlas.has_missing_textures());
    }

    #[test]
    fn test_json_carries_base64_png() {
        let atlas = build_atlas(&pack(), ["minecraft:stone"], &AtlasConfig::default()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&atlas.to_json().unwrap()).unwrap();

        let encoded = json["atlasImage"].as_str().unwrap();
        assert!(encoded.starts_with("iVBORw0KGgo"));
        assert!(json["uvMapping"]["minecraft:stone"]["top"]["u2"].is_number());
        assert_eq!(json["isCustomResourcePack"], false);

        let back: TextureAtlas = serde_json::from_value(json).unwrap();
        assert_eq!(back, atlas);
    }

    #[test]
    fn test_all_uvs_in_unit_square() {
        let atlas = build_atlas(
            &pack(),
            ["minecraft:stone", "minecraft:oak_slab", "mod:thing"],
            &AtlasConfig::default(),
        )
        .unwrap();
        for uvs in atlas.uv_mapping.values() {
            for face in Face::BOX_ORDER {
                let uv = uvs.get(face);
                for c in [uv.u1, uv.v1, uv.u2, uv.v2] {
                    assert!((0.0..=1.0).contains(&c));
                }
            }
        }
    }
}
