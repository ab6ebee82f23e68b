//! # Structure Render
//!
//! A Rust library for turning Minecraft structure files into renderable
//! block data, meshes and texture atlases.
//!
//! ## Overview
//!
//! Four structure formats are decoded into one [`Structure`] model: legacy
//! MCEdit `.schematic`, Sponge `.schem`, Litematica `.litematic` and Bedrock
//! `.mcstructure`. Every block is then classified into a render shape
//! (stairs, slabs, fences, plants...) with its facing, half, stair corner
//! and connection state. From there the crate can emit [`RenderData`] for a
//! client-side renderer, a [`TextureAtlas`] for a resource pack, or one
//! merged [`Mesh`].
//!
//! ## Quick Start
//!
//! ```ignore
//! use structure_render::{decode, build_render_data, ShapeRegistry};
//!
//! let bytes = std::fs::read("house.litematic")?;
//! let structure = decode(&bytes, "litematic")?;
//!
//! let registry = ShapeRegistry::builtin();
//! let data = build_render_data(&structure, &registry, true);
//! println!("{}", data.to_json()?);
//! ```
//!
//! ## Textures and meshes
//!
//! ```ignore
//! use structure_render::{load_resource_pack, build_atlas, AtlasConfig, StructureMesher};
//!
//! let pack = load_resource_pack("path/to/pack.zip")?;
//! let names = structure.palette.iter().map(|s| s.name.as_str());
//! let atlas = build_atlas(&pack, names, &AtlasConfig::default())?;
//!
//! let output = StructureMesher::new(&registry).mesh(&structure, &atlas);
//! ```

pub mod atlas;
pub mod config;
pub mod error;
pub mod export;
pub mod formats;
pub mod mesher;
pub mod nbt;
pub mod render;
pub mod resolver;
pub mod resource_pack;
pub mod shape;
pub mod types;

// Re-export main types for convenience
pub use atlas::{build_atlas, AtlasConfig, BlockFaceUvs, TextureAtlas, UvCoords};
pub use config::CoreConfig;
pub use error::{ErrorKind, Result, StructureError};
pub use export::raw::{export_raw, RawMeshData};
pub use formats::Format;
pub use mesher::{Mesh, MesherConfig, MesherOutput, StructureMesher, Vertex};
pub use render::{build_render_data, RenderData};
pub use resolver::{resolve_block, resolve_structure, ResolvedBlock};
pub use resource_pack::TexturePack;
pub use shape::{RegistryPayload, ShapeDefinition, ShapeRegistry};
pub use types::{Block, BlockState, Dimensions, Direction, Position, Structure};

/// Decode a structure from bytes and a format tag
/// (`schematic`, `schem`, `litematic` or `mcstructure`).
pub fn decode(data: &[u8], format: &str) -> Result<Structure> {
    formats::decode(data, format.parse()?)
}

/// Load a texture pack from a file path (ZIP or directory).
pub fn load_resource_pack<P: AsRef<std::path::Path>>(path: P) -> Result<TexturePack> {
    resource_pack::loader::load_from_path(path)
}

/// Load a texture pack from bytes (for WASM compatibility).
pub fn load_resource_pack_from_bytes(data: &[u8]) -> Result<TexturePack> {
    resource_pack::loader::load_from_bytes(data)
}

/// Atlas for every block in a structure's palette.
pub fn build_structure_atlas(
    structure: &Structure,
    pack: &TexturePack,
    config: &AtlasConfig,
) -> Result<TextureAtlas> {
    let names = structure
        .palette
        .iter()
        .filter(|state| !state.is_air())
        .map(|state| state.name.as_str());
    build_atlas(pack, names, config)
}

#[cfg(feature = "wasm")]
pub mod wasm;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nbt::writer::{compound, write_root};
    use crate::nbt::{NbtFlavor, NbtValue};

    fn sponge_bytes() -> Vec<u8> {
        let palette = compound([
            ("minecraft:air", NbtValue::Int(0)),
            ("minecraft:oak_planks", NbtValue::Int(1)),
            ("minecraft:oak_stairs[facing=north,half=bottom]", NbtValue::Int(2)),
        ]);
        let root = compound([
            ("Version", NbtValue::Int(2)),
            ("Width", NbtValue::Short(2)),
            ("Height", NbtValue::Short(1)),
            ("Length", NbtValue::Short(1)),
            ("Palette", palette),
            ("BlockData", NbtValue::ByteArray(vec![1, 2])),
        ]);
        write_root("Schematic", &root, NbtFlavor::BigEndian)
    }

    #[test]
    fn test_decode_by_tag() {
        let structure = decode(&sponge_bytes(), "schem").unwrap();
        assert_eq!(structure.block_count(), 2);

        let err = decode(&sponge_bytes(), "obj").unwrap_err();
        assert_eq!(err.kind().as_str(), "PARSE_ERROR");
        let err = decode(&[], "schem").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_decoding_is_deterministic() {
        let a = decode(&sponge_bytes(), "schem").unwrap();
        let b = decode(&sponge_bytes(), "schem").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_pipeline_end_to_end() {
        let structure = decode(&sponge_bytes(), "schem").unwrap();
        let registry = ShapeRegistry::builtin();

        let mut pack = TexturePack::new();
        let planks = resource_pack::TextureData::solid(16, [1, 2, 3, 255]);
        pack.add_texture("minecraft", "oak_planks", planks);
        let atlas = build_structure_atlas(&structure, &pack, &AtlasConfig::default()).unwrap();
        assert!(atlas.missing_textures.is_empty());
        assert!(!atlas.contains("minecraft:air"));

        let data = build_render_data(&structure, &registry, true);
        assert_eq!(data.blocks[1].shape.as_deref(), Some("stairs"));

        let output = StructureMesher::new(&registry).mesh(&structure, &atlas);
        // one cube and one two-box stair
        assert_eq!(output.vertex_count(), 24 + 48);

        let raw = export_raw(&output, &atlas);
        assert_eq!(raw.vertex_count(), output.vertex_count());
    }
}
