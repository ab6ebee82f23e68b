//! WASM bindings for structure-render.
//!
//! This module provides JavaScript-friendly APIs for use in the browser.
//! Errors surface as `JsError`s whose message starts with the error kind,
//! e.g. `PARSE_ERROR: missing required field 'Palette'`.

use crate::error::StructureError;
use crate::{AtlasConfig, MesherConfig, ShapeRegistry, Structure, StructureMesher, TexturePack};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the browser console
    console_error_panic_hook::set_once();
}

fn js_error(e: StructureError) -> JsError {
    JsError::new(&format!("{}: {}", e.kind().as_str(), e))
}

/// A decoded structure.
#[wasm_bindgen]
pub struct StructureHandle {
    inner: Structure,
}

#[wasm_bindgen]
impl StructureHandle {
    /// Decode structure bytes; `format` is `schematic`, `schem`, `litematic`
    /// or `mcstructure`.
    #[wasm_bindgen(constructor)]
    pub fn new(data: &[u8], format: &str) -> Result<StructureHandle, JsError> {
        let inner = crate::decode(data, format).map_err(js_error)?;
        Ok(StructureHandle { inner })
    }

    #[wasm_bindgen(getter)]
    pub fn name(&self) -> String {
        self.inner.name.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.dimensions.width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.dimensions.height()
    }

    #[wasm_bindgen(getter)]
    pub fn length(&self) -> u32 {
        self.inner.dimensions.length()
    }

    #[wasm_bindgen(getter)]
    pub fn block_count(&self) -> usize {
        self.inner.block_count()
    }

    /// Palette entries as block-state strings.
    pub fn palette(&self) -> js_sys::Array {
        self.inner
            .palette
            .iter()
            .map(|state| JsValue::from_str(&state.to_string()))
            .collect()
    }
}

/// Load a texture pack from bytes and return a handle.
#[wasm_bindgen]
pub struct TexturePackHandle {
    inner: TexturePack,
}

#[wasm_bindgen]
impl TexturePackHandle {
    /// Load a resource pack from a ZIP file's bytes.
    ///
    /// `custom` marks the pack as user-supplied in the atlas output.
    #[wasm_bindgen(constructor)]
    pub fn new(data: &[u8], custom: bool) -> Result<TexturePackHandle, JsError> {
        let mut inner = crate::load_resource_pack_from_bytes(data).map_err(js_error)?;
        inner.is_custom = custom;
        Ok(TexturePackHandle { inner })
    }

    /// Get the number of textures in the pack.
    #[wasm_bindgen(getter)]
    pub fn texture_count(&self) -> usize {
        self.inner.texture_count()
    }

    #[wasm_bindgen(getter)]
    pub fn version(&self) -> String {
        self.inner.version.clone()
    }
}

/// The active shape registry.
#[wasm_bindgen]
pub struct ShapeRegistryHandle {
    inner: ShapeRegistry,
}

#[wasm_bindgen]
impl ShapeRegistryHandle {
    /// The built-in registry.
    #[wasm_bindgen(constructor)]
    pub fn new() -> ShapeRegistryHandle {
        ShapeRegistryHandle {
            inner: ShapeRegistry::builtin(),
        }
    }

    /// Replace the registry wholesale from a JSON payload. Classification
    /// caches start empty.
    pub fn replace(&mut self, json: &str) -> Result<(), JsError> {
        let payload = serde_json::from_str(json)
            .map_err(|e| js_error(StructureError::Registry(format!("invalid payload: {}", e))))?;
        self.inner = self.inner.replace(payload).map_err(js_error)?;
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn version(&self) -> String {
        self.inner.version().to_string()
    }

    /// Shape name a block classifies to.
    pub fn classify(&self, block_name: &str) -> String {
        self.inner.classify(block_name)
    }
}

impl Default for ShapeRegistryHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// `RenderData` JSON for a structure.
#[wasm_bindgen]
pub fn render_data_json(
    structure: &StructureHandle,
    registry: &ShapeRegistryHandle,
) -> Result<String, JsError> {
    crate::build_render_data(&structure.inner, &registry.inner, false)
        .to_json()
        .map_err(js_error)
}

/// `TextureAtlas` JSON (PNG as base64) for a structure's palette.
#[wasm_bindgen]
pub fn texture_atlas_json(
    structure: &StructureHandle,
    pack: &TexturePackHandle,
    max_size: Option<u32>,
) -> Result<String, JsError> {
    let config = atlas_config(max_size);
    crate::build_structure_atlas(&structure.inner, &pack.inner, &config)
        .and_then(|atlas| atlas.to_json())
        .map_err(js_error)
}

fn atlas_config(max_size: Option<u32>) -> AtlasConfig {
    let mut config = AtlasConfig::default();
    if let Some(max_size) = max_size {
        config.max_size = max_size;
    }
    config
}

/// Mesh result containing flat buffers and the atlas image.
#[wasm_bindgen]
pub struct MeshResult {
    positions: Vec<f32>,
    normals: Vec<f32>,
    uvs: Vec<f32>,
    indices: Vec<u32>,
    atlas_png: Vec<u8>,
    missing_textures: Vec<String>,
}

#[wasm_bindgen]
impl MeshResult {
    #[wasm_bindgen(getter)]
    pub fn positions(&self) -> Vec<f32> {
        self.positions.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn normals(&self) -> Vec<f32> {
        self.normals.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn uvs(&self) -> Vec<f32> {
        self.uvs.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn indices(&self) -> Vec<u32> {
        self.indices.clone()
    }

    /// Get the atlas PNG data.
    #[wasm_bindgen(getter)]
    pub fn atlas_png(&self) -> Vec<u8> {
        self.atlas_png.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn missing_textures(&self) -> js_sys::Array {
        self.missing_textures
            .iter()
            .map(|name| JsValue::from_str(name))
            .collect()
    }

    /// Get the total vertex count.
    #[wasm_bindgen(getter)]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get the total triangle count.
    #[wasm_bindgen(getter)]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Mesh a whole structure with textures from `pack`.
#[wasm_bindgen]
pub fn mesh_structure(
    structure: &StructureHandle,
    registry: &ShapeRegistryHandle,
    pack: &TexturePackHandle,
    max_size: Option<u32>,
) -> Result<MeshResult, JsError> {
    let config = atlas_config(max_size);
    let atlas =
        crate::build_structure_atlas(&structure.inner, &pack.inner, &config).map_err(js_error)?;

    let config = MesherConfig {
        parallel: false,
        ..MesherConfig::default()
    };
    let output =
        StructureMesher::with_config(&registry.inner, config).mesh(&structure.inner, &atlas);
    let raw = crate::export_raw(&output, &atlas);

    Ok(MeshResult {
        positions: raw.positions,
        normals: raw.normals,
        uvs: raw.uvs,
        indices: raw.indices,
        atlas_png: raw.texture_png,
        missing_textures: atlas.missing_textures,
    })
}
