//! Block texture packs.
//!
//! A texture pack holds the block textures of a Minecraft resource pack
//! (`assets/<namespace>/textures/block/*.png`), keyed by namespace and
//! texture name.

pub mod loader;
pub mod texture;

pub use loader::{load_from_bytes, load_from_path};
pub use texture::TextureData;

use std::collections::HashMap;

/// Block textures loaded from a resource pack.
#[derive(Debug, Clone)]
pub struct TexturePack {
    /// Texture data by namespace and texture name.
    /// Key: namespace (e.g., "minecraft"), Value: map of texture name to data.
    pub textures: HashMap<String, HashMap<String, TextureData>>,
    /// `pack_format` from `pack.mcmeta`, or "unknown".
    pub version: String,
    /// Whether the pack came from user input rather than a bundled source.
    pub is_custom: bool,
}

impl Default for TexturePack {
    fn default() -> Self {
        Self {
            textures: HashMap::new(),
            version: "unknown".to_string(),
            is_custom: false,
        }
    }
}

impl TexturePack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a texture by name (e.g., "oak_planks" or "mymod:gear").
    pub fn get_texture(&self, name: &str) -> Option<&TextureData> {
        let (namespace, path) = parse_texture_name(name);
        self.textures.get(namespace).and_then(|ns| ns.get(path))
    }

    pub fn has_texture(&self, name: &str) -> bool {
        self.get_texture(name).is_some()
    }

    /// Add a texture.
    pub fn add_texture(&mut self, namespace: &str, name: &str, texture: TextureData) {
        self.textures
            .entry(namespace.to_string())
            .or_default()
            .insert(name.to_string(), texture);
    }

    /// Get the total number of textures.
    pub fn texture_count(&self) -> usize {
        self.textures.values().map(|m| m.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.texture_count() == 0
    }

    /// Get all namespaces in the pack.
    pub fn namespaces(&self) -> Vec<&str> {
        let mut namespaces: Vec<_> = self.textures.keys().map(|s| s.as_str()).collect();
        namespaces.sort();
        namespaces
    }
}

/// Split a texture name into namespace and path.
/// "minecraft:stone" -> ("minecraft", "stone")
/// "stone" -> ("minecraft", "stone")
fn parse_texture_name(name: &str) -> (&str, &str) {
    if let Some((namespace, path)) = name.split_once(':') {
        (namespace, path)
    } else {
        ("minecraft", name)
    }
}
