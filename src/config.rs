//! Pipeline configuration.

use crate::atlas::AtlasConfig;
use crate::error::Result;
use crate::mesher::MesherConfig;
use crate::resource_pack::{self, TexturePack};
use crate::shape::ShapeRegistry;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for the whole decode, resolve, mesh and atlas pipeline.
///
/// Every field has a default, so `{}` is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub atlas: AtlasConfig,
    pub mesher: MesherConfig,
    /// Shape registry payload loaded in place of the built-in table.
    pub shape_registry: Option<PathBuf>,
    /// Resource pack (ZIP or directory) providing block textures.
    pub resource_pack: Option<PathBuf>,
}

impl CoreConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// The configured shape registry, or the built-in one.
    pub fn shape_registry(&self) -> Result<ShapeRegistry> {
        match &self.shape_registry {
            Some(path) => {
                let registry = ShapeRegistry::builtin()
                    .replace(serde_json::from_str(&std::fs::read_to_string(path)?)?)?;
                log::debug!(
                    "loaded shape registry {} ({} shapes) from {}",
                    registry.version(),
                    registry.shape_count(),
                    path.display()
                );
                Ok(registry)
            }
            None => Ok(ShapeRegistry::builtin()),
        }
    }

    /// The configured texture pack, or an empty one.
    pub fn texture_pack(&self) -> Result<TexturePack> {
        match &self.resource_pack {
            Some(path) => resource_pack::load_from_path(path),
            None => Ok(TexturePack::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = CoreConfig::from_json_str("{}").unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.atlas.tile_size, 16);
        assert_eq!(config.atlas.max_size, 4096);
        assert!(!config.mesher.include_air);
        assert!(config.mesher.parallel);
    }

    #[test]
    fn test_partial_config() {
        let config = CoreConfig::from_json_str(
            r#"{"atlas": {"max_size": 1024}, "mesher": {"parallel": false}}"#,
        )
        .unwrap();
        assert_eq!(config.atlas.tile_size, 16);
        assert_eq!(config.atlas.max_size, 1024);
        assert!(!config.mesher.parallel);
    }

    #[test]
    fn test_load_with_registry_file() {
        let dir = tempfile::tempdir().unwrap();
        let shapes = dir.path().join("shapes.json");
        std::fs::write(
            &shapes,
            r#"{
                "version": "2.0",
                "shapes": {"full": {"geometry": "box", "boxes": [{"from": [0,0,0], "to": [16,16,16]}]}},
                "blockMapping": {"minecraft:glass": "full"}
            }"#,
        )
        .unwrap();
        let config_path = dir.path().join("config.json");
        std::fs::write(
            &config_path,
            format!(r#"{{"shape_registry": {:?}}}"#, shapes.to_string_lossy()),
        )
        .unwrap();

        let config = CoreConfig::load(&config_path).unwrap();
        let registry = config.shape_registry().unwrap();
        assert_eq!(registry.version(), "2.0");
        assert!(config.texture_pack().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_json() {
        assert!(CoreConfig::from_json_str("{not json").is_err());
    }
}
