//! Texture pack loading from ZIP files and directories.

use super::texture::load_texture_from_bytes;
use super::TexturePack;
use crate::error::{Result, StructureError};
use std::io::Read;
use std::path::Path;

/// Load a texture pack from a file path.
///
/// Supports both ZIP files and directories. Packs loaded this way are
/// marked as custom.
pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<TexturePack> {
    let path = path.as_ref();

    let mut pack = if path.is_dir() {
        load_from_directory(path)?
    } else {
        let data = std::fs::read(path)?;
        load_from_bytes(&data)?
    };
    pack.is_custom = true;

    log::debug!(
        "loaded {} block textures from {} (pack format {})",
        pack.texture_count(),
        path.display(),
        pack.version
    );
    Ok(pack)
}

/// Load a texture pack from bytes (ZIP data).
pub fn load_from_bytes(data: &[u8]) -> Result<TexturePack> {
    let cursor = std::io::Cursor::new(data);
    let mut archive = zip::ZipArchive::new(cursor)?;

    let mut pack = TexturePack::new();

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }
        let file_path = file.name().to_string();

        if file_path == "pack.mcmeta" {
            let mut contents = String::new();
            file.read_to_string(&mut contents)?;
            if let Some(version) = parse_pack_format(&contents) {
                pack.version = version;
            }
            continue;
        }

        let Some((namespace, name)) = parse_block_texture_path(&file_path) else {
            continue;
        };
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        match load_texture_from_bytes(&data) {
            Ok(texture) => pack.add_texture(namespace, name, texture),
            Err(e) => log::warn!("failed to load texture {}:{}: {}", namespace, name, e),
        }
    }

    if pack.is_empty() {
        log::warn!("resource pack contains no block textures");
    }
    Ok(pack)
}

/// Load a texture pack from a directory.
fn load_from_directory(path: &Path) -> Result<TexturePack> {
    let mut pack = TexturePack::new();

    let assets_path = path.join("assets");
    if !assets_path.exists() {
        return Err(StructureError::InvalidResourcePack(
            "No assets directory found".to_string(),
        ));
    }

    let mcmeta = path.join("pack.mcmeta");
    if mcmeta.is_file() {
        if let Some(version) = parse_pack_format(&std::fs::read_to_string(&mcmeta)?) {
            pack.version = version;
        }
    }

    for namespace_entry in std::fs::read_dir(&assets_path)? {
        let namespace_entry = namespace_entry?;
        if !namespace_entry.file_type()?.is_dir() {
            continue;
        }

        let namespace = namespace_entry.file_name().to_string_lossy().to_string();
        let block_path = namespace_entry.path().join("textures").join("block");
        if !block_path.is_dir() {
            continue;
        }

        load_texture_files_recursive(&block_path, &block_path, &mut |name, data| {
            match load_texture_from_bytes(data) {
                Ok(texture) => pack.add_texture(&namespace, name, texture),
                Err(e) => log::warn!("failed to load texture {}:{}: {}", namespace, name, e),
            }
        })?;
    }

    Ok(pack)
}

/// Parse `assets/{namespace}/textures/block/{name}.png` into
/// `(namespace, name)`.
fn parse_block_texture_path(file_path: &str) -> Option<(&str, &str)> {
    let rest = file_path.strip_prefix("assets/")?;
    let (namespace, rest) = rest.split_once('/')?;
    let name = rest.strip_prefix("textures/block/")?.strip_suffix(".png")?;
    if name.is_empty() {
        return None;
    }
    Some((namespace, name))
}

/// Read `pack.pack_format` from a `pack.mcmeta` document.
fn parse_pack_format(contents: &str) -> Option<String> {
    let value: serde_json::Value = match serde_json::from_str(contents) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("unreadable pack.mcmeta: {}", e);
            return None;
        }
    };
    value
        .get("pack")
        .and_then(|pack| pack.get("pack_format"))
        .map(|format| match format {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
}

/// Load texture files recursively from a directory.
fn load_texture_files_recursive<F>(base: &Path, dir: &Path, handler: &mut F) -> Result<()>
where
    F: FnMut(&str, &[u8]),
{
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            load_texture_files_recursive(base, &path, handler)?;
        } else if path.extension().map(|e| e == "png").unwrap_or(false) {
            let Ok(relative) = path.strip_prefix(base) else {
                continue;
            };
            let relative = relative
                .with_extension("")
                .to_string_lossy()
                .replace('\\', "/");

            let data = std::fs::read(&path)?;
            handler(&relative, &data);
        }
    }
    Ok(())
}
