//! Structure file decoders.
//!
//! Each supported format decodes raw bytes into the canonical [`Structure`]
//! model. Java formats are usually gzip-compressed on disk; compressed input
//! is detected by its magic bytes and inflated before NBT parsing.

pub mod litematic;
pub mod mcstructure;
pub mod schematic;
pub mod sponge;

use crate::error::{Result, StructureError};
use crate::nbt::{self, NbtCompound, NbtFlavor, NbtValue};
use crate::types::Structure;
use flate2::read::GzDecoder;
use std::borrow::Cow;
use std::io::Read;
use std::path::Path;

/// Supported structure file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Legacy MCEdit/WorldEdit `.schematic` (numeric block ids).
    Schematic,
    /// Sponge schematic v2/v3 `.schem`.
    Schem,
    /// Litematica `.litematic`.
    Litematic,
    /// Bedrock `.mcstructure`.
    McStructure,
}

impl Format {
    pub const ALL: [Format; 4] = [
        Format::Schematic,
        Format::Schem,
        Format::Litematic,
        Format::McStructure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Schematic => "schematic",
            Format::Schem => "schem",
            Format::Litematic => "litematic",
            Format::McStructure => "mcstructure",
        }
    }

    /// Guess the format from a file path's extension.
    pub fn from_extension<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        ext.parse().ok()
    }
}

impl std::str::FromStr for Format {
    type Err = StructureError;

    fn from_str(s: &str) -> Result<Self> {
        let tag = s.trim().trim_start_matches('.').to_ascii_lowercase();
        Format::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == tag)
            .ok_or_else(|| StructureError::UnknownFormat(s.to_string()))
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decode a structure from raw bytes in the declared format.
pub fn decode(data: &[u8], format: Format) -> Result<Structure> {
    if data.is_empty() {
        return Err(StructureError::Parse("empty input buffer".to_string()));
    }
    let data = decompress(data)?;
    let structure = match format {
        Format::Schematic => schematic::decode(&data)?,
        Format::Schem => sponge::decode(&data)?,
        Format::Litematic => litematic::decode(&data)?,
        Format::McStructure => mcstructure::decode(&data)?,
    };
    log::debug!(
        "decoded {} '{}': {}x{}x{}, {} palette entries, {} blocks",
        format,
        structure.name,
        structure.dimensions.width(),
        structure.dimensions.height(),
        structure.dimensions.length(),
        structure.palette.len(),
        structure.block_count()
    );
    Ok(structure)
}

/// Inflate gzip input; anything else is returned untouched.
fn decompress(data: &[u8]) -> Result<Cow<'_, [u8]>> {
    if data.len() >= 2 && data[0] == 0x1f && data[1] == 0x8b {
        let mut decoder = GzDecoder::new(data);
        let mut out = Vec::new();
        decoder
            .read_to_end(&mut out)
            .map_err(|e| StructureError::Parse(format!("gzip decompression failed: {}", e)))?;
        if out.is_empty() {
            return Err(StructureError::Parse("empty input buffer".to_string()));
        }
        Ok(Cow::Owned(out))
    } else {
        Ok(Cow::Borrowed(data))
    }
}

/// Read an NBT stream whose root must be a compound.
pub(crate) fn read_root_compound(data: &[u8], flavor: NbtFlavor) -> Result<NbtCompound> {
    let (_, root) = nbt::read_root(data, flavor)?;
    match root {
        NbtValue::Compound(map) => Ok(map),
        other => Err(StructureError::Parse(format!(
            "root tag should be a compound, found {}",
            other.type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nbt::writer::{compound, write_root};
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn sponge_fixture() -> Vec<u8> {
        let palette = compound([
            ("minecraft:air", NbtValue::Int(0)),
            ("minecraft:stone", NbtValue::Int(1)),
        ]);
        let root = compound([
            ("Version", NbtValue::Int(2)),
            ("Width", NbtValue::Short(2)),
            ("Height", NbtValue::Short(1)),
            ("Length", NbtValue::Short(1)),
            ("Palette", palette),
            ("BlockData", NbtValue::ByteArray(vec![0, 1])),
        ]);
        write_root("Schematic", &root, NbtFlavor::BigEndian)
    }

    #[test]
    fn test_format_tags() {
        assert_eq!("schem".parse::<Format>().unwrap(), Format::Schem);
        assert_eq!(".LITEMATIC".parse::<Format>().unwrap(), Format::Litematic);
        assert!(matches!(
            "nbt".parse::<Format>(),
            Err(StructureError::UnknownFormat(_))
        ));
        assert_eq!(
            Format::from_extension("builds/house.mcstructure"),
            Some(Format::McStructure)
        );
        assert_eq!(Format::from_extension("README"), None);
    }

    #[test]
    fn test_empty_buffer_is_parse_error() {
        for format in Format::ALL {
            let err = decode(&[], format).unwrap_err();
            assert_eq!(err.kind(), crate::error::ErrorKind::Parse);
        }
    }

    #[test]
    fn test_gzip_input_is_inflated() {
        let raw = sponge_fixture();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&raw).unwrap();
        let gz = encoder.finish().unwrap();

        let plain = decode(&raw, Format::Schem).unwrap();
        let inflated = decode(&gz, Format::Schem).unwrap();
        assert_eq!(plain, inflated);
        assert_eq!(plain.block_count(), 1);
    }

    #[test]
    fn test_decoding_is_deterministic() {
        let raw = sponge_fixture();
        assert_eq!(decode(&raw, Format::Schem).unwrap(), decode(&raw, Format::Schem).unwrap());
    }
}
