//! Sponge schematic (`.schem`) decoder, versions 2 and 3.
//!
//! v2 keeps `Palette` and `BlockData` at the root; v3 nests everything in a
//! `Schematic` compound and moves them under `Blocks.Palette`/`Blocks.Data`.
//! Block data is a varint stream of palette indices in `(y, z, x)` order.

use super::read_root_compound;
use crate::error::{Result, StructureError};
use crate::nbt::{CompoundExt, NbtCompound, NbtFlavor};
use crate::types::{BlockState, Dimensions, Structure, StructureBuilder};
use std::collections::HashMap;

/// Little-endian base-128 varints, decoded lazily from a byte stream.
///
/// A value cut off by the end of the stream keeps the bits read so far.
pub struct Varints<'a> {
    bytes: std::slice::Iter<'a, u8>,
}

pub fn varints(data: &[u8]) -> Varints<'_> {
    Varints { bytes: data.iter() }
}

impl Iterator for Varints<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let mut value = 0u32;
        let mut shift = 0u32;
        let mut read_any = false;
        for &byte in self.bytes.by_ref() {
            read_any = true;
            if shift < 32 {
                value |= ((byte & 0x7f) as u32) << shift;
            }
            if byte & 0x80 == 0 {
                break;
            }
            shift = shift.saturating_add(7);
        }
        read_any.then_some(value)
    }
}

/// Parse a palette compound into `index -> state`.
fn read_palette(palette: &NbtCompound) -> Result<HashMap<u32, BlockState>> {
    let mut states = HashMap::with_capacity(palette.len());
    for (key, value) in palette {
        let index = value.as_i64().ok_or_else(|| {
            StructureError::Parse(format!("palette entry '{}' has no integer index", key))
        })?;
        if index < 0 {
            return Err(StructureError::Parse(format!(
                "palette entry '{}' has negative index {}",
                key, index
            )));
        }
        states.insert(index as u32, BlockState::parse(key)?);
    }
    Ok(states)
}

pub fn decode(data: &[u8]) -> Result<Structure> {
    let root = read_root_compound(data, NbtFlavor::BigEndian)?;
    // v3 files wrap everything in a "Schematic" compound
    let root = match root.get("Schematic").and_then(|v| v.as_compound()) {
        Some(inner) => inner,
        None => &root,
    };

    let width = root.int("Width")?;
    let height = root.int("Height")?;
    let length = root.int("Length")?;
    let dimensions = Dimensions::new(width, height, length)?;

    let (palette, block_data) = match root.get("Blocks").and_then(|v| v.as_compound()) {
        Some(blocks) => (blocks.compound("Palette")?, blocks.field("Data")?),
        None => (root.compound("Palette")?, root.field("BlockData")?),
    };
    let block_data = block_data.to_byte_vec().ok_or_else(|| {
        StructureError::Parse("block data should be a byte array".to_string())
    })?;

    let states = read_palette(palette)?;

    let name = root
        .get("Metadata")
        .and_then(|m| m.as_compound())
        .and_then(|m| m.get("Name"))
        .and_then(|n| n.as_str())
        .unwrap_or("schem")
        .to_string();
    let mut builder = StructureBuilder::new(name, dimensions);

    // Intern in index order so the palette order is stable across runs.
    let mut indices: Vec<_> = states.keys().copied().collect();
    indices.sort_unstable();
    let mut remap: HashMap<u32, usize> = HashMap::with_capacity(indices.len());
    for index in indices {
        if let Some(state) = states.get(&index) {
            remap.insert(index, builder.add_state(state.clone()));
        }
    }

    let volume = dimensions.volume()?;
    let mut decoded = 0;
    for (i, value) in varints(&block_data).take(volume).enumerate() {
        decoded = i + 1;
        match remap.get(&value) {
            Some(&palette_index) => builder.set_block(dimensions.coords(i), palette_index),
            None => log::warn!("block data references unknown palette index {}", value),
        }
    }

    if decoded < volume {
        log::warn!(
            "varint block data underrun: {} of {} values, padding with 0",
            decoded,
            volume
        );
        // padding only places blocks when index 0 is a solid state
        let padding = states
            .get(&0)
            .filter(|state| !state.is_air())
            .and_then(|_| remap.get(&0));
        if let Some(&palette_index) = padding {
            for i in decoded..volume {
                builder.set_block(dimensions.coords(i), palette_index);
            }
        }
    }

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nbt::writer::{compound, write_root};
    use crate::nbt::NbtValue;
    use crate::types::Position;

    #[test]
    fn test_varint_multi_byte() {
        assert_eq!(varints(&[0x8E, 0x02]).collect::<Vec<_>>(), vec![270]);
        assert_eq!(
            varints(&[0x01, 0x7f, 0x80, 0x01]).collect::<Vec<_>>(),
            vec![1, 127, 128]
        );
    }

    #[test]
    fn test_varint_stream_ends_with_data() {
        assert_eq!(varints(&[]).count(), 0);
        // a value cut off mid-way keeps its low bits
        assert_eq!(varints(&[0x05, 0x81]).collect::<Vec<_>>(), vec![5, 1]);
    }

    fn sized_fixture(dims: (i16, i16, i16), palette: NbtValue, data: Vec<i8>) -> Vec<u8> {
        let root = compound([
            ("Version", NbtValue::Int(2)),
            ("Width", NbtValue::Short(dims.0)),
            ("Height", NbtValue::Short(dims.1)),
            ("Length", NbtValue::Short(dims.2)),
            ("Palette", palette),
            ("BlockData", NbtValue::ByteArray(data)),
        ]);
        write_root("Schematic", &root, NbtFlavor::BigEndian)
    }

    #[test]
    fn test_underrun_pads_with_index_zero() {
        let palette = compound([
            ("minecraft:stone", NbtValue::Int(0)),
            ("minecraft:glass", NbtValue::Int(1)),
        ]);
        let structure = decode(&sized_fixture((3, 1, 1), palette, vec![1])).unwrap();
        assert_eq!(structure.block_count(), 3);
        assert_eq!(structure.state_at(Position::new(0, 0, 0)).unwrap().name, "minecraft:glass");
        assert_eq!(structure.state_at(Position::new(2, 0, 0)).unwrap().name, "minecraft:stone");
    }

    #[test]
    fn test_huge_declared_size_with_tiny_payload() {
        let palette = || {
            compound([
                ("minecraft:air", NbtValue::Int(0)),
                ("minecraft:stone", NbtValue::Int(1)),
            ])
        };
        let err = decode(&sized_fixture((32767, 32767, 32767), palette(), vec![0])).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Parse);

        // under the voxel cap the air padding is never materialised
        let structure = decode(&sized_fixture((32767, 256, 256), palette(), vec![1])).unwrap();
        assert_eq!(structure.block_count(), 1);
    }

    fn v2_fixture() -> Vec<u8> {
        let palette = compound([
            ("minecraft:air", NbtValue::Int(0)),
            ("minecraft:oak_stairs[facing=north,half=bottom]", NbtValue::Int(1)),
            ("minecraft:stone", compound([("value", NbtValue::Int(2))])),
        ]);
        let root = compound([
            ("Version", NbtValue::Int(2)),
            ("Width", NbtValue::Short(2)),
            ("Height", NbtValue::Short(2)),
            ("Length", NbtValue::Short(1)),
            ("Palette", palette),
            ("BlockData", NbtValue::ByteArray(vec![1, 0, 2, 2])),
        ]);
        write_root("Schematic", &root, NbtFlavor::BigEndian)
    }

    #[test]
    fn test_decode_v2() {
        let structure = decode(&v2_fixture()).unwrap();
        assert_eq!(structure.block_count(), 3);
        let stair = structure.state_at(Position::new(0, 0, 0)).unwrap();
        assert_eq!(stair.name, "minecraft:oak_stairs");
        assert_eq!(stair.property("facing"), Some("north"));
        assert!(structure.state_at(Position::new(1, 0, 0)).is_none());
        assert_eq!(structure.state_at(Position::new(1, 1, 0)).unwrap().name, "minecraft:stone");
        for block in structure.blocks() {
            assert!(!structure.state(block).is_air());
        }
        // palette follows index order
        assert!(structure.palette[0].is_air());
    }

    #[test]
    fn test_decode_v3() {
        let palette = compound([
            ("minecraft:air", NbtValue::Int(0)),
            ("minecraft:glass", NbtValue::Int(1)),
        ]);
        let blocks = compound([
            ("Palette", palette),
            ("Data", NbtValue::ByteArray(vec![1, 0, 1])),
        ]);
        let metadata = compound([("Name", NbtValue::String("Tower".into()))]);
        let inner = compound([
            ("Version", NbtValue::Int(3)),
            ("Width", NbtValue::Short(1)),
            ("Height", NbtValue::Short(3)),
            ("Length", NbtValue::Short(1)),
            ("Metadata", metadata),
            ("Blocks", blocks),
        ]);
        let root = compound([("Schematic", inner)]);
        let structure = decode(&write_root("", &root, NbtFlavor::BigEndian)).unwrap();
        assert_eq!(structure.name, "Tower");
        assert_eq!(structure.block_count(), 2);
        assert!(structure.state_at(Position::new(0, 1, 0)).is_none());
    }

    #[test]
    fn test_missing_palette() {
        let root = compound([
            ("Width", NbtValue::Short(1)),
            ("Height", NbtValue::Short(1)),
            ("Length", NbtValue::Short(1)),
            ("BlockData", NbtValue::ByteArray(vec![0])),
        ]);
        let err = decode(&write_root("", &root, NbtFlavor::BigEndian)).unwrap_err();
        assert!(err.to_string().contains("Palette"));
    }
}
