//! Bedrock `.mcstructure` decoder.
//!
//! Files are uncompressed little-endian NBT. Only the first block-index layer
//! is read; the second layer holds waterlogging blocks and is ignored.

use super::read_root_compound;
use crate::error::{Result, StructureError};
use crate::nbt::{CompoundExt, NbtCompound, NbtFlavor, NbtValue};
use crate::types::{BlockState, Dimensions, Structure, StructureBuilder};

/// Parse the root, trying plain little-endian before the varint flavor.
fn read_root(data: &[u8]) -> Result<NbtCompound> {
    match read_root_compound(data, NbtFlavor::LittleEndian) {
        Ok(root) if root.contains_key("structure") => Ok(root),
        first => match read_root_compound(data, NbtFlavor::LittleVarint) {
            Ok(root) => {
                log::debug!("mcstructure decoded with varint NBT flavor");
                Ok(root)
            }
            Err(_) => first,
        },
    }
}

fn read_palette_entry(entry: &NbtValue) -> Result<BlockState> {
    let entry = entry
        .as_compound()
        .ok_or_else(|| StructureError::Parse("block_palette entry should be a compound".to_string()))?;
    let mut state = BlockState::new(entry.string("name")?);
    if let Some(states) = entry.get("states").and_then(|s| s.as_compound()) {
        for (key, value) in states {
            if let Some(value) = value.to_property_string() {
                state.properties.insert(key.clone(), value);
            }
        }
    }
    Ok(state)
}

pub fn decode(data: &[u8]) -> Result<Structure> {
    let root = read_root(data)?;

    let size = root.field("size")?.to_i32_vec().ok_or_else(|| {
        StructureError::Parse("field 'size' should be a list of integers".to_string())
    })?;
    if size.len() != 3 {
        return Err(StructureError::Parse(format!(
            "field 'size' should have 3 elements, found {}",
            size.len()
        )));
    }
    let dimensions = Dimensions::new(size[0] as i64, size[1] as i64, size[2] as i64)?;

    let structure = root.compound("structure")?;
    let block_palette = structure
        .compound("palette")?
        .compound("default")?
        .list("block_palette")?;

    let layers = structure.list("block_indices")?;
    let indices = layers
        .first()
        .ok_or_else(|| StructureError::missing_field("block_indices[0]"))?
        .to_i32_vec()
        .ok_or_else(|| {
            StructureError::Parse("block_indices layer should be a list of integers".to_string())
        })?;

    let mut builder = StructureBuilder::new("mcstructure", dimensions);
    let remap = block_palette
        .iter()
        .map(|entry| read_palette_entry(entry).map(|state| builder.add_state(state)))
        .collect::<Result<Vec<_>>>()?;

    let volume = dimensions.volume()?;
    for (i, &index) in indices.iter().enumerate().take(volume) {
        // -1 marks a structure void
        if index < 0 {
            continue;
        }
        match remap.get(index as usize) {
            Some(&palette_index) => builder.set_block(dimensions.coords(i), palette_index),
            None => log::warn!("block_indices references unknown palette index {}", index),
        }
    }

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nbt::writer::{compound, write_root};
    use crate::types::Position;

    fn fixture(flavor: NbtFlavor) -> Vec<u8> {
        let palette = NbtValue::List(vec![
            compound([("name", NbtValue::String("minecraft:air".into()))]),
            compound([
                ("name", NbtValue::String("minecraft:oak_stairs".into())),
                (
                    "states",
                    compound([
                        ("weirdo_direction", NbtValue::Int(2)),
                        ("upside_down_bit", NbtValue::Byte(1)),
                    ]),
                ),
                ("version", NbtValue::Int(17959425)),
            ]),
            compound([("name", NbtValue::String("minecraft:stone".into()))]),
        ]);
        let layers = NbtValue::List(vec![
            NbtValue::List(vec![
                NbtValue::Int(1),
                NbtValue::Int(0),
                NbtValue::Int(2),
                NbtValue::Int(-1),
            ]),
            // waterlogging layer: stone under the stair and over the air gap
            NbtValue::List(vec![
                NbtValue::Int(2),
                NbtValue::Int(2),
                NbtValue::Int(-1),
                NbtValue::Int(-1),
            ]),
        ]);
        let structure = compound([
            ("block_indices", layers),
            ("entities", NbtValue::List(vec![])),
            (
                "palette",
                compound([("default", compound([("block_palette", palette)]))]),
            ),
        ]);
        let root = compound([
            ("format_version", NbtValue::Int(1)),
            (
                "size",
                NbtValue::List(vec![NbtValue::Int(2), NbtValue::Int(1), NbtValue::Int(2)]),
            ),
            ("structure", structure),
        ]);
        write_root("", &root, flavor)
    }

    #[test]
    fn test_decode_little_endian() {
        let structure = decode(&fixture(NbtFlavor::LittleEndian)).unwrap();
        assert_eq!(structure.block_count(), 2);
        let stair = structure.state_at(Position::new(0, 0, 0)).unwrap();
        assert_eq!(stair.name, "minecraft:oak_stairs");
        assert_eq!(stair.property("upside_down_bit"), Some("true"));
        assert_eq!(stair.property("weirdo_direction"), Some("2"));
        assert_eq!(structure.state_at(Position::new(0, 0, 1)).unwrap().name, "minecraft:stone");
    }

    #[test]
    fn test_second_layer_is_ignored() {
        let structure = decode(&fixture(NbtFlavor::LittleEndian)).unwrap();
        assert_eq!(
            structure.state_at(Position::new(0, 0, 0)).unwrap().name,
            "minecraft:oak_stairs"
        );
        assert!(structure.state_at(Position::new(1, 0, 0)).is_none());
    }

    #[test]
    fn test_decode_varint_flavor() {
        let le = decode(&fixture(NbtFlavor::LittleEndian)).unwrap();
        let varint = decode(&fixture(NbtFlavor::LittleVarint)).unwrap();
        assert_eq!(le, varint);
    }

    #[test]
    fn test_size_must_have_three_elements() {
        let root = compound([
            ("size", NbtValue::List(vec![NbtValue::Int(1), NbtValue::Int(1)])),
            ("structure", compound([])),
        ]);
        let err = decode(&write_root("", &root, NbtFlavor::LittleEndian)).unwrap_err();
        assert!(err.to_string().contains("size"));
    }
}
