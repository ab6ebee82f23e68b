//! Litematica (`.litematic`) decoder.
//!
//! A litematic holds one or more named regions. Each region carries its own
//! palette and a bit-packed array of 64-bit words where entries may straddle
//! word boundaries. Region positions offset the decoded blocks; overlapping
//! regions are resolved by last write wins, in the order the file lists them.

use super::read_root_compound;
use crate::error::{Result, StructureError};
use crate::nbt::{CompoundExt, NbtCompound, NbtFlavor, NbtValue};
use crate::types::{BlockState, Dimensions, Position, Structure, StructureBuilder};

/// Bits used per palette index: `max(2, ceil(log2(palette_size)))`.
pub fn bits_per_entry(palette_size: usize) -> u32 {
    let mut bits = 0u32;
    while (1usize << bits) < palette_size {
        bits += 1;
    }
    bits.max(2)
}

/// Extract entry `index` from a packed word array.
///
/// Indices past the end of the array read as 0.
pub fn unpack_entry(words: &[i64], bits: u32, index: usize) -> u32 {
    let bits = bits.min(32);
    let mask = (1u64 << bits) - 1;
    let bit_offset = index * bits as usize;
    let word_index = bit_offset / 64;
    let bit_in_word = (bit_offset % 64) as u32;

    let Some(&word) = words.get(word_index) else {
        return 0;
    };
    let mut value = (word as u64) >> bit_in_word;
    if bit_in_word + bits > 64 {
        let next = words.get(word_index + 1).copied().unwrap_or(0) as u64;
        value |= next << (64 - bit_in_word);
    }
    (value & mask) as u32
}

/// Lazily decode the first `count` packed entries.
pub fn unpack_entries(words: &[i64], bits: u32, count: usize) -> impl Iterator<Item = u32> + '_ {
    (0..count).map(move |i| unpack_entry(words, bits, i))
}

/// Number of whole entries the word array holds.
fn packed_capacity(words: &[i64], bits: u32) -> usize {
    words.len().saturating_mul(64) / bits.max(1) as usize
}

/// Read an `{x, y, z}` compound.
fn read_vec3(parent: &NbtCompound, key: &str) -> Result<(i64, i64, i64)> {
    let vec = parent.compound(key)?;
    Ok((vec.int("x")?, vec.int("y")?, vec.int("z")?))
}

/// Absolute extent of a signed size component.
fn extent(value: i64) -> i64 {
    value.checked_abs().unwrap_or(i64::MAX)
}

/// Region origin along one axis, checked so every block of the region
/// stays inside the `i32` coordinate range.
fn region_origin(region: &str, origin: i64, size: u32) -> Result<i32> {
    origin
        .checked_add(size as i64 - 1)
        .and_then(|end| i32::try_from(end).ok())
        .and_then(|_| i32::try_from(origin).ok())
        .ok_or_else(|| {
            StructureError::Parse(format!(
                "region '{}': field 'Position' {} puts blocks outside the 32-bit coordinate range",
                region, origin
            ))
        })
}

fn read_palette_entry(entry: &NbtValue) -> Result<BlockState> {
    let entry = entry
        .as_compound()
        .ok_or_else(|| StructureError::Parse("palette entry should be a compound".to_string()))?;
    let mut state = BlockState::new(entry.string("Name")?);
    if let Some(props) = entry.get("Properties").and_then(|p| p.as_compound()) {
        for (key, value) in props {
            if let Some(value) = value.to_property_string() {
                state.properties.insert(key.clone(), value);
            }
        }
    }
    Ok(state)
}

fn decode_region(builder: &mut StructureBuilder, name: &str, region: &NbtCompound) -> Result<()> {
    let (ox, oy, oz) = read_vec3(region, "Position")?;
    let (sx, sy, sz) = read_vec3(region, "Size")?;
    let in_region = |e: StructureError| StructureError::Parse(format!("region '{}': {}", name, e));
    let size = Dimensions::new(extent(sx), extent(sy), extent(sz)).map_err(in_region)?;
    let count = size.volume().map_err(in_region)?;
    let ox = region_origin(name, ox, size.width())?;
    let oy = region_origin(name, oy, size.height())?;
    let oz = region_origin(name, oz, size.length())?;

    let palette = region
        .list("BlockStatePalette")?
        .iter()
        .map(read_palette_entry)
        .collect::<Result<Vec<_>>>()?;
    let pads_with_air = palette.first().map_or(true, |state| state.is_air());
    let remap: Vec<usize> = palette
        .into_iter()
        .map(|state| builder.add_state(state))
        .collect();

    let words = region.field("BlockStates")?.to_i64_vec().ok_or_else(|| {
        StructureError::Parse("field 'BlockStates' should be a long array".to_string())
    })?;

    let bits = bits_per_entry(remap.len());
    let packed = packed_capacity(&words, bits).min(count);
    let place = |builder: &mut StructureBuilder, i: usize, palette_index: usize| {
        let local = size.coords(i);
        let position = Position::new(local.x + ox, local.y + oy, local.z + oz);
        builder.set_block(position, palette_index);
    };

    for (i, entry) in unpack_entries(&words, bits, packed).enumerate() {
        match remap.get(entry as usize) {
            Some(&palette_index) => place(builder, i, palette_index),
            None => log::warn!("region '{}' references unknown palette index {}", name, entry),
        }
    }

    if packed < count {
        log::warn!(
            "region '{}' block states truncated: {} of {} entries, missing entries read as 0",
            name,
            packed,
            count
        );
        if let (false, Some(&palette_index)) = (pads_with_air, remap.first()) {
            for i in packed..count {
                place(builder, i, palette_index);
            }
        }
    }
    Ok(())
}

pub fn decode(data: &[u8]) -> Result<Structure> {
    let root = read_root_compound(data, NbtFlavor::BigEndian)?;
    let metadata = root.compound("Metadata")?;
    let (ex, ey, ez) = read_vec3(metadata, "EnclosingSize")?;
    let dimensions = Dimensions::new(extent(ex), extent(ey), extent(ez))?;

    let name = metadata
        .get("Name")
        .and_then(|n| n.as_str())
        .unwrap_or("litematic")
        .to_string();
    let mut builder = StructureBuilder::new(name, dimensions);

    for (region_name, region) in root.compound("Regions")? {
        let region = region.as_compound().ok_or_else(|| {
            StructureError::Parse(format!("region '{}' should be a compound", region_name))
        })?;
        decode_region(&mut builder, region_name, region)?;
    }

    Ok(builder.build())
}
