//! Legacy MCEdit/WorldEdit `.schematic` decoder.
//!
//! Blocks are numeric ids in a flat `(y, z, x)` byte array with a parallel
//! metadata array. Only a small part of the historical id table is known
//! here; unknown ids become `minecraft:unknown_block_<id>`.

use super::read_root_compound;
use crate::error::{Result, StructureError};
use crate::nbt::{CompoundExt, NbtFlavor};
use crate::types::{BlockState, Dimensions, Structure, StructureBuilder};
use std::collections::HashMap;

const COLORS: [&str; 16] = [
    "white", "orange", "magenta", "light_blue", "yellow", "lime", "pink", "gray", "light_gray",
    "cyan", "purple", "blue", "brown", "green", "red", "black",
];

/// Known pre-flattening block ids. Intentionally partial.
fn legacy_name(id: u16) -> Option<&'static str> {
    Some(match id {
        0 => "air",
        1 => "stone",
        2 => "grass_block",
        3 => "dirt",
        4 => "cobblestone",
        5 => "oak_planks",
        6 => "oak_sapling",
        7 => "bedrock",
        8 | 9 => "water",
        10 | 11 => "lava",
        12 => "sand",
        13 => "gravel",
        14 => "gold_ore",
        15 => "iron_ore",
        16 => "coal_ore",
        17 => "oak_log",
        18 => "oak_leaves",
        19 => "sponge",
        20 => "glass",
        21 => "lapis_ore",
        22 => "lapis_block",
        24 => "sandstone",
        35 => "wool",
        37 => "dandelion",
        38 => "poppy",
        41 => "gold_block",
        42 => "iron_block",
        43 | 44 => "smooth_stone_slab",
        45 => "bricks",
        46 => "tnt",
        47 => "bookshelf",
        48 => "mossy_cobblestone",
        49 => "obsidian",
        50 => "torch",
        53 => "oak_stairs",
        54 => "chest",
        56 => "diamond_ore",
        57 => "diamond_block",
        58 => "crafting_table",
        61 => "furnace",
        65 => "ladder",
        67 => "cobblestone_stairs",
        73 => "redstone_ore",
        79 => "ice",
        80 => "snow_block",
        81 => "cactus",
        82 => "clay",
        85 => "oak_fence",
        86 => "carved_pumpkin",
        87 => "netherrack",
        88 => "soul_sand",
        89 => "glowstone",
        95 => "stained_glass",
        98 => "stone_bricks",
        101 => "iron_bars",
        102 => "glass_pane",
        108 => "brick_stairs",
        109 => "stone_brick_stairs",
        112 => "nether_bricks",
        113 => "nether_brick_fence",
        114 => "nether_brick_stairs",
        121 => "end_stone",
        125 => "oak_planks",
        126 => "oak_slab",
        128 => "sandstone_stairs",
        133 => "emerald_block",
        134 => "spruce_stairs",
        135 => "birch_stairs",
        136 => "jungle_stairs",
        139 => "cobblestone_wall",
        152 => "redstone_block",
        155 => "quartz_block",
        156 => "quartz_stairs",
        159 => "terracotta_stained",
        163 => "acacia_stairs",
        164 => "dark_oak_stairs",
        169 => "sea_lantern",
        171 => "carpet",
        172 => "terracotta",
        173 => "coal_block",
        174 => "packed_ice",
        _ => return None,
    })
}

/// Build a modern block state from a legacy id and its metadata nibble.
fn legacy_state(id: u16, meta: u8) -> BlockState {
    let Some(name) = legacy_name(id) else {
        return BlockState::new(format!("minecraft:unknown_block_{}", id));
    };

    let color = COLORS[(meta & 0x0f) as usize];
    match name {
        "wool" | "carpet" | "stained_glass" => {
            BlockState::new(format!("minecraft:{}_{}", color, name))
        }
        "terracotta_stained" => BlockState::new(format!("minecraft:{}_terracotta", color)),
        _ if name.ends_with("_stairs") => {
            let facing = match meta & 0x03 {
                0 => "east",
                1 => "west",
                2 => "south",
                _ => "north",
            };
            let half = if meta & 0x04 != 0 { "top" } else { "bottom" };
            BlockState::new(format!("minecraft:{}", name))
                .with_property("facing", facing)
                .with_property("half", half)
        }
        _ if name.ends_with("_slab") => {
            let kind = if id == 43 {
                "double"
            } else if meta & 0x08 != 0 {
                "top"
            } else {
                "bottom"
            };
            BlockState::new(format!("minecraft:{}", name)).with_property("type", kind)
        }
        _ => BlockState::new(format!("minecraft:{}", name)),
    }
}

/// High nibble of a block id from the `AddBlocks` array.
fn add_nibble(add: &[u8], index: usize) -> u16 {
    match add.get(index >> 1) {
        Some(byte) if index & 1 == 0 => ((byte >> 4) & 0x0f) as u16,
        Some(byte) => (byte & 0x0f) as u16,
        None => 0,
    }
}

pub fn decode(data: &[u8]) -> Result<Structure> {
    let root = read_root_compound(data, NbtFlavor::BigEndian)?;

    let width = root.int("Width")?;
    let height = root.int("Height")?;
    let length = root.int("Length")?;
    let dimensions = Dimensions::new(width, height, length)?;

    let blocks = root
        .field("Blocks")?
        .to_byte_vec()
        .ok_or_else(|| StructureError::Parse("field 'Blocks' should be a byte array".to_string()))?;
    let metadata = root
        .field("Data")?
        .to_byte_vec()
        .ok_or_else(|| StructureError::Parse("field 'Data' should be a byte array".to_string()))?;
    let add = root
        .get("AddBlocks")
        .and_then(|v| v.to_byte_vec())
        .unwrap_or_default();

    let volume = dimensions.volume()?;
    if blocks.len() < volume {
        log::warn!(
            "schematic Blocks array has {} entries for {} voxels; missing entries are air",
            blocks.len(),
            volume
        );
    }

    let mut builder = StructureBuilder::new("schematic", dimensions);
    let mut interned: HashMap<(u16, u8), usize> = HashMap::new();

    for (index, &low) in blocks.iter().enumerate().take(volume) {
        let id = (add_nibble(&add, index) << 8) | low as u16;
        if id == 0 {
            continue;
        }
        let meta = metadata.get(index).copied().unwrap_or(0);
        let palette_index = *interned
            .entry((id, meta))
            .or_insert_with(|| builder.add_state(legacy_state(id, meta)));
        builder.set_block(dimensions.coords(index), palette_index);
    }

    Ok(builder.build())
}
