//! Structure model shared by every decoder and consumer.

mod direction;
mod transform;

pub use direction::{Axis, Direction, Face};
pub use transform::{BlockTransform, BoxRotation};

use crate::error::{Result, StructureError};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// A block position in structure space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Get the neighboring position in the given direction.
    ///
    /// Wraps at the edge of the `i32` range.
    pub fn neighbor(&self, direction: Direction) -> Self {
        let (dx, dy, dz) = direction.offset();
        Self {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
            z: self.z.wrapping_add(dz),
        }
    }

    /// Canonical `"x,y,z"` map key.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

impl FromStr for Position {
    type Err = StructureError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split(',').map(|p| p.trim().parse::<i32>());
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(Ok(x)), Some(Ok(y)), Some(Ok(z)), None) => Ok(Position::new(x, y, z)),
            _ => Err(StructureError::Parse(format!("invalid position key '{}'", s))),
        }
    }
}

/// Structure extent; every axis is strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    width: u32,
    height: u32,
    length: u32,
}

impl Dimensions {
    /// Largest voxel count a decoder accepts. NBT array lengths are signed
    /// 32-bit, so no flat block array can address more entries.
    pub const MAX_VOLUME: u64 = i32::MAX as u64;

    pub fn new(width: i64, height: i64, length: i64) -> Result<Self> {
        let check = |value: i64, axis: &str| -> Result<u32> {
            if value <= 0 || value > u32::MAX as i64 {
                Err(StructureError::Parse(format!(
                    "dimension {} must be positive, got {}",
                    axis, value
                )))
            } else {
                Ok(value as u32)
            }
        };
        Ok(Self {
            width: check(width, "width")?,
            height: check(height, "height")?,
            length: check(length, "length")?,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    /// Total voxel count, rejected above [`Dimensions::MAX_VOLUME`].
    pub fn volume(&self) -> Result<usize> {
        let too_large = || {
            StructureError::Parse(format!(
                "structure of {}x{}x{} exceeds {} voxels",
                self.width,
                self.height,
                self.length,
                Self::MAX_VOLUME
            ))
        };
        let volume = (self.width as u64)
            .checked_mul(self.height as u64)
            .and_then(|v| v.checked_mul(self.length as u64))
            .filter(|v| *v <= Self::MAX_VOLUME)
            .ok_or_else(too_large)?;
        usize::try_from(volume).map_err(|_| too_large())
    }

    /// Dense `(y, z, x)` index used by every flat block array format.
    pub fn index(&self, x: u32, y: u32, z: u32) -> usize {
        ((y as usize * self.length as usize) + z as usize) * self.width as usize + x as usize
    }

    /// Inverse of [`Dimensions::index`].
    pub fn coords(&self, index: usize) -> Position {
        let width = self.width as usize;
        let layer = width * self.length as usize;
        let y = index / layer;
        let rem = index % layer;
        Position::new((rem % width) as i32, y as i32, (rem / width) as i32)
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && pos.z >= 0
            && (pos.x as u32) < self.width
            && (pos.y as u32) < self.height
            && (pos.z as u32) < self.length
    }
}

/// A block name plus its property map.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockState {
    /// Block name, e.g. "minecraft:oak_stairs"
    pub name: String,
    /// Block properties, e.g. {"facing": "north"}
    pub properties: BTreeMap<String, String>,
}

impl BlockState {
    pub const AIR: &'static str = "minecraft:air";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn air() -> Self {
        Self::new(Self::AIR)
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(|s| s.as_str())
    }

    /// Check if this is an air block.
    pub fn is_air(&self) -> bool {
        matches!(
            self.name.as_str(),
            "minecraft:air" | "minecraft:cave_air" | "minecraft:void_air" | "air"
        )
    }

    /// Parse a block-state string such as `minecraft:oak_stairs[facing=north,half=top]`.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let (name, props) = match s.find('[') {
            Some(open) => {
                let close = s.rfind(']').filter(|close| *close > open).ok_or_else(|| {
                    StructureError::Parse(format!("unterminated property list in '{}'", s))
                })?;
                (&s[..open], Some(&s[open + 1..close]))
            }
            None => (s, None),
        };
        if name.is_empty() {
            return Err(StructureError::Parse("empty block name".to_string()));
        }

        let mut state = BlockState::new(name);
        if let Some(props) = props {
            for pair in props.split(',').filter(|p| !p.trim().is_empty()) {
                let (key, value) = pair.split_once('=').ok_or_else(|| {
                    StructureError::Parse(format!("invalid property '{}' in '{}'", pair, s))
                })?;
                state
                    .properties
                    .insert(key.trim().to_string(), value.trim().to_string());
            }
        }
        Ok(state)
    }
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.properties.is_empty() {
            f.write_str("[")?;
            for (i, (k, v)) in self.properties.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{}={}", k, v)?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

/// Strip a `namespace:` prefix from a block name.
pub fn strip_namespace(name: &str) -> &str {
    name.split_once(':').map(|(_, id)| id).unwrap_or(name)
}

/// A placed block referencing a palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Block {
    pub position: Position,
    pub palette_index: usize,
}

/// A decoded structure: palette plus sparse non-air blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    pub name: String,
    pub dimensions: Dimensions,
    pub palette: Vec<BlockState>,
    blocks: HashMap<Position, Block>,
}

impl Structure {
    /// The state stored at a position, if any.
    pub fn state_at(&self, pos: Position) -> Option<&BlockState> {
        self.blocks.get(&pos).map(|b| &self.palette[b.palette_index])
    }

    pub fn state(&self, block: &Block) -> &BlockState {
        &self.palette[block.palette_index]
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Iterate blocks in arbitrary order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }

    /// Blocks ordered by `(y, z, x)`, matching the flat array order.
    pub fn sorted_blocks(&self) -> Vec<&Block> {
        let mut blocks: Vec<_> = self.blocks.values().collect();
        blocks.sort_by_key(|b| (b.position.y, b.position.z, b.position.x));
        blocks
    }

    /// Blocks lying outside `[0, dimensions)`; decoders do not reject these.
    pub fn out_of_bounds_count(&self) -> usize {
        self.blocks
            .keys()
            .filter(|pos| !self.dimensions.contains(**pos))
            .count()
    }
}

/// Incrementally assembles a [`Structure`] with a deduplicated palette.
#[derive(Debug)]
pub struct StructureBuilder {
    name: String,
    dimensions: Dimensions,
    palette: Vec<BlockState>,
    lookup: HashMap<BlockState, usize>,
    blocks: HashMap<Position, Block>,
}

impl StructureBuilder {
    pub fn new(name: impl Into<String>, dimensions: Dimensions) -> Self {
        Self {
            name: name.into(),
            dimensions,
            palette: Vec::new(),
            lookup: HashMap::new(),
            blocks: HashMap::new(),
        }
    }

    /// Intern a state, returning its palette index.
    pub fn add_state(&mut self, state: BlockState) -> usize {
        if let Some(&index) = self.lookup.get(&state) {
            return index;
        }
        let index = self.palette.len();
        self.lookup.insert(state.clone(), index);
        self.palette.push(state);
        index
    }

    /// Place a block; air is never stored and later writes replace earlier ones.
    pub fn set_block(&mut self, position: Position, palette_index: usize) {
        match self.palette.get(palette_index) {
            Some(state) if !state.is_air() => {
                self.blocks.insert(
                    position,
                    Block {
                        position,
                        palette_index,
                    },
                );
            }
            _ => {}
        }
    }

    pub fn set_state(&mut self, position: Position, state: BlockState) {
        if state.is_air() {
            return;
        }
        let index = self.add_state(state);
        self.set_block(position, index);
    }

    pub fn build(self) -> Structure {
        Structure {
            name: self.name,
            dimensions: self.dimensions,
            palette: self.palette,
            blocks: self.blocks,
        }
    }
}
