//! Block state to render-shape resolution.
//!
//! Resolution reads a block's own properties and, for stairs and
//! connectable blocks without explicit connection properties, the blocks
//! around it. Neighbors come from a point lookup so a whole structure
//! resolves in linear time.

pub mod connections;
pub mod stairs;

pub use connections::{Connections, WallSide};
pub use stairs::{infer_stair_shape, StairInfo, StairShape};

use crate::shape::{FacingMode, ShapeRegistry, FULL, STAIRS};
use crate::types::{Block, BlockState, Direction, Position, Structure};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Vertical half of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Half {
    Bottom,
    Top,
    /// Double slabs.
    Double,
}

impl Half {
    /// Read `half` (stairs, trapdoors, doors), `type` (slabs) or the Bedrock
    /// equivalents.
    pub fn from_state(state: &BlockState) -> Option<Half> {
        if let Some(half) = state.property("half") {
            return match half {
                "top" | "upper" => Some(Half::Top),
                "bottom" | "lower" => Some(Half::Bottom),
                _ => None,
            };
        }
        if let Some(kind) = state.property("type") {
            return match kind {
                "top" => Some(Half::Top),
                "bottom" => Some(Half::Bottom),
                "double" => Some(Half::Double),
                _ => None,
            };
        }
        state
            .property("upside_down_bit")
            .or_else(|| state.property("top_slot_bit"))
            .map(|bit| if bit == "true" { Half::Top } else { Half::Bottom })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Half::Bottom => "bottom",
            Half::Top => "top",
            Half::Double => "double",
        }
    }
}

/// Read the facing of a block state.
///
/// Java states use `facing`; Bedrock stairs use `weirdo_direction` and
/// other Bedrock blocks `facing_direction`.
pub fn read_facing(state: &BlockState) -> Option<Direction> {
    if let Some(facing) = state.property("facing") {
        return Direction::from_str(facing);
    }
    if let Some(weirdo) = state.property("weirdo_direction") {
        return match weirdo {
            "0" => Some(Direction::East),
            "1" => Some(Direction::West),
            "2" => Some(Direction::South),
            "3" => Some(Direction::North),
            _ => None,
        };
    }
    state
        .property("facing_direction")
        .and_then(|v| match v {
            "0" => Some(Direction::Down),
            "1" => Some(Direction::Up),
            "2" => Some(Direction::North),
            "3" => Some(Direction::South),
            "4" => Some(Direction::West),
            "5" => Some(Direction::East),
            _ => None,
        })
}

/// Source of neighbor states.
pub trait NeighborLookup {
    fn state_at(&self, position: Position) -> Option<&BlockState>;
}

impl NeighborLookup for Structure {
    fn state_at(&self, position: Position) -> Option<&BlockState> {
        Structure::state_at(self, position)
    }
}

impl NeighborLookup for HashMap<Position, BlockState> {
    fn state_at(&self, position: Position) -> Option<&BlockState> {
        self.get(&position)
    }
}

/// Everything the geometry stage needs to know about one block.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBlock {
    pub shape: String,
    pub facing: Option<Direction>,
    pub half: Option<Half>,
    pub stair_shape: Option<StairShape>,
    pub connections: Option<Connections>,
    pub waterlogged: bool,
}

impl ResolvedBlock {
    pub fn full() -> Self {
        Self {
            shape: FULL.to_string(),
            facing: None,
            half: None,
            stair_shape: None,
            connections: None,
            waterlogged: false,
        }
    }
}

/// Resolve one block against its neighbors.
pub fn resolve_block<L>(
    registry: &ShapeRegistry,
    state: &BlockState,
    position: Position,
    lookup: &L,
) -> ResolvedBlock
where
    L: NeighborLookup + ?Sized,
{
    let (shape, definition) = registry.shape_for(&state.name);
    let mut half = Half::from_state(state);
    let mut facing = read_facing(state);

    // Rotation only applies where the shape supports it.
    if shape != STAIRS && !definition.rotatable {
        facing = None;
    }
    if let Some(dir) = facing {
        if definition.facing_mode == FacingMode::Horizontal && !dir.is_horizontal() {
            facing = None;
        }
    }

    let stair_shape = if shape == STAIRS {
        let stair_facing = facing.unwrap_or(Direction::North);
        let stair_half = match half {
            Some(Half::Top) => Half::Top,
            _ => Half::Bottom,
        };
        facing = Some(stair_facing);
        half = Some(stair_half);
        Some(
            state
                .property("shape")
                .and_then(StairShape::from_str)
                .unwrap_or_else(|| {
                    infer_stair_shape(stair_facing, stair_half, |dir| {
                        stair_info(registry, lookup, position.neighbor(dir))
                    })
                }),
        )
    } else {
        None
    };

    let connections = definition.connectable.map(|kind| {
        Connections::from_properties(kind, state).unwrap_or_else(|| {
            Connections::infer(kind, |dir| {
                lookup
                    .state_at(position.neighbor(dir))
                    .map_or(false, |neighbor| connects_to(registry, kind, neighbor))
            })
        })
    });

    ResolvedBlock {
        shape,
        facing,
        half,
        stair_shape,
        connections,
        waterlogged: state.property("waterlogged") == Some("true"),
    }
}

fn stair_info<L>(registry: &ShapeRegistry, lookup: &L, position: Position) -> Option<StairInfo>
where
    L: NeighborLookup + ?Sized,
{
    let state = lookup.state_at(position)?;
    if registry.classify(&state.name) != STAIRS {
        return None;
    }
    Some(StairInfo {
        facing: read_facing(state)
            .filter(|d| d.is_horizontal())
            .unwrap_or(Direction::North),
        half: match Half::from_state(state) {
            Some(Half::Top) => Half::Top,
            _ => Half::Bottom,
        },
    })
}

/// Whether a connectable block reaches toward `neighbor`.
fn connects_to(
    registry: &ShapeRegistry,
    kind: crate::shape::ConnectableKind,
    neighbor: &BlockState,
) -> bool {
    if neighbor.is_air() {
        return false;
    }
    let (shape, definition) = registry.shape_for(&neighbor.name);
    definition.connectable == Some(kind) || (shape == FULL && definition.is_full_cube())
}

/// Resolve every block of a structure, ordered by `(y, z, x)`.
pub fn resolve_structure(
    registry: &ShapeRegistry,
    structure: &Structure,
    parallel: bool,
) -> Vec<(Block, ResolvedBlock)> {
    let blocks = structure.sorted_blocks();
    let resolve = |block: &&Block| {
        let state = structure.state(block);
        (
            **block,
            resolve_block(registry, state, block.position, structure),
        )
    };

    if parallel {
        blocks.par_iter().map(resolve).collect()
    } else {
        blocks.iter().map(resolve).collect()
    }
}
