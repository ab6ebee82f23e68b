//! Stair corner-shape inference.

use super::Half;
use crate::types::Direction;
use serde::{Deserialize, Serialize};

/// Corner variant of a stair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StairShape {
    Straight,
    InnerLeft,
    InnerRight,
    OuterLeft,
    OuterRight,
}

impl StairShape {
    pub const ALL: [StairShape; 5] = [
        StairShape::Straight,
        StairShape::InnerLeft,
        StairShape::InnerRight,
        StairShape::OuterLeft,
        StairShape::OuterRight,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "straight" => Some(StairShape::Straight),
            "inner_left" => Some(StairShape::InnerLeft),
            "inner_right" => Some(StairShape::InnerRight),
            "outer_left" => Some(StairShape::OuterLeft),
            "outer_right" => Some(StairShape::OuterRight),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StairShape::Straight => "straight",
            StairShape::InnerLeft => "inner_left",
            StairShape::InnerRight => "inner_right",
            StairShape::OuterLeft => "outer_left",
            StairShape::OuterRight => "outer_right",
        }
    }
}

/// What the inference needs to know about a neighboring stair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StairInfo {
    pub facing: Direction,
    pub half: Half,
}

/// Infer the corner shape of a stair from its same-level neighbors.
///
/// `neighbor` returns stair info for the adjacent block in a direction, or
/// `None` when that block is not a stair.
pub fn infer_stair_shape<F>(facing: Direction, half: Half, neighbor: F) -> StairShape
where
    F: Fn(Direction) -> Option<StairInfo>,
{
    let left = facing.left();
    let right = facing.right();
    let this = StairInfo { facing, half };
    // A stair in `dir` with our facing and half blocks the corner.
    let interferes = |dir: Direction| neighbor(dir) == Some(this);

    if let Some(front) = neighbor(facing) {
        if front.half == half && (front.facing == left || front.facing == right) {
            if !interferes(front.facing.opposite()) {
                return if front.facing == left {
                    StairShape::InnerLeft
                } else {
                    StairShape::InnerRight
                };
            }
        }
    }

    if let Some(back) = neighbor(facing.opposite()) {
        if back.half == half && (back.facing == left || back.facing == right) {
            if !interferes(back.facing) {
                return if back.facing == left {
                    StairShape::OuterLeft
                } else {
                    StairShape::OuterRight
                };
            }
        }
    }

    StairShape::Straight
}
