//! Whole-block rotation policies.
//!
//! Transforms are stored the way blockstate tables write them. The cuboid
//! builder negates both angles when it builds the rotation matrix.

use crate::resolver::{Half, StairShape};
use crate::shape::{BoxDefinition, FacingMode};
use crate::types::{BlockTransform, Direction};

/// Yaw for shapes authored facing north.
pub fn horizontal_transform(facing: Direction) -> BlockTransform {
    match facing {
        Direction::East => BlockTransform::new(0, 90),
        Direction::South => BlockTransform::new(0, 180),
        Direction::West => BlockTransform::new(0, 270),
        _ => BlockTransform::IDENTITY,
    }
}

/// Pitch and yaw for shapes authored facing up.
pub fn directional_transform(facing: Direction) -> BlockTransform {
    match facing {
        Direction::Up => BlockTransform::IDENTITY,
        Direction::Down => BlockTransform::new(180, 0),
        Direction::North => BlockTransform::new(90, 0),
        Direction::South => BlockTransform::new(90, 180),
        Direction::West => BlockTransform::new(90, 270),
        Direction::East => BlockTransform::new(90, 90),
    }
}

pub fn facing_transform(mode: FacingMode, facing: Direction) -> BlockTransform {
    match mode {
        FacingMode::Horizontal => horizontal_transform(facing),
        FacingMode::Directional => directional_transform(facing),
    }
}

const fn t(x: i32, y: i32) -> BlockTransform {
    BlockTransform::new(x, y)
}

/// Stair rotations indexed `[half][facing][shape]`.
///
/// Facing order is east, north, south, west; shape order follows
/// [`StairShape::ALL`]. Values are the vanilla blockstate rotations for a
/// model whose straight variant faces east.
const STAIR_TABLE: [[[BlockTransform; 5]; 4]; 2] = [
    // bottom
    [
        [t(0, 0), t(0, 270), t(0, 0), t(0, 270), t(0, 0)],
        [t(0, 270), t(0, 180), t(0, 270), t(0, 180), t(0, 270)],
        [t(0, 90), t(0, 0), t(0, 90), t(0, 0), t(0, 90)],
        [t(0, 180), t(0, 90), t(0, 180), t(0, 90), t(0, 180)],
    ],
    // top
    [
        [t(180, 0), t(180, 0), t(180, 90), t(180, 0), t(180, 90)],
        [t(180, 270), t(180, 270), t(180, 0), t(180, 270), t(180, 0)],
        [t(180, 90), t(180, 90), t(180, 180), t(180, 90), t(180, 180)],
        [t(180, 180), t(180, 180), t(180, 270), t(180, 180), t(180, 270)],
    ],
];

pub fn stair_transform(half: Half, facing: Direction, shape: StairShape) -> BlockTransform {
    let half = match half {
        Half::Top => 1,
        _ => 0,
    };
    let facing = match facing {
        Direction::East => 0,
        Direction::North => 1,
        Direction::South => 2,
        Direction::West => 3,
        _ => 1,
    };
    let shape = match shape {
        StairShape::Straight => 0,
        StairShape::InnerLeft => 1,
        StairShape::InnerRight => 2,
        StairShape::OuterLeft => 3,
        StairShape::OuterRight => 4,
    };
    STAIR_TABLE[half][facing][shape]
}

/// Boxes of the east-facing stair model for a corner variant.
pub fn stair_boxes(shape: StairShape) -> Vec<BoxDefinition> {
    let slab = BoxDefinition::new([0.0, 0.0, 0.0], [16.0, 8.0, 16.0]);
    match shape {
        StairShape::Straight => vec![slab, BoxDefinition::new([8.0, 8.0, 0.0], [16.0, 16.0, 16.0])],
        StairShape::InnerLeft | StairShape::InnerRight => vec![
            slab,
            BoxDefinition::new([8.0, 8.0, 0.0], [16.0, 16.0, 16.0]),
            BoxDefinition::new([0.0, 8.0, 8.0], [8.0, 16.0, 16.0]),
        ],
        StairShape::OuterLeft | StairShape::OuterRight => {
            vec![slab, BoxDefinition::new([8.0, 8.0, 8.0], [16.0, 16.0, 16.0])]
        }
    }
}
