//! Block shape definitions and the name-to-shape registry.
//!
//! Shapes are described on the 0-16 grid the game uses for block models.
//! The registry classifies block names into shape names through an ordered
//! list of patterns and can be replaced wholesale at runtime.

mod builtin;
mod registry;

pub use builtin::{builtin_rules, builtin_shapes};
pub use registry::{BlockPattern, RegistryPayload, ShapeRegistry, ShapeRule};

use crate::types::BoxRotation;
use serde::{Deserialize, Serialize};

/// Name of the fallback shape every registry provides.
pub const FULL: &str = "full";
/// Name of the shape that gets corner inference and the stair rotation table.
pub const STAIRS: &str = "stairs";

/// How a shape's boxes become geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryKind {
    Box,
    MultiBox,
    Cross,
    Custom,
}

/// Which rotation table applies to a rotatable shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacingMode {
    /// Yaw only, four ways. Boxes are authored facing north.
    #[default]
    Horizontal,
    /// Pitch and yaw, six ways. Boxes are authored facing up.
    Directional,
}

/// Blocks whose geometry depends on neighbor connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectableKind {
    Fence,
    Wall,
    GlassPane,
}

/// An axis-aligned cuboid on the 0-16 grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxDefinition {
    pub from: [f32; 3],
    pub to: [f32; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<BoxRotation>,
}

impl BoxDefinition {
    pub fn new(from: [f32; 3], to: [f32; 3]) -> Self {
        Self {
            from,
            to,
            rotation: None,
        }
    }

    pub fn full() -> Self {
        Self::new([0.0, 0.0, 0.0], [16.0, 16.0, 16.0])
    }

    /// Mirror the box around y = 8 (used for top halves).
    pub fn flipped_vertically(&self) -> Self {
        Self {
            from: [self.from[0], 16.0 - self.to[1], self.from[2]],
            to: [self.to[0], 16.0 - self.from[1], self.to[2]],
            rotation: self.rotation.clone(),
        }
    }

    /// Rotate the box clockwise (seen from above) around the grid centre in
    /// quarter turns. The result stays axis-aligned.
    pub fn rotated_quarter_turns(&self, turns: u32) -> Self {
        let mut from = self.from;
        let mut to = self.to;
        for _ in 0..turns % 4 {
            // (x, z) -> (16 - z, x)
            let (fx, fz, tx, tz) = (from[0], from[2], to[0], to[2]);
            from[0] = 16.0 - tz;
            to[0] = 16.0 - fz;
            from[2] = fx;
            to[2] = tx;
        }
        Self {
            from,
            to,
            rotation: self.rotation.clone(),
        }
    }
}

/// A renderable block shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeDefinition {
    #[serde(alias = "type")]
    pub geometry: GeometryKind,
    #[serde(default)]
    pub boxes: Vec<BoxDefinition>,
    #[serde(default)]
    pub rotatable: bool,
    #[serde(default)]
    pub facing_mode: FacingMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connectable: Option<ConnectableKind>,
    /// Top halves (`half=top`, `type=top`) mirror the boxes around y = 8.
    #[serde(default)]
    pub half_aware: bool,
}

impl ShapeDefinition {
    pub fn single(from: [f32; 3], to: [f32; 3]) -> Self {
        Self {
            geometry: GeometryKind::Box,
            boxes: vec![BoxDefinition::new(from, to)],
            rotatable: false,
            facing_mode: FacingMode::Horizontal,
            connectable: None,
            half_aware: false,
        }
    }

    pub fn multi(boxes: Vec<BoxDefinition>) -> Self {
        Self {
            geometry: GeometryKind::MultiBox,
            boxes,
            ..Self::single([0.0; 3], [16.0; 3])
        }
    }

    pub fn full() -> Self {
        Self::single([0.0; 3], [16.0; 3])
    }

    pub fn cross() -> Self {
        Self {
            geometry: GeometryKind::Cross,
            boxes: Vec::new(),
            ..Self::full()
        }
    }

    pub fn rotatable(mut self, mode: FacingMode) -> Self {
        self.rotatable = true;
        self.facing_mode = mode;
        self
    }

    pub fn connectable(mut self, kind: ConnectableKind) -> Self {
        self.connectable = Some(kind);
        self
    }

    pub fn half_aware(mut self) -> Self {
        self.half_aware = true;
        self
    }

    /// True when the shape fills the whole block cell.
    pub fn is_full_cube(&self) -> bool {
        matches!(self.geometry, GeometryKind::Box | GeometryKind::MultiBox)
            && self.boxes.len() == 1
            && self.boxes[0].from == [0.0; 3]
            && self.boxes[0].to == [16.0; 3]
            && self.boxes[0].rotation.is_none()
    }
}
