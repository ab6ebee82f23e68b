//! Block orientation and per-box rotation types.

use super::Axis;
use serde::{Deserialize, Serialize};

/// Whole-block orientation as pitch (x) and yaw (y) in degrees.
///
/// Angles are stored the way blockstate tables write them (clockwise); the
/// mesher negates both before building rotation matrices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockTransform {
    /// X rotation in degrees (0, 90, 180, 270).
    pub x: i32,
    /// Y rotation in degrees (0, 90, 180, 270).
    pub y: i32,
}

impl BlockTransform {
    pub const IDENTITY: BlockTransform = BlockTransform { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Check if this is an identity transform (no rotation).
    pub fn is_identity(&self) -> bool {
        self.x.rem_euclid(360) == 0 && self.y.rem_euclid(360) == 0
    }
}

/// Pre-baked rotation of a single box, on the 0-16 grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxRotation {
    /// Origin point for rotation (in 0-16 coordinates).
    #[serde(default = "default_origin")]
    pub origin: [f32; 3],
    /// Axis to rotate around.
    pub axis: Axis,
    /// Rotation angle in degrees.
    pub angle: f32,
    /// Whether to rescale the box after rotation.
    #[serde(default)]
    pub rescale: bool,
}

fn default_origin() -> [f32; 3] {
    [8.0, 8.0, 8.0]
}

impl BoxRotation {
    /// Convert origin from grid coordinates (0-16) to unit-cube space (-0.5 to 0.5).
    pub fn normalized_origin(&self) -> [f32; 3] {
        [
            self.origin[0] / 16.0 - 0.5,
            self.origin[1] / 16.0 - 0.5,
            self.origin[2] / 16.0 - 0.5,
        ]
    }

    pub fn angle_radians(&self) -> f32 {
        self.angle.to_radians()
    }

    /// Scale factor keeping a rotated face at its original extent.
    pub fn rescale_factor(&self) -> f32 {
        if self.rescale {
            1.0 / self.angle_radians().cos()
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_wraps() {
        assert!(BlockTransform::new(360, 0).is_identity());
        assert!(!BlockTransform::new(0, 90).is_identity());
    }

    #[test]
    fn test_normalized_origin_centre() {
        let rot = BoxRotation {
            origin: [8.0, 8.0, 8.0],
            axis: Axis::Y,
            angle: 45.0,
            rescale: false,
        };
        assert_eq!(rot.normalized_origin(), [0.0, 0.0, 0.0]);
        assert_eq!(rot.rescale_factor(), 1.0);
    }
}
