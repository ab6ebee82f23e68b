//! Per-block render description handed to the drawing layer.

use crate::error::Result;
use crate::resolver::{resolve_structure, Connections, Half, StairShape};
use crate::shape::{ShapeRegistry, FULL};
use crate::types::{Direction, Structure};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenderDimensions {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

/// One placed block with its resolved render attributes.
///
/// `shape` is omitted for plain full cubes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderBlock {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub palette_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facing: Option<Direction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub half: Option<Half>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stair_shape: Option<StairShape>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connections: Option<Connections>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaletteEntry {
    pub name: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderData {
    pub dimensions: RenderDimensions,
    pub blocks: Vec<RenderBlock>,
    pub palette: Vec<PaletteEntry>,
}

impl RenderData {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Resolve every block of `structure` into render data, ordered by `(y, z, x)`.
pub fn build_render_data(
    structure: &Structure,
    registry: &ShapeRegistry,
    parallel: bool,
) -> RenderData {
    let blocks = resolve_structure(registry, structure, parallel)
        .into_iter()
        .map(|(block, resolved)| RenderBlock {
            x: block.position.x,
            y: block.position.y,
            z: block.position.z,
            palette_index: block.palette_index,
            shape: (resolved.shape != FULL).then_some(resolved.shape),
            facing: resolved.facing,
            half: resolved.half,
            stair_shape: resolved.stair_shape,
            connections: resolved.connections,
        })
        .collect();

    let palette = structure
        .palette
        .iter()
        .map(|state| PaletteEntry {
            name: state.name.clone(),
            properties: state.properties.clone(),
        })
        .collect();

    RenderData {
        dimensions: RenderDimensions {
            x: structure.dimensions.width(),
            y: structure.dimensions.height(),
            z: structure.dimensions.length(),
        },
        blocks,
        palette,
    }
}
