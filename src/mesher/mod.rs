//! Mesh generation from resolved blocks.
//!
//! Each block's shape definition becomes unit-space geometry, gets the
//! atlas UVs of its faces, and is moved to its position in the structure.

pub mod block;
pub mod geometry;
pub mod orientation;

pub use block::{apply_face_uvs, generate, BlockGeometry};
pub use geometry::{FaceRange, Mesh, Vertex};

use crate::atlas::{is_invisible, TextureAtlas};
use crate::resolver::{resolve_structure, ResolvedBlock};
use crate::shape::ShapeRegistry;
use crate::types::{Block, Structure};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Main mesher configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MesherConfig {
    /// Emit geometry for invisible blocks such as barriers.
    pub include_air: bool,
    /// Mesh blocks on the rayon thread pool.
    pub parallel: bool,
}

impl Default for MesherConfig {
    fn default() -> Self {
        Self {
            include_air: false,
            parallel: true,
        }
    }
}

/// Output from the mesher.
#[derive(Debug, Clone, Default)]
pub struct MesherOutput {
    pub mesh: Mesh,
    /// Axis-aligned bounds of the mesh, `None` when nothing was drawn.
    pub bounds: Option<([f32; 3], [f32; 3])>,
    /// Blocks that contributed geometry.
    pub block_count: usize,
}

impl MesherOutput {
    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh.triangle_count()
    }
}

/// Meshes whole structures against a shape registry.
pub struct StructureMesher<'a> {
    registry: &'a ShapeRegistry,
    config: MesherConfig,
}

impl<'a> StructureMesher<'a> {
    /// Create a new mesher with default configuration.
    pub fn new(registry: &'a ShapeRegistry) -> Self {
        Self::with_config(registry, MesherConfig::default())
    }

    pub fn with_config(registry: &'a ShapeRegistry, config: MesherConfig) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> &MesherConfig {
        &self.config
    }

    /// Build one merged mesh for the structure. Blocks are emitted in
    /// `(y, z, x)` order regardless of parallelism.
    pub fn mesh(&self, structure: &Structure, atlas: &TextureAtlas) -> MesherOutput {
        let resolved = resolve_structure(self.registry, structure, self.config.parallel);

        let build = |(block, resolved): &(Block, ResolvedBlock)| {
            let state = structure.state(block);
            if !self.config.include_air && (state.is_air() || is_invisible(&state.name)) {
                return None;
            }
            let definition = self.registry.definition(&resolved.shape);
            let geometry = generate(definition, resolved);
            let mut mesh = apply_face_uvs(&geometry, &atlas.face_uvs(&state.name));
            let p = block.position;
            mesh.translate([p.x as f32 + 0.5, p.y as f32 + 0.5, p.z as f32 + 0.5]);
            Some(mesh)
        };

        let meshes: Vec<Mesh> = if self.config.parallel {
            resolved.par_iter().filter_map(build).collect()
        } else {
            resolved.iter().filter_map(build).collect()
        };

        let mut mesh = Mesh::new();
        for block_mesh in &meshes {
            mesh.merge(block_mesh);
        }
        log::debug!(
            "meshed {} blocks into {} vertices, {} triangles",
            meshes.len(),
            mesh.vertex_count(),
            mesh.triangle_count()
        );

        MesherOutput {
            bounds: mesh.bounds(),
            block_count: meshes.len(),
            mesh,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::{build_atlas, AtlasConfig};
    use crate::resource_pack::{TextureData, TexturePack};
    use crate::types::{BlockState, Dimensions, Position, StructureBuilder};

    fn structure() -> Structure {
        let mut builder = StructureBuilder::new("test", Dimensions::new(2, 2, 1).unwrap());
        builder.set_state(Position::new(0, 0, 0), BlockState::new("minecraft:stone"));
        builder.set_state(Position::new(1, 0, 0), BlockState::new("minecraft:stone"));
        builder.set_state(Position::new(0, 1, 0), BlockState::new("minecraft:barrier"));
        builder.build()
    }

    fn atlas(structure: &Structure) -> TextureAtlas {
        let mut pack = TexturePack::new();
        pack.add_texture("minecraft", "stone", TextureData::solid(16, [90, 90, 90, 255]));
        build_atlas(
            &pack,
            structure.palette.iter().map(|s| s.name.as_str()),
            &AtlasConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_mesh_two_cubes() {
        let structure = structure();
        let atlas = atlas(&structure);
        let registry = ShapeRegistry::builtin();
        let output = StructureMesher::new(&registry).mesh(&structure, &atlas);

        assert_eq!(output.block_count, 2);
        assert_eq!(output.vertex_count(), 48);
        assert_eq!(output.triangle_count(), 24);
        assert_eq!(output.bounds, Some(([0.0, 0.0, 0.0], [2.0, 1.0, 1.0])));
    }

    #[test]
    fn test_include_air_draws_invisible_blocks() {
        let structure = structure();
        let atlas = atlas(&structure);
        let registry = ShapeRegistry::builtin();
        let config = MesherConfig {
            include_air: true,
            parallel: false,
        };
        let output = StructureMesher::with_config(&registry, config).mesh(&structure, &atlas);
        assert_eq!(output.block_count, 3);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let structure = structure();
        let atlas = atlas(&structure);
        let registry = ShapeRegistry::builtin();
        let sequential = MesherConfig {
            include_air: false,
            parallel: false,
        };
        let a = StructureMesher::new(&registry).mesh(&structure, &atlas);
        let b = StructureMesher::with_config(&registry, sequential).mesh(&structure, &atlas);
        assert_eq!(a.mesh, b.mesh);
    }

    #[test]
    fn test_uvs_stay_in_atlas() {
        let structure = structure();
        let atlas = atlas(&structure);
        let registry = ShapeRegistry::builtin();
        let output = StructureMesher::new(&registry).mesh(&structure, &atlas);
        for uv in output.mesh.uvs_flat() {
            assert!((0.0..=1.0).contains(&uv));
        }
    }
}
