//! Raw mesh data export for custom rendering.

use crate::atlas::{base64_png, TextureAtlas};
use crate::mesher::MesherOutput;
use serde::Serialize;

/// Flat vertex buffers plus the atlas image they sample.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMeshData {
    /// Vertex positions (3 floats per vertex).
    pub positions: Vec<f32>,
    /// Vertex normals (3 floats per vertex).
    pub normals: Vec<f32>,
    /// Texture coordinates (2 floats per vertex).
    pub uvs: Vec<f32>,
    /// Triangle indices (3 per triangle).
    pub indices: Vec<u32>,
    /// Texture atlas PNG.
    #[serde(serialize_with = "base64_png::serialize")]
    pub texture_png: Vec<u8>,
    pub texture_width: u32,
    pub texture_height: u32,
    pub bounds_min: Option<[f32; 3]>,
    pub bounds_max: Option<[f32; 3]>,
}

/// Export mesh as raw data.
pub fn export_raw(output: &MesherOutput, atlas: &TextureAtlas) -> RawMeshData {
    let mesh = &output.mesh;

    RawMeshData {
        positions: mesh.positions_flat(),
        normals: mesh.normals_flat(),
        uvs: mesh.uvs_flat(),
        indices: mesh.indices.clone(),
        texture_png: atlas.atlas_image.clone(),
        texture_width: atlas.width,
        texture_height: atlas.height,
        bounds_min: output.bounds.map(|(min, _)| min),
        bounds_max: output.bounds.map(|(_, max)| max),
    }
}

impl RawMeshData {
    /// Get the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::{build_atlas, AtlasConfig};
    use crate::mesher::geometry::{Mesh, Vertex};
    use crate::resource_pack::TexturePack;

    #[test]
    fn test_export_raw() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(Vertex::new([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0]));
        mesh.add_vertex(Vertex::new([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0]));
        mesh.add_vertex(Vertex::new([0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [0.0, 1.0]));
        mesh.add_triangle(0, 1, 2);

        let output = MesherOutput {
            bounds: mesh.bounds(),
            block_count: 1,
            mesh,
        };
        let atlas = build_atlas(&TexturePack::new(), [], &AtlasConfig::default()).unwrap();

        let raw = export_raw(&output, &atlas);

        assert_eq!(raw.vertex_count(), 3);
        assert_eq!(raw.triangle_count(), 1);
        assert_eq!(raw.positions.len(), 9);
        assert_eq!(raw.uvs.len(), 6);
        assert_eq!(raw.bounds_max, Some([1.0, 0.0, 1.0]));
        assert_eq!(raw.texture_width, 16);

        let json = serde_json::to_value(&raw).unwrap();
        assert!(json["texturePng"].is_string());
    }
}
