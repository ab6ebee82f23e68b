//! Per-block geometry: cuboids, cross planes and connection arms.

use super::geometry::{FaceRange, Mesh, Vertex};
use super::orientation::{facing_transform, stair_boxes, stair_transform};
use crate::atlas::BlockFaceUvs;
use crate::resolver::{Connections, Half, ResolvedBlock, StairShape, WallSide};
use crate::shape::{BoxDefinition, ConnectableKind, GeometryKind, ShapeDefinition, STAIRS};
use crate::types::{Axis, BlockTransform, BoxRotation, Direction, Face};
use glam::{Mat3, Vec3};

/// Geometry for one block in unit space, centred on the origin.
///
/// Vertex UVs are face-local in `[0, 1]` until [`apply_face_uvs`] maps them
/// into atlas rectangles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockGeometry {
    pub mesh: Mesh,
    pub face_ranges: Vec<FaceRange>,
}

impl BlockGeometry {
    pub fn box_count(&self) -> usize {
        self.face_ranges
            .iter()
            .map(|r| r.box_index + 1)
            .max()
            .unwrap_or(0)
    }

    /// Face ranges emitted by one box.
    pub fn box_faces(&self, box_index: usize) -> impl Iterator<Item = &FaceRange> {
        self.face_ranges
            .iter()
            .filter(move |r| r.box_index == box_index)
    }
}

/// Map face-local UVs into the atlas rectangles of each face.
pub fn apply_face_uvs(geometry: &BlockGeometry, uvs: &BlockFaceUvs) -> Mesh {
    let mut mesh = geometry.mesh.clone();
    for range in &geometry.face_ranges {
        let rect = uvs.get(range.face);
        for vertex in &mut mesh.vertices[range.vertices()] {
            vertex.uv = rect.map(vertex.uv);
        }
    }
    mesh
}

/// Build the geometry of a resolved block.
pub fn generate(definition: &ShapeDefinition, resolved: &ResolvedBlock) -> BlockGeometry {
    let mut geometry = BlockGeometry::default();

    if resolved.shape == STAIRS {
        let shape = resolved.stair_shape.unwrap_or(StairShape::Straight);
        let facing = resolved.facing.unwrap_or(Direction::North);
        let half = resolved.half.unwrap_or(Half::Bottom);
        let boxes = if shape == StairShape::Straight && !definition.boxes.is_empty() {
            definition.boxes.clone()
        } else {
            stair_boxes(shape)
        };
        let transform = stair_transform(half, facing, shape);
        for (i, b) in boxes.iter().enumerate() {
            add_cuboid(&mut geometry, i, b, transform);
        }
        return geometry;
    }

    match definition.geometry {
        GeometryKind::Cross => add_cross(&mut geometry),
        GeometryKind::Box | GeometryKind::MultiBox | GeometryKind::Custom => {
            let transform = match (definition.rotatable, resolved.facing) {
                (true, Some(facing)) => facing_transform(definition.facing_mode, facing),
                _ => BlockTransform::IDENTITY,
            };
            let boxes = shape_boxes(definition, resolved);
            for (i, b) in boxes.iter().enumerate() {
                add_cuboid(&mut geometry, i, b, transform);
            }
        }
    }
    geometry
}

/// Boxes after half mirroring and connection arms.
fn shape_boxes(definition: &ShapeDefinition, resolved: &ResolvedBlock) -> Vec<BoxDefinition> {
    if definition.half_aware {
        match resolved.half {
            Some(Half::Double) => return vec![BoxDefinition::full()],
            Some(Half::Top) => {
                return definition
                    .boxes
                    .iter()
                    .map(BoxDefinition::flipped_vertically)
                    .collect()
            }
            _ => {}
        }
    }

    match (definition.connectable, &resolved.connections) {
        (Some(kind), Some(connections)) => {
            let mut boxes = Vec::new();
            if kind != ConnectableKind::Wall || connections.up {
                boxes.extend(definition.boxes.iter().cloned());
            }
            boxes.extend(connection_arms(kind, connections));
            boxes
        }
        _ => definition.boxes.clone(),
    }
}

/// Arm boxes for every connected side.
pub fn connection_arms(kind: ConnectableKind, connections: &Connections) -> Vec<BoxDefinition> {
    let mut arms = Vec::new();
    for (turns, direction) in Direction::HORIZONTAL.into_iter().enumerate() {
        let side = connections.side(direction);
        if !side.is_connected() {
            continue;
        }
        // north-pointing arms, rotated clockwise into place
        let north: Vec<BoxDefinition> = match (kind, side) {
            (ConnectableKind::Fence, _) => vec![
                BoxDefinition::new([7.0, 12.0, 0.0], [9.0, 15.0, 9.0]),
                BoxDefinition::new([7.0, 6.0, 0.0], [9.0, 9.0, 9.0]),
            ],
            (ConnectableKind::Wall, WallSide::Tall) => {
                vec![BoxDefinition::new([5.0, 0.0, 0.0], [11.0, 16.0, 8.0])]
            }
            (ConnectableKind::Wall, _) => {
                vec![BoxDefinition::new([5.0, 0.0, 0.0], [11.0, 14.0, 8.0])]
            }
            (ConnectableKind::GlassPane, _) => {
                vec![BoxDefinition::new([7.0, 0.0, 0.0], [9.0, 16.0, 7.0])]
            }
        };
        arms.extend(north.iter().map(|b| b.rotated_quarter_turns(turns as u32)));
    }
    arms
}

/// Corner positions and UV rectangle of one face, on the 0-16 grid.
///
/// Corners run top-left, top-right, bottom-right, bottom-left as seen from
/// outside; the rectangle is the game's automatic UV for the box extent.
fn face_quad(face: Face, from: [f32; 3], to: [f32; 3]) -> ([[f32; 3]; 4], [f32; 4]) {
    match face {
        Face::Bottom => (
            [
                [from[0], from[1], to[2]],
                [to[0], from[1], to[2]],
                [to[0], from[1], from[2]],
                [from[0], from[1], from[2]],
            ],
            [from[0], 16.0 - to[2], to[0], 16.0 - from[2]],
        ),
        Face::Top => (
            [
                [from[0], to[1], from[2]],
                [to[0], to[1], from[2]],
                [to[0], to[1], to[2]],
                [from[0], to[1], to[2]],
            ],
            [from[0], from[2], to[0], to[2]],
        ),
        Face::North => (
            [
                [to[0], to[1], from[2]],
                [from[0], to[1], from[2]],
                [from[0], from[1], from[2]],
                [to[0], from[1], from[2]],
            ],
            [16.0 - to[0], 16.0 - to[1], 16.0 - from[0], 16.0 - from[1]],
        ),
        Face::South => (
            [
                [from[0], to[1], to[2]],
                [to[0], to[1], to[2]],
                [to[0], from[1], to[2]],
                [from[0], from[1], to[2]],
            ],
            [from[0], 16.0 - to[1], to[0], 16.0 - from[1]],
        ),
        Face::West => (
            [
                [from[0], to[1], from[2]],
                [from[0], to[1], to[2]],
                [from[0], from[1], to[2]],
                [from[0], from[1], from[2]],
            ],
            [from[2], 16.0 - to[1], to[2], 16.0 - from[1]],
        ),
        Face::East => (
            [
                [to[0], to[1], to[2]],
                [to[0], to[1], from[2]],
                [to[0], from[1], from[2]],
                [to[0], from[1], to[2]],
            ],
            [16.0 - to[2], 16.0 - to[1], 16.0 - from[2], 16.0 - from[1]],
        ),
    }
}

fn box_rotation_matrix(rotation: &BoxRotation) -> Mat3 {
    let angle = rotation.angle_radians();
    match rotation.axis {
        Axis::X => Mat3::from_rotation_x(angle),
        Axis::Y => Mat3::from_rotation_y(angle),
        Axis::Z => Mat3::from_rotation_z(angle),
    }
}

fn block_rotation_matrix(transform: BlockTransform) -> Mat3 {
    // Table angles are clockwise; glam rotates counter-clockwise.
    let x_rot = Mat3::from_rotation_x((-transform.x as f32).to_radians());
    let y_rot = Mat3::from_rotation_y((-transform.y as f32).to_radians());
    y_rot * x_rot
}

fn rotate_about(rotation: &BoxRotation, matrix: Mat3, p: Vec3) -> Vec3 {
    let origin = Vec3::from(rotation.normalized_origin());
    let rotated = matrix * (p - origin);
    let rescale = rotation.rescale_factor();
    let scaled = if rescale != 1.0 {
        match rotation.axis {
            Axis::X => Vec3::new(rotated.x, rotated.y * rescale, rotated.z * rescale),
            Axis::Y => Vec3::new(rotated.x * rescale, rotated.y, rotated.z * rescale),
            Axis::Z => Vec3::new(rotated.x * rescale, rotated.y * rescale, rotated.z),
        }
    } else {
        rotated
    };
    scaled + origin
}

/// Emit the six faces of one box.
fn add_cuboid(
    geometry: &mut BlockGeometry,
    box_index: usize,
    b: &BoxDefinition,
    transform: BlockTransform,
) {
    let block_matrix = block_rotation_matrix(transform);
    let box_matrix = b.rotation.as_ref().map(|r| (r, box_rotation_matrix(r)));

    for face in Face::BOX_ORDER {
        let (corners, rect) = face_quad(face, b.from, b.to);
        let (dx, dy, dz) = face.direction().offset();
        let mut normal = Vec3::new(dx as f32, dy as f32, dz as f32);
        if let Some((_, m)) = &box_matrix {
            normal = *m * normal;
        }
        let normal = (block_matrix * normal).normalize_or_zero();

        let u = [rect[0] / 16.0, rect[2] / 16.0];
        let v = [rect[1] / 16.0, rect[3] / 16.0];
        let local_uvs = [[u[0], v[0]], [u[1], v[0]], [u[1], v[1]], [u[0], v[1]]];

        let start = geometry.mesh.vertex_count();
        let mut ids = [0u32; 4];
        for (i, corner) in corners.iter().enumerate() {
            let mut p = Vec3::new(
                corner[0] / 16.0 - 0.5,
                corner[1] / 16.0 - 0.5,
                corner[2] / 16.0 - 0.5,
            );
            if let Some((rotation, m)) = &box_matrix {
                p = rotate_about(rotation, *m, p);
            }
            let p = block_matrix * p;
            let uv = [
                local_uvs[i][0].clamp(0.0, 1.0),
                local_uvs[i][1].clamp(0.0, 1.0),
            ];
            ids[i] = geometry
                .mesh
                .add_vertex(Vertex::new(p.to_array(), normal.to_array(), uv));
        }
        geometry.mesh.add_quad(ids[0], ids[1], ids[2], ids[3]);
        geometry.face_ranges.push(FaceRange {
            face,
            box_index,
            start,
            count: 4,
        });
    }
}

/// The four planes of a plant cross: both diagonals, each emitted once per
/// facing side so the quads stay visible with back-face culling. Every quad
/// samples the north face texture.
fn add_cross(geometry: &mut BlockGeometry) {
    const LO: f32 = 0.8 / 16.0 - 0.5;
    const HI: f32 = 15.2 / 16.0 - 0.5;
    let planes = [
        ([LO, LO], [HI, HI], [-1.0, 1.0]),
        ([LO, HI], [HI, LO], [1.0, 1.0]),
    ];
    let uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    for (plane, (a, b, n)) in planes.into_iter().enumerate() {
        let corners = [
            [a[0], 0.5, a[1]],
            [b[0], 0.5, b[1]],
            [b[0], -0.5, b[1]],
            [a[0], -0.5, a[1]],
        ];
        let normal = Vec3::new(n[0], 0.0, n[1]).normalize().to_array();
        let back = [-normal[0], 0.0, -normal[2]];
        for (side_normal, order) in [(normal, [0, 1, 2, 3]), (back, [1, 0, 3, 2])] {
            let start = geometry.mesh.vertex_count();
            let ids: Vec<u32> = order
                .iter()
                .zip(uvs)
                .map(|(&corner, uv)| {
                    geometry
                        .mesh
                        .add_vertex(Vertex::new(corners[corner], side_normal, uv))
                })
                .collect();
            geometry.mesh.add_quad(ids[0], ids[1], ids[2], ids[3]);
            geometry.face_ranges.push(FaceRange {
                face: Face::North,
                box_index: plane,
                start,
                count: 4,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::UvCoords;
    use crate::shape::ShapeRegistry;

    fn resolved(shape: &str) -> ResolvedBlock {
        ResolvedBlock {
            shape: shape.to_string(),
            ..ResolvedBlock::full()
        }
    }

    fn close(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn test_full_box_counts() {
        let geometry = generate(&ShapeDefinition::full(), &ResolvedBlock::full());
        assert_eq!(geometry.mesh.vertex_count(), 24);
        assert_eq!(geometry.mesh.indices.len(), 36);
        assert_eq!(geometry.face_ranges.len(), 6);
        let faces: Vec<Face> = geometry.face_ranges.iter().map(|r| r.face).collect();
        assert_eq!(faces, Face::BOX_ORDER.to_vec());
        let (min, max) = geometry.mesh.bounds().unwrap();
        assert_eq!(min, [-0.5, -0.5, -0.5]);
        assert_eq!(max, [0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_face_normals_point_outward() {
        let geometry = generate(&ShapeDefinition::full(), &ResolvedBlock::full());
        for range in &geometry.face_ranges {
            let (dx, dy, dz) = range.face.direction().offset();
            for vertex in &geometry.mesh.vertices[range.vertices()] {
                assert_eq!(vertex.normal, [dx as f32, dy as f32, dz as f32]);
                let p = vertex.position;
                let dot = p[0] * dx as f32 + p[1] * dy as f32 + p[2] * dz as f32;
                assert!((dot - 0.5).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_uvs_in_unit_square_after_application() {
        let registry = ShapeRegistry::builtin();
        let uvs = BlockFaceUvs::uniform(UvCoords::new(0.25, 0.5, 0.5, 0.75));
        for shape in ["full", "slab", "stairs", "anvil", "cross", "fence", "button"] {
            let geometry = generate(registry.definition(shape), &resolved(shape));
            let mesh = apply_face_uvs(&geometry, &uvs);
            for vertex in &mesh.vertices {
                assert!((0.25..=0.5).contains(&vertex.uv[0]), "{} u {}", shape, vertex.uv[0]);
                assert!((0.5..=0.75).contains(&vertex.uv[1]), "{} v {}", shape, vertex.uv[1]);
            }
        }
    }

    #[test]
    fn test_face_ranges_address_individual_boxes() {
        let registry = ShapeRegistry::builtin();
        let geometry = generate(registry.definition("anvil"), &resolved("anvil"));
        assert_eq!(geometry.box_count(), 4);
        assert_eq!(geometry.box_faces(2).count(), 6);

        let mut uvs = BlockFaceUvs::uniform(UvCoords::new(0.0, 0.0, 0.5, 0.5));
        uvs.top = UvCoords::new(0.75, 0.75, 1.0, 1.0);
        let mesh = apply_face_uvs(&geometry, &uvs);
        for range in geometry.box_faces(3) {
            let on_top = range.face == Face::Top;
            for vertex in &mesh.vertices[range.vertices()] {
                assert_eq!(vertex.uv[0] >= 0.75, on_top);
            }
        }
    }

    #[test]
    fn test_slab_halves() {
        let registry = ShapeRegistry::builtin();
        let slab = registry.definition("slab");
        let mut block = resolved("slab");

        block.half = Some(Half::Top);
        let (min, max) = generate(slab, &block).mesh.bounds().unwrap();
        assert_eq!((min[1], max[1]), (0.0, 0.5));

        block.half = Some(Half::Double);
        let geometry = generate(slab, &block);
        assert_eq!(geometry.mesh.vertex_count(), 24);
        assert_eq!(geometry.mesh.bounds().unwrap().0[1], -0.5);
    }

    #[test]
    fn test_stair_variants() {
        let registry = ShapeRegistry::builtin();
        let def = registry.definition(STAIRS);
        let mut block = resolved(STAIRS);
        block.facing = Some(Direction::North);
        block.half = Some(Half::Bottom);

        block.stair_shape = Some(StairShape::Straight);
        let straight = generate(def, &block);
        assert_eq!(straight.box_count(), 2);
        // the upper step of a north-facing stair covers the north half (z < 0)
        let step = straight.box_faces(1).flat_map(|r| straight.mesh.vertices[r.vertices()].to_vec());
        for v in step {
            assert!(v.position[2] <= 1e-6);
            assert!(v.position[1] >= -1e-6);
        }

        block.stair_shape = Some(StairShape::InnerLeft);
        assert_eq!(generate(def, &block).box_count(), 3);
        block.stair_shape = Some(StairShape::OuterRight);
        assert_eq!(generate(def, &block).mesh.vertex_count(), 48);
    }

    #[test]
    fn test_top_stair_is_upside_down() {
        let registry = ShapeRegistry::builtin();
        let mut block = resolved(STAIRS);
        block.facing = Some(Direction::East);
        block.half = Some(Half::Top);
        block.stair_shape = Some(StairShape::Straight);
        let geometry = generate(registry.definition(STAIRS), &block);
        // the full-width slab box now sits on top
        let (min, _) = geometry
            .box_faces(0)
            .flat_map(|r| geometry.mesh.vertices[r.vertices()].to_vec())
            .fold(([1.0f32; 3], [-1.0f32; 3]), |(mut lo, mut hi), v| {
                for a in 0..3 {
                    lo[a] = lo[a].min(v.position[a]);
                    hi[a] = hi[a].max(v.position[a]);
                }
                (lo, hi)
            });
        assert!((min[1] - 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_horizontal_rotation_moves_door() {
        let registry = ShapeRegistry::builtin();
        let mut block = resolved("door");
        block.facing = Some(Direction::East);
        let (min, max) = generate(registry.definition("door"), &block).mesh.bounds().unwrap();
        // north-facing door sits on the south edge; facing east it sits on the west edge
        assert!(close([min[0], min[1], min[2]], [-0.5, -0.5, -0.5]));
        assert!((max[0] - (3.0 / 16.0 - 0.5)).abs() < 1e-5);
        assert!((max[2] - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_directional_rotation() {
        let registry = ShapeRegistry::builtin();
        let mut block = resolved("rod");
        block.facing = Some(Direction::East);
        let (min, max) = generate(registry.definition("rod"), &block).mesh.bounds().unwrap();
        // an east-facing rod spans the x axis
        assert!((max[0] - min[0] - 1.0).abs() < 1e-5);
        assert!((max[1] - min[1] - 0.125).abs() < 1e-5);
    }

    #[test]
    fn test_cross_has_four_quads() {
        let geometry = generate(&ShapeDefinition::cross(), &resolved("cross"));
        assert_eq!(geometry.mesh.vertex_count(), 16);
        assert_eq!(geometry.mesh.triangle_count(), 8);
        assert!(geometry.face_ranges.iter().all(|r| r.face == Face::North));

        // one normal per plane, pointing four different ways
        let mut normals: Vec<[i32; 3]> = geometry
            .face_ranges
            .iter()
            .map(|r| {
                let n = geometry.mesh.vertices[r.start].normal;
                [(n[0] * 100.0) as i32, (n[1] * 100.0) as i32, (n[2] * 100.0) as i32]
            })
            .collect();
        normals.sort();
        normals.dedup();
        assert_eq!(normals.len(), 4);
    }

    #[test]
    fn test_connection_arms() {
        let registry = ShapeRegistry::builtin();
        let mut block = resolved("wall");
        let mut connections = Connections::new(ConnectableKind::Wall)
            .with(Direction::North, WallSide::Tall)
            .with(Direction::South, WallSide::Tall);
        connections.up = false;
        block.connections = Some(connections);
        let geometry = generate(registry.definition("wall"), &block);
        // no post, two arms
        assert_eq!(geometry.box_count(), 2);
        let (min, max) = geometry.mesh.bounds().unwrap();
        assert_eq!((min[2], max[2]), (-0.5, 0.5));
        assert_eq!(max[1], 0.5);

        let arms = connection_arms(
            ConnectableKind::Fence,
            &Connections::new(ConnectableKind::Fence).with(Direction::East, WallSide::Low),
        );
        assert_eq!(arms.len(), 2);
        assert_eq!(arms[0].from, [7.0, 12.0, 7.0]);
        assert_eq!(arms[0].to, [16.0, 15.0, 9.0]);
    }

    #[test]
    fn test_box_rotation_applies() {
        let mut def = ShapeDefinition::single([0.0, 0.0, 8.0], [16.0, 16.0, 8.0]);
        def.boxes[0].rotation = Some(BoxRotation {
            origin: [8.0, 8.0, 8.0],
            axis: Axis::Y,
            angle: 45.0,
            rescale: false,
        });
        let (min, max) = generate(&def, &ResolvedBlock::full()).mesh.bounds().unwrap();
        let half_diag = 0.5 * std::f32::consts::FRAC_1_SQRT_2;
        assert!((max[0] - half_diag).abs() < 1e-5);
        assert!((min[2] + half_diag).abs() < 1e-5);
    }
}
