//! Procedural low-poly pyramid split into stacked frustum blocks.

use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;

use super::state::BLOCK_COUNT;

pub const PYRAMID_HEIGHT: f32 = 2.0;
pub const BASE_HALF_WIDTH: f32 = 1.0;
pub const BLOCK_HEIGHT: f32 = PYRAMID_HEIGHT / BLOCK_COUNT as f32;

const APEX_EPSILON: f32 = 1e-4;

pub fn half_width_at(y: f32) -> f32 {
    BASE_HALF_WIDTH * (1.0 - (y / PYRAMID_HEIGHT).clamp(0.0, 1.0))
}

/// One horizontal slice of the pyramid, in assembly-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockShape {
    pub index: usize,
    pub bottom: f32,
    pub top: f32,
}

impl BlockShape {
    pub fn new(index: usize) -> Self {
        let bottom = index as f32 * BLOCK_HEIGHT;
        Self {
            index,
            bottom,
            top: bottom + BLOCK_HEIGHT,
        }
    }

    pub fn mid_height(&self) -> f32 {
        (self.bottom + self.top) / 2.0
    }

    fn ring(y: f32) -> [Vec3; 4] {
        let h = half_width_at(y);
        [
            Vec3::new(h, y, h),
            Vec3::new(h, y, -h),
            Vec3::new(-h, y, -h),
            Vec3::new(-h, y, h),
        ]
    }

    fn has_top_cap(&self) -> bool {
        half_width_at(self.top) > APEX_EPSILON
    }

    /// Bounding planes as `(outward normal, offset)`: a point `p` is inside
    /// when `normal.dot(p) <= offset` for all six.
    pub fn planes(&self) -> [(Vec3, f32); 6] {
        let slope = BASE_HALF_WIDTH / PYRAMID_HEIGHT;
        [
            (Vec3::new(1.0, slope, 0.0), BASE_HALF_WIDTH),
            (Vec3::new(-1.0, slope, 0.0), BASE_HALF_WIDTH),
            (Vec3::new(0.0, slope, 1.0), BASE_HALF_WIDTH),
            (Vec3::new(0.0, slope, -1.0), BASE_HALF_WIDTH),
            (Vec3::Y, self.top),
            (Vec3::NEG_Y, -self.bottom),
        ]
    }

    pub fn contains(&self, point: Vec3) -> bool {
        self.planes()
            .iter()
            .all(|(normal, offset)| normal.dot(point) <= *offset + 1e-5)
    }

    /// Outline segments: both rings and the four slanted edges.
    pub fn edges(&self) -> Vec<(Vec3, Vec3)> {
        let bottom = Self::ring(self.bottom);
        let top = Self::ring(self.top);
        let mut edges = Vec::with_capacity(12);
        for k in 0..4 {
            let next = (k + 1) % 4;
            edges.push((bottom[k], bottom[next]));
            if self.has_top_cap() {
                edges.push((top[k], top[next]));
            }
            edges.push((bottom[k], top[k]));
        }
        edges
    }

    /// Flat-shaded triangle mesh with outward normals.
    pub fn mesh(&self) -> Mesh {
        let bottom = Self::ring(self.bottom);
        let top = Self::ring(self.top);
        let center = Vec3::new(0.0, self.mid_height(), 0.0);
        let mut builder = FaceBuilder::default();

        for k in 0..4 {
            let next = (k + 1) % 4;
            builder.quad([bottom[k], bottom[next], top[next], top[k]], center);
        }
        builder.quad(bottom, center);
        if self.has_top_cap() {
            builder.quad(top, center);
        }
        builder.build()
    }
}

#[derive(Default)]
struct FaceBuilder {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    indices: Vec<u32>,
}

impl FaceBuilder {
    /// Adds a planar quad, reordering it so its normal faces away from `inside`.
    fn quad(&mut self, mut corners: [Vec3; 4], inside: Vec3) {
        let face_center = corners.iter().copied().sum::<Vec3>() / 4.0;
        let mut normal = (corners[1] - corners[0])
            .cross(corners[3] - corners[0])
            .normalize_or_zero();
        if normal.dot(face_center - inside) < 0.0 {
            corners.reverse();
            normal = -normal;
        }

        let base = self.positions.len() as u32;
        let uvs = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
        for (corner, uv) in corners.iter().zip(uvs) {
            self.positions.push(corner.to_array());
            self.normals.push(normal.to_array());
            self.uvs.push(uv);
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    fn build(self) -> Mesh {
        Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
            .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, self.positions)
            .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals)
            .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, self.uvs)
            .with_inserted_indices(Indices::U32(self.indices))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::render::mesh::VertexAttributeValues;

    #[test]
    fn blocks_stack_without_gaps() {
        for index in 1..BLOCK_COUNT {
            assert_eq!(BlockShape::new(index).bottom, BlockShape::new(index - 1).top);
        }
        assert_eq!(BlockShape::new(BLOCK_COUNT - 1).top, PYRAMID_HEIGHT);
    }

    #[test]
    fn planes_follow_the_tapered_sides() {
        let apex = BlockShape::new(3);
        assert!(apex.contains(Vec3::new(0.0, 1.95, 0.0)));
        assert!(apex.contains(Vec3::new(0.02, 1.95, -0.02)));
        assert!(!apex.contains(Vec3::new(0.2, 1.95, 0.0)));
        assert!(!apex.contains(Vec3::new(0.0, 1.45, 0.0)));

        let base = BlockShape::new(0);
        assert!(base.contains(Vec3::new(0.7, 0.45, 0.7)));
        assert!(!base.contains(Vec3::new(0.9, 0.45, 0.0)));
        assert!(!base.contains(Vec3::new(0.0, 0.55, 0.0)));
    }

    #[test]
    fn mesh_vertices_lie_on_the_planes() {
        for index in 0..BLOCK_COUNT {
            let shape = BlockShape::new(index);
            let mesh = shape.mesh();
            let Some(VertexAttributeValues::Float32x3(positions)) =
                mesh.attribute(Mesh::ATTRIBUTE_POSITION)
            else {
                panic!("missing positions");
            };
            assert!(positions.iter().all(|p| shape.contains(Vec3::from(*p))));
        }
    }

    #[test]
    fn apex_block_has_no_top_cap() {
        let apex = BlockShape::new(BLOCK_COUNT - 1);
        let base = BlockShape::new(0);
        assert_eq!(apex.edges().len(), 8);
        assert_eq!(base.edges().len(), 12);

        let vertex_count = |shape: &BlockShape| shape.mesh().count_vertices();
        assert_eq!(vertex_count(&base), 6 * 4);
        assert_eq!(vertex_count(&apex), 5 * 4);
    }

    #[test]
    fn normals_point_outward() {
        let shape = BlockShape::new(0);
        let mesh = shape.mesh();
        let Some(VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            panic!("missing positions");
        };
        let Some(VertexAttributeValues::Float32x3(normals)) =
            mesh.attribute(Mesh::ATTRIBUTE_NORMAL)
        else {
            panic!("missing normals");
        };
        let center = Vec3::new(0.0, shape.mid_height(), 0.0);
        for (position, normal) in positions.iter().zip(normals) {
            let outward = Vec3::from(*position) - center;
            assert!(Vec3::from(*normal).dot(outward) > 0.0);
        }
    }
}
