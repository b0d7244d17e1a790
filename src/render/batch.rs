//! Point quad batching under a fixed vertex ceiling.
//!
//! Every point becomes one quad: 4 vertices and 2 triangles. Batches are
//! filled strictly in point order, each holding at most
//! `max_vertices_per_batch / 4` points.

use glam::DVec3;

use super::billboard::{QuadBasis, billboard_basis};
use super::camera::CameraPose;
use crate::schema::{Color, DEFAULT_MAX_VERTICES_PER_BATCH, PointSet};

/// Vertex ceiling of the reference platform.
pub const MAX_VERTICES_PER_BATCH: usize = DEFAULT_MAX_VERTICES_PER_BATCH;

/// Vertices emitted per point.
pub const VERTICES_PER_POINT: usize = 4;
/// Indices emitted per point.
pub const INDICES_PER_POINT: usize = 6;

/// Quad corner offsets as (right, up) signs, counter-clockwise from bottom-left.
const CORNERS: [(f64, f64); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
/// Texture coordinates matching [`CORNERS`].
const CORNER_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
/// Two triangles per quad, relative to the quad's first vertex.
const QUAD_INDICES: [u32; INDICES_PER_POINT] = [0, 1, 2, 0, 2, 3];

/// GPU vertex layout for a point quad corner.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

/// How a batch's vertex colors were assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Every vertex carries the same fallback color.
    Uniform,
    /// Vertices carry their point's own color.
    PerVertex,
}

/// One renderable chunk of point quads.
#[derive(Debug, Clone)]
pub struct DrawBatch {
    pub vertices: Vec<PointVertex>,
    /// Triangle list indices into `vertices`.
    pub indices: Vec<u32>,
    pub color_mode: ColorMode,
    /// Index of the first source point in this batch.
    pub first_point: usize,
}

impl DrawBatch {
    #[inline]
    pub fn point_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_POINT
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Source point range covered by this batch.
    pub fn point_range(&self) -> std::ops::Range<usize> {
        self.first_point..self.first_point + self.point_count()
    }
}

/// Per-build rendering parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildParams {
    /// Quad edge length in world units.
    pub point_size: f64,
    /// Face each quad towards the camera.
    pub billboard: bool,
    /// Color used when per-point colors are absent or mismatched.
    pub fallback_color: Color,
}

impl Default for BuildParams {
    fn default() -> Self {
        Self {
            point_size: 0.01,
            billboard: true,
            fallback_color: Color::WHITE,
        }
    }
}

/// Converts point-sets into size-bounded quad batches.
#[derive(Debug, Clone, Copy)]
pub struct PointBatchBuilder {
    max_points_per_batch: usize,
}

impl Default for PointBatchBuilder {
    fn default() -> Self {
        Self::new(MAX_VERTICES_PER_BATCH)
    }
}

impl PointBatchBuilder {
    /// Create a builder for the given vertex ceiling (at least one quad).
    pub fn new(max_vertices_per_batch: usize) -> Self {
        Self {
            max_points_per_batch: (max_vertices_per_batch / VERTICES_PER_POINT).max(1),
        }
    }

    #[inline]
    pub fn max_points_per_batch(&self) -> usize {
        self.max_points_per_batch
    }

    /// Number of batches a point-set of `point_count` points will produce.
    #[inline]
    pub fn batch_count(&self, point_count: usize) -> usize {
        point_count.div_ceil(self.max_points_per_batch)
    }

    /// Build all batches for `points`.
    ///
    /// Billboarding needs a camera; without one, or with `billboard` off,
    /// every quad uses the fixed world-aligned basis. `per_point_colors` is
    /// used only when its length equals the point count.
    pub fn build(
        &self,
        points: &PointSet,
        camera: Option<&CameraPose>,
        params: &BuildParams,
        per_point_colors: Option<&[Color]>,
    ) -> Vec<DrawBatch> {
        let colors = per_point_colors.filter(|c| c.len() == points.len());
        let camera_position = camera.filter(|_| params.billboard).map(|c| c.position);
        let half_size = params.point_size * 0.5;
        let fallback = params.fallback_color.to_rgba_f32();

        let mut batches = Vec::with_capacity(self.batch_count(points.len()));
        for (chunk_index, chunk) in points
            .points()
            .chunks(self.max_points_per_batch)
            .enumerate()
        {
            let first_point = chunk_index * self.max_points_per_batch;
            let mut vertices = Vec::with_capacity(chunk.len() * VERTICES_PER_POINT);
            let mut indices = Vec::with_capacity(chunk.len() * INDICES_PER_POINT);

            for (offset, record) in chunk.iter().enumerate() {
                let center = record.position;
                let basis = match camera_position {
                    Some(eye) => billboard_basis(center, eye),
                    None => QuadBasis::FIXED,
                };
                let color = colors.map_or(fallback, |c| c[first_point + offset].to_rgba_f32());

                let base = vertices.len() as u32;
                push_quad(&mut vertices, center, &basis, half_size, color);
                indices.extend(QUAD_INDICES.iter().map(|i| base + i));
            }

            batches.push(DrawBatch {
                vertices,
                indices,
                color_mode: if colors.is_some() {
                    ColorMode::PerVertex
                } else {
                    ColorMode::Uniform
                },
                first_point,
            });
        }

        batches
    }
}

fn push_quad(
    vertices: &mut Vec<PointVertex>,
    center: DVec3,
    basis: &QuadBasis,
    half_size: f64,
    color: [f32; 4],
) {
    let right = basis.right * half_size;
    let up = basis.up * half_size;
    for (&(sr, su), &uv) in CORNERS.iter().zip(CORNER_UVS.iter()) {
        let p = center + right * sr + up * su;
        vertices.push(PointVertex {
            position: p.as_vec3().to_array(),
            uv,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::PointRecord;

    fn line_of_points(n: usize) -> PointSet {
        PointSet::from_positions((0..n).map(|i| DVec3::new(i as f64, 0.0, 0.0)))
    }

    #[test]
    fn test_empty_set_yields_no_batches() {
        let builder = PointBatchBuilder::default();
        let batches = builder.build(&PointSet::empty(), None, &BuildParams::default(), None);
        assert!(batches.is_empty());
    }

    #[test]
    fn test_single_quad_geometry() {
        let builder = PointBatchBuilder::default();
        let points = PointSet::from_positions([DVec3::new(1.0, 2.0, 3.0)]);
        let params = BuildParams {
            point_size: 2.0,
            billboard: false,
            fallback_color: Color::new(1.0, 0.0, 0.0),
        };

        let batches = builder.build(&points, None, &params, None);
        assert_eq!(batches.len(), 1);
        let batch = &batches[0];
        assert_eq!(batch.vertex_count(), 4);
        assert_eq!(batch.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(batch.color_mode, ColorMode::Uniform);

        let positions: Vec<[f32; 3]> = batch.vertices.iter().map(|v| v.position).collect();
        assert_eq!(
            positions,
            vec![
                [0.0, 1.0, 3.0],
                [2.0, 1.0, 3.0],
                [2.0, 3.0, 3.0],
                [0.0, 3.0, 3.0],
            ]
        );
        assert_eq!(batch.vertices[2].uv, [1.0, 1.0]);
        assert!(batch.vertices.iter().all(|v| v.color == [1.0, 0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_capacity_split_reference_ceiling() {
        let builder = PointBatchBuilder::default();
        let max = builder.max_points_per_batch();
        assert_eq!(max, 16_383);

        let points = line_of_points(4 * max + 1);
        let batches = builder.build(&points, None, &BuildParams::default(), None);

        assert_eq!(batches.len(), 5);
        for batch in &batches[..4] {
            assert_eq!(batch.point_count(), max);
            assert!(batch.vertex_count() <= MAX_VERTICES_PER_BATCH);
        }
        assert_eq!(batches[4].point_count(), 1);
    }

    #[test]
    fn test_batches_fill_in_point_order() {
        let builder = PointBatchBuilder::new(12); // three points per batch
        let points = line_of_points(7);
        let params = BuildParams {
            point_size: 0.0,
            billboard: false,
            ..Default::default()
        };

        let batches = builder.build(&points, None, &params, None);
        assert_eq!(batches.len(), builder.batch_count(7));
        assert_eq!(batches.len(), 3);

        let mut next = 0usize;
        for batch in &batches {
            assert_eq!(batch.first_point, next);
            for (i, quad) in batch.vertices.chunks(4).enumerate() {
                let expected = (batch.first_point + i) as f32;
                assert!(quad.iter().all(|v| v.position[0] == expected));
            }
            assert!(batch.indices.iter().all(|&i| (i as usize) < batch.vertex_count()));
            next = batch.point_range().end;
        }
        assert_eq!(next, 7);
    }

    #[test]
    fn test_per_point_colors_applied() {
        let builder = PointBatchBuilder::new(8);
        let points = line_of_points(3);
        let colors = [
            Color::new(1.0, 0.0, 0.0),
            Color::new(0.0, 1.0, 0.0),
            Color::new(0.0, 0.0, 1.0),
        ];

        let batches = builder.build(&points, None, &BuildParams::default(), Some(&colors));
        assert_eq!(batches.len(), 2);
        assert!(batches.iter().all(|b| b.color_mode == ColorMode::PerVertex));
        assert!(batches[1].vertices.iter().all(|v| v.color == [0.0, 0.0, 1.0, 1.0]));
        assert!(batches[0].vertices[4..].iter().all(|v| v.color == [0.0, 1.0, 0.0, 1.0]));
    }

    #[test]
    fn test_mismatched_colors_fall_back() {
        let builder = PointBatchBuilder::default();
        let points = line_of_points(3);
        let colors = [Color::new(1.0, 0.0, 0.0)];
        let params = BuildParams {
            fallback_color: Color::new(0.5, 0.5, 0.5),
            ..Default::default()
        };

        let batches = builder.build(&points, None, &params, Some(&colors));
        assert_eq!(batches[0].color_mode, ColorMode::Uniform);
        assert!(batches[0].vertices.iter().all(|v| v.color == [0.5, 0.5, 0.5, 1.0]));
    }

    #[test]
    fn test_billboard_quads_face_camera() {
        let builder = PointBatchBuilder::default();
        let points = PointSet::new(vec![
            PointRecord::new(DVec3::ZERO),
            PointRecord::new(DVec3::new(3.0, 1.0, -2.0)),
        ]);
        let camera = CameraPose::look_at(DVec3::new(10.0, 2.0, 4.0), DVec3::ZERO);
        let params = BuildParams {
            point_size: 1.0,
            billboard: true,
            ..Default::default()
        };

        let batches = builder.build(&points, Some(&camera), &params, None);
        for (quad, record) in batches[0].vertices.chunks(4).zip(points.iter()) {
            let to_camera = (camera.position - record.position).normalize();
            for v in quad {
                let offset = DVec3::new(
                    v.position[0] as f64,
                    v.position[1] as f64,
                    v.position[2] as f64,
                ) - record.position;
                assert!(offset.dot(to_camera).abs() < 1e-5);
                assert!((offset.length() - 0.5f64.sqrt()).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_billboard_without_camera_uses_fixed_basis() {
        let builder = PointBatchBuilder::default();
        let points = PointSet::from_positions([DVec3::ZERO]);
        let params = BuildParams {
            point_size: 2.0,
            billboard: true,
            ..Default::default()
        };

        let batches = builder.build(&points, None, &params, None);
        assert_eq!(batches[0].vertices[0].position, [-1.0, -1.0, 0.0]);
        assert_eq!(batches[0].vertices[2].position, [1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_vertex_is_pod() {
        let vertex = PointVertex {
            position: [1.0, 2.0, 3.0],
            uv: [0.0, 1.0],
            color: [1.0; 4],
        };
        let bytes: &[u8] = bytemuck::bytes_of(&vertex);
        assert_eq!(bytes.len(), std::mem::size_of::<PointVertex>());
        assert_eq!(std::mem::size_of::<PointVertex>(), 36);
    }
}
