use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Box geometry parameters: extents and segment counts per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxGeometry {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    pub depth_segments: u32,
}

impl Default for BoxGeometry {
    fn default() -> Self {
        Self::cube(1.0, 1)
    }
}

impl BoxGeometry {
    /// A cube of edge `size` with `segments` subdivisions on every axis.
    pub fn cube(size: f32, segments: u32) -> Self {
        Self {
            width: size,
            height: size,
            depth: size,
            width_segments: segments,
            height_segments: segments,
            depth_segments: segments,
        }
    }

    /// Same extents, new uniform subdivision.
    pub fn with_segments(self, segments: u32) -> Self {
        Self {
            width_segments: segments,
            height_segments: segments,
            depth_segments: segments,
            ..self
        }
    }

    /// Generate vertex and index data.
    ///
    /// Each face is a subdivided plane with its own vertices so normals and
    /// UVs stay per-face. Segment counts below 1 are treated as 1.
    pub fn build(&self) -> MeshData {
        let ws = self.width_segments.max(1);
        let hs = self.height_segments.max(1);
        let ds = self.depth_segments.max(1);
        let (w, h, d) = (self.width, self.height, self.depth);

        let mut data = MeshData::default();
        // (u, v, w axes, u dir, v dir, plane width, plane height, offset along w, grid)
        data.push_plane([2, 1, 0], -1.0, -1.0, d, h, w, ds, hs); // +x
        data.push_plane([2, 1, 0], 1.0, -1.0, d, h, -w, ds, hs); // -x
        data.push_plane([0, 2, 1], 1.0, 1.0, w, d, h, ws, ds); // +y
        data.push_plane([0, 2, 1], 1.0, -1.0, w, d, -h, ws, ds); // -y
        data.push_plane([0, 1, 2], 1.0, -1.0, w, h, d, ws, hs); // +z
        data.push_plane([0, 1, 2], -1.0, -1.0, w, h, -d, ws, hs); // -z
        data
    }
}

/// A vertex with position, normal and UV.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Indexed triangle data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<GeometryVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Line-list indices for the unique edges of every triangle.
    pub fn wireframe_indices(&self) -> Vec<u32> {
        let mut seen: HashSet<(u32, u32)> = HashSet::new();
        let mut lines = Vec::new();
        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let edge = if a < b { (a, b) } else { (b, a) };
                if seen.insert(edge) {
                    lines.push(edge.0);
                    lines.push(edge.1);
                }
            }
        }
        lines
    }

    #[allow(clippy::too_many_arguments)]
    fn push_plane(
        &mut self,
        axes: [usize; 3],
        u_dir: f32,
        v_dir: f32,
        width: f32,
        height: f32,
        depth: f32,
        grid_x: u32,
        grid_y: u32,
    ) {
        let [u, v, w] = axes;
        let segment_w = width / grid_x as f32;
        let segment_h = height / grid_y as f32;
        let half_w = width / 2.0;
        let half_h = height / 2.0;
        let half_d = depth / 2.0;
        let base = self.vertices.len() as u32;
        let row = grid_x + 1;

        for iy in 0..=grid_y {
            let y = iy as f32 * segment_h - half_h;
            for ix in 0..=grid_x {
                let x = ix as f32 * segment_w - half_w;
                let mut position = [0.0; 3];
                position[u] = x * u_dir;
                position[v] = y * v_dir;
                position[w] = half_d;
                let mut normal = [0.0; 3];
                normal[w] = if depth > 0.0 { 1.0 } else { -1.0 };
                self.vertices.push(GeometryVertex {
                    position,
                    normal,
                    uv: [
                        ix as f32 / grid_x as f32,
                        1.0 - iy as f32 / grid_y as f32,
                    ],
                });
            }
        }

        for iy in 0..grid_y {
            for ix in 0..grid_x {
                let a = base + ix + row * iy;
                let b = base + ix + row * (iy + 1);
                let c = base + (ix + 1) + row * (iy + 1);
                let d = base + (ix + 1) + row * iy;
                self.indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_cube_counts() {
        let data = BoxGeometry::cube(1.0, 1).build();
        assert_eq!(data.vertex_count(), 24);
        assert_eq!(data.triangle_count(), 12);
    }

    #[test]
    fn segments_scale_counts() {
        let data = BoxGeometry::cube(1.0, 2).build();
        // 6 faces * 3x3 vertices, 6 faces * 2x2 quads * 2 triangles
        assert_eq!(data.vertex_count(), 54);
        assert_eq!(data.triangle_count(), 48);
    }

    #[test]
    fn zero_segments_treated_as_one() {
        let data = BoxGeometry::cube(1.0, 0).build();
        assert_eq!(data.triangle_count(), 12);
    }

    #[test]
    fn vertices_lie_on_the_box_surface() {
        let g = BoxGeometry {
            width: 2.0,
            height: 4.0,
            depth: 6.0,
            width_segments: 3,
            height_segments: 2,
            depth_segments: 1,
        };
        for v in g.build().vertices {
            let [x, y, z] = v.position;
            assert!(x.abs() <= 1.0 + 1e-6 && y.abs() <= 2.0 + 1e-6 && z.abs() <= 3.0 + 1e-6);
            let on_face = (x.abs() - 1.0).abs() < 1e-6
                || (y.abs() - 2.0).abs() < 1e-6
                || (z.abs() - 3.0).abs() < 1e-6;
            assert!(on_face, "{:?} is inside the box", v.position);
        }
    }

    #[test]
    fn normals_point_outward() {
        for v in BoxGeometry::cube(1.0, 2).build().vertices {
            let dot: f32 = (0..3).map(|i| v.position[i] * v.normal[i]).sum();
            assert!(dot > 0.0, "normal {:?} at {:?}", v.normal, v.position);
        }
    }

    #[test]
    fn triangles_wind_counter_clockwise_from_outside() {
        let data = BoxGeometry::cube(1.0, 1).build();
        for tri in data.indices.chunks_exact(3) {
            let p = |i: u32| glam::Vec3::from(data.vertices[i as usize].position);
            let n = glam::Vec3::from(data.vertices[tri[0] as usize].normal);
            let face = (p(tri[1]) - p(tri[0])).cross(p(tri[2]) - p(tri[0]));
            assert!(face.dot(n) > 0.0);
        }
    }

    #[test]
    fn wireframe_dedupes_shared_edges() {
        let data = BoxGeometry::cube(1.0, 1).build();
        // Per face: 4 outer edges + 1 diagonal
        assert_eq!(data.wireframe_indices().len(), 6 * 5 * 2);
    }
}
