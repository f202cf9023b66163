use std::f32::consts::PI;

use bytemuck::{Pod, Zeroable};

/// Interleaved vertex shared by every program.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    /// Texture coordinates with the origin at the top-left.
    pub uv: [f32; 2],
}

impl Vertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Indexed triangle list in object space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl Geometry {
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Axis-aligned box centered at the origin, one quad per face.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let (hx, hy, hz) = (width * 0.5, height * 0.5, depth * 0.5);
        // (normal, u axis, v axis) per face; v runs downward in texture space.
        let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, -1.0, 0.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, -1.0, 0.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, -1.0, 0.0]),
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, -1.0, 0.0]),
        ];
        let half = [hx, hy, hz];
        let scale = |v: [f32; 3], s: f32| [v[0] * half[0] * s, v[1] * half[1] * s, v[2] * half[2] * s];

        let mut out = Geometry::default();
        for (n, u, v) in faces {
            let base = out.vertices.len() as u16;
            let center = scale(n, 1.0);
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let du = scale(u, su);
                let dv = scale(v, sv);
                out.vertices.push(Vertex {
                    position: [
                        center[0] + du[0] + dv[0],
                        center[1] + du[1] + dv[1],
                        center[2] + du[2] + dv[2],
                    ],
                    normal: n,
                    uv: [(su + 1.0) * 0.5, (sv + 1.0) * 0.5],
                });
            }
            // u x v points against the normal, so wind 0-2-1 for CCW from outside.
            out.indices.extend_from_slice(&[base, base + 2, base + 1, base, base + 3, base + 2]);
        }
        out
    }

    /// Plane in the XY plane facing +Z.
    pub fn plane(width: f32, height: f32) -> Self {
        let (hx, hy) = (width * 0.5, height * 0.5);
        let corner = |x: f32, y: f32, u: f32, v: f32| Vertex {
            position: [x, y, 0.0],
            normal: [0.0, 0.0, 1.0],
            uv: [u, v],
        };
        Geometry {
            vertices: vec![
                corner(-hx, hy, 0.0, 0.0),
                corner(hx, hy, 1.0, 0.0),
                corner(hx, -hy, 1.0, 1.0),
                corner(-hx, -hy, 0.0, 1.0),
            ],
            indices: vec![0, 3, 2, 0, 2, 1],
        }
    }

    /// 2x2 plane that covers clip space under the full-screen camera.
    pub fn fullscreen_quad() -> Self {
        Self::plane(2.0, 2.0)
    }

    /// UV sphere centered at the origin.
    pub fn sphere(radius: f32, width_segments: u16, height_segments: u16) -> Self {
        let ws = width_segments.max(3);
        let hs = height_segments.max(2);
        let mut out = Geometry::default();

        for iy in 0..=hs {
            let v = iy as f32 / hs as f32;
            let phi = v * PI;
            for ix in 0..=ws {
                let u = ix as f32 / ws as f32;
                let theta = u * 2.0 * PI;
                let n = [-theta.cos() * phi.sin(), phi.cos(), theta.sin() * phi.sin()];
                out.vertices.push(Vertex {
                    position: [n[0] * radius, n[1] * radius, n[2] * radius],
                    normal: n,
                    uv: [u, v],
                });
            }
        }

        let row = ws + 1;
        for iy in 0..hs {
            for ix in 0..ws {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;
                if iy != 0 {
                    out.indices.extend_from_slice(&[a, b, d]);
                }
                if iy != hs - 1 {
                    out.indices.extend_from_slice(&[b, c, d]);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
    }

    #[test]
    fn cuboid_has_four_vertices_per_face() {
        let g = Geometry::cuboid(1.0, 1.0, 1.0);
        assert_eq!(g.vertices.len(), 24);
        assert_eq!(g.index_count(), 36);
        for v in &g.vertices {
            for c in v.position {
                assert!((c.abs() - 0.5).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn cuboid_winding_faces_outward() {
        let g = Geometry::cuboid(2.0, 2.0, 2.0);
        for tri in g.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| glam::Vec3::from(g.vertices[i as usize].position));
            let n = glam::Vec3::from(g.vertices[tri[0] as usize].normal);
            assert!((b - a).cross(c - a).dot(n) > 0.0);
        }
    }

    #[test]
    fn fullscreen_quad_maps_top_left_to_uv_origin() {
        let q = Geometry::fullscreen_quad();
        let top_left = q.vertices.iter().find(|v| v.position[0] < 0.0 && v.position[1] > 0.0);
        assert_eq!(top_left.map(|v| v.uv), Some([0.0, 0.0]));
        assert_eq!(q.index_count(), 6);
    }

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let s = Geometry::sphere(0.25, 16, 12);
        assert_eq!(s.vertices.len(), 17 * 13);
        for v in &s.vertices {
            let len = glam::Vec3::from(v.position).length();
            assert!((len - 0.25).abs() < 1e-5);
        }
        assert!(s.indices.iter().all(|&i| (i as usize) < s.vertices.len()));
    }
}
