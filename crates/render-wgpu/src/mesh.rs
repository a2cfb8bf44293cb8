//! Procedural meshes for the demo scene.
//!
//! The teapot is built from a lathed body/lid profile plus swept tubes for
//! the handle and spout, so the repository carries no binary mesh assets
//! and the geometry stays unit-testable.

use bytemuck::{Pod, Zeroable};
use defocus_common::{Aabb, BoundingSphere};
use glam::{Vec2, Vec3};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Indexed triangle mesh.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().map(|v| Vec3::from(v.position)))
    }

    /// Bounding sphere used for cursor picking. The radius is half the
    /// extents' length, a tighter fit than the circumscribed sphere.
    pub fn bounding_sphere(&self) -> BoundingSphere {
        let aabb = self.aabb();
        BoundingSphere::new(aabb.center(), 0.5 * aabb.extents().length())
    }

    /// Append another mesh, offsetting its indices.
    pub fn merge(&mut self, other: MeshData) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Recompute smooth per-vertex normals from the triangle faces.
    pub fn compute_normals(&mut self) {
        let mut accum = vec![Vec3::ZERO; self.vertices.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let pa = Vec3::from(self.vertices[a].position);
            let pb = Vec3::from(self.vertices[b].position);
            let pc = Vec3::from(self.vertices[c].position);
            // Area-weighted face normal.
            let face = (pb - pa).cross(pc - pa);
            accum[a] += face;
            accum[b] += face;
            accum[c] += face;
        }
        for (vertex, n) in self.vertices.iter_mut().zip(accum) {
            vertex.normal = n.normalize_or(Vec3::Y).into();
        }
    }
}

/// Revolve a profile polyline (radius, height) around the Y axis.
/// The seam column is duplicated so texture coordinates stay continuous.
pub fn lathe(profile: &[Vec2], segments: u32) -> MeshData {
    let rings = profile.len() as u32;
    let cols = segments + 1;
    let mut mesh = MeshData::default();

    for (i, p) in profile.iter().enumerate() {
        for j in 0..cols {
            let theta = j as f32 / segments as f32 * std::f32::consts::TAU;
            mesh.vertices.push(Vertex {
                position: [p.x * theta.cos(), p.y, p.x * theta.sin()],
                normal: [0.0; 3],
                uv: [
                    j as f32 / segments as f32,
                    i as f32 / (rings - 1).max(1) as f32,
                ],
            });
        }
    }
    for i in 0..rings - 1 {
        for j in 0..segments {
            let a = i * cols + j;
            let b = a + 1;
            let c = a + cols;
            let d = c + 1;
            mesh.indices.extend_from_slice(&[a, c, b, b, c, d]);
        }
    }
    mesh
}

/// Sweep a circular tube along a polyline path with per-point radii.
pub fn sweep_tube(path: &[Vec3], radii: &[f32], ring_segments: u32) -> MeshData {
    assert_eq!(path.len(), radii.len());
    let rings = path.len() as u32;
    let cols = ring_segments + 1;
    let mut mesh = MeshData::default();

    for (i, (&center, &radius)) in path.iter().zip(radii).enumerate() {
        // Tangent from neighboring path points.
        let tangent = if i == 0 {
            path[1] - path[0]
        } else if i as u32 == rings - 1 {
            path[i] - path[i - 1]
        } else {
            path[i + 1] - path[i - 1]
        }
        .normalize_or(Vec3::X);
        // Frame perpendicular to the tangent. The paths used here never run
        // parallel to Z, so Z is a safe reference.
        let side = tangent.cross(Vec3::Z).normalize_or(Vec3::Y);
        let up = side.cross(tangent);

        for j in 0..cols {
            let phi = j as f32 / ring_segments as f32 * std::f32::consts::TAU;
            let offset = (side * phi.cos() + up * phi.sin()) * radius;
            mesh.vertices.push(Vertex {
                position: (center + offset).into(),
                normal: [0.0; 3],
                uv: [
                    j as f32 / ring_segments as f32,
                    i as f32 / (rings - 1).max(1) as f32,
                ],
            });
        }
    }
    for i in 0..rings - 1 {
        for j in 0..ring_segments {
            let a = i * cols + j;
            let b = a + 1;
            let c = a + cols;
            let d = c + 1;
            mesh.indices.extend_from_slice(&[a, c, b, b, c, d]);
        }
    }
    mesh
}

/// UV sphere centered at the origin.
pub fn uv_sphere(radius: f32, subdivisions: u32) -> MeshData {
    let stacks = subdivisions.max(3);
    let slices = subdivisions.max(3);
    let mut mesh = MeshData::default();

    for i in 0..=stacks {
        let v = i as f32 / stacks as f32;
        let theta = v * std::f32::consts::PI;
        for j in 0..=slices {
            let u = j as f32 / slices as f32;
            let phi = u * std::f32::consts::TAU;
            let dir = Vec3::new(
                theta.sin() * phi.cos(),
                theta.cos(),
                theta.sin() * phi.sin(),
            );
            mesh.vertices.push(Vertex {
                position: (dir * radius).into(),
                normal: dir.into(),
                uv: [u, v],
            });
        }
    }
    let cols = slices + 1;
    for i in 0..stacks {
        for j in 0..slices {
            let a = i * cols + j;
            let b = a + 1;
            let c = a + cols;
            let d = c + 1;
            mesh.indices.extend_from_slice(&[a, c, b, b, c, d]);
        }
    }
    mesh
}

/// Teapot silhouette: body, rim and lid with knob, revolved around Y.
const TEAPOT_PROFILE: [[f32; 2]; 16] = [
    [0.00, 0.00],
    [0.45, 0.00],
    [0.80, 0.12],
    [1.00, 0.45],
    [1.05, 0.75],
    [0.95, 1.05],
    [0.75, 1.25],
    [0.68, 1.32],
    [0.70, 1.38],
    [0.60, 1.40],
    [0.40, 1.46],
    [0.22, 1.52],
    [0.12, 1.62],
    [0.16, 1.70],
    [0.08, 1.76],
    [0.00, 1.80],
];

/// Procedural teapot: lathed body plus swept handle and spout.
pub fn teapot(segments: u32) -> MeshData {
    let profile: Vec<Vec2> = TEAPOT_PROFILE.iter().map(|p| Vec2::from(*p)).collect();
    let mut mesh = lathe(&profile, segments);

    // Handle: an arc in the XY plane on the −X side of the body.
    let handle_center = Vec2::new(-0.95, 0.85);
    let handle_radius = 0.45;
    let steps = 12;
    let mut handle_path = Vec::with_capacity(steps + 1);
    for i in 0..=steps {
        let angle = (60.0 + 240.0 * i as f32 / steps as f32).to_radians();
        handle_path.push(Vec3::new(
            handle_center.x + handle_radius * angle.cos(),
            handle_center.y + handle_radius * angle.sin(),
            0.0,
        ));
    }
    let handle_radii = vec![0.07; handle_path.len()];
    mesh.merge(sweep_tube(&handle_path, &handle_radii, segments.min(12)));

    // Spout: a tapering curve rising from the body on the +X side.
    let spout_path = [
        Vec3::new(0.85, 0.55, 0.0),
        Vec3::new(1.15, 0.70, 0.0),
        Vec3::new(1.40, 0.95, 0.0),
        Vec3::new(1.55, 1.12, 0.0),
        Vec3::new(1.70, 1.25, 0.0),
    ];
    let spout_radii = [0.22, 0.18, 0.13, 0.10, 0.08];
    mesh.merge(sweep_tube(&spout_path, &spout_radii, segments.min(12)));

    mesh.compute_normals();
    mesh
}

/// Unit-style wire sphere: three great circles as a line list, baked at
/// the given center and radius. Used for the picking-bounds overlay.
pub fn wire_sphere(center: Vec3, radius: f32, segments: u32) -> Vec<[f32; 3]> {
    let mut lines = Vec::with_capacity(segments as usize * 6);
    let mut push_ring = |f: &dyn Fn(f32) -> Vec3| {
        for i in 0..segments {
            let a = i as f32 / segments as f32 * std::f32::consts::TAU;
            let b = (i + 1) as f32 / segments as f32 * std::f32::consts::TAU;
            lines.push((center + f(a) * radius).into());
            lines.push((center + f(b) * radius).into());
        }
    };
    push_ring(&|t| Vec3::new(t.cos(), t.sin(), 0.0));
    push_ring(&|t| Vec3::new(t.cos(), 0.0, t.sin()));
    push_ring(&|t| Vec3::new(0.0, t.cos(), t.sin()));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lathe_produces_closed_grid() {
        let profile = [Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)];
        let mesh = lathe(&profile, 8);
        assert_eq!(mesh.vertices.len(), 2 * 9);
        assert_eq!(mesh.indices.len(), 8 * 6);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn teapot_is_well_formed() {
        let mesh = teapot(24);
        assert!(!mesh.vertices.is_empty());
        assert_eq!(mesh.indices.len() % 3, 0);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn teapot_normals_are_unit_length() {
        let mesh = teapot(16);
        for v in &mesh.vertices {
            let len = Vec3::from(v.normal).length();
            assert!((len - 1.0).abs() < 1e-3, "normal length {len}");
        }
    }

    #[test]
    fn teapot_bounds_are_plausible() {
        let mesh = teapot(24);
        let sphere = mesh.bounding_sphere();
        assert!(sphere.radius > 0.5 && sphere.radius < 3.0);
        // The handle and spout pull the center off the Y axis a little,
        // but it stays near the pot.
        assert!(sphere.center.length() < 2.0);
    }

    #[test]
    fn sphere_vertices_lie_on_the_sphere() {
        let mesh = uv_sphere(50.0, 12);
        for v in &mesh.vertices {
            let r = Vec3::from(v.position).length();
            assert!((r - 50.0).abs() < 1e-3);
        }
    }

    #[test]
    fn wire_sphere_is_a_line_list() {
        let lines = wire_sphere(Vec3::ZERO, 1.0, 16);
        assert_eq!(lines.len(), 16 * 2 * 3);
        for p in &lines {
            assert!((Vec3::from(*p).length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn merge_offsets_indices() {
        let profile = [Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)];
        let mut a = lathe(&profile, 4);
        let base = a.vertices.len() as u32;
        let b = lathe(&profile, 4);
        a.merge(b.clone());
        assert_eq!(a.indices[b.indices.len()], b.indices[0] + base);
    }
}
