use bytemuck::{Pod, Zeroable};
use std::f32::consts::TAU;
use sweetcart_scene::Primitive;

/// Interleaved vertex layout shared by every mesh: position, uv, normal.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub normal: [f32; 3],
}

/// CPU-side mesh. An empty index list means the mesh draws non-indexed.
#[derive(Debug, Clone)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Number of elements one draw call covers.
    pub fn draw_count(&self) -> u32 {
        if self.indices.is_empty() {
            self.vertices.len() as u32
        } else {
            self.indices.len() as u32
        }
    }
}

/// Authored ground plane: a 2x2 quad on XZ, two triangles, normals up.
/// The one mesh whose vertex data is written out by hand.
#[rustfmt::skip]
const PLANE_VERTICES: [Vertex; 6] = [
    Vertex { position: [-1.0, 0.0, -1.0], uv: [0.0, 0.0], normal: [0.0, 1.0, 0.0] },
    Vertex { position: [ 1.0, 0.0, -1.0], uv: [1.0, 0.0], normal: [0.0, 1.0, 0.0] },
    Vertex { position: [ 1.0, 0.0,  1.0], uv: [1.0, 1.0], normal: [0.0, 1.0, 0.0] },
    Vertex { position: [ 1.0, 0.0,  1.0], uv: [1.0, 1.0], normal: [0.0, 1.0, 0.0] },
    Vertex { position: [-1.0, 0.0,  1.0], uv: [0.0, 1.0], normal: [0.0, 1.0, 0.0] },
    Vertex { position: [-1.0, 0.0, -1.0], uv: [0.0, 0.0], normal: [0.0, 1.0, 0.0] },
];

/// Build the vertex/index data for one primitive.
pub fn build_mesh(primitive: Primitive) -> MeshData {
    match primitive {
        Primitive::Plane => MeshData {
            vertices: PLANE_VERTICES.to_vec(),
            indices: Vec::new(),
        },
        Primitive::Cube => cube(),
        Primitive::Cone {
            radius,
            segments,
            height,
        } => cone(radius, segments, height),
        Primitive::Cylinder {
            radius,
            segments,
            height,
        } => cylinder(radius, segments, height),
        Primitive::Torus {
            ring_segments,
            tube_segments,
            ring_radius,
            tube_radius,
        } => torus(ring_segments, tube_segments, ring_radius, tube_radius),
        Primitive::Sphere {
            radius,
            slices,
            stacks,
        } => sphere(radius, slices, stacks),
    }
}

/// Unit cube centered at the origin, one uv quad per face.
fn cube() -> MeshData {
    let p = 0.5_f32;
    #[rustfmt::skip]
    let vertices = vec![
        // +Z face
        Vertex { position: [-p, -p,  p], uv: [0.0, 0.0], normal: [0.0, 0.0, 1.0] },
        Vertex { position: [ p, -p,  p], uv: [1.0, 0.0], normal: [0.0, 0.0, 1.0] },
        Vertex { position: [ p,  p,  p], uv: [1.0, 1.0], normal: [0.0, 0.0, 1.0] },
        Vertex { position: [-p,  p,  p], uv: [0.0, 1.0], normal: [0.0, 0.0, 1.0] },
        // -Z face
        Vertex { position: [ p, -p, -p], uv: [0.0, 0.0], normal: [0.0, 0.0, -1.0] },
        Vertex { position: [-p, -p, -p], uv: [1.0, 0.0], normal: [0.0, 0.0, -1.0] },
        Vertex { position: [-p,  p, -p], uv: [1.0, 1.0], normal: [0.0, 0.0, -1.0] },
        Vertex { position: [ p,  p, -p], uv: [0.0, 1.0], normal: [0.0, 0.0, -1.0] },
        // +X face
        Vertex { position: [ p, -p,  p], uv: [0.0, 0.0], normal: [1.0, 0.0, 0.0] },
        Vertex { position: [ p, -p, -p], uv: [1.0, 0.0], normal: [1.0, 0.0, 0.0] },
        Vertex { position: [ p,  p, -p], uv: [1.0, 1.0], normal: [1.0, 0.0, 0.0] },
        Vertex { position: [ p,  p,  p], uv: [0.0, 1.0], normal: [1.0, 0.0, 0.0] },
        // -X face
        Vertex { position: [-p, -p, -p], uv: [0.0, 0.0], normal: [-1.0, 0.0, 0.0] },
        Vertex { position: [-p, -p,  p], uv: [1.0, 0.0], normal: [-1.0, 0.0, 0.0] },
        Vertex { position: [-p,  p,  p], uv: [1.0, 1.0], normal: [-1.0, 0.0, 0.0] },
        Vertex { position: [-p,  p, -p], uv: [0.0, 1.0], normal: [-1.0, 0.0, 0.0] },
        // +Y face
        Vertex { position: [-p,  p,  p], uv: [0.0, 0.0], normal: [0.0, 1.0, 0.0] },
        Vertex { position: [ p,  p,  p], uv: [1.0, 0.0], normal: [0.0, 1.0, 0.0] },
        Vertex { position: [ p,  p, -p], uv: [1.0, 1.0], normal: [0.0, 1.0, 0.0] },
        Vertex { position: [-p,  p, -p], uv: [0.0, 1.0], normal: [0.0, 1.0, 0.0] },
        // -Y face
        Vertex { position: [-p, -p, -p], uv: [0.0, 0.0], normal: [0.0, -1.0, 0.0] },
        Vertex { position: [ p, -p, -p], uv: [1.0, 0.0], normal: [0.0, -1.0, 0.0] },
        Vertex { position: [ p, -p,  p], uv: [1.0, 1.0], normal: [0.0, -1.0, 0.0] },
        Vertex { position: [-p, -p,  p], uv: [0.0, 1.0], normal: [0.0, -1.0, 0.0] },
    ];
    #[rustfmt::skip]
    let indices: Vec<u32> = vec![
        0,1,2, 2,3,0,       // +Z
        4,5,6, 6,7,4,       // -Z
        8,9,10, 10,11,8,    // +X
        12,13,14, 14,15,12, // -X
        16,17,18, 18,19,16, // +Y
        20,21,22, 22,23,20, // -Y
    ];
    MeshData { vertices, indices }
}

/// Capped cone, base at -height/2, apex at +height/2.
fn cone(radius: f32, segments: u32, height: f32) -> MeshData {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let half = height / 2.0;
    // Slant normal is constant per slice: (h*cos, r, h*sin) normalized.
    let slant = (radius * radius + height * height).sqrt();

    // Side: base ring + one apex vertex per slice (so each slice keeps its
    // own slant normal).
    for i in 0..=segments {
        let t = i as f32 / segments as f32;
        let theta = t * TAU;
        let (sin, cos) = theta.sin_cos();
        let normal = [
            height * cos / slant,
            radius / slant,
            height * sin / slant,
        ];
        vertices.push(Vertex {
            position: [radius * cos, -half, radius * sin],
            uv: [t, 1.0],
            normal,
        });
        vertices.push(Vertex {
            position: [0.0, half, 0.0],
            uv: [t, 0.0],
            normal,
        });
    }
    for i in 0..segments {
        let base = 2 * i;
        indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    // Bottom cap.
    let center = vertices.len() as u32;
    vertices.push(Vertex {
        position: [0.0, -half, 0.0],
        uv: [0.5, 0.5],
        normal: [0.0, -1.0, 0.0],
    });
    for i in 0..=segments {
        let theta = i as f32 / segments as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        vertices.push(Vertex {
            position: [radius * cos, -half, radius * sin],
            uv: [(cos + 1.0) / 2.0, (sin + 1.0) / 2.0],
            normal: [0.0, -1.0, 0.0],
        });
    }
    for i in 0..segments {
        indices.extend_from_slice(&[center, center + 1 + i, center + 2 + i]);
    }

    MeshData { vertices, indices }
}

/// Capped cylinder centered at the origin.
fn cylinder(radius: f32, segments: u32, height: f32) -> MeshData {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let half = height / 2.0;

    // Side: two rings, outward normals.
    for i in 0..=segments {
        let t = i as f32 / segments as f32;
        let theta = t * TAU;
        let (sin, cos) = theta.sin_cos();
        let normal = [cos, 0.0, sin];
        vertices.push(Vertex {
            position: [radius * cos, -half, radius * sin],
            uv: [t, 1.0],
            normal,
        });
        vertices.push(Vertex {
            position: [radius * cos, half, radius * sin],
            uv: [t, 0.0],
            normal,
        });
    }
    for i in 0..segments {
        let base = 2 * i;
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 1, base + 3]);
    }

    // Top and bottom caps.
    for &(y, ny) in &[(half, 1.0), (-half, -1.0f32)] {
        let center = vertices.len() as u32;
        vertices.push(Vertex {
            position: [0.0, y, 0.0],
            uv: [0.5, 0.5],
            normal: [0.0, ny, 0.0],
        });
        for i in 0..=segments {
            let theta = i as f32 / segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            vertices.push(Vertex {
                position: [radius * cos, y, radius * sin],
                uv: [(cos + 1.0) / 2.0, (sin + 1.0) / 2.0],
                normal: [0.0, ny, 0.0],
            });
        }
        for i in 0..segments {
            indices.extend_from_slice(&[center, center + 1 + i, center + 2 + i]);
        }
    }

    MeshData { vertices, indices }
}

/// Torus in the XY plane around the Z axis. The donut is laid flat on the
/// table by a quarter turn about X.
fn torus(ring_segments: u32, tube_segments: u32, ring_radius: f32, tube_radius: f32) -> MeshData {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for i in 0..=ring_segments {
        let u = i as f32 / ring_segments as f32;
        let (ring_sin, ring_cos) = (u * TAU).sin_cos();
        for j in 0..=tube_segments {
            let v = j as f32 / tube_segments as f32;
            let (tube_sin, tube_cos) = (v * TAU).sin_cos();
            let r = ring_radius + tube_radius * tube_cos;
            vertices.push(Vertex {
                position: [r * ring_cos, r * ring_sin, tube_radius * tube_sin],
                uv: [u, v],
                normal: [tube_cos * ring_cos, tube_cos * ring_sin, tube_sin],
            });
        }
    }

    let stride = tube_segments + 1;
    for i in 0..ring_segments {
        for j in 0..tube_segments {
            let current = i * stride + j;
            let next = current + stride;
            indices.extend_from_slice(&[current, next, current + 1, current + 1, next, next + 1]);
        }
    }

    MeshData { vertices, indices }
}

/// UV sphere: latitude/longitude subdivision, equirectangular uv mapping.
fn sphere(radius: f32, slices: u32, stacks: u32) -> MeshData {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for stack in 0..=stacks {
        let v = stack as f32 / stacks as f32;
        let phi = v * std::f32::consts::PI;
        let y = phi.cos();
        let ring = phi.sin();
        for slice in 0..=slices {
            let u = slice as f32 / slices as f32;
            let (sin, cos) = (u * TAU).sin_cos();
            let normal = [ring * cos, y, ring * sin];
            vertices.push(Vertex {
                position: [normal[0] * radius, normal[1] * radius, normal[2] * radius],
                uv: [u, v],
                normal,
            });
        }
    }

    let stride = slices + 1;
    for stack in 0..stacks {
        for slice in 0..slices {
            let current = stack * stride + slice;
            let next = current + stride;
            indices.extend_from_slice(&[current, next, current + 1, current + 1, next, next + 1]);
        }
    }

    MeshData { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use sweetcart_scene::MeshId;

    fn normals_are_unit(mesh: &MeshData) {
        for v in &mesh.vertices {
            let n = Vec3::from_array(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-4, "normal {n:?}");
        }
    }

    fn indices_in_range(mesh: &MeshData) {
        for &i in &mesh.indices {
            assert!((i as usize) < mesh.vertices.len());
        }
    }

    #[test]
    fn plane_matches_authored_layout() {
        let plane = build_mesh(Primitive::Plane);
        assert_eq!(plane.vertices.len(), 6);
        assert!(plane.indices.is_empty());
        assert_eq!(plane.draw_count(), 6);

        let first = plane.vertices[0];
        assert_eq!(first.position, [-1.0, 0.0, -1.0]);
        assert_eq!(first.uv, [0.0, 0.0]);
        for v in &plane.vertices {
            assert_eq!(v.position[1], 0.0);
            assert_eq!(v.normal, [0.0, 1.0, 0.0]);
        }
    }

    #[test]
    fn cube_has_24_vertices_and_36_indices() {
        let cube = build_mesh(Primitive::Cube);
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);
        indices_in_range(&cube);
        normals_are_unit(&cube);
        for v in &cube.vertices {
            for c in v.position {
                assert_eq!(c.abs(), 0.5);
            }
        }
    }

    #[test]
    fn sphere_vertices_lie_on_the_radius() {
        let mesh = build_mesh(Primitive::Sphere {
            radius: 1.25,
            slices: 25,
            stacks: 25,
        });
        assert_eq!(mesh.vertices.len(), 26 * 26);
        assert_eq!(mesh.indices.len(), (25 * 25 * 6) as usize);
        indices_in_range(&mesh);
        normals_are_unit(&mesh);
        for v in &mesh.vertices {
            let p = Vec3::from_array(v.position);
            assert!((p.length() - 1.25).abs() < 1e-4);
        }
    }

    #[test]
    fn cone_spans_centered_height() {
        let mesh = build_mesh(Primitive::Cone {
            radius: 1.25,
            segments: 50,
            height: 1.25,
        });
        indices_in_range(&mesh);
        normals_are_unit(&mesh);
        let ys: Vec<f32> = mesh.vertices.iter().map(|v| v.position[1]).collect();
        let min = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        assert!((min + 0.625).abs() < 1e-5);
        assert!((max - 0.625).abs() < 1e-5);
    }

    #[test]
    fn cylinder_stays_inside_its_radius() {
        let mesh = build_mesh(Primitive::Cylinder {
            radius: 2.0,
            segments: 50,
            height: 0.5,
        });
        indices_in_range(&mesh);
        normals_are_unit(&mesh);
        for v in &mesh.vertices {
            let radial = (v.position[0].powi(2) + v.position[2].powi(2)).sqrt();
            assert!(radial <= 2.0 + 1e-4);
            assert!(v.position[1].abs() <= 0.25 + 1e-5);
        }
    }

    #[test]
    fn torus_ring_bounds() {
        let mesh = build_mesh(Primitive::Torus {
            ring_segments: 50,
            tube_segments: 50,
            ring_radius: 1.0,
            tube_radius: 0.5,
        });
        indices_in_range(&mesh);
        normals_are_unit(&mesh);
        for v in &mesh.vertices {
            // Distance from the Z axis stays within ring_radius +/- tube_radius,
            // and the tube never leaves the +/- tube_radius slab in Z.
            let radial = (v.position[0].powi(2) + v.position[1].powi(2)).sqrt();
            assert!((0.5 - 1e-4..=1.5 + 1e-4).contains(&radial));
            assert!(v.position[2].abs() <= 0.5 + 1e-4);
        }
    }

    #[test]
    fn every_scene_mesh_builds() {
        for mesh_id in MeshId::ALL {
            let mesh = build_mesh(mesh_id.primitive());
            assert!(!mesh.vertices.is_empty(), "{mesh_id:?}");
            assert!(mesh.draw_count() > 0, "{mesh_id:?}");
            indices_in_range(&mesh);
        }
    }
}
