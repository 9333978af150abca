//! Hard-coded and procedural meshes for the demo.
//!
//! Flat shapes lie in the XY plane facing +Z. Solids are centered on the
//! origin and fit in a unit box unless noted.

use crate::mesh::{Mesh, MeshError, Vertex};
use glam::{Vec2, Vec3};
use std::f32::consts::{PI, TAU};

pub fn triangle() -> Result<Mesh, MeshError> {
    let n = Vec3::Z;
    let vertices = vec![
        Vertex::new(Vec3::new(0.0, 1.0, 0.0), n, Vec2::new(0.0, 0.0)),
        Vertex::new(Vec3::new(1.5, -1.0, 0.0), n, Vec2::new(1.0, 1.0)),
        Vertex::new(Vec3::new(-1.5, -1.0, 0.0), n, Vec2::new(0.0, 1.0)),
    ];
    Mesh::new("triangle", vertices, vec![0, 1, 2])
}

/// Eight-corner cube of half-extent 1; each corner's normal points out along
/// its diagonal.
pub fn corner_cube() -> Result<Mesh, MeshError> {
    #[rustfmt::skip]
    let corners = [
        (Vec3::new( 1.0,  1.0, -1.0), Vec2::new(1.0, 0.0)), // front top right
        (Vec3::new( 1.0, -1.0, -1.0), Vec2::new(1.0, 1.0)), // front bottom right
        (Vec3::new(-1.0, -1.0, -1.0), Vec2::new(0.0, 1.0)), // front bottom left
        (Vec3::new(-1.0,  1.0, -1.0), Vec2::new(0.0, 0.0)), // front top left
        (Vec3::new( 1.0,  1.0,  1.0), Vec2::new(0.0, 0.0)), // back top right
        (Vec3::new( 1.0, -1.0,  1.0), Vec2::new(0.0, 1.0)), // back bottom right
        (Vec3::new(-1.0, -1.0,  1.0), Vec2::new(1.0, 1.0)), // back bottom left
        (Vec3::new(-1.0,  1.0,  1.0), Vec2::new(1.0, 0.0)), // back top left
    ];
    let vertices = corners
        .iter()
        .map(|&(p, uv)| Vertex::new(p, p.normalize(), uv))
        .collect();
    #[rustfmt::skip]
    let indices = vec![
        0, 1, 2, 2, 3, 0, // front
        7, 6, 5, 5, 4, 7, // back
        5, 1, 0, 4, 5, 0, // right
        7, 3, 2, 6, 7, 2, // left
        4, 0, 3, 7, 4, 3, // top
        2, 1, 5, 2, 5, 6, // bottom
    ];
    Mesh::new("corner_cube", vertices, indices)
}

pub fn hexagon() -> Result<Mesh, MeshError> {
    let n = Vec3::Z;
    #[rustfmt::skip]
    let vertices = vec![
        Vertex::new(Vec3::new( 0.0,   0.0, 0.0), n, Vec2::new(0.0, 0.0)), // center
        Vertex::new(Vec3::new(-0.4,   0.6, 0.0), n, Vec2::new(1.0, 0.0)),
        Vertex::new(Vec3::new( 0.4,   0.6, 0.0), n, Vec2::new(1.0, 0.0)),
        Vertex::new(Vec3::new( 0.75,  0.0, 0.0), n, Vec2::new(1.0, 1.0)),
        Vertex::new(Vec3::new( 0.4,  -0.6, 0.0), n, Vec2::new(0.0, 1.0)),
        Vertex::new(Vec3::new(-0.4,  -0.6, 0.0), n, Vec2::new(0.0, 1.0)),
        Vertex::new(Vec3::new(-0.75,  0.0, 0.0), n, Vec2::new(1.0, 1.0)),
    ];
    let indices = vec![0, 1, 2, 0, 2, 3, 0, 3, 4, 0, 4, 5, 0, 5, 6, 0, 6, 1];
    Mesh::new("hexagon", vertices, indices)
}

/// Unit cube with per-face normals and a full texture on every face.
pub fn cube() -> Result<Mesh, MeshError> {
    let p = 0.5_f32;
    let faces: [(Vec3, Vec3, Vec3); 6] = [
        // (normal, u axis, v axis)
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    ];
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in faces {
        let base = vertices.len() as u32;
        let center = normal * p;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let position = center + u * (su * p) + v * (sv * p);
            let uv = Vec2::new((su + 1.0) * 0.5, (1.0 - sv) * 0.5);
            vertices.push(Vertex::new(position, normal, uv));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    Mesh::new("cube", vertices, indices)
}

/// UV sphere of radius 0.5.
pub fn sphere(segments: u32, rings: u32) -> Result<Mesh, MeshError> {
    let mut vertices = Vec::new();
    for ring in 0..=rings {
        let phi = PI * ring as f32 / rings as f32;
        let (ring_radius, y) = phi.sin_cos();
        for seg in 0..=segments {
            let theta = TAU * seg as f32 / segments as f32;
            let normal = Vec3::new(ring_radius * theta.cos(), y, ring_radius * theta.sin());
            let uv = Vec2::new(seg as f32 / segments as f32, ring as f32 / rings as f32);
            vertices.push(Vertex::new(normal * 0.5, normal, uv));
        }
    }
    Mesh::new("sphere", vertices, grid_indices(rings, segments))
}

/// Capped cylinder of radius 0.5 and height 1 along Y.
pub fn cylinder(segments: u32) -> Result<Mesh, MeshError> {
    let (r, h) = (0.5_f32, 0.5_f32);
    let mut vertices = Vec::new();
    for (row, y) in [-h, h].into_iter().enumerate() {
        for seg in 0..=segments {
            let theta = TAU * seg as f32 / segments as f32;
            let normal = Vec3::new(theta.cos(), 0.0, theta.sin());
            let uv = Vec2::new(seg as f32 / segments as f32, 1.0 - row as f32);
            vertices.push(Vertex::new(
                Vec3::new(normal.x * r, y, normal.z * r),
                normal,
                uv,
            ));
        }
    }
    let mut indices = grid_indices(1, segments);
    push_cap(&mut vertices, &mut indices, h, r, segments, true);
    push_cap(&mut vertices, &mut indices, -h, r, segments, false);
    Mesh::new("cylinder", vertices, indices)
}

/// Cone with a base of radius 0.5 at y = -0.5 and its apex at y = 0.5.
pub fn cone(segments: u32) -> Result<Mesh, MeshError> {
    let (r, h) = (0.5_f32, 0.5_f32);
    let mut vertices = Vec::new();
    for row in 0..2 {
        for seg in 0..=segments {
            let theta = TAU * seg as f32 / segments as f32;
            let (sin, cos) = theta.sin_cos();
            // Slant normal: outward by the height, up by the radius.
            let normal = Vec3::new(cos * 2.0 * h, r, sin * 2.0 * h).normalize();
            let position = if row == 0 {
                Vec3::new(cos * r, -h, sin * r)
            } else {
                Vec3::new(0.0, h, 0.0)
            };
            let uv = Vec2::new(seg as f32 / segments as f32, 1.0 - row as f32);
            vertices.push(Vertex::new(position, normal, uv));
        }
    }
    let mut indices = grid_indices(1, segments);
    push_cap(&mut vertices, &mut indices, -h, r, segments, false);
    Mesh::new("cone", vertices, indices)
}

/// Torus in the XZ plane with ring radius 0.35 and tube radius 0.15.
pub fn torus(segments: u32, sides: u32) -> Result<Mesh, MeshError> {
    let (major, minor) = (0.35_f32, 0.15_f32);
    let mut vertices = Vec::new();
    for seg in 0..=segments {
        let theta = TAU * seg as f32 / segments as f32;
        let radial = Vec3::new(theta.cos(), 0.0, theta.sin());
        let center = radial * major;
        for side in 0..=sides {
            let phi = TAU * side as f32 / sides as f32;
            let normal = radial * phi.cos() + Vec3::Y * phi.sin();
            let uv = Vec2::new(seg as f32 / segments as f32, side as f32 / sides as f32);
            vertices.push(Vertex::new(center + normal * minor, normal, uv));
        }
    }
    Mesh::new("torus", vertices, grid_indices(segments, sides))
}

/// Tube swept along a helix around Y: `turns` revolutions of radius 0.5 over
/// a height of 2, tube radius 0.1.
pub fn helix(turns: f32, steps: u32, sides: u32) -> Result<Mesh, MeshError> {
    let (radius, height, tube) = (0.5_f32, 2.0_f32, 0.1_f32);
    let sweep = TAU * turns;
    let mut vertices = Vec::new();
    for step in 0..=steps {
        let t = step as f32 / steps as f32;
        let theta = sweep * t;
        let (sin, cos) = theta.sin_cos();
        let center = Vec3::new(radius * cos, height * (t - 0.5), radius * sin);
        let tangent = Vec3::new(-radius * sin * sweep, height, radius * cos * sweep).normalize();
        // Points at the helix axis; always perpendicular to the tangent.
        let inward = Vec3::new(-cos, 0.0, -sin);
        let binormal = tangent.cross(inward);
        for side in 0..=sides {
            let phi = TAU * side as f32 / sides as f32;
            let normal = inward * phi.cos() + binormal * phi.sin();
            let uv = Vec2::new(t, side as f32 / sides as f32);
            vertices.push(Vertex::new(center + normal * tube, normal, uv));
        }
    }
    Mesh::new("helix", vertices, grid_indices(steps, sides))
}

/// Two triangles per cell of a `(rows + 1) x (cols + 1)` vertex grid laid out
/// row by row.
fn grid_indices(rows: u32, cols: u32) -> Vec<u32> {
    let mut indices = Vec::with_capacity((rows * cols * 6) as usize);
    for row in 0..rows {
        for col in 0..cols {
            let current = row * (cols + 1) + col;
            let next = current + cols + 1;
            indices.extend_from_slice(&[
                current,
                next,
                current + 1,
                current + 1,
                next,
                next + 1,
            ]);
        }
    }
    indices
}

/// Append a flat disc at height `y` as a triangle fan around a center vertex.
fn push_cap(
    vertices: &mut Vec<Vertex>,
    indices: &mut Vec<u32>,
    y: f32,
    radius: f32,
    segments: u32,
    up: bool,
) {
    let normal = if up { Vec3::Y } else { Vec3::NEG_Y };
    let center = vertices.len() as u32;
    vertices.push(Vertex::new(Vec3::new(0.0, y, 0.0), normal, Vec2::splat(0.5)));
    for seg in 0..=segments {
        let theta = TAU * seg as f32 / segments as f32;
        let (sin, cos) = theta.sin_cos();
        vertices.push(Vertex::new(
            Vec3::new(cos * radius, y, sin * radius),
            normal,
            Vec2::new(0.5 + cos * 0.5, 0.5 + sin * 0.5),
        ));
    }
    for seg in 0..segments {
        let a = center + 1 + seg;
        let b = a + 1;
        if up {
            indices.extend_from_slice(&[center, b, a]);
        } else {
            indices.extend_from_slice(&[center, a, b]);
        }
    }
}
