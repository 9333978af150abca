use glam::{Vec2, Vec3};

/// A single mesh vertex: position, normal, texture coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// Errors from mesh construction.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("mesh `{name}` has no vertices")]
    NoVertices { name: String },
    #[error("mesh `{name}` has {count} indices, not a multiple of 3")]
    PartialTriangle { name: String, count: usize },
    #[error("mesh `{name}` index {index} at position {at} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        name: String,
        index: u32,
        at: usize,
        vertex_count: usize,
    },
}

/// Immutable triangle-list geometry.
///
/// Validated once on construction; the renderer uploads it to a GPU
/// vertex/index buffer pair and never touches it again.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    name: String,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl Mesh {
    pub fn new(
        name: impl Into<String>,
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
    ) -> Result<Self, MeshError> {
        let name = name.into();
        if vertices.is_empty() {
            return Err(MeshError::NoVertices { name });
        }
        if indices.len() % 3 != 0 {
            return Err(MeshError::PartialTriangle {
                name,
                count: indices.len(),
            });
        }
        if let Some((at, &index)) = indices
            .iter()
            .enumerate()
            .find(|&(_, &i)| i as usize >= vertices.len())
        {
            return Err(MeshError::IndexOutOfRange {
                name,
                index,
                at,
                vertex_count: vertices.len(),
            });
        }
        Ok(Self {
            name,
            vertices,
            indices,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of indices submitted per draw.
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Axis-aligned bounds of the vertex positions as (min, max).
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.vertices.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(min, max), v| (min.min(v.position), max.max(v.position)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri() -> Vec<Vertex> {
        vec![
            Vertex::new(Vec3::new(0.0, 1.0, 0.0), Vec3::Z, Vec2::ZERO),
            Vertex::new(Vec3::new(1.0, -1.0, 0.0), Vec3::Z, Vec2::ONE),
            Vertex::new(Vec3::new(-1.0, -1.0, 0.0), Vec3::Z, Vec2::Y),
        ]
    }

    #[test]
    fn valid_mesh() {
        let mesh = Mesh::new("tri", tri(), vec![0, 1, 2]).unwrap();
        assert_eq!(mesh.name(), "tri");
        assert_eq!(mesh.index_count(), 3);
        assert_eq!(mesh.vertex_count(), 3);
    }

    #[test]
    fn rejects_empty_vertices() {
        let err = Mesh::new("empty", Vec::new(), Vec::new()).unwrap_err();
        assert!(matches!(err, MeshError::NoVertices { .. }));
    }

    #[test]
    fn rejects_partial_triangle() {
        let err = Mesh::new("tri", tri(), vec![0, 1]).unwrap_err();
        assert_eq!(
            err,
            MeshError::PartialTriangle {
                name: "tri".into(),
                count: 2
            }
        );
    }

    #[test]
    fn rejects_out_of_range_index() {
        let err = Mesh::new("tri", tri(), vec![0, 1, 3]).unwrap_err();
        assert_eq!(
            err,
            MeshError::IndexOutOfRange {
                name: "tri".into(),
                index: 3,
                at: 2,
                vertex_count: 3,
            }
        );
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn bounds_cover_all_vertices() {
        let mesh = Mesh::new("tri", tri(), vec![0, 1, 2]).unwrap();
        let (min, max) = mesh.bounds();
        assert_eq!(min, Vec3::new(-1.0, -1.0, 0.0));
        assert_eq!(max, Vec3::new(1.0, 1.0, 0.0));
    }
}
