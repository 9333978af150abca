use orbit_common::{EntityId, Transform};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of the scene that issued a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub(crate) struct SceneId(Uuid);

impl SceneId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SceneId {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a mesh owned by a [`crate::Scene`]. Only resolves in the scene
/// that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeshHandle {
    scene: SceneId,
    index: usize,
}

impl MeshHandle {
    pub(crate) fn new(scene: SceneId, index: usize) -> Self {
        Self { scene, index }
    }

    pub(crate) fn scene(self) -> SceneId {
        self.scene
    }

    /// Position of the mesh in the scene's mesh list; the GPU backend keeps a
    /// parallel list of buffers.
    pub fn index(self) -> usize {
        self.index
    }
}

/// Handle to a material owned by a [`crate::Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialHandle {
    scene: SceneId,
    index: usize,
}

impl MaterialHandle {
    pub(crate) fn new(scene: SceneId, index: usize) -> Self {
        Self { scene, index }
    }

    pub(crate) fn scene(self) -> SceneId {
        self.scene
    }

    pub fn index(self) -> usize {
        self.index
    }
}

/// A drawable object: one mesh, one material, one transform.
///
/// The transform is owned; mesh and material are shared through handles and
/// outlive the entity in the scene arena.
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    name: String,
    mesh: MeshHandle,
    material: MaterialHandle,
    transform: Transform,
}

impl Entity {
    /// New entity at the identity transform.
    pub fn new(name: impl Into<String>, mesh: MeshHandle, material: MaterialHandle) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            mesh,
            material,
            transform: Transform::default(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mesh(&self) -> MeshHandle {
        self.mesh
    }

    pub fn material(&self) -> MaterialHandle {
        self.material
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// World matrix in the layout the shader reads.
    ///
    /// WGSL `mat4x4<f32>` uniforms are column-major, matching glam, so this is
    /// the world matrix's column array with no transpose.
    pub fn draw_matrix(&self) -> [[f32; 4]; 4] {
        self.transform.matrix().to_cols_array_2d()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec3};

    fn handles(mesh: usize, material: usize) -> (MeshHandle, MaterialHandle) {
        let scene = SceneId::new();
        (
            MeshHandle::new(scene, mesh),
            MaterialHandle::new(scene, material),
        )
    }

    #[test]
    fn starts_at_identity() {
        let (mesh, material) = handles(0, 0);
        let e = Entity::new("e", mesh, material);
        assert_eq!(e.transform().position(), Vec3::ZERO);
        assert_eq!(e.transform().rotation(), Vec3::ZERO);
        assert_eq!(e.transform().scale(), Vec3::ONE);
        assert_eq!(e.draw_matrix(), Mat4::IDENTITY.to_cols_array_2d());
    }

    #[test]
    fn exposes_handles() {
        let (mesh, material) = handles(3, 1);
        let e = Entity::new("e", mesh, material);
        assert_eq!(e.mesh().index(), 3);
        assert_eq!(e.material().index(), 1);
        assert_eq!(e.name(), "e");
    }

    #[test]
    fn draw_matrix_follows_transform() {
        let (mesh, material) = handles(0, 0);
        let mut e = Entity::new("e", mesh, material);
        e.transform_mut().set_position(1.5, 0.0, 0.0);
        let m = e.draw_matrix();
        // Translation sits in the fourth column.
        assert_eq!(m[3], [1.5, 0.0, 0.0, 1.0]);
        assert_eq!(m, e.transform().matrix().to_cols_array_2d());
    }

    #[test]
    fn ids_are_distinct() {
        let (mesh, material) = handles(0, 0);
        let a = Entity::new("a", mesh, material);
        let b = Entity::new("b", mesh, material);
        assert_ne!(a.id(), b.id());
    }
}
