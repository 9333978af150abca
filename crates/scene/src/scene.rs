use crate::entity::{Entity, MaterialHandle, MeshHandle, SceneId};
use crate::light::DirectionalLight;
use crate::material::{Material, TextureError};
use crate::mesh::{Mesh, MeshError};
use orbit_common::{EntityId, Transform};

/// Errors from scene operations.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("unknown mesh handle {0:?}")]
    UnknownMesh(MeshHandle),
    #[error("unknown material handle {0:?}")]
    UnknownMaterial(MaterialHandle),
    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),
    #[error(transparent)]
    Mesh(#[from] MeshError),
    #[error(transparent)]
    Texture(#[from] TextureError),
}

/// Owns every mesh, material, entity and light in the demo.
///
/// Meshes and materials are append-only so handles stay valid for the life of
/// the scene. Entities keep insertion order, which is also draw order.
///
/// Handles carry the id of the scene that issued them, so a handle from one
/// scene never resolves in another. A clone keeps the id, and with it the
/// same assets.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    id: SceneId,
    meshes: Vec<Mesh>,
    materials: Vec<Material>,
    entities: Vec<Entity>,
    lights: Vec<DirectionalLight>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshHandle {
        let handle = MeshHandle::new(self.id, self.meshes.len());
        tracing::debug!(
            mesh = mesh.name(),
            vertices = mesh.vertex_count(),
            indices = mesh.index_count(),
            "added mesh"
        );
        self.meshes.push(mesh);
        handle
    }

    pub fn add_material(&mut self, material: Material) -> MaterialHandle {
        let handle = MaterialHandle::new(self.id, self.materials.len());
        tracing::debug!(material = material.name(), "added material");
        self.materials.push(material);
        handle
    }

    pub fn add_light(&mut self, light: DirectionalLight) {
        self.lights.push(light);
    }

    /// Create an entity drawing `mesh` with `material`. Both handles must come
    /// from this scene.
    pub fn spawn(
        &mut self,
        name: impl Into<String>,
        mesh: MeshHandle,
        material: MaterialHandle,
    ) -> Result<EntityId, SceneError> {
        if self.mesh(mesh).is_none() {
            return Err(SceneError::UnknownMesh(mesh));
        }
        if self.material(material).is_none() {
            return Err(SceneError::UnknownMaterial(material));
        }
        let entity = Entity::new(name, mesh, material);
        let id = entity.id();
        tracing::debug!(entity = %id.short(), name = entity.name(), "spawned entity");
        self.entities.push(entity);
        Ok(id)
    }

    /// Remove an entity. Its mesh and material stay in the scene.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let pos = self.entities.iter().position(|e| e.id() == id)?;
        Some(self.entities.remove(pos))
    }

    pub fn mesh(&self, handle: MeshHandle) -> Option<&Mesh> {
        if handle.scene() != self.id {
            return None;
        }
        self.meshes.get(handle.index())
    }

    pub fn material(&self, handle: MaterialHandle) -> Option<&Material> {
        if handle.scene() != self.id {
            return None;
        }
        self.materials.get(handle.index())
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn lights(&self) -> &[DirectionalLight] {
        &self.lights
    }

    /// Entities in draw order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id() == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id() == id)
    }

    /// Mutable transform of an entity, for animation.
    pub fn transform_mut(&mut self, id: EntityId) -> Result<&mut Transform, SceneError> {
        self.get_mut(id)
            .map(Entity::transform_mut)
            .ok_or(SceneError::UnknownEntity(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::ShaderProgram;
    use crate::mesh::Vertex;
    use glam::{Vec2, Vec3};

    fn tri_mesh() -> Mesh {
        Mesh::new(
            "tri",
            vec![
                Vertex::new(Vec3::Y, Vec3::Z, Vec2::ZERO),
                Vertex::new(Vec3::X, Vec3::Z, Vec2::ONE),
                Vertex::new(Vec3::NEG_X, Vec3::Z, Vec2::Y),
            ],
            vec![0, 1, 2],
        )
        .unwrap()
    }

    fn scene_with_assets() -> (Scene, MeshHandle, MaterialHandle) {
        let mut scene = Scene::new();
        let mesh = scene.add_mesh(tri_mesh());
        let material = scene.add_material(Material::new("base", ShaderProgram::lit()));
        (scene, mesh, material)
    }

    #[test]
    fn scene_starts_empty() {
        let scene = Scene::new();
        assert_eq!(scene.entity_count(), 0);
        assert!(scene.meshes().is_empty());
        assert!(scene.lights().is_empty());
    }

    #[test]
    fn spawn_and_despawn() {
        let (mut scene, mesh, material) = scene_with_assets();
        let id = scene.spawn("tri", mesh, material).unwrap();
        assert_eq!(scene.entity_count(), 1);
        assert_eq!(scene.get(id).unwrap().mesh(), mesh);

        let removed = scene.despawn(id).unwrap();
        assert_eq!(removed.id(), id);
        assert_eq!(scene.entity_count(), 0);
        // Shared assets outlive the entity.
        assert!(scene.mesh(mesh).is_some());
        assert!(scene.despawn(id).is_none());
    }

    #[test]
    fn spawn_rejects_unknown_handles() {
        let (mut scene, mesh, material) = scene_with_assets();
        let missing_mesh = MeshHandle::new(scene.id, 7);
        let err = scene.spawn("x", missing_mesh, material).unwrap_err();
        assert!(matches!(err, SceneError::UnknownMesh(h) if h == missing_mesh));
        let missing_material = MaterialHandle::new(scene.id, 2);
        let err = scene.spawn("x", mesh, missing_material).unwrap_err();
        assert!(matches!(err, SceneError::UnknownMaterial(h) if h == missing_material));
        assert_eq!(scene.entity_count(), 0);
    }

    #[test]
    fn handles_from_another_scene_are_rejected() {
        let (other, other_mesh, other_material) = scene_with_assets();
        let mut scene = Scene::new();
        for _ in 0..5 {
            scene.add_mesh(tri_mesh());
        }
        let mesh = scene.add_mesh(tri_mesh());
        let material = scene.add_material(Material::new("base", ShaderProgram::lit()));
        scene.add_material(Material::new("base", ShaderProgram::lit()));

        // In range by index, but issued by `other`.
        assert!(scene.mesh(other_mesh).is_none());
        assert!(scene.material(other_material).is_none());
        assert!(matches!(
            scene.spawn("x", other_mesh, material),
            Err(SceneError::UnknownMesh(h)) if h == other_mesh
        ));
        assert!(matches!(
            scene.spawn("x", mesh, other_material),
            Err(SceneError::UnknownMaterial(h)) if h == other_material
        ));
        assert_eq!(scene.entity_count(), 0);
        assert!(other.mesh(other_mesh).is_some());
    }

    #[test]
    fn cloned_scene_accepts_its_handles() {
        let (scene, mesh, material) = scene_with_assets();
        let mut copy = scene.clone();
        assert!(copy.spawn("x", mesh, material).is_ok());
    }

    #[test]
    fn entities_share_mesh_and_material() {
        let (mut scene, mesh, material) = scene_with_assets();
        let a = scene.spawn("a", mesh, material).unwrap();
        let b = scene.spawn("b", mesh, material).unwrap();
        assert_eq!(scene.get(a).unwrap().mesh(), scene.get(b).unwrap().mesh());
        assert_eq!(scene.meshes().len(), 1);
    }

    #[test]
    fn entities_keep_insertion_order() {
        let (mut scene, mesh, material) = scene_with_assets();
        let ids: Vec<EntityId> = (0..10)
            .map(|i| scene.spawn(format!("e{i}"), mesh, material).unwrap())
            .collect();
        let order: Vec<EntityId> = scene.entities().iter().map(Entity::id).collect();
        assert_eq!(order, ids);
    }

    #[test]
    fn transform_mut_moves_one_entity() {
        let (mut scene, mesh, material) = scene_with_assets();
        let a = scene.spawn("a", mesh, material).unwrap();
        let b = scene.spawn("b", mesh, material).unwrap();
        scene.transform_mut(a).unwrap().set_position(1.0, 2.0, 3.0);
        assert_eq!(
            scene.get(a).unwrap().transform().position(),
            Vec3::new(1.0, 2.0, 3.0)
        );
        assert_eq!(scene.get(b).unwrap().transform().position(), Vec3::ZERO);
    }

    #[test]
    fn transform_mut_unknown_entity() {
        let mut scene = Scene::new();
        let id = EntityId::new();
        assert!(matches!(
            scene.transform_mut(id),
            Err(SceneError::UnknownEntity(e)) if e == id
        ));
    }
}
