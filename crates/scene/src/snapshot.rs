use crate::light::DirectionalLight;
use crate::scene::Scene;
use glam::Vec3;
use orbit_common::EntityId;
use serde::{Deserialize, Serialize};

/// Plain-data view of one entity at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub name: String,
    pub mesh: String,
    pub material: String,
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
    pub draw_matrix: [[f32; 4]; 4],
}

/// Plain-data view of the whole scene, for dumps and inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub time: f32,
    pub entities: Vec<EntitySnapshot>,
    pub lights: Vec<DirectionalLight>,
}

impl SceneSnapshot {
    /// Capture the scene as posed at `time`. Reads each entity's matrix, so
    /// stale transforms are recomputed as a side effect.
    pub fn capture(scene: &Scene, time: f32) -> Self {
        let entities = scene
            .entities()
            .iter()
            .map(|e| {
                let t = e.transform();
                EntitySnapshot {
                    id: e.id(),
                    name: e.name().to_string(),
                    mesh: scene
                        .mesh(e.mesh())
                        .map(|m| m.name().to_string())
                        .unwrap_or_default(),
                    material: scene
                        .material(e.material())
                        .map(|m| m.name().to_string())
                        .unwrap_or_default(),
                    position: t.position(),
                    rotation: t.rotation(),
                    scale: t.scale(),
                    draw_matrix: e.draw_matrix(),
                }
            })
            .collect();
        Self {
            time,
            entities,
            lights: scene.lights().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::DemoScene;

    #[test]
    fn capture_demo() {
        let mut demo = DemoScene::build().unwrap();
        demo.animate(0.0).unwrap();
        let snap = SceneSnapshot::capture(demo.scene(), 0.0);
        assert_eq!(snap.entities.len(), 9);
        assert_eq!(snap.lights.len(), 2);

        let crate_box = snap
            .entities
            .iter()
            .find(|e| e.id == demo.entities().crate_box)
            .unwrap();
        assert_eq!(crate_box.mesh, "cube");
        assert_eq!(crate_box.material, "crate");
        assert_eq!(crate_box.draw_matrix[3], [0.0, 0.0, -2.0, 1.0]);
    }

    #[test]
    fn capture_refreshes_matrices() {
        let mut demo = DemoScene::build().unwrap();
        demo.animate(0.5).unwrap();
        SceneSnapshot::capture(demo.scene(), 0.5);
        assert!(
            demo.scene()
                .entities()
                .iter()
                .all(|e| !e.transform().is_dirty())
        );
    }
}
