use crate::camera::FlyCamera;
use orbit_scene::Scene;
use std::fmt::Write;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the scene and camera and produces output. It never moves
/// entities; reading a stale transform only refreshes its cached matrix.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given scene and camera.
    fn render(&self, scene: &Scene, camera: &FlyCamera) -> Self::Output;
}

/// Text renderer for the CLI, logs and tests.
///
/// Lists every entity in draw order with its mesh, material, position and the
/// translation column of its draw matrix.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, camera: &FlyCamera) -> String {
        let mut out = String::new();
        let p = camera.position;
        // Writing into a String cannot fail.
        let _ = writeln!(out, "=== Frame ({} entities) ===", scene.entity_count());
        let _ = writeln!(
            out,
            "Camera: pos=({:.1}, {:.1}, {:.1}) yaw={:.1} pitch={:.1} fov={:.0}",
            p.x,
            p.y,
            p.z,
            camera.yaw.to_degrees(),
            camera.pitch.to_degrees(),
            camera.fov.to_degrees()
        );
        for (i, light) in scene.lights().iter().enumerate() {
            let d = light.direction;
            let _ = writeln!(out, "Light {i}: dir=({:.2}, {:.2}, {:.2})", d.x, d.y, d.z);
        }

        for entity in scene.entities() {
            let mesh = scene.mesh(entity.mesh()).map_or("?", |m| m.name());
            let material = scene.material(entity.material()).map_or("?", |m| m.name());
            let pos = entity.transform().position();
            let world = entity.draw_matrix()[3];
            let _ = writeln!(
                out,
                "  [{}] {:<12} mesh={:<12} material={:<6} pos=({:.2}, {:.2}, {:.2}) world=({:.2}, {:.2}, {:.2})",
                entity.id().short(),
                entity.name(),
                mesh,
                material,
                pos.x,
                pos.y,
                pos.z,
                world[0],
                world[1],
                world[2]
            );
        }

        tracing::trace!(
            entities = scene.entity_count(),
            bytes = out.len(),
            "rendered text frame"
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbit_scene::DemoScene;

    #[test]
    fn debug_renderer_empty_scene() {
        let scene = Scene::new();
        let output = DebugTextRenderer::new().render(&scene, &FlyCamera::default());
        assert!(output.contains("0 entities"));
        assert!(output.contains("Camera: pos=(0.0, 1.0, 9.0)"));
    }

    #[test]
    fn debug_renderer_lists_demo() {
        let mut demo = DemoScene::build().unwrap();
        demo.animate(0.0).unwrap();
        let output = DebugTextRenderer::new().render(demo.scene(), &FlyCamera::default());

        assert!(output.contains("9 entities"));
        assert!(output.contains("Light 1"));
        assert!(output.contains("material=crate"));
        assert!(output.contains("world=(0.00, 0.00, -2.00)"));
        // One line per entity after the header and the two light lines.
        assert_eq!(output.lines().count(), 2 + 2 + 9);
    }

    #[test]
    fn render_under_trace_subscriber() {
        let demo = DemoScene::build().unwrap();
        let camera = FlyCamera::default();
        let plain = DebugTextRenderer::new().render(demo.scene(), &camera);

        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .finish();
        let traced = tracing::subscriber::with_default(subscriber, || {
            DebugTextRenderer::new().render(demo.scene(), &camera)
        });
        assert_eq!(traced, plain);
    }

    #[test]
    fn render_refreshes_stale_matrices() {
        let mut demo = DemoScene::build().unwrap();
        demo.animate(2.0).unwrap();
        DebugTextRenderer::new().render(demo.scene(), &FlyCamera::default());
        assert!(
            demo.scene()
                .entities()
                .iter()
                .all(|e| !e.transform().is_dirty())
        );
    }
}
