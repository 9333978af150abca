//! The fixed demo scene: nine entities, three materials, two lights, and the
//! per-frame animation that moves them.

use crate::geometry;
use crate::light::DirectionalLight;
use crate::material::{Material, ShaderProgram, TextureData, TextureError};
use crate::scene::{Scene, SceneError};
use glam::{Vec3, Vec4};
use orbit_common::EntityId;

/// Background color the frame is cleared to.
pub const CLEAR_COLOR: [f64; 4] = [0.4, 0.6, 0.75, 1.0];

/// Tint of the `blue` material.
pub const BLUE: Vec4 = Vec4::new(0.15, 0.15, 1.0, 1.0);

const CRATE_TEXTURE_SIZE: u32 = 64;

/// Peak crate rotation in radians, per axis.
#[allow(clippy::approx_constant)]
pub const CRATE_WOBBLE: f32 = 3.14;

/// Ids of the demo entities, in draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoEntities {
    pub triangle: EntityId,
    pub corner_cube: EntityId,
    pub hexagon: EntityId,
    pub cone: EntityId,
    pub crate_box: EntityId,
    pub cylinder: EntityId,
    pub helix: EntityId,
    pub sphere: EntityId,
    pub torus: EntityId,
}

/// The demo scene plus the ids its animation drives.
#[derive(Debug, Clone)]
pub struct DemoScene {
    scene: Scene,
    entities: DemoEntities,
}

impl DemoScene {
    pub fn build() -> Result<Self, SceneError> {
        let mut scene = Scene::new();

        let triangle = scene.add_mesh(geometry::triangle()?);
        let corner_cube = scene.add_mesh(geometry::corner_cube()?);
        let hexagon = scene.add_mesh(geometry::hexagon()?);
        let cone = scene.add_mesh(geometry::cone(32)?);
        let cube = scene.add_mesh(geometry::cube()?);
        let cylinder = scene.add_mesh(geometry::cylinder(32)?);
        let helix = scene.add_mesh(geometry::helix(3.0, 192, 12)?);
        let sphere = scene.add_mesh(geometry::sphere(32, 16)?);
        let torus = scene.add_mesh(geometry::torus(48, 16)?);

        let base = scene.add_material(Material::new("base", ShaderProgram::lit()));
        let crate_mat = scene.add_material(
            Material::new("crate", ShaderProgram::lit()).with_texture(crate_texture()?),
        );
        let blue = scene.add_material(Material::new("blue", ShaderProgram::lit()).with_color(BLUE));

        scene.add_light(DirectionalLight::new(
            Vec4::new(0.1, 0.1, 0.1, 1.0),
            Vec4::new(1.0, 1.0, 0.75, 1.0),
            Vec3::new(1.0, -1.0, 0.0),
        ));
        scene.add_light(DirectionalLight::new(
            Vec4::new(0.0, 0.0, 0.0, 1.0),
            Vec4::new(1.0, 0.0, 0.0, 1.0),
            Vec3::new(-1.0, 1.0, 0.0),
        ));

        let entities = DemoEntities {
            triangle: scene.spawn("triangle", triangle, base)?,
            corner_cube: scene.spawn("corner cube", corner_cube, base)?,
            hexagon: scene.spawn("hexagon", hexagon, base)?,
            cone: scene.spawn("cone", cone, base)?,
            crate_box: scene.spawn("crate", cube, crate_mat)?,
            cylinder: scene.spawn("cylinder", cylinder, base)?,
            helix: scene.spawn("helix", helix, blue)?,
            sphere: scene.spawn("sphere", sphere, base)?,
            torus: scene.spawn("torus", torus, blue)?,
        };
        scene
            .transform_mut(entities.triangle)?
            .set_position(1.5, 0.0, 0.0);

        tracing::info!(
            entities = scene.entity_count(),
            meshes = scene.meshes().len(),
            materials = scene.materials().len(),
            "demo scene built"
        );
        Ok(Self { scene, entities })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn entities(&self) -> &DemoEntities {
        &self.entities
    }

    /// Pose every entity for `total` seconds since start.
    pub fn animate(&mut self, total: f32) -> Result<(), SceneError> {
        let ids = self.entities;
        let scene = &mut self.scene;
        let (sin, cos) = total.sin_cos();

        let t = scene.transform_mut(ids.triangle)?;
        t.set_position(sin, 0.0, 0.0);
        t.set_scale(sin.abs(), 1.0, 1.0);

        scene.transform_mut(ids.corner_cube)?.set_position(0.0, cos, sin);
        scene.transform_mut(ids.hexagon)?.set_position(0.0, 0.0, sin);

        // Orbit while rolling.
        let t = scene.transform_mut(ids.cone)?;
        t.set_position(cos, sin, 0.0);
        t.set_rotation(0.0, 0.0, total);

        let wobble = sin * CRATE_WOBBLE;
        let t = scene.transform_mut(ids.crate_box)?;
        t.set_position(0.0, sin, -2.0);
        t.set_rotation(wobble, wobble, wobble);

        scene.transform_mut(ids.cylinder)?.set_position(-2.0, 0.0, 0.0);
        scene.transform_mut(ids.helix)?.set_position(-4.0, 0.0, 0.0);
        scene.transform_mut(ids.sphere)?.set_position(4.0, 0.0, 0.0);

        let t = scene.transform_mut(ids.torus)?;
        t.set_position(4.0, 0.0, 0.0);
        t.set_rotation(total * 3.0, 0.0, total * 3.0);
        t.set_scale(2.0, 2.0, 2.0);

        Ok(())
    }
}

/// Wooden crate: planks with a dark frame and a diagonal brace.
pub fn crate_texture() -> Result<TextureData, TextureError> {
    let size = CRATE_TEXTURE_SIZE;
    let border = size / 10;
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let frame = x < border || y < border || x >= size - border || y >= size - border;
            let brace = x.abs_diff(y) < border / 2 + 1;
            let seam = (y % (size / 4)) == 0;
            // Cheap grain: stripes that drift with x.
            let grain = ((x * 7 + y * 3) % 11) as u8;
            let [r, g, b] = if frame || brace {
                [96, 60, 28]
            } else if seam {
                [110, 72, 36]
            } else {
                [168 + grain, 118 + grain, 62 + grain / 2]
            };
            pixels.extend_from_slice(&[r, g, b, 255]);
        }
    }
    TextureData::from_rgba8(size, size, pixels)
}
