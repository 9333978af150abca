use glam::{Mat4, Vec3};

/// Fly camera with position, yaw, pitch, and projection parameters.
///
/// Right-handed, Y up. Yaw 0 looks down +X; the default yaw of -90° looks down
/// -Z at the demo row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlyCamera {
    pub position: Vec3,
    /// Radians around world up.
    pub yaw: f32,
    /// Radians above the horizon, kept within ±89°.
    pub pitch: f32,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Units per second.
    pub speed: f32,
    /// Radians per pixel of mouse motion.
    pub sensitivity: f32,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.0, 9.0),
            yaw: -90.0_f32.to_radians(),
            pitch: -5.0_f32.to_radians(),
            fov: 60.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
            speed: 5.0,
            sensitivity: 0.005,
        }
    }
}

impl FlyCamera {
    /// Unit view direction from yaw and pitch.
    pub fn forward(&self) -> Vec3 {
        let (yaw_sin, yaw_cos) = self.yaw.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.sin_cos();
        Vec3::new(yaw_cos * pitch_cos, pitch_sin, yaw_sin * pitch_cos).normalize()
    }

    /// Unit strafe direction. Always horizontal, so strafing never climbs.
    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize()
    }

    /// Move `speed * dt` along `direction`.
    fn step(&mut self, direction: Vec3, dt: f32) {
        self.position += direction * self.speed * dt;
    }

    pub fn move_forward(&mut self, dt: f32) {
        self.step(self.forward(), dt);
    }

    pub fn move_backward(&mut self, dt: f32) {
        self.step(-self.forward(), dt);
    }

    pub fn move_left(&mut self, dt: f32) {
        self.step(-self.right(), dt);
    }

    pub fn move_right(&mut self, dt: f32) {
        self.step(self.right(), dt);
    }

    /// Rise along world up, whatever the pitch.
    pub fn move_up(&mut self, dt: f32) {
        self.step(Vec3::Y, dt);
    }

    pub fn move_down(&mut self, dt: f32) {
        self.step(Vec3::NEG_Y, dt);
    }

    /// Turn by a mouse delta in pixels. Pitch stops short of straight up/down.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        let limit = 89.0_f32.to_radians();
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch - dy * self.sensitivity).clamp(-limit, limit);
    }

    /// Match the projection to a new surface size. Zero heights are treated
    /// as one pixel.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    /// World to view space, right-handed, looking along [`Self::forward`].
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), Vec3::Y)
    }

    /// View to clip space with wgpu's 0..1 depth range.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// `projection * view`, for transforming world points straight to clip
    /// space.
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}
