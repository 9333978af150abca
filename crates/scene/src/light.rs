use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Directional light with its own ambient term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
    pub ambient: Vec4,
    pub diffuse: Vec4,
    /// Direction the light travels, not the direction towards it.
    pub direction: Vec3,
}

impl DirectionalLight {
    pub fn new(ambient: Vec4, diffuse: Vec4, direction: Vec3) -> Self {
        Self {
            ambient,
            diffuse,
            direction,
        }
    }

    /// Unit direction; a zero vector stays zero.
    pub fn direction_normalized(&self) -> Vec3 {
        self.direction.normalize_or_zero()
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            ambient: Vec4::new(0.1, 0.1, 0.1, 1.0),
            diffuse: Vec4::ONE,
            direction: Vec3::NEG_Y,
        }
    }
}
