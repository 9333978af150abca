use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::cell::Cell;

/// Spatial transform: position, Euler rotation, scale, plus a lazily
/// recomputed world matrix.
///
/// Setters only record the new value and mark the cache dirty. The matrix is
/// rebuilt on the next [`Transform::matrix`] call and reused until another
/// setter runs. The cache lives in `Cell`s so reading through `&self` works;
/// this also makes `Transform` `!Sync`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transform {
    position: Vec3,
    /// Euler angles in radians: x = pitch, y = yaw, z = roll.
    rotation: Vec3,
    scale: Vec3,
    #[serde(skip)]
    matrix: Cell<Mat4>,
    #[serde(skip, default = "stale")]
    dirty: Cell<bool>,
}

fn stale() -> Cell<bool> {
    Cell::new(true)
}

/// Compose a world matrix from its parts: scale, then rotate (yaw-pitch-roll),
/// then translate.
pub fn compose_matrix(position: Vec3, rotation: Vec3, scale: Vec3) -> Mat4 {
    let rotation = Quat::from_euler(EulerRot::YXZ, rotation.y, rotation.x, rotation.z);
    Mat4::from_scale_rotation_translation(scale, rotation, position)
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            matrix: Cell::new(Mat4::IDENTITY),
            dirty: stale(),
        }
    }
}

impl PartialEq for Transform {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
            && self.rotation == other.rotation
            && self.scale == other.scale
    }
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.set_position_vec(Vec3::new(x, y, z));
    }

    pub fn set_rotation(&mut self, x: f32, y: f32, z: f32) {
        self.set_rotation_vec(Vec3::new(x, y, z));
    }

    pub fn set_scale(&mut self, x: f32, y: f32, z: f32) {
        self.set_scale_vec(Vec3::new(x, y, z));
    }

    pub fn set_position_vec(&mut self, position: Vec3) {
        self.position = position;
        self.dirty.set(true);
    }

    pub fn set_rotation_vec(&mut self, rotation: Vec3) {
        self.rotation = rotation;
        self.dirty.set(true);
    }

    pub fn set_scale_vec(&mut self, scale: Vec3) {
        self.scale = scale;
        self.dirty.set(true);
    }

    /// True when a setter has run since the matrix was last read.
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// The composed world matrix, rebuilt only if a setter ran since the last
    /// call.
    pub fn matrix(&self) -> Mat4 {
        if self.dirty.get() {
            self.matrix
                .set(compose_matrix(self.position, self.rotation, self.scale));
            self.dirty.set(false);
        }
        self.matrix.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn default_matrix_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position(), Vec3::ZERO);
        assert_eq!(t.rotation(), Vec3::ZERO);
        assert_eq!(t.scale(), Vec3::ONE);
        assert!(t.is_dirty());
        assert_eq!(t.matrix(), Mat4::IDENTITY);
        assert!(!t.is_dirty());
    }

    #[test]
    fn translation_only() {
        let mut t = Transform::new();
        t.set_position(1.0, 0.0, 0.0);
        let m = t.matrix();
        assert_eq!(m, Mat4::from_translation(Vec3::X));
        assert_eq!(m.w_axis.truncate(), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn scale_then_position() {
        let mut t = Transform::new();
        t.set_scale(2.0, 2.0, 2.0);
        t.set_position(0.0, 1.0, 0.0);
        let expected = Mat4::from_cols_array(&[
            2.0, 0.0, 0.0, 0.0, //
            0.0, 2.0, 0.0, 0.0, //
            0.0, 0.0, 2.0, 0.0, //
            0.0, 1.0, 0.0, 1.0,
        ]);
        assert_eq!(t.matrix(), expected);
        // Scale applies before translation.
        let p = t.matrix().transform_point3(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(p, Vec3::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn setter_marks_dirty() {
        let mut t = Transform::new();
        t.matrix();
        assert!(!t.is_dirty());
        t.set_position(0.0, 0.0, 1.0);
        assert!(t.is_dirty());
        t.matrix();
        t.set_rotation(0.1, 0.0, 0.0);
        assert!(t.is_dirty());
        t.matrix();
        t.set_scale(1.0, 3.0, 1.0);
        assert!(t.is_dirty());
    }

    #[test]
    fn repeated_reads_reuse_cache() {
        let mut t = Transform::new();
        t.set_rotation(0.3, 1.2, -0.7);
        let first = t.matrix();
        assert!(!t.is_dirty());
        let second = t.matrix();
        assert_eq!(first.to_cols_array(), second.to_cols_array());
        assert!(!t.is_dirty());
    }

    #[test]
    fn matrix_never_stale_after_setter_sequences() {
        let mut t = Transform::new();
        let steps: [(u8, Vec3); 9] = [
            (0, Vec3::new(1.0, 2.0, 3.0)),
            (1, Vec3::new(0.5, 0.0, -0.25)),
            (2, Vec3::new(2.0, 2.0, 2.0)),
            (0, Vec3::new(-4.0, 0.0, 0.0)),
            (0, Vec3::new(-4.0, 1.0, 0.0)),
            (1, Vec3::new(3.0, 0.0, 3.0)),
            (2, Vec3::new(0.5, 1.0, 4.0)),
            (1, Vec3::ZERO),
            (0, Vec3::new(9.0, -9.0, 0.5)),
        ];
        for (i, (which, v)) in steps.into_iter().enumerate() {
            match which {
                0 => t.set_position_vec(v),
                1 => t.set_rotation_vec(v),
                _ => t.set_scale_vec(v),
            }
            // Read only on some steps so several setters stack up between reads.
            if i % 2 == 0 {
                assert_eq!(
                    t.matrix(),
                    compose_matrix(t.position(), t.rotation(), t.scale())
                );
            }
        }
        assert_eq!(
            t.matrix(),
            compose_matrix(Vec3::new(9.0, -9.0, 0.5), Vec3::ZERO, Vec3::new(0.5, 1.0, 4.0))
        );
    }

    #[test]
    fn yaw_rotates_about_y() {
        let mut t = Transform::new();
        t.set_rotation(0.0, FRAC_PI_2, 0.0);
        let p = t.matrix().transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-6));
    }

    #[test]
    fn roll_rotates_about_z() {
        let mut t = Transform::new();
        t.set_rotation(0.0, 0.0, FRAC_PI_2);
        let p = t.matrix().transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn clone_keeps_cache_state() {
        let mut t = Transform::new();
        t.set_position(1.0, 2.0, 3.0);
        t.matrix();
        let c = t.clone();
        assert!(!c.is_dirty());
        assert_eq!(c.matrix(), t.matrix());
        assert_eq!(c, t);
    }
}
