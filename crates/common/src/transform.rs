use glam::{Mat4, Vec3};

/// Static placement of one scene object.
///
/// The model matrix composes strictly as translate * rotate * scale; the
/// authored tableau layout depends on that order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectTransform {
    pub scale: Vec3,
    /// Rotation angle in radians about `axis`.
    pub angle: f32,
    /// Rotation axis. Must be non-zero; normalized when the matrix is built.
    pub axis: Vec3,
    pub translation: Vec3,
}

impl ObjectTransform {
    pub const fn new(scale: Vec3, angle: f32, axis: Vec3, translation: Vec3) -> Self {
        Self {
            scale,
            angle,
            axis,
            translation,
        }
    }

    /// Local-to-world matrix: translate * rotate * scale.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation)
            * Mat4::from_axis_angle(self.axis.normalize(), self.angle)
            * Mat4::from_scale(self.scale)
    }
}

impl Default for ObjectTransform {
    fn default() -> Self {
        Self {
            scale: Vec3::ONE,
            angle: 0.0,
            axis: Vec3::Y,
            translation: Vec3::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn default_is_identity() {
        let t = ObjectTransform::default();
        let m = t.model_matrix();
        assert!(m.abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn scale_then_translate() {
        // Scale (2,1,3), no rotation, translate (3.5, -0.495, 0) maps the
        // local point (1,0,0) to (5.5, -0.495, 0).
        let t = ObjectTransform::new(
            Vec3::new(2.0, 1.0, 3.0),
            0.0,
            Vec3::Y,
            Vec3::new(3.5, -0.495, 0.0),
        );
        let p = t.model_matrix().transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::new(5.5, -0.495, 0.0), 1e-5));
    }

    #[test]
    fn rotation_applies_before_translation() {
        // A quarter turn about Y sends +X to -Z; the translation is applied
        // afterwards and is not rotated.
        let t = ObjectTransform::new(
            Vec3::ONE,
            FRAC_PI_2,
            Vec3::Y,
            Vec3::new(0.0, 2.0, 0.0),
        );
        let p = t.model_matrix().transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::new(0.0, 2.0, -1.0), 1e-5));
    }

    #[test]
    fn axis_is_normalized() {
        // (0,2,0) and (0,1,0) describe the same rotation.
        let a = ObjectTransform::new(Vec3::ONE, 1.0, Vec3::new(0.0, 2.0, 0.0), Vec3::ZERO);
        let b = ObjectTransform::new(Vec3::ONE, 1.0, Vec3::Y, Vec3::ZERO);
        assert!(a.model_matrix().abs_diff_eq(b.model_matrix(), 1e-6));
    }
}
