use glam::Mat4;

/// Near/far planes shared by both projection kinds.
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 100.0;

/// Half extent of the orthographic view volume.
pub const ORTHO_HALF_EXTENT: f32 = 5.0;

/// Projection kind, flipped by the P key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Projection {
    #[default]
    Perspective,
    Orthographic,
}

impl Projection {
    pub fn toggle(&mut self) {
        *self = match self {
            Projection::Perspective => Projection::Orthographic,
            Projection::Orthographic => Projection::Perspective,
        };
    }

    /// Camera-to-clip matrix. `fov_y_degrees` (the camera zoom) only
    /// affects the perspective kind.
    pub fn matrix(self, fov_y_degrees: f32, aspect: f32) -> Mat4 {
        match self {
            Projection::Perspective => {
                Mat4::perspective_rh(fov_y_degrees.to_radians(), aspect, Z_NEAR, Z_FAR)
            }
            Projection::Orthographic => Mat4::orthographic_rh(
                -ORTHO_HALF_EXTENT,
                ORTHO_HALF_EXTENT,
                -ORTHO_HALF_EXTENT,
                ORTHO_HALF_EXTENT,
                Z_NEAR,
                Z_FAR,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_parity() {
        // An odd number of presses yields orthographic, an even number
        // perspective, regardless of how many.
        let mut p = Projection::default();
        for presses in 1..=7 {
            p.toggle();
            let expected = if presses % 2 == 1 {
                Projection::Orthographic
            } else {
                Projection::Perspective
            };
            assert_eq!(p, expected, "after {presses} presses");
        }
    }

    #[test]
    fn perspective_uses_fov() {
        let narrow = Projection::Perspective.matrix(1.0, 4.0 / 3.0);
        let wide = Projection::Perspective.matrix(45.0, 4.0 / 3.0);
        assert_ne!(narrow, wide);
    }

    #[test]
    fn orthographic_ignores_fov() {
        let a = Projection::Orthographic.matrix(1.0, 4.0 / 3.0);
        let b = Projection::Orthographic.matrix(45.0, 4.0 / 3.0);
        assert_eq!(a, b);
    }

    #[test]
    fn matrices_are_finite() {
        for proj in [Projection::Perspective, Projection::Orthographic] {
            let m = proj.matrix(45.0, 800.0 / 600.0);
            assert!(m.to_cols_array().iter().all(|v| v.is_finite()));
        }
    }
}
