use glam::{Mat4, Vec3};

const WORLD_UP: Vec3 = Vec3::Y;

/// Pitch never reaches straight up/down; the look-at basis would collapse.
const PITCH_LIMIT_DEGREES: f32 = 89.0;

/// Zoom doubles as the perspective field of view, in degrees.
pub const ZOOM_MIN_DEGREES: f32 = 1.0;
pub const ZOOM_MAX_DEGREES: f32 = 45.0;

/// The six movement directions driven by held keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Fly camera: position plus yaw/pitch orientation in degrees.
///
/// The front/right/up basis is a pure function of yaw and pitch and is
/// recomputed whenever they change. Horizontal movement follows the view
/// direction; vertical movement follows world up.
#[derive(Debug, Clone)]
pub struct FlyCamera {
    pub position: Vec3,
    yaw: f32,
    pitch: f32,
    front: Vec3,
    right: Vec3,
    up: Vec3,
    pub speed: f32,
    pub sensitivity: f32,
    zoom: f32,
}

impl Default for FlyCamera {
    fn default() -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            yaw: -90.0,
            pitch: 0.0,
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            speed: 2.5,
            sensitivity: 0.1,
            zoom: ZOOM_MAX_DEGREES,
        };
        camera.update_basis();
        camera
    }
}

impl FlyCamera {
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Unit view direction.
    pub fn front(&self) -> Vec3 {
        self.front
    }

    /// Field of view in degrees, within [`ZOOM_MIN_DEGREES`, `ZOOM_MAX_DEGREES`].
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// World-to-camera matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Translate along front/right/world-up, scaled by `speed * dt`.
    pub fn process_keyboard(&mut self, direction: MoveDirection, dt: f32) {
        let velocity = self.speed * dt;
        match direction {
            MoveDirection::Forward => self.position += self.front * velocity,
            MoveDirection::Backward => self.position -= self.front * velocity,
            MoveDirection::Left => self.position -= self.right * velocity,
            MoveDirection::Right => self.position += self.right * velocity,
            MoveDirection::Up => self.position += WORLD_UP * velocity,
            MoveDirection::Down => self.position -= WORLD_UP * velocity,
        }
    }

    /// Apply a mouse delta in window coordinates (y grows downward).
    pub fn process_mouse(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch -= dy * self.sensitivity;
        self.pitch = self.pitch.clamp(-PITCH_LIMIT_DEGREES, PITCH_LIMIT_DEGREES);
        self.update_basis();
    }

    /// Apply a scroll-wheel delta to the zoom.
    pub fn process_scroll(&mut self, dy: f32) {
        self.zoom = (self.zoom - dy).clamp(ZOOM_MIN_DEGREES, ZOOM_MAX_DEGREES);
    }

    fn update_basis(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        self.right = self.front.cross(WORLD_UP).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_faces_negative_z() {
        let cam = FlyCamera::default();
        assert!(cam.front().abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert_eq!(cam.zoom(), ZOOM_MAX_DEGREES);
    }

    #[test]
    fn zero_yaw_zero_pitch_faces_positive_x() {
        let mut cam = FlyCamera::default();
        // Default yaw is -90 degrees; sensitivity 0.1 means a +900 pixel
        // sweep lands on yaw 0.
        cam.process_mouse(900.0, 0.0);
        assert!(cam.yaw().abs() < 1e-4);
        assert_eq!(cam.pitch(), 0.0);
        assert!(cam.front().abs_diff_eq(Vec3::X, 1e-4));
    }

    #[test]
    fn pitch_clamps_regardless_of_input_magnitude() {
        let mut cam = FlyCamera::default();
        cam.process_mouse(0.0, -1.0e7);
        assert_eq!(cam.pitch(), 89.0);
        assert!(cam.front().y > 0.99);

        cam.process_mouse(0.0, 1.0e7);
        assert_eq!(cam.pitch(), -89.0);
        assert!(cam.front().y < -0.99);
        // The basis never collapses.
        assert!(cam.front().is_normalized());
    }

    #[test]
    fn zoom_clamps_regardless_of_scroll_magnitude() {
        let mut cam = FlyCamera::default();
        cam.process_scroll(1.0e7);
        assert_eq!(cam.zoom(), ZOOM_MIN_DEGREES);
        cam.process_scroll(-1.0e7);
        assert_eq!(cam.zoom(), ZOOM_MAX_DEGREES);
    }

    #[test]
    fn movement_follows_basis_vectors() {
        let mut cam = FlyCamera::default();
        cam.process_keyboard(MoveDirection::Forward, 1.0);
        assert!(cam.position.abs_diff_eq(Vec3::new(0.0, 0.0, -2.5), 1e-5));

        cam.process_keyboard(MoveDirection::Right, 1.0);
        assert!(cam.position.abs_diff_eq(Vec3::new(2.5, 0.0, -2.5), 1e-5));
    }

    #[test]
    fn vertical_movement_uses_world_up_even_when_pitched() {
        let mut cam = FlyCamera::default();
        cam.process_mouse(0.0, -450.0); // pitch up 45 degrees
        let before = cam.position;
        cam.process_keyboard(MoveDirection::Up, 1.0);
        let delta = cam.position - before;
        assert!(delta.abs_diff_eq(Vec3::new(0.0, 2.5, 0.0), 1e-5));
    }

    #[test]
    fn view_matrix_looks_down_front() {
        let cam = FlyCamera::default();
        // A point one unit ahead of the camera maps onto the view-space -Z axis.
        let ahead = cam.position + cam.front();
        let in_view = cam.view_matrix().transform_point3(ahead);
        assert!(in_view.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-5));
    }
}
