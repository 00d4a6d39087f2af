use crate::utils::math::ViewFrustum;
use glam::{Mat4, Vec2, Vec3};

const PITCH_LIMIT: f32 = 89.0;

/// First-person camera described by yaw and pitch in degrees. Yaw -90
/// looks down -Z.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(fov: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: -90.0,
            pitch: 0.0,
            fov,
            aspect_ratio,
            near,
            far,
        }
    }

    /// Applies a mouse delta; positive y looks up. Pitch stays within ±89°.
    pub fn rotate(&mut self, delta: Vec2, sensitivity: f32) {
        self.yaw += delta.x * sensitivity;
        self.pitch = (self.pitch + delta.y * sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn front(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize()
    }

    /// Front projected onto the ground plane, for walking.
    pub fn flat_front(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        Vec3::new(yaw.cos(), 0.0, yaw.sin())
    }

    pub fn right(&self) -> Vec3 {
        self.front().cross(Vec3::Y).normalize()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front(), Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov.to_radians(),
            self.aspect_ratio,
            self.near,
            self.far,
        )
    }

    pub fn frustum(&self) -> ViewFrustum {
        ViewFrustum::from_matrix(self.projection_matrix() * self.view_matrix())
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(70.0, 16.0 / 9.0, 0.1, 1000.0)
    }
}
