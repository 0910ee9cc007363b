use glam::{Mat4, Vec3};

use crate::viewport::Viewport;

/// Perspective camera looking at a point.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov_y_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    pub position: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            fov_y_deg: 35.0,
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(6.0, 4.0, 8.0),
            look_at: Vec3::ZERO,
            up: Vec3::Y,
        }
    }
}

impl PerspectiveCamera {
    pub fn new(fov_y_deg: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self { fov_y_deg, aspect, near, far, ..Self::default() }
    }

    /// Matches the aspect ratio to the viewport.
    pub fn resize(&mut self, viewport: &Viewport) {
        self.aspect = viewport.aspect();
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.look_at, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Eye offset from the look-at point.
    #[inline]
    pub fn offset(&self) -> Vec3 {
        self.position - self.look_at
    }
}
