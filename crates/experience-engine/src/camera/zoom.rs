use glam::Vec3;

use crate::input::{InputEvent, MouseWheelDelta};

use super::perspective::PerspectiveCamera;

/// Scroll amount per wheel line.
const LINE_SCALE: f32 = 0.025;
/// Scroll amount per wheel pixel.
const PIXEL_SCALE: f32 = 0.000_25;

/// Wheel zoom: scales the eye distance around `target`.
///
/// Rotation and panning are left to other controls. The target is not
/// authoritative here; [`CameraRig`](super::CameraRig) overwrites it every
/// frame.
#[derive(Debug, Clone)]
pub struct ZoomControls {
    target: Vec3,

    pub zoom_speed: f32,
    /// Fraction of the pending zoom consumed per update.
    pub damping: f32,
    pub min_distance: f32,
    pub max_distance: f32,

    pending: f32,
}

impl Default for ZoomControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            zoom_speed: 1.5,
            damping: 0.2,
            min_distance: 0.5,
            max_distance: f32::INFINITY,
            pending: 0.0,
        }
    }
}

impl ZoomControls {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Returns true when the event was consumed.
    pub fn handle_input(&mut self, ev: &InputEvent) -> bool {
        let InputEvent::MouseWheel { delta, .. } = ev else {
            return false;
        };
        // Scrolling away from the user zooms in.
        self.pending -= match delta {
            MouseWheelDelta::Line { y, .. } => y * LINE_SCALE,
            MouseWheelDelta::Pixel { y, .. } => y * PIXEL_SCALE,
        };
        true
    }

    /// Applies part of the pending zoom to `camera`. Returns true if it moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let factor = 1.0 + self.pending * self.zoom_speed;

        self.pending *= 1.0 - self.damping;
        if self.pending.abs() < 1e-6 {
            self.pending = 0.0;
        }

        if factor == 1.0 || factor <= 0.0 {
            return false;
        }

        let eye = camera.position - self.target;
        let distance = (eye.length() * factor).clamp(self.min_distance, self.max_distance);
        let next = self.target + eye.normalize_or_zero() * distance;

        let moved = next != camera.position;
        camera.position = next;
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;

    fn wheel(y: f32) -> InputEvent {
        InputEvent::MouseWheel { delta: MouseWheelDelta::Line { x: 0.0, y }, modifiers: Modifiers::default() }
    }

    fn settle(z: &mut ZoomControls, camera: &mut PerspectiveCamera) {
        for _ in 0..200 {
            z.update(camera);
        }
    }

    #[test]
    fn scrolling_up_moves_closer() {
        let mut camera = PerspectiveCamera::default();
        let before = camera.offset().length();
        let mut z = ZoomControls::new();

        assert!(z.handle_input(&wheel(3.0)));
        settle(&mut z, &mut camera);

        assert!(camera.offset().length() < before);
    }

    #[test]
    fn scrolling_down_moves_away_along_the_same_ray() {
        let mut camera = PerspectiveCamera::default();
        let dir = camera.offset().normalize();
        let before = camera.offset().length();
        let mut z = ZoomControls::new();

        z.handle_input(&wheel(-3.0));
        settle(&mut z, &mut camera);

        assert!(camera.offset().length() > before);
        assert!(camera.offset().normalize().distance(dir) < 1e-4);
    }

    #[test]
    fn distance_is_clamped() {
        let mut camera = PerspectiveCamera::default();
        let mut z = ZoomControls::new();
        for _ in 0..50 {
            z.handle_input(&wheel(10.0));
            z.update(&mut camera);
        }
        assert!(camera.offset().length() >= z.min_distance - 1e-4);
    }

    #[test]
    fn idle_update_is_a_no_op() {
        let mut camera = PerspectiveCamera::default();
        let start = camera.position;
        let mut z = ZoomControls::new();
        assert!(!z.update(&mut camera));
        assert_eq!(camera.position, start);
    }
}
