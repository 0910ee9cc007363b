use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::input::{InputEvent, MouseButton, MouseButtonState};

use super::perspective::PerspectiveCamera;

const EPS: f32 = 1e-6;

/// Rotates the camera around `target` on left-button drag.
///
/// Pan and zoom are not handled here. With damping on, a drag feeds an
/// angular velocity that decays by `damping_factor` per update.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    target: Vec3,

    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,

    pub auto_rotate: bool,
    /// Auto-rotation rate is `TAU / 60 * auto_rotate_speed` radians per second.
    pub auto_rotate_speed: f32,

    /// Polar angle limits, radians from +Y.
    pub min_polar: f32,
    pub max_polar: f32,

    delta_theta: f32,
    delta_phi: f32,

    drag_from: Option<(f32, f32)>,
    viewport_height: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            auto_rotate: false,
            auto_rotate_speed: 2.0,
            min_polar: 0.0,
            max_polar: PI,
            delta_theta: 0.0,
            delta_phi: 0.0,
            drag_from: None,
            viewport_height: 1.0,
        }
    }
}

impl OrbitControls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Authoritative look-at target.
    #[inline]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Drag distances are measured against this height.
    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height.max(1.0);
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_from.is_some()
    }

    /// Returns true when the event was consumed.
    pub fn handle_input(&mut self, ev: &InputEvent) -> bool {
        match ev {
            InputEvent::PointerButton(b) if b.button == MouseButton::Left => {
                self.drag_from = match b.state {
                    MouseButtonState::Pressed => Some((b.x, b.y)),
                    MouseButtonState::Released => None,
                };
                true
            }

            InputEvent::PointerMoved(p) => {
                let Some((x0, y0)) = self.drag_from else {
                    return false;
                };
                let (dx, dy) = (p.x - x0, p.y - y0);
                self.rotate_left(TAU * dx / self.viewport_height * self.rotate_speed);
                self.rotate_up(TAU * dy / self.viewport_height * self.rotate_speed);
                self.drag_from = Some((p.x, p.y));
                true
            }

            InputEvent::PointerLeft | InputEvent::Focused(false) => {
                self.drag_from = None;
                false
            }

            _ => false,
        }
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.delta_theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.delta_phi -= angle;
    }

    /// Applies pending rotation to `camera`. `delta_secs` only drives
    /// auto-rotation. Returns true if the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera, delta_secs: f32) -> bool {
        if self.auto_rotate && !self.is_dragging() {
            self.rotate_left(TAU / 60.0 * self.auto_rotate_speed * delta_secs);
        }

        if self.delta_theta == 0.0 && self.delta_phi == 0.0 {
            camera.look_at = self.target;
            return false;
        }

        let offset = camera.position - self.target;
        let radius = offset.length();
        if radius < EPS {
            camera.look_at = self.target;
            return false;
        }

        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        if self.enable_damping {
            theta += self.delta_theta * self.damping_factor;
            phi += self.delta_phi * self.damping_factor;
        } else {
            theta += self.delta_theta;
            phi += self.delta_phi;
        }

        phi = phi.clamp(self.min_polar, self.max_polar).clamp(EPS, PI - EPS);

        let sin_phi = phi.sin() * radius;
        let next = self.target + Vec3::new(sin_phi * theta.sin(), phi.cos() * radius, sin_phi * theta.cos());

        if self.enable_damping {
            self.delta_theta *= 1.0 - self.damping_factor;
            self.delta_phi *= 1.0 - self.damping_factor;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
        }

        let moved = next.distance(camera.position) > 1e-5;
        camera.position = next;
        camera.look_at = self.target;
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Modifiers, PointerButtonEvent, PointerMoveEvent};

    fn button(state: MouseButtonState, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state,
            x,
            y,
            modifiers: Modifiers::default(),
        })
    }

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved(PointerMoveEvent { x, y })
    }

    fn drag(c: &mut OrbitControls, dx: f32) {
        c.handle_input(&button(MouseButtonState::Pressed, 100.0, 100.0));
        c.handle_input(&moved(100.0 + dx, 100.0));
        c.handle_input(&button(MouseButtonState::Released, 100.0 + dx, 100.0));
    }

    #[test]
    fn drag_orbits_at_constant_radius() {
        let mut camera = PerspectiveCamera::default();
        let radius = camera.position.length();
        let start = camera.position;

        let mut c = OrbitControls::new();
        c.set_viewport_height(600.0);
        drag(&mut c, 120.0);

        for _ in 0..30 {
            c.update(&mut camera, 0.016);
        }

        assert!((camera.position.length() - radius).abs() < 1e-3);
        assert!(camera.position.distance(start) > 0.1);
        assert_eq!(camera.look_at, c.target());
    }

    #[test]
    fn damping_decays_motion() {
        let mut camera = PerspectiveCamera::default();
        let mut c = OrbitControls::new();
        c.set_viewport_height(600.0);
        drag(&mut c, 200.0);

        let before = camera.position;
        c.update(&mut camera, 0.016);
        let first_step = camera.position.distance(before);

        for _ in 0..400 {
            c.update(&mut camera, 0.016);
        }
        let before = camera.position;
        c.update(&mut camera, 0.016);
        let late_step = camera.position.distance(before);

        assert!(first_step > 0.0);
        assert!(late_step < first_step * 0.01);
    }

    #[test]
    fn motion_without_button_is_ignored() {
        let mut c = OrbitControls::new();
        assert!(!c.handle_input(&moved(10.0, 10.0)));

        let mut camera = PerspectiveCamera::default();
        let start = camera.position;
        assert!(!c.update(&mut camera, 0.016));
        assert!(camera.position.distance(start) < 1e-4);
    }

    #[test]
    fn polar_angle_stays_off_the_poles() {
        let mut camera = PerspectiveCamera::default();
        let mut c = OrbitControls::new();
        c.enable_damping = false;
        c.rotate_up(10.0);
        c.update(&mut camera, 0.016);
        let dir = (camera.position - c.target()).normalize();
        assert!(dir.y > 0.99);
        assert!(camera.position.is_finite());
        assert!(camera.view_matrix().is_finite());
    }

    #[test]
    fn auto_rotate_uses_frame_delta() {
        let mut camera = PerspectiveCamera::default();
        let start = camera.position;
        let mut c = OrbitControls::new();
        c.enable_damping = false;
        c.auto_rotate = true;

        c.update(&mut camera, 0.0);
        assert!(camera.position.distance(start) < 1e-4);

        c.update(&mut camera, 1.0);
        assert!(camera.position.distance(start) > 0.1);
    }
}
