use crate::input::InputEvent;
use crate::time::TimeState;
use crate::viewport::Viewport;

use super::orbit::OrbitControls;
use super::perspective::PerspectiveCamera;
use super::zoom::ZoomControls;

/// Camera plus its orbit and zoom controls.
#[derive(Debug, Clone, Default)]
pub struct CameraRig {
    camera: PerspectiveCamera,
    orbit: OrbitControls,
    zoom: ZoomControls,
}

impl CameraRig {
    pub fn new(camera: PerspectiveCamera) -> Self {
        let mut orbit = OrbitControls::new();
        orbit.set_target(camera.look_at);
        let mut zoom = ZoomControls::new();
        zoom.set_target(camera.look_at);
        Self { camera, orbit, zoom }
    }

    pub fn resize(&mut self, viewport: &Viewport) {
        self.camera.resize(viewport);
        self.orbit.set_viewport_height(viewport.height);
    }

    /// Per-frame update.
    ///
    /// Order matters: the orbit target is read, orbit moves, the target is
    /// copied into zoom, then zoom moves.
    pub fn update(&mut self, time: &TimeState) {
        let target = self.orbit.target();
        self.orbit.update(&mut self.camera, time.delta_secs());

        self.zoom.set_target(target);
        self.zoom.update(&mut self.camera);
    }

    /// Routes pointer input to both schemes. Returns true if either used it.
    pub fn handle_input(&mut self, ev: &InputEvent) -> bool {
        let orbit = self.orbit.handle_input(ev);
        let zoom = self.zoom.handle_input(ev);
        orbit || zoom
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut PerspectiveCamera {
        &mut self.camera
    }

    pub fn orbit(&self) -> &OrbitControls {
        &self.orbit
    }

    pub fn orbit_mut(&mut self) -> &mut OrbitControls {
        &mut self.orbit
    }

    pub fn zoom(&self) -> &ZoomControls {
        &self.zoom
    }
}
