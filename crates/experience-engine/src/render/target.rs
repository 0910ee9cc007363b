use std::rc::Rc;

use crate::camera::{CameraRig, PerspectiveCamera};
use crate::debug::DebugPanel;
use crate::input::InputEvent;
use crate::scene::Scene;
use crate::time::TimeState;
use crate::viewport::Viewport;

use super::backend::{FrameView, RenderBackend, RenderSettings, SurfaceSize};
use super::error::RenderError;

/// Owns the drawing surface and the camera rig.
pub struct RenderTarget<B: RenderBackend> {
    backend: B,
    rig: CameraRig,
    settings: RenderSettings,
    viewport: Viewport,
}

impl<B: RenderBackend> RenderTarget<B> {
    /// Sizes the backend and camera for `viewport` right away.
    pub fn new(backend: B, rig: CameraRig, settings: RenderSettings, viewport: Viewport) -> Self {
        let mut target = Self { backend, rig, settings, viewport };
        target.resize(&viewport);
        target
    }

    /// Recomputes surface size and camera projection. Call on every resize.
    pub fn resize(&mut self, viewport: &Viewport) {
        self.viewport = *viewport;
        let size = self.surface_size();
        log::debug!("render target resized to {}x{}", size.width, size.height);
        self.backend.resize(size);
        self.rig.resize(viewport);
    }

    /// Per-frame camera update.
    pub fn update(&mut self, time: &TimeState) {
        self.rig.update(time);
    }

    pub fn handle_input(&mut self, ev: &InputEvent) -> bool {
        self.rig.handle_input(ev)
    }

    /// Draws `scene` once through the current camera.
    ///
    /// Skipped frames are logged and swallowed; only fatal errors reach the
    /// caller.
    pub fn render(&mut self, scene: &Scene) -> Result<(), RenderError> {
        let camera = self.rig.camera();
        let frame = FrameView {
            scene,
            view: camera.view_matrix(),
            projection: camera.projection_matrix(),
            camera_position: camera.position,
            settings: &self.settings,
        };

        match self.backend.draw(&frame) {
            Ok(()) => Ok(()),
            Err(RenderError::Skipped(why)) => {
                log::debug!("frame skipped: {why}");
                Ok(())
            }
            Err(err) => {
                log::error!("{err}");
                Err(err)
            }
        }
    }

    /// Registers the renderer folder on `debug`.
    pub fn add_debug(&self, debug: &mut DebugPanel) {
        if let Some(folder) = debug.add_folder("Renderer") {
            folder.add_binding("exposure", Rc::clone(&self.settings.exposure), 1.0, 5.0, 0.001);
        }
    }

    pub fn surface_size(&self) -> SurfaceSize {
        let (width, height) = self.viewport.physical_size();
        SurfaceSize { width, height }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        self.rig.camera()
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    pub fn rig_mut(&mut self) -> &mut CameraRig {
        &mut self.rig
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}
