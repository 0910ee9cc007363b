use super::backend::{FrameView, RenderBackend, SurfaceSize};
use super::color::Color;
use super::error::RenderError;

/// Backend that draws nothing and records what it was asked to do.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    size: Option<SurfaceSize>,
    frames: u64,
    last_node_count: usize,
    last_clear: Option<Color>,
    last_exposure: Option<f32>,
    fail_next: Option<RenderError>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `draw` fail with `err`.
    pub fn fail_next(&mut self, err: RenderError) {
        self.fail_next = Some(err);
    }

    /// Last size passed to `resize`.
    pub fn size(&self) -> Option<SurfaceSize> {
        self.size
    }

    /// Frames drawn successfully.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_node_count(&self) -> usize {
        self.last_node_count
    }

    pub fn last_clear(&self) -> Option<Color> {
        self.last_clear
    }

    pub fn last_exposure(&self) -> Option<f32> {
        self.last_exposure
    }
}

impl RenderBackend for HeadlessBackend {
    fn resize(&mut self, size: SurfaceSize) {
        self.size = Some(size);
    }

    fn draw(&mut self, frame: &FrameView<'_>) -> Result<(), RenderError> {
        if let Some(err) = self.fail_next.take() {
            return Err(err);
        }
        self.frames += 1;
        self.last_node_count = frame.scene.len();
        self.last_clear = Some(frame.settings.clear_color);
        self.last_exposure = Some(frame.settings.exposure.get());
        Ok(())
    }
}
