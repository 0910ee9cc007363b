use std::cell::Cell;
use std::rc::Rc;

use glam::{Mat4, Vec3};

use crate::scene::Scene;

use super::color::Color;
use super::error::RenderError;

/// Drawable size in physical pixels.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

/// Renderer-wide options.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub clear_color: Color,
    /// Tone-mapping exposure. Shared so a debug binding can drive it.
    pub exposure: Rc<Cell<f32>>,
    pub shadows: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            clear_color: Color::from_srgb_u8(0x21, 0x1d, 0x20, 0xff),
            exposure: Rc::new(Cell::new(1.2)),
            shadows: true,
        }
    }
}

/// Everything a backend needs to draw one frame.
pub struct FrameView<'a> {
    pub scene: &'a Scene,
    pub view: Mat4,
    pub projection: Mat4,
    pub camera_position: Vec3,
    pub settings: &'a RenderSettings,
}

impl FrameView<'_> {
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// A drawing surface.
pub trait RenderBackend {
    fn resize(&mut self, size: SurfaceSize);

    fn draw(&mut self, frame: &FrameView<'_>) -> Result<(), RenderError>;
}
