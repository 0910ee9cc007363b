//! Rendering.
//!
//! [`RenderTarget`] owns the camera rig and renderer settings and hands a
//! [`FrameView`] to a [`RenderBackend`] each tick. [`GpuBackend`] draws with
//! wgpu; [`HeadlessBackend`] only records what it was asked to draw.
//!
//! Convention:
//! - World space is right-handed, +Y up, units in meters.
//! - Colors are authored in sRGB and linearized before lighting.

mod backend;
mod color;
mod error;
mod gpu;
mod headless;
pub(crate) mod mesh;
mod target;

pub use backend::{FrameView, RenderBackend, RenderSettings, SurfaceSize};
pub use color::{Color, ParseColorError};
pub use error::RenderError;
pub use gpu::GpuBackend;
pub use headless::HeadlessBackend;
pub use target::RenderTarget;
