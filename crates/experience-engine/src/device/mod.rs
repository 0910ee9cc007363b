//! GPU device + surface management.
//!
//! [`Gpu`] owns the wgpu device, queue and the configured window surface. It acquires frames and presents them; drawing lives in
//! `render::GpuBackend`.

mod gpu;

pub use gpu::{Gpu, GpuFrame, GpuInit};