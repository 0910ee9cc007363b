//! Window + runtime loop.
//!
//! Owns the `winit` event loop and the single window, creates the GPU layer
//! for it, and forwards resize, input and redraw events to the app.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
