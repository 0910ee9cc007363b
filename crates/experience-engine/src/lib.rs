//! Experience engine crate.
//!
//! Framework pieces for a small real-time 3D scene: a namespaced event hub,
//! viewport and clock tracking, manifest-driven asset loading, a render
//! target with a camera rig, and a scene composer that builds subsystems
//! once assets are ready. [`core::Experience`] wires them together.

pub mod events;
pub mod viewport;
pub mod time;
pub mod assets;
pub mod camera;
pub mod debug;
pub mod scene;
pub mod render;
pub mod core;

pub mod device;
pub mod window;
pub mod input;
pub mod logging;
