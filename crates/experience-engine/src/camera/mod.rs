//! Perspective camera and the two pointer-control schemes that drive it.
//!
//! [`OrbitControls`] owns the look-at target. [`CameraRig::update`] copies it
//! into [`ZoomControls`] every frame before either scheme moves the camera,
//! so both always pivot around the same point.

mod orbit;
mod perspective;
mod rig;
mod zoom;

pub use orbit::OrbitControls;
pub use perspective::PerspectiveCamera;
pub use rig::CameraRig;
pub use zoom::ZoomControls;
