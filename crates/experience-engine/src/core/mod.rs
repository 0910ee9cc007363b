//! Application root.
//!
//! [`Experience`] composes the viewport tracker, clock, asset loader, render
//! target and scene composer, and wires their events together. The runtime
//! drives it through the [`App`] contract; tests drive it directly.

mod app;
mod error;
mod experience;

pub use app::{App, AppControl};
pub use error::ExperienceError;
pub use experience::{Experience, ExperienceConfig, EXPERIENCE_NAMESPACE};
