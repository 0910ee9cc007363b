//! Viewport tracking.
//!
//! The tracker is the only writer of the current [`Viewport`]. It re-reads the
//! host window on every resize notification and republishes `"resize"` with a
//! fresh snapshot.

mod size;
mod tracker;

pub use size::Viewport;
pub use tracker::{HostWindow, StaticHost, ViewportEvent, ViewportTracker, DEFAULT_PIXEL_RATIO_CAP};
