//! Developer tweak panel.
//!
//! A panel built without the debug flag hands out no folders, so subsystems
//! that register controls simply skip that step.

mod panel;

pub use panel::{Binding, Button, DebugPanel, Folder};
