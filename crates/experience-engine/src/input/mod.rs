//! Input subsystem.
//!
//! Event types are platform-agnostic. [`translate_window_event`] is the one
//! place that reads winit events; the runtime calls it and hands the result
//! to the app.

mod state;
mod translate;
mod types;

pub use state::InputState;
pub use translate::translate_window_event;
pub use types::{
    InputEvent,
    Key,
    KeyState,
    Modifiers,
    MouseButton,
    MouseButtonState,
    MouseWheelDelta,
    PointerButtonEvent,
    PointerMoveEvent,
};
