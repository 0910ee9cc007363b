use crate::input::InputEvent;
use crate::time::FrameScheduler;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by the runtime.
pub trait App {
    /// Called once the window exists, before the first frame.
    fn on_start(&mut self, scheduler: &mut dyn FrameScheduler) {
        scheduler.request_frame();
    }

    /// Called after the host window changed size or pixel ratio.
    fn on_resize(&mut self) {}

    /// Called for every translated input event.
    fn on_input(&mut self, event: &InputEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called for each scheduled frame.
    fn on_frame(&mut self, scheduler: &mut dyn FrameScheduler) -> AppControl;
}
