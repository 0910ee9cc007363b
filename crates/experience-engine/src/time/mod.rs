//! Time subsystem.
//!
//! Provides the frame clock and the cooperative scheduling primitives that
//! drive it, without coupling to the windowing runtime.
//! Intended usage:
//! - one `Clock` per experience
//! - the runtime (or a test) implements `FrameScheduler`
//! - `Clock::start` arms the first frame; each `Clock::on_frame` ticks and re-arms
//! - `StopHandle::stop` ends the loop deterministically

mod clock;
mod scheduler;

pub use clock::{
    Clock, ClockEvent, ManualSource, MonotonicSource, TimeSource, TimeState, INITIAL_DELTA,
};
pub use scheduler::{FrameOutcome, FrameScheduler, ManualScheduler, StopHandle};
