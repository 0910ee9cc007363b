use std::cell::Cell;
use std::rc::Rc;

/// Accepts "call me before the next paint" requests.
///
/// One request schedules one frame; repeated requests before that frame runs
/// collapse into one.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

/// Result of offering a frame to the clock.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    /// The clock ticked and asked for another frame.
    Ticked,
    /// The clock has been stopped; no tick happened and nothing was re-armed.
    Stopped,
}

/// Cancellation token for the frame loop.
///
/// Clones share state, so a handle given to a subscriber can stop the loop
/// that is currently running it.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Rc<Cell<bool>>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.get()
    }
}

/// Scheduler that only records requests. The owner decides when frames run.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    pending: bool,
    requests: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the pending request, if any.
    pub fn take_pending(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Total number of requests received.
    pub fn requests(&self) -> u64 {
        self.requests
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) {
        self.pending = true;
        self.requests += 1;
    }
}
