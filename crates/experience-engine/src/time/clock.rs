use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::events::{EventHub, EventName};

use super::scheduler::{FrameOutcome, FrameScheduler, StopHandle};

/// Placeholder `delta` before the first tick.
///
/// There is no previous frame to measure against, so this is a nominal
/// 60 Hz interval, not a measurement.
pub const INITIAL_DELTA: Duration = Duration::from_millis(16);

/// Source of monotonic timestamps, measured from an arbitrary epoch.
pub trait TimeSource {
    fn now(&self) -> Duration;
}

/// Wall-clock source backed by `Instant`.
#[derive(Debug, Clone)]
pub struct MonotonicSource {
    origin: Instant,
}

impl MonotonicSource {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicSource {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven source for headless runs and tests.
///
/// Clones share the same timestamp.
#[derive(Debug, Clone, Default)]
pub struct ManualSource(Rc<Cell<Duration>>);

impl ManualSource {
    pub fn new(start: Duration) -> Self {
        Self(Rc::new(Cell::new(start)))
    }

    pub fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by);
    }

    pub fn set(&self, now: Duration) {
        self.0.set(now);
    }
}

impl TimeSource for ManualSource {
    fn now(&self) -> Duration {
        self.0.get()
    }
}

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TimeState {
    /// Timestamp captured when the clock was created.
    pub start: Duration,

    /// Timestamp of the latest tick.
    pub current: Duration,

    /// `current - start`.
    pub elapsed: Duration,

    /// Gap between the latest tick and the one before it.
    pub delta: Duration,

    /// Number of ticks so far.
    pub frame_index: u64,
}

impl TimeState {
    #[inline]
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    #[inline]
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }
}

/// Events published by [`Clock`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ClockEvent {
    Tick,
}

impl EventName for ClockEvent {
    fn event_name(&self) -> &'static str {
        match self {
            ClockEvent::Tick => "tick",
        }
    }
}

/// Frame clock.
///
/// Sole writer of [`TimeState`]. Each tick publishes `"tick"` with the fresh
/// snapshot, so subscribers never need to borrow the clock back.
pub struct Clock {
    source: Box<dyn TimeSource>,
    state: TimeState,
    stop: StopHandle,
    events: EventHub<TimeState>,
}

impl Clock {
    pub fn new(source: Box<dyn TimeSource>) -> Self {
        let start = source.now();
        Self {
            source,
            state: TimeState {
                start,
                current: start,
                elapsed: Duration::ZERO,
                delta: INITIAL_DELTA,
                frame_index: 0,
            },
            stop: StopHandle::new(),
            events: EventHub::new(),
        }
    }

    /// Arms the first frame.
    pub fn start(&self, scheduler: &mut dyn FrameScheduler) {
        if !self.stop.is_stopped() {
            scheduler.request_frame();
        }
    }

    /// Runs one scheduled frame: tick, then request the next one.
    pub fn on_frame(&mut self, scheduler: &mut dyn FrameScheduler) -> FrameOutcome {
        if self.stop.is_stopped() {
            return FrameOutcome::Stopped;
        }

        self.tick();

        // A subscriber may have stopped the loop during this tick.
        if self.stop.is_stopped() {
            return FrameOutcome::Stopped;
        }

        scheduler.request_frame();
        FrameOutcome::Ticked
    }

    /// Advances the clock and publishes `"tick"`.
    pub fn tick(&mut self) -> TimeState {
        let now = self.source.now();

        self.state.delta = now.saturating_sub(self.state.current);
        self.state.current = now;
        self.state.elapsed = self.state.current.saturating_sub(self.state.start);
        self.state.frame_index = self.state.frame_index.wrapping_add(1);

        let _ = self.events.trigger_kind(ClockEvent::Tick, &self.state);
        self.state
    }

    /// Stops the frame loop; later frames are refused.
    pub fn stop(&self) {
        self.stop.stop();
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.stop.is_stopped()
    }

    #[inline]
    pub fn state(&self) -> TimeState {
        self.state
    }

    pub fn events(&self) -> &EventHub<TimeState> {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventHub<TimeState> {
        &mut self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::ManualScheduler;
    use std::cell::RefCell;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn clock_at(start: u64) -> (Clock, ManualSource) {
        let source = ManualSource::new(ms(start));
        (Clock::new(Box::new(source.clone())), source)
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn new_clock_has_placeholder_delta() {
        let (clock, _) = clock_at(1000);
        let s = clock.state();
        assert_eq!(s.start, ms(1000));
        assert_eq!(s.current, ms(1000));
        assert_eq!(s.elapsed, Duration::ZERO);
        assert_eq!(s.delta, INITIAL_DELTA);
        assert_eq!(s.frame_index, 0);
    }

    // ── tick ──────────────────────────────────────────────────────────────

    #[test]
    fn tick_measures_delta_and_elapsed() {
        let (mut clock, source) = clock_at(1000);

        source.advance(ms(20));
        let s = clock.tick();
        assert_eq!(s.delta, ms(20));
        assert_eq!(s.elapsed, ms(20));

        source.advance(ms(7));
        let s = clock.tick();
        assert_eq!(s.delta, ms(7));
        assert_eq!(s.elapsed, ms(27));
        assert_eq!(s.frame_index, 2);
    }

    #[test]
    fn source_going_back_gives_zero_delta_and_follows_the_source() {
        let (mut clock, source) = clock_at(1000);
        source.advance(ms(50));
        clock.tick();

        source.set(ms(1010));
        let s = clock.tick();
        assert_eq!(s.delta, Duration::ZERO);
        assert_eq!(s.current, ms(1010));
        assert_eq!(s.elapsed, ms(10));

        source.advance(ms(5));
        assert_eq!(clock.tick().delta, ms(5));
    }

    #[test]
    fn tick_publishes_snapshot() {
        let (mut clock, source) = clock_at(0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        clock.events_mut().on("tick", move |t: &TimeState| s.borrow_mut().push(t.elapsed)).unwrap();

        source.advance(ms(10));
        clock.tick();
        source.advance(ms(10));
        clock.tick();

        assert_eq!(*seen.borrow(), vec![ms(10), ms(20)]);
    }

    // ── frame loop ────────────────────────────────────────────────────────

    #[test]
    fn frame_loop_rearms_until_stopped() {
        let (mut clock, source) = clock_at(0);
        let mut sched = ManualScheduler::new();
        clock.start(&mut sched);

        let mut ticks = 0;
        while sched.take_pending() {
            source.advance(ms(16));
            assert_eq!(clock.on_frame(&mut sched), FrameOutcome::Ticked);
            ticks += 1;
            if ticks == 5 {
                clock.stop();
            }
        }

        assert_eq!(ticks, 5);
        assert_eq!(clock.state().frame_index, 5);
        assert_eq!(clock.on_frame(&mut sched), FrameOutcome::Stopped);
        assert!(!sched.is_pending());
    }

    #[test]
    fn subscriber_can_stop_the_loop() {
        let (mut clock, source) = clock_at(0);
        let stop = clock.stop_handle();
        clock
            .events_mut()
            .on("tick", move |t: &TimeState| {
                if t.frame_index == 3 {
                    stop.stop();
                }
            })
            .unwrap();

        let mut sched = ManualScheduler::new();
        clock.start(&mut sched);
        while sched.take_pending() {
            source.advance(ms(16));
            clock.on_frame(&mut sched);
        }

        assert_eq!(clock.state().frame_index, 3);
        assert!(!clock.is_running());
    }

    #[test]
    fn stopped_clock_does_not_arm() {
        let (clock, _) = clock_at(0);
        clock.stop();
        let mut sched = ManualScheduler::new();
        clock.start(&mut sched);
        assert!(!sched.is_pending());
    }
}
