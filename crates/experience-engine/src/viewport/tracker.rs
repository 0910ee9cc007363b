use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use crate::events::{EventHub, EventName};

use super::size::Viewport;

/// Pixel ratio ceiling applied to whatever the host reports.
pub const DEFAULT_PIXEL_RATIO_CAP: f32 = 2.0;

/// Read-only view of the host window surface.
pub trait HostWindow {
    /// Inner size in logical pixels.
    fn logical_size(&self) -> (f32, f32);

    /// Device pixel ratio (physical pixels per logical pixel).
    fn device_pixel_ratio(&self) -> f64;
}

impl HostWindow for winit::window::Window {
    fn logical_size(&self) -> (f32, f32) {
        let phys = self.inner_size();
        let logi: winit::dpi::LogicalSize<f64> = phys.to_logical(self.scale_factor());
        (logi.width as f32, logi.height as f32)
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.scale_factor()
    }
}

impl<T: HostWindow + ?Sized> HostWindow for Arc<T> {
    fn logical_size(&self) -> (f32, f32) {
        (**self).logical_size()
    }

    fn device_pixel_ratio(&self) -> f64 {
        (**self).device_pixel_ratio()
    }
}

impl<T: HostWindow + ?Sized> HostWindow for Rc<T> {
    fn logical_size(&self) -> (f32, f32) {
        (**self).logical_size()
    }

    fn device_pixel_ratio(&self) -> f64 {
        (**self).device_pixel_ratio()
    }
}

/// Host with settable metrics, for headless runs and tests.
#[derive(Debug)]
pub struct StaticHost {
    size: Cell<(f32, f32)>,
    dpr: Cell<f64>,
}

impl StaticHost {
    pub fn new(width: f32, height: f32, dpr: f64) -> Self {
        Self { size: Cell::new((width, height)), dpr: Cell::new(dpr) }
    }

    /// Changes the reported metrics. Callers still have to deliver the resize
    /// notification to the tracker.
    pub fn set(&self, width: f32, height: f32, dpr: f64) {
        self.size.set((width, height));
        self.dpr.set(dpr);
    }
}

impl HostWindow for StaticHost {
    fn logical_size(&self) -> (f32, f32) {
        self.size.get()
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.dpr.get()
    }
}

/// Events published by [`ViewportTracker`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ViewportEvent {
    Resize,
}

impl EventName for ViewportEvent {
    fn event_name(&self) -> &'static str {
        match self {
            ViewportEvent::Resize => "resize",
        }
    }
}

/// Owns the current viewport state.
pub struct ViewportTracker {
    host: Box<dyn HostWindow>,
    pixel_ratio_cap: f32,
    current: Viewport,
    events: EventHub<Viewport>,
}

impl ViewportTracker {
    /// Reads the host once; subscribers registered later only see subsequent resizes.
    pub fn new(host: Box<dyn HostWindow>, pixel_ratio_cap: f32) -> Self {
        let mut tracker = Self {
            host,
            pixel_ratio_cap,
            current: Viewport::default(),
            events: EventHub::new(),
        };
        tracker.update_sizes();
        tracker
    }

    /// Recomputes the viewport from the host window.
    pub fn update_sizes(&mut self) {
        let (width, height) = self.host.logical_size();
        let pixel_ratio = (self.host.device_pixel_ratio() as f32).min(self.pixel_ratio_cap);
        self.current = Viewport::new(width, height, pixel_ratio);
    }

    /// Host resize notification: refresh, then publish `"resize"`.
    pub fn handle_host_resize(&mut self) {
        self.update_sizes();
        log::debug!(
            "viewport resized to {}x{} @{}",
            self.current.width,
            self.current.height,
            self.current.pixel_ratio
        );
        let _ = self.events.trigger_kind(ViewportEvent::Resize, &self.current);
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.current
    }

    #[inline]
    pub fn pixel_ratio_cap(&self) -> f32 {
        self.pixel_ratio_cap
    }

    pub fn events(&self) -> &EventHub<Viewport> {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventHub<Viewport> {
        &mut self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn tracker(host: &Rc<StaticHost>) -> ViewportTracker {
        ViewportTracker::new(Box::new(Rc::clone(host)), DEFAULT_PIXEL_RATIO_CAP)
    }

    #[test]
    fn construction_reads_host() {
        let host = Rc::new(StaticHost::new(1280.0, 720.0, 1.5));
        let t = tracker(&host);
        assert_eq!(t.viewport(), Viewport::new(1280.0, 720.0, 1.5));
    }

    #[test]
    fn resize_reflects_host_and_publishes_snapshot() {
        let host = Rc::new(StaticHost::new(800.0, 600.0, 1.0));
        let mut t = tracker(&host);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        t.events_mut().on("resize", move |vp: &Viewport| s.borrow_mut().push(*vp)).unwrap();

        host.set(1024.0, 768.0, 1.0);
        t.handle_host_resize();

        assert_eq!(t.viewport(), Viewport::new(1024.0, 768.0, 1.0));
        assert_eq!(*seen.borrow(), vec![Viewport::new(1024.0, 768.0, 1.0)]);
    }

    #[test]
    fn pixel_ratio_is_capped() {
        let host = Rc::new(StaticHost::new(800.0, 600.0, 3.0));
        let mut t = tracker(&host);
        assert_eq!(t.viewport().pixel_ratio, 2.0);

        host.set(800.0, 600.0, 4.0);
        t.handle_host_resize();
        assert_eq!(t.viewport().pixel_ratio, 2.0);
    }

    #[test]
    fn custom_cap_applies() {
        let host = Rc::new(StaticHost::new(800.0, 600.0, 3.0));
        let t = ViewportTracker::new(Box::new(host), 1.0);
        assert_eq!(t.viewport().pixel_ratio, 1.0);
    }

    #[test]
    fn update_sizes_alone_does_not_publish() {
        let host = Rc::new(StaticHost::new(800.0, 600.0, 1.0));
        let mut t = tracker(&host);
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        t.events_mut().on("resize", move |_| c.set(c.get() + 1)).unwrap();

        host.set(100.0, 100.0, 1.0);
        t.update_sizes();
        assert_eq!(count.get(), 0);
        assert_eq!(t.viewport().width, 100.0);
    }
}
